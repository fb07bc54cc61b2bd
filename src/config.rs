use std::env;
use std::str::FromStr;

use log::warn;
use uuid::Uuid;

use crate::blockchain::{DEFAULT_MAX_NONCE, DEFAULT_MINING_REWARD, MineLimits};

/// Node settings, read from the environment (a `.env` file is honoured).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Address credited with mining rewards.
    pub node_address: String,
    pub mining_reward: f64,
    pub max_nonce: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            node_address: Uuid::new_v4().simple().to_string(),
            mining_reward: DEFAULT_MINING_REWARD,
            max_nonce: DEFAULT_MAX_NONCE,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults,
    /// unparseable ones are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("HOST") {
            cfg.host = host;
        }
        if let Some(addr) = lookup("NODE_ADDRESS").filter(|a| !a.trim().is_empty()) {
            cfg.node_address = addr.trim().to_string();
        }
        cfg.port = parsed(&lookup, "PORT").unwrap_or(cfg.port);
        cfg.max_nonce = parsed(&lookup, "MINE_MAX_NONCE").unwrap_or(cfg.max_nonce);
        cfg.mining_reward = parsed(&lookup, "MINING_REWARD")
            .filter(|r: &f64| {
                let ok = r.is_finite() && *r > 0.0;
                if !ok {
                    warn!("CONFIG - MINING_REWARD must be positive, got {r}");
                }
                ok
            })
            .unwrap_or(cfg.mining_reward);
        cfg
    }

    pub fn mine_limits(&self) -> MineLimits {
        MineLimits {
            max_nonce: self.max_nonce,
        }
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("CONFIG - ignoring unparseable {key}={raw:?}");
            None
        }
    }
}
