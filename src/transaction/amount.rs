//! Amounts in the block-hash preimage must be printed exactly the way
//! JavaScript peers print numbers (`Number.prototype.toString`), or the
//! same block hashes differently on each side.

use serde::ser::Error as _;
use serde::{Serialize as _, Serializer};
use serde_json::value::RawValue;

/// Render `value` with ECMAScript number-to-string rules. `None` for NaN
/// and infinities, which JSON encodes as `null`.
pub fn js_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let mut buf = ryu::Buffer::new();
    let shortest = buf.format_finite(value);
    let (negative, unsigned) = match shortest.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, shortest),
    };

    let (mantissa, exponent) = match unsigned.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().ok()?),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    // value = 0.DIGITS * 10^point
    let mut digits = format!("{int_part}{frac_part}");
    let mut point = int_part.len() as i32 + exponent;
    let leading = digits.len() - digits.trim_start_matches('0').len();
    digits.drain(..leading);
    point -= leading as i32;
    digits.truncate(digits.trim_end_matches('0').len());

    if digits.is_empty() {
        return Some("0".to_string());
    }

    let k = digits.len() as i32;
    let n = point;
    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', (n - k) as usize));
    } else if 0 < n && n <= 21 {
        out.push_str(&digits[..n as usize]);
        out.push('.');
        out.push_str(&digits[n as usize..]);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-n) as usize));
        out.push_str(&digits);
    } else {
        let e = n - 1;
        out.push_str(&digits[..1]);
        if k > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if e < 0 { '-' } else { '+' });
        out.push_str(&e.abs().to_string());
    }
    Some(out)
}

/// `serialize_with` hook for amount fields.
pub fn serialize<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match js_number(*amount) {
        Some(text) => RawValue::from_string(text)
            .map_err(S::Error::custom)?
            .serialize(serializer),
        None => serializer.serialize_none(),
    }
}
