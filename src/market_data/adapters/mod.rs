// One adapter per external provider. Each one validates the provider's JSON
// field-by-field, maps it to a normalized record, and substitutes a synthetic
// record when the fetch came back absent or malformed. Adapters never fail
// and never block each other.

use serde_json::Value;

pub mod binance;
pub mod coincap;
pub mod etherscan;
pub mod news;
pub mod sentiment;

/// Numeric field that may arrive as a JSON number or as a numeric string
/// (CoinCap serializes everything as strings). `None` when missing, null,
/// or unparseable.
pub(crate) fn num_field(v: &Value, key: &str) -> Option<f64> {
    match v.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

pub(crate) fn str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key)?.as_str().map(str::to_string)
}

pub(crate) fn u64_field(v: &Value, key: &str) -> Option<u64> {
    match v.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    }
}

/// Marks a fallback in the metrics stream so degraded panels are observable.
pub(crate) fn record_fallback(provider: &'static str) {
    metrics::counter!("coindash_synthetic_fallbacks", "provider" => provider).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn num_field_accepts_strings_and_numbers() {
        let v = json!({"a": "65000.12", "b": 2.3, "c": "not a number", "d": null});
        assert_eq!(num_field(&v, "a"), Some(65000.12));
        assert_eq!(num_field(&v, "b"), Some(2.3));
        assert_eq!(num_field(&v, "c"), None);
        assert_eq!(num_field(&v, "d"), None);
        assert_eq!(num_field(&v, "missing"), None);
    }
}
