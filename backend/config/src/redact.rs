//! Config redaction: produce safe-to-share config snapshots by masking sensitive fields.

use serde_json::Value;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &[
    "channelSecret",
    "channel_secret",
    "channelAccessToken",
    "channel_access_token",
    "serviceAccountJson",
    "service_account_json",
    "privateKey",
    "private_key",
    "accessToken",
    "access_token",
    "token",
    "secret",
];

/// Redact a config JSON value, replacing all sensitive fields.
///
/// Secrets keep their first four characters as a hint when long enough.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if !is_sensitive_key(key) || s.is_empty() {
        return Value::String(s.to_string());
    }
    let hint = if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    };
    Value::String(hint)
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_channel_secret() {
        let v = json!({ "line": { "channelSecret": "0123456789abcdef" } });
        let redacted = redact(&v);
        assert_eq!(redacted["line"]["channelSecret"], "0123***");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let v = json!({ "line": { "channelAccessToken": "abc" } });
        assert_eq!(redact(&v)["line"]["channelAccessToken"], "***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "drive": { "folderId": "1AbCdEf" }, "port": 10000 });
        let redacted = redact(&v);
        assert_eq!(redacted["drive"]["folderId"], "1AbCdEf");
        assert_eq!(redacted["port"], 10000);
    }
}
