use serde_json::Value;

/// Masks card data in JSON payloads before they are logged
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = if is_sensitive_field(key) {
                    mask_value(val)
                } else {
                    sanitize_json(val)
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "pan" | "cardpan" | "cvv" | "cardcvv" | "expirydate" | "cardexpirydate"
    )
}

/// Long values keep their last four characters, like a printed receipt.
pub fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.chars().count() > 8 => {
            let tail: String = s.chars().skip(s.chars().count() - 4).collect();
            Value::String(format!("****{}", tail))
        }
        _ => Value::String("****".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_start_transaction_body() {
        let input = json!({
            "idempotencyKey": "K1",
            "cardPan": "4111111111111111",
            "cardCvv": "123",
            "cardExpiryDate": "12/30",
            "amount": 500
        });

        let sanitized = sanitize_json(&input);

        assert_eq!(sanitized["cardPan"], "****1111");
        assert_eq!(sanitized["cardCvv"], "****");
        assert_eq!(sanitized["cardExpiryDate"], "****");
        assert_eq!(sanitized["idempotencyKey"], "K1");
        assert_eq!(sanitized["amount"], 500);
    }

    #[test]
    fn test_sanitize_nested() {
        let input = json!({
            "cards": [
                {"pan": "5500000000000004", "accountId": "A1"}
            ]
        });

        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["cards"][0]["pan"], "****0004");
        assert_eq!(sanitized["cards"][0]["accountId"], "A1");
    }
}
