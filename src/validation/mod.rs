use std::fmt;

pub const IDEMPOTENCY_KEY_MAX_LEN: usize = 255;
pub const TRANSACTION_ID_MAX_LEN: usize = 255;
pub const ACCOUNT_ID_MAX_LEN: usize = 255;
pub const AMOUNT_INPUT_MAX_LEN: usize = 19;
pub const CURRENCY_CODE_LEN: usize = 3;
pub const CARD_FIELD_MAX_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

/// Idempotency keys are only checked, never rewritten: the server
/// deduplicates on the exact bytes the client sends.
pub fn validate_idempotency_key(key: &str) -> ValidationResult {
    validate_required("idempotencyKey", key)?;
    validate_max_len("idempotencyKey", key, IDEMPOTENCY_KEY_MAX_LEN)
}

/// Checks an opaque identifier as typed. Surrounding or repeated whitespace
/// is kept; control characters are rejected rather than stripped.
pub fn validate_identifier(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    validate_required(field, value)?;
    validate_max_len(field, value, max_len)?;

    if value.chars().any(char::is_control) {
        return Err(ValidationError::new(
            field,
            "must not contain control characters",
        ));
    }

    Ok(())
}

/// Parses an integer amount of minor currency units.
pub fn parse_minor_units(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    validate_required(field, raw)?;
    validate_max_len(field, raw, AMOUNT_INPUT_MAX_LEN)?;

    raw.parse::<i64>()
        .map_err(|_| ValidationError::new(field, "must be an integer number of minor units"))
}

pub fn validate_non_negative(field: &'static str, value: i64) -> ValidationResult {
    if value < 0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }

    Ok(())
}

pub fn validate_positive_amount(amount: i64) -> ValidationResult {
    if amount <= 0 {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    Ok(())
}

pub fn validate_currency(currency: &str) -> ValidationResult {
    let currency = sanitize_string(currency);
    validate_required("currency", &currency)?;

    if currency.len() != CURRENCY_CODE_LEN || !currency.chars().all(|ch| ch.is_ascii_uppercase()) {
        return Err(ValidationError::new(
            "currency",
            format!("must be {} uppercase letters", CURRENCY_CODE_LEN),
        ));
    }

    Ok(())
}

pub fn validate_pan(field: &'static str, pan: &str) -> ValidationResult {
    validate_required(field, pan)?;

    if !pan.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new(field, "must contain only digits"));
    }

    Ok(())
}
