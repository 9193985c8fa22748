use serde::Serialize;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// AWS region the SNS endpoint lives in (for example `us-west-2`).
///
/// Invariant: non-empty after trimming.
pub struct Region(String);

impl Region {
    /// SDK configuration name (`region`).
    pub const FIELD: &'static str = "region";

    /// Region used when none is configured.
    pub const DEFAULT: &'static str = "us-west-2";

    /// Create a validated [`Region`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the region name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Region {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
/// Destination phone number as sent to SNS (`PhoneNumber`).
///
/// The value is passed through exactly as given; SNS expects E.164 and is the final judge of
/// what it accepts. Use [`PhoneNumber::is_valid_e164`] to check ahead of time.
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Request parameter name used by SNS (`PhoneNumber`).
    pub const FIELD: &'static str = "PhoneNumber";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw value as sent to SNS.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the value is a `+`-prefixed number that parses as a valid phone number.
    pub fn is_valid_e164(&self) -> bool {
        if !self.0.starts_with('+') {
            return false;
        }
        phonenumber::parse(None, &self.0)
            .map(|parsed| phonenumber::is_valid(&parsed))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// SMS message body (`Message`), sent exactly as given.
pub struct MessageText(String);

impl MessageText {
    /// Request parameter name used by SNS (`Message`).
    pub const FIELD: &'static str = "Message";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// Message subject (`Subject`). SNS ignores it for SMS delivery but records it.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Subject(String);

impl Subject {
    /// Request parameter name used by SNS (`Subject`).
    pub const FIELD: &'static str = "Subject";

    /// Create a validated [`Subject`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the subject as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// SMS sender id, sent as the `AWS.SNS.SMS.SenderID` message attribute.
///
/// Invariant: must not be empty. Whether the id is honored depends on the destination country.
pub struct SenderId(String);

impl SenderId {
    /// Message attribute name used by SNS.
    pub const FIELD: &'static str = "AWS.SNS.SMS.SenderID";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// Maximum price in USD the sender is willing to pay for one message
/// (`AWS.SNS.SMS.MaxPrice`).
///
/// Invariant: a non-negative decimal number. The literal text is preserved so that
/// `0.10` is sent as `0.10` and not `0.1`.
pub struct MaxPrice(String);

impl MaxPrice {
    /// Message attribute name used by SNS.
    pub const FIELD: &'static str = "AWS.SNS.SMS.MaxPrice";

    /// Price ceiling used when none is configured.
    pub const DEFAULT: &'static str = "0.10";

    /// Create a validated [`MaxPrice`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !is_decimal(trimmed) {
            return Err(ValidationError::InvalidNumber {
                field: Self::FIELD,
                input: value,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the literal price.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Digits with at most one decimal point; no sign, exponent, or `inf`/`nan`.
fn is_decimal(value: &str) -> bool {
    let mut seen_digit = false;
    let mut seen_point = false;
    for ch in value.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
/// Delivery type, sent as the `AWS.SNS.SMS.SMSType` message attribute.
pub enum SmsType {
    /// Non-critical messages such as marketing; optimized for cost.
    #[default]
    Promotional,
    /// Critical messages such as one-time passwords; optimized for reliability.
    Transactional,
}

impl SmsType {
    /// Message attribute name used by SNS.
    pub const FIELD: &'static str = "AWS.SNS.SMS.SMSType";

    /// Pick the delivery type from a "transactional" switch.
    pub fn from_transactional(transactional: bool) -> Self {
        if transactional {
            Self::Transactional
        } else {
            Self::Promotional
        }
    }

    /// Wire value (`Promotional` or `Transactional`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Promotional => "Promotional",
            Self::Transactional => "Transactional",
        }
    }
}
