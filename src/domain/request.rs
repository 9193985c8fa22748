use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::value::{MaxPrice, MessageText, PhoneNumber, SenderId, SmsType, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
/// Data type of a message attribute value.
pub enum DataType {
    String,
    Number,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
/// Typed value of one message attribute. Numbers travel as their literal text.
pub struct MessageAttributeValue {
    pub data_type: DataType,
    pub string_value: String,
}

impl MessageAttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: DataType::String,
            string_value: value.into(),
        }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self {
            data_type: DataType::Number,
            string_value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SmsOptions {
    pub sms_type: SmsType,
    pub max_price: Option<MaxPrice>,
    pub sender_id: Option<SenderId>,
    pub subject: Option<Subject>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishRequest {
    phone_number: PhoneNumber,
    message: MessageText,
    message_attributes: BTreeMap<String, MessageAttributeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<Subject>,
}

impl PublishRequest {
    /// Build a direct-to-phone SMS publish.
    ///
    /// `AWS.SNS.SMS.SMSType` is always set; the price ceiling and sender id become
    /// attributes only when present. The subject is a top-level field, not an attribute.
    pub fn sms(phone_number: PhoneNumber, message: MessageText, options: &SmsOptions) -> Self {
        let mut message_attributes = BTreeMap::new();
        message_attributes.insert(
            SmsType::FIELD.to_owned(),
            MessageAttributeValue::string(options.sms_type.as_str()),
        );
        if let Some(max_price) = options.max_price.as_ref() {
            message_attributes.insert(
                MaxPrice::FIELD.to_owned(),
                MessageAttributeValue::number(max_price.as_str()),
            );
        }
        if let Some(sender_id) = options.sender_id.as_ref() {
            message_attributes.insert(
                SenderId::FIELD.to_owned(),
                MessageAttributeValue::string(sender_id.as_str()),
            );
        }

        Self {
            phone_number,
            message,
            message_attributes,
            subject: options.subject.clone(),
        }
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    /// Attributes keyed by name, in name order.
    pub fn message_attributes(&self) -> &BTreeMap<String, MessageAttributeValue> {
        &self.message_attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&MessageAttributeValue> {
        self.message_attributes.get(name)
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }
}
