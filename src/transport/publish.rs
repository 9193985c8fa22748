use std::collections::HashMap;

use aws_sdk_sns::operation::RequestId;
use aws_sdk_sns::operation::publish::PublishOutput;
use aws_sdk_sns::types::MessageAttributeValue as SdkAttributeValue;
use aws_smithy_types::error::operation::BuildError;

use crate::domain::{MessageAttributeValue, PublishRequest, PublishResponse};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid message attribute {name:?}: {source}")]
    Attribute {
        name: String,
        #[source]
        source: BuildError,
    },

    #[error("response has no MessageId")]
    MissingMessageId,
}

/// Convert the request's message attributes into SDK values, keyed by attribute name.
pub fn encode_publish_attributes(
    request: &PublishRequest,
) -> Result<HashMap<String, SdkAttributeValue>, TransportError> {
    request
        .message_attributes()
        .iter()
        .map(|(name, value)| {
            encode_attribute(value)
                .map(|encoded| (name.clone(), encoded))
                .map_err(|source| TransportError::Attribute {
                    name: name.clone(),
                    source,
                })
        })
        .collect()
}

fn encode_attribute(value: &MessageAttributeValue) -> Result<SdkAttributeValue, BuildError> {
    SdkAttributeValue::builder()
        .data_type(value.data_type.as_str())
        .string_value(&value.string_value)
        .build()
}

pub fn decode_publish_output(output: &PublishOutput) -> Result<PublishResponse, TransportError> {
    let message_id = output
        .message_id()
        .filter(|id| !id.is_empty())
        .ok_or(TransportError::MissingMessageId)?;

    Ok(PublishResponse {
        message_id: message_id.to_owned(),
        sequence_number: output.sequence_number().map(str::to_owned),
        request_id: output.request_id().map(str::to_owned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MaxPrice, MessageText, PhoneNumber, SenderId, SmsOptions, SmsType};

    fn request(options: &SmsOptions) -> PublishRequest {
        PublishRequest::sms(
            PhoneNumber::new("+15551234567"),
            MessageText::new("hello"),
            options,
        )
    }

    #[test]
    fn encodes_attributes_with_their_data_types() {
        let options = SmsOptions {
            sms_type: SmsType::Transactional,
            max_price: Some(MaxPrice::new("0.10").unwrap()),
            sender_id: Some(SenderId::new("ACME").unwrap()),
            subject: None,
        };
        let attributes = encode_publish_attributes(&request(&options)).unwrap();

        assert_eq!(attributes.len(), 3);
        let sms_type = &attributes[SmsType::FIELD];
        assert_eq!(sms_type.data_type(), "String");
        assert_eq!(sms_type.string_value(), Some("Transactional"));
        let price = &attributes[MaxPrice::FIELD];
        assert_eq!(price.data_type(), "Number");
        assert_eq!(price.string_value(), Some("0.10"));
        let sender = &attributes[SenderId::FIELD];
        assert_eq!(sender.data_type(), "String");
        assert_eq!(sender.string_value(), Some("ACME"));
    }

    #[test]
    fn default_options_encode_only_the_delivery_type() {
        let attributes = encode_publish_attributes(&request(&SmsOptions::default())).unwrap();

        assert_eq!(attributes.len(), 1);
        assert_eq!(
            attributes[SmsType::FIELD].string_value(),
            Some("Promotional")
        );
    }

    #[test]
    fn decodes_message_and_sequence_ids() {
        let output = PublishOutput::builder()
            .message_id("567910cd-659e-55d4-8ccb-5aaf14679dc0")
            .sequence_number("10000000000000003000")
            .build();

        let response = decode_publish_output(&output).unwrap();
        assert_eq!(response.message_id, "567910cd-659e-55d4-8ccb-5aaf14679dc0");
        assert_eq!(
            response.sequence_number.as_deref(),
            Some("10000000000000003000")
        );
        assert_eq!(response.request_id, None);
    }

    #[test]
    fn missing_message_id_is_an_error() {
        let output = PublishOutput::builder().build();
        assert!(matches!(
            decode_publish_output(&output),
            Err(TransportError::MissingMessageId)
        ));

        let output = PublishOutput::builder().message_id("").build();
        assert!(matches!(
            decode_publish_output(&output),
            Err(TransportError::MissingMessageId)
        ));
    }
}
