//! Send a single SMS text message through the AWS SNS `Publish` API.
//!
//! The crate follows a layered design: a domain layer of strong types, a transport layer
//! adapting them to the AWS SDK (attribute values, responses, a `reqwest` HTTP client for
//! bound connections), a small client layer configuring the SDK, and the `cli` layer behind
//! the `sns-sms-send` binary.
//!
//! ```rust,no_run
//! use sns_sms::{MessageText, PhoneNumber, PublishRequest, Region, SmsOptions, SnsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SnsClient::new(Region::new("us-west-2")?).await?;
//!     let request = PublishRequest::sms(
//!         PhoneNumber::new("+15551234567"),
//!         MessageText::new("hello"),
//!         &SmsOptions::default(),
//!     );
//!     let response = client.publish(request).await?;
//!     println!("{}", response.message_id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod domain;
mod transport;

pub use client::{BoxFuture, CredentialSource, Publisher, SnsClient, SnsClientBuilder, SnsError};
pub use domain::{
    DataType, MaxPrice, MessageAttributeValue, MessageText, PhoneNumber, PublishRequest,
    PublishResponse, Region, SenderId, SmsOptions, SmsType, Subject, ValidationError,
};
pub use transport::TransportError;
