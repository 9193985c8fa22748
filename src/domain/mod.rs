//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{DataType, MessageAttributeValue, PublishRequest, SmsOptions};
pub use response::PublishResponse;
pub use validation::ValidationError;
pub use value::{MaxPrice, MessageText, PhoneNumber, Region, SenderId, SmsType, Subject};
