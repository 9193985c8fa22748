//! Transport layer: the AWS SDK wire seam (SDK attribute values, `PublishOutput` decoding,
//! and a `reqwest` HTTP client for bound connections).

mod http;
mod publish;

pub use http::ReqwestHttpClient;
pub use publish::{TransportError, decode_publish_output, encode_publish_attributes};
