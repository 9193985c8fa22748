//! Client layer: configures the AWS SDK (region, credentials, endpoint, HTTP client) and maps
//! SDK results ↔ domain.

mod credentials;

use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region as SdkRegion};
use aws_sdk_sns::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sns::operation::RequestId;
use aws_sdk_sns::operation::publish::PublishError;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use tracing::{debug, info};
use url::Url;

pub use credentials::CredentialSource;

use crate::domain::{PublishRequest, PublishResponse, Region};
use crate::transport::{ReqwestHttpClient, TransportError};

const SERVICE: &str = "sns";

// Transport tuning applied when outbound connections are bound to a local address.
const BOUND_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const BOUND_TCP_KEEPALIVE: Duration = Duration::from_secs(30);
const BOUND_MAX_IDLE_CONNECTIONS: usize = 100;
const BOUND_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The one remote capability the dispatcher needs: publish a message.
pub trait Publisher: Send + Sync {
    fn publish<'a>(
        &'a self,
        request: PublishRequest,
    ) -> BoxFuture<'a, Result<PublishResponse, SnsError>>;
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SnsClient`].
///
/// This error preserves:
/// - configuration failures (bad endpoint, HTTP client construction),
/// - API-level failures (SNS error responses, with status, code and request id),
/// - every other SDK failure (credentials, dispatch, timeouts, unreadable responses),
/// - request/response conversion failures.
pub enum SnsError {
    /// The configured endpoint is not a usable URL.
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// The bound HTTP client could not be built.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// SNS rejected the request.
    #[error(
        "{code}: {}\n\tstatus code: {status}, request id: {}",
        .message.as_deref().unwrap_or(""),
        .request_id.as_deref().unwrap_or("")
    )]
    Api {
        status: u16,
        code: String,
        message: Option<String>,
        request_id: Option<String>,
    },

    /// The SDK failed before SNS produced an answer (credentials, network, timeouts, ...).
    #[error("{}", DisplayErrorContext(.0.as_ref()))]
    Sdk(Box<SdkError<PublishError, HttpResponse>>),

    /// Request attributes could not be encoded or the response was incomplete.
    #[error("{0}")]
    Wire(#[from] TransportError),
}

impl From<SdkError<PublishError, HttpResponse>> for SnsError {
    fn from(err: SdkError<PublishError, HttpResponse>) -> Self {
        match err {
            SdkError::ServiceError(context) => {
                let status = context.raw().status().as_u16();
                let err = context.into_err();
                debug!(status, code = ?err.code(), "SNS returned an error response");
                Self::Api {
                    status,
                    code: err.code().unwrap_or("Unknown").to_owned(),
                    message: err.message().map(str::to_owned),
                    request_id: err.request_id().map(str::to_owned),
                }
            }
            other => Self::Sdk(Box::new(other)),
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SnsClient`].
///
/// Use this when you need a specific credentials profile, plain HTTP, a bound local address,
/// or a custom endpoint.
pub struct SnsClientBuilder {
    region: Region,
    credentials: CredentialSource,
    disable_tls: bool,
    local_address: Option<IpAddr>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl SnsClientBuilder {
    /// Create a builder for `region` with the default credential chain.
    pub fn new(region: Region) -> Self {
        Self {
            region,
            credentials: CredentialSource::default_chain(),
            disable_tls: false,
            local_address: None,
            endpoint: None,
            timeout: None,
        }
    }

    pub fn credentials(mut self, credentials: CredentialSource) -> Self {
        self.credentials = credentials;
        self
    }

    /// Talk plain HTTP to the regional endpoint.
    pub fn disable_tls(mut self, disable_tls: bool) -> Self {
        self.disable_tls = disable_tls;
        self
    }

    /// Bind outbound connections to `address`.
    ///
    /// The SDK then sends through a `reqwest` client with fixed connection tuning: 30s connect
    /// timeout, 30s TCP keep-alive, at most 100 idle connections, 90s idle timeout.
    pub fn local_address(mut self, address: IpAddr) -> Self {
        self.local_address = Some(address);
        self
    }

    /// Override the endpoint URL. Takes precedence over [`SnsClientBuilder::disable_tls`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Limit the whole publish operation, retries included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load the SDK configuration and build a [`SnsClient`].
    ///
    /// Credentials are resolved lazily by the SDK, on the first publish.
    pub async fn build(self) -> Result<SnsClient, SnsError> {
        let endpoint = match self.endpoint {
            Some(endpoint) => Some(endpoint),
            None if self.disable_tls => Some(regional_endpoint(&self.region, true)),
            None => None,
        };
        let endpoint = endpoint
            .map(|endpoint| {
                Url::parse(&endpoint)
                    .map_err(|source| SnsError::InvalidEndpoint { endpoint, source })
            })
            .transpose()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(SdkRegion::new(self.region.as_str().to_owned()));
        if let Some(provider) = self.credentials.profile_provider() {
            loader = loader.credentials_provider(provider);
        }
        if let Some(endpoint) = &endpoint {
            loader = loader.endpoint_url(endpoint.as_str());
        }
        if let Some(timeout) = self.timeout {
            loader = loader.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        }
        if let Some(address) = self.local_address {
            let client = reqwest::Client::builder()
                .local_address(address)
                .connect_timeout(BOUND_CONNECT_TIMEOUT)
                .tcp_keepalive(BOUND_TCP_KEEPALIVE)
                .pool_max_idle_per_host(BOUND_MAX_IDLE_CONNECTIONS)
                .pool_idle_timeout(BOUND_IDLE_TIMEOUT)
                .build()
                .map_err(SnsError::Transport)?;
            loader = loader.http_client(ReqwestHttpClient::new(client));
        }

        let config = loader.load().await;
        Ok(SnsClient {
            inner: aws_sdk_sns::Client::new(&config),
            region: self.region,
            endpoint,
        })
    }
}

fn regional_endpoint(region: &Region, disable_tls: bool) -> String {
    let scheme = if disable_tls { "http" } else { "https" };
    let suffix = if region.as_str().starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    format!("{scheme}://{SERVICE}.{}.{suffix}/", region.as_str())
}

#[derive(Debug, Clone)]
/// AWS SNS client for direct-to-phone SMS publishing.
pub struct SnsClient {
    inner: aws_sdk_sns::Client,
    region: Region,
    endpoint: Option<Url>,
}

impl SnsClient {
    /// Create a client for `region` using the default credential chain and HTTP client.
    pub async fn new(region: Region) -> Result<Self, SnsError> {
        SnsClientBuilder::new(region).build().await
    }

    /// Start building a client with custom settings.
    pub fn builder(region: Region) -> SnsClientBuilder {
        SnsClientBuilder::new(region)
    }

    /// The endpoint override, if any. `None` means the SDK resolves the regional endpoint.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_ref().map(Url::as_str)
    }

    /// Publish an SMS through SNS.
    ///
    /// Errors:
    /// - [`SnsError::Api`] when SNS answers with an error,
    /// - [`SnsError::Sdk`] for credential, network and timeout failures,
    /// - [`SnsError::Wire`] when the attributes cannot be encoded or no message id comes back.
    pub async fn publish(&self, request: PublishRequest) -> Result<PublishResponse, SnsError> {
        let attributes = crate::transport::encode_publish_attributes(&request)?;

        let mut call = self
            .inner
            .publish()
            .phone_number(request.phone_number().raw())
            .message(request.message().as_str())
            .set_message_attributes(Some(attributes));
        if let Some(subject) = request.subject() {
            call = call.subject(subject.as_str());
        }

        info!(region = self.region.as_str(), "publishing SMS");
        let output = call.send().await?;
        debug!(message_id = ?output.message_id(), "SNS accepted the message");

        Ok(crate::transport::decode_publish_output(&output)?)
    }
}

impl Publisher for SnsClient {
    fn publish<'a>(
        &'a self,
        request: PublishRequest,
    ) -> BoxFuture<'a, Result<PublishResponse, SnsError>> {
        Box::pin(SnsClient::publish(self, request))
    }
}
