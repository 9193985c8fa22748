use std::io::{self, Write};
use std::net::IpAddr;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::{CliError, Config};
use crate::client::{Publisher, SnsClient};
use crate::domain::{PublishRequest, PublishResponse};

const DEBUG_PREFIX: &str = "[DEBUG] ";

/// Resolve `--source` to a local address: an IP literal as-is, anything else via DNS.
pub async fn resolve_source_address(source: &str) -> Result<IpAddr, CliError> {
    if let Ok(address) = source.parse::<IpAddr>() {
        return Ok(address);
    }

    let mut addresses = tokio::net::lookup_host((source, 0))
        .await
        .map_err(CliError::LocalAddress)?;
    addresses.next().map(|addr| addr.ip()).ok_or_else(|| {
        CliError::LocalAddress(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no addresses found for {source:?}"),
        ))
    })
}

pub fn build_request(config: &Config) -> PublishRequest {
    PublishRequest::sms(
        config.phone_number.clone(),
        config.message.clone(),
        &config.options,
    )
}

/// Resolve the source address, build the SNS client, and dispatch.
pub async fn run(config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    let mut builder = SnsClient::builder(config.region.clone())
        .credentials(config.credentials.clone())
        .disable_tls(config.disable_tls);
    if let Some(source) = config.source.as_deref() {
        let address = resolve_source_address(source).await?;
        debug!(%address, "binding outbound connections");
        builder = builder.local_address(address);
    }
    let client = builder.build().await?;

    dispatch(config, &client, out).await?;
    Ok(())
}

/// Build the request and, unless this is a dry run, publish it.
///
/// Returns the response when a message was sent. With `debug` the request and response
/// are dumped to `out`; with `verbose` the message id is printed.
pub async fn dispatch(
    config: &Config,
    publisher: &dyn Publisher,
    out: &mut dyn Write,
) -> Result<Option<PublishResponse>, CliError> {
    let request = build_request(config);

    if config.dry_run {
        info!(
            phone_number = request.phone_number().raw(),
            "dry run, not sending"
        );
        return Ok(None);
    }

    if config.debug {
        debug_dump(out, "Sending", &request);
    }
    let response = publisher.publish(request).await?;
    if config.debug {
        debug_dump(out, "Got", &response);
    }

    if config.verbose {
        if let Err(err) = writeln!(out, "Sent with MessageID: {}", response.message_id) {
            warn!(error = %err, "failed to write message id");
        }
    }
    Ok(Some(response))
}

fn debug_dump(out: &mut dyn Write, label: &str, value: &impl Serialize) {
    let result = render_indented(value)
        .map_err(io::Error::from)
        .and_then(|dump| writeln!(out, "{DEBUG_PREFIX}{label}: {dump}"));
    if let Err(err) = result {
        warn!(error = %err, label, "failed to write debug dump");
    }
}

// Pretty JSON with four-space indent; continuation lines carry the debug prefix.
fn render_indented(value: &impl Serialize) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    let rendered = String::from_utf8_lossy(&buf);
    Ok(rendered.replace('\n', &format!("\n{DEBUG_PREFIX}")))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::cli::{Args, EX_API_ERROR, EX_LOCAL_IP_ERROR};
    use crate::client::{BoxFuture, SnsError};
    use crate::domain::{MaxPrice, SenderId, SmsType, Subject};

    use clap::Parser;

    use super::*;

    #[derive(Clone)]
    struct FakePublisher {
        state: Arc<Mutex<FakePublisherState>>,
    }

    struct FakePublisherState {
        calls: Vec<PublishRequest>,
        fail: bool,
    }

    impl FakePublisher {
        fn new(fail: bool) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakePublisherState {
                    calls: Vec::new(),
                    fail,
                })),
            }
        }

        fn calls(&self) -> Vec<PublishRequest> {
            self.state.lock().unwrap().calls.clone()
        }
    }

    impl Publisher for FakePublisher {
        fn publish<'a>(
            &'a self,
            request: PublishRequest,
        ) -> BoxFuture<'a, Result<PublishResponse, SnsError>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                state.calls.push(request);
                if state.fail {
                    return Err(SnsError::Api {
                        status: 400,
                        code: "InvalidParameter".to_owned(),
                        message: Some("Invalid parameter: PhoneNumber".to_owned()),
                        request_id: None,
                    });
                }
                Ok(PublishResponse {
                    message_id: "msg-42".to_owned(),
                    sequence_number: None,
                    request_id: Some("req-42".to_owned()),
                })
            })
        }
    }

    fn config(argv: &[&str]) -> Config {
        let args =
            Args::try_parse_from(std::iter::once("sns-sms-send").chain(argv.iter().copied()))
                .unwrap();
        Config::from_args(args).unwrap()
    }

    async fn dispatch_with(
        argv: &[&str],
        publisher: &FakePublisher,
    ) -> (Result<Option<PublishResponse>, CliError>, String) {
        let config = config(argv);
        let mut out = Vec::new();
        let result = dispatch(&config, publisher, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn default_invocation_sends_promotional_with_price() {
        let publisher = FakePublisher::new(false);
        let (result, out) = dispatch_with(&["+15551234567", "hello"], &publisher).await;

        let response = result.unwrap().unwrap();
        assert_eq!(response.message_id, "msg-42");
        assert!(out.is_empty(), "not verbose, got: {out}");

        let calls = publisher.calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.phone_number().raw(), "+15551234567");
        assert_eq!(request.message().as_str(), "hello");
        assert_eq!(
            request.attribute(SmsType::FIELD).unwrap().string_value,
            "Promotional"
        );
        assert_eq!(
            request.attribute(MaxPrice::FIELD).unwrap().string_value,
            "0.10"
        );
        assert!(request.attribute(SenderId::FIELD).is_none());
        assert!(request.subject().is_none());
    }

    #[tokio::test]
    async fn verbose_prints_message_id() {
        let publisher = FakePublisher::new(false);
        let (result, out) =
            dispatch_with(&["--verbose", "+15551234567", "hello"], &publisher).await;

        assert!(result.is_ok());
        assert_eq!(out, "Sent with MessageID: msg-42\n");
    }

    #[tokio::test]
    async fn dry_run_never_publishes_or_prints() {
        let publisher = FakePublisher::new(false);
        let (result, out) = dispatch_with(
            &["--dryrun", "--debug", "--verbose", "+15551234567", "hello"],
            &publisher,
        )
        .await;

        assert!(result.unwrap().is_none());
        assert!(out.is_empty(), "got: {out}");
        assert!(publisher.calls().is_empty());
    }

    #[tokio::test]
    async fn api_failure_maps_to_api_exit_code() {
        let publisher = FakePublisher::new(true);
        let (result, out) =
            dispatch_with(&["--verbose", "+15551234567", "hello"], &publisher).await;

        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), EX_API_ERROR);
        assert!(
            err.to_string()
                .starts_with("ERROR sending message: InvalidParameter: Invalid parameter")
        );
        assert!(out.is_empty());
        assert_eq!(publisher.calls().len(), 1);
    }

    #[tokio::test]
    async fn debug_dumps_request_and_response_then_message_id() {
        let publisher = FakePublisher::new(false);
        let (result, out) = dispatch_with(
            &["--debug", "--subject", "Hi", "+15551234567", "hello"],
            &publisher,
        )
        .await;
        assert!(result.is_ok());

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[DEBUG] Sending: {");
        assert!(lines.iter().all(|line| line.starts_with("[DEBUG] ")
            || line.starts_with("Sent with MessageID: ")));
        assert!(lines.contains(&"[DEBUG]     \"PhoneNumber\": \"+15551234567\","));
        assert!(lines.contains(&"[DEBUG]     \"Subject\": \"Hi\""));
        assert!(lines.contains(&"[DEBUG] Got: {"));
        assert!(lines.contains(&"[DEBUG]     \"MessageId\": \"msg-42\","));
        assert_eq!(lines.last(), Some(&"Sent with MessageID: msg-42"));
    }

    #[tokio::test]
    async fn optional_flags_shape_the_request() {
        let publisher = FakePublisher::new(false);
        let (result, _) = dispatch_with(
            &[
                "--transactional",
                "--maxprice",
                "",
                "--senderid",
                "ACME",
                "--subject",
                "Alert",
                "+15551234567",
                "hello",
            ],
            &publisher,
        )
        .await;
        assert!(result.is_ok());

        let request = &publisher.calls()[0];
        assert_eq!(
            request.attribute(SmsType::FIELD).unwrap().string_value,
            "Transactional"
        );
        assert!(request.attribute(MaxPrice::FIELD).is_none());
        assert_eq!(
            request.attribute(SenderId::FIELD).unwrap().string_value,
            "ACME"
        );
        assert_eq!(request.subject().map(Subject::as_str), Some("Alert"));
    }

    #[tokio::test]
    async fn source_address_literals_skip_dns() {
        assert_eq!(
            resolve_source_address("127.0.0.1").await.unwrap(),
            IpAddr::from([127, 0, 0, 1])
        );
        assert_eq!(
            resolve_source_address("::1").await.unwrap(),
            "::1".parse::<IpAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn unresolvable_source_fails_before_any_request() {
        let config = config(&[
            "--source",
            "no-such-host.invalid",
            "--verbose",
            "+15551234567",
            "hello",
        ]);
        let mut out = Vec::new();

        let err = run(&config, &mut out).await.unwrap_err();
        assert!(matches!(err, CliError::LocalAddress(_)));
        assert_eq!(err.exit_code(), EX_LOCAL_IP_ERROR);
        assert!(
            err.to_string()
                .starts_with("Unable to resolve local address: ")
        );
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn run_in_dry_run_mode_skips_the_network() {
        let config = config(&["--dryrun", "--source", "127.0.0.1", "+15551234567", "hello"]);
        let mut out = Vec::new();

        run(&config, &mut out).await.unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn render_indented_prefixes_continuation_lines() {
        let rendered = render_indented(&serde_json::json!({ "a": 1 })).unwrap();
        assert_eq!(rendered, "{\n[DEBUG]     \"a\": 1\n[DEBUG] }");
    }
}
