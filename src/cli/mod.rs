//! Command-line layer: flags → immutable [`Config`] → one publish call → exit code.

mod dispatch;

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

pub use dispatch::{build_request, dispatch, resolve_source_address, run};

use crate::client::{CredentialSource, SnsError};
use crate::domain::{
    MaxPrice, MessageText, PhoneNumber, Region, SenderId, SmsOptions, SmsType, Subject,
    ValidationError,
};

/// Wrong number of positional arguments or unusable flags.
pub const EX_USAGE: u8 = 1;
/// The publish call failed.
pub const EX_API_ERROR: u8 = 2;
/// The `--source` address could not be resolved.
pub const EX_LOCAL_IP_ERROR: u8 = 3;

pub const USAGE: &str = "Specify exactly two non-flag arguments:
    the phone number in E.164 format
    and the message";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sns-sms-send",
    version,
    about = "Send an SMS message through AWS SNS",
    long_about = None
)]
pub struct Args {
    #[arg(long = "authregion", default_value = Region::DEFAULT, help = "AWS Region to use")]
    pub auth_region: String,

    #[arg(
        long = "authfile",
        default_value = "",
        help = "[optional] path to file containing credentials"
    )]
    pub auth_file: String,

    #[arg(
        long = "authprofile",
        default_value = "",
        help = "[optional] name of AWS profile to use"
    )]
    pub auth_profile: String,

    #[arg(
        long = "source",
        default_value = "",
        help = "[optional] source IP for API requests"
    )]
    pub source: String,

    #[arg(long = "disablessl", help = "Disable SSL")]
    pub disable_ssl: bool,

    #[arg(long = "senderid", default_value = "", help = "SenderID (if applicable)")]
    pub sender_id: String,

    #[arg(long = "subject", default_value = "", help = "Subject (if applicable)")]
    pub subject: String,

    #[arg(
        long = "transactional",
        help = "Transactional or Promotional (default)"
    )]
    pub transactional: bool,

    #[arg(long = "maxprice", default_value = MaxPrice::DEFAULT, help = "Maximum price")]
    pub max_price: String,

    #[arg(long = "dryrun", help = "Dry-run; show what we would do...")]
    pub dry_run: bool,

    #[arg(long = "verbose", help = "Be verbose")]
    pub verbose: bool,

    #[arg(long = "debug", help = "Be even more verbose")]
    pub debug: bool,

    /// The phone number in E.164 format, then the message
    ///
    /// Flag parsing stops at the first positional argument; everything after it is positional,
    /// including values that start with `-`.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub positional: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}", USAGE)]
    Usage,

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] ValidationError),

    #[error("Unable to resolve local address: {0}")]
    LocalAddress(#[source] std::io::Error),

    #[error("ERROR sending message: {0}")]
    Api(#[from] SnsError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage | Self::InvalidArguments(_) => EX_USAGE,
            Self::Api(_) => EX_API_ERROR,
            Self::LocalAddress(_) => EX_LOCAL_IP_ERROR,
        }
    }
}

#[derive(Debug, Clone)]
/// Resolved settings for one invocation. Built once by [`Config::from_args`].
pub struct Config {
    pub region: Region,
    pub credentials: CredentialSource,
    pub source: Option<String>,
    pub disable_tls: bool,
    pub options: SmsOptions,
    pub phone_number: PhoneNumber,
    pub message: MessageText,
    pub dry_run: bool,
    /// Always `true` when `debug` is.
    pub verbose: bool,
    pub debug: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        let [phone_number, message]: [String; 2] =
            args.positional.try_into().map_err(|_| CliError::Usage)?;

        let phone_number = PhoneNumber::new(phone_number);
        if !phone_number.is_valid_e164() {
            warn!(
                phone_number = phone_number.raw(),
                "phone number does not look like a valid E.164 number"
            );
        }
        let message = MessageText::new(message);

        let credentials = CredentialSource::shared(
            non_empty(args.auth_file).map(PathBuf::from),
            non_empty(args.auth_profile),
        );

        let options = SmsOptions {
            sms_type: SmsType::from_transactional(args.transactional),
            max_price: non_empty(args.max_price).map(MaxPrice::new).transpose()?,
            sender_id: non_empty(args.sender_id).map(SenderId::new).transpose()?,
            subject: non_empty(args.subject).map(Subject::new).transpose()?,
        };

        Ok(Self {
            region: Region::new(args.auth_region)?,
            credentials,
            source: non_empty(args.source),
            disable_tls: args.disable_ssl,
            options,
            phone_number,
            message,
            dry_run: args.dry_run,
            verbose: args.verbose || args.debug,
            debug: args.debug,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
