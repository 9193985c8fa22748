use std::path::{Path, PathBuf};

use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Where to look for credentials.
///
/// With neither a file nor a profile, the SDK's default provider chain is used (environment,
/// shared config and credentials files, SSO, container and instance roles). Naming a file or a
/// profile restricts the lookup to that shared credentials profile.
///
/// An explicit file replaces `~/.aws/credentials`. The profile defaults to `AWS_PROFILE`, then
/// `default`.
pub struct CredentialSource {
    file: Option<PathBuf>,
    profile: Option<String>,
}

impl CredentialSource {
    /// The SDK's default provider chain.
    pub fn default_chain() -> Self {
        Self::default()
    }

    /// Shared credentials file lookup with optional file and profile overrides.
    pub fn shared(file: Option<PathBuf>, profile: Option<String>) -> Self {
        Self { file, profile }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// The shared-profile provider to install, or `None` for the default chain.
    pub(crate) fn profile_provider(&self) -> Option<ProfileFileCredentialsProvider> {
        if self.file.is_none() && self.profile.is_none() {
            return None;
        }

        let mut builder = ProfileFileCredentialsProvider::builder();
        if let Some(file) = &self.file {
            builder = builder.profile_files(
                ProfileFiles::builder()
                    .with_file(ProfileFileKind::Credentials, file)
                    .build(),
            );
        }
        if let Some(profile) = &self.profile {
            builder = builder.profile_name(profile);
        }
        debug!(
            file = ?self.file,
            profile = ?self.profile,
            "using shared credentials profile"
        );
        Some(builder.build())
    }
}
