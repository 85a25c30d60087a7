//! Explicit AWS credentials
//!
//! Credentials travel as a value into the client constructor instead of
//! being written into the process environment.

use crate::error::{Error, Result};

/// Length of an AWS access key id
const ACCESS_KEY_LEN: usize = 20;

/// Credentials and profile selection for the S3 client
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Named profile from the shared AWS config files
    pub profile: Option<String>,
}

impl Credentials {
    /// Build and validate credentials
    ///
    /// Static keys must be given together and the access key must be 20
    /// ASCII alphanumerics. Without keys the SDK's default provider chain
    /// (optionally scoped to `profile`) is used.
    pub fn new(
        access_key: Option<String>,
        secret_key: Option<String>,
        profile: Option<String>,
    ) -> Result<Self> {
        let access_key = access_key.filter(|k| !k.is_empty());
        let secret_key = secret_key.filter(|k| !k.is_empty());

        match (&access_key, &secret_key) {
            (Some(key), Some(_)) => {
                if key.len() != ACCESS_KEY_LEN || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(Error::Auth(format!(
                        "access key must be {ACCESS_KEY_LEN} alphanumeric characters"
                    )));
                }
            }
            (Some(_), None) => return Err(Error::Auth("access key given without secret key".into())),
            (None, Some(_)) => return Err(Error::Auth("secret key given without access key".into())),
            (None, None) => {}
        }

        Ok(Self {
            access_key,
            secret_key,
            profile: profile.filter(|p| !p.is_empty()),
        })
    }

    /// Static key pair, when both keys are present
    pub fn static_keys(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some((access.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("profile", &self.profile)
            .finish()
    }
}
