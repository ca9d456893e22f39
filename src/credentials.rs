//! # Credentials
//!
//! Extracts OpenStack auth fields from the cloud provider secret.
//!
//! Two mutually exclusive auth modes are supported: username/password and
//! application credentials. When the secret carries an application credential
//! that mode wins and username/password resolve to empty strings.
//!
//! Credentials are transient: they are wiped on drop and never logged.

use crate::error::{Error, Result};
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret data key for the keystone domain
pub const DOMAIN_NAME: &str = "domainName";
/// Secret data key for the project (tenant)
pub const TENANT_NAME: &str = "tenantName";
/// Secret data key for the user name
pub const USERNAME: &str = "username";
/// Secret data key for the password
pub const PASSWORD: &str = "password";
/// Secret data key for the application credential ID
pub const APPLICATION_CREDENTIAL_ID: &str = "applicationCredentialID";
/// Secret data key for the application credential name
pub const APPLICATION_CREDENTIAL_NAME: &str = "applicationCredentialName";
/// Secret data key for the application credential secret
pub const APPLICATION_CREDENTIAL_SECRET: &str = "applicationCredentialSecret";
/// Secret data key for the keystone URL
pub const AUTH_URL: &str = "authURL";
/// Secret data key for the keystone CA bundle
pub const CA_CERT: &str = "caCert";
/// Secret data key for the insecure flag
pub const INSECURE: &str = "insecure";

/// OpenStack credentials resolved from secret data
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub domain_name: String,
    pub tenant_name: String,
    pub username: String,
    pub password: String,
    pub application_credential_id: String,
    pub application_credential_name: String,
    pub application_credential_secret: String,
    pub auth_url: String,
    /// CA bundle for keystone, `None` when absent or empty
    pub ca_cert: Option<String>,
    /// Explicit `insecure: "true"` in the secret
    pub insecure: bool,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("domain_name", &self.domain_name)
            .field("tenant_name", &self.tenant_name)
            .field("username", &self.username)
            .field("password", &"***")
            .field("application_credential_id", &self.application_credential_id)
            .field("application_credential_secret", &"***")
            .field("auth_url", &self.auth_url)
            .field("insecure", &self.insecure)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Resolve credentials from raw secret data
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] when neither a username/password
    /// pair nor an application credential is present.
    pub fn from_secret_data(data: &BTreeMap<String, Vec<u8>>) -> Result<Self> {
        let get = |key: &str| {
            data.get(key)
                .map(|value| String::from_utf8_lossy(value).into_owned())
                .unwrap_or_default()
        };

        let application_credential_id = get(APPLICATION_CREDENTIAL_ID);
        let application_credential_secret = get(APPLICATION_CREDENTIAL_SECRET);
        let uses_application_credential =
            !application_credential_id.is_empty() || !application_credential_secret.is_empty();

        let (username, password) = if uses_application_credential {
            debug!("Secret carries an application credential, ignoring username/password");
            (String::new(), String::new())
        } else {
            let username = get(USERNAME);
            let password = get(PASSWORD);
            if username.is_empty() || password.is_empty() {
                return Err(Error::MissingCredential {
                    missing: format!(
                        "{USERNAME}/{PASSWORD} nor {APPLICATION_CREDENTIAL_ID}/{APPLICATION_CREDENTIAL_SECRET}"
                    ),
                });
            }
            (username, password)
        };

        let application_credential_name = if uses_application_credential {
            get(APPLICATION_CREDENTIAL_NAME)
        } else {
            String::new()
        };

        let ca_cert = Some(get(CA_CERT)).filter(|ca| !ca.is_empty());

        Ok(Self {
            domain_name: get(DOMAIN_NAME),
            tenant_name: get(TENANT_NAME),
            username,
            password,
            application_credential_id,
            application_credential_name,
            application_credential_secret,
            auth_url: get(AUTH_URL),
            ca_cert,
            insecure: get(INSECURE).eq_ignore_ascii_case("true"),
        })
    }

    /// Resolve credentials from a Kubernetes secret
    ///
    /// `stringData` entries (as found in manifests that were never applied)
    /// take precedence over `data`, matching API server semantics.
    ///
    /// # Errors
    ///
    /// See [`Credentials::from_secret_data`].
    pub fn from_secret(secret: &Secret) -> Result<Self> {
        Self::from_secret_data(&secret_data(secret))
    }

    /// Whether the application credential auth mode is in use
    #[must_use]
    pub fn uses_application_credential(&self) -> bool {
        !self.application_credential_id.is_empty() || !self.application_credential_secret.is_empty()
    }
}

/// Flatten a secret's `data` and `stringData` into raw bytes
#[must_use]
pub fn secret_data(secret: &Secret) -> BTreeMap<String, Vec<u8>> {
    let mut data: BTreeMap<String, Vec<u8>> = secret
        .data
        .iter()
        .flatten()
        .map(|(key, value)| (key.clone(), value.0.clone()))
        .collect();
    for (key, value) in secret.string_data.iter().flatten() {
        data.insert(key.clone(), value.clone().into_bytes());
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::ByteString;

    fn data(entries: &[(&str, &str)]) -> BTreeMap<String, Vec<u8>> {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn test_password_mode() {
        let creds = Credentials::from_secret_data(&data(&[
            (DOMAIN_NAME, "domain-name"),
            (TENANT_NAME, "tenant-name"),
            (USERNAME, "username"),
            (PASSWORD, "password"),
            (AUTH_URL, "someurl"),
        ]))
        .expect("credentials");

        assert_eq!(creds.domain_name, "domain-name");
        assert_eq!(creds.tenant_name, "tenant-name");
        assert_eq!(creds.username, "username");
        assert_eq!(creds.password, "password");
        assert_eq!(creds.auth_url, "someurl");
        assert!(creds.application_credential_id.is_empty());
        assert!(creds.ca_cert.is_none());
        assert!(!creds.insecure);
        assert!(!creds.uses_application_credential());
    }

    #[test]
    fn test_application_credential_wins_over_password() {
        let creds = Credentials::from_secret_data(&data(&[
            (USERNAME, "username"),
            (PASSWORD, "password"),
            (APPLICATION_CREDENTIAL_ID, "app-id"),
            (APPLICATION_CREDENTIAL_SECRET, "app-secret"),
            (APPLICATION_CREDENTIAL_NAME, "app-name"),
        ]))
        .expect("credentials");

        assert!(creds.username.is_empty());
        assert!(creds.password.is_empty());
        assert_eq!(creds.application_credential_id, "app-id");
        assert_eq!(creds.application_credential_secret, "app-secret");
        assert_eq!(creds.application_credential_name, "app-name");
        assert!(creds.uses_application_credential());
    }

    #[test]
    fn test_missing_both_modes_fails() {
        let result = Credentials::from_secret_data(&data(&[
            (DOMAIN_NAME, "domain-name"),
            (USERNAME, "username"),
        ]));
        assert!(matches!(result, Err(Error::MissingCredential { .. })));
    }

    #[test]
    fn test_optional_fields_are_not_required() {
        let creds = Credentials::from_secret_data(&data(&[
            (USERNAME, "username"),
            (PASSWORD, "password"),
            (CA_CERT, ""),
        ]))
        .expect("credentials");
        assert!(creds.domain_name.is_empty());
        assert!(creds.ca_cert.is_none());
    }

    #[test]
    fn test_ca_cert_and_insecure_flag() {
        let creds = Credentials::from_secret_data(&data(&[
            (USERNAME, "username"),
            (PASSWORD, "password"),
            (CA_CERT, "custom-cert"),
            (INSECURE, "true"),
        ]))
        .expect("credentials");
        assert_eq!(creds.ca_cert.as_deref(), Some("custom-cert"));
        assert!(creds.insecure);
    }

    #[test]
    fn test_from_secret_merges_string_data() {
        let secret = Secret {
            data: Some(BTreeMap::from([
                (USERNAME.to_string(), ByteString(b"from-data".to_vec())),
                (PASSWORD.to_string(), ByteString(b"password".to_vec())),
            ])),
            string_data: Some(BTreeMap::from([(
                USERNAME.to_string(),
                "from-string-data".to_string(),
            )])),
            ..Default::default()
        };
        let creds = Credentials::from_secret(&secret).expect("credentials");
        assert_eq!(creds.username, "from-string-data");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::from_secret_data(&data(&[
            (USERNAME, "username"),
            (PASSWORD, "hunter2"),
        ]))
        .expect("credentials");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
