//! # Manifest Secret Reader
//!
//! Serves secrets from parsed manifests instead of a cluster. Used by the CLI
//! to compose values offline.

use super::{SecretReader, SecretRef};
use crate::credentials::secret_data;
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;

/// In-memory secret store keyed by namespace and name
#[derive(Default)]
pub struct ManifestSecretReader {
    secrets: BTreeMap<(String, String), BTreeMap<String, Vec<u8>>>,
}

impl std::fmt::Debug for ManifestSecretReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestSecretReader")
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ManifestSecretReader {
    /// Index secrets by their metadata
    ///
    /// Secrets without a namespace land in `fallback_namespace`.
    pub fn from_secrets(
        secrets: impl IntoIterator<Item = Secret>,
        fallback_namespace: &str,
    ) -> Self {
        let secrets = secrets
            .into_iter()
            .map(|secret| {
                let namespace = secret
                    .metadata
                    .namespace
                    .clone()
                    .unwrap_or_else(|| fallback_namespace.to_string());
                let name = secret.metadata.name.clone().unwrap_or_default();
                ((namespace, name), secret_data(&secret))
            })
            .collect();
        Self { secrets }
    }

    /// Add raw secret data
    pub fn insert(&mut self, secret_ref: SecretRef, data: BTreeMap<String, Vec<u8>>) {
        self.secrets
            .insert((secret_ref.namespace, secret_ref.name), data);
    }
}

#[async_trait]
impl SecretReader for ManifestSecretReader {
    async fn get_secret(&self, secret_ref: &SecretRef) -> Result<BTreeMap<String, Vec<u8>>> {
        self.secrets
            .get(&(secret_ref.namespace.clone(), secret_ref.name.clone()))
            .cloned()
            .ok_or_else(|| {
                Error::collaborator(
                    "secret store",
                    format!("secret {}/{} not found", secret_ref.namespace, secret_ref.name),
                )
            })
    }
}
