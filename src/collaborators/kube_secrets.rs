//! # Kubernetes Secret Reader
//!
//! Reads secrets through the Kubernetes API.

use super::{SecretReader, SecretRef};
use crate::credentials::secret_data;
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::debug;

/// Secret reader backed by a Kubernetes client
#[derive(Clone)]
pub struct KubeSecretReader {
    client: Client,
}

impl std::fmt::Debug for KubeSecretReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretReader").finish_non_exhaustive()
    }
}

impl KubeSecretReader {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretReader for KubeSecretReader {
    async fn get_secret(&self, secret_ref: &SecretRef) -> Result<BTreeMap<String, Vec<u8>>> {
        debug!(
            "Reading secret {}/{}",
            secret_ref.namespace, secret_ref.name
        );
        let api: Api<Secret> = Api::namespaced(self.client.clone(), &secret_ref.namespace);
        let secret = api.get(&secret_ref.name).await.map_err(|e| {
            Error::collaborator(
                "secret store",
                format!(
                    "failed to get secret {}/{}: {e}",
                    secret_ref.namespace, secret_ref.name
                ),
            )
        })?;
        Ok(secret_data(&secret))
    }
}
