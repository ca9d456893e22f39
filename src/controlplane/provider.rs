//! # Values Provider
//!
//! Fetches the secrets the charts depend on and composes the value trees.

use super::checksums::compute_secret_checksum;
use super::load_balancer::{classes_for_control_plane, resolve};
use super::values::{
    config_chart_values, control_plane_chart_values, shoot_chart_values,
    storage_classes_chart_values, ControlPlaneInputs,
};
use crate::collaborators::{SecretReader, SecretRef};
use crate::constants::{
    CLOUD_PROVIDER_CONFIG_DATA_KEY, CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME,
    SECRET_NAME_CLOUD_PROVIDER,
};
use crate::credentials::Credentials;
use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Composes chart values for control planes, reading secrets through `R`
pub struct ValuesProvider<R> {
    reader: R,
    secret_name: String,
}

impl<R> std::fmt::Debug for ValuesProvider<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuesProvider")
            .field("secret_name", &self.secret_name)
            .finish_non_exhaustive()
    }
}

impl<R: SecretReader> ValuesProvider<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            secret_name: SECRET_NAME_CLOUD_PROVIDER.to_string(),
        }
    }

    /// Read credentials from a differently named secret
    #[must_use]
    pub fn with_secret_name(mut self, secret_name: impl Into<String>) -> Self {
        self.secret_name = secret_name.into();
        self
    }

    async fn credentials(&self, namespace: &str) -> Result<Credentials> {
        let data = self
            .reader
            .get_secret(&SecretRef::new(&self.secret_name, namespace))
            .await?;
        Credentials::from_secret_data(&data)
    }

    /// Values for the cloud provider config chart
    ///
    /// # Errors
    ///
    /// Propagates secret store, credential and resolution errors.
    pub async fn get_config_chart_values(&self, inputs: &ControlPlaneInputs<'_>) -> Result<Value> {
        let credentials = self.credentials(inputs.namespace).await?;
        let domain = Some(credentials.domain_name.as_str()).filter(|domain| !domain.is_empty());
        let classes = classes_for_control_plane(
            inputs.config,
            inputs.cloud_profile,
            inputs.status,
            inputs.region,
            domain,
        );
        let resolved = resolve(&classes, &inputs.status.networks.floating_pool.id);
        config_chart_values(inputs, &credentials, &resolved)
    }

    /// Values for the control plane chart
    ///
    /// # Errors
    ///
    /// Propagates secret store and credential errors, and
    /// [`crate::Error::MissingChecksum`].
    pub async fn get_control_plane_chart_values(
        &self,
        inputs: &ControlPlaneInputs<'_>,
        checksums: &BTreeMap<String, String>,
    ) -> Result<Value> {
        let credentials = self.credentials(inputs.namespace).await?;
        control_plane_chart_values(inputs, &credentials, checksums)
    }

    /// Values for the shoot chart
    ///
    /// The checksum of the CSI disk config is computed from the secret read
    /// here, so `checksums` does not need to carry it.
    ///
    /// # Errors
    ///
    /// Propagates secret store and credential errors.
    pub async fn get_shoot_chart_values(
        &self,
        inputs: &ControlPlaneInputs<'_>,
        checksums: &BTreeMap<String, String>,
        webhook_ca_bundle: &str,
    ) -> Result<Value> {
        let disk_config = self
            .reader
            .get_secret(&SecretRef::new(
                CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME,
                inputs.namespace,
            ))
            .await?;

        let mut checksums = checksums.clone();
        checksums.insert(
            CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME.to_string(),
            compute_secret_checksum(&disk_config)?,
        );
        debug!("Computed checksum of {}", CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME);

        let config = match disk_config.get(CLOUD_PROVIDER_CONFIG_DATA_KEY) {
            Some(config) => config.as_slice(),
            None => {
                warn!(
                    "Secret {} has no {} entry",
                    CLOUD_PROVIDER_CSI_DISK_CONFIG_NAME, CLOUD_PROVIDER_CONFIG_DATA_KEY
                );
                &[]
            }
        };

        let credentials = self.credentials(inputs.namespace).await?;
        shoot_chart_values(inputs, &credentials, &checksums, config, webhook_ca_bundle)
    }

    /// Values for the storage classes chart
    ///
    /// No secret is involved, the classes come from the cloud profile alone.
    #[allow(
        clippy::unused_self,
        reason = "kept next to the other chart value getters of the provider"
    )]
    #[must_use]
    pub fn get_storage_classes_chart_values(&self, inputs: &ControlPlaneInputs<'_>) -> Value {
        storage_classes_chart_values(inputs.cloud_profile)
    }
}
