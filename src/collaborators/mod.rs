//! # Collaborators
//!
//! Seams to the systems the engine reads from but does not own.
//!
//! - `SecretReader` - secret store (`kube_secrets.rs` talks to the Kubernetes API,
//!   `manifest_secrets.rs` serves parsed manifests)
//! - `StateOutputReader` - applied-state outputs of the provisioning run
//!   (`terraform_outputs.rs` shells out to `terraform output -json`)
//! - `TemplateRenderer` - renders Terraform templates from variables
//!
//! Engine functions receive these as explicit arguments. Nothing here is
//! retried; retry policy belongs to the caller.

mod kube_secrets;
mod manifest_secrets;
mod terraform_outputs;

pub use kube_secrets::KubeSecretReader;
pub use manifest_secrets::ManifestSecretReader;
pub use terraform_outputs::{flatten_outputs, OutputEntry, TerraformOutputReader};

use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

/// Reference to a secret in the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub name: String,
    pub namespace: String,
}

impl SecretRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// Secret store
#[async_trait]
pub trait SecretReader: Send + Sync {
    /// Raw data of the referenced secret
    async fn get_secret(&self, secret_ref: &SecretRef) -> Result<BTreeMap<String, Vec<u8>>>;
}

/// Applied-state outputs of the provisioning run
#[async_trait]
pub trait StateOutputReader: Send + Sync {
    /// Values of the requested outputs
    ///
    /// Outputs that do not exist are left out of the map. Deciding whether an
    /// absent output is fatal is the caller's job.
    async fn get_state_output_variables(&self, keys: &[&str]) -> Result<HashMap<String, String>>;
}

/// Template renderer
pub trait TemplateRenderer {
    /// Render the named template with the given values
    fn render(&self, template: &str, values: &serde_json::Value) -> Result<String>;
}
