//! # InfrastructureStatus
//!
//! Status persisted after every successful provisioning run.
//!
//! Downstream components (worker provisioning, CSI configuration) read this
//! object, so field names are a stable contract. The status is always
//! replaced as a whole.

use crate::constants::{INFRASTRUCTURE_STATUS_KIND, PROVIDER_API_VERSION};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Infrastructure status reconstructed from Terraform outputs
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureStatus {
    /// API version of the status object
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Kind of the status object
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Network resources
    pub networks: NetworkStatus,
    /// Security groups
    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
    /// Node settings
    #[serde(default)]
    pub node: NodeStatus,
}

impl Default for InfrastructureStatus {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            networks: NetworkStatus::default(),
            security_groups: Vec::new(),
            node: NodeStatus::default(),
        }
    }
}

fn default_api_version() -> String {
    PROVIDER_API_VERSION.to_string()
}

fn default_kind() -> String {
    INFRASTRUCTURE_STATUS_KIND.to_string()
}

/// Network resources of the cluster
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    /// Private network ID
    #[serde(default)]
    pub id: String,
    /// Private network name
    #[serde(default)]
    pub name: String,
    /// Floating pool
    #[serde(default)]
    pub floating_pool: FloatingPoolStatus,
    /// Router
    #[serde(default)]
    pub router: RouterStatus,
    /// Subnets by purpose
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    /// Share network, only present when share networks are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_network: Option<ShareNetworkStatus>,
}

/// Floating pool in use
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FloatingPoolStatus {
    /// Floating network ID
    #[serde(default)]
    pub id: String,
    /// Floating pool name as configured
    #[serde(default)]
    pub name: String,
}

/// Router in use
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouterStatus {
    /// Router ID
    #[serde(default)]
    pub id: String,
    /// External IP of the router
    #[serde(default)]
    pub ip: String,
}

/// Subnet with purpose marker
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    /// Purpose of the subnet
    pub purpose: String,
    /// Subnet ID
    pub id: String,
}

/// Security group with purpose marker
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    /// Purpose of the security group
    pub purpose: String,
    /// Security group ID
    pub id: String,
    /// Security group name
    pub name: String,
}

/// Share network in use
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareNetworkStatus {
    /// Share network ID
    pub id: String,
    /// Share network name
    pub name: String,
}

/// Node settings
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    /// SSH key pair name
    #[serde(default)]
    pub key_name: String,
}
