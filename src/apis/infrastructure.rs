//! # InfrastructureConfig
//!
//! Declared networking intent for a cluster's infrastructure.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Infrastructure configuration supplied by the cluster owner
///
/// # Example
///
/// ```yaml
/// floatingPoolName: fip-pool
/// floatingPoolSubnetName: fip-subnet-a
/// networks:
///   workers: 10.250.0.0/19
///   router:
///     id: 4d2b...
///   shareNetwork:
///     enabled: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureConfig {
    /// Name (or pattern) of the floating pool used for the router's external gateway
    pub floating_pool_name: String,
    /// Explicit floating subnet of the pool, overrides the cloud profile default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_pool_subnet_name: Option<String>,
    /// Network layout
    pub networks: Networks,
}

/// Network layout of the cluster
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Networks {
    /// Existing router to reuse instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<Router>,
    /// Deprecated single worker CIDR, superseded by `workers`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,
    /// CIDR of the worker subnet
    #[serde(default)]
    pub workers: String,
    /// Existing private network to reuse instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Optional share network for Manila file shares
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_network: Option<ShareNetwork>,
}

/// Reference to an existing router
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Router {
    /// Router ID
    pub id: String,
}

/// Share network toggle
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareNetwork {
    /// Whether a share network is created
    #[serde(default)]
    pub enabled: bool,
}

impl InfrastructureConfig {
    /// Worker CIDR, falling back to the deprecated `worker` field
    #[must_use]
    pub fn workers_cidr(&self) -> &str {
        if self.networks.workers.is_empty() {
            self.networks.worker.as_deref().unwrap_or_default()
        } else {
            &self.networks.workers
        }
    }

    /// Whether a share network is both configured and enabled
    #[must_use]
    pub fn share_network_enabled(&self) -> bool {
        self.networks
            .share_network
            .as_ref()
            .is_some_and(|share_network| share_network.enabled)
    }
}
