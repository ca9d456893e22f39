//! # ControlPlaneConfig
//!
//! Provider configuration of the control plane components.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Control plane configuration supplied by the cluster owner
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneConfig {
    /// Octavia/LBaaS provider used for services of type LoadBalancer
    #[serde(default)]
    pub load_balancer_provider: String,
    /// Named load balancer classes, replacing the cloud profile's classes when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_classes: Option<Vec<LoadBalancerClass>>,
    /// Cloud controller manager settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_controller_manager: Option<CloudControllerManagerConfig>,
    /// CSI driver settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csi: Option<Csi>,
}

/// Named load balancer class
///
/// A class with `purpose: default` (or, failing that, the class named `default`)
/// configures the global load balancer settings of the cloud provider config.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerClass {
    /// Class name
    pub name: String,
    /// Floating network for load balancer VIPs
    #[serde(default, rename = "floatingNetworkID", skip_serializing_if = "Option::is_none")]
    pub floating_network_id: Option<String>,
    /// Floating subnet for load balancer VIPs
    #[serde(default, rename = "floatingSubnetID", skip_serializing_if = "Option::is_none")]
    pub floating_subnet_id: Option<String>,
    /// Floating subnet selected by name (may contain wildcards)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_subnet_name: Option<String>,
    /// Floating subnet selected by tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_subnet_tags: Option<String>,
    /// Internal subnet for load balancer members
    #[serde(default, rename = "subnetID", skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    /// Purpose of the class (`default`, `private`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// Cloud controller manager settings
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudControllerManagerConfig {
    /// Feature gates passed to the cloud controller manager
    #[serde(default)]
    pub feature_gates: BTreeMap<String, bool>,
}

/// CSI driver settings
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Csi {
    /// Manila CSI driver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manila: Option<Manila>,
}

/// Manila CSI driver toggle
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Manila {
    /// Whether the Manila CSI driver is deployed
    #[serde(default)]
    pub enabled: bool,
}

impl ControlPlaneConfig {
    /// Whether the Manila CSI driver was requested
    #[must_use]
    pub fn manila_enabled(&self) -> bool {
        self.csi
            .as_ref()
            .and_then(|csi| csi.manila.as_ref())
            .is_some_and(|manila| manila.enabled)
    }

    /// Feature gates of the cloud controller manager, empty when unset
    #[must_use]
    pub fn ccm_feature_gates(&self) -> BTreeMap<String, bool> {
        self.cloud_controller_manager
            .as_ref()
            .map(|ccm| ccm.feature_gates.clone())
            .unwrap_or_default()
    }
}
