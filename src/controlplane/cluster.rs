//! # Cluster Constraints
//!
//! Facts about the target cluster that shape chart values. Version dependent
//! decisions arrive here as booleans; nothing in this crate compares
//! Kubernetes versions.

use crate::constants::POD_SECURITY_POLICY_PLUGIN;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConstraints {
    /// Technical ID of the cluster, also the name of its worker network
    pub technical_id: String,
    pub kubernetes_version: String,
    #[serde(default)]
    pub pod_cidr: String,
    /// Worker CIDR from the infrastructure config, the Manila share client range
    #[serde(default)]
    pub workers_cidr: String,
    /// Availability zones of all worker pools
    #[serde(default)]
    pub zones: Vec<String>,
    #[serde(default)]
    pub admission_plugins: Vec<AdmissionPlugin>,
    #[serde(default)]
    pub vpa_enabled: bool,
    /// Whether the pod network uses an overlay. Without one, the CCM programs routes.
    #[serde(default = "default_true")]
    pub overlay_enabled: bool,
    #[serde(default)]
    pub generic_token_kubeconfig_secret_name: String,
    /// Version gate for the CSI snapshot validation webhook
    #[serde(default = "default_true")]
    pub csi_snapshot_validation_enabled: bool,
    /// Control plane is scaled down (hibernation)
    #[serde(default)]
    pub scaled_down: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionPlugin {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

fn default_true() -> bool {
    true
}

impl Default for ClusterConstraints {
    fn default() -> Self {
        Self {
            technical_id: String::new(),
            kubernetes_version: String::new(),
            pod_cidr: String::new(),
            workers_cidr: String::new(),
            zones: Vec::new(),
            admission_plugins: Vec::new(),
            vpa_enabled: false,
            overlay_enabled: true,
            generic_token_kubeconfig_secret_name: String::new(),
            csi_snapshot_validation_enabled: true,
            scaled_down: false,
        }
    }
}

impl ClusterConstraints {
    /// PSP resources are skipped only if the plugin is listed and explicitly disabled
    #[must_use]
    pub fn psp_disabled(&self) -> bool {
        self.admission_plugins
            .iter()
            .any(|plugin| plugin.name == POD_SECURITY_POLICY_PLUGIN && plugin.disabled == Some(true))
    }

    /// Replicas for control plane deployments
    #[must_use]
    pub fn control_plane_replicas(&self) -> u32 {
        if self.scaled_down {
            0
        } else {
            1
        }
    }

    /// Zones of all worker pools, sorted and deduplicated
    #[must_use]
    pub fn sorted_zones(&self) -> Vec<String> {
        let mut zones = self.zones.clone();
        zones.sort();
        zones.dedup();
        zones
    }
}
