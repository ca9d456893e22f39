//! # CloudProfileConfig
//!
//! Operator-wide constraints and defaults shared by every cluster of a cloud profile.

use super::LoadBalancerClass;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider section of a cloud profile
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudProfileConfig {
    /// Constraints on values clusters may choose
    #[serde(default)]
    pub constraints: Constraints,
    /// DNS servers for the worker subnet
    #[serde(default)]
    pub dns_servers: Vec<String>,
    /// DHCP domain passed to the cloud provider config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_domain: Option<String>,
    /// Global keystone URL, used for every region when set
    #[serde(default, rename = "keystoneURL")]
    pub keystone_url: String,
    /// Region-specific keystone URLs
    #[serde(default, rename = "keystoneURLs")]
    pub keystone_urls: Vec<KeyStoneUrl>,
    /// Global keystone CA bundle
    #[serde(default, rename = "keystoneCACert", skip_serializing_if = "Option::is_none")]
    pub keystone_ca_cert: Option<String>,
    /// Skip TLS verification against keystone
    #[serde(default)]
    pub keystone_force_insecure: bool,
    /// Request timeout for the cloud controller manager (e.g. `5m`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    /// Rescan block devices on volume resize
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescan_block_storage_on_resize: Option<bool>,
    /// Ignore availability zones when attaching volumes
    #[serde(default, rename = "ignoreVolumeAZ", skip_serializing_if = "Option::is_none")]
    pub ignore_volume_az: Option<bool>,
    /// Maximum number of volumes attached per node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_volume_attach_limit: Option<i32>,
    /// Use Octavia instead of neutron LBaaS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_octavia: Option<bool>,
    /// SNAT policy of created routers
    #[serde(default, rename = "useSNAT", skip_serializing_if = "Option::is_none")]
    pub use_snat: Option<bool>,
    /// Storage classes deployed into every cluster, defaults when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storage_classes: Vec<StorageClassDefinition>,
}

/// Constraints section of the cloud profile
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Floating pools offered to clusters
    #[serde(default)]
    pub floating_pools: Vec<FloatingPool>,
}

/// Floating pool offered by the cloud profile
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FloatingPool {
    /// Pool name, may contain `*` wildcards
    pub name: String,
    /// Region the entry applies to, all regions when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Keystone domain the pool is restricted to, all domains when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Subnet of the pool used for routers when the cluster does not pick one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_floating_subnet: Option<String>,
    /// Load balancer classes offered for clusters using this pool
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancer_classes: Vec<LoadBalancerClass>,
}

/// Region-specific keystone endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyStoneUrl {
    /// Region name
    pub region: String,
    /// Keystone URL for the region
    pub url: String,
    /// CA bundle for the region's keystone
    #[serde(default, rename = "caCert", skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
}

/// Storage class deployed into clusters of the cloud profile
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageClassDefinition {
    pub name: String,
    /// Mark the class as cluster default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Provisioner parameters, e.g. the Cinder volume `type`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    /// Provisioner, the Cinder CSI driver when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclaim_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_binding_mode: Option<String>,
}
