//! Common test utilities
//!
//! In-memory collaborators and fixtures shared by the integration tests.

#![allow(dead_code, reason = "not every test binary uses every fixture")]

use async_trait::async_trait;
use openstack_provisioning_values::apis::{
    CloudProfileConfig, Constraints, FloatingPool, InfrastructureConfig, Networks, ShareNetwork,
};
use openstack_provisioning_values::collaborators::{SecretRef, StateOutputReader};
use openstack_provisioning_values::Result;
use std::collections::{BTreeMap, HashMap};

/// State output store backed by a map
///
/// Only requested keys that exist are returned, like a real state store.
pub struct FakeStateOutputs {
    pub outputs: HashMap<String, String>,
}

impl FakeStateOutputs {
    pub fn new(outputs: HashMap<String, String>) -> Self {
        Self { outputs }
    }
}

#[async_trait]
impl StateOutputReader for FakeStateOutputs {
    async fn get_state_output_variables(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        Ok(keys
            .iter()
            .filter_map(|key| {
                self.outputs
                    .get(*key)
                    .map(|value| ((*key).to_string(), value.clone()))
            })
            .collect())
    }
}

/// Outputs an applied run would produce for `keys`
pub fn applied_outputs(keys: &[&str]) -> HashMap<String, String> {
    keys.iter()
        .map(|key| ((*key).to_string(), format!("{key}-value")))
        .collect()
}

pub fn cloud_profile() -> CloudProfileConfig {
    CloudProfileConfig {
        constraints: Constraints {
            floating_pools: vec![FloatingPool {
                name: "fip-*".to_string(),
                region: Some("europe".to_string()),
                default_floating_subnet: Some("fip-subnet".to_string()),
                ..Default::default()
            }],
        },
        dns_servers: vec!["1.1.1.1".to_string()],
        keystone_url: "someurl".to_string(),
        ..Default::default()
    }
}

pub fn infrastructure_config(share_network: bool) -> InfrastructureConfig {
    InfrastructureConfig {
        floating_pool_name: "fip-internet".to_string(),
        floating_pool_subnet_name: None,
        networks: Networks {
            workers: "10.250.0.0/19".to_string(),
            share_network: Some(ShareNetwork {
                enabled: share_network,
            }),
            ..Default::default()
        },
    }
}

pub fn secret(entries: &[(&str, &str)]) -> BTreeMap<String, Vec<u8>> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.as_bytes().to_vec()))
        .collect()
}

pub fn secret_ref(name: &str) -> SecretRef {
    SecretRef::new(name, "test")
}
