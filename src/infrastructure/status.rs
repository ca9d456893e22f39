//! # Status Reconstruction
//!
//! Rebuilds the persisted infrastructure status from the outputs of an applied
//! Terraform run. The output-key table in [`OutputKeys`] is the schema: every
//! key it lists must be present, otherwise no status is produced at all.

use super::terraform::OutputKeys;
use crate::apis::{
    FloatingPoolStatus, InfrastructureConfig, InfrastructureStatus, NetworkStatus, NodeStatus,
    RouterStatus, SecurityGroup, ShareNetworkStatus, Subnet,
};
use crate::collaborators::StateOutputReader;
use crate::constants::PURPOSE_NODES;
use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Reconstruct the status from output values
///
/// `share_network_requested` must match what the variables were built with.
/// Share network outputs present without being requested are ignored.
///
/// # Errors
///
/// Returns [`Error::MissingOutput`] listing every required output that is absent.
pub fn reconstruct_status(
    outputs: &HashMap<String, String>,
    share_network_requested: bool,
) -> Result<InfrastructureStatus> {
    let keys = OutputKeys::new(share_network_requested);

    let missing: Vec<String> = keys
        .required_keys()
        .into_iter()
        .filter(|key| !outputs.contains_key(*key))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        warn!("Terraform state is missing outputs: {}", missing.join(", "));
        return Err(Error::MissingOutput { keys: missing });
    }

    let get = |key: &str| outputs.get(key).cloned().unwrap_or_default();

    let share_network = keys
        .share_network_id
        .zip(keys.share_network_name)
        .map(|(id, name)| ShareNetworkStatus {
            id: get(id),
            name: get(name),
        });

    Ok(InfrastructureStatus {
        networks: NetworkStatus {
            id: get(keys.network_id),
            name: get(keys.network_name),
            floating_pool: FloatingPoolStatus {
                id: get(keys.floating_network_id),
                name: String::new(),
            },
            router: RouterStatus {
                id: get(keys.router_id),
                ip: get(keys.router_ip),
            },
            subnets: vec![Subnet {
                purpose: PURPOSE_NODES.to_string(),
                id: get(keys.subnet_id),
            }],
            share_network,
        },
        security_groups: vec![SecurityGroup {
            purpose: PURPOSE_NODES.to_string(),
            id: get(keys.security_group_id),
            name: get(keys.security_group_name),
        }],
        node: NodeStatus {
            key_name: get(keys.key_name),
        },
        ..Default::default()
    })
}

/// Read the applied state and compute the status for `config`
///
/// # Errors
///
/// Propagates reader failures and [`Error::MissingOutput`].
pub async fn compute_status(
    reader: &impl StateOutputReader,
    config: &InfrastructureConfig,
) -> Result<InfrastructureStatus> {
    let share_network = config.share_network_enabled();
    let keys = OutputKeys::new(share_network).required_keys();
    debug!("Reading {} terraform outputs", keys.len());

    let outputs = reader.get_state_output_variables(&keys).await?;
    let mut status = reconstruct_status(&outputs, share_network)?;
    status.networks.floating_pool.name = config.floating_pool_name.clone();
    Ok(status)
}
