//! # Floating Subnet Resolution
//!
//! Picks the floating subnet a newly created router attaches its external
//! gateway to.

use crate::apis::helper::find_floating_pool;
use crate::apis::CloudProfileConfig;
use tracing::debug;

/// Resolve the floating subnet for router creation
///
/// Only routers created by the provisioning run need a floating subnet, so
/// `router_required == false` always yields `None`. Otherwise, first match wins:
///
/// 1. the subnet name from the infrastructure config,
/// 2. the default floating subnet of the cloud profile pool matching the
///    region and keystone domain,
/// 3. `None`, letting the provisioning tool pick any subnet of the pool.
#[must_use]
pub fn find_floating_subnet(
    router_required: bool,
    explicit_subnet_name: Option<&str>,
    cloud_profile: &CloudProfileConfig,
    floating_pool_name: &str,
    region: &str,
    domain: Option<&str>,
) -> Option<String> {
    if !router_required {
        return None;
    }

    if let Some(subnet) = explicit_subnet_name {
        debug!("Using floating subnet {} from infrastructure config", subnet);
        return Some(subnet.to_string());
    }

    let subnet = find_floating_pool(
        &cloud_profile.constraints.floating_pools,
        floating_pool_name,
        region,
        domain,
    )
    .and_then(|pool| pool.default_floating_subnet.clone());

    match &subnet {
        Some(subnet) => debug!(
            "Using default floating subnet {} of pool {} in region {}",
            subnet, floating_pool_name, region
        ),
        None => debug!(
            "No floating subnet constraint for pool {} in region {}",
            floating_pool_name, region
        ),
    }

    subnet
}
