//! # Load Balancer Classes
//!
//! Resolves the load balancer classes handed to the cloud controller manager
//! and decides which class, if any, provides the top-level floating defaults.
//!
//! Default selection, first match wins:
//!
//! 1. the first class with purpose `default`,
//! 2. the first class named `default`,
//! 3. no default, the legacy floating network is used on its own.
//!
//! The same chain with `private` picks the class overriding the internal subnet.

use crate::apis::helper::find_floating_pool;
use crate::apis::{CloudProfileConfig, ControlPlaneConfig, InfrastructureStatus, LoadBalancerClass};
use crate::constants::{DEFAULT_LOAD_BALANCER_CLASS, PRIVATE_LOAD_BALANCER_CLASS};
use tracing::debug;

/// Floating settings applied at the top level of the cloud provider config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopLevelFloating {
    pub floating_network_id: String,
    pub floating_subnet_id: Option<String>,
    pub floating_subnet_name: Option<String>,
    pub floating_subnet_tags: Option<String>,
    /// Internal subnet replacing the worker subnet, when a class sets one
    pub subnet_id: Option<String>,
}

/// Outcome of class resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLoadBalancerClasses {
    /// Declared classes in declaration order, or one synthesized legacy class
    pub classes: Vec<LoadBalancerClass>,
    /// Whether `classes` was synthesized because nothing was declared
    pub synthesized: bool,
    pub default: Option<LoadBalancerClass>,
    pub top_level: TopLevelFloating,
}

impl ResolvedLoadBalancerClasses {
    /// Classes as they were declared, empty when synthesized
    #[must_use]
    pub fn declared(&self) -> &[LoadBalancerClass] {
        if self.synthesized {
            &[]
        } else {
            &self.classes
        }
    }
}

/// Find the class for `purpose`
///
/// An explicit purpose beats a class that merely carries the purpose as name.
#[must_use]
pub fn lookup_class<'a>(
    classes: &'a [LoadBalancerClass],
    purpose: &str,
) -> Option<&'a LoadBalancerClass> {
    classes
        .iter()
        .find(|class| class.purpose.as_deref() == Some(purpose))
        .or_else(|| classes.iter().find(|class| class.name == purpose))
}

/// Resolve declared classes against the legacy floating network
#[must_use]
pub fn resolve(
    classes: &[LoadBalancerClass],
    top_level_floating_network_id: &str,
) -> ResolvedLoadBalancerClasses {
    let mut top_level = TopLevelFloating {
        floating_network_id: top_level_floating_network_id.to_string(),
        ..Default::default()
    };

    if classes.is_empty() {
        debug!("No load balancer classes declared, using legacy floating network");
        return ResolvedLoadBalancerClasses {
            classes: vec![LoadBalancerClass {
                name: DEFAULT_LOAD_BALANCER_CLASS.to_string(),
                floating_network_id: Some(top_level_floating_network_id.to_string()),
                ..Default::default()
            }],
            synthesized: true,
            default: None,
            top_level,
        };
    }

    let default = lookup_class(classes, DEFAULT_LOAD_BALANCER_CLASS).cloned();
    if let Some(class) = &default {
        debug!("Load balancer class {} is the default", class.name);
        if let Some(id) = &class.floating_network_id {
            top_level.floating_network_id.clone_from(id);
        }
        top_level.floating_subnet_id.clone_from(&class.floating_subnet_id);
        top_level.floating_subnet_name.clone_from(&class.floating_subnet_name);
        top_level.floating_subnet_tags.clone_from(&class.floating_subnet_tags);
        top_level.subnet_id.clone_from(&class.subnet_id);
    }

    let private_subnet_id =
        lookup_class(classes, PRIVATE_LOAD_BALANCER_CLASS).and_then(|class| class.subnet_id.clone());
    if let Some(subnet_id) = private_subnet_id {
        debug!("Private load balancer class sets internal subnet {}", subnet_id);
        top_level.subnet_id = Some(subnet_id);
    }

    ResolvedLoadBalancerClasses {
        classes: classes.to_vec(),
        synthesized: false,
        default,
        top_level,
    }
}

/// Classes effective for a control plane
///
/// Classes in the control plane config win. Without any, the classes of the
/// cloud profile floating pool the infrastructure runs on are used, as offered
/// to the credentials' keystone `domain`.
#[must_use]
pub fn classes_for_control_plane(
    config: &ControlPlaneConfig,
    cloud_profile: &CloudProfileConfig,
    status: &InfrastructureStatus,
    region: &str,
    domain: Option<&str>,
) -> Vec<LoadBalancerClass> {
    if let Some(classes) = &config.load_balancer_classes {
        return classes.clone();
    }

    find_floating_pool(
        &cloud_profile.constraints.floating_pools,
        &status.networks.floating_pool.name,
        region,
        domain,
    )
    .map(|pool| {
        debug!(
            "Using {} load balancer classes of floating pool {}",
            pool.load_balancer_classes.len(),
            pool.name
        );
        pool.load_balancer_classes.clone()
    })
    .unwrap_or_default()
}
