//! # Provider API Types
//!
//! Typed views of the provider-specific configuration and status objects.
//!
//! ## Module Structure
//!
//! - `infrastructure.rs` - InfrastructureConfig (networks, router, share network)
//! - `cloud_profile.rs` - CloudProfileConfig (floating pools, keystone, DNS, SNAT, storage classes)
//! - `control_plane.rs` - ControlPlaneConfig (load balancer classes, CCM, CSI)
//! - `status.rs` - InfrastructureStatus persisted after provisioning
//! - `helper.rs` - lookups over the cloud profile and status

mod cloud_profile;
mod control_plane;
pub mod helper;
mod infrastructure;
mod status;

pub use cloud_profile::{
    CloudProfileConfig, Constraints, FloatingPool, KeyStoneUrl, StorageClassDefinition,
};
pub use control_plane::{
    CloudControllerManagerConfig, ControlPlaneConfig, Csi, LoadBalancerClass, Manila,
};
pub use infrastructure::{InfrastructureConfig, Networks, Router, ShareNetwork};
pub use status::{
    FloatingPoolStatus, InfrastructureStatus, NetworkStatus, NodeStatus, RouterStatus,
    SecurityGroup, ShareNetworkStatus, Subnet,
};
