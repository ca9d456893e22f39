//! # Control Plane
//!
//! Chart values for the OpenStack control plane components: cloud controller
//! manager, Cinder CSI with its storage classes and the optional Manila CSI
//! driver.
//!
//! - `load_balancer.rs` - load balancer class resolution
//! - `cluster.rs` - cluster facts and version gates
//! - `checksums.rs` - secret checksums and pod annotations
//! - `values.rs` - value tree composition
//! - `provider.rs` - composition backed by a secret store

mod checksums;
mod cluster;
mod load_balancer;
mod provider;
mod values;

pub use checksums::{checksum_annotations, compute_secret_checksum};
pub use cluster::{AdmissionPlugin, ClusterConstraints};
pub use load_balancer::{
    classes_for_control_plane, lookup_class, resolve, ResolvedLoadBalancerClasses,
    TopLevelFloating,
};
pub use provider::ValuesProvider;
pub use values::{
    config_chart_values, control_plane_chart_values, shoot_chart_values,
    storage_classes_chart_values, ControlPlaneInputs,
};
