//! # Prelude
//!
//! Common re-exports for users of the engine.

pub use crate::apis::{
    CloudProfileConfig, ControlPlaneConfig, InfrastructureConfig, InfrastructureStatus,
    LoadBalancerClass,
};
pub use crate::collaborators::{SecretReader, SecretRef, StateOutputReader, TemplateRenderer};
pub use crate::config::EngineConfig;
pub use crate::controlplane::{
    ClusterConstraints, ControlPlaneInputs, ResolvedLoadBalancerClasses, ValuesProvider,
};
pub use crate::credentials::Credentials;
pub use crate::error::{Error, Result};
pub use crate::infrastructure::{
    build_terraform_variables, compute_status, reconstruct_status, InfrastructureRequest,
    TerraformVariables,
};
