//! # OpenStack Provisioning Values
//!
//! Resolves provisioning parameters and deployment values for OpenStack-backed
//! Kubernetes clusters from layered configuration, and reconstructs the
//! infrastructure status from the outputs of a Terraform run.
//!
//! ## Modules
//!
//! - `apis` - provider config and status types
//! - `credentials` - OpenStack credentials from the cloud provider secret
//! - `infrastructure` - Terraform variables and status reconstruction
//! - `controlplane` - load balancer classes and chart values
//! - `collaborators` - secret store, Terraform state and template renderer seams
//!
//! Resolution functions are pure and synchronous. Only the collaborators are
//! async.

pub mod apis;
pub mod collaborators;
pub mod config;
pub mod constants;
pub mod controlplane;
pub mod credentials;
pub mod error;
pub mod infrastructure;
pub mod prelude;

pub use error::{Error, Result};
