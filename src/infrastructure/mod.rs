//! # Infrastructure
//!
//! Provisioning side of the engine: Terraform variables going in, persisted
//! status coming out.
//!
//! - `floating_subnet.rs` - floating subnet for newly created routers
//! - `terraform.rs` - variable tree, output-key table and template files
//! - `status.rs` - status reconstruction from applied-state outputs

mod floating_subnet;
mod status;
mod terraform;

pub use floating_subnet::find_floating_subnet;
pub use status::{compute_status, reconstruct_status};
pub use terraform::{
    build_terraform_variables, render_terraform_files, CreateFlags, InfrastructureRequest,
    NetworkVariables, OpenstackVariables, OutputKeys, RouterVariables, TerraformFiles,
    TerraformVariables, MAIN_TEMPLATE_NAME,
};
