//! # Terraform Output Reader
//!
//! Reads applied-state outputs by running `terraform output -json` in the
//! directory holding the state.

use super::StateOutputReader;
use crate::constants::DEFAULT_TERRAFORM_BINARY;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// One entry of `terraform output -json`
///
/// Only the value is read, `type` and `sensitive` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputEntry {
    pub value: serde_json::Value,
}

/// Output reader running the Terraform CLI
#[derive(Debug, Clone)]
pub struct TerraformOutputReader {
    binary: String,
    working_dir: PathBuf,
}

impl TerraformOutputReader {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: DEFAULT_TERRAFORM_BINARY.to_string(),
            working_dir: working_dir.into(),
        }
    }

    /// Use a different Terraform (or OpenTofu) binary
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

#[async_trait]
impl StateOutputReader for TerraformOutputReader {
    async fn get_state_output_variables(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        debug!(
            "Running {} output -json in {}",
            self.binary,
            self.working_dir.display()
        );
        let output = Command::new(&self.binary)
            .current_dir(&self.working_dir)
            .args(["output", "-json"])
            .output()
            .await
            .map_err(|e| Error::collaborator("terraform", e))?;

        if !output.status.success() {
            return Err(Error::collaborator(
                "terraform",
                format!(
                    "terraform output exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let entries: BTreeMap<String, OutputEntry> = serde_json::from_slice(&output.stdout)?;
        Ok(flatten_outputs(&entries, keys))
    }
}

/// Reduce `terraform output -json` entries to string values for `keys`
///
/// Strings are taken verbatim, other scalars are formatted, and lists or maps
/// are kept as compact JSON. Keys without an output are skipped.
#[must_use]
pub fn flatten_outputs(
    entries: &BTreeMap<String, OutputEntry>,
    keys: &[&str],
) -> HashMap<String, String> {
    keys.iter()
        .filter_map(|key| {
            let entry = entries.get(*key)?;
            let value = match &entry.value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some(((*key).to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_outputs() {
        let json = r#"{
            "router_id": {"sensitive": false, "type": "string", "value": "r-1"},
            "retries": {"sensitive": false, "type": "number", "value": 10},
            "zones": {"sensitive": false, "type": ["list", "string"], "value": ["a", "b"]},
            "empty": {"sensitive": false, "type": "string", "value": null},
            "unrequested": {"sensitive": true, "type": "string", "value": "x"}
        }"#;
        let entries: BTreeMap<String, OutputEntry> =
            serde_json::from_str(json).expect("valid output");

        let flat = flatten_outputs(&entries, &["router_id", "retries", "zones", "empty", "absent"]);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat["router_id"], "r-1");
        assert_eq!(flat["retries"], "10");
        assert_eq!(flat["zones"], r#"["a","b"]"#);
        assert!(!flat.contains_key("unrequested"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_collaborator_error() {
        let reader = TerraformOutputReader::new(std::env::temp_dir())
            .with_binary("definitely-not-a-terraform-binary");
        let result = reader.get_state_output_variables(&["router_id"]).await;
        assert!(matches!(result, Err(Error::Collaborator { .. })));
    }
}
