//! # Secret Checksums
//!
//! Pod template annotations carrying secret checksums, so that pods roll when
//! a secret they mount changes.

use crate::constants::CHECKSUM_ANNOTATION_PREFIX;
use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Checksum annotations for every secret in `secret_names`
///
/// Each secret maps to `checksum/secret-<name>`.
///
/// # Errors
///
/// Returns [`Error::MissingChecksum`] for the first secret without a checksum.
pub fn checksum_annotations(
    secret_names: &[&str],
    checksums: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    secret_names
        .iter()
        .map(|name| {
            let checksum = checksums.get(*name).ok_or_else(|| Error::MissingChecksum {
                secret: (*name).to_string(),
            })?;
            Ok((
                format!("{CHECKSUM_ANNOTATION_PREFIX}{name}"),
                checksum.clone(),
            ))
        })
        .collect()
}

/// SHA-256 checksum of secret data
///
/// Hashes the JSON object of the data with keys in sorted order and values
/// base64 encoded, so the result only depends on content.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the data cannot be encoded.
pub fn compute_secret_checksum(data: &BTreeMap<String, Vec<u8>>) -> Result<String> {
    let encoded: BTreeMap<&str, String> = data
        .iter()
        .map(|(key, value)| (key.as_str(), STANDARD.encode(value)))
        .collect();
    let json = serde_json::to_vec(&encoded)?;

    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(format!("{:x}", hasher.finalize()))
}
