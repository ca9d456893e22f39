//! # Errors
//!
//! Error taxonomy for value resolution and status reconstruction.
//!
//! None of these errors is retried inside the engine. Every operation either
//! returns a complete result or an error, never a partially populated tree.

use thiserror::Error;

/// Result alias used across the engine
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while resolving provisioning values
#[derive(Debug, Error)]
pub enum Error {
    /// The secret carries neither username/password nor an application credential
    #[error("missing credentials: secret contains neither {missing}")]
    MissingCredential {
        /// Human-readable description of the absent auth modes
        missing: String,
    },

    /// Required cloud profile data is absent for the target region
    #[error("could not resolve cloud profile constraints for region {region:?}: {message}")]
    ConstraintResolution {
        /// Region that was looked up
        region: String,
        /// What could not be resolved
        message: String,
    },

    /// The provisioning run did not produce outputs required by the enabled features
    #[error("terraform outputs missing: {}", keys.join(", "))]
    MissingOutput {
        /// Output keys that were expected but absent
        keys: Vec<String>,
    },

    /// A secret the charts depend on has no checksum
    #[error("missing checksum for secret {secret:?}")]
    MissingChecksum {
        /// Name of the depended-on secret
        secret: String,
    },

    /// Failed to serialize a value tree
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An external collaborator (secret store, terraform, renderer) failed
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        /// Which collaborator failed
        collaborator: &'static str,
        /// Underlying failure
        message: String,
    },
}

impl Error {
    /// Create a constraint resolution error for a region
    pub fn constraint(region: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConstraintResolution {
            region: region.into(),
            message: message.into(),
        }
    }

    /// Wrap a collaborator failure
    pub fn collaborator(collaborator: &'static str, err: impl std::fmt::Display) -> Self {
        Error::Collaborator {
            collaborator,
            message: err.to_string(),
        }
    }
}
