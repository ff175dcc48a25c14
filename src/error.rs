//! Error type for the few operations that can report a condition back to the caller.
//!
//! Most of the clustering pipeline never fails: invalid locations, empty inputs and a
//! pinned id that scrolled out of view all fall back to empty results. Only zoom-to-fit
//! and configuration validation surface a [`ClusterError`].

use thiserror::Error;

/// Conditions reported by the clustering engine.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "ffi", derive(uniffi::Error))]
#[cfg_attr(feature = "ffi", uniffi(flat_error))]
pub enum ClusterError {
    /// A zoom-to-fit was requested for a cluster with no valid-location members.
    /// The caller should leave the viewport unchanged.
    #[error("cannot compute a region for a cluster with no located members")]
    EmptyRegion,

    /// A [`ClusterConfig`](crate::ClusterConfig) value is out of range.
    #[error("invalid cluster config: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;
