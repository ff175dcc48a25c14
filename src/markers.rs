//! Helpers for the host's marker layer.
//!
//! The host keeps the previous set of markers on screen. After each recompute it only
//! needs to remove markers that disappeared and add the new ones, in batches so a large
//! render never blocks the UI thread for long.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::ClusterDescriptor;

/// Split descriptors into batches of at most `batch_size` for incremental insertion.
/// A `batch_size` of zero is treated as one.
///
/// # Example
/// ```
/// use marker_cluster::{ClusterDescriptor, GpsPoint, marker_batches};
///
/// let markers: Vec<ClusterDescriptor> = (0..250)
///     .map(|i| ClusterDescriptor::group(GpsPoint::new(0.0, 0.0), vec![i.to_string(), format!("{i}b")]))
///     .collect();
///
/// let sizes: Vec<usize> = marker_batches(&markers, 100).map(|b| b.len()).collect();
/// assert_eq!(sizes, vec![100, 100, 50]);
/// ```
pub fn marker_batches(
    descriptors: &[ClusterDescriptor],
    batch_size: usize,
) -> impl Iterator<Item = &[ClusterDescriptor]> {
    descriptors.chunks(batch_size.max(1))
}

/// Changes between two marker sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MarkerDiff {
    /// Markers to add, in the order of the new set
    pub added: Vec<ClusterDescriptor>,
    /// Markers to remove, in the order of the previous set
    pub removed: Vec<ClusterDescriptor>,
    /// Markers that can stay on screen untouched
    pub retained: u32,
}

impl MarkerDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Diff two marker sets.
///
/// Markers are paired by [`ClusterDescriptor::marker_key`]. A pair is retained only when
/// the descriptors are equal; if the members kept their key but moved or changed their
/// attributes, the old marker is removed and the new one added.
pub fn diff_markers(previous: &[ClusterDescriptor], next: &[ClusterDescriptor]) -> MarkerDiff {
    let previous_by_key: HashMap<String, &ClusterDescriptor> =
        previous.iter().map(|d| (d.marker_key(), d)).collect();
    let next_by_key: HashMap<String, &ClusterDescriptor> =
        next.iter().map(|d| (d.marker_key(), d)).collect();

    let added: Vec<ClusterDescriptor> = next
        .iter()
        .filter(|d| !is_unchanged(d, &previous_by_key))
        .cloned()
        .collect();
    let removed: Vec<ClusterDescriptor> = previous
        .iter()
        .filter(|d| !is_unchanged(d, &next_by_key))
        .cloned()
        .collect();

    MarkerDiff {
        retained: saturating_u32(next.len() - added.len()),
        added,
        removed,
    }
}

fn is_unchanged(descriptor: &ClusterDescriptor, other: &HashMap<String, &ClusterDescriptor>) -> bool {
    other
        .get(&descriptor.marker_key())
        .is_some_and(|o| *o == descriptor)
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
