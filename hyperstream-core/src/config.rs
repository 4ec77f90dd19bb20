//! Configuration profiles and storage estimators.
//!
//! Profiles are compile-time (cargo features): the default desktop profile
//! targets workstation dimensions, `embedded-profile` shrinks the defaults
//! for constrained targets. The desktop default dimension can be overridden
//! at build time via the `HYPERSTREAM_DIM_BITS` environment variable.
//!
//! The estimators are pure arithmetic over dimension and capacity; the
//! config reporter and benchmarks consume them without constructing stores.

use crate::backend::{
    cpu_feature_mask, hamming_threshold, hamming_threshold_overridden, report, PolicyReport,
};

/// Active profile name.
pub const ACTIVE_PROFILE: &str = if cfg!(feature = "embedded-profile") {
    "embedded"
} else {
    "desktop"
};

const EMBEDDED_DIM_BITS: usize = 2048;
const EMBEDDED_CAPACITY: usize = 16;
const DESKTOP_DIM_BITS: usize = 10000;
const DESKTOP_CAPACITY: usize = 256;

/// Default hypervector dimension for the active profile.
///
/// The desktop profile honors a build-time `HYPERSTREAM_DIM_BITS` override
/// when it parses as a positive integer.
pub fn default_dim_bits() -> usize {
    if cfg!(feature = "embedded-profile") {
        return EMBEDDED_DIM_BITS;
    }
    match option_env!("HYPERSTREAM_DIM_BITS") {
        Some(raw) => match raw.parse::<usize>() {
            Ok(v) if v > 0 => v,
            _ => DESKTOP_DIM_BITS,
        },
        None => DESKTOP_DIM_BITS,
    }
}

/// Default associative-memory capacity for the active profile.
pub const fn default_capacity() -> usize {
    if cfg!(feature = "embedded-profile") {
        EMBEDDED_CAPACITY
    } else {
        DESKTOP_CAPACITY
    }
}

/// True when `x` is a nonzero power of two.
#[inline]
pub const fn is_power_of_two(x: usize) -> bool {
    x != 0 && x & (x - 1) == 0
}

/// Storage bytes of a binary hypervector of `dim_bits`.
#[inline]
pub const fn binary_hv_storage_bytes(dim_bits: usize) -> usize {
    ((dim_bits + 63) / 64) * 8
}

/// Storage bytes of a prototype memory's entries: capacity × (label + HV).
#[inline]
pub const fn prototype_storage_bytes(dim_bits: usize, capacity: usize) -> usize {
    capacity * (8 + binary_hv_storage_bytes(dim_bits))
}

/// Storage bytes of a cluster memory's counters and metadata.
#[inline]
pub const fn cluster_storage_bytes(dim_bits: usize, capacity: usize) -> usize {
    capacity * 8 + capacity * 4 + capacity * dim_bits * 4
}

/// Storage bytes of a cleanup memory's entries.
#[inline]
pub const fn cleanup_storage_bytes(dim_bits: usize, capacity: usize) -> usize {
    capacity * binary_hv_storage_bytes(dim_bits)
}

/// Snapshot of the active configuration for diagnostics.
#[derive(Clone, Debug)]
pub struct ConfigReport {
    pub profile: &'static str,
    pub default_dim_bits: usize,
    pub default_capacity: usize,
    pub feature_mask: u32,
    pub hamming_threshold: usize,
    pub hamming_threshold_overridden: bool,
    pub policy: PolicyReport,
}

impl std::fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "profile:            {}", self.profile)?;
        writeln!(f, "default dim (bits): {}", self.default_dim_bits)?;
        writeln!(f, "default capacity:   {}", self.default_capacity)?;
        writeln!(f, "cpu feature mask:   {:#06b}", self.feature_mask)?;
        writeln!(
            f,
            "hamming threshold:  {}{}",
            self.hamming_threshold,
            if self.hamming_threshold_overridden {
                " (env override)"
            } else {
                ""
            }
        )?;
        writeln!(f, "bind backend:       {}", self.policy.bind)?;
        write!(f, "hamming backend:    {}", self.policy.hamming)
    }
}

/// Build a configuration report for `dim_bits` (or the profile default).
pub fn config_report(dim_bits: Option<usize>) -> ConfigReport {
    let dim = dim_bits.unwrap_or_else(default_dim_bits);
    let mask = cpu_feature_mask();
    ConfigReport {
        profile: ACTIVE_PROFILE,
        default_dim_bits: default_dim_bits(),
        default_capacity: default_capacity(),
        feature_mask: mask,
        hamming_threshold: hamming_threshold(),
        hamming_threshold_overridden: hamming_threshold_overridden(),
        policy: report(dim, mask),
    }
}
