//! Runtime CPU capability detection.
//!
//! Exposes a compact feature mask over the SIMD sets the backends care
//! about. Detection is cached for the process lifetime (`OnceLock`); CPU
//! features do not change at runtime. The `force-scalar` feature makes the
//! mask empty so every policy decision resolves to the scalar kernels.

use std::sync::OnceLock;

/// SIMD feature flags, one bit each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum CpuFeature {
    Sse2 = 0x1,
    Avx2 = 0x2,
    Neon = 0x4,
}

impl CpuFeature {
    /// Mask bit for this feature.
    #[inline]
    pub const fn bit(self) -> u32 {
        self as u32
    }
}

/// True if `mask` carries `feature`.
#[inline]
pub fn has_feature(mask: u32, feature: CpuFeature) -> bool {
    mask & feature.bit() != 0
}

static FEATURE_MASK: OnceLock<u32> = OnceLock::new();

/// Probe the host CPU and return the feature mask (cached after the first
/// call).
///
/// On x86_64 the `is_x86_feature_detected!` macro performs the full CPUID +
/// OSXSAVE + XCR0 dance for AVX2; SSE2 is baseline. On AArch64 Advanced SIMD
/// is mandatory, so NEON is always reported. Other targets report 0.
pub fn cpu_feature_mask() -> u32 {
    if cfg!(feature = "force-scalar") {
        return 0;
    }
    *FEATURE_MASK.get_or_init(detect)
}

fn detect() -> u32 {
    #[cfg(target_arch = "x86_64")]
    {
        let mut mask = 0u32;
        if is_x86_feature_detected!("sse2") {
            mask |= CpuFeature::Sse2.bit();
        }
        if is_x86_feature_detected!("avx2") {
            mask |= CpuFeature::Avx2.bit();
        }
        mask
    }
    #[cfg(target_arch = "aarch64")]
    {
        CpuFeature::Neon.bit()
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        0
    }
}
