//! C ABI for HyperStream associative memories.
//!
//! Pure C surface: opaque handles, status codes, fixed-width buffers. No
//! Rust types cross the boundary and no panics escape; every entry point
//! validates its pointers and buffer lengths before touching a store.
//!
//! Word buffers are packed little-endian bit arrays of `ceil(dim / 64)`
//! u64 words, the same layout the core container uses internally. Handles
//! are not thread-safe (matching the core contract); callers synchronize
//! externally.

use std::ffi::CStr;
use std::fs::File;
use std::os::raw::c_char;

use hyperstream::io::{
    load_cluster, load_prototype, save_cluster, save_cluster_v1, save_prototype,
    save_prototype_v1, SerError,
};
use hyperstream::memory::{ClusterMemory, MemoryError, PrototypeMemory};
use hyperstream_core::{word_count_for, BinaryHv};

/// Status codes returned by every C API function.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HsStatus {
    Ok = 0,
    InvalidArg = 1,
    OutOfRange = 2,
    CapacityFull = 3,
    IoError = 4,
    Corrupt = 5,
    UnsupportedConfig = 6,
    Internal = 255,
}

/// Serialization version selector for the save entry points.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HsSerVersion {
    V1 = 0,
    V11Default = 1,
}

/// Opaque prototype-memory handle.
pub struct HsPrototypeMem {
    inner: PrototypeMemory,
}

/// Opaque cluster-memory handle.
pub struct HsClusterMem {
    inner: ClusterMemory,
}

fn status_from_memory_error(err: &MemoryError) -> HsStatus {
    match err {
        MemoryError::CapacityExhausted { .. } => HsStatus::CapacityFull,
        MemoryError::DimMismatch { .. } | MemoryError::LengthMismatch { .. } => {
            HsStatus::InvalidArg
        }
        MemoryError::NotEmpty { .. } => HsStatus::InvalidArg,
    }
}

fn status_from_ser_error(err: &SerError) -> HsStatus {
    match err {
        SerError::Io(_) => HsStatus::IoError,
        SerError::BadMagic { .. }
        | SerError::KindMismatch { .. }
        | SerError::SizeExceedsCapacity { .. }
        | SerError::CrcMismatch { .. } => HsStatus::Corrupt,
        SerError::DimMismatch { .. } | SerError::CapacityMismatch { .. } => {
            HsStatus::UnsupportedConfig
        }
        SerError::DestinationNotEmpty { .. } => HsStatus::InvalidArg,
        SerError::Memory(e) => status_from_memory_error(e),
    }
}

/// Rebuild a `BinaryHv` from a caller word buffer; `None` on length
/// mismatch.
fn hv_from_words(dim: usize, words: *const u64, word_count: usize) -> Option<BinaryHv> {
    if words.is_null() || word_count != word_count_for(dim) {
        return None;
    }
    let slice = unsafe { std::slice::from_raw_parts(words, word_count) };
    let mut hv = BinaryHv::new(dim);
    hv.words_mut().copy_from_slice(slice);
    hv.apply_tail_mask();
    Some(hv)
}

unsafe fn path_from_cstr<'a>(path: *const c_char) -> Option<&'a str> {
    if path.is_null() {
        return None;
    }
    CStr::from_ptr(path).to_str().ok()
}

// ---------------------------------------------------------------------------
// PrototypeMemory
// ---------------------------------------------------------------------------

/// Create a prototype memory. `dim_bits` must be nonzero.
///
/// # Safety
/// `out` must be a valid pointer to a handle slot.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_create(
    dim_bits: u32,
    capacity: u32,
    out: *mut *mut HsPrototypeMem,
) -> HsStatus {
    if out.is_null() || dim_bits == 0 {
        return HsStatus::InvalidArg;
    }
    let handle = Box::new(HsPrototypeMem {
        inner: PrototypeMemory::new(dim_bits as usize, capacity as usize),
    });
    *out = Box::into_raw(handle);
    HsStatus::Ok
}

/// Destroy a prototype memory handle. Null is a no-op.
///
/// # Safety
/// `m` must have come from `hs_proto_create` and not been destroyed.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_destroy(m: *mut HsPrototypeMem) {
    if !m.is_null() {
        drop(Box::from_raw(m));
    }
}

/// Dimension in bits; 0 for a null handle.
///
/// # Safety
/// `m` must be a live handle or null.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_dim(m: *const HsPrototypeMem) -> u32 {
    m.as_ref().map_or(0, |h| h.inner.dim() as u32)
}

/// Capacity; 0 for a null handle.
///
/// # Safety
/// `m` must be a live handle or null.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_capacity(m: *const HsPrototypeMem) -> u32 {
    m.as_ref().map_or(0, |h| h.inner.capacity() as u32)
}

/// Current entry count; 0 for a null handle.
///
/// # Safety
/// `m` must be a live handle or null.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_size(m: *const HsPrototypeMem) -> u32 {
    m.as_ref().map_or(0, |h| h.inner.len() as u32)
}

/// Learn a labelled hypervector from a packed word buffer.
///
/// # Safety
/// `m` must be a live handle; `words` must point to `word_count` u64s.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_learn(
    m: *mut HsPrototypeMem,
    label: u64,
    words: *const u64,
    word_count: usize,
) -> HsStatus {
    let Some(handle) = m.as_mut() else {
        return HsStatus::InvalidArg;
    };
    let Some(hv) = hv_from_words(handle.inner.dim(), words, word_count) else {
        return HsStatus::InvalidArg;
    };
    match handle.inner.learn(label, &hv) {
        Ok(()) => HsStatus::Ok,
        Err(e) => status_from_memory_error(&e),
    }
}

/// Classify a query buffer; writes the winning label (or 0 when empty).
///
/// # Safety
/// `m` must be a live handle; `words` must point to `word_count` u64s;
/// `out_label` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_classify(
    m: *const HsPrototypeMem,
    words: *const u64,
    word_count: usize,
    out_label: *mut u64,
) -> HsStatus {
    let Some(handle) = m.as_ref() else {
        return HsStatus::InvalidArg;
    };
    if out_label.is_null() {
        return HsStatus::InvalidArg;
    }
    let Some(hv) = hv_from_words(handle.inner.dim(), words, word_count) else {
        return HsStatus::InvalidArg;
    };
    *out_label = handle.inner.classify(&hv, 0);
    HsStatus::Ok
}

/// Save a prototype memory to `path` in the requested format version.
///
/// # Safety
/// `m` must be a live handle; `path` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_save(
    m: *const HsPrototypeMem,
    path: *const c_char,
    ver: HsSerVersion,
) -> HsStatus {
    let Some(handle) = m.as_ref() else {
        return HsStatus::InvalidArg;
    };
    let Some(path) = path_from_cstr(path) else {
        return HsStatus::InvalidArg;
    };
    let Ok(mut file) = File::create(path) else {
        return HsStatus::IoError;
    };
    let result = match ver {
        HsSerVersion::V1 => save_prototype_v1(&mut file, &handle.inner),
        HsSerVersion::V11Default => save_prototype(&mut file, &handle.inner),
    };
    match result {
        Ok(()) => HsStatus::Ok,
        Err(e) => status_from_ser_error(&e),
    }
}

/// Load a prototype memory from `path` into an empty handle.
///
/// # Safety
/// `m` must be a live handle; `path` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hs_proto_load(m: *mut HsPrototypeMem, path: *const c_char) -> HsStatus {
    let Some(handle) = m.as_mut() else {
        return HsStatus::InvalidArg;
    };
    let Some(path) = path_from_cstr(path) else {
        return HsStatus::InvalidArg;
    };
    let Ok(mut file) = File::open(path) else {
        return HsStatus::IoError;
    };
    match load_prototype(&mut file, &mut handle.inner) {
        Ok(()) => HsStatus::Ok,
        Err(e) => status_from_ser_error(&e),
    }
}

// ---------------------------------------------------------------------------
// ClusterMemory
// ---------------------------------------------------------------------------

/// Create a cluster memory. `dim_bits` must be nonzero.
///
/// # Safety
/// `out` must be a valid pointer to a handle slot.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_create(
    dim_bits: u32,
    capacity: u32,
    out: *mut *mut HsClusterMem,
) -> HsStatus {
    if out.is_null() || dim_bits == 0 {
        return HsStatus::InvalidArg;
    }
    let handle = Box::new(HsClusterMem {
        inner: ClusterMemory::new(dim_bits as usize, capacity as usize),
    });
    *out = Box::into_raw(handle);
    HsStatus::Ok
}

/// Destroy a cluster memory handle. Null is a no-op.
///
/// # Safety
/// `m` must have come from `hs_cluster_create` and not been destroyed.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_destroy(m: *mut HsClusterMem) {
    if !m.is_null() {
        drop(Box::from_raw(m));
    }
}

/// Dimension in bits; 0 for a null handle.
///
/// # Safety
/// `m` must be a live handle or null.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_dim(m: *const HsClusterMem) -> u32 {
    m.as_ref().map_or(0, |h| h.inner.dim() as u32)
}

/// Capacity; 0 for a null handle.
///
/// # Safety
/// `m` must be a live handle or null.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_capacity(m: *const HsClusterMem) -> u32 {
    m.as_ref().map_or(0, |h| h.inner.capacity() as u32)
}

/// Current cluster count; 0 for a null handle.
///
/// # Safety
/// `m` must be a live handle or null.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_size(m: *const HsClusterMem) -> u32 {
    m.as_ref().map_or(0, |h| h.inner.len() as u32)
}

/// Vote a hypervector into the cluster for `label`.
///
/// # Safety
/// `m` must be a live handle; `words` must point to `word_count` u64s.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_update(
    m: *mut HsClusterMem,
    label: u64,
    words: *const u64,
    word_count: usize,
) -> HsStatus {
    let Some(handle) = m.as_mut() else {
        return HsStatus::InvalidArg;
    };
    let Some(hv) = hv_from_words(handle.inner.dim(), words, word_count) else {
        return HsStatus::InvalidArg;
    };
    match handle.inner.update(label, &hv) {
        Ok(()) => HsStatus::Ok,
        Err(e) => status_from_memory_error(&e),
    }
}

/// Threshold the cluster for `label` into the caller's word buffer.
///
/// # Safety
/// `m` must be a live handle; `out_words` must point to `out_word_count`
/// writable u64s.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_finalize(
    m: *const HsClusterMem,
    label: u64,
    out_words: *mut u64,
    out_word_count: usize,
) -> HsStatus {
    let Some(handle) = m.as_ref() else {
        return HsStatus::InvalidArg;
    };
    if out_words.is_null() || out_word_count != word_count_for(handle.inner.dim()) {
        return HsStatus::InvalidArg;
    }
    let mut hv = BinaryHv::new(handle.inner.dim());
    handle.inner.finalize(label, &mut hv);
    let out = std::slice::from_raw_parts_mut(out_words, out_word_count);
    out.copy_from_slice(hv.words());
    HsStatus::Ok
}

/// Save a cluster memory to `path` in the requested format version.
///
/// # Safety
/// `m` must be a live handle; `path` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_save(
    m: *const HsClusterMem,
    path: *const c_char,
    ver: HsSerVersion,
) -> HsStatus {
    let Some(handle) = m.as_ref() else {
        return HsStatus::InvalidArg;
    };
    let Some(path) = path_from_cstr(path) else {
        return HsStatus::InvalidArg;
    };
    let Ok(mut file) = File::create(path) else {
        return HsStatus::IoError;
    };
    let result = match ver {
        HsSerVersion::V1 => save_cluster_v1(&mut file, &handle.inner),
        HsSerVersion::V11Default => save_cluster(&mut file, &handle.inner),
    };
    match result {
        Ok(()) => HsStatus::Ok,
        Err(e) => status_from_ser_error(&e),
    }
}

/// Load a cluster memory from `path` into an empty handle.
///
/// # Safety
/// `m` must be a live handle; `path` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hs_cluster_load(m: *mut HsClusterMem, path: *const c_char) -> HsStatus {
    let Some(handle) = m.as_mut() else {
        return HsStatus::InvalidArg;
    };
    let Some(path) = path_from_cstr(path) else {
        return HsStatus::InvalidArg;
    };
    let Ok(mut file) = File::open(path) else {
        return HsStatus::IoError;
    };
    match load_cluster(&mut file, &mut handle.inner) {
        Ok(()) => HsStatus::Ok,
        Err(e) => status_from_ser_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    fn word_buf(dim: usize, bits: &[usize]) -> Vec<u64> {
        let mut hv = BinaryHv::new(dim);
        for &b in bits {
            hv.set_bit(b, true);
        }
        hv.words().to_vec()
    }

    #[test]
    fn proto_lifecycle_learn_classify() {
        unsafe {
            let mut handle: *mut HsPrototypeMem = ptr::null_mut();
            assert_eq!(hs_proto_create(64, 4, &mut handle), HsStatus::Ok);
            assert_eq!(hs_proto_dim(handle), 64);
            assert_eq!(hs_proto_capacity(handle), 4);
            assert_eq!(hs_proto_size(handle), 0);

            let a = word_buf(64, &[0, 1]);
            let b = word_buf(64, &[10, 11]);
            assert_eq!(hs_proto_learn(handle, 1, a.as_ptr(), a.len()), HsStatus::Ok);
            assert_eq!(hs_proto_learn(handle, 2, b.as_ptr(), b.len()), HsStatus::Ok);
            assert_eq!(hs_proto_size(handle), 2);

            let query = word_buf(64, &[0, 1, 2]);
            let mut label = 0u64;
            assert_eq!(
                hs_proto_classify(handle, query.as_ptr(), query.len(), &mut label),
                HsStatus::Ok
            );
            assert_eq!(label, 1);

            hs_proto_destroy(handle);
        }
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        unsafe {
            assert_eq!(
                hs_proto_create(0, 4, &mut ptr::null_mut()),
                HsStatus::InvalidArg
            );

            let mut handle: *mut HsPrototypeMem = ptr::null_mut();
            hs_proto_create(64, 1, &mut handle);

            // Wrong buffer length.
            let short = [0u64; 0];
            assert_eq!(
                hs_proto_learn(handle, 1, short.as_ptr(), short.len()),
                HsStatus::InvalidArg
            );
            // Null buffer.
            assert_eq!(
                hs_proto_learn(handle, 1, ptr::null(), 1),
                HsStatus::InvalidArg
            );
            // Null handle.
            let buf = word_buf(64, &[0]);
            assert_eq!(
                hs_proto_learn(ptr::null_mut(), 1, buf.as_ptr(), buf.len()),
                HsStatus::InvalidArg
            );

            hs_proto_destroy(handle);
            hs_proto_destroy(ptr::null_mut()); // null is a no-op
        }
    }

    #[test]
    fn capacity_full_status() {
        unsafe {
            let mut handle: *mut HsPrototypeMem = ptr::null_mut();
            hs_proto_create(64, 1, &mut handle);
            let buf = word_buf(64, &[0]);
            assert_eq!(
                hs_proto_learn(handle, 1, buf.as_ptr(), buf.len()),
                HsStatus::Ok
            );
            assert_eq!(
                hs_proto_learn(handle, 2, buf.as_ptr(), buf.len()),
                HsStatus::CapacityFull
            );
            hs_proto_destroy(handle);
        }
    }

    #[test]
    fn cluster_update_finalize_through_abi() {
        unsafe {
            let mut handle: *mut HsClusterMem = ptr::null_mut();
            assert_eq!(hs_cluster_create(32, 2, &mut handle), HsStatus::Ok);

            let first = word_buf(32, &(0..8).collect::<Vec<_>>());
            let second = word_buf(32, &(4..12).collect::<Vec<_>>());
            assert_eq!(
                hs_cluster_update(handle, 42, first.as_ptr(), first.len()),
                HsStatus::Ok
            );
            assert_eq!(
                hs_cluster_update(handle, 42, second.as_ptr(), second.len()),
                HsStatus::Ok
            );
            assert_eq!(hs_cluster_size(handle), 1);

            let mut out = vec![0u64; 1];
            assert_eq!(
                hs_cluster_finalize(handle, 42, out.as_mut_ptr(), out.len()),
                HsStatus::Ok
            );
            let expected = word_buf(32, &(0..12).collect::<Vec<_>>());
            assert_eq!(out, expected);

            hs_cluster_destroy(handle);
        }
    }

    #[test]
    fn save_load_roundtrip_both_versions() {
        let dir = tempfile::tempdir().unwrap();
        unsafe {
            for ver in [HsSerVersion::V11Default, HsSerVersion::V1] {
                let path = dir.path().join(format!("proto_{:?}.hser1", ver));
                let cpath = CString::new(path.to_str().unwrap()).unwrap();

                let mut src: *mut HsPrototypeMem = ptr::null_mut();
                hs_proto_create(64, 2, &mut src);
                let buf = word_buf(64, &[3, 33, 63]);
                hs_proto_learn(src, 9, buf.as_ptr(), buf.len());
                assert_eq!(hs_proto_save(src, cpath.as_ptr(), ver), HsStatus::Ok);

                let mut dst: *mut HsPrototypeMem = ptr::null_mut();
                hs_proto_create(64, 2, &mut dst);
                assert_eq!(hs_proto_load(dst, cpath.as_ptr()), HsStatus::Ok);
                assert_eq!(hs_proto_size(dst), 1);

                let mut label = 0u64;
                hs_proto_classify(dst, buf.as_ptr(), buf.len(), &mut label);
                assert_eq!(label, 9);

                hs_proto_destroy(src);
                hs_proto_destroy(dst);
            }
        }
    }

    #[test]
    fn load_mismatched_config_reports_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cluster.hser1");
        let cpath = CString::new(path.to_str().unwrap()).unwrap();
        unsafe {
            let mut src: *mut HsClusterMem = ptr::null_mut();
            hs_cluster_create(32, 2, &mut src);
            let buf = word_buf(32, &[0]);
            hs_cluster_update(src, 1, buf.as_ptr(), buf.len());
            assert_eq!(
                hs_cluster_save(src, cpath.as_ptr(), HsSerVersion::V11Default),
                HsStatus::Ok
            );

            let mut wrong_dim: *mut HsClusterMem = ptr::null_mut();
            hs_cluster_create(64, 2, &mut wrong_dim);
            assert_eq!(
                hs_cluster_load(wrong_dim, cpath.as_ptr()),
                HsStatus::UnsupportedConfig
            );

            let missing = CString::new(dir.path().join("nope").to_str().unwrap()).unwrap();
            assert_eq!(hs_cluster_load(src, missing.as_ptr()), HsStatus::IoError);

            hs_cluster_destroy(src);
            hs_cluster_destroy(wrong_dim);
        }
    }
}
