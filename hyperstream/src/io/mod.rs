//! HSER1 binary serialization.
//!
//! Versioned on-disk format for associative memories: a fixed little-endian
//! header (`HSER1` magic, object kind, dimension, capacity, item count), a
//! kind-specific body, and an optional v1.1 integrity trailer (`HSX1` tag +
//! CRC-32 over the body). Writers emit the trailer by default; the
//! `hser1-write-v1` feature produces strict v1 payloads. Readers accept
//! both forms and verify the CRC whenever the trailer is present.

mod serialization;

pub use serialization::{
    load_cluster, load_prototype, save_cluster, save_cluster_v1, save_prototype,
    save_prototype_v1, Crc32, ObjectKind, SerError, HEADER_LEN, HSER1_MAGIC, TRAILER_TAG,
};
