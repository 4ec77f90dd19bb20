use std::io::{self, Read, Seek, SeekFrom, Write};

use thiserror::Error;
use tracing::debug;

use hyperstream_core::{word_count_for, BinaryHv};

use crate::memory::{ClusterMemory, MemoryError, PrototypeMemory};

/// File magic opening every HSER1 payload.
pub const HSER1_MAGIC: [u8; 5] = *b"HSER1";
/// Tag opening the optional v1.1 integrity trailer.
pub const TRAILER_TAG: [u8; 4] = *b"HSX1";
/// Packed header length: magic + kind + dim + capacity + size.
pub const HEADER_LEN: usize = 5 + 1 + 8 + 8 + 8;

/// Serialized object kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectKind {
    Prototype = 1,
    Cluster = 2,
}

/// Serialization failures. Loads leave the destination store empty.
#[derive(Debug, Error)]
pub enum SerError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("bad magic {found:?}; expected \"HSER1\"")]
    BadMagic { found: [u8; 5] },

    #[error("object kind {found} does not match expected kind {expected}")]
    KindMismatch { expected: u8, found: u8 },

    #[error("payload dimension {found} does not match store dimension {expected}")]
    DimMismatch { expected: u64, found: u64 },

    #[error("payload capacity {found} does not match store capacity {expected}")]
    CapacityMismatch { expected: u64, found: u64 },

    #[error("payload size {size} exceeds capacity {capacity}")]
    SizeExceedsCapacity { size: u64, capacity: u64 },

    #[error("body CRC mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    CrcMismatch { stored: u32, computed: u32 },

    #[error("destination store is not empty (size {len})")]
    DestinationNotEmpty { len: usize },

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Rolling CRC-32 (IEEE 802.3, polynomial 0xEDB88320), bytewise, tableless.
#[derive(Clone, Copy, Debug)]
pub struct Crc32(u32);

impl Crc32 {
    const POLY: u32 = 0xEDB8_8320;

    #[inline]
    pub fn new() -> Self {
        Self(0xFFFF_FFFF)
    }

    /// Fold `bytes` into the running checksum.
    pub fn update(&mut self, bytes: &[u8]) {
        let mut crc = self.0;
        for &byte in bytes {
            crc ^= byte as u32;
            for _ in 0..8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ Self::POLY
                } else {
                    crc >> 1
                };
            }
        }
        self.0 = crc;
    }

    /// Final checksum value.
    #[inline]
    pub fn finalize(self) -> u32 {
        self.0 ^ 0xFFFF_FFFF
    }

    /// One-shot checksum of a byte slice.
    pub fn checksum(bytes: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(bytes);
        crc.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

fn write_header<W: Write>(
    w: &mut W,
    kind: ObjectKind,
    dim: u64,
    capacity: u64,
    size: u64,
) -> io::Result<()> {
    w.write_all(&HSER1_MAGIC)?;
    w.write_all(&[kind as u8])?;
    w.write_all(&dim.to_le_bytes())?;
    w.write_all(&capacity.to_le_bytes())?;
    w.write_all(&size.to_le_bytes())
}

struct Header {
    kind: u8,
    dim: u64,
    capacity: u64,
    size: u64,
}

fn read_header<R: Read>(r: &mut R) -> Result<Header, SerError> {
    let mut magic = [0u8; 5];
    r.read_exact(&mut magic)?;
    if magic != HSER1_MAGIC {
        return Err(SerError::BadMagic { found: magic });
    }
    let mut kind = [0u8; 1];
    r.read_exact(&mut kind)?;
    let mut u64_buf = [0u8; 8];
    r.read_exact(&mut u64_buf)?;
    let dim = u64::from_le_bytes(u64_buf);
    r.read_exact(&mut u64_buf)?;
    let capacity = u64::from_le_bytes(u64_buf);
    r.read_exact(&mut u64_buf)?;
    let size = u64::from_le_bytes(u64_buf);
    Ok(Header {
        kind: kind[0],
        dim,
        capacity,
        size,
    })
}

fn write_trailer<W: Write>(w: &mut W, crc: u32) -> io::Result<()> {
    w.write_all(&TRAILER_TAG)?;
    w.write_all(&crc.to_le_bytes())
}

/// Probe for a v1.1 trailer. Rewinds and reports `None` when the next bytes
/// are not a complete `HSX1` trailer, so v1 payloads load unchanged.
fn try_read_trailer<R: Read + Seek>(r: &mut R) -> io::Result<Option<u32>> {
    let pos = r.stream_position()?;
    let mut tag = [0u8; 4];
    if r.read_exact(&mut tag).is_err() {
        r.seek(SeekFrom::Start(pos))?;
        return Ok(None);
    }
    if tag != TRAILER_TAG {
        r.seek(SeekFrom::Start(pos))?;
        return Ok(None);
    }
    let mut crc_buf = [0u8; 4];
    if r.read_exact(&mut crc_buf).is_err() {
        r.seek(SeekFrom::Start(pos))?;
        return Ok(None);
    }
    Ok(Some(u32::from_le_bytes(crc_buf)))
}

#[inline]
fn trailer_enabled() -> bool {
    !cfg!(feature = "hser1-write-v1")
}

/// Serialize a prototype memory.
///
/// Body: per entry, the u64 label followed by the packed HV words, all
/// little-endian. v1.1 appends the CRC trailer over the body bytes; the
/// `hser1-write-v1` feature switches the default writer to strict v1.
pub fn save_prototype<W: Write>(w: &mut W, mem: &PrototypeMemory) -> Result<(), SerError> {
    save_prototype_impl(w, mem, trailer_enabled())
}

/// Serialize a prototype memory as strict v1 (no trailer), regardless of
/// the compile-time default.
pub fn save_prototype_v1<W: Write>(w: &mut W, mem: &PrototypeMemory) -> Result<(), SerError> {
    save_prototype_impl(w, mem, false)
}

fn save_prototype_impl<W: Write>(
    w: &mut W,
    mem: &PrototypeMemory,
    with_trailer: bool,
) -> Result<(), SerError> {
    write_header(
        w,
        ObjectKind::Prototype,
        mem.dim() as u64,
        mem.capacity() as u64,
        mem.len() as u64,
    )?;
    let mut crc = Crc32::new();
    for entry in mem.entries() {
        let label_bytes = entry.label.to_le_bytes();
        crc.update(&label_bytes);
        w.write_all(&label_bytes)?;
        let hv_bytes = entry.hv.to_le_bytes();
        crc.update(&hv_bytes);
        w.write_all(&hv_bytes)?;
    }
    if with_trailer {
        write_trailer(w, crc.finalize())?;
    }
    debug!(
        dim = mem.dim(),
        size = mem.len(),
        trailer = with_trailer,
        "saved prototype memory"
    );
    Ok(())
}

/// Load a prototype memory saved by [`save_prototype`].
///
/// The destination must be empty and match the payload's dimension and
/// capacity exactly. Entries are committed only after the body (and the
/// trailer CRC, when present) validate, so failures leave `mem` empty.
pub fn load_prototype<R: Read + Seek>(
    r: &mut R,
    mem: &mut PrototypeMemory,
) -> Result<(), SerError> {
    if !mem.is_empty() {
        return Err(SerError::DestinationNotEmpty { len: mem.len() });
    }
    let h = read_header(r)?;
    if h.kind != ObjectKind::Prototype as u8 {
        return Err(SerError::KindMismatch {
            expected: ObjectKind::Prototype as u8,
            found: h.kind,
        });
    }
    if h.dim != mem.dim() as u64 {
        return Err(SerError::DimMismatch {
            expected: mem.dim() as u64,
            found: h.dim,
        });
    }
    if h.capacity != mem.capacity() as u64 {
        return Err(SerError::CapacityMismatch {
            expected: mem.capacity() as u64,
            found: h.capacity,
        });
    }
    if h.size > h.capacity {
        return Err(SerError::SizeExceedsCapacity {
            size: h.size,
            capacity: h.capacity,
        });
    }

    let word_bytes = word_count_for(mem.dim()) * 8;
    let mut crc = Crc32::new();
    let mut staged: Vec<(u64, BinaryHv)> = Vec::with_capacity(h.size as usize);
    let mut label_buf = [0u8; 8];
    let mut hv_buf = vec![0u8; word_bytes];
    for _ in 0..h.size {
        r.read_exact(&mut label_buf)?;
        crc.update(&label_buf);
        r.read_exact(&mut hv_buf)?;
        crc.update(&hv_buf);
        staged.push((
            u64::from_le_bytes(label_buf),
            BinaryHv::from_le_bytes(mem.dim(), &hv_buf),
        ));
    }

    if let Some(stored) = try_read_trailer(r)? {
        let computed = crc.finalize();
        if stored != computed {
            return Err(SerError::CrcMismatch { stored, computed });
        }
    }

    for (label, hv) in &staged {
        mem.learn(*label, hv)?;
    }
    debug!(dim = mem.dim(), size = mem.len(), "loaded prototype memory");
    Ok(())
}

/// Serialize a cluster memory.
///
/// Body: `labels[size]` u64s, `counts[size]` i32s, `sums[size * dim]` i32s,
/// contiguous in that order, little-endian. Empty stores write no body.
pub fn save_cluster<W: Write>(w: &mut W, mem: &ClusterMemory) -> Result<(), SerError> {
    save_cluster_impl(w, mem, trailer_enabled())
}

/// Serialize a cluster memory as strict v1 (no trailer), regardless of the
/// compile-time default.
pub fn save_cluster_v1<W: Write>(w: &mut W, mem: &ClusterMemory) -> Result<(), SerError> {
    save_cluster_impl(w, mem, false)
}

fn save_cluster_impl<W: Write>(
    w: &mut W,
    mem: &ClusterMemory,
    with_trailer: bool,
) -> Result<(), SerError> {
    let view = mem.view();
    write_header(
        w,
        ObjectKind::Cluster,
        mem.dim() as u64,
        mem.capacity() as u64,
        view.size as u64,
    )?;
    let mut crc = Crc32::new();
    if view.size > 0 {
        let mut buf = Vec::with_capacity(view.labels.len() * 8);
        for &label in view.labels {
            buf.extend_from_slice(&label.to_le_bytes());
        }
        crc.update(&buf);
        w.write_all(&buf)?;

        buf.clear();
        for &count in view.counts {
            buf.extend_from_slice(&count.to_le_bytes());
        }
        crc.update(&buf);
        w.write_all(&buf)?;

        buf.clear();
        for &sum in view.sums {
            buf.extend_from_slice(&sum.to_le_bytes());
        }
        crc.update(&buf);
        w.write_all(&buf)?;
    }
    if with_trailer {
        write_trailer(w, crc.finalize())?;
    }
    debug!(
        dim = mem.dim(),
        size = view.size,
        trailer = with_trailer,
        "saved cluster memory"
    );
    Ok(())
}

/// Load a cluster memory saved by [`save_cluster`].
///
/// Same preconditions as [`load_prototype`]; the buffers are committed via
/// `load_raw` only after validation, so failures leave `mem` empty.
pub fn load_cluster<R: Read + Seek>(r: &mut R, mem: &mut ClusterMemory) -> Result<(), SerError> {
    if !mem.is_empty() {
        return Err(SerError::DestinationNotEmpty { len: mem.len() });
    }
    let h = read_header(r)?;
    if h.kind != ObjectKind::Cluster as u8 {
        return Err(SerError::KindMismatch {
            expected: ObjectKind::Cluster as u8,
            found: h.kind,
        });
    }
    if h.dim != mem.dim() as u64 {
        return Err(SerError::DimMismatch {
            expected: mem.dim() as u64,
            found: h.dim,
        });
    }
    if h.capacity != mem.capacity() as u64 {
        return Err(SerError::CapacityMismatch {
            expected: mem.capacity() as u64,
            found: h.capacity,
        });
    }
    if h.size > h.capacity {
        return Err(SerError::SizeExceedsCapacity {
            size: h.size,
            capacity: h.capacity,
        });
    }

    let n = h.size as usize;
    let mut crc = Crc32::new();
    let mut labels = vec![0u64; n];
    let mut counts = vec![0i32; n];
    let mut sums = vec![0i32; n * mem.dim()];
    if n > 0 {
        let mut buf = vec![0u8; n * 8];
        r.read_exact(&mut buf)?;
        crc.update(&buf);
        for (i, chunk) in buf.chunks_exact(8).enumerate() {
            labels[i] = u64::from_le_bytes(chunk.try_into().unwrap());
        }

        let mut buf = vec![0u8; n * 4];
        r.read_exact(&mut buf)?;
        crc.update(&buf);
        for (i, chunk) in buf.chunks_exact(4).enumerate() {
            counts[i] = i32::from_le_bytes(chunk.try_into().unwrap());
        }

        let mut buf = vec![0u8; n * mem.dim() * 4];
        r.read_exact(&mut buf)?;
        crc.update(&buf);
        for (i, chunk) in buf.chunks_exact(4).enumerate() {
            sums[i] = i32::from_le_bytes(chunk.try_into().unwrap());
        }
    }

    if let Some(stored) = try_read_trailer(r)? {
        let computed = crc.finalize();
        if stored != computed {
            return Err(SerError::CrcMismatch { stored, computed });
        }
    }

    mem.load_raw(&labels, &counts, &sums)?;
    debug!(dim = mem.dim(), size = mem.len(), "loaded cluster memory");
    Ok(())
}
