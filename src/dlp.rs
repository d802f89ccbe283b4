//! Baby-step/giant-step discrete-log tables used by decryption.
//!
//! Decryption reduces a ciphertext to a group element of the form `k·M`
//! (elliptic-curve notation) or `g^k` (pairing-target notation) for a small
//! signed `k`. The tables here recover `k` with a hashed baby-step table of
//! `hash_size` entries and a giant-step escape loop of up to `try_num`
//! retries, so the decodable range is `±hash_size * (try_num + 1)`.
//!
//! Each baby step stores a 32-bit fingerprint of the canonical coordinate
//! together with a signed step index whose sign records the parity of the
//! step; the parity disambiguates `k·M` from `-k·M`, which share the same
//! coordinate. Fingerprint collisions are resolved by walking the matching
//! bucket in ascending step order while advancing an accumulator
//! incrementally, so lookups never recompute multiples from scratch.

use tracing::instrument;

use crate::backend::{GroupPoint, PairingBackend, TargetElement};
use crate::errors::Error;

/// File magic for serialized tables.
const TABLE_MAGIC: [u8; 4] = *b"BGNT";
/// Current table format version.
const TABLE_VERSION: u8 = 1;
/// Bytes per `(key, count)` record.
const RECORD_LEN: usize = 8;
/// Bytes before the records: magic, version, `hash_size`, `try_num`.
const HEADER_LEN: usize = 4 + 1 + 4 + 4;

/// One baby step: fingerprint key and signed step index.
///
/// `count` is `+i` when the i-th multiple has odd parity and `-i` otherwise,
/// so the sign doubles as the stored parity bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct KeyCount {
    key: u32,
    count: i32,
}

fn encode_records(hash_size: u32, try_num: u32, entries: &[KeyCount]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + entries.len() * RECORD_LEN);
    out.extend_from_slice(&TABLE_MAGIC);
    out.push(TABLE_VERSION);
    out.extend_from_slice(&hash_size.to_le_bytes());
    out.extend_from_slice(&try_num.to_le_bytes());
    for entry in entries {
        out.extend_from_slice(&entry.key.to_le_bytes());
        out.extend_from_slice(&entry.count.to_le_bytes());
    }
    out
}

fn decode_records(bytes: &[u8]) -> Result<(u32, u32, Vec<KeyCount>), Error> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::TableFormat("truncated header"));
    }
    if bytes[..4] != TABLE_MAGIC {
        return Err(Error::TableFormat("bad magic"));
    }
    if bytes[4] != TABLE_VERSION {
        return Err(Error::TableFormat("unsupported version"));
    }
    let hash_size = u32::from_le_bytes(bytes[5..9].try_into().expect("4 bytes"));
    let try_num = u32::from_le_bytes(bytes[9..13].try_into().expect("4 bytes"));
    if hash_size == 0 {
        return Err(Error::TableFormat("zero hash size"));
    }
    let body = &bytes[HEADER_LEN..];
    if body.len() != hash_size as usize * RECORD_LEN {
        return Err(Error::TableFormat("table length mismatch"));
    }
    let entries = body
        .chunks_exact(RECORD_LEN)
        .map(|chunk| KeyCount {
            key: u32::from_le_bytes(chunk[..4].try_into().expect("4 bytes")),
            count: i32::from_le_bytes(chunk[4..].try_into().expect("4 bytes")),
        })
        .collect();
    Ok((hash_size, try_num, entries))
}

fn equal_range(entries: &[KeyCount], key: u32) -> (usize, usize) {
    let lo = entries.partition_point(|e| e.key < key);
    let hi = entries.partition_point(|e| e.key <= key);
    (lo, hi)
}

fn check_range(value: i64, hash_size: u32, try_num: u32) -> Result<i64, Error> {
    let limit = hash_size as i64 * (try_num as i64 + 1);
    if value.abs() <= limit {
        Ok(value)
    } else {
        Err(Error::DlpOutOfRange)
    }
}

/// BSGS table over the additive source group `G1`.
///
/// Solves `log_M(X)` for `X = k·M` with `|k| <= hash_size * (try_num + 1)`.
#[derive(Clone, Debug)]
pub struct EcDlpTable<B: PairingBackend> {
    entries: Vec<KeyCount>,
    base: B::G1,
    giant: B::G1,
    hash_size: u32,
    try_num: u32,
}

impl<B: PairingBackend> EcDlpTable<B> {
    /// Builds the baby-step table for generator `base`.
    #[instrument(level = "info", skip_all, fields(hash_size, try_num))]
    pub fn init(base: B::G1, hash_size: u32, try_num: u32) -> Result<Self, Error> {
        if hash_size == 0 {
            return Err(Error::RangeZero);
        }
        let mut entries = Vec::with_capacity(hash_size as usize);
        let mut walk = B::G1::identity();
        for i in 1..=hash_size {
            walk = walk.add(&base);
            let count = if walk.parity() { i as i32 } else { -(i as i32) };
            entries.push(KeyCount {
                key: walk.fingerprint(),
                count,
            });
        }
        // giant = (2 * hash_size + 1) * base
        let giant = walk.add(&walk).add(&base);
        // Stable sort: insertion order is ascending step index, so equal-key
        // buckets stay in ascending |count| order.
        entries.sort_by_key(|e| e.key);
        Ok(Self {
            entries,
            base,
            giant,
            hash_size,
            try_num,
        })
    }

    /// Looks `x` up in the baby-step table alone (`|k| <= hash_size`).
    fn basic_log(&self, x: &B::G1) -> Option<i64> {
        if x.is_identity() {
            return Some(0);
        }
        let (lo, hi) = equal_range(&self.entries, x.fingerprint());
        let mut walk = B::G1::identity();
        let mut prev: i32 = 0;
        for entry in &self.entries[lo..hi] {
            let abs = entry.count.abs();
            let neg = entry.count < 0;
            walk = walk.add(&self.base.mul_i64((abs - prev) as i64));
            if walk.x_equals(x) {
                let flip = walk.parity() ^ x.parity() ^ neg;
                let count = entry.count as i64;
                return Some(if flip { -count } else { count });
            }
            prev = abs;
        }
        None
    }

    /// Solves `log_base(x)`, escaping the baby-step window with up to
    /// `try_num` giant steps in each direction.
    pub fn log(&self, x: &B::G1) -> Result<i64, Error> {
        if let Some(c) = self.basic_log(x) {
            return check_range(c, self.hash_size, self.try_num);
        }
        let step = 2 * self.hash_size as i64 + 1;
        let mut pos = *x;
        let mut neg = *x;
        let mut center_pos: i64 = 0;
        let mut center_neg: i64 = 0;
        for _ in 0..self.try_num {
            pos = pos.sub(&self.giant);
            center_pos += step;
            if let Some(c) = self.basic_log(&pos) {
                return check_range(center_pos + c, self.hash_size, self.try_num);
            }
            neg = neg.add(&self.giant);
            center_neg -= step;
            if let Some(c) = self.basic_log(&neg) {
                return check_range(center_neg + c, self.hash_size, self.try_num);
            }
        }
        Err(Error::DlpOutOfRange)
    }

    /// Serializes the table (magic, version, sizes, sorted records).
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_records(self.hash_size, self.try_num, &self.entries)
    }

    /// Restores a table from its serialized form; `base` must be the
    /// generator the table was built for.
    pub fn from_bytes(base: B::G1, bytes: &[u8]) -> Result<Self, Error> {
        let (hash_size, try_num, entries) = decode_records(bytes)?;
        let giant = base.mul_i64(2 * hash_size as i64 + 1);
        Ok(Self {
            entries,
            base,
            giant,
            hash_size,
            try_num,
        })
    }
}

/// BSGS table over the multiplicative pairing target.
///
/// Solves `log_g(x)` for `x = g^k` with `|k| <= hash_size * (try_num + 1)`.
/// The generator must lie in the r-order subgroup (it always does: tables
/// are built on final-exponentiated pairing values), so the cached inverse
/// of the giant step is the unitary inverse.
#[derive(Clone, Debug)]
pub struct GtDlpTable<B: PairingBackend> {
    entries: Vec<KeyCount>,
    base: B::Target,
    giant: B::Target,
    giant_inv: B::Target,
    hash_size: u32,
    try_num: u32,
}

impl<B: PairingBackend> GtDlpTable<B> {
    /// Builds the baby-step table for generator `base`.
    #[instrument(level = "info", skip_all, fields(hash_size, try_num))]
    pub fn init(base: B::Target, hash_size: u32, try_num: u32) -> Result<Self, Error> {
        if hash_size == 0 {
            return Err(Error::RangeZero);
        }
        let mut entries = Vec::with_capacity(hash_size as usize);
        let mut walk = B::Target::one();
        for i in 1..=hash_size {
            walk = walk.mul(&base);
            let count = if walk.parity() { i as i32 } else { -(i as i32) };
            entries.push(KeyCount {
                key: walk.fingerprint(),
                count,
            });
        }
        // giant = base^(2 * hash_size + 1)
        let giant = walk.mul(&walk).mul(&base);
        let giant_inv = giant.unitary_inverse();
        entries.sort_by_key(|e| e.key);
        Ok(Self {
            entries,
            base,
            giant,
            giant_inv,
            hash_size,
            try_num,
        })
    }

    fn basic_log(&self, x: &B::Target) -> Option<i64> {
        if x.is_one() {
            return Some(0);
        }
        let (lo, hi) = equal_range(&self.entries, x.fingerprint());
        let mut walk = B::Target::one();
        let mut prev: i32 = 0;
        for entry in &self.entries[lo..hi] {
            let abs = entry.count.abs();
            let neg = entry.count < 0;
            walk = walk.mul(&self.base.pow_i64((abs - prev) as i64));
            if walk.half_equals(x) {
                let flip = walk.parity() ^ x.parity() ^ neg;
                let count = entry.count as i64;
                return Some(if flip { -count } else { count });
            }
            prev = abs;
        }
        None
    }

    /// Solves `log_base(x)`, escaping the baby-step window with up to
    /// `try_num` giant steps in each direction.
    pub fn log(&self, x: &B::Target) -> Result<i64, Error> {
        if let Some(c) = self.basic_log(x) {
            return check_range(c, self.hash_size, self.try_num);
        }
        let step = 2 * self.hash_size as i64 + 1;
        let mut pos = *x;
        let mut neg = *x;
        let mut center_pos: i64 = 0;
        let mut center_neg: i64 = 0;
        for _ in 0..self.try_num {
            pos = pos.mul(&self.giant_inv);
            center_pos += step;
            if let Some(c) = self.basic_log(&pos) {
                return check_range(center_pos + c, self.hash_size, self.try_num);
            }
            neg = neg.mul(&self.giant);
            center_neg -= step;
            if let Some(c) = self.basic_log(&neg) {
                return check_range(center_neg + c, self.hash_size, self.try_num);
            }
        }
        Err(Error::DlpOutOfRange)
    }

    /// Serializes the table (magic, version, sizes, sorted records).
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_records(self.hash_size, self.try_num, &self.entries)
    }

    /// Restores a table from its serialized form; `base` must be the
    /// generator the table was built for.
    pub fn from_bytes(base: B::Target, bytes: &[u8]) -> Result<Self, Error> {
        let (hash_size, try_num, entries) = decode_records(bytes)?;
        let giant = base.pow_i64(2 * hash_size as i64 + 1);
        let giant_inv = giant.unitary_inverse();
        Ok(Self {
            entries,
            base,
            giant,
            giant_inv,
            hash_size,
            try_num,
        })
    }
}
