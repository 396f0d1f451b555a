//! On-disk record framing.
//!
//! Every checkpoint file has the same shape, bincode-encoded:
//!
//! ```text
//! magic "MSNP" | format version | generation | record count
//! per record: subsystem | schema version | body length | SHA-256(body) | body
//! ```
//!
//! A per-subsystem file holds exactly one record; `snapshot.ckpt` holds
//! all of them. Decoding checks magic, format version, length, digest
//! and the absence of trailing bytes before any payload is returned.
//!
//! The generation is a SHA-256 over every record of the snapshot a file
//! was written with. Per-subsystem files of one checkpoint carry the
//! same generation, so files spliced in from another checkpoint are
//! caught at read time.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use molsnap_types::{MolsnapError, MolsnapResult, Payload, SubsystemId};

/// File magic.
pub const MAGIC: [u8; 4] = *b"MSNP";

/// Version of the framing. Files with another version are rejected.
pub const FORMAT_VERSION: u32 = 2;

/// Identifies the snapshot a file belongs to.
pub type Generation = [u8; 32];

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct FileHeader {
    magic: [u8; 4],
    format_version: u32,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordHeader {
    subsystem: SubsystemId,
    schema_version: u32,
    body_len: u64,
    digest: [u8; 32],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Record {
    header: RecordHeader,
    body: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CheckpointFile {
    header: FileHeader,
    generation: Generation,
    records: Vec<Record>,
}

/// Human-readable summary of one record, as printed by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInfo {
    pub subsystem: SubsystemId,
    pub schema_version: u32,
    pub body_len: u64,
    /// Lowercase hex SHA-256 of the body.
    pub digest: String,
}

fn digest(body: &[u8]) -> [u8; 32] {
    Sha256::digest(body).into()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl Record {
    fn from_payload(payload: &Payload) -> Self {
        Self {
            header: RecordHeader {
                subsystem: payload.subsystem,
                schema_version: payload.schema_version,
                body_len: payload.body.len() as u64,
                digest: digest(&payload.body),
            },
            body: payload.body.clone(),
        }
    }

    fn verify(&self) -> Result<(), String> {
        if self.header.body_len != self.body.len() as u64 {
            return Err(format!(
                "{} record declares {} body bytes, found {}",
                self.header.subsystem,
                self.header.body_len,
                self.body.len()
            ));
        }
        if self.header.digest != digest(&self.body) {
            return Err(format!("{} record digest mismatch", self.header.subsystem));
        }
        Ok(())
    }

    fn info(&self) -> RecordInfo {
        RecordInfo {
            subsystem: self.header.subsystem,
            schema_version: self.header.schema_version,
            body_len: self.header.body_len,
            digest: to_hex(&self.header.digest),
        }
    }

    fn into_payload(self) -> Payload {
        Payload {
            subsystem: self.header.subsystem,
            schema_version: self.header.schema_version,
            body: self.body,
        }
    }
}

/// Generation of a snapshot: SHA-256 over each record's subsystem,
/// schema version and body digest, in subsystem order.
pub fn generation(payloads: &[&Payload]) -> Generation {
    let mut sorted = payloads.to_vec();
    sorted.sort_by_key(|p| p.subsystem);
    let mut hasher = Sha256::new();
    for payload in sorted {
        hasher.update(payload.subsystem.name().as_bytes());
        hasher.update(payload.schema_version.to_le_bytes());
        hasher.update(digest(&payload.body));
    }
    hasher.finalize().into()
}

/// Encodes payloads into one checkpoint file stamped with `generation`.
pub fn encode_file(payloads: &[&Payload], generation: Generation) -> MolsnapResult<Vec<u8>> {
    let file = CheckpointFile {
        header: FileHeader {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
        },
        generation,
        records: payloads.iter().map(|p| Record::from_payload(p)).collect(),
    };
    Ok(bincode::serialize(&file)?)
}

fn parse_error(path: &Path, reason: impl Into<String>) -> MolsnapError {
    MolsnapError::Parse {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn decode_checked(bytes: &[u8], path: &Path) -> MolsnapResult<CheckpointFile> {
    let header: FileHeader = bincode::deserialize(bytes)
        .map_err(|e| parse_error(path, format!("truncated header: {e}")))?;
    if header.magic != MAGIC {
        return Err(parse_error(
            path,
            format!("bad magic {:?}, not a checkpoint file", header.magic),
        ));
    }
    if header.format_version != FORMAT_VERSION {
        return Err(parse_error(
            path,
            format!(
                "format version {} unsupported (expected {FORMAT_VERSION})",
                header.format_version
            ),
        ));
    }

    let file: CheckpointFile =
        bincode::deserialize(bytes).map_err(|e| parse_error(path, format!("corrupt records: {e}")))?;
    let consumed = bincode::serialized_size(&file)?;
    if consumed != bytes.len() as u64 {
        return Err(parse_error(
            path,
            format!("{} trailing bytes", bytes.len() as u64 - consumed.min(bytes.len() as u64)),
        ));
    }
    for record in &file.records {
        record.verify().map_err(|reason| parse_error(path, reason))?;
    }
    Ok(file)
}

/// Decodes and verifies a checkpoint file, returning its generation
/// and payloads.
pub fn decode_file(bytes: &[u8], path: &Path) -> MolsnapResult<(Generation, Vec<Payload>)> {
    let file = decode_checked(bytes, path)?;
    let payloads = file.records.into_iter().map(Record::into_payload).collect();
    Ok((file.generation, payloads))
}

/// Reads a checkpoint file and summarizes its records without
/// decoding any payload body.
pub fn inspect(path: &Path) -> MolsnapResult<Vec<RecordInfo>> {
    let bytes = std::fs::read(path).map_err(|e| parse_error(path, e.to_string()))?;
    let file = decode_checked(&bytes, path)?;
    Ok(file.records.iter().map(Record::info).collect())
}
