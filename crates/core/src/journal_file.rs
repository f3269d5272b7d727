//! File-backed journal: line-delimited JSON with a SHA-256 hash chain.
//!
//! Line 1 is the session header (format version, seed, grid dimensions);
//! every further line is one accepted input carrying the previous line's
//! digest, so truncation and tampering are both detectable. Records are
//! flushed as they are appended; a session killed mid-turn still leaves a
//! loadable prefix.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::journal::{InputJournal, InputPayload, InputRecord};

const CHAIN_SEED: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Serialize, Deserialize)]
struct HeaderLine {
    format_version: u16,
    seed: u64,
    width: usize,
    height: usize,
}

#[derive(Serialize, Deserialize)]
struct RecordLine {
    seq: u64,
    payload: InputPayload,
    prev_digest: String,
    digest: String,
}

fn chain_digest(seq: u64, payload: &InputPayload, prev_digest: &str) -> io::Result<String> {
    let payload_json = serde_json::to_string(payload).map_err(io::Error::other)?;
    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(payload_json.as_bytes());
    hasher.update(prev_digest.as_bytes());
    Ok(format!("{:064x}", hasher.finalize()))
}

/// Append-only writer; every record hits the disk before the call returns.
pub struct JournalWriter {
    writer: BufWriter<File>,
    prev_digest: String,
    next_seq: u64,
}

impl JournalWriter {
    pub fn create(path: &Path, seed: u64, width: usize, height: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        let header = HeaderLine { format_version: 1, seed, width, height };
        let header_json = serde_json::to_string(&header).map_err(io::Error::other)?;
        writeln!(writer, "{header_json}")?;
        writer.flush()?;
        Ok(Self { writer, prev_digest: CHAIN_SEED.to_string(), next_seq: 0 })
    }

    pub fn append(&mut self, payload: &InputPayload) -> io::Result<()> {
        let digest = chain_digest(self.next_seq, payload, &self.prev_digest)?;
        let record = RecordLine {
            seq: self.next_seq,
            payload: payload.clone(),
            prev_digest: self.prev_digest.clone(),
            digest: digest.clone(),
        };
        let record_json = serde_json::to_string(&record).map_err(io::Error::other)?;
        writeln!(self.writer, "{record_json}")?;
        self.writer.flush()?;
        self.prev_digest = digest;
        self.next_seq += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub enum JournalLoadError {
    Io(io::Error),
    EmptyFile,
    BadHeader { message: String },
    BadRecord { line: usize, message: String },
    ChainBroken { line: usize },
}

impl fmt::Display for JournalLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "journal I/O error: {err}"),
            Self::EmptyFile => write!(f, "journal file is empty"),
            Self::BadHeader { message } => write!(f, "invalid journal header: {message}"),
            Self::BadRecord { line, message } => {
                write!(f, "invalid journal record at line {line}: {message}")
            }
            Self::ChainBroken { line } => {
                write!(f, "journal hash chain broken at line {line}")
            }
        }
    }
}

impl std::error::Error for JournalLoadError {}

/// Load and verify a journal file, rejecting the first out-of-sequence or
/// hash-broken line.
pub fn load_journal(path: &Path) -> Result<InputJournal, JournalLoadError> {
    let content = std::fs::read_to_string(path).map_err(JournalLoadError::Io)?;
    let mut lines = content.lines();
    let header_line = lines.next().ok_or(JournalLoadError::EmptyFile)?;
    let header: HeaderLine = serde_json::from_str(header_line)
        .map_err(|err| JournalLoadError::BadHeader { message: err.to_string() })?;

    let mut journal = InputJournal::new(header.seed, header.width, header.height);
    journal.format_version = header.format_version;

    let mut prev_digest = CHAIN_SEED.to_string();
    for (offset, line) in lines.enumerate() {
        let line_number = offset + 2;
        let record: RecordLine = serde_json::from_str(line).map_err(|err| {
            JournalLoadError::BadRecord { line: line_number, message: err.to_string() }
        })?;
        if record.seq != journal.inputs.len() as u64 {
            return Err(JournalLoadError::BadRecord {
                line: line_number,
                message: format!("expected seq {}, found {}", journal.inputs.len(), record.seq),
            });
        }
        if record.prev_digest != prev_digest {
            return Err(JournalLoadError::ChainBroken { line: line_number });
        }
        let expected = chain_digest(record.seq, &record.payload, &prev_digest)
            .map_err(JournalLoadError::Io)?;
        if record.digest != expected {
            return Err(JournalLoadError::ChainBroken { line: line_number });
        }
        journal.inputs.push(InputRecord { seq: record.seq, payload: record.payload });
        prev_digest = record.digest;
    }

    Ok(journal)
}
