//! File-backed JSONL journal with a SHA-256 hash chain for crash recovery.
//!
//! The format is line-delimited JSON (`.jsonl`):
//! - Line 1: header with the generation inputs (`format_version`,
//!   `build_id`, `run_seed`, `level_index`, `requests`).
//! - Lines 2+: one record per accepted simulation input, each chained to its
//!   predecessor through `prev_sha256_hex`/`sha256_hex`.
//!
//! Writing flushes each record immediately so the file survives crashes.
//! Loading validates every line's JSON shape and hash chain and stops at the
//! first invalid or incomplete line, returning the valid prefix.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::journal::{InputJournal, InputPayload, InputRecord};
use crate::mapgen::SpawnRequest;

/// First line of the JSONL journal file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct FileHeader {
    format_version: u16,
    build_id: String,
    run_seed: u64,
    level_index: u8,
    requests: Vec<SpawnRequest>,
}

/// Fields hashed for a record, serialized to JSON and concatenated with
/// `prev_sha256_hex`.
#[derive(Serialize)]
struct RecordBody {
    seq: u64,
    tick: u64,
    payload: InputPayload,
}

/// Full record line written to the JSONL file.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct FileRecord {
    seq: u64,
    tick: u64,
    payload: InputPayload,
    prev_sha256_hex: String,
    sha256_hex: String,
}

/// The previous-hash value of the first record in a chain.
pub const INITIAL_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

fn compute_record_sha256(body_json: &str, prev_sha256_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body_json.as_bytes());
    hasher.update(prev_sha256_hex.as_bytes());
    let digest = hasher.finalize();
    format!("{digest:064x}")
}

#[derive(Debug)]
pub enum JournalFileError {
    Io(io::Error),
    MalformedHeader,
}

impl From<io::Error> for JournalFileError {
    fn from(error: io::Error) -> Self {
        JournalFileError::Io(error)
    }
}

/// Appends simulation inputs to a JSONL file with a SHA-256 hash chain.
pub struct JournalWriter {
    writer: BufWriter<File>,
    last_sha256_hex: String,
    next_seq: u64,
}

impl JournalWriter {
    /// Creates a new journal file, writing the header line immediately.
    pub fn create(
        path: &Path,
        run_seed: u64,
        level_index: u8,
        requests: &[SpawnRequest],
        build_id: &str,
    ) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header = FileHeader {
            format_version: 1,
            build_id: build_id.to_string(),
            run_seed,
            level_index,
            requests: requests.to_vec(),
        };
        let header_json = serde_json::to_string(&header).map_err(io::Error::other)?;
        writeln!(writer, "{header_json}")?;
        writer.flush()?;

        Ok(Self { writer, last_sha256_hex: INITIAL_HASH.to_string(), next_seq: 0 })
    }

    /// Resumes appending to a journal previously validated by `load`.
    pub fn resume(path: &Path, last_sha256_hex: String, next_seq: u64) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self { writer: BufWriter::new(file), last_sha256_hex, next_seq })
    }

    /// Appends one record and flushes it, returning its sequence number.
    pub fn append(&mut self, tick: u64, payload: InputPayload) -> io::Result<u64> {
        let seq = self.next_seq;
        let body = RecordBody { seq, tick, payload };
        let body_json = serde_json::to_string(&body).map_err(io::Error::other)?;
        let sha256_hex = compute_record_sha256(&body_json, &self.last_sha256_hex);

        let record = FileRecord {
            seq,
            tick,
            payload,
            prev_sha256_hex: self.last_sha256_hex.clone(),
            sha256_hex: sha256_hex.clone(),
        };
        let record_json = serde_json::to_string(&record).map_err(io::Error::other)?;
        writeln!(self.writer, "{record_json}")?;
        self.writer.flush()?;

        self.last_sha256_hex = sha256_hex;
        self.next_seq += 1;
        Ok(seq)
    }
}

/// A journal recovered from disk: the valid record prefix plus the chain
/// state a `JournalWriter::resume` needs.
#[derive(Debug)]
pub struct LoadedJournal {
    pub journal: InputJournal,
    pub last_sha256_hex: String,
    pub next_seq: u64,
}

/// Loads and validates a journal file. Records after the first malformed or
/// chain-breaking line are discarded; the valid prefix is returned.
pub fn load(path: &Path) -> Result<LoadedJournal, JournalFileError> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();

    let header: FileHeader = lines
        .next()
        .and_then(|line| serde_json::from_str(line).ok())
        .ok_or(JournalFileError::MalformedHeader)?;

    let mut journal = InputJournal::new(header.run_seed, header.level_index, header.requests);
    journal.build_id = header.build_id;

    let mut last_sha256_hex = INITIAL_HASH.to_string();
    let mut next_seq = 0_u64;
    for line in lines {
        let Ok(record) = serde_json::from_str::<FileRecord>(line) else {
            break;
        };
        if record.seq != next_seq || record.prev_sha256_hex != last_sha256_hex {
            break;
        }
        let body = RecordBody { seq: record.seq, tick: record.tick, payload: record.payload };
        let body_json = serde_json::to_string(&body).map_err(io::Error::other)?;
        if compute_record_sha256(&body_json, &record.prev_sha256_hex) != record.sha256_hex {
            break;
        }

        journal.inputs.push(InputRecord {
            seq: record.seq,
            tick: record.tick,
            payload: record.payload,
        });
        last_sha256_hex = record.sha256_hex;
        next_seq += 1;
    }

    Ok(LoadedJournal { journal, last_sha256_hex, next_seq })
}
