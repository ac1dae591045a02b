//! # Seed Acquisition and Record
//!
//! A run is reproducible from its seed alone. The seed is read from the
//! first line of an input (stdin or a seed file); when that fails the run
//! still proceeds with a fresh seed and a warning. Before any output is
//! produced the seed is recorded as `<seed>.seed` so the run can be replayed
//! with `juwura-seed generate --seed-file <seed>.seed`.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::warn;

use crate::error::{Result, SeedError};

/// Extension of seed record files.
pub const SEED_RECORD_EXTENSION: &str = "seed";

/// Where the seed of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// Parsed from the input.
    Provided,
    /// Input was unreadable or unparsable; the seed was drawn from entropy.
    Fallback,
}

/// Parse a seed line: surrounding whitespace is ignored, the rest must be a
/// signed 64-bit decimal integer.
pub fn parse_seed_line(line: &str) -> Option<i64> {
    line.trim().parse().ok()
}

/// Read the seed from the first line of `reader`.
///
/// Never fails: a read or parse error is logged and replaced by a fresh
/// non-negative seed.
pub fn acquire_seed<R: BufRead>(mut reader: R) -> (i64, SeedSource) {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => warn!("No seed on input, generating a new one"),
        Ok(_) => match parse_seed_line(&line) {
            Some(seed) => return (seed, SeedSource::Provided),
            None => warn!("Can't parse seed {:?}, generating a new one", line.trim()),
        },
        Err(e) => warn!("Can't read seed: {}, generating a new one", e),
    }
    (fresh_seed(), SeedSource::Fallback)
}

/// A non-negative seed from process entropy.
pub fn fresh_seed() -> i64 {
    rand::rng().random_range(0..=i64::MAX)
}

/// Path of the record file for `seed` inside `dir`.
pub fn seed_record_path(dir: &Path, seed: i64) -> PathBuf {
    dir.join(format!("{}.{}", seed, SEED_RECORD_EXTENSION))
}

/// Write `"{seed}\n"` to `<dir>/<seed>.seed`.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed into place, so an interrupted run never leaves a truncated record.
pub fn write_seed_record(dir: &Path, seed: i64) -> Result<PathBuf> {
    let path = seed_record_path(dir, seed);
    let tmp_path = dir.join(format!(".{}.{}.tmp", seed, SEED_RECORD_EXTENSION));
    let record_err = |source| SeedError::SeedRecord {
        path: path.clone(),
        source,
    };

    let mut file = fs::File::create(&tmp_path).map_err(record_err)?;
    file.write_all(format!("{}\n", seed).as_bytes())
        .map_err(record_err)?;
    file.sync_all().map_err(record_err)?;
    fs::rename(&tmp_path, &path).map_err(record_err)?;

    Ok(path)
}
