//! Storm file loading.
//!
//! A storm file holds the particle count followed by one `position value`
//! pair per particle, all whitespace-separated integers.

use anyhow::Context;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use storms_core::{Particle, Storm};
use thiserror::Error;
use tracing::info;

/// Upper bound on the up-front allocation; larger storms grow as they parse.
const MAX_PREALLOCATED_PARTICLES: usize = 1 << 16;

#[derive(Debug, Error)]
pub enum StormFileError {
    #[error("missing particle count")]
    MissingCount,
    #[error("invalid particle count {0:?}")]
    InvalidCount(String),
    #[error("element {index}: expected `position value`, found end of file")]
    MissingElement { index: usize },
    #[error("element {index}: invalid integer {token:?}")]
    InvalidValue { index: usize, token: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Parses one storm from `reader`. Content after the last particle is ignored.
pub fn parse_storm<R: BufRead>(mut reader: R) -> Result<Storm, StormFileError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let mut tokens = content.split_whitespace();

    let count_token = tokens.next().ok_or(StormFileError::MissingCount)?;
    let count: usize = count_token
        .parse()
        .map_err(|_| StormFileError::InvalidCount(count_token.to_string()))?;

    let mut particles = Vec::with_capacity(count.min(MAX_PREALLOCATED_PARTICLES));
    for index in 0..count {
        let position = next_int(&mut tokens, index)?;
        let raw_value = next_int(&mut tokens, index)?;
        particles.push(Particle::new(position, raw_value));
    }
    Ok(Storm::new(particles))
}

fn next_int<'a, I>(tokens: &mut I, index: usize) -> Result<i32, StormFileError>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or(StormFileError::MissingElement { index })?;
    token.parse().map_err(|_| StormFileError::InvalidValue {
        index,
        token: token.to_string(),
    })
}

pub fn read_storm_file(path: &Path) -> anyhow::Result<Storm> {
    let file =
        File::open(path).with_context(|| format!("Failed to open storm file {}", path.display()))?;
    let storm = parse_storm(BufReader::new(file))
        .with_context(|| format!("Failed to read storm file {}", path.display()))?;
    info!(
        file = %path.display(),
        particles = storm.len(),
        "Storm loaded"
    );
    Ok(storm)
}

/// Loads every storm before the simulation starts, so malformed input aborts the run early.
pub fn read_storm_files(paths: &[PathBuf]) -> anyhow::Result<Vec<Storm>> {
    paths.iter().map(|p| read_storm_file(p)).collect()
}
