//! Program source loading.
//!
//! Format: the first line holds comma-separated base-10 words. Anything after
//! the first line belongs to the caller, not the VM.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{VmError, VmResult};

/// Parses the first line of `source`.
pub fn parse_program(source: &str) -> VmResult<Vec<i64>> {
    let line = source.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split(',')
        .enumerate()
        .map(|(index, token)| {
            let token = token.trim();
            token.parse().map_err(|_| VmError::MalformedProgram {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Reads one line from `reader` and parses it.
pub fn load_reader<R: BufRead>(mut reader: R) -> VmResult<Vec<i64>> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    parse_program(&line)
}

pub fn load<P: AsRef<Path>>(path: P) -> VmResult<Vec<i64>> {
    let file = File::open(path.as_ref())?;
    load_reader(BufReader::new(file))
}
