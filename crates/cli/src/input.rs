//! Reading input documents from a file or stdin.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::CliError;

/// Read the whole input, refusing anything larger than `max_bytes`.
pub fn read_input(file: Option<&Path>, max_bytes: usize) -> Result<String, CliError> {
    match file {
        Some(path) => {
            log::debug!("Reading input from: {}", path.display());
            read_limited(File::open(path)?, max_bytes)
        }
        None => {
            log::debug!("Reading input from stdin");
            read_limited(io::stdin().lock(), max_bytes)
        }
    }
}

fn read_limited<R: Read>(reader: R, max_bytes: usize) -> Result<String, CliError> {
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut content = String::new();
    reader.take(limit).read_to_string(&mut content)?;

    if content.len() > max_bytes {
        return Err(CliError::Input(format!(
            "input exceeds the limit of {} bytes",
            max_bytes
        )));
    }
    Ok(content)
}
