//! Static sender blocklist, loaded once at startup.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use meshmap_types::NodeNum;

use crate::NetworkError;

/// Read a blocklist file: one decimal node number per line.
///
/// Lines that are not a plain decimal `u32` (comments, blanks, `!hex` ids)
/// are skipped.
pub fn load_blocklist(path: &Path) -> Result<HashSet<NodeNum>, NetworkError> {
    let file = File::open(path).map_err(|source| NetworkError::Blocklist {
        path: path.to_path_buf(),
        source,
    })?;
    read_blocklist(BufReader::new(file)).map_err(|source| NetworkError::Blocklist {
        path: path.to_path_buf(),
        source,
    })
}

fn read_blocklist(reader: impl BufRead) -> std::io::Result<HashSet<NodeNum>> {
    let mut blocked = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        if !line.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(num) = line.parse::<u32>() {
            let node = NodeNum::new(num);
            tracing::info!(node = %node, "node blocked");
            blocked.insert(node);
        }
    }
    Ok(blocked)
}
