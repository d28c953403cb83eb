use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Reads the newline-delimited id list from `source`.
///
/// The first line is a header and is always discarded. Every following line
/// is parsed as a non-negative integer; lines that do not parse are skipped
/// with a diagnostic. File order and duplicates are preserved.
pub fn read_ids(source: &Path) -> Result<Vec<u64>> {
    info!(action = "start", component = "id_loading", file_path = ?source, "Reading id list");

    let file = File::open(source)
        .with_context(|| format!("Failed to open id source file {:?}", source))?;
    let mut lines = BufReader::new(file).lines();

    // First line is a header, discarded regardless of content
    if let Some(header) = lines.next() {
        header?;
    }

    let mut ids = Vec::new();
    for line in lines {
        let line = line?;
        match line.trim().parse::<u64>() {
            Ok(id) => ids.push(id),
            Err(_) => {
                info!(
                    action = "skip",
                    component = "id_loading",
                    line = %line,
                    "Invalid id detected in input file"
                );
            }
        }
    }

    if ids.is_empty() {
        warn!(action = "complete", component = "id_loading", "No valid ids found in input file");
    } else {
        info!(
            action = "complete",
            component = "id_loading",
            id_count = ids.len(),
            "Id list loaded"
        );
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_source(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn skips_header_and_invalid_lines() {
        let file = write_source(&["id", "101", "abc", "202"]);
        let ids = read_ids(file.path()).unwrap();
        assert_eq!(ids, vec![101, 202]);
    }

    #[test]
    fn header_is_discarded_even_if_numeric() {
        let file = write_source(&["999", "101"]);
        let ids = read_ids(file.path()).unwrap();
        assert_eq!(ids, vec![101]);
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let file = write_source(&["id", "7", "3", "7", "7"]);
        let ids = read_ids(file.path()).unwrap();
        assert_eq!(ids, vec![7, 3, 7, 7]);
    }

    #[test]
    fn header_only_file_yields_empty_list() {
        let file = write_source(&["id"]);
        let ids = read_ids(file.path()).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn empty_file_yields_empty_list() {
        let file = NamedTempFile::new().unwrap();
        let ids = read_ids(file.path()).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn negative_ids_are_skipped() {
        let file = write_source(&["id", "-5", "42"]);
        let ids = read_ids(file.path()).unwrap();
        assert_eq!(ids, vec![42]);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let file = write_source(&["id", "  314  "]);
        let ids = read_ids(file.path()).unwrap();
        assert_eq!(ids, vec![314]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_ids(Path::new("/nonexistent/ids.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to open id source file"));
    }
}
