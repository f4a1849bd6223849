//! Shared utilities for operations across musclemap crates.
//!
//! Provides DRY helpers for:
//! - Serialization with consistent error handling
//! - CSV building
//! - File format detection and whole-file reads/writes

use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Generic JSON serialization with consistent error handling
/// Works with any type that implements Serialize (including slices)
pub fn to_json_string<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| Error::other(format!("Failed to serialize {} as JSON: {}", context, e)))
}

/// Generic CSV serialization builder
/// Use the CSVBuilder fluent API to construct and export CSV data
pub struct CSVBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CSVBuilder {
    /// Create a new CSV with headers
    pub fn new(headers: Vec<&str>) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row of data
    pub fn add_row(mut self, values: Vec<&str>) -> Self {
        self.rows.push(values.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Add a row of data from owned strings
    pub fn add_row_owned(mut self, values: Vec<String>) -> Self {
        self.rows.push(values);
        self
    }

    /// Build the CSV string
    pub fn build(self) -> String {
        let mut csv = self.headers.join(",") + "\n";
        for row in self.rows {
            let escaped: Vec<String> = row.iter().map(|v| escape_csv_field(v)).collect();
            csv.push_str(&escaped.join(","));
            csv.push('\n');
        }
        csv
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline
fn escape_csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialized file formats understood by the loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            other => Err(Error::config_error(format!(
                "Unsupported file extension {:?} for {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Read a whole file, mapping a missing file to [`Error::FileNotFound`]
pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    Ok(fs::read_to_string(path)?)
}

/// Write a whole file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        Error::config_error(format!("Failed to write {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_to_json_string() {
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        let json = to_json_string(&data, "test_data").unwrap();
        assert!(json.contains("test"));
        assert!(json.contains("42"));
    }

    #[test]
    fn test_csv_builder() {
        let csv = CSVBuilder::new(vec!["node", "score"])
            .add_row(vec!["lats", "3"])
            .add_row(vec!["rear, delts", "1"])
            .build();

        assert!(csv.starts_with("node,score\n"));
        assert!(csv.contains("lats,3"));
        assert!(csv.contains("\"rear, delts\",1"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yml")).unwrap(), Format::Yaml);
        assert!(Format::from_path(Path::new("a")).is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
