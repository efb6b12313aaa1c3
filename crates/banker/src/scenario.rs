//! Scenario files
//!
//! A scenario is a [`LedgerConfig`] in JSON:
//!
//! ```json
//! {
//!   "available": [3, 3, 2],
//!   "max": [[7, 5, 3], [3, 2, 2]],
//!   "allocation": [[0, 1, 0], [2, 0, 0]],
//!   "limits": { "max_processes": 10, "max_resources": 10 }
//! }
//! ```
//!
//! `allocation` and `limits` are optional.

use std::fs;
use std::path::Path;

use banker_core::LedgerConfig;

use crate::error::SystemError;

/// Parse a scenario from JSON text.
pub fn parse(json: &str) -> Result<LedgerConfig, SystemError> {
    let config: LedgerConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Read and parse a scenario file.
pub fn load(path: impl AsRef<Path>) -> Result<LedgerConfig, SystemError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SystemError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

/// The classic five-process, three-class textbook state.
pub fn textbook() -> LedgerConfig {
    LedgerConfig::new(
        vec![3, 3, 2],
        vec![
            vec![7, 5, 3],
            vec![3, 2, 2],
            vec![9, 0, 2],
            vec![2, 2, 2],
            vec![4, 3, 3],
        ],
    )
    .with_allocation(vec![
        vec![0, 1, 0],
        vec![2, 0, 0],
        vec![3, 0, 2],
        vec![2, 1, 1],
        vec![0, 0, 2],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_core::{ConfigError, Limits};
    use std::io::Write;

    #[test]
    fn test_parse_minimal() {
        let config = parse(r#"{ "available": [1, 2], "max": [[1, 1], [0, 2]] }"#).unwrap();
        assert_eq!(config.processes(), 2);
        assert_eq!(config.resources(), 2);
        assert_eq!(config.allocation, None);
        assert_eq!(config.limits, Limits::default());
    }

    #[test]
    fn test_parse_full() {
        let json = r#"{
            "available": [3],
            "max": [[4]],
            "allocation": [[1]],
            "limits": { "max_processes": 2, "max_resources": 1 }
        }"#;
        let config = parse(json).unwrap();
        assert_eq!(config.allocation, Some(vec![vec![1]]));
        assert_eq!(config.limits.max_processes, 2);
    }

    #[test]
    fn test_parse_rejects_inconsistent_config() {
        let err = parse(r#"{ "available": [1], "max": [[1]], "allocation": [[2]] }"#).unwrap_err();
        assert!(matches!(
            err,
            SystemError::Config(ConfigError::AllocationExceedsMax { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        assert!(matches!(parse("{ nope"), Err(SystemError::Parse(_))));
        // Negative units are not representable
        assert!(matches!(
            parse(r#"{ "available": [-1], "max": [[1]] }"#),
            Err(SystemError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&textbook()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config, textbook());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SystemError::Io { .. }));
    }
}
