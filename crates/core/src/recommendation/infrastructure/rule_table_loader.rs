use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::recommendation::domain::rule_table::RuleTable;

#[derive(Error, Debug)]
pub enum RuleTableError {
    #[error("failed to read rule table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rule table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rule table has no rules")]
    Empty,
    #[error("rule for {service} has no conditions")]
    NoConditions { service: String },
}

/// Parses and validates a JSON rule table.
pub fn parse_rule_table(json: &str) -> Result<RuleTable, RuleTableError> {
    let table: RuleTable = serde_json::from_str(json)?;
    if table.is_empty() {
        return Err(RuleTableError::Empty);
    }
    if let Some(rule) = table.rules().iter().find(|r| r.conditions.is_empty()) {
        return Err(RuleTableError::NoConditions {
            service: rule.service.clone(),
        });
    }
    Ok(table)
}

/// Loads a rules file. The result replaces the built-in menu entirely.
pub fn load_rule_table(path: &Path) -> Result<RuleTable, RuleTableError> {
    let json = fs::read_to_string(path).map_err(|source| RuleTableError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_rule_table(&json)?;
    log::info!("Loaded {} rules from {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ONE_RULE: &str = r#"{"rules": [{
        "service": "Hydra Facial",
        "conditions": [{"metric": "texture_roughness", "op": "gt", "threshold": 40}],
        "reason": "Texture score is {score}.",
        "expected_effect": "Smoother skin.",
        "estimated_improvement_pct": 18.0
    }]}"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ONE_RULE.as_bytes()).unwrap();
        let table = load_rule_table(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rules()[0].service, "Hydra Facial");
        assert!(table.rules()[0].projection.is_empty());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rule_table(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RuleTableError::Read { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            parse_rule_table("{\"rules\": [").unwrap_err(),
            RuleTableError::Parse(_)
        ));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(matches!(
            parse_rule_table(r#"{"rules": []}"#).unwrap_err(),
            RuleTableError::Empty
        ));
    }

    #[test]
    fn test_rule_without_conditions_is_rejected() {
        let json = ONE_RULE.replace(
            r#"[{"metric": "texture_roughness", "op": "gt", "threshold": 40}]"#,
            "[]",
        );
        match parse_rule_table(&json).unwrap_err() {
            RuleTableError::NoConditions { service } => assert_eq!(service, "Hydra Facial"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
