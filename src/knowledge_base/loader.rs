//! JSON loading and saving for FAQ records and sample questions.
//!
//! FAQ file: an ordered array of `{question_full, question_keywords, answer}`.
//! Samples file: an array of strings, or an array of string arrays which is
//! flattened in order.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::FaqEntry;

/// Knowledge base load/save errors
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("Knowledge base I/O error ({}): {1}", .0.display())]
    Io(PathBuf, std::io::Error),
    #[error("Knowledge base parse error ({}): {1}", .0.display())]
    Parse(PathBuf, serde_json::Error),
    #[error("Knowledge base serialization error: {0}")]
    Serialize(serde_json::Error),
    #[error("Knowledge base has invalid entries: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SampleFile {
    Flat(Vec<String>),
    Nested(Vec<Vec<String>>),
}

impl SampleFile {
    fn flatten(self) -> Vec<String> {
        match self {
            SampleFile::Flat(v) => v,
            SampleFile::Nested(groups) => groups.into_iter().flatten().collect(),
        }
    }
}

/// Parse FAQ records from JSON text and check that every entry has an answer.
pub fn parse_entries(json: &str, origin: &Path) -> Result<Vec<FaqEntry>, KnowledgeBaseError> {
    let entries: Vec<FaqEntry> = serde_json::from_str(json)
        .map_err(|e| KnowledgeBaseError::Parse(origin.to_path_buf(), e))?;
    validate_entries(&entries)?;
    Ok(entries)
}

/// Every entry needs a non-empty answer.
pub fn validate_entries(entries: &[FaqEntry]) -> Result<(), KnowledgeBaseError> {
    let errors: Vec<String> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.answer.trim().is_empty())
        .map(|(i, e)| format!("entry {i} ('{}') has an empty answer", e.question_full))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(KnowledgeBaseError::Invalid(errors))
    }
}

pub fn read_entries(path: &Path) -> Result<Vec<FaqEntry>, KnowledgeBaseError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| KnowledgeBaseError::Io(path.to_path_buf(), e))?;
    parse_entries(&text, path)
}

pub fn read_samples(path: &Path) -> Result<Vec<String>, KnowledgeBaseError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| KnowledgeBaseError::Io(path.to_path_buf(), e))?;
    let file: SampleFile = serde_json::from_str(&text)
        .map_err(|e| KnowledgeBaseError::Parse(path.to_path_buf(), e))?;
    Ok(file
        .flatten()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

pub fn write_entries(path: &Path, entries: &[FaqEntry]) -> Result<(), KnowledgeBaseError> {
    let json = serde_json::to_string_pretty(entries).map_err(KnowledgeBaseError::Serialize)?;
    std::fs::write(path, json).map_err(|e| KnowledgeBaseError::Io(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let json = r#"[
            {"question_full": "q1", "question_keywords": ["a", "b"], "answer": "x"},
            {"question_full": "q2", "answer": "y"}
        ]"#;
        let entries = parse_entries(json, Path::new("inline")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question_keywords, vec!["a", "b"]);
        assert!(entries[1].question_keywords.is_empty());
    }

    #[test]
    fn test_empty_answer_rejected() {
        let json = r#"[{"question_full": "q1", "question_keywords": [], "answer": "  "}]"#;
        let err = parse_entries(json, Path::new("inline")).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Invalid(ref e) if e.len() == 1));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_entries("{not json", Path::new("faq.json")).unwrap_err();
        assert!(err.to_string().contains("faq.json"));
    }

    #[test]
    fn test_samples_flat_and_nested() {
        let dir = tempfile::tempdir().unwrap();
        let flat = dir.path().join("flat.json");
        std::fs::write(&flat, r#"["one", " two ", ""]"#).unwrap();
        assert_eq!(read_samples(&flat).unwrap(), vec!["one", "two"]);

        let nested = dir.path().join("nested.json");
        std::fs::write(&nested, r#"[["a", "b"], ["c"]]"#).unwrap();
        assert_eq!(read_samples(&nested).unwrap(), vec!["a", "b", "c"]);
    }
}
