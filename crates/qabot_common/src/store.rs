//! Knowledge base persistence
//!
//! The whole knowledge base is rewritten on every save; the file is never
//! appended to in place.

use crate::error::StoreError;
use crate::knowledge::KnowledgeBase;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Knowledge base file used when nothing else is configured
pub const DEFAULT_KB_PATH: &str = "knowledge_base.json";

/// Where a session's knowledge base lives
pub trait KnowledgeStore {
    /// Read the stored knowledge base
    fn load(&self) -> Result<KnowledgeBase, StoreError>;

    /// Replace the stored knowledge base with `kb`
    fn save(&self, kb: &KnowledgeBase) -> Result<(), StoreError>;
}

/// Knowledge base kept in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KnowledgeStore for JsonFileStore {
    fn load(&self) -> Result<KnowledgeBase, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Read {
                path: self.path.clone(),
                source: e,
            },
        })?;

        let kb = parse_knowledge_base(&content, &self.path)?;
        debug!(path = %self.path.display(), entries = kb.len(), "Loaded knowledge base");
        Ok(kb)
    }

    fn save(&self, kb: &KnowledgeBase) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        // A bare file name has an empty parent, which create_dir_all rejects
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(kb).map_err(StoreError::Serialize)?;
        fs::write(&self.path, content).map_err(write_err)?;

        debug!(path = %self.path.display(), entries = kb.len(), "Saved knowledge base");
        Ok(())
    }
}

/// Parse and validate knowledge base JSON.
///
/// Valid JSON is not enough: the document must be an object with an array
/// under `question`, and every entry needs a string `question`.
pub fn parse_knowledge_base(content: &str, path: &Path) -> Result<KnowledgeBase, StoreError> {
    let invalid = |reason: String| StoreError::InvalidStructure {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(content).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match value.get("question") {
        Some(Value::Array(_)) => {}
        Some(other) => {
            return Err(invalid(format!(
                "\"question\" must be a list, found {}",
                json_type_name(other)
            )))
        }
        None if value.is_object() => return Err(invalid("missing \"question\" key".to_string())),
        None => {
            return Err(invalid(format!(
                "expected an object, found {}",
                json_type_name(&value)
            )))
        }
    }

    serde_json::from_value(value).map_err(|e| invalid(format!("malformed entry: {}", e)))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Result of [`load_or_empty`]: always a usable knowledge base, plus the
/// problem that forced a fallback, if any
#[derive(Debug)]
pub struct Loaded {
    pub kb: KnowledgeBase,
    pub warning: Option<StoreError>,
}

/// Load the knowledge base, substituting an empty one on any failure
pub fn load_or_empty(store: &dyn KnowledgeStore) -> Loaded {
    match store.load() {
        Ok(kb) => Loaded { kb, warning: None },
        Err(e) => {
            warn!(kind = e.kind(), "{}. Starting with an empty knowledge base.", e);
            Loaded {
                kb: KnowledgeBase::new(),
                warning: Some(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::QaPair;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("knowledge_base.json"))
    }

    #[test]
    fn test_missing_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = load_or_empty(&store_in(&dir));

        assert!(loaded.kb.is_empty());
        assert!(matches!(loaded.warning, Some(StoreError::NotFound(_))));
    }

    #[test]
    fn test_invalid_json_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        let loaded = load_or_empty(&store);
        assert!(loaded.kb.is_empty());
        assert!(matches!(loaded.warning, Some(StoreError::Json { .. })));
    }

    #[test]
    fn test_question_not_a_list_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"question": "not-a-list"}"#).unwrap();

        let loaded = load_or_empty(&store);
        assert!(loaded.kb.is_empty());
        match loaded.warning {
            Some(StoreError::InvalidStructure { reason, .. }) => {
                assert!(reason.contains("a string"), "reason was: {}", reason)
            }
            other => panic!("expected InvalidStructure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_and_wrong_root() {
        let path = Path::new("kb.json");
        assert!(matches!(
            parse_knowledge_base(r#"{"answers": []}"#, path),
            Err(StoreError::InvalidStructure { .. })
        ));
        assert!(matches!(
            parse_knowledge_base("[1, 2, 3]", path),
            Err(StoreError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn test_malformed_entry_is_invalid() {
        let path = Path::new("kb.json");
        let result = parse_knowledge_base(r#"{"question": [{"answer": "orphan"}]}"#, path);
        assert!(matches!(result, Err(StoreError::InvalidStructure { .. })));

        let result = parse_knowledge_base(r#"{"question": [42]}"#, path);
        assert!(matches!(result, Err(StoreError::InvalidStructure { .. })));
    }

    #[test]
    fn test_null_answer_keeps_whole_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"question":[{"question":"Hi","answer":"Hello!"},{"question":"Where?","answer":null}]}"#,
        )
        .unwrap();

        let loaded = load_or_empty(&store);
        assert!(loaded.warning.is_none(), "warning: {:?}", loaded.warning);
        assert_eq!(loaded.kb.len(), 2);
        assert_eq!(loaded.kb.entries()[0].answer, "Hello!");
        assert!(!loaded.kb.entries()[1].has_answer());
    }

    #[test]
    fn test_empty_list_is_valid() {
        let kb = parse_knowledge_base(r#"{"question": []}"#, Path::new("kb.json")).unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn test_load_save_load_is_stable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"question": [
                {"question": "Hi", "answer": "Hello!"},
                {"question": "hi", "answer": "Duplicate"},
                {"question": "Colour?", "answer": "Blue", "source": "user"}
            ], "meta": {"v": 1}}"#,
        )
        .unwrap();

        let first = store.load().unwrap();
        store.save(&first).unwrap();
        let second = store.load().unwrap();

        assert_eq!(first, second);
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn test_save_writes_pretty_json_and_creates_parent() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("kb.json"));
        let kb = KnowledgeBase::from_pairs(vec![QaPair::new("What is your name?", "Assistant")]);

        store.save(&kb).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\n  \"question\": ["));
        assert_eq!(store.load().unwrap(), kb);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // The target path is a directory, so the write must fail
        let store = JsonFileStore::new(dir.path());

        let err = store.save(&KnowledgeBase::new()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn test_unreadable_path_is_read_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());

        let loaded = load_or_empty(&store);
        assert!(loaded.kb.is_empty());
        assert!(matches!(loaded.warning, Some(StoreError::Read { .. })));
    }
}
