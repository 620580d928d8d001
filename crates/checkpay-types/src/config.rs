//! Configuration for the check lifecycle engine.

use serde::{Deserialize, Serialize};

use crate::{CheckPaymentError, JournalKind, Result, constants};

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display name given to newly created records.
    pub draft_name: String,
    /// Journal kinds a check may post against.
    pub allowed_journal_kinds: Vec<JournalKind>,
    /// Upper bound on records per batch call.
    pub max_batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            draft_name: constants::DEFAULT_DRAFT_NAME.to_string(),
            allowed_journal_kinds: vec![JournalKind::Bank, JournalKind::Cash],
            max_batch_size: constants::DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing keys take their defaults.
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, `Configuration` if the result
    /// fails [`EngineConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns `Configuration` describing the first bad setting.
    pub fn validate(&self) -> Result<()> {
        if self.draft_name.trim().is_empty() {
            return Err(CheckPaymentError::Configuration(
                "draft_name must not be blank".into(),
            ));
        }
        if self.allowed_journal_kinds.is_empty() {
            return Err(CheckPaymentError::Configuration(
                "allowed_journal_kinds must name at least one journal kind".into(),
            ));
        }
        if self.max_batch_size == 0 {
            return Err(CheckPaymentError::Configuration(
                "max_batch_size must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.draft_name, "Draft Check Payment");
        assert_eq!(
            cfg.allowed_journal_kinds,
            vec![JournalKind::Bank, JournalKind::Cash]
        );
        assert_eq!(cfg.max_batch_size, 1_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_keys() {
        let cfg = EngineConfig::from_json(r#"{"max_batch_size": 10}"#).unwrap();
        assert_eq!(cfg.max_batch_size, 10);
        assert_eq!(cfg.draft_name, "Draft Check Payment");
    }

    #[test]
    fn from_json_rejects_empty_journal_kinds() {
        let err = EngineConfig::from_json(r#"{"allowed_journal_kinds": []}"#).unwrap_err();
        assert!(matches!(err, CheckPaymentError::Configuration(_)));
    }

    #[test]
    fn from_json_rejects_malformed() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CheckPaymentError::Serialization(_)));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = EngineConfig {
            draft_name: "New Check".into(),
            allowed_journal_kinds: vec![JournalKind::Cash],
            max_batch_size: 5,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"cash\""));
        let back = EngineConfig::from_json(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
