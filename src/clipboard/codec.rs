//! Timestamped copy and paste of sections and questions

use super::store::ClipboardStore;
use crate::config::EditorConfig;
use crate::error::ClipboardError;
use crate::ids::{Clock, IdGenerator};
use crate::schema::{Question, Section};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the store holds under a clipboard key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardEntry<T> {
    pub payload: T,
    pub copied_at_millis: i64,
}

pub struct Clipboard<S: ClipboardStore> {
    store: S,
    clock: Arc<dyn Clock>,
    prefix: String,
    ttl_millis: i64,
}

impl<S: ClipboardStore> Clipboard<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>, config: &EditorConfig) -> Self {
        Self {
            store,
            clock,
            prefix: config.clipboard_prefix.clone(),
            ttl_millis: config.clipboard_ttl().as_millis() as i64,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn section_key(&self) -> String {
        format!("{}-section-copy", self.prefix)
    }

    pub fn question_key(&self) -> String {
        format!("{}-question-copy", self.prefix)
    }

    /// Copy the whole form; refused when every section is empty
    pub fn copy_sections(&self, sections: &[Section]) -> Result<(), ClipboardError> {
        if sections.iter().all(|s| s.questions().is_empty()) {
            return Err(ClipboardError::NothingToCopy);
        }
        self.write(&self.section_key(), sections)
    }

    /// Sections from the clipboard, each under a fresh id
    pub fn paste_sections(&self, ids: &dyn IdGenerator) -> Result<Vec<Section>, ClipboardError> {
        let mut sections: Vec<Section> = self.read(&self.section_key())?;
        if sections.is_empty() {
            warn!("Section clipboard entry holds no sections");
            return Err(ClipboardError::Empty);
        }
        for section in &mut sections {
            section.id = ids.next_id();
        }
        debug!("Pasted {} sections", sections.len());
        Ok(sections)
    }

    pub fn copy_question(&self, question: &Question) -> Result<(), ClipboardError> {
        self.write(&self.question_key(), question)
    }

    /// Question from the clipboard under a fresh id
    pub fn paste_question(&self, ids: &dyn IdGenerator) -> Result<Question, ClipboardError> {
        let mut question: Question = self.read(&self.question_key())?;
        question.id = ids.next_id();
        Ok(question)
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, payload: &T) -> Result<(), ClipboardError> {
        let entry = ClipboardEntry {
            payload,
            copied_at_millis: self.clock.now_millis(),
        };
        let value = serde_json::to_value(&entry).map_err(ClipboardError::Encode)?;
        self.store.set(key, value);
        debug!("Copied clipboard entry '{}'", key);
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T, ClipboardError> {
        let Some(raw) = self.store.get(key) else {
            warn!("Nothing to paste under '{}'", key);
            return Err(ClipboardError::Empty);
        };

        let entry: ClipboardEntry<T> =
            serde_json::from_value(raw).map_err(|source| {
                warn!("Clipboard entry '{}' is unreadable: {}", key, source);
                ClipboardError::Corrupt {
                    key: key.to_string(),
                    source,
                }
            })?;

        let age = self.clock.now_millis() - entry.copied_at_millis;
        if age > self.ttl_millis {
            self.store.remove(key);
            warn!("Clipboard entry '{}' expired, evicted", key);
            return Err(ClipboardError::Expired {
                key: key.to_string(),
                overdue_ms: age - self.ttl_millis,
            });
        }

        Ok(entry.payload)
    }
}
