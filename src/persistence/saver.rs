//! Change-driven saving of the form document
//!
//! Every observed document that differs from the last dispatched one is
//! sent to the [`SaveSink`] at once. Saves are never cancelled or retried,
//! and may complete in any order; the sink must let newer snapshots
//! overwrite older ones.

use super::logging::{SaveContext, log_completed, log_dispatched, log_failed};
use crate::config::EditorConfig;
use crate::schema::Form;
use async_trait::async_trait;
use log::debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Persistence collaborator
#[async_trait]
pub trait SaveSink: Send + Sync {
    async fn save(&self, form: Form) -> anyhow::Result<()>;
}

/// Host-level error reporting for failed saves
pub trait ErrorNotifier: Send + Sync {
    fn notify(&self, error: &anyhow::Error);
}

impl<F> ErrorNotifier for F
where
    F: Fn(&anyhow::Error) + Send + Sync,
{
    fn notify(&self, error: &anyhow::Error) {
        self(error)
    }
}

/// Notifier that only relies on the save log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnly;

impl ErrorNotifier for LogOnly {
    fn notify(&self, _error: &anyhow::Error) {}
}

/// "Saving..." indicator shared with the host
#[derive(Debug, Clone, Default)]
pub struct SaveStatus {
    pending: Arc<AtomicUsize>,
}

impl SaveStatus {
    /// True while any save is in flight or settling
    pub fn is_saving(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    fn begin(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct AutoSaver {
    sink: Arc<dyn SaveSink>,
    notifier: Arc<dyn ErrorNotifier>,
    config: EditorConfig,
    last: Option<Form>,
    sequence: u64,
    status: SaveStatus,
}

impl AutoSaver {
    pub fn new(sink: Arc<dyn SaveSink>, notifier: Arc<dyn ErrorNotifier>, config: &EditorConfig) -> Self {
        Self {
            sink,
            notifier,
            config: config.clone(),
            last: None,
            sequence: 0,
            status: SaveStatus::default(),
        }
    }

    /// Treat `form` as already saved, e.g. the document that was loaded
    pub fn with_snapshot(mut self, form: &Form) -> Self {
        self.last = Some(form.clone());
        self
    }

    pub fn status(&self) -> SaveStatus {
        self.status.clone()
    }

    /// Sequence number of the latest dispatched save (0 before the first)
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn last_snapshot(&self) -> Option<&Form> {
        self.last.as_ref()
    }

    /// Dispatch a save if `form` differs from the last dispatched snapshot
    ///
    /// Must be called from within a tokio runtime. The snapshot is updated
    /// on dispatch, before the save completes. The returned handle resolves
    /// once the save has finished and its settle delay has elapsed.
    pub fn observe(&mut self, form: &Form) -> Option<JoinHandle<()>> {
        if self.last.as_ref() == Some(form) {
            debug!("Form unchanged since save {}, skipping", self.sequence);
            return None;
        }

        self.sequence += 1;
        self.last = Some(form.clone());

        let context = SaveContext::new(self.sequence, form.sections().len());
        log_dispatched(&context);

        let snapshot = form.clone();
        let sink = Arc::clone(&self.sink);
        let notifier = Arc::clone(&self.notifier);
        let status = self.status.clone();
        let settle = self.config.settle_delay();

        status.begin();
        Some(tokio::spawn(async move {
            match sink.save(snapshot).await {
                Ok(()) => {
                    log_completed(&context);
                    tokio::time::sleep(settle).await;
                }
                Err(err) => {
                    log_failed(&context, &err);
                    notifier.notify(&err);
                }
            }
            status.finish();
        }))
    }
}

/// Sink keeping every saved document in memory, in completion order
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    saved: Arc<Mutex<Vec<Form>>>,
    failing: Arc<AtomicBool>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn saved(&self) -> Vec<Form> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SaveSink for MemorySink {
    async fn save(&self, form: Form) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("save rejected for form '{}'", form.name);
        }
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(form);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use std::time::Duration;

    fn saver(sink: &MemorySink, config: &EditorConfig) -> AutoSaver {
        AutoSaver::new(Arc::new(sink.clone()), Arc::new(LogOnly), config)
    }

    #[tokio::test]
    async fn test_unchanged_form_is_not_saved() {
        let sink = MemorySink::new();
        let ids = SequentialIds::new(1);
        let form = Form::with_first_section("Survey", &ids);
        let mut saver = saver(&sink, &EditorConfig::testing()).with_snapshot(&form);

        assert!(saver.observe(&form).is_none());
        assert_eq!(saver.sequence(), 0);
        assert!(sink.saved().is_empty());
    }

    #[tokio::test]
    async fn test_each_distinct_edit_dispatches_a_save() {
        let sink = MemorySink::new();
        let ids = SequentialIds::new(1);
        let mut form = Form::with_first_section("Survey", &ids);
        let mut saver = saver(&sink, &EditorConfig::testing());

        let first = saver.observe(&form).unwrap();
        form.add_question(0, &ids).unwrap();
        let second = saver.observe(&form).unwrap();
        assert!(saver.observe(&form).is_none());

        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(saver.sequence(), 2);
        assert_eq!(sink.saved().len(), 2);
        assert_eq!(saver.last_snapshot(), Some(&form));
    }

    #[tokio::test]
    async fn test_status_stays_saving_during_settle() {
        let sink = MemorySink::new();
        let ids = SequentialIds::new(1);
        let form = Form::with_first_section("Survey", &ids);
        let mut config = EditorConfig::testing();
        config.settle_delay_ms = 50;
        let mut saver = saver(&sink, &config);
        let status = saver.status();

        let handle = saver.observe(&form).unwrap();
        assert!(status.is_saving());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(status.is_saving());

        handle.await.unwrap();
        assert!(!status.is_saving());
    }

    #[tokio::test]
    async fn test_failure_is_reported_and_not_retried() {
        let sink = MemorySink::new();
        sink.set_failing(true);
        let errors = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&errors);
        let notifier = move |err: &anyhow::Error| seen.lock().unwrap().push(err.to_string());

        let ids = SequentialIds::new(1);
        let form = Form::with_first_section("Survey", &ids);
        let mut saver = AutoSaver::new(
            Arc::new(sink.clone()),
            Arc::new(notifier),
            &EditorConfig::testing(),
        );

        saver.observe(&form).unwrap().await.unwrap();
        assert_eq!(errors.lock().unwrap().len(), 1);
        assert!(saver.observe(&form).is_none());
        assert!(!saver.status().is_saving());
    }
}
