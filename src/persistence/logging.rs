//! Structured save logging with correlation ids

use log::{error, info};
use serde_json::json;
use std::time::{Duration, Instant};

/// One dispatched save, tracked from dispatch to completion
#[derive(Debug, Clone)]
pub struct SaveContext {
    pub correlation_id: String,
    pub sequence: u64,
    pub sections: usize,
    pub start_time: Instant,
}

impl SaveContext {
    pub fn new(sequence: u64, sections: usize) -> Self {
        Self {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            sections,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

pub fn log_dispatched(context: &SaveContext) {
    let log_data = json!({
        "event": "save_dispatched",
        "correlation_id": context.correlation_id,
        "sequence": context.sequence,
        "sections": context.sections,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });
    info!("Save Dispatched: {}", log_data);
}

pub fn log_completed(context: &SaveContext) {
    let log_data = json!({
        "event": "save_completed",
        "correlation_id": context.correlation_id,
        "sequence": context.sequence,
        "duration_ms": context.elapsed().as_millis(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });
    info!("Save Completed: {}", log_data);
}

pub fn log_failed(context: &SaveContext, err: &anyhow::Error) {
    let log_data = json!({
        "event": "save_failed",
        "correlation_id": context.correlation_id,
        "sequence": context.sequence,
        "duration_ms": context.elapsed().as_millis(),
        "error_message": format!("{:#}", err),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });
    error!("Save Failed: {}", log_data);
}
