//! Structured step logging for workflow runs
//!
//! Logs are collected in memory and returned with the execution result;
//! persisting them is the caller's concern. Every emission is mirrored to
//! `tracing` so a run is observable without consuming the returned log.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Started,
    Completed,
    Error,
    Info,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Started => "started",
            LogStatus::Completed => "completed",
            LogStatus::Error => "error",
            LogStatus::Info => "info",
        }
    }
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single execution log entry.
///
/// Entries are append-only and never mutated after emission; ordering is
/// emission order. Timestamps serialize as ISO-8601.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub step_name: String,
    pub status: LogStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    fn new(
        step_name: impl Into<String>,
        status: LogStatus,
        message: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            status,
            message: message.into(),
            metadata,
            timestamp: Utc::now(),
        }
    }

    /// Step duration in milliseconds, when one was recorded
    pub fn duration_ms(&self) -> Option<u64> {
        self.metadata.get("duration_ms").and_then(|v| v.as_u64())
    }
}

/// Collects structured logs during one workflow run.
///
/// Start timestamps are keyed by step name; step names are not required to
/// be unique across a run (several knowledge-base nodes all log under
/// "Knowledge Base"), so a new start for a name overwrites the pending one.
#[derive(Debug)]
pub struct ExecutionLogger {
    execution_id: String,
    workflow_id: Option<String>,
    logs: Vec<LogEntry>,
    step_start_times: HashMap<String, Instant>,
}

impl ExecutionLogger {
    /// Create a logger for one run
    pub fn new(execution_id: impl Into<String>, workflow_id: Option<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
            workflow_id,
            logs: Vec::new(),
            step_start_times: HashMap::new(),
        }
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.workflow_id.as_deref()
    }

    /// Log the start of a workflow step
    pub fn start_step(
        &mut self,
        step_name: &str,
        message: impl Into<String>,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        self.step_start_times
            .insert(step_name.to_string(), Instant::now());

        let message = non_empty_or(message.into(), || format!("Starting {}", step_name));
        tracing::debug!(execution_id = %self.execution_id, step = step_name, "{}", message);
        self.logs.push(LogEntry::new(
            step_name,
            LogStatus::Started,
            message,
            metadata.unwrap_or_default(),
        ));
    }

    /// Log the successful completion of a workflow step
    pub fn complete_step(
        &mut self,
        step_name: &str,
        message: impl Into<String>,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        let metadata = self.with_duration(step_name, metadata.unwrap_or_default());

        let message = non_empty_or(message.into(), || format!("Completed {}", step_name));
        tracing::debug!(execution_id = %self.execution_id, step = step_name, "{}", message);
        self.logs.push(LogEntry::new(
            step_name,
            LogStatus::Completed,
            message,
            metadata,
        ));
    }

    /// Log an error in a workflow step
    pub fn error_step(
        &mut self,
        step_name: &str,
        error_message: impl Into<String>,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        let metadata = self.with_duration(step_name, metadata.unwrap_or_default());

        let error_message = error_message.into();
        tracing::warn!(execution_id = %self.execution_id, step = step_name, "{}", error_message);
        self.logs.push(LogEntry::new(
            step_name,
            LogStatus::Error,
            error_message,
            metadata,
        ));
    }

    /// Log an informational message for a step; never touches duration
    /// tracking
    pub fn info(
        &mut self,
        step_name: &str,
        message: impl Into<String>,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        let message = message.into();
        tracing::debug!(execution_id = %self.execution_id, step = step_name, "{}", message);
        self.logs.push(LogEntry::new(
            step_name,
            LogStatus::Info,
            message,
            metadata.unwrap_or_default(),
        ));
    }

    /// Get the collected log entries in emission order
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Consume the logger, yielding the collected log
    pub fn into_logs(self) -> Vec<LogEntry> {
        self.logs
    }

    /// Inject `duration_ms` when a start is pending for this step name;
    /// durations are omitted (not zero) without a matching start.
    fn with_duration(
        &mut self,
        step_name: &str,
        mut metadata: HashMap<String, serde_json::Value>,
    ) -> HashMap<String, serde_json::Value> {
        if let Some(started) = self.step_start_times.remove(step_name) {
            let duration_ms = started.elapsed().as_millis() as u64;
            metadata.insert("duration_ms".to_string(), serde_json::json!(duration_ms));
        }
        metadata
    }
}

fn non_empty_or(message: String, fallback: impl FnOnce() -> String) -> String {
    if message.is_empty() {
        fallback()
    } else {
        message
    }
}
