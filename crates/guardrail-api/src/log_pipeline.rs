//! Async detection log pipeline (§4.7): the detection/proxy hot path never
//! waits on Postgres. A handler builds a [`LogEntry`] and sends it down a
//! bounded channel; a background task appends it to a JSONL file for
//! durability and then upserts it into `detection_results`.
//!
//! The front half (the channel send) is non-blocking by construction: a full
//! channel means the log record is dropped rather than backpressuring the
//! request, with a counter bump so the drop is visible in metrics.

use guardrail_store::repo::detection;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One detection outcome destined for `detection_results` (§3 DetectionResult).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub request_id: Uuid,
    pub application_id: Uuid,
    pub tenant_id: Uuid,
    pub content: String,
    pub security_risk_level: String,
    pub security_categories: Vec<String>,
    pub compliance_risk_level: String,
    pub compliance_categories: Vec<String>,
    pub data_risk_level: String,
    pub data_categories: Vec<String>,
    pub suggest_action: String,
    pub suggest_answer: Option<String>,
    pub model_response: Option<String>,
    pub score: Option<f32>,
    pub image_paths: Vec<String>,
}

/// Handle the handlers hold: cloneable, cheap, never blocks on a full
/// channel (drops and counts instead).
#[derive(Clone)]
pub struct LogSender {
    tx: mpsc::Sender<LogEntry>,
    dropped: Arc<AtomicU64>,
}

impl LogSender {
    pub fn submit(&self, entry: LogEntry) {
        if self.tx.try_send(entry).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("detection log channel full, dropping entry");
            metrics::counter!("guardrail_log_pipeline_dropped_total").increment(1);
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Spawn the background writer task and return the front-half [`LogSender`].
/// `data_dir` holds the JSONL durability file; `tail_interval` is currently
/// unused by the inline writer below but kept so a future split into a
/// genuine tail-from-offset process is a config-compatible change.
pub fn spawn(pool: PgPool, data_dir: PathBuf, channel_capacity: usize) -> LogSender {
    let (tx, rx) = mpsc::channel(channel_capacity);
    let dropped = Arc::new(AtomicU64::new(0));

    tokio::spawn(run(pool, data_dir, rx));

    LogSender { tx, dropped }
}

async fn run(pool: PgPool, data_dir: PathBuf, mut rx: mpsc::Receiver<LogEntry>) {
    if let Err(e) = tokio::fs::create_dir_all(&data_dir).await {
        tracing::error!(error = %e, dir = %data_dir.display(), "failed to create log pipeline data dir");
    }

    let journal_path = data_dir.join("detection_results.jsonl");

    while let Some(entry) = rx.recv().await {
        if let Err(e) = append_journal(&journal_path, &entry).await {
            tracing::error!(error = %e, request_id = %entry.request_id, "failed to append detection journal entry");
        }

        if let Err(e) = persist(&pool, &entry).await {
            tracing::error!(error = %e, request_id = %entry.request_id, "failed to persist detection result");
        }
    }
}

async fn append_journal(path: &std::path::Path, entry: &LogEntry) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(entry).unwrap_or_default();
    line.push(b'\n');

    let mut file = tokio::fs::OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(&line).await
}

async fn persist(pool: &PgPool, entry: &LogEntry) -> guardrail_store::Result<()> {
    detection::insert(
        pool,
        entry.request_id,
        entry.application_id,
        entry.tenant_id,
        &entry.content,
        &entry.security_risk_level,
        &entry.security_categories,
        &entry.compliance_risk_level,
        &entry.compliance_categories,
        &entry.data_risk_level,
        &entry.data_categories,
        &entry.suggest_action,
        entry.suggest_answer.as_deref(),
        entry.model_response.as_deref(),
        entry.score,
        &entry.image_paths,
    )
    .await
}
