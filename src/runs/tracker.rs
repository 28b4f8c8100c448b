use crate::db::Store;
use crate::research::{extract_citations, AgentEvent, ResearchAgent};
use crate::types::{AppError, Result};
use futures::StreamExt;
use std::sync::Arc;

/// Executes a research run to completion, recording every agent event.
///
/// This is the body of the background task behind a `QUEUED` run. Errors
/// never escape: any failure marks the run `FAILED` with the error message
/// and appends a terminal error event to the log feed.
pub async fn execute_run(store: Arc<Store>, run_id: String, query: String, agent: ResearchAgent) {
    if let Err(e) = run_to_completion(&store, &run_id, &query, &agent).await {
        tracing::error!(run_id = %run_id, error = %e, "Research run failed");
        record_failure(&store, &run_id, &e).await;
    }
}

async fn run_to_completion(
    store: &Store,
    run_id: &str,
    query: &str,
    agent: &ResearchAgent,
) -> Result<()> {
    // The run row can be gone by the time the task is scheduled, e.g. the
    // user account was deleted and the cascade took the run with it.
    let Some(_run) = store.get_run(run_id).await? else {
        tracing::warn!(run_id = %run_id, "Run no longer exists, skipping execution");
        return Ok(());
    };

    store.mark_run_in_progress(run_id).await?;
    tracing::info!(run_id = %run_id, "Research run started");

    let stream = agent.research(query);
    futures::pin_mut!(stream);

    let mut report = String::new();
    while let Some(event) = stream.next().await {
        let event = event?;
        let details = serde_json::to_string(&event)
            .map_err(|e| AppError::Internal(format!("Failed to serialize event: {}", e)))?;

        store.append_log(run_id, event.kind(), &details).await?;

        if let AgentEvent::ResponseChunk { content } = &event {
            report.push_str(content);
        }
    }

    store.complete_run(run_id, &report).await?;

    for citation in extract_citations(&report) {
        store
            .add_citation(run_id, &citation.title, &citation.url, citation.source_type)
            .await?;
    }

    tracing::info!(run_id = %run_id, report_len = report.len(), "Research run completed");
    Ok(())
}

async fn record_failure(store: &Store, run_id: &str, error: &AppError) {
    let message = error.to_string();

    if let Err(e) = store.fail_run(run_id, &message).await {
        tracing::error!(run_id = %run_id, error = %e, "Failed to mark run as failed");
    }

    let event = AgentEvent::Error { message };
    match serde_json::to_string(&event) {
        Ok(details) => {
            if let Err(e) = store.append_log(run_id, event.kind(), &details).await {
                tracing::error!(run_id = %run_id, error = %e, "Failed to append error event");
            }
        }
        Err(e) => {
            tracing::error!(run_id = %run_id, error = %e, "Failed to serialize error event");
        }
    }
}
