//! Background worker thread: fetch and analysis run here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Each
//! request carries an id; the main thread drops answers to ids it no longer
//! waits for, and the worker skips requests already superseded in its queue.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use fastinvest_core::{AnalysisPipeline, AnalysisRequest, EnrichedSeries, PipelineError};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Analyze { id: u64, request: AnalysisRequest },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Analyzed {
        id: u64,
        outcome: Result<EnrichedSeries, PipelineError>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    pipeline: AnalysisPipeline,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("fastinvest-worker".into())
        .spawn(move || worker_loop(pipeline, rx, tx))
}

fn worker_loop(pipeline: AnalysisPipeline, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    while let Ok(first) = rx.recv() {
        match latest_pending(first, &rx) {
            WorkerCommand::Shutdown => break,
            WorkerCommand::Analyze { id, request } => {
                let outcome = pipeline.run(&request);
                if let Err(err) = &outcome {
                    tracing::warn!(id, symbol = %request.symbol, error = %err, "analysis failed");
                }
                if tx.send(WorkerResponse::Analyzed { id, outcome }).is_err() {
                    break;
                }
            }
        }
    }
    tracing::debug!("analysis worker stopped");
}

/// Drain queued commands, keeping only the newest. Shutdown wins.
fn latest_pending(first: WorkerCommand, rx: &Receiver<WorkerCommand>) -> WorkerCommand {
    let mut latest = first;
    if matches!(latest, WorkerCommand::Shutdown) {
        return latest;
    }
    while let Ok(next) = rx.try_recv() {
        if let WorkerCommand::Analyze { id, .. } = &latest {
            tracing::debug!(id, "skipping superseded analysis request");
        }
        latest = next;
        if matches!(latest, WorkerCommand::Shutdown) {
            break;
        }
    }
    latest
}
