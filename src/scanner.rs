use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::catalog::ServiceCatalog;
use crate::probe;
use crate::progress;
use crate::state::ScanState;
use crate::types::{ScanEvent, ScanRequest, ScanSummary};

/// Completions between successive progress events.
pub const PROGRESS_INTERVAL: u64 = 50;

/// Upper bound on in-flight connect attempts. Probes are short-lived and
/// I/O-bound, so this only guards against socket exhaustion.
const MAX_IN_FLIGHT: usize = 512;

/// Scan every port in the request's range with bounded concurrency.
///
/// - One task per port; a `Semaphore` permit is acquired before each spawn
///   and rides inside the task, capping in-flight connects.
/// - Cancellation is cooperative: the submission loop stops spawning once
///   the token is cancelled, and spawned tasks re-check before probing.
///   Probes already past that check run to completion and are recorded.
/// - Emits one `ScanEvent::Port` per completed probe and a
///   `ScanEvent::Progress` estimate every `PROGRESS_INTERVAL` completions.
/// - Returns only after every spawned task has joined; the returned summary
///   is the final state, partial if the scan was cancelled.
pub async fn scan_range(
    request: ScanRequest,
    catalog: Arc<ServiceCatalog>,
    cancel: CancellationToken,
    events: UnboundedSender<ScanEvent>,
) -> ScanSummary {
    let state = Arc::new(ScanState::new(request.total_ports()));
    let sem = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
    let mut set = JoinSet::new();

    for port in request.ports() {
        if cancel.is_cancelled() {
            break;
        }
        let permit = sem
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore in scope");
        let addr = SocketAddr::from((request.addr, port));
        let timeout = request.timeout;
        let catalog = catalog.clone();
        let state = state.clone();
        let cancel = cancel.clone();
        let events = events.clone();

        set.spawn(async move {
            let _permit = permit; // keep permit until the probe completes

            if cancel.is_cancelled() {
                return;
            }

            let result = probe::probe_port(addr, timeout, &catalog).await;
            state.record(&result).await;
            let _ = events.send(ScanEvent::Port(result));

            if state.take_batch(PROGRESS_INTERVAL).await {
                let (finished, total) = state.counts().await;
                if let Some(remaining) =
                    progress::estimate_remaining(finished, total, state.elapsed())
                {
                    let _ = events.send(ScanEvent::Progress {
                        finished,
                        total,
                        remaining,
                    });
                }
            }
        });
    }

    while set.join_next().await.is_some() {}

    state.snapshot().await
}
