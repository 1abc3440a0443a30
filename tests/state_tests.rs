use std::sync::Arc;

use portsweep::state::ScanState;
use portsweep::types::PortResult;

// Record-then-take from many tasks at once; the batch flag must fire exactly
// once per threshold completions regardless of interleaving.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_recorders_batch_exactly() {
    const PORTS: u16 = 500;
    const THRESHOLD: u64 = 50;

    let state = Arc::new(ScanState::new(u64::from(PORTS)));
    let mut handles = Vec::new();

    for port in 1..=PORTS {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            let result = if port % 7 == 0 {
                PortResult::open(port, None)
            } else {
                PortResult::closed(port)
            };
            state.record(&result).await;
            state.take_batch(THRESHOLD).await
        }));
    }

    let mut batches = 0u64;
    for handle in handles {
        if handle.await.expect("recorder task ok") {
            batches += 1;
        }
    }

    assert_eq!(batches, u64::from(PORTS) / THRESHOLD);

    let (finished, total) = state.counts().await;
    assert_eq!(finished, u64::from(PORTS));
    assert_eq!(total, u64::from(PORTS));
}

#[tokio::test]
async fn snapshot_sorts_open_ports_and_keeps_services() {
    let state = ScanState::new(10);

    state.record(&PortResult::open(8080, None)).await;
    state.record(&PortResult::closed(23)).await;
    state
        .record(&PortResult::open(22, Some("Secure Shell".into())))
        .await;
    state.record(&PortResult::open(443, Some("HTTPS".into()))).await;
    state.record(&PortResult::closed(25)).await;

    let summary = state.snapshot().await;
    assert_eq!(summary.finished, 5);
    assert_eq!(summary.total, 10);

    let ports: Vec<u16> = summary.open.iter().map(|r| r.port).collect();
    assert_eq!(ports, vec![22, 443, 8080]);
    assert_eq!(summary.open[0].service.as_deref(), Some("Secure Shell"));
}
