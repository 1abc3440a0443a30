use std::time::Duration;

/// Linear time-remaining extrapolation over the whole scan so far.
///
/// Returns `None` until at least one probe has finished, since the per-port
/// average would otherwise divide by zero. This is a whole-run average, not a
/// moving one: recent probe latency moves the estimate only in proportion to
/// its share of all completions.
pub fn estimate_remaining(finished: u64, total: u64, elapsed: Duration) -> Option<Duration> {
    if finished == 0 {
        return None;
    }
    let ms_per_port = elapsed.as_millis() as f64 / finished as f64;
    let remaining_ms = total.saturating_sub(finished) as f64 * ms_per_port;
    Some(Duration::from_secs_f64(remaining_ms / 1000.0))
}
