use std::time::Duration;

use colored::*;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::types::{PortResult, PortStatus, ScanRequest, ScanSummary};

/// Label for open ports the catalog has no description for.
const UNKNOWN_SERVICE: &str = "Unknown service";

/// Two-line startup banner naming the target and the scan parameters.
pub fn banner(host: &str, request: &ScanRequest) -> String {
    format!(
        "Scanning {} ({})\nFrom port {} to {} with a timeout of {}.",
        host.yellow(),
        request.addr.to_string().yellow(),
        request.from_port.to_string().blue(),
        request.to_port.to_string().blue(),
        format!("{}ms", request.timeout.as_millis()).blue()
    )
}

/// One line per probed port: dot-padded port number, status, and the service
/// label for open ports.
pub fn port_line(result: &PortResult) -> String {
    let status = match result.status {
        PortStatus::Open => "open.".green(),
        PortStatus::Closed => "closed.".red(),
    };
    let mut line = format!(
        "{}{} {}",
        dot_pad(result.port).bright_black(),
        result.port.to_string().blue(),
        status
    );
    if result.is_open() {
        line.push(' ');
        line.push_str(result.service.as_deref().unwrap_or(UNKNOWN_SERVICE));
    }
    line
}

/// Periodic progress estimate, emitted between port lines.
pub fn progress_line(finished: u64, total: u64, remaining: Duration) -> String {
    format!(
        "Scanned approximately {} of {} ports. Estimated {} left..",
        finished.to_string().yellow(),
        total.to_string().yellow(),
        format_duration(remaining).yellow()
    )
}

/// Final report: open ports in ascending order with their service labels,
/// then start/end timestamps and the wall-clock duration.
pub fn summary(
    scan: &ScanSummary,
    started: OffsetDateTime,
    ended: OffsetDateTime,
    took: Duration,
) -> String {
    let mut out = String::from("Open Ports:\n");

    if scan.open.is_empty() {
        out.push_str(&format!(
            "{}\n",
            "No ports are open in the given range.".bright_black()
        ));
    } else {
        for result in &scan.open {
            out.push_str(&format!(
                "{}{}: {}\n",
                dot_pad(result.port).bright_black(),
                result.port.to_string().blue(),
                result.service.as_deref().unwrap_or(UNKNOWN_SERVICE)
            ));
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "Started: {}\n",
        format_timestamp(started).yellow()
    ));
    out.push_str(&format!(
        "Ended{}: {}\n",
        "..".bright_black(),
        format_timestamp(ended).yellow()
    ));
    out.push_str(&format!(
        "Took{}: {}",
        "...".bright_black(),
        format_duration(took).yellow()
    ));
    out
}

/// Notice printed when the user interrupts a running scan.
pub fn abort_notice() -> String {
    "Aborted by user! Cleaning up open probes.."
        .magenta()
        .to_string()
}

/// RFC 3339 UTC timestamp.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

/// Seconds with one decimal; minutes and whole seconds past the one-minute
/// mark so long estimates stay readable.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs >= 60.0 {
        let mins = (secs / 60.0) as u64;
        format!("{}m {:.0}s", mins, secs - mins as f64 * 60.0)
    } else {
        format!("{secs:.1}s")
    }
}

// Ports are at most five digits wide; shorter numbers get dimmed leading
// dots so status columns line up.
fn dot_pad(port: u16) -> String {
    ".".repeat(5 - port.to_string().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn banner_names_target_and_parameters() {
        plain();
        let request = ScanRequest::new(Ipv4Addr::LOCALHOST, 1, 1024, Duration::from_millis(250))
            .unwrap();
        assert_eq!(
            banner("localhost", &request),
            "Scanning localhost (127.0.0.1)\nFrom port 1 to 1024 with a timeout of 250ms."
        );
    }

    #[test]
    fn port_lines_pad_to_five_columns() {
        plain();
        assert_eq!(port_line(&PortResult::closed(80)), "...80 closed.");
        assert_eq!(
            port_line(&PortResult::open(65535, Some("Reserved".into()))),
            "65535 open. Reserved"
        );
    }

    #[test]
    fn open_line_defaults_to_unknown_service() {
        plain();
        assert_eq!(
            port_line(&PortResult::open(8080, None)),
            ".8080 open. Unknown service"
        );
    }

    #[test]
    fn progress_line_reports_counts_and_estimate() {
        plain();
        assert_eq!(
            progress_line(50, 1000, Duration::from_secs(19)),
            "Scanned approximately 50 of 1000 ports. Estimated 19.0s left.."
        );
    }

    #[test]
    fn summary_lists_open_ports_with_labels() {
        plain();
        let scan = ScanSummary {
            total: 100,
            finished: 100,
            open: vec![
                PortResult::open(22, Some("SSH".into())),
                PortResult::open(80, None),
            ],
        };
        let text = summary(
            &scan,
            OffsetDateTime::UNIX_EPOCH,
            OffsetDateTime::UNIX_EPOCH,
            Duration::from_secs(3),
        );
        assert!(text.starts_with("Open Ports:\n...22: SSH\n...80: Unknown service\n"));
        assert!(text.contains("Started: 1970-01-01T00:00:00Z"));
        assert!(text.contains("Ended..: 1970-01-01T00:00:00Z"));
        assert!(text.ends_with("Took...: 3.0s"));
    }

    #[test]
    fn summary_reports_when_nothing_is_open() {
        plain();
        let scan = ScanSummary {
            total: 10,
            finished: 10,
            open: Vec::new(),
        };
        let text = summary(
            &scan,
            OffsetDateTime::UNIX_EPOCH,
            OffsetDateTime::UNIX_EPOCH,
            Duration::from_secs(1),
        );
        assert!(text.contains("No ports are open in the given range."));
    }

    #[test]
    fn durations_render_in_seconds_then_minutes() {
        assert_eq!(format_duration(Duration::from_millis(9500)), "9.5s");
        assert_eq!(format_duration(Duration::from_secs(59)), "59.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
    }
}
