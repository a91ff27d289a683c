//! Formatted output helpers for CLI commands.

use std::io::{self, Write};

use dockwire_client::build::BuildEvent;

/// Length of the abbreviated IDs shown to users.
const SHORT_ID_LEN: usize = 12;

/// Prints a `Label: value` line with aligned values.
pub fn print_field(label: &str, value: &str) {
    println!("{:<12} {value}", format!("{label}:"));
}

/// Abbreviates a daemon ID, dropping any `sha256:` prefix.
#[must_use]
pub fn short_id(id: &str) -> &str {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Writes every field a build progress event carries.
///
/// `stream` text is written unchanged and `status` as a line, both to `out`.
/// Daemon errors go to `err` prefixed with `ERROR:`.
///
/// # Errors
///
/// Returns the first write error from either sink.
pub fn write_build_event(
    event: &BuildEvent,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    if let Some(text) = &event.stream {
        write!(out, "{text}")?;
    }
    if let Some(text) = &event.status {
        writeln!(out, "{text}")?;
    }
    if let Some(text) = &event.error {
        writeln!(err, "ERROR: {text}")?;
    }
    out.flush()
}

/// Renders a build progress event on the terminal.
pub fn render_build_event(event: &BuildEvent) {
    let (mut out, mut err) = (io::stdout().lock(), io::stderr().lock());
    if let Err(e) = write_build_event(event, &mut out, &mut err) {
        tracing::debug!(error = %e, "build progress not written");
    }
}

/// Formats a byte count into a human-readable string (e.g. "2.0 KiB").
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for &next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_strips_digest_prefix() {
        assert_eq!(
            short_id("sha256:b750fe79269d2ec9a3c593ef05b4332b1d1a02a62b4accb2c21d589ff2f5f2dc"),
            "b750fe79269d"
        );
    }

    #[test]
    fn short_id_leaves_short_ids_alone() {
        assert_eq!(short_id("5f4abc"), "5f4abc");
    }

    #[test]
    fn build_event_writes_every_present_field() {
        let event = BuildEvent {
            stream: Some("Step 1/2 : FROM busybox\n".into()),
            status: Some("Pulling fs layer".into()),
            error: Some("pull access denied".into()),
        };
        let (mut out, mut err) = (Vec::new(), Vec::new());
        write_build_event(&event, &mut out, &mut err).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Step 1/2 : FROM busybox\nPulling fs layer\n"
        );
        assert_eq!(String::from_utf8(err).expect("utf8"), "ERROR: pull access denied\n");
    }

    #[test]
    fn inert_build_event_writes_nothing() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        write_build_event(&BuildEvent::default(), &mut out, &mut err).expect("write");
        assert!(out.is_empty() && err.is_empty());
    }

    #[test]
    fn format_bytes_picks_unit() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(134_217_728), "128.0 MiB");
        assert_eq!(format_bytes(2_147_483_648), "2.0 GiB");
    }
}
