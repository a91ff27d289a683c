//! Incremental parsing of the image build progress stream.
//!
//! `POST /build` answers with a sequence of JSON objects, one per progress
//! step, separated by newlines or simply concatenated. None of them is a
//! definitive success event: the built image is only named inside a
//! `stream` line reading `Successfully built <id>`, so every event has to be
//! scanned to the end.

use std::io::{BufReader, Read};
use std::sync::OnceLock;

use dockwire_common::constants::BUILD_ID_MISSING;
use dockwire_common::error::{DockwireError, Result};
use regex::Regex;
use serde::Deserialize;

/// One decoded element of the build stream.
///
/// Keys other than `stream`, `status`, and `error` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BuildEvent {
    /// Build output text.
    #[serde(default)]
    pub stream: Option<String>,
    /// Progress status line.
    #[serde(default)]
    pub status: Option<String>,
    /// Error reported by the daemon.
    #[serde(default)]
    pub error: Option<String>,
}

/// The recognised part of a [`BuildEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildEventKind<'a> {
    /// Build output text.
    Stream(&'a str),
    /// Progress status line.
    Status(&'a str),
    /// Error reported by the daemon.
    Error(&'a str),
    /// None of the recognised keys is present.
    Inert,
}

impl BuildEvent {
    /// Returns the first recognised field, checking `error`, `stream`, then `status`.
    #[must_use]
    pub fn kind(&self) -> BuildEventKind<'_> {
        if let Some(text) = &self.error {
            BuildEventKind::Error(text)
        } else if let Some(text) = &self.stream {
            BuildEventKind::Stream(text)
        } else if let Some(text) = &self.status {
            BuildEventKind::Status(text)
        } else {
            BuildEventKind::Inert
        }
    }
}

/// What a build stream established so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Image id from the most recent success marker.
    pub image_id: Option<String>,
    /// Error texts reported by the daemon, in order.
    pub errors: Vec<String>,
}

#[allow(clippy::expect_used)]
fn success_marker() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)^.*Successfully built ([0-9a-f]+)").expect("success marker pattern is valid")
    })
}

/// Extracts the image id from the last success marker in `text`.
#[must_use]
pub fn extract_image_id(text: &str) -> Option<&str> {
    success_marker()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Single-pass consumer of build events.
#[derive(Debug, Default)]
pub struct BuildEventParser {
    outcome: BuildOutcome,
}

impl BuildEventParser {
    /// Creates a parser with an empty outcome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event into the outcome.
    ///
    /// Errors are recorded but do not stop the build from being parsed; a
    /// later success marker still counts.
    pub fn observe(&mut self, event: &BuildEvent) {
        if let Some(text) = &event.stream {
            tracing::debug!(text = text.trim_end(), "build output");
            if let Some(id) = extract_image_id(text) {
                self.outcome.image_id = Some(id.to_string());
            }
        }
        if let Some(status) = &event.status {
            tracing::debug!(status = status.as_str(), "build status");
        }
        if let Some(error) = &event.error {
            tracing::warn!(error = error.as_str(), "daemon reported build error");
            self.outcome.errors.push(error.clone());
        }
    }

    /// Returns the outcome accumulated so far.
    #[must_use]
    pub const fn outcome(&self) -> &BuildOutcome {
        &self.outcome
    }

    /// Ends the stream and returns the built image id.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::Build` if no event named an image.
    pub fn finish(self) -> Result<String> {
        let BuildOutcome { image_id, errors } = self.outcome;
        image_id.ok_or_else(|| DockwireError::Build {
            message: BUILD_ID_MISSING.to_string(),
            daemon_errors: errors,
        })
    }
}

/// Parses already-decoded events.
///
/// # Errors
///
/// Returns the first decoding error from `events`, or `DockwireError::Build`
/// if no event named an image.
pub fn parse<I>(events: I) -> Result<String>
where
    I: IntoIterator<Item = Result<BuildEvent>>,
{
    let mut parser = BuildEventParser::new();
    for event in events {
        parser.observe(&event?);
    }
    parser.finish()
}

/// Decodes and parses a build stream as it arrives from `reader`.
///
/// `on_event` sees every event before it is folded into the outcome. Only the
/// current event is held in memory.
///
/// # Errors
///
/// Returns `DockwireError::Serialization` if the stream holds something other
/// than JSON objects, or `DockwireError::Build` if no event named an image.
pub fn parse_stream<R: Read>(reader: R, mut on_event: impl FnMut(&BuildEvent)) -> Result<String> {
    let events = serde_json::Deserializer::from_reader(BufReader::new(reader))
        .into_iter::<BuildEvent>()
        .map(|event| -> Result<BuildEvent> {
            let event = event?;
            on_event(&event);
            Ok(event)
        });
    parse(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(text: &str) -> Result<BuildEvent> {
        Ok(BuildEvent {
            stream: Some(text.into()),
            ..BuildEvent::default()
        })
    }

    #[test]
    fn extracts_id_from_marker() {
        assert_eq!(
            extract_image_id("...Successfully built abc123def..."),
            Some("abc123def")
        );
        assert_eq!(extract_image_id("Step 1/2 : FROM busybox\n"), None);
    }

    #[test]
    fn marker_is_case_sensitive() {
        assert_eq!(extract_image_id("successfully built abc123\n"), None);
        assert_eq!(extract_image_id("Successfully built ABC123\n"), None);
    }

    #[test]
    fn last_marker_within_one_text_wins() {
        let text = "Successfully built aaa111\nSuccessfully built bbb222\n";
        assert_eq!(extract_image_id(text), Some("bbb222"));
    }

    #[test]
    fn two_step_build_yields_id() {
        let id = parse([stream("Step 1/2\n"), stream("Successfully built 5f4abc\n")]).unwrap();
        assert_eq!(id, "5f4abc");
    }

    #[test]
    fn later_matching_event_overwrites_earlier_one() {
        let id = parse([
            stream("Successfully built 111aaa\n"),
            stream("Successfully built 222bbb\n"),
        ])
        .unwrap();
        assert_eq!(id, "222bbb");
    }

    #[test]
    fn no_marker_is_a_build_error() {
        let err = parse([stream("Step 1/1 : FROM busybox\n")]).unwrap_err();
        assert!(matches!(err, DockwireError::Build { .. }));
        assert_eq!(err.to_string(), "Can't obtain ID from build output stream.");
    }

    #[test]
    fn empty_stream_is_a_build_error() {
        assert!(matches!(
            parse(std::iter::empty()),
            Err(DockwireError::Build { .. })
        ));
    }

    #[test]
    fn error_event_does_not_stop_parsing() {
        let mut parser = BuildEventParser::new();
        parser.observe(&BuildEvent {
            error: Some("pull access denied".into()),
            ..BuildEvent::default()
        });
        parser.observe(&BuildEvent {
            stream: Some("Successfully built 0ff1ce\n".into()),
            ..BuildEvent::default()
        });
        assert_eq!(parser.outcome().errors, vec!["pull access denied"]);
        assert_eq!(parser.finish().unwrap(), "0ff1ce");
    }

    #[test]
    fn daemon_errors_are_carried_on_failure() {
        let events = [Ok(BuildEvent {
            error: Some("COPY failed".into()),
            ..BuildEvent::default()
        })];
        match parse(events) {
            Err(DockwireError::Build { daemon_errors, .. }) => {
                assert_eq!(daemon_errors, vec!["COPY failed"]);
            }
            other => panic!("expected build error, got {other:?}"),
        }
    }

    #[test]
    fn kind_prefers_error_then_stream_then_status() {
        let mut event = BuildEvent {
            stream: Some("Step 2/2\n".into()),
            status: Some("Extracting".into()),
            error: Some("no space left on device".into()),
        };
        assert_eq!(event.kind(), BuildEventKind::Error("no space left on device"));
        event.error = None;
        assert_eq!(event.kind(), BuildEventKind::Stream("Step 2/2\n"));
        event.stream = None;
        assert_eq!(event.kind(), BuildEventKind::Status("Extracting"));
    }

    #[test]
    fn status_and_unknown_events_are_inert() {
        let status = BuildEvent {
            status: Some("Downloading".into()),
            ..BuildEvent::default()
        };
        assert_eq!(status.kind(), BuildEventKind::Status("Downloading"));
        assert_eq!(BuildEvent::default().kind(), BuildEventKind::Inert);

        let mut parser = BuildEventParser::new();
        parser.observe(&status);
        parser.observe(&BuildEvent::default());
        assert_eq!(parser.outcome(), &BuildOutcome::default());
    }

    #[test]
    fn stream_decoder_accepts_newline_delimited_objects() {
        let body = concat!(
            "{\"stream\":\"Step 1/2 : FROM busybox\\n\"}\n",
            "{\"status\":\"Pulling\",\"progressDetail\":{}}\n",
            "{\"stream\":\"Successfully built 5f4abc\\n\"}\n",
        );
        let mut seen = 0;
        let id = parse_stream(body.as_bytes(), |_| seen += 1).unwrap();
        assert_eq!(id, "5f4abc");
        assert_eq!(seen, 3);
    }

    #[test]
    fn stream_decoder_accepts_concatenated_objects() {
        let body = r#"{"stream":"Step 1/1\n"}{"aux":{"ID":"sha256:ff"}}{"stream":"Successfully built 77ee\n"}"#;
        assert_eq!(parse_stream(body.as_bytes(), |_| {}).unwrap(), "77ee");
    }

    #[test]
    fn non_object_element_is_a_decode_error() {
        let body = r#"{"stream":"Successfully built 77ee\n"} "oops""#;
        assert!(matches!(
            parse_stream(body.as_bytes(), |_| {}),
            Err(DockwireError::Serialization { .. })
        ));
    }
}
