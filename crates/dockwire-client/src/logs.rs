//! Decoding of the daemon's multiplexed log stream.
//!
//! When a container runs without a TTY, the logs endpoint interleaves stdout
//! and stderr in one body. Each frame is an 8-byte header followed by its
//! payload:
//!
//! ```text
//! [type: u8][0, 0, 0][length: u32 big-endian][payload; length]
//! ```

use dockwire_common::constants::FRAME_HEADER_LEN;
use dockwire_common::error::{DockwireError, Result};

/// Stream a frame was written to, taken from the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Standard input (only seen on attach streams).
    Stdin,
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
    /// Any other type byte.
    Unknown(u8),
}

impl From<u8> for StreamKind {
    fn from(byte: u8) -> Self {
        match byte {
            0 => Self::Stdin,
            1 => Self::Stdout,
            2 => Self::Stderr,
            other => Self::Unknown(other),
        }
    }
}

/// One frame borrowed from the raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Stream the payload belongs to.
    pub stream: StreamKind,
    /// Payload bytes, exactly as long as the header declared.
    pub payload: &'a [u8],
}

/// Iterator over the frames of a raw buffer, in stream order.
///
/// Yields a single `DockwireError::Framing` and then stops if the buffer ends
/// inside a header or a payload.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    raw: &'a [u8],
    offset: usize,
    failed: bool,
}

/// Returns an iterator over the frames in `raw`.
#[must_use]
pub const fn frames(raw: &[u8]) -> Frames<'_> {
    Frames {
        raw,
        offset: 0,
        failed: false,
    }
}

impl Frames<'_> {
    fn truncated(&mut self, needed: usize, remaining: usize) -> DockwireError {
        self.failed = true;
        DockwireError::Framing {
            offset: self.offset,
            needed,
            remaining,
        }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<Frame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.raw.len() {
            return None;
        }
        let rest = &self.raw[self.offset..];
        let Some((header, body)) = rest.split_first_chunk::<FRAME_HEADER_LEN>() else {
            return Some(Err(self.truncated(FRAME_HEADER_LEN, rest.len())));
        };

        let stream = StreamKind::from(header[0]);
        let length = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
        if body.len() < length {
            let needed = length.saturating_add(FRAME_HEADER_LEN);
            return Some(Err(self.truncated(needed, rest.len())));
        }

        self.offset += FRAME_HEADER_LEN + length;
        Some(Ok(Frame {
            stream,
            payload: &body[..length],
        }))
    }
}

/// Concatenates every frame payload of `raw` into one string.
///
/// Stdout and stderr are not separated: payloads are appended in arrival
/// order whatever their stream. Each payload is decoded on its own, with
/// invalid UTF-8 replaced by U+FFFD, so a character split across two frames
/// comes out as replacement characters.
///
/// # Errors
///
/// Returns `DockwireError::Framing` if the buffer ends inside a frame.
pub fn demux(raw: &[u8]) -> Result<String> {
    let mut output = String::with_capacity(raw.len());
    for frame in frames(raw) {
        output.push_str(&String::from_utf8_lossy(frame?.payload));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(kind: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![kind, 0, 0, 0];
        out.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn empty_input_is_empty_text() {
        assert_eq!(demux(&[]).unwrap(), "");
        assert_eq!(frames(&[]).count(), 0);
    }

    #[test]
    fn single_stdout_frame() {
        let raw = [
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x68, 0x65, 0x6c, 0x6c, 0x6f,
        ];
        assert_eq!(demux(&raw).unwrap(), "hello");
    }

    #[test]
    fn stdout_and_stderr_are_joined_in_arrival_order() {
        let mut raw = frame(1, b"out one\n");
        raw.extend(frame(2, b"err\n"));
        raw.extend(frame(1, b"out two\n"));
        assert_eq!(demux(&raw).unwrap(), "out one\nerr\nout two\n");
    }

    #[test]
    fn zero_length_frame_contributes_nothing() {
        let mut raw = frame(1, b"");
        raw.extend(frame(2, b"x"));
        raw.extend(frame(1, b""));
        assert_eq!(demux(&raw).unwrap(), "x");
        assert_eq!(frames(&raw).count(), 3);
    }

    #[test]
    fn frames_report_stream_kind() {
        let mut raw = frame(1, b"a");
        raw.extend(frame(2, b"b"));
        raw.extend(frame(7, b"c"));
        let kinds: Vec<_> = frames(&raw).map(|f| f.unwrap().stream).collect();
        assert_eq!(
            kinds,
            vec![StreamKind::Stdout, StreamKind::Stderr, StreamKind::Unknown(7)]
        );
    }

    #[test]
    fn declared_length_past_end_is_a_framing_error() {
        let mut raw = frame(1, b"ok");
        let good_len = raw.len();
        raw.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 10]);
        raw.extend_from_slice(b"abc");

        match demux(&raw) {
            Err(DockwireError::Framing {
                offset,
                needed,
                remaining,
            }) => {
                assert_eq!(offset, good_len);
                assert_eq!(needed, 18);
                assert_eq!(remaining, 11);
            }
            other => panic!("expected framing error, got {other:?}"),
        }
    }

    #[test]
    fn partial_header_is_a_framing_error() {
        let mut raw = frame(1, b"ok");
        raw.extend_from_slice(&[2, 0, 0]);
        assert!(matches!(
            demux(&raw),
            Err(DockwireError::Framing {
                needed: 8,
                remaining: 3,
                ..
            })
        ));
    }

    #[test]
    fn iteration_stops_after_framing_error() {
        let raw = [1, 0, 0, 0, 0, 0, 0, 4, b'a'];
        let mut it = frames(&raw);
        assert!(it.next().unwrap().is_err());
        assert!(it.next().is_none());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let raw = frame(1, b"ok\xff\n");
        assert_eq!(demux(&raw).unwrap(), "ok\u{fffd}\n");
    }

    #[test]
    fn multibyte_character_split_across_frames_is_replaced_per_frame() {
        let snowman = "\u{2603}".as_bytes();
        let mut raw = frame(1, &snowman[..1]);
        raw.extend(frame(2, &snowman[1..]));
        assert_eq!(demux(&raw).unwrap(), "\u{fffd}\u{fffd}\u{fffd}");
    }

    #[test]
    fn maximal_declared_length_reports_framing_error() {
        let raw = [1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff, b'a'];
        let expected = usize::try_from(u32::MAX).unwrap().saturating_add(FRAME_HEADER_LEN);
        assert!(matches!(
            demux(&raw),
            Err(DockwireError::Framing { offset: 0, needed, remaining: 9 }) if needed == expected
        ));
    }
}
