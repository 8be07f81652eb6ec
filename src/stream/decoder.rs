//! Newline-delimited JSON decoding.
//!
//! The streaming endpoint sends one JSON object per line and blank lines as
//! keep-alives. [`LineDecoder`] turns arbitrarily chunked bytes into complete
//! non-blank frames; [`decode_json_lines`] layers JSON decoding on top and
//! exposes the result as a lazy stream.

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::config::MalformedFramePolicy;
use crate::error::{ApiError, ApiResult};
use crate::traits::HttpError;

/// Stateful splitter that accumulates bytes and emits complete lines.
///
/// The buffer holds raw bytes rather than text, so a multi-byte UTF-8
/// character split across two chunks is only decoded once both halves have
/// arrived. At any point the buffer holds exactly the input not yet returned
/// as a frame or skipped as a keep-alive.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: BytesMut,
    /// Bytes before this offset are known to contain no `\n`.
    scanned: usize,
    keepalives: u64,
}

impl LineDecoder {
    /// Create a new line decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk received from the connection.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Return the next complete, non-blank line without its terminator.
    ///
    /// Blank and whitespace-only lines are consumed and skipped. Returns
    /// `None` once no complete line is left in the buffer.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        loop {
            let newline = self.buffer[self.scanned..]
                .iter()
                .position(|&b| b == b'\n');

            let Some(offset) = newline else {
                self.scanned = self.buffer.len();
                return None;
            };

            let end = self.scanned + offset;
            let mut line = self.buffer.split_to(end + 1);
            self.scanned = 0;
            line.truncate(end);

            if is_blank(&line) {
                self.keepalives += 1;
                trace!(keepalives = self.keepalives, "keep-alive");
                continue;
            }

            return Some(line.to_vec());
        }
    }

    /// Discard whatever is left after the connection ended.
    ///
    /// An unterminated trailing fragment is not a frame. Returns the number of
    /// bytes dropped.
    pub fn finish(&mut self) -> usize {
        let dropped = self.buffer.len();
        if dropped > 0 && !is_blank(&self.buffer) {
            debug!(bytes = dropped, "discarding unterminated trailing fragment");
        }
        self.buffer.clear();
        self.scanned = 0;
        dropped
    }

    /// Bytes currently held waiting for a line boundary.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Keep-alive lines skipped so far.
    pub fn keepalives(&self) -> u64 {
        self.keepalives
    }
}

fn is_blank(line: &[u8]) -> bool {
    if line.iter().all(u8::is_ascii_whitespace) {
        return true;
    }
    std::str::from_utf8(line)
        .map(|s| s.trim().is_empty())
        .unwrap_or(false)
}

/// Decode one frame as JSON into `T`.
pub fn decode_frame<T: DeserializeOwned>(frame: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(frame).map_err(|e| ApiError::decode(frame, e))
}

struct DecodeState<S> {
    bytes: S,
    decoder: LineDecoder,
    url: String,
    policy: MalformedFramePolicy,
    done: bool,
}

/// Turn a chunked byte stream into a stream of decoded records.
///
/// Records come out in the order their lines were completed. A transport
/// error is yielded once and ends the stream. A malformed frame either ends
/// the stream after its `Decode` error ([`MalformedFramePolicy::Abort`]) or is
/// logged and skipped ([`MalformedFramePolicy::Skip`]). Nothing is read from
/// `bytes` until the returned stream is polled.
pub fn decode_json_lines<T, S>(
    bytes: S,
    url: impl Into<String>,
    policy: MalformedFramePolicy,
) -> impl Stream<Item = ApiResult<T>> + Send
where
    T: DeserializeOwned + Send + 'static,
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin + Send + 'static,
{
    let state = DecodeState {
        bytes,
        decoder: LineDecoder::new(),
        url: url.into(),
        policy,
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        loop {
            // Drain complete frames before reading more
            while let Some(frame) = state.decoder.next_frame() {
                match decode_frame::<T>(&frame) {
                    Ok(record) => return Some((Ok(record), state)),
                    Err(err) => match state.policy {
                        MalformedFramePolicy::Skip => {
                            warn!(url = %state.url, error = %err, "skipping malformed frame");
                        }
                        MalformedFramePolicy::Abort => {
                            warn!(url = %state.url, error = %err, "malformed frame, ending stream");
                            state.done = true;
                            return Some((Err(err), state));
                        }
                    },
                }
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.decoder.push(&chunk),
                Some(Err(e)) => {
                    state.done = true;
                    let err = ApiError::from_http(&state.url, e);
                    return Some((Err(err), state));
                }
                None => {
                    state.decoder.finish();
                    return None;
                }
            }
        }
    })
}
