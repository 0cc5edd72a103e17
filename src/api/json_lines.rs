// ABOUTME: Decodes newline-delimited JSON from a raw byte stream.
// ABOUTME: Used by endpoints like /events that emit one document per line.

use crate::client::ByteStream;
use crate::error::{Error, Result};
use bytes::BytesMut;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::pin::Pin;

/// Typed messages decoded line by line.
pub type JsonLines<T> = Pin<Box<dyn Stream<Item = Result<T>> + Send>>;

struct State {
    frames: ByteStream,
    buffer: BytesMut,
    done: bool,
}

/// Split `frames` on newlines and decode each non-blank line as `T`.
///
/// Lines may span frames. A trailing line without a newline is decoded when
/// the stream ends. A transport error is yielded once and ends the stream.
pub fn json_lines<T>(frames: ByteStream) -> JsonLines<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let state = State {
        frames,
        buffer: BytesMut::new(),
        done: false,
    };

    Box::pin(futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(pos) = state.buffer.iter().position(|b| *b == b'\n') {
                let line = state.buffer.split_to(pos + 1);
                let line = line[..pos].trim_ascii();
                if line.is_empty() {
                    continue;
                }
                let item = serde_json::from_slice(line).map_err(Error::Decode);
                return Some((item, state));
            }

            if state.done {
                let rest = state.buffer.split();
                let rest = rest.trim_ascii();
                if rest.is_empty() {
                    return None;
                }
                let item = serde_json::from_slice(rest).map_err(Error::Decode);
                return Some((item, state));
            }

            match state.frames.next().await {
                Some(Ok(frame)) => state.buffer.extend_from_slice(&frame),
                Some(Err(e)) => {
                    state.done = true;
                    state.buffer.clear();
                    return Some((Err(e), state));
                }
                None => state.done = true,
            }
        }
    }))
}
