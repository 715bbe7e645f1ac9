//! SSE event model and incremental stream assembler.
//!
//! The generation endpoint streams one `data:` frame per finished slot:
//!
//! ```text
//! data: {"image":"data:image/png;base64,...","decorationType":"Banner","index":1,"prompt":"..."}
//!
//! data: {"error":"upstream timed out","decorationType":"Cake topper","index":0}
//!
//! data: [DONE]
//! ```
//!
//! Frames arrive in completion order, not request order, and network chunks
//! do not respect frame or even UTF-8 boundaries. [`StreamAssembler`] accepts
//! raw chunks as they arrive and files every event into an index-keyed slot
//! map so callers always see a consistent, index-ordered view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generation::{GeneratedImage, ImageFailure};

/// Payload of the final frame of a generation stream.
pub const DONE_SENTINEL: &str = "[DONE]";

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// One frame of a generation stream (other than the `[DONE]` sentinel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationEvent {
    Image(GeneratedImage),
    Failure(ImageFailure),
}

impl GenerationEvent {
    pub fn index(&self) -> usize {
        match self {
            GenerationEvent::Image(i) => i.index,
            GenerationEvent::Failure(f) => f.index,
        }
    }
}

/// Encode an event as a complete SSE frame.
pub fn encode_sse(event: &GenerationEvent) -> Result<String, serde_json::Error> {
    Ok(format!("data: {}\n\n", serde_json::to_string(event)?))
}

/// The frame that terminates a generation stream.
pub fn done_frame() -> String {
    format!("data: {DONE_SENTINEL}\n\n")
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// State of a single slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Ready(GeneratedImage),
    Failed(ImageFailure),
}

/// A change produced by feeding a chunk into the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotUpdate {
    /// The slot at this index now holds an image.
    Ready(usize),
    /// The slot at this index failed.
    Failed(usize),
    /// The `[DONE]` sentinel was received.
    Done,
}

/// Final, index-ordered view of a stream.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledResult {
    pub images: Vec<GeneratedImage>,
    pub failures: Vec<ImageFailure>,
    /// Expected indices that never received an event.
    pub missing: Vec<usize>,
    /// Whether the stream ended with `[DONE]`.
    pub completed: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// Not a single slot produced an image.
    #[error("No images were generated ({} failed)", .failures.len())]
    NoImages {
        failures: Vec<ImageFailure>,
        completed: bool,
    },
}

/// Incremental parser for a generation SSE stream.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for a newline.
    scanned: usize,
    slots: BTreeMap<usize, Slot>,
    expected: Option<usize>,
    done: bool,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// An assembler that knows how many slots the request asked for, so
    /// [`AssembledResult::missing`] can be reported.
    pub fn expecting(count: usize) -> Self {
        Self {
            expected: Some(count),
            ..Self::default()
        }
    }

    /// Feed a raw chunk from the wire.
    ///
    /// Only complete lines are processed; any trailing partial line stays
    /// buffered until the next chunk (or [`finish`](Self::finish)).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SlotUpdate> {
        let mut updates = Vec::new();
        if self.done {
            return updates;
        }

        self.buffer.extend_from_slice(chunk);

        let mut consumed = 0;
        let mut search_from = self.scanned;
        while let Some(pos) = self.buffer[search_from..].iter().position(|b| *b == b'\n') {
            let end = search_from + pos;
            let line = self.buffer[consumed..end].to_vec();
            consumed = end + 1;
            search_from = consumed;

            if let Some(update) = self.process_line(&line) {
                updates.push(update);
            }
            if self.done {
                self.buffer.clear();
                self.scanned = 0;
                return updates;
            }
        }
        self.buffer.drain(..consumed);
        // What is left holds no newline.
        self.scanned = self.buffer.len();

        updates
    }

    /// Whether `[DONE]` has been received.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(&index)
    }

    /// Number of slots currently holding an image.
    pub fn ready_count(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, Slot::Ready(_)))
            .count()
    }

    /// Close the stream and produce the final view.
    ///
    /// A trailing line without a newline is still processed. Fails only when
    /// no slot holds an image; otherwise partial results are returned.
    pub fn finish(mut self) -> Result<AssembledResult, AssembleError> {
        if !self.done && !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.process_line(&line);
        }

        let mut images = Vec::new();
        let mut failures = Vec::new();
        for slot in self.slots.values() {
            match slot {
                Slot::Ready(image) => images.push(image.clone()),
                Slot::Failed(failure) => failures.push(failure.clone()),
            }
        }

        if images.is_empty() {
            return Err(AssembleError::NoImages {
                failures,
                completed: self.done,
            });
        }

        let missing = match self.expected {
            Some(n) => (0..n).filter(|i| !self.slots.contains_key(i)).collect(),
            None => Vec::new(),
        };

        Ok(AssembledResult {
            images,
            failures,
            missing,
            completed: self.done,
        })
    }

    fn process_line(&mut self, raw: &[u8]) -> Option<SlotUpdate> {
        let Ok(line) = std::str::from_utf8(raw) else {
            tracing::warn!(len = raw.len(), "Skipping non-UTF-8 SSE line");
            return None;
        };
        let line = line.trim_end_matches('\r');

        // Blank lines end a frame; comments and non-data fields carry nothing.
        let payload = line.strip_prefix("data:")?;
        let payload = payload.strip_prefix(' ').unwrap_or(payload);
        if payload.is_empty() {
            return None;
        }

        if payload == DONE_SENTINEL {
            self.done = true;
            return Some(SlotUpdate::Done);
        }

        match serde_json::from_str::<GenerationEvent>(payload) {
            Ok(event) => self.merge(event),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed SSE data line");
                None
            }
        }
    }

    fn merge(&mut self, event: GenerationEvent) -> Option<SlotUpdate> {
        let index = event.index();
        match event {
            GenerationEvent::Image(image) => {
                self.slots.insert(index, Slot::Ready(image));
                Some(SlotUpdate::Ready(index))
            }
            GenerationEvent::Failure(failure) => {
                if matches!(self.slots.get(&index), Some(Slot::Ready(_))) {
                    tracing::debug!(index, "Ignoring failure for slot that already has an image");
                    return None;
                }
                self.slots.insert(index, Slot::Failed(failure));
                Some(SlotUpdate::Failed(index))
            }
        }
    }
}
