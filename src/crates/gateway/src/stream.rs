//! Streaming relay between a provider and the caller.
//!
//! Provider fragments are forwarded as soon as they arrive, with a small
//! cooperative pause between them. The relay owns every terminal rule of a
//! streamed answer: finish reasons, the stall timeout, malformed-fragment
//! skipping, and the closing apology/disclaimer for degenerate output.

use async_stream::stream;
use futures::{Stream, StreamExt};
use hpgpt_llm::ChunkStream;
use std::fmt::Display;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{error, info, warn};

/// Type alias for a stream of text fragments.
pub type TokenStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Sent when the model produced no usable text.
pub const EMPTY_RESPONSE_APOLOGY: &str = "I apologize, but I didn't receive a complete response. \
     Please try asking your question again, perhaps in a different way.";

/// Appended when the model produced suspiciously little text.
pub const INCOMPLETE_NOTICE: &str =
    "\n\n*If this response seems incomplete, please let me know and I'll provide more details.*";

/// Answers shorter than this many characters get [`INCOMPLETE_NOTICE`].
pub const MIN_COMPLETE_CHARS: usize = 10;

/// Timing knobs for streamed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamPacing {
    /// Pause after each word of a canned answer.
    pub canned_word_delay: Duration,
    /// Pause after each relayed provider fragment.
    pub fragment_delay: Duration,
    /// Give up when no fragment arrived for this long.
    pub stall_timeout: Duration,
}

impl Default for StreamPacing {
    fn default() -> Self {
        Self {
            canned_word_delay: Duration::from_millis(20),
            fragment_delay: Duration::from_millis(1),
            stall_timeout: Duration::from_secs(45),
        }
    }
}

impl StreamPacing {
    /// No artificial delays; the stall timeout keeps its default.
    pub fn immediate() -> Self {
        Self {
            canned_word_delay: Duration::ZERO,
            fragment_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_stall_timeout(mut self, stall_timeout: Duration) -> Self {
        self.stall_timeout = stall_timeout;
        self
    }
}

/// Accumulates relayed fragments.
#[derive(Debug, Default)]
pub struct TokenBuffer {
    buffer: String,
    chunk_count: usize,
    finished: bool,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chunk(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
        self.chunk_count += 1;
    }

    /// Mark that the provider signalled a finish reason.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn content(&self) -> &str {
        &self.buffer
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// User-facing text for a failure inside a stream.
pub fn stream_error_message(err: &impl Display) -> String {
    format!(
        "I encountered an error while processing your request: {}. Please try again.",
        err
    )
}

/// Fragment to append once a stream has ended, if any.
pub fn closing_fragment(text: &str) -> Option<&'static str> {
    if text.trim().is_empty() {
        Some(EMPTY_RESPONSE_APOLOGY)
    } else if text.chars().count() < MIN_COMPLETE_CHARS {
        Some(INCOMPLETE_NOTICE)
    } else {
        None
    }
}

/// Emit a canned answer word by word, each followed by one space.
pub fn canned_stream(answer: String, word_delay: Duration) -> TokenStream {
    Box::pin(stream! {
        for word in answer.split_whitespace() {
            yield format!("{} ", word);
            pause(word_delay).await;
        }
    })
}

/// Relay provider chunks to the caller.
///
/// `started` is when the remote call began; the stall timeout counts from it
/// until the first content fragment, then from the latest one.
pub fn relay(mut chunks: ChunkStream, pacing: StreamPacing, started: Instant) -> TokenStream {
    Box::pin(stream! {
        let mut buffer = TokenBuffer::new();
        let mut last_fragment_at = started;

        loop {
            let remaining = pacing.stall_timeout.saturating_sub(last_fragment_at.elapsed());
            let item = match timeout(remaining, chunks.next()).await {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(_) => {
                    warn!("Stream stalled for {:?}, forcing completion", pacing.stall_timeout);
                    break;
                }
            };

            match item {
                Ok(chunk) => {
                    if let Some(content) = chunk.content.filter(|c| !c.is_empty()) {
                        buffer.add_chunk(&content);
                        last_fragment_at = Instant::now();
                        yield content;
                        pause(pacing.fragment_delay).await;
                    }

                    if let Some(reason) = chunk.finish_reason {
                        buffer.finish();
                        info!("Stream completed. Reason: {}", reason);
                        break;
                    }
                }
                Err(err) if err.is_malformed_chunk() => {
                    warn!("Skipping malformed stream chunk: {}", err);
                }
                Err(err) => {
                    error!("Streaming completion failed: {}", err);
                    yield stream_error_message(&err);
                    return;
                }
            }
        }

        info!(
            "Total chunks: {}, length: {}, finished: {}",
            buffer.chunk_count(),
            buffer.content().len(),
            buffer.is_finished()
        );

        if let Some(tail) = closing_fragment(buffer.content()) {
            yield tail.to_string();
        }
    })
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use hpgpt_llm::{LlmError, StreamChunk};

    fn chunks(items: Vec<hpgpt_llm::Result<StreamChunk>>) -> ChunkStream {
        Box::pin(stream::iter(items))
    }

    #[test]
    fn test_closing_fragment() {
        assert_eq!(closing_fragment(""), Some(EMPTY_RESPONSE_APOLOGY));
        assert_eq!(closing_fragment(" \n\t"), Some(EMPTY_RESPONSE_APOLOGY));
        assert_eq!(closing_fragment("Paris"), Some(INCOMPLETE_NOTICE));
        assert_eq!(closing_fragment("héllo wör"), Some(INCOMPLETE_NOTICE));
        assert_eq!(closing_fragment("0123456789"), None);
    }

    #[test]
    fn test_immediate_pacing() {
        let pacing = StreamPacing::immediate();
        assert!(pacing.canned_word_delay.is_zero());
        assert!(pacing.fragment_delay.is_zero());
        assert_eq!(pacing.stall_timeout, Duration::from_secs(45));
    }

    #[tokio::test]
    async fn test_canned_stream_word_by_word() {
        let fragments: Vec<String> =
            canned_stream("Hello!  I'm\nhere.".to_string(), Duration::ZERO).collect().await;
        assert_eq!(fragments, vec!["Hello! ", "I'm ", "here. "]);
    }

    #[tokio::test]
    async fn test_relay_stops_at_finish_reason() {
        let source = chunks(vec![
            Ok(StreamChunk::text("The capital")),
            Ok(StreamChunk::text(" is Paris").finished("stop")),
            Ok(StreamChunk::text("ignored")),
        ]);

        let fragments: Vec<String> = relay(source, StreamPacing::immediate(), Instant::now())
            .collect()
            .await;

        assert_eq!(fragments, vec!["The capital", " is Paris"]);
    }

    #[tokio::test]
    async fn test_relay_skips_malformed_and_empty_chunks() {
        let source = chunks(vec![
            Ok(StreamChunk::text("")),
            Err(LlmError::SerializationError("bad json".into())),
            Ok(StreamChunk::text("Hello there, friend")),
            Ok(StreamChunk::default().finished("stop")),
        ]);

        let fragments: Vec<String> = relay(source, StreamPacing::immediate(), Instant::now())
            .collect()
            .await;

        assert_eq!(fragments, vec!["Hello there, friend"]);
    }

    #[tokio::test]
    async fn test_relay_transport_error_ends_with_message() {
        let source = chunks(vec![
            Ok(StreamChunk::text("Partial answer")),
            Err(LlmError::Other("connection reset".into())),
            Ok(StreamChunk::text("never")),
        ]);

        let fragments: Vec<String> = relay(source, StreamPacing::immediate(), Instant::now())
            .collect()
            .await;

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], "Partial answer");
        assert!(fragments[1].contains("connection reset"));
    }

    #[tokio::test]
    async fn test_relay_empty_stream_apologizes() {
        let fragments: Vec<String> = relay(chunks(vec![]), StreamPacing::immediate(), Instant::now())
            .collect()
            .await;
        assert_eq!(fragments, vec![EMPTY_RESPONSE_APOLOGY.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_stall_timeout() {
        let source: ChunkStream = Box::pin(
            stream::iter(vec![Ok::<_, LlmError>(StreamChunk::text("Paris"))])
                .chain(stream::pending()),
        );

        let fragments: Vec<String> = relay(source, StreamPacing::immediate(), Instant::now())
            .collect()
            .await;

        assert_eq!(fragments, vec!["Paris".to_string(), INCOMPLETE_NOTICE.to_string()]);
    }
}
