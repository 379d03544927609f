//! Server-sent events decoding.
//!
//! OpenAI-compatible APIs stream completions as `text/event-stream`: each
//! event is a `data: <json>` line followed by a blank line, and the stream is
//! closed with `data: [DONE]`. Network chunks do not respect line boundaries,
//! so [`SseDecoder`] buffers partial lines between pushes.

use crate::error::{LlmError, Result};
use futures::{Stream, StreamExt};

/// Payload that terminates an OpenAI-compatible event stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Incremental decoder turning raw bytes into `data:` payloads.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a network chunk and return every payload completed by it.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            if let Some(payload) = parse_line(&line) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Flush a final line that arrived without a trailing newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.pending);
        parse_line(&line)
    }
}

fn parse_line(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);

    // Comments (":keep-alive") and other fields (event:, id:, retry:) carry no content.
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() {
        None
    } else {
        Some(payload.to_string())
    }
}

/// Adapt a byte stream into a stream of `data:` payloads.
///
/// A transport error is forwarded once and ends the stream.
pub fn data_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<LlmError> + Send,
{
    async_stream::stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = SseDecoder::new();

        while let Some(item) = bytes.next().await {
            match item {
                Ok(chunk) => {
                    for payload in decoder.push(chunk.as_ref()) {
                        yield Ok(payload);
                    }
                }
                Err(err) => {
                    let err: LlmError = err.into();
                    yield Err(err);
                    return;
                }
            }
        }

        if let Some(payload) = decoder.finish() {
            yield Ok(payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[test]
    fn test_decoder_single_event() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b"data: {\"a\":1}\n\n");
        assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_decoder_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"da").is_empty());
        assert!(decoder.push(b"ta: {\"content\":\"Par").is_empty());
        let payloads = decoder.push(b"is\"}\r\n\r\ndata: [DONE]\n\n");
        assert_eq!(
            payloads,
            vec!["{\"content\":\"Paris\"}".to_string(), DONE_MARKER.to_string()]
        );
    }

    #[test]
    fn test_decoder_ignores_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b": keep-alive\nevent: message\nid: 7\ndata:\ndata: x\n\n");
        assert_eq!(payloads, vec!["x".to_string()]);
    }

    #[test]
    fn test_decoder_handles_multibyte_split() {
        let text = "data: caf\u{e9}\n".as_bytes();
        let (head, tail) = text.split_at(text.len() - 2);
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(head).is_empty());
        assert_eq!(decoder.push(tail), vec!["caf\u{e9}".to_string()]);
    }

    #[test]
    fn test_decoder_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), Some("tail".to_string()));
    }

    #[tokio::test]
    async fn test_data_stream_stops_after_transport_error() {
        let chunks: Vec<std::result::Result<Vec<u8>, LlmError>> = vec![
            Ok(b"data: one\n\n".to_vec()),
            Err(LlmError::Other("connection reset".into())),
            Ok(b"data: never\n\n".to_vec()),
        ];

        let items: Vec<_> = data_stream(stream::iter(chunks)).collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "one");
        assert!(matches!(items[1], Err(LlmError::Other(_))));
    }
}
