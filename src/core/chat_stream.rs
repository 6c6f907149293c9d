//! Lazy, pull-driven decoding of streamed chat completions.
//!
//! A [`FragmentStream`] owns the outbound request and performs no I/O until it
//! is first polled. Each poll reads just enough of the response body to yield
//! the next non-empty text fragment, so a consumer that stops pulling simply
//! drops the connection.

use std::pin::Pin;

use futures_util::stream::{self, BoxStream, Stream};
use futures_util::StreamExt;
use memchr::memchr;

use crate::api::{ChatResponse, OllamaChatChunk};
use crate::core::error::ChatError;

/// Incremental assistant output. Transport and API failures arrive as `Err`
/// items, after which the stream ends.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

/// Turns one line of a response body into an optional fragment.
pub type LineDecoder = fn(&str) -> Result<Decoded, ChatError>;

#[derive(Debug, PartialEq)]
pub struct Decoded {
    pub fragment: Option<String>,
    pub done: bool,
}

impl Decoded {
    fn new(fragment: Option<String>, done: bool) -> Self {
        Self {
            fragment: fragment.filter(|text| !text.is_empty()),
            done,
        }
    }

    fn skip() -> Self {
        Self::new(None, false)
    }

    fn finished() -> Self {
        Self::new(None, true)
    }
}

enum StreamState {
    Pending(reqwest::RequestBuilder),
    Reading {
        body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
        buffer: Vec<u8>,
    },
    Finished,
}

/// Wrap a prepared request into a lazy fragment stream.
pub fn fragment_stream(request: reqwest::RequestBuilder, decode: LineDecoder) -> FragmentStream {
    let stream = stream::try_unfold(StreamState::Pending(request), move |state| {
        next_fragment(state, decode)
    });
    Box::pin(stream)
}

async fn next_fragment(
    mut state: StreamState,
    decode: LineDecoder,
) -> Result<Option<(String, StreamState)>, ChatError> {
    loop {
        state = match state {
            StreamState::Finished => return Ok(None),
            StreamState::Pending(request) => {
                let response = request.send().await?;
                if !response.status().is_success() {
                    return Err(ChatError::from_response(response).await);
                }
                StreamState::Reading {
                    body: response
                        .bytes_stream()
                        .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                        .boxed(),
                    buffer: Vec::new(),
                }
            }
            StreamState::Reading { mut body, mut buffer } => {
                if let Some(newline_pos) = memchr(b'\n', &buffer) {
                    let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
                    let decoded = decode_line(&line, decode)?;
                    match (decoded.fragment, decoded.done) {
                        (Some(fragment), true) => {
                            return Ok(Some((fragment, StreamState::Finished)))
                        }
                        (Some(fragment), false) => {
                            return Ok(Some((fragment, StreamState::Reading { body, buffer })))
                        }
                        (None, true) => return Ok(None),
                        (None, false) => StreamState::Reading { body, buffer },
                    }
                } else {
                    match body.next().await {
                        Some(chunk) => {
                            buffer.extend_from_slice(&chunk?);
                            StreamState::Reading { body, buffer }
                        }
                        None if buffer.is_empty() => return Ok(None),
                        None => {
                            // Last line without a trailing newline
                            let decoded = decode_line(&buffer, decode)?;
                            return Ok(decoded
                                .fragment
                                .map(|fragment| (fragment, StreamState::Finished)));
                        }
                    }
                }
            }
        };
    }
}

fn decode_line(line: &[u8], decode: LineDecoder) -> Result<Decoded, ChatError> {
    match std::str::from_utf8(line) {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(Decoded::skip())
            } else {
                decode(text)
            }
        }
        Err(e) => Err(ChatError::Stream(format!("Invalid UTF-8 in stream: {e}"))),
    }
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

/// Decode one Server-Sent Events line of an OpenAI-compatible stream.
pub fn decode_sse_line(line: &str) -> Result<Decoded, ChatError> {
    let Some(payload) = extract_data_payload(line) else {
        return Ok(Decoded::skip());
    };

    if payload == "[DONE]" {
        return Ok(Decoded::finished());
    }
    if payload.trim().is_empty() {
        return Ok(Decoded::skip());
    }

    match serde_json::from_str::<ChatResponse>(payload) {
        Ok(response) => {
            let fragment = response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content);
            Ok(Decoded::new(fragment, false))
        }
        Err(_) => Err(ChatError::Stream(format_api_error(payload))),
    }
}

/// Decode one newline-delimited JSON object of an Ollama `/api/chat` stream.
pub fn decode_ndjson_line(line: &str) -> Result<Decoded, ChatError> {
    match serde_json::from_str::<OllamaChatChunk>(line) {
        Ok(chunk) => {
            if let Some(error) = chunk.error {
                return Err(ChatError::Stream(format!("API Error: {error}")));
            }
            let fragment = chunk.message.map(|message| message.content);
            Ok(Decoded::new(fragment, chunk.done))
        }
        Err(_) => Err(ChatError::Stream(format_api_error(line))),
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

/// Render an API error body as a markdown snippet, pretty-printing JSON.
pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error:\n```\n<empty>\n```".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            if let Some(summary) = extract_error_summary(&json_value) {
                if !summary.is_empty() {
                    return format!("API Error: {}\n```json\n{}\n```", summary, pretty_json);
                }
            }
            return format!("API Error:\n```json\n{}\n```", pretty_json);
        }
    }

    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        format!("API Error:\n```xml\n{}\n```", trimmed)
    } else {
        format!("API Error:\n```\n{}\n```", trimmed)
    }
}
