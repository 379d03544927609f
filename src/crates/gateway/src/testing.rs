//! Test infrastructure for code built on the gateway.
//!
//! [`ScriptedModel`] is a [`ChatModel`] that replays queued replies instead
//! of calling a provider, and records every request it receives.

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use hpgpt_llm::{
    ChatModel, ChatRequest, ChatResponse, ChunkStream, LlmError, Result, StreamChunk,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

enum StreamReply {
    Items {
        items: Vec<Result<StreamChunk>>,
        stall: bool,
    },
    Fail(LlmError),
    StallSetup,
}

/// Fake chat model driven by a script.
///
/// Replies are consumed in order; once a queue is empty, calls fail with
/// [`LlmError::Other`].
///
/// # Example
/// ```
/// use hpgpt_gateway::testing::ScriptedModel;
///
/// let model = ScriptedModel::new().with_chat_reply("coding, analytics");
/// assert_eq!(model.total_calls(), 0);
/// ```
pub struct ScriptedModel {
    name: String,
    chat_replies: Mutex<VecDeque<Result<ChatResponse>>>,
    stream_replies: Mutex<VecDeque<StreamReply>>,
    requests: Mutex<Vec<ChatRequest>>,
    chat_calls: AtomicUsize,
    stream_calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            name: "scripted-model".to_string(),
            chat_replies: Mutex::new(VecDeque::new()),
            stream_replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            chat_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful non-streaming reply.
    pub fn with_chat_reply(self, content: impl Into<String>) -> Self {
        let response = ChatResponse {
            content: content.into(),
            finish_reason: Some("stop".to_string()),
            model: self.name.clone(),
            usage: None,
        };
        lock(&self.chat_replies).push_back(Ok(response));
        self
    }

    /// Queue a failing non-streaming call.
    pub fn with_chat_error(self, err: LlmError) -> Self {
        lock(&self.chat_replies).push_back(Err(err));
        self
    }

    /// Queue a stream that yields `items` and then ends.
    pub fn with_stream(self, items: Vec<Result<StreamChunk>>) -> Self {
        lock(&self.stream_replies).push_back(StreamReply::Items {
            items,
            stall: false,
        });
        self
    }

    /// Queue a stream that yields `items` and then never produces again.
    pub fn with_stalling_stream(self, items: Vec<Result<StreamChunk>>) -> Self {
        lock(&self.stream_replies).push_back(StreamReply::Items { items, stall: true });
        self
    }

    /// Queue a stream that fails before producing anything.
    pub fn with_stream_error(self, err: LlmError) -> Self {
        lock(&self.stream_replies).push_back(StreamReply::Fail(err));
        self
    }

    /// Queue a stream whose setup never completes.
    pub fn with_stalling_setup(self) -> Self {
        lock(&self.stream_replies).push_back(StreamReply::StallSetup);
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.chat_calls() + self.stream_calls()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(request);

        lock(&self.chat_replies)
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Other("no scripted chat reply".to_string())))
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(request);

        let reply = lock(&self.stream_replies).pop_front();
        match reply {
            Some(StreamReply::Items { items, stall: false }) => Ok(Box::pin(stream::iter(items))),
            Some(StreamReply::Items { items, stall: true }) => {
                Ok(Box::pin(stream::iter(items).chain(stream::pending())))
            }
            Some(StreamReply::Fail(err)) => Err(err),
            Some(StreamReply::StallSetup) => std::future::pending().await,
            None => Err(LlmError::Other("no scripted stream".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
