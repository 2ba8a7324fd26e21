// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider for deterministic testing.
//!
//! `MockChat` implements [`ChatProvider`] with pre-scripted replies,
//! enabling fast, CI-runnable pipeline tests without external API calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use dossier_core::{ChatProvider, ChatReply, ChatRequest, DossierError};

/// A mock LLM provider that returns pre-scripted replies.
///
/// Replies are popped from a FIFO queue; each entry is either a successful
/// reply body or an error message. When the queue is empty, a default
/// "mock reply" text is returned. Every received request is recorded for
/// prompt assertions.
pub struct MockChat {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChat {
    /// Create a mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock provider pre-loaded with successful replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        let mock = Self::new();
        for reply in replies {
            mock.queue(reply);
        }
        mock
    }

    /// Add a successful reply to the end of the queue.
    pub fn queue(&self, content: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock reply queue poisoned")
            .push_back(Ok(content.into()));
    }

    /// Add a provider error to the end of the queue.
    pub fn queue_error(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock reply queue poisoned")
            .push_back(Err(message.into()));
    }

    /// All requests received so far, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .clone()
    }
}

impl Default for MockChat {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MockChat {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, DossierError> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(request);

        let next = self
            .replies
            .lock()
            .expect("mock reply queue poisoned")
            .pop_front();

        match next {
            Some(Ok(content)) => Ok(ChatReply {
                content,
                model: "mock-model".to_string(),
                usage: None,
            }),
            Some(Err(message)) => Err(DossierError::provider(message)),
            None => Ok(ChatReply {
                content: "mock reply".to_string(),
                model: "mock-model".to_string(),
                usage: None,
            }),
        }
    }
}
