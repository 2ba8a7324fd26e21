// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply drafting for the email scenario.
//!
//! Drafts a reply grounded in per-entity research findings, strips
//! boilerplate, and nudges the draft back into the configured word band
//! with at most one corrective round-trip.

use std::sync::Arc;

use dossier_config::SynthesisConfig;
use dossier_core::{ChatMessage, ChatProvider, ChatRequest};
use dossier_research::ResearchEntry;
use tracing::{debug, warn};

use crate::polish::{polish, word_count};

/// A drafted reply after post-processing and length enforcement.
#[derive(Debug, Clone)]
pub struct ReplyDraft {
    pub text: String,
    /// False when the provider failed and `text` is the error sentinel.
    pub complete: bool,
    /// True when a corrective length round-trip ran.
    pub length_adjusted: bool,
}

/// Drafts research-informed email replies.
pub struct ReplyDrafter {
    chat: Arc<dyn ChatProvider>,
    config: SynthesisConfig,
}

impl ReplyDrafter {
    pub fn new(chat: Arc<dyn ChatProvider>, config: SynthesisConfig) -> Self {
        Self { chat, config }
    }

    /// Draft a reply to `source_text` informed by research findings.
    ///
    /// The draft is polished, then checked against the word band. A draft
    /// outside the band gets one corrective round-trip and the corrected
    /// draft is kept even if still outside; a failed correction keeps the
    /// original draft.
    pub async fn draft(
        &self,
        source_text: &str,
        research: &[ResearchEntry],
        top_sources: usize,
    ) -> ReplyDraft {
        let request = ChatRequest::new(
            vec![ChatMessage::user(reply_prompt(
                source_text,
                research,
                top_sources,
            ))],
            self.config.reply_temperature,
        );
        let first = match self.chat.chat(request).await {
            Ok(reply) => polish(&reply.content),
            Err(err) => {
                warn!(error = %err, "reply drafting failed");
                return ReplyDraft {
                    text: "Error: Could not generate reply".to_string(),
                    complete: false,
                    length_adjusted: false,
                };
            }
        };

        let words = word_count(&first);
        if words >= self.config.reply_min_words && words <= self.config.reply_max_words {
            return ReplyDraft {
                text: first,
                complete: true,
                length_adjusted: false,
            };
        }

        let instruction = if words > self.config.reply_max_words {
            "Compress"
        } else {
            "Expand"
        };
        debug!(words, instruction, "reply outside the length band");
        let adjust = format!(
            "{instruction} the reply below to between {min} and {max} words. \
             Keep its key points, tone, and call-to-action. Return only the revised reply.\n\
             \n\
             {first}",
            min = self.config.reply_min_words,
            max = self.config.reply_max_words,
        );
        let request = ChatRequest::new(
            vec![ChatMessage::user(adjust)],
            self.config.reply_temperature,
        );
        match self.chat.chat(request).await {
            Ok(reply) => ReplyDraft {
                text: polish(&reply.content),
                complete: true,
                length_adjusted: true,
            },
            Err(err) => {
                warn!(error = %err, "length adjustment failed, keeping the first draft");
                ReplyDraft {
                    text: first,
                    complete: true,
                    length_adjusted: false,
                }
            }
        }
    }
}

fn reply_prompt(source_text: &str, research: &[ResearchEntry], top_sources: usize) -> String {
    let research_context = if research.is_empty() {
        String::new()
    } else {
        let blocks = research
            .iter()
            .map(|entry| entry.prompt_block(top_sources))
            .collect::<Vec<_>>()
            .join("\n");
        format!("RESEARCH FINDINGS & KNOWLEDGE:\n\n{blocks}\n")
    };

    format!(
        "You are drafting a professional, warm email reply. Use the research findings \
         and knowledge to make your response informed and contextually aware.\n\
         \n\
         ORIGINAL EMAIL:\n\
         {source_text}\n\
         \n\
         {research_context}\
         INSTRUCTIONS:\n\
         1. Write a professional, friendly reply\n\
         2. Reference specific research findings or knowledge naturally (e.g. \"I saw your recent investment in...\")\n\
         3. Show you have done your homework without being excessive\n\
         4. Keep it 3-4 short paragraphs\n\
         5. End with a clear call-to-action\n\
         6. Match the tone of the original email\n\
         \n\
         Draft the reply (no subject line needed):"
    )
}
