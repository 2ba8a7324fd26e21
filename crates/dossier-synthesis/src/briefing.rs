// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meeting briefing synthesis.
//!
//! Combines recalled memory, web research, and model knowledge into a
//! structured briefing with a fixed key set, plus a rendered text form.
//! A deterministic fallback covers LLM outages so the scenario still
//! produces something usable.

use std::sync::Arc;

use chrono::Utc;
use dossier_config::SynthesisConfig;
use dossier_core::{ChatMessage, ChatProvider, ChatRequest, SourceRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// System prompt pinning the JSON key set the model must emit.
const BRIEFING_SYSTEM_PROMPT: &str =
    "You are an expert executive assistant who prepares concise meeting briefings.\n\
     You must output a JSON object with these exact keys:\n\
     {\"company_overview\": \"...\", \"past_context\": \"...\", \"recent_news\": \"...\", \
     \"talking_points\": [\"...\", \"...\"], \"risks_and_notes\": \"...\"}\n\
     Be specific, actionable, and concise. Reference real data from the sources provided.\n\
     Output ONLY valid JSON, no markdown or extra text.";

/// Structured briefing payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Briefing {
    pub company_overview: String,
    pub past_context: String,
    pub recent_news: String,
    pub talking_points: Vec<String>,
    pub risks_and_notes: String,
}

impl Briefing {
    /// A briefing counts as complete when it carries talking points.
    pub fn is_complete(&self) -> bool {
        !self.talking_points.is_empty()
    }
}

/// Inputs assembled by the meeting pipeline for briefing synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct BriefingInputs<'a> {
    pub company: &'a str,
    pub meeting_context: &'a str,
    /// Rendered memory summary, empty when nothing was recalled.
    pub memory_summary: &'a str,
    pub news: &'a [SourceRecord],
    pub industry: &'a [SourceRecord],
    /// Model-knowledge notes from the research gate when no search ran.
    pub known_info: &'a str,
}

/// A synthesized briefing plus its rendered text form.
#[derive(Debug, Clone)]
pub struct BriefingOutcome {
    pub briefing: Briefing,
    pub briefing_text: String,
    /// True when the LLM was unavailable and the canned fallback was used.
    pub degraded: bool,
}

/// Synthesizes meeting briefings from memory and research inputs.
pub struct BriefingSynthesizer {
    chat: Arc<dyn ChatProvider>,
    config: SynthesisConfig,
}

impl BriefingSynthesizer {
    pub fn new(chat: Arc<dyn ChatProvider>, config: SynthesisConfig) -> Self {
        Self { chat, config }
    }

    /// Produce a briefing. Never errors: provider failures degrade to the
    /// canned fallback, unparseable replies to a parse notice.
    pub async fn synthesize(&self, inputs: &BriefingInputs<'_>) -> BriefingOutcome {
        let request = ChatRequest::new(
            vec![
                ChatMessage::system(BRIEFING_SYSTEM_PROMPT),
                ChatMessage::user(briefing_prompt(inputs)),
            ],
            self.config.briefing_temperature,
        );

        let reply = match self.chat.chat(request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    company = inputs.company,
                    error = %err,
                    "briefing synthesis unavailable, using fallback"
                );
                let briefing = fallback_briefing(inputs.company, inputs.memory_summary);
                let briefing_text = format_briefing_text(inputs.company, &briefing);
                return BriefingOutcome {
                    briefing,
                    briefing_text,
                    degraded: true,
                };
            }
        };

        let map =
            dossier_extract::extract_object_with_repair(self.chat.as_ref(), &reply.content).await;
        let briefing = if map.is_empty() {
            parse_notice(&reply.content)
        } else {
            serde_json::from_value(Value::Object(map))
                .unwrap_or_else(|_| parse_notice(&reply.content))
        };

        let briefing_text = format_briefing_text(inputs.company, &briefing);
        BriefingOutcome {
            briefing,
            briefing_text,
            degraded: false,
        }
    }
}

fn briefing_prompt(inputs: &BriefingInputs<'_>) -> String {
    let meeting_context = if inputs.meeting_context.trim().is_empty() {
        "General business meeting"
    } else {
        inputs.meeting_context
    };
    let memory = if inputs.memory_summary.trim().is_empty() {
        "No past interactions on record."
    } else {
        inputs.memory_summary
    };
    let news = sources_block(inputs.news, "No recent news found.");
    let industry = sources_block(inputs.industry, "No industry info found.");

    let mut prompt = format!(
        "Prepare a meeting briefing for a meeting with **{company}**.\n\
         \n\
         Meeting context: {meeting_context}\n\
         \n\
         === PAST INTERACTIONS (from our records) ===\n\
         {memory}\n\
         \n\
         === RECENT NEWS (from web research) ===\n\
         {news}\n\
         \n\
         === INDUSTRY & PRODUCT INFO (from web research) ===\n\
         {industry}\n",
        company = inputs.company,
    );
    if !inputs.known_info.trim().is_empty() {
        prompt.push_str(&format!(
            "\n=== EXISTING KNOWLEDGE (no search needed) ===\n{}\n",
            inputs.known_info
        ));
    }
    prompt.push_str("\nGenerate the briefing JSON now.");
    prompt
}

/// Render sources as numbered blocks for the prompt.
fn sources_block(sources: &[SourceRecord], empty_note: &str) -> String {
    if sources.is_empty() {
        return empty_note.to_string();
    }
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            format!(
                "Source {n}: {title}\nURL: {url}\nContent: {snippet}\n",
                n = i + 1,
                title = source.title,
                url = source.url,
                snippet = source.snippet,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the briefing as display text, with per-section fallbacks.
pub fn format_briefing_text(company: &str, briefing: &Briefing) -> String {
    let banner = "═".repeat(60);
    let prepared = Utc::now().format("%B %d, %Y at %I:%M %p UTC");
    let talking_points = if briefing.talking_points.is_empty() {
        "  No talking points generated.".to_string()
    } else {
        briefing
            .talking_points
            .iter()
            .enumerate()
            .map(|(i, point)| format!("  {}. {point}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "{banner}\n  MEETING BRIEFING: {name}\n  Prepared: {prepared}\n{banner}\n\
         \n\
         COMPANY OVERVIEW\n{overview}\n\
         \n\
         PAST INTERACTIONS\n{past}\n\
         \n\
         RECENT NEWS & DEVELOPMENTS\n{news}\n\
         \n\
         RECOMMENDED TALKING POINTS\n{talking_points}\n\
         \n\
         RISKS & NOTES\n{risks}\n\
         \n\
         {banner}",
        name = company.to_uppercase(),
        overview = non_empty_or(&briefing.company_overview, "N/A"),
        past = non_empty_or(&briefing.past_context, "No past interactions found."),
        news = non_empty_or(&briefing.recent_news, "No recent news available."),
        risks = non_empty_or(&briefing.risks_and_notes, "None identified."),
    )
}

/// Deterministic briefing used when the LLM service is unavailable.
fn fallback_briefing(company: &str, memory_summary: &str) -> Briefing {
    let past_context = if memory_summary.trim().is_empty() {
        "No past data.".to_string()
    } else {
        memory_summary.to_string()
    };
    Briefing {
        company_overview: format!("Meeting scheduled with {company}."),
        past_context,
        recent_news: "Recent news could not be summarized. Review the gathered sources manually."
            .to_string(),
        talking_points: vec![
            "Review past interaction history".to_string(),
            "Ask about their current priorities".to_string(),
            "Explore mutual opportunities".to_string(),
            "Discuss timeline and next steps".to_string(),
        ],
        risks_and_notes: "Briefing generated with limited data. Verify details manually."
            .to_string(),
    }
}

/// Briefing produced when the model reply cannot be parsed as JSON.
fn parse_notice(raw: &str) -> Briefing {
    Briefing {
        company_overview: "Unable to parse briefing.".to_string(),
        past_context: clip_chars(raw, 200),
        talking_points: vec!["Review the raw model output".to_string()],
        ..Briefing::default()
    }
}

fn non_empty_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() { fallback } else { text }
}

fn clip_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
