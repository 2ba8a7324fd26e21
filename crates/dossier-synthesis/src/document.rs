// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document question answering.
//!
//! Classifies the question first: common-knowledge questions are
//! answered directly, document-specific ones are drafted from the
//! document text. When the draft admits the document lacks the answer,
//! one web search backfills it.

use std::sync::Arc;

use dossier_core::{
    ChatMessage, ChatProvider, ChatRequest, DossierError, ReasoningStep, SearchProvider,
    SourceRecord,
};
use dossier_research::SearchExecutor;
use serde::Deserialize;
use tracing::warn;

const CLASSIFY_TEMPERATURE: f32 = 0.3;
const ANSWER_TEMPERATURE: f32 = 0.4;

/// Web results fetched when the document lacks the answer.
const WEB_FALLBACK_RESULTS: usize = 3;

/// Documents above this size are summarized chunk by chunk first.
const MAX_CHUNK_CHARS: usize = 8000;

/// Exact draft texts that admit the document does not contain the answer,
/// compared after trimming and lowercasing.
const NOT_FOUND_SIGNALS: &[&str] = &[
    "not found in document",
    "not found",
    "no relevant content found",
    "document unrelated",
    "document is empty",
];

/// Classification verdict for a document question.
///
/// The default is the fail-open posture: treat the question as
/// document-specific when classification cannot be parsed.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DocumentVerdict {
    needs_document: bool,
    reasoning: String,
}

impl Default for DocumentVerdict {
    fn default() -> Self {
        Self {
            needs_document: true,
            reasoning: String::new(),
        }
    }
}

/// Answer to a document question, with provenance.
#[derive(Debug, Clone)]
pub struct DocumentAnswer {
    pub result: String,
    pub sources: Vec<SourceRecord>,
    pub used_web: bool,
    pub steps: Vec<ReasoningStep>,
}

/// Answers questions about a provided document.
pub struct DocumentAnswerer {
    chat: Arc<dyn ChatProvider>,
    executor: SearchExecutor,
}

impl DocumentAnswerer {
    pub fn new(chat: Arc<dyn ChatProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            chat,
            executor: SearchExecutor::new(search),
        }
    }

    /// Answer `question`, consulting `document_text` when the question
    /// needs it.
    ///
    /// A document-specific question without document text is an error;
    /// everything else resolves to an answer.
    pub async fn answer(
        &self,
        question: &str,
        document_text: Option<&str>,
    ) -> Result<DocumentAnswer, DossierError> {
        let mut steps = Vec::new();
        let verdict = self.classify(question).await;

        if !verdict.needs_document {
            steps.push(ReasoningStep::info(format!(
                "Question answerable from general knowledge: {}",
                non_empty_or(&verdict.reasoning, "no document needed")
            )));
            let result = self.ask(direct_prompt(question)).await?;
            steps.push(ReasoningStep::success("Answered from model knowledge"));
            return Ok(DocumentAnswer {
                result,
                sources: Vec::new(),
                used_web: false,
                steps,
            });
        }

        steps.push(ReasoningStep::info(format!(
            "Question requires the document: {}",
            non_empty_or(&verdict.reasoning, "document-specific question")
        )));

        let document = document_text.map(str::trim).unwrap_or_default();
        if document.is_empty() {
            return Err(DossierError::Internal(
                "no document text provided".to_string(),
            ));
        }

        let condensed = self.condense(document, &mut steps).await?;
        let draft = self.ask(document_prompt(&condensed, question)).await?;

        if !signals_not_found(&draft) {
            steps.push(ReasoningStep::success("Answered from the document"));
            return Ok(DocumentAnswer {
                result: draft,
                sources: Vec::new(),
                used_web: false,
                steps,
            });
        }

        steps.push(ReasoningStep::warning(
            "Document lacks the answer, searching the web",
        ));
        let query = format!("current standards for: {question}");
        let outcome = self.executor.run(&query, WEB_FALLBACK_RESULTS).await;
        match &outcome.error {
            Some(err) => steps.push(ReasoningStep::warning(format!("Web search failed: {err}"))),
            None => steps.push(ReasoningStep::info(format!(
                "Found {} web sources",
                outcome.sources.len()
            ))),
        }

        let result = self.ask(web_prompt(question, &outcome.sources)).await?;
        steps.push(ReasoningStep::success("Answered from web information"));
        Ok(DocumentAnswer {
            result,
            sources: outcome.sources,
            used_web: true,
            steps,
        })
    }

    async fn classify(&self, question: &str) -> DocumentVerdict {
        let request = ChatRequest::new(
            vec![ChatMessage::user(classify_prompt(question))],
            CLASSIFY_TEMPERATURE,
        );
        match self.chat.chat(request).await {
            Ok(reply) => {
                dossier_extract::extract_as_with_repair(self.chat.as_ref(), &reply.content).await
            }
            Err(err) => {
                warn!(error = %err, "question classification failed, assuming document-specific");
                DocumentVerdict::default()
            }
        }
    }

    /// Condense an oversized document by summarizing it chunk by chunk;
    /// pass-through under the limit.
    async fn condense(
        &self,
        document: &str,
        steps: &mut Vec<ReasoningStep>,
    ) -> Result<String, DossierError> {
        if document.chars().count() <= MAX_CHUNK_CHARS {
            return Ok(document.to_string());
        }
        let chunks = chunk_chars(document, MAX_CHUNK_CHARS);
        steps.push(ReasoningStep::info(format!(
            "Condensing {} document chunks",
            chunks.len()
        )));
        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            summaries.push(self.ask(chunk_prompt(chunk)).await?);
        }
        Ok(summaries.join("\n"))
    }

    async fn ask(&self, prompt: String) -> Result<String, DossierError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)], ANSWER_TEMPERATURE);
        Ok(self.chat.chat(request).await?.content)
    }
}

fn signals_not_found(draft: &str) -> bool {
    let normalized = draft.trim().to_lowercase();
    NOT_FOUND_SIGNALS.contains(&normalized.as_str())
}

fn classify_prompt(question: &str) -> String {
    format!(
        "Is the following question answerable from general knowledge, or does it \
         require specific information from a provided document?\n\
         \n\
         Question: {question}\n\
         \n\
         Respond with ONLY this JSON (no markdown):\n\
         {{\"needs_document\": true/false, \"reasoning\": \"Brief explanation\"}}"
    )
}

fn direct_prompt(question: &str) -> String {
    format!(
        "Answer the following question as best as possible.\n\
         \n\
         Question: {question}\n\
         \n\
         If the answer is not common knowledge, say 'I don't know'."
    )
}

fn document_prompt(document: &str, question: &str) -> String {
    format!(
        "You answer questions strictly from the provided document.\n\
         \n\
         DOCUMENT:\n\
         {document}\n\
         \n\
         QUESTION: {question}\n\
         \n\
         Extract and explain all content relevant to the question, including \
         definitions and key points. If ANY relevant content is found, summarize it. \
         Reply with exactly 'Not found in document' only if the document is truly \
         unrelated or empty."
    )
}

fn chunk_prompt(chunk: &str) -> String {
    format!(
        "Summarize the following document section in detail, keeping all key \
         points, definitions, and figures.\n\
         \n\
         SECTION:\n\
         {chunk}\n\
         \n\
         Return the detailed summary only."
    )
}

fn web_prompt(question: &str, sources: &[SourceRecord]) -> String {
    let snippets = if sources.is_empty() {
        "No web information found.".to_string()
    } else {
        sources
            .iter()
            .map(|source| format!("- {}: {}", source.title, source.snippet))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "Based on the following web information, answer the question as best as possible.\n\
         \n\
         Question: {question}\n\
         \n\
         Web information:\n\
         {snippets}\n\
         \n\
         Provide a concise, accurate answer."
    )
}

fn chunk_chars(text: &str, max_chars: usize) -> Vec<String> {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn non_empty_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() { fallback } else { text }
}
