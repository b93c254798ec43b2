//! Site assistant
//!
//! A deterministic responder: the lowercased question is checked against an
//! ordered list of rules and the first match answers. Replies arrive after a
//! fixed delay. Transcripts live only in the visitor's state.

use std::sync::Arc;
use std::time::Duration;

use oerc_common::models::{ChatMessage, ChatRole};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use super::in_flight::InFlight;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    Empty,

    #[error("Still answering the previous message")]
    Busy,
}

/// Reply used when no rule matches
pub const FALLBACK_RESPONSE: &str = "Thank you for your question! I'm the OERC AI Assistant. I can help you with information about our research library, membership benefits, upcoming events, and more. What would you like to know?";

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// One `(predicate, response)` pair
pub struct Rule {
    predicate: Predicate,
    response: &'static str,
}

impl Rule {
    pub fn new(
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
        response: &'static str,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            response,
        }
    }

    /// Matches if the lowercased question contains any of `keywords`
    pub fn keywords(keywords: &'static [&'static str], response: &'static str) -> Self {
        Self::new(move |q| keywords.iter().any(|k| q.contains(k)), response)
    }

    fn matches(&self, lowered: &str) -> bool {
        (self.predicate)(lowered)
    }
}

pub struct ChatResponder {
    rules: Vec<Rule>,
    fallback: &'static str,
    delay: Duration,
}

impl ChatResponder {
    pub fn new(rules: Vec<Rule>, fallback: &'static str, delay: Duration) -> Self {
        Self {
            rules,
            fallback,
            delay,
        }
    }

    /// The site's standard rule set
    pub fn standard(delay: Duration) -> Self {
        Self::new(
            vec![
                Rule::keywords(
                    &["membership", "join"],
                    "OERC offers standard membership for $50 CAD/year. Members get access to exclusive research, priority event registration, and networking opportunities. Visit our 'Get Involved' page to register!",
                ),
                Rule::keywords(
                    &["research", "paper"],
                    "Our Research Library contains peer-reviewed papers on curriculum development, equity in education, assessment analytics, and AI in education. You can search by topic or browse our curated collections.",
                ),
                Rule::keywords(
                    &["event", "conference"],
                    "We host the Annual OERC Research Symposium and various workshops throughout the year. Check our Events page for upcoming dates and registration details.",
                ),
                Rule::keywords(
                    &["contact", "email"],
                    "You can reach us at contact@oerc.org. We typically respond within 1-2 business days.",
                ),
            ],
            FALLBACK_RESPONSE,
            delay,
        )
    }

    /// Answer for `question`, first matching rule wins
    pub fn respond(&self, question: &str) -> &'static str {
        let lowered = question.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lowered))
            .map(|r| r.response)
            .unwrap_or(self.fallback)
    }
}

/// One visitor's conversation
#[derive(Debug, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ChatTranscript {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Append the visitor's question, wait, then append the reply
///
/// If the caller goes away before the reply, the question stays in the
/// transcript unanswered and the transcript accepts new messages.
pub async fn ask(
    transcript: &Arc<Mutex<ChatTranscript>>,
    responder: &ChatResponder,
    text: &str,
) -> Result<ChatMessage, ChatError> {
    let question = text.trim();
    if question.is_empty() {
        return Err(ChatError::Empty);
    }
    {
        let mut t = transcript.lock().await;
        if t.pending {
            return Err(ChatError::Busy);
        }
        t.pending = true;
        t.messages.push(ChatMessage::new(ChatRole::User, question));
    }
    let in_flight = InFlight::new(transcript, |t: &mut ChatTranscript| t.pending = false);

    sleep(responder.delay).await;
    let reply = ChatMessage::new(ChatRole::Model, responder.respond(question));
    debug!(chars = question.len(), "Assistant replied");

    let mut t = transcript.lock().await;
    in_flight.disarm();
    t.messages.push(reply.clone());
    t.pending = false;
    Ok(reply)
}
