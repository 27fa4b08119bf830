//! Topic and education-level classification through a text completion service.

use std::sync::Arc;

use log::warn;
use serde::Deserialize;

use crate::annotate::{Annotation, Annotator};
use crate::data::DataValue;
use crate::error::{PrepError, Result};

/// Topics a classification may name.
pub const ALLOWED_TOPICS: [&str; 23] = [
    "Arts & Humanities",
    "History & Archaeology",
    "Social Sciences",
    "Mathematics",
    "Physical Sciences",
    "Children entertainment",
    "Computer Science",
    "Engineering & Technology",
    "Life Sciences",
    "Health & Medicine",
    "Education Studies",
    "Business & Finance",
    "Law & Legal Studies",
    "Environmental Science & Sustainability",
    "Languages & Linguistics",
    "Daily Routines & Home Management",
    "Family & Interpersonal Relationships",
    "Hobbies, Leisure & Entertainment",
    "Personal Health, Wellness & Lifestyle",
    "Work Life & Career",
    "Consumer Experiences & Personal Finance",
    "Personal Journeys & Life Events",
    "Food & Culinary",
];

/// Education levels a classification may name.
pub const EDUCATION_LEVELS: [&str; 5] = [
    "primary school",
    "middle school",
    "high school",
    "university degree",
    "PhD degree",
];

pub const TOPIC_FIELD: &str = "topic";
pub const EDUCATION_FIELD: &str = "education";

const DEFAULT_MAX_TEXT_LENGTH: usize = 15_000;

/// A remote or local text completion service.
///
/// Return [`PrepError::InvalidArgument`] when the service rejects the request
/// itself, any other error for transport or service failures.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct Classification {
    topic: Option<String>,
    education: Option<String>,
}

/// Classifies text into one of [`ALLOWED_TOPICS`] and [`EDUCATION_LEVELS`].
pub struct TopicClassifier {
    backend: Arc<dyn CompletionBackend>,
    max_text_length: usize,
}

impl TopicClassifier {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }

    /// Characters of input sent before truncation.
    pub fn max_text_length(mut self, chars: usize) -> Self {
        self.max_text_length = chars;
        self
    }

    fn truncate<'t>(&self, text: &'t str) -> std::borrow::Cow<'t, str> {
        match text.char_indices().nth(self.max_text_length) {
            Some((cut, _)) => format!("{}...", &text[..cut]).into(),
            None => text.into(),
        }
    }

    /// The classification prompt for `text`.
    pub fn prompt(&self, text: &str) -> String {
        let text = self.truncate(text);
        format!(
            "Analyze the following text and determine its primary topic and the educational \
             level typically required to understand it.\n\n\
             Text:\n\"{text}\"\n\n\
             Instructions:\n\
             1. Choose the *single best* topic from this list: {topics:?}\n\
             2. Choose the *single most appropriate* education level one would need to \
             properly understand the text: {levels:?}\n\
             3. Provide your answer ONLY in the following JSON format:\n   \
             {{\"topic\": \"SELECTED_TOPIC\", \"education\": \"SELECTED_EDUCATION\"}}\n\n\
             Output ONLY the JSON object.\n",
            topics = ALLOWED_TOPICS,
            levels = EDUCATION_LEVELS,
        )
    }

    fn both(value: DataValue) -> Annotation {
        vec![
            (TOPIC_FIELD.to_string(), value.clone()),
            (EDUCATION_FIELD.to_string(), value),
        ]
    }
}

/// Drop a surrounding ```json fence if present.
fn strip_fence(response: &str) -> &str {
    let mut body = response.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

fn validated(value: Option<String>, allowed: &[&str], field: &str) -> DataValue {
    match value {
        Some(v) if allowed.contains(&v.as_str()) => DataValue::Text(v),
        other => {
            warn!("received invalid {field} {other:?}");
            DataValue::sentinel(&format!("Invalid {field}"))
        }
    }
}

impl Annotator for TopicClassifier {
    fn name(&self) -> &str {
        "topic classifier"
    }

    fn fields(&self) -> Vec<String> {
        vec![TOPIC_FIELD.to_string(), EDUCATION_FIELD.to_string()]
    }

    fn annotate(&self, text: &str) -> Result<Annotation> {
        if text.trim().is_empty() {
            return Ok(Self::both(DataValue::Null));
        }

        let response = match self.backend.complete(&self.prompt(text)) {
            Ok(response) => response,
            Err(PrepError::InvalidArgument(msg)) => {
                warn!("completion request rejected: {msg}");
                return Ok(Self::both(DataValue::sentinel("API Value")));
            }
            Err(e) => {
                warn!("completion call failed: {e}");
                return Ok(Self::both(DataValue::sentinel("API Call")));
            }
        };

        let body = strip_fence(&response);
        let parsed: Classification = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("failed to decode classification {body:?}: {e}");
                return Ok(Self::both(DataValue::sentinel("JSON Decode")));
            }
        };

        Ok(vec![
            (
                TOPIC_FIELD.to_string(),
                validated(parsed.topic, &ALLOWED_TOPICS, TOPIC_FIELD),
            ),
            (
                EDUCATION_FIELD.to_string(),
                validated(parsed.education, &EDUCATION_LEVELS, EDUCATION_FIELD),
            ),
        ])
    }
}
