//! Tagged envelopes returned to the chat client, one per turn.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolEnvelope {
    QuestionMultipleChoice {
        question: String,
        #[serde(default)]
        reasoning: String,
        options: Vec<String>,
    },
    QuestionSlider {
        question: String,
        #[serde(default)]
        reasoning: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<Number>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<Number>,
        /// Legacy `"min-max"` range text
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slider_range: Option<String>,
    },
    QuestionOpenEnded {
        question: String,
        #[serde(default)]
        reasoning: String,
        /// The user message that produced an unparseable reply
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_message: Option<String>,
    },
    UserRequirement {
        requirement: String,
    },
    UserConstraint {
        constraint: String,
    },
    Sources {
        sources: Vec<Source>,
    },
    UserReport {
        message: String,
    },
    RecommendationsList {
        recommendations: Vec<Recommendation>,
    },
    Noop,
}

impl ToolEnvelope {
    /// The `type` tag this envelope serializes with.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::QuestionMultipleChoice { .. } => "question_multiple_choice",
            Self::QuestionSlider { .. } => "question_slider",
            Self::QuestionOpenEnded { .. } => "question_open_ended",
            Self::UserRequirement { .. } => "user_requirement",
            Self::UserConstraint { .. } => "user_constraint",
            Self::Sources { .. } => "sources",
            Self::UserReport { .. } => "user_report",
            Self::RecommendationsList { .. } => "recommendations_list",
            Self::Noop => "noop",
        }
    }

    /// Compact JSON string, as stored in history and sent to the client.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"noop"}"#.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Source {
    pub name: String,
    pub url: String,
}

/// One recommended product. Fields other than `text` and `image` (specs,
/// price, ratings, ...) pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
