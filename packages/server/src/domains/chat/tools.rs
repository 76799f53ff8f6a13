//! The fixed chat tool catalog and its name-to-envelope dispatch table.

use std::collections::HashSet;

use anyhow::{bail, Result};
use openai_client::{ToolCall, ToolDefinition};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Number, Value};

use super::envelope::{Recommendation, Source, ToolEnvelope};

// =============================================================================
// Tool arguments
// =============================================================================

// Question tools advertise `reason` as required but tolerate it missing, so
// the schema comes from a separate `*Spec` type.

#[derive(Debug, Deserialize)]
struct MultipleChoiceArgs {
    question: String,
    #[serde(default, alias = "reasoning")]
    reason: String,
    options: Vec<String>,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct MultipleChoiceSpec {
    question: String,
    reason: String,
    options: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SliderArgs {
    question: String,
    #[serde(default, alias = "reasoning")]
    reason: String,
    min: Option<Number>,
    max: Option<Number>,
    #[serde(default)]
    slider_range: Option<String>,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct SliderSpec {
    question: String,
    reason: String,
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OpenEndedArgs {
    question: String,
    #[serde(default, alias = "reasoning")]
    reason: String,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct OpenEndedSpec {
    question: String,
    reason: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RequirementArgs {
    requirement: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ConstraintArgs {
    constraint: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SourcesArgs {
    sources: Vec<Source>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UserReportArgs {
    message: String,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct RecommendationSpec {
    text: String,
    specs: String,
    price: String,
    ratings: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RecommendationsArgs {
    #[schemars(with = "Vec<RecommendationSpec>")]
    recommendations: Vec<Recommendation>,
}

// =============================================================================
// Tools
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatTool {
    MultipleChoice,
    SliderQuestion,
    OpenEndedQuestion,
    UserRequirement,
    UserConstraint,
    Sources,
    UserReport,
    Recommendations,
}

impl ChatTool {
    pub const ALL: [ChatTool; 8] = [
        ChatTool::MultipleChoice,
        ChatTool::SliderQuestion,
        ChatTool::OpenEndedQuestion,
        ChatTool::UserRequirement,
        ChatTool::UserConstraint,
        ChatTool::Sources,
        ChatTool::UserReport,
        ChatTool::Recommendations,
    ];

    /// Name offered to the model.
    pub fn name(self) -> &'static str {
        match self {
            Self::MultipleChoice => "createMultipleChoice",
            Self::SliderQuestion => "createSliderQuestion",
            Self::OpenEndedQuestion => "createOpenEndedQuestion",
            Self::UserRequirement => "addUserRequirement",
            Self::UserConstraint => "addUserConstraint",
            Self::Sources => "addSources",
            Self::UserReport => "createUserReport",
            Self::Recommendations => "recommendations",
        }
    }

    /// Other spellings the model uses for the same tool.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::MultipleChoice => &["create_multiple_choice"],
            Self::SliderQuestion => &["create_slider_question"],
            Self::OpenEndedQuestion => &["create_open_ended_question"],
            Self::UserRequirement => &["add_user_requirement"],
            Self::UserConstraint => &["add_user_constraint"],
            Self::Sources => &["add_sources"],
            Self::UserReport => &["create_user_report"],
            Self::Recommendations => &["createRecommendations", "create_recommendations"],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == name || tool.aliases().contains(&name))
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::MultipleChoice => "Create a multiple choice question for the user.",
            Self::SliderQuestion => "Create a question with a slider for a numerical range.",
            Self::OpenEndedQuestion => "Create an open-ended question for the user.",
            Self::UserRequirement => "Add a requirement to the user's requirements.",
            Self::UserConstraint => "Add a constraint to the user's constraints.",
            Self::Sources => "Add sources/links with names and URLs for reference.",
            Self::UserReport => {
                "Send message of summarized findings and evaluation (one paragraph)"
            }
            Self::Recommendations => "Create a list of product recommendations.",
        }
    }

    pub fn definition(self) -> ToolDefinition {
        let (name, description) = (self.name(), self.description());
        match self {
            Self::MultipleChoice => ToolDefinition::for_args::<MultipleChoiceSpec>(name, description),
            Self::SliderQuestion => ToolDefinition::for_args::<SliderSpec>(name, description),
            Self::OpenEndedQuestion => ToolDefinition::for_args::<OpenEndedSpec>(name, description),
            Self::UserRequirement => ToolDefinition::for_args::<RequirementArgs>(name, description),
            Self::UserConstraint => ToolDefinition::for_args::<ConstraintArgs>(name, description),
            Self::Sources => ToolDefinition::for_args::<SourcesArgs>(name, description),
            Self::UserReport => ToolDefinition::for_args::<UserReportArgs>(name, description),
            Self::Recommendations => {
                ToolDefinition::for_args::<RecommendationsArgs>(name, description)
            }
        }
    }

    /// Build this tool's envelope from its arguments.
    ///
    /// Requirements and constraints that merely echo a confirmation
    /// ("Requirement added: ...") become [`ToolEnvelope::Noop`].
    pub fn envelope(self, args: &Value) -> Result<ToolEnvelope> {
        let envelope = match self {
            Self::MultipleChoice => {
                let a: MultipleChoiceArgs = read_args(args)?;
                ToolEnvelope::QuestionMultipleChoice {
                    question: a.question,
                    reasoning: a.reason,
                    options: a.options,
                }
            }
            Self::SliderQuestion => {
                let a: SliderArgs = read_args(args)?;
                let has_bounds = a.min.is_some() && a.max.is_some();
                if !has_bounds && a.slider_range.is_none() {
                    bail!("slider question needs min and max or slider_range");
                }
                ToolEnvelope::QuestionSlider {
                    question: a.question,
                    reasoning: a.reason,
                    min: a.min,
                    max: a.max,
                    slider_range: a.slider_range,
                }
            }
            Self::OpenEndedQuestion => {
                let a: OpenEndedArgs = read_args(args)?;
                ToolEnvelope::QuestionOpenEnded {
                    question: a.question,
                    reasoning: a.reason,
                    original_message: None,
                }
            }
            Self::UserRequirement => {
                let a: RequirementArgs = read_args(args)?;
                if echoes_confirmation(&a.requirement, "requirement added") {
                    ToolEnvelope::Noop
                } else {
                    ToolEnvelope::UserRequirement {
                        requirement: a.requirement,
                    }
                }
            }
            Self::UserConstraint => {
                let a: ConstraintArgs = read_args(args)?;
                if echoes_confirmation(&a.constraint, "constraint added") {
                    ToolEnvelope::Noop
                } else {
                    ToolEnvelope::UserConstraint {
                        constraint: a.constraint,
                    }
                }
            }
            Self::Sources => {
                let a: SourcesArgs = read_args(args)?;
                ToolEnvelope::Sources { sources: a.sources }
            }
            Self::UserReport => {
                let a: UserReportArgs = read_args(args)?;
                ToolEnvelope::UserReport { message: a.message }
            }
            Self::Recommendations => {
                let a: RecommendationsArgs = read_args(args)?;
                ToolEnvelope::RecommendationsList {
                    recommendations: a.recommendations,
                }
            }
        };
        Ok(envelope)
    }
}

fn read_args<A: DeserializeOwned>(args: &Value) -> Result<A> {
    Ok(A::deserialize(args)?)
}

fn echoes_confirmation(text: &str, phrase: &str) -> bool {
    text.to_lowercase().contains(phrase)
}

// =============================================================================
// Catalog
// =============================================================================

/// The tool definitions offered on every chat turn, validated once at startup.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    definitions: Vec<ToolDefinition>,
}

impl ToolCatalog {
    /// Build and check the catalog. Every name and alias must be unique and
    /// resolve back to its tool, and every schema must be an object schema.
    pub fn new() -> Result<Self> {
        let mut seen = HashSet::new();
        for tool in ChatTool::ALL {
            for name in std::iter::once(tool.name()).chain(tool.aliases().iter().copied()) {
                if !seen.insert(name) {
                    bail!("duplicate chat tool name: {}", name);
                }
                if ChatTool::from_name(name) != Some(tool) {
                    bail!("chat tool name {} does not resolve to {:?}", name, tool);
                }
            }
        }

        let definitions: Vec<ToolDefinition> =
            ChatTool::ALL.into_iter().map(ChatTool::definition).collect();

        for definition in &definitions {
            let params = &definition.parameters;
            if params.get("type").and_then(Value::as_str) != Some("object")
                || !params.get("properties").is_some_and(Value::is_object)
            {
                bail!("chat tool {} has no object parameter schema", definition.name);
            }
        }

        tracing::debug!(count = definitions.len(), "Chat tool catalog ready");
        Ok(Self { definitions })
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Envelope for a model tool call, or `None` when the name is unknown or
    /// the arguments do not fit the tool.
    pub fn dispatch(&self, call: &ToolCall) -> Option<ToolEnvelope> {
        let Some(tool) = ChatTool::from_name(&call.name) else {
            tracing::warn!(tool = %call.name, "Model called an unknown tool");
            return None;
        };

        let args: Value = match call.parse_args() {
            Ok(args) => args,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool arguments were not JSON");
                return None;
            }
        };

        match tool.envelope(&args) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool arguments did not fit");
                None
            }
        }
    }
}
