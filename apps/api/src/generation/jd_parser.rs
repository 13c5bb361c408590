//! JD Parser — extracts structured requirements, keywords, and tone from a raw job description.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::prompts::{JD_PARSE_PROMPT_TEMPLATE, JD_PARSE_SYSTEM};
use crate::llm_client::LlmClient;

/// Detected tone of a job description. Drives verb selection in generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum JDTone {
    AggressiveStartup,
    #[default]
    CollaborativeEnterprise,
    ResearchOriented,
    ProductOriented,
}

/// A single requirement extracted from the JD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub text: String,
    pub is_required: bool,
}

/// High-level signals about the role shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSignals {
    pub is_startup: bool,
    pub is_ic_focused: bool,
    pub is_research: bool,
    pub seniority: String,
}

/// A single keyword from the JD, weighted by position and frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, requirements=0.8, responsibilities=0.6, about=0.3
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

/// Full structured output of JD parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedJD {
    pub hard_requirements: Vec<Requirement>,
    pub soft_signals: Vec<String>,
    pub role_signals: RoleSignals,
    pub keyword_inventory: Vec<KeywordEntry>,
    pub detected_tone: JDTone,
}

/// Parses a job description using the LLM and returns a structured `ParsedJD`.
pub async fn parse_jd(jd_text: &str, llm: &LlmClient) -> Result<ParsedJD, AppError> {
    let prompt = JD_PARSE_PROMPT_TEMPLATE.replace("{jd_text}", jd_text);
    llm.call_json::<ParsedJD>(&prompt, JD_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("JD parsing failed: {e}")))
}
