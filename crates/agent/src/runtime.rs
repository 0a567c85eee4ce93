use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use outfitter_core::config::LlmConfig;
use outfitter_core::domain::brief::{
    default_budget, default_items, Preferences, Scenario, ShoppingBrief, DEFAULT_DELIVERY_DAYS,
    DEFAULT_SIZE,
};
use outfitter_core::domain::product::{Category, Warmth};

use crate::llm::{GeminiClient, LlmClient};
use crate::rules;

/// Which implementation produced a brief.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMethod {
    GeminiAi,
    Rules,
}

#[derive(Clone, Debug)]
pub struct ParsedBrief {
    pub brief: ShoppingBrief,
    pub method: ParseMethod,
}

/// Selects between the LLM and rule-based parsers.
///
/// `parse` never fails: any error on the LLM path degrades to the
/// deterministic rules.
pub struct BriefParser {
    llm: Option<Arc<dyn LlmClient>>,
    model: Option<String>,
}

impl BriefParser {
    pub fn rule_based() -> Self {
        Self { llm: None, model: None }
    }

    pub fn with_llm(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self { llm: Some(client), model: Some(model.into()) }
    }

    /// Builds the parser the configuration asks for.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::rule_based());
        }

        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("llm.enabled is true but no api key is configured"))?;
        let client =
            GeminiClient::new(&config.base_url, &config.model, api_key, config.timeout_secs)?;
        Ok(Self::with_llm(Arc::new(client), config.model.clone()))
    }

    pub fn uses_llm(&self) -> bool {
        self.llm.is_some()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub async fn parse(&self, message: &str) -> ParsedBrief {
        if let Some(client) = &self.llm {
            match parse_with_llm(client.as_ref(), message).await {
                Ok(brief) => return ParsedBrief { brief, method: ParseMethod::GeminiAi },
                Err(error) => {
                    warn!(
                        event_name = "agent.parse.llm_fallback",
                        error = %error,
                        "LLM brief parsing failed, falling back to rules"
                    );
                }
            }
        }

        ParsedBrief { brief: rules::parse(message), method: ParseMethod::Rules }
    }
}

async fn parse_with_llm(client: &dyn LlmClient, message: &str) -> Result<ShoppingBrief> {
    let reply = client.complete(&extraction_prompt(message)).await?;
    let json = strip_code_fences(&reply);
    let patch: BriefPatch =
        serde_json::from_str(json).context("LLM reply was not valid brief JSON")?;

    let brief = patch.into_brief();
    brief.validate().map_err(|error| anyhow!(error))?;
    Ok(brief)
}

fn extraction_prompt(message: &str) -> String {
    format!(
        r#"You are a shopping assistant. Parse this shopping request into JSON.

User request: "{message}"

Extract the following information and return ONLY valid JSON (no markdown, no explanations):

{{
    "budget": <number or 400 if not specified>,
    "delivery_days": <number or 5 if not specified>,
    "size": "<size like M, L, XL or M if not specified>",
    "preferences": {{
        "warmth": "<high/medium/low or empty>",
        "waterproof": <true/false>,
        "brand": "<brand name or empty>",
        "color": "<color or empty>"
    }},
    "items": [<list of items like "jacket", "pants", "gloves", "goggles", "helmet">],
    "scenario": "<skiing/party/hackathon/custom>"
}}

Rules:
- If the request mentions skiing/snow: include jacket, pants, gloves, goggles, helmet
- If the request mentions party/game: include jacket, pants
- If the request mentions hackathon: include jacket, pants
- Extract budget from phrases like "$400", "400 dollars", "budget 400"
- Extract delivery from "5 days", "within 3 days", "in 2 days"
- Extract size from "size M", "medium", "large"
- Detect warmth need from "warm", "cold weather", "insulated"
- Detect waterproof from "waterproof", "water resistant", "rain"

Return ONLY the JSON object, nothing else."#
    )
}

/// Models sometimes wrap the JSON in a Markdown code block despite the
/// prompt; unwrap it before deserializing.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Lenient mirror of `ShoppingBrief` for LLM output: every field optional,
/// enums tolerated as free-form strings, empty strings treated as absent.
#[derive(Debug, Default, Deserialize)]
struct BriefPatch {
    budget: Option<Decimal>,
    delivery_days: Option<u32>,
    size: Option<String>,
    #[serde(default)]
    preferences: PreferencesPatch,
    items: Option<Vec<String>>,
    scenario: Option<Scenario>,
}

#[derive(Debug, Default, Deserialize)]
struct PreferencesPatch {
    warmth: Option<String>,
    #[serde(default)]
    waterproof: bool,
    brand: Option<String>,
    color: Option<String>,
}

impl BriefPatch {
    fn into_brief(self) -> ShoppingBrief {
        let items: Vec<Category> = self
            .items
            .unwrap_or_default()
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .map(Category::new)
            .collect();

        ShoppingBrief {
            budget: self.budget.unwrap_or_else(default_budget),
            delivery_days: self.delivery_days.unwrap_or(DEFAULT_DELIVERY_DAYS),
            size: non_empty(self.size).unwrap_or_else(|| DEFAULT_SIZE.to_string()),
            preferences: Preferences {
                warmth: self.preferences.warmth.as_deref().and_then(parse_warmth),
                waterproof: self.preferences.waterproof,
                brand: non_empty(self.preferences.brand),
                color: non_empty(self.preferences.color),
            },
            items: if items.is_empty() { default_items() } else { items },
            scenario: self.scenario.unwrap_or_default(),
        }
    }
}

fn parse_warmth(value: &str) -> Option<Warmth> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" => Some(Warmth::Low),
        "medium" => Some(Warmth::Medium),
        "high" => Some(Warmth::High),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|inner| inner.trim().to_string()).filter(|inner| !inner.is_empty())
}
