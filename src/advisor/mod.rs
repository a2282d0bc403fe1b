use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FlowError;
use crate::weather::WeatherReading;

const GEMINI_API: &str = "https://generativelanguage.googleapis.com";

/// Advisor configuration loaded from scentcast.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// What to wear for this weather, straight from the model
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FragranceRecommendation {
    pub mood: String,
    pub atmosphere: String,
    pub scents: String,
    pub reason: String,
}

/// Turn a weather reading into a fragrance recommendation
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn recommend(&self, weather: &WeatherReading) -> Result<FragranceRecommendation, FlowError>;
}

/// Gemini generateContent client. The API key travels as a URL query
/// parameter and must never appear in logs.
pub struct GeminiAdvisor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiAdvisor {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("scentcast/0.1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: GEMINI_API.to_string(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn recommend(&self, weather: &WeatherReading) -> Result<FragranceRecommendation, FlowError> {
        let prompt = build_prompt(weather);
        let body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"responseMimeType": "application/json"}
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        debug!("Gemini request (model: {})", self.model);
        let resp = self.http.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(FlowError::AiRequest {
                status: status.as_u16(),
                detail: truncate(&text, 200),
            });
        }

        let reply: GenerateContentResponse = resp.json().await?;
        let text = extract_text(reply)?;
        parse_recommendation(&text)
    }
}

fn build_prompt(weather: &WeatherReading) -> String {
    format!(
        r#"You are a fragrance stylist. Suggest a fragrance to wear in this weather.

Weather: {}
Temperature: {}°C

Respond with ONLY a JSON object:
{{"mood": "...", "atmosphere": "...", "scents": "...", "reason": "..."}}

Where:
- mood: one or two words for the mood this weather sets
- atmosphere: a short phrase describing the atmosphere outside
- scents: the scent notes to wear, e.g. "Amber & Vanilla"
- reason: one sentence explaining why the scents fit the weather"#,
        weather.description, weather.temperature_c,
    )
}

/// Pull the generated text out of the candidates/content/parts nesting
fn extract_text(reply: GenerateContentResponse) -> Result<String, FlowError> {
    reply
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or(FlowError::AiResponseShape)
}

/// Parse the inner JSON document (handle markdown code blocks too)
fn parse_recommendation(text: &str) -> Result<FragranceRecommendation, FlowError> {
    let json_str = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };
    Ok(serde_json::from_str(json_str)?)
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max.saturating_sub(3);
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(raw: &str) -> GenerateContentResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_prompt_embeds_conditions() {
        let weather = WeatherReading::from_current(12.3, 61, None);
        let prompt = build_prompt(&weather);
        assert!(prompt.contains("Slight rain"));
        assert!(prompt.contains("12°C"));
    }

    #[test]
    fn test_extract_text_happy_path() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "{\"mood\":\"Cozy\"}"}]}}]}"#;
        let text = extract_text(reply(raw)).unwrap();
        assert_eq!(text, r#"{"mood":"Cozy"}"#);
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let err = extract_text(reply(r#"{"candidates": []}"#)).unwrap_err();
        assert!(matches!(err, FlowError::AiResponseShape));

        let err = extract_text(reply(r#"{}"#)).unwrap_err();
        assert!(matches!(err, FlowError::AiResponseShape));
    }

    #[test]
    fn test_extract_text_without_parts() {
        let raw = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        let err = extract_text(reply(raw)).unwrap_err();
        assert!(matches!(err, FlowError::AiResponseShape));
    }

    #[test]
    fn test_parse_recommendation() {
        let rec = parse_recommendation(
            r#"{"mood":"Cozy","atmosphere":"Rainy afternoon","scents":"Amber & Vanilla","reason":"Warm scents suit rain."}"#,
        )
        .unwrap();
        assert_eq!(rec.mood, "Cozy");
        assert_eq!(rec.scents, "Amber & Vanilla");
    }

    #[test]
    fn test_parse_recommendation_in_code_fence() {
        let text = "```json\n{\"mood\":\"Fresh\",\"atmosphere\":\"Crisp morning\",\"scents\":\"Citrus\",\"reason\":\"Bright notes for a clear day.\"}\n```";
        let rec = parse_recommendation(text).unwrap();
        assert_eq!(rec.mood, "Fresh");
    }

    #[test]
    fn test_parse_recommendation_rejects_malformed_payload() {
        let err = parse_recommendation("not json at all").unwrap_err();
        assert!(matches!(err, FlowError::Json(_)));
    }
}
