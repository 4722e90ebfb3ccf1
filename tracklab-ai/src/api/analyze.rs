//! Text analysis endpoint

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::groq::{extract_json_block, ChatMessage};
use crate::AppState;

fn default_analysis_type() -> String {
    "sentiment".to_string()
}

/// POST /analyze/text request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_type: String,
    pub results: Value,
    pub confidence: f64,
    pub suggestions: Vec<String>,
}

fn analysis_instruction(analysis_type: &str) -> &'static str {
    match analysis_type {
        "genre" => {
            "Determine the musical genre of these song lyrics. Name the main genre and 2-3 \
             possible subgenres."
        }
        "themes" => {
            "Identify the main themes and motifs in this text. What emotions and meanings are \
             present?"
        }
        _ => {
            "Analyze the sentiment of this text. Decide whether it is positive, negative, or \
             neutral. Give a confidence percentage and the main reasons."
        }
    }
}

fn analysis_prompts(req: &AnalyzeRequest) -> (String, String) {
    let system = "You are an expert at analyzing song lyrics. You analyze texts from different \
                  angles and give concrete, helpful answers."
        .to_string();

    let user = format!(
        "{instruction}\n\nTEXT TO ANALYZE:\n{text}\n\n\
         Return the answer as JSON with fields: analysis, confidence (0.0-1.0), suggestions[]",
        instruction = analysis_instruction(&req.analysis_type),
        text = req.text,
    );

    (system, user)
}

/// POST /analyze/text
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }

    let (system, user) = analysis_prompts(&request);
    let messages = [ChatMessage::system(system), ChatMessage::user(user)];

    let raw = state.client.complete(&messages, 0.3, 600).await?;

    let response = match serde_json::from_str::<Value>(extract_json_block(&raw)) {
        Ok(parsed) => {
            let confidence = parsed
                .get("confidence")
                .and_then(Value::as_f64)
                .unwrap_or(0.8);
            let suggestions = parsed
                .get("suggestions")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            AnalysisResponse {
                analysis_type: request.analysis_type,
                results: parsed,
                confidence,
                suggestions,
            }
        }
        Err(_) => {
            tracing::debug!("analysis response was not valid JSON, returning raw text");
            AnalysisResponse {
                analysis_type: request.analysis_type,
                results: serde_json::json!({ "analysis": raw, "raw_response": true }),
                confidence: 0.7,
                suggestions: vec!["Analysis available as plain text".to_string()],
            }
        }
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_instruction_falls_back_to_sentiment() {
        assert_eq!(
            analysis_instruction("unknown"),
            analysis_instruction("sentiment")
        );
        assert_ne!(analysis_instruction("genre"), analysis_instruction("themes"));
    }

    #[test]
    fn test_analysis_prompts_embed_text() {
        let req = AnalyzeRequest {
            text: "the rain keeps falling".to_string(),
            analysis_type: "themes".to_string(),
        };
        let (_, user) = analysis_prompts(&req);
        assert!(user.contains("the rain keeps falling"));
        assert!(user.contains("themes and motifs"));
        assert!(user.contains("confidence"));
    }
}
