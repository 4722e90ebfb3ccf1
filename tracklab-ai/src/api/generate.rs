//! Content generation endpoints: lyrics and marketing descriptions

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ApiError;
use crate::groq::{extract_json_block, ChatMessage};
use crate::AppState;

fn default_language() -> String {
    "english".to_string()
}

fn default_mood() -> String {
    "energetic".to_string()
}

fn default_length() -> String {
    "standard".to_string()
}

fn default_audience() -> String {
    "general".to_string()
}

/// POST /generate/lyrics request body
#[derive(Debug, Deserialize)]
pub struct LyricsRequest {
    pub genre: String,
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_mood")]
    pub mood: String,
    #[serde(default = "default_length")]
    pub length: String,
}

#[derive(Debug, Serialize)]
pub struct LyricsResponse {
    pub lyrics: String,
    pub generated_by: String,
    pub genre: String,
    pub theme: String,
    pub generation_time: String,
    pub word_count: usize,
}

fn length_instruction(length: &str) -> &'static str {
    match length {
        "short" => "Write a short lyric (one verse plus a chorus)",
        "long" => "Write an extended lyric (3-4 verses, chorus, bridge, and outro)",
        _ => "Write a full lyric (2-3 verses, chorus, and bridge)",
    }
}

fn lyrics_prompts(req: &LyricsRequest) -> (String, String) {
    let system = format!(
        "You are a professional songwriter. You create original, creative lyrics in {language}.\n\n\
         RULES:\n\
         - Lyrics must be original and must not infringe any copyright\n\
         - Use poetic language appropriate for the {genre} genre\n\
         - Lyrics must have a clear structure (verse/chorus)\n\
         - Mood: {mood}\n\
         - {length}\n\
         - Avoid profanity and controversial content",
        language = req.language,
        genre = req.genre,
        mood = req.mood,
        length = length_instruction(&req.length),
    );

    let user = format!(
        "Write song lyrics:\n\
         - Genre: {genre}\n\
         - Theme: {theme}\n\
         - Mood: {mood}\n\
         - Language: {language}\n\n\
         Clearly label the song sections (e.g. [Verse 1], [Chorus], [Verse 2], [Bridge]).",
        genre = req.genre,
        theme = req.theme,
        mood = req.mood,
        language = req.language,
    );

    (system, user)
}

/// POST /generate/lyrics
pub async fn generate_lyrics(
    State(state): State<AppState>,
    Json(request): Json<LyricsRequest>,
) -> Result<Json<LyricsResponse>, ApiError> {
    if request.genre.trim().is_empty() || request.theme.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "genre and theme must not be empty".to_string(),
        ));
    }

    let start = Instant::now();

    let (system, user) = lyrics_prompts(&request);
    let messages = [ChatMessage::system(system), ChatMessage::user(user)];

    let lyrics = state.client.complete(&messages, 0.8, 1500).await?;

    let word_count = lyrics.split_whitespace().count();
    let elapsed = start.elapsed().as_secs_f64();

    tracing::info!(
        genre = %request.genre,
        word_count = word_count,
        "generated lyrics"
    );

    Ok(Json(LyricsResponse {
        lyrics,
        generated_by: state.client.model().to_string(),
        genre: request.genre,
        theme: request.theme,
        generation_time: format!("{:.2}s", elapsed),
        word_count,
    }))
}

/// POST /generate/description request body
#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    pub title: String,
    pub artist: String,
    pub genre: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default = "default_audience")]
    pub target_audience: String,
}

#[derive(Debug, Serialize)]
pub struct DescriptionResponse {
    pub short_description: String,
    pub marketing_copy: String,
    pub social_media_caption: String,
    pub hashtags: Vec<String>,
    pub generated_by: String,
}

/// Fields the model is asked to return, parsed leniently.
#[derive(Debug, Default, Deserialize)]
struct DescriptionFields {
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    marketing_copy: String,
    #[serde(default)]
    social_media_caption: String,
    #[serde(default)]
    hashtags: Vec<String>,
}

fn description_prompts(req: &DescriptionRequest) -> (String, String) {
    let system = format!(
        "You are a music marketing expert. You write engaging descriptions of tracks for \
         different platforms.\n\n\
         Target audience: {audience}\n\n\
         TASKS:\n\
         1. Short description (1-2 sentences), concise and inviting\n\
         2. Marketing copy (50-100 words), more detailed and emotional\n\
         3. Social media caption (short)\n\
         4. 5-8 social media hashtags\n\n\
         Use professional but accessible language.",
        audience = req.target_audience,
    );

    let mood_line = match &req.mood {
        Some(mood) => format!(" with a {} mood", mood),
        None => String::new(),
    };

    let user = format!(
        "Create marketing descriptions for the track:\n\
         - Title: \"{title}\"\n\
         - Artist: {artist}\n\
         - Genre: {genre}{mood}\n\n\
         Return the answer as JSON:\n\
         {{\n\
           \"short_description\": \"...\",\n\
           \"marketing_copy\": \"...\",\n\
           \"social_media_caption\": \"...\",\n\
           \"hashtags\": [\"#tag1\", \"#tag2\"]\n\
         }}",
        title = req.title,
        artist = req.artist,
        genre = req.genre,
        mood = mood_line,
    );

    (system, user)
}

/// Fallback when the model ignores the JSON instruction.
fn description_fallback(raw: &str, req: &DescriptionRequest) -> DescriptionResponse {
    let short: String = raw.chars().take(200).collect();
    DescriptionResponse {
        short_description: format!("{}...", short),
        marketing_copy: raw.to_string(),
        social_media_caption: format!("{} - {}", req.title, req.artist),
        hashtags: vec![
            format!("#{}", req.genre.to_lowercase().replace(' ', "")),
            "#music".to_string(),
            "#newrelease".to_string(),
        ],
        generated_by: String::new(),
    }
}

/// POST /generate/description
pub async fn generate_description(
    State(state): State<AppState>,
    Json(request): Json<DescriptionRequest>,
) -> Result<Json<DescriptionResponse>, ApiError> {
    if request.title.trim().is_empty() || request.artist.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "title and artist must not be empty".to_string(),
        ));
    }

    let (system, user) = description_prompts(&request);
    let messages = [ChatMessage::system(system), ChatMessage::user(user)];

    let raw = state.client.complete(&messages, 0.7, 800).await?;

    let mut response = match serde_json::from_str::<DescriptionFields>(extract_json_block(&raw)) {
        Ok(fields) => DescriptionResponse {
            short_description: fields.short_description,
            marketing_copy: fields.marketing_copy,
            social_media_caption: fields.social_media_caption,
            hashtags: fields.hashtags,
            generated_by: String::new(),
        },
        Err(_) => {
            tracing::debug!("description response was not valid JSON, using raw text");
            description_fallback(&raw, &request)
        }
    };
    response.generated_by = state.client.model().to_string();

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lyrics_request() -> LyricsRequest {
        LyricsRequest {
            genre: "synthwave".to_string(),
            theme: "night driving".to_string(),
            language: "english".to_string(),
            mood: "dreamy".to_string(),
            length: "short".to_string(),
        }
    }

    #[test]
    fn test_lyrics_prompts_carry_request_fields() {
        let (system, user) = lyrics_prompts(&lyrics_request());
        assert!(system.contains("synthwave"));
        assert!(system.contains("dreamy"));
        assert!(system.contains("one verse plus a chorus"));
        assert!(user.contains("night driving"));
        assert!(user.contains("[Chorus]"));
    }

    #[test]
    fn test_length_instruction_defaults_to_standard() {
        assert_eq!(
            length_instruction("unknown"),
            length_instruction("standard")
        );
        assert_ne!(length_instruction("short"), length_instruction("long"));
    }

    #[test]
    fn test_description_prompts_include_mood_when_present() {
        let req = DescriptionRequest {
            title: "Neon Rain".to_string(),
            artist: "Vega".to_string(),
            genre: "electronic".to_string(),
            mood: Some("melancholic".to_string()),
            target_audience: "general".to_string(),
        };
        let (system, user) = description_prompts(&req);
        assert!(system.contains("general"));
        assert!(user.contains("\"Neon Rain\""));
        assert!(user.contains("melancholic"));
        assert!(user.contains("short_description"));
    }

    #[test]
    fn test_description_fallback_truncates_and_tags() {
        let req = DescriptionRequest {
            title: "Neon Rain".to_string(),
            artist: "Vega".to_string(),
            genre: "Synth Pop".to_string(),
            mood: None,
            target_audience: "general".to_string(),
        };
        let raw = "x".repeat(300);
        let fallback = description_fallback(&raw, &req);
        assert_eq!(fallback.short_description.len(), 203);
        assert_eq!(fallback.marketing_copy.len(), 300);
        assert_eq!(fallback.social_media_caption, "Neon Rain - Vega");
        assert!(fallback.hashtags.contains(&"#synthpop".to_string()));
    }

    #[test]
    fn test_description_fields_parse_leniently() {
        let fields: DescriptionFields =
            serde_json::from_str("{\"short_description\": \"hi\"}").unwrap();
        assert_eq!(fields.short_description, "hi");
        assert!(fields.hashtags.is_empty());
    }
}
