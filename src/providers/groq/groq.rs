use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use crate::error::{FoodLensError, Result};
use crate::food::FoodItem;
use crate::providers::traits::VisionProvider;

pub const NUTRITION_PROMPT: &str = concat!(
    r#"Analyze food items and return JSON: "#,
    r#"{"items":[{"item_name":"name","total_calories":,"#,
    r#""total_protein":,"total_carbs":,"total_fats":}]}"#,
);

/// Groq's OpenAI-compatible chat completions endpoint with image input.
#[derive(Clone)]
pub struct GroqVisionProvider {
    api_key: String,
    api_url: Url,
    client: Client,
    model: String,
    max_tokens: u32,
}

impl GroqVisionProvider {
    pub fn new(
        client: Client,
        api_key: String,
        api_url: Url,
        model: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            api_key,
            api_url,
            client,
            model,
            max_tokens,
        }
    }

    fn request_body(&self, image_url: &str) -> Value {
        json!({
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": NUTRITION_PROMPT },
                        { "type": "image_url", "image_url": { "url": image_url } }
                    ]
                }
            ],
            "model": self.model,
            "max_tokens": self.max_tokens,
            "response_format": { "type": "json_object" }
        })
    }
}

#[async_trait]
impl VisionProvider for GroqVisionProvider {
    async fn analyze_image(&self, image_url: &str) -> Result<Vec<FoodItem>> {
        let response = self
            .client
            .post(self.api_url.clone())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(image_url))
            .send()
            .await
            .map_err(|e| FoodLensError::AnalysisError(format!("Groq request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::debug!("Groq error body: {}", error_text);
            return Err(FoodLensError::AnalysisError(format!(
                "Groq API error: {}",
                status.as_u16()
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| FoodLensError::AnalysisError(format!("Failed to parse response: {}", e)))?;

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| FoodLensError::AnalysisError("Invalid response format".to_string()))?;

        parse_items(content)
    }

    fn get_model_info(&self) -> String {
        self.model.clone()
    }
}

/// Parses the model's JSON content into normalized items.
pub fn parse_items(content: &str) -> Result<Vec<FoodItem>> {
    let parsed: Value = serde_json::from_str(content)
        .map_err(|e| FoodLensError::AnalysisError(format!("Model returned invalid JSON: {}", e)))?;

    let items = parsed
        .get("items")
        .and_then(|items| items.as_array())
        .ok_or_else(|| {
            FoodLensError::AnalysisError("Model response has no items array".to_string())
        })?;

    Ok(items.iter().map(FoodItem::from_model_entry).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    fn provider(base: &str) -> GroqVisionProvider {
        GroqVisionProvider::new(
            Client::new(),
            "groq-key".to_string(),
            Url::parse(&format!("{}/openai/v1/chat/completions", base)).unwrap(),
            "vision-model".to_string(),
            1024,
        )
    }

    fn completion(content: &str) -> Value {
        json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
    }

    #[test]
    fn test_request_body_shape() {
        let body = provider("http://localhost").request_body("https://i.ibb.co/x.jpg");
        assert_eq!(body["model"], "vision-model");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["response_format"]["type"], "json_object");
        let content = &body["messages"][0]["content"];
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(content[0]["type"], "text");
        assert!(content[0]["text"].as_str().unwrap().contains("\"items\""));
        assert_eq!(content[1]["image_url"]["url"], "https://i.ibb.co/x.jpg");
    }

    #[test]
    fn test_parse_items_normalizes_entries() {
        let items = parse_items(
            r#"{"items":[{"item_name":"Salad","total_calories":120.4,"total_fats":7},{"item_name":"Bread","total_calories":80}]}"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], FoodItem::new("Salad", 120.4, 0.0, 0.0, 7.0));
        assert_eq!(items[1].name.as_deref(), Some("Bread"));
    }

    #[test]
    fn test_parse_items_keeps_incomplete_entries() {
        let items = parse_items(
            r#"{"items":[{"item_name":"Rice","total_calories":206},{"item_name":"Sauce"}]}"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name.as_deref(), Some("Rice"));
        assert_eq!(items[1].name.as_deref(), Some("Sauce"));
        assert_eq!(items[1].calories, None);
    }

    #[test]
    fn test_parse_items_rejects_bad_content() {
        assert!(parse_items("not json").is_err());
        assert!(parse_items(r#"{"food": []}"#).is_err());
    }

    #[tokio::test]
    async fn test_analyze_image_round_trip() {
        let app = Router::new().route(
            "/openai/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer groq-key");
                let image_url = &body["messages"][0]["content"][1]["image_url"]["url"];
                if !authorized || image_url != "https://img/x.jpg" {
                    return (StatusCode::UNAUTHORIZED, Json(json!({})));
                }
                (
                    StatusCode::OK,
                    Json(completion(
                        r#"{"items":[{"item_name":"Banana","total_calories":105,"total_protein":1.3,"total_carbs":27,"total_fats":0.4}]}"#,
                    )),
                )
            }),
        );
        let base = spawn_server(app).await;

        let items = provider(&base).analyze_image("https://img/x.jpg").await.unwrap();
        assert_eq!(items, vec![FoodItem::new("Banana", 105.0, 1.3, 27.0, 0.4)]);
    }

    #[tokio::test]
    async fn test_error_status_is_analysis_error() {
        let app = Router::new().route(
            "/openai/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = spawn_server(app).await;

        let err = provider(&base).analyze_image("https://img/x.jpg").await.unwrap_err();
        assert!(matches!(err, FoodLensError::AnalysisError(msg) if msg.contains("429")));
    }
}
