use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::answers::Answer;

pub const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-lite:generateContent";
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<TextPart>,
}

pub struct EnrichClient {
    api_key: String,
    base_url: String,
}

impl EnrichClient {
    /// Returns `None` when `GEMINI_API_KEY` is unset or empty; the
    /// feature stays off and no network call is ever made.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            base_url: GEMINI_ENDPOINT.to_string(),
        })
    }

    pub async fn personalize(
        &self,
        question: &str,
        answer: &Answer,
        user_name: &str,
    ) -> anyhow::Result<String> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: build_prompt(question, answer, user_name),
                }],
            }],
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        let url = format!("{}?key={}", self.base_url, self.api_key);
        let response = client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {status}: {body}");
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("failed to decode Gemini response")?;

        extract_text(parsed)
    }
}

fn build_prompt(question: &str, answer: &Answer, user_name: &str) -> String {
    format!(
        "你是一個神奇的占卜師，請根據以下資訊為 {user_name} 生成一個溫暖且有趣的占卜回應：\n\
         \n\
         問題：{question}\n\
         \n\
         原始答案：\n\
         - 中文：{}\n\
         - 英文：{}\n\
         - 類型：{}\n\
         \n\
         請用繁體中文回應，要求：\n\
         1. 融合原始答案的核心含義\n\
         2. 針對具體問題給出建議\n\
         3. 保持神秘而溫暖的占卜師語調\n\
         4. 長度控制在 30-50 字\n\
         5. 可以適當加入 emoji 增加趣味性\n\
         \n\
         回應格式：直接回傳占卜內容，不需要其他格式。",
        answer.text,
        answer.text_en,
        answer.category.as_str(),
    )
}

fn extract_text(response: GenerateResponse) -> anyhow::Result<String> {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.first())
        .map(|part| part.text.trim().to_string())
        .context("Gemini response contained no text")
}
