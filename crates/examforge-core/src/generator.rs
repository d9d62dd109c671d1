//! Question content generation with placeholder fallback.
//!
//! A generation attempt never fails: when the provider call errors, the
//! reply holds no JSON, or the JSON does not validate, the item gets
//! placeholder content and a status naming what went wrong. The provider is
//! called at most once per question.

use std::sync::Arc;

use crate::content::QuestionContent;
use crate::model::{QuestionPlan, STATUS_OK};
use crate::prompt::{build_prompt, placeholder, PromptOptions};
use crate::traits::{extract_json, GenerateRequest, LlmProvider};

/// Sampling settings passed to the provider.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub prompt: PromptOptions,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            prompt: PromptOptions::default(),
        }
    }
}

/// Result of generating one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Always structurally valid content.
    pub content: QuestionContent,
    /// `false` when the content was degraded to a placeholder.
    pub ok: bool,
    /// "OK", or why the placeholder was used.
    pub status: String,
}

impl Generation {
    fn accepted(content: QuestionContent) -> Self {
        Self {
            content,
            ok: true,
            status: STATUS_OK.to_string(),
        }
    }

    fn degraded(plan: &QuestionPlan, reason: String) -> Self {
        Self {
            content: placeholder(plan),
            ok: false,
            status: format!("{reason}; using placeholder content"),
        }
    }
}

/// Writes question content for plans, one at a time.
pub struct QuestionGenerator {
    provider: Option<Arc<dyn LlmProvider>>,
    settings: GenerationSettings,
}

impl QuestionGenerator {
    /// Generator that calls `provider` for every question.
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self {
            provider: Some(provider),
            settings,
        }
    }

    /// Generator that only produces placeholder content.
    pub fn offline() -> Self {
        Self {
            provider: None,
            settings: GenerationSettings::default(),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.provider.is_none()
    }

    /// Generate content for one plan.
    pub async fn generate(&self, plan: &QuestionPlan) -> Generation {
        let Some(provider) = &self.provider else {
            let content = placeholder(plan);
            let validation = content.validate();
            if validation.ok {
                return Generation::accepted(content);
            }
            return Generation::degraded(
                plan,
                format!("placeholder rejected ({})", validation.message),
            );
        };

        let request = GenerateRequest {
            model: self.settings.model.clone(),
            prompt: build_prompt(plan, &self.settings.prompt),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = match provider.generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "generation call failed");
                return Generation::degraded(plan, format!("generation call failed ({e:#})"));
            }
        };
        tracing::debug!(
            provider = provider.name(),
            model = %response.model,
            latency_ms = response.latency_ms,
            "received generated content"
        );

        let value = match extract_json(&response.content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "generated reply holds no JSON object");
                return Generation::degraded(plan, format!("generated content unreadable ({e})"));
            }
        };

        match QuestionContent::from_value(plan.question_type, value) {
            Ok(content) => Generation::accepted(content),
            Err(message) => {
                tracing::warn!(%message, "generated content rejected by validator");
                Generation::degraded(plan, format!("generated content rejected ({message})"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Level, QuestionType};
    use crate::traits::GenerateResponse;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubProvider {
        reply: Result<String, String>,
        calls: AtomicU32,
    }

    impl StubProvider {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicU32::new(0),
            })
        }

        fn failing(error: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(error.to_string()),
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            match &self.reply {
                Ok(content) => Ok(GenerateResponse {
                    content: content.clone(),
                    model: request.model.clone(),
                    latency_ms: 1,
                }),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    fn plan(question_type: QuestionType) -> QuestionPlan {
        QuestionPlan {
            subject: "Tiếng Việt".into(),
            topic: "Đọc".into(),
            lesson: "Bài 5: Tiếng đàn".into(),
            outcome: "Hiểu nội dung bài đọc".into(),
            question_type,
            level: Level::M2,
            points: 1.0,
        }
    }

    #[tokio::test]
    async fn offline_returns_placeholder_ok() {
        let generator = QuestionGenerator::offline();
        let generation = generator.generate(&plan(QuestionType::TrueFalse)).await;
        assert!(generation.ok);
        assert_eq!(generation.status, "OK");
        assert_eq!(generation.content, placeholder(&plan(QuestionType::TrueFalse)));
    }

    #[tokio::test]
    async fn valid_reply_is_accepted() {
        let provider = StubProvider::replying(
            r#"Sure! {"stem": "Bài đọc nói về ai?", "options": {"A": "Bé", "B": "Mẹ", "C": "Bố", "D": "Ông"}, "correct_answer": "a"}"#,
        );
        let generator = QuestionGenerator::new(provider.clone(), GenerationSettings::default());
        let generation = generator.generate(&plan(QuestionType::MultipleChoice)).await;
        assert!(generation.ok);
        assert_eq!(generation.content.stem(), "Bài đọc nói về ai?");
        assert_eq!(provider.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn malformed_json_falls_back() {
        let provider = StubProvider::replying("{\"stem\": \"unterminated");
        let generator = QuestionGenerator::new(provider.clone(), GenerationSettings::default());
        let p = plan(QuestionType::Essay);
        let generation = generator.generate(&p).await;
        assert!(!generation.ok);
        assert!(generation.status.contains("unreadable"), "{}", generation.status);
        assert!(generation.content.validate().ok);
        assert_eq!(generation.content, placeholder(&p));
        assert_eq!(provider.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn missing_field_falls_back_with_validator_message() {
        let provider = StubProvider::replying(
            r#"{"stem": "Điền từ", "fill_blank": {"text": "no blank here", "answer": "x"}}"#,
        );
        let generator = QuestionGenerator::new(provider, GenerationSettings::default());
        let generation = generator.generate(&plan(QuestionType::FillBlank)).await;
        assert!(!generation.ok);
        assert!(generation.status.contains("____"), "{}", generation.status);
        assert!(generation.content.validate().ok);
    }

    #[tokio::test]
    async fn wrong_shape_for_type_falls_back() {
        // A valid multiple-choice object requested as true/false.
        let provider = StubProvider::replying(
            r#"{"stem": "Q", "options": {"A": "1", "B": "2", "C": "3", "D": "4"}, "correct_answer": "A"}"#,
        );
        let generator = QuestionGenerator::new(provider, GenerationSettings::default());
        let generation = generator.generate(&plan(QuestionType::TrueFalse)).await;
        assert!(!generation.ok);
        assert_eq!(generation.content.question_type(), QuestionType::TrueFalse);
    }

    #[tokio::test]
    async fn call_failure_falls_back() {
        let provider = StubProvider::failing("connection refused");
        let generator = QuestionGenerator::new(provider, GenerationSettings::default());
        let generation = generator.generate(&plan(QuestionType::Matching)).await;
        assert!(!generation.ok);
        assert!(generation.status.contains("connection refused"));
        assert!(generation.content.validate().ok);
    }
}
