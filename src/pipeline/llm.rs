//! LLM augmentation: one completion call over the heuristic baseline.
//!
//! The prompt is built from the baseline, the reply is parsed and merged.
//! Any failure along the way (transport, status, empty content, malformed
//! JSON) is logged and the baseline is returned as a static deck. Nothing
//! here returns an error.

use super::merge::{fallback, merge, parse_payload};
use crate::client::ChatCompletionClient;
use crate::error::LlmError;
use crate::output::{AnalysisResult, Deck};
use crate::prompts::build_prompt;
use std::time::Instant;
use tracing::{info, warn};

async fn request_payload(
    baseline: &AnalysisResult,
    client: &dyn ChatCompletionClient,
    target_slides: usize,
    instructions: Option<&str>,
) -> Result<Deck, LlmError> {
    let (system, user) = build_prompt(baseline, target_slides, instructions);
    let raw = client.complete(&system, &user).await?;
    let payload = parse_payload(&raw)?;
    Ok(merge(baseline, &payload))
}

/// Ask `client` to refine `baseline`; on failure return the baseline.
pub async fn augment(
    baseline: &AnalysisResult,
    client: &dyn ChatCompletionClient,
    target_slides: usize,
    instructions: Option<&str>,
) -> Deck {
    let start = Instant::now();
    info!("Requesting deck from {}", client.provider());

    match request_payload(baseline, client, target_slides, instructions).await {
        Ok(deck) => {
            info!(
                "{} returned {} slides in {:?}",
                client.provider(),
                deck.slides.len(),
                start.elapsed()
            );
            deck
        }
        Err(e) => {
            warn!("LLM augmentation failed, using heuristic deck: {}", e);
            fallback(baseline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{DeckMetadata, DeckMode, Slide};
    use async_trait::async_trait;

    struct Canned(Result<String, LlmError>);

    #[async_trait]
    impl ChatCompletionClient for Canned {
        fn provider(&self) -> &str {
            "canned"
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            self.0.clone()
        }
    }

    fn baseline() -> AnalysisResult {
        AnalysisResult {
            metadata: DeckMetadata {
                paper_title: "Baseline".into(),
                paper_subtitle: None,
                authors: None,
                generated_at: "2024-01-01T00:00:00Z".into(),
                mode: DeckMode::Static,
                slide_count: 3,
            },
            outline: vec!["Intro".into()],
            slides: vec![Slide::bullets("section-1", "Intro", None, vec!["a".into()])],
            sentences: vec![],
        }
    }

    #[tokio::test]
    async fn valid_reply_is_merged() {
        let client = Canned(Ok(r#"{"paperTitle":"Refined","slides":[{"title":"A","bullets":["b"]}]}"#.into()));
        let deck = augment(&baseline(), &client, 8, None).await;
        assert_eq!(deck.metadata.mode, DeckMode::Llm);
        assert_eq!(deck.metadata.paper_title, "Refined");
        assert_eq!(deck.slides[0].id, "llm-slide-1");
    }

    #[tokio::test]
    async fn http_error_falls_back() {
        let client = Canned(Err(LlmError::Status {
            provider: "canned".into(),
            status: 500,
            body: "boom".into(),
        }));
        let b = baseline();
        let deck = augment(&b, &client, 8, None).await;
        assert_eq!(deck, fallback(&b));
        assert_eq!(deck.metadata.mode, DeckMode::Static);
    }

    #[tokio::test]
    async fn malformed_reply_falls_back() {
        let client = Canned(Ok("not json at all".into()));
        let b = baseline();
        let deck = augment(&b, &client, 8, None).await;
        assert_eq!(deck.slides, b.slides);
        assert_eq!(deck.metadata.paper_title, "Baseline");
    }
}
