use crate::core::advice::{advice_bundle, pick_tip};
use crate::core::cache::{AdviceCache, AdviceKey};
use crate::core::engine::evaluate;
use crate::domain::model::{AdviceRequest, Outcome, Report};
use crate::domain::ports::{AdvisoryPrompt, AdvisoryService, SpeechRenderer};
use crate::utils::error::Result;
use rand::Rng;

/// Runs one evaluation end to end. Only the engine step can fail; the
/// advisory and speech collaborators report their failures in the `Report`.
pub struct AdvisorSession {
    advisory: Option<Box<dyn AdvisoryService>>,
    speech: Option<Box<dyn SpeechRenderer>>,
    cache: AdviceCache,
}

impl AdvisorSession {
    pub fn new() -> Self {
        Self {
            advisory: None,
            speech: None,
            cache: AdviceCache::new(),
        }
    }

    pub fn with_advisory(mut self, service: impl AdvisoryService + 'static) -> Self {
        self.advisory = Some(Box::new(service));
        self
    }

    pub fn with_speech(mut self, renderer: impl SpeechRenderer + 'static) -> Self {
        self.speech = Some(Box::new(renderer));
        self
    }

    pub fn has_advisory(&self) -> bool {
        self.advisory.is_some()
    }

    pub fn has_speech(&self) -> bool {
        self.speech.is_some()
    }

    pub async fn run<R: Rng>(&mut self, request: &AdviceRequest, rng: &mut R) -> Result<Report> {
        let evaluation = evaluate(&request.input)?;
        let advice = advice_bundle(evaluation.tier, request.trips, request.asked_to_drive);
        let tip = pick_tip(rng).to_string();

        let advisory = match &self.advisory {
            None => Outcome::Skipped,
            Some(_) if !request.consult_advisor => Outcome::Skipped,
            Some(service) => {
                let prompt =
                    AdvisoryPrompt::new(request.input, evaluation, request.question.as_deref());
                let key = AdviceKey::new(&request.input, &prompt.question);

                if let Some(text) = self.cache.get(&key) {
                    tracing::debug!("Using cached advisory text");
                    Outcome::Ok {
                        value: text.to_string(),
                    }
                } else {
                    match service.advise(&prompt).await {
                        Ok(text) => {
                            self.cache.store(key, text.clone());
                            Outcome::Ok { value: text }
                        }
                        Err(e) => {
                            tracing::warn!("⚠️ Advisory request failed: {}", e);
                            Outcome::Failed {
                                kind: e.kind().as_str().to_string(),
                                message: e.user_message(),
                            }
                        }
                    }
                }
            }
        };

        let speech = match (&self.speech, advisory.value()) {
            (Some(renderer), Some(text)) => match renderer.render(text).await {
                Ok(path) => {
                    tracing::info!("🔊 Speech saved to {}", path.display());
                    Outcome::Ok {
                        value: path.display().to_string(),
                    }
                }
                Err(e) => {
                    tracing::warn!("⚠️ Speech rendering failed: {}", e);
                    Outcome::Failed {
                        kind: e.kind_str().to_string(),
                        message: format!("Speech output unavailable: {}", e),
                    }
                }
            },
            _ => Outcome::Skipped,
        };

        Ok(Report {
            evaluated_at: chrono::Utc::now(),
            input: request.input,
            evaluation,
            advice,
            tip,
            advisory,
            speech,
        })
    }
}

impl Default for AdvisorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BiologicalSex, DrinkInput, RiskTier};
    use crate::utils::error::{AdvisoryError, SpeechError};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct MockAdvisory {
        calls: Arc<AtomicUsize>,
        reply: std::result::Result<String, AdvisoryError>,
    }

    impl MockAdvisory {
        fn replying(text: &str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                reply: Ok(text.to_string()),
            }
        }

        fn failing(error: AdvisoryError) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                reply: Err(error),
            }
        }
    }

    #[async_trait]
    impl AdvisoryService for MockAdvisory {
        async fn advise(
            &self,
            _prompt: &AdvisoryPrompt,
        ) -> std::result::Result<String, AdvisoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    struct MockSpeech {
        fail: bool,
    }

    #[async_trait]
    impl SpeechRenderer for MockSpeech {
        async fn render(&self, _text: &str) -> std::result::Result<PathBuf, SpeechError> {
            if self.fail {
                Err(SpeechError::Spawn {
                    program: "espeak".to_string(),
                    message: "not found".to_string(),
                })
            } else {
                Ok(PathBuf::from("/tmp/advice.wav"))
            }
        }
    }

    fn beer_request() -> AdviceRequest {
        AdviceRequest::new(DrinkInput::default())
    }

    #[tokio::test]
    async fn test_run_without_collaborators() {
        let mut session = AdvisorSession::new();
        let mut rng = StdRng::seed_from_u64(1);

        let report = session.run(&beer_request(), &mut rng).await.unwrap();

        assert_eq!(report.evaluation.tier, RiskTier::VeryHigh);
        assert_eq!(report.advisory, Outcome::Skipped);
        assert_eq!(report.speech, Outcome::Skipped);
        assert!(!report.advice.is_empty());
        assert!(crate::core::advice::TIPS.contains(&report.tip.as_str()));
    }

    #[tokio::test]
    async fn test_run_reuses_cached_advisory_text() {
        let advisory = MockAdvisory::replying("Drink water.");
        let calls = advisory.calls.clone();
        let mut session = AdvisorSession::new().with_advisory(advisory);
        let mut rng = StdRng::seed_from_u64(1);

        let first = session.run(&beer_request(), &mut rng).await.unwrap();
        let second = session.run(&beer_request(), &mut rng).await.unwrap();

        assert_eq!(first.advisory.value().map(String::as_str), Some("Drink water."));
        assert_eq!(second.advisory, first.advisory);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let mut changed = beer_request();
        changed.input.hours_elapsed = 3.0;
        session.run(&changed, &mut rng).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_advisory_failure_keeps_engine_output() {
        let mut session =
            AdvisorSession::new().with_advisory(MockAdvisory::failing(AdvisoryError::MissingCredential));
        let mut rng = StdRng::seed_from_u64(1);

        let report = session.run(&beer_request(), &mut rng).await.unwrap();

        assert!((report.evaluation.grams - 13.0185).abs() < 1e-9);
        match &report.advisory {
            Outcome::Failed { kind, message } => {
                assert_eq!(kind, "missing_credential");
                assert!(message.contains("no API key"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        // 沒有建議文字就不會朗讀
        assert_eq!(report.speech, Outcome::Skipped);
    }

    #[tokio::test]
    async fn test_consult_advisor_false_skips_service() {
        let advisory = MockAdvisory::replying("Drink water.");
        let calls = advisory.calls.clone();
        let mut session = AdvisorSession::new().with_advisory(advisory);
        let mut rng = StdRng::seed_from_u64(1);

        let mut request = beer_request();
        request.consult_advisor = false;
        let report = session.run(&request, &mut rng).await.unwrap();

        assert_eq!(report.advisory, Outcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_advisory_is_not_cached() {
        let advisory = MockAdvisory::failing(AdvisoryError::Timeout(30));
        let calls = advisory.calls.clone();
        let mut session = AdvisorSession::new().with_advisory(advisory);
        let mut rng = StdRng::seed_from_u64(1);

        session.run(&beer_request(), &mut rng).await.unwrap();
        session.run(&beer_request(), &mut rng).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_speech_outcomes() {
        let mut session = AdvisorSession::new()
            .with_advisory(MockAdvisory::replying("Go home safely."))
            .with_speech(MockSpeech { fail: false });
        let mut rng = StdRng::seed_from_u64(1);
        let report = session.run(&beer_request(), &mut rng).await.unwrap();
        assert_eq!(
            report.speech,
            Outcome::Ok {
                value: "/tmp/advice.wav".to_string()
            }
        );

        let mut failing = AdvisorSession::new()
            .with_advisory(MockAdvisory::replying("Go home safely."))
            .with_speech(MockSpeech { fail: true });
        let report = failing.run(&beer_request(), &mut rng).await.unwrap();
        assert!(report.speech.is_failed());
        assert!(report.advisory.value().is_some());
    }

    #[tokio::test]
    async fn test_invalid_input_is_an_error() {
        let mut session = AdvisorSession::new();
        let mut rng = StdRng::seed_from_u64(1);
        let request = AdviceRequest::new(DrinkInput {
            weight_kg: 0.0,
            biological_sex: BiologicalSex::Female,
            ..DrinkInput::default()
        });

        assert!(session.run(&request, &mut rng).await.is_err());
    }
}
