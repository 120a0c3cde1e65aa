use crate::domain::model::{DrinkInput, Evaluation};
use crate::utils::error::{AdvisoryError, SpeechError};
use async_trait::async_trait;
use std::path::PathBuf;

pub const DEFAULT_QUESTION: &str = "What should I keep in mind right now?";

/// 送往文字生成服務的提示內容
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryPrompt {
    pub input: DrinkInput,
    pub evaluation: Evaluation,
    pub question: String,
}

impl AdvisoryPrompt {
    pub fn new(input: DrinkInput, evaluation: Evaluation, question: Option<&str>) -> Self {
        let question = question
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUESTION)
            .to_string();

        Self {
            input,
            evaluation,
            question,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "A person drank {volume} ml of a drink with {abv}% alcohol by volume. \
             They weigh {weight} kg, their sex is {sex}, and {hours} hours have passed \
             since they started drinking. Their estimated blood alcohol concentration is \
             {bac:.3}% and the risk level is {tier}.\n\nQuestion: {question}",
            volume = self.input.volume_ml,
            abv = self.input.abv_percent,
            weight = self.input.weight_kg,
            sex = self.input.biological_sex,
            hours = self.input.hours_elapsed,
            bac = self.evaluation.bac_percent,
            tier = self.evaluation.tier,
            question = self.question,
        )
    }
}

#[async_trait]
pub trait AdvisoryService: Send + Sync {
    async fn advise(&self, prompt: &AdvisoryPrompt) -> Result<String, AdvisoryError>;
}

#[async_trait]
pub trait SpeechRenderer: Send + Sync {
    /// Renders `text` to an audio file and returns its path.
    async fn render(&self, text: &str) -> Result<PathBuf, SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BiologicalSex, RiskTier};

    fn sample_evaluation() -> Evaluation {
        Evaluation {
            grams: 13.0185,
            bac_percent: 27.334_873_949_579_83,
            tier: RiskTier::VeryHigh,
        }
    }

    #[test]
    fn test_prompt_embeds_all_inputs() {
        let input = DrinkInput {
            volume_ml: 500.0,
            abv_percent: 12.5,
            weight_kg: 82.0,
            biological_sex: BiologicalSex::Female,
            hours_elapsed: 2.5,
        };
        let prompt = AdvisoryPrompt::new(input, sample_evaluation(), Some("Can I drive home?"));
        let text = prompt.render();

        assert!(text.contains("500 ml"));
        assert!(text.contains("12.5%"));
        assert!(text.contains("82 kg"));
        assert!(text.contains("female"));
        assert!(text.contains("2.5 hours"));
        assert!(text.contains("27.335%"));
        assert!(text.contains("Very High"));
        assert!(text.ends_with("Question: Can I drive home?"));
    }

    #[test]
    fn test_blank_question_uses_default() {
        let prompt = AdvisoryPrompt::new(DrinkInput::default(), sample_evaluation(), Some("   "));
        assert_eq!(prompt.question, DEFAULT_QUESTION);

        let prompt = AdvisoryPrompt::new(DrinkInput::default(), sample_evaluation(), None);
        assert_eq!(prompt.question, DEFAULT_QUESTION);
    }
}
