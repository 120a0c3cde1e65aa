use crate::domain::model::{BiologicalSex, DrinkInput};

/// Exact key over the whole input tuple; floats compare by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdviceKey {
    volume_ml: u64,
    abv_percent: u64,
    weight_kg: u64,
    biological_sex: BiologicalSex,
    hours_elapsed: u64,
    question: String,
}

impl AdviceKey {
    pub fn new(input: &DrinkInput, question: &str) -> Self {
        Self {
            volume_ml: input.volume_ml.to_bits(),
            abv_percent: input.abv_percent.to_bits(),
            weight_kg: input.weight_kg.to_bits(),
            biological_sex: input.biological_sex,
            hours_elapsed: input.hours_elapsed.to_bits(),
            question: question.to_string(),
        }
    }
}

/// 只保留最後一次產生的建議文字
#[derive(Debug, Default)]
pub struct AdviceCache {
    last: Option<(AdviceKey, String)>,
}

impl AdviceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &AdviceKey) -> Option<&str> {
        match &self.last {
            Some((cached_key, text)) if cached_key == key => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn store(&mut self, key: AdviceKey, text: String) {
        self.last = Some((key, text));
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}
