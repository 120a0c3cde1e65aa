use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 體內水分分佈比例的二分近似
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl BiologicalSex {
    pub fn label(&self) -> &'static str {
        match self {
            BiologicalSex::Male => "male",
            BiologicalSex::Female => "female",
        }
    }
}

impl fmt::Display for BiologicalSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BiologicalSex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(BiologicalSex::Male),
            "f" | "female" => Ok(BiologicalSex::Female),
            other => Err(format!("unknown sex '{}', expected m or f", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrinkInput {
    pub volume_ml: f64,
    pub abv_percent: f64,
    pub weight_kg: f64,
    pub biological_sex: BiologicalSex,
    pub hours_elapsed: f64,
}

impl Default for DrinkInput {
    fn default() -> Self {
        Self {
            volume_ml: 330.0,
            abv_percent: 5.0,
            weight_kg: 70.0,
            biological_sex: BiologicalSex::Male,
            hours_elapsed: 1.0,
        }
    }
}

/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Sober,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Sober => "Sober",
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One run of the estimation engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub grams: f64,
    pub bac_percent: f64,
    pub tier: RiskTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdviceRequest {
    pub input: DrinkInput,
    pub question: Option<String>,
    pub trips: u32,
    pub asked_to_drive: bool,
    /// When false the advisory service is not consulted for this run.
    pub consult_advisor: bool,
}

impl AdviceRequest {
    pub fn new(input: DrinkInput) -> Self {
        Self {
            input,
            question: None,
            trips: 1,
            asked_to_drive: false,
            consult_advisor: true,
        }
    }
}

/// 協作者呼叫的結果：略過、成功或失敗 (不中斷流程)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Skipped,
    Ok { value: T },
    Failed { kind: String, message: String },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
    pub input: DrinkInput,
    pub evaluation: Evaluation,
    pub advice: String,
    pub tip: String,
    pub advisory: Outcome<String>,
    pub speech: Outcome<String>,
}
