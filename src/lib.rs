pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CommandSpeechRenderer, HttpAdvisoryClient};
pub use config::TomlConfig;
pub use crate::core::engine::{classify_risk, estimate_bac_percent, evaluate, grams_of_alcohol};
pub use crate::core::session::AdvisorSession;
pub use domain::model::{
    AdviceRequest, BiologicalSex, DrinkInput, Evaluation, Outcome, Report, RiskTier,
};
pub use utils::error::{AdvisorError, AdvisoryError, Result, SpeechError};
