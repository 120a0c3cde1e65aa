pub mod advice;
pub mod cache;
pub mod engine;
pub mod session;

pub use crate::domain::model::{DrinkInput, Evaluation, RiskTier};
pub use crate::domain::ports::{AdvisoryService, SpeechRenderer};
pub use crate::utils::error::Result;
