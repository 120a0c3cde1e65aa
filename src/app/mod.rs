pub mod interactive;
pub mod report;

use crate::adapters::{CommandSpeechRenderer, HttpAdvisoryClient};
use crate::config::toml_config::TomlConfig;
use crate::core::session::AdvisorSession;
use crate::domain::model::DrinkInput;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, Validate};

pub const WEIGHT_RANGE_KG: (f64, f64) = (40.0, 150.0);
pub const ABV_RANGE_PERCENT: (f64, f64) = (0.0, 50.0);
pub const HOURS_RANGE: (f64, f64) = (0.0, 12.0);

/// 表單範圍檢查，比引擎的前置條件更嚴格
pub fn validate_form_input(input: &DrinkInput) -> Result<()> {
    validate_range("volume_ml", input.volume_ml, 0.0, f64::MAX)?;
    validate_range(
        "abv_percent",
        input.abv_percent,
        ABV_RANGE_PERCENT.0,
        ABV_RANGE_PERCENT.1,
    )?;
    validate_range(
        "weight_kg",
        input.weight_kg,
        WEIGHT_RANGE_KG.0,
        WEIGHT_RANGE_KG.1,
    )?;
    validate_range("hours_elapsed", input.hours_elapsed, HOURS_RANGE.0, HOURS_RANGE.1)?;
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub ask: bool,
    pub speak: bool,
    /// Takes precedence over `llm.api_key` from the config file.
    pub api_key: Option<String>,
}

pub fn build_session(config: &TomlConfig, options: &SessionOptions) -> Result<AdvisorSession> {
    config.validate()?;
    let mut session = AdvisorSession::new();

    if options.ask {
        let mut llm = config.llm.clone();
        if let Some(key) = &options.api_key {
            llm.api_key = Some(key.clone());
        }
        tracing::info!("🤖 Advisory service enabled ({} via {})", llm.model, llm.endpoint);
        session = session.with_advisory(HttpAdvisoryClient::new(llm)?);
    }

    let speak = options.speak || config.speech.enabled;
    if speak && !options.ask {
        tracing::warn!("Speech output needs AI advice, pass --ask to enable it");
    } else if speak {
        let mut speech = config.speech.clone();
        speech.enabled = true;
        session = session.with_speech(CommandSpeechRenderer::new(speech));
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_bounds() {
        assert!(validate_form_input(&DrinkInput::default()).is_ok());

        let too_light = DrinkInput {
            weight_kg: 39.0,
            ..DrinkInput::default()
        };
        assert!(validate_form_input(&too_light).is_err());

        let spirits = DrinkInput {
            abv_percent: 51.0,
            ..DrinkInput::default()
        };
        assert!(validate_form_input(&spirits).is_err());

        let long_night = DrinkInput {
            hours_elapsed: 12.5,
            ..DrinkInput::default()
        };
        assert!(validate_form_input(&long_night).is_err());

        let negative_volume = DrinkInput {
            volume_ml: -1.0,
            ..DrinkInput::default()
        };
        assert!(validate_form_input(&negative_volume).is_err());
    }

    #[test]
    fn test_build_session_without_ask_has_no_advisory() {
        let session = build_session(&TomlConfig::default(), &SessionOptions::default()).unwrap();
        assert!(!session.has_advisory());
    }

    #[test]
    fn test_build_session_with_ask() {
        let options = SessionOptions {
            ask: true,
            speak: false,
            api_key: Some("sk-test".to_string()),
        };
        let session = build_session(&TomlConfig::default(), &options).unwrap();
        assert!(session.has_advisory());
        assert!(!session.has_speech());
    }

    #[test]
    fn test_speech_requires_ask() {
        let speak_only = SessionOptions {
            ask: false,
            speak: true,
            api_key: None,
        };
        let session = build_session(&TomlConfig::default(), &speak_only).unwrap();
        assert!(!session.has_speech());

        let both = SessionOptions {
            ask: true,
            ..speak_only
        };
        let session = build_session(&TomlConfig::default(), &both).unwrap();
        assert!(session.has_speech());
    }

    #[test]
    fn test_build_session_rejects_invalid_config() {
        let mut config = TomlConfig::default();
        config.llm.endpoint = "not a url".to_string();
        assert!(build_session(&config, &SessionOptions::default()).is_err());
    }
}
