use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub llm: LlmSettings,
    pub speech: SpeechSettings,
}

/// 文字生成服務設定，金鑰由呼叫端明確傳入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: None,
            timeout_seconds: 30,
            temperature: 0.4,
            max_tokens: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub program: String,
    pub args: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub extension: String,
    pub timeout_seconds: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            program: "espeak".to_string(),
            args: vec!["-w".to_string(), "{output}".to_string()],
            output_dir: None,
            extension: "wav".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| AdvisorError::ConfigError {
            message: format!("cannot read '{}': {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// 以自訂查詢函式替換 `${VAR}` 後解析
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| AdvisorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換變數 (例如 ${OPENAI_API_KEY})，查無值的保留原樣
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdvisorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for LlmSettings {
    fn validate(&self) -> Result<()> {
        validate_url("llm.endpoint", &self.endpoint)?;
        validate_non_empty_string("llm.model", &self.model)?;
        validate_positive_number("llm.timeout_seconds", self.timeout_seconds, 1)?;
        validate_range("llm.temperature", self.temperature, 0.0, 2.0)?;
        validate_positive_number("llm.max_tokens", u64::from(self.max_tokens), 1)?;
        Ok(())
    }
}

impl Validate for SpeechSettings {
    fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        validate_non_empty_string("speech.program", &self.program)?;
        validate_non_empty_string("speech.extension", &self.extension)?;
        validate_positive_number("speech.timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.llm.validate()?;
        self.speech.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.llm, LlmSettings::default());
        assert_eq!(config.speech, SpeechSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[llm]
endpoint = "http://localhost:11434/v1/chat/completions"
model = "llama3.2"
api_key = "local"
timeout_seconds = 10
temperature = 0.2
max_tokens = 120

[speech]
enabled = true
program = "say"
args = ["-o", "{output}"]
extension = "aiff"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.llm.model, "llama3.2");
        assert_eq!(config.llm.api_key.as_deref(), Some("local"));
        assert_eq!(config.llm.timeout_seconds, 10);
        assert_eq!(config.llm.max_tokens, 120);
        assert!(config.speech.enabled);
        assert_eq!(config.speech.program, "say");
        assert_eq!(config.speech.args, vec!["-o", "{output}"]);
        assert_eq!(config.speech.timeout_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_var_substitution() {
        let toml_content = r#"
[llm]
api_key = "${BAC_ADVISOR_TEST_KEY}"
model = "${MISSING_MODEL}"
"#;

        let config = TomlConfig::from_toml_str_with(toml_content, |name| {
            (name == "BAC_ADVISOR_TEST_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.model, "${MISSING_MODEL}");
    }

    #[test]
    fn test_unset_env_var_is_left_as_placeholder() {
        let toml_content = r#"
[llm]
api_key = "${BAC_ADVISOR_SURELY_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.llm.api_key.as_deref(),
            Some("${BAC_ADVISOR_SURELY_UNSET_VAR}")
        );
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = TomlConfig::from_toml_str("[llm]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_endpoint.validate().is_err());

        let zero_timeout = TomlConfig::from_toml_str("[llm]\ntimeout_seconds = 0\n").unwrap();
        assert!(zero_timeout.validate().is_err());

        let empty_program =
            TomlConfig::from_toml_str("[speech]\nenabled = true\nprogram = \"\"\n").unwrap();
        assert!(empty_program.validate().is_err());

        // 停用時不檢查朗讀設定
        let disabled = TomlConfig::from_toml_str("[speech]\nprogram = \"\"\n").unwrap();
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[llm\nmodel = 1").unwrap_err();
        assert!(matches!(err, AdvisorError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[llm]\nmodel = \"file-model\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.llm.model, "file-model");

        assert!(TomlConfig::from_file("/nonexistent/bac-advisor.toml").is_err());
    }
}
