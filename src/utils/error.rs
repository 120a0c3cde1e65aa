use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Advisory service error: {0}")]
    Advisory(#[from] AdvisoryError),

    #[error("Speech rendering error: {0}")]
    Speech(#[from] SpeechError),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    System,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdvisorError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdvisorError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AdvisorError::ValidationError { .. } => ErrorCategory::Input,
            AdvisorError::InvalidConfigValueError { .. } | AdvisorError::ConfigError { .. } => {
                ErrorCategory::Configuration
            }
            AdvisorError::IoError(_) | AdvisorError::SerializationError(_) => ErrorCategory::System,
            AdvisorError::Advisory(_) | AdvisorError::Speech(_) => ErrorCategory::External,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 外部協作者失敗不影響 BAC 計算
            ErrorCategory::External => ErrorSeverity::Low,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AdvisorError::ValidationError { message } => format!("Invalid input: {}", message),
            AdvisorError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            AdvisorError::ConfigError { message } => format!("Configuration problem: {}", message),
            AdvisorError::IoError(e) => format!("File system problem: {}", e),
            AdvisorError::SerializationError(e) => format!("Could not format output: {}", e),
            AdvisorError::Advisory(e) => e.user_message(),
            AdvisorError::Speech(e) => format!("Speech output unavailable: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AdvisorError::ValidationError { .. } => {
                "Check that weight is positive and volume and hours are not negative"
            }
            AdvisorError::InvalidConfigValueError { .. } => {
                "Fix the reported value in the command line or the TOML file"
            }
            AdvisorError::ConfigError { .. } => "Make sure the config file exists and is valid TOML",
            AdvisorError::IoError(_) => "Check file permissions and available disk space",
            AdvisorError::SerializationError(_) => "Retry without --json",
            AdvisorError::Advisory(e) => match e.kind() {
                AdvisoryErrorKind::MissingCredential => {
                    "Pass --api-key or set BAC_ADVISOR_API_KEY"
                }
                AdvisoryErrorKind::Timeout | AdvisoryErrorKind::Transport => {
                    "Check your network connection and try again"
                }
                AdvisoryErrorKind::UpstreamStatus | AdvisoryErrorKind::MalformedResponse => {
                    "Check the endpoint and model in the [llm] config section"
                }
            },
            AdvisorError::Speech(_) => "Install the speech program or disable [speech]",
        }
    }
}

/// 建議文字服務的錯誤種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryErrorKind {
    MissingCredential,
    UpstreamStatus,
    MalformedResponse,
    Transport,
    Timeout,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisoryError {
    #[error("no API key configured for the advisory service")]
    MissingCredential,

    #[error("advisory service returned HTTP {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("malformed advisory response: {0}")]
    MalformedResponse(String),

    #[error("advisory request failed: {0}")]
    Transport(String),

    #[error("advisory request timed out after {0}s")]
    Timeout(u64),
}

impl AdvisoryErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryErrorKind::MissingCredential => "missing_credential",
            AdvisoryErrorKind::UpstreamStatus => "upstream_status",
            AdvisoryErrorKind::MalformedResponse => "malformed_response",
            AdvisoryErrorKind::Transport => "transport",
            AdvisoryErrorKind::Timeout => "timeout",
        }
    }
}

impl AdvisoryError {
    pub fn kind(&self) -> AdvisoryErrorKind {
        match self {
            AdvisoryError::MissingCredential => AdvisoryErrorKind::MissingCredential,
            AdvisoryError::UpstreamStatus { .. } => AdvisoryErrorKind::UpstreamStatus,
            AdvisoryError::MalformedResponse(_) => AdvisoryErrorKind::MalformedResponse,
            AdvisoryError::Transport(_) => AdvisoryErrorKind::Transport,
            AdvisoryError::Timeout(_) => AdvisoryErrorKind::Timeout,
        }
    }

    /// 顯示給使用者的訊息
    pub fn user_message(&self) -> String {
        match self {
            AdvisoryError::MissingCredential => {
                "AI advice is unavailable: no API key was provided.".to_string()
            }
            other => format!("AI advice is unavailable: {}", other),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeechError {
    #[error("cannot speak empty text")]
    EmptyText,

    #[error("failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("speech rendering timed out after {0}s")]
    Timeout(u64),
}

impl SpeechError {
    pub fn kind_str(&self) -> &'static str {
        match self {
            SpeechError::EmptyText => "empty_text",
            SpeechError::Spawn { .. } => "spawn",
            SpeechError::Failed { .. } => "failed",
            SpeechError::Timeout(_) => "timeout",
        }
    }
}
