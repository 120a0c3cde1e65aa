//! Text-to-speech through an external synthesizer program.

use crate::config::toml_config::SpeechSettings;
use crate::domain::ports::SpeechRenderer;
use crate::utils::error::SpeechError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Runs `program args... -- <text>`; `{output}` in args becomes the audio file path.
pub struct CommandSpeechRenderer {
    settings: SpeechSettings,
}

impl CommandSpeechRenderer {
    pub fn new(settings: SpeechSettings) -> Self {
        Self { settings }
    }

    fn output_dir(&self) -> PathBuf {
        self.settings
            .output_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// 每次產生新的檔名，避免覆蓋上一段音訊
    fn next_output_path(&self) -> PathBuf {
        let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S%.3f");
        let file_name = format!(
            "bac-advice-{}-{}.{}",
            stamp,
            std::process::id(),
            self.settings.extension
        );
        self.output_dir().join(file_name)
    }

    fn build_args(&self, output: &str, text: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .settings
            .args
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, output))
            .collect();
        // 文字可能以 "-" 開頭 (條列式回覆)，不可被當成選項
        args.push("--".to_string());
        args.push(text.to_string());
        args
    }
}

#[async_trait]
impl SpeechRenderer for CommandSpeechRenderer {
    async fn render(&self, text: &str) -> Result<PathBuf, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let program = &self.settings.program;
        let output_path = self.next_output_path();
        let args = self.build_args(&output_path.to_string_lossy(), text.trim());

        tracing::debug!("Running speech program '{}' -> {}", program, output_path.display());

        let mut command = Command::new(program);
        command.args(&args).kill_on_drop(true);

        let output = tokio::time::timeout(
            Duration::from_secs(self.settings.timeout_seconds),
            command.output(),
        )
        .await
        .map_err(|_| SpeechError::Timeout(self.settings.timeout_seconds))?
        .map_err(|e| SpeechError::Spawn {
            program: program.clone(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(SpeechError::Failed {
                program: program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output_path)
    }
}
