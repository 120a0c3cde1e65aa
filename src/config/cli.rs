use crate::app::{validate_form_input, SessionOptions};
use crate::config::toml_config::TomlConfig;
use crate::domain::model::{AdviceRequest, BiologicalSex, DrinkInput};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "bac-advisor")]
#[command(about = "Estimate blood alcohol concentration and get responsible drinking advice")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key for the advisory service
    #[arg(long, env = "BAC_ADVISOR_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Estimate once and print a report
    Estimate(EstimateArgs),
    /// Edit the values line by line, recomputing after each change
    Interactive(InteractiveArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DrinkArgs {
    /// Drink volume in millilitres
    #[arg(long, default_value_t = 330.0)]
    pub volume_ml: f64,

    /// Alcohol by volume, percent
    #[arg(long, default_value_t = 5.0)]
    pub abv: f64,

    /// Body weight in kilograms
    #[arg(long, default_value_t = 70.0)]
    pub weight_kg: f64,

    /// m or f
    #[arg(long, default_value = "m")]
    pub sex: BiologicalSex,

    /// Hours since drinking started
    #[arg(long, default_value_t = 1.0)]
    pub hours: f64,
}

impl DrinkArgs {
    pub fn to_input(&self) -> DrinkInput {
        DrinkInput {
            volume_ml: self.volume_ml,
            abv_percent: self.abv,
            weight_kg: self.weight_kg,
            biological_sex: self.sex,
            hours_elapsed: self.hours,
        }
    }
}

impl Validate for DrinkArgs {
    fn validate(&self) -> Result<()> {
        validate_form_input(&self.to_input())
    }
}

#[derive(Debug, Clone, Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub drink: DrinkArgs,

    /// You have been asked to drive
    #[arg(long)]
    pub drive: bool,

    /// Number of trips you still have to make
    #[arg(long, default_value_t = 1)]
    pub trips: u32,

    /// Question for the AI advisor
    #[arg(long)]
    pub question: Option<String>,

    /// Request AI advice from the configured service
    #[arg(long)]
    pub ask: bool,

    /// Read the AI advice aloud (needs --ask)
    #[arg(long)]
    pub speak: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl EstimateArgs {
    pub fn to_request(&self) -> AdviceRequest {
        AdviceRequest {
            input: self.drink.to_input(),
            question: self.question.clone(),
            trips: self.trips,
            asked_to_drive: self.drive,
            consult_advisor: self.ask,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub drink: DrinkArgs,

    /// Enable the `ask` command
    #[arg(long)]
    pub ask: bool,

    /// Read AI advice aloud (needs --ask)
    #[arg(long)]
    pub speak: bool,
}

impl CliConfig {
    /// 載入 TOML 設定；未指定檔案時使用預設值
    pub fn load_toml(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => TomlConfig::from_file(path),
            None => Ok(TomlConfig::default()),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        let (ask, speak) = match &self.command {
            Command::Estimate(args) => (args.ask, args.speak),
            Command::Interactive(args) => (args.ask, args.speak),
        };

        SessionOptions {
            ask,
            speak,
            api_key: self.api_key.clone(),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Estimate(args) => args.drink.validate(),
            Command::Interactive(args) => args.drink.validate(),
        }
    }
}
