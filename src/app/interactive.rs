//! Line-oriented form: every field update recomputes the whole estimate.

use crate::app::report::render_text;
use crate::app::validate_form_input;
use crate::core::session::AdvisorSession;
use crate::domain::model::{AdviceRequest, BiologicalSex, DrinkInput};
use crate::utils::error::{AdvisorError, Result};
use rand::Rng;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP_TEXT: &str = "\
Fields:   volume=<ml> abv=<%> weight=<kg> sex=<m|f> hours=<h> drive=<yes|no> trips=<n>
Commands: ask [question]   request AI advice for the current values
          show             print the current estimate again
          help             show this text
          quit             leave";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Volume(f64),
    Abv(f64),
    Weight(f64),
    Sex(BiologicalSex),
    Hours(f64),
    Drive(bool),
    Trips(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    Update(FieldUpdate),
    Ask(Option<String>),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub input: DrinkInput,
    pub trips: u32,
    pub asked_to_drive: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            input: DrinkInput::default(),
            trips: 1,
            asked_to_drive: false,
        }
    }
}

impl FormState {
    /// 套用更新；超出表單範圍時保留原值
    pub fn apply(&mut self, update: &FieldUpdate) -> Result<()> {
        let mut next = self.clone();
        match update {
            FieldUpdate::Volume(v) => next.input.volume_ml = *v,
            FieldUpdate::Abv(v) => next.input.abv_percent = *v,
            FieldUpdate::Weight(v) => next.input.weight_kg = *v,
            FieldUpdate::Sex(s) => next.input.biological_sex = *s,
            FieldUpdate::Hours(v) => next.input.hours_elapsed = *v,
            FieldUpdate::Drive(d) => next.asked_to_drive = *d,
            FieldUpdate::Trips(t) => next.trips = *t,
        }
        validate_form_input(&next.input)?;
        *self = next;
        Ok(())
    }

    pub fn request(&self, question: Option<String>, consult_advisor: bool) -> AdviceRequest {
        AdviceRequest {
            input: self.input,
            question,
            trips: self.trips,
            asked_to_drive: self.asked_to_drive,
            consult_advisor,
        }
    }
}

fn parse_number(field: &str, value: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|_| AdvisorError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: "expected a number".to_string(),
    })
}

fn parse_flag(field: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "on" => Ok(true),
        "no" | "n" | "false" | "0" | "off" => Ok(false),
        _ => Err(AdvisorError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected yes or no".to_string(),
        }),
    }
}

pub fn parse_command(line: &str) -> Result<FormCommand> {
    let line = line.trim();

    // 指令字優先，問句內的 "=" 不算欄位更新
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "ask" => return Ok(FormCommand::Ask((!rest.is_empty()).then(|| rest.to_string()))),
        "show" => return Ok(FormCommand::Show),
        "help" | "?" => return Ok(FormCommand::Help),
        "quit" | "exit" | "q" => return Ok(FormCommand::Quit),
        _ => {}
    }

    let (field, value) = line.split_once('=').ok_or_else(|| {
        AdvisorError::validation(format!(
            "unrecognised command '{}', type 'help' for the list",
            line
        ))
    })?;
    let field = field.trim().to_ascii_lowercase();
    let value = value.trim();

    let update = match field.as_str() {
        "volume" | "volume_ml" => FieldUpdate::Volume(parse_number("volume_ml", value)?),
        "abv" | "abv_percent" => FieldUpdate::Abv(parse_number("abv_percent", value)?),
        "weight" | "weight_kg" => FieldUpdate::Weight(parse_number("weight_kg", value)?),
        "hours" | "hours_elapsed" => FieldUpdate::Hours(parse_number("hours_elapsed", value)?),
        "sex" => FieldUpdate::Sex(value.parse().map_err(|reason| {
            AdvisorError::InvalidConfigValueError {
                field: "sex".to_string(),
                value: value.to_string(),
                reason,
            }
        })?),
        "drive" => FieldUpdate::Drive(parse_flag("drive", value)?),
        "trips" => FieldUpdate::Trips(value.parse::<u32>().map_err(|_| {
            AdvisorError::InvalidConfigValueError {
                field: "trips".to_string(),
                value: value.to_string(),
                reason: "expected a whole number".to_string(),
            }
        })?),
        other => {
            return Err(AdvisorError::validation(format!(
                "unknown field '{}', type 'help' for the list",
                other
            )))
        }
    };

    Ok(FormCommand::Update(update))
}

/// Reads commands until `quit` or end of input. Bad lines are reported and
/// skipped; only I/O failures end the loop with an error.
pub async fn run_interactive<B, W, R>(
    session: &mut AdvisorSession,
    state: &mut FormState,
    reader: B,
    out: &mut W,
    rng: &mut R,
) -> Result<()>
where
    B: AsyncBufRead + Unpin,
    W: Write,
    R: Rng,
{
    writeln!(out, "{}", HELP_TEXT)?;
    let report = session.run(&state.request(None, false), rng).await?;
    write!(out, "\n{}", render_text(&report))?;
    out.flush()?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "❌ {}", e.user_friendly_message())?;
                continue;
            }
        };

        let request = match command {
            FormCommand::Quit => break,
            FormCommand::Help => {
                writeln!(out, "{}", HELP_TEXT)?;
                continue;
            }
            FormCommand::Show => state.request(None, false),
            FormCommand::Ask(question) => {
                if !session.has_advisory() {
                    writeln!(out, "⚠️ AI advice is disabled, restart with --ask")?;
                    continue;
                }
                state.request(question, true)
            }
            FormCommand::Update(update) => {
                if let Err(e) = state.apply(&update) {
                    writeln!(out, "❌ {}", e.user_friendly_message())?;
                    continue;
                }
                tracing::debug!("Applied update: {:?}", update);
                state.request(None, false)
            }
        };

        let report = session.run(&request, rng).await?;
        write!(out, "\n{}", render_text(&report))?;
        out.flush()?;
    }

    Ok(())
}
