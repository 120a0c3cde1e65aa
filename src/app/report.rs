use crate::domain::model::{Outcome, Report};
use crate::utils::error::Result;
use std::fmt::Write;

/// Plain-text rendering of a report for the terminal.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let input = &report.input;
    let evaluation = &report.evaluation;

    // 寫入 String 不會失敗
    let _ = writeln!(
        out,
        "🍺 {} ml at {}% ABV | {} kg, {} | {} h since first drink",
        input.volume_ml, input.abv_percent, input.weight_kg, input.biological_sex, input.hours_elapsed
    );
    let _ = writeln!(out, "Ethanol:            {:.2} g", evaluation.grams);
    let _ = writeln!(out, "Estimated BAC (%):  {:.3}", evaluation.bac_percent);
    let _ = writeln!(out, "Risk Level:         {}", evaluation.tier);
    let _ = writeln!(out);
    let _ = writeln!(out, "Advice: {}", report.advice);
    let _ = writeln!(out, "Tip:    {}", report.tip);

    match &report.advisory {
        Outcome::Skipped => {}
        Outcome::Ok { value } => {
            let _ = writeln!(out);
            let _ = writeln!(out, "🤖 AI advice:");
            let _ = writeln!(out, "{}", value);
        }
        Outcome::Failed { message, .. } => {
            let _ = writeln!(out);
            let _ = writeln!(out, "⚠️ {}", message);
        }
    }

    match &report.speech {
        Outcome::Skipped => {}
        Outcome::Ok { value } => {
            let _ = writeln!(out, "🔊 Audio saved to {}", value);
        }
        Outcome::Failed { message, .. } => {
            let _ = writeln!(out, "⚠️ {}", message);
        }
    }

    out
}

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
