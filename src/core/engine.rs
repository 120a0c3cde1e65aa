//! BAC estimation engine: ethanol mass, Widmark-style BAC with linear
//! elimination, and risk tiers.

use crate::domain::model::{BiologicalSex, DrinkInput, Evaluation, RiskTier};
use crate::utils::error::Result;
use crate::utils::validation::{require_finite, require_non_negative, require_positive};

/// Density of ethanol, g/ml.
pub const ETHANOL_DENSITY_G_PER_ML: f64 = 0.789;

/// Body-water distribution ratio for males.
pub const DISTRIBUTION_RATIO_MALE: f64 = 0.68;

/// Body-water distribution ratio for females.
pub const DISTRIBUTION_RATIO_FEMALE: f64 = 0.55;

/// BAC percentage points eliminated per hour.
pub const ELIMINATION_PER_HOUR: f64 = 0.015;

/// Lower bounds (inclusive) of the Low..VeryHigh bands.
const TIER_THRESHOLDS: [(f64, RiskTier); 3] = [
    (0.20, RiskTier::VeryHigh),
    (0.08, RiskTier::High),
    (0.03, RiskTier::Moderate),
];

/// Grams of pure ethanol in `volume_ml` of a drink at `abv_percent`.
///
/// No range checks: out-of-range values propagate arithmetically.
pub fn grams_of_alcohol(volume_ml: f64, abv_percent: f64) -> f64 {
    volume_ml * (abv_percent / 100.0) * ETHANOL_DENSITY_G_PER_ML
}

pub fn distribution_ratio(sex: BiologicalSex) -> f64 {
    match sex {
        BiologicalSex::Male => DISTRIBUTION_RATIO_MALE,
        BiologicalSex::Female => DISTRIBUTION_RATIO_FEMALE,
    }
}

/// Estimated BAC as a percentage value, never negative.
///
/// Elimination is linear in `hours_elapsed`. The result keeps the literal
/// `* 100` scaling, so realistic drinks produce values well above
/// physiological BAC.
///
/// # Errors
/// Returns a validation error when `weight_kg` is not a positive finite number.
pub fn estimate_bac_percent(
    grams: f64,
    weight_kg: f64,
    sex: BiologicalSex,
    hours_elapsed: f64,
) -> Result<f64> {
    require_positive("weight_kg", weight_kg)?;

    let r = distribution_ratio(sex);
    let mut bac = (grams / (weight_kg * r)) * 100.0;
    bac -= ELIMINATION_PER_HOUR * hours_elapsed;

    Ok(bac.max(0.0))
}

/// Bands are closed below; anything not strictly positive is `Sober`.
pub fn classify_risk(bac_percent: f64) -> RiskTier {
    if bac_percent.is_nan() || bac_percent <= 0.0 {
        return RiskTier::Sober;
    }

    TIER_THRESHOLDS
        .iter()
        .find(|(lower, _)| bac_percent >= *lower)
        .map(|(_, tier)| *tier)
        .unwrap_or(RiskTier::Low)
}

impl DrinkInput {
    /// 檢查引擎前置條件 (不檢查表單範圍)
    pub fn check_preconditions(&self) -> Result<()> {
        require_non_negative("volume_ml", self.volume_ml)?;
        require_finite("abv_percent", self.abv_percent)?;
        require_positive("weight_kg", self.weight_kg)?;
        require_non_negative("hours_elapsed", self.hours_elapsed)?;
        Ok(())
    }
}

/// Runs the full chain: grams, BAC, tier.
pub fn evaluate(input: &DrinkInput) -> Result<Evaluation> {
    input.check_preconditions()?;

    let grams = grams_of_alcohol(input.volume_ml, input.abv_percent);
    let bac_percent = estimate_bac_percent(
        grams,
        input.weight_kg,
        input.biological_sex,
        input.hours_elapsed,
    )?;
    let tier = classify_risk(bac_percent);

    tracing::debug!(
        "Evaluated input: grams={:.4}, bac={:.4}%, tier={}",
        grams,
        bac_percent,
        tier
    );

    Ok(Evaluation {
        grams,
        bac_percent,
        tier,
    })
}
