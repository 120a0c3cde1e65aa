use crate::domain::model::RiskTier;
use rand::Rng;

pub const TIPS: [&str; 5] = [
    "Alternate every alcoholic drink with a glass of water.",
    "Eat a proper meal before and while you drink.",
    "Set a drink limit before you go out and stick to it.",
    "Never leave your drink unattended.",
    "Make sure someone knows how you are getting home.",
];

fn tier_sentence(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Sober => "No alcohol is detected in your estimate.",
        RiskTier::Low => "Your estimated level is low, but alcohol already affects reaction time.",
        RiskTier::Moderate => "Your estimated level is moderate. Slow down and drink some water.",
        RiskTier::High => "Your estimated level is high. Stop drinking for tonight.",
        RiskTier::VeryHigh => {
            "Your estimated level is very high. Stop drinking and stay with someone you trust."
        }
    }
}

/// Short templated advice from the tier, planned trips and driving intent.
pub fn advice_bundle(tier: RiskTier, trips: u32, asked_to_drive: bool) -> String {
    let mut parts = vec![tier_sentence(tier).to_string()];

    if asked_to_drive {
        let driving = if tier == RiskTier::Sober {
            "You may drive if you feel fully alert."
        } else {
            "Do not drive. Use a taxi, public transport or a sober driver."
        };
        parts.push(driving.to_string());
    }

    if trips > 1 {
        parts.push(format!(
            "You have {} trips ahead, so plan a safe ride for each one.",
            trips
        ));
    }

    parts.join(" ")
}

/// 由呼叫端提供亂數來源，測試可用固定種子
pub fn pick_tip<R: Rng>(rng: &mut R) -> &'static str {
    TIPS[rng.random_range(0..TIPS.len())]
}
