use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoachStyle {
    Aggressive,
    #[default]
    Balanced,
    Defensive,
}

impl CoachStyle {
    pub fn all() -> [CoachStyle; 3] {
        [
            CoachStyle::Aggressive,
            CoachStyle::Balanced,
            CoachStyle::Defensive,
        ]
    }

    /// Bench-strategy strength effects fed into the game engine.
    pub fn offense_effect(&self) -> f32 {
        match self {
            CoachStyle::Aggressive => 0.40,
            CoachStyle::Balanced => 0.0,
            CoachStyle::Defensive => -0.15,
        }
    }

    pub fn defense_effect(&self) -> f32 {
        match self {
            CoachStyle::Aggressive => -0.20,
            CoachStyle::Balanced => 0.0,
            CoachStyle::Defensive => 0.30,
        }
    }

    pub fn injury_effect(&self) -> f32 {
        match self {
            CoachStyle::Aggressive => 1.35,
            CoachStyle::Balanced => 1.00,
            CoachStyle::Defensive => 0.82,
        }
    }

    pub fn penalty_effect(&self) -> f32 {
        match self {
            CoachStyle::Aggressive => 0.95,
            CoachStyle::Balanced => 0.0,
            CoachStyle::Defensive => -0.45,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoachStyle::Aggressive => "aggressive",
            CoachStyle::Balanced => "balanced",
            CoachStyle::Defensive => "defensive",
        }
    }
}

impl Display for CoachStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoachStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "aggressive" => Ok(CoachStyle::Aggressive),
            "balanced" => Ok(CoachStyle::Balanced),
            "defensive" => Ok(CoachStyle::Defensive),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

pub const HONEYMOON_GAMES: u32 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    pub name: String,
    pub age: u8,
    pub rating: f32,
    pub style: CoachStyle,
    pub offense: f32,
    pub defense: f32,
    pub goalie_dev: f32,
    #[serde(default)]
    pub tenure_seasons: u32,
    #[serde(default)]
    pub changes_recent: f32,
    #[serde(default)]
    pub honeymoon_games_remaining: u32,
}

impl Default for Coach {
    fn default() -> Self {
        Coach {
            name: String::from("Staff Coach"),
            age: 52,
            rating: 3.0,
            style: CoachStyle::Balanced,
            offense: 3.0,
            defense: 3.0,
            goalie_dev: 3.0,
            tenure_seasons: 0,
            changes_recent: 0.0,
            honeymoon_games_remaining: 0,
        }
    }
}

impl Coach {
    /// Normalized coaching quality on [0, 1]; a 2.0 coach is replacement
    /// level, a 5.0 coach is elite.
    pub fn quality(&self) -> f32 {
        ((self.rating - 2.0) / 3.0).clamp(0.0, 1.0)
    }

    pub fn goalie_dev_quality(&self) -> f32 {
        ((self.goalie_dev - 2.0) / 3.0).clamp(0.0, 1.0)
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty() || self.name == "Staff Coach"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_is_clamped() {
        let mut coach = Coach::default();
        coach.rating = 1.0;
        assert_eq!(coach.quality(), 0.0);
        coach.rating = 5.0;
        assert_eq!(coach.quality(), 1.0);
        coach.rating = 3.5;
        assert!((coach.quality() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn styles_parse_round_trip() {
        for style in CoachStyle::all() {
            assert_eq!(style.as_str().parse::<CoachStyle>(), Ok(style));
        }
    }
}
