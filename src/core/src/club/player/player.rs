use crate::club::player::career::CareerSeason;
use crate::club::player::contract::PlayerContract;
use crate::club::player::health::{InjuryStatus, PlayerHealth};
use crate::club::player::position::PlayerPosition;
use crate::club::player::prospect::{DraftProvenance, ProspectProfile};
use crate::club::player::skills::PlayerSkills;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Live single-season counting stats. Reset by the offseason pipeline; the
/// completed season is snapshotted into `career_seasons` first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonCounters {
    pub games_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub goalie_games: u32,
    pub goalie_wins: u32,
    pub goalie_losses: u32,
    pub goalie_ot_losses: u32,
    pub goalie_shutouts: u32,
    pub shots_against: u32,
    pub saves: u32,
    pub goals_against: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "player_id")]
    pub id: String,
    pub team_name: String,
    pub name: String,
    pub position: PlayerPosition,
    #[serde(default)]
    pub jersey_number: Option<u8>,
    #[serde(default = "default_birth_country")]
    pub birth_country: String,
    #[serde(default = "default_birth_country_code")]
    pub birth_country_code: String,
    pub age: u8,
    pub prime_age: u8,
    #[serde(default)]
    pub skills: PlayerSkills,
    #[serde(default)]
    pub season: SeasonCounters,
    #[serde(default)]
    pub health: PlayerHealth,
    #[serde(default)]
    pub draft: DraftProvenance,
    #[serde(default)]
    pub prospect: ProspectProfile,
    #[serde(default)]
    pub contract: PlayerContract,
    #[serde(default)]
    pub career_seasons: Vec<CareerSeason>,
}

fn default_birth_country() -> String {
    String::from("Canada")
}

fn default_birth_country_code() -> String {
    String::from("CA")
}

impl Player {
    pub fn new(
        team_name: &str,
        name: &str,
        position: PlayerPosition,
        skills: PlayerSkills,
        age: u8,
        prime_age: u8,
    ) -> Self {
        Player {
            id: name.to_lowercase().replace(' ', "-"),
            team_name: team_name.to_string(),
            name: name.to_string(),
            position,
            jersey_number: None,
            birth_country: default_birth_country(),
            birth_country_code: default_birth_country_code(),
            age,
            prime_age,
            skills,
            season: SeasonCounters::default(),
            health: PlayerHealth::default(),
            draft: DraftProvenance::default(),
            prospect: ProspectProfile::default(),
            contract: PlayerContract::default(),
            career_seasons: Vec::new(),
        }
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.season.goals + self.season.assists
    }

    /// Hard out: timer running and not a day-to-day designation.
    pub fn is_injured(&self) -> bool {
        self.health.injured_games_remaining > 0
            && self.health.injury_status != InjuryStatus::DayToDay
    }

    pub fn is_dtd(&self) -> bool {
        self.health.injured_games_remaining > 0
            && self.health.injury_status == InjuryStatus::DayToDay
    }

    pub fn can_play_today(&self) -> bool {
        if self.health.injured_games_remaining == 0 {
            return true;
        }
        if self.health.injury_status == InjuryStatus::DayToDay {
            return self.health.dtd_play_today;
        }
        false
    }

    pub fn scoring_weight(&self) -> f32 {
        self.skills.scoring_weight()
    }

    pub fn overall(&self) -> f32 {
        self.skills.overall(self.position)
    }

    pub fn save_pct(&self) -> f32 {
        if self.season.shots_against == 0 {
            return 0.0;
        }
        self.season.saves as f32 / self.season.shots_against as f32
    }

    pub fn gaa(&self) -> f32 {
        if self.season.goalie_games == 0 {
            return 0.0;
        }
        self.season.goals_against as f32 / self.season.goalie_games as f32
    }

    pub fn reset_season_stats(&mut self) {
        self.season = SeasonCounters::default();
        self.health.injuries = 0;
        self.health.games_missed_injury = 0;
        self.health.injured_games_remaining = 0;
        self.health.injury_type = None;
        self.health.injury_status = InjuryStatus::Healthy;
        self.health.dtd_play_today = false;
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Player {
        Player::new(
            "Aurora",
            "Sample Skater",
            PlayerPosition::LeftWing,
            PlayerSkills::default(),
            25,
            27,
        )
    }

    #[test]
    fn points_is_goals_plus_assists() {
        let mut player = sample();
        player.season.goals = 12;
        player.season.assists = 30;
        assert_eq!(player.points(), 42);
    }

    #[test]
    fn dtd_player_needs_play_flag() {
        let mut player = sample();
        player.health.injured_games_remaining = 1;
        player.health.injury_status = InjuryStatus::DayToDay;
        assert!(player.is_dtd());
        assert!(!player.is_injured());
        assert!(!player.can_play_today());

        player.health.dtd_play_today = true;
        assert!(player.can_play_today());
    }

    #[test]
    fn ir_player_cannot_play() {
        let mut player = sample();
        player.health.injured_games_remaining = 5;
        player.health.injury_status = InjuryStatus::InjuredReserve;
        assert!(player.is_injured());
        assert!(!player.can_play_today());
    }

    #[test]
    fn season_reset_clears_injury_state() {
        let mut player = sample();
        player.season.goals = 9;
        player.health.injured_games_remaining = 4;
        player.health.injury_status = InjuryStatus::InjuredReserve;
        player.reset_season_stats();
        assert_eq!(player.season.goals, 0);
        assert!(player.can_play_today());
    }
}
