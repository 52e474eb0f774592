use crate::league::playoffs::PlayoffBracket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingRow {
    pub team: String,
    pub conference: String,
    pub division: String,
    pub gp: u32,
    pub points: u32,
    pub point_pct: f32,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
    pub home: String,
    pub away: String,
    pub l10: String,
    pub strk: String,
    pub gf: u32,
    pub ga: u32,
    pub gd: i32,
    pub pp_pct: f32,
    pub pk_pct: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachSeasonRow {
    pub team: String,
    pub coach: String,
    pub coach_age: u8,
    pub coach_rating: f32,
    pub coach_style: String,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
    pub points: u32,
    pub point_pct: f32,
    pub champion: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadershipRow {
    pub team: String,
    pub captain: String,
    pub assistants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerRow {
    pub team: String,
    pub player: String,
    pub age: u8,
    pub gp: u32,
    pub g: u32,
    pub a: u32,
    pub p: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalieRow {
    pub team: String,
    pub goalie: String,
    pub age: u8,
    pub gp: u32,
    pub w: u32,
    pub l: u32,
    pub otl: u32,
    pub so: u32,
    pub sv_pct: f32,
    pub gaa: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetiredNumberEvent {
    pub season: u32,
    pub number: u8,
    pub player: String,
    pub team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPickDetail {
    pub name: String,
    pub position: String,
    pub country: String,
    pub country_code: String,
    pub round: Option<u32>,
    pub overall: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningRow {
    pub team: String,
    pub player: String,
    pub years: u32,
    pub cap_hit: f64,
    #[serde(default)]
    pub round: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeAgentRow {
    pub name: String,
    pub position: String,
    pub age: u8,
    pub overall: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreeAgencyReport {
    pub re_signings: Vec<SigningRow>,
    pub signings: Vec<SigningRow>,
    pub user_pending_re_signs: Vec<FreeAgentRow>,
    pub remaining_free_agents: Vec<FreeAgentRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachRetirement {
    pub team: String,
    pub old_name: String,
    pub old_age: u8,
    pub old_rating: f32,
    pub new_name: String,
    pub new_age: u8,
    pub new_rating: f32,
    pub new_style: String,
}

/// Append-only snapshot of a completed season, written before the world
/// rolls forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season: u32,
    #[serde(default)]
    pub champion: String,
    #[serde(default)]
    pub standings: Vec<StandingRow>,
    #[serde(default)]
    pub coaches: Vec<CoachSeasonRow>,
    #[serde(default)]
    pub leadership: Vec<LeadershipRow>,
    #[serde(default)]
    pub top_scorers: Vec<ScorerRow>,
    #[serde(default)]
    pub top_goalies: Vec<GoalieRow>,
    #[serde(default)]
    pub playoffs: PlayoffBracket,
    #[serde(default)]
    pub retired: Vec<String>,
    #[serde(default)]
    pub retired_numbers: Vec<RetiredNumberEvent>,
    #[serde(default)]
    pub draft: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub draft_details: BTreeMap<String, Vec<DraftPickDetail>>,
    #[serde(default)]
    pub free_agency: FreeAgencyReport,
    #[serde(default)]
    pub retired_coaches: Vec<CoachRetirement>,
}

/// Career record written when a player retires. Replaces any earlier entry
/// for the same player id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HallOfFameEntry {
    pub player_id: String,
    pub name: String,
    pub team_at_retirement: String,
    pub position: String,
    pub retired_after_season: u32,
    pub age_at_retirement: u8,
    pub seasons_played: u32,
    pub first_season: u32,
    pub last_season: u32,
    pub career_gp: u32,
    pub career_g: u32,
    pub career_a: u32,
    pub career_p: u32,
    pub career_injuries: u32,
    pub career_games_missed: u32,
    pub goalie_gp: u32,
    pub goalie_w: u32,
    pub goalie_l: u32,
    pub goalie_otl: u32,
    pub goalie_gaa: f32,
    pub goalie_sv_pct: f32,
    pub seasons: Vec<crate::club::player::CareerSeason>,
}

/// Sticky offseason output surfaced by the service until the next offseason
/// overwrites it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OffseasonReport {
    pub retired: Vec<String>,
    pub retired_numbers: Vec<RetiredNumberEvent>,
    pub drafted: BTreeMap<String, Vec<String>>,
    pub drafted_details: BTreeMap<String, Vec<DraftPickDetail>>,
}
