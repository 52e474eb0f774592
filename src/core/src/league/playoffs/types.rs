use crate::game::ThreeStar;
use serde::{Deserialize, Serialize};

pub const CUP_NAME: &str = "Founders Cup";
pub const SERIES_BEST_OF: u32 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayoffSeed {
    pub conference: String,
    pub division: String,
    pub seed: String,
    pub team: String,
    pub points: u32,
}

/// One completed game inside a pre-simulated series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesGame {
    pub game: u32,
    pub home: String,
    pub away: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub overtime: bool,
    pub home_goalie: String,
    pub away_goalie: String,
    pub home_goalie_shots: u32,
    pub home_goalie_saves: u32,
    pub away_goalie_shots: u32,
    pub away_goalie_saves: u32,
    pub attendance: u32,
    pub arena_capacity: u32,
    pub winner: String,
    pub three_stars: Vec<ThreeStar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayoffSeries {
    pub round: String,
    pub higher_seed: String,
    pub lower_seed: String,
    pub winner: String,
    pub loser: String,
    pub winner_wins: u32,
    pub loser_wins: u32,
    pub games: Vec<SeriesGame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayoffRound {
    pub name: String,
    pub series: Vec<PlayoffSeries>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayoffMvp {
    pub name: String,
    pub team: String,
    pub position: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MvpRaceRow {
    pub name: String,
    pub team: String,
    pub position: String,
    pub summary: String,
    pub score: f32,
}

/// The whole pre-simulated postseason. Revealed one day at a time through
/// the reveal queue; the tree itself never changes after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub cup_name: String,
    pub champion: String,
    pub cup_champion: String,
    pub mvp: PlayoffMvp,
    pub mvp_race: Vec<MvpRaceRow>,
    pub seeds: Vec<PlayoffSeed>,
    pub rounds: Vec<PlayoffRound>,
}

/// One series game enriched with the series context shown on reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealGame {
    #[serde(flatten)]
    pub game: SeriesGame,
    pub series_higher_seed: String,
    pub series_lower_seed: String,
    pub series_high_wins: u32,
    pub series_low_wins: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayoffRevealDay {
    pub round: String,
    pub game_number: u32,
    pub games: Vec<RevealGame>,
}
