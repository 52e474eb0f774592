use crate::club::coach::CoachStyle;
use crate::club::player::{InjuryStatus, InjuryType, Player, PlayerPosition};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRef {
    pub player_id: String,
    pub name: String,
    pub position: PlayerPosition,
}

impl PlayerRef {
    pub fn from_player(player: &Player) -> Self {
        PlayerRef {
            player_id: player.id.clone(),
            name: player.name.clone(),
            position: player.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalEvent {
    pub scorer: PlayerRef,
    pub assists: Vec<PlayerRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjuryEvent {
    pub player: PlayerRef,
    pub team: String,
    pub injury: InjuryType,
    pub status: InjuryStatus,
    pub games_out: u32,
}

/// Everything one simulated game produced. Player/goalie season counters are
/// mutated on the teams directly; this is the event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub home: String,
    pub away: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub overtime: bool,
    pub home_goal_events: Vec<GoalEvent>,
    pub away_goal_events: Vec<GoalEvent>,
    pub home_injuries: Vec<InjuryEvent>,
    pub away_injuries: Vec<InjuryEvent>,
    pub home_goalie: Option<PlayerRef>,
    pub away_goalie: Option<PlayerRef>,
    pub home_goalie_shots: u32,
    pub home_goalie_saves: u32,
    pub away_goalie_shots: u32,
    pub away_goalie_saves: u32,
    pub home_pp_goals: u32,
    pub home_pp_chances: u32,
    pub away_pp_goals: u32,
    pub away_pp_chances: u32,
}

impl GameResult {
    pub fn home_win(&self) -> bool {
        self.home_goals > self.away_goals
    }

    pub fn winner_name(&self) -> &str {
        if self.home_win() { &self.home } else { &self.away }
    }
}

/// Per-side inputs assembled by the league layer before a game runs.
#[derive(Debug, Clone, Copy)]
pub struct SideConditions {
    pub strategy: CoachStyle,
    pub coach_offense_bonus: f32,
    pub coach_defense_bonus: f32,
    pub context_bonus: f32,
    pub injury_mult: f32,
}

impl Default for SideConditions {
    fn default() -> Self {
        SideConditions {
            strategy: CoachStyle::Balanced,
            coach_offense_bonus: 0.0,
            coach_defense_bonus: 0.0,
            context_bonus: 0.0,
            injury_mult: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GameSettings {
    pub home: SideConditions,
    pub away: SideConditions,
    pub randomness_scale: f32,
    pub record_player_stats: bool,
    pub apply_injuries: bool,
    pub record_goalie_stats: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            home: SideConditions::default(),
            away: SideConditions::default(),
            randomness_scale: 1.0,
            record_player_stats: true,
            apply_injuries: true,
            record_goalie_stats: true,
        }
    }
}
