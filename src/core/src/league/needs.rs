use crate::club::player::{Player, PlayerPosition};
use crate::club::team::{DRESSED_DEFENSE, DRESSED_FORWARDS, DRESSED_GOALIES, Team};
use crate::club::player::contract::TEAM_CAP_LIMIT;
use crate::league::league::LeagueSimulator;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DraftFocus {
    #[default]
    Auto,
    F,
    C,
    LW,
    RW,
    D,
    G,
}

impl DraftFocus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftFocus::Auto => "auto",
            DraftFocus::F => "f",
            DraftFocus::C => "c",
            DraftFocus::LW => "lw",
            DraftFocus::RW => "rw",
            DraftFocus::D => "d",
            DraftFocus::G => "g",
        }
    }

    pub fn all() -> [DraftFocus; 7] {
        [
            DraftFocus::Auto,
            DraftFocus::F,
            DraftFocus::C,
            DraftFocus::LW,
            DraftFocus::RW,
            DraftFocus::D,
            DraftFocus::G,
        ]
    }
}

impl FromStr for DraftFocus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "auto" => Ok(DraftFocus::Auto),
            "f" => Ok(DraftFocus::F),
            "c" => Ok(DraftFocus::C),
            "lw" => Ok(DraftFocus::LW),
            "rw" => Ok(DraftFocus::RW),
            "d" => Ok(DraftFocus::D),
            "g" => Ok(DraftFocus::G),
            other => Err(format!("invalid draft focus '{}'", other)),
        }
    }
}

pub const TEAM_NEED_KEYS: [&str; 6] = [
    "top6_f",
    "top4_d",
    "starter_g",
    "depth_f",
    "depth_d",
    "cap_relief",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedScores {
    #[serde(default)]
    pub top6_f: f32,
    #[serde(default)]
    pub top4_d: f32,
    #[serde(default)]
    pub starter_g: f32,
    #[serde(default)]
    pub depth_f: f32,
    #[serde(default)]
    pub depth_d: f32,
    #[serde(default)]
    pub cap_relief: f32,
}

impl NeedScores {
    pub fn get(&self, key: &str) -> f32 {
        match key {
            "top6_f" => self.top6_f,
            "top4_d" => self.top4_d,
            "starter_g" => self.starter_g,
            "depth_f" => self.depth_f,
            "depth_d" => self.depth_d,
            "cap_relief" => self.cap_relief,
            _ => 0.0,
        }
    }

    pub fn normalized(&self) -> NeedScores {
        let norm = |v: f32| ((v.clamp(0.0, 1.0)) * 1000.0).round() / 1000.0;
        NeedScores {
            top6_f: norm(self.top6_f),
            top4_d: norm(self.top4_d),
            starter_g: norm(self.starter_g),
            depth_f: norm(self.depth_f),
            depth_d: norm(self.depth_d),
            cap_relief: norm(self.cap_relief),
        }
    }

    pub fn primary(&self) -> (&'static str, f32) {
        TEAM_NEED_KEYS
            .iter()
            .map(|key| (*key, self.get(key)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or(("", 0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NeedsMode {
    #[default]
    Auto,
    Manual,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamNeedsConfig {
    pub mode: NeedsMode,
    #[serde(default)]
    pub scores: Option<NeedScores>,
}

/// Resolved needs view for one team: auto model plus any manual override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamNeeds {
    pub team: String,
    pub scores: NeedScores,
    pub auto_scores: NeedScores,
    pub primary_need: String,
    pub window: String,
    pub target_position: String,
    pub mode: NeedsMode,
    pub source: String,
}

pub fn need_matches_position(need_key: &str, position: PlayerPosition) -> bool {
    match need_key {
        "top6_f" | "depth_f" => position.is_forward(),
        "top4_d" | "depth_d" => position.is_defense(),
        "starter_g" => position.is_goalie(),
        _ => true,
    }
}

pub fn team_cap_used(team: &Team) -> f64 {
    let total: f64 = team.organization_players().map(|p| p.contract.cap_hit).sum();
    (total * 100.0).round() / 100.0
}

pub fn team_cap_space(team: &Team) -> f64 {
    TEAM_CAP_LIMIT - team_cap_used(team)
}

fn avg_of<F: Fn(&Player) -> f32>(players: &[&Player], n: usize, f: F) -> f32 {
    let sample = &players[..players.len().min(n)];
    if sample.is_empty() {
        return 0.0;
    }
    sample.iter().map(|p| f(p)).sum::<f32>() / sample.len() as f32
}

impl LeagueSimulator {
    pub fn team_point_pct(&self, team_name: &str) -> f32 {
        match self.records.get(team_name) {
            Some(rec) if rec.games_played() > 0 => rec.point_pct(),
            _ => 0.5,
        }
    }

    /// Auto needs model: weak units, roster shortages, injuries, and age all
    /// push a bucket's score up; the contention window nudges priorities.
    fn raw_team_needs(&self, team: &Team) -> NeedScores {
        let active: Vec<&Player> = team.roster.iter().filter(|p| !p.is_injured()).collect();
        let mut forwards: Vec<&Player> = active
            .iter()
            .copied()
            .filter(|p| p.position.is_forward())
            .collect();
        let mut defense: Vec<&Player> = active
            .iter()
            .copied()
            .filter(|p| p.position.is_defense())
            .collect();
        let mut goalies: Vec<&Player> = active
            .iter()
            .copied()
            .filter(|p| p.position.is_goalie())
            .collect();
        forwards.sort_by(|a, b| b.skills.overall_skater().total_cmp(&a.skills.overall_skater()));
        defense.sort_by(|a, b| b.skills.overall_skater().total_cmp(&a.skills.overall_skater()));
        goalies.sort_by(|a, b| b.skills.overall_goalie().total_cmp(&a.skills.overall_goalie()));

        let top6_f_avg = avg_of(&forwards, 6, |p| p.skills.overall_skater());
        let top4_d_avg = avg_of(&defense, 4, |p| p.skills.overall_skater());
        let starter_g_avg = avg_of(&goalies, 1, |p| p.skills.overall_goalie());

        let injured_f = team
            .roster
            .iter()
            .filter(|p| p.position.is_forward() && p.is_injured())
            .count() as f32;
        let injured_d = team
            .roster
            .iter()
            .filter(|p| p.position.is_defense() && p.is_injured())
            .count() as f32;
        let injured_g = team
            .roster
            .iter()
            .filter(|p| p.position.is_goalie() && p.is_injured())
            .count() as f32;

        let f_short = (DRESSED_FORWARDS as i32 - forwards.len() as i32).max(0) as f32;
        let d_short = (DRESSED_DEFENSE as i32 - defense.len() as i32).max(0) as f32;
        let g_short = (DRESSED_GOALIES as i32 - goalies.len() as i32).max(0) as f32;

        let f_age = avg_of(&forwards, 8, |p| p.age as f32);
        let d_age = avg_of(&defense, 5, |p| p.age as f32);
        let g_age = avg_of(&goalies, 2, |p| p.age as f32);

        let mut top6_f = ((3.20 - top6_f_avg) * 0.42).max(0.0)
            + f_short * 0.19
            + injured_f * 0.07
            + ((f_age - 29.5) * 0.03).max(0.0);
        let mut top4_d = ((3.25 - top4_d_avg) * 0.45).max(0.0)
            + d_short * 0.22
            + injured_d * 0.08
            + ((d_age - 30.0) * 0.03).max(0.0);
        let mut starter_g = ((3.35 - starter_g_avg) * 0.58).max(0.0)
            + g_short * 0.32
            + injured_g * 0.12
            + ((g_age - 31.0) * 0.03).max(0.0);
        let depth_f = f_short * 0.44
            + ((2.65 - avg_of(&forwards, 12, |p| p.skills.overall_skater())) * 0.22).max(0.0)
            + injured_f * 0.06;
        let depth_d = d_short * 0.52
            + ((2.70 - avg_of(&defense, 6, |p| p.skills.overall_skater())) * 0.24).max(0.0)
            + injured_d * 0.06;

        let cap_ratio = (team_cap_used(team) / TEAM_CAP_LIMIT) as f32;
        let old_expensive = team
            .roster
            .iter()
            .filter(|p| p.age >= 31 && p.contract.cap_hit >= 4.2 && !p.is_injured())
            .count() as f32;
        let mut cap_relief = ((cap_ratio - 0.90) * 1.3).max(0.0) + old_expensive * 0.06;

        let point_pct = self.team_point_pct(&team.name);
        if point_pct >= 0.58 {
            top6_f += 0.06;
            top4_d += 0.06;
            starter_g += 0.05;
            cap_relief *= 0.88;
        } else if point_pct <= 0.45 {
            cap_relief += 0.10;
            top6_f *= 0.94;
            top4_d *= 0.94;
        }

        NeedScores {
            top6_f,
            top4_d,
            starter_g,
            depth_f,
            depth_d,
            cap_relief,
        }
    }

    pub fn get_team_needs(&self, team_name: &str) -> TeamNeeds {
        let Some(team) = self.get_team(team_name) else {
            return TeamNeeds {
                team: team_name.to_string(),
                scores: NeedScores::default(),
                auto_scores: NeedScores::default(),
                primary_need: String::new(),
                window: String::from("balanced"),
                target_position: String::from("ANY"),
                mode: NeedsMode::Auto,
                source: String::from("auto"),
            };
        };

        let auto_scores = self.raw_team_needs(team).normalized();
        let config = self.team_needs_by_team.get(team_name);
        let (scores, mode, source) = match config {
            Some(cfg) if cfg.mode == NeedsMode::Manual => (
                cfg.scores.unwrap_or(auto_scores).normalized(),
                NeedsMode::Manual,
                "manual",
            ),
            _ => (auto_scores, NeedsMode::Auto, "auto"),
        };

        let (primary_need, _) = scores.primary();
        let point_pct = self.team_point_pct(team_name);
        let window = if point_pct >= 0.60 {
            "contend"
        } else if point_pct <= 0.44 {
            "retool"
        } else {
            "balanced"
        };
        let target_position = match primary_need {
            "top6_f" | "depth_f" => "F",
            "top4_d" | "depth_d" => "D",
            "starter_g" => "G",
            "cap_relief" => "CAP",
            _ => "ANY",
        };

        TeamNeeds {
            team: team.name.clone(),
            scores,
            auto_scores,
            primary_need: primary_need.to_string(),
            window: window.to_string(),
            target_position: target_position.to_string(),
            mode,
            source: source.to_string(),
        }
    }

    pub fn set_team_needs_override(
        &mut self,
        team_name: &str,
        mode: NeedsMode,
        scores: Option<NeedScores>,
    ) -> TeamNeeds {
        if self.get_team(team_name).is_none() {
            return self.get_team_needs(team_name);
        }
        let config = match mode {
            NeedsMode::Auto => TeamNeedsConfig {
                mode: NeedsMode::Auto,
                scores: None,
            },
            NeedsMode::Manual => {
                let effective = scores
                    .map(|s| s.normalized())
                    .unwrap_or_else(|| self.get_team_needs(team_name).auto_scores);
                TeamNeedsConfig {
                    mode: NeedsMode::Manual,
                    scores: Some(effective),
                }
            }
        };
        self.team_needs_by_team.insert(team_name.to_string(), config);
        self.get_team_needs(team_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_picks_highest_bucket() {
        let scores = NeedScores {
            top6_f: 0.2,
            top4_d: 0.8,
            starter_g: 0.4,
            depth_f: 0.1,
            depth_d: 0.3,
            cap_relief: 0.0,
        };
        assert_eq!(scores.primary().0, "top4_d");
    }

    #[test]
    fn need_position_mapping() {
        assert!(need_matches_position("top6_f", PlayerPosition::LeftWing));
        assert!(need_matches_position("starter_g", PlayerPosition::Goalie));
        assert!(!need_matches_position("top4_d", PlayerPosition::Center));
        assert!(need_matches_position("cap_relief", PlayerPosition::Center));
    }

    #[test]
    fn normalization_clamps_to_unit_interval() {
        let scores = NeedScores {
            top6_f: 3.0,
            top4_d: -1.0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(scores.top6_f, 1.0);
        assert_eq!(scores.top4_d, 0.0);
    }
}
