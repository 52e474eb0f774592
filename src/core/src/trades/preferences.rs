use crate::club::player::Player;
use crate::club::team::Team;
use crate::league::league::LeagueSimulator;
use crate::league::needs::need_matches_position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradePreference {
    #[default]
    Available,
    Shop,
    Untouchable,
}

impl TradePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradePreference::Available => "available",
            TradePreference::Shop => "shop",
            TradePreference::Untouchable => "untouchable",
        }
    }
}

impl FromStr for TradePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "available" => Ok(TradePreference::Available),
            "shop" => Ok(TradePreference::Shop),
            "untouchable" => Ok(TradePreference::Untouchable),
            other => Err(format!("unknown trade preference '{}'", other)),
        }
    }
}

pub type TradePreferencesByTeam = BTreeMap<String, BTreeMap<String, TradePreference>>;

/// Read-only view over the simulator plus the persisted trade preferences,
/// shared by every trade evaluation path.
pub struct TradeDesk<'a> {
    pub sim: &'a LeagueSimulator,
    pub prefs: &'a TradePreferencesByTeam,
    pub user_team: Option<&'a str>,
}

impl<'a> TradeDesk<'a> {
    pub fn new(
        sim: &'a LeagueSimulator,
        prefs: &'a TradePreferencesByTeam,
        user_team: Option<&'a str>,
    ) -> Self {
        TradeDesk {
            sim,
            prefs,
            user_team,
        }
    }

    /// Effective per-player preferences for a team. CPU teams with no saved
    /// board publish a realistic synthetic one: the top two players are
    /// untouchable and up to six surplus veterans go on the shop list.
    pub fn team_preferences(&self, team: &Team) -> BTreeMap<String, TradePreference> {
        let mut prefs: BTreeMap<String, TradePreference> = team
            .roster
            .iter()
            .map(|p| (p.name.clone(), TradePreference::Available))
            .collect();

        let saved = self.prefs.get(&team.name);
        let mut has_saved = false;
        if let Some(saved) = saved {
            for (name, pref) in saved {
                if prefs.contains_key(name) {
                    prefs.insert(name.clone(), *pref);
                    has_saved = true;
                }
            }
        }

        let is_user_team = self.user_team == Some(team.name.as_str());
        if is_user_team || has_saved {
            return prefs;
        }

        let mut ranked: Vec<&Player> = team.roster.iter().collect();
        ranked.sort_by(|a, b| b.overall().total_cmp(&a.overall()));
        for core in ranked.iter().take(2) {
            prefs.insert(core.name.clone(), TradePreference::Untouchable);
        }

        let needs = self.sim.get_team_needs(&team.name);
        let primary = needs.primary_need.as_str();
        let mut shop_candidates: Vec<(f32, String)> = team
            .roster
            .iter()
            .filter(|p| !p.is_injured())
            .filter(|p| prefs.get(&p.name) != Some(&TradePreference::Untouchable))
            .map(|p| {
                let matches_primary =
                    !primary.is_empty() && need_matches_position(primary, p.position);
                let score = if matches_primary { -0.30 } else { 0.95 }
                    + p.age as f32 * 0.035
                    + p.contract.cap_hit as f32 * 0.12
                    + p.contract.years_left as f32 * 0.04
                    - p.overall() * 0.28;
                (score, p.name.clone())
            })
            .collect();
        shop_candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (_, name) in shop_candidates.into_iter().take(6) {
            prefs.insert(name, TradePreference::Shop);
        }

        prefs
    }

    pub fn preference_for(&self, team: &Team, player_name: &str) -> TradePreference {
        self.team_preferences(team)
            .get(player_name)
            .copied()
            .unwrap_or(TradePreference::Available)
    }

    pub fn trade_block_names(&self, team: &Team) -> Vec<String> {
        self.team_preferences(team)
            .into_iter()
            .filter(|(_, pref)| *pref == TradePreference::Shop)
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{PlayerPosition, PlayerSkills};
    use crate::club::team::Team;
    use crate::league::league::SimulatorSettings;

    fn league() -> LeagueSimulator {
        let mut team = Team::new("Aurora", "North", "Western");
        for idx in 0..12 {
            team.roster.push(Player::new(
                "Aurora",
                &format!("Skater {}", idx),
                PlayerPosition::Center,
                PlayerSkills {
                    shooting: 2.2 + idx as f32 * 0.2,
                    ..Default::default()
                },
                24 + (idx % 10) as u8,
                27,
            ));
        }
        LeagueSimulator::new(
            vec![team, Team::new("Glaciers", "North", "Western")],
            SimulatorSettings::default(),
            3,
        )
    }

    #[test]
    fn cpu_board_protects_the_core() {
        let sim = league();
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, Some("Glaciers"));
        let team = sim.get_team("Aurora").unwrap();
        let board = desk.team_preferences(team);
        let untouchables: Vec<_> = board
            .iter()
            .filter(|(_, p)| **p == TradePreference::Untouchable)
            .collect();
        assert_eq!(untouchables.len(), 2);
        assert!(board.values().any(|p| *p == TradePreference::Shop));
    }

    #[test]
    fn saved_preferences_override_the_synthetic_board() {
        let sim = league();
        let mut prefs = TradePreferencesByTeam::new();
        prefs.entry("Aurora".to_string()).or_default().insert(
            "Skater 11".to_string(),
            TradePreference::Shop,
        );
        let desk = TradeDesk::new(&sim, &prefs, Some("Glaciers"));
        let team = sim.get_team("Aurora").unwrap();
        assert_eq!(desk.preference_for(team, "Skater 11"), TradePreference::Shop);
        // With a saved board, no synthetic untouchables appear.
        assert!(
            !desk
                .team_preferences(team)
                .values()
                .any(|p| *p == TradePreference::Untouchable)
        );
    }

    #[test]
    fn user_team_gets_no_synthetic_board() {
        let sim = league();
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, Some("Aurora"));
        let team = sim.get_team("Aurora").unwrap();
        assert!(
            desk.team_preferences(team)
                .values()
                .all(|p| *p == TradePreference::Available)
        );
    }
}
