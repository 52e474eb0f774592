use crate::club::coach::Coach;
use crate::club::player::{Player, PlayerPosition};
use crate::club::team::lineup::{DEFENSE_LINE_SLOTS, FORWARD_LINE_SLOTS, GOALIE_LINE_SLOTS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const MAX_ROSTER_SIZE: usize = 22;
pub const MIN_MINOR_ROSTER_SIZE: usize = 10;
pub const DRESSED_ROSTER_SIZE: usize = 20;
pub const DRESSED_FORWARDS: usize = 12;
pub const DRESSED_DEFENSE: usize = 6;
pub const DRESSED_GOALIES: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetiredNumber {
    pub season: u32,
    pub number: u8,
    pub player: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub division: String,
    pub conference: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
    #[serde(default = "default_arena_capacity")]
    pub arena_capacity: u32,
    pub roster: Vec<Player>,
    #[serde(default)]
    pub minor_roster: Vec<Player>,
    #[serde(default)]
    pub dressed_player_names: BTreeSet<String>,
    #[serde(default)]
    pub line_assignments: BTreeMap<String, String>,
    #[serde(default)]
    pub starting_goalie_name: Option<String>,
    #[serde(default)]
    pub coach: Coach,
    #[serde(default)]
    pub captain_name: String,
    #[serde(default)]
    pub assistant_names: Vec<String>,
    #[serde(default)]
    pub retired_numbers: Vec<RetiredNumber>,
}

fn default_primary_color() -> String {
    String::from("#1f3a93")
}

fn default_secondary_color() -> String {
    String::from("#d7e1f5")
}

fn default_arena_capacity() -> u32 {
    16000
}

impl Team {
    pub fn new(name: &str, division: &str, conference: &str) -> Self {
        Team {
            name: name.to_string(),
            division: division.to_string(),
            conference: conference.to_string(),
            logo: String::new(),
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            arena_capacity: default_arena_capacity(),
            roster: Vec::new(),
            minor_roster: Vec::new(),
            dressed_player_names: BTreeSet::new(),
            line_assignments: BTreeMap::new(),
            starting_goalie_name: None,
            coach: Coach::default(),
            captain_name: String::new(),
            assistant_names: Vec::new(),
            retired_numbers: Vec::new(),
        }
    }

    pub fn player_by_name(&self, player_name: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.name == player_name)
    }

    pub fn player_by_name_mut(&mut self, player_name: &str) -> Option<&mut Player> {
        self.roster.iter_mut().find(|p| p.name == player_name)
    }

    pub fn minor_player_by_name(&self, player_name: &str) -> Option<&Player> {
        self.minor_roster.iter().find(|p| p.name == player_name)
    }

    pub fn organization_players(&self) -> impl Iterator<Item = &Player> {
        self.roster.iter().chain(self.minor_roster.iter())
    }

    pub fn organization_players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.roster.iter_mut().chain(self.minor_roster.iter_mut())
    }

    pub fn active_players(&self) -> Vec<&Player> {
        self.roster.iter().filter(|p| p.can_play_today()).collect()
    }

    pub fn active_forwards(&self) -> Vec<&Player> {
        self.roster
            .iter()
            .filter(|p| p.can_play_today() && p.position.is_forward())
            .collect()
    }

    pub fn active_defense(&self) -> Vec<&Player> {
        self.roster
            .iter()
            .filter(|p| p.can_play_today() && p.position.is_defense())
            .collect()
    }

    pub fn active_goalies(&self) -> Vec<&Player> {
        self.roster
            .iter()
            .filter(|p| p.can_play_today() && p.position.is_goalie())
            .collect()
    }

    pub fn active_skaters(&self) -> Vec<&Player> {
        self.roster
            .iter()
            .filter(|p| p.can_play_today() && p.position.is_skater())
            .collect()
    }

    pub fn healthy_roster_count(&self) -> usize {
        self.roster.iter().filter(|p| !p.is_injured()).count()
    }

    pub fn healthy_goalie_count(&self) -> usize {
        self.roster
            .iter()
            .filter(|p| p.position.is_goalie() && !p.is_injured())
            .count()
    }

    pub fn is_dressed(&self, player: &Player) -> bool {
        self.dressed_player_names.contains(&player.name)
    }

    pub fn dressed_players(&self) -> Vec<&Player> {
        self.roster
            .iter()
            .filter(|p| self.dressed_player_names.contains(&p.name) && p.can_play_today())
            .collect()
    }

    pub fn dressed_skaters(&self) -> Vec<&Player> {
        self.dressed_players()
            .into_iter()
            .filter(|p| p.position.is_skater())
            .collect()
    }

    fn dressed_for_slots(&self, slots: &[&str]) -> Vec<&Player> {
        let mut used: BTreeSet<&str> = BTreeSet::new();
        let mut out: Vec<&Player> = Vec::new();
        for slot in slots {
            let Some(name) = self.line_assignments.get(*slot) else {
                continue;
            };
            if name.is_empty() || used.contains(name.as_str()) {
                continue;
            }
            let Some(player) = self.player_by_name(name) else {
                continue;
            };
            if !player.can_play_today() {
                continue;
            }
            used.insert(name.as_str());
            out.push(player);
        }
        out
    }

    pub fn dressed_forwards(&self) -> Vec<&Player> {
        let from_lines = self.dressed_for_slots(FORWARD_LINE_SLOTS);
        if !from_lines.is_empty() {
            return from_lines;
        }
        self.dressed_players()
            .into_iter()
            .filter(|p| p.position.is_forward())
            .collect()
    }

    pub fn dressed_defense(&self) -> Vec<&Player> {
        let from_lines = self.dressed_for_slots(DEFENSE_LINE_SLOTS);
        if !from_lines.is_empty() {
            return from_lines;
        }
        self.dressed_players()
            .into_iter()
            .filter(|p| p.position.is_defense())
            .collect()
    }

    pub fn dressed_goalies(&self) -> Vec<&Player> {
        let from_lines = self.dressed_for_slots(GOALIE_LINE_SLOTS);
        if !from_lines.is_empty() {
            return from_lines;
        }
        self.dressed_players()
            .into_iter()
            .filter(|p| p.position.is_goalie())
            .collect()
    }

    pub fn set_starting_goalie(&mut self, player_name: Option<&str>) -> bool {
        let Some(player_name) = player_name else {
            self.starting_goalie_name = None;
            return true;
        };
        let Some(player) = self.player_by_name(player_name) else {
            return false;
        };
        if !player.position.is_goalie() || !player.can_play_today() || !self.is_dressed(player) {
            return false;
        }
        self.starting_goalie_name = Some(player.name.clone());
        true
    }

    pub fn can_dress_player(&self, player: &Player) -> bool {
        if !player.can_play_today() {
            return false;
        }
        if self.is_dressed(player) {
            return true;
        }
        self.dressed_players().len() < DRESSED_ROSTER_SIZE
    }

    /// Dress or scratch a player, refusing moves that would leave the dressed
    /// group below position minimums or above the 20-man limit.
    pub fn toggle_dressed_status(&mut self, player_name: &str) -> bool {
        let Some(player) = self.player_by_name(player_name) else {
            return false;
        };
        if !player.can_play_today() {
            return false;
        }
        let position = player.position;
        let name = player.name.clone();

        if self.dressed_player_names.contains(&name) {
            let (group_len, minimum) = if position.is_forward() {
                (self.dressed_forwards().len(), DRESSED_FORWARDS)
            } else if position.is_defense() {
                (self.dressed_defense().len(), DRESSED_DEFENSE)
            } else {
                (self.dressed_goalies().len(), DRESSED_GOALIES)
            };
            if group_len <= minimum {
                return false;
            }
            self.dressed_player_names.remove(&name);
            return true;
        }

        if self.dressed_players().len() >= DRESSED_ROSTER_SIZE {
            return false;
        }
        self.dressed_player_names.insert(name);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::PlayerSkills;

    fn team_with_roster() -> Team {
        let mut team = Team::new("Aurora", "North", "Western");
        for idx in 0..13 {
            let position = match idx % 3 {
                0 => PlayerPosition::Center,
                1 => PlayerPosition::LeftWing,
                _ => PlayerPosition::RightWing,
            };
            team.roster.push(Player::new(
                "Aurora",
                &format!("Forward {}", idx),
                position,
                PlayerSkills::default(),
                25,
                27,
            ));
        }
        for idx in 0..7 {
            team.roster.push(Player::new(
                "Aurora",
                &format!("Defense {}", idx),
                PlayerPosition::Defense,
                PlayerSkills::default(),
                26,
                27,
            ));
        }
        for idx in 0..2 {
            team.roster.push(Player::new(
                "Aurora",
                &format!("Goalie {}", idx),
                PlayerPosition::Goalie,
                PlayerSkills {
                    goaltending: 3.2,
                    ..Default::default()
                },
                27,
                29,
            ));
        }
        team
    }

    #[test]
    fn starting_goalie_must_be_dressed_goalie() {
        let mut team = team_with_roster();
        team.set_default_lineup();
        assert!(team.set_starting_goalie(Some("Goalie 0")));
        assert!(!team.set_starting_goalie(Some("Forward 0")));
        assert!(team.set_starting_goalie(None));
        assert_eq!(team.starting_goalie_name, None);
    }

    #[test]
    fn cannot_scratch_below_goalie_minimum() {
        let mut team = team_with_roster();
        team.set_default_lineup();
        assert!(!team.toggle_dressed_status("Goalie 0"));
    }

    #[test]
    fn dressed_groups_follow_line_assignments() {
        let mut team = team_with_roster();
        team.set_default_lineup();
        assert_eq!(team.dressed_forwards().len(), DRESSED_FORWARDS);
        assert_eq!(team.dressed_defense().len(), DRESSED_DEFENSE);
        assert_eq!(team.dressed_goalies().len(), DRESSED_GOALIES);
        assert_eq!(team.dressed_players().len(), DRESSED_ROSTER_SIZE);
    }
}
