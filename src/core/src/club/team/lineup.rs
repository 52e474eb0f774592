use crate::club::coach::CoachStyle;
use crate::club::player::PlayerPosition;
use crate::club::team::team::Team;
use std::collections::{BTreeMap, BTreeSet};

pub const FORWARD_LINE_SLOTS: &[&str] = &[
    "LW1", "C1", "RW1", "LW2", "C2", "RW2", "LW3", "C3", "RW3", "LW4", "C4", "RW4",
];
pub const DEFENSE_LINE_SLOTS: &[&str] = &["LD1", "RD1", "LD2", "RD2", "LD3", "RD3"];
pub const GOALIE_LINE_SLOTS: &[&str] = &["G1", "G2"];

pub fn all_line_slots() -> impl Iterator<Item = &'static str> {
    FORWARD_LINE_SLOTS
        .iter()
        .chain(DEFENSE_LINE_SLOTS.iter())
        .chain(GOALIE_LINE_SLOTS.iter())
        .copied()
}

pub fn slot_expected_position(slot: &str) -> Option<PlayerPosition> {
    if slot.starts_with("LW") {
        return Some(PlayerPosition::LeftWing);
    }
    if slot.starts_with('C') {
        return Some(PlayerPosition::Center);
    }
    if slot.starts_with("RW") {
        return Some(PlayerPosition::RightWing);
    }
    if slot.starts_with("LD") || slot.starts_with("RD") {
        return Some(PlayerPosition::Defense);
    }
    if slot.starts_with('G') {
        return Some(PlayerPosition::Goalie);
    }
    None
}

/// Deterministic per-player jitter so weaker coaches do not always find the
/// mathematically perfect ordering.
fn lineup_noise(seed_text: &str) -> f32 {
    let token: u32 = seed_text.chars().map(|ch| ch as u32).sum();
    ((token % 37) as f32 - 18.0) / 18.0
}

#[derive(Clone)]
struct Candidate {
    name: String,
    position: PlayerPosition,
    rank: f32,
}

fn sort_desc(pool: &mut [Candidate]) {
    pool.sort_by(|a, b| b.rank.total_cmp(&a.rank));
}

impl Team {
    /// Coach-built lineup: style-weighted ranking per position group with
    /// coach-quality-scaled noise, slots filled in line order, best remaining
    /// skater as the out-of-position fallback.
    pub fn set_default_lineup(&mut self) {
        let coach_quality = self.coach.quality();
        let noise_scale = 0.55 * (1.0 - coach_quality);
        let style = self.coach.style;

        let mut forwards: Vec<Candidate> = Vec::new();
        let mut defense: Vec<Candidate> = Vec::new();
        let mut goalies: Vec<Candidate> = Vec::new();
        let mut skaters_by_overall: Vec<Candidate> = Vec::new();

        for player in self.active_players() {
            let skills = &player.skills;
            let noise = |prefix: &str| lineup_noise(&format!("{}:{}", prefix, player.id));
            if player.position.is_forward() {
                let rank = match style {
                    CoachStyle::Aggressive => {
                        skills.shooting * 0.56
                            + skills.playmaking * 0.30
                            + skills.defense * 0.10
                            + skills.physical * 0.04
                    }
                    CoachStyle::Defensive => {
                        skills.defense * 0.44
                            + skills.playmaking * 0.28
                            + skills.shooting * 0.20
                            + skills.physical * 0.08
                    }
                    CoachStyle::Balanced => {
                        skills.shooting * 0.40
                            + skills.playmaking * 0.32
                            + skills.defense * 0.20
                            + skills.physical * 0.08
                    }
                };
                forwards.push(Candidate {
                    name: player.name.clone(),
                    position: player.position,
                    rank: rank + noise("F") * noise_scale,
                });
            } else if player.position.is_defense() {
                let rank = match style {
                    CoachStyle::Aggressive => {
                        skills.playmaking * 0.45
                            + skills.defense * 0.36
                            + skills.shooting * 0.15
                            + skills.physical * 0.04
                    }
                    CoachStyle::Defensive => {
                        skills.defense * 0.56
                            + skills.playmaking * 0.20
                            + skills.physical * 0.16
                            + skills.shooting * 0.08
                    }
                    CoachStyle::Balanced => {
                        skills.defense * 0.44
                            + skills.playmaking * 0.28
                            + skills.shooting * 0.12
                            + skills.physical * 0.16
                    }
                };
                defense.push(Candidate {
                    name: player.name.clone(),
                    position: player.position,
                    rank: rank + noise("D") * noise_scale,
                });
            } else {
                goalies.push(Candidate {
                    name: player.name.clone(),
                    position: player.position,
                    rank: skills.goaltending + noise("G") * (noise_scale * 0.55),
                });
            }
            if player.position.is_skater() {
                skaters_by_overall.push(Candidate {
                    name: player.name.clone(),
                    position: player.position,
                    rank: skills.overall_skater(),
                });
            }
        }

        sort_desc(&mut forwards);
        sort_desc(&mut defense);
        sort_desc(&mut goalies);
        sort_desc(&mut skaters_by_overall);

        let mut assignments: BTreeMap<String, String> = BTreeMap::new();
        let mut used: BTreeSet<String> = BTreeSet::new();

        let pick_best = |preferred: &[&Candidate],
                         fallback: &[Candidate],
                         used: &BTreeSet<String>|
         -> Option<String> {
            preferred
                .iter()
                .map(|c| &c.name)
                .chain(fallback.iter().map(|c| &c.name))
                .find(|name| !used.contains(*name))
                .cloned()
        };

        for slot in FORWARD_LINE_SLOTS {
            let expected = slot_expected_position(slot);
            let preferred: Vec<&Candidate> = forwards
                .iter()
                .filter(|c| Some(c.position) == expected)
                .collect();
            let chosen = pick_best(&preferred, &forwards, &used)
                .or_else(|| pick_best(&[], &skaters_by_overall, &used));
            if let Some(name) = chosen {
                used.insert(name.clone());
                assignments.insert(slot.to_string(), name);
            }
        }

        for slot in DEFENSE_LINE_SLOTS {
            let preferred: Vec<&Candidate> = defense.iter().collect();
            if let Some(name) = pick_best(&preferred, &skaters_by_overall, &used) {
                used.insert(name.clone());
                assignments.insert(slot.to_string(), name);
            }
        }

        for slot in GOALIE_LINE_SLOTS {
            let preferred: Vec<&Candidate> = goalies.iter().collect();
            if let Some(name) = pick_best(&preferred, &skaters_by_overall, &used) {
                used.insert(name.clone());
                assignments.insert(slot.to_string(), name);
            }
        }

        self.line_assignments = assignments;
        self.refresh_dressed_from_assignments();
        self.sync_starting_goalie_from_lines();
    }

    /// Manual lines: honor each requested name when that player is healthy
    /// and unused, otherwise fall back to the coach default, then to the best
    /// remaining healthy player.
    pub fn set_line_assignments(&mut self, requested: &BTreeMap<String, String>) {
        self.set_default_lineup();
        let auto_assignments = self.line_assignments.clone();

        let mut healthy_sorted: Vec<Candidate> = self
            .active_players()
            .iter()
            .map(|p| Candidate {
                name: p.name.clone(),
                position: p.position,
                rank: if p.position.is_goalie() {
                    p.skills.goaltending
                } else {
                    p.skills.overall_skater()
                },
            })
            .collect();
        sort_desc(&mut healthy_sorted);

        let mut fin: BTreeMap<String, String> = BTreeMap::new();
        let mut used: BTreeSet<String> = BTreeSet::new();

        for slot in all_line_slots() {
            let mut chosen: Option<String> = None;

            if let Some(req_name) = requested.get(slot).map(|s| s.trim()).filter(|s| !s.is_empty())
            {
                if let Some(player) = self.player_by_name(req_name) {
                    if player.can_play_today() && !used.contains(&player.name) {
                        chosen = Some(player.name.clone());
                    }
                }
            }
            if chosen.is_none() {
                if let Some(auto_name) = auto_assignments.get(slot) {
                    if let Some(player) = self.player_by_name(auto_name) {
                        if player.can_play_today() && !used.contains(&player.name) {
                            chosen = Some(player.name.clone());
                        }
                    }
                }
            }
            if chosen.is_none() {
                chosen = healthy_sorted
                    .iter()
                    .map(|c| &c.name)
                    .find(|name| !used.contains(*name))
                    .cloned();
            }

            if let Some(name) = chosen {
                used.insert(name.clone());
                fin.insert(slot.to_string(), name);
            }
        }

        self.line_assignments = fin;
        self.refresh_dressed_from_assignments();
        self.sync_starting_goalie_from_lines();
    }

    /// Aggregate out-of-position cost of the current assignments, applied to
    /// the user team's in-game strength. Capped so even a chaotic sheet does
    /// not zero a team out.
    pub fn lineup_position_penalty(&self) -> f32 {
        let mut penalty: f32 = 0.0;
        for slot in all_line_slots() {
            let Some(name) = self.line_assignments.get(slot).filter(|n| !n.is_empty()) else {
                penalty += 0.08;
                continue;
            };
            let Some(player) = self.player_by_name(name) else {
                penalty += 0.08;
                continue;
            };
            if !player.can_play_today() {
                penalty += 0.08;
                continue;
            }
            let Some(expected) = slot_expected_position(slot) else {
                continue;
            };
            let actual = player.position;
            if expected == actual {
                continue;
            }
            penalty += if expected.is_forward() && actual.is_forward() {
                0.03
            } else if expected.is_defense() && actual.is_forward() {
                0.07
            } else if expected.is_forward() && actual.is_defense() {
                0.08
            } else if expected.is_goalie() {
                0.25
            } else if actual.is_goalie() {
                0.18
            } else {
                0.09
            };
        }
        penalty.min(0.40)
    }

    pub(crate) fn refresh_dressed_from_assignments(&mut self) {
        let names: BTreeSet<String> = self
            .line_assignments
            .values()
            .filter(|name| !name.is_empty())
            .cloned()
            .collect();
        if !names.is_empty() {
            self.dressed_player_names = names;
        }
    }

    fn sync_starting_goalie_from_lines(&mut self) {
        let starter = self
            .line_assignments
            .get("G1")
            .and_then(|name| self.player_by_name(name))
            .filter(|p| p.position.is_goalie())
            .map(|p| p.name.clone());
        self.starting_goalie_name = starter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{Player, PlayerSkills};

    fn full_team() -> Team {
        let mut team = Team::new("Aurora", "North", "Western");
        let forwards = [
            PlayerPosition::Center,
            PlayerPosition::LeftWing,
            PlayerPosition::RightWing,
        ];
        for idx in 0..13 {
            let mut skills = PlayerSkills::default();
            skills.shooting = 2.2 + (idx as f32) * 0.15;
            team.roster.push(Player::new(
                "Aurora",
                &format!("F{}", idx),
                forwards[idx % 3],
                skills,
                24,
                27,
            ));
        }
        for idx in 0..7 {
            let mut skills = PlayerSkills::default();
            skills.defense = 2.4 + (idx as f32) * 0.2;
            team.roster.push(Player::new(
                "Aurora",
                &format!("D{}", idx),
                PlayerPosition::Defense,
                skills,
                26,
                28,
            ));
        }
        for idx in 0..2 {
            team.roster.push(Player::new(
                "Aurora",
                &format!("G{}", idx),
                PlayerPosition::Goalie,
                PlayerSkills {
                    goaltending: 3.5 - idx as f32 * 0.4,
                    ..Default::default()
                },
                28,
                30,
            ));
        }
        team
    }

    #[test]
    fn default_lineup_fills_every_slot() {
        let mut team = full_team();
        team.set_default_lineup();
        for slot in all_line_slots() {
            assert!(team.line_assignments.contains_key(slot), "missing {}", slot);
        }
        assert!(team.starting_goalie_name.is_some());
    }

    #[test]
    fn default_lineup_has_no_duplicates() {
        let mut team = full_team();
        team.set_default_lineup();
        let names: BTreeSet<&String> = team.line_assignments.values().collect();
        assert_eq!(names.len(), team.line_assignments.len());
    }

    #[test]
    fn manual_request_is_honored_when_healthy() {
        let mut team = full_team();
        let mut requested = BTreeMap::new();
        requested.insert("C1".to_string(), "F0".to_string());
        team.set_line_assignments(&requested);
        assert_eq!(team.line_assignments.get("C1"), Some(&"F0".to_string()));
    }

    #[test]
    fn injured_request_falls_back_to_default() {
        let mut team = full_team();
        {
            let player = team.player_by_name_mut("F0").unwrap();
            player.health.injured_games_remaining = 5;
            player.health.injury_status = crate::club::player::InjuryStatus::InjuredReserve;
        }
        let mut requested = BTreeMap::new();
        requested.insert("C1".to_string(), "F0".to_string());
        team.set_line_assignments(&requested);
        assert_ne!(team.line_assignments.get("C1"), Some(&"F0".to_string()));
    }

    #[test]
    fn clean_lineup_has_small_penalty() {
        let mut team = full_team();
        team.set_default_lineup();
        // Only F<->F slot mismatches are possible with a full position set.
        assert!(team.lineup_position_penalty() <= 0.40);
    }

    #[test]
    fn goalie_in_skater_slot_is_penalized() {
        let mut team = full_team();
        team.set_default_lineup();
        let mut requested: BTreeMap<String, String> =
            team.line_assignments.clone().into_iter().collect();
        requested.insert("LW1".to_string(), "G1".to_string());
        team.set_line_assignments(&requested);
        assert!(team.lineup_position_penalty() >= 0.18);
    }
}
