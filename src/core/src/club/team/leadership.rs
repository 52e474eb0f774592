use crate::club::player::Player;
use crate::club::team::team::Team;
use std::collections::BTreeSet;

/// Veteran skaters carry the room; goalies rarely wear a letter.
pub fn leadership_score(player: &Player) -> f32 {
    let skills = &player.skills;
    let skater_score =
        skills.shooting + skills.playmaking + skills.defense + skills.physical + skills.durability;
    let age_bonus = (((player.age as f32) - 21.0) * 0.7).clamp(0.0, 8.0);
    let goalie_penalty = if player.position.is_goalie() { 4.0 } else { 0.0 };
    skater_score + age_bonus - goalie_penalty
}

impl Team {
    /// Re-validate the captaincy group: both letters and the C must belong to
    /// the current healthy core, topping up assistants from the leadership
    /// ranking when spots open.
    pub fn refresh_leadership(&mut self) {
        let mut core: Vec<&Player> = self.roster.iter().filter(|p| !p.is_injured()).collect();
        if core.is_empty() {
            core = self.roster.iter().collect();
        }
        if core.is_empty() {
            self.captain_name = String::new();
            self.assistant_names = Vec::new();
            return;
        }

        let mut ranked: Vec<(f32, u8, String)> = core
            .iter()
            .map(|p| (leadership_score(p), p.age, p.name.clone()))
            .collect();
        ranked.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then(b.1.cmp(&a.1))
                .then(b.2.cmp(&a.2))
        });
        let ranked_names: Vec<String> = ranked.into_iter().map(|(_, _, name)| name).collect();
        let current_names: BTreeSet<&String> = core.iter().map(|p| &p.name).collect();

        if !current_names.contains(&self.captain_name) {
            self.captain_name = ranked_names[0].clone();
        }

        let mut assistants: Vec<String> = self
            .assistant_names
            .iter()
            .filter(|name| current_names.contains(name) && **name != self.captain_name)
            .cloned()
            .collect();
        if assistants.len() < 2 {
            for name in &ranked_names {
                if assistants.len() >= 2 {
                    break;
                }
                if *name != self.captain_name && !assistants.contains(name) {
                    assistants.push(name.clone());
                }
            }
        }
        assistants.truncate(2);
        self.assistant_names = assistants;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{InjuryStatus, PlayerPosition, PlayerSkills};

    fn veteran(name: &str, age: u8, quality: f32) -> Player {
        Player::new(
            "Aurora",
            name,
            PlayerPosition::Center,
            PlayerSkills {
                shooting: quality,
                playmaking: quality,
                defense: quality,
                goaltending: 0.3,
                physical: quality,
                durability: quality,
            },
            age,
            27,
        )
    }

    #[test]
    fn best_veteran_gets_the_c() {
        let mut team = Team::new("Aurora", "North", "Western");
        team.roster.push(veteran("Star Vet", 31, 4.0));
        team.roster.push(veteran("Young Gun", 20, 4.2));
        team.roster.push(veteran("Depth Guy", 27, 2.6));
        team.refresh_leadership();
        assert_eq!(team.captain_name, "Star Vet");
        assert_eq!(team.assistant_names.len(), 2);
        assert!(!team.assistant_names.contains(&team.captain_name));
    }

    #[test]
    fn injured_captain_is_replaced() {
        let mut team = Team::new("Aurora", "North", "Western");
        team.roster.push(veteran("Captain", 30, 3.8));
        team.roster.push(veteran("Backup Leader", 29, 3.5));
        team.roster.push(veteran("Third Man", 25, 3.0));
        team.refresh_leadership();
        assert_eq!(team.captain_name, "Captain");

        {
            let captain = team.player_by_name_mut("Captain").unwrap();
            captain.health.injured_games_remaining = 10;
            captain.health.injury_status = InjuryStatus::InjuredReserve;
        }
        team.refresh_leadership();
        assert_eq!(team.captain_name, "Backup Leader");
    }
}
