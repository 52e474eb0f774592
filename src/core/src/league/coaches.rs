use crate::club::coach::{CoachStyle, HONEYMOON_GAMES};
use crate::league::history::CoachRetirement;
use crate::league::league::LeagueSimulator;
use crate::shared::error::{SimError, SimResult};
use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachChange {
    pub team: String,
    pub old_name: String,
    pub old_rating: f32,
    pub new_name: String,
    pub new_rating: f32,
    pub new_style: CoachStyle,
    pub new_offense: f32,
    pub new_defense: f32,
    pub new_goalie_dev: f32,
    pub instability: f32,
    pub point_pct: f32,
}

impl LeagueSimulator {
    pub(crate) fn generate_coach_rating(&mut self, lower: f32, upper: f32) -> f32 {
        (self.rng.random_range(lower..upper) * 100.0).round() / 100.0
    }

    pub(crate) fn rating_to_style(&mut self, rating: f32) -> CoachStyle {
        if rating >= 4.0 {
            return CoachStyle::Aggressive;
        }
        if rating <= 2.6 {
            return CoachStyle::Defensive;
        }
        match self.rng.random_range(0..3) {
            0 => CoachStyle::Balanced,
            1 => CoachStyle::Aggressive,
            _ => CoachStyle::Defensive,
        }
    }

    /// Give every bench a real coach. Placeholder staffs get a full profile;
    /// flat legacy profiles get their missing axes regenerated.
    pub(crate) fn ensure_team_coaches(&mut self) {
        let ages_before: Vec<u8> = self.teams.iter().map(|t| t.coach.age).collect();

        for idx in 0..self.teams.len() {
            let was_placeholder = self.teams[idx].coach.is_placeholder();
            if was_placeholder {
                let name = self.names.next_coach_name();
                let rating = self.generate_coach_rating(2.2, 4.8);
                let style = self.rating_to_style(rating);
                let coach = &mut self.teams[idx].coach;
                coach.name = name;
                coach.rating = rating;
                coach.style = style;
                coach.age = 0;
                // Fall through for age + specialties below.
            }

            let needs_specialties = {
                let coach = &self.teams[idx].coach;
                coach.offense <= 0.0 || coach.defense <= 0.0 || coach.goalie_dev <= 0.0
            };
            if needs_specialties || was_placeholder {
                let offense = self.generate_coach_rating(2.1, 4.9);
                let defense = self.generate_coach_rating(2.1, 4.9);
                let goalie_dev = self.generate_coach_rating(2.1, 4.9);
                let coach = &mut self.teams[idx].coach;
                coach.offense = offense;
                coach.defense = defense;
                coach.goalie_dev = goalie_dev;
            }

            // Older saves collapsed every coach to the 3.00/balanced baseline.
            let flat_legacy = {
                let coach = &self.teams[idx].coach;
                !was_placeholder
                    && (coach.rating - 3.0).abs() < 1e-9
                    && coach.style == CoachStyle::Balanced
            };
            if flat_legacy {
                let rating = self.generate_coach_rating(2.2, 4.8);
                let style = self.rating_to_style(rating);
                let coach = &mut self.teams[idx].coach;
                coach.rating = rating;
                coach.style = style;
            }
            if self.teams[idx].coach.rating <= 0.0 {
                self.teams[idx].coach.rating = self.generate_coach_rating(2.2, 4.8);
            }
            if self.teams[idx].coach.age == 0 {
                self.teams[idx].coach.age = self.rng.random_range(43..=59);
            }
            if self.teams[idx].coach.offense <= 0.0 {
                self.teams[idx].coach.offense = self.generate_coach_rating(2.1, 4.9);
            }
        }

        // Legacy repair: saves with no coach ages loaded everyone at 52/53.
        let unique_ages: std::collections::BTreeSet<u8> =
            ages_before.iter().copied().filter(|a| *a > 0).collect();
        if self.teams.len() >= 6
            && unique_ages.len() == 1
            && unique_ages.iter().all(|a| *a == 52 || *a == 53)
        {
            for idx in 0..self.teams.len() {
                self.teams[idx].coach.age = self.rng.random_range(43..=63);
            }
        }
    }

    /// Probability the coach hangs it up this summer. Near zero below 58 and
    /// almost certain past 70.
    pub(crate) fn coach_retirement_probability(&self, team_idx: usize) -> f32 {
        let coach = &self.teams[team_idx].coach;
        let age = coach.age.max(1) as f32;
        let mut base = if age < 58.0 {
            0.0
        } else if age < 62.0 {
            0.01 + (age - 58.0) * 0.01
        } else if age < 66.0 {
            0.06 + (age - 62.0) * 0.02
        } else if age < 70.0 {
            0.14 + (age - 66.0) * 0.06
        } else {
            0.42 + (age - 70.0) * 0.12
        };
        base += (coach.tenure_seasons as f32 - 6.0).max(0.0) * 0.01;
        base += coach.changes_recent.max(0.0) * 0.005;
        base -= (coach.rating - 3.6).max(0.0) * 0.02;
        base.clamp(0.0, 0.95)
    }

    pub(crate) fn replace_retired_coach(&mut self, team_idx: usize) -> CoachRetirement {
        let (old_name, old_age, old_rating) = {
            let coach = &self.teams[team_idx].coach;
            (coach.name.clone(), coach.age, coach.rating)
        };
        let name = self.names.next_coach_name();
        let age = self.rng.random_range(42..=57);
        let rating = self.generate_coach_rating(2.4, 4.85);
        let style = self.rating_to_style(rating);
        let offense = self.generate_coach_rating(2.0, 4.9);
        let defense = self.generate_coach_rating(2.0, 4.9);
        let goalie_dev = self.generate_coach_rating(2.0, 4.9);

        let team = &mut self.teams[team_idx];
        let coach = &mut team.coach;
        coach.name = name;
        coach.age = age;
        coach.rating = rating;
        coach.style = style;
        coach.offense = offense;
        coach.defense = defense;
        coach.goalie_dev = goalie_dev;
        coach.tenure_seasons = 0;
        coach.changes_recent = (coach.changes_recent.max(0.0) + 0.8).min(5.0);
        coach.honeymoon_games_remaining = HONEYMOON_GAMES;
        let new_name = coach.name.clone();
        let new_rating = coach.rating;
        let new_style = coach.style;
        team.set_default_lineup();

        CoachRetirement {
            team: team.name.clone(),
            old_name,
            old_age,
            old_rating: (old_rating * 100.0).round() / 100.0,
            new_name,
            new_age: age,
            new_rating,
            new_style: new_style.to_string(),
        }
    }

    /// Midseason firing: replacement quality depends on how attractive the
    /// job looks, and serial churn shrinks the candidate pool.
    pub fn fire_coach(&mut self, team_name: &str) -> SimResult<CoachChange> {
        let Some(team_idx) = self.teams.iter().position(|t| t.name == team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };

        let point_pct = self.team_point_pct(team_name);
        let games_played = self
            .records
            .get(team_name)
            .map(|r| r.games_played())
            .unwrap_or(0);
        let point_pct = if games_played > 0 { point_pct } else { 0.5 };

        let (old_name, old_rating, churn) = {
            let coach = &self.teams[team_idx].coach;
            (coach.name.clone(), coach.rating, coach.changes_recent)
        };
        let upside = if point_pct < 0.50 { 0.18 } else { 0.0 };
        let churn_penalty = (churn.max(0.0) * 0.05).min(0.22);
        let new_rating = self.generate_coach_rating(
            2.3 + upside - churn_penalty,
            4.85 - churn_penalty * 0.8,
        );
        let name = self.names.next_coach_name();
        let age = self.rng.random_range(42..=58);
        let style = self.rating_to_style(new_rating);
        let offense = self.generate_coach_rating(2.0, 4.9);
        let defense = self.generate_coach_rating(2.0, 4.9);
        let goalie_dev = self.generate_coach_rating(2.0, 4.9);

        let team = &mut self.teams[team_idx];
        let coach = &mut team.coach;
        coach.name = name;
        coach.age = age;
        coach.rating = new_rating;
        coach.style = style;
        coach.offense = offense;
        coach.defense = defense;
        coach.goalie_dev = goalie_dev;
        coach.tenure_seasons = 0;
        coach.changes_recent = (coach.changes_recent.max(0.0) + 1.0).min(5.0);
        coach.honeymoon_games_remaining = HONEYMOON_GAMES;
        let change = CoachChange {
            team: team.name.clone(),
            old_name,
            old_rating: (old_rating * 100.0).round() / 100.0,
            new_name: coach.name.clone(),
            new_rating: coach.rating,
            new_style: coach.style,
            new_offense: coach.offense,
            new_defense: coach.defense,
            new_goalie_dev: coach.goalie_dev,
            instability: coach.changes_recent,
            point_pct,
        };
        team.set_default_lineup();
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::team::Team;
    use crate::league::league::SimulatorSettings;

    fn sim_with_team() -> LeagueSimulator {
        let mut team = Team::new("Aurora", "North", "Western");
        for idx in 0..22 {
            let position = match idx % 5 {
                0 => crate::club::player::PlayerPosition::Center,
                1 => crate::club::player::PlayerPosition::LeftWing,
                2 => crate::club::player::PlayerPosition::RightWing,
                3 => crate::club::player::PlayerPosition::Defense,
                _ => crate::club::player::PlayerPosition::Goalie,
            };
            team.roster.push(crate::club::player::Player::new(
                "Aurora",
                &format!("Player {}", idx),
                position,
                crate::club::player::PlayerSkills::default(),
                25,
                27,
            ));
        }
        let other = Team::new("Glaciers", "North", "Western");
        LeagueSimulator::new(vec![team, other], SimulatorSettings::default(), 9)
    }

    #[test]
    fn placeholder_coaches_get_real_profiles() {
        let sim = sim_with_team();
        for team in &sim.teams {
            assert_ne!(team.coach.name, "Staff Coach");
            assert!(team.coach.rating >= 2.2);
            assert!(team.coach.age >= 43);
        }
    }

    #[test]
    fn firing_resets_tenure_and_starts_honeymoon() {
        let mut sim = sim_with_team();
        let before = sim.teams[0].coach.name.clone();
        let change = sim.fire_coach("Aurora").unwrap();
        assert_eq!(change.old_name, before);
        let coach = &sim.teams[0].coach;
        assert_ne!(coach.name, before);
        assert_eq!(coach.tenure_seasons, 0);
        assert_eq!(coach.honeymoon_games_remaining, HONEYMOON_GAMES);
        assert!(coach.changes_recent >= 1.0);
    }

    #[test]
    fn old_coaches_retire_far_more_often() {
        let mut sim = sim_with_team();
        sim.teams[0].coach.age = 50;
        let young = sim.coach_retirement_probability(0);
        sim.teams[0].coach.age = 72;
        let old = sim.coach_retirement_probability(0);
        assert_eq!(young, 0.0);
        assert!(old > 0.5);
    }
}
