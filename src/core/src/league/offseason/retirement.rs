use crate::club::player::Player;
use crate::club::team::RetiredNumber;
use crate::league::history::{HallOfFameEntry, RetiredNumberEvent};
use crate::league::league::LeagueSimulator;
use crate::league::offseason::aging::{DevContext, apply_aging_curve, apply_injury_wear};
use log::info;
use rand::Rng;
use rand::RngExt;

impl LeagueSimulator {
    /// Cup wins credited to a franchise through the given season.
    pub(crate) fn cup_count_for_team_up_to_season(&self, team_name: &str, season_no: u32) -> u32 {
        self.season_history
            .iter()
            .filter(|summary| summary.season <= season_no)
            .filter(|summary| summary.playoffs.champion == team_name)
            .count() as u32
    }

    /// Franchise-great thresholds for hanging a number from the rafters.
    fn should_retire_jersey(&self, player: &Player, team_name: &str) -> bool {
        let team_seasons: Vec<_> = player
            .career_seasons
            .iter()
            .filter(|row| row.team == team_name)
            .collect();
        if team_seasons.len() < 6 {
            return false;
        }
        let gp: u32 = team_seasons.iter().map(|row| row.gp).sum();
        let goals: u32 = team_seasons.iter().map(|row| row.g).sum();
        let assists: u32 = team_seasons.iter().map(|row| row.a).sum();
        let points = goals + assists;
        let goalie_gp: u32 = team_seasons.iter().map(|row| row.goalie_gp).sum();
        let goalie_w: u32 = team_seasons.iter().map(|row| row.goalie_w).sum();
        let goalie_so: u32 = team_seasons.iter().map(|row| row.goalie_so).sum();
        let cups = self.cup_count_for_team_up_to_season(team_name, self.season_number);

        if player.position.is_goalie() {
            if goalie_w >= 350 || goalie_so >= 55 {
                return true;
            }
            if goalie_gp >= 450 && (goalie_w >= 250 || goalie_so >= 35) {
                return true;
            }
            return cups >= 2 && goalie_w >= 220;
        }

        if points >= 950 || goals >= 500 {
            return true;
        }
        if gp >= 700 && (points >= 650 || goals >= 280) {
            return true;
        }
        cups >= 2 && points >= 620
    }

    fn retire_jersey_if_eligible(
        &mut self,
        team_idx: usize,
        player: &Player,
    ) -> Option<RetiredNumberEvent> {
        let number = player.jersey_number?;
        if !(1..=99).contains(&number) {
            return None;
        }
        let team_name = self.teams[team_idx].name.clone();
        if self.teams[team_idx].retired_number_set().contains(&number) {
            return None;
        }
        if !self.should_retire_jersey(player, &team_name) {
            return None;
        }
        let season = self.season_number;
        self.teams[team_idx].retired_numbers.push(RetiredNumber {
            season,
            number,
            player: player.name.clone(),
        });
        info!("{} retires #{} for {}", team_name, number, player.name);
        Some(RetiredNumberEvent {
            season,
            number,
            player: player.name.clone(),
            team: team_name,
        })
    }

    fn add_hall_of_fame_entry(&mut self, player: &Player, team_name: &str) {
        let seasons = player.career_seasons.clone();
        let total_gp: u32 = seasons.iter().map(|s| s.gp).sum();
        let total_g: u32 = seasons.iter().map(|s| s.g).sum();
        let total_a: u32 = seasons.iter().map(|s| s.a).sum();
        let total_p: u32 = seasons.iter().map(|s| s.p).sum();
        let total_inj: u32 = seasons.iter().map(|s| s.injuries).sum();
        let total_missed: u32 = seasons.iter().map(|s| s.games_missed).sum();
        let total_ggp: u32 = seasons.iter().map(|s| s.goalie_gp).sum();
        let total_gw: u32 = seasons.iter().map(|s| s.goalie_w).sum();
        let total_gl: u32 = seasons.iter().map(|s| s.goalie_l).sum();
        let total_gotl: u32 = seasons.iter().map(|s| s.goalie_otl).sum();
        let retired_after = self.season_number;
        let first_season = seasons.iter().map(|s| s.season).min().unwrap_or(retired_after);
        let last_season = seasons.iter().map(|s| s.season).max().unwrap_or(retired_after);

        let (goalie_gaa, goalie_sv) = if total_ggp > 0 {
            let weighted_gaa: f32 = seasons
                .iter()
                .map(|s| s.gaa * s.goalie_gp.max(1) as f32)
                .sum();
            let weighted_sv: f32 = seasons
                .iter()
                .map(|s| s.sv_pct * s.goalie_gp.max(1) as f32)
                .sum();
            (
                ((weighted_gaa / total_ggp as f32) * 100.0).round() / 100.0,
                ((weighted_sv / total_ggp as f32) * 1000.0).round() / 1000.0,
            )
        } else {
            (0.0, 0.0)
        };

        let entry = HallOfFameEntry {
            player_id: player.id.clone(),
            name: player.name.clone(),
            team_at_retirement: team_name.to_string(),
            position: player.position.as_str().to_string(),
            retired_after_season: retired_after,
            age_at_retirement: player.age,
            seasons_played: seasons.len() as u32,
            first_season,
            last_season,
            career_gp: total_gp,
            career_g: total_g,
            career_a: total_a,
            career_p: total_p,
            career_injuries: total_inj,
            career_games_missed: total_missed,
            goalie_gp: total_ggp,
            goalie_w: total_gw,
            goalie_l: total_gl,
            goalie_otl: total_gotl,
            goalie_gaa,
            goalie_sv_pct: goalie_sv,
            seasons,
        };
        self.hall_of_fame
            .retain(|existing| existing.player_id != player.id);
        self.hall_of_fame.push(entry);
    }

    /// Offseason step 3 and 4 in one sweep: age every player, apply wear and
    /// development, then roll retirements with age- and position-ramped
    /// probabilities. Retiring greats may leave their number in the rafters.
    pub(crate) fn age_and_retire_players(&mut self) -> (Vec<String>, Vec<RetiredNumberEvent>) {
        let mut retired: Vec<String> = Vec::new();
        let mut retired_numbers: Vec<RetiredNumberEvent> = Vec::new();

        for team_idx in 0..self.teams.len() {
            let team_name = self.teams[team_idx].name.clone();
            let team_games = self
                .records
                .get(&team_name)
                .map(|r| r.games_played())
                .unwrap_or(0);
            let ctx = DevContext::from_coach(&self.teams[team_idx].coach);

            let names: Vec<String> = self.teams[team_idx]
                .organization_players()
                .map(|p| p.name.clone())
                .collect();
            for player_name in names {
                {
                    let player = self.teams[team_idx]
                        .organization_players_mut()
                        .find(|p| p.name == player_name)
                        .expect("player present");
                    player.age += 1;
                    apply_injury_wear(player, &mut self.rng);
                    apply_aging_curve(player, &ctx, team_games, &mut self.rng);
                }

                let (age, goalie) = {
                    let player = self.teams[team_idx]
                        .organization_players()
                        .find(|p| p.name == player_name)
                        .expect("player present");
                    (player.age, player.position.is_goalie())
                };
                let retire_prob = if goalie {
                    if age >= 37 {
                        (0.08 + (age as f32 - 37.0) * 0.10).min(0.90)
                    } else if age >= 34 {
                        0.03 + (age as f32 - 34.0) * 0.025
                    } else {
                        0.0
                    }
                } else if age >= 35 {
                    (0.10 + (age as f32 - 35.0) * 0.12).min(0.92)
                } else if age >= 32 {
                    0.03 + (age as f32 - 32.0) * 0.03
                } else {
                    0.0
                };

                if self.rng.random::<f32>() >= retire_prob {
                    continue;
                }

                // Pull the player out of whichever roster holds him.
                let team = &mut self.teams[team_idx];
                let player = if let Some(idx) =
                    team.roster.iter().position(|p| p.name == player_name)
                {
                    team.roster.remove(idx)
                } else {
                    let idx = team
                        .minor_roster
                        .iter()
                        .position(|p| p.name == player_name)
                        .expect("player present");
                    team.minor_roster.remove(idx)
                };
                team.dressed_player_names.remove(&player.name);
                if team.starting_goalie_name.as_deref() == Some(player.name.as_str()) {
                    team.starting_goalie_name = None;
                }

                retired.push(format!("{} ({})", player.name, team_name));
                self.add_hall_of_fame_entry(&player, &team_name);
                if let Some(event) = self.retire_jersey_if_eligible(team_idx, &player) {
                    retired_numbers.push(event);
                }
            }
        }

        (retired, retired_numbers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{CareerSeason, PlayerPosition, PlayerSkills};
    use crate::club::team::Team;
    use crate::league::league::SimulatorSettings;

    fn legend_seasons(team: &str, count: u32, points_per: u32) -> Vec<CareerSeason> {
        (1..=count)
            .map(|season| {
                let mut player = Player::new(
                    team,
                    "Franchise Legend",
                    PlayerPosition::Center,
                    PlayerSkills::default(),
                    30,
                    27,
                );
                player.season.games_played = 80;
                player.season.goals = points_per / 2;
                player.season.assists = points_per - points_per / 2;
                CareerSeason::from_player(&player, season, team, 10.0)
            })
            .collect()
    }

    #[test]
    fn franchise_legend_gets_number_retired() {
        let mut team = Team::new("Aurora", "North", "Western");
        let mut legend = Player::new(
            "Aurora",
            "Franchise Legend",
            PlayerPosition::Center,
            PlayerSkills::default(),
            36,
            27,
        );
        legend.jersey_number = Some(9);
        legend.career_seasons = legend_seasons("Aurora", 10, 100);
        team.roster.push(legend);
        let mut sim =
            LeagueSimulator::new(vec![team, Team::new("Glaciers", "North", "Western")],
            SimulatorSettings::default(), 4);

        let player = sim.teams[0].player_by_name("Franchise Legend").unwrap().clone();
        assert!(sim.should_retire_jersey(&player, "Aurora"));
        let event = sim.retire_jersey_if_eligible(0, &player);
        assert!(event.is_some());
        assert!(sim.teams[0].retired_number_set().contains(&9));
        // A second attempt for the same number is a no-op.
        assert!(sim.retire_jersey_if_eligible(0, &player).is_none());
    }

    #[test]
    fn short_tenure_never_qualifies() {
        let mut team = Team::new("Aurora", "North", "Western");
        let mut passerby = Player::new(
            "Aurora",
            "Rental Player",
            PlayerPosition::Center,
            PlayerSkills::default(),
            33,
            27,
        );
        passerby.career_seasons = legend_seasons("Aurora", 3, 120);
        team.roster.push(passerby);
        let sim = LeagueSimulator::new(
            vec![team, Team::new("Glaciers", "North", "Western")],
            SimulatorSettings::default(),
            4,
        );
        let player = sim.teams[0].player_by_name("Rental Player").unwrap();
        assert!(!sim.should_retire_jersey(player, "Aurora"));
    }

    #[test]
    fn hall_of_fame_replaces_duplicate_entries() {
        let mut team = Team::new("Aurora", "North", "Western");
        let mut veteran = Player::new(
            "Aurora",
            "Two Time",
            PlayerPosition::Center,
            PlayerSkills::default(),
            35,
            27,
        );
        veteran.career_seasons = legend_seasons("Aurora", 8, 60);
        team.roster.push(veteran);
        let mut sim = LeagueSimulator::new(
            vec![team, Team::new("Glaciers", "North", "Western")],
            SimulatorSettings::default(),
            4,
        );
        let player = sim.teams[0].player_by_name("Two Time").unwrap().clone();
        sim.add_hall_of_fame_entry(&player, "Aurora");
        sim.add_hall_of_fame_entry(&player, "Aurora");
        assert_eq!(sim.hall_of_fame.len(), 1);
        assert_eq!(sim.hall_of_fame[0].career_gp, 640);
    }
}
