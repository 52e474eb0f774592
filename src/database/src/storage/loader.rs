use crate::generators::generator::WorldGenerator;
use crate::storage::career::load_career;
use crate::storage::hall_of_fame::load_hall_of_fame;
use crate::storage::history::load_history;
use crate::storage::runtime::load_runtime;
use crate::storage::state::load_state;
use crate::storage::store::{FileStore, StorePaths};
use core::league::league::{LeagueSimulator, SimulatorSettings};
use core::service::service::SimService;
use log::info;
use std::path::Path;

pub struct DatabaseLoader;

impl DatabaseLoader {
    /// Bring a saved world up, or seed a fresh one when nothing (usable) is
    /// on disk. Load failures fall back to defaults per file and surface as
    /// a single human-readable `last_load_error`.
    pub fn load(root: &Path, seed: u64, settings: SimulatorSettings) -> SimService {
        let paths = StorePaths::new(root);
        let mut last_load_error = String::new();

        let (state, error) = load_state(&paths.league_state());
        if let Some(error) = error {
            last_load_error = error;
        }
        let had_state = state.is_some();
        let mut sim = match state {
            Some(state) => {
                info!("restoring saved world from {}", root.display());
                LeagueSimulator::from_state(state, settings, seed)
            }
            None => {
                info!("seeding fresh world in {}", root.display());
                LeagueSimulator::new(WorldGenerator::generate(seed), settings, seed)
            }
        };

        let (history, error) = load_history(&paths.season_history());
        if let Some(error) = error {
            last_load_error = error;
        }
        if !had_state {
            if let Some(last) = history.last() {
                sim.season_number = last.season + 1;
            }
        }
        sim.season_history = history;

        let (career, error) = load_career(&paths.career_history());
        if let Some(error) = error {
            last_load_error = error;
        }
        sim.career_history = career;
        // Cross-file reconciliation: the career file is the source of truth
        // for each player's log, reattached by stable player id.
        for team in sim.teams.iter_mut() {
            for player in team.organization_players_mut() {
                player.career_seasons = sim
                    .career_history
                    .get(&player.id)
                    .cloned()
                    .unwrap_or_default();
            }
        }

        let (hall_of_fame, error) = load_hall_of_fame(&paths.hall_of_fame());
        if let Some(error) = error {
            last_load_error = error;
        }
        sim.hall_of_fame = hall_of_fame;

        let (runtime, error) = load_runtime(&paths.runtime_state());
        if let Some(error) = error {
            last_load_error = error;
        }

        SimService::new(
            sim,
            runtime,
            Box::new(FileStore::new(paths)),
            Box::new(WorldGenerator::generate),
            seed,
            last_load_error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::club::player::{PlayerPosition, PlayerSkills};
    use core::service::service::AdvanceOutcome;
    use core::shared::error::SimError;
    use core::trades::TradePreference;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("open-hockey-tests")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn advance_through_regular_season(service: &mut SimService) {
        // Let the service clear roster-compliance blocks on its own instead
        // of pausing for user call-up decisions.
        service.runtime.auto_injury_moves = true;
        let mut guard = 0;
        while !service.sim.is_complete() {
            service.advance().unwrap();
            guard += 1;
            assert!(guard < 400, "season never completed");
        }
    }

    #[test]
    fn full_regular_season_46_games_each() {
        let dir = scratch_dir("season-24-teams");
        let mut service = DatabaseLoader::load(&dir, 11, SimulatorSettings::default());
        assert_eq!(service.sim.teams.len(), 24);

        advance_through_regular_season(&mut service);

        let mut total_points = 0u32;
        let mut total_games = 0u32;
        let mut total_otl = 0u32;
        for rec in service.sim.records.values() {
            assert_eq!(rec.games_played(), 46, "{} played {}", rec.team_name, rec.games_played());
            total_points += rec.points();
            total_games += rec.games_played();
            total_otl += rec.ot_losses;
        }
        let league_games = total_games / 2;
        assert_eq!(league_games, 24 * 46 / 2);
        // Every game awards two points plus one more per overtime loss.
        assert_eq!(total_points, 2 * league_games + total_otl);
    }

    #[test]
    fn playoffs_reveal_then_offseason_rolls_the_world() {
        let dir = scratch_dir("playoffs-offseason");
        let mut service = DatabaseLoader::load(&dir, 17, SimulatorSettings::default());
        advance_through_regular_season(&mut service);

        let final_standings: Vec<String> = service
            .sim
            .get_standings()
            .iter()
            .map(|rec| rec.team_name.clone())
            .collect();
        let best_team = final_standings.first().unwrap().clone();
        let worst_team = final_standings.last().unwrap().clone();

        let offseason = loop {
            match service.advance().unwrap() {
                AdvanceOutcome::Playoffs { games, .. } => {
                    assert!(!games.is_empty());
                }
                AdvanceOutcome::Offseason {
                    completed_season,
                    next_season,
                    champion,
                } => {
                    break (completed_season, next_season, champion);
                }
                AdvanceOutcome::Regular { .. } => panic!("regular day after season end"),
            }
        };

        let (completed_season, next_season, champion) = offseason;
        assert_eq!(completed_season, 1);
        assert_eq!(next_season, 2);
        assert_eq!(service.sim.season_number, 2);
        assert!(!champion.is_empty());

        let summary = service.sim.season_history.last().unwrap();
        assert_eq!(summary.playoffs.cup_name, "Founders Cup");
        assert_eq!(summary.playoffs.champion, champion);
        assert!(
            summary
                .playoffs
                .rounds
                .iter()
                .any(|round| round.name == "Cup Final")
        );

        // Round 1 covers all 24 teams in reverse standings order.
        let details = &service.sim.last_offseason.drafted_details;
        assert_eq!(details.len(), 24);
        assert_eq!(details.get(&worst_team).unwrap()[0].overall, Some(1));
        assert_eq!(details.get(&best_team).unwrap()[0].overall, Some(24));

        // The new season starts clean.
        assert_eq!(service.sim.day_index, 0);
        assert!(service.sim.pending_playoffs.is_none());
        assert!(service.sim.records.values().all(|rec| rec.games_played() == 0));
    }

    #[test]
    fn same_seed_same_outcomes() {
        let dir_a = scratch_dir("determinism-a");
        let dir_b = scratch_dir("determinism-b");
        let mut first = DatabaseLoader::load(&dir_a, 23, SimulatorSettings::default());
        let mut second = DatabaseLoader::load(&dir_b, 23, SimulatorSettings::default());
        first.runtime.auto_injury_moves = true;
        second.runtime.auto_injury_moves = true;

        for _ in 0..12 {
            let a = first.advance().unwrap();
            let b = second.advance().unwrap();
            match (a, b) {
                (
                    AdvanceOutcome::Regular { games: games_a, .. },
                    AdvanceOutcome::Regular { games: games_b, .. },
                ) => {
                    assert_eq!(games_a.len(), games_b.len());
                    for (ga, gb) in games_a.iter().zip(&games_b) {
                        assert_eq!(ga.home, gb.home);
                        assert_eq!(ga.home_goals, gb.home_goals);
                        assert_eq!(ga.away_goals, gb.away_goals);
                        assert_eq!(ga.overtime, gb.overtime);
                    }
                }
                _ => panic!("expected regular days"),
            }
        }
    }

    #[test]
    fn player_ids_survive_save_and_reload() {
        let dir = scratch_dir("reload-ids");
        let ids_before: Vec<String> = {
            let mut service = DatabaseLoader::load(&dir, 31, SimulatorSettings::default());
            for _ in 0..3 {
                service.advance().unwrap();
            }
            service
                .sim
                .teams
                .iter()
                .flat_map(|t| t.organization_players())
                .map(|p| p.id.clone())
                .collect()
        };

        let service = DatabaseLoader::load(&dir, 31, SimulatorSettings::default());
        let ids_after: Vec<String> = service
            .sim
            .teams
            .iter()
            .flat_map(|t| t.organization_players())
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids_before, ids_after);
        assert!(service.last_load_error.is_empty());
        // Reloaded standings resume from the saved day.
        assert_eq!(service.sim.day_index, 3);
    }

    #[test]
    fn untouchable_partner_player_blocks_the_trade() {
        let dir = scratch_dir("trade-untouchable");
        let mut service = DatabaseLoader::load(&dir, 41, SimulatorSettings::default());
        let user_team = service.runtime.user_team_name.clone();
        let partner = service
            .sim
            .teams
            .iter()
            .find(|t| t.name != user_team)
            .unwrap()
            .name
            .clone();

        let give = service.sim.get_team(&user_team).unwrap().roster[0].name.clone();
        let receive = service.sim.get_team(&partner).unwrap().roster[0].name.clone();
        service
            .runtime
            .trade_preferences_by_team
            .entry(partner.clone())
            .or_default()
            .insert(receive.clone(), TradePreference::Untouchable);

        let rosters_before: Vec<usize> =
            service.sim.teams.iter().map(|t| t.roster.len()).collect();
        let error = service
            .propose_trade(&user_team, &partner, &give, &receive)
            .unwrap_err();
        assert_eq!(error.code(), "partner_player_untouchable");
        let rosters_after: Vec<usize> =
            service.sim.teams.iter().map(|t| t.roster.len()).collect();
        assert_eq!(rosters_before, rosters_after);
        assert!(service.sim.get_team(&user_team).unwrap().player_by_name(&give).is_some());
        assert!(service.sim.get_team(&partner).unwrap().player_by_name(&receive).is_some());
    }

    #[test]
    fn tuned_one_for_one_trade_commits() {
        let dir = scratch_dir("trade-commits");
        let mut service = DatabaseLoader::load(&dir, 43, SimulatorSettings::default());
        let user_team = service.runtime.user_team_name.clone();
        let partner = service
            .sim
            .teams
            .iter()
            .find(|t| t.name != user_team)
            .unwrap()
            .name
            .clone();

        // Plant a near-even veteran-for-younger swap on both rosters.
        let mut give = core::club::player::Player::new(
            &user_team,
            "Veteran Pivot",
            PlayerPosition::Center,
            PlayerSkills {
                shooting: 3.2,
                playmaking: 3.2,
                defense: 2.8,
                goaltending: 0.3,
                physical: 3.0,
                durability: 3.0,
            },
            30,
            27,
        );
        give.id = String::from("trade-test-give");
        give.contract.cap_hit = 2.46;
        give.contract.years_left = 2;
        let mut receive = core::club::player::Player::new(
            &partner,
            "Rising Pivot",
            PlayerPosition::Center,
            PlayerSkills {
                shooting: 3.4,
                playmaking: 3.4,
                defense: 3.0,
                goaltending: 0.3,
                physical: 3.2,
                durability: 3.0,
            },
            24,
            27,
        );
        receive.id = String::from("trade-test-receive");
        receive.contract.cap_hit = 2.54;
        receive.contract.years_left = 2;
        receive.contract.contract_type = core::club::player::ContractType::Core;

        // Make room so the swap itself is the only roster change.
        service.sim.get_team_mut(&user_team).unwrap().roster.pop();
        service.sim.get_team_mut(&partner).unwrap().roster.pop();
        service.sim.get_team_mut(&user_team).unwrap().roster.push(give);
        service.sim.get_team_mut(&partner).unwrap().roster.push(receive);

        let outcome = service
            .propose_trade(&user_team, &partner, "Veteran Pivot", "Rising Pivot")
            .unwrap();
        assert!(outcome.user_eval.net_value >= outcome.user_eval.min_net);
        assert!(outcome.partner_eval.net_value >= outcome.partner_eval.min_net);
        assert!(
            service
                .sim
                .get_team(&user_team)
                .unwrap()
                .player_by_name("Rising Pivot")
                .is_some()
        );
        assert!(
            service
                .sim
                .get_team(&partner)
                .unwrap()
                .player_by_name("Veteran Pivot")
                .is_some()
        );
    }

    #[test]
    fn corrupted_gp_refuses_to_advance_and_touches_nothing() {
        let dir = scratch_dir("integrity-refusal");
        let mut service = DatabaseLoader::load(&dir, 47, SimulatorSettings::default());
        service.advance().unwrap();

        let state_path = StorePaths::new(&dir).league_state();
        let bytes_before = fs::read(&state_path).unwrap();

        // Push one team's record ahead of the calendar.
        let victim = service.sim.teams[0].name.clone();
        service.sim.records.get_mut(&victim).unwrap().wins += 5;

        let error = service.advance().unwrap_err();
        match &error {
            SimError::InvariantViolation(message) => {
                assert!(message.contains(&victim), "message: {}", message);
            }
            other => panic!("expected invariant violation, got {:?}", other),
        }
        let bytes_after = fs::read(&state_path).unwrap();
        assert_eq!(bytes_before, bytes_after, "refused advance must not persist");
    }
}
