use crate::club::coach;
use crate::game::{GameSettings, SideConditions, simulate_game, three_stars};
use crate::league::league::{LeagueSimulator, pair_mut};
use crate::league::playoffs::mvp::{
    PlayoffTracker, accumulate_playoff_game, playoff_mvp_race, select_playoff_mvp,
};
use crate::league::playoffs::types::{
    CUP_NAME, PlayoffBracket, PlayoffRound, PlayoffSeed, PlayoffSeries, SERIES_BEST_OF,
    SeriesGame,
};
use itertools::Itertools;
use log::info;
use rand::Rng;
use rand::RngExt;
use std::collections::BTreeMap;

/// (points, goal diff, goals for): the ordering key used for seeding and
/// re-seeding throughout the bracket.
type SeedKey = (u32, i32, u32);

impl LeagueSimulator {
    fn seed_keys(&self) -> BTreeMap<String, SeedKey> {
        self.records
            .iter()
            .map(|(name, rec)| {
                (
                    name.clone(),
                    (rec.points(), rec.goal_diff(), rec.goals_for),
                )
            })
            .collect()
    }

    fn series_home_is_higher(game_number: u32) -> bool {
        // 2-2-1-1-1: games 1, 2, 5 and 7 belong to the higher seed.
        matches!(game_number, 1 | 2 | 5 | 7)
    }

    /// Play one best-of-seven to completion, pre-simulated ahead of the
    /// day-by-day reveal. Injury timers tick per game so recoveries stay
    /// aligned with the reveal calendar.
    fn simulate_playoff_series(
        &mut self,
        round_name: &str,
        higher_seed: &str,
        lower_seed: &str,
        tracker: &mut PlayoffTracker,
    ) -> PlayoffSeries {
        let wins_needed = SERIES_BEST_OF / 2 + 1;
        let mut high_wins = 0u32;
        let mut low_wins = 0u32;
        let mut games: Vec<SeriesGame> = Vec::new();
        let mut game_number = 1u32;

        while high_wins < wins_needed && low_wins < wins_needed {
            self.advance_recovery_day();

            let home_is_higher = Self::series_home_is_higher(game_number);
            let (home_name, away_name) = if home_is_higher {
                (higher_seed.to_string(), lower_seed.to_string())
            } else {
                (lower_seed.to_string(), higher_seed.to_string())
            };
            let elimination_game =
                high_wins == wins_needed - 1 || low_wins == wins_needed - 1;

            let home_pct = self.team_point_pct(&home_name);
            let away_pct = self.team_point_pct(&away_name);

            self.ensure_team_depth(&home_name);
            self.ensure_team_depth(&away_name);

            let home_starts = Self::goalie_recent_starts(&games, &home_name);
            let away_starts = Self::goalie_recent_starts(&games, &away_name);

            let (home_strategy, away_strategy, home_modifiers, away_modifiers) = {
                let rng = &mut self.rng;
                let (home, away) = pair_mut(&mut self.teams, &home_name, &away_name)
                    .expect("playoff teams exist");

                coach::set_dtd_decisions(
                    home,
                    home_pct + 0.015 < away_pct,
                    true,
                    elimination_game,
                    rng,
                );
                coach::set_dtd_decisions(
                    away,
                    away_pct + 0.015 < home_pct,
                    true,
                    elimination_game,
                    rng,
                );
                home.set_default_lineup();
                away.set_default_lineup();

                let home_goalie =
                    coach::choose_playoff_goalie(home, &home_starts, elimination_game);
                let away_goalie =
                    coach::choose_playoff_goalie(away, &away_starts, elimination_game);
                home.set_starting_goalie(home_goalie.as_deref());
                away.set_starting_goalie(away_goalie.as_deref());

                let home_strategy = home.coach.style;
                let away_strategy = away.coach.style;
                let home_modifiers = coach::game_modifiers(home, home_strategy, away);
                let away_modifiers = coach::game_modifiers(away, away_strategy, home);
                (home_strategy, away_strategy, home_modifiers, away_modifiers)
            };

            // Playoff officiating tends to slightly favor the home side on
            // marginal calls; elimination stakes tighten play further.
            let mut home_context = 0.024;
            let mut away_context = -0.012;
            let mut randomness_scale: f32 = 1.0;
            if elimination_game {
                randomness_scale = 1.32;
                if home_is_higher {
                    home_context += 0.010;
                } else {
                    away_context += 0.010;
                }
            }
            if game_number == 7 {
                randomness_scale = randomness_scale.max(1.40);
            }

            let settings = GameSettings {
                home: SideConditions {
                    strategy: home_strategy,
                    coach_offense_bonus: home_modifiers.offense_bonus,
                    coach_defense_bonus: home_modifiers.defense_bonus,
                    context_bonus: home_context,
                    injury_mult: home_modifiers.injury_mult,
                },
                away: SideConditions {
                    strategy: away_strategy,
                    coach_offense_bonus: away_modifiers.offense_bonus,
                    coach_defense_bonus: away_modifiers.defense_bonus,
                    context_bonus: away_context,
                    injury_mult: away_modifiers.injury_mult,
                },
                randomness_scale,
                record_player_stats: false,
                apply_injuries: true,
                record_goalie_stats: false,
            };

            let result = {
                let rng = &mut self.rng;
                let (home, away) = pair_mut(&mut self.teams, &home_name, &away_name)
                    .expect("playoff teams exist");
                let result = simulate_game(home, away, &settings, rng);
                home.consume_coach_game_effect();
                away.consume_coach_game_effect();
                result
            };
            accumulate_playoff_game(&result, tracker);

            let higher_goals = if home_is_higher {
                result.home_goals
            } else {
                result.away_goals
            };
            let lower_goals = if home_is_higher {
                result.away_goals
            } else {
                result.home_goals
            };
            let higher_won = higher_goals > lower_goals;
            if higher_won {
                high_wins += 1;
            } else {
                low_wins += 1;
            }

            let arena_capacity = self
                .get_team(&home_name)
                .map(|t| t.arena_capacity.max(9500))
                .unwrap_or(16000);
            let (same_division, same_conference) = self
                .get_team(&home_name)
                .zip(self.get_team(&away_name))
                .map(|(h, a)| (h.division == a.division, h.conference == a.conference))
                .unwrap_or((false, false));
            let base_attendance = (arena_capacity as f32 * 0.90) as i64;
            let quality_bump =
                ((home_pct - 0.5) * 5400.0 + (away_pct - 0.5) * 2600.0) as i64;
            let rivalry_bump = if same_division {
                950
            } else if same_conference {
                450
            } else {
                200
            };
            let elimination_bump = if elimination_game { 650 } else { 0 };
            let attendance_noise = self.rng.random_range(-420..=620);
            let attendance = (base_attendance
                + quality_bump
                + rivalry_bump
                + elimination_bump
                + attendance_noise)
                .clamp(8600, arena_capacity as i64) as u32;

            let stars = three_stars(&result);
            games.push(SeriesGame {
                game: game_number,
                home: home_name.clone(),
                away: away_name.clone(),
                home_goals: result.home_goals,
                away_goals: result.away_goals,
                overtime: result.overtime,
                home_goalie: result
                    .home_goalie
                    .as_ref()
                    .map(|g| g.name.clone())
                    .unwrap_or_default(),
                away_goalie: result
                    .away_goalie
                    .as_ref()
                    .map(|g| g.name.clone())
                    .unwrap_or_default(),
                home_goalie_shots: result.home_goalie_shots,
                home_goalie_saves: result.home_goalie_saves,
                away_goalie_shots: result.away_goalie_shots,
                away_goalie_saves: result.away_goalie_saves,
                attendance,
                arena_capacity,
                winner: if higher_won {
                    higher_seed.to_string()
                } else {
                    lower_seed.to_string()
                },
                three_stars: stars,
            });

            game_number += 1;
        }

        let (winner, loser) = if high_wins > low_wins {
            (higher_seed.to_string(), lower_seed.to_string())
        } else {
            (lower_seed.to_string(), higher_seed.to_string())
        };
        info!(
            "{}: {} over {} ({}-{})",
            round_name,
            winner,
            loser,
            high_wins.max(low_wins),
            high_wins.min(low_wins)
        );
        PlayoffSeries {
            round: round_name.to_string(),
            higher_seed: higher_seed.to_string(),
            lower_seed: lower_seed.to_string(),
            winner,
            loser,
            winner_wins: high_wins.max(low_wins),
            loser_wins: high_wins.min(low_wins),
            games,
        }
    }

    /// Construct and fully pre-simulate the postseason. Conferences with
    /// exactly two divisions use the top-3-plus-wildcards format; anything
    /// else falls back to straight 1-8 seeding with re-seeding.
    pub(crate) fn run_playoffs(&mut self) -> PlayoffBracket {
        let seed_keys = self.seed_keys();
        let key_of = |name: &str| seed_keys.get(name).copied().unwrap_or((0, 0, 0));

        let mut rounds: Vec<PlayoffRound> = Vec::new();
        let mut playoff_seeds: Vec<PlayoffSeed> = Vec::new();
        let mut tracker = PlayoffTracker::new();
        let mut conference_finalists: Vec<(String, String)> = Vec::new();

        for conference in self.get_conferences() {
            let conf_records: Vec<(String, String, u32)> = self
                .get_conference_standings(&conference)
                .iter()
                .map(|rec| {
                    let division = self
                        .get_team(&rec.team_name)
                        .map(|t| t.division.clone())
                        .unwrap_or_default();
                    (rec.team_name.clone(), division, rec.points())
                })
                .collect();
            if conf_records.len() < 2 {
                continue;
            }
            let divisions: Vec<String> = conf_records
                .iter()
                .map(|(_, d, _)| d.clone())
                .sorted()
                .dedup()
                .collect();

            if divisions.len() == 2 {
                let div_a = divisions[0].clone();
                let div_b = divisions[1].clone();
                let tops = |division: &str| -> Vec<(String, u32)> {
                    conf_records
                        .iter()
                        .filter(|(_, d, _)| d == division)
                        .take(3)
                        .map(|(name, _, points)| (name.clone(), *points))
                        .collect()
                };
                let a_top = tops(&div_a);
                let b_top = tops(&div_b);
                let qualified: Vec<String> = a_top
                    .iter()
                    .chain(b_top.iter())
                    .map(|(name, _)| name.clone())
                    .collect();
                let wildcards: Vec<(String, u32)> = conf_records
                    .iter()
                    .filter(|(name, _, _)| !qualified.contains(name))
                    .take(2)
                    .map(|(name, _, points)| (name.clone(), *points))
                    .collect();

                for (division, top) in [(&div_a, &a_top), (&div_b, &b_top)] {
                    for (idx, (name, points)) in top.iter().enumerate() {
                        playoff_seeds.push(PlayoffSeed {
                            conference: conference.clone(),
                            division: division.to_string(),
                            seed: format!("D{}", idx + 1),
                            team: name.clone(),
                            points: *points,
                        });
                    }
                }
                for (idx, (name, points)) in wildcards.iter().enumerate() {
                    playoff_seeds.push(PlayoffSeed {
                        conference: conference.clone(),
                        division: String::from("Wildcard"),
                        seed: format!("WC{}", idx + 1),
                        team: name.clone(),
                        points: *points,
                    });
                }

                // The stronger division winner draws the second wildcard.
                let (mut a_wc, mut b_wc): (Option<String>, Option<String>) = (None, None);
                if wildcards.len() == 2 && !a_top.is_empty() && !b_top.is_empty() {
                    if key_of(&a_top[0].0) >= key_of(&b_top[0].0) {
                        a_wc = Some(wildcards[1].0.clone());
                        b_wc = Some(wildcards[0].0.clone());
                    } else {
                        a_wc = Some(wildcards[0].0.clone());
                        b_wc = Some(wildcards[1].0.clone());
                    }
                } else if wildcards.len() == 1 {
                    if !a_top.is_empty() && !b_top.is_empty() {
                        if key_of(&a_top[0].0) >= key_of(&b_top[0].0) {
                            b_wc = Some(wildcards[0].0.clone());
                        } else {
                            a_wc = Some(wildcards[0].0.clone());
                        }
                    } else if !a_top.is_empty() {
                        a_wc = Some(wildcards[0].0.clone());
                    } else {
                        b_wc = Some(wildcards[0].0.clone());
                    }
                }

                let mut first_round_series: Vec<PlayoffSeries> = Vec::new();
                let mut advancers: BTreeMap<String, Vec<String>> = BTreeMap::new();

                for (division, top, wc) in
                    [(&div_a, &a_top, &a_wc), (&div_b, &b_top, &b_wc)]
                {
                    let entry = advancers.entry(division.to_string()).or_default();
                    if let (Some((first, _)), Some(wildcard)) = (top.first(), wc) {
                        let series = self.simulate_playoff_series(
                            &format!("{} Division First Round", division),
                            first,
                            wildcard,
                            &mut tracker,
                        );
                        entry.push(series.winner.clone());
                        first_round_series.push(series);
                    } else if let Some((first, _)) = top.first() {
                        entry.push(first.clone());
                    }
                    if top.len() >= 3 {
                        let series = self.simulate_playoff_series(
                            &format!("{} Division First Round", division),
                            &top[1].0,
                            &top[2].0,
                            &mut tracker,
                        );
                        advancers
                            .entry(division.to_string())
                            .or_default()
                            .push(series.winner.clone());
                        first_round_series.push(series);
                    }
                }

                if !first_round_series.is_empty() {
                    rounds.push(PlayoffRound {
                        name: format!("{} First Round", conference),
                        series: first_round_series,
                    });
                }

                let mut division_final_series: Vec<PlayoffSeries> = Vec::new();
                let mut division_champions: Vec<String> = Vec::new();
                for division in [&div_a, &div_b] {
                    let mut names = advancers.remove(division.as_str()).unwrap_or_default();
                    names.sort_by(|a, b| key_of(b).cmp(&key_of(a)));
                    if names.len() >= 2 {
                        let series = self.simulate_playoff_series(
                            &format!("{} Division Final", division),
                            &names[0],
                            &names[1],
                            &mut tracker,
                        );
                        division_champions.push(series.winner.clone());
                        division_final_series.push(series);
                    } else if names.len() == 1 {
                        division_champions.push(names.remove(0));
                    }
                }
                if !division_final_series.is_empty() {
                    rounds.push(PlayoffRound {
                        name: format!("{} Division Finals", conference),
                        series: division_final_series,
                    });
                }

                division_champions.sort_by(|a, b| key_of(b).cmp(&key_of(a)));
                if division_champions.len() >= 2 {
                    let series = self.simulate_playoff_series(
                        &format!("{} Conference Final", conference),
                        &division_champions[0],
                        &division_champions[1],
                        &mut tracker,
                    );
                    conference_finalists.push((conference.clone(), series.winner.clone()));
                    rounds.push(PlayoffRound {
                        name: format!("{} Conference Final", conference),
                        series: vec![series],
                    });
                } else if let Some(champion) = division_champions.pop() {
                    conference_finalists.push((conference.clone(), champion));
                }
                continue;
            }

            // Non-standard conference shape: straight 1-8 with re-seeding.
            let qualifiers: Vec<(String, String, u32)> =
                conf_records.iter().take(8).cloned().collect();
            for (idx, (name, division, points)) in qualifiers.iter().enumerate() {
                playoff_seeds.push(PlayoffSeed {
                    conference: conference.clone(),
                    division: division.clone(),
                    seed: format!("{}", idx + 1),
                    team: name.clone(),
                    points: *points,
                });
            }
            if qualifiers.len() < 2 {
                continue;
            }

            let mut first_round_series: Vec<PlayoffSeries> = Vec::new();
            let mut semifinal_teams: Vec<String> = Vec::new();
            for (high_idx, low_idx) in [(0usize, 7usize), (1, 6), (2, 5), (3, 4)] {
                if high_idx >= qualifiers.len() || low_idx >= qualifiers.len() {
                    continue;
                }
                let series = self.simulate_playoff_series(
                    &format!("{} Conference Quarterfinal", conference),
                    &qualifiers[high_idx].0,
                    &qualifiers[low_idx].0,
                    &mut tracker,
                );
                semifinal_teams.push(series.winner.clone());
                first_round_series.push(series);
            }
            if !first_round_series.is_empty() {
                rounds.push(PlayoffRound {
                    name: format!("{} Conference Quarterfinal", conference),
                    series: first_round_series,
                });
            }

            semifinal_teams.sort_by(|a, b| key_of(b).cmp(&key_of(a)));
            let mut semifinal_series: Vec<PlayoffSeries> = Vec::new();
            let mut finalists: Vec<String> = Vec::new();
            while semifinal_teams.len() >= 2 {
                let high = semifinal_teams.remove(0);
                let low = semifinal_teams.pop().expect("pair exists");
                let series = self.simulate_playoff_series(
                    &format!("{} Conference Semifinal", conference),
                    &high,
                    &low,
                    &mut tracker,
                );
                finalists.push(series.winner.clone());
                semifinal_series.push(series);
            }
            if !semifinal_series.is_empty() {
                rounds.push(PlayoffRound {
                    name: format!("{} Conference Semifinal", conference),
                    series: semifinal_series,
                });
            }

            finalists.sort_by(|a, b| key_of(b).cmp(&key_of(a)));
            if finalists.len() >= 2 {
                let series = self.simulate_playoff_series(
                    &format!("{} Conference Final", conference),
                    &finalists[0],
                    &finalists[1],
                    &mut tracker,
                );
                conference_finalists.push((conference.clone(), series.winner.clone()));
                rounds.push(PlayoffRound {
                    name: format!("{} Conference Final", conference),
                    series: vec![series],
                });
            } else if let Some(champion) = finalists.pop() {
                conference_finalists.push((conference, champion));
            }
        }

        let mut finalists: Vec<String> =
            conference_finalists.into_iter().map(|(_, team)| team).collect();
        finalists.sort_by(|a, b| key_of(b).cmp(&key_of(a)));

        let cup_champion = if finalists.len() >= 2 {
            let series = self.simulate_playoff_series(
                "Cup Final",
                &finalists[0],
                &finalists[1],
                &mut tracker,
            );
            let champion = series.winner.clone();
            rounds.push(PlayoffRound {
                name: String::from("Cup Final"),
                series: vec![series],
            });
            champion
        } else if let Some(only) = finalists.pop() {
            only
        } else {
            self.get_standings()
                .first()
                .map(|rec| rec.team_name.clone())
                .unwrap_or_default()
        };

        PlayoffBracket {
            cup_name: CUP_NAME.to_string(),
            champion: cup_champion.clone(),
            cup_champion: cup_champion.clone(),
            mvp: select_playoff_mvp(&cup_champion, &tracker),
            mvp_race: playoff_mvp_race(&tracker, 12),
            seeds: playoff_seeds,
            rounds,
        }
    }
}
