use crate::league::schedule::models::{ScheduleDay, ScheduledGame, SeasonSchedule};
use chrono::{Duration, NaiveDate};
use log::warn;

pub struct RoundRobinSchedule;

impl RoundRobinSchedule {
    /// Circle-method round robin expanded by `games_per_matchup` passes with
    /// alternating home ice, then re-cut into denser calendar days so not
    /// every team plays nightly. Guarantee: a team appears at most once per
    /// day.
    pub fn build(
        team_names: &[String],
        games_per_matchup: u32,
        calendar_density: f32,
        season_start: NaiveDate,
    ) -> SeasonSchedule {
        if team_names.len() < 2 || games_per_matchup < 1 {
            warn!("schedule: not enough teams or passes, skipping generation");
            return SeasonSchedule::default();
        }

        let density = calendar_density.clamp(0.35, 1.0);
        let target_games_per_day =
            (((team_names.len() as f32) * density / 2.0) as usize).max(2);

        let base_days = single_round_days(team_names);
        let mut season_days: Vec<Vec<(String, String)>> = Vec::new();

        for matchup_index in 0..games_per_matchup as usize {
            let flip_home_away = matchup_index % 2 == 1;
            for (round_idx, day) in base_days.iter().enumerate() {
                let raw_day: Vec<(String, String)> = if flip_home_away {
                    day.iter().map(|(h, a)| (a.clone(), h.clone())).collect()
                } else {
                    day.clone()
                };
                season_days.extend(spread_day(
                    raw_day,
                    round_idx,
                    matchup_index,
                    target_games_per_day,
                ));
            }
        }

        let days = season_days
            .into_iter()
            .enumerate()
            .map(|(idx, games)| ScheduleDay {
                number: idx as u32 + 1,
                date: season_start + Duration::days(idx as i64),
                games: games
                    .into_iter()
                    .map(|(home, away)| ScheduledGame { home, away })
                    .collect(),
            })
            .collect();

        SeasonSchedule { days }
    }
}

/// One full round robin split into slates where every team plays at most
/// once. Odd team counts get a ghost opponent whose games become byes.
fn single_round_days(team_names: &[String]) -> Vec<Vec<(String, String)>> {
    const GHOST: &str = "\u{0}BYE";

    let mut rotating: Vec<String> = team_names.to_vec();
    if rotating.len() % 2 == 1 {
        rotating.push(GHOST.to_string());
    }

    let rounds = rotating.len() - 1;
    let half = rotating.len() / 2;
    let mut days = Vec::with_capacity(rounds);

    for round_idx in 0..rounds {
        let mut day_games: Vec<(String, String)> = Vec::with_capacity(half);
        for idx in 0..half {
            let mut home = rotating[idx].clone();
            let mut away = rotating[rotating.len() - 1 - idx].clone();
            if home == GHOST || away == GHOST {
                continue;
            }
            // Alternate orientation by round to avoid long home/away streaks.
            if round_idx % 2 == 1 {
                std::mem::swap(&mut home, &mut away);
            }
            day_games.push((home, away));
        }
        days.push(day_games);

        // Keep the first team fixed, rotate the rest.
        let last = rotating.pop().expect("rotation always has teams");
        rotating.insert(1, last);
    }

    days
}

/// Rotate and snake-order a full slate, then deal it into calendar-day
/// buckets so teams do not lock into a rigid every-other-day cadence.
fn spread_day(
    day_games: Vec<(String, String)>,
    round_idx: usize,
    matchup_index: usize,
    target_games_per_day: usize,
) -> Vec<Vec<(String, String)>> {
    if day_games.len() <= target_games_per_day {
        return vec![day_games];
    }

    let mut games = day_games;
    let shift = (round_idx + matchup_index) % games.len();
    if shift > 0 {
        games.rotate_left(shift);
    }
    let odd_pass = (round_idx + matchup_index) % 2 == 1;
    if odd_pass {
        games.reverse();
    }

    let chunk_count = games.len().div_ceil(target_games_per_day).max(1);
    let mut chunks: Vec<Vec<(String, String)>> = vec![Vec::new(); chunk_count];
    for (idx, game) in games.into_iter().enumerate() {
        let mut bucket = idx % chunk_count;
        if odd_pass {
            bucket = chunk_count - 1 - bucket;
        }
        chunks[bucket].push(game);
    }
    chunks.retain(|chunk| !chunk.is_empty());
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|idx| format!("Team {:02}", idx)).collect()
    }

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[test]
    fn every_team_plays_every_other_twice() {
        let teams = names(24);
        let schedule = RoundRobinSchedule::build(&teams, 2, 0.60, start_date());

        let totals = schedule.team_total_games();
        for team in &teams {
            assert_eq!(totals.get(team), Some(&46), "wrong total for {}", team);
        }

        let mut pairs: BTreeMap<(String, String), u32> = BTreeMap::new();
        for day in &schedule.days {
            for game in &day.games {
                let key = if game.home < game.away {
                    (game.home.clone(), game.away.clone())
                } else {
                    (game.away.clone(), game.home.clone())
                };
                *pairs.entry(key).or_insert(0) += 1;
            }
        }
        assert!(pairs.values().all(|count| *count == 2));
    }

    #[test]
    fn no_team_plays_twice_in_a_day() {
        let teams = names(24);
        let schedule = RoundRobinSchedule::build(&teams, 2, 0.60, start_date());
        for idx in 0..schedule.total_days() {
            assert!(!schedule.day_has_duplicates(idx), "duplicate on day {}", idx);
        }
    }

    #[test]
    fn odd_team_count_gets_byes() {
        let teams = names(7);
        let schedule = RoundRobinSchedule::build(&teams, 1, 1.0, start_date());
        let totals = schedule.team_total_games();
        for team in &teams {
            assert_eq!(totals.get(team), Some(&6));
        }
    }

    #[test]
    fn home_and_away_split_evenly_over_two_passes() {
        let teams = names(6);
        let schedule = RoundRobinSchedule::build(&teams, 2, 1.0, start_date());
        let mut home_counts: BTreeMap<&String, u32> = BTreeMap::new();
        for day in &schedule.days {
            for game in &day.games {
                *home_counts.entry(&game.home).or_insert(0) += 1;
            }
        }
        for team in &teams {
            assert_eq!(home_counts.get(team), Some(&5));
        }
    }

    #[test]
    fn dates_advance_one_day_at_a_time() {
        let teams = names(8);
        let schedule = RoundRobinSchedule::build(&teams, 1, 0.5, start_date());
        for (idx, day) in schedule.days.iter().enumerate() {
            assert_eq!(day.date, start_date() + Duration::days(idx as i64));
            assert_eq!(day.number, idx as u32 + 1);
        }
    }

    #[test]
    fn degenerate_inputs_yield_empty_schedule() {
        assert_eq!(
            RoundRobinSchedule::build(&names(1), 2, 0.6, start_date()).total_days(),
            0
        );
        assert_eq!(
            RoundRobinSchedule::build(&names(8), 0, 0.6, start_date()).total_days(),
            0
        );
    }
}
