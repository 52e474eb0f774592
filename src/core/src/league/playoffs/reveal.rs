use crate::league::league::LeagueSimulator;
use crate::league::playoffs::types::{
    PlayoffBracket, PlayoffRevealDay, RevealGame,
};
use crate::shared::error::{SimError, SimResult};
use crate::utils::Logging;
use log::info;

/// Strip the conference prefix so parallel rounds from both conferences
/// reveal on the same calendar days.
fn stage_name(round_name: &str) -> String {
    const SUFFIXES: [&str; 5] = [
        " First Round",
        " Division Finals",
        " Conference Final",
        " Conference Quarterfinal",
        " Conference Semifinal",
    ];
    for suffix in SUFFIXES {
        if round_name.ends_with(suffix) {
            return suffix.trim_start().to_string();
        }
    }
    round_name.to_string()
}

/// Flatten a pre-simulated bracket into the day-by-day reveal queue: one day
/// per game number per stage, every series' game N on the same day.
pub fn build_playoff_reveal_days(bracket: &PlayoffBracket) -> Vec<PlayoffRevealDay> {
    let mut stage_order: Vec<String> = Vec::new();
    let mut stage_series: Vec<(String, Vec<&crate::league::playoffs::PlayoffSeries>)> = Vec::new();

    for round in &bracket.rounds {
        let stage = stage_name(&round.name);
        if let Some((_, series)) = stage_series.iter_mut().find(|(name, _)| *name == stage) {
            series.extend(round.series.iter());
        } else {
            stage_order.push(stage.clone());
            stage_series.push((stage, round.series.iter().collect()));
        }
    }

    let mut days: Vec<PlayoffRevealDay> = Vec::new();
    for stage in stage_order {
        let series_list = &stage_series
            .iter()
            .find(|(name, _)| *name == stage)
            .expect("stage recorded")
            .1;
        let max_games = series_list
            .iter()
            .map(|series| series.games.len())
            .max()
            .unwrap_or(0) as u32;

        for game_no in 1..=max_games {
            let mut day_games: Vec<RevealGame> = Vec::new();
            for series in series_list.iter() {
                let Some(game) = series.games.iter().find(|g| g.game == game_no) else {
                    continue;
                };
                let mut high_wins = 0;
                let mut low_wins = 0;
                for prior in series.games.iter().filter(|g| g.game <= game_no) {
                    if prior.winner == series.higher_seed {
                        high_wins += 1;
                    } else if prior.winner == series.lower_seed {
                        low_wins += 1;
                    }
                }
                day_games.push(RevealGame {
                    game: game.clone(),
                    series_higher_seed: series.higher_seed.clone(),
                    series_lower_seed: series.lower_seed.clone(),
                    series_high_wins: high_wins,
                    series_low_wins: low_wins,
                });
            }
            if !day_games.is_empty() {
                days.push(PlayoffRevealDay {
                    round: stage.clone(),
                    game_number: game_no,
                    games: day_games,
                });
            }
        }
    }
    days
}

#[derive(Debug, Clone)]
pub struct PlayoffDayAdvance {
    pub day_number: usize,
    pub total_days: usize,
    pub day: PlayoffRevealDay,
    pub complete: bool,
}

impl LeagueSimulator {
    /// On the first post-season call: build the bracket, pre-simulate every
    /// series, and queue the reveal days.
    pub fn start_playoffs(&mut self) -> SimResult<()> {
        if !self.is_complete() {
            return Err(SimError::SeasonNotComplete);
        }
        if self.pending_playoffs.is_none() {
            info!("regular season complete, building playoff bracket");
            let bracket =
                Logging::estimate_result(|| self.run_playoffs(), "pre-simulate playoff bracket");
            self.pending_playoff_days = build_playoff_reveal_days(&bracket);
            self.pending_playoff_day_index = 0;
            self.pending_playoffs = Some(bracket);
        }
        Ok(())
    }

    /// Release the next pre-simulated day. Injury timers still tick so
    /// recovery status stays coherent with the reveal calendar.
    pub fn simulate_next_playoff_day(&mut self) -> SimResult<PlayoffDayAdvance> {
        if self.pending_playoffs.is_none() {
            return Err(SimError::PlayoffsNotStarted);
        }
        if self.pending_playoff_day_index >= self.pending_playoff_days.len() {
            return Err(SimError::InvalidArgument(
                "playoffs already fully revealed".to_string(),
            ));
        }

        self.advance_recovery_day();
        for team in self.teams.iter_mut() {
            team.assign_player_numbers();
        }

        let day = self.pending_playoff_days[self.pending_playoff_day_index].clone();
        self.pending_playoff_day_index += 1;
        let complete = self.pending_playoff_day_index >= self.pending_playoff_days.len();
        Ok(PlayoffDayAdvance {
            day_number: self.pending_playoff_day_index,
            total_days: self.pending_playoff_days.len(),
            day,
            complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ThreeStar;
    use crate::league::playoffs::types::{PlayoffRound, PlayoffSeries, SeriesGame};

    fn game(no: u32, home: &str, away: &str, winner: &str) -> SeriesGame {
        SeriesGame {
            game: no,
            home: home.into(),
            away: away.into(),
            home_goals: 3,
            away_goals: 2,
            overtime: false,
            home_goalie: String::from("Keeper"),
            away_goalie: String::from("Backstop"),
            home_goalie_shots: 30,
            home_goalie_saves: 28,
            away_goalie_shots: 31,
            away_goalie_saves: 28,
            attendance: 17000,
            arena_capacity: 18000,
            winner: winner.into(),
            three_stars: Vec::<ThreeStar>::new(),
        }
    }

    fn sweep(round: &str, higher: &str, lower: &str) -> PlayoffSeries {
        PlayoffSeries {
            round: round.into(),
            higher_seed: higher.into(),
            lower_seed: lower.into(),
            winner: higher.into(),
            loser: lower.into(),
            winner_wins: 4,
            loser_wins: 0,
            games: (1..=4).map(|no| game(no, higher, lower, higher)).collect(),
        }
    }

    fn bracket() -> PlayoffBracket {
        PlayoffBracket {
            cup_name: String::from("Founders Cup"),
            champion: String::from("Aurora"),
            cup_champion: String::from("Aurora"),
            mvp: Default::default(),
            mvp_race: vec![],
            seeds: vec![],
            rounds: vec![
                PlayoffRound {
                    name: String::from("Eastern First Round"),
                    series: vec![sweep("East Division First Round", "Harbor Kings", "Bay Comets")],
                },
                PlayoffRound {
                    name: String::from("Western First Round"),
                    series: vec![sweep("North Division First Round", "Aurora", "Glaciers")],
                },
                PlayoffRound {
                    name: String::from("Cup Final"),
                    series: vec![sweep("Cup Final", "Aurora", "Harbor Kings")],
                },
            ],
        }
    }

    #[test]
    fn parallel_conference_rounds_share_days() {
        let days = build_playoff_reveal_days(&bracket());
        // Two four-game sweeps in the first round stage plus a four-game final.
        assert_eq!(days.len(), 8);
        assert_eq!(days[0].round, "First Round");
        assert_eq!(days[0].games.len(), 2);
        assert_eq!(days[4].round, "Cup Final");
        assert_eq!(days[4].games.len(), 1);
    }

    #[test]
    fn running_series_tallies_accumulate() {
        let days = build_playoff_reveal_days(&bracket());
        let final_days: Vec<_> = days.iter().filter(|d| d.round == "Cup Final").collect();
        assert_eq!(final_days[0].games[0].series_high_wins, 1);
        assert_eq!(final_days[3].games[0].series_high_wins, 4);
        assert_eq!(final_days[3].games[0].series_low_wins, 0);
    }
}
