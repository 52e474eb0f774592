use crate::league::history::SeasonSummary;
use crate::league::league::LeagueSimulator;
use crate::trades::preferences::TradeDesk;

/// How far a team advanced in one season's postseason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayoffFinish {
    Champion,
    CupFinal,
    ConferenceFinal,
    SecondRound,
    FirstRound,
}

impl PlayoffFinish {
    /// Weight toward a coach's job security.
    pub fn security_weight(&self) -> f32 {
        match self {
            PlayoffFinish::Champion => 1.25,
            PlayoffFinish::CupFinal => 0.95,
            PlayoffFinish::ConferenceFinal => 0.70,
            PlayoffFinish::SecondRound => 0.35,
            PlayoffFinish::FirstRound => 0.12,
        }
    }
}

/// Best finish the team reached in a completed season's bracket.
pub fn playoff_finish_for_team(summary: &SeasonSummary, team_name: &str) -> Option<PlayoffFinish> {
    if summary.playoffs.champion == team_name {
        return Some(PlayoffFinish::Champion);
    }

    let played_in = |round_suffix: &str| -> bool {
        summary
            .playoffs
            .rounds
            .iter()
            .filter(|round| round.name.ends_with(round_suffix))
            .flat_map(|round| round.series.iter())
            .any(|series| series.higher_seed == team_name || series.lower_seed == team_name)
    };

    if played_in("Cup Final") {
        return Some(PlayoffFinish::CupFinal);
    }
    if played_in("Conference Final") {
        return Some(PlayoffFinish::ConferenceFinal);
    }
    if played_in("Division Finals") || played_in("Conference Semifinal") {
        return Some(PlayoffFinish::SecondRound);
    }
    if played_in("First Round") || played_in("Conference Quarterfinal") {
        return Some(PlayoffFinish::FirstRound);
    }
    None
}

/// Inputs to a CPU GM's midseason coach-firing decision.
#[derive(Debug, Clone)]
pub struct HotSeatReading {
    pub hot_seat: f32,
    pub fire_probability: f32,
    pub recent_finishes: Vec<PlayoffFinish>,
}

impl TradeDesk<'_> {
    /// Hot-seat model: cold standings, a bleeding goal differential, a weak
    /// bench, a basement division rank, and prior churn all heat the seat;
    /// recent deep playoff runs buy a long leash.
    pub fn hot_seat_reading(&self, team_name: &str) -> Option<HotSeatReading> {
        let sim: &LeagueSimulator = self.sim;
        let team = sim.get_team(team_name)?;
        let rec = sim.records.get(team_name)?;
        if rec.games_played() < 18 {
            return None;
        }
        if team.coach.honeymoon_games_remaining > 0 {
            return None;
        }

        let div_rows = sim.get_division_standings(&team.division);
        let div_rank = div_rows
            .iter()
            .position(|row| row.team_name == *team_name)
            .map(|idx| idx + 1)
            .unwrap_or(div_rows.len());
        let point_pct = rec.point_pct();
        let goal_diff_pg = rec.goal_diff() as f32 / rec.games_played().max(1) as f32;

        let mut recent_finishes: Vec<PlayoffFinish> = Vec::new();
        let mut recent_security = 0.0;
        for summary in sim.season_history.iter().rev().take(3) {
            if let Some(finish) = playoff_finish_for_team(summary, team_name) {
                recent_security += finish.security_weight();
                recent_finishes.push(finish);
            }
        }
        let recent_security = recent_security.min(1.6);

        let mut hot_seat = 0.0;
        hot_seat += (0.52 - point_pct).max(0.0) * 1.35;
        hot_seat += (-goal_diff_pg).max(0.0) * 0.16;
        hot_seat += (3.15 - team.coach.rating).max(0.0) * 0.34;
        if div_rank >= 4.max(div_rows.len().saturating_sub(1)) {
            hot_seat += 0.14;
        }
        hot_seat += (team.coach.changes_recent * 0.03).min(0.25);
        // Recent deep playoff success strongly suppresses firing odds.
        hot_seat = (hot_seat - recent_security * 0.82).max(0.0);

        let mut fire_probability = (hot_seat * 0.16).clamp(0.0, 0.55);

        // Sustained severe underperformance before serious risk appears.
        let gp = rec.games_played();
        if point_pct < 0.420 && gp >= 40 {
            fire_probability += 0.10;
        }
        if point_pct < 0.390 && gp >= 54 {
            fire_probability += 0.12;
        }
        if point_pct < 0.360 && gp >= 60 {
            fire_probability += 0.16;
        }

        let deep_run = recent_finishes
            .iter()
            .any(|f| matches!(f, PlayoffFinish::Champion | PlayoffFinish::CupFinal));
        let conf_final_run = recent_finishes
            .iter()
            .any(|f| matches!(f, PlayoffFinish::ConferenceFinal));
        if deep_run {
            if point_pct < 0.390 && gp >= 54 {
                fire_probability *= 0.35;
            } else {
                fire_probability *= 0.10;
            }
        } else if conf_final_run {
            if point_pct < 0.405 && gp >= 48 {
                fire_probability *= 0.55;
            } else {
                fire_probability *= 0.22;
            }
        }

        Some(HotSeatReading {
            hot_seat,
            fire_probability: fire_probability.clamp(0.0, 0.62),
            recent_finishes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::team::Team;
    use crate::league::league::SimulatorSettings;
    use crate::league::playoffs::{PlayoffBracket, PlayoffRound, PlayoffSeries};
    use crate::trades::preferences::TradePreferencesByTeam;

    fn summary_with_champion(season: u32, champion: &str, runner_up: &str) -> SeasonSummary {
        SeasonSummary {
            season,
            champion: champion.to_string(),
            standings: vec![],
            coaches: vec![],
            leadership: vec![],
            top_scorers: vec![],
            top_goalies: vec![],
            playoffs: PlayoffBracket {
                cup_name: String::from("Founders Cup"),
                champion: champion.to_string(),
                cup_champion: champion.to_string(),
                mvp: Default::default(),
                mvp_race: vec![],
                seeds: vec![],
                rounds: vec![PlayoffRound {
                    name: String::from("Cup Final"),
                    series: vec![PlayoffSeries {
                        round: String::from("Cup Final"),
                        higher_seed: champion.to_string(),
                        lower_seed: runner_up.to_string(),
                        winner: champion.to_string(),
                        loser: runner_up.to_string(),
                        winner_wins: 4,
                        loser_wins: 2,
                        games: vec![],
                    }],
                }],
            },
            retired: vec![],
            retired_numbers: vec![],
            draft: Default::default(),
            draft_details: Default::default(),
            free_agency: Default::default(),
            retired_coaches: vec![],
        }
    }

    fn struggling_league() -> LeagueSimulator {
        let teams = vec![
            Team::new("Aurora", "North", "Western"),
            Team::new("Glaciers", "North", "Western"),
            Team::new("Polar Caps", "North", "Western"),
            Team::new("Silver Pines", "North", "Western"),
        ];
        let mut sim = LeagueSimulator::new(teams, SimulatorSettings::default(), 12);
        let rec = sim.records.get_mut("Aurora").unwrap();
        rec.wins = 8;
        rec.losses = 30;
        rec.ot_losses = 2;
        rec.goals_for = 80;
        rec.goals_against = 150;
        sim
    }

    #[test]
    fn cold_team_coach_lands_on_the_hot_seat() {
        let mut sim = struggling_league();
        sim.teams[0].coach.rating = 2.4;
        sim.teams[0].coach.honeymoon_games_remaining = 0;
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, None);
        let reading = desk.hot_seat_reading("Aurora").unwrap();
        assert!(reading.hot_seat > 0.3);
        assert!(reading.fire_probability > 0.05);
    }

    #[test]
    fn recent_champion_is_nearly_fireproof() {
        let mut sim = struggling_league();
        sim.teams[0].coach.rating = 2.4;
        sim.season_history
            .push(summary_with_champion(1, "Aurora", "Glaciers"));
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, None);

        let reading = desk.hot_seat_reading("Aurora").unwrap();
        let mut cold_sim = struggling_league();
        cold_sim.teams[0].coach.rating = 2.4;
        let cold_prefs = TradePreferencesByTeam::new();
        let cold_desk = TradeDesk::new(&cold_sim, &cold_prefs, None);
        let cold_reading = cold_desk.hot_seat_reading("Aurora").unwrap();

        assert!(reading.fire_probability < cold_reading.fire_probability * 0.5);
    }

    #[test]
    fn honeymoon_coach_is_untouchable() {
        let mut sim = struggling_league();
        sim.teams[0].coach.honeymoon_games_remaining = 10;
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, None);
        assert!(desk.hot_seat_reading("Aurora").is_none());
    }

    #[test]
    fn finish_detection_reads_the_bracket() {
        let summary = summary_with_champion(1, "Aurora", "Glaciers");
        assert_eq!(
            playoff_finish_for_team(&summary, "Aurora"),
            Some(PlayoffFinish::Champion)
        );
        assert_eq!(
            playoff_finish_for_team(&summary, "Glaciers"),
            Some(PlayoffFinish::CupFinal)
        );
        assert_eq!(playoff_finish_for_team(&summary, "Polar Caps"), None);
    }
}
