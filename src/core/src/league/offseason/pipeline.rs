use crate::club::player::CareerSeason;
use crate::league::history::{
    CoachRetirement, CoachSeasonRow, GoalieRow, LeadershipRow, OffseasonReport, ScorerRow,
    SeasonSummary, StandingRow,
};
use crate::league::league::LeagueSimulator;
use crate::league::playoffs::PlayoffBracket;
use crate::league::schedule::RoundRobinSchedule;
use crate::league::table::TeamRecord;
use crate::shared::error::{SimError, SimResult};
use chrono::NaiveDate;
use log::info;
use rand::Rng;
use rand::RngExt;

/// Everything one completed offseason produced, handed back to the caller
/// for news projection.
#[derive(Debug, Clone)]
pub struct OffseasonOutcome {
    pub completed_season: u32,
    pub next_season: u32,
    pub champion: String,
    pub report: OffseasonReport,
    pub free_agency: crate::league::history::FreeAgencyReport,
    pub retired_coaches: Vec<CoachRetirement>,
}

impl LeagueSimulator {
    fn round3(value: f32) -> f32 {
        (value * 1000.0).round() / 1000.0
    }

    pub fn standings_rows(&self) -> Vec<StandingRow> {
        self.get_standings()
            .into_iter()
            .map(|rec| self.standing_row(rec))
            .collect()
    }

    fn standing_row(&self, rec: &TeamRecord) -> StandingRow {
        let (conference, division) = self
            .get_team(&rec.team_name)
            .map(|t| (t.conference.clone(), t.division.clone()))
            .unwrap_or_default();
        StandingRow {
            team: rec.team_name.clone(),
            conference,
            division,
            gp: rec.games_played(),
            points: rec.points(),
            point_pct: Self::round3(rec.point_pct()),
            wins: rec.wins,
            losses: rec.losses,
            ot_losses: rec.ot_losses,
            home: rec.home_record(),
            away: rec.away_record(),
            l10: rec.last10(),
            strk: rec.streak(),
            gf: rec.goals_for,
            ga: rec.goals_against,
            gd: rec.goal_diff(),
            pp_pct: Self::round3(rec.pp_pct()),
            pk_pct: Self::round3(rec.pk_pct()),
        }
    }

    pub fn top_scorer_rows(&self, limit: usize) -> Vec<ScorerRow> {
        self.get_player_stats(None)
            .into_iter()
            .take(limit)
            .map(|p| ScorerRow {
                team: p.team_name.clone(),
                player: p.name.clone(),
                age: p.age,
                gp: p.season.games_played,
                g: p.season.goals,
                a: p.season.assists,
                p: p.points(),
            })
            .collect()
    }

    pub fn top_goalie_rows(&self, limit: usize) -> Vec<GoalieRow> {
        self.get_goalie_stats(None)
            .into_iter()
            .take(limit)
            .map(|p| GoalieRow {
                team: p.team_name.clone(),
                goalie: p.name.clone(),
                age: p.age,
                gp: p.season.goalie_games,
                w: p.season.goalie_wins,
                l: p.season.goalie_losses,
                otl: p.season.goalie_ot_losses,
                so: p.season.goalie_shutouts,
                sv_pct: Self::round3(p.save_pct()),
                gaa: (p.gaa() * 100.0).round() / 100.0,
            })
            .collect()
    }

    /// Offseason step 2: write every player's season into the career log.
    fn record_career_season_stats(&mut self, completed_season: u32) {
        for team_idx in 0..self.teams.len() {
            let team_name = self.teams[team_idx].name.clone();
            let team_goal_diff = self
                .records
                .get(&team_name)
                .map(|r| r.goal_diff() as f32)
                .unwrap_or(0.0);
            let names: Vec<String> = self.teams[team_idx]
                .organization_players()
                .map(|p| p.name.clone())
                .collect();
            for player_name in names {
                let (player_id, entry) = {
                    let player = self.teams[team_idx]
                        .organization_players()
                        .find(|p| p.name == player_name)
                        .expect("player present");
                    (
                        player.id.clone(),
                        CareerSeason::from_player(player, completed_season, &team_name, team_goal_diff),
                    )
                };
                let player = self.teams[team_idx]
                    .organization_players_mut()
                    .find(|p| p.name == player_name)
                    .expect("player present");
                player.career_seasons.push(entry);
                self.career_history
                    .insert(player_id, player.career_seasons.clone());
            }
        }
    }

    /// Offseason step 8 (first half): zero all live season counters.
    fn clear_season_player_stats(&mut self) {
        for team in self.teams.iter_mut() {
            for player in team.organization_players_mut() {
                player.reset_season_stats();
            }
        }
        // Unsigned free agents persist across seasons; their live season
        // counters clear too.
        for player in self.free_agents.iter_mut() {
            player.reset_season_stats();
        }
    }

    fn start_new_season(&mut self) {
        self.records = self
            .teams
            .iter()
            .map(|t| (t.name.clone(), TeamRecord::new(&t.name)))
            .collect();
        let team_names: Vec<String> = self.teams.iter().map(|t| t.name.clone()).collect();
        let season_start = NaiveDate::from_ymd_opt(
            self.first_season_year + self.season_number as i32 - 1,
            crate::league::league::SEASON_START.0,
            crate::league::league::SEASON_START.1,
        )
        .expect("valid season start date");
        self.schedule = RoundRobinSchedule::build(
            &team_names,
            self.games_per_matchup,
            self.calendar_density,
            season_start,
        );
        self.day_index = 0;
    }

    /// The full offseason pipeline, run once the last playoff day has been
    /// revealed. Holds the world lock for its whole duration by design:
    /// partial application would corrupt records.
    fn complete_offseason(
        &mut self,
        playoffs: PlayoffBracket,
        user_team_name: Option<&str>,
    ) -> OffseasonOutcome {
        let champion = playoffs.champion.clone();
        let completed_season = self.season_number;
        info!(
            "running offseason for season {}: champion {}",
            completed_season, champion
        );

        let coaches: Vec<CoachSeasonRow> = self
            .get_standings()
            .iter()
            .map(|rec| {
                let team = self.get_team(&rec.team_name).expect("team exists");
                CoachSeasonRow {
                    team: team.name.clone(),
                    coach: team.coach.name.clone(),
                    coach_age: team.coach.age,
                    coach_rating: (team.coach.rating * 100.0).round() / 100.0,
                    coach_style: team.coach.style.to_string(),
                    wins: rec.wins,
                    losses: rec.losses,
                    ot_losses: rec.ot_losses,
                    points: rec.points(),
                    point_pct: Self::round3(rec.point_pct()),
                    champion: team.name == champion,
                }
            })
            .collect();
        let leadership: Vec<LeadershipRow> = self
            .get_standings()
            .iter()
            .map(|rec| {
                let team = self.get_team(&rec.team_name).expect("team exists");
                LeadershipRow {
                    team: team.name.clone(),
                    captain: team.captain_name.clone(),
                    assistants: team.assistant_names.clone(),
                }
            })
            .collect();

        let mut summary = SeasonSummary {
            season: completed_season,
            champion: champion.clone(),
            standings: self.standings_rows(),
            coaches,
            leadership,
            top_scorers: self.top_scorer_rows(20),
            top_goalies: self.top_goalie_rows(12),
            playoffs,
            retired: Vec::new(),
            retired_numbers: Vec::new(),
            draft: Default::default(),
            draft_details: Default::default(),
            free_agency: Default::default(),
            retired_coaches: Vec::new(),
        };

        self.record_career_season_stats(completed_season);
        let (retired, retired_numbers) = self.age_and_retire_players();
        let (drafted, drafted_details) = self.run_draft();
        let free_agency = self.run_contract_and_free_agency(user_team_name);
        self.clear_season_player_stats();

        self.last_offseason = OffseasonReport {
            retired: retired.clone(),
            retired_numbers: retired_numbers.clone(),
            drafted: drafted.clone(),
            drafted_details: drafted_details.clone(),
        };

        // Offseason step 7: benches age a year; some walk away.
        let mut retired_coaches: Vec<CoachRetirement> = Vec::new();
        for team_idx in 0..self.teams.len() {
            self.teams[team_idx].coach.age = self.teams[team_idx].coach.age.saturating_add(1);
            let retire_probability = self.coach_retirement_probability(team_idx);
            if self.rng.random::<f32>() < retire_probability {
                retired_coaches.push(self.replace_retired_coach(team_idx));
            } else {
                self.teams[team_idx].coach.tenure_seasons += 1;
            }
            let coach = &mut self.teams[team_idx].coach;
            coach.changes_recent = (coach.changes_recent * 0.72).max(0.0);
            coach.honeymoon_games_remaining = 0;
        }
        for team in self.teams.iter_mut() {
            team.refresh_leadership();
        }

        summary.retired = retired;
        summary.retired_numbers = retired_numbers;
        summary.draft = drafted;
        summary.draft_details = drafted_details;
        summary.free_agency = free_agency.clone();
        summary.retired_coaches = retired_coaches.clone();
        self.season_history.push(summary);

        self.season_number += 1;
        self.start_new_season();
        self.pending_playoffs = None;
        self.pending_playoff_days = Vec::new();
        self.pending_playoff_day_index = 0;

        OffseasonOutcome {
            completed_season,
            next_season: self.season_number,
            champion,
            report: self.last_offseason.clone(),
            free_agency,
            retired_coaches,
        }
    }

    /// Run the offseason once every playoff reveal day has been released.
    pub fn finalize_offseason_after_playoffs(
        &mut self,
        user_team_name: Option<&str>,
    ) -> SimResult<OffseasonOutcome> {
        if !self.is_complete() {
            return Err(SimError::SeasonNotComplete);
        }
        let Some(playoffs) = self.pending_playoffs.clone() else {
            return Err(SimError::PlayoffsNotStarted);
        };
        if self.pending_playoff_day_index < self.pending_playoff_days.len() {
            return Err(SimError::PlayoffsNotComplete);
        }
        Ok(self.complete_offseason(playoffs, user_team_name))
    }

    /// Skip the reveal: run playoffs and the offseason to completion.
    pub fn advance_to_next_season(
        &mut self,
        user_team_name: Option<&str>,
    ) -> SimResult<OffseasonOutcome> {
        if !self.is_complete() {
            return Err(SimError::SeasonNotComplete);
        }
        self.start_playoffs()?;
        self.pending_playoff_day_index = self.pending_playoff_days.len();
        self.finalize_offseason_after_playoffs(user_team_name)
    }
}
