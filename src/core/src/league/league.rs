use crate::club::coach::{
    self, CoachModifiers, CoachStyle, GoalieStartLine,
};
use crate::club::player::{
    CareerSeason, ContractOffer, Player, PlayerPosition, ProspectTier,
};
use crate::club::team::{
    DRESSED_DEFENSE, DRESSED_FORWARDS, DRESSED_GOALIES, MAX_ROSTER_SIZE, MIN_MINOR_ROSTER_SIZE,
    Team,
};
use crate::game::{GameResult, GameSettings, SideConditions, simulate_game};
use crate::league::history::OffseasonReport;
use crate::league::needs::{DraftFocus, TeamNeedsConfig};
use crate::league::offseason::DraftSession;
use crate::league::playoffs::{PlayoffBracket, PlayoffRevealDay};
use crate::league::schedule::{DEFAULT_CALENDAR_DENSITY, RoundRobinSchedule, SeasonSchedule};
use crate::league::table::TeamRecord;
use crate::league::{HallOfFameEntry, SeasonSummary};
use crate::shared::error::{SimError, SimResult};
use crate::shared::names::{NameGenerator, sample_birth_country};
use chrono::NaiveDate;
use log::{debug, warn};
use rand::Rng;
use rand::RngExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const SAVE_VERSION: u32 = 2;

/// First puck drop of a season calendar; bookkeeping only.
pub const SEASON_START: (u32, u32) = (10, 1);

#[derive(Debug, Clone, Copy)]
pub struct SimulatorSettings {
    pub games_per_matchup: u32,
    pub calendar_density: f32,
    pub prime_age_min: u8,
    pub prime_age_max: u8,
    pub first_season_year: i32,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        SimulatorSettings {
            games_per_matchup: 2,
            calendar_density: DEFAULT_CALENDAR_DENSITY,
            prime_age_min: 27,
            prime_age_max: 28,
            first_season_year: 2025,
        }
    }
}

/// Serializable snapshot of the live world; the payload of
/// `league_state.json` minus the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueState {
    pub season_number: u32,
    pub day_index: usize,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub free_agents: Vec<Player>,
    #[serde(default)]
    pub records: BTreeMap<String, TeamRecord>,
    #[serde(default)]
    pub last_offseason_retired: Vec<String>,
    #[serde(default)]
    pub last_offseason_retired_numbers: Vec<crate::league::history::RetiredNumberEvent>,
    #[serde(default)]
    pub last_offseason_drafted: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub last_offseason_drafted_details:
        BTreeMap<String, Vec<crate::league::history::DraftPickDetail>>,
    #[serde(default)]
    pub draft_focus_by_team: BTreeMap<String, DraftFocus>,
    #[serde(default)]
    pub team_needs_by_team: BTreeMap<String, TeamNeedsConfig>,
    #[serde(default)]
    pub pending_playoffs: Option<PlayoffBracket>,
    #[serde(default)]
    pub pending_playoff_days: Vec<PlayoffRevealDay>,
    #[serde(default)]
    pub pending_playoff_day_index: usize,
    #[serde(default)]
    pub draft_session: Option<DraftSession>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdvanceOptions<'a> {
    pub user_team_name: Option<&'a str>,
    pub user_strategy: CoachStyle,
    pub use_user_lines: bool,
    pub use_user_strategy: bool,
}

pub struct LeagueSimulator {
    pub teams: Vec<Team>,
    pub free_agents: Vec<Player>,
    pub season_number: u32,
    pub games_per_matchup: u32,
    pub calendar_density: f32,
    pub prime_age_min: u8,
    pub prime_age_max: u8,
    pub first_season_year: i32,
    pub records: BTreeMap<String, TeamRecord>,
    pub schedule: SeasonSchedule,
    pub day_index: usize,
    pub pending_playoffs: Option<PlayoffBracket>,
    pub pending_playoff_days: Vec<PlayoffRevealDay>,
    pub pending_playoff_day_index: usize,
    pub draft_session: Option<DraftSession>,
    pub last_offseason: OffseasonReport,
    pub draft_focus_by_team: BTreeMap<String, DraftFocus>,
    pub team_needs_by_team: BTreeMap<String, TeamNeedsConfig>,
    pub season_history: Vec<SeasonSummary>,
    pub career_history: BTreeMap<String, Vec<CareerSeason>>,
    pub hall_of_fame: Vec<HallOfFameEntry>,
    pub(crate) rng: StdRng,
    pub(crate) names: NameGenerator,
}

/// Disjoint mutable borrows of two different teams in the same vector.
pub(crate) fn pair_mut<'a>(
    teams: &'a mut [Team],
    first: &str,
    second: &str,
) -> Option<(&'a mut Team, &'a mut Team)> {
    let ia = teams.iter().position(|t| t.name == first)?;
    let ib = teams.iter().position(|t| t.name == second)?;
    if ia == ib {
        return None;
    }
    if ia < ib {
        let (left, right) = teams.split_at_mut(ib);
        Some((&mut left[ia], &mut right[0]))
    } else {
        let (left, right) = teams.split_at_mut(ia);
        Some((&mut right[0], &mut left[ib]))
    }
}

impl LeagueSimulator {
    pub fn new(teams: Vec<Team>, settings: SimulatorSettings, seed: u64) -> Self {
        let state = LeagueState {
            season_number: 1,
            day_index: 0,
            teams,
            free_agents: Vec::new(),
            records: BTreeMap::new(),
            last_offseason_retired: Vec::new(),
            last_offseason_retired_numbers: Vec::new(),
            last_offseason_drafted: BTreeMap::new(),
            last_offseason_drafted_details: BTreeMap::new(),
            draft_focus_by_team: BTreeMap::new(),
            team_needs_by_team: BTreeMap::new(),
            pending_playoffs: None,
            pending_playoff_days: Vec::new(),
            pending_playoff_day_index: 0,
            draft_session: None,
        };
        Self::from_state(state, settings, seed)
    }

    /// Build a simulator from persisted (or fresh) state and run the load
    /// repair passes so legacy worlds come up consistent.
    pub fn from_state(state: LeagueState, settings: SimulatorSettings, seed: u64) -> Self {
        let mut names = NameGenerator::new(seed);
        for team in &state.teams {
            names.reserve(team.organization_players().map(|p| p.name.clone()));
            names.reserve([team.coach.name.clone()]);
        }
        names.reserve(state.free_agents.iter().map(|p| p.name.clone()));

        let team_names: Vec<String> = state.teams.iter().map(|t| t.name.clone()).collect();
        let season_start = NaiveDate::from_ymd_opt(
            settings.first_season_year + state.season_number as i32 - 1,
            SEASON_START.0,
            SEASON_START.1,
        )
        .expect("valid season start date");
        let schedule = RoundRobinSchedule::build(
            &team_names,
            settings.games_per_matchup,
            settings.calendar_density,
            season_start,
        );

        let mut records = state.records;
        for name in &team_names {
            records
                .entry(name.clone())
                .or_insert_with(|| TeamRecord::new(name));
        }
        records.retain(|name, _| team_names.contains(name));

        let day_index = state.day_index.min(schedule.total_days());
        let pending_playoff_day_index = state
            .pending_playoff_day_index
            .min(state.pending_playoff_days.len());

        let mut simulator = LeagueSimulator {
            teams: state.teams,
            free_agents: state.free_agents,
            season_number: state.season_number,
            games_per_matchup: settings.games_per_matchup,
            calendar_density: settings.calendar_density,
            prime_age_min: settings.prime_age_min.min(settings.prime_age_max),
            prime_age_max: settings.prime_age_max.max(settings.prime_age_min),
            first_season_year: settings.first_season_year,
            records,
            schedule,
            day_index,
            pending_playoffs: state.pending_playoffs,
            pending_playoff_days: state.pending_playoff_days,
            pending_playoff_day_index,
            draft_session: state.draft_session,
            last_offseason: OffseasonReport {
                retired: state.last_offseason_retired,
                retired_numbers: state.last_offseason_retired_numbers,
                drafted: state.last_offseason_drafted,
                drafted_details: state.last_offseason_drafted_details,
            },
            draft_focus_by_team: state.draft_focus_by_team,
            team_needs_by_team: state.team_needs_by_team,
            season_history: Vec::new(),
            career_history: BTreeMap::new(),
            hall_of_fame: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            names,
        };

        simulator.repair_loaded_world();
        simulator
    }

    /// Load repair: demote roster overflow, top up minors, regenerate
    /// missing coaches/leadership/numbers/contracts.
    fn repair_loaded_world(&mut self) {
        self.repair_roster_overflow();
        self.ensure_minor_roster_depth();
        self.ensure_team_coaches();
        for team in self.teams.iter_mut() {
            team.refresh_leadership();
            team.assign_player_numbers();
        }
        self.ensure_player_contracts();
        let valid: BTreeSet<String> = self.teams.iter().map(|t| t.name.clone()).collect();
        self.draft_focus_by_team.retain(|name, _| valid.contains(name));
        self.team_needs_by_team.retain(|name, _| valid.contains(name));
        for team in self.teams.iter_mut() {
            if team.dressed_player_names.is_empty() && !team.line_assignments.is_empty() {
                team.refresh_dressed_from_assignments();
            }
            if team.dressed_player_names.is_empty() {
                team.set_default_lineup();
            }
        }
    }

    /// Older saves can carry more than 22 healthy players on the active
    /// roster; demote the weakest non-goalies until compliant.
    fn repair_roster_overflow(&mut self) {
        for team in self.teams.iter_mut() {
            loop {
                let healthy = team.healthy_roster_count();
                if healthy <= MAX_ROSTER_SIZE {
                    break;
                }
                let mut candidates: Vec<(f32, u8, String, bool)> = team
                    .roster
                    .iter()
                    .filter(|p| !p.is_injured())
                    .map(|p| (p.overall(), p.age, p.name.clone(), p.position.is_goalie()))
                    .collect();
                candidates.sort_by(|a, b| {
                    (a.3 as u8)
                        .cmp(&(b.3 as u8))
                        .then(a.0.total_cmp(&b.0))
                        .then(a.1.cmp(&b.1))
                        .then(a.2.cmp(&b.2))
                });
                let Some((_, _, name, _)) = candidates.first() else {
                    break;
                };
                let name = name.clone();
                warn!("load repair: demoting {} from {} (roster overflow)", name, team.name);
                let idx = team.roster.iter().position(|p| p.name == name).unwrap();
                let player = team.roster.remove(idx);
                team.dressed_player_names.remove(&player.name);
                if team.starting_goalie_name.as_deref() == Some(player.name.as_str()) {
                    team.starting_goalie_name = None;
                }
                team.minor_roster.push(player);
            }
        }
    }

    pub fn to_state(&self) -> LeagueState {
        LeagueState {
            season_number: self.season_number,
            day_index: self.day_index,
            teams: self.teams.clone(),
            free_agents: self.free_agents.clone(),
            records: self.records.clone(),
            last_offseason_retired: self.last_offseason.retired.clone(),
            last_offseason_retired_numbers: self.last_offseason.retired_numbers.clone(),
            last_offseason_drafted: self.last_offseason.drafted.clone(),
            last_offseason_drafted_details: self.last_offseason.drafted_details.clone(),
            draft_focus_by_team: self.draft_focus_by_team.clone(),
            team_needs_by_team: self.team_needs_by_team.clone(),
            pending_playoffs: self.pending_playoffs.clone(),
            pending_playoff_days: self.pending_playoff_days.clone(),
            pending_playoff_day_index: self.pending_playoff_day_index,
            draft_session: self.draft_session.clone(),
        }
    }

    pub fn total_days(&self) -> usize {
        self.schedule.total_days()
    }

    pub fn current_day(&self) -> u32 {
        let total = self.total_days();
        if total == 0 {
            return 1;
        }
        ((self.day_index + 1).min(total)).max(1) as u32
    }

    pub fn is_complete(&self) -> bool {
        self.day_index >= self.total_days()
    }

    pub fn has_playoff_session(&self) -> bool {
        self.pending_playoffs.is_some()
    }

    pub fn playoffs_finished(&self) -> bool {
        self.pending_playoffs.is_some()
            && self.pending_playoff_day_index >= self.pending_playoff_days.len()
    }

    pub fn get_team(&self, team_name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == team_name)
    }

    pub fn get_team_mut(&mut self, team_name: &str) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.name == team_name)
    }

    pub fn get_divisions(&self) -> Vec<String> {
        let mut divisions: Vec<String> = self
            .teams
            .iter()
            .map(|t| t.division.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        divisions.sort();
        divisions
    }

    pub fn get_conferences(&self) -> Vec<String> {
        self.teams
            .iter()
            .map(|t| t.conference.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Standings ordered by points, then goal differential, then goals for.
    pub fn get_standings(&self) -> Vec<&TeamRecord> {
        let mut rows: Vec<&TeamRecord> = self.records.values().collect();
        rows.sort_by(|a, b| {
            b.points()
                .cmp(&a.points())
                .then(b.goal_diff().cmp(&a.goal_diff()))
                .then(b.goals_for.cmp(&a.goals_for))
        });
        rows
    }

    pub fn get_division_standings(&self, division: &str) -> Vec<&TeamRecord> {
        self.get_standings()
            .into_iter()
            .filter(|rec| {
                self.get_team(&rec.team_name)
                    .map(|t| t.division == division)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn get_conference_standings(&self, conference: &str) -> Vec<&TeamRecord> {
        self.get_standings()
            .into_iter()
            .filter(|rec| {
                self.get_team(&rec.team_name)
                    .map(|t| t.conference == conference)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn get_player_stats(&self, team_name: Option<&str>) -> Vec<&Player> {
        let mut players: Vec<&Player> = self
            .teams
            .iter()
            .filter(|t| team_name.is_none_or(|name| t.name == name))
            .flat_map(|t| t.roster.iter())
            .collect();
        players.sort_by(|a, b| {
            b.points()
                .cmp(&a.points())
                .then(b.season.goals.cmp(&a.season.goals))
                .then(b.season.assists.cmp(&a.season.assists))
                .then(b.season.games_played.cmp(&a.season.games_played))
                .then(a.age.cmp(&b.age))
                .then(a.name.cmp(&b.name))
        });
        players
    }

    pub fn get_goalie_stats(&self, team_name: Option<&str>) -> Vec<&Player> {
        let mut goalies: Vec<&Player> = self
            .teams
            .iter()
            .filter(|t| team_name.is_none_or(|name| t.name == name))
            .flat_map(|t| t.roster.iter())
            .filter(|p| p.position.is_goalie())
            .collect();
        goalies.sort_by(|a, b| {
            b.season
                .goalie_wins
                .cmp(&a.season.goalie_wins)
                .then(a.gaa().total_cmp(&b.gaa()))
                .then(b.save_pct().total_cmp(&a.save_pct()))
                .then(b.season.goalie_games.cmp(&a.season.goalie_games))
                .then(a.name.cmp(&b.name))
        });
        goalies
    }

    pub(crate) fn sample_country(&mut self) -> (String, String) {
        sample_birth_country(&mut self.rng)
    }

    pub(crate) fn next_player_id(&mut self) -> String {
        format!(
            "{:016x}{:016x}",
            self.rng.random::<u64>(),
            self.rng.random::<u64>()
        )
    }

    /// Tick every injury timer one day and reset DTD flags. Runs on both
    /// regular-season and playoff-reveal days so UI status stays coherent.
    pub(crate) fn advance_recovery_day(&mut self) {
        for team in self.teams.iter_mut() {
            for player in team.organization_players_mut() {
                player.health.advance_recovery_day();
            }
        }
    }

    pub(crate) fn gp_snapshot(&self) -> BTreeMap<String, u32> {
        self.records
            .iter()
            .map(|(name, rec)| (name.clone(), rec.games_played()))
            .collect()
    }

    /// Back-to-back and travel context for one side of a matchup. Returns
    /// (offense bonus, injury multiplier).
    fn schedule_context_modifiers(
        &self,
        team: &Team,
        opponent: &Team,
        played_yesterday: &BTreeSet<String>,
        is_away: bool,
    ) -> (f32, f32) {
        let mut offense_pen = 0.0;
        let mut injury_mult = 1.0;
        if played_yesterday.contains(&team.name) {
            offense_pen += 0.06;
            injury_mult += 0.06;
            if is_away {
                offense_pen += 0.02;
                injury_mult += 0.02;
            }
            if team.conference != opponent.conference {
                offense_pen += 0.03;
                injury_mult += 0.03;
            } else if team.division != opponent.division {
                offense_pen += 0.015;
                injury_mult += 0.015;
            }
        }
        (-offense_pen, injury_mult)
    }

    /// Simulate exactly one regular-season day. All-or-nothing: on any
    /// integrity failure the pre-advance records are restored and an
    /// invariant error is returned.
    pub fn simulate_next_day(&mut self, options: &AdvanceOptions<'_>) -> SimResult<Vec<GameResult>> {
        if self.is_complete() {
            return Ok(Vec::new());
        }

        // Standings can never be ahead of the calendar before a sim.
        let max_allowed_gp = self.day_index as u32;
        for rec in self.records.values() {
            if rec.games_played() > max_allowed_gp {
                return Err(SimError::InvariantViolation(format!(
                    "{} has {} GP while calendar day index is {}",
                    rec.team_name,
                    rec.games_played(),
                    self.day_index
                )));
            }
        }

        if self.schedule.day_has_duplicates(self.day_index) {
            return Err(SimError::ScheduleConflict(format!(
                "duplicate team assignment on day {}",
                self.current_day()
            )));
        }

        for team in self.teams.iter_mut() {
            team.assign_player_numbers();
        }
        self.advance_recovery_day();

        let day_games: Vec<(String, String)> = self
            .schedule
            .day(self.day_index)
            .map(|day| day.games.iter().map(|g| (g.home.clone(), g.away.clone())).collect())
            .unwrap_or_default();
        let scheduled_day_teams = self.schedule.teams_playing_on(self.day_index);
        let played_yesterday = if self.day_index > 0 {
            self.schedule.teams_playing_on(self.day_index - 1)
        } else {
            BTreeSet::new()
        };

        let gp_before = self.gp_snapshot();
        let records_before = self.records.clone();

        let outcome = self.run_day_games(&day_games, &played_yesterday, options);

        let day_results = match outcome {
            Ok(results) => results,
            Err(error) => {
                self.records = records_before;
                return Err(error);
            }
        };

        // Post-day integrity: every scheduled team gained exactly one game.
        let mut violation: Option<(String, i64, i64)> = None;
        for (team_name, rec) in &self.records {
            let before = gp_before.get(team_name).copied().unwrap_or(0);
            let delta = rec.games_played() as i64 - before as i64;
            let expected = if scheduled_day_teams.contains(team_name) { 1 } else { 0 };
            if delta != expected {
                violation = Some((team_name.clone(), delta, expected));
                break;
            }
        }
        if let Some((team_name, delta, expected)) = violation {
            self.records = records_before;
            return Err(SimError::InvariantViolation(format!(
                "invalid GP delta for {} on day {}: delta={}, expected={}",
                team_name,
                self.current_day(),
                delta,
                expected
            )));
        }

        self.day_index += 1;
        Ok(day_results)
    }

    fn run_day_games(
        &mut self,
        day_games: &[(String, String)],
        played_yesterday: &BTreeSet<String>,
        options: &AdvanceOptions<'_>,
    ) -> SimResult<Vec<GameResult>> {
        let mut day_results = Vec::with_capacity(day_games.len());

        for (home_name, away_name) in day_games {
            self.ensure_team_depth(home_name);
            self.ensure_team_depth(away_name);

            let home_pct = self.team_point_pct(home_name);
            let away_pct = self.team_point_pct(away_name);
            let home_underdog = home_pct + 0.015 < away_pct;
            let away_underdog = away_pct + 0.015 < home_pct;

            let user_team = options.user_team_name.unwrap_or("");
            let home_coach_controls = *home_name != user_team || !options.use_user_lines;
            let away_coach_controls = *away_name != user_team || !options.use_user_lines;

            let mut home_strategy;
            let mut away_strategy;
            let home_modifiers: CoachModifiers;
            let away_modifiers: CoachModifiers;
            let home_penalty;
            let away_penalty;

            {
                let rng = &mut self.rng;
                let Some((home, away)) = pair_mut(&mut self.teams, home_name, away_name) else {
                    return Err(SimError::ScheduleConflict(format!(
                        "matchup {} vs {} is not playable",
                        home_name, away_name
                    )));
                };

                coach::set_dtd_decisions(home, home_underdog, false, false, rng);
                coach::set_dtd_decisions(away, away_underdog, false, false, rng);

                if home_coach_controls {
                    home.set_default_lineup();
                    let goalie = coach::choose_starting_goalie(
                        home,
                        false,
                        played_yesterday.contains(home_name),
                        rng,
                    );
                    home.set_starting_goalie(goalie.as_deref());
                }
                if away_coach_controls {
                    away.set_default_lineup();
                    let goalie = coach::choose_starting_goalie(
                        away,
                        false,
                        played_yesterday.contains(away_name),
                        rng,
                    );
                    away.set_starting_goalie(goalie.as_deref());
                }

                home_strategy = home.coach.style;
                away_strategy = away.coach.style;
                if *home_name == user_team && options.use_user_strategy {
                    home_strategy = options.user_strategy;
                }
                if *away_name == user_team && options.use_user_strategy {
                    away_strategy = options.user_strategy;
                }

                home_modifiers = coach::game_modifiers(home, home_strategy, away);
                away_modifiers = coach::game_modifiers(away, away_strategy, home);
                home_penalty = if *home_name == user_team {
                    home.lineup_position_penalty()
                } else {
                    0.0
                };
                away_penalty = if *away_name == user_team {
                    away.lineup_position_penalty()
                } else {
                    0.0
                };
            }

            let home_team_view = self.get_team(home_name).expect("home exists");
            let away_team_view = self.get_team(away_name).expect("away exists");
            let (home_sched_bonus, home_sched_injury) = self.schedule_context_modifiers(
                home_team_view,
                away_team_view,
                played_yesterday,
                false,
            );
            let (away_sched_bonus, away_sched_injury) = self.schedule_context_modifiers(
                away_team_view,
                home_team_view,
                played_yesterday,
                true,
            );

            let settings = GameSettings {
                home: SideConditions {
                    strategy: home_strategy,
                    coach_offense_bonus: home_modifiers.offense_bonus
                        - home_penalty * 0.45
                        + home_sched_bonus,
                    coach_defense_bonus: home_modifiers.defense_bonus - home_penalty * 0.50,
                    context_bonus: 0.012,
                    injury_mult: home_modifiers.injury_mult * home_sched_injury,
                },
                away: SideConditions {
                    strategy: away_strategy,
                    coach_offense_bonus: away_modifiers.offense_bonus
                        - away_penalty * 0.45
                        + away_sched_bonus,
                    coach_defense_bonus: away_modifiers.defense_bonus - away_penalty * 0.50,
                    context_bonus: -0.006,
                    injury_mult: away_modifiers.injury_mult * away_sched_injury,
                },
                ..Default::default()
            };

            let result = {
                let rng = &mut self.rng;
                let (home, away) = pair_mut(&mut self.teams, home_name, away_name)
                    .expect("teams validated above");
                let result = simulate_game(home, away, &settings, rng);
                home.consume_coach_game_effect();
                away.consume_coach_game_effect();
                result
            };

            if let Some(rec) = self.records.get_mut(home_name) {
                rec.register_game(
                    result.home_goals,
                    result.away_goals,
                    result.overtime,
                    true,
                    result.home_pp_goals,
                    result.home_pp_chances,
                    result.away_pp_goals,
                    result.away_pp_chances,
                );
            }
            if let Some(rec) = self.records.get_mut(away_name) {
                rec.register_game(
                    result.away_goals,
                    result.home_goals,
                    result.overtime,
                    false,
                    result.away_pp_goals,
                    result.away_pp_chances,
                    result.home_pp_goals,
                    result.home_pp_chances,
                );
            }

            day_results.push(result);
        }

        Ok(day_results)
    }

    /// Recent goalie starts for one team out of a series log, newest first.
    pub(crate) fn goalie_recent_starts(
        series_games: &[crate::league::playoffs::SeriesGame],
        team_name: &str,
    ) -> Vec<GoalieStartLine> {
        let mut starts = Vec::new();
        for game in series_games.iter().rev() {
            let (goalie, shots, saves, ga) = if game.home == team_name {
                (
                    game.home_goalie.clone(),
                    game.home_goalie_shots,
                    game.home_goalie_saves,
                    game.away_goals,
                )
            } else if game.away == team_name {
                (
                    game.away_goalie.clone(),
                    game.away_goalie_shots,
                    game.away_goalie_saves,
                    game.home_goals,
                )
            } else {
                continue;
            };
            let sv = if shots > 0 {
                saves as f32 / shots as f32
            } else {
                0.0
            };
            starts.push(GoalieStartLine {
                goalie,
                sv,
                ga: ga as f32,
            });
            if starts.len() >= 8 {
                break;
            }
        }
        starts
    }

    /// Promote a minor-roster player, demoting the lowest-value compatible
    /// roster player first when the active group is full.
    pub(crate) fn promote_from_minors(
        &mut self,
        team_name: &str,
        player_name: &str,
        replacement_for: &str,
    ) -> bool {
        let Some(team) = self.get_team_mut(team_name) else {
            return false;
        };
        let Some(minor_idx) = team.minor_roster.iter().position(|p| p.name == player_name) else {
            return false;
        };
        let incoming_position = team.minor_roster[minor_idx].position;

        let demotion_priority = |candidate: PlayerPosition, incoming: PlayerPosition| -> u8 {
            if incoming.is_goalie() {
                return if candidate.is_goalie() { 1 } else { 0 };
            }
            if incoming.is_defense() {
                return if candidate.is_forward() {
                    0
                } else if candidate.is_defense() {
                    1
                } else {
                    2
                };
            }
            if candidate.is_defense() {
                0
            } else if candidate.is_forward() {
                1
            } else {
                2
            }
        };

        if team.healthy_roster_count() >= MAX_ROSTER_SIZE {
            let healthy_goalies = team.healthy_goalie_count();
            let mut candidates: Vec<(u8, f32, i16, String)> = team
                .roster
                .iter()
                .filter(|p| !p.is_injured() && (!p.position.is_goalie() || healthy_goalies > 1))
                .filter(|p| !(incoming_position.is_goalie() && p.position.is_goalie()))
                .map(|p| {
                    (
                        demotion_priority(p.position, incoming_position),
                        p.overall(),
                        -(p.age as i16),
                        p.name.clone(),
                    )
                })
                .collect();
            // Goalie call-ups should push a skater down when one exists.
            if incoming_position.is_goalie() && candidates.is_empty() {
                candidates = team
                    .roster
                    .iter()
                    .filter(|p| !p.is_injured() && (!p.position.is_goalie() || healthy_goalies > 1))
                    .map(|p| {
                        (
                            demotion_priority(p.position, incoming_position),
                            p.overall(),
                            -(p.age as i16),
                            p.name.clone(),
                        )
                    })
                    .collect();
            }
            candidates.sort_by(|a, b| {
                a.0.cmp(&b.0)
                    .then(a.1.total_cmp(&b.1))
                    .then(a.2.cmp(&b.2))
                    .then(a.3.cmp(&b.3))
            });
            let Some((_, _, _, demote_name)) = candidates.first() else {
                return false;
            };
            let demote_name = demote_name.clone();
            let idx = team
                .roster
                .iter()
                .position(|p| p.name == demote_name)
                .expect("demotion candidate on roster");
            let demoted = team.roster.remove(idx);
            team.dressed_player_names.remove(&demoted.name);
            if team.starting_goalie_name.as_deref() == Some(demoted.name.as_str()) {
                team.starting_goalie_name = None;
            }
            team.minor_roster.push(demoted);
        }

        let minor_idx = team
            .minor_roster
            .iter()
            .position(|p| p.name == player_name)
            .expect("promotion candidate still in minors");
        let mut player = team.minor_roster.remove(minor_idx);
        player.team_name = team.name.clone();
        player.health.temporary_replacement_for = replacement_for.trim().to_string();
        team.roster.push(player);
        true
    }

    pub fn promote_minor_player(
        &mut self,
        team_name: &str,
        player_name: &str,
        replacement_for: &str,
    ) -> SimResult<()> {
        let Some(team) = self.get_team(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        if team.minor_player_by_name(player_name).is_none() {
            return Err(SimError::PlayerNotFound(player_name.to_string()));
        }
        if !self.promote_from_minors(team_name, player_name, replacement_for) {
            return Err(SimError::RosterFull(team_name.to_string()));
        }
        let team = self.get_team_mut(team_name).expect("team exists");
        team.assign_player_numbers();
        team.set_default_lineup();
        team.refresh_leadership();
        Ok(())
    }

    pub fn demote_roster_player(&mut self, team_name: &str, player_name: &str) -> SimResult<()> {
        let Some(team) = self.get_team_mut(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        let Some(idx) = team.roster.iter().position(|p| p.name == player_name) else {
            return Err(SimError::PlayerNotFound(player_name.to_string()));
        };
        let player_is_goalie = team.roster[idx].position.is_goalie();
        let player_injured = team.roster[idx].is_injured();
        if !player_injured && player_is_goalie && team.healthy_goalie_count() <= 1 {
            return Err(SimError::CannotTradeLastGoalie(team_name.to_string()));
        }

        let mut player = team.roster.remove(idx);
        player.health.temporary_replacement_for = String::new();
        team.dressed_player_names.remove(&player.name);
        if team.starting_goalie_name.as_deref() == Some(player.name.as_str()) {
            team.starting_goalie_name = None;
        }
        team.minor_roster.push(player);
        team.assign_player_numbers();
        team.set_default_lineup();
        team.refresh_leadership();
        Ok(())
    }

    /// Keep a team dressable: promote healthy minors when position groups
    /// dip below the 12F/6D/2G floor, prioritized by the team's needs model.
    pub fn ensure_team_depth(&mut self, team_name: &str) {
        let Some(team) = self.get_team(team_name) else {
            return;
        };
        if team.minor_roster.is_empty() {
            return;
        }

        let needs = self.get_team_needs(team_name);
        let target = needs.target_position.clone();
        let prefer_skill = needs.scores.top6_f >= needs.scores.depth_f;

        let healthy_count = |team: &Team, check: fn(PlayerPosition) -> bool| -> usize {
            team.roster
                .iter()
                .filter(|p| check(p.position) && !p.is_injured())
                .count()
        };

        let fill = |sim: &mut LeagueSimulator,
                    check: fn(PlayerPosition) -> bool,
                    floor: usize,
                    rank: &dyn Fn(&Player) -> f32| {
            loop {
                let Some(team) = sim.get_team(team_name) else {
                    return;
                };
                if healthy_count(team, check) >= floor {
                    return;
                }
                let candidate = team
                    .minor_roster
                    .iter()
                    .filter(|p| check(p.position) && !p.is_injured())
                    .max_by(|a, b| rank(a).total_cmp(&rank(b)))
                    .map(|p| p.name.clone());
                let Some(candidate) = candidate else {
                    return;
                };
                let replacement_for = team
                    .roster
                    .iter()
                    .find(|p| check(p.position) && p.is_injured())
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                if !sim.promote_from_minors(team_name, &candidate, &replacement_for) {
                    return;
                }
            }
        };

        let goalie_rank = |p: &Player| p.skills.goaltending;
        let forward_rank_skill =
            |p: &Player| p.skills.shooting + p.skills.playmaking + p.skills.defense;
        let forward_rank_grind =
            |p: &Player| p.skills.defense + p.skills.durability + p.skills.physical;
        let defense_rank = |p: &Player| p.skills.defense + p.skills.playmaking + p.skills.physical;

        let is_goalie = |p: PlayerPosition| p.is_goalie();
        let is_forward = |p: PlayerPosition| p.is_forward();
        let is_defense = |p: PlayerPosition| p.is_defense();

        let fill_goalies =
            |sim: &mut LeagueSimulator| fill(sim, is_goalie, DRESSED_GOALIES, &goalie_rank);
        let fill_forwards = |sim: &mut LeagueSimulator| {
            if prefer_skill {
                fill(sim, is_forward, DRESSED_FORWARDS, &forward_rank_skill)
            } else {
                fill(sim, is_forward, DRESSED_FORWARDS, &forward_rank_grind)
            }
        };
        let fill_defense =
            |sim: &mut LeagueSimulator| fill(sim, is_defense, DRESSED_DEFENSE, &defense_rank);

        match target.as_str() {
            "G" => {
                fill_goalies(self);
                fill_defense(self);
                fill_forwards(self);
            }
            "D" => {
                fill_defense(self);
                fill_goalies(self);
                fill_forwards(self);
            }
            "F" => {
                fill_forwards(self);
                fill_goalies(self);
                fill_defense(self);
            }
            _ => {
                fill_goalies(self);
                fill_forwards(self);
                fill_defense(self);
            }
        }
        // Safety pass so the minimum dressed structure is always attempted.
        fill_goalies(self);
        fill_forwards(self);
        fill_defense(self);

        if let Some(team) = self.get_team_mut(team_name) {
            team.set_default_lineup();
            team.refresh_leadership();
        }
    }

    /// Seed shallow minor rosters with generated depth prospects.
    pub(crate) fn ensure_minor_roster_depth(&mut self) {
        let team_names: Vec<String> = self.teams.iter().map(|t| t.name.clone()).collect();
        for team_name in team_names {
            loop {
                let Some(team) = self.get_team(&team_name) else {
                    break;
                };
                if team.minor_roster.len() >= MIN_MINOR_ROSTER_SIZE {
                    break;
                }
                let position = match self.rng.random_range(0..6) {
                    0 => PlayerPosition::Center,
                    1 => PlayerPosition::LeftWing,
                    2 => PlayerPosition::RightWing,
                    3 | 4 => PlayerPosition::Defense,
                    _ => PlayerPosition::Goalie,
                };
                let quality = self.rng.random_range(0.38..0.68);
                let mut player = self.create_draft_player(&team_name, position, quality, None, None);
                player.prospect.tier = ProspectTier::Ahl;
                player.draft = Default::default();
                if player.prospect.seasons_to_nhl == 0 {
                    player.prospect.seasons_to_nhl = 1;
                }
                if let Some(team) = self.get_team_mut(&team_name) {
                    team.minor_roster.push(player);
                }
            }
        }
    }

    /// Backfill missing or legacy-default contracts across the world.
    pub(crate) fn ensure_player_contracts(&mut self) {
        for team_idx in 0..self.teams.len() {
            let names: Vec<String> = self.teams[team_idx]
                .organization_players()
                .map(|p| p.name.clone())
                .collect();
            for name in names {
                let player = self.teams[team_idx]
                    .organization_players()
                    .find(|p| p.name == name)
                    .expect("player present");
                let legacy_like = player.contract.years_left == 2
                    && (player.contract.cap_hit - 1.2).abs() < 1e-9
                    && player.contract.contract_type
                        == crate::club::player::ContractType::Entry
                    && player.age >= 24;
                if !(player.contract.needs_backfill() || legacy_like) {
                    continue;
                }
                let offer = ContractOffer::estimate(player);
                let player = self.teams[team_idx]
                    .organization_players_mut()
                    .find(|p| p.name == name)
                    .expect("player present");
                player.contract.assign(&offer);
            }
        }
        for idx in 0..self.free_agents.len() {
            if self.free_agents[idx].contract.needs_backfill() {
                let offer = ContractOffer::estimate(&self.free_agents[idx]);
                self.free_agents[idx].contract.assign(&offer);
            }
        }
    }

    /// Commit a negotiated 1-for-1 swap. Validation happens in the trade
    /// layer; this is the atomic roster transition.
    pub(crate) fn execute_one_for_one_trade(
        &mut self,
        team_a: &str,
        team_b: &str,
        player_a: &str,
        player_b: &str,
    ) -> SimResult<()> {
        self.snapshot_trade_season_split(team_a, player_a);
        self.snapshot_trade_season_split(team_b, player_b);

        let Some((first, second)) = pair_mut(&mut self.teams, team_a, team_b) else {
            return Err(SimError::TeamNotFound(team_b.to_string()));
        };
        let Some(idx_a) = first.roster.iter().position(|p| p.name == player_a) else {
            return Err(SimError::PlayerNotFound(player_a.to_string()));
        };
        let Some(idx_b) = second.roster.iter().position(|p| p.name == player_b) else {
            return Err(SimError::PlayerNotFound(player_b.to_string()));
        };

        let mut moving_a = first.roster.remove(idx_a);
        let mut moving_b = second.roster.remove(idx_b);
        first.dressed_player_names.remove(&moving_a.name);
        second.dressed_player_names.remove(&moving_b.name);
        if first.starting_goalie_name.as_deref() == Some(moving_a.name.as_str()) {
            first.starting_goalie_name = None;
        }
        if second.starting_goalie_name.as_deref() == Some(moving_b.name.as_str()) {
            second.starting_goalie_name = None;
        }
        moving_a.team_name = second.name.clone();
        moving_b.team_name = first.name.clone();
        second.roster.push(moving_a);
        first.roster.push(moving_b);

        first.assign_player_numbers();
        second.assign_player_numbers();
        first.set_default_lineup();
        second.set_default_lineup();
        first.refresh_leadership();
        second.refresh_leadership();
        debug!("trade executed: {} <-> {}", player_a, player_b);
        Ok(())
    }

    /// A traded player's season so far is written to his career log under
    /// the old club, then the live counters restart at zero.
    pub(crate) fn snapshot_trade_season_split(&mut self, from_team: &str, player_name: &str) {
        let season = self.season_number;
        let team_goal_diff = self
            .records
            .get(from_team)
            .map(|r| r.goal_diff() as f32)
            .unwrap_or(0.0);
        let Some(team) = self.get_team(from_team) else {
            return;
        };
        let Some(player) = team.player_by_name(player_name) else {
            return;
        };
        let played_any = player.season.games_played > 0
            || player.season.goalie_games > 0
            || player.points() > 0
            || player.season.goalie_wins > 0
            || player.health.games_missed_injury > 0
            || player.health.injuries > 0;
        if !played_any {
            return;
        }
        let entry = CareerSeason::from_player(player, season, from_team, team_goal_diff);
        let player_id = player.id.clone();

        let team = self.get_team_mut(from_team).expect("team exists");
        let player = team
            .player_by_name_mut(player_name)
            .expect("player exists");
        player.career_seasons.push(entry);
        player.season = Default::default();
        player.health.injuries = 0;
        player.health.games_missed_injury = 0;
        let log = player.career_seasons.clone();
        self.career_history.insert(player_id, log);
    }

    pub fn sign_free_agent(
        &mut self,
        team_name: &str,
        player_name: &str,
        years: Option<u32>,
        cap_hit: Option<f64>,
    ) -> SimResult<SigningOutcome> {
        if self.get_team(team_name).is_none() {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        }
        let Some(player_idx) = self.free_agents.iter().position(|p| p.name == player_name)
        else {
            return Err(SimError::PlayerNotFound(player_name.to_string()));
        };
        {
            let team = self.get_team(team_name).expect("team exists");
            if team.healthy_roster_count() >= MAX_ROSTER_SIZE {
                return Err(SimError::RosterFull(team_name.to_string()));
            }
        }

        let ask = ContractOffer::estimate(&self.free_agents[player_idx]);
        let offer = ContractOffer {
            years: years.map(|y| y.clamp(1, 8)).unwrap_or(ask.years),
            cap_hit: cap_hit.map(|c| c.max(0.65)).unwrap_or(ask.cap_hit),
            ..ask
        };
        {
            let team = self.get_team(team_name).expect("team exists");
            if offer.cap_hit > crate::league::needs::team_cap_space(team) {
                return Err(SimError::NoCapSpace(team_name.to_string()));
            }
        }

        let mut player = self.free_agents.remove(player_idx);
        player.contract.assign(&offer);
        player.contract.free_agent_origin_team = String::new();
        player.team_name = team_name.to_string();
        let outcome = SigningOutcome {
            team: team_name.to_string(),
            player: player.name.clone(),
            years: player.contract.years_left,
            cap_hit: player.contract.cap_hit,
        };
        let team = self.get_team_mut(team_name).expect("team exists");
        team.roster.push(player);
        team.assign_player_numbers();
        team.set_default_lineup();
        team.refresh_leadership();
        Ok(outcome)
    }

    pub fn extend_player_contract(
        &mut self,
        team_name: &str,
        player_name: &str,
        years: Option<u32>,
        cap_hit: Option<f64>,
    ) -> SimResult<SigningOutcome> {
        let Some(team) = self.get_team(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        let Some(player) = team
            .organization_players()
            .find(|p| p.name == player_name)
        else {
            return Err(SimError::PlayerNotFound(player_name.to_string()));
        };
        if player.contract.years_left == 0 {
            return Err(SimError::ContractExpired(player_name.to_string()));
        }

        let ask = ContractOffer::estimate(player);
        let offer = ContractOffer {
            years: years.map(|y| y.clamp(1, 8)).unwrap_or(ask.years),
            cap_hit: cap_hit.map(|c| c.max(0.65)).unwrap_or(ask.cap_hit),
            ..ask
        };
        let cap_space =
            crate::league::needs::team_cap_space(team) + player.contract.cap_hit;
        if offer.cap_hit > cap_space {
            return Err(SimError::NoCapSpace(team_name.to_string()));
        }

        let team = self.get_team_mut(team_name).expect("team exists");
        let player = team
            .organization_players_mut()
            .find(|p| p.name == player_name)
            .expect("player exists");
        player.contract.assign(&offer);
        Ok(SigningOutcome {
            team: team_name.to_string(),
            player: player_name.to_string(),
            years: player.contract.years_left,
            cap_hit: player.contract.cap_hit,
        })
    }

    pub fn get_free_agents(&self) -> Vec<&Player> {
        let mut agents: Vec<&Player> = self.free_agents.iter().collect();
        agents.sort_by(|a, b| {
            b.overall()
                .total_cmp(&a.overall())
                .then(a.age.cmp(&b.age))
                .then(a.name.cmp(&b.name))
        });
        agents
    }

    pub fn set_draft_focus(&mut self, team_name: &str, focus: DraftFocus) -> DraftFocus {
        if focus == DraftFocus::Auto {
            self.draft_focus_by_team.remove(team_name);
        } else {
            self.draft_focus_by_team.insert(team_name.to_string(), focus);
        }
        self.get_draft_focus(team_name)
    }

    pub fn get_draft_focus(&self, team_name: &str) -> DraftFocus {
        self.draft_focus_by_team
            .get(team_name)
            .copied()
            .unwrap_or(DraftFocus::Auto)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningOutcome {
    pub team: String,
    pub player: String,
    pub years: u32,
    pub cap_hit: f64,
}
