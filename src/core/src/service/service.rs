use crate::club::coach::CoachStyle;
use crate::club::team::{MAX_ROSTER_SIZE, Team};
use crate::game::GameResult;
use crate::league::history::StandingRow;
use crate::league::league::{AdvanceOptions, LeagueSimulator, SigningOutcome};
use crate::league::needs::{DraftFocus, NeedScores, NeedsMode, TeamNeeds};
use crate::league::offseason::{DraftProspect, DraftSessionPick, OffseasonOutcome};
use crate::league::playoffs::RevealGame;
use crate::service::runtime::{
    CoachCandidate, DayResults, GameMode, NewsItem, RuntimeState,
};
use crate::service::store::LeagueStore;
use crate::shared::error::{SimError, SimResult};
use crate::trades::{TradeDesk, TradeEval, TradeInsight, TradePreference};
use log::{info, warn};
use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const COACH_POOL_MIN: usize = 14;
const CPU_REVIEW_FIRST_DAY: u32 = 28;
const CPU_TRADES_PER_WEEK: usize = 2;

pub type WorldFactory = Box<dyn Fn(u64) -> Vec<Team> + Send>;

/// Thread-safety contract: the service itself is synchronous and must sit
/// behind one process-wide exclusive lock. Every mutating operation either
/// completes fully (and persists) or fails before any mutation.
pub struct SimService {
    pub sim: LeagueSimulator,
    pub runtime: RuntimeState,
    pub last_load_error: String,
    store: Box<dyn LeagueStore>,
    world_factory: WorldFactory,
    seed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaView {
    pub teams: Vec<String>,
    pub conferences: Vec<String>,
    pub divisions: Vec<String>,
    pub strategies: Vec<String>,
    pub user_team: String,
    pub user_strategy: String,
    pub use_coach: bool,
    pub override_coach_for_lines: bool,
    pub override_coach_for_strategy: bool,
    pub auto_injury_moves: bool,
    pub game_mode: GameMode,
    pub user_coach_name: String,
    pub user_coach_rating: f32,
    pub user_coach_style: String,
    pub draft_focus: String,
    pub draft_focus_options: Vec<String>,
    pub season: u32,
    pub day: u32,
    pub total_days: u32,
    pub in_playoffs: bool,
    pub last_load_error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsEntry {
    #[serde(flatten)]
    pub row: StandingRow,
    pub clinch: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WildcardGroup {
    pub division_leaders: Vec<(String, Vec<StandingsEntry>)>,
    pub wildcard: Vec<StandingsEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StandingsView {
    Rows(Vec<StandingsEntry>),
    Wildcard(BTreeMap<String, WildcardGroup>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GmMove {
    CoachChange {
        team: String,
        old_coach: String,
        new_coach: String,
        old_rating: f32,
        new_rating: f32,
        reason: String,
    },
    Trade {
        buyer: String,
        seller: String,
        buyer_gets: String,
        seller_gets: String,
        buyer_net: f32,
        seller_net: f32,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum AdvanceOutcome {
    Regular {
        season: u32,
        day: u32,
        total_days: u32,
        games: Vec<GameResult>,
        gm_moves: Vec<GmMove>,
        season_complete: bool,
    },
    Playoffs {
        season: u32,
        day: u32,
        total_days: u32,
        round: String,
        games: Vec<RevealGame>,
        playoffs_complete: bool,
    },
    Offseason {
        completed_season: u32,
        next_season: u32,
        champion: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeOutcome {
    pub team: String,
    pub partner_team: String,
    pub give_player: String,
    pub receive_player: String,
    pub user_eval: TradeEval,
    pub partner_eval: TradeEval,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftStateView {
    pub active: bool,
    pub season: u32,
    pub current_pick: u32,
    pub total_picks: u32,
    pub on_the_clock: Option<String>,
    pub user_is_on_the_clock: bool,
    pub order: Vec<String>,
    pub picks: Vec<DraftSessionPick>,
    pub prospects: Vec<DraftProspect>,
    pub user_board: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeBlockUpdate {
    pub player_name: String,
    pub action: String,
}

impl SimService {
    pub fn new(
        sim: LeagueSimulator,
        mut runtime: RuntimeState,
        store: Box<dyn LeagueStore>,
        world_factory: WorldFactory,
        seed: u64,
        last_load_error: String,
    ) -> Self {
        if runtime.user_team_name.is_empty()
            || sim.get_team(&runtime.user_team_name).is_none()
        {
            runtime.user_team_name = sim
                .teams
                .first()
                .map(|t| t.name.clone())
                .unwrap_or_default();
        }
        let mut service = SimService {
            sim,
            runtime,
            last_load_error,
            store,
            world_factory,
            seed,
        };
        service.ensure_coach_pool_depth();
        service
    }

    fn user_team_name(&self) -> &str {
        &self.runtime.user_team_name
    }

    fn require_user_team(&self, team_name: &str) -> SimResult<()> {
        if team_name != self.user_team_name() {
            return Err(SimError::NotUserTeam(team_name.to_string()));
        }
        Ok(())
    }

    /// Autosaves swallow write failures; the sim must not stall on disk.
    fn autosave(&self) {
        if let Err(error) = self.store.save_state(&self.sim.to_state()) {
            warn!("autosave of league state failed: {}", error);
        }
        if let Err(error) = self.store.save_runtime(&self.runtime) {
            warn!("autosave of runtime state failed: {}", error);
        }
    }

    /// Full persist in dependency order: state first, logs after, so the
    /// live state is always at least as advanced as the histories.
    fn save_all(&self) -> SimResult<()> {
        self.store
            .save_state(&self.sim.to_state())
            .map_err(SimError::Persistence)?;
        self.store
            .save_history(&self.sim.season_history)
            .map_err(SimError::Persistence)?;
        self.store
            .save_career(&self.sim.career_history)
            .map_err(SimError::Persistence)?;
        self.store
            .save_hall_of_fame(&self.sim.hall_of_fame)
            .map_err(SimError::Persistence)?;
        self.store
            .save_runtime(&self.runtime)
            .map_err(SimError::Persistence)?;
        Ok(())
    }

    fn push_news(&mut self, kind: &str, headline: String, details: String, team: &str) {
        let item = NewsItem {
            season: self.sim.season_number,
            day: self.sim.current_day(),
            kind: kind.to_string(),
            headline,
            details,
            team: team.to_string(),
        };
        self.runtime.push_news(item);
    }

    pub fn meta(&self) -> MetaView {
        let user_team = self.sim.get_team(self.user_team_name());
        let reg_total = self.sim.total_days() as u32;
        let playoff_total = self.sim.pending_playoff_days.len() as u32;
        let playoff_day = self.sim.pending_playoff_day_index as u32;
        let in_playoffs = self.sim.has_playoff_session();
        let (day, total_days) = if in_playoffs {
            (reg_total + playoff_day, reg_total + playoff_total)
        } else {
            (self.sim.current_day(), reg_total)
        };

        MetaView {
            teams: self.sim.teams.iter().map(|t| t.name.clone()).collect(),
            conferences: self.sim.get_conferences(),
            divisions: self.sim.get_divisions(),
            strategies: CoachStyle::all().iter().map(|s| s.to_string()).collect(),
            user_team: self.user_team_name().to_string(),
            user_strategy: self.runtime.user_strategy.to_string(),
            use_coach: !(self.runtime.override_coach_for_lines
                || self.runtime.override_coach_for_strategy),
            override_coach_for_lines: self.runtime.override_coach_for_lines,
            override_coach_for_strategy: self.runtime.override_coach_for_strategy,
            auto_injury_moves: self.runtime.auto_injury_moves,
            game_mode: self.runtime.game_mode,
            user_coach_name: user_team.map(|t| t.coach.name.clone()).unwrap_or_default(),
            user_coach_rating: user_team
                .map(|t| (t.coach.rating * 100.0).round() / 100.0)
                .unwrap_or(0.0),
            user_coach_style: user_team
                .map(|t| t.coach.style.to_string())
                .unwrap_or_default(),
            draft_focus: self
                .sim
                .get_draft_focus(self.user_team_name())
                .as_str()
                .to_string(),
            draft_focus_options: DraftFocus::all()
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
            season: self.sim.season_number,
            day,
            total_days,
            in_playoffs,
            last_load_error: self.last_load_error.clone(),
        }
    }

    fn entry_for(&self, row: StandingRow, tags: &BTreeMap<String, Vec<char>>) -> StandingsEntry {
        let clinch = tags
            .get(&row.team)
            .map(|chars| chars.iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();
        StandingsEntry { row, clinch }
    }

    pub fn standings(&self, mode: &str, value: Option<&str>) -> SimResult<StandingsView> {
        let tags = self.sim.standings_clinch_tags();
        match mode {
            "league" | "" => {
                let rows = self
                    .sim
                    .standings_rows()
                    .into_iter()
                    .map(|row| self.entry_for(row, &tags))
                    .collect();
                Ok(StandingsView::Rows(rows))
            }
            "conference" | "division" => {
                let Some(value) = value else {
                    return Err(SimError::InvalidArgument(format!(
                        "{} value is required",
                        mode
                    )));
                };
                let rows = self
                    .sim
                    .standings_rows()
                    .into_iter()
                    .filter(|row| {
                        if mode == "conference" {
                            row.conference == value
                        } else {
                            row.division == value
                        }
                    })
                    .map(|row| self.entry_for(row, &tags))
                    .collect();
                Ok(StandingsView::Rows(rows))
            }
            "wildcard" => {
                let mut groups = BTreeMap::new();
                for conference in self.sim.get_conferences() {
                    let view = self.sim.wildcard_standings(&conference);
                    let to_entries = |records: Vec<&crate::league::table::TeamRecord>| {
                        records
                            .iter()
                            .map(|rec| {
                                let row = self
                                    .sim
                                    .standings_rows()
                                    .into_iter()
                                    .find(|row| row.team == rec.team_name)
                                    .expect("standing row exists");
                                self.entry_for(row, &tags)
                            })
                            .collect::<Vec<_>>()
                    };
                    let group = WildcardGroup {
                        division_leaders: view
                            .division_leaders
                            .into_iter()
                            .map(|(division, rows)| (division, to_entries(rows)))
                            .collect(),
                        wildcard: to_entries(view.wildcard),
                    };
                    groups.insert(conference, group);
                }
                Ok(StandingsView::Wildcard(groups))
            }
            other => Err(SimError::InvalidArgument(format!(
                "unknown standings mode '{}'",
                other
            ))),
        }
    }

    /// Healthy count the user roster would have after tomorrow's recovery
    /// tick returns players whose timer expires.
    fn projected_active_count_next_day(&self) -> usize {
        let Some(team) = self.sim.get_team(self.user_team_name()) else {
            return 0;
        };
        team.roster
            .iter()
            .filter(|p| !p.is_injured() || p.health.injured_games_remaining == 1)
            .count()
    }

    /// Demote the lowest-value healthy skaters until the projected roster
    /// complies. Never touches the last healthy goalie.
    fn auto_send_down_for_projected_return(&mut self, demotions_needed: usize) {
        let team_name = self.user_team_name().to_string();
        for _ in 0..demotions_needed {
            let Some(team) = self.sim.get_team(&team_name) else {
                return;
            };
            let healthy_goalies = team.healthy_goalie_count();
            // Scratches go down before anyone in the lineup.
            let candidate = team
                .roster
                .iter()
                .filter(|p| !p.is_injured())
                .filter(|p| !p.position.is_goalie() || healthy_goalies > 1)
                .min_by(|a, b| {
                    team.is_dressed(a)
                        .cmp(&team.is_dressed(b))
                        .then(a.overall().total_cmp(&b.overall()))
                        .then(b.age.cmp(&a.age))
                })
                .map(|p| p.name.clone());
            let Some(candidate) = candidate else {
                return;
            };
            if self.sim.demote_roster_player(&team_name, &candidate).is_ok() {
                self.push_news(
                    "transaction",
                    format!("Transaction: {} reassigned {}", team_name, candidate),
                    format!("{} sent down to stay cap-compliant for returning players.", candidate),
                    &team_name,
                );
            } else {
                return;
            }
        }
    }

    /// Advance exactly one game day, one playoff reveal day, or the full
    /// offseason, whichever the calendar calls for.
    pub fn advance(&mut self) -> SimResult<AdvanceOutcome> {
        if self.user_team_name().is_empty() {
            return Err(SimError::NoUserTeam);
        }

        if !self.sim.is_complete() {
            let mut projected = self.projected_active_count_next_day();
            if projected > MAX_ROSTER_SIZE && self.runtime.auto_injury_moves {
                self.auto_send_down_for_projected_return(projected - MAX_ROSTER_SIZE);
                projected = self.projected_active_count_next_day();
            }
            if projected > MAX_ROSTER_SIZE {
                return Err(SimError::RosterNonCompliant(format!(
                    "projected active roster is {}/{} for the next game day",
                    projected, MAX_ROSTER_SIZE
                )));
            }

            let day_num = self.sim.current_day();
            let user_team = self.runtime.user_team_name.clone();
            let options = AdvanceOptions {
                user_team_name: Some(user_team.as_str()),
                user_strategy: self.runtime.user_strategy,
                use_user_lines: self.runtime.override_coach_for_lines,
                use_user_strategy: self.runtime.override_coach_for_strategy,
            };
            let results = self.sim.simulate_next_day(&options)?;

            self.injury_news_from_results(day_num, &results);
            let gm_moves = self.cpu_gm_review(day_num);
            self.runtime.push_day_results(DayResults {
                season: self.sim.season_number,
                day: day_num,
                phase: String::from("regular"),
                round: String::new(),
                games: results.clone(),
                playoff_games: Vec::new(),
            });
            self.autosave();
            return Ok(AdvanceOutcome::Regular {
                season: self.sim.season_number,
                day: day_num,
                total_days: self.sim.total_days() as u32,
                games: results,
                gm_moves,
                season_complete: self.sim.is_complete(),
            });
        }

        if !self.sim.has_playoff_session() {
            self.sim.start_playoffs()?;
        }
        if !self.sim.playoffs_finished() {
            let advance = self.sim.simulate_next_playoff_day()?;
            if advance.complete {
                let user_team = self.runtime.user_team_name.clone();
                self.sim.ensure_draft_session(Some(&user_team));
            }
            self.runtime.push_day_results(DayResults {
                season: self.sim.season_number,
                day: advance.day_number as u32,
                phase: String::from("playoffs"),
                round: advance.day.round.clone(),
                games: Vec::new(),
                playoff_games: advance.day.games.clone(),
            });
            self.autosave();
            return Ok(AdvanceOutcome::Playoffs {
                season: self.sim.season_number,
                day: advance.day_number as u32,
                total_days: advance.total_days as u32,
                round: advance.day.round,
                games: advance.day.games,
                playoffs_complete: advance.complete,
            });
        }

        let user_team = self.runtime.user_team_name.clone();
        let outcome = self.sim.finalize_offseason_after_playoffs(Some(&user_team))?;
        self.offseason_news(&outcome);
        self.save_all()?;
        Ok(AdvanceOutcome::Offseason {
            completed_season: outcome.completed_season,
            next_season: outcome.next_season,
            champion: outcome.champion,
        })
    }

    fn injury_news_from_results(&mut self, day_num: u32, results: &[GameResult]) {
        let mut items: Vec<NewsItem> = Vec::new();
        for result in results {
            for injury in result.home_injuries.iter().chain(&result.away_injuries) {
                items.push(NewsItem {
                    season: self.sim.season_number,
                    day: day_num,
                    kind: String::from("injury"),
                    headline: format!(
                        "Injury: {} ({}, {})",
                        injury.player.name, injury.player.position, injury.team
                    ),
                    details: format!(
                        "{} | Expected out {} games.",
                        injury.injury, injury.games_out
                    ),
                    team: injury.team.clone(),
                });
            }
        }
        for item in items {
            self.runtime.push_news(item);
        }
    }

    fn offseason_news(&mut self, outcome: &OffseasonOutcome) {
        let completed = outcome.completed_season;
        self.push_news(
            "season",
            format!("{} win the Founders Cup", outcome.champion),
            format!("Season {} is in the books.", completed),
            &outcome.champion,
        );
        for (team, picks) in &outcome.report.drafted {
            if let Some(first) = picks.first() {
                self.push_news(
                    "draft",
                    format!("Draft: {} select {}", team, first),
                    format!("Season {} entry draft.", completed + 1),
                    team,
                );
            }
        }
        for retirement in &outcome.retired_coaches {
            self.push_news(
                "coach",
                format!("{} name {} head coach", retirement.team, retirement.new_name),
                format!(
                    "{} retired at {} after the season.",
                    retirement.old_name, retirement.old_age
                ),
                &retirement.team,
            );
        }
        for event in &outcome.report.retired_numbers {
            self.push_news(
                "banner",
                format!("{} retire #{}", event.team, event.number),
                format!("Honouring {}.", event.player),
                &event.team,
            );
        }
        for signing in outcome.free_agency.signings.iter().take(8) {
            self.push_news(
                "signing",
                format!("{} sign {}", signing.team, signing.player),
                format!(
                    "{} years at {:.2}M per season.",
                    signing.years, signing.cap_hit
                ),
                &signing.team,
            );
        }
    }

    /// Weekly CPU GM review: hot-seat coach firings plus up to two 1-for-1
    /// trades across the rest of the league.
    fn cpu_gm_review(&mut self, day: u32) -> Vec<GmMove> {
        if day < CPU_REVIEW_FIRST_DAY || day % 7 != 0 {
            return Vec::new();
        }
        let prefs = self.runtime.trade_preferences_by_team.clone();
        let user_team = self.runtime.user_team_name.clone();
        let mut moves: Vec<GmMove> = Vec::new();

        let team_names: Vec<String> = self
            .sim
            .teams
            .iter()
            .map(|t| t.name.clone())
            .filter(|name| *name != user_team)
            .collect();

        for team_name in &team_names {
            let reading = {
                let desk = TradeDesk::new(&self.sim, &prefs, Some(user_team.as_str()));
                desk.hot_seat_reading(team_name)
            };
            let Some(reading) = reading else {
                continue;
            };
            if self.sim.rng.random::<f32>() >= reading.fire_probability {
                continue;
            }
            let Ok(change) = self.replace_team_coach_from_pool(team_name) else {
                continue;
            };
            let record_line = self
                .sim
                .records
                .get(team_name)
                .map(|r| format!("{}-{}-{}", r.wins, r.losses, r.ot_losses))
                .unwrap_or_default();
            self.push_news(
                "coach",
                format!("{} fire {}", team_name, change.old_name),
                format!("{} ({}) takes over behind the bench.", change.new_name, record_line),
                team_name,
            );
            moves.push(GmMove::CoachChange {
                team: team_name.clone(),
                old_coach: change.old_name,
                new_coach: change.new_name,
                old_rating: change.old_rating,
                new_rating: change.new_rating,
                reason: format!("CPU GM move on day {} ({})", day, record_line),
            });
        }

        // Limited weekly trade window with sanity checks on both nets.
        let mut buyers: Vec<String> = team_names.clone();
        buyers.sort_by(|a, b| {
            self.sim
                .team_point_pct(a)
                .total_cmp(&self.sim.team_point_pct(b))
        });
        let mut attempted: BTreeSet<String> = BTreeSet::new();
        let mut trade_count = 0usize;

        for buyer in buyers {
            if trade_count >= CPU_TRADES_PER_WEEK {
                break;
            }
            if attempted.contains(&buyer) {
                continue;
            }
            let buyer_gp = self
                .sim
                .records
                .get(&buyer)
                .map(|r| r.games_played())
                .unwrap_or(0);
            if buyer_gp < 18 {
                continue;
            }

            let best = {
                let desk = TradeDesk::new(&self.sim, &prefs, Some(user_team.as_str()));
                let buyer_team = self.sim.get_team(&buyer).expect("buyer exists");
                let mut best: Option<(String, crate::trades::TradePair, f32)> = None;
                for seller in &team_names {
                    if *seller == buyer || attempted.contains(seller) {
                        continue;
                    }
                    let seller_team = self.sim.get_team(seller).expect("seller exists");
                    let offer = desk
                        .find_balanced_trade_offer(buyer_team, seller_team)
                        .or_else(|| desk.find_cpu_trade_offer_relaxed(buyer_team, seller_team));
                    let Some(pair) = offer else {
                        continue;
                    };
                    let quality =
                        pair.requester_eval.net_value + pair.partner_eval.net_value;
                    if best.as_ref().is_none_or(|(_, _, prev)| quality > *prev) {
                        best = Some((seller.clone(), pair, quality));
                    }
                }
                best
            };

            let Some((seller, pair, _)) = best else {
                continue;
            };
            if self
                .sim
                .execute_one_for_one_trade(&buyer, &seller, &pair.give, &pair.receive)
                .is_err()
            {
                continue;
            }
            self.push_news(
                "trade",
                format!("Trade: {} acquire {} from {}", buyer, pair.receive, seller),
                format!("{} send {} the other way.", buyer, pair.give),
                "",
            );
            moves.push(GmMove::Trade {
                buyer: buyer.clone(),
                seller: seller.clone(),
                buyer_gets: pair.receive.clone(),
                seller_gets: pair.give.clone(),
                buyer_net: pair.requester_eval.net_value,
                seller_net: pair.partner_eval.net_value,
            });
            attempted.insert(buyer);
            attempted.insert(seller);
            trade_count += 1;
        }

        moves
    }

    /// Hires come from the standing candidate pool: the six most decorated
    /// names, randomized, so firings do not always land the same retread.
    pub(crate) fn replace_team_coach_from_pool(
        &mut self,
        team_name: &str,
    ) -> SimResult<crate::league::coaches::CoachChange> {
        self.ensure_coach_pool_depth();
        let mut shortlist: Vec<usize> = (0..self.runtime.coach_pool.len()).collect();
        shortlist.sort_by(|a, b| {
            let ca = &self.runtime.coach_pool[*a];
            let cb = &self.runtime.coach_pool[*b];
            cb.cups
                .cmp(&ca.cups)
                .then(cb.rating.total_cmp(&ca.rating))
        });
        shortlist.truncate(6);
        if shortlist.is_empty() {
            // Pool exhausted; generate directly.
            return self.sim.fire_coach(team_name);
        }
        let chosen_idx = shortlist[self.sim.rng.random_range(0..shortlist.len())];
        let candidate = self.runtime.coach_pool.remove(chosen_idx);

        let Some(team_idx) = self.sim.teams.iter().position(|t| t.name == team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        let point_pct = self.sim.team_point_pct(team_name);
        let (old_name, old_rating, old_age) = {
            let coach = &self.sim.teams[team_idx].coach;
            (coach.name.clone(), coach.rating, coach.age)
        };

        // The outgoing coach goes back on the market.
        self.runtime.coach_pool.push(CoachCandidate {
            name: old_name.clone(),
            age: old_age,
            rating: old_rating,
            style: self.sim.teams[team_idx].coach.style,
            offense: self.sim.teams[team_idx].coach.offense,
            defense: self.sim.teams[team_idx].coach.defense,
            goalie_dev: self.sim.teams[team_idx].coach.goalie_dev,
            cups: 0,
            seasons: self.sim.teams[team_idx].coach.tenure_seasons,
        });

        let team = &mut self.sim.teams[team_idx];
        let coach = &mut team.coach;
        coach.name = candidate.name;
        coach.age = candidate.age;
        coach.rating = candidate.rating;
        coach.style = candidate.style;
        coach.offense = candidate.offense;
        coach.defense = candidate.defense;
        coach.goalie_dev = candidate.goalie_dev;
        coach.tenure_seasons = 0;
        coach.changes_recent = (coach.changes_recent.max(0.0) + 1.0).min(5.0);
        coach.honeymoon_games_remaining = crate::club::coach::HONEYMOON_GAMES;
        let change = crate::league::coaches::CoachChange {
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
        info!("{} hired {} from the candidate pool", team_name, change.new_name);
        Ok(change)
    }

    pub(crate) fn ensure_coach_pool_depth(&mut self) {
        while self.runtime.coach_pool.len() < COACH_POOL_MIN {
            let name = self.sim.names.next_coach_name();
            let rating = self.sim.generate_coach_rating(2.1, 4.7);
            let style = self.sim.rating_to_style(rating);
            let candidate = CoachCandidate {
                name,
                age: self.sim.rng.random_range(40..=61),
                rating,
                style,
                offense: self.sim.generate_coach_rating(2.0, 4.9),
                defense: self.sim.generate_coach_rating(2.0, 4.9),
                goalie_dev: self.sim.generate_coach_rating(2.0, 4.9),
                cups: if self.sim.rng.random::<f32>() < 0.12 { 1 } else { 0 },
                seasons: self.sim.rng.random_range(0..14),
            };
            self.runtime.coach_pool.push(candidate);
        }
    }

    pub fn coach_candidates(&self) -> &[CoachCandidate] {
        &self.runtime.coach_pool
    }

    pub fn fire_coach(&mut self, team_name: &str) -> SimResult<crate::league::coaches::CoachChange> {
        self.require_user_team(team_name)?;
        let change = self.replace_team_coach_from_pool(team_name)?;
        self.push_news(
            "coach",
            format!("{} fire {}", team_name, change.old_name),
            format!("{} takes over behind the bench.", change.new_name),
            team_name,
        );
        self.autosave();
        Ok(change)
    }

    /// Wipe all persisted files and re-seed a fresh world at season one.
    pub fn reset(&mut self) -> SimResult<MetaView> {
        self.store.wipe().map_err(SimError::Persistence)?;
        let teams = (self.world_factory)(self.seed);
        let settings = crate::league::league::SimulatorSettings {
            games_per_matchup: self.sim.games_per_matchup,
            calendar_density: self.sim.calendar_density,
            prime_age_min: self.sim.prime_age_min,
            prime_age_max: self.sim.prime_age_max,
            first_season_year: self.sim.first_season_year,
        };
        self.sim = LeagueSimulator::new(teams, settings, self.seed);
        self.runtime = RuntimeState {
            user_team_name: self
                .sim
                .teams
                .first()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            ..Default::default()
        };
        self.last_load_error = String::new();
        self.ensure_coach_pool_depth();
        self.save_all()?;
        Ok(self.meta())
    }

    pub fn set_user_team(&mut self, team_name: &str) -> SimResult<MetaView> {
        if self.sim.get_team(team_name).is_none() {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        }
        self.runtime.user_team_name = team_name.to_string();
        self.autosave();
        Ok(self.meta())
    }

    pub fn set_strategy(
        &mut self,
        strategy: CoachStyle,
        override_coach: Option<bool>,
    ) -> SimResult<MetaView> {
        self.runtime.user_strategy = strategy;
        if let Some(flag) = override_coach {
            self.runtime.override_coach_for_strategy = flag;
        }
        self.autosave();
        Ok(self.meta())
    }

    pub fn set_control_overrides(
        &mut self,
        lines: bool,
        strategy: bool,
        auto_injury_moves: Option<bool>,
    ) -> MetaView {
        self.runtime.override_coach_for_lines = lines;
        self.runtime.override_coach_for_strategy = strategy;
        if let Some(flag) = auto_injury_moves {
            self.runtime.auto_injury_moves = flag;
        }
        self.autosave();
        self.meta()
    }

    pub fn set_game_mode(&mut self, mode: GameMode) -> MetaView {
        self.runtime.game_mode = mode;
        self.autosave();
        self.meta()
    }

    pub fn promote_minor_player(&mut self, team_name: &str, player_name: &str) -> SimResult<()> {
        self.require_user_team(team_name)?;
        self.sim.promote_minor_player(team_name, player_name, "")?;
        self.autosave();
        Ok(())
    }

    pub fn demote_roster_player(&mut self, team_name: &str, player_name: &str) -> SimResult<()> {
        self.require_user_team(team_name)?;
        self.sim.demote_roster_player(team_name, player_name)?;
        self.autosave();
        Ok(())
    }

    pub fn sign_free_agent(
        &mut self,
        team_name: &str,
        player_name: &str,
        years: Option<u32>,
        cap_hit: Option<f64>,
    ) -> SimResult<SigningOutcome> {
        self.require_user_team(team_name)?;
        let outcome = self.sim.sign_free_agent(team_name, player_name, years, cap_hit)?;
        self.push_news(
            "signing",
            format!("{} sign {}", outcome.team, outcome.player),
            format!("{} years at {:.2}M per season.", outcome.years, outcome.cap_hit),
            &outcome.team.clone(),
        );
        self.autosave();
        Ok(outcome)
    }

    pub fn extend_contract(
        &mut self,
        team_name: &str,
        player_name: &str,
        years: Option<u32>,
        cap_hit: Option<f64>,
    ) -> SimResult<SigningOutcome> {
        self.require_user_team(team_name)?;
        let outcome = self
            .sim
            .extend_player_contract(team_name, player_name, years, cap_hit)?;
        self.autosave();
        Ok(outcome)
    }

    pub fn set_lines(
        &mut self,
        team_name: &str,
        assignments: &BTreeMap<String, String>,
    ) -> SimResult<f32> {
        self.require_user_team(team_name)?;
        let Some(team) = self.sim.get_team_mut(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        team.set_line_assignments(assignments);
        let penalty = team.lineup_position_penalty();
        self.autosave();
        Ok(penalty)
    }

    pub fn auto_set_best_lines(&mut self, team_name: &str) -> SimResult<f32> {
        self.require_user_team(team_name)?;
        let Some(team) = self.sim.get_team_mut(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        team.set_default_lineup();
        let penalty = team.lineup_position_penalty();
        self.autosave();
        Ok(penalty)
    }

    fn validate_trade_players(
        &self,
        user_team: &Team,
        partner_team: &Team,
        give_player: &str,
        receive_player: &str,
    ) -> SimResult<()> {
        let desk = TradeDesk::new(
            &self.sim,
            &self.runtime.trade_preferences_by_team,
            Some(self.user_team_name()),
        );
        let Some(give) = user_team.player_by_name(give_player) else {
            return Err(SimError::PlayerNotFound(give_player.to_string()));
        };
        let Some(receive) = partner_team.player_by_name(receive_player) else {
            return Err(SimError::PlayerNotFound(receive_player.to_string()));
        };
        if desk.preference_for(user_team, give_player) == TradePreference::Untouchable {
            return Err(SimError::PlayerUntouchable(give_player.to_string()));
        }
        if desk.preference_for(partner_team, receive_player) == TradePreference::Untouchable {
            return Err(SimError::PartnerPlayerUntouchable(receive_player.to_string()));
        }
        if give.is_injured() || receive.is_injured() {
            return Err(SimError::InjuredPlayerInTrade(if give.is_injured() {
                give_player.to_string()
            } else {
                receive_player.to_string()
            }));
        }
        if give.position.is_goalie() && user_team.healthy_goalie_count() <= 1 {
            return Err(SimError::CannotTradeLastGoalie(user_team.name.clone()));
        }
        if receive.position.is_goalie() && partner_team.healthy_goalie_count() <= 1 {
            return Err(SimError::PartnerCannotTradeLastGoalie(
                partner_team.name.clone(),
            ));
        }
        Ok(())
    }

    pub fn evaluate_trade(
        &self,
        team_name: &str,
        partner_team: &str,
        give_player: &str,
        receive_player: &str,
    ) -> SimResult<TradeInsight> {
        let Some(user_team) = self.sim.get_team(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        let Some(partner) = self.sim.get_team(partner_team) else {
            return Err(SimError::TeamNotFound(partner_team.to_string()));
        };
        let Some(give) = user_team.player_by_name(give_player) else {
            return Err(SimError::PlayerNotFound(give_player.to_string()));
        };
        let Some(receive) = partner.player_by_name(receive_player) else {
            return Err(SimError::PlayerNotFound(receive_player.to_string()));
        };
        let desk = TradeDesk::new(
            &self.sim,
            &self.runtime.trade_preferences_by_team,
            Some(self.user_team_name()),
        );
        Ok(desk.trade_offer_insight(user_team, partner, give, receive))
    }

    /// Commit a 1-for-1 swap iff both sides' acceptance rules pass;
    /// otherwise state is untouched and the caller learns why.
    pub fn propose_trade(
        &mut self,
        team_name: &str,
        partner_team: &str,
        give_player: &str,
        receive_player: &str,
    ) -> SimResult<TradeOutcome> {
        self.require_user_team(team_name)?;
        let Some(user_team) = self.sim.get_team(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        let Some(partner) = self.sim.get_team(partner_team) else {
            return Err(SimError::TeamNotFound(partner_team.to_string()));
        };
        self.validate_trade_players(user_team, partner, give_player, receive_player)?;

        let (user_eval, partner_eval) = {
            let desk = TradeDesk::new(
                &self.sim,
                &self.runtime.trade_preferences_by_team,
                Some(self.user_team_name()),
            );
            let give = user_team.player_by_name(give_player).expect("validated");
            let receive = partner.player_by_name(receive_player).expect("validated");
            let (user_accepts, user_eval) = desk.is_trade_acceptable(user_team, give, receive);
            let (partner_accepts, partner_eval) =
                desk.is_trade_acceptable(partner, receive, give);
            if !user_accepts {
                return Err(SimError::BadUserOffer(format!(
                    "net {:+.2} is below your floor {:+.2}",
                    user_eval.net_value, user_eval.min_net
                )));
            }
            if !partner_accepts {
                return Err(SimError::PartnerRejected(format!(
                    "net {:+.2} is below {}'s floor {:+.2}",
                    partner_eval.net_value, partner_team, partner_eval.min_net
                )));
            }
            (user_eval, partner_eval)
        };

        self.sim
            .execute_one_for_one_trade(team_name, partner_team, give_player, receive_player)?;
        self.push_news(
            "trade",
            format!(
                "Trade: {} acquire {} from {}",
                team_name, receive_player, partner_team
            ),
            format!("{} send {} the other way.", team_name, give_player),
            "",
        );
        self.autosave();
        Ok(TradeOutcome {
            team: team_name.to_string(),
            partner_team: partner_team.to_string(),
            give_player: give_player.to_string(),
            receive_player: receive_player.to_string(),
            user_eval,
            partner_eval,
        })
    }

    pub fn trade_block(&self, team_name: &str) -> SimResult<Vec<String>> {
        let Some(team) = self.sim.get_team(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        let desk = TradeDesk::new(
            &self.sim,
            &self.runtime.trade_preferences_by_team,
            Some(self.user_team_name()),
        );
        Ok(desk.trade_block_names(team))
    }

    pub fn update_trade_block(
        &mut self,
        team_name: &str,
        update: &TradeBlockUpdate,
    ) -> SimResult<Vec<String>> {
        self.require_user_team(team_name)?;
        let Some(team) = self.sim.get_team(team_name) else {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        };
        if team.player_by_name(&update.player_name).is_none() {
            return Err(SimError::PlayerNotFound(update.player_name.clone()));
        }

        let prefs = self
            .runtime
            .trade_preferences_by_team
            .entry(team_name.to_string())
            .or_default();
        let current = prefs
            .get(&update.player_name)
            .copied()
            .unwrap_or(TradePreference::Available);
        let next = match update.action.as_str() {
            "toggle" => {
                if current == TradePreference::Shop {
                    TradePreference::Available
                } else {
                    TradePreference::Shop
                }
            }
            action => action
                .parse::<TradePreference>()
                .map_err(SimError::InvalidArgument)?,
        };
        if next == TradePreference::Available {
            prefs.remove(&update.player_name);
        } else {
            prefs.insert(update.player_name.clone(), next);
        }
        self.autosave();
        self.trade_block(team_name)
    }

    pub fn team_needs(&self, team_name: &str) -> SimResult<TeamNeeds> {
        if self.sim.get_team(team_name).is_none() {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        }
        Ok(self.sim.get_team_needs(team_name))
    }

    pub fn set_team_needs(
        &mut self,
        team_name: &str,
        mode: NeedsMode,
        scores: Option<NeedScores>,
    ) -> SimResult<TeamNeeds> {
        if self.sim.get_team(team_name).is_none() {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        }
        let needs = self.sim.set_team_needs_override(team_name, mode, scores);
        self.autosave();
        Ok(needs)
    }

    pub fn set_draft_focus(&mut self, team_name: &str, focus: DraftFocus) -> SimResult<DraftFocus> {
        if self.sim.get_team(team_name).is_none() {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        }
        let focus = self.sim.set_draft_focus(team_name, focus);
        self.autosave();
        Ok(focus)
    }

    pub fn draft_state(&self, team_name: &str) -> SimResult<DraftStateView> {
        if self.sim.get_team(team_name).is_none() {
            return Err(SimError::TeamNotFound(team_name.to_string()));
        }
        let Some(session) = &self.sim.draft_session else {
            return Ok(DraftStateView {
                active: false,
                season: self.sim.season_number,
                current_pick: 0,
                total_picks: 0,
                on_the_clock: None,
                user_is_on_the_clock: false,
                order: Vec::new(),
                picks: Vec::new(),
                prospects: Vec::new(),
                user_board: Vec::new(),
            });
        };
        Ok(DraftStateView {
            active: session.active(),
            season: session.season,
            current_pick: session.current_pick as u32 + 1,
            total_picks: session.order.len() as u32,
            on_the_clock: session.on_the_clock().map(|s| s.to_string()),
            user_is_on_the_clock: session.user_is_on_the_clock(),
            order: session.order.clone(),
            picks: session.picks.clone(),
            prospects: session.prospects.clone(),
            user_board: session.user_board.clone(),
        })
    }

    pub fn make_draft_pick(
        &mut self,
        team_name: &str,
        prospect_id: &str,
    ) -> SimResult<DraftSessionPick> {
        self.require_user_team(team_name)?;
        let pick = self.sim.make_user_draft_pick(team_name, prospect_id)?;
        self.autosave();
        Ok(pick)
    }

    pub fn sim_draft_to_user_pick(&mut self, team_name: &str) -> SimResult<DraftStateView> {
        self.require_user_team(team_name)?;
        self.sim.sim_draft_to_user_pick(team_name)?;
        self.autosave();
        self.draft_state(team_name)
    }

    pub fn set_draft_board(
        &mut self,
        team_name: &str,
        prospect_ids: Vec<String>,
    ) -> SimResult<Vec<String>> {
        self.require_user_team(team_name)?;
        let board = self.sim.set_draft_board(team_name, prospect_ids)?;
        self.autosave();
        Ok(board)
    }

    pub fn news(&self, limit: usize) -> Vec<NewsItem> {
        self.runtime.news_feed.iter().take(limit).cloned().collect()
    }

    pub fn daily_results(&self) -> &[DayResults] {
        &self.runtime.daily_results
    }
}
