use crate::club::player::PlayerPosition;
use crate::league::league::LeagueSimulator;
use crate::shared::error::{SimError, SimResult};
use log::info;
use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};

/// One scouted prospect in the draft class. Identity only: the numbered slot
/// a prospect is taken at decides the generated player's quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftProspect {
    pub id: String,
    pub name: String,
    pub position: PlayerPosition,
    pub country: String,
    pub country_code: String,
    pub age: u8,
    pub scout_rank: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSessionPick {
    pub team: String,
    pub overall: u32,
    pub prospect_id: String,
    pub name: String,
    pub position: PlayerPosition,
    pub country: String,
    pub country_code: String,
    pub age: u8,
}

/// Interactive Round-1 draft for the user team: CPU picks fast-forward
/// deterministically, the session pauses whenever the user is on the clock,
/// and a force-complete takes best-available for any unexercised user slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSession {
    pub season: u32,
    pub order: Vec<String>,
    pub current_pick: usize,
    pub user_team: String,
    pub prospects: Vec<DraftProspect>,
    pub picks: Vec<DraftSessionPick>,
    #[serde(default)]
    pub user_board: Vec<String>,
}

impl DraftSession {
    pub fn active(&self) -> bool {
        self.current_pick < self.order.len()
    }

    pub fn on_the_clock(&self) -> Option<&str> {
        self.order.get(self.current_pick).map(|s| s.as_str())
    }

    pub fn user_is_on_the_clock(&self) -> bool {
        self.on_the_clock() == Some(self.user_team.as_str())
    }
}

/// Identity handed to the real draft step for one already-made pick.
#[derive(Debug, Clone)]
pub(crate) struct SessionPickIdentity {
    pub name: String,
    pub position: PlayerPosition,
    pub country: String,
    pub country_code: String,
    pub age: u8,
}

impl LeagueSimulator {
    /// Build the draft session once the postseason wraps. No-op when one
    /// already exists for this season or no user team is registered.
    pub fn ensure_draft_session(&mut self, user_team: Option<&str>) {
        let Some(user_team) = user_team.filter(|name| self.get_team(name).is_some()) else {
            return;
        };
        if self
            .draft_session
            .as_ref()
            .is_some_and(|session| session.season == self.season_number)
        {
            return;
        }

        let order: Vec<String> = self
            .get_standings()
            .iter()
            .rev()
            .map(|rec| rec.team_name.clone())
            .collect();
        let class_size = (order.len() * 3).max(12);
        let mut prospects = Vec::with_capacity(class_size);
        for rank in 0..class_size {
            let position = match self.rng.random_range(0..20) {
                0..=3 => PlayerPosition::Center,
                4..=7 => PlayerPosition::LeftWing,
                8..=10 => PlayerPosition::RightWing,
                11..=16 => PlayerPosition::Defense,
                _ => PlayerPosition::Goalie,
            };
            let (country, country_code) = self.sample_country();
            let name = self.names.next_name();
            let id = self.next_player_id();
            let age = 18 + self.rng.random_range(0..3) as u8;
            prospects.push(DraftProspect {
                id,
                name,
                position,
                country,
                country_code,
                age,
                scout_rank: rank as u32 + 1,
            });
        }

        info!(
            "draft session opened for season {}: {} prospects, {} picks",
            self.season_number,
            prospects.len(),
            order.len()
        );
        self.draft_session = Some(DraftSession {
            season: self.season_number,
            order,
            current_pick: 0,
            user_team: user_team.to_string(),
            prospects,
            picks: Vec::new(),
            user_board: Vec::new(),
        });
    }

    /// CPU pick at the current slot: best remaining prospect at the team's
    /// chosen position, falling back to best available overall.
    fn cpu_draft_pick(&mut self) {
        let Some(session) = self.draft_session.as_ref() else {
            return;
        };
        let Some(team_name) = session.on_the_clock().map(|s| s.to_string()) else {
            return;
        };
        let wanted = self.choose_draft_position(&team_name);

        let session = self.draft_session.as_mut().expect("session present");
        let idx = session
            .prospects
            .iter()
            .position(|p| p.position == wanted)
            .unwrap_or(0);
        if session.prospects.is_empty() {
            session.current_pick = session.order.len();
            return;
        }
        let prospect = session.prospects.remove(idx);
        let overall = session.current_pick as u32 + 1;
        session.picks.push(DraftSessionPick {
            team: team_name,
            overall,
            prospect_id: prospect.id,
            name: prospect.name,
            position: prospect.position,
            country: prospect.country,
            country_code: prospect.country_code,
            age: prospect.age,
        });
        session.current_pick += 1;
    }

    /// Fast-forward CPU picks until the user is on the clock (or the round
    /// ends). Deterministic given the same state and seed.
    pub fn sim_draft_to_user_pick(&mut self, team_name: &str) -> SimResult<&DraftSession> {
        {
            let Some(session) = self.draft_session.as_ref() else {
                return Err(SimError::DraftNotActive);
            };
            if session.user_team != team_name {
                return Err(SimError::NotUserTeam(team_name.to_string()));
            }
        }
        loop {
            let session = self.draft_session.as_ref().expect("session present");
            if !session.active() || session.user_is_on_the_clock() {
                break;
            }
            self.cpu_draft_pick();
        }
        Ok(self.draft_session.as_ref().expect("session present"))
    }

    /// The user takes a specific prospect at their slot.
    pub fn make_user_draft_pick(
        &mut self,
        team_name: &str,
        prospect_id: &str,
    ) -> SimResult<DraftSessionPick> {
        {
            let Some(session) = self.draft_session.as_ref() else {
                return Err(SimError::DraftNotActive);
            };
            if session.user_team != team_name {
                return Err(SimError::NotUserTeam(team_name.to_string()));
            }
            if !session.active() {
                return Err(SimError::DraftNotActive);
            }
        }
        // CPU picks ahead of the user resolve implicitly.
        self.sim_draft_to_user_pick(team_name)?;

        let session = self.draft_session.as_mut().expect("session present");
        if !session.user_is_on_the_clock() {
            return Err(SimError::DraftNotActive);
        }
        let Some(idx) = session.prospects.iter().position(|p| p.id == prospect_id) else {
            return Err(SimError::ProspectNotFound(prospect_id.to_string()));
        };
        let prospect = session.prospects.remove(idx);
        let overall = session.current_pick as u32 + 1;
        let pick = DraftSessionPick {
            team: team_name.to_string(),
            overall,
            prospect_id: prospect.id,
            name: prospect.name,
            position: prospect.position,
            country: prospect.country,
            country_code: prospect.country_code,
            age: prospect.age,
        };
        session.picks.push(pick.clone());
        session.current_pick += 1;
        session.user_board.retain(|id| id != prospect_id);
        Ok(pick)
    }

    pub fn set_draft_board(&mut self, team_name: &str, prospect_ids: Vec<String>) -> SimResult<Vec<String>> {
        let Some(session) = self.draft_session.as_mut() else {
            return Err(SimError::DraftNotActive);
        };
        if session.user_team != team_name {
            return Err(SimError::NotUserTeam(team_name.to_string()));
        }
        let known: Vec<String> = prospect_ids
            .into_iter()
            .filter(|id| session.prospects.iter().any(|p| &p.id == id))
            .collect();
        session.user_board = known.clone();
        Ok(known)
    }

    /// Consume the session into per-slot identities aligned with the real
    /// draft order, auto-picking any remaining slots. Unexercised user slots
    /// run the saved board first, then best available.
    pub(crate) fn consume_draft_session(
        &mut self,
        order: &[String],
    ) -> Option<Vec<SessionPickIdentity>> {
        let matches = self
            .draft_session
            .as_ref()
            .map(|session| session.season == self.season_number && session.order == order)
            .unwrap_or(false);
        if !matches {
            self.draft_session = None;
            return None;
        }

        while self
            .draft_session
            .as_ref()
            .map(|session| session.active())
            .unwrap_or(false)
        {
            let user_turn = self
                .draft_session
                .as_ref()
                .map(|s| s.user_is_on_the_clock())
                .unwrap_or(false);
            if user_turn {
                let session = self.draft_session.as_mut().expect("session present");
                // Honor the user's saved board before falling back.
                let board_idx = session
                    .user_board
                    .iter()
                    .find_map(|id| session.prospects.iter().position(|p| &p.id == id));
                let idx = board_idx.unwrap_or(0);
                if session.prospects.is_empty() {
                    session.current_pick = session.order.len();
                    break;
                }
                let prospect = session.prospects.remove(idx);
                let overall = session.current_pick as u32 + 1;
                let team = session.user_team.clone();
                session.picks.push(DraftSessionPick {
                    team,
                    overall,
                    prospect_id: prospect.id,
                    name: prospect.name,
                    position: prospect.position,
                    country: prospect.country,
                    country_code: prospect.country_code,
                    age: prospect.age,
                });
                session.current_pick += 1;
            } else {
                self.cpu_draft_pick();
            }
        }

        let session = self.draft_session.take()?;
        let identities = order
            .iter()
            .enumerate()
            .map(|(idx, team)| {
                let pick = session
                    .picks
                    .iter()
                    .find(|pick| pick.overall as usize == idx + 1 && &pick.team == team);
                pick.map(|pick| SessionPickIdentity {
                    name: pick.name.clone(),
                    position: pick.position,
                    country: pick.country.clone(),
                    country_code: pick.country_code.clone(),
                    age: pick.age,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::team::Team;
    use crate::league::league::SimulatorSettings;

    fn league_with_user() -> LeagueSimulator {
        let teams = vec![
            Team::new("Aurora", "North", "Western"),
            Team::new("Glaciers", "North", "Western"),
            Team::new("Harbor Kings", "East", "Eastern"),
            Team::new("Bay Comets", "East", "Eastern"),
        ];
        LeagueSimulator::new(teams, SimulatorSettings::default(), 77)
    }

    #[test]
    fn session_pauses_on_user_pick() {
        let mut sim = league_with_user();
        sim.ensure_draft_session(Some("Aurora"));
        let state = sim.sim_draft_to_user_pick("Aurora").unwrap();
        assert!(state.user_is_on_the_clock());
        let picks_before_user = state.picks.len();
        assert_eq!(picks_before_user, state.current_pick);
    }

    #[test]
    fn user_pick_takes_the_requested_prospect() {
        let mut sim = league_with_user();
        sim.ensure_draft_session(Some("Aurora"));
        sim.sim_draft_to_user_pick("Aurora").unwrap();
        let target = sim
            .draft_session
            .as_ref()
            .unwrap()
            .prospects
            .iter()
            .find(|p| p.position == PlayerPosition::Defense)
            .unwrap()
            .id
            .clone();
        let pick = sim.make_user_draft_pick("Aurora", &target).unwrap();
        assert_eq!(pick.team, "Aurora");
        assert_eq!(pick.position, PlayerPosition::Defense);
    }

    #[test]
    fn consumed_session_feeds_the_real_draft() {
        let mut sim = league_with_user();
        sim.ensure_draft_session(Some("Aurora"));
        sim.sim_draft_to_user_pick("Aurora").unwrap();
        let first_prospect = sim.draft_session.as_ref().unwrap().prospects[0].clone();
        sim.make_user_draft_pick("Aurora", &first_prospect.id).unwrap();

        let (drafted, details) = sim.run_draft();
        assert!(drafted.contains_key("Aurora"));
        let aurora_rows = details.get("Aurora").unwrap();
        assert_eq!(aurora_rows[0].name, first_prospect.name);
        assert!(sim.draft_session.is_none());
    }

    #[test]
    fn wrong_team_cannot_drive_the_session() {
        let mut sim = league_with_user();
        sim.ensure_draft_session(Some("Aurora"));
        assert!(matches!(
            sim.sim_draft_to_user_pick("Glaciers"),
            Err(SimError::NotUserTeam(_))
        ));
    }
}
