use crate::club::player::{ContractOffer, Player};
use crate::club::team::MAX_ROSTER_SIZE;
use crate::league::history::{FreeAgencyReport, FreeAgentRow, SigningRow};
use crate::league::league::LeagueSimulator;
use crate::league::needs::team_cap_space;
use log::info;
use rand::Rng;
use rand::RngExt;
use std::collections::BTreeSet;

const MAX_FA_ROUNDS: u32 = 10;

struct MarketOffer {
    team: String,
    player_id: String,
    offer: ContractOffer,
    score: f64,
}

impl LeagueSimulator {
    /// Offseason step 6: decrement every contract, re-sign or release the
    /// expiring class, then clear the market over up to ten CPU bid rounds.
    /// The user team's own expiring players are reserved, never auto-signed.
    pub(crate) fn run_contract_and_free_agency(
        &mut self,
        user_team_name: Option<&str>,
    ) -> FreeAgencyReport {
        let mut re_signings: Vec<SigningRow> = Vec::new();
        let mut signings: Vec<SigningRow> = Vec::new();
        let mut protected_ids: BTreeSet<String> = BTreeSet::new();
        let mut market: Vec<Player> = Vec::new();

        // Carry over anyone still unsigned from last summer.
        market.append(&mut self.free_agents);

        for team_idx in 0..self.teams.len() {
            let team_name = self.teams[team_idx].name.clone();
            let is_user_team = user_team_name == Some(team_name.as_str());

            let names: Vec<String> = self.teams[team_idx]
                .organization_players()
                .map(|p| p.name.clone())
                .collect();
            for player_name in names {
                let expiring = {
                    let player = self.teams[team_idx]
                        .organization_players_mut()
                        .find(|p| p.name == player_name)
                        .expect("player present");
                    player.contract.years_left = player.contract.years_left.saturating_sub(1);
                    player.contract.years_left == 0
                };
                if !expiring {
                    continue;
                }

                let (value, age, offer) = {
                    let player = self.teams[team_idx]
                        .organization_players()
                        .find(|p| p.name == player_name)
                        .expect("player present");
                    (player.overall(), player.age, ContractOffer::estimate(player))
                };
                let age_factor = ((34.0 - age as f32) / 12.0).clamp(0.0, 1.0);
                let retain_chance = (0.34 + value * 0.12 + age_factor * 0.22).min(0.92);

                if !is_user_team && self.rng.random::<f32>() < retain_chance {
                    let player = self.teams[team_idx]
                        .organization_players_mut()
                        .find(|p| p.name == player_name)
                        .expect("player present");
                    player.contract.assign(&offer);
                    re_signings.push(SigningRow {
                        team: team_name.clone(),
                        player: player_name.clone(),
                        years: offer.years,
                        cap_hit: (offer.cap_hit * 100.0).round() / 100.0,
                        round: None,
                    });
                    continue;
                }

                // Walk to the open market.
                let team = &mut self.teams[team_idx];
                let mut player = if let Some(idx) =
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
                player.contract.free_agent_origin_team = team_name.clone();
                player.team_name = String::from("Free Agents");
                if is_user_team {
                    protected_ids.insert(player.id.clone());
                }
                market.push(player);
            }
        }

        market.sort_by(|a, b| {
            b.overall()
                .total_cmp(&a.overall())
                .then(b.age.cmp(&a.age))
                .then(a.name.cmp(&b.name))
        });

        let cpu_teams: Vec<String> = {
            let mut names: Vec<String> = self
                .teams
                .iter()
                .map(|t| t.name.clone())
                .filter(|name| user_team_name != Some(name.as_str()))
                .collect();
            names.sort();
            names
        };

        let mut fa_round = 0u32;
        while !market.is_empty() && fa_round < MAX_FA_ROUNDS {
            fa_round += 1;
            let mut offers: Vec<MarketOffer> = Vec::new();

            for team_name in &cpu_teams {
                let Some(team) = self.get_team(team_name) else {
                    continue;
                };
                if team.healthy_roster_count() >= MAX_ROSTER_SIZE {
                    continue;
                }
                let cap_space = team_cap_space(team);
                if cap_space < 0.65 {
                    continue;
                }

                let needs = self.get_team_needs(team_name);
                let scores = needs.scores;
                let active_f = team
                    .roster
                    .iter()
                    .filter(|p| p.position.is_forward() && !p.is_injured())
                    .count() as f32;
                let active_d = team
                    .roster
                    .iter()
                    .filter(|p| p.position.is_defense() && !p.is_injured())
                    .count() as f32;
                let active_g = team
                    .roster
                    .iter()
                    .filter(|p| p.position.is_goalie() && !p.is_injured())
                    .count() as f32;
                let score_f = ((12.0 - active_f).max(0.0) * 0.22)
                    .max(scores.top6_f)
                    .max(scores.depth_f);
                let score_d = ((6.0 - active_d).max(0.0) * 0.24)
                    .max(scores.top4_d)
                    .max(scores.depth_d);
                let score_g = ((2.0 - active_g).max(0.0) * 0.30).max(scores.starter_g);

                let mut wanted: Vec<(crate::club::player::PlayerPosition, f32)> = vec![
                    (crate::club::player::PlayerPosition::Center, score_f),
                    (crate::club::player::PlayerPosition::LeftWing, score_f),
                    (crate::club::player::PlayerPosition::RightWing, score_f),
                    (crate::club::player::PlayerPosition::Defense, score_d),
                    (crate::club::player::PlayerPosition::Goalie, score_g),
                ];
                wanted.sort_by(|a, b| b.1.total_cmp(&a.1));
                let mut wanted: Vec<_> = wanted
                    .into_iter()
                    .filter(|(_, weight)| *weight > 0.01)
                    .collect();
                if wanted.is_empty() {
                    wanted = vec![
                        (crate::club::player::PlayerPosition::Center, 0.0),
                        (crate::club::player::PlayerPosition::LeftWing, 0.0),
                        (crate::club::player::PlayerPosition::RightWing, 0.0),
                        (crate::club::player::PlayerPosition::Defense, 0.0),
                        (crate::club::player::PlayerPosition::Goalie, 0.0),
                    ];
                }

                // Cap-strapped clubs only shop the bargain bin.
                let cap_ceiling: Option<f64> = if scores.cap_relief >= 0.45 {
                    Some((2.2 - (scores.cap_relief as f64 - 0.45) * 2.0).max(0.75))
                } else {
                    None
                };

                let contender_bonus =
                    ((self.team_point_pct(team_name) - 0.5) * 0.6).clamp(0.0, 0.12) as f64;

                'positions: for (position, weight) in &wanted {
                    let mut candidates: Vec<&Player> = market
                        .iter()
                        .filter(|p| p.position == *position)
                        .filter(|p| !protected_ids.contains(&p.id))
                        .collect();
                    candidates.sort_by(|a, b| {
                        b.overall()
                            .total_cmp(&a.overall())
                            .then(a.age.cmp(&b.age))
                            .then(a.name.cmp(&b.name))
                    });
                    for candidate in candidates.into_iter().take(20) {
                        let offer = ContractOffer::estimate(candidate);
                        if cap_ceiling.is_some_and(|ceiling| offer.cap_hit > ceiling) {
                            continue;
                        }
                        if offer.cap_hit > cap_space {
                            continue;
                        }
                        let score = offer.cap_hit * offer.years as f64
                            + *weight as f64 * 0.65
                            + contender_bonus
                            + self.rng.random::<f64>() * 0.05;
                        offers.push(MarketOffer {
                            team: team_name.clone(),
                            player_id: candidate.id.clone(),
                            offer,
                            score,
                        });
                        break 'positions;
                    }
                }
            }

            if offers.is_empty() {
                break;
            }

            // Each player takes the best offer; one signing per club per round.
            let mut signed_teams: BTreeSet<String> = BTreeSet::new();
            let mut signed_players: BTreeSet<String> = BTreeSet::new();
            let mut player_ids: Vec<String> =
                offers.iter().map(|offer| offer.player_id.clone()).collect();
            player_ids.sort();
            player_ids.dedup();

            for player_id in player_ids {
                let best = offers
                    .iter()
                    .filter(|offer| offer.player_id == player_id)
                    .max_by(|a, b| a.score.total_cmp(&b.score))
                    .expect("at least one offer");
                if signed_teams.contains(&best.team) || signed_players.contains(&player_id) {
                    continue;
                }
                let Some(market_idx) = market.iter().position(|p| p.id == player_id) else {
                    continue;
                };
                let Some(team) = self.get_team(&best.team) else {
                    continue;
                };
                if team.healthy_roster_count() >= MAX_ROSTER_SIZE {
                    continue;
                }
                if best.offer.cap_hit > team_cap_space(team) {
                    continue;
                }

                let mut player = market.remove(market_idx);
                player.contract.assign(&best.offer);
                player.contract.free_agent_origin_team = String::new();
                player.team_name = best.team.clone();
                signings.push(SigningRow {
                    team: best.team.clone(),
                    player: player.name.clone(),
                    years: player.contract.years_left,
                    cap_hit: player.contract.cap_hit,
                    round: Some(fa_round),
                });
                info!(
                    "free agency round {}: {} signs {}",
                    fa_round, best.team, player.name
                );
                signed_teams.insert(best.team.clone());
                signed_players.insert(player_id);
                let team_name = best.team.clone();
                if let Some(team) = self.get_team_mut(&team_name) {
                    team.roster.push(player);
                }
            }
        }

        for team in self.teams.iter_mut() {
            team.assign_player_numbers();
            team.set_default_lineup();
        }

        let user_pending_re_signs: Vec<FreeAgentRow> = market
            .iter()
            .filter(|p| protected_ids.contains(&p.id))
            .map(|p| FreeAgentRow {
                name: p.name.clone(),
                position: p.position.as_str().to_string(),
                age: p.age,
                overall: (p.overall() * 100.0).round() / 100.0,
            })
            .collect();
        let remaining_free_agents: Vec<FreeAgentRow> = market
            .iter()
            .take(120)
            .map(|p| FreeAgentRow {
                name: p.name.clone(),
                position: p.position.as_str().to_string(),
                age: p.age,
                overall: (p.overall() * 100.0).round() / 100.0,
            })
            .collect();

        self.free_agents = market;

        FreeAgencyReport {
            re_signings,
            signings,
            user_pending_re_signs,
            remaining_free_agents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{PlayerPosition, PlayerSkills};
    use crate::club::team::Team;
    use crate::league::league::SimulatorSettings;

    fn league() -> LeagueSimulator {
        let mut teams = Vec::new();
        for name in ["Aurora", "Glaciers", "Harbor Kings", "Bay Comets"] {
            let mut team = Team::new(
                name,
                if name == "Aurora" || name == "Glaciers" { "North" } else { "East" },
                if name == "Aurora" || name == "Glaciers" { "Western" } else { "Eastern" },
            );
            for idx in 0..13 {
                let position = [
                    PlayerPosition::Center,
                    PlayerPosition::LeftWing,
                    PlayerPosition::RightWing,
                ][idx % 3];
                let mut player = Player::new(
                    name,
                    &format!("{} F{}", name, idx),
                    position,
                    PlayerSkills::default(),
                    24 + (idx as u8 % 8),
                    27,
                );
                player.contract.years_left = 2 + (idx as u32 % 3);
                team.roster.push(player);
            }
            for idx in 0..7 {
                let mut player = Player::new(
                    name,
                    &format!("{} D{}", name, idx),
                    PlayerPosition::Defense,
                    PlayerSkills::default(),
                    25,
                    27,
                );
                player.contract.years_left = 2;
                team.roster.push(player);
            }
            for idx in 0..2 {
                let mut player = Player::new(
                    name,
                    &format!("{} G{}", name, idx),
                    PlayerPosition::Goalie,
                    PlayerSkills {
                        goaltending: 3.2,
                        ..Default::default()
                    },
                    26,
                    29,
                );
                player.contract.years_left = 3;
                team.roster.push(player);
            }
            teams.push(team);
        }
        LeagueSimulator::new(teams, SimulatorSettings::default(), 55)
    }

    #[test]
    fn contracts_tick_down_every_offseason() {
        let mut sim = league();
        let before: Vec<u32> = sim.teams[0]
            .roster
            .iter()
            .map(|p| p.contract.years_left)
            .collect();
        sim.run_contract_and_free_agency(None);
        for (player, years_before) in sim.teams[0].roster.iter().zip(before) {
            // Re-signed players get fresh terms; everyone else lost a year.
            assert!(
                player.contract.years_left == years_before - 1
                    || player.contract.years_left >= 1
            );
        }
    }

    #[test]
    fn user_team_expiring_players_are_reserved() {
        let mut sim = league();
        // Force one Aurora player to expire this summer.
        sim.get_team_mut("Aurora")
            .unwrap()
            .player_by_name_mut("Aurora F0")
            .unwrap()
            .contract
            .years_left = 1;
        let report = sim.run_contract_and_free_agency(Some("Aurora"));
        assert!(
            report
                .user_pending_re_signs
                .iter()
                .any(|row| row.name == "Aurora F0")
        );
        // Reserved players remain in the pool, unsigned.
        assert!(sim.free_agents.iter().any(|p| p.name == "Aurora F0"));
        assert!(
            !report
                .signings
                .iter()
                .any(|row| row.player == "Aurora F0")
        );
    }

    #[test]
    fn signings_never_break_the_roster_cap() {
        let mut sim = league();
        for team in sim.teams.iter_mut() {
            for player in team.roster.iter_mut() {
                player.contract.years_left = 1;
            }
        }
        sim.run_contract_and_free_agency(None);
        for team in &sim.teams {
            assert!(team.healthy_roster_count() <= MAX_ROSTER_SIZE);
        }
    }
}
