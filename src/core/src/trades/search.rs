use crate::club::player::Player;
use crate::club::team::Team;
use crate::league::needs::need_matches_position;
use crate::trades::acceptance::TradeEval;
use crate::trades::preferences::{TradeDesk, TradePreference};

/// A matched 1-for-1 pair, from the requesting team's perspective.
#[derive(Debug, Clone)]
pub struct TradePair {
    pub give: String,
    pub receive: String,
    pub requester_eval: TradeEval,
    pub partner_eval: TradeEval,
}

impl TradeDesk<'_> {
    /// Healthy, movable players; never the last healthy goalie, never an
    /// untouchable. Outgoing pools lead with the shop list and the cheap end
    /// of the roster, incoming pools lead with the best players.
    pub fn eligible_trade_players<'t>(&self, team: &'t Team, outgoing: bool) -> Vec<&'t Player> {
        let healthy: Vec<&Player> = team.roster.iter().filter(|p| !p.is_injured()).collect();
        if healthy.is_empty() {
            return Vec::new();
        }
        let healthy_goalies = healthy.iter().filter(|p| p.position.is_goalie()).count();
        let prefs = self.team_preferences(team);

        let mut out: Vec<&Player> = healthy
            .into_iter()
            .filter(|p| prefs.get(&p.name) != Some(&TradePreference::Untouchable))
            .filter(|p| !p.position.is_goalie() || healthy_goalies > 1)
            .collect();

        if outgoing {
            out.sort_by(|a, b| {
                let shop_a = prefs.get(&a.name) == Some(&TradePreference::Shop);
                let shop_b = prefs.get(&b.name) == Some(&TradePreference::Shop);
                (!shop_a)
                    .cmp(&(!shop_b))
                    .then(a.overall().total_cmp(&b.overall()))
                    .then(b.age.cmp(&a.age))
            });
        } else {
            out.sort_by(|a, b| b.overall().total_cmp(&a.overall()));
        }
        out
    }

    /// Balanced offer search: enumerate a bounded give x receive grid with
    /// need-protection rules on both sides, keep the pair both teams accept
    /// that maximizes combined net, fairness, and need alignment.
    pub fn find_balanced_trade_offer(
        &self,
        requesting_team: &Team,
        partner_team: &Team,
    ) -> Option<TradePair> {
        let req_needs = self.sim.get_team_needs(&requesting_team.name);
        let req_primary = req_needs.primary_need.as_str();
        let seller_needs = self.sim.get_team_needs(&partner_team.name);
        let seller_primary = seller_needs.primary_need.as_str();

        let mut give_pool = self.eligible_trade_players(requesting_team, true);
        give_pool.truncate(12);
        // Favor sending from the less critical buckets first.
        give_pool.sort_by(|a, b| {
            let a_hits_need =
                !req_primary.is_empty() && need_matches_position(req_primary, a.position);
            let b_hits_need =
                !req_primary.is_empty() && need_matches_position(req_primary, b.position);
            a_hits_need
                .cmp(&b_hits_need)
                .then(a.overall().total_cmp(&b.overall()))
                .then(b.age.cmp(&a.age))
        });

        let mut receive_pool = self.eligible_trade_players(partner_team, false);
        receive_pool.truncate(14);
        if !req_primary.is_empty() {
            receive_pool.sort_by(|a, b| {
                let a_fits = need_matches_position(req_primary, a.position);
                let b_fits = need_matches_position(req_primary, b.position);
                b_fits.cmp(&a_fits)
            });
        }
        if give_pool.is_empty() || receive_pool.is_empty() {
            return None;
        }

        let mut best: Option<(TradePair, f32)> = None;
        for give_player in &give_pool {
            for receive_player in &receive_pool {
                if give_player.name == receive_player.name {
                    continue;
                }

                // Never worsen the requester's biggest need unless the
                // return is a clear same-need upgrade.
                if !req_primary.is_empty()
                    && need_matches_position(req_primary, give_player.position)
                {
                    if !need_matches_position(req_primary, receive_player.position) {
                        continue;
                    }
                    if receive_player.overall() <= give_player.overall() {
                        continue;
                    }
                }

                // Sellers should move surplus, not their own biggest hole.
                if !seller_primary.is_empty()
                    && need_matches_position(seller_primary, receive_player.position)
                    && seller_needs.scores.get(seller_primary) >= 0.55
                {
                    continue;
                }

                let (req_accept, req_eval) =
                    self.is_trade_acceptable(requesting_team, give_player, receive_player);
                if !req_accept {
                    continue;
                }
                let (part_accept, part_eval) =
                    self.is_trade_acceptable(partner_team, receive_player, give_player);
                if !part_accept {
                    continue;
                }

                let fairness = -(req_eval.net_value - part_eval.net_value).abs();
                let mut need_alignment = 0.0;
                if !req_primary.is_empty()
                    && need_matches_position(req_primary, receive_player.position)
                {
                    need_alignment += 0.18 + req_needs.scores.get(req_primary) * 0.14;
                }
                let quality =
                    req_eval.net_value + part_eval.net_value + fairness * 0.35 + need_alignment;

                if best.as_ref().is_none_or(|(_, prev)| quality > *prev) {
                    best = Some((
                        TradePair {
                            give: give_player.name.clone(),
                            receive: receive_player.name.clone(),
                            requester_eval: req_eval,
                            partner_eval: part_eval,
                        },
                        quality,
                    ));
                }
            }
        }
        best.map(|(pair, _)| pair)
    }

    /// Relaxed fallback for CPU-to-CPU deals: no need-alignment rules, just
    /// plausibility floors on both nets and the gap between them.
    pub fn find_cpu_trade_offer_relaxed(
        &self,
        requesting_team: &Team,
        partner_team: &Team,
    ) -> Option<TradePair> {
        let mut give_pool = self.eligible_trade_players(requesting_team, true);
        give_pool.truncate(10);
        let mut receive_pool = self.eligible_trade_players(partner_team, false);
        receive_pool.truncate(10);
        if give_pool.is_empty() || receive_pool.is_empty() {
            return None;
        }

        let mut best: Option<(TradePair, f32)> = None;
        for give_player in &give_pool {
            for receive_player in &receive_pool {
                if give_player.name == receive_player.name {
                    continue;
                }
                let req_eval =
                    self.evaluate_one_for_one(requesting_team, give_player, receive_player);
                let part_eval =
                    self.evaluate_one_for_one(partner_team, receive_player, give_player);
                if req_eval.net_value < -0.20 || part_eval.net_value < -0.20 {
                    continue;
                }
                if (req_eval.net_value - part_eval.net_value).abs() > 0.45 {
                    continue;
                }
                let quality = req_eval.net_value + part_eval.net_value
                    - (req_eval.net_value - part_eval.net_value).abs() * 0.35;
                if best.as_ref().is_none_or(|(_, prev)| quality > *prev) {
                    best = Some((
                        TradePair {
                            give: give_player.name.clone(),
                            receive: receive_player.name.clone(),
                            requester_eval: req_eval,
                            partner_eval: part_eval,
                        },
                        quality,
                    ));
                }
            }
        }
        best.map(|(pair, _)| pair)
    }

    /// Counter-offer variants for a rejected user proposal: ask the partner
    /// for a better return, or cheapen the user's side of the deal.
    pub fn counter_trade_offer(
        &self,
        team: &Team,
        partner: &Team,
        give_player: &Player,
        receive_player: &Player,
        upgrade_return: bool,
    ) -> Option<TradePair> {
        if upgrade_return {
            let mut candidates: Vec<&Player> = partner
                .roster
                .iter()
                .filter(|p| !p.is_injured() && p.name != receive_player.name)
                .collect();
            candidates.sort_by(|a, b| b.overall().total_cmp(&a.overall()));
            let partner_healthy_goalies = partner.healthy_goalie_count();
            for candidate in candidates {
                if candidate.overall() <= receive_player.overall() {
                    continue;
                }
                if candidate.position.is_goalie() && partner_healthy_goalies <= 1 {
                    continue;
                }
                let (accepts, part_eval) =
                    self.is_trade_acceptable(partner, candidate, give_player);
                if accepts {
                    let (_, req_eval) =
                        self.is_trade_acceptable(team, give_player, candidate);
                    return Some(TradePair {
                        give: give_player.name.clone(),
                        receive: candidate.name.clone(),
                        requester_eval: req_eval,
                        partner_eval: part_eval,
                    });
                }
            }
            return None;
        }

        let mut candidates: Vec<&Player> = team
            .roster
            .iter()
            .filter(|p| {
                !p.is_injured()
                    && p.name != give_player.name
                    && p.position == give_player.position
            })
            .collect();
        candidates.sort_by(|a, b| a.overall().total_cmp(&b.overall()));
        let team_healthy_goalies = team.healthy_goalie_count();
        for candidate in candidates {
            if candidate.overall() >= give_player.overall() {
                continue;
            }
            if candidate.position.is_goalie() && team_healthy_goalies <= 1 {
                continue;
            }
            let (accepts, part_eval) =
                self.is_trade_acceptable(partner, receive_player, candidate);
            if accepts {
                let (_, req_eval) = self.is_trade_acceptable(team, candidate, receive_player);
                return Some(TradePair {
                    give: candidate.name.clone(),
                    receive: receive_player.name.clone(),
                    requester_eval: req_eval,
                    partner_eval: part_eval,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{PlayerPosition, PlayerSkills};
    use crate::league::league::{LeagueSimulator, SimulatorSettings};
    use crate::trades::preferences::TradePreferencesByTeam;

    fn roster_player(team: &str, name: &str, position: PlayerPosition, skill: f32, age: u8) -> Player {
        Player::new(
            team,
            name,
            position,
            PlayerSkills {
                shooting: skill,
                playmaking: skill,
                defense: skill - 0.2,
                goaltending: if position.is_goalie() { skill } else { 0.3 },
                physical: skill - 0.2,
                durability: 3.0,
            },
            age,
            27,
        )
    }

    fn league() -> LeagueSimulator {
        let mut a = Team::new("Aurora", "North", "Western");
        let mut b = Team::new("Glaciers", "North", "Western");
        for idx in 0..10 {
            a.roster.push(roster_player(
                "Aurora",
                &format!("A F{}", idx),
                PlayerPosition::Center,
                2.4 + idx as f32 * 0.12,
                24 + (idx % 8) as u8,
            ));
            b.roster.push(roster_player(
                "Glaciers",
                &format!("B F{}", idx),
                PlayerPosition::Center,
                2.4 + idx as f32 * 0.12,
                24 + (idx % 8) as u8,
            ));
        }
        for idx in 0..4 {
            a.roster.push(roster_player(
                "Aurora",
                &format!("A D{}", idx),
                PlayerPosition::Defense,
                2.6,
                26,
            ));
            b.roster.push(roster_player(
                "Glaciers",
                &format!("B D{}", idx),
                PlayerPosition::Defense,
                2.6,
                26,
            ));
        }
        a.roster.push(roster_player("Aurora", "A G0", PlayerPosition::Goalie, 3.2, 27));
        b.roster.push(roster_player("Glaciers", "B G0", PlayerPosition::Goalie, 3.2, 27));
        LeagueSimulator::new(vec![a, b], SimulatorSettings::default(), 19)
    }

    #[test]
    fn last_healthy_goalie_is_never_eligible() {
        let sim = league();
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, Some("Aurora"));
        let team = sim.get_team("Aurora").unwrap();
        let outgoing = desk.eligible_trade_players(team, true);
        assert!(outgoing.iter().all(|p| p.name != "A G0"));
    }

    #[test]
    fn untouchables_are_excluded_from_pools() {
        let sim = league();
        let mut prefs = TradePreferencesByTeam::new();
        prefs
            .entry("Aurora".to_string())
            .or_default()
            .insert("A F9".to_string(), TradePreference::Untouchable);
        let desk = TradeDesk::new(&sim, &prefs, Some("Glaciers"));
        let team = sim.get_team("Aurora").unwrap();
        let incoming = desk.eligible_trade_players(team, false);
        assert!(incoming.iter().all(|p| p.name != "A F9"));
    }

    #[test]
    fn balanced_search_returns_mutually_acceptable_pairs() {
        let sim = league();
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, None);
        let a = sim.get_team("Aurora").unwrap();
        let b = sim.get_team("Glaciers").unwrap();

        if let Some(pair) = desk.find_balanced_trade_offer(a, b) {
            assert!(pair.requester_eval.net_value >= pair.requester_eval.min_net);
            assert!(pair.partner_eval.net_value >= pair.partner_eval.min_net);
            assert_ne!(pair.give, pair.receive);
        }
    }

    #[test]
    fn counter_offer_upgrades_the_return() {
        let sim = league();
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, Some("Aurora"));
        let user = sim.get_team("Aurora").unwrap();
        let partner = sim.get_team("Glaciers").unwrap();
        let give = user.player_by_name("A F5").unwrap();
        let receive = partner.player_by_name("B F0").unwrap();

        if let Some(counter) = desk.counter_trade_offer(user, partner, give, receive, true) {
            let upgraded = partner.player_by_name(&counter.receive).unwrap();
            assert!(upgraded.overall() > receive.overall());
            assert!(counter.partner_eval.net_value >= counter.partner_eval.min_net);
        }
    }

    #[test]
    fn relaxed_search_keeps_nets_plausible() {
        let sim = league();
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, None);
        let a = sim.get_team("Aurora").unwrap();
        let b = sim.get_team("Glaciers").unwrap();

        if let Some(pair) = desk.find_cpu_trade_offer_relaxed(a, b) {
            assert!(pair.requester_eval.net_value >= -0.20);
            assert!(pair.partner_eval.net_value >= -0.20);
            assert!(
                (pair.requester_eval.net_value - pair.partner_eval.net_value).abs() <= 0.45
            );
        }
    }
}
