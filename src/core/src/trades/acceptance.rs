use crate::club::player::Player;
use crate::club::team::Team;
use crate::league::needs::need_matches_position;
use crate::trades::preferences::TradeDesk;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TradeEval {
    pub acquired_value: f32,
    pub sent_value: f32,
    pub net_value: f32,
    pub min_net: f32,
    pub accept_margin: f32,
}

/// Full pre-commit readout for a proposed 1-for-1, rich enough for the GM
/// screen to explain the model's verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeInsight {
    pub user_accepts: bool,
    pub partner_accepts: bool,
    pub user_eval: TradeEval,
    pub partner_eval: TradeEval,
    pub accept_probability: f32,
    pub verdict: String,
    pub reasons: Vec<String>,
    pub user_primary_need: String,
    pub partner_primary_need: String,
    pub receive_matches_user_need: bool,
    pub give_matches_partner_need: bool,
}

impl TradeDesk<'_> {
    /// Good teams demand more to move a piece; bad teams take discounts.
    pub fn acceptance_margin(&self, team: &Team) -> f32 {
        let pct = self.sim.team_point_pct(&team.name);
        if pct >= 0.62 {
            0.06
        } else if pct <= 0.44 {
            -0.04
        } else {
            0.0
        }
    }

    pub fn evaluate_one_for_one(
        &self,
        acquiring_team: &Team,
        sending_player: &Player,
        receiving_player: &Player,
    ) -> TradeEval {
        let acquired_value = self.player_value(receiving_player, acquiring_team);
        let sent_value = self.player_value(sending_player, acquiring_team);
        TradeEval {
            acquired_value,
            sent_value,
            net_value: ((acquired_value - sent_value) * 1000.0).round() / 1000.0,
            min_net: 0.0,
            accept_margin: 0.0,
        }
    }

    /// Acceptance rule: net gain at least the team's floor, and the deal may
    /// not be lopsided in either direction.
    pub fn is_trade_acceptable(
        &self,
        team: &Team,
        give_player: &Player,
        receive_player: &Player,
    ) -> (bool, TradeEval) {
        let mut eval = self.evaluate_one_for_one(team, give_player, receive_player);
        let margin = self.acceptance_margin(team);
        eval.min_net = -0.08 + margin;
        eval.accept_margin = margin;
        let accept = eval.net_value >= eval.min_net && eval.net_value.abs() <= 0.95;
        (accept, eval)
    }

    pub fn trade_offer_insight(
        &self,
        team: &Team,
        partner: &Team,
        give_player: &Player,
        receive_player: &Player,
    ) -> TradeInsight {
        let (user_accepts, user_eval) =
            self.is_trade_acceptable(team, give_player, receive_player);
        let (partner_accepts, partner_eval) =
            self.is_trade_acceptable(partner, receive_player, give_player);

        let gap = partner_eval.net_value - partner_eval.min_net;
        let accept_probability = (0.5 + gap * 0.9).clamp(0.05, 0.95);

        let team_needs = self.sim.get_team_needs(&team.name);
        let partner_needs = self.sim.get_team_needs(&partner.name);
        let receive_matches_user_need =
            need_matches_position(&team_needs.primary_need, receive_player.position);
        let give_matches_partner_need =
            need_matches_position(&partner_needs.primary_need, give_player.position);

        let verdict = if user_eval.net_value >= 0.22 && partner_accepts {
            "Good for us"
        } else if user_eval.net_value >= 0.0 && partner_accepts {
            "Fair"
        } else if partner_accepts {
            "Costly for us"
        } else {
            "Likely rejected"
        };

        let mut reasons: Vec<String> = Vec::new();
        if receive_player.position != give_player.position {
            reasons.push(format!(
                "Position swap: {} -> {}.",
                give_player.position, receive_player.position
            ));
        } else {
            reasons.push(format!("Like-for-like at {}.", give_player.position));
        }
        if receive_player.age < give_player.age {
            reasons.push(format!(
                "You get younger by {} years.",
                give_player.age - receive_player.age
            ));
        } else if receive_player.age > give_player.age {
            reasons.push(format!(
                "You get older by {} years.",
                receive_player.age - give_player.age
            ));
        }
        let cap_delta = receive_player.contract.cap_hit - give_player.contract.cap_hit;
        reasons.push(format!("Cap impact next season: {:+.2}M.", cap_delta));
        reasons.push(format!(
            "Model net: {} {:+.2}, {} {:+.2}.",
            team.name, user_eval.net_value, partner.name, partner_eval.net_value
        ));
        if receive_matches_user_need {
            reasons.push(format!(
                "Need fit: {} helps your primary need ({}).",
                receive_player.position, team_needs.primary_need
            ));
        }
        reasons.truncate(5);

        TradeInsight {
            user_accepts,
            partner_accepts,
            user_eval,
            partner_eval,
            accept_probability: (accept_probability * 100.0).round() / 100.0,
            verdict: verdict.to_string(),
            reasons,
            user_primary_need: team_needs.primary_need,
            partner_primary_need: partner_needs.primary_need,
            receive_matches_user_need,
            give_matches_partner_need,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{PlayerPosition, PlayerSkills};
    use crate::league::league::{LeagueSimulator, SimulatorSettings};
    use crate::league::table::TeamRecord;
    use crate::trades::preferences::TradePreferencesByTeam;

    fn forward(team: &str, name: &str, age: u8, skill: f32) -> Player {
        Player::new(
            team,
            name,
            PlayerPosition::Center,
            PlayerSkills {
                shooting: skill,
                playmaking: skill,
                defense: skill - 0.4,
                goaltending: 0.3,
                physical: skill - 0.2,
                durability: 3.0,
            },
            age,
            27,
        )
    }

    fn league() -> LeagueSimulator {
        let mut user = Team::new("Aurora", "North", "Western");
        let mut partner = Team::new("Glaciers", "North", "Western");
        for idx in 0..12 {
            user.roster
                .push(forward("Aurora", &format!("A{}", idx), 26, 2.7));
            partner
                .roster
                .push(forward("Glaciers", &format!("G{}", idx), 26, 2.7));
        }
        user.roster.push(forward("Aurora", "Old Asset", 30, 3.2));
        partner.roster.push(forward("Glaciers", "Young Target", 24, 3.4));
        LeagueSimulator::new(vec![user, partner], SimulatorSettings::default(), 41)
    }

    #[test]
    fn upgrade_for_user_is_accepted_by_both_within_margin() {
        let mut sim = league();
        {
            // The younger target carries a heavier real deal; that cost
            // inefficiency is what keeps the seller inside its floor.
            let target = sim
                .get_team_mut("Glaciers")
                .unwrap()
                .player_by_name_mut("Young Target")
                .unwrap();
            target.contract.cap_hit = 2.54;
            target.contract.years_left = 2;
            target.contract.contract_type = crate::club::player::ContractType::Core;
        }
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, Some("Aurora"));
        let user = sim.get_team("Aurora").unwrap();
        let partner = sim.get_team("Glaciers").unwrap();
        let give = user.player_by_name("Old Asset").unwrap();
        let receive = partner.player_by_name("Young Target").unwrap();

        let insight = desk.trade_offer_insight(user, partner, give, receive);
        assert!(
            insight.user_eval.net_value > 0.0,
            "user net {}",
            insight.user_eval.net_value
        );
        assert!(insight.user_accepts);
        // A same-position swap makes the nets mirror each other, so the
        // partner stays inside its -0.08 floor only on tight deals.
        assert!(
            insight.partner_accepts,
            "partner net {} floor {}",
            insight.partner_eval.net_value, insight.partner_eval.min_net
        );
    }

    #[test]
    fn lopsided_offer_is_rejected() {
        let mut sim = league();
        sim.get_team_mut("Glaciers")
            .unwrap()
            .roster
            .push(forward("Glaciers", "Superstar", 25, 4.8));
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, Some("Aurora"));
        let user = sim.get_team("Aurora").unwrap();
        let partner = sim.get_team("Glaciers").unwrap();
        let give = user.player_by_name("A0").unwrap();
        let receive = partner.player_by_name("Superstar").unwrap();

        let (accepts, eval) = desk.is_trade_acceptable(partner, receive, give);
        assert!(!accepts, "partner accepted net {}", eval.net_value);
    }

    #[test]
    fn contenders_demand_a_premium() {
        let mut sim = league();
        {
            let rec = sim.records.get_mut("Aurora").unwrap();
            *rec = TeamRecord::new("Aurora");
            rec.wins = 40;
            rec.losses = 10;
        }
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, None);
        let contender = sim.get_team("Aurora").unwrap();
        assert!((desk.acceptance_margin(contender) - 0.06).abs() < 1e-6);
    }
}
