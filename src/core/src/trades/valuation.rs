use crate::club::player::{ContractOffer, Player};
use crate::club::team::Team;
use crate::trades::preferences::TradeDesk;

impl TradeDesk<'_> {
    /// Average overall and headcount at one position on the receiving team,
    /// healthy players only.
    fn team_pos_strength(&self, team: &Team, player: &Player) -> (f32, usize) {
        let group: Vec<&Player> = team
            .roster
            .iter()
            .filter(|p| p.position == player.position && !p.is_injured())
            .collect();
        if group.is_empty() {
            return (0.0, 0);
        }
        let avg = group.iter().map(|p| p.overall()).sum::<f32>() / group.len() as f32;
        (avg, group.len())
    }

    /// What this player is worth *to the receiving team*: raw overall bent
    /// by age curve, contract efficiency and term, positional need, prospect
    /// upside, and injury discount.
    pub fn player_value(&self, player: &Player, receiving_team: &Team) -> f32 {
        let base = player.overall();
        let age = player.age.clamp(17, 42);
        let age_adj = if player.position.is_goalie() {
            match age {
                0..=23 => 0.22,
                24..=30 => 0.12,
                31..=35 => -0.03,
                _ => -0.18,
            }
        } else {
            match age {
                0..=21 => 0.24,
                22..=27 => 0.11,
                28..=31 => 0.0,
                32..=35 => -0.12,
                _ => -0.25,
            }
        };

        let ask = ContractOffer::estimate(player);
        let cost_efficiency =
            ((ask.cap_hit - player.contract.cap_hit) as f32).clamp(-0.35, 0.35);
        let term_bonus =
            ((player.contract.years_left as f32 - 1.0) * 0.04).clamp(0.0, 0.2);

        let (pos_avg, pos_count) = self.team_pos_strength(receiving_team, player);
        let needs = self.sim.get_team_needs(&receiving_team.name);
        let scores = needs.scores;
        let (need_depth, need_weight) = if player.position.is_goalie() {
            (2usize, scores.starter_g)
        } else if player.position.is_defense() {
            (6, scores.top4_d.max(scores.depth_d))
        } else {
            (12, scores.top6_f.max(scores.depth_f))
        };
        let shortage = need_depth.saturating_sub(pos_count) as f32;
        let need_bonus =
            shortage * 0.08 + (2.9 - pos_avg).max(0.0) * 0.09 + need_weight * 0.16;

        let prospect_bonus = if player.prospect.seasons_to_nhl > 0 {
            ((player.prospect.potential - 0.5) * 0.6).clamp(-0.05, 0.28)
        } else {
            0.0
        };

        let injury_penalty = if player.is_injured() {
            (player.health.injured_games_remaining as f32 * 0.03).min(0.35)
        } else if player.is_dtd() {
            0.06
        } else {
            0.0
        };

        let value =
            base + age_adj + cost_efficiency + term_bonus + need_bonus + prospect_bonus
                - injury_penalty;
        (value * 1000.0).round() / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{PlayerPosition, PlayerSkills};
    use crate::league::league::{LeagueSimulator, SimulatorSettings};
    use crate::trades::preferences::TradePreferencesByTeam;

    fn forward(name: &str, age: u8, skill: f32) -> Player {
        Player::new(
            "Glaciers",
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
        let mut receiving = Team::new("Aurora", "North", "Western");
        for idx in 0..12 {
            receiving.roster.push(forward(&format!("Incumbent {}", idx), 27, 2.6));
        }
        LeagueSimulator::new(
            vec![receiving, Team::new("Glaciers", "North", "Western")],
            SimulatorSettings::default(),
            17,
        )
    }

    #[test]
    fn young_talent_is_worth_more_than_old_equal_talent() {
        let sim = league();
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, None);
        let receiving = sim.get_team("Aurora").unwrap();

        let young = forward("Young Star", 21, 3.6);
        let old = forward("Old Star", 36, 3.6);
        assert!(desk.player_value(&young, receiving) > desk.player_value(&old, receiving));
    }

    #[test]
    fn injured_players_are_discounted() {
        let sim = league();
        let prefs = TradePreferencesByTeam::new();
        let desk = TradeDesk::new(&sim, &prefs, None);
        let receiving = sim.get_team("Aurora").unwrap();

        let healthy = forward("Healthy Guy", 25, 3.2);
        let mut hurt = forward("Hurt Guy", 25, 3.2);
        hurt.health.injured_games_remaining = 8;
        hurt.health.injury_status = crate::club::player::InjuryStatus::InjuredReserve;
        assert!(desk.player_value(&healthy, receiving) > desk.player_value(&hurt, receiving));
    }
}
