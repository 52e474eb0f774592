use crate::club::coach::coach::{CoachStyle, HONEYMOON_GAMES};
use crate::club::team::Team;

/// Per-game bench impact derived from the coach, fed straight into the game
/// engine on top of the raw strategy effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoachModifiers {
    pub offense_bonus: f32,
    pub defense_bonus: f32,
    pub injury_mult: f32,
}

/// Which bench strategy this roster would prefer against the given opponent,
/// judged purely on top-six scoring talent.
pub fn matchup_preference(team: &Team, opponent: &Team) -> CoachStyle {
    let top6 = |t: &Team| -> f32 {
        let mut weights: Vec<f32> = t.active_skaters().iter().map(|p| p.scoring_weight()).collect();
        weights.sort_by(|a, b| b.total_cmp(a));
        let sample = &weights[..weights.len().min(6)];
        if sample.is_empty() {
            return 0.0;
        }
        sample.iter().sum::<f32>() / sample.len() as f32
    };

    let team_off = top6(team);
    let opp_off = top6(opponent);
    if team_off - opp_off > 0.16 {
        CoachStyle::Aggressive
    } else if opp_off - team_off > 0.16 {
        CoachStyle::Defensive
    } else {
        CoachStyle::Balanced
    }
}

pub fn game_modifiers(team: &Team, chosen_style: CoachStyle, opponent: &Team) -> CoachModifiers {
    let coach = &team.coach;
    let rating_delta = coach.rating - 3.0;
    let coach_quality = coach.quality();
    let offense_specialty = (coach.offense - 3.0) * 0.06;
    let defense_specialty = (coach.defense - 3.0) * 0.06;
    let preferred = matchup_preference(team, opponent);
    let style_match = chosen_style == coach.style;
    let matchup_match = chosen_style == preferred;

    let mut tactical = 0.0;
    if style_match {
        tactical += 0.05;
    } else {
        tactical -= 0.02;
    }
    if matchup_match {
        tactical += 0.06 * coach_quality;
    } else {
        tactical -= 0.03 * (1.0 - coach_quality);
    }

    let base = rating_delta * 0.12 + tactical;
    let (mut offense_bonus, mut defense_bonus, mut injury_mult) = match chosen_style {
        CoachStyle::Aggressive => (
            base * 1.12 + 0.03 + offense_specialty,
            base * 0.78 - 0.02 + defense_specialty * 0.75,
            (1.05 - coach_quality * 0.08).max(0.75),
        ),
        CoachStyle::Defensive => (
            base * 0.82 - 0.02 + offense_specialty * 0.75,
            base * 1.16 + 0.03 + defense_specialty,
            (0.96 - coach_quality * 0.10).max(0.72),
        ),
        CoachStyle::Balanced => (
            base + offense_specialty * 0.90,
            base + defense_specialty * 0.90,
            (1.00 - coach_quality * 0.09).max(0.74),
        ),
    };

    // Churned benches play worse and sloppier until tenure rebuilds trust.
    let instability = (coach.changes_recent.max(0.0) * 0.06).min(0.30);
    let tenure_buffer = (coach.tenure_seasons as f32 * 0.015).min(0.10);
    let net_instability = (instability - tenure_buffer).max(0.0);
    if net_instability > 0.0 {
        offense_bonus -= net_instability * 0.55;
        defense_bonus -= net_instability * 0.55;
        injury_mult = (injury_mult + net_instability * 0.22).min(1.35);
    }

    if coach.honeymoon_games_remaining > 0 {
        let honeymoon_factor =
            (coach.honeymoon_games_remaining as f32 / HONEYMOON_GAMES as f32).min(1.0);
        let honeymoon_boost = 0.08 * honeymoon_factor * (0.85 + coach_quality * 0.30);
        offense_bonus += honeymoon_boost * 0.60;
        defense_bonus += honeymoon_boost * 0.60;
        injury_mult = (injury_mult - honeymoon_boost * 0.10).max(0.70);
    }

    CoachModifiers {
        offense_bonus,
        defense_bonus,
        injury_mult,
    }
}

impl Team {
    pub fn consume_coach_game_effect(&mut self) {
        if self.coach.honeymoon_games_remaining > 0 {
            self.coach.honeymoon_games_remaining -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{Player, PlayerPosition, PlayerSkills};

    fn team_with_skill(name: &str, shooting: f32) -> Team {
        let mut team = Team::new(name, "North", "Western");
        for idx in 0..12 {
            team.roster.push(Player::new(
                name,
                &format!("{} F{}", name, idx),
                PlayerPosition::Center,
                PlayerSkills {
                    shooting,
                    ..Default::default()
                },
                25,
                27,
            ));
        }
        team
    }

    #[test]
    fn stacked_team_prefers_aggression() {
        let strong = team_with_skill("Strong", 4.2);
        let weak = team_with_skill("Weak", 2.2);
        assert_eq!(matchup_preference(&strong, &weak), CoachStyle::Aggressive);
        assert_eq!(matchup_preference(&weak, &strong), CoachStyle::Defensive);
    }

    #[test]
    fn honeymoon_lifts_both_sides_of_the_bench() {
        let opponent = team_with_skill("Opp", 3.0);
        let mut team = team_with_skill("Team", 3.0);
        let base = game_modifiers(&team, CoachStyle::Balanced, &opponent);
        team.coach.honeymoon_games_remaining = HONEYMOON_GAMES;
        let boosted = game_modifiers(&team, CoachStyle::Balanced, &opponent);
        assert!(boosted.offense_bonus > base.offense_bonus);
        assert!(boosted.defense_bonus > base.defense_bonus);
        assert!(boosted.injury_mult <= base.injury_mult);
    }

    #[test]
    fn instability_drags_the_bench_down() {
        let opponent = team_with_skill("Opp", 3.0);
        let mut team = team_with_skill("Team", 3.0);
        let base = game_modifiers(&team, CoachStyle::Balanced, &opponent);
        team.coach.changes_recent = 4.0;
        let churned = game_modifiers(&team, CoachStyle::Balanced, &opponent);
        assert!(churned.offense_bonus < base.offense_bonus);
        assert!(churned.injury_mult > base.injury_mult);
    }
}
