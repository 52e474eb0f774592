use crate::club::coach::Coach;
use crate::club::player::{Player, ProspectTier};
use rand::Rng;
use rand::RngExt;

/// Coach development inputs frozen per team before the aging sweep.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DevContext {
    pub coach_quality: f32,
    pub goalie_dev_quality: f32,
    pub churn_penalty: f32,
}

impl DevContext {
    pub fn from_coach(coach: &Coach) -> Self {
        DevContext {
            coach_quality: coach.quality(),
            goalie_dev_quality: coach.goalie_dev_quality(),
            churn_penalty: (coach.changes_recent.max(0.0) * 0.035).min(0.20),
        }
    }
}

/// Season injury toll converts into durability and skill erosion. Severity
/// (games missed) and repeat history both feed the wear score.
pub(crate) fn apply_injury_wear<R: Rng>(player: &mut Player, rng: &mut R) {
    let season_injuries = player.health.injuries as f32;
    let season_games_missed = player.health.games_missed_injury as f32;
    let recent: Vec<_> = player
        .career_seasons
        .iter()
        .rev()
        .take(3)
        .collect();
    let recent_injuries: u32 = recent.iter().map(|row| row.injuries).sum();
    let recent_games_missed: u32 = recent.iter().map(|row| row.games_missed).sum();

    let wear_score = season_injuries * 0.48
        + (season_games_missed / 7.0) * 0.34
        + recent_injuries as f32 * 0.10
        + (recent_games_missed as f32 / 35.0) * 0.08;
    if wear_score <= 0.25 {
        return;
    }

    let major_season = season_games_missed >= 20.0 || season_injuries >= 3.0;
    let repeat_history = recent_games_missed >= 35 || recent_injuries >= 5;
    let volatility = rng.random_range(0.92..1.10);
    let mut impact = wear_score * 0.030 * volatility;
    if major_season {
        impact *= 1.28;
    }
    if repeat_history {
        impact *= 1.22;
    }

    let durability_drop = impact * (1.28 + 0.08 * season_injuries);
    let physical_drop = impact * (0.70 + 0.02 * season_games_missed);
    let skills = &mut player.skills;
    skills.durability = (skills.durability - durability_drop).clamp(0.6, 5.0);
    skills.physical = (skills.physical - physical_drop).clamp(0.7, 5.0);

    if player.position.is_goalie() {
        let goalie_drop = impact * (0.74 + 0.03 * season_injuries);
        let defense_drop = impact * (0.34 + 0.01 * season_games_missed);
        skills.goaltending = (skills.goaltending - goalie_drop).clamp(0.6, 5.0);
        skills.defense = (skills.defense - defense_drop).clamp(0.7, 5.0);
        skills.playmaking = (skills.playmaking - impact * 0.16).clamp(0.7, 5.0);
    } else {
        let skill_drop = impact * (0.42 + 0.015 * season_injuries);
        let defense_drop = impact * (0.36 + 0.010 * season_games_missed);
        skills.shooting = (skills.shooting - skill_drop).clamp(0.7, 5.0);
        skills.playmaking = (skills.playmaking - skill_drop * 0.92).clamp(0.7, 5.0);
        skills.defense = (skills.defense - defense_drop).clamp(0.7, 5.0);
        skills.goaltending = (skills.goaltending - impact * 0.04).clamp(0.3, 5.0);
    }
}

/// Growth and decline by age band, bent by usage, coaching, and the one-time
/// prospect boom/bust resolution.
pub(crate) fn apply_aging_curve<R: Rng>(
    player: &mut Player,
    ctx: &DevContext,
    team_games: u32,
    rng: &mut R,
) {
    let age = player.age;
    let goalie = player.position.is_goalie();
    let team_games = team_games.max(1) as f32;
    let usage_ratio = if goalie {
        player.season.goalie_games as f32 / team_games
    } else {
        player.season.games_played as f32 / team_games
    };

    let dev = match (age, goalie) {
        (0..=20, false) => 0.10,
        (0..=20, true) => 0.08,
        (21..=22, false) => 0.07,
        (21..=22, true) => 0.06,
        (23..=24, false) => 0.04,
        (23..=24, true) => 0.05,
        (25..=27, false) => 0.015,
        (25..=27, true) => 0.02,
        (28..=29, false) => 0.0,
        (28..=29, true) => 0.01,
        (30..=32, false) => -0.025,
        (30..=32, true) => -0.015,
        (33..=35, false) => -0.05,
        (33..=35, true) => -0.03,
        (_, false) => -0.08,
        (_, true) => -0.05,
    };

    let mut shift = dev + rng.random_range(-0.012..0.012);
    shift *= 0.92 + ctx.coach_quality * 0.22;

    if age <= 24 {
        if usage_ratio >= 0.65 {
            shift += 0.020 + ctx.coach_quality * 0.010;
        } else if usage_ratio >= 0.45 {
            shift += 0.008 + ctx.coach_quality * 0.006;
        } else if usage_ratio <= 0.22 {
            shift -= 0.018 + (1.0 - ctx.coach_quality) * 0.010;
        }
        if ctx.churn_penalty > 0.0 {
            shift -= ctx.churn_penalty * 0.65;
        }
    } else if age <= 29 {
        if usage_ratio <= 0.25 {
            shift -= 0.004;
        }
    } else if usage_ratio >= 0.78 {
        shift -= 0.008;
    }

    if player.prospect.seasons_to_nhl > 0 {
        // Prospect tracks mostly develop off the big roster until ready.
        let mut minor_dev =
            0.010 + player.prospect.potential * 0.028 + ctx.coach_quality * 0.010;
        match player.prospect.tier {
            ProspectTier::Junior => minor_dev += 0.006,
            ProspectTier::Ahl => minor_dev += 0.003,
            ProspectTier::Nhl => {}
        }
        shift += minor_dev;
        if usage_ratio >= 0.45 {
            // Rushing prospects into heavy usage can stall growth.
            shift -= 0.012 + (0.55 - (ctx.coach_quality * 0.55).min(0.55));
        }
        player.prospect.seasons_to_nhl -= 1;
    }

    if player.prospect.seasons_to_nhl == 0 && !player.prospect.resolved && age <= 24 {
        // One-time boom/bust transition when the prospect becomes ready.
        let boom = (player.prospect.boom_chance + ctx.goalie_dev_quality * 0.05)
            .clamp(0.02, 0.30);
        let bust = (player.prospect.bust_chance - ctx.goalie_dev_quality * 0.05)
            .clamp(0.01, 0.24);
        let roll: f32 = rng.random();
        if roll < boom {
            shift += 0.050 + player.prospect.potential * 0.035;
        } else if roll < boom + bust {
            shift -= 0.045 + (0.55 - player.prospect.potential) * 0.030;
        }
        player.prospect.resolved = true;
    }

    let skills = &mut player.skills;
    if goalie {
        shift *= 0.94 + ctx.goalie_dev_quality * 0.18;
        skills.goaltending = (skills.goaltending + shift * 1.2).clamp(0.8, 5.0);
        skills.defense = (skills.defense + shift * 0.6).clamp(0.8, 5.0);
        skills.playmaking = (skills.playmaking + shift * 0.4).clamp(0.8, 5.0);
        skills.shooting = (skills.shooting + shift * 0.1).clamp(0.4, 5.0);
        skills.physical = (skills.physical + shift * 0.5).clamp(0.8, 5.0);
    } else {
        skills.shooting = (skills.shooting + shift * 1.0).clamp(0.8, 5.0);
        skills.playmaking = (skills.playmaking + shift * 0.9).clamp(0.8, 5.0);
        skills.defense = (skills.defense + shift * 0.8).clamp(0.8, 5.0);
        skills.goaltending = (skills.goaltending + shift * 0.05).clamp(0.3, 5.0);
        skills.physical = (skills.physical + shift * 0.75).clamp(0.8, 5.0);
    }
    skills.durability = (skills.durability + shift * 0.6).clamp(0.8, 5.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{PlayerPosition, PlayerSkills};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn young_forward() -> Player {
        Player::new(
            "Aurora",
            "Young Gun",
            PlayerPosition::Center,
            PlayerSkills {
                shooting: 3.0,
                playmaking: 3.0,
                defense: 2.8,
                goaltending: 0.3,
                physical: 2.9,
                durability: 3.2,
            },
            19,
            27,
        )
    }

    #[test]
    fn young_heavy_usage_grows() {
        let mut rng = StdRng::seed_from_u64(21);
        let ctx = DevContext {
            coach_quality: 0.8,
            goalie_dev_quality: 0.5,
            churn_penalty: 0.0,
        };
        let mut grew = 0;
        for round in 0..40 {
            let mut player = young_forward();
            player.id = format!("young-{}", round);
            player.season.games_played = 60;
            let before = player.skills.shooting;
            apply_aging_curve(&mut player, &ctx, 82, &mut rng);
            if player.skills.shooting > before {
                grew += 1;
            }
        }
        assert!(grew >= 38, "only {} of 40 young players grew", grew);
    }

    #[test]
    fn late_thirties_decline() {
        let mut rng = StdRng::seed_from_u64(8);
        let ctx = DevContext {
            coach_quality: 0.5,
            goalie_dev_quality: 0.5,
            churn_penalty: 0.0,
        };
        let mut declined = 0;
        for round in 0..40 {
            let mut player = young_forward();
            player.id = format!("old-{}", round);
            player.age = 37;
            player.season.games_played = 40;
            let before = player.skills.shooting;
            apply_aging_curve(&mut player, &ctx, 82, &mut rng);
            if player.skills.shooting < before {
                declined += 1;
            }
        }
        assert!(declined >= 38, "only {} of 40 veterans declined", declined);
    }

    #[test]
    fn healthy_season_has_no_wear() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut player = young_forward();
        let before = player.skills.durability;
        apply_injury_wear(&mut player, &mut rng);
        assert_eq!(player.skills.durability, before);
    }

    #[test]
    fn injury_riddled_season_erodes_durability() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut player = young_forward();
        player.health.injuries = 4;
        player.health.games_missed_injury = 30;
        let before = player.skills.durability;
        apply_injury_wear(&mut player, &mut rng);
        assert!(player.skills.durability < before);
    }

    #[test]
    fn prospect_clock_ticks_down_and_resolves() {
        let mut rng = StdRng::seed_from_u64(14);
        let ctx = DevContext {
            coach_quality: 0.5,
            goalie_dev_quality: 0.5,
            churn_penalty: 0.0,
        };
        let mut player = young_forward();
        player.prospect.seasons_to_nhl = 1;
        player.prospect.resolved = false;
        apply_aging_curve(&mut player, &ctx, 82, &mut rng);
        assert_eq!(player.prospect.seasons_to_nhl, 0);
        assert!(player.prospect.resolved);
    }
}
