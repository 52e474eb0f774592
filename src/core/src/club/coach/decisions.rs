use crate::club::coach::coach::CoachStyle;
use crate::club::player::{Player, PlayerPosition};
use crate::club::team::Team;
use rand::Rng;
use rand::RngExt;
use std::collections::BTreeMap;

/// One prior start from the goalie's recent log, most recent first.
#[derive(Debug, Clone)]
pub struct GoalieStartLine {
    pub goalie: String,
    pub sv: f32,
    pub ga: f32,
}

/// Blend raw talent with in-season form. Small samples fall back to league
/// average so October numbers do not whipsaw the depth chart.
pub fn goalie_selection_value(player: &Player) -> f32 {
    let sv_sample = if player.season.shots_against >= 120 {
        player.save_pct()
    } else {
        0.900
    };
    let gaa_sample = if player.season.goalie_games >= 4 {
        player.gaa()
    } else {
        2.95
    };
    player.skills.goaltending * 0.72 + sv_sample * 2.05 + (3.30 - gaa_sample) * 0.32
}

fn ranked_goalies(team: &Team) -> Vec<&Player> {
    let mut goalies = team.dressed_goalies();
    if goalies.is_empty() {
        goalies = team.active_goalies();
    }
    goalies.sort_by(|a, b| goalie_selection_value(b).total_cmp(&goalie_selection_value(a)));
    goalies
}

/// Regular-season starter pick: lean on the best goalie, rest him on
/// back-to-backs, and force backup starts when the workload gap runs away.
pub fn choose_starting_goalie<R: Rng>(
    team: &Team,
    playoff_mode: bool,
    played_yesterday: bool,
    rng: &mut R,
) -> Option<String> {
    let goalies = ranked_goalies(team);
    let starter = goalies.first()?;
    if goalies.len() == 1 {
        return Some(starter.name.clone());
    }
    let backup = goalies[1];

    if playoff_mode {
        return Some(starter.name.clone());
    }

    if played_yesterday {
        let quality_gap = goalie_selection_value(starter) - goalie_selection_value(backup);
        let starter_override_chance = if quality_gap > 0.85 {
            0.22
        } else if quality_gap > 0.55 {
            0.16
        } else {
            0.10
        };
        if rng.random::<f32>() > starter_override_chance {
            return Some(backup.name.clone());
        }
    }

    let coach_quality = team.coach.quality();
    let base_starter_share = 0.70 + coach_quality * 0.12;
    let workload_gap =
        starter.season.goalie_games as i64 - backup.season.goalie_games as i64;
    let mut fatigue_penalty = ((workload_gap - 6) as f32 * 0.024).max(0.0);
    if workload_gap >= 12 {
        fatigue_penalty += 0.08;
    }
    let starter_share = (base_starter_share - fatigue_penalty).clamp(0.52, 0.94);

    if rng.random::<f32>() <= starter_share {
        Some(starter.name.clone())
    } else {
        Some(backup.name.clone())
    }
}

/// Playoff crease call: ride the starter until his recent window cracks,
/// then hand the net to a backup who has earned it.
pub fn choose_playoff_goalie(
    team: &Team,
    recent_starts: &[GoalieStartLine],
    elimination_game: bool,
) -> Option<String> {
    let goalies = ranked_goalies(team);
    let starter = goalies.first()?;
    if goalies.len() == 1 {
        return Some(starter.name.clone());
    }
    let backup = goalies[1];

    if recent_starts.is_empty() {
        return Some(starter.name.clone());
    }

    let rows_for = |name: &str| -> Vec<&GoalieStartLine> {
        recent_starts.iter().filter(|row| row.goalie == name).collect()
    };
    let avg_sv = |rows: &[&GoalieStartLine]| -> f32 {
        if rows.is_empty() {
            return 0.0;
        }
        rows.iter().map(|row| row.sv).sum::<f32>() / rows.len() as f32
    };

    let starter_rows = rows_for(&starter.name);
    let backup_rows = rows_for(&backup.name);

    let starter_bad_streak =
        starter_rows.len() >= 2 && avg_sv(&starter_rows[..2]) < 0.885;
    let starter_single_disaster = starter_rows
        .first()
        .map(|row| row.sv < 0.860 && row.ga >= 4.0)
        .unwrap_or(false);
    let starter_series_struggle = starter_rows.len() >= 3 && avg_sv(&starter_rows) < 0.890;
    let backup_hot =
        !backup_rows.is_empty() && avg_sv(&backup_rows[..backup_rows.len().min(2)]) >= 0.905;

    if starter_bad_streak || starter_single_disaster {
        return Some(backup.name.clone());
    }
    if starter_series_struggle && backup_hot {
        return Some(backup.name.clone());
    }

    // Backup already took over and is holding: do not flip back mid-run.
    if recent_starts[0].goalie == backup.name {
        if let Some(backup_last) = backup_rows.first() {
            if backup_last.sv >= 0.895 {
                return Some(backup.name.clone());
            }
            if elimination_game && backup_last.sv >= 0.875 {
                return Some(backup.name.clone());
            }
        }
    }

    Some(starter.name.clone())
}

/// Per-day coin flips for every day-to-day player: better coaches and bigger
/// stakes push skaters into the lineup, severity holds them out.
pub fn set_dtd_decisions<R: Rng>(
    team: &mut Team,
    underdog: bool,
    playoff_mode: bool,
    elimination_game: bool,
    rng: &mut R,
) {
    let coach_quality = team.coach.quality();
    let style = team.coach.style;
    let underdog_push = if underdog { 0.04 } else { 0.0 };

    let mut healthy_by_pos: BTreeMap<PlayerPosition, usize> = BTreeMap::new();
    for player in &team.roster {
        if player.health.injured_games_remaining == 0 {
            *healthy_by_pos.entry(player.position).or_insert(0) += 1;
        }
    }

    for player in team.roster.iter_mut() {
        if !(player.health.injured_games_remaining > 0
            && player.health.injury_status == crate::club::player::InjuryStatus::DayToDay)
        {
            player.health.dtd_play_today = false;
            continue;
        }

        let has_healthy_depth = healthy_by_pos.get(&player.position).copied().unwrap_or(0) > 0;
        if player.position.is_goalie() && !has_healthy_depth {
            player.health.dtd_play_today = true;
            continue;
        }

        let impact = if player.position.is_goalie() {
            player.skills.goaltending
        } else {
            player.skills.shooting * 0.40
                + player.skills.playmaking * 0.34
                + player.skills.defense * 0.20
                + player.skills.physical * 0.06
        };
        let impact_push = (impact - 3.3).max(0.0) * 0.08;
        let severity = (player.health.injured_games_remaining as f32 / 3.0).clamp(0.0, 1.0);
        let severity_penalty = 0.14 * severity;

        let mut play_probability = 0.34 + coach_quality * 0.22 + underdog_push + impact_push;
        match style {
            CoachStyle::Aggressive => play_probability += 0.08,
            CoachStyle::Defensive => play_probability -= 0.07,
            CoachStyle::Balanced => {}
        }
        if has_healthy_depth {
            play_probability -= 0.05;
        } else {
            play_probability += 0.20;
        }
        if playoff_mode {
            play_probability += 0.11;
        }
        if elimination_game {
            play_probability += 0.10;
        }
        play_probability -= severity_penalty;
        play_probability = play_probability.clamp(0.12, 0.94);

        player.health.dtd_play_today = rng.random::<f32>() < play_probability;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{InjuryStatus, PlayerSkills};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn team_with_goalies(starter_gt: f32, backup_gt: f32) -> Team {
        let mut team = Team::new("Aurora", "North", "Western");
        for (idx, gt) in [starter_gt, backup_gt].iter().enumerate() {
            team.roster.push(Player::new(
                "Aurora",
                &format!("Goalie {}", idx),
                PlayerPosition::Goalie,
                PlayerSkills {
                    goaltending: *gt,
                    ..Default::default()
                },
                28,
                30,
            ));
        }
        team
    }

    #[test]
    fn playoff_mode_rides_the_starter() {
        let team = team_with_goalies(3.8, 2.9);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(
                choose_starting_goalie(&team, true, false, &mut rng),
                Some("Goalie 0".to_string())
            );
        }
    }

    #[test]
    fn back_to_back_usually_rests_the_starter() {
        let team = team_with_goalies(3.4, 3.2);
        let mut rng = StdRng::seed_from_u64(5);
        let mut backup_starts = 0;
        for _ in 0..200 {
            if choose_starting_goalie(&team, false, true, &mut rng)
                == Some("Goalie 1".to_string())
            {
                backup_starts += 1;
            }
        }
        assert!(backup_starts > 140, "backup only started {}", backup_starts);
    }

    #[test]
    fn struggling_playoff_starter_gets_benched() {
        let team = team_with_goalies(3.8, 3.0);
        let recent = vec![
            GoalieStartLine {
                goalie: "Goalie 0".into(),
                sv: 0.850,
                ga: 5.0,
            },
            GoalieStartLine {
                goalie: "Goalie 0".into(),
                sv: 0.870,
                ga: 4.0,
            },
        ];
        assert_eq!(
            choose_playoff_goalie(&team, &recent, false),
            Some("Goalie 1".to_string())
        );
    }

    #[test]
    fn hot_backup_keeps_the_net() {
        let team = team_with_goalies(3.8, 3.0);
        let recent = vec![GoalieStartLine {
            goalie: "Goalie 1".into(),
            sv: 0.930,
            ga: 1.0,
        }];
        assert_eq!(
            choose_playoff_goalie(&team, &recent, false),
            Some("Goalie 1".to_string())
        );
    }

    #[test]
    fn dtd_goalie_with_no_backup_plays() {
        let mut team = team_with_goalies(3.5, 3.0);
        team.roster.remove(1);
        {
            let goalie = &mut team.roster[0];
            goalie.health.injured_games_remaining = 1;
            goalie.health.injury_status = InjuryStatus::DayToDay;
        }
        let mut rng = StdRng::seed_from_u64(9);
        set_dtd_decisions(&mut team, false, false, false, &mut rng);
        assert!(team.roster[0].health.dtd_play_today);
    }
}
