use crate::club::player::player::Player;
use crate::club::player::position::PlayerPosition;
use serde::{Deserialize, Serialize};

/// One completed season of a player's career log. Counting stats come from
/// the live season counters; deployment-flavored columns (TOI, special-teams
/// splits, plus/minus, PIM) are derived from ratings and team context the
/// way a box-score aggregator would report them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerSeason {
    pub season: u32,
    pub team: String,
    pub age: u8,
    pub position: PlayerPosition,
    pub birth_country: String,
    pub birth_country_code: String,
    pub gp: u32,
    pub g: u32,
    pub a: u32,
    pub p: u32,
    pub injuries: u32,
    pub games_missed: u32,
    pub goalie_gp: u32,
    pub goalie_w: u32,
    pub goalie_l: u32,
    pub goalie_otl: u32,
    pub goalie_so: u32,
    pub plus_minus: i32,
    pub pim: u32,
    pub toi_g: f32,
    pub ppg: u32,
    pub ppa: u32,
    pub shg: u32,
    pub sha: u32,
    pub shots: u32,
    pub shot_pct: f32,
    pub gaa: f32,
    pub sv_pct: f32,
    pub rating_shooting: f32,
    pub rating_playmaking: f32,
    pub rating_defense: f32,
    pub rating_goaltending: f32,
    pub rating_physical: f32,
    pub rating_durability: f32,
    #[serde(default)]
    pub draft_season: Option<u32>,
    #[serde(default)]
    pub draft_round: Option<u32>,
    #[serde(default)]
    pub draft_overall: Option<u32>,
    #[serde(default)]
    pub draft_team: Option<String>,
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

impl CareerSeason {
    pub fn from_player(
        player: &Player,
        completed_season: u32,
        team_name: &str,
        team_goal_diff: f32,
    ) -> CareerSeason {
        let gp = player.season.games_played.max(1);
        let skills = &player.skills;

        let toi_per_game = match player.position {
            PlayerPosition::Defense => 18.0 + skills.defense * 1.55 + skills.playmaking * 0.25,
            PlayerPosition::Goalie => 0.0,
            _ => 11.2 + skills.scoring_weight() * 2.05 + skills.defense * 0.35,
        };
        let toi_per_game = round1(toi_per_game.clamp(0.0, 30.0));

        let position_shot_adj = if player.position.is_forward() {
            0.18
        } else if player.position.is_defense() {
            -0.22
        } else {
            -0.65
        };
        let shot_rate = 1.15 + skills.shooting * 0.68 + position_shot_adj;
        let shots = player
            .season
            .goals
            .max((gp as f32 * shot_rate.max(0.4)).round() as u32);
        let shot_pct = if shots > 0 {
            player.season.goals as f32 / shots as f32 * 100.0
        } else {
            0.0
        };

        let points = player.points();
        let pp_share =
            (0.26 + (skills.playmaking + skills.shooting - 5.2) * 0.07).clamp(0.12, 0.68);
        let pp_points = points.min((points as f32 * pp_share).round() as u32);
        let goal_share = player.season.goals as f32 / points.max(1) as f32;
        let ppg = player
            .season
            .goals
            .min((pp_points as f32 * goal_share * 0.92).round() as u32);
        let ppa = pp_points.saturating_sub(ppg);
        let sh_cap = points.saturating_sub(pp_points);
        let sh_points =
            sh_cap.min((gp as f32 * (0.02 + skills.defense * 0.03).max(0.0)).round() as u32);
        let shg = (player.season.goals - ppg).min((sh_points as f32 * goal_share).round() as u32);
        let sha = sh_points.saturating_sub(shg);

        let plus_minus = ((points as f32 / gp as f32 - 0.55) * gp as f32 * 0.34
            + team_goal_diff * 0.18)
            .round() as i32;
        let pim = (gp as f32 * (0.24 + skills.physical * 0.40)).round() as u32;

        CareerSeason {
            season: completed_season,
            team: team_name.to_string(),
            age: player.age,
            position: player.position,
            birth_country: player.birth_country.clone(),
            birth_country_code: player.birth_country_code.clone(),
            gp: player.season.games_played,
            g: player.season.goals,
            a: player.season.assists,
            p: points,
            injuries: player.health.injuries,
            games_missed: player.health.games_missed_injury,
            goalie_gp: player.season.goalie_games,
            goalie_w: player.season.goalie_wins,
            goalie_l: player.season.goalie_losses,
            goalie_otl: player.season.goalie_ot_losses,
            goalie_so: player.season.goalie_shutouts,
            plus_minus,
            pim,
            toi_g: toi_per_game,
            ppg,
            ppa,
            shg,
            sha,
            shots,
            shot_pct: round1(shot_pct),
            gaa: round2(player.gaa()),
            sv_pct: round3(player.save_pct()),
            rating_shooting: round2(skills.shooting),
            rating_playmaking: round2(skills.playmaking),
            rating_defense: round2(skills.defense),
            rating_goaltending: round2(skills.goaltending),
            rating_physical: round2(skills.physical),
            rating_durability: round2(skills.durability),
            draft_season: player.draft.season,
            draft_round: player.draft.round,
            draft_overall: player.draft.overall,
            draft_team: player.draft.team.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::skills::PlayerSkills;

    #[test]
    fn special_teams_splits_never_exceed_totals() {
        let mut player = Player::new(
            "Aurora",
            "Split Check",
            PlayerPosition::Center,
            PlayerSkills::default(),
            26,
            27,
        );
        player.season.games_played = 70;
        player.season.goals = 31;
        player.season.assists = 44;

        let entry = CareerSeason::from_player(&player, 3, "Aurora", 22.0);
        assert_eq!(entry.p, 75);
        assert!(entry.ppg + entry.shg <= entry.g);
        assert!(entry.ppg + entry.ppa + entry.shg + entry.sha <= entry.p);
        assert!(entry.shots >= entry.g);
    }

    #[test]
    fn goalie_rows_have_no_toi() {
        let mut player = Player::new(
            "Aurora",
            "Net Check",
            PlayerPosition::Goalie,
            PlayerSkills {
                goaltending: 3.6,
                ..Default::default()
            },
            29,
            30,
        );
        player.season.goalie_games = 55;
        player.season.shots_against = 1500;
        player.season.saves = 1370;
        player.season.goals_against = 130;

        let entry = CareerSeason::from_player(&player, 2, "Aurora", 5.0);
        assert_eq!(entry.toi_g, 0.0);
        assert!(entry.sv_pct > 0.9);
    }
}
