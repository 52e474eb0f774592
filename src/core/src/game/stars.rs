use crate::game::result::GameResult;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreeStar {
    pub label: String,
    pub summary: String,
}

struct SkaterLine {
    name: String,
    team: String,
    goals: u32,
    assists: u32,
}

fn goalie_star_score(saves: u32, shots: u32, goals_against: u32, won: bool, overtime: bool) -> f32 {
    if shots == 0 {
        return 0.0;
    }
    let sv = saves as f32 / shots as f32;
    let mut score = saves as f32 * 2.0;
    score += if sv >= 0.960 {
        95.0
    } else if sv >= 0.950 {
        78.0
    } else if sv >= 0.940 {
        62.0
    } else if sv >= 0.930 {
        46.0
    } else if sv >= 0.920 {
        28.0
    } else if sv >= 0.910 {
        12.0
    } else {
        0.0
    };
    score += if shots >= 40 {
        36.0
    } else if shots >= 35 {
        24.0
    } else if shots >= 30 {
        14.0
    } else {
        0.0
    };
    if won {
        score += 34.0;
        if overtime {
            score += 8.0;
        }
    }
    if goals_against == 0 {
        score += 135.0;
    }
    if goals_against >= 5 {
        score -= 60.0;
    } else if goals_against == 4 {
        score -= 32.0;
    }
    // Heavy-workload nights earn a little forgiveness for a crooked number.
    if shots >= 38 && goals_against >= 4 {
        score += 15.0;
    }
    score.max(0.0)
}

/// Rank every scorer, helper, and goalie from one game; the top three become
/// the night's stars.
pub fn three_stars(game: &GameResult) -> Vec<ThreeStar> {
    let mut skater_lines: BTreeMap<String, SkaterLine> = BTreeMap::new();

    let mut add_events = |events: &[crate::game::result::GoalEvent], team: &str| {
        for event in events {
            let entry = skater_lines
                .entry(event.scorer.player_id.clone())
                .or_insert_with(|| SkaterLine {
                    name: event.scorer.name.clone(),
                    team: team.to_string(),
                    goals: 0,
                    assists: 0,
                });
            entry.goals += 1;
            for helper in &event.assists {
                let entry = skater_lines
                    .entry(helper.player_id.clone())
                    .or_insert_with(|| SkaterLine {
                        name: helper.name.clone(),
                        team: team.to_string(),
                        goals: 0,
                        assists: 0,
                    });
                entry.assists += 1;
            }
        }
    };
    add_events(&game.home_goal_events, &game.home);
    add_events(&game.away_goal_events, &game.away);

    let mut candidates: Vec<(f32, String)> = Vec::new();
    for line in skater_lines.values() {
        let points = line.goals + line.assists;
        let mut score = points as f32 * 52.0 + line.goals as f32 * 18.0 + line.assists as f32 * 8.0;
        if points >= 3 {
            score += 18.0;
        }
        if line.goals >= 2 {
            score += 12.0;
        }
        candidates.push((
            score,
            format!("{} ({}) {}G {}A", line.name, line.team, line.goals, line.assists),
        ));
    }

    if let Some(goalie) = &game.home_goalie {
        if game.home_goalie_shots > 0 {
            candidates.push((
                goalie_star_score(
                    game.home_goalie_saves,
                    game.home_goalie_shots,
                    game.away_goals,
                    game.home_win(),
                    game.overtime,
                ),
                format!(
                    "{} ({}) {}/{} SV",
                    goalie.name, game.home, game.home_goalie_saves, game.home_goalie_shots
                ),
            ));
        }
    }
    if let Some(goalie) = &game.away_goalie {
        if game.away_goalie_shots > 0 {
            candidates.push((
                goalie_star_score(
                    game.away_goalie_saves,
                    game.away_goalie_shots,
                    game.home_goals,
                    !game.home_win(),
                    game.overtime,
                ),
                format!(
                    "{} ({}) {}/{} SV",
                    goalie.name, game.away, game.away_goalie_saves, game.away_goalie_shots
                ),
            ));
        }
    }

    let labels = ["1st Star", "2nd Star", "3rd Star"];
    candidates
        .into_iter()
        .sorted_by(|a, b| b.0.total_cmp(&a.0))
        .take(3)
        .enumerate()
        .map(|(idx, (_, summary))| ThreeStar {
            label: labels[idx].to_string(),
            summary,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::PlayerPosition;
    use crate::game::result::{GoalEvent, PlayerRef};

    fn player_ref(id: &str, name: &str) -> PlayerRef {
        PlayerRef {
            player_id: id.to_string(),
            name: name.to_string(),
            position: PlayerPosition::Center,
        }
    }

    fn goalie_ref(id: &str, name: &str) -> PlayerRef {
        PlayerRef {
            player_id: id.to_string(),
            name: name.to_string(),
            position: PlayerPosition::Goalie,
        }
    }

    fn base_game() -> GameResult {
        GameResult {
            home: "Home".into(),
            away: "Away".into(),
            home_goals: 0,
            away_goals: 0,
            overtime: false,
            home_goal_events: vec![],
            away_goal_events: vec![],
            home_injuries: vec![],
            away_injuries: vec![],
            home_goalie: Some(goalie_ref("hg", "Home Keeper")),
            away_goalie: Some(goalie_ref("ag", "Away Keeper")),
            home_goalie_shots: 0,
            home_goalie_saves: 0,
            away_goalie_shots: 0,
            away_goalie_saves: 0,
            home_pp_goals: 0,
            home_pp_chances: 0,
            away_pp_goals: 0,
            away_pp_chances: 0,
        }
    }

    #[test]
    fn shutout_goalie_beats_single_goal_scorer() {
        let mut game = base_game();
        game.home_goals = 1;
        game.home_goal_events = vec![GoalEvent {
            scorer: player_ref("s1", "Lone Scorer"),
            assists: vec![],
        }];
        game.home_goalie_shots = 31;
        game.home_goalie_saves = 31;
        game.away_goalie_shots = 30;
        game.away_goalie_saves = 29;

        let stars = three_stars(&game);
        assert_eq!(stars.len(), 3);
        assert!(stars[0].summary.contains("Home Keeper"));
    }

    #[test]
    fn hat_trick_takes_first_star() {
        let mut game = base_game();
        game.home_goals = 3;
        game.away_goals = 1;
        let scorer = player_ref("s1", "Hat Trick");
        game.home_goal_events = (0..3)
            .map(|_| GoalEvent {
                scorer: scorer.clone(),
                assists: vec![],
            })
            .collect();
        game.away_goal_events = vec![GoalEvent {
            scorer: player_ref("s2", "Consolation"),
            assists: vec![],
        }];
        game.home_goalie_shots = 25;
        game.home_goalie_saves = 24;
        game.away_goalie_shots = 28;
        game.away_goalie_saves = 25;

        let stars = three_stars(&game);
        assert!(stars[0].summary.starts_with("Hat Trick"));
        assert!(stars[0].summary.contains("3G"));
    }
}
