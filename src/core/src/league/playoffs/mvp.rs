use crate::club::player::PlayerPosition;
use crate::game::GameResult;
use crate::league::playoffs::types::{MvpRaceRow, PlayoffMvp};
use std::collections::BTreeMap;

/// Per-player postseason accumulator used for MVP selection. Keyed by
/// stable player id so traded names never collide.
#[derive(Debug, Clone, Default)]
pub struct PlayoffStatLine {
    pub player_id: String,
    pub name: String,
    pub team: String,
    pub position: Option<PlayerPosition>,
    pub gp: u32,
    pub g: u32,
    pub a: u32,
    pub p: u32,
    pub goalie_gp: u32,
    pub goalie_w: u32,
    pub goalie_losses: u32,
    pub goalie_shots: u32,
    pub goalie_saves: u32,
    pub goalie_ga: u32,
}

pub type PlayoffTracker = BTreeMap<String, PlayoffStatLine>;

fn ensure_line<'a>(
    tracker: &'a mut PlayoffTracker,
    player_id: &str,
    name: &str,
    team: &str,
    position: PlayerPosition,
) -> &'a mut PlayoffStatLine {
    tracker
        .entry(player_id.to_string())
        .or_insert_with(|| PlayoffStatLine {
            player_id: player_id.to_string(),
            name: name.to_string(),
            team: team.to_string(),
            position: Some(position),
            ..Default::default()
        })
}

pub fn accumulate_playoff_game(result: &GameResult, tracker: &mut PlayoffTracker) {
    let mut game_players: Vec<String> = Vec::new();

    for (events, team) in [
        (&result.home_goal_events, &result.home),
        (&result.away_goal_events, &result.away),
    ] {
        for event in events {
            let line = ensure_line(
                tracker,
                &event.scorer.player_id,
                &event.scorer.name,
                team,
                event.scorer.position,
            );
            line.g += 1;
            line.p += 1;
            game_players.push(event.scorer.player_id.clone());
            for helper in &event.assists {
                let line =
                    ensure_line(tracker, &helper.player_id, &helper.name, team, helper.position);
                line.a += 1;
                line.p += 1;
                game_players.push(helper.player_id.clone());
            }
        }
    }
    game_players.sort();
    game_players.dedup();
    for player_id in game_players {
        if let Some(line) = tracker.get_mut(&player_id) {
            line.gp += 1;
        }
    }

    let home_win = result.home_win();
    if let Some(goalie) = &result.home_goalie {
        let line = ensure_line(
            tracker,
            &goalie.player_id,
            &goalie.name,
            &result.home,
            goalie.position,
        );
        line.goalie_gp += 1;
        line.goalie_w += home_win as u32;
        line.goalie_losses += (!home_win) as u32;
        line.goalie_shots += result.home_goalie_shots;
        line.goalie_saves += result.home_goalie_saves;
        line.goalie_ga += result.away_goals;
    }
    if let Some(goalie) = &result.away_goalie {
        let line = ensure_line(
            tracker,
            &goalie.player_id,
            &goalie.name,
            &result.away,
            goalie.position,
        );
        line.goalie_gp += 1;
        line.goalie_w += (!home_win) as u32;
        line.goalie_losses += home_win as u32;
        line.goalie_shots += result.away_goalie_shots;
        line.goalie_saves += result.away_goalie_saves;
        line.goalie_ga += result.home_goals;
    }
}

fn mvp_score(line: &PlayoffStatLine) -> f32 {
    let gp = line.gp.max(1) as f32;
    let base =
        line.p as f32 * 6.0 + line.g as f32 * 2.2 + (line.p as f32 / gp) * 2.0;
    if matches!(line.position, Some(p) if p.is_goalie()) {
        let goalie_gp = line.goalie_gp.max(1) as f32;
        let shots = line.goalie_shots.max(1) as f32;
        let sv = line.goalie_saves as f32 / shots;
        let gaa = line.goalie_ga as f32 / goalie_gp;
        return line.goalie_w as f32 * 7.5 + sv * 75.0 - gaa * 1.8 + goalie_gp * 0.8;
    }
    base
}

fn summarize(line: &PlayoffStatLine) -> String {
    if matches!(line.position, Some(p) if p.is_goalie()) {
        let shots = line.goalie_shots.max(1) as f32;
        let sv = line.goalie_saves as f32 / shots;
        format!("{}W, {:.3} SV%, {} GP", line.goalie_w, sv, line.goalie_gp)
    } else {
        format!(
            "{} pts ({}G-{}A) in {} GP",
            line.p, line.g, line.a, line.gp
        )
    }
}

/// Playoff MVP comes from the champion's roster.
pub fn select_playoff_mvp(champion: &str, tracker: &PlayoffTracker) -> PlayoffMvp {
    let best = tracker
        .values()
        .filter(|line| line.team == champion)
        .max_by(|a, b| {
            mvp_score(a)
                .total_cmp(&mvp_score(b))
                .then(a.p.cmp(&b.p))
                .then(a.goalie_w.cmp(&b.goalie_w))
        });
    match best {
        Some(line) => PlayoffMvp {
            name: line.name.clone(),
            team: champion.to_string(),
            position: line
                .position
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            summary: summarize(line),
        },
        None => PlayoffMvp {
            team: champion.to_string(),
            ..Default::default()
        },
    }
}

pub fn playoff_mvp_race(tracker: &PlayoffTracker, limit: usize) -> Vec<MvpRaceRow> {
    let mut ranked: Vec<&PlayoffStatLine> = tracker.values().collect();
    ranked.sort_by(|a, b| {
        mvp_score(b)
            .total_cmp(&mvp_score(a))
            .then(b.p.cmp(&a.p))
            .then(b.goalie_w.cmp(&a.goalie_w))
    });
    ranked
        .into_iter()
        .take(limit.max(1))
        .map(|line| MvpRaceRow {
            name: line.name.clone(),
            team: line.team.clone(),
            position: line
                .position
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            summary: summarize(line),
            score: (mvp_score(line) * 100.0).round() / 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::result::{GoalEvent, PlayerRef};

    fn skater(id: &str, name: &str) -> PlayerRef {
        PlayerRef {
            player_id: id.into(),
            name: name.into(),
            position: PlayerPosition::Center,
        }
    }

    fn result_with_goals(home_goals: u32, away_goals: u32) -> GameResult {
        GameResult {
            home: "Aurora".into(),
            away: "Glaciers".into(),
            home_goals,
            away_goals,
            overtime: false,
            home_goal_events: (0..home_goals)
                .map(|_| GoalEvent {
                    scorer: skater("star", "Star Center"),
                    assists: vec![skater("helper", "Helper Wing")],
                })
                .collect(),
            away_goal_events: vec![],
            home_injuries: vec![],
            away_injuries: vec![],
            home_goalie: Some(PlayerRef {
                player_id: "keeper".into(),
                name: "Aurora Keeper".into(),
                position: PlayerPosition::Goalie,
            }),
            away_goalie: None,
            home_goalie_shots: 30,
            home_goalie_saves: 30 - away_goals,
            away_goalie_shots: 28,
            away_goalie_saves: 28 - home_goals.min(28),
            home_pp_goals: 0,
            home_pp_chances: 0,
            away_pp_goals: 0,
            away_pp_chances: 0,
        }
    }

    #[test]
    fn tracker_counts_points_and_games() {
        let mut tracker = PlayoffTracker::new();
        accumulate_playoff_game(&result_with_goals(3, 1), &mut tracker);
        accumulate_playoff_game(&result_with_goals(2, 0), &mut tracker);

        let star = tracker.get("star").unwrap();
        assert_eq!(star.g, 5);
        assert_eq!(star.p, 5);
        assert_eq!(star.gp, 2);

        let keeper = tracker.get("keeper").unwrap();
        assert_eq!(keeper.goalie_gp, 2);
        assert_eq!(keeper.goalie_w, 2);
    }

    #[test]
    fn mvp_comes_from_champion() {
        let mut tracker = PlayoffTracker::new();
        accumulate_playoff_game(&result_with_goals(4, 2), &mut tracker);
        let mvp = select_playoff_mvp("Aurora", &tracker);
        assert_eq!(mvp.team, "Aurora");
        assert!(!mvp.name.is_empty());

        let race = playoff_mvp_race(&tracker, 5);
        assert!(!race.is_empty());
        assert!(race[0].score >= race[race.len() - 1].score);
    }
}
