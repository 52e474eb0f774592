use crate::club::coach::CoachStyle;
use crate::game::GameResult;
use crate::league::playoffs::RevealGame;
use crate::trades::TradePreferencesByTeam;
use serde::{Deserialize, Serialize};

pub const RUNTIME_SAVE_VERSION: u32 = 2;

pub const DAILY_RESULTS_KEEP: usize = 600;
pub const NEWS_FEED_KEEP: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Gm,
    Coach,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub season: u32,
    pub day: u32,
    pub kind: String,
    pub headline: String,
    pub details: String,
    #[serde(default)]
    pub team: String,
}

/// One advanced day's results as kept in the runtime ring buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayResults {
    pub season: u32,
    pub day: u32,
    pub phase: String,
    #[serde(default)]
    pub round: String,
    #[serde(default)]
    pub games: Vec<GameResult>,
    #[serde(default)]
    pub playoff_games: Vec<RevealGame>,
}

/// Bench boss waiting for a phone call. Maintained alongside the teams and
/// persisted with the runtime envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachCandidate {
    pub name: String,
    pub age: u8,
    pub rating: f32,
    pub style: CoachStyle,
    pub offense: f32,
    pub defense: f32,
    pub goalie_dev: f32,
    #[serde(default)]
    pub cups: u32,
    #[serde(default)]
    pub seasons: u32,
}

/// Service-side state that is not part of the league world: user selection,
/// control overrides, result/news buffers, trade boards, coach pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeState {
    #[serde(default)]
    pub user_team_name: String,
    #[serde(default)]
    pub user_strategy: CoachStyle,
    #[serde(default)]
    pub override_coach_for_lines: bool,
    #[serde(default)]
    pub override_coach_for_strategy: bool,
    #[serde(default)]
    pub auto_injury_moves: bool,
    #[serde(default)]
    pub game_mode: GameMode,
    #[serde(default)]
    pub daily_results: Vec<DayResults>,
    #[serde(default)]
    pub news_feed: Vec<NewsItem>,
    #[serde(default)]
    pub trade_preferences_by_team: TradePreferencesByTeam,
    #[serde(default)]
    pub coach_pool: Vec<CoachCandidate>,
}

impl RuntimeState {
    pub fn push_day_results(&mut self, entry: DayResults) {
        self.daily_results
            .retain(|row| !(row.season == entry.season && row.day == entry.day));
        self.daily_results.push(entry);
        if self.daily_results.len() > DAILY_RESULTS_KEEP {
            let excess = self.daily_results.len() - DAILY_RESULTS_KEEP;
            self.daily_results.drain(..excess);
        }
    }

    pub fn push_news(&mut self, item: NewsItem) {
        self.news_feed.insert(0, item);
        self.news_feed.truncate(NEWS_FEED_KEEP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_results_replace_same_day_entries() {
        let mut runtime = RuntimeState::default();
        for _ in 0..3 {
            runtime.push_day_results(DayResults {
                season: 1,
                day: 5,
                phase: String::from("regular"),
                round: String::new(),
                games: vec![],
                playoff_games: vec![],
            });
        }
        assert_eq!(runtime.daily_results.len(), 1);
    }

    #[test]
    fn news_feed_is_newest_first_and_bounded() {
        let mut runtime = RuntimeState::default();
        for idx in 0..10 {
            runtime.push_news(NewsItem {
                season: 1,
                day: idx,
                kind: String::from("test"),
                headline: format!("Headline {}", idx),
                details: String::new(),
                team: String::new(),
            });
        }
        assert_eq!(runtime.news_feed[0].day, 9);
    }
}
