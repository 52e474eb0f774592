use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_CALENDAR_DENSITY: f32 = 0.60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub home: String,
    pub away: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub number: u32,
    pub date: NaiveDate,
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonSchedule {
    pub days: Vec<ScheduleDay>,
}

impl SeasonSchedule {
    pub fn total_days(&self) -> usize {
        self.days.len()
    }

    pub fn day(&self, index: usize) -> Option<&ScheduleDay> {
        self.days.get(index)
    }

    /// Full-season game count per team; standings math needs the remaining
    /// games to derive clinch states.
    pub fn team_total_games(&self) -> BTreeMap<String, u32> {
        let mut totals: BTreeMap<String, u32> = BTreeMap::new();
        for day in &self.days {
            for game in &day.games {
                *totals.entry(game.home.clone()).or_insert(0) += 1;
                *totals.entry(game.away.clone()).or_insert(0) += 1;
            }
        }
        totals
    }

    pub fn teams_playing_on(&self, index: usize) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if let Some(day) = self.days.get(index) {
            for game in &day.games {
                names.insert(game.home.clone());
                names.insert(game.away.clone());
            }
        }
        names
    }

    /// True when some team would play twice on the given day. Such a
    /// schedule must never be simulated.
    pub fn day_has_duplicates(&self, index: usize) -> bool {
        let Some(day) = self.days.get(index) else {
            return false;
        };
        let mut seen = BTreeSet::new();
        for game in &day.games {
            if !seen.insert(&game.home) || !seen.insert(&game.away) {
                return true;
            }
        }
        false
    }
}
