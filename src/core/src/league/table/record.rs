use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    W,
    L,
    OTL,
}

/// Per-season running tally for one team. Two points for a win, one for an
/// overtime loss.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub home_wins: u32,
    pub home_losses: u32,
    pub home_ot_losses: u32,
    pub away_wins: u32,
    pub away_losses: u32,
    pub away_ot_losses: u32,
    pub pp_goals: u32,
    pub pp_chances: u32,
    pub pk_goals_against: u32,
    pub pk_chances_against: u32,
    #[serde(default)]
    pub recent_results: Vec<GameOutcome>,
}

impl TeamRecord {
    pub fn new(team_name: &str) -> Self {
        TeamRecord {
            team_name: team_name.to_string(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.wins * 2 + self.ot_losses
    }

    #[inline]
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ot_losses
    }

    pub fn goal_diff(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    pub fn point_pct(&self) -> f32 {
        let gp = self.games_played();
        if gp == 0 {
            return 0.0;
        }
        self.points() as f32 / (gp * 2) as f32
    }

    pub fn home_record(&self) -> String {
        format!("{}-{}-{}", self.home_wins, self.home_losses, self.home_ot_losses)
    }

    pub fn away_record(&self) -> String {
        format!("{}-{}-{}", self.away_wins, self.away_losses, self.away_ot_losses)
    }

    pub fn last10(&self) -> String {
        let start = self.recent_results.len().saturating_sub(10);
        let sample = &self.recent_results[start..];
        let wins = sample.iter().filter(|r| **r == GameOutcome::W).count();
        let losses = sample.iter().filter(|r| **r == GameOutcome::L).count();
        let otl = sample.iter().filter(|r| **r == GameOutcome::OTL).count();
        format!("{}-{}-{}", wins, losses, otl)
    }

    /// Consecutive wins read "Wk"; any run of non-wins reads "Lk", matching
    /// how fans talk about losing streaks regardless of overtime points.
    pub fn streak(&self) -> String {
        let Some(last) = self.recent_results.last() else {
            return String::from("-");
        };
        let winning = *last == GameOutcome::W;
        let count = self
            .recent_results
            .iter()
            .rev()
            .take_while(|r| (**r == GameOutcome::W) == winning)
            .count();
        format!("{}{}", if winning { 'W' } else { 'L' }, count)
    }

    pub fn pp_pct(&self) -> f32 {
        if self.pp_chances == 0 {
            return 0.0;
        }
        self.pp_goals as f32 / self.pp_chances as f32
    }

    pub fn pk_pct(&self) -> f32 {
        if self.pk_chances_against == 0 {
            return 0.0;
        }
        let killed = self.pk_chances_against.saturating_sub(self.pk_goals_against);
        killed as f32 / self.pk_chances_against as f32
    }

    #[allow(clippy::too_many_arguments)]
    pub fn register_game(
        &mut self,
        goals_for: u32,
        goals_against: u32,
        overtime: bool,
        is_home: bool,
        pp_goals: u32,
        pp_chances: u32,
        pk_goals_against: u32,
        pk_chances_against: u32,
    ) {
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        self.pp_goals += pp_goals;
        self.pp_chances += pp_chances;
        self.pk_goals_against += pk_goals_against;
        self.pk_chances_against += pk_chances_against;

        if goals_for > goals_against {
            self.wins += 1;
            self.recent_results.push(GameOutcome::W);
            if is_home {
                self.home_wins += 1;
            } else {
                self.away_wins += 1;
            }
        } else if overtime {
            self.ot_losses += 1;
            self.recent_results.push(GameOutcome::OTL);
            if is_home {
                self.home_ot_losses += 1;
            } else {
                self.away_ot_losses += 1;
            }
        } else {
            self.losses += 1;
            self.recent_results.push(GameOutcome::L);
            if is_home {
                self.home_losses += 1;
            } else {
                self.away_losses += 1;
            }
        }

        // Only the trailing window matters for L10 and streak displays.
        if self.recent_results.len() > 10 {
            let excess = self.recent_results.len() - 10;
            self.recent_results.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_formula() {
        let mut record = TeamRecord::new("Aurora");
        record.register_game(3, 1, false, true, 1, 4, 0, 3);
        record.register_game(2, 3, true, false, 0, 2, 1, 3);
        record.register_game(1, 4, false, false, 0, 3, 2, 5);
        assert_eq!(record.wins, 1);
        assert_eq!(record.ot_losses, 1);
        assert_eq!(record.losses, 1);
        assert_eq!(record.points(), 3);
        assert_eq!(record.games_played(), 3);
        assert!((record.point_pct() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn home_away_splits() {
        let mut record = TeamRecord::new("Aurora");
        record.register_game(4, 2, false, true, 0, 0, 0, 0);
        record.register_game(1, 2, false, false, 0, 0, 0, 0);
        assert_eq!(record.home_record(), "1-0-0");
        assert_eq!(record.away_record(), "0-1-0");
    }

    #[test]
    fn streak_counts_otl_as_losing() {
        let mut record = TeamRecord::new("Aurora");
        record.register_game(1, 2, false, true, 0, 0, 0, 0);
        record.register_game(2, 3, true, true, 0, 0, 0, 0);
        assert_eq!(record.streak(), "L2");

        record.register_game(5, 0, false, true, 0, 0, 0, 0);
        assert_eq!(record.streak(), "W1");
    }

    #[test]
    fn recent_results_window_is_ten() {
        let mut record = TeamRecord::new("Aurora");
        for _ in 0..14 {
            record.register_game(2, 1, false, true, 0, 0, 0, 0);
        }
        assert_eq!(record.recent_results.len(), 10);
        assert_eq!(record.last10(), "10-0-0");
    }

    #[test]
    fn special_teams_percentages() {
        let mut record = TeamRecord::new("Aurora");
        record.register_game(3, 2, false, true, 2, 8, 1, 4);
        assert!((record.pp_pct() - 0.25).abs() < 1e-6);
        assert!((record.pk_pct() - 0.75).abs() < 1e-6);
    }
}
