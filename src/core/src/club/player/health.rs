use crate::club::player::injury::InjuryType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InjuryStatus {
    #[default]
    Healthy,
    #[serde(rename = "DTD")]
    DayToDay,
    #[serde(rename = "IR")]
    InjuredReserve,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerHealth {
    #[serde(default)]
    pub injuries: u32,
    #[serde(default)]
    pub injured_games_remaining: u32,
    #[serde(default)]
    pub games_missed_injury: u32,
    #[serde(default)]
    pub injury_type: Option<InjuryType>,
    #[serde(default)]
    pub injury_status: InjuryStatus,
    #[serde(default)]
    pub dtd_play_today: bool,
    #[serde(default)]
    pub temporary_replacement_for: String,
}

impl PlayerHealth {
    pub fn record_injury(&mut self, injury: InjuryType, games_out: u32) {
        // A new knock never shortens an existing timer; the label and status
        // follow whichever injury keeps the player out longer.
        if games_out >= self.injured_games_remaining {
            self.injury_type = Some(injury);
        }
        self.injuries += 1;
        self.injured_games_remaining = self.injured_games_remaining.max(games_out);
        self.games_missed_injury += games_out;
        self.injury_status = InjuryType::status_for_games_out(self.injured_games_remaining);
    }

    /// One calendar day of recovery. DTD flags are single-day decisions and
    /// always reset here.
    pub fn advance_recovery_day(&mut self) {
        self.dtd_play_today = false;
        if self.injured_games_remaining > 0 {
            self.injured_games_remaining -= 1;
            if self.injured_games_remaining == 0 {
                self.injury_type = None;
                self.injury_status = InjuryStatus::Healthy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovery_clears_status_at_zero() {
        let mut health = PlayerHealth::default();
        health.record_injury(InjuryType::GroinStrain, 2);
        assert_eq!(health.injury_status, InjuryStatus::DayToDay);

        health.advance_recovery_day();
        assert_eq!(health.injured_games_remaining, 1);
        assert_eq!(health.injury_status, InjuryStatus::DayToDay);

        health.advance_recovery_day();
        assert_eq!(health.injured_games_remaining, 0);
        assert_eq!(health.injury_status, InjuryStatus::Healthy);
        assert!(health.injury_type.is_none());
    }

    #[test]
    fn overlapping_injury_keeps_longer_timer() {
        let mut health = PlayerHealth::default();
        health.record_injury(InjuryType::Concussion, 10);
        health.record_injury(InjuryType::Illness, 1);
        assert_eq!(health.injured_games_remaining, 10);
        assert_eq!(health.injury_type, Some(InjuryType::Concussion));
        assert_eq!(health.injury_status, InjuryStatus::InjuredReserve);
        assert_eq!(health.injuries, 2);
    }
}
