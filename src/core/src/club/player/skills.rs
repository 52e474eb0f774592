use crate::club::player::position::PlayerPosition;
use serde::{Deserialize, Serialize};

pub const SKILL_MIN: f32 = 0.3;
pub const SKILL_MAX: f32 = 5.0;

/// Six-axis rating block shared by skaters and goalies. Goalies carry a low
/// fixed shooting rating; skaters carry a floor goaltending rating so an
/// emergency skater-in-net stays representable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerSkills {
    pub shooting: f32,
    pub playmaking: f32,
    pub defense: f32,
    pub goaltending: f32,
    pub physical: f32,
    pub durability: f32,
}

impl Default for PlayerSkills {
    fn default() -> Self {
        PlayerSkills {
            shooting: 2.5,
            playmaking: 2.5,
            defense: 2.5,
            goaltending: 0.3,
            physical: 2.5,
            durability: 2.5,
        }
    }
}

impl PlayerSkills {
    pub fn clamp_all(&mut self) {
        self.shooting = self.shooting.clamp(SKILL_MIN, SKILL_MAX);
        self.playmaking = self.playmaking.clamp(SKILL_MIN, SKILL_MAX);
        self.defense = self.defense.clamp(SKILL_MIN, SKILL_MAX);
        self.goaltending = self.goaltending.clamp(SKILL_MIN, SKILL_MAX);
        self.physical = self.physical.clamp(SKILL_MIN, SKILL_MAX);
        self.durability = self.durability.clamp(SKILL_MIN, SKILL_MAX);
    }

    pub fn scoring_weight(&self) -> f32 {
        (self.shooting * 0.62 + self.playmaking * 0.38).max(0.1)
    }

    pub fn overall_skater(&self) -> f32 {
        self.shooting * 0.38 + self.playmaking * 0.32 + self.defense * 0.22 + self.physical * 0.08
    }

    pub fn overall_goalie(&self) -> f32 {
        self.goaltending * 0.72 + self.durability * 0.18 + self.defense * 0.10
    }

    pub fn overall(&self, position: PlayerPosition) -> f32 {
        if position.is_goalie() {
            self.overall_goalie()
        } else {
            self.overall_skater()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_all_axes() {
        let mut skills = PlayerSkills {
            shooting: 9.0,
            playmaking: -2.0,
            defense: 4.0,
            goaltending: 0.0,
            physical: 5.5,
            durability: 2.0,
        };
        skills.clamp_all();
        assert_eq!(skills.shooting, SKILL_MAX);
        assert_eq!(skills.playmaking, SKILL_MIN);
        assert_eq!(skills.goaltending, SKILL_MIN);
        assert_eq!(skills.physical, SKILL_MAX);
    }

    #[test]
    fn scoring_weight_has_floor() {
        let skills = PlayerSkills {
            shooting: 0.3,
            playmaking: 0.3,
            ..Default::default()
        };
        assert!(skills.scoring_weight() >= 0.1);
    }
}
