use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum PlayerPosition {
    #[default]
    #[serde(rename = "C")]
    Center,
    #[serde(rename = "LW")]
    LeftWing,
    #[serde(rename = "RW")]
    RightWing,
    #[serde(rename = "D")]
    Defense,
    #[serde(rename = "G")]
    Goalie,
}

impl PlayerPosition {
    pub fn is_forward(&self) -> bool {
        matches!(
            self,
            PlayerPosition::Center | PlayerPosition::LeftWing | PlayerPosition::RightWing
        )
    }

    pub fn is_defense(&self) -> bool {
        matches!(self, PlayerPosition::Defense)
    }

    pub fn is_goalie(&self) -> bool {
        matches!(self, PlayerPosition::Goalie)
    }

    pub fn is_skater(&self) -> bool {
        !self.is_goalie()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerPosition::Center => "C",
            PlayerPosition::LeftWing => "LW",
            PlayerPosition::RightWing => "RW",
            PlayerPosition::Defense => "D",
            PlayerPosition::Goalie => "G",
        }
    }
}

impl Display for PlayerPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlayerPosition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_uppercase().as_str() {
            "C" => Ok(PlayerPosition::Center),
            "LW" => Ok(PlayerPosition::LeftWing),
            "RW" => Ok(PlayerPosition::RightWing),
            "D" => Ok(PlayerPosition::Defense),
            "G" => Ok(PlayerPosition::Goalie),
            other => Err(format!("unknown position '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_groups() {
        assert!(PlayerPosition::Center.is_forward());
        assert!(PlayerPosition::LeftWing.is_skater());
        assert!(PlayerPosition::Defense.is_defense());
        assert!(!PlayerPosition::Goalie.is_skater());
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("lw".parse::<PlayerPosition>(), Ok(PlayerPosition::LeftWing));
        assert!("X".parse::<PlayerPosition>().is_err());
    }
}
