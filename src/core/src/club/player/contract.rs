use crate::club::player::player::Player;
use serde::{Deserialize, Serialize};

/// League-wide salary cap in millions. Flat across teams.
pub const TEAM_CAP_LIMIT: f64 = 86.0;

pub const MIN_CAP_HIT: f64 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    #[default]
    Entry,
    Bridge,
    Core,
    Veteran,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerContract {
    pub years_left: u32,
    pub cap_hit: f64,
    pub contract_type: ContractType,
    pub is_rfa: bool,
    #[serde(default)]
    pub free_agent_origin_team: String,
}

impl Default for PlayerContract {
    fn default() -> Self {
        PlayerContract {
            years_left: 2,
            cap_hit: 1.2,
            contract_type: ContractType::Entry,
            is_rfa: true,
            free_agent_origin_team: String::new(),
        }
    }
}

impl PlayerContract {
    pub fn assign(&mut self, offer: &ContractOffer) {
        self.years_left = offer.years.max(1);
        self.cap_hit = round_cap(offer.cap_hit.max(MIN_CAP_HIT));
        self.contract_type = offer.contract_type;
        self.is_rfa = offer.is_rfa;
    }

    pub fn needs_backfill(&self) -> bool {
        self.years_left == 0 || self.cap_hit <= 0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContractOffer {
    pub years: u32,
    pub cap_hit: f64,
    pub contract_type: ContractType,
    pub is_rfa: bool,
}

impl ContractOffer {
    /// Market-rate ask for a player: age band picks term and structure,
    /// overall value scales the dollars.
    pub fn estimate(player: &Player) -> ContractOffer {
        let value = player.overall() as f64;
        if player.age <= 23 {
            return ContractOffer {
                years: 3,
                cap_hit: 0.9 + value * 0.18,
                contract_type: ContractType::Entry,
                is_rfa: true,
            };
        }
        if player.age <= 27 {
            return ContractOffer {
                years: if value >= 2.95 { 3 } else { 2 },
                cap_hit: 1.15 + value * 0.34,
                contract_type: if value < 3.3 {
                    ContractType::Bridge
                } else {
                    ContractType::Core
                },
                is_rfa: false,
            };
        }
        if player.age <= 31 {
            return ContractOffer {
                years: if value >= 3.35 { 3 } else { 2 },
                cap_hit: 1.35 + value * 0.36,
                contract_type: if value >= 3.35 {
                    ContractType::Core
                } else {
                    ContractType::Veteran
                },
                is_rfa: false,
            };
        }
        ContractOffer {
            years: if player.age >= 35 { 1 } else { 2 },
            cap_hit: 0.95 + value * 0.29,
            contract_type: ContractType::Veteran,
            is_rfa: false,
        }
    }
}

pub fn round_cap(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::player::Player;
    use crate::club::player::position::PlayerPosition;
    use crate::club::player::skills::PlayerSkills;

    fn forward(age: u8, shooting: f32) -> Player {
        let mut player = Player::new(
            "Aurora",
            "Test Forward",
            PlayerPosition::Center,
            PlayerSkills {
                shooting,
                playmaking: 3.0,
                defense: 2.8,
                goaltending: 0.3,
                physical: 2.9,
                durability: 3.0,
            },
            age,
            27,
        );
        player.id = "test-forward".into();
        player
    }

    #[test]
    fn young_players_get_entry_deals() {
        let offer = ContractOffer::estimate(&forward(20, 3.4));
        assert_eq!(offer.contract_type, ContractType::Entry);
        assert_eq!(offer.years, 3);
        assert!(offer.is_rfa);
    }

    #[test]
    fn veterans_get_short_terms() {
        let offer = ContractOffer::estimate(&forward(36, 3.0));
        assert_eq!(offer.contract_type, ContractType::Veteran);
        assert_eq!(offer.years, 1);
        assert!(!offer.is_rfa);
    }

    #[test]
    fn assign_enforces_floors() {
        let mut contract = PlayerContract::default();
        contract.assign(&ContractOffer {
            years: 0,
            cap_hit: 0.10,
            contract_type: ContractType::Veteran,
            is_rfa: false,
        });
        assert_eq!(contract.years_left, 1);
        assert_eq!(contract.cap_hit, MIN_CAP_HIT);
    }
}
