use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProspectTier {
    #[default]
    #[serde(rename = "NHL")]
    Nhl,
    #[serde(rename = "AHL")]
    Ahl,
    Junior,
}

/// Development track for players that are not yet everyday pros. Resolved
/// once with a boom/bust roll when `seasons_to_nhl` reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectProfile {
    pub tier: ProspectTier,
    pub seasons_to_nhl: u32,
    pub potential: f32,
    pub boom_chance: f32,
    pub bust_chance: f32,
    pub resolved: bool,
}

impl Default for ProspectProfile {
    fn default() -> Self {
        ProspectProfile {
            tier: ProspectTier::Nhl,
            seasons_to_nhl: 0,
            potential: 0.5,
            boom_chance: 0.08,
            bust_chance: 0.10,
            resolved: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftProvenance {
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub overall: Option<u32>,
    #[serde(default)]
    pub team: Option<String>,
}
