use crate::generators::roster::{make_minor_roster, make_roster};
use core::club::team::Team;
use core::shared::names::NameGenerator;
use log::info;
use rand::Rng;
use rand::RngExt;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Franchise identity row: name, offense/defense/physical biases, colors.
type FranchiseSeed = (&'static str, f32, f32, f32, &'static str, &'static str);

const NORTH: [FranchiseSeed; 6] = [
    ("Aurora", 0.30, 0.15, 0.08, "#4cc9f0", "#bdefff"),
    ("Icebreakers", 0.22, 0.25, 0.12, "#1d4ed8", "#dbeafe"),
    ("Timberwolves", 0.18, 0.28, 0.16, "#166534", "#d4af37"),
    ("Glaciers", 0.12, 0.32, 0.10, "#0f766e", "#ccfbf1"),
    ("Polar Caps", 0.26, 0.14, 0.20, "#0c2340", "#c0c0c0"),
    ("Silver Pines", 0.16, 0.24, 0.18, "#1f6f50", "#c0c0c0"),
];

const EAST: [FranchiseSeed; 6] = [
    ("Harbor Kings", 0.28, 0.10, 0.14, "#5b2c83", "#d8c7a0"),
    ("Liberty Blades", 0.24, 0.22, 0.12, "#c1121f", "#1d4ed8"),
    ("Metro Sparks", 0.34, 0.08, 0.10, "#f97316", "#ffedd5"),
    ("Atlantic Wolves", 0.20, 0.20, 0.16, "#4338ca", "#e0e7ff"),
    ("Capital Foxes", 0.14, 0.30, 0.15, "#b45309", "#fef3c7"),
    ("Bay Comets", 0.25, 0.16, 0.13, "#0369a1", "#e0f2fe"),
];

const CENTRAL: [FranchiseSeed; 6] = [
    ("Prairie Storm", 0.22, 0.20, 0.22, "#0891b2", "#cffafe"),
    ("Iron Rangers", 0.18, 0.30, 0.24, "#1f2937", "#c1121f"),
    ("Lake Vipers", 0.26, 0.16, 0.18, "#0f766e", "#ccfbf1"),
    ("Granite Bears", 0.14, 0.28, 0.25, "#7f1d1d", "#fee2e2"),
    ("Steel River", 0.20, 0.24, 0.20, "#334155", "#e2e8f0"),
    ("Red Hawks", 0.30, 0.12, 0.18, "#dc2626", "#fee2e2"),
];

const WEST: [FranchiseSeed; 6] = [
    ("Desert Fire", 0.32, 0.08, 0.12, "#ea580c", "#ffedd5"),
    ("Pacific Tide", 0.24, 0.18, 0.16, "#2563eb", "#dbeafe"),
    ("Summit Eagles", 0.21, 0.22, 0.19, "#0f766e", "#ccfbf1"),
    ("Canyon Coyotes", 0.19, 0.24, 0.21, "#92400e", "#ffedd5"),
    ("Emerald Orcas", 0.27, 0.14, 0.14, "#059669", "#d1fae5"),
    ("Golden Peaks", 0.23, 0.20, 0.17, "#ca8a04", "#fef9c3"),
];

fn monogram(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

/// Mix the world seed with a team-local tag so every franchise draws from
/// its own reproducible stream.
fn team_rng(seed: u64, tag: &str, team_name: &str) -> StdRng {
    let mut mixed = seed ^ 0x9e37_79b9_7f4a_7c15;
    for byte in tag.bytes().chain(team_name.bytes()) {
        mixed = mixed.wrapping_mul(0x100_0000_01b3) ^ byte as u64;
    }
    StdRng::seed_from_u64(mixed)
}

pub struct WorldGenerator;

impl WorldGenerator {
    /// Build the default 24-franchise world: four divisions across two
    /// conferences, full rosters, farm groups, branding, and arenas.
    pub fn generate(seed: u64) -> Vec<Team> {
        let mut name_gen = NameGenerator::new(seed);
        let mut teams: Vec<Team> = Vec::with_capacity(24);

        let divisions: [(&str, &str, &[FranchiseSeed; 6]); 4] = [
            ("North", "Western", &NORTH),
            ("East", "Eastern", &EAST),
            ("Central", "Eastern", &CENTRAL),
            ("West", "Western", &WEST),
        ];

        for (division, conference, entries) in divisions {
            for (name, offense, defense, physical, primary, secondary) in entries.iter() {
                let mut roster_rng = team_rng(seed, "roster", name);
                let roster = make_roster(name, *offense, *defense, *physical, &mut name_gen, &mut roster_rng);
                let mut minors_rng = team_rng(seed, "minor", name);
                let minor_roster =
                    make_minor_roster(name, *offense, *defense, *physical, &mut name_gen, &mut minors_rng);
                let mut arena_rng = team_rng(seed, "arena", name);

                let mut team = Team::new(name, division, conference);
                team.logo = monogram(name);
                team.primary_color = primary.to_string();
                team.secondary_color = secondary.to_string();
                team.arena_capacity = arena_rng.random_range(11000..=21500);
                team.roster = roster;
                team.minor_roster = minor_roster;
                teams.push(team);
            }
        }

        info!("generated {} franchises", teams.len());
        teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn world_has_24_teams_in_4_divisions() {
        let teams = WorldGenerator::generate(7);
        assert_eq!(teams.len(), 24);
        let divisions: BTreeSet<&String> = teams.iter().map(|t| &t.division).collect();
        assert_eq!(divisions.len(), 4);
        let conferences: BTreeSet<&String> = teams.iter().map(|t| &t.conference).collect();
        assert_eq!(conferences.len(), 2);
        for conference in ["Eastern", "Western"] {
            assert_eq!(
                teams.iter().filter(|t| t.conference == conference).count(),
                12
            );
        }
    }

    #[test]
    fn player_names_are_globally_unique() {
        let teams = WorldGenerator::generate(7);
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for team in &teams {
            for player in team.organization_players() {
                assert!(seen.insert(player.name.clone()), "duplicate {}", player.name);
            }
        }
    }

    #[test]
    fn arena_capacities_are_in_range() {
        for team in WorldGenerator::generate(3) {
            assert!((11000..=21500).contains(&team.arena_capacity));
        }
    }

    #[test]
    fn same_seed_same_world() {
        let first = WorldGenerator::generate(42);
        let second = WorldGenerator::generate(42);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.arena_capacity, b.arena_capacity);
            for (pa, pb) in a.roster.iter().zip(&b.roster) {
                assert_eq!(pa.name, pb.name);
                assert_eq!(pa.skills.shooting, pb.skills.shooting);
            }
        }
    }
}
