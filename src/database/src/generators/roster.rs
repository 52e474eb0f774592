use core::club::player::{Player, PlayerPosition, PlayerSkills, ProspectProfile, ProspectTier};
use core::shared::names::{NameGenerator, sample_birth_country};
use rand::Rng;
use rand::RngExt;
use rand::rngs::StdRng;

fn clamp_rating(value: f32) -> f32 {
    value.clamp(0.3, 5.0)
}

/// Tier plan rows: (weight, low, high). Sampling walks the cumulative
/// weights so a roster carries very few stars and a broad middle class.
fn sample_quality(rng: &mut StdRng, tier_plan: &[(f32, f32, f32)]) -> f32 {
    let roll: f32 = rng.random();
    let mut cumulative = 0.0;
    for (weight, low, high) in tier_plan {
        cumulative += weight;
        if roll <= cumulative {
            return rng.random_range(*low..*high);
        }
    }
    let (_, low, high) = tier_plan[tier_plan.len() - 1];
    rng.random_range(low..high)
}

fn new_player(
    team_name: &str,
    name_gen: &mut NameGenerator,
    rng: &mut StdRng,
    position: PlayerPosition,
    skills: PlayerSkills,
    age: u8,
    prime_age: u8,
) -> Player {
    let (birth_country, birth_country_code) = sample_birth_country(rng);
    let name = name_gen.next_name();
    let mut player = Player::new(team_name, &name, position, skills, age, prime_age);
    player.id = format!("{:016x}{:016x}", rng.random::<u64>(), rng.random::<u64>());
    player.birth_country = birth_country;
    player.birth_country_code = birth_country_code;
    player
}

/// 13 forwards, 7 defensemen, 2 goalies with role archetypes bending the
/// skill mix around each team's identity biases.
pub fn make_roster(
    team_name: &str,
    offense_bias: f32,
    defense_bias: f32,
    physical_bias: f32,
    name_gen: &mut NameGenerator,
    rng: &mut StdRng,
) -> Vec<Player> {
    let mut roster: Vec<Player> = Vec::with_capacity(22);

    let forward_positions = [
        PlayerPosition::Center,
        PlayerPosition::Center,
        PlayerPosition::Center,
        PlayerPosition::Center,
        PlayerPosition::Center,
        PlayerPosition::LeftWing,
        PlayerPosition::LeftWing,
        PlayerPosition::LeftWing,
        PlayerPosition::LeftWing,
        PlayerPosition::RightWing,
        PlayerPosition::RightWing,
        PlayerPosition::RightWing,
        PlayerPosition::RightWing,
    ];
    let forward_tiers = [
        (0.08, 0.90, 1.00),
        (0.22, 0.74, 0.89),
        (0.42, 0.56, 0.73),
        (0.28, 0.38, 0.55),
    ];
    for position in forward_positions {
        let quality = sample_quality(rng, &forward_tiers);
        let role = rng.random_range(0..4);
        let (shoot_adj, make_adj, def_adj, phy_adj) = match role {
            // sniper
            0 => (0.22, -0.10, -0.06, -0.02),
            // playmaker
            1 => (-0.10, 0.22, -0.06, -0.02),
            // two-way
            2 => (0.02, 0.02, 0.18, 0.06),
            // depth grinder
            _ => (0.02, 0.02, 0.10, 0.16),
        };
        let skills = PlayerSkills {
            shooting: clamp_rating(
                1.55 + quality * 3.20 + offense_bias * 0.80 + shoot_adj
                    + rng.random_range(-0.12..0.12),
            ),
            playmaking: clamp_rating(
                1.55 + quality * 3.10 + offense_bias * 0.75 + make_adj
                    + rng.random_range(-0.12..0.12),
            ),
            defense: clamp_rating(
                1.45 + quality * 2.95 + defense_bias * 0.85 + def_adj
                    + rng.random_range(-0.10..0.10),
            ),
            goaltending: 0.3,
            physical: clamp_rating(
                1.50 + quality * 2.65 + physical_bias * 0.90 + phy_adj
                    + rng.random_range(-0.12..0.12),
            ),
            durability: clamp_rating(1.80 + quality * 2.35 + rng.random_range(-0.15..0.15)),
        };
        let age = rng.random_range(20..=35);
        let prime_age = rng.random_range(25..=29);
        roster.push(new_player(team_name, name_gen, rng, position, skills, age, prime_age));
    }

    let defense_tiers = [
        (0.07, 0.88, 1.00),
        (0.24, 0.72, 0.87),
        (0.41, 0.55, 0.71),
        (0.28, 0.38, 0.54),
    ];
    for _ in 0..7 {
        let quality = sample_quality(rng, &defense_tiers);
        let role = rng.random_range(0..4);
        let (shoot_adj, make_adj, def_adj, phy_adj) = match role {
            // shutdown
            0 => (-0.05, -0.04, 0.28, 0.18),
            // two-way
            1 => (0.02, 0.06, 0.10, 0.05),
            // offensive
            2 => (0.16, 0.18, -0.06, 0.05),
            // depth
            _ => (0.02, -0.04, -0.06, 0.18),
        };
        let skills = PlayerSkills {
            shooting: clamp_rating(
                1.40 + quality * 2.75 + offense_bias * 0.60 + shoot_adj
                    + rng.random_range(-0.10..0.10),
            ),
            playmaking: clamp_rating(
                1.55 + quality * 2.95 + offense_bias * 0.65 + make_adj
                    + rng.random_range(-0.10..0.10),
            ),
            defense: clamp_rating(
                1.85 + quality * 3.05 + defense_bias * 1.00 + def_adj
                    + rng.random_range(-0.10..0.10),
            ),
            goaltending: 0.3,
            physical: clamp_rating(
                1.65 + quality * 2.70 + physical_bias * 1.00 + phy_adj
                    + rng.random_range(-0.12..0.12),
            ),
            durability: clamp_rating(1.90 + quality * 2.30 + rng.random_range(-0.12..0.12)),
        };
        let age = rng.random_range(20..=36);
        let prime_age = rng.random_range(26..=30);
        roster.push(new_player(
            team_name,
            name_gen,
            rng,
            PlayerPosition::Defense,
            skills,
            age,
            prime_age,
        ));
    }

    // One starter and one backup with a realistic skill gap.
    let starter_quality =
        sample_quality(rng, &[(0.08, 0.90, 1.00), (0.35, 0.76, 0.89), (0.57, 0.58, 0.75)]);
    let backup_quality =
        sample_quality(rng, &[(0.02, 0.88, 0.96), (0.18, 0.72, 0.87), (0.80, 0.48, 0.71)]);
    for (idx, quality) in [starter_quality, backup_quality].into_iter().enumerate() {
        let starter_edge = if idx == 0 { 0.14 } else { -0.10 };
        let durability_edge = if idx == 0 { 0.10 } else { -0.05 };
        let skills = PlayerSkills {
            shooting: 0.4,
            playmaking: clamp_rating(1.00 + quality * 1.70 + rng.random_range(-0.08..0.08)),
            defense: clamp_rating(
                1.80 + quality * 2.20 + defense_bias * 0.45 + rng.random_range(-0.08..0.08),
            ),
            goaltending: clamp_rating(
                2.05 + quality * 2.55 + defense_bias * 0.65 + starter_edge
                    + rng.random_range(-0.08..0.08),
            ),
            physical: clamp_rating(
                1.55 + quality * 2.00 + physical_bias * 0.55 + rng.random_range(-0.08..0.08),
            ),
            durability: clamp_rating(
                2.05 + quality * 2.00 + durability_edge + rng.random_range(-0.08..0.08),
            ),
        };
        let age = rng.random_range(22..=36);
        let prime_age = rng.random_range(27..=32);
        roster.push(new_player(
            team_name,
            name_gen,
            rng,
            PlayerPosition::Goalie,
            skills,
            age,
            prime_age,
        ));
    }

    roster
}

/// Ten-man farm group of prospects aged 18-24 with development tracks.
pub fn make_minor_roster(
    team_name: &str,
    offense_bias: f32,
    defense_bias: f32,
    physical_bias: f32,
    name_gen: &mut NameGenerator,
    rng: &mut StdRng,
) -> Vec<Player> {
    let positions = [
        PlayerPosition::Center,
        PlayerPosition::LeftWing,
        PlayerPosition::RightWing,
        PlayerPosition::Center,
        PlayerPosition::LeftWing,
        PlayerPosition::RightWing,
        PlayerPosition::Defense,
        PlayerPosition::Defense,
        PlayerPosition::Defense,
        PlayerPosition::Goalie,
    ];
    let mut roster = Vec::with_capacity(positions.len());
    for position in positions {
        let quality: f32 = rng.random_range(0.36..0.72);
        let mut shooting = 1.20 + quality * 2.40 + offense_bias * 0.60 + rng.random_range(-0.10..0.10);
        let mut playmaking =
            1.20 + quality * 2.35 + offense_bias * 0.55 + rng.random_range(-0.10..0.10);
        let defense = 1.30 + quality * 2.30 + defense_bias * 0.70 + rng.random_range(-0.10..0.10);
        let physical = 1.35 + quality * 2.10 + physical_bias * 0.75 + rng.random_range(-0.10..0.10);
        let mut goaltending = 0.3;
        if position.is_goalie() {
            goaltending = 1.70 + quality * 2.25 + defense_bias * 0.55 + rng.random_range(-0.08..0.08);
            shooting = 0.4;
            playmaking = 0.90 + quality * 1.45 + rng.random_range(-0.08..0.08);
        }
        let skills = PlayerSkills {
            shooting: clamp_rating(shooting),
            playmaking: clamp_rating(playmaking),
            defense: clamp_rating(defense),
            goaltending: clamp_rating(goaltending),
            physical: clamp_rating(physical),
            durability: clamp_rating(1.80 + quality * 2.00 + rng.random_range(-0.10..0.10)),
        };
        let age = rng.random_range(18..=24);
        let prime_age = rng.random_range(25..=29);
        let mut player = new_player(team_name, name_gen, rng, position, skills, age, prime_age);
        player.prospect = ProspectProfile {
            tier: ProspectTier::Ahl,
            seasons_to_nhl: rng.random_range(0..=2),
            potential: (0.35 + quality * 0.60 + rng.random_range(-0.06..0.06)).clamp(0.25, 0.98),
            boom_chance: (0.05 + quality * 0.10 + rng.random_range(-0.02..0.02)).clamp(0.03, 0.22),
            bust_chance: (0.16 - quality * 0.11 + rng.random_range(-0.02..0.02)).clamp(0.04, 0.24),
            resolved: false,
        };
        roster.push(player);
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn roster_shape_is_13f_7d_2g() {
        let mut name_gen = NameGenerator::new(7);
        let mut rng = StdRng::seed_from_u64(7);
        let roster = make_roster("Aurora", 0.3, 0.15, 0.08, &mut name_gen, &mut rng);
        assert_eq!(roster.len(), 22);
        assert_eq!(roster.iter().filter(|p| p.position.is_forward()).count(), 13);
        assert_eq!(roster.iter().filter(|p| p.position.is_defense()).count(), 7);
        assert_eq!(roster.iter().filter(|p| p.position.is_goalie()).count(), 2);
    }

    #[test]
    fn ratings_stay_in_bounds() {
        let mut name_gen = NameGenerator::new(9);
        let mut rng = StdRng::seed_from_u64(9);
        let roster = make_roster("Glaciers", 0.34, 0.08, 0.10, &mut name_gen, &mut rng);
        for player in &roster {
            for value in [
                player.skills.shooting,
                player.skills.playmaking,
                player.skills.defense,
                player.skills.goaltending,
                player.skills.physical,
                player.skills.durability,
            ] {
                assert!((0.3..=5.0).contains(&value), "{} out of bounds", value);
            }
        }
    }

    #[test]
    fn minor_roster_is_all_prospects() {
        let mut name_gen = NameGenerator::new(3);
        let mut rng = StdRng::seed_from_u64(3);
        let minors = make_minor_roster("Aurora", 0.2, 0.2, 0.1, &mut name_gen, &mut rng);
        assert_eq!(minors.len(), 10);
        for player in &minors {
            assert!(player.age <= 24);
            assert!(!player.prospect.resolved);
        }
    }

    #[test]
    fn generation_is_seed_deterministic() {
        let build = || {
            let mut name_gen = NameGenerator::new(11);
            let mut rng = StdRng::seed_from_u64(11);
            make_roster("Aurora", 0.3, 0.15, 0.08, &mut name_gen, &mut rng)
        };
        let first = build();
        let second = build();
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.id, b.id);
            assert_eq!(a.skills.shooting, b.skills.shooting);
        }
    }
}
