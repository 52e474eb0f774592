use crate::club::player::PlayerPosition;
use crate::club::team::team::Team;
use std::collections::BTreeSet;

/// Sweater-number pools by position. Goalies draw from the traditional
/// netminder numbers first; skaters take everything else.
fn number_pool_for_position(position: PlayerPosition) -> Vec<u8> {
    if position.is_goalie() {
        let mut pool = vec![1u8];
        pool.extend(30..=39);
        pool.extend([41, 50, 60, 70, 80, 90]);
        return pool;
    }
    let mut pool: Vec<u8> = (2..=29).collect();
    pool.extend(40..=99);
    pool
}

impl Team {
    pub fn retired_number_set(&self) -> BTreeSet<u8> {
        self.retired_numbers
            .iter()
            .filter(|row| (1..=99).contains(&row.number))
            .map(|row| row.number)
            .collect()
    }

    /// Re-validate every sweater number in the organization: keep valid
    /// unique ones, strip anything retired or duplicated, then fill gaps
    /// from the position pools.
    pub fn assign_player_numbers(&mut self) {
        let reserved = self.retired_number_set();
        let mut used: BTreeSet<u8> = BTreeSet::new();

        for player in self.organization_players_mut() {
            let Some(number) = player.jersey_number else {
                continue;
            };
            if !(1..=99).contains(&number) || reserved.contains(&number) || used.contains(&number) {
                player.jersey_number = None;
                continue;
            }
            used.insert(number);
        }

        for player in self.organization_players_mut() {
            if player.jersey_number.is_some() {
                continue;
            }
            let assigned = number_pool_for_position(player.position)
                .into_iter()
                .find(|n| !used.contains(n) && !reserved.contains(n))
                .or_else(|| (1..=99).find(|n| !used.contains(n) && !reserved.contains(n)))
                .unwrap_or(99);
            player.jersey_number = Some(assigned);
            used.insert(assigned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::player::{Player, PlayerSkills};
    use crate::club::team::team::RetiredNumber;

    fn team_with_players(count: usize) -> Team {
        let mut team = Team::new("Aurora", "North", "Western");
        for idx in 0..count {
            team.roster.push(Player::new(
                "Aurora",
                &format!("Skater {}", idx),
                PlayerPosition::Center,
                PlayerSkills::default(),
                24,
                27,
            ));
        }
        team.roster.push(Player::new(
            "Aurora",
            "Keeper",
            PlayerPosition::Goalie,
            PlayerSkills::default(),
            27,
            30,
        ));
        team
    }

    #[test]
    fn numbers_are_unique_across_organization() {
        let mut team = team_with_players(20);
        team.assign_player_numbers();
        let numbers: BTreeSet<u8> = team
            .organization_players()
            .filter_map(|p| p.jersey_number)
            .collect();
        assert_eq!(numbers.len(), team.roster.len());
    }

    #[test]
    fn retired_numbers_are_never_reassigned() {
        let mut team = team_with_players(10);
        team.retired_numbers.push(RetiredNumber {
            season: 1,
            number: 1,
            player: "Old Keeper".into(),
        });
        team.player_by_name_mut("Keeper").unwrap().jersey_number = Some(1);
        team.assign_player_numbers();
        assert_ne!(team.player_by_name("Keeper").unwrap().jersey_number, Some(1));
    }

    #[test]
    fn goalie_prefers_netminder_numbers() {
        let mut team = team_with_players(3);
        team.assign_player_numbers();
        let keeper = team.player_by_name("Keeper").unwrap();
        assert_eq!(keeper.jersey_number, Some(1));
    }

    #[test]
    fn duplicate_numbers_are_regenerated() {
        let mut team = team_with_players(4);
        for player in team.roster.iter_mut() {
            player.jersey_number = Some(7);
        }
        team.assign_player_numbers();
        let numbers: BTreeSet<u8> = team.roster.iter().filter_map(|p| p.jersey_number).collect();
        assert_eq!(numbers.len(), team.roster.len());
        assert!(numbers.contains(&7));
    }
}
