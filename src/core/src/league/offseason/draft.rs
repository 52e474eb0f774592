use crate::club::player::{
    DraftProvenance, Player, PlayerPosition, PlayerSkills, ProspectProfile, ProspectTier,
};
use crate::club::team::{MAX_ROSTER_SIZE, MIN_MINOR_ROSTER_SIZE};
use crate::league::history::DraftPickDetail;
use crate::league::league::LeagueSimulator;
use crate::league::needs::DraftFocus;
use log::info;
use rand::Rng;
use rand::RngExt;
use std::collections::BTreeMap;

impl LeagueSimulator {
    /// Position a team drafts for: honor the configured focus most of the
    /// time, otherwise patch organizational shortages before best-available
    /// forwards.
    pub(crate) fn choose_draft_position(&mut self, team_name: &str) -> PlayerPosition {
        let focus = self.get_draft_focus(team_name);
        if focus != DraftFocus::Auto && self.rng.random::<f32>() < 0.82 {
            return match focus {
                DraftFocus::C => PlayerPosition::Center,
                DraftFocus::LW => PlayerPosition::LeftWing,
                DraftFocus::RW => PlayerPosition::RightWing,
                DraftFocus::D => PlayerPosition::Defense,
                DraftFocus::G => PlayerPosition::Goalie,
                DraftFocus::F | DraftFocus::Auto => match self.rng.random_range(0..3) {
                    0 => PlayerPosition::Center,
                    1 => PlayerPosition::LeftWing,
                    _ => PlayerPosition::RightWing,
                },
            };
        }

        let (defense, goalies) = self
            .get_team(team_name)
            .map(|team| {
                let mut counts = (0usize, 0usize);
                for player in team.organization_players() {
                    if player.position.is_defense() {
                        counts.0 += 1;
                    } else if player.position.is_goalie() {
                        counts.1 += 1;
                    }
                }
                counts
            })
            .unwrap_or((0, 0));

        if goalies < 2 {
            return PlayerPosition::Goalie;
        }
        if defense < 7 {
            return PlayerPosition::Defense;
        }
        if self.rng.random::<f32>() < 0.45 {
            PlayerPosition::Center
        } else if self.rng.random::<f32>() < 0.5 {
            PlayerPosition::LeftWing
        } else {
            PlayerPosition::RightWing
        }
    }

    /// Pick quality decays linearly over the round; individual outcomes
    /// still vary with bust and steal tails.
    pub(crate) fn draft_quality_for_pick(&mut self, overall_pick: u32, total_teams: u32) -> f32 {
        let normalized = (overall_pick as f32 - 1.0) / (total_teams.max(2) as f32 - 1.0);
        let baseline = 0.90 - normalized * 0.34;
        let mut noise = self.rng.random_range(-0.07..0.07);
        let tail_roll: f32 = self.rng.random();
        if tail_roll < 0.10 {
            noise -= self.rng.random_range(0.06..0.13);
        } else if tail_roll > 0.90 {
            noise += self.rng.random_range(0.04..0.10);
        }
        (baseline + noise).clamp(0.35, 0.99)
    }

    /// Generate a drafted (or generated-depth) player at the given quality.
    pub(crate) fn create_draft_player(
        &mut self,
        team_name: &str,
        position: PlayerPosition,
        quality: f32,
        draft_round: Option<u32>,
        draft_overall: Option<u32>,
    ) -> Player {
        let quality = quality.clamp(0.35, 1.0);
        let (birth_country, birth_country_code) = self.sample_country();

        let (tier, mut seasons_to_nhl) = if quality >= 0.82 {
            (ProspectTier::Nhl, 0)
        } else if quality >= 0.62 {
            (ProspectTier::Ahl, 1)
        } else {
            (
                ProspectTier::Junior,
                2 + if self.rng.random::<f32>() < 0.33 { 1 } else { 0 },
            )
        };
        let mut tier = tier;
        if self.rng.random::<f32>() < 0.10 && tier != ProspectTier::Nhl {
            tier = ProspectTier::Nhl;
            seasons_to_nhl = 0;
        }

        let mut shooting = 1.45 + quality * 3.00 + self.rng.random_range(-0.12..0.12);
        let mut playmaking = 1.45 + quality * 2.95 + self.rng.random_range(-0.12..0.12);
        let defense = 1.55 + quality * 2.90 + self.rng.random_range(-0.10..0.10);
        let physical = 1.60 + quality * 2.55 + self.rng.random_range(-0.12..0.12);
        let durability = 1.95 + quality * 2.25 + self.rng.random_range(-0.12..0.12);
        let mut goaltending = 0.3;
        if position.is_goalie() {
            goaltending = 2.00 + quality * 2.65 + self.rng.random_range(-0.10..0.10);
            shooting = 0.4;
            playmaking = 0.95 + quality * 1.55 + self.rng.random_range(-0.10..0.10);
        }

        let name = self.names.next_name();
        let age = 18 + self.rng.random_range(0..3) as u8;
        let prime_age = self
            .rng
            .random_range(self.prime_age_min.saturating_sub(1)..=self.prime_age_max + 1);

        let mut skills = PlayerSkills {
            shooting,
            playmaking,
            defense,
            goaltending,
            physical,
            durability,
        };
        skills.clamp_all();

        let mut player = Player::new(team_name, &name, position, skills, age, prime_age);
        player.id = self.next_player_id();
        player.birth_country = birth_country;
        player.birth_country_code = birth_country_code;
        player.draft = DraftProvenance {
            season: Some(self.season_number),
            round: draft_round,
            overall: draft_overall,
            team: Some(team_name.to_string()),
        };
        player.prospect = ProspectProfile {
            tier,
            seasons_to_nhl,
            potential: (0.42 + quality * 0.55 + self.rng.random_range(-0.08..0.08))
                .clamp(0.25, 0.98),
            boom_chance: (0.05 + quality * 0.08 + self.rng.random_range(-0.02..0.03))
                .clamp(0.03, 0.22),
            bust_chance: (0.16 - quality * 0.10 + self.rng.random_range(-0.03..0.03))
                .clamp(0.04, 0.24),
            resolved: false,
        };
        player.contract.years_left = 3;
        player.contract.cap_hit = ((0.95 + quality as f64 * 0.45) * 100.0).round() / 100.0;
        player.contract.contract_type = crate::club::player::ContractType::Entry;
        player.contract.is_rfa = true;
        player
    }

    /// Offseason step 5: one numbered Round-1 pick per team in reverse
    /// standings order (consuming the interactive session when one ran),
    /// then roster top-ups, minors replenishment, and overflow cuts.
    pub(crate) fn run_draft(
        &mut self,
    ) -> (BTreeMap<String, Vec<String>>, BTreeMap<String, Vec<DraftPickDetail>>) {
        let mut drafted: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut drafted_protected: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut details: BTreeMap<String, Vec<DraftPickDetail>> = BTreeMap::new();

        let order: Vec<String> = self
            .get_standings()
            .iter()
            .rev()
            .map(|rec| rec.team_name.clone())
            .collect();
        let total_teams = order.len() as u32;

        let session_picks = self.consume_draft_session(&order);

        for (pick_idx, team_name) in order.iter().enumerate() {
            let overall = pick_idx as u32 + 1;
            let quality = self.draft_quality_for_pick(overall, total_teams);
            let player = match session_picks.as_ref().and_then(|picks| picks.get(pick_idx)) {
                Some(pick) => {
                    let mut player = self.create_draft_player(
                        team_name,
                        pick.position,
                        quality,
                        Some(1),
                        Some(overall),
                    );
                    // The scouted identity is kept; the slot decides quality.
                    player.name = pick.name.clone();
                    player.birth_country = pick.country.clone();
                    player.birth_country_code = pick.country_code.clone();
                    player.age = pick.age;
                    player
                }
                None => {
                    let position = self.choose_draft_position(team_name);
                    self.create_draft_player(team_name, position, quality, Some(1), Some(overall))
                }
            };

            info!("draft: {} selects {} at {}", team_name, player.name, overall);
            drafted.entry(team_name.clone()).or_default().push(player.name.clone());
            drafted_protected
                .entry(team_name.clone())
                .or_default()
                .push(player.name.clone());
            details
                .entry(team_name.clone())
                .or_default()
                .push(DraftPickDetail {
                    name: player.name.clone(),
                    position: player.position.as_str().to_string(),
                    country: player.birth_country.clone(),
                    country_code: player.birth_country_code.clone(),
                    round: Some(1),
                    overall: Some(overall),
                });
            if let Some(team) = self.get_team_mut(team_name) {
                team.minor_roster.push(player);
            }
        }

        // Fill every roster back to the cap from minors, then replenish the
        // minors, then cut overflow (never a fresh draft pick).
        for team_name in order.iter() {
            loop {
                let Some(team) = self.get_team(team_name) else {
                    break;
                };
                if team.roster.len() >= MAX_ROSTER_SIZE || team.minor_roster.is_empty() {
                    break;
                }
                let need_goalie = team
                    .roster
                    .iter()
                    .filter(|p| p.position.is_goalie())
                    .count()
                    < 2;
                let promote = team
                    .minor_roster
                    .iter()
                    .filter(|p| !need_goalie || p.position.is_goalie())
                    .max_by(|a, b| {
                        let ka = if a.position.is_goalie() {
                            a.skills.goaltending
                        } else {
                            a.skills.shooting + a.skills.playmaking + a.skills.defense
                        };
                        let kb = if b.position.is_goalie() {
                            b.skills.goaltending
                        } else {
                            b.skills.shooting + b.skills.playmaking + b.skills.defense
                        };
                        ka.total_cmp(&kb).then(a.skills.durability.total_cmp(&b.skills.durability))
                    })
                    .or_else(|| {
                        team.minor_roster.iter().max_by(|a, b| {
                            (a.skills.shooting + a.skills.playmaking + a.skills.defense)
                                .total_cmp(
                                    &(b.skills.shooting + b.skills.playmaking + b.skills.defense),
                                )
                        })
                    })
                    .map(|p| p.name.clone());
                let Some(promote) = promote else {
                    break;
                };
                if !self.promote_from_minors(team_name, &promote, "") {
                    break;
                }
            }

            while self
                .get_team(team_name)
                .map(|t| t.roster.len() < MAX_ROSTER_SIZE)
                .unwrap_or(false)
            {
                let position = self.choose_draft_position(team_name);
                let quality = self.rng.random_range(0.42..0.74);
                let player = self.create_draft_player(team_name, position, quality, None, None);
                drafted.entry(team_name.clone()).or_default().push(player.name.clone());
                details
                    .entry(team_name.clone())
                    .or_default()
                    .push(DraftPickDetail {
                        name: player.name.clone(),
                        position: player.position.as_str().to_string(),
                        country: player.birth_country.clone(),
                        country_code: player.birth_country_code.clone(),
                        round: None,
                        overall: None,
                    });
                if let Some(team) = self.get_team_mut(team_name) {
                    team.roster.push(player);
                }
            }

            while self
                .get_team(team_name)
                .map(|t| t.minor_roster.len() < MIN_MINOR_ROSTER_SIZE)
                .unwrap_or(false)
            {
                let position = self.choose_draft_position(team_name);
                let quality = self.rng.random_range(0.38..0.68);
                let player = self.create_draft_player(team_name, position, quality, None, None);
                if let Some(team) = self.get_team_mut(team_name) {
                    team.minor_roster.push(player);
                }
            }

            let protected = drafted_protected.get(team_name).cloned().unwrap_or_default();
            while self
                .get_team(team_name)
                .map(|t| t.roster.len() > MAX_ROSTER_SIZE)
                .unwrap_or(false)
            {
                let team = self.get_team(team_name).expect("team exists");
                let cut = team
                    .roster
                    .iter()
                    .filter(|p| !protected.contains(&p.name))
                    .min_by(|a, b| {
                        let ka = a.skills.shooting
                            + a.skills.playmaking
                            + a.skills.defense
                            + a.skills.goaltending
                            + a.skills.durability;
                        let kb = b.skills.shooting
                            + b.skills.playmaking
                            + b.skills.defense
                            + b.skills.goaltending
                            + b.skills.durability;
                        ka.total_cmp(&kb).then(b.age.cmp(&a.age))
                    })
                    .or_else(|| {
                        team.roster.iter().min_by(|a, b| {
                            a.overall().total_cmp(&b.overall()).then(b.age.cmp(&a.age))
                        })
                    })
                    .map(|p| p.name.clone());
                let Some(cut) = cut else {
                    break;
                };
                let team = self.get_team_mut(team_name).expect("team exists");
                let idx = team.roster.iter().position(|p| p.name == cut).unwrap();
                let player = team.roster.remove(idx);
                team.dressed_player_names.remove(&player.name);
                if team.starting_goalie_name.as_deref() == Some(player.name.as_str()) {
                    team.starting_goalie_name = None;
                }
                team.minor_roster.push(player);
            }

            if let Some(team) = self.get_team_mut(team_name) {
                team.assign_player_numbers();
                team.set_default_lineup();
            }
        }

        let drafted = drafted
            .into_iter()
            .filter(|(_, picks)| !picks.is_empty())
            .collect();
        let details = details
            .into_iter()
            .filter(|(_, rows)| !rows.is_empty())
            .collect();
        (drafted, details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::team::Team;
    use crate::league::league::SimulatorSettings;

    fn bare_league() -> LeagueSimulator {
        let teams = vec![
            Team::new("Aurora", "North", "Western"),
            Team::new("Glaciers", "North", "Western"),
            Team::new("Harbor Kings", "East", "Eastern"),
            Team::new("Bay Comets", "East", "Eastern"),
        ];
        LeagueSimulator::new(teams, SimulatorSettings::default(), 31)
    }

    #[test]
    fn early_picks_outscout_late_picks_on_average() {
        let mut sim = bare_league();
        let mut first_total = 0.0;
        let mut last_total = 0.0;
        for _ in 0..80 {
            first_total += sim.draft_quality_for_pick(1, 24);
            last_total += sim.draft_quality_for_pick(24, 24);
        }
        assert!(first_total / 80.0 > last_total / 80.0 + 0.2);
    }

    #[test]
    fn created_players_are_valid_prospects() {
        let mut sim = bare_league();
        let player =
            sim.create_draft_player("Aurora", PlayerPosition::Center, 0.9, Some(1), Some(1));
        assert_eq!(player.draft.round, Some(1));
        assert_eq!(player.draft.overall, Some(1));
        assert_eq!(player.contract.years_left, 3);
        assert!(player.age >= 18 && player.age <= 20);
        assert!(player.skills.shooting <= 5.0);
        assert!(!player.prospect.resolved);
    }

    #[test]
    fn goalie_prospects_have_goalie_skills() {
        let mut sim = bare_league();
        let goalie =
            sim.create_draft_player("Aurora", PlayerPosition::Goalie, 0.8, Some(1), Some(2));
        assert!(goalie.skills.goaltending > 3.0);
        assert!((goalie.skills.shooting - 0.4).abs() < 1e-6);
    }

    #[test]
    fn draft_fills_rosters_and_minors() {
        let mut sim = bare_league();
        let (drafted, details) = sim.run_draft();
        assert_eq!(drafted.len(), 4);
        for team in &sim.teams {
            assert_eq!(team.roster.len(), MAX_ROSTER_SIZE);
            assert!(team.minor_roster.len() >= MIN_MINOR_ROSTER_SIZE);
        }
        // Every team's first pick is the numbered Round-1 selection.
        for rows in details.values() {
            assert_eq!(rows[0].round, Some(1));
            assert!(rows[0].overall.is_some());
        }
    }

    #[test]
    fn round_one_order_is_reverse_standings() {
        let mut sim = bare_league();
        // Separate everyone in the standings so the order is unambiguous.
        sim.records.get_mut("Aurora").unwrap().losses = 10;
        sim.records.get_mut("Glaciers").unwrap().wins = 3;
        sim.records.get_mut("Harbor Kings").unwrap().wins = 5;
        sim.records.get_mut("Bay Comets").unwrap().wins = 10;
        let (_, details) = sim.run_draft();
        let aurora_first = details.get("Aurora").unwrap()[0].overall.unwrap();
        let comets_first = details.get("Bay Comets").unwrap()[0].overall.unwrap();
        assert_eq!(aurora_first, 1);
        assert_eq!(comets_first, 4);
    }
}
