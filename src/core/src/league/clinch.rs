use crate::league::league::LeagueSimulator;
use crate::league::table::TeamRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Wildcard projection for one conference: each division's top three plus
/// the ordered chase pack.
#[derive(Debug, Clone)]
pub struct WildcardView<'a> {
    pub conference: String,
    pub division_leaders: Vec<(String, Vec<&'a TeamRecord>)>,
    pub wildcard: Vec<&'a TeamRecord>,
}

impl LeagueSimulator {
    /// Berths that are mathematically locked before the bracket exists:
    /// a spot is clinched when fewer teams than available spots can still
    /// reach this team's point total.
    pub fn get_playoff_clinch_status(&self) -> BTreeMap<String, bool> {
        let mut clinched: BTreeMap<String, bool> =
            self.teams.iter().map(|t| (t.name.clone(), false)).collect();
        let total_games = self.schedule.team_total_games();

        for conference in self.get_conferences() {
            let conf_rows = self.get_conference_standings(&conference);
            if conf_rows.is_empty() {
                continue;
            }
            let spots = conf_rows.len().min(8);
            for (rank_idx, rec) in conf_rows.iter().enumerate() {
                if rank_idx >= spots {
                    continue;
                }
                let reachable = conf_rows
                    .iter()
                    .filter(|other| other.team_name != rec.team_name)
                    .filter(|other| {
                        let other_total = total_games
                            .get(&other.team_name)
                            .copied()
                            .unwrap_or(rec.games_played());
                        let other_remaining =
                            other_total.saturating_sub(other.games_played());
                        other.points() + 2 * other_remaining >= rec.points()
                    })
                    .count();
                if reachable < spots {
                    clinched.insert(rec.team_name.clone(), true);
                }
            }
        }
        clinched
    }

    /// Who makes the dance if the season ended now, honoring the two-division
    /// top-3-plus-wildcards format when it applies.
    pub fn qualified_playoff_teams(&self) -> BTreeSet<String> {
        let mut qualified: BTreeSet<String> = BTreeSet::new();
        for conference in self.get_conferences() {
            let conf_rows = self.get_conference_standings(&conference);
            if conf_rows.is_empty() {
                continue;
            }
            let divisions: BTreeSet<String> = conf_rows
                .iter()
                .filter_map(|rec| self.get_team(&rec.team_name).map(|t| t.division.clone()))
                .collect();
            if divisions.len() == 2 {
                for division in &divisions {
                    for rec in conf_rows
                        .iter()
                        .filter(|rec| {
                            self.get_team(&rec.team_name)
                                .map(|t| &t.division == division)
                                .unwrap_or(false)
                        })
                        .take(3)
                    {
                        qualified.insert(rec.team_name.clone());
                    }
                }
                let wildcards: Vec<String> = conf_rows
                    .iter()
                    .filter(|rec| !qualified.contains(&rec.team_name))
                    .take(2)
                    .map(|rec| rec.team_name.clone())
                    .collect();
                for team_name in wildcards {
                    qualified.insert(team_name);
                }
            } else {
                for rec in conf_rows.iter().take(8) {
                    qualified.insert(rec.team_name.clone());
                }
            }
        }
        qualified
    }

    /// Standings badges: x = berth, y = division, z = conference,
    /// p = overall leader. Once the bracket exists the x set mirrors the
    /// actual seeds instead of the projection.
    pub fn standings_clinch_tags(&self) -> BTreeMap<String, Vec<char>> {
        let mut tags: BTreeMap<String, Vec<char>> =
            self.teams.iter().map(|t| (t.name.clone(), Vec::new())).collect();
        let total_games = self.schedule.team_total_games();
        let standings = self.get_standings();

        if let Some(bracket) = &self.pending_playoffs {
            for seed in &bracket.seeds {
                tags.entry(seed.team.clone()).or_default().push('x');
            }
        } else if self.is_complete() {
            for team in self.qualified_playoff_teams() {
                tags.entry(team).or_default().push('x');
            }
        } else {
            for (team, clinched) in self.get_playoff_clinch_status() {
                if clinched {
                    tags.entry(team).or_default().push('x');
                }
            }
        }

        let uncatchable = |leader: &TeamRecord, rows: &[&TeamRecord]| -> bool {
            let leader_total = total_games
                .get(&leader.team_name)
                .copied()
                .unwrap_or(leader.games_played());
            let leader_remaining = leader_total.saturating_sub(leader.games_played());
            let leader_floor = leader.points() + leader_remaining;
            !rows.iter().any(|other| {
                if other.team_name == leader.team_name {
                    return false;
                }
                let other_total = total_games
                    .get(&other.team_name)
                    .copied()
                    .unwrap_or(other.games_played());
                let other_remaining = other_total.saturating_sub(other.games_played());
                other.points() + 2 * other_remaining >= leader_floor
            })
        };

        for division in self.get_divisions() {
            let rows = self.get_division_standings(&division);
            if let Some(leader) = rows.first() {
                if uncatchable(leader, &rows) {
                    tags.entry(leader.team_name.clone()).or_default().push('y');
                }
            }
        }
        for conference in self.get_conferences() {
            let rows = self.get_conference_standings(&conference);
            if let Some(leader) = rows.first() {
                if uncatchable(leader, &rows) {
                    tags.entry(leader.team_name.clone()).or_default().push('z');
                }
            }
        }
        if let Some(leader) = standings.first() {
            if uncatchable(leader, &standings) {
                tags.entry(leader.team_name.clone()).or_default().push('p');
            }
        }

        tags
    }

    pub fn wildcard_standings(&self, conference: &str) -> WildcardView<'_> {
        let conf_rows = self.get_conference_standings(conference);
        let divisions: Vec<String> = conf_rows
            .iter()
            .filter_map(|rec| self.get_team(&rec.team_name).map(|t| t.division.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut division_leaders: Vec<(String, Vec<&TeamRecord>)> = Vec::new();
        let mut leaders: BTreeSet<String> = BTreeSet::new();
        for division in &divisions {
            let top: Vec<&TeamRecord> = conf_rows
                .iter()
                .copied()
                .filter(|rec| {
                    self.get_team(&rec.team_name)
                        .map(|t| &t.division == division)
                        .unwrap_or(false)
                })
                .take(3)
                .collect();
            for rec in &top {
                leaders.insert(rec.team_name.clone());
            }
            division_leaders.push((division.clone(), top));
        }
        let wildcard: Vec<&TeamRecord> = conf_rows
            .into_iter()
            .filter(|rec| !leaders.contains(&rec.team_name))
            .collect();

        WildcardView {
            conference: conference.to_string(),
            division_leaders,
            wildcard,
        }
    }
}
