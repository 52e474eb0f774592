use std::fmt::{Display, Formatter};

pub type SimResult<T> = Result<T, SimError>;

/// Error taxonomy at the simulation boundary. Every variant carries a stable
/// machine-readable code plus a human-readable message; the HTTP layer maps
/// codes onto status codes without inspecting messages.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    TeamNotFound(String),
    PlayerNotFound(String),
    RosterFull(String),
    NoCapSpace(String),
    ContractExpired(String),
    PlayerUntouchable(String),
    PartnerPlayerUntouchable(String),
    InjuredPlayerInTrade(String),
    CannotTradeLastGoalie(String),
    PartnerCannotTradeLastGoalie(String),
    BadUserOffer(String),
    PartnerRejected(String),
    InvariantViolation(String),
    ScheduleConflict(String),
    VersionMismatch { found: u32, supported: u32 },
    RosterNonCompliant(String),
    NoUserTeam,
    NotUserTeam(String),
    SeasonNotComplete,
    PlayoffsNotStarted,
    PlayoffsNotComplete,
    DraftNotActive,
    ProspectNotFound(String),
    InvalidArgument(String),
    Persistence(String),
}

impl SimError {
    pub fn code(&self) -> &'static str {
        match self {
            SimError::TeamNotFound(_) => "team_not_found",
            SimError::PlayerNotFound(_) => "player_not_found",
            SimError::RosterFull(_) => "roster_full",
            SimError::NoCapSpace(_) => "cap_space",
            SimError::ContractExpired(_) => "contract_expired",
            SimError::PlayerUntouchable(_) => "player_untouchable",
            SimError::PartnerPlayerUntouchable(_) => "partner_player_untouchable",
            SimError::InjuredPlayerInTrade(_) => "injured_player_in_trade",
            SimError::CannotTradeLastGoalie(_) => "cannot_trade_last_goalie",
            SimError::PartnerCannotTradeLastGoalie(_) => "partner_cannot_trade_last_goalie",
            SimError::BadUserOffer(_) => "bad_user_offer",
            SimError::PartnerRejected(_) => "partner_rejected",
            SimError::InvariantViolation(_) => "invariant_violation",
            SimError::ScheduleConflict(_) => "schedule_conflict",
            SimError::VersionMismatch { .. } => "version_mismatch",
            SimError::RosterNonCompliant(_) => "roster_non_compliant",
            SimError::NoUserTeam => "no_user_team",
            SimError::NotUserTeam(_) => "not_user_team",
            SimError::SeasonNotComplete => "season_not_complete",
            SimError::PlayoffsNotStarted => "playoffs_not_started",
            SimError::PlayoffsNotComplete => "playoffs_not_complete",
            SimError::DraftNotActive => "draft_not_active",
            SimError::ProspectNotFound(_) => "prospect_not_found",
            SimError::InvalidArgument(_) => "invalid_argument",
            SimError::Persistence(_) => "persistence_error",
        }
    }

    /// True for errors that leave state untouched and can simply be retried
    /// with different inputs; false for fatal integrity failures.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SimError::InvariantViolation(_)
                | SimError::ScheduleConflict(_)
                | SimError::VersionMismatch { .. }
        )
    }
}

impl Display for SimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::TeamNotFound(name) => write!(f, "team not found: {}", name),
            SimError::PlayerNotFound(name) => write!(f, "player not found: {}", name),
            SimError::RosterFull(team) => write!(f, "active roster is full for {}", team),
            SimError::NoCapSpace(team) => write!(f, "not enough cap space for {}", team),
            SimError::ContractExpired(name) => write!(f, "contract already expired for {}", name),
            SimError::PlayerUntouchable(name) => write!(f, "{} is untouchable", name),
            SimError::PartnerPlayerUntouchable(name) => {
                write!(f, "partner lists {} as untouchable", name)
            }
            SimError::InjuredPlayerInTrade(name) => {
                write!(f, "injured player cannot be traded: {}", name)
            }
            SimError::CannotTradeLastGoalie(team) => {
                write!(f, "{} cannot trade its last healthy goalie", team)
            }
            SimError::PartnerCannotTradeLastGoalie(team) => {
                write!(f, "{} cannot trade its last healthy goalie", team)
            }
            SimError::BadUserOffer(detail) => write!(f, "offer below acceptance floor: {}", detail),
            SimError::PartnerRejected(detail) => write!(f, "partner rejected the offer: {}", detail),
            SimError::InvariantViolation(detail) => write!(f, "invariant violation: {}", detail),
            SimError::ScheduleConflict(detail) => write!(f, "schedule conflict: {}", detail),
            SimError::VersionMismatch { found, supported } => write!(
                f,
                "save version {} is newer than supported version {}",
                found, supported
            ),
            SimError::RosterNonCompliant(detail) => write!(f, "roster non-compliant: {}", detail),
            SimError::NoUserTeam => write!(f, "no user team selected"),
            SimError::NotUserTeam(team) => write!(f, "operation limited to the user team: {}", team),
            SimError::SeasonNotComplete => write!(f, "regular season is not complete"),
            SimError::PlayoffsNotStarted => write!(f, "playoffs have not started"),
            SimError::PlayoffsNotComplete => write!(f, "playoffs are not complete"),
            SimError::DraftNotActive => write!(f, "no draft session is active"),
            SimError::ProspectNotFound(id) => write!(f, "prospect not found: {}", id),
            SimError::InvalidArgument(detail) => write!(f, "invalid argument: {}", detail),
            SimError::Persistence(detail) => write!(f, "persistence failure: {}", detail),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            SimError::PartnerPlayerUntouchable("X".into()).code(),
            "partner_player_untouchable"
        );
        assert_eq!(
            SimError::VersionMismatch {
                found: 999,
                supported: 2
            }
            .code(),
            "version_mismatch"
        );
    }

    #[test]
    fn integrity_errors_are_fatal() {
        assert!(!SimError::InvariantViolation("gp".into()).is_recoverable());
        assert!(SimError::RosterFull("Aurora".into()).is_recoverable());
    }
}
