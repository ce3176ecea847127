//! # Core Types for the Electoral Service Layer
//!
//! Identifiers and the closed enumerations shared by every entity.
//!
//! ## Type Categories
//!
//! ### Identity
//! - [`Id`]: store-assigned integer primary key
//! - [`Role`]: account role, drives authorization claims in session tokens
//!
//! ### Electoral vocabulary
//! - [`ElectionType`], [`CandidateOffice`], [`ElectoralEventCategory`]
//! - [`GovernmentPlanSector`], [`EducationLevel`], [`InvestigationStatus`]
//!
//! ### Content and moderation
//! - [`PostStatus`], [`ModerationStatus`], [`GuideCategory`]
//!
//! All enumerations serialize in `SCREAMING_SNAKE_CASE`, the form used by the
//! persisted schema and by API clients.
//!
//! ## Usage Examples
//!
//! ```rust
//! use electoral::types::{ModerationStatus, Role};
//!
//! assert!(Role::Admin.is_admin());
//! assert!(ModerationStatus::Approved.is_reviewed());
//! assert!(!ModerationStatus::Pending.is_reviewed());
//! ```

use serde::{Deserialize, Serialize};

/// Primary key assigned by the record store
///
/// Keys are positive and monotonically increasing per entity; `0` marks a
/// record that has not been inserted yet.
pub type Id = i64;

/// Role carried by an account
///
/// The role is embedded in session tokens and is mutated as a side effect of
/// profile creation (see [`crate::integrity::promote_role_if_needed`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular citizen; default for pre-registered accounts
    #[default]
    Voter,
    /// Poll worker assigned to a voting table
    TableMember,
    /// Account owned by a candidate (publishes posts)
    Candidate,
    /// Platform administrator (reviews moderation alerts)
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Voter => "VOTER",
            Role::TableMember => "TABLE_MEMBER",
            Role::Candidate => "CANDIDATE",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of a post moderation alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    /// Whether an administrator has already decided on the alert
    pub fn is_reviewed(&self) -> bool {
        !matches!(self, ModerationStatus::Pending)
    }
}

/// Visibility of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Published,
    Hidden,
    Draft,
}

/// Kind of electoral process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElectionType {
    General,
    Regional,
    Municipal,
    Referendum,
    Runoff,
}

/// Office a candidate runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateOffice {
    President,
    VicePresident,
    Senator,
    Deputy,
    AndeanParliament,
    Governor,
    Mayor,
}

/// Category of a dated milestone in an election calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElectoralEventCategory {
    Registration,
    Campaign,
    Debate,
    ElectionDay,
    Results,
    Other,
}

/// Thematic sector of a government plan section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GovernmentPlanSector {
    Health,
    Education,
    Economy,
    Security,
    Environment,
    Infrastructure,
    Governance,
    Social,
    Other,
}

/// Category of voter guide content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuideCategory {
    ElectorLocation,
    VotingProcess,
    TableMemberDuties,
    TableMemberDutiesVoting,
    Faq,
}

/// Highest education level reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationLevel {
    Primary,
    Secondary,
    Technical,
    Bachelor,
    Master,
    Doctorate,
}

/// Procedural state of an investigation involving a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestigationStatus {
    Open,
    InProgress,
    Archived,
    Convicted,
    Acquitted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::TableMember).unwrap();
        assert_eq!(json, "\"TABLE_MEMBER\"");

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert!(role.is_admin());
        assert_eq!(Role::default(), Role::Voter);
        assert_eq!(Role::Candidate.to_string(), "CANDIDATE");
    }

    #[test]
    fn test_moderation_status() {
        assert_eq!(ModerationStatus::default(), ModerationStatus::Pending);
        assert!(!ModerationStatus::Pending.is_reviewed());
        assert!(ModerationStatus::Rejected.is_reviewed());
    }
}
