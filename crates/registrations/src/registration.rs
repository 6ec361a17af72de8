use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_core::{CourseId, DomainResult, Entity, Patch, PersonId, RegistrationId};

/// Registration status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Enrolled,
    Waitlisted,
    Dropped,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Waitlisted => "waitlisted",
            Self::Dropped => "dropped",
        }
    }
}

impl core::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger consequence of moving a registration between two statuses.
///
/// Status changes are otherwise free-form; only leaving an enrolled seat by
/// dropping touches the course ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// `enrolled -> dropped`: release the seat and try to promote a waitlisted registration.
    ReleaseSeat,
    /// Any other change (including no change): record only.
    RecordOnly,
}

impl StatusTransition {
    pub fn classify(from: RegistrationStatus, to: RegistrationStatus) -> Self {
        match (from, to) {
            (RegistrationStatus::Enrolled, RegistrationStatus::Dropped) => Self::ReleaseSeat,
            _ => Self::RecordOnly,
        }
    }
}

/// Registration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub person_id: PersonId,
    pub course_id: CourseId,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Registration {
    type Id = RegistrationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn kind() -> &'static str {
        "registration"
    }
}

/// Creation payload: who registers for what. The status is decided by the
/// workflow, never by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NewRegistration {
    pub person_id: PersonId,
    pub course_id: CourseId,
}

impl NewRegistration {
    pub fn new(person_id: PersonId, course_id: CourseId) -> Self {
        Self {
            person_id,
            course_id,
        }
    }
}

impl Registration {
    pub fn new(new: NewRegistration, status: RegistrationStatus, now: DateTime<Utc>) -> Self {
        Self {
            id: RegistrationId::new(),
            person_id: new.person_id,
            course_id: new.course_id,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_waitlisted_for(&self, course_id: CourseId) -> bool {
        self.course_id == course_id && self.status == RegistrationStatus::Waitlisted
    }

    /// Promotion rank among waitlisted registrations: earliest first, ids break ties.
    pub fn queue_key(&self) -> (DateTime<Utc>, RegistrationId) {
        (self.created_at, self.id)
    }
}

/// Partial update for a registration; only `status` is updatable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationPatch {
    pub status: Option<RegistrationStatus>,
}

impl RegistrationPatch {
    pub fn with_status(status: RegistrationStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

impl Patch<Registration> for RegistrationPatch {
    fn apply(self, target: &mut Registration, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(status) = self.status {
            target.status = status;
        }
        target.updated_at = now;
        Ok(())
    }
}

/// List filter; all fields optional and conjunctive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationFilter {
    pub person_id: Option<PersonId>,
    pub course_id: Option<CourseId>,
    pub status: Option<RegistrationStatus>,
}

impl RegistrationFilter {
    pub fn matches(&self, r: &Registration) -> bool {
        self.person_id.is_none_or(|v| v == r.person_id)
            && self.course_id.is_none_or(|v| v == r.course_id)
            && self.status.is_none_or(|v| v == r.status)
    }
}
