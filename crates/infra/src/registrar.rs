//! Registration workflow (application-level orchestration).
//!
//! The `Registrar` is the only writer of the course seat ledger. It owns
//! handles to the person, course and registration stores and serializes
//! every ledger-touching operation behind one workflow lock:
//!
//! ```text
//! create_registration
//!   1. person exists?            -> NotFound("person")
//!   2. course exists?            -> NotFound("course")
//!   3. has_capacity ? enrolled : waitlisted
//!   4. enrolled -> take a seat, persist course
//!   5. persist registration
//!
//! update_registration
//!   1. registration exists?      -> NotFound("registration")
//!   2. apply status patch to a copy
//!   3. enrolled -> dropped:
//!        release the seat (enrollment stops at zero)
//!        earliest waitlisted registration for the course (if a seat is free)
//!          -> enrolled, take the seat again
//!   4. persist course (once), promoted registration, updated registration
//! ```
//!
//! All existence checks and ledger arithmetic run on copies before the first
//! write, so a failing call leaves every store untouched.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use campus_core::{CourseId, DomainError, DomainResult, Entity, Patch, RegistrationId};
use campus_courses::{Course, CoursePatch};
use campus_people::Person;
use campus_registrations::{
    NewRegistration, Registration, RegistrationFilter, RegistrationPatch, RegistrationStatus,
    StatusTransition,
};

use crate::store::EntityStore;

/// Result of a status update: the updated registration plus the waitlisted
/// registration that took the released seat, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub registration: Registration,
    pub promoted: Option<Registration>,
}

/// Registration workflow over injected stores.
///
/// ## Generic Parameters
///
/// - `P`: person store
/// - `C`: course store (carries the seat ledger)
/// - `R`: registration store
pub struct Registrar<P, C, R> {
    persons: P,
    courses: C,
    registrations: R,
    workflow: Mutex<()>,
}

impl<P, C, R> Registrar<P, C, R>
where
    P: EntityStore<Person>,
    C: EntityStore<Course>,
    R: EntityStore<Registration>,
{
    pub fn new(persons: P, courses: C, registrations: R) -> Self {
        Self {
            persons,
            courses,
            registrations,
            workflow: Mutex::new(()),
        }
    }

    pub fn persons(&self) -> &P {
        &self.persons
    }

    pub fn courses(&self) -> &C {
        &self.courses
    }

    pub fn registrations(&self) -> &R {
        &self.registrations
    }

    pub(crate) fn lock(&self) -> DomainResult<MutexGuard<'_, ()>> {
        self.workflow.lock().map_err(|_| {
            tracing::error!("registration workflow lock poisoned");
            DomainError::invariant("registration workflow lock poisoned")
        })
    }

    /// Register a person for a course; the status is decided here.
    ///
    /// Duplicate registrations of the same person for the same course are
    /// accepted; each one is accounted for independently.
    pub fn create_registration(&self, new: NewRegistration) -> DomainResult<Registration> {
        let _guard = self.lock()?;

        if !self.persons.contains(&new.person_id) {
            return Err(DomainError::not_found(Person::kind()));
        }
        let mut course = self
            .courses
            .get(&new.course_id)
            .ok_or(DomainError::not_found(Course::kind()))?;

        let now = Utc::now();
        let status = if course.has_capacity() {
            course.increment(now)?;
            RegistrationStatus::Enrolled
        } else {
            RegistrationStatus::Waitlisted
        };
        let registration = Registration::new(new, status, now);

        if status == RegistrationStatus::Enrolled {
            self.courses.put(course.clone());
        }
        self.registrations.put(registration.clone());

        tracing::info!(
            registration_id = %registration.id,
            person_id = %registration.person_id,
            course_id = %registration.course_id,
            status = %registration.status,
            enrollment = course.enrollment,
            open_seats = course.open_seats(),
            "registration created"
        );
        Ok(registration)
    }

    /// Apply a status update, releasing and re-filling the seat when an
    /// enrolled registration is dropped.
    pub fn update_registration(
        &self,
        id: RegistrationId,
        patch: RegistrationPatch,
    ) -> DomainResult<StatusUpdate> {
        let _guard = self.lock()?;

        let current = self
            .registrations
            .get(&id)
            .ok_or(DomainError::not_found(Registration::kind()))?;

        let now = Utc::now();
        let mut updated = current.clone();
        patch.apply(&mut updated, now)?;

        let mut course_after = None;
        let mut promoted = None;
        let transition = StatusTransition::classify(current.status, updated.status);
        if transition == StatusTransition::ReleaseSeat {
            let mut course = self
                .courses
                .get(&current.course_id)
                .ok_or(DomainError::not_found(Course::kind()))?;
            if !course.decrement(now) {
                tracing::warn!(
                    registration_id = %current.id,
                    course_id = %course.id,
                    "no seat to release, enrollment already zero; run reconciliation"
                );
            }

            if course.has_capacity() {
                if let Some(mut next) = self.next_waitlisted(current.course_id) {
                    course.increment(now)?;
                    next.status = RegistrationStatus::Enrolled;
                    next.updated_at = now;
                    promoted = Some(next);
                }
            }
            course_after = Some(course);
        }

        if let Some(course) = &course_after {
            self.courses.put(course.clone());
        }
        if let Some(next) = &promoted {
            self.registrations.put(next.clone());
        }
        self.registrations.put(updated.clone());

        match (&course_after, &promoted) {
            (Some(course), Some(next)) => tracing::info!(
                registration_id = %updated.id,
                course_id = %course.id,
                promoted = %next.id,
                enrollment = course.enrollment,
                "seat released and refilled from waitlist"
            ),
            (Some(course), None) => tracing::info!(
                registration_id = %updated.id,
                course_id = %course.id,
                enrollment = course.enrollment,
                "seat released"
            ),
            _ => tracing::debug!(
                registration_id = %updated.id,
                from = %current.status,
                to = %updated.status,
                "registration status recorded"
            ),
        }

        Ok(StatusUpdate {
            registration: updated,
            promoted,
        })
    }

    pub fn get_registration(&self, id: RegistrationId) -> DomainResult<Registration> {
        self.registrations
            .get(&id)
            .ok_or(DomainError::not_found(Registration::kind()))
    }

    pub fn list_registrations(&self, filter: &RegistrationFilter) -> Vec<Registration> {
        self.registrations
            .list()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect()
    }

    /// Course edits go through the workflow lock so they cannot race a
    /// seat change and overwrite it.
    pub fn update_course(&self, id: CourseId, patch: CoursePatch) -> DomainResult<Course> {
        let _guard = self.lock()?;
        self.courses.update(&id, patch)
    }

    /// Earliest-created waitlisted registration for a course.
    fn next_waitlisted(&self, course_id: CourseId) -> Option<Registration> {
        self.registrations
            .list()
            .into_iter()
            .filter(|r| r.is_waitlisted_for(course_id))
            .min_by_key(Registration::queue_key)
    }
}
