//! Seat-ledger reconciliation.
//!
//! `Course::enrollment` is a cached count maintained incrementally by the
//! registrar. These routines recount `enrolled` registrations from scratch,
//! report drift, and can overwrite the cached value.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use campus_core::{CourseId, DomainError, DomainResult, Entity};
use campus_courses::Course;
use campus_people::Person;
use campus_registrations::{Registration, RegistrationStatus};

use crate::registrar::Registrar;
use crate::store::EntityStore;

/// Cached vs. recounted enrollment for one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnrollmentAudit {
    pub course_id: CourseId,
    pub capacity: u32,
    /// Value cached on the course record.
    pub recorded: u32,
    /// Number of registrations currently `enrolled`.
    pub actual: u32,
}

impl EnrollmentAudit {
    pub fn is_consistent(&self) -> bool {
        self.recorded == self.actual
    }
}

fn enrolled_counts(registrations: Vec<Registration>) -> HashMap<CourseId, u32> {
    let mut counts = HashMap::new();
    for r in registrations {
        if r.status == RegistrationStatus::Enrolled {
            *counts.entry(r.course_id).or_insert(0) += 1;
        }
    }
    counts
}

impl<P, C, R> Registrar<P, C, R>
where
    P: EntityStore<Person>,
    C: EntityStore<Course>,
    R: EntityStore<Registration>,
{
    /// Recount every course, in course creation order.
    pub fn audit_enrollment(&self) -> DomainResult<Vec<EnrollmentAudit>> {
        let _guard = self.lock()?;
        let counts = enrolled_counts(self.registrations().list());

        let audits: Vec<EnrollmentAudit> = self
            .courses()
            .list()
            .into_iter()
            .map(|c| EnrollmentAudit {
                course_id: c.id,
                capacity: c.capacity,
                recorded: c.enrollment,
                actual: counts.get(&c.id).copied().unwrap_or(0),
            })
            .collect();

        let drifted = audits.iter().filter(|a| !a.is_consistent()).count();
        if drifted > 0 {
            tracing::warn!(drifted, courses = audits.len(), "enrollment drift detected");
        }
        Ok(audits)
    }

    /// Overwrite a course's cached enrollment with the recounted value.
    ///
    /// Returns the audit as it stood before the repair.
    pub fn reconcile_enrollment(&self, course_id: CourseId) -> DomainResult<EnrollmentAudit> {
        let _guard = self.lock()?;
        let mut course = self
            .courses()
            .get(&course_id)
            .ok_or(DomainError::not_found(Course::kind()))?;

        let actual = enrolled_counts(self.registrations().list())
            .get(&course_id)
            .copied()
            .unwrap_or(0);
        let audit = EnrollmentAudit {
            course_id,
            capacity: course.capacity,
            recorded: course.enrollment,
            actual,
        };

        if !audit.is_consistent() {
            course.enrollment = actual;
            course.updated_at = Utc::now();
            self.courses().put(course);
            tracing::warn!(
                course_id = %course_id,
                recorded = audit.recorded,
                actual,
                "course enrollment reconciled"
            );
        }
        Ok(audit)
    }
}
