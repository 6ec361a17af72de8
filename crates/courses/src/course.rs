use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_core::{CourseId, DomainError, DomainResult, Entity, Patch};

/// Course record, including its embedded seat ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    #[serde(rename = "coursenumber")]
    pub course_number: String,
    pub instructor: String,
    pub time: String,
    pub location: String,
    /// Maximum number of enrolled registrations.
    pub capacity: u32,
    /// Seats currently held by `enrolled` registrations (ledger-owned).
    pub enrollment: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn kind() -> &'static str {
        "course"
    }
}

/// Creation payload for a course. Enrollment always starts at zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCourse {
    #[serde(alias = "coursenumber")]
    pub course_number: String,
    pub instructor: String,
    pub time: String,
    pub location: String,
    pub capacity: u32,
}

impl Course {
    pub fn create(new: NewCourse, now: DateTime<Utc>) -> DomainResult<Self> {
        let course = Self {
            id: CourseId::new(),
            course_number: new.course_number,
            instructor: new.instructor,
            time: new.time,
            location: new.location,
            capacity: new.capacity,
            enrollment: 0,
            created_at: now,
            updated_at: now,
        };
        course.validate()?;
        Ok(course)
    }

    fn validate(&self) -> DomainResult<()> {
        validate_course_number(&self.course_number)?;
        for (field, value) in [
            ("instructor", &self.instructor),
            ("time", &self.time),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Seat ledger
    // ---------------------------------------------------------------------

    /// Whether another registration can be enrolled right now.
    pub fn has_capacity(&self) -> bool {
        self.enrollment < self.capacity
    }

    /// Seats still free; zero when capacity was lowered below enrollment.
    pub fn open_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.enrollment)
    }

    /// Take one seat.
    ///
    /// Callers check `has_capacity` first; taking a seat in a full course is
    /// an invariant violation.
    pub fn increment(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.has_capacity() {
            return Err(DomainError::invariant(format!(
                "course {} is full ({}/{})",
                self.id, self.enrollment, self.capacity
            )));
        }
        self.enrollment += 1;
        self.updated_at = now;
        Ok(())
    }

    /// Release one seat.
    ///
    /// Enrollment stops at zero: returns `false` and leaves the course
    /// untouched when there is no seat to release, which means the cached
    /// count has drifted below the real number of enrolled registrations.
    pub fn decrement(&mut self, now: DateTime<Utc>) -> bool {
        match self.enrollment.checked_sub(1) {
            Some(n) => {
                self.enrollment = n;
                self.updated_at = now;
                true
            }
            None => false,
        }
    }
}

/// `ABCD1234`: four uppercase ASCII letters followed by four digits.
fn validate_course_number(value: &str) -> DomainResult<()> {
    let bytes = value.as_bytes();
    let ok = bytes.len() == 8
        && bytes[..4].iter().all(u8::is_ascii_uppercase)
        && bytes[4..].iter().all(u8::is_ascii_digit);
    if !ok {
        return Err(DomainError::validation(format!(
            "coursenumber must be 4 uppercase letters followed by 4 digits (got {value:?})"
        )));
    }
    Ok(())
}

/// Partial update for a course; supply only fields to change.
///
/// There is no `enrollment` field; only the registration workflow moves it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoursePatch {
    #[serde(alias = "coursenumber")]
    pub course_number: Option<String>,
    pub instructor: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<u32>,
}

impl Patch<Course> for CoursePatch {
    fn apply(self, target: &mut Course, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = target.clone();
        if let Some(v) = self.course_number {
            next.course_number = v;
        }
        if let Some(v) = self.instructor {
            next.instructor = v;
        }
        if let Some(v) = self.time {
            next.time = v;
        }
        if let Some(v) = self.location {
            next.location = v;
        }
        if let Some(v) = self.capacity {
            next.capacity = v;
        }
        next.validate()?;

        next.updated_at = now;
        *target = next;
        Ok(())
    }
}

/// Exact-match list filter; every supplied field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CourseFilter {
    #[serde(alias = "course_number")]
    pub coursenumber: Option<String>,
    pub instructor: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    pub enrollment: Option<u32>,
}

impl CourseFilter {
    pub fn matches(&self, c: &Course) -> bool {
        self.coursenumber.as_ref().is_none_or(|v| *v == c.course_number)
            && self.instructor.as_ref().is_none_or(|v| *v == c.instructor)
            && self.time.as_ref().is_none_or(|v| *v == c.time)
            && self.location.as_ref().is_none_or(|v| *v == c.location)
            && self.capacity.is_none_or(|v| v == c.capacity)
            && self.enrollment.is_none_or(|v| v == c.enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_course(capacity: u32) -> NewCourse {
        NewCourse {
            course_number: "COMS4153".to_string(),
            instructor: "Donald F Ferguson".to_string(),
            time: "F 1:10pm-3:40pm".to_string(),
            location: "501 Northwest Corner Building".to_string(),
            capacity,
        }
    }

    #[test]
    fn create_starts_with_empty_ledger() {
        let c = Course::create(new_course(160), Utc::now()).unwrap();
        assert_eq!(c.enrollment, 0);
        assert_eq!(c.capacity, 160);
        assert!(c.has_capacity());
        assert_eq!(c.open_seats(), 160);
    }

    #[test]
    fn create_rejects_malformed_course_number() {
        for bad in ["coms4153", "COMS415", "COMS41533", "CO4S4153", "COMSX153"] {
            let mut n = new_course(1);
            n.course_number = bad.to_string();
            let result = Course::create(n, Utc::now());
            assert!(
                matches!(result, Err(DomainError::Validation(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn zero_capacity_course_is_always_full() {
        let mut c = Course::create(new_course(0), Utc::now()).unwrap();
        assert!(!c.has_capacity());
        assert!(c.increment(Utc::now()).is_err());
        assert_eq!(c.enrollment, 0);
    }

    #[test]
    fn increment_and_decrement_move_one_seat() {
        let mut c = Course::create(new_course(2), Utc::now()).unwrap();
        c.increment(Utc::now()).unwrap();
        c.increment(Utc::now()).unwrap();
        assert_eq!(c.enrollment, 2);
        assert!(!c.has_capacity());

        let err = c.increment(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(c.enrollment, 2);

        assert!(c.decrement(Utc::now()));
        assert_eq!(c.enrollment, 1);
        assert!(c.has_capacity());
    }

    #[test]
    fn decrement_stops_at_zero() {
        let mut c = Course::create(new_course(3), Utc::now()).unwrap();
        let before = c.clone();
        assert!(!c.decrement(Utc::now()));
        assert_eq!(c, before);
    }

    #[test]
    fn lowering_capacity_below_enrollment_closes_the_course() {
        let mut c = Course::create(new_course(3), Utc::now()).unwrap();
        c.increment(Utc::now()).unwrap();
        c.increment(Utc::now()).unwrap();

        let shrink = CoursePatch {
            capacity: Some(1),
            ..Default::default()
        };
        shrink.apply(&mut c, Utc::now()).unwrap();

        assert_eq!(c.enrollment, 2);
        assert!(!c.has_capacity());
        assert_eq!(c.open_seats(), 0);
    }

    #[test]
    fn patch_keeps_unsupplied_fields_and_bumps_updated_at() {
        let created = Utc::now();
        let mut c = Course::create(new_course(10), created).unwrap();
        let later = created + chrono::Duration::seconds(5);

        let moved = CoursePatch {
            location: Some("309 Havemeyer Hall".to_string()),
            ..Default::default()
        };
        moved.apply(&mut c, later).unwrap();

        assert_eq!(c.location, "309 Havemeyer Hall");
        assert_eq!(c.instructor, "Donald F Ferguson");
        assert_eq!(c.created_at, created);
        assert_eq!(c.updated_at, later);
    }

    #[test]
    fn wire_name_is_coursenumber() {
        let c = Course::create(new_course(10), Utc::now()).unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["coursenumber"], "COMS4153");

        let parsed: NewCourse = serde_json::from_value(serde_json::json!({
            "coursenumber": "ELEN4153",
            "instructor": "Joseph",
            "time": "TR 1:10pm-2:25pm",
            "location": "309 Havemeyer Hall",
            "capacity": 200
        }))
        .unwrap();
        assert_eq!(parsed.course_number, "ELEN4153");
    }

    #[test]
    fn filter_on_enrollment_compares_numbers() {
        let mut c = Course::create(new_course(10), Utc::now()).unwrap();
        c.increment(Utc::now()).unwrap();
        let one = CourseFilter {
            enrollment: Some(1),
            ..Default::default()
        };
        let none = CourseFilter {
            enrollment: Some(0),
            ..Default::default()
        };
        assert!(one.matches(&c));
        assert!(!none.matches(&c));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Take,
            Release,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![Just(Op::Take), Just(Op::Release)]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: the ledger stays within [0, capacity] under any sequence of
            /// operations, and a refused operation leaves the ledger unchanged.
            #[test]
            fn ledger_stays_within_bounds(
                capacity in 0u32..20,
                ops in proptest::collection::vec(op(), 0..100)
            ) {
                let mut c = Course::create(new_course(capacity), Utc::now()).unwrap();
                for op in ops {
                    let before = c.enrollment;
                    let applied = match op {
                        Op::Take => c.increment(Utc::now()).is_ok(),
                        Op::Release => c.decrement(Utc::now()),
                    };
                    if !applied {
                        prop_assert_eq!(c.enrollment, before);
                    }
                    prop_assert!(c.enrollment <= c.capacity);
                    prop_assert_eq!(c.has_capacity(), c.enrollment < c.capacity);
                }
            }
        }
    }
}
