//! Service wiring: in-memory stores plus the registration workflow.
//!
//! Constructed once at startup and shared with every handler through an
//! `Extension<Arc<AppServices>>`; tests build a fresh instance per server.

use std::sync::Arc;

use chrono::Utc;

use campus_core::{AddressId, CourseId, DomainResult, PersonId, RegistrationId};
use campus_courses::{Course, CourseFilter, CoursePatch, NewCourse};
use campus_infra::{EnrollmentAudit, EntityStore, InMemoryEntityStore, Registrar, StatusUpdate};
use campus_people::{
    Address, AddressFilter, AddressPatch, NewAddress, NewPerson, Person, PersonFilter, PersonPatch,
};
use campus_registrations::{NewRegistration, Registration, RegistrationFilter, RegistrationPatch};

pub type InMemoryRegistrar = Registrar<
    Arc<InMemoryEntityStore<Person>>,
    Arc<InMemoryEntityStore<Course>>,
    Arc<InMemoryEntityStore<Registration>>,
>;

pub struct AppServices {
    addresses: Arc<InMemoryEntityStore<Address>>,
    registrar: InMemoryRegistrar,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self {
            addresses: Arc::new(InMemoryEntityStore::new()),
            registrar: Registrar::new(
                Arc::new(InMemoryEntityStore::new()),
                Arc::new(InMemoryEntityStore::new()),
                Arc::new(InMemoryEntityStore::new()),
            ),
        }
    }

    // -------------------------
    // Persons
    // -------------------------

    pub fn persons_create(&self, new: NewPerson) -> DomainResult<Person> {
        let person = Person::create(new, Utc::now())?;
        self.registrar.persons().put(person.clone());
        tracing::info!(person_id = %person.id, uni = %person.uni, "person created");
        Ok(person)
    }

    pub fn persons_list(&self, filter: &PersonFilter) -> Vec<Person> {
        self.registrar
            .persons()
            .list()
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect()
    }

    pub fn persons_get(&self, id: PersonId) -> Option<Person> {
        self.registrar.persons().get(&id)
    }

    pub fn persons_update(&self, id: PersonId, patch: PersonPatch) -> DomainResult<Person> {
        self.registrar.persons().update(&id, patch)
    }

    // -------------------------
    // Addresses
    // -------------------------

    pub fn addresses_create(&self, new: NewAddress) -> DomainResult<Address> {
        let address = self.addresses.insert_new(Address::create(new, Utc::now())?)?;
        tracing::info!(address_id = %address.id, "address created");
        Ok(address)
    }

    pub fn addresses_list(&self, filter: &AddressFilter) -> Vec<Address> {
        self.addresses
            .list()
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect()
    }

    pub fn addresses_get(&self, id: AddressId) -> Option<Address> {
        self.addresses.get(&id)
    }

    pub fn addresses_update(&self, id: AddressId, patch: AddressPatch) -> DomainResult<Address> {
        self.addresses.update(&id, patch)
    }

    // -------------------------
    // Courses
    // -------------------------

    pub fn courses_create(&self, new: NewCourse) -> DomainResult<Course> {
        let course = Course::create(new, Utc::now())?;
        self.registrar.courses().put(course.clone());
        tracing::info!(
            course_id = %course.id,
            coursenumber = %course.course_number,
            capacity = course.capacity,
            "course created"
        );
        Ok(course)
    }

    pub fn courses_list(&self, filter: &CourseFilter) -> Vec<Course> {
        self.registrar
            .courses()
            .list()
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect()
    }

    pub fn courses_get(&self, id: CourseId) -> Option<Course> {
        self.registrar.courses().get(&id)
    }

    pub fn courses_update(&self, id: CourseId, patch: CoursePatch) -> DomainResult<Course> {
        self.registrar.update_course(id, patch)
    }

    pub fn enrollment_audit(&self) -> DomainResult<Vec<EnrollmentAudit>> {
        self.registrar.audit_enrollment()
    }

    pub fn enrollment_reconcile(&self, id: CourseId) -> DomainResult<EnrollmentAudit> {
        self.registrar.reconcile_enrollment(id)
    }

    // -------------------------
    // Registrations
    // -------------------------

    pub fn registrations_create(&self, new: NewRegistration) -> DomainResult<Registration> {
        self.registrar.create_registration(new)
    }

    pub fn registrations_list(&self, filter: &RegistrationFilter) -> Vec<Registration> {
        self.registrar.list_registrations(filter)
    }

    pub fn registrations_get(&self, id: RegistrationId) -> DomainResult<Registration> {
        self.registrar.get_registration(id)
    }

    pub fn registrations_update(
        &self,
        id: RegistrationId,
        patch: RegistrationPatch,
    ) -> DomainResult<StatusUpdate> {
        self.registrar.update_registration(id, patch)
    }
}
