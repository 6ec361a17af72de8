use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use campus_core::{DomainResult, Entity, Patch, PersonId};

use crate::address::PostalAddress;
use crate::validate;

/// Person record (student, instructor, or staff).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub uni: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub addresses: Vec<PostalAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Person {
    type Id = PersonId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn kind() -> &'static str {
        "person"
    }
}

/// Creation payload for a person. The id is always generated server-side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPerson {
    pub uni: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub addresses: Vec<PostalAddress>,
}

impl Person {
    pub fn create(new: NewPerson, now: DateTime<Utc>) -> DomainResult<Self> {
        let person = Self {
            id: PersonId::new(),
            uni: new.uni,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            birth_date: new.birth_date,
            addresses: new.addresses,
            created_at: now,
            updated_at: now,
        };
        person.validate()?;
        Ok(person)
    }

    fn validate(&self) -> DomainResult<()> {
        validate::uni(&self.uni)?;
        validate::non_empty("first_name", &self.first_name)?;
        validate::non_empty("last_name", &self.last_name)?;
        validate::email(&self.email)?;
        if let Some(phone) = &self.phone {
            validate::non_empty("phone", phone)?;
        }
        self.addresses.iter().try_for_each(PostalAddress::validate)
    }
}

/// Partial update for a person; supply only fields to change.
///
/// `addresses`, when supplied, replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonPatch {
    pub uni: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub addresses: Option<Vec<PostalAddress>>,
}

impl Patch<Person> for PersonPatch {
    fn apply(self, target: &mut Person, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = target.clone();
        if let Some(v) = self.uni {
            next.uni = v;
        }
        if let Some(v) = self.first_name {
            next.first_name = v;
        }
        if let Some(v) = self.last_name {
            next.last_name = v;
        }
        if let Some(v) = self.email {
            next.email = v;
        }
        if let Some(v) = self.phone {
            next.phone = Some(v);
        }
        if let Some(v) = self.birth_date {
            next.birth_date = Some(v);
        }
        if let Some(v) = self.addresses {
            next.addresses = v;
        }
        next.validate()?;

        next.updated_at = now;
        *target = next;
        Ok(())
    }
}

/// Exact-match list filter; every supplied field must match.
///
/// `city` and `country` match when at least one of the person's addresses
/// matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonFilter {
    pub uni: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl PersonFilter {
    pub fn matches(&self, p: &Person) -> bool {
        self.uni.as_ref().is_none_or(|v| *v == p.uni)
            && self.first_name.as_ref().is_none_or(|v| *v == p.first_name)
            && self.last_name.as_ref().is_none_or(|v| *v == p.last_name)
            && self.email.as_ref().is_none_or(|v| *v == p.email)
            && self.phone.as_ref().is_none_or(|v| p.phone.as_ref() == Some(v))
            && self.birth_date.is_none_or(|v| p.birth_date == Some(v))
            && self
                .city
                .as_ref()
                .is_none_or(|v| p.addresses.iter().any(|a| a.city == *v))
            && self
                .country
                .as_ref()
                .is_none_or(|v| p.addresses.iter().any(|a| a.country == *v))
    }
}
