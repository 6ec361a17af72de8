use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_core::{AddressId, DomainResult, Entity, Patch, ValueObject};

use crate::validate;

/// Postal address fields, shared by stored addresses and person records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl ValueObject for PostalAddress {}

impl PostalAddress {
    pub fn validate(&self) -> DomainResult<()> {
        validate::non_empty("street", &self.street)?;
        validate::non_empty("city", &self.city)?;
        validate::non_empty("postal_code", &self.postal_code)?;
        validate::non_empty("country", &self.country)?;
        if let Some(state) = &self.state {
            validate::non_empty("state", state)?;
        }
        Ok(())
    }
}

/// Stored address record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(flatten)]
    pub postal: PostalAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Address {
    type Id = AddressId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn kind() -> &'static str {
        "address"
    }
}

/// Creation payload for an address.
///
/// Unlike the other records, an address may carry a client-chosen id; when
/// omitted the server generates one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAddress {
    #[serde(default)]
    pub id: Option<AddressId>,
    #[serde(flatten)]
    pub postal: PostalAddress,
}

impl Address {
    pub fn create(new: NewAddress, now: DateTime<Utc>) -> DomainResult<Self> {
        new.postal.validate()?;
        Ok(Self {
            id: new.id.unwrap_or_default(),
            postal: new.postal,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update for an address; supply only fields to change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Patch<Address> for AddressPatch {
    fn apply(self, target: &mut Address, now: DateTime<Utc>) -> DomainResult<()> {
        let mut postal = target.postal.clone();
        if let Some(v) = self.street {
            postal.street = v;
        }
        if let Some(v) = self.city {
            postal.city = v;
        }
        if let Some(v) = self.state {
            postal.state = Some(v);
        }
        if let Some(v) = self.postal_code {
            postal.postal_code = v;
        }
        if let Some(v) = self.country {
            postal.country = v;
        }
        postal.validate()?;

        target.postal = postal;
        target.updated_at = now;
        Ok(())
    }
}

/// Exact-match list filter; every supplied field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressFilter {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl AddressFilter {
    pub fn matches(&self, address: &Address) -> bool {
        let p = &address.postal;
        self.street.as_ref().is_none_or(|v| *v == p.street)
            && self.city.as_ref().is_none_or(|v| *v == p.city)
            && self.state.as_ref().is_none_or(|v| p.state.as_ref() == Some(v))
            && self.postal_code.as_ref().is_none_or(|v| *v == p.postal_code)
            && self.country.as_ref().is_none_or(|v| *v == p.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::DomainError;

    fn postal() -> PostalAddress {
        PostalAddress {
            street: "116th St & Broadway".to_string(),
            city: "New York".to_string(),
            state: Some("NY".to_string()),
            postal_code: "10027".to_string(),
            country: "USA".to_string(),
        }
    }

    fn new_address(id: Option<AddressId>, postal: PostalAddress) -> NewAddress {
        NewAddress { id, postal }
    }

    fn created() -> Address {
        Address::create(new_address(None, postal()), Utc::now()).unwrap()
    }

    #[test]
    fn create_generates_id_when_absent() {
        let now = Utc::now();
        let a = Address::create(new_address(None, postal()), now).unwrap();
        assert_eq!(a.created_at, now);
        assert_eq!(a.updated_at, now);

        let chosen = AddressId::new();
        let b = Address::create(new_address(Some(chosen), postal()), now).unwrap();
        assert_eq!(b.id, chosen);
    }

    #[test]
    fn create_rejects_blank_city() {
        let mut p = postal();
        p.city = "  ".to_string();
        let err = Address::create(new_address(None, p), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn patch_changes_only_supplied_fields() {
        let mut a = created();
        let before = a.clone();

        let patch = AddressPatch {
            city: Some("Brooklyn".to_string()),
            ..Default::default()
        };
        patch.apply(&mut a, Utc::now()).unwrap();

        assert_eq!(a.postal.city, "Brooklyn");
        assert_eq!(a.postal.street, before.postal.street);
        assert_eq!(a.postal.country, before.postal.country);
        assert_eq!(a.created_at, before.created_at);
        assert!(a.updated_at >= before.updated_at);
    }

    #[test]
    fn invalid_patch_leaves_record_untouched() {
        let mut a = created();
        let before = a.clone();

        let patch = AddressPatch {
            country: Some(String::new()),
            ..Default::default()
        };
        let err = patch.apply(&mut a, Utc::now()).unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(a, before);
    }

    #[test]
    fn filter_is_conjunctive() {
        let a = created();

        assert!(AddressFilter::default().matches(&a));
        let f = AddressFilter {
            city: Some("New York".to_string()),
            country: Some("USA".to_string()),
            ..Default::default()
        };
        assert!(f.matches(&a));
        let f = AddressFilter {
            city: Some("New York".to_string()),
            country: Some("Canada".to_string()),
            ..Default::default()
        };
        assert!(!f.matches(&a));
    }

    #[test]
    fn wire_format_is_flat() {
        let a = created();
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["city"], "New York");
        assert_eq!(json["id"], a.id.to_string());
    }
}
