//! Rental resource records and the commands produced for the rentals service.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier assigned by the rentals service once a rental is persisted.
///
/// The service may report identifiers as JSON strings or numbers; both are
/// normalized into their textual form so they can round-trip through the
/// form's `rentalId` field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RentalId(String);

impl RentalId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RentalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RentalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for RentalId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RentalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// A rental record as stored by the rentals service.
///
/// The identifier is only present once the record has been persisted. The
/// service may name it either `rentalId` or `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalEntity {
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub rental_id: Option<RentalId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub owner: String,
}

impl RentalEntity {
    pub fn new(name: impl Into<String>, email: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            rental_id: None,
            name: name.into(),
            email: email.into(),
            owner: owner.into(),
        }
    }

    pub fn with_id(mut self, rental_id: impl Into<RentalId>) -> Self {
        self.rental_id = Some(rental_id.into());
        self
    }

    /// Textual value of a field, as it would appear in the editor form.
    pub fn field_value(&self, field: RentalField) -> &str {
        match field {
            RentalField::Name => &self.name,
            RentalField::Email => &self.email,
            RentalField::Owner => &self.owner,
            RentalField::RentalId => self.rental_id.as_ref().map(RentalId::as_str).unwrap_or_default(),
        }
    }
}

/// Body sent to the rentals service on create and update.
///
/// Never carries the identifier; updates address the record by path instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPayload {
    pub email: String,
    pub name: String,
    pub owner: String,
}

/// A write request handed to the rentals service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentalCommand {
    Create(RentalPayload),
    Update { id: RentalId, payload: RentalPayload },
}

impl RentalCommand {
    pub fn kind(&self) -> RentalCommandKind {
        match self {
            Self::Create(_) => RentalCommandKind::Create,
            Self::Update { .. } => RentalCommandKind::Update,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalCommandKind {
    Create,
    Update,
}

impl RentalCommandKind {
    /// Past-tense verb used in user-facing messages.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
        }
    }
}

/// Fields of the rental editor form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RentalField {
    Name,
    Email,
    Owner,
    RentalId,
}

impl RentalField {
    /// Fields present in both create and edit mode.
    pub const BASE: [RentalField; 3] = [RentalField::Name, RentalField::Email, RentalField::Owner];

    /// Stable key used in messages and payloads.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Owner => "owner",
            Self::RentalId => "rentalId",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Owner => "Owner",
            Self::RentalId => "Rental ID",
        }
    }
}

impl fmt::Display for RentalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_identifier_is_normalized_to_text() {
        let rental: RentalEntity =
            serde_json::from_str(r#"{"id": 42, "name": "Loft", "email": "a@b.com", "owner": "Bob"}"#).unwrap();
        assert_eq!(rental.rental_id, Some(RentalId::from("42")));
        assert_eq!(rental.field_value(RentalField::RentalId), "42");
    }

    #[test]
    fn rental_id_key_is_accepted() {
        let rental: RentalEntity =
            serde_json::from_str(r#"{"rentalId": "r-7", "name": "Loft", "email": "a@b.com", "owner": "Bob"}"#).unwrap();
        assert_eq!(rental.rental_id, Some(RentalId::from("r-7")));
    }

    #[test]
    fn payload_serializes_only_the_editable_fields() {
        let payload = RentalPayload {
            email: "a@b.com".into(),
            name: "Alice".into(),
            owner: "Bob".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@b.com", "name": "Alice", "owner": "Bob"}));
    }

    #[test]
    fn unpersisted_rental_has_empty_identifier_value() {
        let rental = RentalEntity::new("Loft", "a@b.com", "Bob");
        assert_eq!(rental.field_value(RentalField::RentalId), "");
        assert_eq!(rental.field_value(RentalField::Owner), "Bob");
    }
}
