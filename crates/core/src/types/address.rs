//! Shipping address embedded in orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured shipping address captured at checkout.
///
/// Stored denormalized on the order (JSON column), not linked to the user's
/// address book: editing a saved address later must not rewrite where a
/// placed order ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A required address field was empty.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("missing required field: {0}")]
pub struct MissingField(pub &'static str);

impl ShippingAddress {
    /// Validate that all required fields are non-blank.
    ///
    /// Phone is optional; everything else is required. Runs before any
    /// network write so an invalid form never reaches the database.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<(), MissingField> {
        let required = [
            ("full_name", &self.full_name),
            ("street_address", &self.street_address),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(MissingField(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Lovelace".into(),
            street_address: "12 Analytical Way".into(),
            city: "London".into(),
            state: "LDN".into(),
            postal_code: "E1 6AN".into(),
            country: "GB".into(),
            phone: None,
        }
    }

    #[test]
    fn complete_address_validates() {
        assert_eq!(address().validate(), Ok(()));
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut addr = address();
        addr.city = "   ".into();
        assert_eq!(addr.validate(), Err(MissingField("city")));
    }

    #[test]
    fn phone_is_optional() {
        let mut addr = address();
        addr.phone = Some("+44 20 7946 0958".into());
        assert_eq!(addr.validate(), Ok(()));
    }

    #[test]
    fn absent_phone_is_omitted_from_json() {
        let json = serde_json::to_value(address()).expect("serialize");
        assert!(json.get("phone").is_none());
    }
}
