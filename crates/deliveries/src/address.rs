use shiptrack_core::error::require_non_blank;
use shiptrack_core::{DomainResult, ValueObject};

/// Postal address of a sender or recipient.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    street: String,
    city: String,
    state: String,
    country: String,
    zip: String,
}

impl ValueObject for Address {}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        zip: impl Into<String>,
    ) -> DomainResult<Self> {
        let address = Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            country: country.into(),
            zip: zip.into(),
        };

        require_non_blank(&address.street, "Street")?;
        require_non_blank(&address.city, "City")?;
        require_non_blank(&address.state, "State")?;
        require_non_blank(&address.country, "Country")?;
        require_non_blank(&address.zip, "ZIP code")?;

        Ok(address)
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn zip(&self) -> &str {
        &self.zip
    }

    /// `"{street}, {city}, {state} {zip}, {country}"`
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.street, self.city, self.state, self.zip, self.country
        )
    }
}
