//! Postal addresses and their region enumeration

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown region: {0}")]
pub struct UnknownRegion(String);

/// Compass region an address belongs to. Persisted as its uppercase name
/// and read back case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "NORTH",
            Region::South => "SOUTH",
            Region::East => "EAST",
            Region::West => "WEST",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORTH" => Ok(Region::North),
            "SOUTH" => Ok(Region::South),
            "EAST" => Ok(Region::East),
            "WEST" => Ok(Region::West),
            other => Err(UnknownRegion(other.to_string())),
        }
    }
}

/// A postal address. Immutable once constructed; the identity is assigned
/// by the store on save and a Person only associates with the value, it
/// never manages its row lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub(crate) id: Option<i64>,
    street_address: String,
    address2: String,
    city: String,
    state: String,
    postcode: String,
    county: String,
    country: String,
    region: Region,
}

impl Address {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        street_address: impl Into<String>,
        address2: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postcode: impl Into<String>,
        county: impl Into<String>,
        country: impl Into<String>,
        region: Region,
    ) -> Self {
        Self {
            id: None,
            street_address: street_address.into(),
            address2: address2.into(),
            city: city.into(),
            state: state.into(),
            postcode: postcode.into(),
            county: county.into(),
            country: country.into(),
            region,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn street_address(&self) -> &str {
        &self.street_address
    }

    pub fn address2(&self) -> &str {
        &self.address2
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    pub fn county(&self) -> &str {
        &self.county
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn region(&self) -> Region {
        self.region
    }
}
