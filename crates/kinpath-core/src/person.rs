//! Person (node) types

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub Ulid);

impl PersonId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PersonId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Gender as recorded on a person, used when inverting relationship labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// A person in the family graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,

    pub first_name: String,

    pub last_name: String,

    pub birth_year: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Free-form addresses, most relevant first
    #[serde(default)]
    pub addresses: Vec<String>,

    #[serde(default)]
    pub religions: Vec<String>,
}

impl Person {
    /// Create a new person with a fresh id
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, birth_year: i32) -> Self {
        Self {
            id: PersonId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_year,
            death_year: None,
            gender: None,
            addresses: Vec::new(),
            religions: Vec::new(),
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_death_year(mut self, year: i32) -> Self {
        self.death_year = Some(year);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.addresses.push(address.into());
        self
    }

    pub fn with_religion(mut self, religion: impl Into<String>) -> Self {
        self.religions.push(religion.into());
        self
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Comma-joined addresses, empty if none
    pub fn address_summary(&self) -> String {
        self.addresses.join(", ")
    }

    /// Comma-joined religions, empty if none
    pub fn religion_summary(&self) -> String {
        self.religions.join(", ")
    }

    /// Check that names and years are within limits
    pub fn validate(&self) -> Result<(), crate::limits::ValidationError> {
        crate::limits::validate_name(&self.first_name)?;
        crate::limits::validate_name(&self.last_name)?;
        crate::limits::validate_lifespan(self.birth_year, self.death_year)?;
        crate::limits::validate_attribute_count(self.addresses.len())?;
        crate::limits::validate_attribute_count(self.religions.len())
    }
}
