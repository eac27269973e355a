//! Input validation limits for search bounds and person records

/// Default relationship search depth (hops per side)
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Maximum relationship search depth (50)
pub const MAX_SEARCH_DEPTH: u32 = 50;

/// Maximum length for first/last names (256 chars)
pub const MAX_NAME_LEN: usize = 256;

/// Maximum addresses or religions attached to one person (64)
pub const MAX_ATTRIBUTES_PER_PERSON: usize = 64;

/// Maximum persons in a single import (100000)
pub const MAX_IMPORT_PERSONS: usize = 100_000;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName,
    NameTooLong { len: usize, max: usize },
    SearchDepthTooLarge { depth: u32, max: u32 },
    DeathBeforeBirth { birth: i32, death: i32 },
    TooManyAttributes { count: usize, max: usize },
    TooManyPersons { count: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong { len, max } => {
                write!(f, "Name too long: {} chars (max {})", len, max)
            }
            Self::SearchDepthTooLarge { depth, max } => {
                write!(f, "Search depth too large: {} (max {})", depth, max)
            }
            Self::DeathBeforeBirth { birth, death } => {
                write!(f, "Death year {} precedes birth year {}", death, birth)
            }
            Self::TooManyAttributes { count, max } => {
                write!(f, "Too many addresses or religions: {} (max {})", count, max)
            }
            Self::TooManyPersons { count, max } => {
                write!(f, "Too many persons in import: {} (max {})", count, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a first or last name
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate search depth
pub fn validate_search_depth(depth: u32) -> Result<(), ValidationError> {
    if depth > MAX_SEARCH_DEPTH {
        return Err(ValidationError::SearchDepthTooLarge {
            depth,
            max: MAX_SEARCH_DEPTH,
        });
    }
    Ok(())
}

/// Validate birth/death years
pub fn validate_lifespan(birth: i32, death: Option<i32>) -> Result<(), ValidationError> {
    match death {
        Some(death) if death < birth => Err(ValidationError::DeathBeforeBirth { birth, death }),
        _ => Ok(()),
    }
}

/// Validate the number of addresses or religions on a person
pub fn validate_attribute_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_ATTRIBUTES_PER_PERSON {
        return Err(ValidationError::TooManyAttributes {
            count,
            max: MAX_ATTRIBUTES_PER_PERSON,
        });
    }
    Ok(())
}

/// Validate import batch size
pub fn validate_import_persons(count: usize) -> Result<(), ValidationError> {
    if count > MAX_IMPORT_PERSONS {
        return Err(ValidationError::TooManyPersons {
            count,
            max: MAX_IMPORT_PERSONS,
        });
    }
    Ok(())
}
