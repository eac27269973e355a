//! Output formatting utilities

use kinpath_core::Person;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Pretty JSON for `--format json`
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// "1950-2010", "1950-" for the living
pub fn lifespan(person: &Person) -> String {
    match person.death_year {
        Some(death) => format!("{}-{}", person.birth_year, death),
        None => format!("{}-", person.birth_year),
    }
}

/// One table row per person
pub fn person_row(person: &Person) -> String {
    let gender = person
        .gender
        .map(|g| g.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {:<30} {:<10} {}",
        person.id,
        person.full_name(),
        lifespan(person),
        gender
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinpath_core::Gender;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from("csv"), OutputFormat::Table);
    }

    #[test]
    fn test_person_row() {
        let person = Person::new("Ada", "Quill", 1901)
            .with_death_year(1980)
            .with_gender(Gender::Female);
        let row = person_row(&person);
        assert!(row.contains("Ada Quill"));
        assert!(row.contains("1901-1980"));
        assert!(row.ends_with("female"));
    }
}
