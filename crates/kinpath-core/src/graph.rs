//! Read interfaces over the family graph and an in-memory snapshot

use crate::classify::implied_reciprocal;
use crate::error::Result;
use crate::person::{Person, PersonId};
use crate::relation::{Connection, Relationship};
use std::collections::{HashMap, HashSet};

/// Person lookup consumed by the path finder and builder
pub trait PersonReader {
    /// Get a person by id
    fn get_person(&self, id: &PersonId) -> Result<Option<Person>>;
}

/// Relationship lookup consumed by the path finder and builder
pub trait RelationshipReader {
    /// All active relationships of a person, seen from that person.
    ///
    /// Incoming edges are included, so the graph reads as undirected.
    /// Order must be deterministic.
    fn get_active_relationships(&self, id: &PersonId) -> Result<Vec<Connection>>;
}

/// Both read capabilities; blanket-implemented
pub trait FamilyGraph: PersonReader + RelationshipReader {}

impl<T: PersonReader + RelationshipReader + ?Sized> FamilyGraph for T {}

/// Consistent in-memory view of persons and active relationships
///
/// Neighbor order follows relationship insertion order, which keeps search
/// tie-breaks reproducible.
#[derive(Debug, Clone, Default)]
pub struct FamilySnapshot {
    persons: HashMap<PersonId, Person>,
    adjacency: HashMap<PersonId, Vec<Connection>>,
    edge_count: usize,
}

impl FamilySnapshot {
    pub fn new(persons: Vec<Person>, relationships: Vec<Relationship>) -> Self {
        let persons: HashMap<PersonId, Person> =
            persons.into_iter().map(|p| (p.id, p)).collect();

        let active: Vec<&Relationship> = relationships
            .iter()
            .filter(|r| r.active)
            .filter(|r| {
                let known = r.from_id != r.to_id
                    && persons.contains_key(&r.from_id)
                    && persons.contains_key(&r.to_id);
                if !known {
                    tracing::debug!("Skipping dangling or self relationship {}", r.id);
                }
                known
            })
            .collect();

        let explicit: HashSet<(PersonId, PersonId)> =
            active.iter().map(|r| (r.from_id, r.to_id)).collect();

        let mut adjacency: HashMap<PersonId, Vec<Connection>> = HashMap::new();
        let mut seen: HashSet<(PersonId, PersonId)> = HashSet::new();

        for rel in &active {
            if seen.insert((rel.from_id, rel.to_id)) {
                adjacency
                    .entry(rel.from_id)
                    .or_default()
                    .push(Connection::new(rel.to_id, rel.label));
            }

            if !explicit.contains(&(rel.to_id, rel.from_id)) && seen.insert((rel.to_id, rel.from_id)) {
                let gender = persons.get(&rel.to_id).and_then(|p| p.gender);
                adjacency
                    .entry(rel.to_id)
                    .or_default()
                    .push(Connection::new(rel.from_id, implied_reciprocal(rel.label, gender)));
            }
        }

        Self {
            persons,
            adjacency,
            edge_count: active.len(),
        }
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    /// Number of active, well-formed relationship records
    pub fn relationship_count(&self) -> usize {
        self.edge_count
    }

    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    /// Find persons whose "First Last" matches case-insensitively
    pub fn find_by_name(&self, full_name: &str) -> Vec<&Person> {
        let wanted = full_name.trim().to_lowercase();
        let mut found: Vec<&Person> = self
            .persons
            .values()
            .filter(|p| p.full_name().to_lowercase() == wanted)
            .collect();
        found.sort_by_key(|p| p.id);
        found
    }
}

impl PersonReader for FamilySnapshot {
    fn get_person(&self, id: &PersonId) -> Result<Option<Person>> {
        Ok(self.persons.get(id).cloned())
    }
}

impl RelationshipReader for FamilySnapshot {
    fn get_active_relationships(&self, id: &PersonId) -> Result<Vec<Connection>> {
        Ok(self.adjacency.get(id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Gender;
    use crate::relation::RelationshipLabel;

    #[test]
    fn test_incoming_edges_get_implied_reciprocal() {
        let dad = Person::new("Tom", "Reed", 1950).with_gender(Gender::Male);
        let kid = Person::new("Amy", "Reed", 1980).with_gender(Gender::Female);
        let rels = vec![Relationship::new(dad.id, kid.id, RelationshipLabel::Father)];
        let snapshot = FamilySnapshot::new(vec![dad.clone(), kid.clone()], rels);

        assert_eq!(
            snapshot.get_active_relationships(&dad.id).unwrap(),
            vec![Connection::new(kid.id, RelationshipLabel::Father)]
        );
        assert_eq!(
            snapshot.get_active_relationships(&kid.id).unwrap(),
            vec![Connection::new(dad.id, RelationshipLabel::Daughter)]
        );
    }

    #[test]
    fn test_explicit_reciprocal_is_not_duplicated() {
        let a = Person::new("Jon", "Lee", 1970).with_gender(Gender::Male);
        let b = Person::new("Mia", "Lee", 1972).with_gender(Gender::Female);
        let rels = vec![
            Relationship::new(a.id, b.id, RelationshipLabel::Husband),
            Relationship::new(b.id, a.id, RelationshipLabel::Wife),
        ];
        let snapshot = FamilySnapshot::new(vec![a.clone(), b.clone()], rels);

        assert_eq!(
            snapshot.get_active_relationships(&a.id).unwrap(),
            vec![Connection::new(b.id, RelationshipLabel::Husband)]
        );
        assert_eq!(
            snapshot.get_active_relationships(&b.id).unwrap(),
            vec![Connection::new(a.id, RelationshipLabel::Wife)]
        );
    }

    #[test]
    fn test_implied_reciprocal_keeps_edge_position() {
        let x = Person::new("Ned", "Ash", 1960).with_gender(Gender::Male);
        let wife = Person::new("Ivy", "Ash", 1962).with_gender(Gender::Female);
        let father = Person::new("Abe", "Ash", 1930).with_gender(Gender::Male);
        let son = Person::new("Kit", "Ash", 1990).with_gender(Gender::Male);
        let rels = vec![
            Relationship::new(x.id, wife.id, RelationshipLabel::Husband),
            Relationship::new(father.id, x.id, RelationshipLabel::Father),
            Relationship::new(x.id, son.id, RelationshipLabel::Father),
        ];
        let snapshot = FamilySnapshot::new(
            vec![x.clone(), wife.clone(), father.clone(), son.clone()],
            rels,
        );

        assert_eq!(
            snapshot.get_active_relationships(&x.id).unwrap(),
            vec![
                Connection::new(wife.id, RelationshipLabel::Husband),
                Connection::new(father.id, RelationshipLabel::Son),
                Connection::new(son.id, RelationshipLabel::Father),
            ]
        );
    }

    #[test]
    fn test_inactive_and_dangling_edges_are_ignored() {
        let a = Person::new("Jon", "Lee", 1970);
        let b = Person::new("Mia", "Lee", 1972);
        let ghost = PersonId::new();
        let rels = vec![
            Relationship::new(a.id, b.id, RelationshipLabel::Spouse).deactivated(),
            Relationship::new(a.id, ghost, RelationshipLabel::Father),
            Relationship::new(a.id, a.id, RelationshipLabel::Spouse),
        ];
        let snapshot = FamilySnapshot::new(vec![a.clone(), b.clone()], rels);

        assert!(snapshot.get_active_relationships(&a.id).unwrap().is_empty());
        assert!(snapshot.get_active_relationships(&b.id).unwrap().is_empty());
        assert_eq!(snapshot.relationship_count(), 0);
    }

    #[test]
    fn test_find_by_name() {
        let a = Person::new("Jon", "Lee", 1970);
        let snapshot = FamilySnapshot::new(vec![a.clone()], vec![]);

        assert_eq!(snapshot.find_by_name("jon lee").len(), 1);
        assert!(snapshot.find_by_name("Mia Lee").is_empty());
        assert!(snapshot.get_person(&PersonId::new()).unwrap().is_none());
    }
}
