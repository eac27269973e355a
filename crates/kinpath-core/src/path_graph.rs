//! Assembly of a discovered chain into an ordered, enriched path

use crate::classify::{classify, implied_reciprocal, EdgeKind};
use crate::error::{Error, Result};
use crate::graph::FamilyGraph;
use crate::person::{Person, PersonId};
use crate::relation::{Connection, RelationshipLabel};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Link from a path node to its neighbor on the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLink {
    pub person_id: PersonId,
    pub label: RelationshipLabel,
}

/// A person as rendered inside a discovered path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub person: Person,

    /// Comma-joined addresses, empty if none
    pub address: String,

    /// Comma-joined religions, empty if none
    pub religion: String,

    /// Predecessor on the path; the label is what the predecessor is to this node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<PathLink>,

    /// Successor on the path; the label is what this node is to the successor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<PathLink>,

    /// Ancestors one generation up
    #[serde(default)]
    pub up: Vec<Connection>,

    /// Descendants one generation down
    #[serde(default)]
    pub down: Vec<Connection>,

    #[serde(default)]
    pub spouses: Vec<Connection>,
}

impl PathNode {
    /// Node carrying only person data, no links or connections
    pub fn bare(person: Person) -> Self {
        Self {
            address: person.address_summary(),
            religion: person.religion_summary(),
            person,
            from: None,
            to: None,
            up: Vec::new(),
            down: Vec::new(),
            spouses: Vec::new(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.person.id
    }

    /// Sort connections into up/down/spouse lists
    pub fn with_connections(mut self, connections: &[Connection]) -> Self {
        for conn in connections {
            match classify(conn.label) {
                // This node is the child, so the neighbor sits one generation up
                EdgeKind::Child => self.up.push(*conn),
                EdgeKind::Parent => self.down.push(*conn),
                EdgeKind::Spouse => self.spouses.push(*conn),
            }
        }
        self
    }

    /// All connection entries, up then down then spouses
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.up.iter().chain(&self.down).chain(&self.spouses)
    }
}

/// Ordered, enriched path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathGraph {
    /// Person A to person B, meeting point once
    pub ordered_ids: Vec<PersonId>,

    /// Path nodes plus bare nodes for every connection target
    pub nodes: HashMap<PersonId, PathNode>,
}

impl PathGraph {
    /// Path nodes in order
    pub fn ordered_nodes(&self) -> Vec<&PathNode> {
        self.ordered_ids
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }
}

/// Merges the two search chains and enriches each node
pub struct PathGraphBuilder;

impl PathGraphBuilder {
    /// Join `chain_a` (A..meeting) and `chain_b` (B..meeting) into one
    /// ordered sequence from A to B
    pub fn merge_chains(
        person_a: PersonId,
        person_b: PersonId,
        meeting_id: PersonId,
        chain_a: &[PersonId],
        chain_b: &[PersonId],
    ) -> Result<Vec<PersonId>> {
        let ends_ok = chain_a.first() == Some(&person_a)
            && chain_b.first() == Some(&person_b)
            && chain_a.last() == Some(&meeting_id)
            && chain_b.last() == Some(&meeting_id);
        if !ends_ok {
            return Err(Error::Internal(format!(
                "chains do not run from {} and {} to {}",
                person_a, person_b, meeting_id
            )));
        }

        let ordered: Vec<PersonId> = chain_a
            .iter()
            .chain(chain_b.iter().rev().skip(1))
            .copied()
            .collect();

        let mut seen = HashSet::new();
        if let Some(dup) = ordered.iter().find(|id| !seen.insert(**id)) {
            return Err(Error::Internal(format!("path visits {} twice", dup)));
        }

        Ok(ordered)
    }

    /// Build the enriched path for a successful search
    pub fn build_path<G: FamilyGraph + ?Sized>(
        graph: &G,
        person_a: PersonId,
        person_b: PersonId,
        meeting_id: PersonId,
        chain_a: &[PersonId],
        chain_b: &[PersonId],
    ) -> Result<PathGraph> {
        let ordered_ids = Self::merge_chains(person_a, person_b, meeting_id, chain_a, chain_b)?;

        let mut persons: HashMap<PersonId, Person> = HashMap::new();
        let mut connections: HashMap<PersonId, Vec<Connection>> = HashMap::new();
        for id in &ordered_ids {
            persons.insert(*id, Self::fetch_person(graph, id)?);
            connections.insert(*id, graph.get_active_relationships(id)?);
        }

        let mut nodes: HashMap<PersonId, PathNode> = HashMap::new();
        for id in &ordered_ids {
            let node = PathNode::bare(persons[id].clone()).with_connections(&connections[id]);
            nodes.insert(*id, node);
        }

        for pair in ordered_ids.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let label = Self::step_label(&persons[&prev], &connections[&prev], next, &connections[&next])?;

            if let Some(node) = nodes.get_mut(&prev) {
                node.to = Some(PathLink { person_id: next, label });
            }
            if let Some(node) = nodes.get_mut(&next) {
                node.from = Some(PathLink { person_id: prev, label });
            }
        }

        // Connection targets off the path still need to resolve to a node
        let off_path: Vec<PersonId> = connections
            .values()
            .flatten()
            .map(|conn| conn.person_id)
            .filter(|id| !nodes.contains_key(id))
            .collect();
        for id in off_path {
            if nodes.contains_key(&id) {
                continue;
            }
            let person = Self::fetch_person(graph, &id)?;
            nodes.insert(id, PathNode::bare(person));
        }

        tracing::debug!(
            "Built path of {} persons ({} nodes incl. relatives)",
            ordered_ids.len(),
            nodes.len()
        );

        Ok(PathGraph { ordered_ids, nodes })
    }

    /// What `prev` is to `next`: taken from `prev`'s connections, or
    /// mirrored from `next`'s when the reader only lists it one way
    fn step_label(
        prev: &Person,
        prev_connections: &[Connection],
        next: PersonId,
        next_connections: &[Connection],
    ) -> Result<RelationshipLabel> {
        if let Some(conn) = prev_connections.iter().find(|c| c.person_id == next) {
            return Ok(conn.label);
        }
        next_connections
            .iter()
            .find(|c| c.person_id == prev.id)
            .map(|conn| implied_reciprocal(conn.label, prev.gender))
            .ok_or_else(|| Error::RelationshipNotFound {
                from: prev.id.to_string(),
                to: next.to_string(),
            })
    }

    fn fetch_person<G: FamilyGraph + ?Sized>(graph: &G, id: &PersonId) -> Result<Person> {
        graph
            .get_person(id)?
            .ok_or_else(|| Error::PersonNotFound(id.to_string()))
    }
}
