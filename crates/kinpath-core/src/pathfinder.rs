//! Bidirectional breadth-first search for the nearest common connection
//!
//! Two frontiers grow in lockstep, one hop per side per round. The first
//! node discovered by one side that the other side has already visited is
//! the meeting point. Ties go to whichever candidate the reader's neighbor
//! order yields first.

use crate::error::{Error, Result};
use crate::graph::FamilyGraph;
use crate::person::PersonId;
use crate::relation::RelationshipLabel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a bidirectional search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSearch {
    pub connection_found: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<PersonId>,

    /// Person A up to and including the meeting point
    pub chain_a: Vec<PersonId>,

    /// Person B up to and including the meeting point
    pub chain_b: Vec<PersonId>,

    pub message: String,

    pub stats: SearchStats,
}

/// Search statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub edges_examined: usize,
    pub rounds: u32,
}

/// Back-pointer to the node a person was discovered from, and what that
/// node is to the person
#[derive(Debug, Clone, Copy)]
struct Step {
    prev: PersonId,
    label: RelationshipLabel,
}

/// One direction of the search
struct Frontier {
    origin: PersonId,
    visited: HashMap<PersonId, Option<Step>>,
    queue: Vec<PersonId>,
}

impl Frontier {
    fn new(origin: PersonId) -> Self {
        let mut visited = HashMap::new();
        visited.insert(origin, None);
        Self {
            origin,
            visited,
            queue: vec![origin],
        }
    }

    fn has_visited(&self, id: &PersonId) -> bool {
        self.visited.contains_key(id)
    }

    /// Expand every queued node by one hop. Returns the meeting point as
    /// soon as a newly discovered node is known to `other`.
    fn expand<G: FamilyGraph + ?Sized>(
        &mut self,
        graph: &G,
        other: &Frontier,
        stats: &mut SearchStats,
    ) -> Result<Option<PersonId>> {
        let current_level = std::mem::take(&mut self.queue);
        let mut next_level = Vec::new();

        for current in current_level {
            stats.nodes_expanded += 1;

            for conn in graph.get_active_relationships(&current)? {
                stats.edges_examined += 1;
                let next = conn.person_id;

                if self.has_visited(&next) {
                    continue;
                }
                self.visited.insert(
                    next,
                    Some(Step {
                        prev: current,
                        label: conn.label,
                    }),
                );

                if other.has_visited(&next) {
                    return Ok(Some(next));
                }
                next_level.push(next);
            }
        }

        self.queue = next_level;
        Ok(None)
    }

    fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    /// Ordered chain from the origin to `end`
    fn chain_to(&self, end: PersonId) -> Vec<PersonId> {
        let mut chain = vec![end];
        let mut current = end;

        while current != self.origin {
            match self.visited.get(&current).copied().flatten() {
                Some(step) => {
                    tracing::trace!("{} is {} of {}", step.prev, step.label, current);
                    chain.push(step.prev);
                    current = step.prev;
                }
                None => break,
            }
        }

        chain.reverse();
        chain
    }
}

/// Bidirectional path finder
pub struct PathFinder;

impl PathFinder {
    /// Search for the nearest common connection of `person_a` and `person_b`
    /// within `max_depth` hops per side
    pub fn find_path<G: FamilyGraph + ?Sized>(
        graph: &G,
        person_a: PersonId,
        person_b: PersonId,
        max_depth: u32,
    ) -> Result<PathSearch> {
        Self::require_person(graph, &person_a)?;
        Self::require_person(graph, &person_b)?;

        let mut stats = SearchStats::default();

        if person_a == person_b {
            return Ok(PathSearch {
                connection_found: true,
                meeting_id: Some(person_a),
                chain_a: vec![person_a],
                chain_b: vec![person_a],
                message: "Both ids refer to the same person".to_string(),
                stats,
            });
        }

        tracing::debug!(
            "Searching relation: a={}, b={}, max_depth={}",
            person_a,
            person_b,
            max_depth
        );

        let mut side_a = Frontier::new(person_a);
        let mut side_b = Frontier::new(person_b);

        for round in 1..=max_depth {
            stats.rounds = round;

            let meeting = match side_a.expand(graph, &side_b, &mut stats)? {
                Some(id) => Some(id),
                None => side_b.expand(graph, &side_a, &mut stats)?,
            };

            if let Some(meeting) = meeting {
                let chain_a = side_a.chain_to(meeting);
                let chain_b = side_b.chain_to(meeting);
                let hops = chain_a.len() + chain_b.len() - 2;
                tracing::debug!(
                    "Met at {} in round {} ({} hops, {} nodes expanded)",
                    meeting,
                    round,
                    hops,
                    stats.nodes_expanded
                );
                return Ok(PathSearch {
                    connection_found: true,
                    meeting_id: Some(meeting),
                    chain_a,
                    chain_b,
                    message: format!("Relation found at {} connection", ordinal(hops)),
                    stats,
                });
            }

            if side_a.is_exhausted() || side_b.is_exhausted() {
                tracing::debug!("Frontier exhausted after round {}", round);
                break;
            }
        }

        Ok(PathSearch {
            connection_found: false,
            meeting_id: None,
            chain_a: Vec::new(),
            chain_b: Vec::new(),
            message: no_relation_message(max_depth),
            stats,
        })
    }

    fn require_person<G: FamilyGraph + ?Sized>(graph: &G, id: &PersonId) -> Result<()> {
        match graph.get_person(id)? {
            Some(_) => Ok(()),
            None => Err(Error::PersonNotFound(id.to_string())),
        }
    }
}

/// Message used when no relation exists within `max_depth`
pub fn no_relation_message(max_depth: u32) -> String {
    format!("No relation found up to {} connection", ordinal(max_depth as usize))
}

/// 1st, 2nd, 3rd, 4th, ..., 11th, 12th, 13th, ..., 21st
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FamilySnapshot;
    use crate::person::{Gender, Person};
    use crate::relation::{Relationship, RelationshipLabel::*};

    fn person(name: &str) -> Person {
        Person::new(name, "Test", 1950).with_gender(Gender::Male)
    }

    /// A -> P1 -> G <- P2 <- B, labels read "A's father is P1" etc.
    fn cousins() -> (FamilySnapshot, [PersonId; 5]) {
        let [a, p1, g, p2, b] = ["A", "P1", "G", "P2", "B"].map(person);
        let ids = [a.id, p1.id, g.id, p2.id, b.id];
        let rels = vec![
            Relationship::new(a.id, p1.id, Father),
            Relationship::new(p1.id, g.id, Father),
            Relationship::new(b.id, p2.id, Mother),
            Relationship::new(p2.id, g.id, Mother),
        ];
        (FamilySnapshot::new(vec![a, p1, g, p2, b], rels), ids)
    }

    #[test]
    fn test_meets_at_common_ancestor() {
        let (snapshot, [a, p1, g, p2, b]) = cousins();
        let result = PathFinder::find_path(&snapshot, a, b, 2).unwrap();

        assert!(result.connection_found);
        assert_eq!(result.meeting_id, Some(g));
        assert_eq!(result.chain_a, vec![a, p1, g]);
        assert_eq!(result.chain_b, vec![b, p2, g]);
    }

    #[test]
    fn test_depth_bound_stops_search() {
        let (snapshot, [a, _, _, _, b]) = cousins();
        let result = PathFinder::find_path(&snapshot, a, b, 1).unwrap();

        assert!(!result.connection_found);
        assert!(result.chain_a.is_empty());
        assert!(result.chain_b.is_empty());
        assert_eq!(result.message, "No relation found up to 1st connection");
    }

    #[test]
    fn test_same_person() {
        let (snapshot, [a, ..]) = cousins();
        let result = PathFinder::find_path(&snapshot, a, a, 10).unwrap();

        assert!(result.connection_found);
        assert_eq!(result.meeting_id, Some(a));
        assert_eq!(result.chain_a, vec![a]);
        assert_eq!(result.chain_b, vec![a]);
    }

    #[test]
    fn test_direct_neighbors_meet_at_target() {
        let (snapshot, [a, p1, ..]) = cousins();
        let result = PathFinder::find_path(&snapshot, a, p1, 10).unwrap();

        assert_eq!(result.meeting_id, Some(p1));
        assert_eq!(result.chain_a, vec![a, p1]);
        assert_eq!(result.chain_b, vec![p1]);
    }

    #[test]
    fn test_isolated_persons() {
        let a = person("A");
        let b = person("B");
        let (ida, idb) = (a.id, b.id);
        let snapshot = FamilySnapshot::new(vec![a, b], vec![]);
        let result = PathFinder::find_path(&snapshot, ida, idb, 10).unwrap();

        assert!(!result.connection_found);
        assert_eq!(result.message, "No relation found up to 10th connection");
    }

    #[test]
    fn test_missing_person_is_named() {
        let (snapshot, [a, ..]) = cousins();
        let ghost = PersonId::new();

        match PathFinder::find_path(&snapshot, a, ghost, 10) {
            Err(Error::PersonNotFound(id)) => assert_eq!(id, ghost.to_string()),
            other => panic!("expected PersonNotFound, got {:?}", other),
        }
        match PathFinder::find_path(&snapshot, ghost, a, 10) {
            Err(Error::PersonNotFound(id)) => assert_eq!(id, ghost.to_string()),
            other => panic!("expected PersonNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_shortest_meeting_wins_over_longer_route() {
        // Long route: A - X1 - X2 - X3 - B; short route: A - S - B
        let [a, x1, x2, x3, s, b] = ["A", "X1", "X2", "X3", "S", "B"].map(person);
        let (ida, idb, ids) = (a.id, b.id, s.id);
        let rels = vec![
            Relationship::new(a.id, x1.id, Spouse),
            Relationship::new(x1.id, x2.id, Father),
            Relationship::new(x2.id, x3.id, Son),
            Relationship::new(x3.id, b.id, Spouse),
            Relationship::new(a.id, s.id, Son),
            Relationship::new(b.id, s.id, Son),
        ];
        let snapshot = FamilySnapshot::new(vec![a, x1, x2, x3, s, b], rels);
        let result = PathFinder::find_path(&snapshot, ida, idb, 10).unwrap();

        assert_eq!(result.meeting_id, Some(ids));
        assert_eq!(result.chain_a.len() + result.chain_b.len() - 2, 2);
    }

    /// A and B are both children of P and Q; `b_order` is the order of B's edges
    fn shared_parents(b_order: [usize; 2]) -> (FamilySnapshot, [PersonId; 4]) {
        let [a, b, p, q] = ["A", "B", "P", "Q"].map(person);
        let ids = [a.id, b.id, p.id, q.id];
        let parents = [p.id, q.id];
        let rels = vec![
            Relationship::new(a.id, q.id, Son),
            Relationship::new(a.id, p.id, Son),
            Relationship::new(b.id, parents[b_order[0]], Son),
            Relationship::new(b.id, parents[b_order[1]], Son),
        ];
        (FamilySnapshot::new(vec![a, b, p, q], rels), ids)
    }

    #[test]
    fn test_equal_meetings_follow_neighbor_order() {
        // B's side finds the meeting, so B's edge order decides it
        let (snapshot, [a, b, p, _]) = shared_parents([0, 1]);
        let result = PathFinder::find_path(&snapshot, a, b, 3).unwrap();

        assert_eq!(result.meeting_id, Some(p));
        assert_eq!(result.chain_a, vec![a, p]);
        assert_eq!(result.chain_b, vec![b, p]);
        assert_eq!(result.stats.rounds, 1);

        let (snapshot, [a, b, _, q]) = shared_parents([1, 0]);
        let result = PathFinder::find_path(&snapshot, a, b, 3).unwrap();

        assert_eq!(result.meeting_id, Some(q));
        assert_eq!(result.chain_a, vec![a, q]);
        assert_eq!(result.chain_b, vec![b, q]);
    }

    #[test]
    fn test_cycles_terminate() {
        // Triangle A - B - C - A plus an isolated D
        let [a, b, c, d] = ["A", "B", "C", "D"].map(person);
        let (ida, idd) = (a.id, d.id);
        let rels = vec![
            Relationship::new(a.id, b.id, Spouse),
            Relationship::new(b.id, c.id, Spouse),
            Relationship::new(c.id, a.id, Spouse),
        ];
        let snapshot = FamilySnapshot::new(vec![a, b, c, d], rels);
        let result = PathFinder::find_path(&snapshot, ida, idd, 50).unwrap();

        assert!(!result.connection_found);
        assert!(result.stats.nodes_expanded <= 4);
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(10), "10th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(112), "112th");
    }
}
