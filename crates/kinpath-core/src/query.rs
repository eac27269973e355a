//! Relationship queries: search, path assembly and result shaping

use crate::error::{Error, Result};
use crate::graph::FamilyGraph;
use crate::layout::{LayoutEngine, LayoutResult};
use crate::limits::{validate_search_depth, DEFAULT_MAX_DEPTH};
use crate::path_graph::{PathGraphBuilder, PathNode};
use crate::pathfinder::{PathFinder, SearchStats};
use crate::person::PersonId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relationship query (follows the builder pattern of the other queries)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuery {
    pub person_a: PersonId,

    pub person_b: PersonId,

    /// Hops searched per side
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

impl PathQuery {
    pub fn new(person_a: PersonId, person_b: PersonId) -> Self {
        Self {
            person_a,
            person_b,
            max_depth: default_max_depth(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// How two persons are related
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub connection_found: bool,

    pub message: String,

    pub meeting_person_id: Option<PersonId>,

    /// Every person referenced by the path or a path node's connections
    pub graph: HashMap<PersonId, PathNode>,

    pub path_a_to_meeting: Vec<PersonId>,

    pub path_b_to_meeting: Vec<PersonId>,

    /// Person A to person B with the meeting point once; layout input
    pub ordered_path: Vec<PersonId>,

    pub stats: SearchStats,
}

impl PathResult {
    /// Path nodes in order from A to B
    pub fn ordered_nodes(&self) -> Vec<&PathNode> {
        self.ordered_path
            .iter()
            .filter_map(|id| self.graph.get(id))
            .collect()
    }

    /// Lay out the ordered path
    pub fn layout(&self, engine: &LayoutEngine) -> LayoutResult {
        engine.layout(self.ordered_nodes())
    }
}

/// Runs relationship queries against a family graph
pub struct RelationshipFinder;

impl RelationshipFinder {
    /// Execute a query
    pub fn execute<G: FamilyGraph + ?Sized>(graph: &G, query: &PathQuery) -> Result<PathResult> {
        validate_search_depth(query.max_depth)?;

        tracing::debug!(
            "Executing relationship query: a={}, b={}, max_depth={}",
            query.person_a,
            query.person_b,
            query.max_depth
        );

        let search = PathFinder::find_path(graph, query.person_a, query.person_b, query.max_depth)?;

        let meeting = match search.meeting_id {
            Some(meeting) if search.connection_found && query.person_a != query.person_b => meeting,
            _ => {
                let graph = Self::endpoint_nodes(graph, &[query.person_a, query.person_b])?;
                let ordered_path = if search.connection_found {
                    vec![query.person_a]
                } else {
                    Vec::new()
                };
                return Ok(PathResult {
                    connection_found: search.connection_found,
                    message: search.message,
                    meeting_person_id: search.meeting_id,
                    graph,
                    path_a_to_meeting: search.chain_a,
                    path_b_to_meeting: search.chain_b,
                    ordered_path,
                    stats: search.stats,
                });
            }
        };

        let path = PathGraphBuilder::build_path(
            graph,
            query.person_a,
            query.person_b,
            meeting,
            &search.chain_a,
            &search.chain_b,
        )?;

        Ok(PathResult {
            connection_found: true,
            message: search.message,
            meeting_person_id: Some(meeting),
            graph: path.nodes,
            path_a_to_meeting: search.chain_a,
            path_b_to_meeting: search.chain_b,
            ordered_path: path.ordered_ids,
            stats: search.stats,
        })
    }

    /// Bare nodes for the query endpoints (used when there is no chain to enrich)
    fn endpoint_nodes<G: FamilyGraph + ?Sized>(
        graph: &G,
        ids: &[PersonId],
    ) -> Result<HashMap<PersonId, PathNode>> {
        let mut nodes = HashMap::new();
        for id in ids {
            let person = graph
                .get_person(id)?
                .ok_or_else(|| Error::PersonNotFound(id.to_string()))?;
            nodes.insert(*id, PathNode::bare(person));
        }
        Ok(nodes)
    }
}

/// Find how `person_a` and `person_b` are related within `max_depth` hops per side
pub fn find_relationship<G: FamilyGraph + ?Sized>(
    graph: &G,
    person_a: PersonId,
    person_b: PersonId,
    max_depth: u32,
) -> Result<PathResult> {
    RelationshipFinder::execute(graph, &PathQuery::new(person_a, person_b).with_max_depth(max_depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FamilySnapshot;
    use crate::layout::layout;
    use crate::person::{Gender, Person};
    use crate::relation::{Relationship, RelationshipLabel::*};

    fn family() -> (FamilySnapshot, Vec<PersonId>) {
        // grandpa -> dad, grandpa -> uncle, dad -> me, uncle -> cousin
        let people: Vec<Person> = ["Grandpa", "Dad", "Uncle", "Me", "Cousin", "Stranger"]
            .iter()
            .enumerate()
            .map(|(i, name)| Person::new(*name, "Diaz", 1930 + 20 * i as i32).with_gender(Gender::Male))
            .collect();
        let ids: Vec<PersonId> = people.iter().map(|p| p.id).collect();
        let rels = vec![
            Relationship::new(ids[0], ids[1], Father),
            Relationship::new(ids[0], ids[2], Father),
            Relationship::new(ids[1], ids[3], Father),
            Relationship::new(ids[2], ids[4], Father),
        ];
        (FamilySnapshot::new(people, rels), ids)
    }

    #[test]
    fn test_cousins_meet_at_grandpa() {
        let (snapshot, ids) = family();
        let result = find_relationship(&snapshot, ids[3], ids[4], DEFAULT_MAX_DEPTH).unwrap();

        assert!(result.connection_found);
        assert_eq!(result.meeting_person_id, Some(ids[0]));
        assert_eq!(result.path_a_to_meeting, vec![ids[3], ids[1], ids[0]]);
        assert_eq!(result.path_b_to_meeting, vec![ids[4], ids[2], ids[0]]);
        assert_eq!(result.ordered_path, vec![ids[3], ids[1], ids[0], ids[2], ids[4]]);

        for id in result.path_a_to_meeting.iter().chain(&result.path_b_to_meeting) {
            assert!(result.graph.contains_key(id));
        }
        for node in result.ordered_nodes() {
            for conn in node.connections() {
                assert!(result.graph.contains_key(&conn.person_id));
            }
        }
    }

    #[test]
    fn test_layout_of_cousins() {
        let (snapshot, ids) = family();
        let result = find_relationship(&snapshot, ids[3], ids[4], DEFAULT_MAX_DEPTH).unwrap();
        let laid_out = layout(result.ordered_nodes());

        let generation = |id: &PersonId| laid_out.generations[id].generation;
        assert_eq!(generation(&ids[0]), 0);
        assert_eq!(generation(&ids[1]), 1);
        assert_eq!(generation(&ids[2]), 1);
        assert_eq!(generation(&ids[3]), 2);
        assert_eq!(generation(&ids[4]), 2);
        assert_eq!(laid_out.edges.len(), 4);
        assert_eq!(result.layout(&LayoutEngine::default()), laid_out);
    }

    #[test]
    fn test_same_person_has_single_node() {
        let (snapshot, ids) = family();
        let result = find_relationship(&snapshot, ids[1], ids[1], 3).unwrap();

        assert!(result.connection_found);
        assert_eq!(result.graph.len(), 1);
        assert_eq!(result.path_a_to_meeting, vec![ids[1]]);
        assert_eq!(result.path_b_to_meeting, vec![ids[1]]);
        assert_eq!(result.ordered_path, vec![ids[1]]);
    }

    #[test]
    fn test_unreachable_has_two_endpoint_nodes() {
        let (snapshot, ids) = family();
        let result = find_relationship(&snapshot, ids[3], ids[5], 7).unwrap();

        assert!(!result.connection_found);
        assert_eq!(result.graph.len(), 2);
        assert!(result.graph.contains_key(&ids[3]));
        assert!(result.graph.contains_key(&ids[5]));
        assert!(result.message.contains('7'));
        assert!(result.ordered_path.is_empty());
    }

    #[test]
    fn test_depth_limit_is_enforced() {
        let (snapshot, ids) = family();
        let err = find_relationship(&snapshot, ids[3], ids[4], 51).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_result_serializes() {
        let (snapshot, ids) = family();
        let result = find_relationship(&snapshot, ids[3], ids[1], 2).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["connection_found"], true);
        let back: PathResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
