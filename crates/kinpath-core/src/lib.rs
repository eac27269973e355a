//! Kinpath Core - Relationship path finding for family graphs
//!
//! This crate classifies family relationships, finds the nearest common
//! connection between two persons with a bidirectional search, assembles
//! the discovered chain into an enriched path and lays it out in
//! generation rows for rendering.

pub mod classify;
pub mod error;
pub mod graph;
pub mod layout;
pub mod limits;
pub mod path_graph;
pub mod pathfinder;
pub mod person;
pub mod query;
pub mod relation;

pub use classify::{classify, generation_delta, implied_reciprocal, inverse, inverse_of, EdgeKind};
pub use error::{Error, Result};
pub use graph::{FamilyGraph, FamilySnapshot, PersonReader, RelationshipReader};
pub use layout::{
    layout, resolve_anchors, Anchor, GenerationInfo, LayoutEdge, LayoutEngine, LayoutMetrics,
    LayoutResult, Position,
};
pub use path_graph::{PathGraph, PathGraphBuilder, PathLink, PathNode};
pub use pathfinder::{PathFinder, PathSearch, SearchStats};
pub use person::{Gender, Person, PersonId};
pub use query::{find_relationship, PathQuery, PathResult, RelationshipFinder};
pub use relation::{Connection, Relationship, RelationshipId, RelationshipLabel};
