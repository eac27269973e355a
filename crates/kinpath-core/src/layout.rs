//! Generation/column layout of an ordered relationship path
//!
//! The walk keeps a running generation and a tracked column. Parent and
//! child steps move to another generation and take the first column past
//! anything already used there; spouse steps stay in the row and sit one
//! column to the right. Generations are normalized so the oldest row is 0.

use crate::classify::{classify, EdgeKind};
use crate::path_graph::PathNode;
use crate::person::PersonId;
use crate::relation::RelationshipLabel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Box and gap sizes used to turn rows/columns into pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub node_width: f64,
    pub node_height: f64,
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 90.0,
            horizontal_gap: 40.0,
            vertical_gap: 60.0,
        }
    }
}

/// Row/column slot of one person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationInfo {
    /// 0 is the oldest row
    pub generation: i32,
    pub column: u32,
    pub is_spouse_slot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse_of_id: Option<PersonId>,
}

/// Top-left corner of a node box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Side of a node box a connector attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
}

/// Connector between consecutive path nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub source_id: PersonId,
    pub target_id: PersonId,
    pub source_anchor: Anchor,
    pub target_anchor: Anchor,
    /// What the source is to the target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_label: Option<RelationshipLabel>,
    pub is_spouse_edge: bool,
}

/// Output of [`LayoutEngine::layout`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub positions: HashMap<PersonId, Position>,
    pub generations: HashMap<PersonId, GenerationInfo>,
    pub edges: Vec<LayoutEdge>,
    /// Bounding box of all nodes
    pub width: f64,
    pub height: f64,
}

/// Pure path layout
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    metrics: LayoutMetrics,
}

impl LayoutEngine {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Lay out an ordered path. Identical input yields identical output.
    pub fn layout<'a, I>(&self, path: I) -> LayoutResult
    where
        I: IntoIterator<Item = &'a PathNode>,
    {
        let nodes: Vec<&PathNode> = path.into_iter().collect();
        let Some(first) = nodes.first() else {
            return LayoutResult::default();
        };

        let mut slots: Vec<(PersonId, GenerationInfo)> = Vec::with_capacity(nodes.len());
        let mut last_used: BTreeMap<i32, u32> = BTreeMap::new();
        let mut generation = 0i32;
        let mut column = 0u32;
        let mut step_labels: Vec<Option<RelationshipLabel>> = Vec::with_capacity(nodes.len());

        last_used.insert(generation, column);
        slots.push((first.id(), GenerationInfo::at(generation, column)));

        for pair in nodes.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let label = Self::transition_label(prev, next);
            step_labels.push(label);

            let info = match label.map(classify) {
                Some(kind @ (EdgeKind::Parent | EdgeKind::Child)) => {
                    generation += kind.generation_delta();
                    if let Some(&used) = last_used.get(&generation) {
                        if used >= column {
                            column = used + 1;
                        }
                    }
                    GenerationInfo::at(generation, column)
                }
                Some(EdgeKind::Spouse) => {
                    column += 1;
                    GenerationInfo {
                        is_spouse_slot: true,
                        spouse_of_id: Some(prev.id()),
                        ..GenerationInfo::at(generation, column)
                    }
                }
                None => {
                    tracing::warn!("No relationship label between {} and {}", prev.id(), next.id());
                    column += 1;
                    GenerationInfo::at(generation, column)
                }
            };
            last_used.insert(generation, column);
            slots.push((next.id(), info));
        }

        let min_generation = slots.iter().map(|(_, info)| info.generation).min().unwrap_or(0);
        for (_, info) in &mut slots {
            info.generation -= min_generation;
        }

        let positions: HashMap<PersonId, Position> = slots
            .iter()
            .map(|(id, info)| (*id, self.position_of(info)))
            .collect();

        let edges: Vec<LayoutEdge> = nodes
            .windows(2)
            .zip(&step_labels)
            .map(|(pair, label)| {
                let (source_id, target_id) = (pair[0].id(), pair[1].id());
                let (source_anchor, target_anchor) =
                    resolve_anchors(positions[&source_id], positions[&target_id]);
                LayoutEdge {
                    source_id,
                    target_id,
                    source_anchor,
                    target_anchor,
                    relationship_label: *label,
                    is_spouse_edge: label.map(classify) == Some(EdgeKind::Spouse),
                }
            })
            .collect();

        let (width, height) = positions.values().fold((0.0f64, 0.0f64), |(w, h), pos| {
            (
                w.max(pos.x + self.metrics.node_width),
                h.max(pos.y + self.metrics.node_height),
            )
        });

        LayoutResult {
            positions,
            generations: slots.into_iter().collect(),
            edges,
            width,
            height,
        }
    }

    /// Pixel position of a row/column slot
    pub fn position_of(&self, info: &GenerationInfo) -> Position {
        let m = &self.metrics;
        Position {
            x: f64::from(info.column) * (m.node_width + m.horizontal_gap),
            y: f64::from(info.generation) * (m.node_height + m.vertical_gap),
        }
    }

    /// What `prev` is to `next`, preferring `prev`'s outgoing link
    fn transition_label(prev: &PathNode, next: &PathNode) -> Option<RelationshipLabel> {
        prev.to
            .filter(|link| link.person_id == next.id())
            .or_else(|| next.from.filter(|link| link.person_id == prev.id()))
            .map(|link| link.label)
    }
}

impl GenerationInfo {
    fn at(generation: i32, column: u32) -> Self {
        Self {
            generation,
            column,
            is_spouse_slot: false,
            spouse_of_id: None,
        }
    }
}

/// Lay out a path with default metrics
pub fn layout<'a, I>(path: I) -> LayoutResult
where
    I: IntoIterator<Item = &'a PathNode>,
{
    LayoutEngine::default().layout(path)
}

/// Connector sides for a line from `source` to `target`. y grows downward.
pub fn resolve_anchors(source: Position, target: Position) -> (Anchor, Anchor) {
    let below = target.y > source.y;
    let right = target.x > source.x;

    if target.x == source.x {
        if below {
            (Anchor::Bottom, Anchor::Top)
        } else {
            (Anchor::Top, Anchor::Bottom)
        }
    } else if target.y == source.y {
        if right {
            (Anchor::Right, Anchor::Left)
        } else {
            (Anchor::Left, Anchor::Right)
        }
    } else {
        match (right, below) {
            (_, true) => (Anchor::Bottom, Anchor::Top),
            (true, false) => (Anchor::Top, Anchor::Left),
            (false, false) => (Anchor::Top, Anchor::Right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_graph::PathLink;
    use crate::person::Person;
    use crate::relation::RelationshipLabel::*;

    /// Chain nodes so node i's `to` and node i+1's `from` carry `labels[i]`
    fn chain(labels: &[RelationshipLabel]) -> Vec<PathNode> {
        let mut nodes: Vec<PathNode> = (0..=labels.len())
            .map(|i| PathNode::bare(Person::new(format!("P{}", i), "Row", 1900 + i as i32)))
            .collect();
        for (i, label) in labels.iter().enumerate() {
            let (prev, next) = (nodes[i].id(), nodes[i + 1].id());
            nodes[i].to = Some(PathLink { person_id: next, label: *label });
            nodes[i + 1].from = Some(PathLink { person_id: prev, label: *label });
        }
        nodes
    }

    fn assert_layout_invariants(nodes: &[PathNode], result: &LayoutResult) {
        let mut rows: HashMap<i32, Vec<u32>> = HashMap::new();
        for node in nodes {
            let info = result.generations[&node.id()];
            let pos = result.positions[&node.id()];
            assert!(info.generation >= 0);
            rows.entry(info.generation).or_default().push(info.column);
            for other in nodes {
                let other_info = result.generations[&other.id()];
                if other_info.generation == info.generation {
                    assert_eq!(result.positions[&other.id()].y, pos.y);
                }
            }
        }
        for columns in rows.values() {
            let mut dedup = columns.clone();
            dedup.sort_unstable();
            dedup.dedup();
            assert_eq!(dedup.len(), columns.len(), "column collision in a row");
        }
        for edge in &result.edges {
            let source = result.positions[&edge.source_id];
            let target = result.positions[&edge.target_id];
            match edge.relationship_label.map(classify) {
                Some(EdgeKind::Parent) => assert!(target.y > source.y),
                Some(EdgeKind::Child) => assert!(target.y < source.y),
                Some(EdgeKind::Spouse) => {
                    assert_eq!(target.y, source.y);
                    assert_ne!(target.x, source.x);
                }
                None => {}
            }
        }
    }

    #[test]
    fn test_empty_path() {
        let nodes: Vec<PathNode> = Vec::new();
        let result = layout(&nodes);
        assert!(result.positions.is_empty());
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_single_node() {
        let nodes = chain(&[]);
        let result = layout(&nodes);
        assert_eq!(result.positions[&nodes[0].id()], Position { x: 0.0, y: 0.0 });
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_unlabeled_step_moves_right_in_row() {
        let mut nodes = chain(&[Father]);
        // A link to someone other than the previous node does not count
        let mut stray = PathNode::bare(Person::new("P2", "Row", 1960));
        stray.from = Some(PathLink { person_id: nodes[0].id(), label: Son });
        nodes.push(stray);

        let result = layout(&nodes);
        let info = |i: usize| result.generations[&nodes[i].id()];

        assert_eq!((info(1).generation, info(1).column), (1, 0));
        assert_eq!((info(2).generation, info(2).column), (1, 1));
        assert!(!info(2).is_spouse_slot);

        let edge = &result.edges[1];
        assert_eq!(edge.relationship_label, None);
        assert!(!edge.is_spouse_edge);
        assert_eq!((edge.source_anchor, edge.target_anchor), (Anchor::Right, Anchor::Left));
        assert_layout_invariants(&nodes, &result);
    }

    #[test]
    fn test_half_siblings_through_spouses() {
        // child1 -(Son)-> parent -(Spouse)-> spouse -(Mother)-> child2
        let nodes = chain(&[Son, Spouse, Mother]);
        let result = layout(&nodes);
        let info = |i: usize| result.generations[&nodes[i].id()];

        assert_eq!(info(1).generation, 0);
        assert_eq!(info(2).generation, 0);
        assert_ne!(info(1).column, info(2).column);
        assert_eq!(info(0).generation, 1);
        assert_eq!(info(3).generation, 1);
        assert_ne!(info(0).column, info(3).column);

        assert!(info(2).is_spouse_slot);
        assert_eq!(info(2).spouse_of_id, Some(nodes[1].id()));
        assert!(result.edges[1].is_spouse_edge);
        assert_layout_invariants(&nodes, &result);
    }

    #[test]
    fn test_cousins_path() {
        // A -(Son)-> P1 -(Son)-> G -(Father)-> P2 -(Father)-> B
        let nodes = chain(&[Son, Son, Father, Father]);
        let result = layout(&nodes);
        let info = |i: usize| result.generations[&nodes[i].id()];

        assert_eq!(info(2).generation, 0);
        assert_eq!(info(1).generation, 1);
        assert_eq!(info(3).generation, 1);
        assert_eq!(info(0).generation, 2);
        assert_eq!(info(4).generation, 2);
        assert_layout_invariants(&nodes, &result);
    }

    #[test]
    fn test_pixel_positions() {
        let nodes = chain(&[Son, Spouse]);
        let engine = LayoutEngine::new(LayoutMetrics {
            node_width: 100.0,
            node_height: 50.0,
            horizontal_gap: 20.0,
            vertical_gap: 30.0,
        });
        let result = engine.layout(&nodes);

        assert_eq!(result.positions[&nodes[0].id()], Position { x: 0.0, y: 80.0 });
        assert_eq!(result.positions[&nodes[1].id()], Position { x: 0.0, y: 0.0 });
        assert_eq!(result.positions[&nodes[2].id()], Position { x: 120.0, y: 0.0 });
        assert_eq!(result.width, 220.0);
        assert_eq!(result.height, 130.0);
    }

    #[test]
    fn test_zigzag_keeps_columns_apart() {
        let nodes = chain(&[Son, Father, Son, Father, Spouse, Daughter, Mother]);
        let result = layout(&nodes);
        assert_layout_invariants(&nodes, &result);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let nodes = chain(&[Daughter, Wife, Father, Husband]);
        assert_eq!(layout(&nodes), layout(&nodes));
    }

    #[test]
    fn test_resolve_anchors() {
        let at = |x: f64, y: f64| Position { x, y };
        let origin = at(100.0, 100.0);

        assert_eq!(resolve_anchors(origin, at(100.0, 200.0)), (Anchor::Bottom, Anchor::Top));
        assert_eq!(resolve_anchors(origin, at(100.0, 0.0)), (Anchor::Top, Anchor::Bottom));
        assert_eq!(resolve_anchors(origin, at(200.0, 100.0)), (Anchor::Right, Anchor::Left));
        assert_eq!(resolve_anchors(origin, at(0.0, 100.0)), (Anchor::Left, Anchor::Right));
        assert_eq!(resolve_anchors(origin, at(200.0, 200.0)), (Anchor::Bottom, Anchor::Top));
        assert_eq!(resolve_anchors(origin, at(200.0, 0.0)), (Anchor::Top, Anchor::Left));
        assert_eq!(resolve_anchors(origin, at(0.0, 200.0)), (Anchor::Bottom, Anchor::Top));
        assert_eq!(resolve_anchors(origin, at(0.0, 0.0)), (Anchor::Top, Anchor::Right));
    }
}
