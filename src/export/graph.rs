use std::collections::HashSet;
use std::fmt::Write;

use crate::export::loader::Hierarchy;
use crate::model::{EntityKind, Id};

/// Nodes are identified by kind and id, so two entities that share a
/// short name stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub kind: EntityKind,
    pub id: Id,
}

impl NodeKey {
    pub fn new(kind: EntityKind, id: &Id) -> Self {
        Self {
            kind,
            id: id.clone(),
        }
    }

    fn dot_id(&self) -> String {
        quote(&format!("{}/{}", self.kind.table(), self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub key: NodeKey,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeKey,
    pub to: NodeKey,
}

#[derive(Debug, Clone, Default)]
pub struct HierarchyGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    seen: HashSet<NodeKey>,
}

fn label(kind: EntityKind, id: &str, name: &str, param_type: Option<&str>) -> String {
    let mut lines = vec![
        kind.label().to_string(),
        format!("ID: {}", id),
        format!("Name: {}", name),
    ];
    if let Some(param_type) = param_type {
        lines.push(format!("Type: {}", param_type));
    }
    lines.join("\n")
}

/// Quote a string for use as a DOT identifier or attribute value.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => {}
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

impl HierarchyGraph {
    /// One node per loaded entity, and an edge from each parent to every
    /// child whose parent id matches. Edges are found by scanning each child
    /// collection once per parent.
    pub fn build(hierarchy: &Hierarchy) -> Self {
        let mut graph = Self::default();

        for kb in &hierarchy.knowledge_bases {
            graph.add_node(
                NodeKey::new(EntityKind::KnowledgeBase, &kb.id),
                label(EntityKind::KnowledgeBase, &kb.id, &kb.short_name, None),
            );
        }
        for rule in &hierarchy.rules {
            graph.add_node(
                NodeKey::new(EntityKind::Rule, &rule.id),
                label(EntityKind::Rule, &rule.id, &rule.short_name, None),
            );
        }
        for pattern in &hierarchy.patterns {
            graph.add_node(
                NodeKey::new(EntityKind::Pattern, &pattern.id),
                label(EntityKind::Pattern, &pattern.id, &pattern.short_name, None),
            );
        }
        for parameter in &hierarchy.parameters {
            graph.add_node(
                NodeKey::new(EntityKind::Parameter, &parameter.id),
                label(
                    EntityKind::Parameter,
                    &parameter.id,
                    &parameter.short_name,
                    Some(&parameter.param_type),
                ),
            );
        }

        for kb in &hierarchy.knowledge_bases {
            for rule in hierarchy.rules.iter().filter(|r| r.kb_id == kb.id) {
                graph.add_edge(
                    NodeKey::new(EntityKind::KnowledgeBase, &kb.id),
                    NodeKey::new(EntityKind::Rule, &rule.id),
                );
            }
        }
        for rule in &hierarchy.rules {
            for pattern in hierarchy.patterns.iter().filter(|p| p.rule_id == rule.id) {
                graph.add_edge(
                    NodeKey::new(EntityKind::Rule, &rule.id),
                    NodeKey::new(EntityKind::Pattern, &pattern.id),
                );
            }
        }
        for pattern in &hierarchy.patterns {
            for parameter in hierarchy.parameters.iter().filter(|p| p.pattern_id == pattern.id) {
                graph.add_edge(
                    NodeKey::new(EntityKind::Pattern, &pattern.id),
                    NodeKey::new(EntityKind::Parameter, &parameter.id),
                );
            }
        }

        graph
    }

    fn add_node(&mut self, key: NodeKey, label: String) {
        if self.seen.insert(key.clone()) {
            self.nodes.push(Node { key, label });
        }
    }

    fn add_edge(&mut self, from: NodeKey, to: NodeKey) {
        let edge = Edge { from, to };
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.key == key)
    }

    /// Graphviz DOT source for the graph.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph knowledge {\n");
        dot.push_str("    node [shape=box];\n");
        for node in &self.nodes {
            // Writing to a String cannot fail
            let _ = writeln!(dot, "    {} [label={}];", node.key.dot_id(), quote(&node.label));
        }
        for edge in &self.edges {
            let _ = writeln!(dot, "    {} -> {};", edge.from.dot_id(), edge.to.dot_id());
        }
        dot.push_str("}\n");
        dot
    }
}
