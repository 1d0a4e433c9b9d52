use serde::{Deserialize, Serialize};
use std::fmt;

pub type Id = String;

/// The four levels of the hierarchy, root first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    KnowledgeBase,
    Rule,
    Pattern,
    Parameter,
}

impl EntityKind {
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::KnowledgeBase => "knowledgebase",
            EntityKind::Rule => "rule",
            EntityKind::Pattern => "pattern",
            EntityKind::Parameter => "parameter",
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            EntityKind::KnowledgeBase => "idkb",
            EntityKind::Rule => "idr",
            EntityKind::Pattern => "idpat",
            EntityKind::Parameter => "idpar",
        }
    }

    /// Heading used on graph node labels.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::KnowledgeBase => "KNOWLEDGEBASE",
            EntityKind::Rule => "RULE",
            EntityKind::Pattern => "PATTERN",
            EntityKind::Parameter => "PARAMETER",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::KnowledgeBase => "knowledge base",
            EntityKind::Rule => "rule",
            EntityKind::Pattern => "pattern",
            EntityKind::Parameter => "parameter",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: Id,
    pub short_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: Id,
    pub short_name: String,
    pub kb_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: Id,
    pub short_name: String,
    pub rule_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: Id,
    pub short_name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub pattern_id: Id,
}

impl KnowledgeBase {
    pub fn new(id: impl Into<Id>, short_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
        }
    }
}

impl Rule {
    pub fn new(id: impl Into<Id>, short_name: impl Into<String>, kb_id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            kb_id: kb_id.into(),
        }
    }
}

impl Pattern {
    pub fn new(id: impl Into<Id>, short_name: impl Into<String>, rule_id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            rule_id: rule_id.into(),
        }
    }
}

impl Parameter {
    pub fn new(
        id: impl Into<Id>,
        short_name: impl Into<String>,
        param_type: impl Into<String>,
        pattern_id: impl Into<Id>,
    ) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            param_type: param_type.into(),
            pattern_id: pattern_id.into(),
        }
    }
}
