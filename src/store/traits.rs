use crate::error::Result;
use crate::model::{Id, KnowledgeBase, Parameter, ParameterEdit, Pattern, Rule};

#[async_trait::async_trait]
pub trait KnowledgeBaseStore: Send + Sync {
    /// All knowledge bases. Empty when the table is empty.
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>>;
    async fn get_knowledge_base(&self, id: &Id) -> Result<KnowledgeBase>;
    async fn rename_knowledge_base(&self, id: &Id, new_short_name: &str) -> Result<()>;
}

#[async_trait::async_trait]
pub trait RuleStore: Send + Sync {
    async fn list_rules(&self, kb_id: &Id) -> Result<Vec<Rule>>;
    async fn get_rule(&self, id: &Id) -> Result<Rule>;
    async fn rename_rule(&self, id: &Id, new_short_name: &str) -> Result<()>;
}

#[async_trait::async_trait]
pub trait PatternStore: Send + Sync {
    /// The single pattern of a rule: the first one ordered by pattern id.
    async fn get_pattern_by_rule(&self, rule_id: &Id) -> Result<Pattern>;
    /// Every pattern of a rule, ordered by pattern id.
    async fn list_patterns(&self, rule_id: &Id) -> Result<Vec<Pattern>>;
    async fn rename_pattern(&self, id: &Id, new_short_name: &str) -> Result<()>;
}

#[async_trait::async_trait]
pub trait ParameterStore: Send + Sync {
    /// Parameters of a pattern. Fails with `EmptyResult` when there are none.
    async fn list_parameters(&self, pattern_id: &Id) -> Result<Vec<Parameter>>;
    async fn get_parameter(&self, id: &Id) -> Result<Parameter>;
    /// Applies the edits one statement at a time and stops at the first
    /// failure. Edits before the failing one stay committed.
    async fn update_parameters(&self, edits: &[ParameterEdit]) -> Result<()>;
}

pub trait Store: KnowledgeBaseStore + RuleStore + PatternStore + ParameterStore + Send + Sync {}
