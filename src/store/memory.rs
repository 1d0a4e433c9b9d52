use itertools::Itertools;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::model::{EntityKind, Id, KnowledgeBase, Parameter, ParameterEdit, Pattern, Rule};
use crate::store::rename::check_rename;
use crate::store::traits::{KnowledgeBaseStore, ParameterStore, PatternStore, RuleStore, Store};

#[derive(Debug, Default)]
struct Tables {
    knowledge_bases: Vec<KnowledgeBase>,
    rules: Vec<Rule>,
    patterns: Vec<Pattern>,
    parameters: Vec<Parameter>,
}

/// Store kept entirely in process memory, with the same per-operation
/// semantics as [`crate::store::PostgresStore`]. Used as a test double.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_knowledge_base(self, knowledge_base: KnowledgeBase) -> Self {
        self.tables.write().knowledge_bases.push(knowledge_base);
        self
    }

    pub fn with_rule(self, rule: Rule) -> Self {
        self.tables.write().rules.push(rule);
        self
    }

    pub fn with_pattern(self, pattern: Pattern) -> Self {
        self.tables.write().patterns.push(pattern);
        self
    }

    pub fn with_parameter(self, parameter: Parameter) -> Self {
        self.tables.write().parameters.push(parameter);
        self
    }
}

fn not_found(kind: EntityKind, id: &Id) -> Error {
    Error::NotFound {
        kind,
        id: id.clone(),
    }
}

#[async_trait::async_trait]
impl KnowledgeBaseStore for InMemoryStore {
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>> {
        Ok(self.tables.read().knowledge_bases.clone())
    }

    async fn get_knowledge_base(&self, id: &Id) -> Result<KnowledgeBase> {
        self.tables
            .read()
            .knowledge_bases
            .iter()
            .find(|kb| &kb.id == id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::KnowledgeBase, id))
    }

    async fn rename_knowledge_base(&self, id: &Id, new_short_name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        check_rename(
            EntityKind::KnowledgeBase,
            tables
                .knowledge_bases
                .iter()
                .filter(|kb| &kb.id != id)
                .map(|kb| kb.short_name.as_str()),
            new_short_name,
        )?;
        if let Some(kb) = tables.knowledge_bases.iter_mut().find(|kb| &kb.id == id) {
            kb.short_name = new_short_name.to_string();
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RuleStore for InMemoryStore {
    async fn list_rules(&self, kb_id: &Id) -> Result<Vec<Rule>> {
        Ok(self
            .tables
            .read()
            .rules
            .iter()
            .filter(|rule| &rule.kb_id == kb_id)
            .cloned()
            .collect())
    }

    async fn get_rule(&self, id: &Id) -> Result<Rule> {
        self.tables
            .read()
            .rules
            .iter()
            .find(|rule| &rule.id == id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Rule, id))
    }

    async fn rename_rule(&self, id: &Id, new_short_name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        check_rename(
            EntityKind::Rule,
            tables
                .rules
                .iter()
                .filter(|rule| &rule.id != id)
                .map(|rule| rule.short_name.as_str()),
            new_short_name,
        )?;
        if let Some(rule) = tables.rules.iter_mut().find(|rule| &rule.id == id) {
            rule.short_name = new_short_name.to_string();
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PatternStore for InMemoryStore {
    async fn get_pattern_by_rule(&self, rule_id: &Id) -> Result<Pattern> {
        self.list_patterns(rule_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Pattern, rule_id))
    }

    async fn list_patterns(&self, rule_id: &Id) -> Result<Vec<Pattern>> {
        Ok(self
            .tables
            .read()
            .patterns
            .iter()
            .filter(|pattern| &pattern.rule_id == rule_id)
            .cloned()
            .sorted_by(|a, b| a.id.cmp(&b.id))
            .collect())
    }

    async fn rename_pattern(&self, id: &Id, new_short_name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        check_rename(
            EntityKind::Pattern,
            tables
                .patterns
                .iter()
                .filter(|pattern| &pattern.id != id)
                .map(|pattern| pattern.short_name.as_str()),
            new_short_name,
        )?;
        if let Some(pattern) = tables.patterns.iter_mut().find(|pattern| &pattern.id == id) {
            pattern.short_name = new_short_name.to_string();
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ParameterStore for InMemoryStore {
    async fn list_parameters(&self, pattern_id: &Id) -> Result<Vec<Parameter>> {
        let parameters: Vec<Parameter> = self
            .tables
            .read()
            .parameters
            .iter()
            .filter(|parameter| &parameter.pattern_id == pattern_id)
            .cloned()
            .collect();

        if parameters.is_empty() {
            return Err(Error::EmptyResult {
                kind: EntityKind::Parameter,
                parent_id: pattern_id.clone(),
            });
        }
        Ok(parameters)
    }

    async fn get_parameter(&self, id: &Id) -> Result<Parameter> {
        self.tables
            .read()
            .parameters
            .iter()
            .find(|parameter| &parameter.id == id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Parameter, id))
    }

    async fn update_parameters(&self, edits: &[ParameterEdit]) -> Result<()> {
        let mut tables = self.tables.write();
        for edit in edits {
            let parameter = tables
                .parameters
                .iter_mut()
                .find(|parameter| parameter.id == edit.id)
                .ok_or_else(|| Error::UpdateFailed {
                    id: edit.id.clone(),
                    reason: "no such parameter".to_string(),
                })?;
            parameter.short_name = edit.new_shortname.clone();
            parameter.param_type = edit.new_type.clone();
        }
        Ok(())
    }
}

impl Store for InMemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> InMemoryStore {
        InMemoryStore::new()
            .with_knowledge_base(KnowledgeBase::new("1", "KB1"))
            .with_knowledge_base(KnowledgeBase::new("2", "KB2"))
            .with_rule(Rule::new("10", "R1", "1"))
            .with_rule(Rule::new("11", "R2", "1"))
            .with_rule(Rule::new("20", "R3", "2"))
            .with_pattern(Pattern::new("101", "P2", "10"))
            .with_pattern(Pattern::new("100", "P1", "10"))
            .with_pattern(Pattern::new("110", "P3", "11"))
            .with_parameter(Parameter::new("1000", "Par1", "int", "100"))
            .with_parameter(Parameter::new("1001", "Par2", "string", "100"))
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = sample_store();
        let kb = store.get_knowledge_base(&"1".to_string()).await.unwrap();
        assert_eq!(kb, KnowledgeBase::new("1", "KB1"));

        let missing = store.get_rule(&"99".to_string()).await;
        assert!(matches!(missing, Err(Error::NotFound { kind: EntityKind::Rule, .. })));
    }

    #[tokio::test]
    async fn test_list_rules_scoped_by_knowledge_base() {
        let store = sample_store();
        let mut ids: Vec<String> = store
            .list_rules(&"1".to_string())
            .await
            .unwrap()
            .into_iter()
            .map(|rule| rule.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["10", "11"]);

        assert!(store.list_rules(&"3".to_string()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pattern_lookup_returns_lowest_id() {
        let store = sample_store();
        let pattern = store.get_pattern_by_rule(&"10".to_string()).await.unwrap();
        assert_eq!(pattern.id, "100");
        assert_eq!(store.list_patterns(&"10".to_string()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_parameters_empty_is_error() {
        let store = sample_store();
        assert_eq!(store.list_parameters(&"100".to_string()).await.unwrap().len(), 2);

        let empty = store.list_parameters(&"101".to_string()).await;
        assert!(matches!(empty, Err(Error::EmptyResult { .. })));
    }

    #[tokio::test]
    async fn test_rename_rules() {
        let store = sample_store();

        let duplicate = store.rename_rule(&"10".to_string(), "R2").await;
        assert!(matches!(duplicate, Err(Error::DuplicateName { .. })));
        assert_eq!(store.get_rule(&"10".to_string()).await.unwrap().short_name, "R1");

        let empty = store.rename_rule(&"10".to_string(), "").await;
        assert!(matches!(empty, Err(Error::EmptyName { .. })));

        // Renaming to its own current name is not a conflict
        store.rename_rule(&"10".to_string(), "R1").await.unwrap();

        store.rename_rule(&"10".to_string(), "R9").await.unwrap();
        assert_eq!(store.get_rule(&"10".to_string()).await.unwrap().short_name, "R9");
    }

    #[tokio::test]
    async fn test_rename_missing_id_changes_nothing() {
        let store = sample_store();
        store
            .rename_knowledge_base(&"404".to_string(), "Fresh")
            .await
            .unwrap();
        store.rename_pattern(&"404".to_string(), "Fresh").await.unwrap();

        let kbs = store.list_knowledge_bases().await.unwrap();
        assert!(kbs.iter().all(|kb| kb.short_name != "Fresh"));
    }

    #[tokio::test]
    async fn test_uniqueness_is_per_entity_kind() {
        let store = sample_store();
        // A knowledge base may share a name with a rule
        store
            .rename_knowledge_base(&"2".to_string(), "R1")
            .await
            .unwrap();
        let duplicate = store.rename_pattern(&"110".to_string(), "P1").await;
        assert!(matches!(duplicate, Err(Error::DuplicateName { kind: EntityKind::Pattern, .. })));
    }

    #[tokio::test]
    async fn test_update_parameters_is_not_atomic() {
        let store = sample_store();
        let edits = vec![
            ParameterEdit::new("1000", "Width", "float"),
            ParameterEdit::new("9999", "Ghost", "int"),
            ParameterEdit::new("1001", "Height", "float"),
        ];

        let result = store.update_parameters(&edits).await;
        assert!(matches!(result, Err(Error::UpdateFailed { ref id, .. }) if id == "9999"));

        let first = store.get_parameter(&"1000".to_string()).await.unwrap();
        assert_eq!(first.short_name, "Width");
        assert_eq!(first.param_type, "float");

        let untouched = store.get_parameter(&"1001".to_string()).await.unwrap();
        assert_eq!(untouched.short_name, "Par2");
    }
}
