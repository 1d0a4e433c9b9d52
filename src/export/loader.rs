use crate::error::{Error, Result};
use crate::model::{KnowledgeBase, Parameter, Pattern, Rule};
use crate::store::traits::Store;

/// The whole hierarchy, flattened into one collection per level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    pub knowledge_bases: Vec<KnowledgeBase>,
    pub rules: Vec<Rule>,
    pub patterns: Vec<Pattern>,
    pub parameters: Vec<Parameter>,
}

/// Walk the hierarchy top-down, one query per parent, and keep every row.
/// The first storage error aborts the walk.
pub async fn load_hierarchy<S: Store + ?Sized>(store: &S) -> Result<Hierarchy> {
    let mut hierarchy = Hierarchy::default();

    for kb in store.list_knowledge_bases().await? {
        for rule in store.list_rules(&kb.id).await? {
            for pattern in store.list_patterns(&rule.id).await? {
                match store.list_parameters(&pattern.id).await {
                    Ok(parameters) => hierarchy.parameters.extend(parameters),
                    // A pattern without parameters is still drawn
                    Err(Error::EmptyResult { .. }) => {}
                    Err(e) => return Err(e),
                }
                hierarchy.patterns.push(pattern);
            }
            hierarchy.rules.push(rule);
        }
        hierarchy.knowledge_bases.push(kb);
    }

    log::info!(
        "loaded {} knowledge bases, {} rules, {} patterns, {} parameters",
        hierarchy.knowledge_bases.len(),
        hierarchy.rules.len(),
        hierarchy.patterns.len(),
        hierarchy.parameters.len()
    );
    Ok(hierarchy)
}
