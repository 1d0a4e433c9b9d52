use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::model::{Id, KnowledgeBase, Parameter, ParameterEdit, Pattern, RenameRequest, Rule};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

/// Empty lists are reported as 204, same as a missing row.
fn non_empty<T>(items: Vec<T>, what: &str) -> Result<Json<Vec<T>>, ApiError> {
    if items.is_empty() {
        return Err(ApiError::NoContent(format!("no {} found", what)));
    }
    Ok(Json(items))
}

fn rename_body(body: Result<Json<RenameRequest>, JsonRejection>) -> Result<RenameRequest, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    request.validate().map_err(ApiError::BadRequest)?;
    Ok(request)
}

pub async fn list_knowledge_bases<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<KnowledgeBase>>, ApiError> {
    let knowledge_bases = store
        .list_knowledge_bases()
        .await
        .map_err(ApiError::no_content)?;
    non_empty(knowledge_bases, "knowledge bases")
}

pub async fn get_knowledge_base<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> Result<Json<KnowledgeBase>, ApiError> {
    store
        .get_knowledge_base(&id)
        .await
        .map(Json)
        .map_err(ApiError::no_content)
}

pub async fn list_rules<S: Store>(
    State(store): State<AppState<S>>,
    Path(kb_id): Path<Id>,
) -> Result<Json<Vec<Rule>>, ApiError> {
    let rules = store.list_rules(&kb_id).await.map_err(ApiError::no_content)?;
    non_empty(rules, "rules")
}

pub async fn get_rule<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> Result<Json<Rule>, ApiError> {
    store
        .get_rule(&id)
        .await
        .map(Json)
        .map_err(ApiError::no_content)
}

/// Looks up the pattern of a rule; the path segment is the rule id.
pub async fn get_pattern_by_rule<S: Store>(
    State(store): State<AppState<S>>,
    Path(rule_id): Path<Id>,
) -> Result<Json<Pattern>, ApiError> {
    store
        .get_pattern_by_rule(&rule_id)
        .await
        .map(Json)
        .map_err(ApiError::no_content)
}

pub async fn list_parameters<S: Store>(
    State(store): State<AppState<S>>,
    Path(pattern_id): Path<Id>,
) -> Result<Json<Vec<Parameter>>, ApiError> {
    let parameters = store
        .list_parameters(&pattern_id)
        .await
        .map_err(ApiError::no_content)?;
    non_empty(parameters, "parameters")
}

pub async fn get_parameter<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> Result<Json<Parameter>, ApiError> {
    store
        .get_parameter(&id)
        .await
        .map(Json)
        .map_err(ApiError::no_content)
}

pub async fn rename_knowledge_base<S: Store>(
    State(store): State<AppState<S>>,
    body: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let request = rename_body(body)?;
    store
        .rename_knowledge_base(&request.id, &request.new_shortname)
        .await
        .map_err(ApiError::bad_request)?;
    log::info!("renamed knowledge base {} to {:?}", request.id, request.new_shortname);
    Ok(StatusCode::OK)
}

pub async fn rename_rule<S: Store>(
    State(store): State<AppState<S>>,
    body: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let request = rename_body(body)?;
    store
        .rename_rule(&request.id, &request.new_shortname)
        .await
        .map_err(ApiError::bad_request)?;
    log::info!("renamed rule {} to {:?}", request.id, request.new_shortname);
    Ok(StatusCode::OK)
}

pub async fn rename_pattern<S: Store>(
    State(store): State<AppState<S>>,
    body: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let request = rename_body(body)?;
    store
        .rename_pattern(&request.id, &request.new_shortname)
        .await
        .map_err(ApiError::bad_request)?;
    log::info!("renamed pattern {} to {:?}", request.id, request.new_shortname);
    Ok(StatusCode::OK)
}

pub async fn update_parameters<S: Store>(
    State(store): State<AppState<S>>,
    body: Result<Json<Vec<ParameterEdit>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(edits) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    store
        .update_parameters(&edits)
        .await
        .map_err(ApiError::bad_request)?;
    log::info!("updated {} parameters", edits.len());
    Ok(StatusCode::OK)
}
