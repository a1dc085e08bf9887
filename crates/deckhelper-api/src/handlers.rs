use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use deckhelper_core::{
    Card, ColorIdentity, Collection, CommanderData, PairKind, RankedCommander,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub env: String,
    pub top_n: usize,
    pub sessions: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        env: state.settings.env.clone(),
        top_n: state.settings.ranking.top_n,
        sessions: state.sessions.len(),
    })
}

/// One entry of the submission response, keyed by commander name.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub score: u32,
    pub data: CommanderData,
    pub kind: PairKind,
}

/// Scores every candidate for the submitted collection.
pub async fn submit_collection(
    State(state): State<AppState>,
    Json(collection): Json<Collection>,
) -> ApiResult<Json<BTreeMap<String, ScoredEntry>>> {
    let scored = state.recommender.recommend(&collection).await?;
    let response = scored
        .into_iter()
        .map(|(name, candidate)| {
            (
                name,
                ScoredEntry {
                    score: candidate.score,
                    data: candidate.data,
                    kind: candidate.kind,
                },
            )
        })
        .collect();
    Ok(Json(response))
}

pub async fn recommend(
    State(state): State<AppState>,
    Json(collection): Json<Collection>,
) -> ApiResult<Json<Vec<RankedCommander>>> {
    let ranked = state.recommender.recommend_ranked(&collection).await?;
    Ok(Json(ranked))
}

#[derive(Deserialize)]
pub struct NamedQuery {
    pub fuzzy: String,
}

pub async fn lookup_card(
    State(state): State<AppState>,
    Query(query): Query<NamedQuery>,
) -> ApiResult<Json<Card>> {
    let card = state.recommender.lookup(&query.fuzzy).await?;
    Ok(Json(card))
}

#[derive(Serialize, Deserialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

#[derive(Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub colors: ColorIdentity,
    /// Insertion order.
    pub cards: Vec<Card>,
}

#[derive(Deserialize)]
pub struct AddCardRequest {
    pub name: String,
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let id = Uuid::new_v4();
    state.sessions.insert(id, Collection::new());
    info!("Created session {}", id);
    (StatusCode::CREATED, Json(SessionCreated { id }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let collection = state
        .sessions
        .get(&id)
        .ok_or_else(|| ApiError::session_not_found(id))?;
    Ok(Json(SessionResponse {
        id,
        colors: collection.color_identity(),
        cards: collection.iter().cloned().collect(),
    }))
}

/// Looks the name up and adds the matched card, replacing a same-named one.
pub async fn add_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddCardRequest>,
) -> ApiResult<Json<Card>> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("card name cannot be empty".to_string()));
    }
    if !state.sessions.contains_key(&id) {
        return Err(ApiError::session_not_found(id));
    }

    let card = state.recommender.lookup(&request.name).await?;

    let mut collection = state
        .sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::session_not_found(id))?;
    collection.insert(card.clone());
    info!("Session {}: added {} ({} cards)", id, card.name, collection.len());
    Ok(Json(card))
}

pub async fn remove_card(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> ApiResult<Json<Card>> {
    let mut collection = state
        .sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::session_not_found(id))?;
    let removed = collection
        .remove(&name)
        .ok_or_else(|| ApiError::NotFound(format!("card {:?} in session {}", name, id)))?;
    Ok(Json(removed))
}

pub async fn recommend_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<RankedCommander>>> {
    let collection = state
        .sessions
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| ApiError::session_not_found(id))?;

    let ranked = state.recommender.recommend_ranked(&collection).await?;
    Ok(Json(ranked))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| ApiError::session_not_found(id))?;
    info!("Dropped session {}", id);
    Ok(StatusCode::NO_CONTENT)
}
