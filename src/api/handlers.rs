use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Artwork, GalleryView, SwipeSessionView},
    services::{recommendations, swipe::Decision},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct JudgeRequest {
    pub artwork_id: String,
    pub decision: Decision,
}

#[derive(Debug, Serialize)]
pub struct JudgeResponse {
    #[serde(flatten)]
    pub session: SwipeSessionView,
    /// Set exactly once, on the judgment that finishes the deck
    pub navigate: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    /// Comma-separated liked artwork ids
    pub liked: Option<String>,
    /// Artwork to open in the detail overlay
    pub selected: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RandomArtResponse {
    pub artworks: Vec<Artwork>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Artwork>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Mounts a swipe screen: opens a session and loads its candidates
pub async fn open_swipe(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<(StatusCode, Json<SwipeSessionView>)> {
    let session = state.sessions.open().await;
    let open_sessions = state.sessions.len().await;

    tracing::info!(
        request_id = %request_id,
        session_id = %session.id(),
        open_sessions,
        "Opening swipe session"
    );

    session.load_candidates(state.provider.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(session.view(&state.images).await)))
}

/// Current view of a swipe session
pub async fn get_swipe(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SwipeSessionView>> {
    let session = state.sessions.get(session_id).await?;
    Ok(Json(session.view(&state.images).await))
}

/// Records a like/dislike for the card on top of the deck
pub async fn judge(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<JudgeRequest>,
) -> AppResult<Json<JudgeResponse>> {
    let session = state.sessions.get(session_id).await?;

    let navigation = session
        .judge(request.artwork_id, request.decision, state.settle_delay)
        .await?;

    Ok(Json(JudgeResponse {
        session: session.view(&state.images).await,
        navigate: navigation.map(|navigation| navigation.location()),
    }))
}

/// Unmounts a swipe screen, cancelling any fetch still in flight
pub async fn close_swipe(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.close(session_id).await?;
    tracing::info!(session_id = %session_id, "Swipe session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Results screen: recommendations for every liked artwork, deduplicated
pub async fn gallery(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<GalleryQuery>,
) -> Json<GalleryView> {
    let liked_ids = recommendations::parse_liked(query.liked.as_deref());

    tracing::info!(
        request_id = %request_id,
        liked_count = liked_ids.len(),
        "Processing gallery request"
    );

    let aggregate = recommendations::recommend_for_liked(
        state.provider.clone(),
        &liked_ids,
        state.recommend_concurrency,
    )
    .await;

    Json(aggregate.into_view(query.selected.as_deref(), &state.images))
}

/// Pass-through of the backend's random batch, normalized to `{ artworks }`
pub async fn proxy_random_art(
    State(state): State<AppState>,
) -> AppResult<Json<RandomArtResponse>> {
    let artworks = state.provider.random_artworks().await?.into_artworks();
    Ok(Json(RandomArtResponse { artworks }))
}

/// Pass-through of the backend's recommendations, normalized to `{ recommendations }`
pub async fn proxy_recommend(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
) -> AppResult<Json<RecommendationResponse>> {
    let recommendations = state
        .provider
        .recommendations(&artwork_id)
        .await?
        .into_artworks();
    Ok(Json(RecommendationResponse { recommendations }))
}
