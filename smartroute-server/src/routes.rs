use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use geo::Point;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use smartroute_core::{
    GraphStats,
    algo::snapping::{ConnectedSnap, SnapResult},
    loading::load_road_graph,
    routing::{
        ShortestPath, StopSequence,
        itinerary::{Direction, RouteOptions, TravelTime},
        sequencer::SequenceStatus,
        weights::TrafficLevel,
    },
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();
    let concurrency = state.config.concurrency_limit;

    Router::new()
        .route("/health", get(health))
        .route("/graph/stats", get(graph_stats))
        .route("/graph/reload", post(reload_graph))
        .route("/route/shortest", post(route_shortest))
        .route("/route/sequence", post(route_sequence))
        .route("/route/plan", post(route_plan))
        .route("/snap", post(snap))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(timeout)
                .concurrency_limit(concurrency),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Internal("Request timed out".to_string())
    } else {
        ApiError::Internal(format!("Unhandled internal error: {err}"))
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn graph_stats(State(state): State<AppState>) -> Json<GraphStats> {
    Json(state.service.read().await.stats())
}

async fn reload_graph(State(state): State<AppState>) -> Result<Json<GraphStats>, ApiError> {
    let config = state.config.graph.clone();
    let graph = tokio::task::spawn_blocking(move || load_road_graph(&config)).await??;
    let stats = graph.stats();

    state.service.write().await.reload(graph);
    tracing::info!(nodes = stats.nodes, edges = stats.edges, "Road graph reloaded");
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct ShortestRequest {
    source: String,
    target: String,
    #[serde(default)]
    traffic: TrafficLevel,
}

async fn route_shortest(
    State(state): State<AppState>,
    Json(req): Json<ShortestRequest>,
) -> Result<Json<ShortestPath>, ApiError> {
    let service = state.service.read().await;
    for id in [&req.source, &req.target] {
        if !service.graph().contains(id) {
            return Err(ApiError::NotFound(format!("Unknown node: {id}")));
        }
    }

    service
        .shortest_path(&req.source, &req.target, &req.traffic)
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("No path from {} to {}", req.source, req.target))
        })
}

#[derive(Debug, Deserialize)]
struct SequenceRequest {
    stops: Vec<String>,
    #[serde(default)]
    traffic: TrafficLevel,
}

async fn route_sequence(
    State(state): State<AppState>,
    Json(req): Json<SequenceRequest>,
) -> Result<Json<StopSequence>, ApiError> {
    check_stop_count(&state, req.stops.len())?;

    let service = state.service.clone().read_owned().await;
    let sequence =
        tokio::task::spawn_blocking(move || service.sequence(&req.stops, &req.traffic)).await?;
    Ok(Json(sequence))
}

#[derive(Debug, Deserialize)]
struct PlanRequest {
    stops: Vec<String>,
    #[serde(flatten)]
    options: RouteOptions,
}

#[derive(Debug, Serialize)]
struct LegSummary {
    from: String,
    to: String,
    path: Vec<String>,
    distance: f64,
}

#[derive(Debug, Serialize)]
struct PlanResponse {
    stops: Vec<String>,
    sequence_status: SequenceStatus,
    traffic: TrafficLevel,
    total_distance: f64,
    road_length: f64,
    travel_times: Vec<TravelTime>,
    directions: Vec<Direction>,
    legs: Vec<LegSummary>,
    geometry: FeatureCollection,
}

async fn route_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    check_stop_count(&state, req.stops.len())?;

    let service = state.service.clone().read_owned().await;
    let plan = tokio::task::spawn_blocking(move || service.plan(&req.stops, &req.options)).await??;

    let response = PlanResponse {
        geometry: plan.to_geojson()?,
        road_length: plan.road_length(),
        travel_times: plan.travel_times(),
        directions: plan.directions(),
        legs: plan
            .legs
            .iter()
            .map(|leg| LegSummary {
                from: leg.from.clone(),
                to: leg.to.clone(),
                path: leg.path.clone(),
                distance: leg.distance,
            })
            .collect(),
        stops: plan.stops,
        sequence_status: plan.sequence_status,
        traffic: plan.traffic,
        total_distance: plan.total_distance,
    };
    Ok(Json(response))
}

fn check_stop_count(state: &AppState, count: usize) -> Result<(), ApiError> {
    let max = state.config.max_stops;
    if count > max {
        return Err(ApiError::BadRequest(format!(
            "Too many stops: {count} (at most {max})"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SnapRequest {
    lat: f64,
    lon: f64,
    /// Only snap to nodes with outgoing edges
    #[serde(default)]
    connected: bool,
}

#[derive(Debug, Serialize)]
struct SnapResponse {
    kind: &'static str,
    lat: f64,
    lon: f64,
    distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<bool>,
}

impl SnapResponse {
    fn at(kind: &'static str, point: Point<f64>, distance: f64) -> Self {
        Self {
            kind,
            lat: point.y(),
            lon: point.x(),
            distance,
            id: None,
            source: None,
            target: None,
            radius: None,
            fallback: None,
        }
    }
}

impl From<SnapResult> for SnapResponse {
    fn from(snap: SnapResult) -> Self {
        match snap {
            SnapResult::Node {
                id,
                point,
                distance,
            } => Self {
                id: Some(id),
                ..Self::at("node", point, distance)
            },
            SnapResult::Projected {
                point,
                distance,
                source,
                target,
            } => Self {
                source: Some(source),
                target: Some(target),
                ..Self::at("projected", point, distance)
            },
        }
    }
}

impl From<ConnectedSnap> for SnapResponse {
    fn from(snap: ConnectedSnap) -> Self {
        Self {
            id: Some(snap.id),
            radius: snap.radius,
            fallback: Some(snap.fallback),
            ..Self::at("node", snap.point, snap.distance)
        }
    }
}

async fn snap(
    State(state): State<AppState>,
    Json(req): Json<SnapRequest>,
) -> Result<Json<SnapResponse>, ApiError> {
    if !(req.lat.is_finite() && (-90.0..=90.0).contains(&req.lat)) {
        return Err(ApiError::BadRequest(format!("Invalid latitude: {}", req.lat)));
    }
    if !(req.lon.is_finite() && (-180.0..=180.0).contains(&req.lon)) {
        return Err(ApiError::BadRequest(format!("Invalid longitude: {}", req.lon)));
    }

    let service = state.service.read().await;
    let response = if req.connected {
        SnapResponse::from(service.snap_connected(req.lat, req.lon)?)
    } else {
        SnapResponse::from(service.snap(req.lat, req.lon)?)
    };

    Ok(Json(response))
}
