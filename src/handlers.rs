use crate::csv::{parse_entries, serialize_entries};
use crate::errors::AppError;
use crate::models::{
    Entry, GoalRequest, ImportResponse, NewEntryRequest, SummaryResponse, TrackerData,
    WeightRequest,
};
use crate::state::AppState;
use crate::stats::{build_cumulative_series, build_daily_report, targets_for_weight, total_for_date};
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_index(&summarize(&data)))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let data = state.data.lock().await;
    Json(summarize(&data))
}

pub async fn list_entries(State(state): State<AppState>) -> Json<Vec<Entry>> {
    let data = state.data.lock().await;
    Json(data.entries.clone())
}

pub async fn add_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewEntryRequest>,
) -> Result<Json<Entry>, AppError> {
    if payload.calories < 0 {
        return Err(AppError::bad_request("calories must be zero or greater"));
    }

    let timestamp = payload
        .timestamp
        .unwrap_or_else(|| Utc::now().timestamp_millis());
    let entry = Entry::new(&payload.name, payload.calories, timestamp);

    let mut data = state.data.lock().await;
    data.insert(entry.clone());
    persist_data(&state.data_path, &data).await;

    Ok(Json(entry))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, AppError> {
    let mut data = state.data.lock().await;
    let before = data.entries.len();
    data.entries.retain(|entry| entry.id != id);
    if data.entries.len() == before {
        return Err(AppError::not_found("no entry with that id"));
    }
    persist_data(&state.data_path, &data).await;

    Ok(Json(summarize(&data)))
}

pub async fn set_weight(
    State(state): State<AppState>,
    Json(payload): Json<WeightRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    if !payload.weight.is_finite() || payload.weight <= 0.0 {
        return Err(AppError::bad_request("weight must be a positive number"));
    }

    let mut data = state.data.lock().await;
    data.weight = payload.weight;
    persist_data(&state.data_path, &data).await;

    Ok(Json(summarize(&data)))
}

pub async fn set_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Json<SummaryResponse> {
    let mut data = state.data.lock().await;
    data.goal = payload.goal;
    persist_data(&state.data_path, &data).await;

    Json(summarize(&data))
}

pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.data.lock().await;
    let targets = targets_for_weight(data.weight);
    Json(build_daily_report(&data.entries, &targets))
}

pub async fn get_chart(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.data.lock().await;
    let targets = targets_for_weight(data.weight);
    Json(build_cumulative_series(&data.entries, &targets))
}

pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.data.lock().await;
    let body = serialize_entries(&data.entries);
    let filename = format!("calorie_log_{}.csv", Utc::now().date_naive());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

/// Full replace: the current list is only touched once the whole file has
/// parsed, so a bad import never corrupts existing entries.
pub async fn import_csv(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let entries = parse_entries(&body)?;
    let imported = entries.len();

    let mut data = state.data.lock().await;
    data.entries = entries;
    persist_data(&state.data_path, &data).await;

    info!("imported {imported} entries");
    Ok(Json(ImportResponse { imported }))
}

fn summarize(data: &TrackerData) -> SummaryResponse {
    let date = Utc::now().date_naive().to_string();
    let total_today = total_for_date(&data.entries, &date);
    let targets = targets_for_weight(data.weight);
    let goal_target = targets.for_goal(data.goal);

    SummaryResponse {
        date,
        total_today,
        weight: data.weight,
        goal: data.goal,
        goal_target,
        remaining: goal_target - total_today,
        targets,
    }
}
