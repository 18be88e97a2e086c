use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{
    InputForm, Policy, Round, RoundDisplay, SelectionScope, Summary, SummaryDisplay,
};
use crate::error::AppError;
use crate::session::{InputPatch, SaveOutcome, SessionView};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub item_name: String,
    pub inputs: InputForm,
    pub active_tab: Policy,
    pub selection_scope: SelectionScope,
    pub executed_rounds: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<RowDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDto {
    pub executed: bool,
    #[serde(flatten)]
    pub values: Round,
    pub display: RoundDisplay,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    #[serde(flatten)]
    pub values: Summary,
    pub display: SummaryDisplay,
}

impl From<SessionView> for SessionResponse {
    fn from(view: SessionView) -> Self {
        let rows = view.schedule.map(|schedule| {
            schedule
                .rows
                .iter()
                .map(|row| RowDto {
                    executed: view.executed_rounds.contains(&row.round),
                    values: *row,
                    display: RoundDisplay::from(row),
                })
                .collect()
        });
        let summary = view.summary.map(|summary| SummaryDto {
            display: SummaryDisplay::from(&summary),
            values: summary,
        });

        Self {
            item_name: view.item_name,
            inputs: view.inputs,
            active_tab: view.active_tab,
            selection_scope: view.selection_scope,
            executed_rounds: view.executed_rounds,
            rows,
            summary,
        }
    }
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    Json(session.view().into())
}

pub async fn update_inputs(
    State(state): State<AppState>,
    Json(patch): Json<InputPatch>,
) -> Json<SessionResponse> {
    let mut session = state.session.lock().await;
    session.update_inputs(patch).await;
    Json(session.view().into())
}

pub async fn calculate(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut session = state.session.lock().await;
    session.calculate().await?;
    Ok(Json(session.view().into()))
}

pub async fn toggle_round(
    Path(round): Path<u32>,
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut session = state.session.lock().await;
    session.toggle_round(round).await?;
    Ok(Json(session.view().into()))
}

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: Policy,
}

pub async fn switch_tab(
    State(state): State<AppState>,
    Json(request): Json<TabRequest>,
) -> Json<SessionResponse> {
    let mut session = state.session.lock().await;
    session.switch_tab(request.tab).await;
    Json(session.view().into())
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub outcome: SaveOutcome,
}

pub async fn save(State(state): State<AppState>) -> Json<SaveResponse> {
    let session = state.session.lock().await;
    Json(SaveResponse {
        outcome: session.save(),
    })
}

pub async fn reset(State(state): State<AppState>) -> Json<SessionResponse> {
    let mut session = state.session.lock().await;
    session.reset().await;
    Json(session.view().into())
}
