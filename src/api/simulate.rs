use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::AppState;
use crate::domain::inputs::fields;
use crate::domain::{
    InvalidInputError, Round, RoundDisplay, Schedule, SplitParams, Summary, SummaryDisplay,
};
use crate::engine;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub current_price: Option<f64>,
    pub total_capital: Option<f64>,
    pub split_count: Option<f64>,
    pub drop_rate: Option<f64>,
    pub martingale_multiplier: Option<f64>,
}

impl SimulateRequest {
    fn into_params(self) -> Result<SplitParams, InvalidInputError> {
        SplitParams::from_numbers(
            required(fields::CURRENT_PRICE, self.current_price)?,
            required(fields::TOTAL_CAPITAL, self.total_capital)?,
            required(fields::SPLIT_COUNT, self.split_count)?,
            required(fields::DROP_RATE, self.drop_rate)?,
            required(fields::MARTINGALE_MULTIPLIER, self.martingale_multiplier)?,
        )
    }
}

fn required(field: &'static str, value: Option<f64>) -> Result<f64, InvalidInputError> {
    value.ok_or(InvalidInputError::Missing(field))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub equal: ScheduleDto,
    pub martingale: ScheduleDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub rows: Vec<Round>,
    pub summary: Summary,
    pub display: ScheduleDisplayDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDisplayDto {
    pub rows: Vec<RoundDisplay>,
    pub summary: SummaryDisplay,
}

impl From<Schedule> for ScheduleDto {
    fn from(schedule: Schedule) -> Self {
        let display = ScheduleDisplayDto {
            rows: schedule.rows.iter().map(RoundDisplay::from).collect(),
            summary: SummaryDisplay::from(&schedule.summary),
        };
        Self {
            rows: schedule.rows,
            summary: schedule.summary,
            display,
        }
    }
}

/// Stateless engine call: both schedules for the given inputs.
pub async fn simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, AppError> {
    let params = request
        .into_params()?
        .ensure_count_within(state.config.max_split_count)?;

    let schedules = engine::compute(&params);

    Ok(Json(SimulateResponse {
        equal: schedules.equal.into(),
        martingale: schedules.weighted.into(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    pub schedule: Schedule,
    #[serde(default)]
    pub executed_rounds: BTreeSet<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    pub summary: Summary,
    pub display: SummaryDisplay,
}

/// Stateless aggregator call over a caller-supplied schedule.
pub async fn aggregate(
    Json(request): Json<AggregateRequest>,
) -> Result<Json<AggregateResponse>, AppError> {
    if request.schedule.is_empty() {
        return Err(AppError::BadRequest("schedule has no rows".into()));
    }

    let summary = engine::aggregate(&request.schedule, &request.executed_rounds);

    Ok(Json(AggregateResponse {
        display: SummaryDisplay::from(&summary),
        summary,
    }))
}
