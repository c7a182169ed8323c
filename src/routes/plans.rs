// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly workout and nutrition plan routes.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ExerciseInput, FoodItem, Member, NutritionPlan, Role, WorkoutPlan};
use crate::services::access;
use crate::services::planner::validate_entries;
use crate::time_utils::{parse_weekday, today_local, WeekWindow};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::{Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default history range when the query gives no `from`.
const DEFAULT_HISTORY_WEEKS: i64 = 12;

/// Plan routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/members/{member_id}/plans/workout",
            get(get_workout_history),
        )
        .route(
            "/api/members/{member_id}/plans/workout/current",
            get(get_current_workout),
        )
        .route(
            "/api/members/{member_id}/plans/workout/{weekday}",
            put(put_workout_day),
        )
        .route(
            "/api/members/{member_id}/plans/nutrition",
            get(get_nutrition_history),
        )
        .route(
            "/api/members/{member_id}/plans/nutrition/current",
            get(get_current_nutrition),
        )
        .route(
            "/api/members/{member_id}/plans/nutrition/{weekday}",
            put(put_nutrition_day),
        )
}

// ─── Access Helpers ──────────────────────────────────────────

async fn load_member(state: &AppState, member_id: &str) -> Result<Member> {
    state
        .db
        .get_member(member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))
}

/// Load a member the caller is allowed to view.
async fn load_viewable_member(state: &AppState, user: &AuthUser, member_id: &str) -> Result<Member> {
    let member = load_member(state, member_id).await?;
    access::ensure_can_view(user, &member)?;
    Ok(member)
}

/// Check the caller may edit the member's plans.
async fn authorize_plan_write(state: &AppState, user: &AuthUser, member_id: &str) -> Result<()> {
    let member = load_member(state, member_id).await?;
    let caller_profile = if user.role == Role::Trainer {
        state.db.get_member(&user.member_id).await?
    } else {
        None
    };
    access::ensure_can_write_plans(user, caller_profile.as_ref(), &member)
}

fn parse_day(raw: &str) -> Result<Weekday> {
    parse_weekday(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid weekday: {}", raw)))
}

// ─── Current Week ────────────────────────────────────────────

/// Current week's plan, or an empty plan for the week if none is saved.
#[derive(Serialize)]
pub struct CurrentPlanResponse<P> {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// False when nothing has been saved for this week yet
    pub saved: bool,
    pub plan: P,
}

async fn get_current_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(member_id): Path<String>,
) -> Result<Json<CurrentPlanResponse<WorkoutPlan>>> {
    let member = load_viewable_member(&state, &user, &member_id).await?;
    let window = WeekWindow::current();

    let stored = state
        .planner
        .current_workout_plan(&member, window.start)
        .await?;
    let saved = stored.is_some();
    let plan = stored.unwrap_or_else(|| WorkoutPlan::new(&member.id, window, &member.updated_at));

    Ok(Json(CurrentPlanResponse {
        week_start: window.start,
        week_end: window.end,
        saved,
        plan,
    }))
}

async fn get_current_nutrition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(member_id): Path<String>,
) -> Result<Json<CurrentPlanResponse<NutritionPlan>>> {
    let member = load_viewable_member(&state, &user, &member_id).await?;
    let window = WeekWindow::current();

    let stored = state
        .planner
        .current_nutrition_plan(&member, window.start)
        .await?;
    let saved = stored.is_some();
    let plan =
        stored.unwrap_or_else(|| NutritionPlan::new(&member.id, window, &member.updated_at));

    Ok(Json(CurrentPlanResponse {
        week_start: window.start,
        week_end: window.end,
        saved,
        plan,
    }))
}

// ─── Day Saves ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SaveWorkoutDayRequest {
    pub exercises: Vec<ExerciseInput>,
}

#[derive(Deserialize)]
pub struct SaveNutritionDayRequest {
    pub foods: Vec<FoodItem>,
}

/// Replace one weekday of the member's current workout week.
async fn put_workout_day(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((member_id, weekday)): Path<(String, String)>,
    WithRejection(Json(body), _): WithRejection<Json<SaveWorkoutDayRequest>, AppError>,
) -> Result<Json<WorkoutPlan>> {
    let day = parse_day(&weekday)?;
    access::ensure_may_write_plans(&user)?;
    validate_entries(&body.exercises)?;

    authorize_plan_write(&state, &user, &member_id).await?;

    tracing::info!(
        member_id = %member_id,
        editor = %user.member_id,
        day = %day,
        "Workout day update"
    );

    let plan = state
        .planner
        .save_workout_day(&member_id, day, body.exercises, today_local())
        .await?;

    Ok(Json(plan))
}

/// Replace one weekday of the member's current nutrition week.
async fn put_nutrition_day(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((member_id, weekday)): Path<(String, String)>,
    WithRejection(Json(body), _): WithRejection<Json<SaveNutritionDayRequest>, AppError>,
) -> Result<Json<NutritionPlan>> {
    let day = parse_day(&weekday)?;
    access::ensure_may_write_plans(&user)?;
    validate_entries(&body.foods)?;

    authorize_plan_write(&state, &user, &member_id).await?;

    tracing::info!(
        member_id = %member_id,
        editor = %user.member_id,
        day = %day,
        "Nutrition day update"
    );

    let plan = state
        .planner
        .save_nutrition_day(&member_id, day, body.foods, today_local())
        .await?;

    Ok(Json(plan))
}

// ─── History ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct HistoryQuery {
    /// First week start to include (YYYY-MM-DD)
    from: Option<NaiveDate>,
    /// Exclusive upper bound on week start (YYYY-MM-DD)
    to: Option<NaiveDate>,
}

/// Resolve the history range, defaulting to the last few weeks.
fn history_range(query: &HistoryQuery, current: WeekWindow) -> (NaiveDate, NaiveDate) {
    let to = query.to.unwrap_or(current.end);
    let from = query
        .from
        .unwrap_or_else(|| to - Duration::weeks(DEFAULT_HISTORY_WEEKS));
    (from, to)
}

async fn get_workout_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(member_id): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, AppError>,
) -> Result<Json<Vec<WorkoutPlan>>> {
    let (from, to) = history_range(&query, WeekWindow::current());
    let member = load_viewable_member(&state, &user, &member_id).await?;

    let plans = state.planner.workout_history(&member.id, from, to).await?;
    Ok(Json(plans))
}

async fn get_nutrition_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(member_id): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, AppError>,
) -> Result<Json<Vec<NutritionPlan>>> {
    let (from, to) = history_range(&query, WeekWindow::current());
    let member = load_viewable_member(&state, &user, &member_id).await?;

    let plans = state.planner.nutrition_history(&member.id, from, to).await?;
    Ok(Json(plans))
}
