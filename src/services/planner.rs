// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly planner service.
//!
//! Handles the trainer workflow:
//! 1. Compute the Monday-aligned week for "today"
//! 2. Validate the submitted day
//! 3. Merge the day into the week's plan document (find or create)
//! 4. Point the member at that document

use chrono::{Duration, NaiveDate, Weekday};
use futures_util::{stream, StreamExt};
use serde::Serialize;
use validator::Validate;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{ExerciseInput, FoodItem, Member, NutritionPlan, WorkoutPlan};
use crate::time_utils::WeekWindow;

/// Upper bound on entries submitted for a single day.
pub const MAX_ENTRIES_PER_DAY: usize = 50;

/// Longest history range served in one request.
const MAX_HISTORY_WEEKS: i64 = 53;

const MAX_CONCURRENT_DB_OPS: usize = 16;

/// A trainer's client with the client's plan for the current week.
#[derive(Debug, Clone, Serialize)]
pub struct ClientOverview {
    pub member: Member,
    pub workout_plan: Option<WorkoutPlan>,
}

#[derive(Clone)]
pub struct WeeklyPlanner {
    db: FirestoreDb,
}

impl WeeklyPlanner {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Replace `day` of the member's workout week containing `today`.
    pub async fn save_workout_day(
        &self,
        member_id: &str,
        day: Weekday,
        exercises: Vec<ExerciseInput>,
        today: NaiveDate,
    ) -> Result<WorkoutPlan> {
        validate_entries(&exercises)?;
        let window = WeekWindow::containing(today);

        tracing::debug!(
            member_id,
            week_start = %window.start,
            day = %day,
            count = exercises.len(),
            "Saving workout day"
        );

        let exercises = exercises
            .into_iter()
            .map(|e| e.into_exercise(day))
            .collect();

        self.db
            .save_workout_day(member_id, window, day, exercises)
            .await
    }

    /// Replace `day` of the member's nutrition week containing `today`.
    pub async fn save_nutrition_day(
        &self,
        member_id: &str,
        day: Weekday,
        foods: Vec<FoodItem>,
        today: NaiveDate,
    ) -> Result<NutritionPlan> {
        validate_entries(&foods)?;
        let window = WeekWindow::containing(today);

        tracing::debug!(
            member_id,
            week_start = %window.start,
            day = %day,
            count = foods.len(),
            "Saving nutrition day"
        );

        let foods = foods
            .into_iter()
            .map(|f| FoodItem {
                name: f.name.trim().to_string(),
                ..f
            })
            .collect();

        self.db
            .save_nutrition_day(member_id, window, day, foods)
            .await
    }

    /// The workout plan the member points at, if it covers `today`'s week.
    pub async fn current_workout_plan(
        &self,
        member: &Member,
        today: NaiveDate,
    ) -> Result<Option<WorkoutPlan>> {
        let window = WeekWindow::containing(today);
        let Some(plan_id) = member.current_workout_plan_id.as_deref() else {
            return Ok(None);
        };

        let plan = self.db.get_workout_plan(plan_id).await?;
        Ok(plan.filter(|p| p.week_start == window.start))
    }

    /// The nutrition plan the member points at, if it covers `today`'s week.
    pub async fn current_nutrition_plan(
        &self,
        member: &Member,
        today: NaiveDate,
    ) -> Result<Option<NutritionPlan>> {
        let window = WeekWindow::containing(today);
        let Some(plan_id) = member.current_nutrition_plan_id.as_deref() else {
            return Ok(None);
        };

        let plan = self.db.get_nutrition_plan(plan_id).await?;
        Ok(plan.filter(|p| p.week_start == window.start))
    }

    pub async fn workout_history(
        &self,
        member_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutPlan>> {
        check_history_range(from, to)?;
        self.db.workout_plans_in_range(member_id, from, to).await
    }

    pub async fn nutrition_history(
        &self,
        member_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NutritionPlan>> {
        check_history_range(from, to)?;
        self.db.nutrition_plans_in_range(member_id, from, to).await
    }

    /// All clients of a trainer with their current workout plans.
    pub async fn client_overview(
        &self,
        trainer_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<ClientOverview>> {
        let clients = self.db.list_members_for_trainer(trainer_id).await?;

        let mut overview = stream::iter(clients)
            .map(|member| async move {
                let workout_plan = self.current_workout_plan(&member, today).await?;
                Ok::<_, AppError>(ClientOverview {
                    member,
                    workout_plan,
                })
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<ClientOverview>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<ClientOverview>>>()?;

        // buffer_unordered loses the name ordering
        overview.sort_by(|a, b| a.member.name.cmp(&b.member.name));

        tracing::debug!(trainer_id, clients = overview.len(), "Built client overview");
        Ok(overview)
    }
}

/// Check entry count and per-entry constraints for one day.
pub fn validate_entries<T: Validate>(entries: &[T]) -> Result<()> {
    if entries.len() > MAX_ENTRIES_PER_DAY {
        return Err(AppError::BadRequest(format!(
            "At most {} entries per day",
            MAX_ENTRIES_PER_DAY
        )));
    }

    for (index, entry) in entries.iter().enumerate() {
        entry
            .validate()
            .map_err(|e| AppError::BadRequest(format!("Entry {}: {}", index, e)))?;
    }

    Ok(())
}

fn check_history_range(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from >= to {
        return Err(AppError::BadRequest(
            "'from' must be before 'to'".to_string(),
        ));
    }
    if to - from > Duration::weeks(MAX_HISTORY_WEEKS) {
        return Err(AppError::BadRequest(format!(
            "History range is limited to {} weeks",
            MAX_HISTORY_WEEKS
        )));
    }
    Ok(())
}
