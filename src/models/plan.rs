// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly workout and nutrition plans.
//!
//! One document per member per Monday-aligned week. Saving a day replaces
//! only that weekday's data and recomputes the weekly summary.

use chrono::{NaiveDate, Weekday};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

use crate::time_utils::{WeekWindow, WEEKDAYS};

/// A week's plan document whose days are replaced one at a time.
///
/// Implementations must be safe to rebuild from scratch: a save may be
/// retried against freshly read state.
pub trait WeeklyPlan: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// What is stored for one weekday.
    type Entry: Clone + Send + Sync + 'static;

    fn for_week(member_id: &str, window: WeekWindow, now: &str) -> Self;

    fn replace_day(&mut self, day: Weekday, entries: Vec<Self::Entry>, now: &str);
}

/// Deterministic document ID for a member's plan in a given week.
pub fn plan_document_id(member_id: &str, week_start: NaiveDate) -> String {
    format!("{}_{}", member_id, week_start.format("%Y-%m-%d"))
}

// ─── Workout ─────────────────────────────────────────────────

/// Exercise as submitted by a trainer for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExerciseInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 50))]
    pub sets: u32,
    #[validate(range(min = 1, max = 500))]
    pub reps: u32,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    #[validate(range(max = 600))]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Stored exercise, tagged with its weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub day: Weekday,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExerciseInput {
    pub fn into_exercise(self, day: Weekday) -> Exercise {
        Exercise {
            day,
            name: self.name.trim().to_string(),
            sets: self.sets,
            reps: self.reps,
            weight_kg: self.weight_kg,
            duration_minutes: self.duration_minutes,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Days with at least one exercise
    pub active_days: u32,
    pub total_exercises: u32,
    pub total_sets: u32,
}

/// A member's workout plan for one week.
///
/// Stored at: `workout_plans/{member_id}_{week_start}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: String,
    pub member_id: String,
    /// Monday of the week
    pub week_start: NaiveDate,
    /// Following Monday (exclusive)
    pub week_end: NaiveDate,
    /// Exercises for the whole week, ordered Monday to Sunday
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub summary: WorkoutSummary,
    pub created_at: String,
    pub updated_at: String,
}

impl WorkoutPlan {
    pub fn new(member_id: &str, window: WeekWindow, now: &str) -> Self {
        Self {
            id: plan_document_id(member_id, window.start),
            member_id: member_id.to_string(),
            week_start: window.start,
            week_end: window.end,
            exercises: Vec::new(),
            summary: WorkoutSummary::default(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn exercises_for(&self, day: Weekday) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter().filter(move |e| e.day == day)
    }

    /// Replace the exercises for `day`. Other days are left untouched.
    pub fn set_day(&mut self, day: Weekday, exercises: Vec<Exercise>, now: &str) {
        self.exercises.retain(|e| e.day != day);
        self.exercises
            .extend(exercises.into_iter().map(|e| Exercise { day, ..e }));
        // Stable sort keeps the submitted order within a day
        self.exercises
            .sort_by_key(|e| e.day.num_days_from_monday());
        self.recompute_summary();
        self.updated_at = now.to_string();
    }

    fn recompute_summary(&mut self) {
        let active_days = WEEKDAYS
            .iter()
            .filter(|&&day| self.exercises.iter().any(|e| e.day == day))
            .count() as u32;

        self.summary = WorkoutSummary {
            active_days,
            total_exercises: self.exercises.len() as u32,
            total_sets: self.exercises.iter().map(|e| e.sets).sum(),
        };
    }
}

impl WeeklyPlan for WorkoutPlan {
    type Entry = Exercise;

    fn for_week(member_id: &str, window: WeekWindow, now: &str) -> Self {
        Self::new(member_id, window, now)
    }

    fn replace_day(&mut self, day: Weekday, entries: Vec<Exercise>, now: &str) {
        self.set_day(day, entries, now)
    }
}

// ─── Nutrition ───────────────────────────────────────────────

/// Food entry as submitted for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FoodItem {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub quantity: Option<String>,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub calories: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub protein: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub carbs: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fat: f64,
}

/// Nutrition totals for one weekday.
///
/// Days without any logged food are kept as zeroed placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayNutrition {
    pub day: Weekday,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub foods: Vec<FoodItem>,
}

impl DayNutrition {
    pub fn empty(day: Weekday) -> Self {
        Self {
            day,
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            foods: Vec::new(),
        }
    }

    pub fn from_foods(day: Weekday, foods: Vec<FoodItem>) -> Self {
        let mut entry = Self::empty(day);
        for food in &foods {
            entry.calories += food.calories;
            entry.protein += food.protein;
            entry.carbs += food.carbs;
            entry.fat += food.fat;
        }
        entry.foods = foods;
        entry
    }

    pub fn is_logged(&self) -> bool {
        !self.foods.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub avg_calories: f64,
    pub avg_protein: f64,
    pub avg_carbs: f64,
    pub avg_fat: f64,
    /// Days with a non-empty food list
    pub logged_days: u32,
}

/// A member's nutrition plan for one week.
///
/// Stored at: `nutrition_plans/{member_id}_{week_start}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub id: String,
    pub member_id: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// Exactly seven entries, Monday first
    pub days: Vec<DayNutrition>,
    #[serde(default)]
    pub summary: NutritionSummary,
    pub created_at: String,
    pub updated_at: String,
}

impl NutritionPlan {
    pub fn new(member_id: &str, window: WeekWindow, now: &str) -> Self {
        Self {
            id: plan_document_id(member_id, window.start),
            member_id: member_id.to_string(),
            week_start: window.start,
            week_end: window.end,
            days: WEEKDAYS.iter().map(|&d| DayNutrition::empty(d)).collect(),
            summary: NutritionSummary::default(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn day(&self, day: Weekday) -> Option<&DayNutrition> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Replace the foods logged for `day` and refresh the weekly averages.
    pub fn set_day(&mut self, day: Weekday, foods: Vec<FoodItem>, now: &str) {
        self.normalize_days();
        self.days[day.num_days_from_monday() as usize] = DayNutrition::from_foods(day, foods);
        self.recompute_summary();
        self.updated_at = now.to_string();
    }

    /// Rebuild the seven Monday-first slots, filling gaps with placeholders.
    fn normalize_days(&mut self) {
        if self.days.len() == 7 && self.days.iter().zip(WEEKDAYS).all(|(d, w)| d.day == w) {
            return;
        }

        let mut days: Vec<DayNutrition> = WEEKDAYS.iter().map(|&d| DayNutrition::empty(d)).collect();
        for entry in self.days.drain(..) {
            let index = entry.day.num_days_from_monday() as usize;
            days[index] = entry;
        }
        self.days = days;
    }

    fn recompute_summary(&mut self) {
        let logged: Vec<&DayNutrition> = self.days.iter().filter(|d| d.is_logged()).collect();
        let count = logged.len() as u32;

        if count == 0 {
            self.summary = NutritionSummary::default();
            return;
        }

        let n = count as f64;
        self.summary = NutritionSummary {
            avg_calories: logged.iter().map(|d| d.calories).sum::<f64>() / n,
            avg_protein: logged.iter().map(|d| d.protein).sum::<f64>() / n,
            avg_carbs: logged.iter().map(|d| d.carbs).sum::<f64>() / n,
            avg_fat: logged.iter().map(|d| d.fat).sum::<f64>() / n,
            logged_days: count,
        };
    }
}

impl WeeklyPlan for NutritionPlan {
    type Entry = FoodItem;

    fn for_week(member_id: &str, window: WeekWindow, now: &str) -> Self {
        Self::new(member_id, window, now)
    }

    fn replace_day(&mut self, day: Weekday, entries: Vec<FoodItem>, now: &str) {
        self.set_day(day, entries, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2026-10-14T12:00:00Z";

    fn window() -> WeekWindow {
        WeekWindow::containing(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap())
    }

    fn exercise(name: &str, sets: u32) -> Exercise {
        ExerciseInput {
            name: name.to_string(),
            sets,
            reps: 10,
            weight_kg: Some(40.0),
            duration_minutes: None,
            notes: None,
        }
        .into_exercise(Weekday::Mon)
    }

    fn food(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            quantity: None,
            calories,
            protein,
            carbs,
            fat,
        }
    }

    #[test]
    fn test_plan_id_is_member_and_monday() {
        let plan = WorkoutPlan::new("m1", window(), NOW);
        assert_eq!(plan.id, "m1_2026-10-12");
        assert_eq!(plan.week_start.to_string(), "2026-10-12");
        assert_eq!(plan.week_end.to_string(), "2026-10-19");
    }

    #[test]
    fn test_workout_set_day_keeps_other_days() {
        let mut plan = WorkoutPlan::new("m1", window(), NOW);
        plan.set_day(Weekday::Wed, vec![exercise("Squat", 5)], NOW);
        plan.set_day(Weekday::Mon, vec![exercise("Bench", 3), exercise("Row", 4)], NOW);

        // Replacing Monday leaves Wednesday alone
        plan.set_day(Weekday::Mon, vec![exercise("Deadlift", 2)], NOW);

        let monday: Vec<_> = plan.exercises_for(Weekday::Mon).map(|e| e.name.as_str()).collect();
        let wednesday: Vec<_> = plan.exercises_for(Weekday::Wed).map(|e| e.name.as_str()).collect();
        assert_eq!(monday, vec!["Deadlift"]);
        assert_eq!(wednesday, vec!["Squat"]);
        assert_eq!(plan.exercises[0].day, Weekday::Mon);
        assert_eq!(
            plan.summary,
            WorkoutSummary {
                active_days: 2,
                total_exercises: 2,
                total_sets: 7,
            }
        );
    }

    #[test]
    fn test_workout_set_day_is_idempotent() {
        let mut plan = WorkoutPlan::new("m1", window(), NOW);
        let day = vec![exercise("Bench", 3), exercise("Row", 4)];

        plan.set_day(Weekday::Fri, day.clone(), NOW);
        let first = plan.exercises.clone();
        plan.set_day(Weekday::Fri, day, "2026-10-14T13:00:00Z");

        assert_eq!(plan.exercises, first);
        assert_eq!(plan.summary.total_exercises, 2);
        assert_eq!(plan.updated_at, "2026-10-14T13:00:00Z");
    }

    #[test]
    fn test_workout_clearing_day_drops_it_from_active_days() {
        let mut plan = WorkoutPlan::new("m1", window(), NOW);
        plan.set_day(Weekday::Tue, vec![exercise("Plank", 3)], NOW);
        plan.set_day(Weekday::Tue, vec![], NOW);
        assert!(plan.exercises.is_empty());
        assert_eq!(plan.summary, WorkoutSummary::default());
    }

    #[test]
    fn test_nutrition_new_plan_has_seven_zeroed_days() {
        let plan = NutritionPlan::new("m1", window(), NOW);
        assert_eq!(plan.days.len(), 7);
        assert_eq!(plan.days[0].day, Weekday::Mon);
        assert_eq!(plan.days[6].day, Weekday::Sun);
        assert!(plan.days.iter().all(|d| !d.is_logged() && d.calories == 0.0));
    }

    #[test]
    fn test_nutrition_day_totals_come_from_foods() {
        let mut plan = NutritionPlan::new("m1", window(), NOW);
        plan.set_day(
            Weekday::Tue,
            vec![
                food("Oats", 300.0, 10.0, 54.0, 5.0),
                food("Chicken", 250.0, 45.0, 0.0, 6.0),
            ],
            NOW,
        );

        let tuesday = plan.day(Weekday::Tue).unwrap();
        assert_eq!(tuesday.calories, 550.0);
        assert_eq!(tuesday.protein, 55.0);
        assert_eq!(tuesday.carbs, 54.0);
        assert_eq!(tuesday.fat, 11.0);
    }

    #[test]
    fn test_nutrition_averages_skip_empty_days() {
        let mut plan = NutritionPlan::new("m1", window(), NOW);
        plan.set_day(Weekday::Mon, vec![food("Rice", 2000.0, 100.0, 250.0, 60.0)], NOW);
        plan.set_day(Weekday::Thu, vec![food("Pasta", 3000.0, 140.0, 400.0, 80.0)], NOW);

        assert_eq!(plan.summary.logged_days, 2);
        assert_eq!(plan.summary.avg_calories, 2500.0);
        assert_eq!(plan.summary.avg_protein, 120.0);
        assert_eq!(plan.summary.avg_carbs, 325.0);
        assert_eq!(plan.summary.avg_fat, 70.0);
    }

    #[test]
    fn test_nutrition_zero_calorie_food_still_counts_as_logged() {
        let mut plan = NutritionPlan::new("m1", window(), NOW);
        plan.set_day(Weekday::Mon, vec![food("Water", 0.0, 0.0, 0.0, 0.0)], NOW);
        plan.set_day(Weekday::Tue, vec![food("Steak", 800.0, 60.0, 0.0, 50.0)], NOW);

        assert_eq!(plan.summary.logged_days, 2);
        assert_eq!(plan.summary.avg_calories, 400.0);
    }

    #[test]
    fn test_nutrition_set_day_preserves_other_days() {
        let mut plan = NutritionPlan::new("m1", window(), NOW);
        plan.set_day(Weekday::Sat, vec![food("Eggs", 200.0, 12.0, 1.0, 14.0)], NOW);
        plan.set_day(Weekday::Sun, vec![food("Toast", 150.0, 5.0, 28.0, 2.0)], NOW);
        plan.set_day(Weekday::Sun, vec![food("Bagel", 250.0, 9.0, 48.0, 1.5)], NOW);

        assert_eq!(plan.day(Weekday::Sat).unwrap().foods[0].name, "Eggs");
        assert_eq!(plan.day(Weekday::Sun).unwrap().foods.len(), 1);
        assert_eq!(plan.day(Weekday::Sun).unwrap().foods[0].name, "Bagel");
    }

    #[test]
    fn test_nutrition_clearing_all_days_resets_summary() {
        let mut plan = NutritionPlan::new("m1", window(), NOW);
        plan.set_day(Weekday::Mon, vec![food("Rice", 500.0, 10.0, 100.0, 2.0)], NOW);
        plan.set_day(Weekday::Mon, vec![], NOW);
        assert_eq!(plan.summary, NutritionSummary::default());
    }

    #[test]
    fn test_nutrition_normalizes_stored_days() {
        let mut plan = NutritionPlan::new("m1", window(), NOW);
        // Simulate a stored document missing most days
        plan.days = vec![DayNutrition::from_foods(
            Weekday::Fri,
            vec![food("Soup", 300.0, 15.0, 30.0, 10.0)],
        )];

        plan.set_day(Weekday::Mon, vec![food("Rice", 500.0, 10.0, 100.0, 2.0)], NOW);

        assert_eq!(plan.days.len(), 7);
        assert!(plan.day(Weekday::Fri).unwrap().is_logged());
        assert_eq!(plan.summary.logged_days, 2);
    }

    #[test]
    fn test_exercise_input_validation() {
        let mut input = ExerciseInput {
            name: "Squat".to_string(),
            sets: 5,
            reps: 5,
            weight_kg: Some(100.0),
            duration_minutes: None,
            notes: None,
        };
        assert!(input.validate().is_ok());

        input.name = String::new();
        assert!(input.validate().is_err());

        input.name = "Squat".to_string();
        input.sets = 0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_food_item_rejects_negative_macros() {
        let item = food("Mystery", -10.0, 0.0, 0.0, 0.0);
        assert!(item.validate().is_err());
    }
}
