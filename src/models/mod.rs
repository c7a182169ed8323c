// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod member;
pub mod membership;
pub mod plan;

pub use member::{Member, Role};
pub use membership::{Membership, MembershipTier};
pub use plan::{
    DayNutrition, Exercise, ExerciseInput, FoodItem, NutritionPlan, NutritionSummary, WeeklyPlan,
    WorkoutPlan, WorkoutSummary,
};
