// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod access;
pub mod membership;
pub mod planner;

pub use membership::MembershipService;
pub use planner::{ClientOverview, WeeklyPlanner};
