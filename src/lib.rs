// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym-Planner: membership and weekly plan tracking for a gym
//!
//! This crate provides the backend API for member onboarding, membership
//! billing tiers, and the weekly workout and nutrition plans trainers
//! keep for their clients.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{MembershipService, WeeklyPlanner};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub planner: WeeklyPlanner,
    pub memberships: MembershipService,
}

impl AppState {
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        Self {
            planner: WeeklyPlanner::new(db.clone()),
            memberships: MembershipService::new(db.clone()),
            config,
            db,
        }
    }
}
