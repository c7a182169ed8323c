// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member model for storage and API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Membership;

/// Role of an account on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Trainer,
    Verifier,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Trainer => "trainer",
            Role::Verifier => "verifier",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "trainer" => Ok(Role::Trainer),
            "verifier" => Ok(Role::Verifier),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Member profile stored in Firestore.
///
/// Staff accounts (trainers, verifiers, admins) are stored in the same
/// collection and distinguished by `role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Member ID (UUID, also used as document ID)
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Assigned trainer for plain members
    #[serde(default)]
    pub trainer_id: Option<String>,
    /// Set by a verifier once a trainer's credentials are checked
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub membership: Option<Membership>,
    /// Plan document for the most recently saved workout week
    #[serde(default)]
    pub current_workout_plan_id: Option<String>,
    /// Plan document for the most recently saved nutrition week
    #[serde(default)]
    pub current_nutrition_plan_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Member {
    /// Create a new member with a fresh ID.
    pub fn new(name: String, email: String, role: Role, now: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            role,
            trainer_id: None,
            verified: false,
            membership: None,
            current_workout_plan_id: None,
            current_nutrition_plan_id: None,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn is_verified_trainer(&self) -> bool {
        self.role == Role::Trainer && self.verified
    }
}
