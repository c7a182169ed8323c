// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Membership billing tiers.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};

/// Allowed membership terms in months.
pub const ALLOWED_TERMS: [u32; 4] = [1, 3, 6, 12];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    Basic,
    Standard,
    Premium,
}

impl MembershipTier {
    pub fn all() -> [MembershipTier; 3] {
        [
            MembershipTier::Basic,
            MembershipTier::Standard,
            MembershipTier::Premium,
        ]
    }

    pub fn monthly_price_cents(&self) -> u64 {
        match self {
            MembershipTier::Basic => 2999,
            MembershipTier::Standard => 4999,
            MembershipTier::Premium => 7999,
        }
    }

    pub fn features(&self) -> &'static [&'static str] {
        match self {
            MembershipTier::Basic => &["gym_floor"],
            MembershipTier::Standard => &["gym_floor", "group_classes", "workout_plan"],
            MembershipTier::Premium => &[
                "gym_floor",
                "group_classes",
                "workout_plan",
                "nutrition_plan",
                "personal_trainer",
            ],
        }
    }
}

/// Term discount in percent.
fn term_discount_percent(months: u32) -> u64 {
    match months {
        12 => 15,
        6 => 10,
        _ => 0,
    }
}

/// Total price in cents for `months` of `tier`, discount applied.
///
/// Rounds down to whole cents.
pub fn quote(tier: MembershipTier, months: u32) -> Result<u64> {
    if !ALLOWED_TERMS.contains(&months) {
        return Err(AppError::BadRequest(format!(
            "Membership term must be one of {:?} months",
            ALLOWED_TERMS
        )));
    }

    let gross = tier.monthly_price_cents() * months as u64;
    Ok(gross * (100 - term_discount_percent(months)) / 100)
}

/// Active or past membership held by a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Membership {
    pub tier: MembershipTier,
    pub months: u32,
    pub started_on: NaiveDate,
    /// First day the membership is no longer valid
    pub expires_on: NaiveDate,
    pub total_price_cents: u64,
}

impl Membership {
    /// Start a membership today.
    pub fn start(tier: MembershipTier, months: u32, today: NaiveDate) -> Result<Self> {
        let total_price_cents = quote(tier, months)?;
        let expires_on = today
            .checked_add_months(Months::new(months))
            .ok_or_else(|| AppError::BadRequest("Membership end date out of range".to_string()))?;

        Ok(Self {
            tier,
            months,
            started_on: today,
            expires_on,
            total_price_cents,
        })
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.started_on <= today && today < self.expires_on
    }
}
