// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Membership subscriptions and staff onboarding.

use chrono::NaiveDate;
use firestore::paths;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Member, Membership, MembershipTier, Role};
use crate::time_utils::now_rfc3339;

#[derive(Clone)]
pub struct MembershipService {
    db: FirestoreDb,
}

impl MembershipService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Start a new membership for `member_id`, replacing any previous one.
    pub async fn subscribe(
        &self,
        member_id: &str,
        tier: MembershipTier,
        months: u32,
        today: NaiveDate,
    ) -> Result<Member> {
        // Price the term before touching storage
        let membership = Membership::start(tier, months, today)?;

        let mut member = self
            .db
            .get_member(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;

        if let Some(previous) = &member.membership {
            if previous.is_active(today) {
                tracing::info!(
                    member_id,
                    previous_tier = ?previous.tier,
                    expires_on = %previous.expires_on,
                    "Replacing active membership"
                );
            }
        }

        member.membership = Some(membership);
        member.updated_at = now_rfc3339();
        self.db
            .update_member_fields(&member, paths!(Member::{membership, updated_at}))
            .await?;

        tracing::info!(
            member_id,
            tier = ?tier,
            months,
            "Membership started"
        );

        Ok(member)
    }

    /// Create a new account. Plain members onboarded by a trainer are
    /// assigned to that trainer.
    pub async fn onboard(
        &self,
        name: String,
        email: String,
        role: Role,
        trainer_id: Option<String>,
    ) -> Result<Member> {
        let mut member = Member::new(name, email, role, &now_rfc3339());
        if role == Role::Member {
            member.trainer_id = trainer_id;
        }

        self.db.upsert_member(&member).await?;

        tracing::info!(
            member_id = %member.id,
            role = %role,
            trainer_id = ?member.trainer_id,
            "Account onboarded"
        );

        Ok(member)
    }

    /// Set a trainer's verification flag.
    pub async fn set_trainer_verified(&self, trainer_id: &str, verified: bool) -> Result<Member> {
        let mut trainer = self
            .db
            .get_member(trainer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trainer {} not found", trainer_id)))?;

        if trainer.role != Role::Trainer {
            return Err(AppError::BadRequest(format!(
                "Member {} is not a trainer",
                trainer_id
            )));
        }

        trainer.verified = verified;
        trainer.updated_at = now_rfc3339();
        self.db
            .update_member_fields(&trainer, paths!(Member::{verified, updated_at}))
            .await?;

        tracing::info!(trainer_id, verified, "Trainer verification updated");
        Ok(trainer)
    }
}
