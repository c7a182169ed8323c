// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access rules for member data.
//!
//! Role-only checks run before any database access so that obviously
//! disallowed requests are rejected without a read.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Member, Role};

/// Caller may see a member's profile and plans.
pub fn ensure_can_view(caller: &AuthUser, member: &Member) -> Result<()> {
    let allowed = caller.role == Role::Admin
        || caller.member_id == member.id
        || (caller.role == Role::Trainer
            && member.trainer_id.as_deref() == Some(caller.member_id.as_str()));

    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not allowed to view this member".to_string(),
        ))
    }
}

/// Role-only pre-check for plan writes.
pub fn ensure_may_write_plans(caller: &AuthUser) -> Result<()> {
    match caller.role {
        Role::Admin | Role::Trainer => Ok(()),
        _ => Err(AppError::Forbidden(
            "Only trainers can edit plans".to_string(),
        )),
    }
}

/// Full plan-write check: admins, or the member's own verified trainer.
///
/// `caller_profile` is the stored profile of the caller; it is only
/// consulted for trainers.
pub fn ensure_can_write_plans(
    caller: &AuthUser,
    caller_profile: Option<&Member>,
    member: &Member,
) -> Result<()> {
    ensure_may_write_plans(caller)?;
    if caller.role == Role::Admin {
        return Ok(());
    }

    let verified = caller_profile
        .map(|p| p.id == caller.member_id && p.is_verified_trainer())
        .unwrap_or(false);
    if !verified {
        return Err(AppError::Forbidden(
            "Trainer is not verified yet".to_string(),
        ));
    }

    if member.trainer_id.as_deref() != Some(caller.member_id.as_str()) {
        return Err(AppError::Forbidden(
            "Member is not assigned to this trainer".to_string(),
        ));
    }

    Ok(())
}

/// Caller may create an account with `role`.
///
/// Trainers can only onboard plain members (assigned to themselves).
pub fn ensure_can_onboard(caller: &AuthUser, role: Role) -> Result<()> {
    match (caller.role, role) {
        (Role::Admin, _) => Ok(()),
        (Role::Trainer, Role::Member) => Ok(()),
        _ => Err(AppError::Forbidden(format!(
            "A {} cannot onboard a {}",
            caller.role, role
        ))),
    }
}

/// Caller may change a trainer's verification status.
pub fn ensure_can_verify(caller: &AuthUser) -> Result<()> {
    match caller.role {
        Role::Verifier | Role::Admin => Ok(()),
        _ => Err(AppError::Forbidden(
            "Only verifiers can verify trainers".to_string(),
        )),
    }
}
