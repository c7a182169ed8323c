// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for members, memberships, and staff.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::membership::{quote, ALLOWED_TERMS};
use crate::models::{Member, MembershipTier, Role};
use crate::services::{access, ClientOverview};
use crate::time_utils::today_local;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Public routes (no authentication).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/memberships", get(get_membership_catalog))
}

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/me/membership", put(put_membership))
        .route("/api/members", post(onboard_member))
        .route("/api/members/{member_id}", get(get_member))
        .route(
            "/api/trainers/{trainer_id}/verification",
            put(put_trainer_verification),
        )
        .route("/api/trainer/clients", get(get_trainer_clients))
}

// ─── Membership Catalog ──────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TermQuote {
    pub months: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_price_cents: u64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TierInfo {
    pub tier: MembershipTier,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub monthly_price_cents: u64,
    pub features: Vec<String>,
    pub terms: Vec<TermQuote>,
}

/// List membership tiers with prices for every allowed term.
async fn get_membership_catalog() -> Result<Json<Vec<TierInfo>>> {
    let mut tiers = Vec::new();
    for tier in MembershipTier::all() {
        let terms = ALLOWED_TERMS
            .iter()
            .map(|&months| {
                Ok(TermQuote {
                    months,
                    total_price_cents: quote(tier, months)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tiers.push(TierInfo {
            tier,
            monthly_price_cents: tier.monthly_price_cents(),
            features: tier.features().iter().map(|f| f.to_string()).collect(),
            terms,
        });
    }
    Ok(Json(tiers))
}

// ─── Current Member ──────────────────────────────────────────

/// Get the caller's profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Member>> {
    let member = state
        .db
        .get_member(&user.member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", user.member_id)))?;
    Ok(Json(member))
}

#[derive(Deserialize)]
pub struct MembershipRequest {
    pub tier: MembershipTier,
    pub months: u32,
}

/// Start a membership for the caller.
async fn put_membership(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<MembershipRequest>, AppError>,
) -> Result<Json<Member>> {
    let member = state
        .memberships
        .subscribe(&user.member_id, body.tier, body.months, today_local())
        .await?;
    Ok(Json(member))
}

// ─── Onboarding ──────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct OnboardRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
}

/// Create a new member or staff account.
async fn onboard_member(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<OnboardRequest>, AppError>,
) -> Result<(StatusCode, Json<Member>)> {
    access::ensure_can_onboard(&user, body.role)?;
    body.validate()?;

    let trainer_id = (user.role == Role::Trainer).then(|| user.member_id.clone());
    let member = state
        .memberships
        .onboard(
            body.name.trim().to_string(),
            body.email.trim().to_lowercase(),
            body.role,
            trainer_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

async fn get_member(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(member_id): Path<String>,
) -> Result<Json<Member>> {
    let member = state
        .db
        .get_member(&member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
    access::ensure_can_view(&user, &member)?;
    Ok(Json(member))
}

// ─── Staff ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerificationRequest {
    pub verified: bool,
}

/// Mark a trainer verified (or revoke it).
async fn put_trainer_verification(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(trainer_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<VerificationRequest>, AppError>,
) -> Result<Json<Member>> {
    access::ensure_can_verify(&user)?;

    tracing::info!(
        trainer_id = %trainer_id,
        verifier = %user.member_id,
        verified = body.verified,
        "Trainer verification request"
    );

    let trainer = state
        .memberships
        .set_trainer_verified(&trainer_id, body.verified)
        .await?;
    Ok(Json(trainer))
}

/// The calling trainer's clients with this week's workout plans.
async fn get_trainer_clients(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ClientOverview>>> {
    if user.role != Role::Trainer {
        return Err(AppError::Forbidden(
            "Only trainers have clients".to_string(),
        ));
    }

    let overview = state
        .planner
        .client_overview(&user.member_id, today_local())
        .await?;
    Ok(Json(overview))
}
