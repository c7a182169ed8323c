// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Members (profiles, staff accounts, plan back-references)
//! - Workout plans (one document per member per week)
//! - Nutrition plans (one document per member per week)

use chrono::{NaiveDate, Weekday};
use firestore::errors::BackoffError;
use firestore::path;
use serde::de::DeserializeOwned;

use crate::db::collections;
use crate::error::AppError;
use crate::models::plan::plan_document_id;
use crate::models::{Exercise, FoodItem, Member, NutritionPlan, WeeklyPlan, WorkoutPlan};
use crate::time_utils::{now_rfc3339, WeekWindow};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator rejects real credentials, so connect unauthenticated
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Member Operations ───────────────────────────────────────

    /// Get a member by ID.
    pub async fn get_member(&self, member_id: &str) -> Result<Option<Member>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::MEMBERS)
            .obj()
            .one(member_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a member.
    pub async fn upsert_member(&self, member: &Member) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::MEMBERS)
            .document_id(&member.id)
            .object(member)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Write only the named fields of a member, leaving the rest of the
    /// stored document (plan references, membership) as it is.
    pub async fn update_member_fields<I>(&self, member: &Member, fields: I) -> Result<(), AppError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::MEMBERS)
            .document_id(&member.id)
            .object(member)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All members assigned to a trainer, sorted by name.
    pub async fn list_members_for_trainer(&self, trainer_id: &str) -> Result<Vec<Member>, AppError> {
        let trainer_id = trainer_id.to_string();
        let mut members: Vec<Member> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::MEMBERS)
            .filter(move |q| q.for_all([q.field("trainer_id").eq(trainer_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    // ─── Plan Reads ──────────────────────────────────────────────

    pub async fn get_workout_plan(&self, plan_id: &str) -> Result<Option<WorkoutPlan>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WORKOUT_PLANS)
            .obj()
            .one(plan_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_nutrition_plan(
        &self,
        plan_id: &str,
    ) -> Result<Option<NutritionPlan>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::NUTRITION_PLANS)
            .obj()
            .one(plan_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Workout plans whose week starts in `[from, to)`, newest first.
    pub async fn workout_plans_in_range(
        &self,
        member_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutPlan>, AppError> {
        self.plans_in_range(collections::WORKOUT_PLANS, member_id, from, to)
            .await
    }

    /// Nutrition plans whose week starts in `[from, to)`, newest first.
    pub async fn nutrition_plans_in_range(
        &self,
        member_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NutritionPlan>, AppError> {
        self.plans_in_range(collections::NUTRITION_PLANS, member_id, from, to)
            .await
    }

    async fn plans_in_range<P>(
        &self,
        collection: &str,
        member_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<P>, AppError>
    where
        P: DeserializeOwned + Send,
    {
        // week_start is stored as YYYY-MM-DD, which sorts chronologically
        let member_id = member_id.to_string();
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| {
                q.for_all([
                    q.field("member_id").eq(member_id.clone()),
                    q.field("week_start").greater_than_or_equal(from.clone()),
                    q.field("week_start").less_than(to.clone()),
                ])
            })
            .order_by([("week_start", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Weekly Plan Saves ───────────────────────────────────────

    /// Replace one day of a member's workout week and point the member at it.
    pub async fn save_workout_day(
        &self,
        member_id: &str,
        window: WeekWindow,
        day: Weekday,
        exercises: Vec<Exercise>,
    ) -> Result<WorkoutPlan, AppError> {
        self.save_plan_day(
            collections::WORKOUT_PLANS,
            member_id,
            window,
            day,
            exercises,
            path!(Member::current_workout_plan_id),
            |member, plan_id| member.current_workout_plan_id = Some(plan_id.to_string()),
        )
        .await
    }

    /// Replace one day of a member's nutrition week and point the member at it.
    pub async fn save_nutrition_day(
        &self,
        member_id: &str,
        window: WeekWindow,
        day: Weekday,
        foods: Vec<FoodItem>,
    ) -> Result<NutritionPlan, AppError> {
        self.save_plan_day(
            collections::NUTRITION_PLANS,
            member_id,
            window,
            day,
            foods,
            path!(Member::current_nutrition_plan_id),
            |member, plan_id| member.current_nutrition_plan_id = Some(plan_id.to_string()),
        )
        .await
    }

    /// Find-or-create the week's plan document, merge a day into it, and
    /// replace the member's plan reference.
    ///
    /// Both reads and both writes run in one Firestore transaction, which is
    /// retried on contention, so concurrent saves of different days (or of
    /// the other plan kind) are never lost. The member write is masked to
    /// `member_field` and `updated_at`. The document ID is derived from
    /// `(member_id, week_start)`, so two first saves for the same week land
    /// on the same document.
    #[allow(clippy::too_many_arguments)]
    async fn save_plan_day<P: WeeklyPlan>(
        &self,
        collection: &'static str,
        member_id: &str,
        window: WeekWindow,
        day: Weekday,
        entries: Vec<P::Entry>,
        member_field: String,
        link: fn(&mut Member, &str),
    ) -> Result<P, AppError> {
        let client = self.get_client()?;
        let plan_id = plan_document_id(member_id, window.start);
        let member_id = member_id.to_string();
        let member_fields = vec![member_field, path!(Member::updated_at)];

        let saved = client
            .run_transaction(|db, transaction| {
                let member_id = member_id.clone();
                let plan_id = plan_id.clone();
                let entries = entries.clone();
                let member_fields = member_fields.clone();

                Box::pin(async move {
                    let member: Option<Member> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::MEMBERS)
                        .obj()
                        .one(&member_id)
                        .await?;
                    let Some(mut member) = member else {
                        return Ok(None);
                    };

                    let existing: Option<P> = db
                        .fluent()
                        .select()
                        .by_id_in(collection)
                        .obj()
                        .one(&plan_id)
                        .await?;

                    let now = now_rfc3339();
                    let created = existing.is_none();
                    let mut plan =
                        existing.unwrap_or_else(|| P::for_week(&member_id, window, &now));
                    plan.replace_day(day, entries, &now);

                    link(&mut member, &plan_id);
                    member.updated_at = now;

                    db.fluent()
                        .update()
                        .in_col(collection)
                        .document_id(&plan_id)
                        .object(&plan)
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .fields(member_fields)
                        .in_col(collections::MEMBERS)
                        .document_id(&member_id)
                        .object(&member)
                        .add_to_transaction(transaction)?;

                    Ok::<_, BackoffError<firestore::errors::FirestoreError>>(Some((plan, created)))
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Plan save transaction failed: {}", e)))?;

        let Some((plan, created)) = saved else {
            return Err(AppError::NotFound(format!("Member {} not found", member_id)));
        };

        tracing::info!(
            member_id = %member_id,
            plan_id = %plan_id,
            collection,
            created,
            "Weekly plan saved"
        );

        Ok(plan)
    }
}
