//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const MEMBERS: &str = "members";
    /// Weekly workout plans (keyed by `{member_id}_{week_start}`)
    pub const WORKOUT_PLANS: &str = "workout_plans";
    /// Weekly nutrition plans (keyed by `{member_id}_{week_start}`)
    pub const NUTRITION_PLANS: &str = "nutrition_plans";
}
