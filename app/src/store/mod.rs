//! Remote store abstraction.
//!
//! The domain services work against these traits so the hosted HTTP
//! store and the in-memory test store are interchangeable. All date
//! filters are equality or inclusive range over the "YYYY-MM-DD" date
//! column, matching the keys from [`crate::dates::local_date_key`].

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use shared::{MealEntry, MealPatch, NewMeal, NewWeight, WeightEntry};

use crate::error::AppError;

/// Row operations over the remote `meals` collection.
#[allow(async_fn_in_trait)]
pub trait MealStore {
    /// All meals logged on one local calendar day, newest first
    async fn meals_by_date(&self, date_key: &str) -> Result<Vec<MealEntry>, AppError>;

    /// All meals with `start_key <= date <= end_key`
    async fn meals_in_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Vec<MealEntry>, AppError>;

    /// Fetch a single meal by id
    async fn get_meal(&self, id: i64) -> Result<Option<MealEntry>, AppError>;

    /// Insert a meal; the store assigns id and created_at
    async fn insert_meal(&self, meal: NewMeal) -> Result<MealEntry, AppError>;

    /// Full-record overwrite of the editable fields by id
    async fn update_meal(&self, id: i64, patch: MealPatch) -> Result<(), AppError>;

    /// Irreversibly delete a meal by id
    async fn delete_meal(&self, id: i64) -> Result<(), AppError>;
}

/// Row operations over the remote `weight_entries` collection.
#[allow(async_fn_in_trait)]
pub trait WeightStore {
    /// All measurements logged on one local calendar day, newest first
    async fn weights_by_date(&self, date_key: &str) -> Result<Vec<WeightEntry>, AppError>;

    /// All measurements with `start_key <= date <= end_key`
    async fn weights_in_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Vec<WeightEntry>, AppError>;

    /// Insert a measurement; the store assigns id and created_at
    async fn insert_weight(&self, entry: NewWeight) -> Result<WeightEntry, AppError>;

    /// Irreversibly delete a measurement by id
    async fn delete_weight(&self, id: i64) -> Result<(), AppError>;
}
