//! Thin HTTP client for the hosted row store (PostgREST-style API).
//!
//! Nothing here interprets the data; it builds filtered row requests,
//! attaches the API key headers, and maps non-success responses into
//! [`AppError::Store`] untouched.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use shared::{MealEntry, MealPatch, NewMeal, NewWeight, WeightEntry};
use tracing::debug;

use crate::error::AppError;
use crate::store::{MealStore, WeightStore};

const MEALS_TABLE: &str = "meals";
const WEIGHTS_TABLE: &str = "weight_entries";

/// Equality filter in the store's query syntax.
fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// Inclusive lower-bound filter.
fn gte(value: &str) -> String {
    format!("gte.{}", value)
}

/// Inclusive upper-bound filter.
fn lte(value: &str) -> String {
    format!("lte.{}", value)
}

/// Client for the managed relational store, constructed once at startup
/// and shared by reference.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    /// Build a client for the store at `base_url`, authenticating every
    /// request with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(api_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))?,
        );
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Map a non-success response into a store error carrying the
    /// status and the body text as the store produced it.
    async fn check(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "(unreadable error body)".to_string());
        Err(AppError::Store {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows_by_date<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        date_key: &str,
    ) -> Result<Vec<T>, AppError> {
        debug!("fetching {} for {}", table, date_key);
        let date_filter = eq(date_key);
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[
                ("select", "*"),
                ("date", date_filter.as_str()),
                ("order", "created_at.desc"),
            ])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn rows_in_range<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        start_key: &str,
        end_key: &str,
    ) -> Result<Vec<T>, AppError> {
        debug!("fetching {} in [{}, {}]", table, start_key, end_key);
        let lower = gte(start_key);
        let upper = lte(end_key);
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[
                ("select", "*"),
                ("date", lower.as_str()),
                ("date", upper.as_str()),
            ])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn insert_row<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let mut rows: Vec<T> = Self::check(response).await?.json().await?;
        rows.pop().ok_or(AppError::Store {
            status: StatusCode::OK.as_u16(),
            message: "insert returned no rows".to_string(),
        })
    }

    async fn delete_row(&self, table: &str, id: i64) -> Result<(), AppError> {
        let id_filter = eq(id);
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", id_filter.as_str())])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl MealStore for RestStore {
    async fn meals_by_date(&self, date_key: &str) -> Result<Vec<MealEntry>, AppError> {
        self.rows_by_date(MEALS_TABLE, date_key).await
    }

    async fn meals_in_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Vec<MealEntry>, AppError> {
        self.rows_in_range(MEALS_TABLE, start_key, end_key).await
    }

    async fn get_meal(&self, id: i64) -> Result<Option<MealEntry>, AppError> {
        let id_filter = eq(id);
        let response = self
            .client
            .get(self.table_url(MEALS_TABLE))
            .query(&[("select", "*"), ("id", id_filter.as_str())])
            .send()
            .await?;
        let mut rows: Vec<MealEntry> = Self::check(response).await?.json().await?;
        Ok(rows.pop())
    }

    async fn insert_meal(&self, meal: NewMeal) -> Result<MealEntry, AppError> {
        self.insert_row(MEALS_TABLE, &meal).await
    }

    async fn update_meal(&self, id: i64, patch: MealPatch) -> Result<(), AppError> {
        let id_filter = eq(id);
        let response = self
            .client
            .patch(self.table_url(MEALS_TABLE))
            .query(&[("id", id_filter.as_str())])
            .json(&patch)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_meal(&self, id: i64) -> Result<(), AppError> {
        self.delete_row(MEALS_TABLE, id).await
    }
}

impl WeightStore for RestStore {
    async fn weights_by_date(&self, date_key: &str) -> Result<Vec<WeightEntry>, AppError> {
        self.rows_by_date(WEIGHTS_TABLE, date_key).await
    }

    async fn weights_in_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Vec<WeightEntry>, AppError> {
        self.rows_in_range(WEIGHTS_TABLE, start_key, end_key).await
    }

    async fn insert_weight(&self, entry: NewWeight) -> Result<WeightEntry, AppError> {
        self.insert_row(WEIGHTS_TABLE, &entry).await
    }

    async fn delete_weight(&self, id: i64) -> Result<(), AppError> {
        self.delete_row(WEIGHTS_TABLE, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_use_store_operator_syntax() {
        assert_eq!(eq("2024-06-03"), "eq.2024-06-03");
        assert_eq!(eq(42), "eq.42");
        assert_eq!(gte("2024-06-01"), "gte.2024-06-01");
        assert_eq!(lte("2024-06-30"), "lte.2024-06-30");
    }

    #[test]
    fn table_urls_tolerate_trailing_slash() {
        let store = RestStore::new("https://example.supabase.co/", "anon-key").unwrap();
        assert_eq!(
            store.table_url(MEALS_TABLE),
            "https://example.supabase.co/rest/v1/meals"
        );
        assert_eq!(
            store.table_url(WEIGHTS_TABLE),
            "https://example.supabase.co/rest/v1/weight_entries"
        );
    }
}
