//! Query cache for the aggregate views.
//!
//! Views never patch cached data in place; a mutation drops every
//! cached view for its entry kind and the next read recomputes from a
//! fresh fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shared::{DaySummary, WeightDaySummary};

/// Which record collection a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Meals,
    Weights,
}

/// Which screen's query this is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    Weekly,
    Monthly,
    /// Day-details drill-down for one date key
    ByDate(String),
}

/// Cache key: entry kind plus view, the same shape as the original's
/// query keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: EntryKind,
    pub view: View,
}

/// A cached aggregate series.
#[derive(Debug, Clone)]
pub enum CachedSeries {
    Calories(Vec<DaySummary>),
    Weights(Vec<WeightDaySummary>),
}

/// Shared cache handle; clones all point at the same map.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<Mutex<HashMap<QueryKey, CachedSeries>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<CachedSeries> {
        self.inner.lock().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: QueryKey, series: CachedSeries) {
        self.inner.lock().unwrap().insert(key, series);
    }

    /// Drop every cached view for one entry kind. Called after each
    /// successful mutation so daily, weekly and monthly views stay
    /// consistent with the store.
    pub fn invalidate_kind(&self, kind: EntryKind) {
        self.inner.lock().unwrap().retain(|key, _| key.kind != kind);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}
