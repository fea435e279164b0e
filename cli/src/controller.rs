//! Search state controller: owns the current filters, page window, and the
//! last fetched page, and keeps them consistent as the user edits things.

use std::sync::Arc;

use crate::api::{PageRequest, Recipe, RecipeFetcher, SearchResponse};

pub const DEFAULT_LIMIT: i64 = 15;

pub struct BrowseController {
    fetcher: Arc<dyn RecipeFetcher>,

    title: String,
    cuisine: String,
    serves: String,
    rating: Option<u8>,
    max_time: Option<u32>,

    page: i64,
    limit: i64,

    recipes: Vec<Recipe>,
    total: i64,
    loading: bool,
    last_error: Option<String>,

    /// Monotonically increasing fetch sequence number. Only the response
    /// matching the latest issued request is applied; anything older lost the
    /// race and is discarded instead of overwriting newer state.
    issued_seq: u64,
}

impl BrowseController {
    pub fn new(fetcher: Arc<dyn RecipeFetcher>) -> Self {
        Self {
            fetcher,
            title: String::new(),
            cuisine: String::new(),
            serves: String::new(),
            rating: None,
            max_time: None,
            page: 1,
            limit: DEFAULT_LIMIT,
            recipes: Vec::new(),
            total: 0,
            loading: false,
            last_error: None,
            issued_seq: 0,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// ceil(total / limit); limit is always >= 1.
    pub fn total_pages(&self) -> i64 {
        (self.total + self.limit - 1) / self.limit
    }

    /// 1-based inclusive range for the "showing X to Y of Z" indicator;
    /// (0, 0) when nothing matched.
    pub fn result_range(&self) -> (i64, i64) {
        if self.total == 0 {
            (0, 0)
        } else {
            let start = (self.page - 1) * self.limit + 1;
            let end = (self.page * self.limit).min(self.total);
            (start, end)
        }
    }

    // Filter edits reset pagination: the old page number is meaningless
    // against a different result set.

    pub async fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_cuisine(&mut self, cuisine: &str) {
        self.cuisine = cuisine.to_string();
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_serves(&mut self, serves: &str) {
        self.serves = serves.to_string();
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_rating(&mut self, rating: Option<u8>) {
        self.rating = rating.map(|r| r.clamp(1, 5));
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_max_time(&mut self, max_time: Option<u32>) {
        self.max_time = max_time;
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_limit(&mut self, limit: i64) {
        self.limit = limit.max(1);
        self.page = 1;
        self.refresh().await;
    }

    pub async fn clear_filters(&mut self) {
        self.title.clear();
        self.cuisine.clear();
        self.serves.clear();
        self.rating = None;
        self.max_time = None;
        self.page = 1;
        self.refresh().await;
    }

    pub async fn next_page(&mut self) {
        let clamped = (self.page + 1).clamp(1, self.total_pages().max(1));
        if clamped != self.page {
            self.page = clamped;
            self.refresh().await;
        }
    }

    pub async fn prev_page(&mut self) {
        let clamped = (self.page - 1).clamp(1, self.total_pages().max(1));
        if clamped != self.page {
            self.page = clamped;
            self.refresh().await;
        }
    }

    /// Issue a fetch for the current state: bumps the sequence number, flags
    /// loading, and snapshots the request parameters.
    pub fn begin_fetch(&mut self) -> (u64, PageRequest) {
        self.loading = true;
        self.issued_seq += 1;
        let request = PageRequest {
            page: self.page,
            limit: self.limit,
            title: non_empty(&self.title),
            cuisine: non_empty(&self.cuisine),
            serves: non_empty(&self.serves),
            rating: self.rating,
            max_time: self.max_time,
        };
        (self.issued_seq, request)
    }

    /// Apply a resolved fetch. Stale responses (anything but the latest
    /// issued sequence number) are dropped.
    pub fn apply_response(&mut self, seq: u64, result: anyhow::Result<SearchResponse>) {
        if seq != self.issued_seq {
            tracing::debug!(seq, latest = self.issued_seq, "dropping stale response");
            return;
        }
        self.loading = false;
        match result {
            Ok(response) => {
                self.recipes = response.data;
                self.total = response.total;
                self.last_error = None;
            }
            Err(e) => {
                // Degrade to the empty-state view; the failure reason is kept
                // around for the UI to show alongside it.
                tracing::warn!(error = %e, "failed to fetch recipes");
                self.recipes.clear();
                self.last_error = Some(e.to_string());
            }
        }
    }

    pub async fn refresh(&mut self) {
        let (seq, request) = self.begin_fetch();
        let fetcher = Arc::clone(&self.fetcher);
        let result = fetcher.fetch_page(&request).await;
        self.apply_response(seq, result);
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
