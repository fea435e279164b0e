//! HTTP client for the recipe endpoints.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub cuisine: String,
    pub rating: Option<f64>,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub total_time: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nutrients: HashMap<String, String>,
    #[serde(default)]
    pub serves: String,
    pub continent: Option<String>,
    pub country_state: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub url_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub data: Vec<Recipe>,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Snapshot of one fetch: page window plus whichever filters were active when
/// the controller issued it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub serves: Option<String>,
    /// Star filter, sent as "<=N": show recipes rated at most N stars.
    pub rating: Option<u8>,
    /// Maximum total time in minutes, sent as "<=N".
    pub max_time: Option<u32>,
}

impl PageRequest {
    pub fn has_filters(&self) -> bool {
        self.title.is_some()
            || self.cuisine.is_some()
            || self.serves.is_some()
            || self.rating.is_some()
            || self.max_time.is_some()
    }

    /// The searchable endpoint is only involved when a filter is active; the
    /// plain listing handles the rest.
    pub fn endpoint(&self) -> &'static str {
        if self.has_filters() {
            "/api/recipes/search"
        } else {
            "/api/recipes"
        }
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(title) = &self.title {
            params.push(("title", title.clone()));
        }
        if let Some(cuisine) = &self.cuisine {
            params.push(("cuisine", cuisine.clone()));
        }
        if let Some(rating) = self.rating {
            params.push(("rating", format!("<={rating}")));
        }
        if let Some(serves) = &self.serves {
            params.push(("serves", serves.clone()));
        }
        if let Some(max_time) = self.max_time {
            params.push(("total_time", format!("<={max_time}")));
        }
        params
    }
}

#[async_trait]
pub trait RecipeFetcher: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchResponse>;
    async fn fetch_recipe(&self, id: i32) -> Result<Option<Recipe>>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn error_message(response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => anyhow!("server error ({}): {}", status, body.error),
            Err(_) => anyhow!("server error ({})", status),
        }
    }
}

#[async_trait]
impl RecipeFetcher for HttpFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchResponse> {
        let url = format!("{}{}", self.base_url, request.endpoint());
        let response = self
            .client
            .get(&url)
            .query(&request.query_params())
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        if !response.status().is_success() {
            return Err(Self::error_message(response).await);
        }

        response
            .json::<SearchResponse>()
            .await
            .context("invalid response body")
    }

    async fn fetch_recipe(&self, id: i32) -> Result<Option<Recipe>> {
        let url = format!("{}/api/recipes/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_message(response).await);
        }

        let recipe = response
            .json::<Recipe>()
            .await
            .context("invalid response body")?;
        Ok(Some(recipe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_listing_when_no_filters() {
        let request = PageRequest {
            page: 2,
            limit: 15,
            ..Default::default()
        };
        assert!(!request.has_filters());
        assert_eq!(request.endpoint(), "/api/recipes");
        assert_eq!(
            request.query_params(),
            vec![("page", "2".to_string()), ("limit", "15".to_string())]
        );
    }

    #[test]
    fn test_any_filter_selects_search_endpoint() {
        let request = PageRequest {
            page: 1,
            limit: 15,
            serves: Some("4".to_string()),
            ..Default::default()
        };
        assert!(request.has_filters());
        assert_eq!(request.endpoint(), "/api/recipes/search");
    }

    #[test]
    fn test_rating_and_time_are_sent_as_at_most() {
        let request = PageRequest {
            page: 1,
            limit: 15,
            rating: Some(4),
            max_time: Some(45),
            ..Default::default()
        };
        let params = request.query_params();
        assert!(params.contains(&("rating", "<=4".to_string())));
        assert!(params.contains(&("total_time", "<=45".to_string())));
    }
}
