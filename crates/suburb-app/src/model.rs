// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::SearchId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchId")]
    pub id: SearchId,
    #[serde(rename = "searchText")]
    pub query_text: String,
}

/// A canned search shown next to the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    pub label: String,
    pub text: String,
}

impl QuickLink {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStatus {
    Pending,
    Resolved,
    Failed,
}

impl RowStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "resolved" => Some(Self::Resolved),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub id: SearchId,
    pub display_text: String,
    pub site_count: i64,
    pub page_count: i64,
    pub price_count: i64,
    pub average_price: f64,
    pub status: RowStatus,
    pub submitted_at: OffsetDateTime,
    pub elapsed_seconds: Option<f64>,
}

impl HistoryRow {
    pub fn pending(request: &SearchRequest, submitted_at: OffsetDateTime) -> Self {
        Self {
            id: request.id,
            display_text: request.query_text.clone(),
            site_count: 0,
            page_count: 0,
            price_count: 0,
            average_price: 0.0,
            status: RowStatus::Pending,
            submitted_at,
            elapsed_seconds: None,
        }
    }

    pub fn price_display(&self) -> String {
        crate::format::format_price(self.average_price)
    }
}

/// A decoded success body from `POST /search`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SearchResponseBody")]
pub struct SearchResult {
    pub request_id: SearchId,
    pub site_count: i64,
    pub page_count: i64,
    pub price_count: i64,
    pub average_price: f64,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub listing_count: Option<i64>,
    pub elapsed_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct EchoedRequest {
    #[serde(rename = "searchId")]
    search_id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponseBody {
    request: EchoedRequest,
    #[serde(default)]
    site_count: i64,
    #[serde(default)]
    page_count: i64,
    #[serde(default)]
    price_count: i64,
    #[serde(default)]
    avg_price: f64,
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    post_code: Option<String>,
    #[serde(default)]
    listing_count: Option<i64>,
    #[serde(default)]
    elapsed_time: Option<f64>,
}

impl From<SearchResponseBody> for SearchResult {
    fn from(body: SearchResponseBody) -> Self {
        Self {
            request_id: body.request.search_id,
            site_count: body.site_count,
            page_count: body.page_count,
            price_count: body.price_count,
            average_price: body.avg_price,
            suburb: body.suburb,
            state: body.state,
            postal_code: body.post_code,
            listing_count: body.listing_count,
            elapsed_time: body.elapsed_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    /// HTTP status when the server answered; `None` for transport errors.
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Resolved(SearchResult),
    Failed(SearchFailure),
}

/// Field values written into a row by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct RowUpdate {
    pub site_count: i64,
    pub page_count: i64,
    pub price_count: i64,
    pub average_price: f64,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub elapsed_seconds: Option<f64>,
    pub status: RowStatus,
}

impl RowUpdate {
    pub fn failed() -> Self {
        Self {
            site_count: 0,
            page_count: 0,
            price_count: 0,
            average_price: 0.0,
            suburb: None,
            state: None,
            postal_code: None,
            elapsed_seconds: None,
            status: RowStatus::Failed,
        }
    }
}

impl From<&SearchResult> for RowUpdate {
    fn from(result: &SearchResult) -> Self {
        Self {
            site_count: result.site_count,
            page_count: result.page_count,
            price_count: result.price_count,
            average_price: result.average_price,
            suburb: result.suburb.clone(),
            state: result.state.clone(),
            postal_code: result.postal_code.clone(),
            elapsed_seconds: result.elapsed_time,
            status: RowStatus::Resolved,
        }
    }
}
