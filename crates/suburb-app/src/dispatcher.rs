// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::history::{ReconcileError, SearchHistory};
use crate::ids::{SearchId, SearchIdCounter};
use crate::model::{HistoryRow, RowUpdate, SearchOutcome, SearchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryVisibility {
    Hidden,
    Visible,
}

/// Creates pending rows for new searches and routes their outcomes back.
#[derive(Debug, Clone)]
pub struct SearchDispatcher {
    ids: SearchIdCounter,
    history: SearchHistory,
    visibility: HistoryVisibility,
}

impl Default for SearchDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchDispatcher {
    pub fn new() -> Self {
        Self {
            ids: SearchIdCounter::new(),
            history: SearchHistory::new(),
            visibility: HistoryVisibility::Hidden,
        }
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub const fn visibility(&self) -> HistoryVisibility {
        self.visibility
    }

    pub fn submit(&mut self, query_text: impl Into<String>) -> SearchRequest {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        self.submit_at(query_text, now)
    }

    /// Inserts the pending row and returns the request the caller must send.
    pub fn submit_at(
        &mut self,
        query_text: impl Into<String>,
        submitted_at: OffsetDateTime,
    ) -> SearchRequest {
        let request = SearchRequest {
            id: self.ids.next_id(),
            query_text: query_text.into(),
        };
        // Ids come from our own counter, so this insert cannot collide.
        if let Err(error) = self
            .history
            .insert(HistoryRow::pending(&request, submitted_at))
        {
            warn!(%error, "pending row not inserted");
        }
        self.visibility = HistoryVisibility::Visible;
        info!(search_id = %request.id, text = %request.query_text, "search submitted");
        request
    }

    /// Applies the outcome of the request `id`. A successful body is routed by
    /// the id the server echoed back.
    pub fn complete(
        &mut self,
        id: SearchId,
        outcome: SearchOutcome,
    ) -> Result<&HistoryRow, ReconcileError> {
        match outcome {
            SearchOutcome::Resolved(result) => {
                if result.request_id != id {
                    debug!(
                        search_id = %id,
                        echoed_id = %result.request_id,
                        "server echoed a different search id"
                    );
                }
                info!(
                    search_id = %result.request_id,
                    sites = result.site_count,
                    pages = result.page_count,
                    prices = result.price_count,
                    "search resolved"
                );
                self.history
                    .update(result.request_id, RowUpdate::from(&result))
            }
            SearchOutcome::Failed(failure) => {
                match failure.status {
                    Some(status) => {
                        warn!(search_id = %id, status, message = %failure.message, "search failed")
                    }
                    None => warn!(search_id = %id, message = %failure.message, "search failed"),
                }
                self.history.update(id, RowUpdate::failed())
            }
        }
    }
}
