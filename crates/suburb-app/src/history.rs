// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashMap;
use thiserror::Error;

use crate::format::canonical_location;
use crate::ids::SearchId;
use crate::model::{HistoryRow, RowUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("no history row for search {0}")]
    UnknownRow(SearchId),
    #[error("search {0} is already in the history")]
    DuplicateRow(SearchId),
}

/// Session search history. Rows are stored oldest first and addressed by id;
/// `rows()` yields them newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHistory {
    rows: Vec<HistoryRow>,
    index: HashMap<SearchId, usize>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: HistoryRow) -> Result<(), ReconcileError> {
        if self.index.contains_key(&row.id) {
            return Err(ReconcileError::DuplicateRow(row.id));
        }
        self.index.insert(row.id, self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    pub fn get(&self, id: SearchId) -> Option<&HistoryRow> {
        self.index.get(&id).and_then(|position| self.rows.get(*position))
    }

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &HistoryRow> + ExactSizeIterator {
        self.rows.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rewrites the row for `id`. Repeated updates overwrite earlier ones.
    pub fn update(&mut self, id: SearchId, update: RowUpdate) -> Result<&HistoryRow, ReconcileError> {
        let position = *self.index.get(&id).ok_or(ReconcileError::UnknownRow(id))?;
        let row = self
            .rows
            .get_mut(position)
            .ok_or(ReconcileError::UnknownRow(id))?;

        if let Some(text) = canonical_location(
            update.suburb.as_deref(),
            update.state.as_deref(),
            update.postal_code.as_deref(),
        ) {
            row.display_text = text;
        }
        row.price_count = update.price_count;
        row.site_count = update.site_count;
        row.page_count = update.page_count;
        row.average_price = update.average_price;
        row.elapsed_seconds = update.elapsed_seconds;
        row.status = update.status;
        Ok(row)
    }
}
