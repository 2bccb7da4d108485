// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use thiserror::Error;

/// Rejections raised while recording daily sales entries.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Invalid {field} quantity '{value}': must be a non-negative whole number")]
    InvalidQuantity { field: &'static str, value: String },

    #[error("Dish '{0}' not found")]
    UnknownDish(String),

    #[error("Sales for dish '{dish}' on {date} are already recorded")]
    Duplicate { dish: String, date: NaiveDate },

    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

impl EntryError {
    /// Map a failed insert into the sales table onto the entry it was recording.
    pub fn from_insert(err: rusqlite::Error, dish: &str, date: NaiveDate) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
                    && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                EntryError::Duplicate {
                    dish: dish.to_string(),
                    date,
                }
            }
            other => EntryError::Database(other),
        }
    }
}
