// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid period '{0}', expected YYYY-MM")]
    InvalidPeriod(String),

    #[error("Invalid amount '{0}': {1}")]
    InvalidAmount(String, &'static str),

    #[error("Invalid kind '{0}', expected income|expense")]
    InvalidKind(String),

    #[error("Unknown document kind '{0}', expected proposal|invoice")]
    InvalidDocumentKind(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Could not allocate a unique {kind} number for {year} after {attempts} attempts")]
    SequenceExhausted {
        kind: &'static str,
        year: i32,
        attempts: u32,
    },

    #[error("Rusqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
