/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: signup and login
/// - `tasks`, `habits`, `goals`, `journal`: owner-scoped collections
/// - `summary`: dashboard metrics
/// - `export`: spreadsheet download
/// - `billing`: plan status, checkout, and portal sessions
/// - `webhook`: inbound provider events
/// - `integrations`: placeholder integrations

pub mod auth;
pub mod billing;
pub mod export;
pub mod goals;
pub mod habits;
pub mod health;
pub mod integrations;
pub mod journal;
pub mod summary;
pub mod tasks;
pub mod webhook;

use serde::Serialize;

/// Body for mutations that report only success
///
/// Update/delete return this even when the id matched zero rows: ownership
/// mismatches are a silent no-op, not an error.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
