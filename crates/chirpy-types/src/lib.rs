//! Data types shared by the chirpy crates.
//!
//! `models` holds what the repository hands out, `api` holds request and
//! response bodies plus the JWT claim set.

pub mod api;
pub mod models;
