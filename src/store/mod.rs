//! Row storage for the CRUD endpoints.
//! Used by: handlers::items, state.

pub mod sqlite;
