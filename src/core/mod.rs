// CobbleLog - core/mod.rs
//
// Core business logic layer: record model, search, CSV projection and the
// log store interface.
// Must NOT depend on: ui, platform, app.

pub mod export;
pub mod filter;
pub mod model;
pub mod store;
