// CobbleLog - platform/mod.rs
//
// Platform abstraction layer: config directories and the HTTP log store.
// Dependencies: core (store trait), util.
// Must NOT depend on: app, ui.

pub mod config;
pub mod http_store;
