// CobbleLog - app/mod.rs
//
// Application layer: record cache, store worker, navigation, view state,
// headless export.
// Dependencies: core layer, platform config.
// Must NOT depend on: ui.

pub mod cache;
pub mod headless;
pub mod navigation;
pub mod state;
pub mod store_worker;
