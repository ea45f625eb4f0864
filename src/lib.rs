// CobbleLog - lib.rs
//
// Library entry point, exposing all non-GUI-loop modules for integration
// testing and the headless export path.
//
// The eframe::App implementation (`gui`) lives in the binary crate.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
