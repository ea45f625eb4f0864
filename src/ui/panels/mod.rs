// CobbleLog - ui/panels/mod.rs

pub mod about;
pub mod confirm;
pub mod edit;
pub mod search;
pub mod table;
pub mod warnings;
