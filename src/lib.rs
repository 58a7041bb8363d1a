//! Ko-Drink - extraction engine and upstream client for the koreansool.kr
//! traditional liquor recipe archive
//!
//! Legacy table markup in, typed records (`Book`, `RecipeInfo`, `SearchResult`,
//! `Reference`) out, with pagination and de-duplication on top.

// Module declarations
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

pub use application::{KoreansoolService, ParsingService};
pub use cli::{run, CliArgs};
