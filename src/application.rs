//! Application layer
//!
//! Use cases that compose the upstream client with the extraction engine.

pub mod koreansool_service;
pub mod parsing_service;

pub use koreansool_service::{KoreansoolService, PageRequest, RecipeQuery, RecipeResponse};
pub use parsing_service::ParsingService;
