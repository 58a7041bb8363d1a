//! Domain module - typed records extracted from the archive
//!
//! Each module is its own file in the domain/ directory;
//! commonly used items are re-exported here for convenience.

pub mod book;
pub mod pagination;
pub mod recipe;
pub mod reference;

pub use book::Book;
pub use pagination::{dedup_by_identity, paginate, Paginated, PaginationMeta, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use recipe::{
    DetailRecipeLink, DetailRecipeParams, RecipeIdentity, RecipeInfo, RecipeMaterial, RecipeMeta,
    RecipeStep, SearchResult, SimilarRecipes,
};
pub use reference::Reference;
