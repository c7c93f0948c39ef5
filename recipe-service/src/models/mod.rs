//! Domain models for the recipe service.

pub mod chat;
pub mod recipe;

pub use chat::{ChatCompletion, ChatCompletionRequest, ChatMessage, Choice, Role, Usage};
pub use recipe::{RecipeRequest, RecipeResponse};
