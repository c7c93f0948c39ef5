//! Prompt construction for recipe generation.
//!
//! Every request produces exactly two messages: the fixed system instruction
//! and a user message built from the request's ingredients and preferences.

use crate::models::{ChatMessage, RecipeRequest};

pub const SYSTEM_PROMPT: &str = "You are an assistant that receives a list of ingredients that a user has and suggests a recipe they could make with some or all of those ingredients. You don't need to use every ingredient they mention in your recipe. The recipe can include additional ingredients they didn't mention, but try not to include too many extra ingredients. Format your response in markdown to make it easier to render to a web page.";

const CLOSING: &str = "Please give me a recipe you'd recommend I make!";

/// Build the user message.
///
/// The "Also, ..." clause is emitted only when `personal` has at least one
/// entry; an absent or empty list leaves no trace in the prompt.
pub fn user_message(ingredients: &[String], personal: Option<&[String]>) -> String {
    let mut message = String::from("I have ");
    message.push_str(&ingredients.join(", "));
    message.push_str(". ");

    if let Some(personal) = personal.filter(|p| !p.is_empty()) {
        message.push_str("Also, ");
        message.push_str(&personal.join(", "));
        message.push_str(". ");
    }

    message.push_str(CLOSING);
    message
}

pub fn build_messages(request: &RecipeRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_message(
            &request.ingredients,
            request.personal.as_deref(),
        )),
    ]
}
