use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::models::{ChatCompletionRequest, RecipeRequest, RecipeResponse};
use crate::prompt;
use crate::services::{record_provider_call, ChatCompletionProvider, ProviderError};
use crate::startup::AppState;

/// Message returned to clients for every generation failure.
pub const GENERATION_FAILED: &str = "Failed to generate recipe";

/// `POST /get-recipe`
///
/// Builds the two-message prompt, runs one chat completion and returns the
/// first choice's content. Provider failures of any kind are logged in full
/// and reported to the client as a generic 500.
#[tracing::instrument(skip_all)]
pub async fn get_recipe(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    let completion_request = ChatCompletionRequest {
        model: state.config.provider.model.clone(),
        messages: prompt::build_messages(&request),
        max_tokens: state.config.provider.max_tokens,
    };

    tracing::info!(
        ingredient_count = request.ingredients.len(),
        has_personal = request.personal.as_ref().is_some_and(|p| !p.is_empty()),
        "Generating recipe"
    );

    let provider = state.provider.name();
    match generate(state.provider.as_ref(), &completion_request).await {
        Ok(recipe) => {
            record_provider_call(provider, "success");
            tracing::info!(provider, recipe_len = recipe.len(), "Recipe generated");
            Ok(Json(RecipeResponse { recipe }))
        }
        Err(e) => {
            record_provider_call(provider, "error");
            tracing::error!(provider, error = %e, "Error generating recipe");
            Err(AppError::UpstreamFailure(GENERATION_FAILED.to_string()))
        }
    }
}

async fn generate(
    provider: &dyn ChatCompletionProvider,
    request: &ChatCompletionRequest,
) -> Result<String, ProviderError> {
    let completion = provider.complete(request).await?;

    tracing::debug!(
        id = ?completion.id,
        model = ?completion.model,
        choices = completion.choices.len(),
        usage = ?completion.usage,
        "Chat completion response"
    );

    completion
        .first_content()
        .map(str::to_owned)
        .ok_or_else(|| {
            ProviderError::MalformedResponse("response contained no message content".to_string())
        })
}
