// prompt-refiner-rs/src/refine.rs
//
// Prompt refinement: prefix the user's prompt with the refiner instruction,
// send it to the completion service and fold the outcome into a
// `RefinementResult`. Refinement never fails towards its caller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::completion_client::{CompletionRequest, CompletionService};
use crate::config::SamplingConfig;

/// Instruction prepended to every user prompt
pub const REFINER_INSTRUCTION: &str =
    "You are a prompt refiner. Use advanced prompt engineering techniques to refine the user's prompt: ";

pub const ERROR_PREFIX: &str = "Failed to refine prompt due to an error: ";

pub const EMPTY_REFINEMENT_MESSAGE: &str =
    "Failed to refine prompt: the completion service returned an empty refinement";

/// Outcome of one refinement attempt, serialized as the response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementResult {
    pub original_prompt: String,
    pub refined_prompt: String,
    pub refinement_successful: bool,
    pub error_message: Option<String>,
}

impl RefinementResult {
    pub fn success(original_prompt: &str, refined_prompt: String) -> Self {
        Self {
            original_prompt: original_prompt.to_string(),
            refined_prompt,
            refinement_successful: true,
            error_message: None,
        }
    }

    pub fn failure(original_prompt: &str, error_message: impl Into<String>) -> Self {
        Self {
            original_prompt: original_prompt.to_string(),
            refined_prompt: String::new(),
            refinement_successful: false,
            error_message: Some(error_message.into()),
        }
    }
}

/// Builds the text sent to the completion service
pub fn build_refinement_prompt(user_prompt: &str) -> String {
    format!("{}{}", REFINER_INSTRUCTION, user_prompt)
}

/// Stateless refine operation over an injected completion service
#[derive(Clone)]
pub struct PromptRefiner {
    completion: Arc<dyn CompletionService>,
    sampling: SamplingConfig,
}

impl PromptRefiner {
    pub fn new(completion: Arc<dyn CompletionService>, sampling: SamplingConfig) -> Self {
        Self { completion, sampling }
    }

    /// Refine `user_prompt`
    ///
    /// Service failures are captured in the result: `refinement_successful`
    /// is false, `refined_prompt` is empty and `error_message` carries the
    /// cause. An empty completion is reported the same way.
    pub async fn refine(&self, user_prompt: &str) -> RefinementResult {
        let request = CompletionRequest::new(
            self.completion.model(),
            build_refinement_prompt(user_prompt),
            &self.sampling,
        );

        match self.completion.complete(&request).await {
            Ok(response) => {
                let refined = response
                    .choices
                    .first()
                    .map(|choice| choice.text.trim().to_string())
                    .unwrap_or_default();

                if refined.is_empty() {
                    log::warn!(
                        "Completion service returned no usable text ({} choices)",
                        response.choices.len()
                    );
                    RefinementResult::failure(user_prompt, EMPTY_REFINEMENT_MESSAGE)
                } else {
                    RefinementResult::success(user_prompt, refined)
                }
            }
            Err(err) => {
                log::warn!("Prompt refinement failed: {}", err);
                RefinementResult::failure(user_prompt, format!("{}{}", ERROR_PREFIX, err))
            }
        }
    }
}

impl std::fmt::Debug for PromptRefiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRefiner")
            .field("model", &self.completion.model())
            .field("sampling", &self.sampling)
            .finish()
    }
}
