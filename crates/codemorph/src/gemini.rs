use crate::prelude::*;
use codemorph_core::update::GenerationRequest;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini;

/// A remote text generation service.
///
/// Errors are returned as-is; callers decide how to report them. Dropping the
/// returned future abandons the request.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Google Gemini, through the rig Gemini provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiGenerator;

fn create_client(api_key: &str) -> Result<gemini::Client> {
    gemini::Client::builder()
        .api_key(api_key)
        .build()
        .map_err(|e| eyre!("Failed to create Gemini client: {}", e))
}

#[async_trait::async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let client = create_client(&request.api_key)?;
        let agent = client.agent(&request.model).build();

        log::debug!(
            "Sending {} chars to Gemini model {}",
            request.prompt.len(),
            request.model
        );

        agent
            .prompt(&request.prompt)
            .await
            .map_err(|e| eyre!("{}", e))
    }
}
