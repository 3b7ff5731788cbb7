use crate::settings::mask_secret;
use std::fmt;

/// A single-turn generation request sent to the model.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// API key the client is scoped to.
    pub api_key: String,
    /// Model name, passed through without validation.
    pub model: String,
    /// Full prompt text.
    pub prompt: String,
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("api_key", &mask_secret(&self.api_key))
            .field("model", &self.model)
            .field("prompt", &self.prompt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_masks_api_key() {
        let request = GenerationRequest {
            api_key: "AIzaSyExampleSecret1234".to_string(),
            model: "gemini-2.0-flash".to_string(),
            prompt: "Rewrite".to_string(),
        };

        let rendered = format!("{:?}", request);

        assert!(!rendered.contains("AIzaSyExampleSecret1234"));
        assert!(rendered.contains("1234"));
        assert!(rendered.contains("gemini-2.0-flash"));

        let pretty = format!("{:#?}", request);
        assert!(!pretty.contains("AIzaSyExampleSecret1234"));
    }
}
