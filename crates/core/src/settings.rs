use crate::update::DEFAULT_PROMPT;
use serde::Serialize;

/// Model used when `ai.model` is not configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Starting content of a freshly created settings file.
pub const SETTINGS_TEMPLATE: &str = r#"# codemorph settings

# Gemini API key (required). GEMINI_API_KEY overrides this value.
# apiKey = ""

# Instruction sent ahead of the file content.
# defaultPrompt = "Improve and optimize this code while maintaining its functionality. Add comments where necessary and follow best practices."

# Write the updated content back to disk instead of printing it.
# autoSave = false

[ai]
# model = "gemini-2.0-flash"
"#;

/// The user settings record.
///
/// Every key is read independently: a missing or mistyped key falls back to
/// its default without affecting the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `None` when unset or empty; validated by the caller.
    pub api_key: Option<String>,
    pub model: String,
    pub default_prompt: String,
    pub auto_save: bool,
}

/// Values layered on top of the settings file, usually from flags or the
/// environment. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub default_prompt: Option<String>,
    pub auto_save: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            default_prompt: DEFAULT_PROMPT.to_string(),
            auto_save: false,
        }
    }
}

impl Settings {
    /// Parse a settings document.
    ///
    /// An unparsable document yields the defaults.
    pub fn from_toml_str(source: &str) -> Self {
        match source.parse::<toml::Table>() {
            Ok(table) => Self::from_table(&table),
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Read each recognized key from a parsed settings table.
    pub fn from_table(table: &toml::Table) -> Self {
        let defaults = Self::default();

        let model = table
            .get("ai")
            .and_then(|ai| ai.as_table())
            .and_then(|ai| string_key(ai, "ai.model", "model"));

        Self {
            api_key: string_key(table, "apiKey", "apiKey"),
            model: model.unwrap_or(defaults.model),
            default_prompt: string_key(table, "defaultPrompt", "defaultPrompt")
                .unwrap_or(defaults.default_prompt),
            auto_save: bool_key(table, "autoSave").unwrap_or(defaults.auto_save),
        }
    }

    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(key) = non_empty(overrides.api_key) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty(overrides.model) {
            self.model = model;
        }
        if let Some(prompt) = non_empty(overrides.default_prompt) {
            self.default_prompt = prompt;
        }
        if let Some(auto_save) = overrides.auto_save {
            self.auto_save = auto_save;
        }
        self
    }

    /// Render the effective settings as TOML, with the API key masked.
    pub fn to_masked_toml(&self) -> Result<String, toml::ser::Error> {
        #[derive(Serialize)]
        struct Ai<'a> {
            model: &'a str,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Masked<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            api_key: Option<String>,
            default_prompt: &'a str,
            auto_save: bool,
            ai: Ai<'a>,
        }

        toml::to_string_pretty(&Masked {
            api_key: self.api_key.as_deref().map(mask_secret),
            default_prompt: &self.default_prompt,
            auto_save: self.auto_save,
            ai: Ai { model: &self.model },
        })
    }
}

/// Keep the last four characters of a secret, hide the rest.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

fn string_key(table: &toml::Table, name: &str, key: &str) -> Option<String> {
    match table.get(key)? {
        toml::Value::String(value) => non_empty(Some(value.clone())),
        other => {
            log::warn!("Ignoring `{}`: expected a string, found {}", name, other.type_str());
            None
        }
    }
}

fn bool_key(table: &toml::Table, key: &str) -> Option<bool> {
    match table.get(key)? {
        toml::Value::Boolean(value) => Some(*value),
        other => {
            log::warn!("Ignoring `{}`: expected a boolean, found {}", key, other.type_str());
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let settings = Settings::from_toml_str("");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model, "gemini-2.0-flash");
        assert_eq!(settings.default_prompt, DEFAULT_PROMPT);
        assert!(!settings.auto_save);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_all_keys() {
        let settings = Settings::from_toml_str(
            r#"
apiKey = "secret"
defaultPrompt = "Add type hints"
autoSave = true

[ai]
model = "gemini-1.5-pro"
"#,
        );

        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.default_prompt, "Add type hints");
        assert!(settings.auto_save);
        assert_eq!(settings.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_mistyped_key_falls_back_alone() {
        let settings = Settings::from_toml_str(
            r#"
apiKey = "secret"
autoSave = "yes"
defaultPrompt = 42
"#,
        );

        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert!(!settings.auto_save);
        assert_eq!(settings.default_prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let settings = Settings::from_toml_str(
            r#"
apiKey = "   "
defaultPrompt = ""

[ai]
model = ""
"#,
        );

        assert!(settings.api_key.is_none());
        assert_eq!(settings.default_prompt, DEFAULT_PROMPT);
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_unparsable_document_yields_defaults() {
        let settings = Settings::from_toml_str("apiKey = \"unterminated");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_ai_must_be_a_table() {
        let settings = Settings::from_toml_str("ai = \"gemini-1.5-pro\"");
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let settings = Settings::from_toml_str("apiKey = \"from-file\"").with_overrides(
            SettingsOverrides {
                api_key: Some("from-env".to_string()),
                model: Some("gemini-2.5-pro".to_string()),
                default_prompt: None,
                auto_save: Some(true),
            },
        );

        assert_eq!(settings.api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.model, "gemini-2.5-pro");
        assert_eq!(settings.default_prompt, DEFAULT_PROMPT);
        assert!(settings.auto_save);
    }

    #[test]
    fn test_empty_override_does_not_clear_file_value() {
        let settings = Settings::from_toml_str("apiKey = \"from-file\"").with_overrides(
            SettingsOverrides {
                api_key: Some(String::new()),
                ..Default::default()
            },
        );

        assert_eq!(settings.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        assert_eq!(Settings::from_toml_str(SETTINGS_TEMPLATE), Settings::default());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdefgh"), "****efgh");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn test_masked_toml_hides_key() {
        let settings = Settings {
            api_key: Some("AIzaSyExampleKey1234".to_string()),
            ..Default::default()
        };

        let rendered = settings.to_masked_toml().unwrap();
        assert!(!rendered.contains("AIzaSyExampleKey1234"));
        assert!(rendered.contains("1234"));
        assert!(rendered.contains("model = \"gemini-2.0-flash\""));
        assert!(rendered.contains("autoSave = false"));
    }
}
