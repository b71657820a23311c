use crate::conversation::{PersonaConfig, TokenBudget};
use crate::error::ConfigError;
use crate::providers::BackendOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One persona as declared in the config file. The system prompt lives in
/// its own file, not inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSettings {
    pub model: String,
    pub system_prompt_file: PathBuf,
}

/// Token-budgeting knobs for context trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    pub enabled: bool,
    pub max_tokens: u64,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_tokens: 4_000,
        }
    }
}

/// Process-wide configuration, loaded once at startup from a TOML file with
/// environment overrides applied on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub initial_message: String,
    pub persona_one: PersonaSettings,
    pub persona_two: PersonaSettings,
    pub budget: BudgetSettings,
    /// Free-form backend sampling parameters, forwarded verbatim.
    pub options: BackendOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".into(),
            initial_message: "Let's discuss the future of AI. What are your thoughts on its \
                              potential impact on society?"
                .into(),
            persona_one: PersonaSettings {
                model: "llama3".into(),
                system_prompt_file: PathBuf::from("system_prompt_1.txt"),
            },
            persona_two: PersonaSettings {
                model: "mistral".into(),
                system_prompt_file: PathBuf::from("system_prompt_2.txt"),
            },
            budget: BudgetSettings::default(),
            options: BackendOptions::default(),
        }
    }
}

impl Config {
    /// Load from `path` (falling back to defaults when the file does not
    /// exist), apply environment overrides, and validate. Any failure here
    /// is fatal at startup; no partial run is attempted.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-style overrides. The variable names match the
    /// original deployment's `.env` contract, so existing setups keep
    /// working. The lookup is injected so tests never touch process
    /// environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(value) = lookup("OLLAMA_ENDPOINT") {
            self.endpoint = value;
        }
        if let Some(value) = lookup("MODEL_1") {
            self.persona_one.model = value;
        }
        if let Some(value) = lookup("MODEL_2") {
            self.persona_two.model = value;
        }
        if let Some(value) = lookup("INITIAL_PROMPT") {
            self.initial_message = value;
        }
        if let Some(value) = lookup("MAX_TOKENS") {
            match value.trim().parse::<u64>() {
                Ok(n) => self.budget.max_tokens = n,
                Err(e) => {
                    return Err(ConfigError::Override {
                        name: "MAX_TOKENS",
                        value,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation("endpoint must not be empty".into()));
        }
        if self.persona_one.model.trim().is_empty() || self.persona_two.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "persona model names must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Read both system-prompt files and produce the runtime persona pair.
    pub fn load_personas(&self) -> Result<[PersonaConfig; 2], ConfigError> {
        Ok([
            Self::load_persona(&self.persona_one)?,
            Self::load_persona(&self.persona_two)?,
        ])
    }

    fn load_persona(settings: &PersonaSettings) -> Result<PersonaConfig, ConfigError> {
        let prompt = std::fs::read_to_string(&settings.system_prompt_file).map_err(|source| {
            ConfigError::PromptFile {
                path: settings.system_prompt_file.display().to_string(),
                source,
            }
        })?;
        Ok(PersonaConfig {
            model: settings.model.clone(),
            system_prompt: prompt.trim().to_string(),
        })
    }

    pub fn token_budget(&self) -> TokenBudget {
        TokenBudget {
            enabled: self.budget.enabled,
            max_tokens: self.budget.max_tokens,
        }
    }
}
