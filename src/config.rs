use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::ids;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Preferred language for titles and descriptions pulled out of
    /// documents.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Ordered component ids the main-window wizard steps through.
    #[serde(default = "default_wizard_pages")]
    pub wizard_pages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            wizard_pages: default_wizard_pages(),
        }
    }
}

impl TryFrom<&str> for Config {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        let config = toml::from_str(value)?;
        Ok(config)
    }
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_wizard_pages() -> Vec<String> {
    [ids::OPEN_BENCHMARK, ids::TAILORING, ids::REFINES, ids::SCAN]
        .map(String::from)
        .to_vec()
}
