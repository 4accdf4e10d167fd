use serde::{Deserialize, Serialize};

/// Per-user preferences stored by the external API at `/settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub theme: Option<String>,
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

/// Partial update; absent fields are left untouched upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.currency.is_none() && self.language.is_none() && self.theme.is_none()
    }
}
