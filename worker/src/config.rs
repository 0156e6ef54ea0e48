use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file compiled into the worker
const EMBEDDED_CONFIG: &str = include_str!("../config/worker.toml");

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorkerConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Read by `cargo xtask bundle`, which emits it as firebase-config.js;
    /// the worker itself never uses it
    #[serde(default)]
    pub messaging: Option<MessagingConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_badge")]
    pub badge: String,
    #[serde(default = "default_vibrate")]
    pub vibrate: Vec<u32>,
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
    /// Keep the notification on screen until the user acts on it
    #[serde(default = "default_require_interaction")]
    pub require_interaction: bool,
    /// Offer "Close" on push-event notifications too (background ones always have it)
    #[serde(default)]
    pub close_action_on_push: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            icon: default_icon(),
            badge: default_badge(),
            vibrate: default_vibrate(),
            tag_prefix: default_tag_prefix(),
            require_interaction: default_require_interaction(),
            close_action_on_push: false,
        }
    }
}

/// Settings the JS glue passes to the messaging SDK's `initializeApp`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct MessagingConfig {
    pub api_key: String,
    pub project_id: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
}

fn default_app_name() -> String {
    "URChat".to_string()
}

fn default_icon() -> String {
    "/icons/icon-192x192.png".to_string()
}

fn default_badge() -> String {
    "/icons/badge-72x72.png".to_string()
}

fn default_vibrate() -> Vec<u32> {
    vec![200, 100, 200]
}

fn default_tag_prefix() -> String {
    "urchat-".to_string()
}

fn default_require_interaction() -> bool {
    true
}

impl WorkerConfig {
    /// Parse the config bundled at compile time
    pub fn embedded() -> Result<Self> {
        Self::from_toml(EMBEDDED_CONFIG).context("Failed to parse embedded worker.toml")
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Config handed over from JS as a JSON document of the same shape as worker.toml
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).context("Failed to parse config overrides")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app.name.trim().is_empty() {
            anyhow::bail!("[app] name must not be empty");
        }
        if self.notification.tag_prefix.is_empty() {
            anyhow::bail!("[notification] tag_prefix must not be empty");
        }
        if let Some(messaging) = &self.messaging {
            if messaging.project_id.is_empty() {
                anyhow::bail!("[messaging] project_id must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = WorkerConfig::embedded().unwrap();
        assert_eq!(config.app.name, "URChat");
        assert_eq!(config.notification.tag_prefix, "urchat-");
        assert_eq!(config.notification.vibrate, vec![200, 100, 200]);
        assert_eq!(config.notification.icon, "/icons/icon-192x192.png");
        assert_eq!(config.notification.badge, "/icons/badge-72x72.png");
        assert!(config.notification.require_interaction);
        assert!(!config.notification.close_action_on_push);
        assert!(config.messaging.is_none());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config = WorkerConfig::from_toml("").unwrap();
        assert_eq!(config.app.name, "URChat");
        assert_eq!(config.notification.badge, "/icons/badge-72x72.png");
        assert!(config.notification.require_interaction);
    }

    #[test]
    fn test_require_interaction_can_be_turned_off() {
        let config =
            WorkerConfig::from_toml("[notification]\nrequire_interaction = false\n").unwrap();
        assert!(!config.notification.require_interaction);
        assert_eq!(config.notification.tag_prefix, "urchat-");
    }

    #[test]
    fn test_empty_tag_prefix_rejected() {
        let result = WorkerConfig::from_toml("[notification]\ntag_prefix = \"\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_app_name_rejected() {
        let result = WorkerConfig::from_json(r#"{"app": {"name": "  "}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_messaging_config_serializes_camel_case() {
        let config = WorkerConfig::from_toml(
            r#"
[messaging]
api_key = "key"
project_id = "urchat"
messaging_sender_id = "42"
app_id = "1:42:web:abc"
"#,
        )
        .unwrap();

        let messaging = config.messaging.unwrap();
        let json = serde_json::to_value(&messaging).unwrap();
        assert_eq!(json["apiKey"], "key");
        assert_eq!(json["projectId"], "urchat");
        assert_eq!(json["messagingSenderId"], "42");
        assert!(json.get("authDomain").is_none());
    }
}
