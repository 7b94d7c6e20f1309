//! Page configuration
//!
//! Element ids and console labels default to the shipped page markup. A host
//! can override any subset by passing JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be parsed
    #[error("Invalid page configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value parsed but is unusable
    #[error("Invalid page configuration: {message}")]
    Invalid {
        /// What is wrong
        message: String,
    },
}

/// Ids and labels the page logic relies on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Calculator form
    pub form_id: String,
    /// First operand input
    pub first_input_id: String,
    /// Second operand input
    pub second_input_id: String,
    /// Operator select
    pub operator_id: String,
    /// Result display
    pub result_id: String,
    /// Debug info panel that collects global errors
    pub debug_info_id: String,
    /// Container of the console demo buttons
    pub demo_buttons_id: String,
    /// Number of console demo buttons the page should have
    pub expected_demo_buttons: usize,
    /// Label used by the count button
    pub counter_label: String,
    /// Label used by the group buttons
    pub group_label: String,
    /// Label used by the timer buttons
    pub timer_label: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            form_id: "calc-form".to_string(),
            first_input_id: "first-num".to_string(),
            second_input_id: "second-num".to_string(),
            operator_id: "operator".to_string(),
            result_id: "result".to_string(),
            debug_info_id: "debug-info".to_string(),
            demo_buttons_id: "error-btns".to_string(),
            expected_demo_buttons: 15,
            counter_label: "Button click counter".to_string(),
            group_label: "Console Group Demo".to_string(),
            timer_label: "Performance Timer".to_string(),
        }
    }
}

impl PageConfig {
    /// Parses configuration JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects empty element ids
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ids = [
            ("form_id", &self.form_id),
            ("first_input_id", &self.first_input_id),
            ("second_input_id", &self.second_input_id),
            ("operator_id", &self.operator_id),
            ("result_id", &self.result_id),
            ("debug_info_id", &self.debug_info_id),
            ("demo_buttons_id", &self.demo_buttons_id),
        ];
        for (name, id) in ids {
            if id.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("{name} must not be empty"),
                });
            }
        }
        Ok(())
    }

    /// Selectors that must exist once the page has loaded
    #[must_use]
    pub fn required_selectors(&self) -> Vec<String> {
        [
            &self.form_id,
            &self.result_id,
            &self.first_input_id,
            &self.second_input_id,
            &self.operator_id,
        ]
        .iter()
        .map(|id| format!("#{id}"))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ids() {
        let config = PageConfig::default();
        assert_eq!(config.form_id, "calc-form");
        assert_eq!(config.result_id, "result");
        assert_eq!(config.expected_demo_buttons, 15);
    }

    #[test]
    fn test_required_selectors_order() {
        let config = PageConfig::default();
        assert_eq!(
            config.required_selectors(),
            vec![
                "#calc-form",
                "#result",
                "#first-num",
                "#second-num",
                "#operator"
            ]
        );
    }

    #[test]
    fn test_from_json_partial() {
        let config = PageConfig::from_json(r#"{"result_id": "output"}"#).unwrap();
        assert_eq!(config.result_id, "output");
        assert_eq!(config.form_id, "calc-form");
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = PageConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_rejects_empty_id() {
        let err = PageConfig::from_json(r#"{"operator_id": " "}"#).unwrap_err();
        assert!(err.to_string().contains("operator_id"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = PageConfig {
            expected_demo_buttons: 3,
            ..PageConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(PageConfig::from_json(&json).unwrap(), config);
    }
}
