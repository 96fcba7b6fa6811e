use crate::config::DotspacesConfig;

/// Public location of the generated schema.
const SCHEMA_ID: &str =
    "https://raw.githubusercontent.com/dotspaces/dotspaces/main/dotspaces.schema.json";

/// Generates a JSON Schema for the Dotspaces configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(DotspacesConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
    }

    schema
}

/// Generates a pretty-printed JSON Schema string for the Dotspaces configuration.
#[must_use]
pub fn generate_schema_json() -> String {
    let schema = generate_schema();
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_schema_produces_valid_json() {
        let schema_json = generate_schema_json();
        let parsed: serde_json::Value = serde_json::from_str(&schema_json).unwrap();

        assert_eq!(parsed["$id"], SCHEMA_ID);
        assert_eq!(parsed["$schema"], "https://json-schema.org/draft/2020-12/schema");
        assert_eq!(parsed["title"], "DotspacesConfig");
        assert!(parsed["properties"]["settings"].is_object());
        assert!(parsed["properties"]["indicators"].is_object());
    }

    #[test]
    fn test_schema_describes_settings_toggles() {
        let parsed: serde_json::Value = serde_json::from_str(&generate_schema_json()).unwrap();
        let settings = &parsed["$defs"]["SettingsConfig"]["properties"];

        assert!(settings["panelScroll"].is_object());
        assert!(settings["dynamicWorkspaces"].is_object());
    }

    #[test]
    fn test_schema_contains_icon_size_policy() {
        let parsed: serde_json::Value = serde_json::from_str(&generate_schema_json()).unwrap();
        assert!(parsed["$defs"]["IconSizePolicy"].is_object());
        assert!(parsed["$defs"]["DynamicIconSize"].is_object());
    }
}
