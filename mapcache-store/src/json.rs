//! Resource builder for JSON schemas and a text mapping configuration.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use mapcache_core::error::{BoxError, MapCacheError};
use mapcache_core::traits::ResourceBuilder;
use mapcache_core::types::SourceBundle;

/// A mapping assembled from a configuration script and two JSON schemas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JsonMapping {
    /// Transformation configuration as UTF-8 text
    pub config: String,
    /// Parsed input schema
    pub input_schema: Value,
    /// Parsed output schema
    pub output_schema: Value,
}

impl JsonMapping {
    /// Title of the input schema, if declared.
    pub fn input_title(&self) -> Option<&str> {
        self.input_schema.get("title").and_then(Value::as_str)
    }

    /// Title of the output schema, if declared.
    pub fn output_title(&self) -> Option<&str> {
        self.output_schema.get("title").and_then(Value::as_str)
    }
}

/// Builds [`JsonMapping`]s.
///
/// Both schemas must be JSON objects and the configuration must be
/// non-empty UTF-8 text.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDocumentBuilder;

impl JsonDocumentBuilder {
    fn parse_schema(role: &str, bytes: &[u8]) -> Result<Value, MapCacheError> {
        let value: Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(MapCacheError::ValidationError(format!(
                "{} schema must be a JSON object",
                role
            )));
        }
        Ok(value)
    }
}

impl ResourceBuilder for JsonDocumentBuilder {
    type Resource = JsonMapping;

    fn build(&self, sources: SourceBundle) -> Result<JsonMapping, BoxError> {
        let config = String::from_utf8(sources.config)?;
        if config.trim().is_empty() {
            return Err(MapCacheError::ValidationError("mapping configuration is empty".into()).into());
        }

        let mapping = JsonMapping {
            config,
            input_schema: Self::parse_schema("input", &sources.input_schema)?,
            output_schema: Self::parse_schema("output", &sources.output_schema)?,
        };
        debug!(
            input = mapping.input_title().unwrap_or("<untitled>"),
            output = mapping.output_title().unwrap_or("<untitled>"),
            "Built JSON mapping"
        );
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(config: &str, input: &str, output: &str) -> SourceBundle {
        SourceBundle::new(config.into(), input.into(), output.into())
    }

    #[test]
    fn test_build_mapping() {
        let mapping = JsonDocumentBuilder
            .build(bundle(
                "map_S_root_S_root = function(){ return {}; };",
                r#"{"title":"orders","type":"object"}"#,
                r#"{"title":"rows","type":"array"}"#,
            ))
            .unwrap();
        assert_eq!(mapping.input_title(), Some("orders"));
        assert_eq!(mapping.output_title(), Some("rows"));
    }

    #[test]
    fn test_rejects_non_object_schema() {
        let err = JsonDocumentBuilder
            .build(bundle("x", "[1,2]", "{}"))
            .unwrap_err();
        assert!(err.to_string().contains("input schema"));
    }

    #[test]
    fn test_rejects_malformed_schema() {
        let err = JsonDocumentBuilder.build(bundle("x", "{}", "{oops")).unwrap_err();
        assert!(err.downcast_ref::<MapCacheError>().is_some());
    }

    #[test]
    fn test_rejects_empty_config() {
        assert!(JsonDocumentBuilder.build(bundle("  ", "{}", "{}")).is_err());
    }
}
