//! Delimited-text rendering of array values.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;
use tracing::debug;

use mapcache_core::constants::{ROW_DELIMITER, ROW_QUOTE};
use mapcache_core::error::{MapCacheError, Result};

use crate::schema::{ArraySchema, FieldKind};

/// Writes one array value as one header-less delimited row.
///
/// Fields containing the delimiter, the quote character, or a line break are
/// quoted and embedded quotes are doubled. Nulls render as empty fields.
#[derive(Clone, Copy, Debug)]
pub struct DelimitedRowWriter {
    delimiter: u8,
    quote: u8,
}

impl DelimitedRowWriter {
    /// Comma-delimited, double-quoted writer.
    pub fn new() -> Self {
        Self {
            delimiter: ROW_DELIMITER,
            quote: ROW_QUOTE,
        }
    }

    /// Uses `delimiter` between fields.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parses `text` as JSON and renders it as a row.
    pub fn write_array_text(&self, schema: &ArraySchema, text: &str) -> Result<String> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            MapCacheError::MalformedArrayValue(format!("'{}' is not valid JSON: {}", schema.name, e))
        })?;
        self.write_array_field(schema, &value)
    }

    /// Renders an array value as a row.
    pub fn write_array_field(&self, schema: &ArraySchema, value: &Value) -> Result<String> {
        let items = value.as_array().ok_or_else(|| {
            MapCacheError::MalformedArrayValue(format!("'{}' expects an array", schema.name))
        })?;

        if !schema.fields.is_empty() && schema.fields.len() != items.len() {
            return Err(MapCacheError::MalformedArrayValue(format!(
                "'{}' declares {} fields, value has {}",
                schema.name,
                schema.fields.len(),
                items.len()
            )));
        }

        let fields = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let kind = schema.fields.get(i).map_or(FieldKind::Any, |f| f.kind);
                if !FieldKind::Any.accepts(item) || !kind.accepts(item) {
                    return Err(MapCacheError::MalformedArrayValue(format!(
                        "'{}' element {} does not match {:?}",
                        schema.name, i, kind
                    )));
                }
                Ok(render_scalar(item))
            })
            .collect::<Result<Vec<_>>>()?;

        // A lone empty field would otherwise be written as `""`
        if fields.is_empty() || (fields.len() == 1 && fields[0].is_empty()) {
            return Ok(String::new());
        }

        let line = self.render_row(&fields)?;
        debug!(schema = %schema.name, fields = fields.len(), "Rendered delimited row");
        Ok(line)
    }

    fn render_row(&self, fields: &[String]) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(fields)
            .map_err(|e| MapCacheError::MalformedArrayValue(e.to_string()))?;
        let mut bytes = writer
            .into_inner()
            .map_err(|e| MapCacheError::MalformedArrayValue(e.to_string()))?;

        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        String::from_utf8(bytes).map_err(|e| MapCacheError::MalformedArrayValue(e.to_string()))
    }
}

impl Default for DelimitedRowWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
