//! Value types passed between the cache and its collaborators.

use serde::{Deserialize, Serialize};

/// The three entry-store keys a mapping resource is built from.
///
/// The cache never records these alongside an entry; every rebuild uses the
/// keys supplied by the current caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKeys {
    /// Key of the transformation configuration
    pub config_key: String,
    /// Key of the input schema
    pub input_schema_key: String,
    /// Key of the output schema
    pub output_schema_key: String,
}

impl SourceKeys {
    /// Creates a key triple.
    pub fn new(
        config_key: impl Into<String>,
        input_schema_key: impl Into<String>,
        output_schema_key: impl Into<String>,
    ) -> Self {
        Self {
            config_key: config_key.into(),
            input_schema_key: input_schema_key.into(),
            output_schema_key: output_schema_key.into(),
        }
    }
}

/// Raw bytes resolved for each of the three source keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceBundle {
    /// Transformation configuration bytes
    pub config: Vec<u8>,
    /// Input schema bytes
    pub input_schema: Vec<u8>,
    /// Output schema bytes
    pub output_schema: Vec<u8>,
}

impl SourceBundle {
    /// Bundles the three resolved streams.
    pub fn new(config: Vec<u8>, input_schema: Vec<u8>, output_schema: Vec<u8>) -> Self {
        Self {
            config,
            input_schema,
            output_schema,
        }
    }
}
