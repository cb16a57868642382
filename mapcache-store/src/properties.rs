//! Host property sources.

use std::collections::HashMap;
use std::env::VarError;

use parking_lot::RwLock;
use tracing::warn;

use mapcache_core::constants::ENV_PROPERTY_PREFIX;
use mapcache_core::error::Result;
use mapcache_core::traits::PropertySource;

/// Process-wide named property store.
///
/// Properties can be changed at runtime; caches pick up a new TTL on their
/// next access.
#[derive(Debug, Default)]
pub struct StaticProperties {
    values: RwLock<HashMap<String, String>>,
}

impl StaticProperties {
    /// Creates an empty property store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `pairs`.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Returns the value of `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    /// Sets `name` to `value`.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(name.into(), value.into());
    }

    /// Removes `name`, returning its previous value.
    pub fn remove(&self, name: &str) -> Option<String> {
        self.values.write().remove(name)
    }
}

impl PropertySource for StaticProperties {
    fn property(&self, name: &str) -> Result<Option<String>> {
        Ok(self.get(name))
    }
}

/// Property source backed by environment variables.
///
/// A property `cachableDuration` is read from `<PREFIX>CACHABLEDURATION`;
/// characters other than ASCII letters and digits become `_`.
#[derive(Clone, Debug)]
pub struct EnvProperties {
    prefix: String,
}

impl EnvProperties {
    /// Reads variables named `<prefix><PROPERTY>`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable consulted for `name`.
    pub fn variable_name(&self, name: &str) -> String {
        let suffix: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

impl Default for EnvProperties {
    fn default() -> Self {
        Self::with_prefix(ENV_PROPERTY_PREFIX)
    }
}

impl PropertySource for EnvProperties {
    fn property(&self, name: &str) -> Result<Option<String>> {
        let variable = self.variable_name(name);
        match std::env::var(&variable) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => {
                warn!(variable = %variable, "Ignoring non-unicode environment value");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_set_get_remove() {
        let props = StaticProperties::new();
        assert_eq!(props.property("cachableDuration").unwrap(), None);

        props.set("cachableDuration", "2500");
        assert_eq!(props.property("cachableDuration").unwrap().as_deref(), Some("2500"));

        assert_eq!(props.remove("cachableDuration").as_deref(), Some("2500"));
        assert_eq!(props.get("cachableDuration"), None);
    }

    #[test]
    fn test_static_from_pairs() {
        let props = StaticProperties::from_pairs([("a", "1"), ("b", "2")]);
        assert_eq!(props.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_env_variable_name() {
        let props = EnvProperties::default();
        assert_eq!(props.variable_name("cachableDuration"), "MAPCACHE_PROP_CACHABLEDURATION");
        assert_eq!(props.variable_name("mapper.ttl-ms"), "MAPCACHE_PROP_MAPPER_TTL_MS");
    }

    #[test]
    fn test_env_lookup() {
        let props = EnvProperties::with_prefix("MAPCACHE_STORE_TEST_");
        std::env::set_var("MAPCACHE_STORE_TEST_TTL", "1234");
        assert_eq!(props.property("ttl").unwrap().as_deref(), Some("1234"));
        assert_eq!(props.property("unset_property").unwrap(), None);
        std::env::remove_var("MAPCACHE_STORE_TEST_TTL");
    }

    #[cfg(unix)]
    #[test]
    fn test_env_non_unicode_is_unset() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let props = EnvProperties::with_prefix("MAPCACHE_UNICODE_TEST_");
        std::env::set_var("MAPCACHE_UNICODE_TEST_TTL", OsStr::from_bytes(&[0x66, 0xff]));
        assert_eq!(props.property("ttl").unwrap(), None);
        std::env::remove_var("MAPCACHE_UNICODE_TEST_TTL");
    }
}
