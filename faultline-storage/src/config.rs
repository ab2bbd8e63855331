//! Connection options and connection-string resolution
//!
//! Hosts hand the adapter a flat option mapping. [`LogOptions`] turns that
//! mapping into named, typed fields, and resolves the connection string
//! against the host's registries behind the [`SettingsRegistry`] seam.

use std::collections::HashMap;

/// Recognized option key for a named-connection-strings lookup
pub const KEY_CONNECTION_STRING_NAME: &str = "connectionStringName";
/// Recognized option key for a verbatim connection string
pub const KEY_CONNECTION_STRING: &str = "connectionString";
/// Recognized option key for an application-settings lookup
pub const KEY_CONNECTION_STRING_APP_KEY: &str = "connectionStringAppKey";
/// Recognized option key for the partition scope
pub const KEY_APPLICATION_NAME: &str = "applicationName";

/// Host-provided registries the resolver consults
///
/// Both lookups are external collaborators: a named-connection-strings
/// registry and a flat application-settings registry. Hosts implement
/// this over whatever configuration system they carry;
/// [`MemoryRegistry`] covers tests and embedded use.
pub trait SettingsRegistry {
    /// Look up a registered connection string by name
    fn connection_string(&self, name: &str) -> Option<String>;

    /// Look up a flat application setting by key
    fn app_setting(&self, key: &str) -> Option<String>;
}

/// In-memory registry backed by two maps
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    connection_strings: HashMap<String, String>,
    app_settings: HashMap<String, String>,
}

impl MemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named connection string
    pub fn with_connection_string<N: Into<String>, V: Into<String>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.connection_strings.insert(name.into(), value.into());
        self
    }

    /// Register a flat application setting
    pub fn with_app_setting<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.app_settings.insert(key.into(), value.into());
        self
    }
}

impl SettingsRegistry for MemoryRegistry {
    fn connection_string(&self, name: &str) -> Option<String> {
        self.connection_strings.get(name).cloned()
    }

    fn app_setting(&self, key: &str) -> Option<String> {
        self.app_settings.get(key).cloned()
    }
}

/// Typed connection options for an error log adapter
///
/// The four recognized mapping keys are [`KEY_CONNECTION_STRING_NAME`],
/// [`KEY_CONNECTION_STRING`], [`KEY_CONNECTION_STRING_APP_KEY`] and
/// [`KEY_APPLICATION_NAME`]; anything else in the mapping is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogOptions {
    /// Name to look up in the host's connection-strings registry
    pub connection_string_name: Option<String>,
    /// Connection string given directly
    pub connection_string: Option<String>,
    /// Key to look up in the host's application settings
    pub connection_string_app_key: Option<String>,
    /// Partition scope for every write and read; defaults to empty
    pub application_name: Option<String>,
}

impl LogOptions {
    /// Build options from a host-provided option mapping
    ///
    /// Empty values are treated as absent, so a blank entry behaves the
    /// same as a missing one during resolution.
    pub fn from_map(config: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            config
                .get(key)
                .map(|value| value.to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            connection_string_name: get(KEY_CONNECTION_STRING_NAME),
            connection_string: get(KEY_CONNECTION_STRING),
            connection_string_app_key: get(KEY_CONNECTION_STRING_APP_KEY),
            application_name: get(KEY_APPLICATION_NAME),
        }
    }

    /// Resolve the connection string against the host registries
    ///
    /// Strategies in priority order, first match wins:
    ///
    /// 1. `connection_string_name` set: look the name up in the registry.
    ///    An unregistered name resolves to `None` immediately and does
    ///    NOT fall through to the remaining strategies.
    /// 2. `connection_string` set: returned verbatim.
    /// 3. `connection_string_app_key` set: whatever the application
    ///    settings hold under that key, possibly nothing.
    ///
    /// Constructors treat `None` and an empty resolved value as a fatal
    /// configuration error.
    pub fn resolve_connection_string(&self, registry: &dyn SettingsRegistry) -> Option<String> {
        if let Some(name) = &self.connection_string_name {
            return registry.connection_string(name);
        }

        if let Some(connection_string) = &self.connection_string {
            return Some(connection_string.clone());
        }

        if let Some(app_key) = &self.connection_string_app_key {
            return registry.app_setting(app_key);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_map_reads_recognized_keys() {
        let options = LogOptions::from_map(&map(&[
            (KEY_CONNECTION_STRING_NAME, "main"),
            (KEY_CONNECTION_STRING, "sqlite:errors.db"),
            (KEY_CONNECTION_STRING_APP_KEY, "errorLogDb"),
            (KEY_APPLICATION_NAME, "billing"),
            ("somethingElse", "ignored"),
        ]));

        assert_eq!(options.connection_string_name.as_deref(), Some("main"));
        assert_eq!(
            options.connection_string.as_deref(),
            Some("sqlite:errors.db")
        );
        assert_eq!(
            options.connection_string_app_key.as_deref(),
            Some("errorLogDb")
        );
        assert_eq!(options.application_name.as_deref(), Some("billing"));
    }

    #[test]
    fn test_from_map_treats_empty_values_as_absent() {
        let options = LogOptions::from_map(&map(&[
            (KEY_CONNECTION_STRING_NAME, ""),
            (KEY_CONNECTION_STRING, "sqlite:errors.db"),
        ]));

        assert_eq!(options.connection_string_name, None);
        assert!(options.connection_string.is_some());
    }

    #[test]
    fn test_registered_name_wins_over_direct_string() {
        let registry = MemoryRegistry::new().with_connection_string("main", "sqlite:registered.db");
        let options = LogOptions::from_map(&map(&[
            (KEY_CONNECTION_STRING_NAME, "main"),
            (KEY_CONNECTION_STRING, "sqlite:direct.db"),
        ]));

        assert_eq!(
            options.resolve_connection_string(&registry),
            Some("sqlite:registered.db".to_string())
        );
    }

    #[test]
    fn test_unregistered_name_does_not_fall_through() {
        let registry = MemoryRegistry::new();
        let options = LogOptions::from_map(&map(&[
            (KEY_CONNECTION_STRING_NAME, "missing"),
            (KEY_CONNECTION_STRING, "sqlite:direct.db"),
            (KEY_CONNECTION_STRING_APP_KEY, "errorLogDb"),
        ]));

        assert_eq!(options.resolve_connection_string(&registry), None);
    }

    #[test]
    fn test_direct_string_used_when_no_name_given() {
        let registry = MemoryRegistry::new();
        let options = LogOptions::from_map(&map(&[(KEY_CONNECTION_STRING, "sqlite:direct.db")]));

        assert_eq!(
            options.resolve_connection_string(&registry),
            Some("sqlite:direct.db".to_string())
        );
    }

    #[test]
    fn test_app_key_is_last_resort() {
        let registry = MemoryRegistry::new().with_app_setting("errorLogDb", "sqlite:from-app.db");
        let options =
            LogOptions::from_map(&map(&[(KEY_CONNECTION_STRING_APP_KEY, "errorLogDb")]));

        assert_eq!(
            options.resolve_connection_string(&registry),
            Some("sqlite:from-app.db".to_string())
        );

        let unknown_key =
            LogOptions::from_map(&map(&[(KEY_CONNECTION_STRING_APP_KEY, "noSuchKey")]));
        assert_eq!(unknown_key.resolve_connection_string(&registry), None);
    }

    #[test]
    fn test_no_options_resolve_to_nothing() {
        let registry = MemoryRegistry::new();
        let options = LogOptions::from_map(&HashMap::new());
        assert_eq!(options.resolve_connection_string(&registry), None);
    }
}
