//! Dock label to application name mapping.

use std::collections::HashMap;

use crate::constants::dock::DEFAULT_ALIASES;

/// Read-only mapping from a Dock label to the running application's name.
///
/// Built once at startup from the built-in defaults merged with the user's
/// configured aliases; user entries replace defaults with the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Creates a table holding only the built-in aliases.
    #[must_use]
    pub fn with_defaults() -> Self { Self::from_config(&HashMap::new()) }

    /// Creates a table from the built-in aliases plus user overrides.
    #[must_use]
    pub fn from_config(user: &HashMap<String, String>) -> Self {
        let mut entries: HashMap<String, String> = DEFAULT_ALIASES
            .iter()
            .map(|(label, name)| ((*label).to_string(), (*name).to_string()))
            .collect();

        for (label, name) in user {
            entries.insert(label.clone(), name.clone());
        }

        Self { entries }
    }

    /// Returns the aliased application name for `label`, if one exists.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<&str> { self.entries.get(label).map(String::as_str) }

    /// Returns the number of aliases.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
