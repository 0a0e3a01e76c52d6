use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::application::errors::ConfigError;

/// A single place recommended for a command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecommendationEntry {
    pub name: String,
    pub contact: String,
}

impl RecommendationEntry {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
        }
    }
}

/// One command with its ordered entries, as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandEntries {
    pub command: String,
    pub entries: Vec<RecommendationEntry>,
}

/// Immutable command -> recommendations mapping, built once at startup
#[derive(Debug, Clone, Default)]
pub struct RecommendationTable {
    commands: HashMap<String, Vec<RecommendationEntry>>,
}

impl RecommendationTable {
    /// The table the bot ships with
    pub fn builtin() -> Self {
        let mut commands = HashMap::new();
        commands.insert(
            "/cnxfood".to_string(),
            vec![
                RecommendationEntry::new("A Restaurant", "0856676648"),
                RecommendationEntry::new("B Coffee Shop", "LINE ID: Bcoffee"),
            ],
        );
        commands.insert(
            "/bkkfood".to_string(),
            vec![
                RecommendationEntry::new("C Noodle House", "0812345678"),
                RecommendationEntry::new("D Bakery", "LINE ID: Dbakery"),
            ],
        );
        Self { commands }
    }

    /// Build a table from configured commands.
    ///
    /// Every command must be non-empty, start with `/`, appear once, and
    /// carry at least one entry.
    pub fn from_commands(list: Vec<CommandEntries>) -> Result<Self, ConfigError> {
        let mut commands = HashMap::with_capacity(list.len());

        for CommandEntries { command, entries } in list {
            if command.is_empty() || !command.starts_with('/') {
                return Err(ConfigError::InvalidValue(format!(
                    "command {:?} must start with '/'",
                    command
                )));
            }
            if entries.is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "command {} has no entries",
                    command
                )));
            }
            if command.trim().to_lowercase() != command {
                // Input is lower-cased before lookup, so this key can never match.
                tracing::warn!("Command {} is not lower-case and will be unreachable", command);
            }
            if commands.insert(command.clone(), entries).is_some() {
                return Err(ConfigError::InvalidValue(format!(
                    "command {} is defined twice",
                    command
                )));
            }
        }

        Ok(Self { commands })
    }

    /// Exact-match lookup. Callers normalize the input first.
    pub fn lookup(&self, command: &str) -> Option<&[RecommendationEntry]> {
        self.commands.get(command).map(Vec::as_slice)
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
