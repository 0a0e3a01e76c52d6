use std::sync::Arc;

use crate::domain::entities::{RecommendationEntry, RecommendationTable};

/// Reply sent for anything that is not a known command
pub const FALLBACK_REPLY: &str =
    "Sorry, I don't understand that command. Please try /cnxfood or /bkkfood.";

/// Resolves chat text into the reply the bot sends back
#[derive(Debug, Clone)]
pub struct CommandResolver {
    table: Arc<RecommendationTable>,
}

impl CommandResolver {
    pub fn new(table: Arc<RecommendationTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RecommendationTable {
        &self.table
    }

    /// Map raw message text to a reply. Never fails.
    pub fn resolve(&self, raw_text: &str) -> String {
        let command = normalize(raw_text);

        match self.table.lookup(&command) {
            Some(entries) => render(entries),
            None => FALLBACK_REPLY.to_string(),
        }
    }
}

fn normalize(raw_text: &str) -> String {
    raw_text.trim().to_lowercase()
}

fn render(entries: &[RecommendationEntry]) -> String {
    let mut reply = String::new();
    for entry in entries {
        reply.push_str(&format!("{}\nContact: {}\n\n", entry.name, entry.contact));
    }
    reply
}
