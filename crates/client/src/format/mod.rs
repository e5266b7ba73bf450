//! Plain-text rendering of Notion objects.
//!
//! Tool output is meant for a language model, so everything is flattened to
//! readable text: titles, links, blocks as lightweight Markdown and database
//! rows as `key: value` lines.

pub mod blocks;
pub mod properties;

pub use blocks::{block_to_text, render_blocks};
pub use properties::format_property;

use crate::notion::{Database, Page, PropertyValue, RichText};

/// Fallback title for pages without a title property.
pub const UNTITLED: &str = "Untitled";

/// Fallback title for databases.
pub const UNTITLED_DATABASE: &str = "Untitled Database";

/// Public URL for a page or database id.
pub fn notion_url(id: &str) -> String {
    format!("https://www.notion.so/{}", id.replace('-', ""))
}

/// Concatenate the plain text of a rich text run.
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}

/// First fragment of the page's title property, or [`UNTITLED`].
pub fn page_title(page: &Page) -> String {
    page.properties
        .values()
        .find_map(|property| match &property.value {
            PropertyValue::Title { title } => title.first().map(|run| run.plain_text.clone()),
            _ => None,
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// First fragment of the database title, or [`UNTITLED_DATABASE`].
pub fn database_title(database: &Database) -> String {
    database
        .title
        .first()
        .map(|run| run.plain_text.clone())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED_DATABASE.to_string())
}

/// Full text returned by `fetch_page`.
pub fn render_page(page_id: &str, title: &str, blocks: &str) -> String {
    let body = if blocks.is_empty() { "(empty page)" } else { blocks };
    format!("Title: {title}\nURL: {}\n\n{body}", notion_url(page_id))
}

/// Text returned by `query_database` for a database with no rows.
pub fn render_empty_database(title: &str) -> String {
    format!("Database: {title}\n\nThis database is empty (no entries found).")
}

/// Full text returned by `query_database`.
///
/// Columns are listed in alphabetical order; empty values are omitted per entry.
pub fn render_database(database_id: &str, database: &Database, rows: &[Page]) -> String {
    let title = database_title(database);
    let columns: Vec<&str> = database.properties.keys().map(String::as_str).collect();

    let mut output = format!(
        "Database: {title}\nURL: {}\nEntries: {}\n\nProperties: {}\n\n--- Entries ---\n\n",
        notion_url(database_id),
        rows.len(),
        columns.join(", ")
    );

    for (idx, row) in rows.iter().enumerate() {
        output.push_str(&format!("Entry {}:\n", idx + 1));
        for column in &columns {
            let value = format_property(row.properties.get(*column));
            if !value.is_empty() {
                output.push_str(&format!("  {column}: {value}\n"));
            }
        }
        output.push_str(&format!("  URL: {}\n\n", notion_url(&row.id)));
    }

    output
}
