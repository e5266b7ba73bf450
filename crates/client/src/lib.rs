//! Client code for notion-mcp.
//!
//! This crate provides the Notion REST client and the plain-text rendering
//! of pages, blocks and database rows used by the server tools.

pub mod format;
pub mod notion;

pub use format::{block_to_text, database_title, format_property, notion_url, page_title, render_blocks};

pub use notion::{NotionApi, NotionClient, NotionConfig, NotionError};
