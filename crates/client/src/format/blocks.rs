//! Block to text conversion.

use super::{notion_url, plain_text};
use crate::notion::{Block, BlockContent};

/// Render a single block, or `None` for block types that carry no text.
pub fn block_to_text(block: &Block) -> Option<String> {
    let text = match &block.content {
        BlockContent::Paragraph { paragraph } => plain_text(&paragraph.rich_text),
        BlockContent::Heading1 { heading_1 } => format!("# {}", plain_text(&heading_1.rich_text)),
        BlockContent::Heading2 { heading_2 } => format!("## {}", plain_text(&heading_2.rich_text)),
        BlockContent::Heading3 { heading_3 } => format!("### {}", plain_text(&heading_3.rich_text)),
        BlockContent::BulletedListItem { bulleted_list_item } => {
            format!("• {}", plain_text(&bulleted_list_item.rich_text))
        }
        BlockContent::NumberedListItem { numbered_list_item } => {
            format!("- {}", plain_text(&numbered_list_item.rich_text))
        }
        BlockContent::Quote { quote } => format!("> {}", plain_text(&quote.rich_text)),
        BlockContent::Toggle { toggle } => format!("▶ {}", plain_text(&toggle.rich_text)),
        BlockContent::ToDo { to_do } => {
            let mark = if to_do.checked { "✓" } else { "☐" };
            format!("{mark} {}", plain_text(&to_do.rich_text))
        }
        BlockContent::Code { code } => {
            format!(
                "```{}\n{}\n```",
                code.language.as_deref().unwrap_or_default(),
                plain_text(&code.rich_text)
            )
        }
        BlockContent::ChildPage { child_page } => {
            format!("📄 [Child Page] {} — {}", child_page.title, notion_url(&block.id))
        }
        BlockContent::ChildDatabase { child_database } => {
            format!("🗄️ [Child Database] {} — {}", child_database.title, notion_url(&block.id))
        }
        BlockContent::Divider => "---".to_string(),
        BlockContent::Unsupported => return None,
    };
    Some(text)
}

/// Render blocks separated by blank lines, skipping empty output.
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(block_to_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
