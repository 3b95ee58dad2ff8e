//! Room history command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

const TEXT_PREVIEW_CHARS: usize = 60;

/// Print a room's most recent records, newest first.
pub async fn show_history(state: &AppState, room: &str, limit: i64, json: bool) -> Result<()> {
    let records = state.chat_service.history(room, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!("  No messages in room '{}'.", style(room).cyan());
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  History for '{}' ({} records)",
        style(room).cyan(),
        records.len(),
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);

    for record in &records {
        table.add_row(vec![
            Cell::new(record.ts.format("%Y-%m-%d %H:%M:%S").to_string()).fg(Color::DarkGrey),
            Cell::new(&record.sender).fg(Color::Cyan),
            Cell::new(preview(&record.text)),
        ]);
    }

    println!("{table}");
    println!();

    Ok(())
}

fn preview(text: &str) -> String {
    if text.chars().count() > TEXT_PREVIEW_CHARS {
        let head: String = text.chars().take(TEXT_PREVIEW_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundaries() {
        assert_eq!(preview("oi"), "oi");
        let long = "ç".repeat(80);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), TEXT_PREVIEW_CHARS);
        assert!(shown.ends_with("..."));
    }
}
