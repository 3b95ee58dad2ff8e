//! Status summary command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display configuration and database counts.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let orders = state.order_service.count_orders().await?;
    let messages = state.chat_service.message_count().await?;
    let config = &state.config;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": config.data_dir.display().to_string(),
            "database": config.database_path().display().to_string(),
            "uploads": config.upload_dir().display().to_string(),
            "ollama_host": config.ollama_host,
            "model": config.ollama_model,
            "privileged_room": config.privileged_room,
            "default_admin_token": config.uses_default_admin_token(),
            "orders": orders,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Guriri v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Data ──").dim());
    println!("  Orders:   {}", style(orders).bold());
    println!("  Messages: {}", style(messages).bold());
    println!();

    println!("  {}", style("── Assistant ──").dim());
    println!("  Host:  {}", style(&config.ollama_host).cyan());
    println!("  Model: {}", style(&config.ollama_model).cyan());
    println!("  Privileged room: {}", config.privileged_room);
    if config.uses_default_admin_token() {
        println!(
            "  Admin token: {}",
            style("default (set GURIRI_ADMIN_TOKEN)").yellow()
        );
    } else {
        println!("  Admin token: {}", style("configured").green());
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(config.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!();

    Ok(())
}
