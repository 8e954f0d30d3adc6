//! Registry commands

use super::ConnectionArgs;
use crate::display;
use colored::*;
use httpay_sdk::Tool;

pub async fn list(conn: &ConnectionArgs, include_paused: bool, json: bool) -> anyhow::Result<()> {
    let orchestrator = conn.orchestrator()?;
    let tools = if include_paused {
        orchestrator.registry().get_tools().await?
    } else {
        orchestrator.list_tools().await?
    };

    if json {
        return display::json(&tools);
    }

    display::section("Tools");
    if tools.is_empty() {
        display::warning("No tools registered");
        return Ok(());
    }
    for tool in &tools {
        print_row(tool);
    }
    println!();
    println!("  {} tool(s)", tools.len());
    Ok(())
}

pub async fn get(conn: &ConnectionArgs, tool_id: &str, json: bool) -> anyhow::Result<()> {
    let orchestrator = conn.orchestrator()?;
    let tool = orchestrator.registry().get_tool(tool_id).await?;

    if json {
        return display::json(&tool);
    }

    display::section(&format!("Tool: {}", tool.tool_id));
    display::labeled("Price", &tool.price_coin().to_string());
    display::labeled("Provider", &tool.provider);
    display::labeled("Endpoint", &tool.endpoint);
    display::labeled("Status", if tool.is_active { "active" } else { "paused" });
    if !tool.description.is_empty() {
        display::labeled("Description", &tool.description);
    }
    Ok(())
}

fn print_row(tool: &Tool) {
    let marker = if tool.is_active {
        "●".bright_green()
    } else {
        "○".bright_black()
    };
    println!(
        "  {} {:<24} {:>16}  {}",
        marker,
        tool.tool_id.as_str().bright_white(),
        tool.price_coin().to_string().bright_yellow(),
        tool.endpoint.bright_cyan()
    );
}
