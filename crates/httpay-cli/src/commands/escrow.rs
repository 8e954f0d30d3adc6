//! Escrow commands

use super::ConnectionArgs;
use crate::display;
use httpay_sdk::EscrowId;

pub async fn get(conn: &ConnectionArgs, escrow_id: u64, json: bool) -> anyhow::Result<()> {
    let orchestrator = conn.orchestrator()?;
    let escrow = orchestrator.get_escrow(EscrowId(escrow_id)).await?;

    if json {
        return display::json(&escrow);
    }

    display::section(&format!("Escrow #{}", escrow.escrow_id));
    display::labeled("Status", &escrow.status.to_string());
    display::labeled("Amount", &escrow.locked_coin().to_string());
    display::labeled("Payer", &escrow.payer);
    display::labeled("Provider", &escrow.provider);
    display::labeled("Expires", &escrow.expires.to_string());
    Ok(())
}

/// Returns whether the escrow passed verification
pub async fn verify(
    conn: &ConnectionArgs,
    escrow_id: u64,
    token: &str,
    provider: &str,
    height: Option<u64>,
    json: bool,
) -> anyhow::Result<bool> {
    let orchestrator = conn.orchestrator()?;
    let result = orchestrator
        .verify_escrow(EscrowId(escrow_id), token, provider, height)
        .await;

    if json {
        display::json(&result)?;
        return Ok(result.is_valid);
    }

    display::section(&format!("Verify escrow #{}", escrow_id));
    if result.is_valid {
        display::success("Escrow is valid for this provider");
    } else {
        display::error(result.error.as_deref().unwrap_or("Verification failed"));
    }
    if let Some(h) = result.block_height {
        display::kv("Checked at height", &h.to_string());
    }
    if let Some(escrow) = &result.escrow {
        display::kv("Amount", &escrow.locked_coin().to_string());
        display::kv("Expires", &escrow.expires.to_string());
    }
    Ok(result.is_valid)
}

pub async fn fees(conn: &ConnectionArgs, json: bool) -> anyhow::Result<()> {
    let orchestrator = conn.orchestrator()?;
    let fees = orchestrator.escrow().get_collected_fees().await?;

    if json {
        return display::json(&fees);
    }

    display::section("Collected Fees");
    display::labeled("Owner", &fees.owner);
    display::labeled("Fee", &format!("{}%", fees.fee_percentage));
    if fees.collected_fees.is_empty() {
        display::kv("Collected", "none");
    }
    for fee in &fees.collected_fees {
        display::kv(&fee.denom, &fee.amount.to_string());
    }
    Ok(())
}
