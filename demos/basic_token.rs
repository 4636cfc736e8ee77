//! Basic token ledger usage example

use burn_token_core::utils::{format_units, parse_units, MemoryStorage};
use burn_token_core::{Address, Ledger, TokenConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🔥 Burn Token Core - Basic Token Example\n");

    let config = TokenConfig::from_json_str(
        r#"{ "name": "DLToken", "symbol": "DLT", "initial_supply": "1000000" }"#,
    )?;
    let deployer = Address::from("0xdeployer");
    let alice = Address::from("0xalice");
    let bob = Address::from("0xbob");

    let mut ledger = Ledger::from_config(MemoryStorage::new(), &config, &deployer)?;
    let decimals = ledger.decimals();
    println!(
        "  ✓ Deployed {} ({}) with supply {}",
        ledger.token_name(),
        ledger.symbol(),
        format_units(ledger.total_supply(), decimals)
    );

    // 1. Direct transfer
    let receipt = ledger.transfer(&deployer, &alice, parse_units("1000", decimals)?)?;
    println!(
        "  ✓ Transfer: sent {}, burned {}, alice received {}",
        format_units(receipt.gross, decimals),
        format_units(receipt.burned, decimals),
        format_units(receipt.net, decimals)
    );

    // 2. Delegated transfer
    ledger.approve(&deployer, &alice, parse_units("2000", decimals)?)?;
    let receipt = ledger.transfer_from(&alice, &deployer, &bob, parse_units("2000", decimals)?)?;
    println!(
        "  ✓ Delegated transfer: bob received {}, burned {}",
        format_units(receipt.net, decimals),
        format_units(receipt.burned, decimals)
    );

    // 3. Rejected transfer
    if let Err(e) = ledger.transfer(&bob, &alice, parse_units("5000", decimals)?) {
        println!("  ✗ Rejected: {e}");
    }

    println!("\n📊 Balances:");
    for account in [&deployer, &alice, &bob] {
        println!(
            "  {:<12} {}",
            account,
            format_units(ledger.balance_of(account), decimals)
        );
    }
    println!(
        "  Total supply {}",
        format_units(ledger.total_supply(), decimals)
    );

    let report = ledger.validate_integrity();
    println!("\n✅ Integrity valid: {}", report.is_valid);

    Ok(())
}
