//! Console Page Demo
//!
//! Drives the calculator page on the mock document with console output
//! forwarded to `tracing`.
//!
//! Run with: RUST_LOG=console=info cargo run --example console_page_demo

use console_calculator::driver::{run_full_specification, CalculatorDriver};
use console_calculator::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("console=info")),
        )
        .init();
    install_panic_observer();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Console Calculator Demo - Mock DOM + tracing          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut page = PageDriver::with_console(PageConfig::default(), DevConsole::new(TracingSink));

    println!("1️⃣  Page load checks");
    let report = page.load();
    println!("   healthy: {}", report.is_healthy());
    page.run_deferred();

    println!("\n2️⃣  Calculations");
    for (a, op, b) in [
        ("42", "*", "10"),
        ("0.1", "+", "0.2"),
        ("5", "/", "0"),
        ("abc", "+", "1"),
        ("1152921504606846976", "+", "1"),
        ("3", "%", "4"),
    ] {
        page.calculate(a, op, b);
        println!(
            "   {a} {op} {b}  →  {} [{}]",
            page.result_text().unwrap_or_default(),
            page.result_class().map_or("none", ResultClass::as_str)
        );
    }

    println!("\n3️⃣  Console demo buttons");
    for button in DemoButton::ALL {
        println!("   [{:>2}] {}", button.index(), button.label());
        if let Err(err) = page.click_demo(button.index()) {
            println!("        {err}");
        }
    }
    page.run_deferred();

    println!("\n4️⃣  Debug panel");
    println!("   {}", page.debug_info());

    println!("\n5️⃣  Unified specification");
    page.reset();
    run_full_specification(&mut page);
    println!("   ✓ all specifications passed");
}
