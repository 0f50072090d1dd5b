//! ERP 快照追溯與完整性報告示例
//!
//! ```text
//! cargo run --example snapshot_report -- demos/data/sample_snapshot.json 2024-01-31
//! RUST_LOG=debug cargo run --example snapshot_report
//! ```

use anyhow::Context;
use chrono::NaiveDate;
use lottrace::{CheckStatus, TraceConfig, TraceabilitySystem};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SNAPSHOT: &str = "demos/data/sample_snapshot.json";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_SNAPSHOT.to_string());
    let snapshot_date = match args.next() {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("無效的基準日: {raw}"))?,
        None => NaiveDate::from_ymd_opt(2024, 1, 31).context("無效的基準日")?,
    };

    let raw = std::fs::read_to_string(&path).with_context(|| format!("無法讀取快照: {path}"))?;
    let system = TraceabilitySystem::from_json(&raw, TraceConfig::new(snapshot_date))?;

    println!("=== LOT 追溯與資料完整性報告 ({snapshot_date}) ===\n");

    let summary = system.lot_summary();
    println!("LOT 統計:");
    println!(
        "  - 總數 {}，可用 {}，耗盡 {}，過期 {}",
        summary.total_lots, summary.active_lots, summary.consumed_lots, summary.expired_lots
    );
    println!(
        "  - 成品 LOT {}，追溯率 {}%",
        summary.total_product_lots,
        summary.traceability_rate.normalize()
    );

    println!("\nLOT 帳本:");
    for lot in system.lots() {
        println!(
            "  - {} {} 入庫 {} / 剩餘 {} {} ({:?})",
            lot.lot_number,
            lot.material_name,
            lot.original_quantity.normalize(),
            lot.current_quantity.normalize(),
            lot.unit,
            lot.status
        );
    }

    if !system.shortfalls().is_empty() {
        println!("\n分配不足:");
        for shortfall in system.shortfalls() {
            println!(
                "  - {} / {}: 需要 {}，已分配 {}，不足 {}",
                shortfall.work_order_number,
                shortfall.material_code,
                shortfall.required.normalize(),
                shortfall.allocated.normalize(),
                shortfall.missing.normalize()
            );
        }
    }

    let integrity = system.integrity();
    println!(
        "\n完整性檢查: {} 項（通過 {} / 警告 {} / 失敗 {}）",
        integrity.total_checks,
        integrity.passed_checks,
        integrity.warning_checks,
        integrity.failed_checks
    );
    for check in &integrity.checks {
        if check.status == CheckStatus::Passed {
            continue;
        }
        println!("  [{:?}] {} {}", check.status, check.check_id, check.name);
        for detail in &check.details {
            println!("      {detail}");
        }
    }

    let quality = system.quality();
    println!("\n品質分數: {} ({:?})", quality.overall.score, quality.overall.status);
    println!("  - 資料完整性 {}: {}", quality.data_integrity.score, quality.data_integrity.details);
    println!("  - 追溯性 {}: {}", quality.traceability.score, quality.traceability.details);
    println!("  - 自動化 {}: {}", quality.automation.score, quality.automation.details);
    println!("  - 一致性 {}: {}", quality.consistency.score, quality.consistency.details);
    println!("  建議: {}", quality.overall.recommendation);

    println!("\n計算耗時: {} ms", system.calculation_time_ms());

    Ok(())
}
