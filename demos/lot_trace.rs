//! LOT 正向 / 反向追溯示例
//!
//! ```text
//! cargo run --example lot_trace -- LOT-RM-STEEL-20240101-001
//! cargo run --example lot_trace -- LOT-FG-RAIL-20240106-001 --json
//! ```

use anyhow::{bail, Context};
use chrono::NaiveDate;
use lottrace::{TraceConfig, TraceabilitySystem};
use tracing_subscriber::{fmt, EnvFilter};

const SNAPSHOT: &str = "demos/data/sample_snapshot.json";

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let lot_number = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_else(|| "LOT-RM-STEEL-20240101-001".to_string());

    let raw = std::fs::read_to_string(SNAPSHOT)
        .with_context(|| format!("無法讀取快照: {SNAPSHOT}"))?;
    let snapshot_date = NaiveDate::from_ymd_opt(2024, 1, 31).context("無效的基準日")?;
    let system = TraceabilitySystem::from_json(&raw, TraceConfig::new(snapshot_date))?;

    if let Some(trace) = system.trace_lot(&lot_number) {
        if as_json {
            println!("{}", serde_json::to_string_pretty(&trace)?);
            return Ok(());
        }

        println!("=== 正向追溯: {} ===\n", trace.lot.lot_number);
        println!(
            "物料: {} {}，供應商 {}，入庫 {}",
            trace.lot.material_code,
            trace.lot.material_name,
            trace.lot.supplier_name,
            trace.lot.inbound_date
        );
        println!("\n交易歷史:");
        for txn in &trace.transactions {
            println!(
                "  {} {:?} {} ({}) @ {}",
                txn.date,
                txn.transaction_type,
                txn.quantity.normalize(),
                txn.reference,
                txn.location
            );
        }
        println!("\n使用於:");
        for usage in &trace.used_in_products {
            println!(
                "  - {} {} ({})：{}",
                usage.product_lot_number,
                usage.product_name,
                usage.production_order,
                usage.consumed_quantity.normalize()
            );
        }
        println!("\n追溯路徑: {}", trace.trace_path);
        return Ok(());
    }

    if let Some(trace) = system.trace_product(&lot_number) {
        if as_json {
            println!("{}", serde_json::to_string_pretty(&trace)?);
            return Ok(());
        }

        println!("=== 反向追溯: {} ===\n", trace.product.lot_number);
        println!(
            "成品: {} {}，作業指示 {}，品質 {:?}",
            trace.product.product_code,
            trace.product.product_name,
            trace.product.production_order,
            trace.product.quality_result
        );
        for material in &trace.materials {
            println!(
                "\n  {} {}：{} {}（不足 {}）",
                material.material_code,
                material.material_name,
                material.total_consumed.normalize(),
                material.unit,
                material.shortfall.normalize()
            );
            for source in &material.source_lots {
                println!(
                    "    ← {} {} 入庫 {}：{}",
                    source.lot_number,
                    source.supplier_name,
                    source.inbound_date,
                    source.quantity.normalize()
                );
            }
        }
        println!("\n追溯路徑: {}", trace.trace_path);
        return Ok(());
    }

    bail!("找不到 LOT: {lot_number}");
}
