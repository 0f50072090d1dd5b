//! # Lot Traceability & ERP Integrity Engine
//!
//! 從 ERP 快照建立 LOT 追溯圖並產生資料完整性 / 品質報告。
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use lottrace::{RecordStore, TraceConfig, TraceabilitySystem};
//!
//! # fn main() -> lottrace::Result<()> {
//! let store = RecordStore::from_json(&std::fs::read_to_string("snapshot.json").unwrap())?;
//! let config = TraceConfig::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
//! let system = TraceabilitySystem::build(&store, config)?;
//!
//! println!("品質分數: {}", system.quality().overall.score);
//! # Ok(())
//! # }
//! ```

pub mod quality;

pub use lottrace_calc::{
    Allocation, BackwardTrace, FifoAllocator, ForwardTrace, LedgerBuilder, LotLedger, LotSummary,
    Shortfall, TraceResolver, TraceWarning, WarningKind,
};
pub use lottrace_core::{
    ExplosionMode, LotMaster, ProductLotMapping, RecordStore, Result, TraceConfig, TraceError,
};
pub use lottrace_integrity::{
    default_rules, rules_from_json, CheckStatus, IntegrityCheckResult, IntegrityRule,
    IntegritySummary,
};
pub use quality::{MetricScore, OverallScore, QualityMetrics};

use chrono::NaiveDate;
use lottrace_integrity::{ConsistencyChecker, ReferentialChecker};
use serde::Serialize;
use std::time::Instant;

/// 追溯與完整性系統
///
/// 一次建立後即不可變；追溯查詢只需要 `&self`。
#[derive(Debug, Clone)]
pub struct TraceabilitySystem {
    config: TraceConfig,
    resolver: TraceResolver,
    shortfalls: Vec<Shortfall>,
    warnings: Vec<TraceWarning>,
    integrity: IntegritySummary,
    quality: QualityMetrics,
    calculation_time_ms: u128,
}

impl TraceabilitySystem {
    /// 以預設規則表建立
    pub fn build(store: &RecordStore, config: TraceConfig) -> Result<Self> {
        Self::build_with_rules(store, config, &default_rules())
    }

    /// 從 JSON 快照建立
    pub fn from_json(raw: &str, config: TraceConfig) -> Result<Self> {
        let store = RecordStore::from_json(raw)?;
        Self::build(&store, config)
    }

    /// 以指定規則表建立
    ///
    /// LOT 帳本與分配為單一循序流程，與兩個檢查器並行執行。
    pub fn build_with_rules(
        store: &RecordStore,
        config: TraceConfig,
        rules: &[IntegrityRule],
    ) -> Result<Self> {
        config.validate()?;

        let start = Instant::now();
        tracing::info!("開始建立追溯系統");

        let (allocation, (referential, consistency)) = rayon::join(
            || {
                let ledger = LedgerBuilder::new(store, &config).build();
                FifoAllocator::new(store, &config).allocate(ledger)
            },
            || {
                rayon::join(
                    || ReferentialChecker::new(store, rules).check(),
                    || ConsistencyChecker::new(store, &config).check(),
                )
            },
        );

        let Allocation {
            ledger,
            mappings,
            shortfalls,
            warnings,
        } = allocation;
        let resolver = TraceResolver::new(ledger, mappings);

        let mut checks = referential;
        checks.extend(consistency);
        let integrity = IntegritySummary::from_checks(checks);
        let quality = QualityMetrics::compute(&integrity, &resolver.summary(config.snapshot_date));

        let calculation_time_ms = start.elapsed().as_millis();
        tracing::info!(
            "追溯系統建立完成：LOT {} 筆，成品 LOT {} 筆，品質分數 {}，耗時 {} ms",
            resolver.lots().len(),
            resolver.mappings().len(),
            quality.overall.score,
            calculation_time_ms
        );

        Ok(Self {
            config,
            resolver,
            shortfalls,
            warnings,
            integrity,
            quality,
            calculation_time_ms,
        })
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn resolver(&self) -> &TraceResolver {
        &self.resolver
    }

    pub fn lots(&self) -> &[LotMaster] {
        self.resolver.lots()
    }

    pub fn mappings(&self) -> &[ProductLotMapping] {
        self.resolver.mappings()
    }

    pub fn shortfalls(&self) -> &[Shortfall] {
        &self.shortfalls
    }

    pub fn warnings(&self) -> &[TraceWarning] {
        &self.warnings
    }

    pub fn integrity(&self) -> &IntegritySummary {
        &self.integrity
    }

    pub fn quality(&self) -> &QualityMetrics {
        &self.quality
    }

    pub fn calculation_time_ms(&self) -> u128 {
        self.calculation_time_ms
    }

    /// 正向追溯
    pub fn trace_lot(&self, lot_number: &str) -> Option<ForwardTrace> {
        self.resolver.trace_lot(lot_number)
    }

    /// 反向追溯
    pub fn trace_product(&self, product_lot_number: &str) -> Option<BackwardTrace> {
        self.resolver.trace_product(product_lot_number)
    }

    /// 以快照基準日計算的 LOT 統計
    pub fn lot_summary(&self) -> LotSummary {
        self.resolver.summary(self.config.snapshot_date)
    }

    /// 指定日期（含）前到期且仍可用的 LOT
    pub fn expiring_lots(&self, as_of: NaiveDate) -> Vec<&LotMaster> {
        self.resolver.expiring_lots(as_of)
    }

    /// 彙總報告
    pub fn report(&self) -> TraceabilityReport<'_> {
        TraceabilityReport {
            snapshot_date: self.config.snapshot_date,
            lot_summary: self.lot_summary(),
            lots: self.lots(),
            mappings: self.mappings(),
            shortfalls: &self.shortfalls,
            warnings: &self.warnings,
            integrity: &self.integrity,
            quality: &self.quality,
        }
    }
}

/// 可序列化的彙總報告
#[derive(Debug, Serialize)]
pub struct TraceabilityReport<'a> {
    pub snapshot_date: NaiveDate,
    pub lot_summary: LotSummary,
    pub lots: &'a [LotMaster],
    pub mappings: &'a [ProductLotMapping],
    pub shortfalls: &'a [Shortfall],
    pub warnings: &'a [TraceWarning],
    pub integrity: &'a IntegritySummary,
    pub quality: &'a QualityMetrics,
}

impl TraceabilityReport<'_> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
