//! 雙向追溯查詢
//!
//! - 正向：物料 LOT → 使用該 LOT 的成品 LOT
//! - 反向：成品 LOT → 投入的物料 LOT
//!
//! 分配完成後帳本與對照皆不可變，查詢只需要 `&self`，可在多執行緒間共享。

use chrono::NaiveDate;
use lottrace_core::{
    LotMaster, LotStatus, ProductLotMapping, QualityResult, QualityStatus, TransactionType,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;

use crate::allocation::Allocation;
use crate::ledger::LotLedger;

/// LOT 基本資訊
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotSnapshot {
    pub lot_number: String,
    pub material_code: String,
    pub material_name: String,
    pub supplier_code: String,
    pub supplier_name: String,
    pub inbound_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub original_quantity: Decimal,
    pub current_quantity: Decimal,
    pub unit: String,
    pub quality_status: QualityStatus,
    pub status: LotStatus,
}

impl From<&LotMaster> for LotSnapshot {
    fn from(lot: &LotMaster) -> Self {
        Self {
            lot_number: lot.lot_number.clone(),
            material_code: lot.material_code.clone(),
            material_name: lot.material_name.clone(),
            supplier_code: lot.supplier_code.clone(),
            supplier_name: lot.supplier_name.clone(),
            inbound_date: lot.inbound_date,
            expiry_date: lot.expiry_date,
            original_quantity: lot.original_quantity,
            current_quantity: lot.current_quantity,
            unit: lot.unit.clone(),
            quality_status: lot.quality_status,
            status: lot.status,
        }
    }
}

/// 交易歷史項目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    pub id: String,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub reference: String,
    pub location: String,
    pub notes: Option<String>,
}

/// 使用該 LOT 的成品
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductUsage {
    pub product_code: String,
    pub product_name: String,
    pub product_lot_number: String,
    pub production_date: NaiveDate,
    pub production_order: String,
    /// 從本 LOT 抽取的數量
    pub consumed_quantity: Decimal,
}

/// 正向追溯結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardTrace {
    pub lot: LotSnapshot,
    pub transactions: Vec<TransactionView>,
    pub used_in_products: Vec<ProductUsage>,
    pub trace_path: String,
}

impl ForwardTrace {
    /// 所有成品從本 LOT 抽取的總量
    pub fn total_drawn(&self) -> Decimal {
        self.used_in_products.iter().map(|p| p.consumed_quantity).sum()
    }
}

/// 成品基本資訊
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSnapshot {
    pub lot_number: String,
    pub product_code: String,
    pub product_name: String,
    pub production_date: NaiveDate,
    pub production_order: String,
    pub quality_result: QualityResult,
}

/// 來源 LOT
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceLot {
    pub lot_number: String,
    pub supplier_code: String,
    pub supplier_name: String,
    pub inbound_date: NaiveDate,
    /// 從此 LOT 抽取的數量
    pub quantity: Decimal,
}

/// 單一物料的來源追溯
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialTrace {
    pub material_code: String,
    pub material_name: String,
    pub unit: String,
    pub required_quantity: Decimal,
    pub total_consumed: Decimal,
    pub shortfall: Decimal,
    pub source_lots: Vec<SourceLot>,
}

/// 反向追溯結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackwardTrace {
    pub product: ProductSnapshot,
    pub materials: Vec<MaterialTrace>,
    pub trace_path: String,
}

/// LOT 統計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotSummary {
    pub total_lots: usize,
    pub active_lots: usize,
    pub consumed_lots: usize,
    pub expired_lots: usize,
    pub total_product_lots: usize,
    /// 可對應到帳本 LOT 的抽取記錄比例（%）
    pub traceability_rate: Decimal,
}

/// 追溯查詢器
#[derive(Debug, Clone, Default)]
pub struct TraceResolver {
    ledger: LotLedger,
    mappings: Vec<ProductLotMapping>,
    /// 物料 LOT 號 → 引用它的對照位置（依對照順序）
    usage_index: HashMap<String, Vec<usize>>,
    /// 成品 LOT 號 → 對照位置
    product_index: HashMap<String, usize>,
}

impl TraceResolver {
    pub fn new(ledger: LotLedger, mappings: Vec<ProductLotMapping>) -> Self {
        let mut usage_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut product_index = HashMap::new();

        for (position, mapping) in mappings.iter().enumerate() {
            product_index
                .entry(mapping.lot_number.clone())
                .or_insert(position);

            for material in &mapping.consumed_materials {
                for lot_number in material.source_lot_numbers() {
                    let positions = usage_index.entry(lot_number.to_string()).or_default();
                    if positions.last() != Some(&position) {
                        positions.push(position);
                    }
                }
            }
        }

        tracing::debug!(
            "追溯索引建立完成：物料 LOT {} 筆，成品 LOT {} 筆",
            usage_index.len(),
            product_index.len()
        );

        Self {
            ledger,
            mappings,
            usage_index,
            product_index,
        }
    }

    pub fn from_allocation(allocation: Allocation) -> Self {
        Self::new(allocation.ledger, allocation.mappings)
    }

    pub fn ledger(&self) -> &LotLedger {
        &self.ledger
    }

    pub fn lots(&self) -> &[LotMaster] {
        self.ledger.lots()
    }

    pub fn mappings(&self) -> &[ProductLotMapping] {
        &self.mappings
    }

    pub fn mapping(&self, product_lot_number: &str) -> Option<&ProductLotMapping> {
        self.product_index
            .get(product_lot_number)
            .map(|&i| &self.mappings[i])
    }

    /// 引用指定物料 LOT 的成品對照
    pub fn products_using(&self, lot_number: &str) -> Vec<&ProductLotMapping> {
        self.usage_index
            .get(lot_number)
            .map(|positions| positions.iter().map(|&i| &self.mappings[i]).collect())
            .unwrap_or_default()
    }

    /// 正向追溯：物料 LOT → 成品
    pub fn trace_lot(&self, lot_number: &str) -> Option<ForwardTrace> {
        let lot = self.ledger.get(lot_number)?;

        let used_in_products: Vec<ProductUsage> = self
            .products_using(lot_number)
            .into_iter()
            .map(|mapping| ProductUsage {
                product_code: mapping.product_code.clone(),
                product_name: mapping.product_name.clone(),
                product_lot_number: mapping.lot_number.clone(),
                production_date: mapping.production_date,
                production_order: mapping.production_order_number.clone(),
                consumed_quantity: mapping.drawn_from(lot_number),
            })
            .collect();

        let mut trace_path = format!(
            "入庫({}) → {}",
            lot.inbound_date.format("%Y-%m-%d"),
            lot.supplier_name
        );
        for usage in &used_in_products {
            trace_path.push_str(&format!(" → 生產({})", usage.product_name));
        }

        Some(ForwardTrace {
            lot: LotSnapshot::from(lot),
            transactions: lot
                .transactions
                .iter()
                .map(|t| TransactionView {
                    id: t.id.clone(),
                    date: t.transaction_date,
                    transaction_type: t.transaction_type,
                    quantity: t.quantity,
                    reference: t.reference_document.clone(),
                    location: t.location.clone(),
                    notes: t.notes.clone(),
                })
                .collect(),
            used_in_products,
            trace_path,
        })
    }

    /// 反向追溯：成品 LOT → 物料 LOT
    pub fn trace_product(&self, product_lot_number: &str) -> Option<BackwardTrace> {
        let mapping = self.mapping(product_lot_number)?;

        let materials: Vec<MaterialTrace> = mapping
            .consumed_materials
            .iter()
            .map(|material| MaterialTrace {
                material_code: material.material_code.clone(),
                material_name: material.material_name.clone(),
                unit: material.unit.clone(),
                required_quantity: material.required_quantity,
                total_consumed: material.consumed_quantity,
                shortfall: material.shortfall,
                source_lots: material
                    .sources
                    .iter()
                    .filter_map(|draw| {
                        let lot = self.ledger.get(&draw.lot_number)?;
                        Some(SourceLot {
                            lot_number: draw.lot_number.clone(),
                            supplier_code: lot.supplier_code.clone(),
                            supplier_name: lot.supplier_name.clone(),
                            inbound_date: lot.inbound_date,
                            quantity: draw.quantity,
                        })
                    })
                    .collect(),
            })
            .collect();

        let trace_path = format!(
            "{} → {}({})",
            materials
                .iter()
                .map(|m| {
                    let sources: Vec<String> = m
                        .source_lots
                        .iter()
                        .map(|s| format!("{}-{}", s.supplier_name, s.lot_number))
                        .collect();
                    format!("{}({})", m.material_name, sources.join(", "))
                })
                .collect::<Vec<_>>()
                .join(" + "),
            mapping.product_name,
            mapping.lot_number
        );

        Some(BackwardTrace {
            product: ProductSnapshot {
                lot_number: mapping.lot_number.clone(),
                product_code: mapping.product_code.clone(),
                product_name: mapping.product_name.clone(),
                production_date: mapping.production_date,
                production_order: mapping.production_order_number.clone(),
                quality_result: mapping.quality_result,
            },
            materials,
            trace_path,
        })
    }

    /// 指定日期（含）前到期且仍可用的 LOT
    pub fn expiring_lots(&self, as_of: NaiveDate) -> Vec<&LotMaster> {
        self.ledger.expiring_lots(as_of)
    }

    /// LOT 統計
    ///
    /// 有效期限早於 `as_of` 的可用 LOT 計為過期。
    pub fn summary(&self, as_of: NaiveDate) -> LotSummary {
        let mut active_lots = 0;
        let mut consumed_lots = 0;
        let mut expired_lots = 0;

        for lot in self.ledger.lots() {
            let past_expiry = lot.expiry_date.map_or(false, |expiry| expiry < as_of);
            match lot.status {
                LotStatus::Expired => expired_lots += 1,
                LotStatus::Active if past_expiry => expired_lots += 1,
                LotStatus::Active => active_lots += 1,
                LotStatus::Consumed => consumed_lots += 1,
                LotStatus::Scrapped => {}
            }
        }

        LotSummary {
            total_lots: self.ledger.len(),
            active_lots,
            consumed_lots,
            expired_lots,
            total_product_lots: self.mappings.len(),
            traceability_rate: self.traceability_rate(),
        }
    }

    /// 抽取記錄中能對應到帳本 LOT 的比例（%），沒有抽取記錄時為 100
    pub fn traceability_rate(&self) -> Decimal {
        let (resolved, total) = self
            .mappings
            .iter()
            .flat_map(|m| m.consumed_materials.iter())
            .flat_map(|cm| cm.sources.iter())
            .fold((0u64, 0u64), |(resolved, total), draw| {
                let hit = u64::from(self.ledger.get(&draw.lot_number).is_some());
                (resolved + hit, total + 1)
            });

        if total == 0 {
            return Decimal::ONE_HUNDRED;
        }

        (Decimal::from(resolved) * Decimal::ONE_HUNDRED / Decimal::from(total))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}
