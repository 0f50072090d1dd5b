//! FIFO 消耗分配
//!
//! 依作業指示的輸入順序逐張處理（不依日期重排），每張指示展開 BOM 後
//! 從最早入庫的可用 LOT 開始消耗。帳本以值的方式在每一步之間傳遞，
//! 分配完成後交由呼叫端唯讀共享。

use chrono::NaiveDate;
use lottrace_core::{
    ConsumedMaterial, Consumption, Item, LotSequencer, ProductLotMapping, QualityResult,
    RecordStore, TraceConfig, WorkOrder,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::explosion::{BomExplosion, ComponentRequirement};
use crate::ledger::LotLedger;
use crate::TraceWarning;

/// 分配不足（LOT 剩餘量無法滿足需求）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortfall {
    pub work_order_number: String,
    pub product_code: String,
    pub material_code: String,
    pub required: Decimal,
    pub allocated: Decimal,
    pub missing: Decimal,
}

/// 分配結果
#[derive(Debug, Clone, Default, Serialize)]
pub struct Allocation {
    /// 消耗後的 LOT 帳本
    pub ledger: LotLedger,

    /// 成品 LOT 對照（依作業指示順序）
    pub mappings: Vec<ProductLotMapping>,

    pub shortfalls: Vec<Shortfall>,

    pub warnings: Vec<TraceWarning>,
}

impl Allocation {
    /// 是否存在分配不足
    pub fn has_shortfall(&self) -> bool {
        !self.shortfalls.is_empty()
    }

    /// 指定作業指示的分配不足
    pub fn shortfalls_for(&self, work_order_number: &str) -> Vec<&Shortfall> {
        self.shortfalls
            .iter()
            .filter(|s| s.work_order_number == work_order_number)
            .collect()
    }
}

/// 折疊狀態：分配結果 + 成品 LOT 序號
struct Pass {
    allocation: Allocation,
    sequencer: LotSequencer,
}

/// FIFO 消耗分配器
pub struct FifoAllocator<'a> {
    store: &'a RecordStore,
    config: &'a TraceConfig,
    explosion: BomExplosion<'a>,
    finished_goods: HashMap<&'a str, &'a Item>,
}

impl<'a> FifoAllocator<'a> {
    pub fn new(store: &'a RecordStore, config: &'a TraceConfig) -> Self {
        let mut finished_goods = HashMap::new();
        for item in store.finished_goods() {
            finished_goods.entry(item.code.as_str()).or_insert(item);
        }

        Self {
            store,
            config,
            explosion: BomExplosion::new(store, config),
            finished_goods,
        }
    }

    /// 對整個帳本執行分配
    pub fn allocate(&self, ledger: LotLedger) -> Allocation {
        tracing::info!(
            "開始 FIFO 分配：作業指示 {} 筆，LOT {} 筆",
            self.store.work_orders.len(),
            ledger.len()
        );

        let initial = Pass {
            allocation: Allocation {
                ledger,
                ..Allocation::default()
            },
            sequencer: LotSequencer::new(),
        };

        let pass = self
            .store
            .work_orders
            .iter()
            .fold(initial, |pass, work_order| self.step(pass, work_order));

        let allocation = pass.allocation;
        tracing::info!(
            "FIFO 分配完成：成品 LOT {} 筆，分配不足 {} 筆",
            allocation.mappings.len(),
            allocation.shortfalls.len()
        );
        allocation
    }

    /// 單張作業指示的分配步驟
    fn step(&self, mut pass: Pass, work_order: &WorkOrder) -> Pass {
        let Some(product) = self.finished_goods.get(work_order.item_code.as_str()) else {
            tracing::debug!(
                "作業指示 {} 的品目 {} 不是完成品，略過",
                work_order.order_no,
                work_order.item_code
            );
            return pass;
        };

        let production_date = work_order.start_date.unwrap_or(self.config.snapshot_date);
        let line = if work_order.line.trim().is_empty() {
            self.config.default_production_line.as_str()
        } else {
            work_order.line.as_str()
        };

        let explosion = self
            .explosion
            .explode(&work_order.item_code, work_order.quantity);
        pass.allocation.warnings.extend(
            explosion
                .warnings
                .into_iter()
                .map(|w| TraceWarning { reference: work_order.order_no.clone(), ..w }),
        );

        let mut consumed_materials = Vec::with_capacity(explosion.requirements.len());
        for requirement in &explosion.requirements {
            let material = Self::consume_fifo(
                &mut pass.allocation.ledger,
                requirement,
                work_order,
                product,
                production_date,
                line,
            );

            if material.is_short() {
                tracing::warn!(
                    "分配不足: 作業指示 {} 物料 {} 需要 {}，已分配 {}",
                    work_order.order_no,
                    material.material_code,
                    material.required_quantity,
                    material.consumed_quantity
                );
                pass.allocation.warnings.push(TraceWarning::under_allocation(
                    work_order.order_no.clone(),
                    format!(
                        "物料 {} 不足 {}（需要 {}，已分配 {}）",
                        material.material_code,
                        material.shortfall,
                        material.required_quantity,
                        material.consumed_quantity
                    ),
                ));
                pass.allocation.shortfalls.push(Shortfall {
                    work_order_number: work_order.order_no.clone(),
                    product_code: work_order.item_code.clone(),
                    material_code: material.material_code.clone(),
                    required: material.required_quantity,
                    allocated: material.consumed_quantity,
                    missing: material.shortfall,
                });
            }

            consumed_materials.push(material);
        }

        let lot_number = pass
            .sequencer
            .next_lot_number(&work_order.item_code, production_date);

        tracing::debug!(
            "作業指示 {} → 成品 LOT {}（物料 {} 項）",
            work_order.order_no,
            lot_number,
            consumed_materials.len()
        );

        pass.allocation.mappings.push(ProductLotMapping {
            product_code: work_order.item_code.clone(),
            product_name: product.name.clone(),
            lot_number,
            consumed_materials,
            production_date,
            production_order_number: work_order.order_no.clone(),
            quality_result: if work_order.is_completed() {
                QualityResult::Passed
            } else {
                QualityResult::Pending
            },
        });

        pass
    }

    /// 依 FIFO 從可用 LOT 消耗單一物料需求
    fn consume_fifo(
        ledger: &mut LotLedger,
        requirement: &ComponentRequirement,
        work_order: &WorkOrder,
        product: &Item,
        production_date: NaiveDate,
        line: &str,
    ) -> ConsumedMaterial {
        let mut material = ConsumedMaterial::new(
            requirement.material_code.clone(),
            requirement.material_name.clone(),
            requirement.unit.clone(),
            requirement.quantity,
        );

        let mut remaining = requirement.quantity;
        for position in ledger.fifo_candidates(&requirement.material_code) {
            if remaining <= Decimal::ZERO {
                break;
            }

            let lot = ledger.lot_mut(position);
            let consumed = lot.consume(Consumption {
                quantity: remaining,
                date: production_date,
                reference_document: &work_order.order_no,
                location: line,
                notes: Some(format!("生產消耗：{} 製造", product.name)),
            });

            if consumed > Decimal::ZERO {
                material.record_draw(&lot.lot_number, consumed);
                remaining -= consumed;
            }
        }

        material
    }
}
