//! LOT 帳本建立

use chrono::{Months, NaiveDate};
use lottrace_core::{
    InboundReceipt, Item, ItemCategory, LotMaster, LotSequencer, Partner, QualityStatus,
    RecordStore, TraceConfig,
};
use serde::Serialize;
use std::collections::HashMap;

/// LOT 帳本（依建立順序）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LotLedger {
    lots: Vec<LotMaster>,

    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl LotLedger {
    /// 從既有 LOT 建立帳本，重複的 LOT 號只保留第一筆
    pub fn from_lots(lots: Vec<LotMaster>) -> Self {
        let mut ledger = Self::default();
        for lot in lots {
            ledger.push(lot);
        }
        ledger
    }

    fn push(&mut self, lot: LotMaster) {
        if self.index.contains_key(&lot.lot_number) {
            tracing::debug!("LOT 號重複，略過: {}", lot.lot_number);
            return;
        }
        self.index.insert(lot.lot_number.clone(), self.lots.len());
        self.lots.push(lot);
    }

    pub fn lots(&self) -> &[LotMaster] {
        &self.lots
    }

    pub fn get(&self, lot_number: &str) -> Option<&LotMaster> {
        self.index.get(lot_number).map(|&i| &self.lots[i])
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// FIFO 候選 LOT：物料相符、可用，依入庫日排序（同日保持建立順序）
    pub(crate) fn fifo_candidates(&self, material_code: &str) -> Vec<usize> {
        let mut candidates: Vec<usize> = self
            .lots
            .iter()
            .enumerate()
            .filter(|(_, lot)| lot.material_code == material_code && lot.is_available())
            .map(|(i, _)| i)
            .collect();

        candidates.sort_by_key(|&i| self.lots[i].inbound_date);
        candidates
    }

    pub(crate) fn lot_mut(&mut self, position: usize) -> &mut LotMaster {
        &mut self.lots[position]
    }

    /// 指定日期（含）前到期且仍可用的 LOT
    pub fn expiring_lots(&self, as_of: NaiveDate) -> Vec<&LotMaster> {
        self.lots
            .iter()
            .filter(|lot| lot.is_available() && lot.expires_by(as_of))
            .collect()
    }
}

/// LOT 帳本建立器
pub struct LedgerBuilder<'a> {
    store: &'a RecordStore,
    config: &'a TraceConfig,
}

impl<'a> LedgerBuilder<'a> {
    pub fn new(store: &'a RecordStore, config: &'a TraceConfig) -> Self {
        Self { store, config }
    }

    /// 由物料入庫記錄建立 LOT 帳本
    ///
    /// 品目或供應商無法對應的入庫記錄直接略過，
    /// 由參照完整性檢查另行回報。
    pub fn build(&self) -> LotLedger {
        tracing::info!(
            "開始建立 LOT 帳本：入庫 {} 筆",
            self.store.inbound_receipts.len()
        );

        let materials = first_by_code(self.store.materials(), |i| i.code.as_str());
        let suppliers = first_by_code(self.store.suppliers(), |p| p.code.as_str());

        let mut sequencer = LotSequencer::new();
        let mut ledger = LotLedger::default();
        let mut skipped = 0usize;

        for receipt in &self.store.inbound_receipts {
            let material = materials.get(receipt.item_code.as_str());
            let supplier = suppliers.get(receipt.supplier_code.as_str());

            match (material, supplier) {
                (Some(material), Some(supplier)) => {
                    let lot = self.create_lot(receipt, material, supplier, &mut sequencer);
                    tracing::debug!("建立 LOT: {} ({})", lot.lot_number, lot.original_quantity);
                    ledger.push(lot);
                }
                _ => {
                    skipped += 1;
                    tracing::debug!(
                        "入庫記錄無法對應主檔，略過: 品目 {} / 供應商 {}",
                        receipt.item_code,
                        receipt.supplier_code
                    );
                }
            }
        }

        tracing::info!("LOT 帳本建立完成：{} 筆，略過 {} 筆", ledger.len(), skipped);
        ledger
    }

    fn create_lot(
        &self,
        receipt: &InboundReceipt,
        material: &Item,
        supplier: &Partner,
        sequencer: &mut LotSequencer,
    ) -> LotMaster {
        let inbound_date = receipt.inbound_date.unwrap_or(self.config.snapshot_date);
        let lot_number = sequencer.next_lot_number(&receipt.item_code, inbound_date);

        let unit = non_empty_or(&material.unit, &self.config.default_unit);
        let location = non_empty_or(&receipt.location, &self.config.default_inbound_location);

        let mut lot = LotMaster::new(
            lot_number,
            receipt.item_code.clone(),
            material.name.clone(),
            supplier.code.clone(),
            supplier.name.clone(),
            inbound_date,
            receipt.quantity,
            unit,
            location,
        )
        .with_quality_status(QualityStatus::parse(&receipt.quality_status))
        .with_reference_document(receipt.purchase_order_no.clone());

        if let Some(expiry) = self.expiry_date(material.category, inbound_date) {
            lot = lot.with_expiry_date(expiry);
        }

        lot
    }

    /// 有效期限：原材料 +6 個月，副材料 +12 個月（可設定）
    fn expiry_date(&self, category: ItemCategory, inbound_date: NaiveDate) -> Option<NaiveDate> {
        let months = match category {
            ItemCategory::RawMaterial => self.config.raw_material_shelf_life_months,
            _ => self.config.sub_material_shelf_life_months,
        };
        inbound_date.checked_add_months(Months::new(months))
    }
}

fn first_by_code<'a, T, I, F>(rows: I, key: F) -> HashMap<&'a str, &'a T>
where
    I: Iterator<Item = &'a T>,
    F: Fn(&'a T) -> &'a str,
{
    let mut map = HashMap::new();
    for row in rows {
        map.entry(key(row)).or_insert(row);
    }
    map
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
