//! 成品 LOT 與投入物料對照（追溯圖的邊）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 成品品質判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityResult {
    Passed,
    Pending,
    Failed,
}

/// 從單一 LOT 抽取的數量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotDraw {
    pub lot_number: String,
    pub quantity: Decimal,
}

/// 單一物料的投入記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumedMaterial {
    pub material_code: String,

    pub material_name: String,

    pub unit: String,

    /// BOM 用量 × 指示數量
    pub required_quantity: Decimal,

    /// 實際分配量（各 LOT 抽取量總和）
    pub consumed_quantity: Decimal,

    /// 未滿足量（required - consumed）
    pub shortfall: Decimal,

    /// 依 FIFO 順序的來源 LOT
    pub sources: Vec<LotDraw>,
}

impl ConsumedMaterial {
    pub fn new(
        material_code: String,
        material_name: String,
        unit: String,
        required_quantity: Decimal,
    ) -> Self {
        Self {
            material_code,
            material_name,
            unit,
            required_quantity,
            consumed_quantity: Decimal::ZERO,
            shortfall: required_quantity.max(Decimal::ZERO),
            sources: Vec::new(),
        }
    }

    /// 記錄一次 LOT 抽取
    pub fn record_draw(&mut self, lot_number: &str, quantity: Decimal) {
        if quantity <= Decimal::ZERO {
            return;
        }

        // 同一 LOT 只保留一筆抽取記錄
        match self.sources.iter_mut().find(|d| d.lot_number == lot_number) {
            Some(draw) => draw.quantity += quantity,
            None => self.sources.push(LotDraw {
                lot_number: lot_number.to_string(),
                quantity,
            }),
        }

        self.consumed_quantity += quantity;
        self.shortfall = (self.required_quantity - self.consumed_quantity).max(Decimal::ZERO);
    }

    /// 來源 LOT 號
    pub fn source_lot_numbers(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|d| d.lot_number.as_str())
    }

    /// 從指定 LOT 抽取的數量
    pub fn drawn_from(&self, lot_number: &str) -> Option<Decimal> {
        self.sources
            .iter()
            .find(|d| d.lot_number == lot_number)
            .map(|d| d.quantity)
    }

    pub fn is_short(&self) -> bool {
        self.shortfall > Decimal::ZERO
    }
}

/// 成品 LOT 對照（每張產出的作業指示一筆，建立後不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLotMapping {
    pub product_code: String,

    pub product_name: String,

    pub lot_number: String,

    pub consumed_materials: Vec<ConsumedMaterial>,

    pub production_date: NaiveDate,

    pub production_order_number: String,

    pub quality_result: QualityResult,
}

impl ProductLotMapping {
    /// 是否引用指定物料 LOT
    pub fn references(&self, lot_number: &str) -> bool {
        self.consumed_materials
            .iter()
            .any(|cm| cm.source_lot_numbers().any(|l| l == lot_number))
    }

    /// 從指定物料 LOT 抽取的總量
    pub fn drawn_from(&self, lot_number: &str) -> Decimal {
        self.consumed_materials
            .iter()
            .filter_map(|cm| cm.drawn_from(lot_number))
            .sum()
    }

    /// 所有物料的未滿足量總和
    pub fn total_shortfall(&self) -> Decimal {
        self.consumed_materials.iter().map(|cm| cm.shortfall).sum()
    }
}
