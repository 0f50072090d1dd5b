//! LOT 主檔與交易記錄

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 產生 LOT 號：`LOT-<品目代碼>-<YYYYMMDD>-<序號>`
pub fn lot_number(code: &str, date: NaiveDate, sequence: u32) -> String {
    format!("LOT-{}-{}-{:03}", code, date.format("%Y%m%d"), sequence)
}

/// LOT 序號產生器
///
/// 每個（品目代碼, 日期）組合獨立遞增，從 1 開始。
#[derive(Debug, Clone, Default)]
pub struct LotSequencer {
    counters: HashMap<(String, NaiveDate), u32>,
}

impl LotSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得下一個序號
    pub fn next(&mut self, code: &str, date: NaiveDate) -> u32 {
        let counter = self
            .counters
            .entry((code.to_string(), date))
            .or_insert(0);
        *counter += 1;
        *counter
    }

    /// 取得下一個 LOT 號
    pub fn next_lot_number(&mut self, code: &str, date: NaiveDate) -> String {
        let sequence = self.next(code, date);
        lot_number(code, date, sequence)
    }
}

/// LOT 交易類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Inbound,
    ProductionConsume,
    ProductionOutput,
    Shipment,
    Adjustment,
}

/// 品質狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStatus {
    #[default]
    Passed,
    Pending,
    Failed,
    Quarantine,
}

impl QualityStatus {
    /// 解析入庫記錄的品質狀態，無法識別時視為合格
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => QualityStatus::Pending,
            "failed" => QualityStatus::Failed,
            "quarantine" => QualityStatus::Quarantine,
            _ => QualityStatus::Passed,
        }
    }
}

/// LOT 生命週期狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    Active,
    Consumed,
    Expired,
    Scrapped,
}

/// LOT 交易（只增不改）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotTransaction {
    /// 交易ID：`TXN-<LOT號>-<序號>`
    pub id: String,

    pub lot_number: String,

    pub transaction_type: TransactionType,

    pub material_code: String,

    pub material_name: String,

    /// 帶符號數量（消耗為負）
    pub quantity: Decimal,

    pub unit: String,

    pub transaction_date: NaiveDate,

    /// 參考單據（採購發注號、作業指示號、出貨號…）
    pub reference_document: String,

    pub location: String,

    pub notes: Option<String>,
}

/// LOT 消耗請求
#[derive(Debug, Clone)]
pub struct Consumption<'a> {
    pub quantity: Decimal,
    pub date: NaiveDate,
    pub reference_document: &'a str,
    pub location: &'a str,
    pub notes: Option<String>,
}

/// LOT 主檔
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotMaster {
    pub lot_number: String,

    pub material_code: String,

    pub material_name: String,

    pub supplier_code: String,

    pub supplier_name: String,

    pub inbound_date: NaiveDate,

    pub expiry_date: Option<NaiveDate>,

    pub original_quantity: Decimal,

    /// 剩餘數量，恆滿足 0 ≤ current ≤ original
    pub current_quantity: Decimal,

    pub unit: String,

    pub quality_status: QualityStatus,

    pub location: String,

    pub status: LotStatus,

    pub transactions: Vec<LotTransaction>,
}

impl LotMaster {
    /// 建立新 LOT 並寫入入庫交易
    ///
    /// 入庫量為零或負數時數量歸零，LOT 直接以 `Consumed` 狀態建立。
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lot_number: String,
        material_code: String,
        material_name: String,
        supplier_code: String,
        supplier_name: String,
        inbound_date: NaiveDate,
        quantity: Decimal,
        unit: String,
        location: String,
    ) -> Self {
        let quantity = quantity.max(Decimal::ZERO);
        let inbound = LotTransaction {
            id: format!("TXN-{}-001", lot_number),
            lot_number: lot_number.clone(),
            transaction_type: TransactionType::Inbound,
            material_code: material_code.clone(),
            material_name: material_name.clone(),
            quantity,
            unit: unit.clone(),
            transaction_date: inbound_date,
            reference_document: String::new(),
            location: location.clone(),
            notes: Some(format!("入庫：{} 供應", supplier_name)),
        };

        Self {
            lot_number,
            material_code,
            material_name,
            supplier_code,
            supplier_name,
            inbound_date,
            expiry_date: None,
            original_quantity: quantity,
            current_quantity: quantity,
            unit,
            quality_status: QualityStatus::Passed,
            location,
            status: if quantity > Decimal::ZERO {
                LotStatus::Active
            } else {
                LotStatus::Consumed
            },
            transactions: vec![inbound],
        }
    }

    /// 建構器模式：設置有效期限
    pub fn with_expiry_date(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    /// 建構器模式：設置品質狀態
    pub fn with_quality_status(mut self, status: QualityStatus) -> Self {
        self.quality_status = status;
        self
    }

    /// 建構器模式：設置入庫參考單據（採購發注號）
    pub fn with_reference_document(mut self, reference: String) -> Self {
        if let Some(inbound) = self.transactions.first_mut() {
            inbound.reference_document = reference;
        }
        self
    }

    /// 是否可供分配
    pub fn is_available(&self) -> bool {
        self.status == LotStatus::Active && self.current_quantity > Decimal::ZERO
    }

    /// 從此 LOT 消耗數量
    ///
    /// 實際消耗量為 `min(請求量, 剩餘量)`，回傳實際消耗量。
    /// 剩餘量歸零時狀態轉為 `Consumed`。
    pub fn consume(&mut self, request: Consumption<'_>) -> Decimal {
        let quantity = request.quantity.min(self.current_quantity);
        if quantity <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let id = format!("TXN-{}-{:03}", self.lot_number, self.transactions.len() + 1);
        self.transactions.push(LotTransaction {
            id,
            lot_number: self.lot_number.clone(),
            transaction_type: TransactionType::ProductionConsume,
            material_code: self.material_code.clone(),
            material_name: self.material_name.clone(),
            quantity: -quantity,
            unit: self.unit.clone(),
            transaction_date: request.date,
            reference_document: request.reference_document.to_string(),
            location: request.location.to_string(),
            notes: request.notes,
        });

        self.current_quantity -= quantity;
        if self.current_quantity <= Decimal::ZERO {
            self.current_quantity = Decimal::ZERO;
            self.status = LotStatus::Consumed;
        }

        quantity
    }

    /// 累計消耗量（所有消耗交易的絕對值總和）
    pub fn consumed_quantity(&self) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::ProductionConsume)
            .map(|t| t.quantity.abs())
            .sum()
    }

    /// 是否在指定日期（含）前到期
    pub fn expires_by(&self, date: NaiveDate) -> bool {
        self.expiry_date.map_or(false, |expiry| expiry <= date)
    }
}
