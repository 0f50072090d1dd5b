//! # Lot Trace Core
//!
//! ERP 快照資料模型、LOT 實體與追溯設定

pub mod config;
pub mod lot;
pub mod mapping;
pub mod records;

mod lenient;

// Re-export 主要類型
pub use config::{ExplosionMode, TraceConfig};
pub use lot::{
    lot_number, Consumption, LotMaster, LotSequencer, LotStatus, LotTransaction, QualityStatus,
    TransactionType,
};
pub use mapping::{ConsumedMaterial, LotDraw, ProductLotMapping, QualityResult};
pub use records::{
    AccountingEntry, AttendanceRecord, BomLine, Employee, InboundReceipt, InventoryRecord, Item,
    ItemCategory, Partner, PartnerKind, PurchaseOrder, Record, RecordStore, SalesOrder, Shipment,
    Table, WorkOrder,
};

/// 追溯引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("快照解析失敗: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    #[error("無效的設定: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TraceError>;
