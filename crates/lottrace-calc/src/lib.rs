//! # Lot Trace Calculation Engine
//!
//! LOT 帳本建立、FIFO 消耗分配與雙向追溯

pub mod allocation;
pub mod explosion;
pub mod ledger;
pub mod resolver;

// Re-export 主要類型
pub use allocation::{Allocation, FifoAllocator, Shortfall};
pub use explosion::{BomExplosion, ComponentRequirement, Explosion};
pub use ledger::{LedgerBuilder, LotLedger};
pub use resolver::{
    BackwardTrace, ForwardTrace, LotSnapshot, LotSummary, MaterialTrace, ProductSnapshot,
    ProductUsage, SourceLot, TraceResolver, TransactionView,
};

use serde::Serialize;

/// 追溯計算警告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceWarning {
    /// 參考單據或品目代碼
    pub reference: String,
    pub message: String,
    pub kind: WarningKind,
}

impl TraceWarning {
    pub fn new(reference: String, message: String, kind: WarningKind) -> Self {
        Self {
            reference,
            message,
            kind,
        }
    }

    pub fn under_allocation(reference: String, message: String) -> Self {
        Self::new(reference, message, WarningKind::UnderAllocation)
    }

    pub fn bom_cycle(reference: String, message: String) -> Self {
        Self::new(reference, message, WarningKind::BomCycle)
    }

    pub fn depth_limit(reference: String, message: String) -> Self {
        Self::new(reference, message, WarningKind::BomDepthLimit)
    }

    pub fn quantity_overflow(reference: String, message: String) -> Self {
        Self::new(reference, message, WarningKind::QuantityOverflow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// LOT 剩餘量不足以滿足生產需求
    UnderAllocation,
    /// BOM 存在循環參照
    BomCycle,
    /// 多層展開超過最大深度
    BomDepthLimit,
    /// 需求數量超出可表示範圍，已以上限值計算
    QuantityOverflow,
}
