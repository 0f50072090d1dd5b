//! 參照完整性規則表

use lottrace_core::Table;
use serde::{Deserialize, Serialize};

/// 參照完整性規則：子表的鍵必須存在於父表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityRule {
    pub name: String,

    pub parent_table: Table,

    pub parent_key: String,

    pub child_table: Table,

    pub child_key: String,

    /// 必要參照：缺漏或無法對應時為錯誤；否則為警告
    #[serde(default = "required_by_default")]
    pub required: bool,
}

fn required_by_default() -> bool {
    true
}

impl IntegrityRule {
    pub fn new(
        name: &str,
        parent_table: Table,
        parent_key: &str,
        child_table: Table,
        child_key: &str,
        required: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            parent_table,
            parent_key: parent_key.to_string(),
            child_table,
            child_key: child_key.to_string(),
            required,
        }
    }

    /// 檢查說明
    pub fn description(&self) -> String {
        format!(
            "{}.{} → {}.{} 參照完整性檢查",
            self.child_table, self.child_key, self.parent_table, self.parent_key
        )
    }
}

/// 預設規則表（14 條）
pub fn default_rules() -> Vec<IntegrityRule> {
    use Table::*;

    vec![
        // 交易對象
        IntegrityRule::new(
            "수주-거래처 연결",
            Partners,
            "거래처코드",
            SalesOrders,
            "거래처코드",
            true,
        ),
        IntegrityRule::new(
            "구매발주-거래처 연결",
            Partners,
            "거래처코드",
            PurchaseOrders,
            "거래처코드",
            true,
        ),
        IntegrityRule::new(
            "출하-거래처 연결",
            Partners,
            "거래처코드",
            Shipments,
            "거래처코드",
            true,
        ),
        // 品目
        IntegrityRule::new("수주-품목 연결", Items, "품목코드", SalesOrders, "품목코드", true),
        IntegrityRule::new("작업지시-품목 연결", Items, "품목코드", WorkOrders, "품목코드", true),
        IntegrityRule::new("BOM-상위품목 연결", Items, "품목코드", Bom, "상위품목코드", true),
        IntegrityRule::new("BOM-하위품목 연결", Items, "품목코드", Bom, "하위품목코드", true),
        IntegrityRule::new("재고-품목 연결", Items, "품목코드", Inventory, "품목코드", true),
        IntegrityRule::new("출하-품목 연결", Items, "품목코드", Shipments, "품목코드", true),
        // 生產
        IntegrityRule::new(
            "작업지시-수주 연결",
            SalesOrders,
            "수주번호",
            WorkOrders,
            "수주번호",
            false,
        ),
        IntegrityRule::new(
            "출하-작업지시 연결",
            WorkOrders,
            "작업지시번호",
            Shipments,
            "작업지시번호",
            false,
        ),
        // 採購
        IntegrityRule::new(
            "자재입고-구매발주 연결",
            PurchaseOrders,
            "발주번호",
            InboundReceipts,
            "구매발주번호",
            true,
        ),
        // 人事
        IntegrityRule::new("근태-직원 연결", Employees, "사번", Attendance, "사번", true),
        // 會計
        IntegrityRule::new(
            "회계-거래처 연결",
            Partners,
            "거래처코드",
            Accounting,
            "거래처코드",
            true,
        ),
    ]
}

/// 從 JSON 陣列載入規則表
pub fn rules_from_json(raw: &str) -> lottrace_core::Result<Vec<IntegrityRule>> {
    Ok(serde_json::from_str(raw)?)
}
