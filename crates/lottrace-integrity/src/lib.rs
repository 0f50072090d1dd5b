//! # Lot Trace Integrity
//!
//! ERP 快照的參照完整性與業務一致性檢查

pub mod consistency;
pub mod referential;
pub mod report;
pub mod rules;

// Re-export 主要類型
pub use consistency::{ConsistencyChecker, INVENTORY_CHECK_ID, ORDER_FLOW_CHECK_ID};
pub use referential::ReferentialChecker;
pub use report::{CheckStatus, IntegrityCheckResult, IntegritySummary};
pub use rules::{default_rules, rules_from_json, IntegrityRule};
