//! 業務邏輯一致性檢查
//!
//! - 庫存平衡：入庫 - BOM 理論消耗 與現有庫存比對
//! - 訂單流程：受注量 ≥ 生產量 ≥ 出貨量 的單調性

use lottrace_core::{RecordStore, TraceConfig};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

use crate::report::IntegrityCheckResult;

pub const INVENTORY_CHECK_ID: &str = "BL_INVENTORY_CONSISTENCY";
pub const ORDER_FLOW_CHECK_ID: &str = "BL_ORDER_FLOW_CONSISTENCY";

/// 業務一致性檢查器
pub struct ConsistencyChecker<'a> {
    store: &'a RecordStore,
    config: &'a TraceConfig,
}

impl<'a> ConsistencyChecker<'a> {
    pub fn new(store: &'a RecordStore, config: &'a TraceConfig) -> Self {
        Self { store, config }
    }

    pub fn check(&self) -> Vec<IntegrityCheckResult> {
        tracing::info!("開始業務一致性檢查");
        vec![self.inventory_balance(), self.order_flow()]
    }

    /// 庫存平衡檢查
    ///
    /// 預期庫存 = Σ入庫量 - Σ(作業指示數量 × BOM 用量)，
    /// 與現有庫存差異超過容許誤差時警告。
    pub fn inventory_balance(&self) -> IntegrityCheckResult {
        let mut check = IntegrityCheckResult::new(
            INVENTORY_CHECK_ID,
            "재고 수량 일관성",
            "入庫量、生產消耗量與現有庫存的一致性檢查",
        );

        let mut inbound = Totals::default();
        for receipt in &self.store.inbound_receipts {
            inbound.add(&receipt.item_code, Some(receipt.quantity));
        }

        // 作業指示數量先依品目彙總，再乘上 BOM 用量
        let mut ordered = Totals::default();
        for work_order in &self.store.work_orders {
            ordered.add(&work_order.item_code, Some(work_order.quantity));
        }

        let mut consumed = Totals::default();
        for line in &self.store.bom {
            let parent = line.parent_code.as_str();
            if ordered.overflowed.contains(parent) {
                consumed.add(&line.child_code, None);
            } else if let Some(&quantity) = ordered.sums.get(parent) {
                consumed.add(&line.child_code, line.quantity.checked_mul(quantity));
            }
        }

        for record in &self.store.inventory {
            let code = record.item_code.as_str();
            let balance = inbound
                .get(code)
                .zip(consumed.get(code))
                .and_then(|(inbound, consumed)| inbound.checked_sub(consumed))
                .and_then(|expected| Some((expected, expected.checked_sub(record.on_hand)?)));

            match balance {
                None => {
                    tracing::warn!("庫存數量溢位，無法驗證: {}", code);
                    check.warn(format!("{}: 數量超出可表示範圍，無法驗證庫存平衡", code));
                }
                Some((expected, difference))
                    if difference.abs() > self.config.balance_tolerance =>
                {
                    tracing::debug!(
                        "庫存不一致: {} 預期 {} / 實際 {}",
                        code,
                        expected,
                        record.on_hand
                    );
                    check.warn(format!(
                        "{}: 預期庫存({}) ≠ 實際庫存({})",
                        code,
                        expected.normalize(),
                        record.on_hand.normalize()
                    ));
                }
                Some(_) => {}
            }
        }

        check.finish("所有庫存數量皆保持一致")
    }

    /// 受注 → 生產 → 出貨 流程檢查
    ///
    /// 與受注相關的作業指示 / 出貨：受注號相同，或品目相同（每筆只計一次）。
    /// 生產不足為警告，出貨超過生產為錯誤。
    pub fn order_flow(&self) -> IntegrityCheckResult {
        let mut check = IntegrityCheckResult::new(
            ORDER_FLOW_CHECK_ID,
            "수주-생산-출하 흐름",
            "受注量、生產量、出貨量的連結性與一致性檢查",
        );

        let production = RelatedQuantities::collect(
            self.store
                .work_orders
                .iter()
                .map(|wo| (wo.sales_order_no.as_str(), wo.item_code.as_str(), wo.quantity)),
        );
        let shipping = RelatedQuantities::collect(
            self.store
                .shipments
                .iter()
                .map(|s| (s.sales_order_no.as_str(), s.item_code.as_str(), s.quantity)),
        );

        for order in &self.store.sales_orders {
            let produced = production.related(&order.order_no, &order.item_code);
            let shipped = shipping.related(&order.order_no, &order.item_code);

            if produced < order.quantity {
                check.warn(format!(
                    "受注 {}: 生產不足（受注 {} > 生產 {}）",
                    order.order_no,
                    order.quantity.normalize(),
                    produced.normalize()
                ));
            }

            if shipped > produced {
                tracing::debug!("受注 {} 出貨超過生產", order.order_no);
                check.fail(format!(
                    "受注 {}: 出貨超量（出貨 {} > 生產 {}）",
                    order.order_no,
                    shipped.normalize(),
                    produced.normalize()
                ));
            }
        }

        check.finish("所有受注-生產-出貨流程皆保持一致")
    }
}

/// 依品目彙總的數量；溢位的品目另外記錄，不參與比對
#[derive(Default)]
struct Totals<'a> {
    sums: HashMap<&'a str, Decimal>,
    overflowed: HashSet<&'a str>,
}

impl<'a> Totals<'a> {
    /// `None` 表示上游計算已溢位
    fn add(&mut self, code: &'a str, quantity: Option<Decimal>) {
        let total = self.sums.entry(code).or_default();
        match quantity.and_then(|q| total.checked_add(q)) {
            Some(sum) => *total = sum,
            None => {
                self.overflowed.insert(code);
            }
        }
    }

    /// 品目合計；無記錄為零，溢位為 `None`
    fn get(&self, code: &str) -> Option<Decimal> {
        if self.overflowed.contains(code) {
            return None;
        }
        Some(self.sums.get(code).copied().unwrap_or_default())
    }
}

/// 預先彙總的關聯數量
///
/// `by_item` 為品目總量；`by_order` 保留每個受注號下各品目的數量，
/// 用來補上受注號相同但品目不同的記錄。
#[derive(Default)]
struct RelatedQuantities<'a> {
    by_item: HashMap<&'a str, Decimal>,
    by_order: HashMap<&'a str, Vec<(&'a str, Decimal)>>,
}

impl<'a> RelatedQuantities<'a> {
    fn collect(rows: impl Iterator<Item = (&'a str, &'a str, Decimal)>) -> Self {
        let mut related = Self::default();
        for (order_no, item_code, quantity) in rows {
            let total = related.by_item.entry(item_code).or_default();
            *total = total.saturating_add(quantity);
            if !order_no.trim().is_empty() {
                related
                    .by_order
                    .entry(order_no)
                    .or_default()
                    .push((item_code, quantity));
            }
        }
        related
    }

    /// 受注號相同或品目相同的數量合計；空白受注號不參與比對
    fn related(&self, order_no: &str, item_code: &str) -> Decimal {
        let by_item = self.by_item.get(item_code).copied().unwrap_or_default();

        if order_no.trim().is_empty() {
            return by_item;
        }

        let by_order = self
            .by_order
            .get(order_no)
            .into_iter()
            .flatten()
            .filter(|(code, _)| *code != item_code)
            .fold(Decimal::ZERO, |sum, (_, quantity)| sum.saturating_add(*quantity));

        by_item.saturating_add(by_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckStatus;
    use chrono::NaiveDate;
    use lottrace_core::{
        BomLine, InboundReceipt, InventoryRecord, SalesOrder, Shipment, WorkOrder,
    };
    use rstest::rstest;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn config() -> TraceConfig {
        TraceConfig::new(date())
    }

    fn inventory_store(on_hand: Decimal) -> RecordStore {
        let mut store = RecordStore::new();
        store.bom = vec![
            BomLine::new("F1", "M1", Decimal::from(5)),
            BomLine::new("F2", "M1", Decimal::new(25, 1)),
        ];
        store.inbound_receipts = vec![
            InboundReceipt::new("M1", "S1", Decimal::from(100), date()),
            InboundReceipt::new("M1", "S1", Decimal::from(50), date()),
        ];
        store.work_orders = vec![
            WorkOrder::new("WO-001", "F1", Decimal::from(10), date()),
            WorkOrder::new("WO-002", "F1", Decimal::from(4), date()),
            WorkOrder::new("WO-003", "F2", Decimal::from(2), date()),
        ];
        store.inventory = vec![InventoryRecord::new("M1", on_hand)];
        store
    }

    #[rstest]
    // 150 - (14 × 5 + 2 × 2.5) = 75
    #[case::exact(Decimal::from(75), CheckStatus::Passed)]
    #[case::within_tolerance(Decimal::new(7501, 2), CheckStatus::Passed)]
    #[case::beyond_tolerance(Decimal::new(7502, 2), CheckStatus::Warning)]
    #[case::short(Decimal::from(70), CheckStatus::Warning)]
    fn test_inventory_balance(#[case] on_hand: Decimal, #[case] expected: CheckStatus) {
        let store = inventory_store(on_hand);
        let config = config();

        let check = ConsistencyChecker::new(&store, &config).inventory_balance();

        assert_eq!(check.status, expected);
        assert_eq!(check.error_count, 0);
    }

    #[test]
    fn test_inventory_balance_detail() {
        let store = inventory_store(Decimal::from(70));
        let config = config();

        let check = ConsistencyChecker::new(&store, &config).inventory_balance();

        assert_eq!(check.details, vec!["M1: 預期庫存(75) ≠ 實際庫存(70)"]);
    }

    #[test]
    fn test_inventory_item_without_movements() {
        let mut store = RecordStore::new();
        store.inventory = vec![InventoryRecord::new("M9", Decimal::ZERO)];
        let config = config();

        let check = ConsistencyChecker::new(&store, &config).inventory_balance();

        assert_eq!(check.status, CheckStatus::Passed);
        assert_eq!(check.details, vec!["所有庫存數量皆保持一致"]);
    }

    #[test]
    fn test_inventory_overflow_reported_not_fatal() {
        let huge = Decimal::from_scientific("1e15").unwrap();
        let mut store = inventory_store(Decimal::from(75));
        store.bom.push(BomLine::new("F9", "M2", huge));
        store.work_orders.push(WorkOrder::new("WO-009", "F9", huge, date()));
        store.inbound_receipts.push(InboundReceipt::new("M3", "S1", Decimal::MAX, date()));
        store.inbound_receipts.push(InboundReceipt::new("M3", "S1", Decimal::MAX, date()));
        store.inventory.push(InventoryRecord::new("M2", Decimal::ZERO));
        store.inventory.push(InventoryRecord::new("M3", Decimal::ZERO));
        let config = config();

        let check = ConsistencyChecker::new(&store, &config).inventory_balance();

        assert_eq!(check.status, CheckStatus::Warning);
        assert_eq!(
            check.details,
            vec![
                "M2: 數量超出可表示範圍，無法驗證庫存平衡",
                "M3: 數量超出可表示範圍，無法驗證庫存平衡",
            ]
        );
    }

    #[test]
    fn test_order_flow_saturates_large_totals() {
        let mut store = order_store();
        store.work_orders = vec![
            WorkOrder::new("WO-001", "F1", Decimal::MAX, date()),
            WorkOrder::new("WO-002", "F1", Decimal::MAX, date()),
        ];
        store.shipments = vec![Shipment::new("SH-001", "C1", "F1", Decimal::from(20))];
        let config = config();

        let check = ConsistencyChecker::new(&store, &config).order_flow();

        assert_eq!(check.status, CheckStatus::Passed);
    }

    fn order_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.sales_orders = vec![SalesOrder::new("SO-001", "C1", "F1", Decimal::from(20))];
        store
    }

    #[test]
    fn test_order_flow_consistent() {
        let mut store = order_store();
        store.work_orders = vec![
            WorkOrder::new("WO-001", "F1", Decimal::from(20), date()).with_sales_order("SO-001"),
        ];
        store.shipments =
            vec![Shipment::new("SH-001", "C1", "F1", Decimal::from(20)).with_sales_order("SO-001")];
        let config = config();

        let check = ConsistencyChecker::new(&store, &config).order_flow();

        assert_eq!(check.status, CheckStatus::Passed);
    }

    #[test]
    fn test_order_flow_under_production_and_over_shipment() {
        let mut store = order_store();
        store.work_orders = vec![WorkOrder::new("WO-001", "F1", Decimal::from(10), date())];
        store.shipments = vec![Shipment::new("SH-001", "C1", "F1", Decimal::from(15))];
        let config = config();

        let check = ConsistencyChecker::new(&store, &config).order_flow();

        assert_eq!(check.status, CheckStatus::Failed);
        assert_eq!(check.warning_count, 1);
        assert_eq!(check.error_count, 1);
        assert_eq!(
            check.details,
            vec![
                "受注 SO-001: 生產不足（受注 20 > 生產 10）",
                "受注 SO-001: 出貨超量（出貨 15 > 生產 10）",
            ]
        );
    }

    #[test]
    fn test_order_flow_counts_each_record_once() {
        let mut store = order_store();
        store.work_orders = vec![
            // 受注號與品目都相符
            WorkOrder::new("WO-001", "F1", Decimal::from(10), date()).with_sales_order("SO-001"),
            // 只有受注號相符
            WorkOrder::new("WO-002", "F9", Decimal::from(5), date()).with_sales_order("SO-001"),
            // 只有品目相符
            WorkOrder::new("WO-003", "F1", Decimal::from(5), date()).with_sales_order("SO-777"),
            // 無關
            WorkOrder::new("WO-004", "F8", Decimal::from(99), date()),
        ];
        let config = config();

        let checker = ConsistencyChecker::new(&store, &config);
        let production = RelatedQuantities::collect(
            store
                .work_orders
                .iter()
                .map(|wo| (wo.sales_order_no.as_str(), wo.item_code.as_str(), wo.quantity)),
        );

        assert_eq!(production.related("SO-001", "F1"), Decimal::from(20));
        assert_eq!(checker.order_flow().status, CheckStatus::Passed);
    }

    #[test]
    fn test_blank_order_numbers_do_not_match() {
        let mut store = RecordStore::new();
        store.sales_orders = vec![SalesOrder::new("", "C1", "F1", Decimal::from(5))];
        store.work_orders = vec![WorkOrder::new("WO-001", "F2", Decimal::from(50), date())];
        let config = config();

        let check = ConsistencyChecker::new(&store, &config).order_flow();

        assert_eq!(check.status, CheckStatus::Warning);
    }

    #[test]
    fn test_check_runs_both() {
        let store = RecordStore::new();
        let config = config();

        let checks = ConsistencyChecker::new(&store, &config).check();

        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].check_id, INVENTORY_CHECK_ID);
        assert_eq!(checks[1].check_id, ORDER_FLOW_CHECK_ID);
        assert!(checks.iter().all(|c| c.is_passed()));
    }
}
