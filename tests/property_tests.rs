//! LOT 分配與追溯的性質測試
//!
//! 以隨機入庫 / 作業指示驗證 FIFO 順序、數量守恆、決定性與雙向追溯對稱，
//! 並以隨機子表鍵值驗證必要參照規則的完整性。

use chrono::{Duration, NaiveDate};
use lottrace::{
    CheckStatus, FifoAllocator, IntegrityRule, LedgerBuilder, LotMaster, TraceConfig,
    TraceResolver,
};
use lottrace_core::{
    BomLine, InboundReceipt, Item, ItemCategory, Partner, PartnerKind, RecordStore, Table,
    TransactionType, WorkOrder,
};
use lottrace_integrity::ReferentialChecker;
use proptest::prelude::*;
use rust_decimal::Decimal;

const MATERIALS: [&str; 3] = ["M1", "M2", "M3"];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// (物料索引, 數量, 入庫日偏移)
fn receipt_strategy() -> impl Strategy<Value = (usize, i64, i64)> {
    (0usize..MATERIALS.len(), 0i64..200, 0i64..60)
}

// (成品索引, 指示數量, 開始日偏移)
fn work_order_strategy() -> impl Strategy<Value = (usize, i64, i64)> {
    (0usize..2, 0i64..30, 0i64..90)
}

fn build_store(receipts: &[(usize, i64, i64)], work_orders: &[(usize, i64, i64)]) -> RecordStore {
    let mut store = RecordStore::new();
    store.partners = vec![Partner::new("S1", "대성철강", PartnerKind::Supplier)];
    store.items = vec![
        Item::new("M1", "강판", ItemCategory::RawMaterial),
        Item::new("M2", "볼트", ItemCategory::SubMaterial),
        Item::new("M3", "도료", ItemCategory::SubMaterial),
        Item::new("F1", "레일", ItemCategory::FinishedGood),
        Item::new("F2", "브라켓", ItemCategory::FinishedGood),
    ];
    store.bom = vec![
        BomLine::new("F1", "M1", Decimal::from(3)),
        BomLine::new("F1", "M2", Decimal::from(2)),
        BomLine::new("F2", "M2", Decimal::ONE),
        BomLine::new("F2", "M3", Decimal::new(15, 1)),
    ];
    store.inbound_receipts = receipts
        .iter()
        .map(|&(material, quantity, offset)| {
            InboundReceipt::new(
                MATERIALS[material],
                "S1",
                Decimal::from(quantity),
                base_date() + Duration::days(offset),
            )
        })
        .collect();
    store.work_orders = work_orders
        .iter()
        .enumerate()
        .map(|(i, &(product, quantity, offset))| {
            WorkOrder::new(
                format!("WO-{:03}", i + 1),
                ["F1", "F2"][product],
                Decimal::from(quantity),
                base_date() + Duration::days(offset),
            )
        })
        .collect();
    store
}

fn resolve(store: &RecordStore) -> (TraceResolver, Vec<lottrace::Shortfall>) {
    let config = TraceConfig::new(base_date());
    let ledger = LedgerBuilder::new(store, &config).build();
    let allocation = FifoAllocator::new(store, &config).allocate(ledger);
    let shortfalls = allocation.shortfalls.clone();
    (TraceResolver::from_allocation(allocation), shortfalls)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn lot_quantities_are_conserved(
        receipts in prop::collection::vec(receipt_strategy(), 0..12),
        work_orders in prop::collection::vec(work_order_strategy(), 0..10),
    ) {
        let store = build_store(&receipts, &work_orders);
        let (resolver, _) = resolve(&store);

        for lot in resolver.lots() {
            prop_assert!(lot.current_quantity >= Decimal::ZERO);
            prop_assert!(lot.current_quantity <= lot.original_quantity);
            prop_assert_eq!(lot.original_quantity - lot.current_quantity, lot.consumed_quantity());
            prop_assert_eq!(
                lot.current_quantity == Decimal::ZERO,
                lot.status == lottrace_core::LotStatus::Consumed
            );
        }
    }

    #[test]
    fn draws_follow_fifo_order(
        receipts in prop::collection::vec(receipt_strategy(), 0..12),
        work_orders in prop::collection::vec(work_order_strategy(), 0..10),
    ) {
        let store = build_store(&receipts, &work_orders);
        let (resolver, _) = resolve(&store);

        for mapping in resolver.mappings() {
            for material in &mapping.consumed_materials {
                let dates: Vec<NaiveDate> = material
                    .sources
                    .iter()
                    .map(|draw| resolver.ledger().get(&draw.lot_number).unwrap().inbound_date)
                    .collect();
                prop_assert!(dates.windows(2).all(|w| w[0] <= w[1]));

                // 除最後一個來源外，其餘來源 LOT 皆已耗盡
                if let Some((_, earlier)) = material.sources.split_last() {
                    for draw in earlier {
                        let lot = resolver.ledger().get(&draw.lot_number).unwrap();
                        prop_assert_eq!(lot.current_quantity, Decimal::ZERO);
                    }
                }

                prop_assert_eq!(
                    material.consumed_quantity,
                    material.sources.iter().map(|d| d.quantity).sum::<Decimal>()
                );
                prop_assert_eq!(
                    material.required_quantity - material.consumed_quantity,
                    material.shortfall
                );
            }
        }
    }

    #[test]
    fn older_lots_exhausted_before_newer_lots_drawn(
        receipts in prop::collection::vec(receipt_strategy(), 0..12),
        work_orders in prop::collection::vec(work_order_strategy(), 0..10),
    ) {
        let store = build_store(&receipts, &work_orders);
        let (resolver, _) = resolve(&store);

        for code in MATERIALS {
            // 入庫日穩定排序的候選順序（與帳本順序一致）
            let mut candidates: Vec<&LotMaster> = resolver
                .lots()
                .iter()
                .filter(|lot| lot.material_code == code && lot.original_quantity > Decimal::ZERO)
                .collect();
            candidates.sort_by_key(|lot| lot.inbound_date);

            // 有消耗的 LOT 必須是候選順序的前綴
            let touched = candidates
                .iter()
                .take_while(|lot| lot.consumed_quantity() > Decimal::ZERO)
                .count();
            for lot in &candidates[touched..] {
                prop_assert_eq!(lot.consumed_quantity(), Decimal::ZERO);
            }

            // 前綴中除最後一個外皆已耗盡
            for lot in &candidates[..touched.saturating_sub(1)] {
                prop_assert_eq!(lot.current_quantity, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn allocation_is_deterministic(
        receipts in prop::collection::vec(receipt_strategy(), 0..12),
        work_orders in prop::collection::vec(work_order_strategy(), 0..10),
    ) {
        let store = build_store(&receipts, &work_orders);
        let (first, first_shortfalls) = resolve(&store);
        let (second, second_shortfalls) = resolve(&store);

        prop_assert_eq!(first.lots(), second.lots());
        prop_assert_eq!(first.mappings(), second.mappings());
        prop_assert_eq!(first_shortfalls, second_shortfalls);
    }

    #[test]
    fn forward_and_backward_traces_agree(
        receipts in prop::collection::vec(receipt_strategy(), 0..12),
        work_orders in prop::collection::vec(work_order_strategy(), 0..10),
    ) {
        let store = build_store(&receipts, &work_orders);
        let (resolver, _) = resolve(&store);

        for mapping in resolver.mappings() {
            let backward = resolver.trace_product(&mapping.lot_number).unwrap();
            for source in backward.materials.iter().flat_map(|m| &m.source_lots) {
                let forward = resolver.trace_lot(&source.lot_number).unwrap();
                let usage = forward
                    .used_in_products
                    .iter()
                    .find(|p| p.product_lot_number == mapping.lot_number);
                prop_assert!(usage.is_some());
                prop_assert_eq!(usage.unwrap().consumed_quantity, source.quantity);
            }
        }

        // 每個 LOT 被抽取的總量等於其消耗交易總量
        for lot in resolver.lots() {
            let forward = resolver.trace_lot(&lot.lot_number).unwrap();
            let consumed: Decimal = forward
                .transactions
                .iter()
                .filter(|t| t.transaction_type == TransactionType::ProductionConsume)
                .map(|t| -t.quantity)
                .sum();
            prop_assert_eq!(forward.total_drawn(), consumed);
        }
    }

    #[test]
    fn required_rule_reports_every_unresolved_child(
        parents in prop::collection::btree_set(0usize..6, 1..6),
        children in prop::collection::vec(prop::option::of(0usize..9), 1..10),
    ) {
        let mut store = RecordStore::new();
        store.items = parents
            .iter()
            .map(|i| Item::new(format!("P{i}"), "부품", ItemCategory::RawMaterial))
            .collect();
        // None 為空白鍵值
        store.bom = children
            .iter()
            .map(|child| {
                let code = child.map(|i| format!("P{i}")).unwrap_or_default();
                BomLine::new("F1", code, Decimal::ONE)
            })
            .collect();
        let rule = IntegrityRule::new(
            "BOM-하위품목 연결",
            Table::Items,
            "품목코드",
            Table::Bom,
            "하위품목코드",
            true,
        );

        let check = ReferentialChecker::new(&store, std::slice::from_ref(&rule))
            .check_rule(&rule, "RI_01".to_string());

        let unresolved = children
            .iter()
            .filter(|child| child.map_or(true, |i| !parents.contains(&i)))
            .count();
        prop_assert_eq!(check.error_count, unresolved);
        prop_assert_eq!(check.status == CheckStatus::Failed, unresolved > 0);
    }
}
