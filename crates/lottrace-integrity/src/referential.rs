//! 參照完整性檢查

use lottrace_core::RecordStore;
use std::collections::HashSet;

use crate::report::IntegrityCheckResult;
use crate::rules::IntegrityRule;

/// 參照完整性檢查器
pub struct ReferentialChecker<'a> {
    store: &'a RecordStore,
    rules: &'a [IntegrityRule],
}

impl<'a> ReferentialChecker<'a> {
    pub fn new(store: &'a RecordStore, rules: &'a [IntegrityRule]) -> Self {
        Self { store, rules }
    }

    /// 依規則順序逐條檢查
    pub fn check(&self) -> Vec<IntegrityCheckResult> {
        tracing::info!("開始參照完整性檢查：規則 {} 條", self.rules.len());

        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| self.check_rule(rule, format!("RI_{:02}", i + 1)))
            .collect()
    }

    /// 檢查單條規則
    pub fn check_rule(&self, rule: &IntegrityRule, check_id: String) -> IntegrityCheckResult {
        let mut check = IntegrityCheckResult::new(check_id, rule.name.as_str(), rule.description());

        let parent_rows = self.store.row_count(rule.parent_table);
        let child_rows = self.store.row_count(rule.child_table);

        if parent_rows == 0 {
            check.warn(format!("父表 {} 沒有資料，無法驗證", rule.parent_table));
        }
        if child_rows == 0 {
            check.warn(format!("子表 {} 沒有資料，無法驗證", rule.child_table));
        }
        if parent_rows == 0 || child_rows == 0 {
            tracing::debug!("{}：資料表為空，略過逐筆驗證", rule.name);
            return check;
        }

        let parent_keys: HashSet<&str> = self
            .store
            .column(rule.parent_table, &rule.parent_key)
            .into_iter()
            .flatten()
            .filter(|key| !key.trim().is_empty())
            .collect();

        let children = self.store.column(rule.child_table, &rule.child_key);
        for (index, key) in children.into_iter().enumerate() {
            let key = key.map(str::trim).unwrap_or_default();

            if key.is_empty() {
                if rule.required {
                    check.fail(format!(
                        "{}[{}]: {} 值缺漏",
                        rule.child_table, index, rule.child_key
                    ));
                }
                continue;
            }

            if parent_keys.contains(key) {
                continue;
            }

            let detail = format!(
                "{}[{}]: {}='{}' 在 {} 中找不到對應記錄",
                rule.child_table, index, rule.child_key, key, rule.parent_table
            );
            if rule.required {
                check.fail(detail);
            } else {
                check.warn(format!("{}（選擇性參照）", detail));
            }
        }

        tracing::debug!(
            "{}：錯誤 {}，警告 {}",
            rule.name,
            check.error_count,
            check.warning_count
        );

        check.finish("所有參照完整性檢查均通過")
    }
}
