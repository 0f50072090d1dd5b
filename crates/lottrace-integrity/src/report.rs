//! 檢查結果與彙總報告

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 檢查狀態（嚴重度 passed < warning < failed）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Warning,
    Failed,
}

/// 單項完整性檢查結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrityCheckResult {
    pub check_id: String,

    pub name: String,

    pub description: String,

    pub status: CheckStatus,

    pub error_count: usize,

    pub warning_count: usize,

    /// 明細（依發現順序）
    pub details: Vec<String>,

    pub checked_at: DateTime<Utc>,
}

impl IntegrityCheckResult {
    pub fn new(
        check_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            check_id: check_id.into(),
            name: name.into(),
            description: description.into(),
            status: CheckStatus::Passed,
            error_count: 0,
            warning_count: 0,
            details: Vec::new(),
            checked_at: Utc::now(),
        }
    }

    /// 記錄錯誤
    pub fn fail(&mut self, detail: String) {
        self.error_count += 1;
        self.details.push(detail);
        self.status = CheckStatus::Failed;
    }

    /// 記錄警告（不會降低已失敗的狀態）
    pub fn warn(&mut self, detail: String) {
        self.warning_count += 1;
        self.details.push(detail);
        self.status = self.status.max(CheckStatus::Warning);
    }

    /// 結束檢查：沒有任何錯誤與警告時補上通過說明
    pub fn finish(mut self, all_passed: &str) -> Self {
        if self.error_count == 0 && self.warning_count == 0 {
            self.details.push(all_passed.to_string());
        }
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }
}

/// 完整性檢查彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegritySummary {
    pub report_id: Uuid,

    pub checked_at: DateTime<Utc>,

    pub total_checks: usize,

    pub passed_checks: usize,

    pub warning_checks: usize,

    pub failed_checks: usize,

    pub total_errors: usize,

    pub total_warnings: usize,

    /// failed > warning > passed
    pub overall_status: CheckStatus,

    pub checks: Vec<IntegrityCheckResult>,
}

impl IntegritySummary {
    /// 彙總檢查結果（保持輸入順序）
    pub fn from_checks(checks: Vec<IntegrityCheckResult>) -> Self {
        let count = |status: CheckStatus| checks.iter().filter(|c| c.status == status).count();

        let summary = Self {
            report_id: Uuid::new_v4(),
            checked_at: Utc::now(),
            total_checks: checks.len(),
            passed_checks: count(CheckStatus::Passed),
            warning_checks: count(CheckStatus::Warning),
            failed_checks: count(CheckStatus::Failed),
            total_errors: checks.iter().map(|c| c.error_count).sum(),
            total_warnings: checks.iter().map(|c| c.warning_count).sum(),
            overall_status: checks
                .iter()
                .map(|c| c.status)
                .max()
                .unwrap_or(CheckStatus::Passed),
            checks,
        };

        tracing::info!(
            "完整性檢查彙總：{} 項（通過 {} / 警告 {} / 失敗 {}）",
            summary.total_checks,
            summary.passed_checks,
            summary.warning_checks,
            summary.failed_checks
        );

        summary
    }

    pub fn check(&self, check_id: &str) -> Option<&IntegrityCheckResult> {
        self.checks.iter().find(|c| c.check_id == check_id)
    }

    /// 以 JSON 輸出報告
    pub fn to_json(&self) -> lottrace_core::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_escalation() {
        let mut check = IntegrityCheckResult::new("RI_01", "test", "");

        check.warn("w".to_string());
        assert_eq!(check.status, CheckStatus::Warning);

        check.fail("e".to_string());
        check.warn("w2".to_string());
        assert_eq!(check.status, CheckStatus::Failed);
        assert_eq!(check.error_count, 1);
        assert_eq!(check.warning_count, 2);

        let check = check.finish("ok");
        assert_eq!(check.details, vec!["w", "e", "w2"]);
    }

    #[test]
    fn test_finish_adds_passed_detail() {
        let check = IntegrityCheckResult::new("RI_01", "test", "").finish("全部通過");
        assert!(check.is_passed());
        assert_eq!(check.details, vec!["全部通過"]);
    }

    #[test]
    fn test_summary_rollup() {
        let passed = IntegrityCheckResult::new("A", "a", "");
        let mut warning = IntegrityCheckResult::new("B", "b", "");
        warning.warn("w".to_string());
        warning.warn("w".to_string());
        let mut failed = IntegrityCheckResult::new("C", "c", "");
        failed.fail("e".to_string());

        let summary = IntegritySummary::from_checks(vec![passed, warning.clone(), failed]);

        assert_eq!(summary.total_checks, 3);
        assert_eq!(summary.passed_checks, 1);
        assert_eq!(summary.warning_checks, 1);
        assert_eq!(summary.failed_checks, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_warnings, 2);
        assert_eq!(summary.overall_status, CheckStatus::Failed);
        assert_eq!(summary.check("B"), Some(&warning));

        let only_warning = IntegritySummary::from_checks(vec![warning]);
        assert_eq!(only_warning.overall_status, CheckStatus::Warning);
    }

    #[test]
    fn test_empty_summary_is_passed() {
        let summary = IntegritySummary::from_checks(Vec::new());
        assert_eq!(summary.total_checks, 0);
        assert_eq!(summary.overall_status, CheckStatus::Passed);

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"overall_status\": \"passed\""));
    }
}
