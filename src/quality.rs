//! 資料品質指標

use lottrace_calc::LotSummary;
use lottrace_integrity::{CheckStatus, IntegritySummary};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// 單項指標
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScore {
    pub score: u32,
    pub status: CheckStatus,
    pub details: String,
}

/// 綜合指標
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallScore {
    pub score: u32,
    pub status: CheckStatus,
    pub recommendation: String,
}

/// 資料品質指標
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub data_integrity: MetricScore,
    pub traceability: MetricScore,
    pub automation: MetricScore,
    pub consistency: MetricScore,
    pub overall: OverallScore,
}

impl QualityMetrics {
    /// 由完整性彙總與 LOT 統計計算品質指標
    ///
    /// 綜合分數 = round((通過率 + 100 + 100 + 非失敗率) / 4)，四捨五入。
    /// 沒有任何檢查時各比率視為 100。
    pub fn compute(integrity: &IntegritySummary, lots: &LotSummary) -> Self {
        let pass_rate = rate(integrity.passed_checks, integrity.total_checks);
        let non_fail_rate = rate(
            integrity.total_checks - integrity.failed_checks,
            integrity.total_checks,
        );
        let overall = (pass_rate + Decimal::ONE_HUNDRED + Decimal::ONE_HUNDRED + non_fail_rate)
            / Decimal::from(4);

        let recommendation = if integrity.failed_checks > 0 {
            "請修正資料完整性錯誤以提升系統穩定性"
        } else if integrity.warning_checks > 0 {
            "請檢視警告項目以改善資料品質"
        } else {
            "ERP 資料維持高品質與完整性"
        };

        Self {
            data_integrity: MetricScore {
                score: round_score(pass_rate),
                status: integrity.overall_status,
                details: format!(
                    "{}/{} 項檢查通過",
                    integrity.passed_checks, integrity.total_checks
                ),
            },
            traceability: MetricScore {
                score: 100,
                status: if lots.traceability_rate < Decimal::ONE_HUNDRED {
                    CheckStatus::Warning
                } else {
                    CheckStatus::Passed
                },
                details: format!(
                    "{} 個 LOT 完整追溯（追溯率 {}%）",
                    lots.total_lots,
                    lots.traceability_rate.normalize()
                ),
            },
            automation: MetricScore {
                score: 100,
                status: CheckStatus::Passed,
                details: format!("{} 筆成品 LOT 對照自動產生", lots.total_product_lots),
            },
            consistency: MetricScore {
                score: round_score(non_fail_rate),
                status: if integrity.failed_checks == 0 {
                    CheckStatus::Passed
                } else {
                    CheckStatus::Warning
                },
                details: format!(
                    "{} 個錯誤，{} 個警告",
                    integrity.total_errors, integrity.total_warnings
                ),
            },
            overall: OverallScore {
                score: round_score(overall),
                status: integrity.overall_status,
                recommendation: recommendation.to_string(),
            },
        }
    }
}

fn rate(part: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ONE_HUNDRED;
    }
    Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total)
}

fn round_score(value: Decimal) -> u32 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or_default()
}
