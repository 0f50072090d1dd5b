//! 追溯引擎設定

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, TraceError};

/// BOM 展開方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionMode {
    /// 單層展開（只消耗直接子件）
    SingleLevel,
    /// 多層展開（遞迴到沒有 BOM 的葉節點）
    MultiLevel,
}

/// 追溯引擎設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// 快照基準日（記錄缺少日期時使用）
    pub snapshot_date: NaiveDate,

    /// 原材料有效月數
    pub raw_material_shelf_life_months: u32,

    /// 副材料有效月數
    pub sub_material_shelf_life_months: u32,

    /// 預設單位
    pub default_unit: String,

    /// 預設入庫倉位
    pub default_inbound_location: String,

    /// 預設產線
    pub default_production_line: String,

    /// BOM 展開方式
    pub explosion_mode: ExplosionMode,

    /// 多層展開的最大深度
    pub max_bom_depth: usize,

    /// 庫存平衡檢查容許誤差
    pub balance_tolerance: Decimal,
}

impl TraceConfig {
    /// 以指定快照基準日創建設定
    pub fn new(snapshot_date: NaiveDate) -> Self {
        Self {
            snapshot_date,
            raw_material_shelf_life_months: 6,
            sub_material_shelf_life_months: 12,
            default_unit: "EA".to_string(),
            default_inbound_location: "WH-RM".to_string(),
            default_production_line: "LINE-1".to_string(),
            explosion_mode: ExplosionMode::SingleLevel,
            max_bom_depth: 16,
            balance_tolerance: Decimal::new(1, 2),
        }
    }

    /// 從 JSON 載入設定，未指定的欄位使用預設值
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置有效月數
    pub fn with_shelf_life(mut self, raw_material_months: u32, sub_material_months: u32) -> Self {
        self.raw_material_shelf_life_months = raw_material_months;
        self.sub_material_shelf_life_months = sub_material_months;
        self
    }

    /// 建構器模式：設置預設單位
    pub fn with_default_unit(mut self, unit: impl Into<String>) -> Self {
        self.default_unit = unit.into();
        self
    }

    /// 建構器模式：設置預設入庫倉位
    pub fn with_default_inbound_location(mut self, location: impl Into<String>) -> Self {
        self.default_inbound_location = location.into();
        self
    }

    /// 建構器模式：設置預設產線
    pub fn with_default_production_line(mut self, line: impl Into<String>) -> Self {
        self.default_production_line = line.into();
        self
    }

    /// 建構器模式：設置 BOM 展開方式
    ///
    /// # 範例
    /// ```
    /// # use lottrace_core::{ExplosionMode, TraceConfig};
    /// # use chrono::NaiveDate;
    /// let config = TraceConfig::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .with_explosion_mode(ExplosionMode::MultiLevel)
    ///     .with_max_bom_depth(8);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn with_explosion_mode(mut self, mode: ExplosionMode) -> Self {
        self.explosion_mode = mode;
        self
    }

    /// 建構器模式：設置多層展開最大深度
    pub fn with_max_bom_depth(mut self, depth: usize) -> Self {
        self.max_bom_depth = depth;
        self
    }

    /// 建構器模式：設置庫存平衡容許誤差
    pub fn with_balance_tolerance(mut self, tolerance: Decimal) -> Self {
        self.balance_tolerance = tolerance;
        self
    }

    /// 檢查設定是否合法
    pub fn validate(&self) -> Result<()> {
        if self.explosion_mode == ExplosionMode::MultiLevel && self.max_bom_depth == 0 {
            return Err(TraceError::InvalidConfig(
                "多層展開的最大深度必須大於 0".to_string(),
            ));
        }

        if self.balance_tolerance < Decimal::ZERO {
            return Err(TraceError::InvalidConfig(format!(
                "容許誤差不可為負: {}",
                self.balance_tolerance
            )));
        }

        if self.default_unit.trim().is_empty() {
            return Err(TraceError::InvalidConfig("預設單位不可為空".to_string()));
        }

        Ok(())
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_create_config() {
        let config = TraceConfig::new(base_date());

        assert_eq!(config.raw_material_shelf_life_months, 6);
        assert_eq!(config.sub_material_shelf_life_months, 12);
        assert_eq!(config.default_unit, "EA");
        assert_eq!(config.default_inbound_location, "WH-RM");
        assert_eq!(config.default_production_line, "LINE-1");
        assert_eq!(config.explosion_mode, ExplosionMode::SingleLevel);
        assert_eq!(config.balance_tolerance, Decimal::new(1, 2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = TraceConfig::new(base_date())
            .with_shelf_life(3, 9)
            .with_default_unit("KG")
            .with_default_inbound_location("WH-01")
            .with_default_production_line("LINE-7")
            .with_explosion_mode(ExplosionMode::MultiLevel)
            .with_max_bom_depth(4)
            .with_balance_tolerance(Decimal::new(5, 1));

        assert_eq!(config.raw_material_shelf_life_months, 3);
        assert_eq!(config.sub_material_shelf_life_months, 9);
        assert_eq!(config.default_unit, "KG");
        assert_eq!(config.default_inbound_location, "WH-01");
        assert_eq!(config.default_production_line, "LINE-7");
        assert_eq!(config.max_bom_depth, 4);
        assert_eq!(config.balance_tolerance, Decimal::new(5, 1));
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let config = TraceConfig::new(base_date())
            .with_explosion_mode(ExplosionMode::MultiLevel)
            .with_max_bom_depth(0);

        assert!(matches!(config.validate(), Err(TraceError::InvalidConfig(_))));

        // 單層展開不使用深度限制
        let single = TraceConfig::new(base_date()).with_max_bom_depth(0);
        assert!(single.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_tolerance() {
        let config = TraceConfig::new(base_date()).with_balance_tolerance(Decimal::from(-1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = TraceConfig::from_json(
            r#"{
                "snapshot_date": "2024-03-01",
                "explosion_mode": "MultiLevel",
                "max_bom_depth": 5
            }"#,
        )
        .unwrap();

        assert_eq!(config.snapshot_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(config.explosion_mode, ExplosionMode::MultiLevel);
        assert_eq!(config.max_bom_depth, 5);
        assert_eq!(config.default_unit, "EA");
    }
}
