//! BOM 展開

use lottrace_core::{BomLine, ExplosionMode, RecordStore, TraceConfig};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::TraceWarning;

/// 展開後的子件需求
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRequirement {
    pub material_code: String,
    pub material_name: String,
    pub unit: String,
    /// 累乘後的需求數量
    pub quantity: Decimal,
}

/// 展開結果
#[derive(Debug, Clone, Default)]
pub struct Explosion {
    pub requirements: Vec<ComponentRequirement>,
    pub warnings: Vec<TraceWarning>,
}

/// BOM 展開器
pub struct BomExplosion<'a> {
    children: HashMap<&'a str, Vec<&'a BomLine>>,
    item_names: HashMap<&'a str, &'a str>,
    mode: ExplosionMode,
    max_depth: usize,
    default_unit: &'a str,
}

impl<'a> BomExplosion<'a> {
    pub fn new(store: &'a RecordStore, config: &'a TraceConfig) -> Self {
        let mut children: HashMap<&str, Vec<&BomLine>> = HashMap::new();
        for line in &store.bom {
            children
                .entry(line.parent_code.as_str())
                .or_default()
                .push(line);
        }

        let mut item_names = HashMap::new();
        for item in &store.items {
            item_names
                .entry(item.code.as_str())
                .or_insert(item.name.as_str());
        }

        Self {
            children,
            item_names,
            mode: config.explosion_mode,
            max_depth: config.max_bom_depth,
            default_unit: &config.default_unit,
        }
    }

    /// 是否有 BOM 子件
    pub fn has_children(&self, item_code: &str) -> bool {
        self.children
            .get(item_code)
            .map_or(false, |lines| !lines.is_empty())
    }

    /// 展開指定品目的需求
    ///
    /// 需求順序依 BOM 記錄順序（多層時為深度優先順序）。
    pub fn explode(&self, item_code: &str, quantity: Decimal) -> Explosion {
        let mut explosion = Explosion::default();

        match self.mode {
            ExplosionMode::SingleLevel => {
                for line in self.lines(item_code) {
                    let required = Self::scaled(line, quantity, &mut explosion);
                    explosion.requirements.push(self.requirement(line, required));
                }
            }
            ExplosionMode::MultiLevel => {
                let mut path = vec![item_code];
                self.explode_recursive(item_code, quantity, &mut path, &mut explosion);
            }
        }

        explosion
    }

    fn explode_recursive<'p>(
        &self,
        parent: &'p str,
        quantity: Decimal,
        path: &mut Vec<&'p str>,
        explosion: &mut Explosion,
    ) where
        'a: 'p,
    {
        for line in self.lines(parent) {
            let child = line.child_code.as_str();
            let child_quantity = Self::scaled(line, quantity, explosion);

            if path.contains(&child) {
                tracing::warn!("BOM 循環參照: {} → {}", path.join(" → "), child);
                explosion.warnings.push(TraceWarning::bom_cycle(
                    child.to_string(),
                    format!("BOM 循環參照: {} → {}", path.join(" → "), child),
                ));
                continue;
            }

            if !self.has_children(child) {
                explosion.requirements.push(self.requirement(line, child_quantity));
                continue;
            }

            if path.len() >= self.max_depth {
                tracing::warn!("BOM 展開超過最大深度 {}: {}", self.max_depth, child);
                explosion.warnings.push(TraceWarning::depth_limit(
                    child.to_string(),
                    format!("BOM 展開超過最大深度 {}，{} 視為葉節點", self.max_depth, child),
                ));
                explosion.requirements.push(self.requirement(line, child_quantity));
                continue;
            }

            path.push(child);
            self.explode_recursive(child, child_quantity, path, explosion);
            path.pop();
        }
    }

    /// 單位用量 × 上階數量；溢位時取飽和值並記錄警告
    fn scaled(line: &BomLine, quantity: Decimal, explosion: &mut Explosion) -> Decimal {
        line.quantity.checked_mul(quantity).unwrap_or_else(|| {
            tracing::warn!("BOM 需求數量溢位: {} → {}", line.parent_code, line.child_code);
            explosion.warnings.push(TraceWarning::quantity_overflow(
                line.child_code.clone(),
                format!(
                    "{} → {} 需求數量超出可表示範圍（{} × {}），以上限值計算",
                    line.parent_code, line.child_code, line.quantity, quantity
                ),
            ));
            line.quantity.saturating_mul(quantity)
        })
    }

    fn lines(&self, item_code: &str) -> impl Iterator<Item = &'a BomLine> + '_ {
        self.children.get(item_code).into_iter().flatten().copied()
    }

    fn requirement(&self, line: &BomLine, quantity: Decimal) -> ComponentRequirement {
        let material_name = if !line.child_name.is_empty() {
            line.child_name.clone()
        } else {
            self.item_names
                .get(line.child_code.as_str())
                .map(|name| name.to_string())
                .unwrap_or_else(|| line.child_code.clone())
        };

        let unit = if line.unit.is_empty() {
            self.default_unit.to_string()
        } else {
            line.unit.clone()
        };

        ComponentRequirement {
            material_code: line.child_code.clone(),
            material_name,
            unit,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WarningKind;
    use chrono::NaiveDate;
    use lottrace_core::{Item, ItemCategory};

    fn config(mode: ExplosionMode) -> TraceConfig {
        TraceConfig::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with_explosion_mode(mode)
            .with_max_bom_depth(3)
    }

    // F1 ─┬─ S1 (x2) ─┬─ M1 (x3)
    //     │           └─ M2 (x1)
    //     └─ M3 (x4)
    fn multi_level_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.items = vec![
            Item::new("F1", "레일", ItemCategory::FinishedGood),
            Item::new("S1", "브라켓", ItemCategory::SemiFinished),
            Item::new("M1", "강판", ItemCategory::RawMaterial),
            Item::new("M2", "볼트", ItemCategory::SubMaterial),
            Item::new("M3", "도료", ItemCategory::SubMaterial),
        ];
        store.bom = vec![
            BomLine::new("F1", "S1", Decimal::from(2)),
            BomLine::new("F1", "M3", Decimal::from(4)),
            BomLine::new("S1", "M1", Decimal::from(3)),
            BomLine::new("S1", "M2", Decimal::from(1)),
        ];
        store
    }

    fn summary(explosion: &Explosion) -> Vec<(String, Decimal)> {
        explosion
            .requirements
            .iter()
            .map(|r| (r.material_code.clone(), r.quantity))
            .collect()
    }

    #[test]
    fn test_single_level_explosion() {
        let store = multi_level_store();
        let config = config(ExplosionMode::SingleLevel);
        let explosion = BomExplosion::new(&store, &config).explode("F1", Decimal::from(10));

        assert_eq!(
            summary(&explosion),
            vec![
                ("S1".to_string(), Decimal::from(20)),
                ("M3".to_string(), Decimal::from(40)),
            ]
        );
        assert_eq!(explosion.requirements[0].material_name, "브라켓");
        assert_eq!(explosion.requirements[0].unit, "EA");
        assert!(explosion.warnings.is_empty());
    }

    #[test]
    fn test_multi_level_explosion() {
        let store = multi_level_store();
        let config = config(ExplosionMode::MultiLevel);
        let explosion = BomExplosion::new(&store, &config).explode("F1", Decimal::from(10));

        assert_eq!(
            summary(&explosion),
            vec![
                ("M1".to_string(), Decimal::from(60)),
                ("M2".to_string(), Decimal::from(20)),
                ("M3".to_string(), Decimal::from(40)),
            ]
        );
        assert!(explosion.warnings.is_empty());
    }

    #[test]
    fn test_cycle_detected() {
        let mut store = multi_level_store();
        store.bom.push(BomLine::new("S1", "F1", Decimal::from(1)));
        let config = config(ExplosionMode::MultiLevel);

        let explosion = BomExplosion::new(&store, &config).explode("F1", Decimal::from(1));

        assert_eq!(explosion.requirements.len(), 3);
        assert_eq!(explosion.warnings.len(), 1);
        assert_eq!(explosion.warnings[0].kind, WarningKind::BomCycle);
        assert_eq!(explosion.warnings[0].reference, "F1");
    }

    #[test]
    fn test_depth_limit_treats_node_as_leaf() {
        let mut store = RecordStore::new();
        store.bom = vec![
            BomLine::new("A", "B", Decimal::ONE),
            BomLine::new("B", "C", Decimal::ONE),
            BomLine::new("C", "D", Decimal::ONE),
            BomLine::new("D", "E", Decimal::ONE),
        ];
        let config = config(ExplosionMode::MultiLevel);

        let explosion = BomExplosion::new(&store, &config).explode("A", Decimal::from(2));

        // 路徑 A → B → C 已達深度 3，D 視為葉節點
        assert_eq!(summary(&explosion), vec![("D".to_string(), Decimal::from(2))]);
        assert_eq!(explosion.warnings[0].kind, WarningKind::BomDepthLimit);
        // 沒有品目主檔時以代碼作為名稱
        assert_eq!(explosion.requirements[0].material_name, "D");
    }

    #[test]
    fn test_overflowing_requirement_saturates() {
        let mut store = RecordStore::new();
        store.bom = vec![
            BomLine::new("F1", "M1", Decimal::from_scientific("1e15").unwrap()),
            BomLine::new("F1", "M2", Decimal::from(2)),
        ];
        let config = config(ExplosionMode::SingleLevel);

        let explosion = BomExplosion::new(&store, &config)
            .explode("F1", Decimal::from_scientific("1e15").unwrap());

        assert_eq!(explosion.requirements[0].quantity, Decimal::MAX);
        assert_eq!(
            explosion.requirements[1].quantity,
            Decimal::from_scientific("2e15").unwrap()
        );
        assert_eq!(explosion.warnings.len(), 1);
        assert_eq!(explosion.warnings[0].kind, WarningKind::QuantityOverflow);
        assert_eq!(explosion.warnings[0].reference, "M1");
    }

    #[test]
    fn test_item_without_bom() {
        let store = multi_level_store();
        let config = config(ExplosionMode::SingleLevel);
        let explosion = BomExplosion::new(&store, &config);

        assert!(explosion.explode("M1", Decimal::from(5)).requirements.is_empty());
        assert!(!explosion.has_children("M1"));
        assert!(explosion.has_children("F1"));
    }
}
