// ==========================================
// 商品目录批量导入系统 - 自动修正
// ==========================================
// 职责: 为可修正问题计算替换值，并按用户确认批量写回数据集
// 约束: 仅覆盖确定性归一化（数值分隔符、日期分隔符、枚举大小写）；
//       写回后必须重新校验，修正本身不更新校验结论
// ==========================================

use crate::config::FieldCatalog;
use crate::domain::mapping::FieldMapping;
use crate::domain::types::FieldType;
use crate::domain::validation::ValidationIssue;
use crate::domain::Dataset;
use crate::importer::validator::{canonical_enum, normalize_date, normalize_number};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// AutoFix - 单元格修正建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoFix {
    /// 数据行下标（0 起）
    pub row: usize,
    /// 列下标
    pub column_index: usize,
    /// 源列名
    pub column: String,
    /// 当前值
    pub current: String,
    /// 替换值
    pub replacement: String,
}

// ==========================================
// AutoFixer - 修正建议生成与应用
// ==========================================
pub struct AutoFixer {
    catalog: Arc<FieldCatalog>,
}

impl AutoFixer {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self { catalog }
    }

    /// 为标记为可修正的问题生成替换建议
    ///
    /// 建议按 (行, 列) 顺序返回；无法计算替换值的问题被静默跳过
    pub fn suggest(
        &self,
        dataset: &Dataset,
        mappings: &[FieldMapping],
        issues: &[ValidationIssue],
    ) -> Vec<AutoFix> {
        let mut fixes = Vec::new();

        for issue in issues.iter().filter(|i| i.auto_fixable) {
            let Some(mapping) = mappings.iter().find(|m| m.csv_column == issue.column) else {
                continue;
            };
            let Some(entry) = mapping
                .catalog_field
                .as_deref()
                .and_then(|key| self.catalog.get(key))
            else {
                continue;
            };
            let Some(current) = dataset.cell(issue.row, mapping.column_index) else {
                continue;
            };

            let replacement = match entry.field_type {
                FieldType::Number => normalize_number(current),
                FieldType::Date => normalize_date(current),
                FieldType::Enum => canonical_enum(current, &entry.allowed_values),
                FieldType::Text | FieldType::Boolean => None,
            };

            if let Some(replacement) = replacement {
                fixes.push(AutoFix {
                    row: issue.row,
                    column_index: mapping.column_index,
                    column: issue.column.clone(),
                    current: current.to_string(),
                    replacement,
                });
            }
        }

        fixes
    }

    /// 将修正写回数据集，返回实际改写的单元格数
    ///
    /// 调用方负责随后重新校验
    pub fn apply(&self, dataset: &mut Dataset, fixes: &[AutoFix]) -> usize {
        let mut applied = 0;
        for fix in fixes {
            if dataset.set_cell(fix.row, fix.column_index, fix.replacement.clone()) {
                applied += 1;
            }
        }
        tracing::info!(count = applied, "自动修正已写回");
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::field_mapper::FieldMapper;
    use crate::importer::validator::Validator;

    fn setup(headers: &[&str], rows: &[&[&str]]) -> (Dataset, Vec<FieldMapping>, Arc<FieldCatalog>) {
        let catalog = Arc::new(FieldCatalog::default_product_catalog());
        let dataset = Dataset::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
            "t.csv".to_string(),
            0,
        );
        let mapper = FieldMapper::new(Arc::clone(&catalog));
        let mappings = mapper.auto_apply(&dataset.headers);
        (dataset, mappings, catalog)
    }

    #[test]
    fn test_suggest_number_and_date() {
        let (mut ds, mappings, catalog) = setup(
            &["SKU", "Name", "Price", "上架日期"],
            &[&["A1", "Widget", "1,99", "2026.03.01"]],
        );
        let validator = Validator::new(Arc::clone(&catalog));
        let result = validator.validate(&ds, &mappings);
        assert_eq!(result.summary.error_count, 2);

        let fixer = AutoFixer::new(Arc::clone(&catalog));
        let fixes = fixer.suggest(&ds, &mappings, &result.issues);
        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[0].replacement, "1.99");
        assert_eq!(fixes[1].replacement, "2026-03-01");

        let applied = fixer.apply(&mut ds, &fixes);
        assert_eq!(applied, 2);

        // 写回后重新校验应全部通过
        let rerun = validator.validate(&ds, &mappings);
        assert!(rerun.is_valid);
        assert_eq!(rerun.valid_rows.len(), 1);
    }

    #[test]
    fn test_unfixable_issue_produces_no_fix() {
        let (ds, mappings, catalog) = setup(
            &["SKU", "Name", "Price"],
            &[&["A1", "Widget", "abc"]],
        );
        let validator = Validator::new(Arc::clone(&catalog));
        let result = validator.validate(&ds, &mappings);
        assert_eq!(result.summary.error_count, 1);

        let fixer = AutoFixer::new(catalog);
        let fixes = fixer.suggest(&ds, &mappings, &result.issues);
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_apply_out_of_bounds_is_skipped() {
        let (mut ds, _, catalog) = setup(&["SKU", "Name", "Price"], &[&["A1", "W", "1"]]);
        let fixer = AutoFixer::new(catalog);
        let fixes = vec![AutoFix {
            row: 99,
            column_index: 0,
            column: "SKU".to_string(),
            current: "x".to_string(),
            replacement: "y".to_string(),
        }];
        assert_eq!(fixer.apply(&mut ds, &fixes), 0);
    }
}
