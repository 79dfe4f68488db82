// ==========================================
// 商品目录批量导入系统 - 校验引擎
// ==========================================
// 职责: Dataset + 映射 → 每行分类（通过/仅警告/含错误）
// 校验次序（逐行逐映射列）:
//   1. 存在性（必填空值 → ERROR）
//   2. 格式（类型转换/正则 → ERROR, 附期望格式提示）
//   3. 范围/长度（数值上下限、文本长度 → ERROR）
//   4. 文件内唯一性（第二次及以后出现者被标记）
//   5. 业务软规则（可疑低价、推荐字段缺失 → WARNING, 不阻断）
// 说明: 全量重算，无增量模式；无随机性，幂等
// ==========================================

use crate::config::{FieldCatalog, FieldCatalogEntry};
use crate::domain::mapping::FieldMapping;
use crate::domain::product::{FieldValue, ProductRow};
use crate::domain::types::{FieldType, IssueSeverity};
use crate::domain::validation::{ValidationIssue, ValidationResult, ValidationSummary};
use crate::domain::Dataset;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

// ==========================================
// 共享归一化辅助（校验与自动修正使用同一套规则）
// ==========================================

/// 解析数值（接受已清洗文本）
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 数值归一化建议: 去空格 + 逗号小数点 → 点（"1,99" → "1.99"）
pub(crate) fn normalize_number(raw: &str) -> Option<String> {
    let t: String = raw.trim().replace(' ', "").replace(',', ".");
    if t != raw && parse_number(&t).is_some() {
        Some(t)
    } else {
        None
    }
}

/// 解析日期（YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD）
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(t, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(t, "%Y%m%d"))
        .ok()
}

/// 日期归一化建议: 点分隔 → 横线后重试（"2026.03.01" → "2026-03-01"）
pub(crate) fn normalize_date(raw: &str) -> Option<String> {
    let t = raw.trim().replace('.', "-");
    parse_date(&t).map(|d| d.format("%Y-%m-%d").to_string())
}

/// 解析布尔（1/0/y/n/yes/no/true/false/是/否，忽略大小写）
pub(crate) fn parse_boolean(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "y" | "yes" | "true" | "是" => Some(true),
        "0" | "n" | "no" | "false" | "否" => Some(false),
        _ => None,
    }
}

/// 枚举规范化建议: 忽略大小写命中允许值时返回规范写法
pub(crate) fn canonical_enum(raw: &str, allowed: &[String]) -> Option<String> {
    let t = raw.trim().to_lowercase();
    allowed
        .iter()
        .find(|a| a.to_lowercase() == t)
        .cloned()
}

// ==========================================
// Validator - 校验引擎
// ==========================================
pub struct Validator {
    catalog: Arc<FieldCatalog>,
}

impl Validator {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self { catalog }
    }

    /// 全量校验
    ///
    /// # 返回
    /// - ValidationResult: is_valid 当且仅当全文件无 ERROR 级问题；
    ///   valid_rows 为无 ERROR 行的类型化视图（保持文件行序）
    pub fn validate(&self, dataset: &Dataset, mappings: &[FieldMapping]) -> ValidationResult {
        // 激活映射: 有目标字段且字段存在于目录
        let active: Vec<(&FieldMapping, &FieldCatalogEntry)> = mappings
            .iter()
            .filter_map(|m| {
                let key = m.catalog_field.as_deref()?;
                self.catalog.get(key).map(|e| (m, e))
            })
            .collect();

        // 正则缓存（每次校验编译一次）
        let mut patterns: HashMap<&str, Regex> = HashMap::new();
        for (_, entry) in &active {
            if let Some(p) = entry.pattern.as_deref() {
                if let Ok(re) = Regex::new(p) {
                    patterns.insert(entry.key.as_str(), re);
                } else {
                    tracing::warn!(field = %entry.key, pattern = p, "字段正则无法编译，跳过格式约束");
                }
            }
        }

        // 文件内唯一性: 字段 key → (已见值 → 首次出现行)
        let mut seen: HashMap<&str, HashMap<String, usize>> = HashMap::new();

        let mut issues: Vec<ValidationIssue> = Vec::new();
        let mut valid_rows: Vec<ProductRow> = Vec::new();
        let mut error_rows: Vec<usize> = Vec::new();

        for row_idx in 0..dataset.total_rows {
            let mut has_error = false;
            let mut product = ProductRow::new(row_idx);

            for (mapping, entry) in &active {
                let raw = dataset
                    .cell(row_idx, mapping.column_index)
                    .unwrap_or("")
                    .to_string();
                let trimmed = raw.trim();

                // === 1. 存在性 ===
                if trimmed.is_empty() {
                    if entry.required {
                        issues.push(Self::issue_error(
                            row_idx,
                            &mapping.csv_column,
                            format!("必填字段 {} 为空", entry.label),
                            &raw,
                            None,
                            false,
                        ));
                        has_error = true;
                    } else if entry.recommended {
                        // === 5. 软规则: 推荐字段缺失 ===
                        issues.push(Self::issue_warning(
                            row_idx,
                            &mapping.csv_column,
                            format!("建议填写推荐字段 {}", entry.label),
                            &raw,
                        ));
                    }
                    continue;
                }

                // === 2. 格式 + 3. 范围/长度 ===
                let coerced = match entry.field_type {
                    FieldType::Number => match parse_number(trimmed) {
                        Some(v) => {
                            if let Some(min) = entry.min_value {
                                if v < min {
                                    issues.push(Self::issue_error(
                                        row_idx,
                                        &mapping.csv_column,
                                        format!("{} 低于下限 {}", entry.label, min),
                                        &raw,
                                        None,
                                        false,
                                    ));
                                    has_error = true;
                                    continue;
                                }
                            }
                            if let Some(max) = entry.max_value {
                                if v > max {
                                    issues.push(Self::issue_error(
                                        row_idx,
                                        &mapping.csv_column,
                                        format!("{} 超过上限 {}", entry.label, max),
                                        &raw,
                                        None,
                                        false,
                                    ));
                                    has_error = true;
                                    continue;
                                }
                            }
                            Some(FieldValue::Number(v))
                        }
                        None => {
                            let fixable = normalize_number(trimmed).is_some();
                            issues.push(Self::issue_error(
                                row_idx,
                                &mapping.csv_column,
                                format!("{} 无法解析为数值", entry.label),
                                &raw,
                                Some("期望数字格式（如 9.99）".to_string()),
                                fixable,
                            ));
                            has_error = true;
                            continue;
                        }
                    },
                    FieldType::Date => match parse_date(trimmed) {
                        Some(d) => Some(FieldValue::Date(d)),
                        None => {
                            let fixable = normalize_date(trimmed).is_some();
                            issues.push(Self::issue_error(
                                row_idx,
                                &mapping.csv_column,
                                format!("{} 无法解析为日期", entry.label),
                                &raw,
                                Some("期望日期格式 YYYY-MM-DD".to_string()),
                                fixable,
                            ));
                            has_error = true;
                            continue;
                        }
                    },
                    FieldType::Boolean => match parse_boolean(trimmed) {
                        Some(b) => Some(FieldValue::Bool(b)),
                        None => {
                            issues.push(Self::issue_error(
                                row_idx,
                                &mapping.csv_column,
                                format!("{} 无法解析为布尔值", entry.label),
                                &raw,
                                Some("期望布尔值（1/0/是/否）".to_string()),
                                false,
                            ));
                            has_error = true;
                            continue;
                        }
                    },
                    FieldType::Enum => {
                        if entry.allowed_values.iter().any(|a| a == trimmed) {
                            Some(FieldValue::Text(trimmed.to_string()))
                        } else {
                            let fixable =
                                canonical_enum(trimmed, &entry.allowed_values).is_some();
                            issues.push(Self::issue_error(
                                row_idx,
                                &mapping.csv_column,
                                format!("{} 不在允许值内", entry.label),
                                &raw,
                                Some(format!("允许值: {}", entry.allowed_values.join(", "))),
                                fixable,
                            ));
                            has_error = true;
                            continue;
                        }
                    }
                    FieldType::Text => {
                        if let Some(re) = patterns.get(entry.key.as_str()) {
                            if !re.is_match(trimmed) {
                                issues.push(Self::issue_error(
                                    row_idx,
                                    &mapping.csv_column,
                                    format!("{} 格式不符", entry.label),
                                    &raw,
                                    entry.pattern.clone().map(|p| format!("期望格式: {}", p)),
                                    false,
                                ));
                                has_error = true;
                                continue;
                            }
                        }
                        let chars = trimmed.chars().count();
                        if let Some(min) = entry.min_length {
                            if chars < min {
                                issues.push(Self::issue_error(
                                    row_idx,
                                    &mapping.csv_column,
                                    format!("{} 长度不足（至少 {} 字符）", entry.label, min),
                                    &raw,
                                    None,
                                    false,
                                ));
                                has_error = true;
                                continue;
                            }
                        }
                        if let Some(max) = entry.max_length {
                            if chars > max {
                                issues.push(Self::issue_error(
                                    row_idx,
                                    &mapping.csv_column,
                                    format!("{} 长度超限（至多 {} 字符）", entry.label, max),
                                    &raw,
                                    None,
                                    false,
                                ));
                                has_error = true;
                                continue;
                            }
                        }
                        Some(FieldValue::Text(trimmed.to_string()))
                    }
                };

                // === 4. 文件内唯一性（第二次及以后出现者被标记） ===
                if entry.unique_in_file {
                    let values = seen.entry(entry.key.as_str()).or_default();
                    match values.get(trimmed) {
                        Some(first_row) => {
                            issues.push(Self::issue_error(
                                row_idx,
                                &mapping.csv_column,
                                format!(
                                    "{} 重复: {}（首次出现于第 {} 行）",
                                    entry.label,
                                    trimmed,
                                    first_row + 1
                                ),
                                &raw,
                                None,
                                false,
                            ));
                            has_error = true;
                            continue;
                        }
                        None => {
                            values.insert(trimmed.to_string(), row_idx);
                        }
                    }
                }

                // === 5. 业务软规则 ===
                if let Some(FieldValue::Number(v)) = &coerced {
                    if let Some(warn_below) = entry.warn_below {
                        if *v < warn_below {
                            issues.push(Self::issue_warning(
                                row_idx,
                                &mapping.csv_column,
                                format!("{} 疑似过低: {}", entry.label, v),
                                &raw,
                            ));
                        }
                    }
                }

                if let Some(value) = coerced {
                    product.values.insert(entry.key.clone(), value);
                }
            }

            if has_error {
                error_rows.push(row_idx);
            } else {
                valid_rows.push(product);
            }
        }

        let error_count = issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count();
        let warning_count = issues.len() - error_count;

        let summary = ValidationSummary {
            total_rows: dataset.total_rows,
            valid_rows: valid_rows.len(),
            error_count,
            warning_count,
            error_rows,
        };

        tracing::info!(
            total = summary.total_rows,
            valid = summary.valid_rows,
            errors = summary.error_count,
            warnings = summary.warning_count,
            "校验完成"
        );

        ValidationResult {
            is_valid: error_count == 0,
            valid_rows,
            issues,
            summary,
        }
    }

    fn issue_error(
        row: usize,
        column: &str,
        message: String,
        value: &str,
        suggestion: Option<String>,
        auto_fixable: bool,
    ) -> ValidationIssue {
        ValidationIssue {
            row,
            column: column.to_string(),
            severity: IssueSeverity::Error,
            message,
            value: value.to_string(),
            suggestion,
            auto_fixable,
        }
    }

    fn issue_warning(row: usize, column: &str, message: String, value: &str) -> ValidationIssue {
        ValidationIssue {
            row,
            column: column.to_string(),
            severity: IssueSeverity::Warning,
            message,
            value: value.to_string(),
            suggestion: None,
            auto_fixable: false,
        }
    }
}
