// ==========================================
// 商品目录批量导入系统 - 校验结果模型
// ==========================================
// 职责: 校验问题 / 汇总统计 / 校验结果的值对象
// 不变量: ValidationIssue 创建后不再修改 —— 修正通过
//         修改底层 Dataset 并全量重新校验来表达
// ==========================================

use crate::domain::product::ProductRow;
use crate::domain::types::IssueSeverity;
use serde::{Deserialize, Serialize};

// ==========================================
// ValidationIssue - 单元格级校验问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 数据行下标（0 起，指向 Dataset.rows）
    pub row: usize,
    /// CSV 表头名
    pub column: String,
    /// 问题级别
    pub severity: IssueSeverity,
    /// 问题描述
    pub message: String,
    /// 违规原始值
    pub value: String,
    /// 期望格式提示（可读文本）
    pub suggestion: Option<String>,
    /// 是否可自动修正
    pub auto_fixable: bool,
}

// ==========================================
// ValidationSummary - 汇总统计
// ==========================================
// 不变量: valid_rows + error_rows.len() == total_rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_rows: usize,
    /// 无 ERROR 级问题的行数（仅 WARNING 的行仍计入）
    pub valid_rows: usize,
    pub error_count: usize,
    pub warning_count: usize,
    /// 含 ERROR 级问题的行下标（升序）
    pub error_rows: Vec<usize>,
}

// ==========================================
// ValidationResult - 全量校验结果
// ==========================================
// Dataset 或映射变化后全量重算，无增量模式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// 全文件无 ERROR 级问题
    pub is_valid: bool,
    /// 无 ERROR 级问题行的类型化视图（保持文件行序）
    pub valid_rows: Vec<ProductRow>,
    pub issues: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

impl ValidationResult {
    /// 指定级别的问题迭代
    pub fn issues_of(&self, severity: IssueSeverity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}
