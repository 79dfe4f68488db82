// ==========================================
// 商品目录批量导入系统 - 字段映射模型
// ==========================================
// 职责: CSV 列 → 目录字段的分配关系
// 不变量: 同一非空目标字段至多被一个映射占用；
//         所有 required 字段必须被映射后方可进入校验阶段
// ==========================================

use crate::domain::types::FieldType;
use serde::{Deserialize, Serialize};

// ==========================================
// FieldMapping - 单列映射
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// CSV 表头名
    pub csv_column: String,
    /// 列下标（表头允许重名，以下标定位）
    pub column_index: usize,
    /// 目标目录字段 key（None = 跳过该列）
    pub catalog_field: Option<String>,
    /// 派生: 目标字段类型
    pub field_type: Option<FieldType>,
    /// 派生: 目标字段是否必填
    pub is_required: bool,
    /// 操作员手工确认标记（refresh 时保留）
    pub confirmed: bool,
    /// 自动检测置信度（0.0-1.0，手工映射为 1.0）
    pub confidence: f64,
}

impl FieldMapping {
    /// 创建跳过映射（无目标字段）
    pub fn skip(csv_column: String, column_index: usize) -> Self {
        Self {
            csv_column,
            column_index,
            catalog_field: None,
            field_type: None,
            is_required: false,
            confirmed: false,
            confidence: 0.0,
        }
    }
}

// ==========================================
// AmbiguousField - 置信度不足的候选映射
// ==========================================
// 置信度落在 (0, 0.8) 区间的最佳候选，提示操作员关注，
// 不阻断自动应用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbiguousField {
    pub csv_column: String,
    pub catalog_field: String,
    pub confidence: f64,
}

// ==========================================
// MappingDetection - 自动检测结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingDetection {
    /// 每列一条映射（含跳过列）
    pub mappings: Vec<FieldMapping>,
    /// 无候选字段的列
    pub unmapped_columns: Vec<String>,
    /// 置信度不足的候选
    pub ambiguous_fields: Vec<AmbiguousField>,
    /// 整体置信度 = 高置信列数 / 总列数（仅供参考，不用于拒绝）
    pub confidence: f64,
}
