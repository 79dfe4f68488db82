// ==========================================
// 商品目录批量导入系统 - 基础类型定义
// ==========================================
// 职责: 全局共享的枚举类型
// 用途: 字段类型 / 问题级别 / 执行阶段 / 向导阶段
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// FieldType - 目录字段类型
// ==========================================
// 用途: 字段目录配置 + 校验引擎类型转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 文本
    Text,
    /// 数值
    Number,
    /// 日期
    Date,
    /// 枚举（限定取值集合）
    Enum,
    /// 布尔
    Boolean,
}

impl FieldType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Enum => "enum",
            FieldType::Boolean => "boolean",
        }
    }
}

// ==========================================
// IssueSeverity - 校验问题级别
// ==========================================
// ERROR: 行被排除出 valid_rows
// WARNING: 不阻断，仅提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &str {
        match self {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
        }
    }
}

// ==========================================
// ImportPhase - 执行引擎状态机
// ==========================================
// 单向主路径: Idle → Preparing → Importing → Finalizing → Completed
// Importing 可进入 Paused 子状态（冻结进度不丢弃）
// Importing 可转出到 Cancelled（操作员取消）或 Error（不可恢复失败）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPhase {
    Idle,
    Preparing,
    Importing,
    Paused,
    Finalizing,
    Completed,
    Cancelled,
    Error,
}

impl ImportPhase {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ImportPhase::Completed | ImportPhase::Cancelled | ImportPhase::Error
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Preparing => "preparing",
            ImportPhase::Importing => "importing",
            ImportPhase::Paused => "paused",
            ImportPhase::Finalizing => "finalizing",
            ImportPhase::Completed => "completed",
            ImportPhase::Cancelled => "cancelled",
            ImportPhase::Error => "error",
        }
    }
}

// ==========================================
// ImportStatus - 导入终态结果分类
// ==========================================
// Success: error_count == 0
// Partial: 0 < error_count < total_rows
// Failed: 全部行失败 或 不可恢复错误
// Cancelled: 操作员取消（保留部分计数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Partial,
    Failed,
    Cancelled,
}

impl ImportStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ImportStatus::Success => "success",
            ImportStatus::Partial => "partial",
            ImportStatus::Failed => "failed",
            ImportStatus::Cancelled => "cancelled",
        }
    }
}

// ==========================================
// WizardStage - 导入向导阶段
// ==========================================
// 前进受完成谓词门控，后退总是允许
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStage {
    Upload,
    Mapping,
    Validation,
    Execution,
}

impl WizardStage {
    /// 下一阶段（Execution 为最后阶段）
    pub fn next(&self) -> Option<WizardStage> {
        match self {
            WizardStage::Upload => Some(WizardStage::Mapping),
            WizardStage::Mapping => Some(WizardStage::Validation),
            WizardStage::Validation => Some(WizardStage::Execution),
            WizardStage::Execution => None,
        }
    }

    /// 上一阶段（Upload 为第一阶段）
    pub fn prev(&self) -> Option<WizardStage> {
        match self {
            WizardStage::Upload => None,
            WizardStage::Mapping => Some(WizardStage::Upload),
            WizardStage::Validation => Some(WizardStage::Mapping),
            WizardStage::Execution => Some(WizardStage::Validation),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStage::Upload => "upload",
            WizardStage::Mapping => "mapping",
            WizardStage::Validation => "validation",
            WizardStage::Execution => "execution",
        }
    }
}

// ==========================================
// WriteOutcome - 写服务单行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOutcome {
    /// 新建商品（携带下游商品标识）
    Created(String),
    /// 更新已有商品
    Updated(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_terminal() {
        assert!(ImportPhase::Completed.is_terminal());
        assert!(ImportPhase::Cancelled.is_terminal());
        assert!(ImportPhase::Error.is_terminal());
        assert!(!ImportPhase::Importing.is_terminal());
        assert!(!ImportPhase::Paused.is_terminal());
    }

    #[test]
    fn test_stage_navigation() {
        assert_eq!(WizardStage::Upload.next(), Some(WizardStage::Mapping));
        assert_eq!(WizardStage::Execution.next(), None);
        assert_eq!(WizardStage::Upload.prev(), None);
        assert_eq!(WizardStage::Execution.prev(), Some(WizardStage::Validation));
    }
}
