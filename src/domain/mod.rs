// ==========================================
// 商品目录批量导入系统 - 领域层
// ==========================================
// 职责: 导入管道中流转的值对象与枚举
// 红线: 领域层不做 IO，不依赖解析/执行实现
// ==========================================

pub mod dataset;
pub mod execution;
pub mod mapping;
pub mod product;
pub mod types;
pub mod validation;

// 重导出核心类型
pub use dataset::{Dataset, Preview};
pub use execution::{FailedRow, ImportOptions, ImportProgress, ImportResult};
pub use mapping::{AmbiguousField, FieldMapping, MappingDetection};
pub use product::{FieldValue, ProductRow};
pub use types::{
    FieldType, ImportPhase, ImportStatus, IssueSeverity, WizardStage, WriteOutcome,
};
pub use validation::{ValidationIssue, ValidationResult, ValidationSummary};
