// ==========================================
// 商品目录批量导入系统 - 核心库
// ==========================================
// 管道: 上传解析 → 字段映射 → 校验修正 → 分块执行
// 系统定位: 操作员向导式批量导入 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 字段目录与导入限制
pub mod config;

// 导入层 - 解析 / 映射 / 校验 / 修正
pub mod importer;

// 引擎层 - 分块执行与写服务边界
pub mod engine;

// 向导层 - 四阶段编排
pub mod wizard;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    FieldType, ImportPhase, ImportStatus, IssueSeverity, WizardStage, WriteOutcome,
};

// 领域实体
pub use domain::{
    Dataset, FailedRow, FieldMapping, FieldValue, ImportOptions, ImportProgress, ImportResult,
    MappingDetection, ProductRow, ValidationIssue, ValidationResult, ValidationSummary,
};

// 配置
pub use config::{FieldCatalog, FieldCatalogEntry, ImportLimits};

// 导入管道
pub use importer::{
    AutoFix, AutoFixer, FieldMapper, ImportError, TemplateExporter, UniversalFileParser, Validator,
};

// 执行引擎
pub use engine::{
    ImportControl, ImportExecutor, ImportRun, NoOpWriteService, ProductWriteService, WriteFailure,
};

// 向导
pub use wizard::{ImportWizard, WizardError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商品目录批量导入系统";

// ==========================================
// 预编译检查
// ==========================================
