// ==========================================
// 商品目录批量导入系统 - 配置层
// ==========================================
// 职责: 字段目录 + 导入限制（均为启动时加载的静态配置）
// ==========================================

pub mod field_catalog;
pub mod import_limits;

pub use field_catalog::{FieldCatalog, FieldCatalogEntry};
pub use import_limits::ImportLimits;
