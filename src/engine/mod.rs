// ==========================================
// 商品目录批量导入系统 - 执行引擎模块
// ==========================================

pub mod executor;
pub mod write_service;

pub use executor::{ImportControl, ImportExecutor, ImportRun};
pub use write_service::{NoOpWriteService, ProductWriteService, WriteFailure};
