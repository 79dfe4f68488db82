// ==========================================
// 商品目录批量导入系统 - 导入管道模块
// ==========================================
// 解析 → 映射 → 校验 → 修正 → 模板/报表
// ==========================================

pub mod auto_fix;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod template;
pub mod validator;

pub use auto_fix::{AutoFix, AutoFixer};
pub use error::{ImportError, Result};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use template::TemplateExporter;
pub use validator::Validator;
