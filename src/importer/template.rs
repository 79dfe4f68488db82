// ==========================================
// 商品目录批量导入系统 - 模板与报表导出
// ==========================================
// 职责: 生成标准导入模板 CSV（目录标签为表头 + 示例行），
//       以及校验问题报表 CSV（供操作员离线整改）
// 约定: 模板表头即字段标签，保证"下载模板 → 不改表头回传"可零置疑自动映射
// ==========================================

use crate::config::FieldCatalog;
use crate::domain::types::IssueSeverity;
use crate::domain::validation::ValidationIssue;
use crate::importer::error::{ImportError, Result};

/// 模板示例行数
const TEMPLATE_SAMPLE_ROWS: usize = 2;

pub struct TemplateExporter<'a> {
    catalog: &'a FieldCatalog,
}

impl<'a> TemplateExporter<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Self { catalog }
    }

    /// 导出导入模板 CSV 字节流
    ///
    /// 表头 = 目录字段标签（按目录声明顺序），正文 = 示例值行
    pub fn export_template(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let headers: Vec<&str> = self
            .catalog
            .entries
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        writer
            .write_record(&headers)
            .map_err(|e| ImportError::InternalError(format!("模板写入失败: {}", e)))?;

        for i in 0..TEMPLATE_SAMPLE_ROWS {
            let row: Vec<&str> = self
                .catalog
                .entries
                .iter()
                .map(|e| e.samples.get(i).map(|s| s.as_str()).unwrap_or(""))
                .collect();
            writer
                .write_record(&row)
                .map_err(|e| ImportError::InternalError(format!("模板写入失败: {}", e)))?;
        }

        writer
            .into_inner()
            .map_err(|e| ImportError::InternalError(format!("模板写入失败: {}", e)))
    }

    /// 导出校验问题报表 CSV 字节流
    ///
    /// 行号为展示用 1 起编号
    pub fn export_error_report(&self, issues: &[ValidationIssue]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(["行号", "列名", "级别", "问题", "当前值", "建议"])
            .map_err(|e| ImportError::InternalError(format!("报表写入失败: {}", e)))?;

        for issue in issues {
            let level = match issue.severity {
                IssueSeverity::Error => "错误",
                IssueSeverity::Warning => "警告",
            };
            writer
                .write_record([
                    (issue.row + 1).to_string().as_str(),
                    issue.column.as_str(),
                    level,
                    issue.message.as_str(),
                    issue.value.as_str(),
                    issue.suggestion.as_deref().unwrap_or(""),
                ])
                .map_err(|e| ImportError::InternalError(format!("报表写入失败: {}", e)))?;
        }

        writer
            .into_inner()
            .map_err(|e| ImportError::InternalError(format!("报表写入失败: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_headers_are_labels() {
        let catalog = FieldCatalog::default_product_catalog();
        let bytes = TemplateExporter::new(&catalog).export_template().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(|h| h.to_string())
            .collect();
        let labels: Vec<String> = catalog.entries.iter().map(|e| e.label.clone()).collect();
        assert_eq!(headers, labels);

        let rows: Vec<_> = reader.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), TEMPLATE_SAMPLE_ROWS);
    }

    #[test]
    fn test_error_report_rows_are_one_based() {
        let catalog = FieldCatalog::default_product_catalog();
        let issues = vec![ValidationIssue {
            row: 4,
            column: "Price".to_string(),
            severity: IssueSeverity::Error,
            message: "价格 无法解析为数值".to_string(),
            value: "abc".to_string(),
            suggestion: Some("期望数字格式（如 9.99）".to_string()),
            auto_fixable: false,
        }];
        let bytes = TemplateExporter::new(&catalog)
            .export_error_report(&issues)
            .unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "5");
        assert_eq!(&record[2], "错误");
        assert_eq!(&record[5], "期望数字格式（如 9.99）");
    }
}
