// ==========================================
// 导入管道集成测试
// ==========================================
// 解析 → 映射 → 校验 → 修正 → 模板/报表
// ==========================================


use ppm_import::{
    AutoFixer, FieldCatalog, FieldMapper, ImportLimits, IssueSeverity, TemplateExporter,
    UniversalFileParser, Validator,
};
use std::sync::Arc;
use test_helpers::csv_of;

fn catalog() -> Arc<FieldCatalog> {
    Arc::new(FieldCatalog::default_product_catalog())
}

#[test]
fn test_duplicate_and_missing_sku_scenario() {
    // 三行: 合法 / SKU 重复 / SKU 缺失
    let bytes = csv_of(
        &["SKU", "Name", "Price"],
        &[
            &["A1", "Widget", "9.99"],
            &["A1", "Gadget", "14.99"],
            &["", "Gizmo", "5.00"],
        ],
    );
    let catalog = catalog();
    let parser = UniversalFileParser::new(ImportLimits::default());
    let dataset = parser.parse_bytes("products.csv", &bytes).unwrap();

    let mapper = FieldMapper::new(Arc::clone(&catalog));
    let detection = mapper.detect(&dataset.headers);
    assert_eq!(detection.confidence, 1.0);
    assert!(detection.unmapped_columns.is_empty());

    let validator = Validator::new(Arc::clone(&catalog));
    let result = validator.validate(&dataset, &detection.mappings);

    assert!(!result.is_valid);
    assert_eq!(result.summary.total_rows, 3);
    assert_eq!(result.summary.valid_rows, 1);
    assert_eq!(result.summary.error_count, 2);
    assert_eq!(result.summary.error_rows, vec![1, 2]);

    let dup = result.issues.iter().find(|i| i.row == 1).unwrap();
    assert_eq!(dup.severity, IssueSeverity::Error);
    assert!(dup.message.contains("重复"));

    let missing = result.issues.iter().find(|i| i.row == 2).unwrap();
    assert!(missing.message.contains("为空"));

    assert_eq!(result.valid_rows.len(), 1);
    assert_eq!(result.valid_rows[0].text("sku"), Some("A1"));
}

#[test]
fn test_template_round_trip_zero_issues() {
    // 下载模板 → 原样回传: 映射零置疑、校验零错误
    let catalog = catalog();
    let bytes = TemplateExporter::new(&catalog).export_template().unwrap();

    let parser = UniversalFileParser::new(ImportLimits::default());
    let dataset = parser.parse_bytes("template.csv", &bytes).unwrap();

    let mapper = FieldMapper::new(Arc::clone(&catalog));
    let detection = mapper.detect(&dataset.headers);
    assert_eq!(detection.confidence, 1.0);
    assert!(detection.unmapped_columns.is_empty());
    assert!(detection.ambiguous_fields.is_empty());
    for mapping in &detection.mappings {
        assert!(mapping.catalog_field.is_some());
        assert_eq!(mapping.confidence, 1.0);
    }

    let validator = Validator::new(Arc::clone(&catalog));
    let result = validator.validate(&dataset, &detection.mappings);
    assert!(result.is_valid, "模板示例行应通过校验: {:?}", result.issues);
    assert_eq!(result.summary.error_count, 0);
}

#[test]
fn test_auto_fix_then_revalidate() {
    let bytes = csv_of(
        &["SKU", "Name", "Price", "上架日期"],
        &[&["A1", "Widget", "\"1,99\"", "2026.03.01"]],
    );
    let catalog = catalog();
    let parser = UniversalFileParser::new(ImportLimits::default());
    let mut dataset = parser.parse_bytes("products.csv", &bytes).unwrap();

    let mapper = FieldMapper::new(Arc::clone(&catalog));
    let mappings = mapper.auto_apply(&dataset.headers);
    let validator = Validator::new(Arc::clone(&catalog));

    let before = validator.validate(&dataset, &mappings);
    assert_eq!(before.summary.error_count, 2);
    assert!(before.issues.iter().all(|i| i.auto_fixable));

    let fixer = AutoFixer::new(Arc::clone(&catalog));
    let fixes = fixer.suggest(&dataset, &mappings, &before.issues);
    assert_eq!(fixer.apply(&mut dataset, &fixes), 2);

    let after = validator.validate(&dataset, &mappings);
    assert!(after.is_valid);
    assert_eq!(after.valid_rows[0].number("price"), Some(1.99));
}

#[test]
fn test_unmapped_column_is_ignored_by_validation() {
    let bytes = csv_of(
        &["SKU", "Name", "Price", "内部备注"],
        &[&["A1", "Widget", "9.99", "whatever"]],
    );
    let catalog = catalog();
    let parser = UniversalFileParser::new(ImportLimits::default());
    let dataset = parser.parse_bytes("products.csv", &bytes).unwrap();

    let mapper = FieldMapper::new(Arc::clone(&catalog));
    let detection = mapper.detect(&dataset.headers);
    assert_eq!(detection.unmapped_columns, vec!["内部备注".to_string()]);

    let validator = Validator::new(Arc::clone(&catalog));
    let result = validator.validate(&dataset, &detection.mappings);
    assert!(result.is_valid);
    // 未映射列不进入类型化行
    assert_eq!(result.valid_rows[0].values.len(), 3);
}

#[test]
fn test_error_report_covers_all_issues() {
    let bytes = csv_of(
        &["SKU", "Name", "Price"],
        &[&["A1", "Widget", "abc"], &["A2", "Gadget", "0.01"]],
    );
    let catalog = catalog();
    let parser = UniversalFileParser::new(ImportLimits::default());
    let dataset = parser.parse_bytes("products.csv", &bytes).unwrap();

    let mapper = FieldMapper::new(Arc::clone(&catalog));
    let mappings = mapper.auto_apply(&dataset.headers);
    let validator = Validator::new(Arc::clone(&catalog));
    let result = validator.validate(&dataset, &mappings);
    assert_eq!(result.summary.error_count, 1);
    assert_eq!(result.summary.warning_count, 1);

    let report = TemplateExporter::new(&catalog)
        .export_error_report(&result.issues)
        .unwrap();
    let mut reader = csv::Reader::from_reader(report.as_slice());
    let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), result.issues.len());
    // 行号为 1 起展示编号
    assert_eq!(&records[0][0], "1");
}

#[test]
fn test_parse_path_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.csv");
    std::fs::write(&path, test_helpers::valid_csv(20)).unwrap();

    let parser = UniversalFileParser::new(ImportLimits::default());
    let dataset = parser.parse_path(&path).unwrap();
    assert_eq!(dataset.total_rows, 20);
    assert_eq!(dataset.headers, vec!["SKU", "Name", "Price"]);
    assert!(dataset.source_size > 0);
}
