// ==========================================
// 导入向导端到端测试
// ==========================================
// 上传 → 映射 → 校验 → 执行 全链路
// ==========================================


use ppm_import::{
    FieldCatalog, ImportControl, ImportExecutor, ImportLimits, ImportStatus, ImportWizard,
    NoOpWriteService, WizardError, WizardStage,
};
use std::sync::Arc;
use test_helpers::{csv_of, valid_csv, ScriptedWriteService};

fn wizard() -> ImportWizard {
    ImportWizard::new(
        Arc::new(FieldCatalog::default_product_catalog()),
        ImportLimits::default(),
    )
}

#[tokio::test]
async fn test_full_flow_upload_to_result() {
    let mut w = wizard();
    w.upload_bytes("products.csv", &valid_csv(12)).unwrap();
    w.advance().unwrap();
    w.advance().unwrap();
    w.validate().unwrap();
    w.advance().unwrap();

    let (validation, options) = w.begin_execution().unwrap();
    let executor = ImportExecutor::new(Arc::new(NoOpWriteService), ImportLimits::default());
    let run = executor
        .start(&validation, &options, ImportControl::new())
        .unwrap();
    let result = run.join().await.unwrap();
    w.complete_execution(result);

    let result = w.result().unwrap();
    assert_eq!(result.status, ImportStatus::Success);
    assert_eq!(result.success_count, 12);
    assert_eq!(w.stage(), WizardStage::Execution);
}

#[tokio::test]
async fn test_skip_error_rows_executes_clean_subset() {
    // 5 行中 2 行含错误，跳过后仅 3 行进入执行
    let bytes = csv_of(
        &["SKU", "Name", "Price"],
        &[
            &["A1", "W1", "1.00"],
            &["A2", "W2", "bad"],
            &["A3", "W3", "3.00"],
            &["A3", "W4", "4.00"],
            &["A5", "W5", "5.00"],
        ],
    );
    let mut w = wizard();
    w.upload_bytes("products.csv", &bytes).unwrap();
    w.advance().unwrap();
    w.advance().unwrap();
    let validation = w.validate().unwrap();
    assert_eq!(validation.summary.error_count, 2);

    w.options.skip_error_rows = true;
    w.advance().unwrap();

    let (validation, options) = w.begin_execution().unwrap();
    let service = Arc::new(ScriptedWriteService::new());
    let executor = ImportExecutor::new(Arc::clone(&service), ImportLimits::default());
    let run = executor
        .start(&validation, &options, ImportControl::new())
        .unwrap();
    let result = run.join().await.unwrap();

    assert_eq!(result.success_count, 3);
    // 文件顺序保持: 错误行被剔除后其余行相对次序不变
    assert_eq!(
        service.call_order(),
        vec!["A1".to_string(), "A3".to_string(), "A5".to_string()]
    );
    w.complete_execution(result);
}

#[test]
fn test_stage_gates_block_out_of_order_navigation() {
    let mut w = wizard();
    assert!(matches!(w.advance(), Err(WizardError::NoDataset)));
    assert!(matches!(w.begin_execution(), Err(WizardError::WrongStage { .. })));
    assert!(matches!(w.validate(), Err(WizardError::NoDataset)));

    w.upload_bytes("products.csv", &valid_csv(3)).unwrap();
    w.advance().unwrap();
    w.advance().unwrap();
    // 未校验不得进入执行
    assert!(matches!(w.advance(), Err(WizardError::NotValidated)));
}

#[test]
fn test_back_navigation_preserves_dataset() {
    let mut w = wizard();
    w.upload_bytes("products.csv", &valid_csv(4)).unwrap();
    w.advance().unwrap();
    w.advance().unwrap();
    w.validate().unwrap();

    assert_eq!(w.back().unwrap(), WizardStage::Mapping);
    assert_eq!(w.back().unwrap(), WizardStage::Upload);
    assert_eq!(w.back().unwrap(), WizardStage::Upload);
    assert!(w.dataset().is_some());
    assert_eq!(w.dataset().unwrap().total_rows, 4);
}

#[test]
fn test_reset_clears_session() {
    let mut w = wizard();
    w.upload_bytes("products.csv", &valid_csv(4)).unwrap();
    w.advance().unwrap();
    w.reset().unwrap();

    assert_eq!(w.stage(), WizardStage::Upload);
    assert!(w.dataset().is_none());
    assert!(w.detection().is_none());
    assert!(w.mappings().is_empty());
}

#[test]
fn test_manual_mapping_completes_contract() {
    // 表头无法自动识别，操作员手工指定
    let bytes = csv_of(
        &["c1", "c2", "c3"],
        &[&["A1", "Widget", "9.99"]],
    );
    let mut w = wizard();
    w.upload_bytes("products.csv", &bytes).unwrap();
    w.advance().unwrap();
    assert!(!w.can_proceed());

    w.set_mapping(0, Some("sku")).unwrap();
    w.set_mapping(1, Some("name")).unwrap();
    w.set_mapping(2, Some("price")).unwrap();
    assert!(w.can_proceed());

    w.advance().unwrap();
    let validation = w.validate().unwrap();
    assert!(validation.is_valid);
}
