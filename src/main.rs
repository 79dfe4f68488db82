// ==========================================
// 商品目录批量导入系统 - 命令行入口
// ==========================================
// 用途: 对指定文件跑完整导入管道（演练模式，写入走空实现）
// 用法: ppm-import <文件路径> [--execute]
// ==========================================

use ppm_import::{
    FieldCatalog, ImportControl, ImportExecutor, ImportLimits, ImportWizard, NoOpWriteService,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ppm_import::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", ppm_import::APP_NAME);
    tracing::info!("系统版本: {}", ppm_import::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let Some(file) = args.next() else {
        eprintln!("用法: ppm-import <文件路径> [--execute]");
        eprintln!("  --execute  校验通过后以演练模式执行写入");
        std::process::exit(2);
    };
    let execute = args.any(|a| a == "--execute");

    let catalog = Arc::new(FieldCatalog::default_product_catalog());
    let limits = ImportLimits::default();
    let mut wizard = ImportWizard::new(Arc::clone(&catalog), limits.clone());

    // 阶段一: 上传
    let preview = wizard.upload_path(Path::new(&file))?;
    tracing::info!(
        file = %file,
        rows = preview.total_rows,
        columns = preview.headers.len(),
        "文件解析完成"
    );
    wizard.advance()?;

    // 阶段二: 映射
    if let Some(detection) = wizard.detection() {
        tracing::info!(
            confidence = detection.confidence,
            unmapped = detection.unmapped_columns.len(),
            ambiguous = detection.ambiguous_fields.len(),
            "字段映射侦测完成"
        );
        for column in &detection.unmapped_columns {
            tracing::warn!(column = %column, "列未能匹配目录字段，将被跳过");
        }
    }
    wizard.advance()?;

    // 阶段三: 校验
    let validation = wizard.validate()?;
    println!("{}", serde_json::to_string_pretty(&validation.summary)?);
    for issue in &validation.issues {
        tracing::warn!(
            row = issue.row + 1,
            column = %issue.column,
            severity = issue.severity.as_str(),
            "{}",
            issue.message
        );
    }
    if !validation.issues.is_empty() {
        let report = ppm_import::TemplateExporter::new(&catalog)
            .export_error_report(&validation.issues)?;
        let report_path = "import_errors.csv";
        std::fs::write(report_path, report)?;
        tracing::info!(path = report_path, "校验问题报表已导出");
    }

    if !execute {
        return Ok(());
    }
    if validation.summary.error_count > 0 {
        wizard.options.skip_error_rows = true;
        tracing::warn!(
            errors = wizard.validation().map(|v| v.summary.error_count).unwrap_or(0),
            "存在错误行，演练执行将跳过"
        );
    }
    wizard.advance()?;

    // 阶段四: 执行（演练）
    let (validation, options) = wizard.begin_execution()?;
    let executor = ImportExecutor::new(Arc::new(NoOpWriteService), limits);
    let run = executor.start(&validation, &options, ImportControl::new())?;
    let result = run.join().await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    wizard.complete_execution(result);

    Ok(())
}
