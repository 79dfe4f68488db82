// ==========================================
// 商品目录批量导入系统 - 执行引擎
// ==========================================
// 职责: 将校验通过行按块写入下游，支持暂停/继续/取消
// 协作点: 暂停与取消在行边界生效，已完成的写入不回退
// 阶段机: Preparing → Importing ⇄ Paused → Finalizing → 终态
// ==========================================

use crate::config::ImportLimits;
use crate::domain::execution::{FailedRow, ImportOptions, ImportProgress, ImportResult};
use crate::domain::product::ProductRow;
use crate::domain::types::{ImportPhase, ImportStatus, WriteOutcome};
use crate::domain::validation::ValidationResult;
use crate::engine::write_service::{ProductWriteService, WriteFailure};
use crate::importer::error::{ImportError, Result};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 暂停状态轮询间隔
const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(10);

// ==========================================
// ImportControl - 协作式运行控制
// ==========================================
// 可克隆句柄，操作员侧与引擎侧共享同一组标志
#[derive(Clone, Default, Debug)]
pub struct ImportControl {
    inner: Arc<ControlFlags>,
}

#[derive(Default, Debug)]
struct ControlFlags {
    paused: AtomicBool,
    cancelled: AtomicBool,
}

impl ImportControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.inner.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.inner.paused.store(false, Ordering::SeqCst);
    }

    /// 取消请求不可撤销，在下一个行边界生效
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

// ==========================================
// ImportRun - 运行句柄
// ==========================================
#[derive(Debug)]
pub struct ImportRun {
    pub control: ImportControl,
    /// 进度快照通道（每行更新一次）
    pub progress: watch::Receiver<ImportProgress>,
    handle: JoinHandle<ImportResult>,
}

impl ImportRun {
    /// 等待运行结束并取回终态结果
    pub async fn join(self) -> Result<ImportResult> {
        self.handle
            .await
            .map_err(|e| ImportError::InternalError(format!("执行任务异常终止: {}", e)))
    }
}

// ==========================================
// ImportExecutor - 执行引擎
// ==========================================
pub struct ImportExecutor<W: ProductWriteService + 'static> {
    service: Arc<W>,
    limits: ImportLimits,
    running: Arc<AtomicBool>,
}

impl<W: ProductWriteService + 'static> ImportExecutor<W> {
    pub fn new(service: Arc<W>, limits: ImportLimits) -> Self {
        Self {
            service,
            limits,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 启动导入运行
    ///
    /// # 前置条件
    /// - skip_error_rows 关闭时校验必须零错误，否则拒绝启动
    /// - 同一执行器同时最多一个运行
    pub fn start(
        &self,
        validation: &ValidationResult,
        options: &ImportOptions,
        control: ImportControl,
    ) -> Result<ImportRun> {
        if !options.skip_error_rows && validation.summary.error_count > 0 {
            return Err(ImportError::UnresolvedErrors(
                validation.summary.error_count,
            ));
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ImportError::AlreadyRunning);
        }

        let rows = validation.valid_rows.clone();
        let chunk_size = options.effective_chunk_size();
        let total_chunks = rows.len().div_ceil(chunk_size);
        let warning_count = validation.summary.warning_count;

        let (tx, rx) = watch::channel(ImportProgress::new(
            rows.len(),
            total_chunks,
            warning_count,
        ));

        let ctx = RunContext {
            service: Arc::clone(&self.service),
            options: options.clone(),
            row_timeout: self.limits.row_write_timeout(),
            control: control.clone(),
            running: Arc::clone(&self.running),
        };

        tracing::info!(
            rows = rows.len(),
            chunk_size,
            total_chunks,
            "导入运行启动"
        );

        let handle = tokio::spawn(async move { run_import(ctx, rows, chunk_size, tx).await });

        Ok(ImportRun {
            control,
            progress: rx,
            handle,
        })
    }
}

struct RunContext<W: ProductWriteService> {
    service: Arc<W>,
    options: ImportOptions,
    row_timeout: Duration,
    control: ImportControl,
    running: Arc<AtomicBool>,
}

async fn run_import<W: ProductWriteService>(
    ctx: RunContext<W>,
    rows: Vec<ProductRow>,
    chunk_size: usize,
    tx: watch::Sender<ImportProgress>,
) -> ImportResult {
    let started = Instant::now();
    let started_at = Utc::now();
    let mut progress = tx.borrow().clone();
    progress.started_at = started_at;

    progress.phase = ImportPhase::Preparing;
    let _ = tx.send(progress.clone());

    // 备份失败不阻断导入，仅告警
    let backup_id = if ctx.options.create_backup {
        match ctx.service.create_backup().await {
            Ok(id) => {
                tracing::info!(backup_id = %id, "备份已创建");
                Some(id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "备份创建失败，继续导入");
                None
            }
        }
    } else {
        None
    };

    progress.phase = ImportPhase::Importing;
    let _ = tx.send(progress.clone());

    let mut created_products: Vec<String> = Vec::new();
    let mut updated_products: Vec<String> = Vec::new();
    let mut failed_rows: Vec<FailedRow> = Vec::new();
    let mut fatal = false;

    for (idx, row) in rows.iter().enumerate() {
        // 暂停: 行边界挂起，直至恢复或取消
        if ctx.control.is_paused() && !ctx.control.is_cancelled() {
            progress.phase = ImportPhase::Paused;
            let _ = tx.send(progress.clone());
            tracing::info!(processed = progress.processed_rows, "导入已暂停");
            while ctx.control.is_paused() && !ctx.control.is_cancelled() {
                tokio::time::sleep(PAUSE_POLL_INTERVAL).await;
            }
            progress.phase = ImportPhase::Importing;
            let _ = tx.send(progress.clone());
        }

        // 取消: 行边界退出，已写入行不回退
        if ctx.control.is_cancelled() {
            tracing::info!(processed = progress.processed_rows, "导入已取消");
            break;
        }

        progress.current_chunk = idx / chunk_size + 1;

        let write = tokio::time::timeout(
            ctx.row_timeout,
            ctx.service.create_or_update(row, ctx.options.update_existing),
        )
        .await;

        match write {
            Ok(Ok(WriteOutcome::Created(id))) => {
                progress.success_count += 1;
                created_products.push(id);
            }
            Ok(Ok(WriteOutcome::Updated(id))) => {
                progress.success_count += 1;
                updated_products.push(id);
            }
            Ok(Err(WriteFailure::Fatal(msg))) => {
                progress.error_count += 1;
                failed_rows.push(FailedRow {
                    row_index: row.row_index,
                    reason: format!("后端致命错误: {}", msg),
                });
                tracing::error!(row = row.row_index, error = %msg, "后端致命错误，终止运行");
                fatal = true;
            }
            Ok(Err(e)) => {
                progress.error_count += 1;
                failed_rows.push(FailedRow {
                    row_index: row.row_index,
                    reason: e.to_string(),
                });
                tracing::warn!(row = row.row_index, error = %e, "行写入失败");
            }
            Err(_) => {
                progress.error_count += 1;
                failed_rows.push(FailedRow {
                    row_index: row.row_index,
                    reason: "写入超时".to_string(),
                });
                tracing::warn!(row = row.row_index, "行写入超时");
            }
        }

        progress.processed_rows += 1;
        progress.estimated_secs_left = estimate_secs_left(
            progress.processed_rows,
            progress.total_rows,
            started.elapsed(),
        );
        let _ = tx.send(progress.clone());

        if fatal {
            break;
        }
    }

    progress.phase = ImportPhase::Finalizing;
    progress.estimated_secs_left = None;
    let _ = tx.send(progress.clone());

    let cancelled = ctx.control.is_cancelled();
    let status = if cancelled {
        ImportStatus::Cancelled
    } else if fatal || (progress.error_count > 0 && progress.success_count == 0) {
        ImportStatus::Failed
    } else if progress.error_count > 0 {
        ImportStatus::Partial
    } else {
        ImportStatus::Success
    };

    let result = ImportResult {
        import_id: uuid::Uuid::new_v4().to_string(),
        status,
        total_rows: progress.total_rows,
        success_count: progress.success_count,
        error_count: progress.error_count,
        warning_count: progress.warning_count,
        duration_ms: started.elapsed().as_millis() as u64,
        created_products,
        updated_products,
        failed_rows,
        backup_id,
        started_at,
        finished_at: Utc::now(),
    };

    if ctx.options.send_notification {
        if let Err(e) = ctx.service.notify(&result).await {
            tracing::warn!(error = %e, "完成通知发送失败");
        }
    }

    progress.phase = match status {
        ImportStatus::Cancelled => ImportPhase::Cancelled,
        ImportStatus::Failed => ImportPhase::Error,
        _ => ImportPhase::Completed,
    };
    let _ = tx.send(progress.clone());

    tracing::info!(
        import_id = %result.import_id,
        status = status.as_str(),
        success = result.success_count,
        errors = result.error_count,
        duration_ms = result.duration_ms,
        "导入运行结束"
    );

    ctx.running.store(false, Ordering::SeqCst);
    result
}

/// 按当前吞吐量外推剩余秒数
fn estimate_secs_left(processed: usize, total: usize, elapsed: Duration) -> Option<u64> {
    if processed == 0 {
        return None;
    }
    let rate = processed as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    let remaining = (total - processed) as f64;
    Some((remaining / rate).ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::ValidationSummary;
    use crate::engine::write_service::NoOpWriteService;
    use crate::domain::product::FieldValue;

    fn rows(n: usize) -> Vec<ProductRow> {
        (0..n)
            .map(|i| {
                let mut r = ProductRow::new(i);
                r.values
                    .insert("sku".to_string(), FieldValue::Text(format!("SKU-{}", i)));
                r
            })
            .collect()
    }

    fn validation_of(rows: Vec<ProductRow>) -> ValidationResult {
        let n = rows.len();
        ValidationResult {
            is_valid: true,
            valid_rows: rows,
            issues: Vec::new(),
            summary: ValidationSummary {
                total_rows: n,
                valid_rows: n,
                error_count: 0,
                warning_count: 0,
                error_rows: Vec::new(),
            },
        }
    }

    #[tokio::test]
    async fn test_successful_run_counts() {
        let executor = ImportExecutor::new(Arc::new(NoOpWriteService), ImportLimits::default());
        let validation = validation_of(rows(25));
        let mut options = ImportOptions::default();
        options.chunk_size = 10;

        let run = executor
            .start(&validation, &options, ImportControl::new())
            .unwrap();
        let result = run.join().await.unwrap();

        assert_eq!(result.status, ImportStatus::Success);
        assert_eq!(result.success_count, 25);
        assert_eq!(result.error_count, 0);
        assert_eq!(result.created_products.len(), 25);
        assert!(result.failed_rows.is_empty());
    }

    #[tokio::test]
    async fn test_start_rejected_with_unresolved_errors() {
        let executor = ImportExecutor::new(Arc::new(NoOpWriteService), ImportLimits::default());
        let mut validation = validation_of(rows(3));
        validation.is_valid = false;
        validation.summary.error_count = 2;

        let err = executor
            .start(&validation, &ImportOptions::default(), ImportControl::new())
            .unwrap_err();
        assert!(matches!(err, ImportError::UnresolvedErrors(2)));
    }

    #[tokio::test]
    async fn test_skip_error_rows_allows_start() {
        let executor = ImportExecutor::new(Arc::new(NoOpWriteService), ImportLimits::default());
        let mut validation = validation_of(rows(3));
        validation.is_valid = false;
        validation.summary.error_count = 2;

        let mut options = ImportOptions::default();
        options.skip_error_rows = true;
        let run = executor
            .start(&validation, &options, ImportControl::new())
            .unwrap();
        let result = run.join().await.unwrap();
        assert_eq!(result.success_count, 3);
    }

    #[tokio::test]
    async fn test_cancel_before_start_processes_nothing() {
        let executor = ImportExecutor::new(Arc::new(NoOpWriteService), ImportLimits::default());
        let validation = validation_of(rows(10));
        let control = ImportControl::new();
        control.cancel();

        let run = executor
            .start(&validation, &ImportOptions::default(), control)
            .unwrap();
        let result = run.join().await.unwrap();

        assert_eq!(result.status, ImportStatus::Cancelled);
        assert_eq!(result.success_count, 0);
    }

    #[test]
    fn test_estimate_secs_left() {
        assert_eq!(estimate_secs_left(0, 100, Duration::from_secs(1)), None);
        // 10 行/秒，剩 90 行 → 约 9 秒
        assert_eq!(
            estimate_secs_left(10, 100, Duration::from_secs(1)),
            Some(9)
        );
        assert_eq!(
            estimate_secs_left(100, 100, Duration::from_secs(5)),
            Some(0)
        );
    }
}
