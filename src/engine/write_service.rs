// ==========================================
// 商品目录批量导入系统 - 目录写入服务接口
// ==========================================
// 职责: 执行引擎与后端商品目录之间的边界
// 实现方负责目录级唯一约束与持久化细节；引擎只关心单行结果
// ==========================================

use crate::domain::execution::ImportResult;
use crate::domain::product::ProductRow;
use crate::domain::types::WriteOutcome;
use async_trait::async_trait;

// ==========================================
// WriteFailure - 单行写入失败分类
// ==========================================
// Fatal 表示后端已不可继续（如事务中断），引擎据此终止整批；
// 其余类别仅记录该行失败并继续
#[derive(Debug, Clone, thiserror::Error)]
pub enum WriteFailure {
    #[error("后端拒绝: {0}")]
    Rejected(String),

    #[error("写入超时")]
    Timeout,

    #[error("后端暂不可用: {0}")]
    Unavailable(String),

    #[error("后端致命错误: {0}")]
    Fatal(String),
}

// ==========================================
// ProductWriteService - 写入服务契约
// ==========================================
#[async_trait]
pub trait ProductWriteService: Send + Sync {
    /// 写入单行商品
    ///
    /// update_existing 为真时命中既有 SKU 则更新，否则视为冲突拒绝
    async fn create_or_update(
        &self,
        row: &ProductRow,
        update_existing: bool,
    ) -> std::result::Result<WriteOutcome, WriteFailure>;

    /// 导入前快照，返回可用于回滚的备份标识
    async fn create_backup(&self) -> std::result::Result<String, WriteFailure>;

    /// 导入完成通知（失败不影响导入结论）
    async fn notify(&self, result: &ImportResult) -> std::result::Result<(), WriteFailure>;
}

// ==========================================
// NoOpWriteService - 空实现
// ==========================================
// 演练模式与测试基线: 全部成功、零延迟
pub struct NoOpWriteService;

#[async_trait]
impl ProductWriteService for NoOpWriteService {
    async fn create_or_update(
        &self,
        row: &ProductRow,
        _update_existing: bool,
    ) -> std::result::Result<WriteOutcome, WriteFailure> {
        let sku = row.text("sku").unwrap_or("").to_string();
        Ok(WriteOutcome::Created(sku))
    }

    async fn create_backup(&self) -> std::result::Result<String, WriteFailure> {
        Ok(format!("backup-{}", uuid::Uuid::new_v4()))
    }

    async fn notify(&self, _result: &ImportResult) -> std::result::Result<(), WriteFailure> {
        Ok(())
    }
}
