// ==========================================
// 商品目录批量导入系统 - 执行引擎模型
// ==========================================
// 职责: 导入选项 / 进度快照 / 终态结果
// 所有权: ImportProgress 在运行期间由执行引擎独占修改，
//         其他组件只读快照展示
// ==========================================

use crate::domain::types::{ImportPhase, ImportStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 块大小下限
pub const MIN_CHUNK_SIZE: usize = 10;
/// 块大小上限
pub const MAX_CHUNK_SIZE: usize = 1000;

// ==========================================
// ImportOptions - 操作员导入配置
// ==========================================
// 执行开始后不可变；各选项可独立开关，无非法组合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// 跳过含错误的行（false 且存在错误时拒绝启动）
    pub skip_error_rows: bool,
    /// 进入执行前自动应用 WARNING 级修正（应用后强制重新校验）
    pub auto_fix_warnings: bool,
    /// 执行前请求下游创建备份
    pub create_backup: bool,
    /// 允许更新已有商品（false 时目录撞键表现为行级失败）
    pub update_existing: bool,
    /// 完成后发送通知（失败仅记日志，不影响结果）
    pub send_notification: bool,
    /// 块大小（限定 [10, 1000]）
    pub chunk_size: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            skip_error_rows: false,
            auto_fix_warnings: false,
            create_backup: false,
            update_existing: false,
            send_notification: false,
            chunk_size: 100,
        }
    }
}

impl ImportOptions {
    /// 钳制后的块大小
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
    }
}

// ==========================================
// ImportProgress - 运行中进度
// ==========================================
// 每处理一行更新一次；计数器到终态前单调不减
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub phase: ImportPhase,
    /// 当前块序号（1 起；0 表示尚未开始）
    pub current_chunk: usize,
    pub total_chunks: usize,
    pub processed_rows: usize,
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    /// 校验阶段透传的警告计数
    pub warning_count: usize,
    /// 按当前吞吐量外推的剩余秒数（processed_rows == 0 时为 None）
    pub estimated_secs_left: Option<u64>,
    pub started_at: DateTime<Utc>,
}

impl ImportProgress {
    pub fn new(total_rows: usize, total_chunks: usize, warning_count: usize) -> Self {
        Self {
            phase: ImportPhase::Idle,
            current_chunk: 0,
            total_chunks,
            processed_rows: 0,
            total_rows,
            success_count: 0,
            error_count: 0,
            warning_count,
            estimated_secs_left: None,
            started_at: Utc::now(),
        }
    }
}

// ==========================================
// FailedRow - 行级失败记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedRow {
    /// 源数据集行下标（0 起）
    pub row_index: usize,
    /// 失败原因（写服务返回或超时）
    pub reason: String,
}

// ==========================================
// ImportResult - 终态结果（创建后不可变）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    /// 导入运行 ID（UUID）
    pub import_id: String,
    pub status: ImportStatus,
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    /// Preparing 进入到终态的墙钟耗时
    pub duration_ms: u64,
    /// 下游新建商品标识
    pub created_products: Vec<String>,
    /// 下游更新商品标识
    pub updated_products: Vec<String>,
    /// 行级失败明细（按行下标可重建顺序）
    pub failed_rows: Vec<FailedRow>,
    /// 下游备份标识（create_backup 开启且成功时）
    pub backup_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
