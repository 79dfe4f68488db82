// ==========================================
// 商品目录批量导入系统 - 导入限制配置
// ==========================================
// 职责: 文件体积上限 / 预览行数 / 行写入超时
// 说明: 部署级常量，启动时加载后不变
// ==========================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认文件体积上限（10 MiB）
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// 默认预览行数
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// 默认单行写入超时（毫秒）
pub const DEFAULT_ROW_WRITE_TIMEOUT_MS: u64 = 10_000;

// ==========================================
// ImportLimits - 导入限制
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportLimits {
    /// 文件体积上限（字节），超过在解析前拒绝
    pub max_file_bytes: u64,
    /// 预览行数
    pub preview_rows: usize,
    /// 单行下游写入超时（毫秒），超时按行级失败处理
    pub row_write_timeout_ms: u64,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            row_write_timeout_ms: DEFAULT_ROW_WRITE_TIMEOUT_MS,
        }
    }
}

impl ImportLimits {
    pub fn row_write_timeout(&self) -> Duration {
        Duration::from_millis(self.row_write_timeout_ms)
    }
}
