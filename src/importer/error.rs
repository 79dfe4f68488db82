// ==========================================
// 商品目录批量导入系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层: 文件级(致命) / 映射级(阻断前进) / 执行级
// 传播: 任何失败都成为类型化错误或结果字段，不允许只记日志
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件级错误（致命，必须重新上传） =====
    #[error("文件过大: {size} 字节（上限 {limit} 字节）")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("文件格式损坏: {0}")]
    MalformedFile(String),

    #[error("文件无数据行")]
    EmptyFile,

    #[error("文件表头为空")]
    NoHeaders,

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 映射级错误（阻断前进，操作员可修改后重试） =====
    #[error("必填字段未映射: {0}")]
    MissingRequiredField(String),

    #[error("多列映射到同一字段: {0}")]
    DuplicateFieldTarget(String),

    #[error("映射目标字段不存在: {0}")]
    UnknownCatalogField(String),

    // ===== 执行级错误 =====
    #[error("存在 {0} 个未解决的校验错误（未开启跳过错误行）")]
    UnresolvedErrors(usize),

    #[error("导入已在执行中")]
    AlreadyRunning,

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
// 结构性失败（分隔/引号）归为文件损坏
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::MalformedFile(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::MalformedFile(err.to_string())
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ImportError>;
