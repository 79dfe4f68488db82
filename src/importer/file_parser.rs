// ==========================================
// 商品目录批量导入系统 - 文件解析器实现
// ==========================================
// 职责: 原始文件字节 → Dataset（阶段 0: 摄入）
// 支持: CSV (.csv) / Excel (.xlsx/.xls)
// 契约: 体积超限在解析前拒绝; 结构损坏 → MalformedFile;
//       零数据行 → EmptyFile; 表头空 → NoHeaders;
//       全空白行静默丢弃; 整个文件解析完成后才进入下一阶段
// ==========================================

use crate::config::ImportLimits;
use crate::domain::Dataset;
use crate::importer::error::ImportError;
use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

/// 粗粒度解析进度回调（0-100 百分比刻度）
///
/// 仅用于避免大文件解析时界面无响应，正确性不依赖它
pub type ProgressTick<'a> = &'a mut dyn FnMut(u8);

// ==========================================
// 表头检查（CSV 与 Excel 共用）
// ==========================================
fn check_headers(headers: &[String]) -> Result<(), ImportError> {
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::NoHeaders);
    }
    if headers.iter().any(|h| h.is_empty()) {
        return Err(ImportError::MalformedFile("表头包含空列名".to_string()));
    }
    Ok(())
}

fn check_size(size: u64, limits: &ImportLimits) -> Result<(), ImportError> {
    if size > limits.max_file_bytes {
        return Err(ImportError::FileTooLarge {
            size,
            limit: limits.max_file_bytes,
        });
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse_bytes(
        &self,
        source_name: &str,
        bytes: &[u8],
        limits: &ImportLimits,
    ) -> Result<Dataset, ImportError> {
        self.parse_bytes_with_progress(source_name, bytes, limits, None)
    }

    /// 解析 CSV 字节流为 Dataset
    ///
    /// # 参数
    /// - source_name: 源文件名（保留在 Dataset 上）
    /// - bytes: 文件内容
    /// - on_progress: 可选的百分比刻度回调（每跨越 10% 触发一次）
    pub fn parse_bytes_with_progress(
        &self,
        source_name: &str,
        bytes: &[u8],
        limits: &ImportLimits,
        mut on_progress: Option<ProgressTick<'_>>,
    ) -> Result<Dataset, ImportError> {
        let size = bytes.len() as u64;
        check_size(size, limits)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致，对齐交给 Dataset
            .from_reader(bytes);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        check_headers(&headers)?;

        // 读取所有行
        let mut rows = Vec::new();
        let mut last_tick: u8 = 0;
        for result in reader.records() {
            let record = result?;

            let cells: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行（不计入数据）
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            // 百分比刻度
            if let Some(cb) = on_progress.as_mut() {
                if size > 0 {
                    if let Some(pos) = record.position() {
                        let pct = ((pos.byte() * 100) / size).min(100) as u8;
                        if pct >= last_tick + 10 {
                            last_tick = pct - pct % 10;
                            cb(last_tick);
                        }
                    }
                }
            }

            rows.push(cells);
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        if let Some(cb) = on_progress.as_mut() {
            cb(100);
        }

        tracing::debug!(
            rows = rows.len(),
            columns = headers.len(),
            source = source_name,
            "CSV 解析完成"
        );

        Ok(Dataset::new(headers, rows, source_name.to_string(), size))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 解析 Excel 字节流为 Dataset（取第一个工作表）
    pub fn parse_bytes(
        &self,
        source_name: &str,
        bytes: &[u8],
        limits: &ImportLimits,
    ) -> Result<Dataset, ImportError> {
        let size = bytes.len() as u64;
        check_size(size, limits)?;

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::MalformedFile("Excel 文件无工作表".to_string()));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::MalformedFile(e.to_string()))?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows.next().ok_or(ImportError::NoHeaders)?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();
        check_headers(&headers)?;

        // 读取数据行
        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let cells: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(cells);
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        Ok(Dataset::new(headers, rows, source_name.to_string(), size))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    limits: ImportLimits,
}

impl UniversalFileParser {
    pub fn new(limits: ImportLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ImportLimits {
        &self.limits
    }

    /// 按文件名扩展名分发解析字节流
    pub fn parse_bytes(&self, source_name: &str, bytes: &[u8]) -> Result<Dataset, ImportError> {
        let ext = Path::new(source_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_bytes(source_name, bytes, &self.limits),
            "xlsx" | "xls" => ExcelParser.parse_bytes(source_name, bytes, &self.limits),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    /// 从磁盘路径解析（体积检查先于读取）
    pub fn parse_path<P: AsRef<Path>>(&self, file_path: P) -> Result<Dataset, ImportError> {
        let path = file_path.as_ref();

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let size = std::fs::metadata(path)?.len();
        check_size(size, &self.limits)?;

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        self.parse_bytes(&name, &bytes)
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(ImportLimits::default())
    }
}
