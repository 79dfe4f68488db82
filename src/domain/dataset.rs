// ==========================================
// 商品目录批量导入系统 - 数据集模型
// ==========================================
// 职责: 上传文件解析后的内存表示
// 生命周期: 每次上传创建一次；除显式修正操作外不变；
//           向导重置或重新上传时丢弃
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Dataset - 解析后的表格数据
// ==========================================
// 不变量: 每行长度与表头对齐（短行补空、长行截断）；
//         total_rows == rows.len()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// 表头（允许重复，但不允许空列名）
    pub headers: Vec<String>,
    /// 数据行（已对齐到表头长度）
    pub rows: Vec<Vec<String>>,
    /// 数据行总数
    pub total_rows: usize,
    /// 源文件名
    pub source_name: String,
    /// 源文件字节数
    pub source_size: u64,
}

impl Dataset {
    /// 创建数据集并对齐行长度
    ///
    /// # 参数
    /// - headers: 表头（调用方已 trim）
    /// - rows: 数据行（可能长短不一）
    /// - source_name / source_size: 源文件标识
    pub fn new(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        source_name: String,
        source_size: u64,
    ) -> Self {
        let width = headers.len();
        let mut aligned = Vec::with_capacity(rows.len());

        for (idx, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                tracing::warn!(
                    row = idx,
                    cells = row.len(),
                    headers = width,
                    "行长度超过表头，多余单元格已截断"
                );
                row.truncate(width);
            } else {
                while row.len() < width {
                    row.push(String::new());
                }
            }
            aligned.push(row);
        }

        let total_rows = aligned.len();
        Self {
            headers,
            rows: aligned,
            total_rows,
            source_name,
            source_size,
        }
    }

    /// 读取单元格（越界返回 None）
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }

    /// 修改单元格（仅供修正应用使用，修改后必须重新校验）
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// 生成预览（前 n 行），供操作员确认
    pub fn preview(&self, n: usize) -> Preview {
        Preview {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
            total_rows: self.total_rows,
        }
    }
}

// ==========================================
// Preview - 数据集预览
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["SKU".to_string(), "名称".to_string(), "价格".to_string()]
    }

    #[test]
    fn test_short_rows_padded() {
        let ds = Dataset::new(
            headers(),
            vec![vec!["A1".to_string()]],
            "t.csv".to_string(),
            10,
        );
        assert_eq!(ds.rows[0].len(), 3);
        assert_eq!(ds.cell(0, 1), Some(""));
    }

    #[test]
    fn test_long_rows_truncated() {
        let ds = Dataset::new(
            headers(),
            vec![vec![
                "A1".to_string(),
                "Widget".to_string(),
                "9.99".to_string(),
                "extra".to_string(),
            ]],
            "t.csv".to_string(),
            10,
        );
        assert_eq!(ds.rows[0].len(), 3);
        assert_eq!(ds.total_rows, 1);
    }

    #[test]
    fn test_preview_bounded() {
        let rows: Vec<Vec<String>> = (0..20)
            .map(|i| vec![format!("A{}", i), "w".to_string(), "1".to_string()])
            .collect();
        let ds = Dataset::new(headers(), rows, "t.csv".to_string(), 100);
        let p = ds.preview(5);
        assert_eq!(p.rows.len(), 5);
        assert_eq!(p.total_rows, 20);
    }

    #[test]
    fn test_set_cell() {
        let mut ds = Dataset::new(
            headers(),
            vec![vec!["A1".to_string(), "w".to_string(), " 1,99 ".to_string()]],
            "t.csv".to_string(),
            10,
        );
        assert!(ds.set_cell(0, 2, "1.99".to_string()));
        assert_eq!(ds.cell(0, 2), Some("1.99"));
        assert!(!ds.set_cell(5, 0, "x".to_string()));
    }
}
