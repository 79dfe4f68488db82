// ==========================================
// 商品目录批量导入系统 - 商品行模型
// ==========================================
// 职责: 校验通过行的类型化视图（导入管道中间产物）
// 生命周期: 校验引擎生成，执行引擎消费
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// FieldValue - 类型化单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl FieldValue {
    /// 文本表示（用于失败记录与日志）
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format!("{}", n),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        }
    }
}

// ==========================================
// ProductRow - 类型化商品记录
// ==========================================
// 键为目录字段 key；未填写的可选字段不出现在 values 中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    /// 源数据集行下标（0 起）
    pub row_index: usize,
    /// 目录字段 key → 类型化值
    pub values: BTreeMap<String, FieldValue>,
}

impl ProductRow {
    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            values: BTreeMap::new(),
        }
    }

    /// 读取文本字段
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 读取数值字段
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut row = ProductRow::new(3);
        row.values
            .insert("sku".to_string(), FieldValue::Text("A1".to_string()));
        row.values
            .insert("price".to_string(), FieldValue::Number(9.99));

        assert_eq!(row.text("sku"), Some("A1"));
        assert_eq!(row.number("price"), Some(9.99));
        assert_eq!(row.text("price"), None);
        assert_eq!(row.row_index, 3);
    }
}
