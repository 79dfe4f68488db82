// ==========================================
// 商品目录批量导入系统 - 字段映射引擎
// ==========================================
// 职责: 表头 → 目录字段自动建议 + 完成契约检查
// 算法: 同义词精确匹配 1.0；子串包含（任一方向）0.8；分词重叠 0.6；
//       每列取最高置信候选，同分按目录声明顺序取先者
// 契约: 所有 required 字段恰好被映射一次；
//       同一目标字段不得被多列占用（与缺失必填分开报错）
// ==========================================

use crate::config::FieldCatalog;
use crate::domain::mapping::{AmbiguousField, FieldMapping, MappingDetection};
use crate::importer::error::ImportError;
use std::collections::HashMap;
use std::sync::Arc;

/// 高置信阈值：达到即计入整体置信度分子
const HIGH_CONFIDENCE: f64 = 0.8;

pub struct FieldMapper {
    catalog: Arc<FieldCatalog>,
}

impl FieldMapper {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self { catalog }
    }

    /// 自动检测映射建议（纯函数，幂等，不修改任何状态）
    ///
    /// # 返回
    /// - MappingDetection: 每列一条映射 + 未映射列 + 低置信候选 + 整体置信度
    pub fn detect(&self, headers: &[String]) -> MappingDetection {
        let mut mappings = Vec::with_capacity(headers.len());
        let mut unmapped_columns = Vec::new();
        let mut ambiguous_fields = Vec::new();
        let mut high_confidence_count = 0usize;

        for (column_index, header) in headers.iter().enumerate() {
            let normalized = header.trim().to_lowercase();

            // 每个目录字段打分，取最高；同分取先声明者
            let mut best: Option<(usize, f64)> = None;
            for (entry_idx, entry) in self.catalog.entries.iter().enumerate() {
                let score = Self::score(&normalized, &entry.synonyms);
                if score > 0.0 {
                    match best {
                        Some((_, best_score)) if best_score >= score => {}
                        _ => best = Some((entry_idx, score)),
                    }
                }
            }

            match best {
                Some((entry_idx, confidence)) => {
                    let entry = &self.catalog.entries[entry_idx];
                    if confidence >= HIGH_CONFIDENCE {
                        high_confidence_count += 1;
                    } else {
                        // (0, 0.8) 区间：提示操作员关注，不阻断自动应用
                        ambiguous_fields.push(AmbiguousField {
                            csv_column: header.clone(),
                            catalog_field: entry.key.clone(),
                            confidence,
                        });
                    }
                    mappings.push(FieldMapping {
                        csv_column: header.clone(),
                        column_index,
                        catalog_field: Some(entry.key.clone()),
                        field_type: Some(entry.field_type),
                        is_required: entry.required,
                        confirmed: false,
                        confidence,
                    });
                }
                None => {
                    unmapped_columns.push(header.clone());
                    mappings.push(FieldMapping::skip(header.clone(), column_index));
                }
            }
        }

        let confidence = if headers.is_empty() {
            0.0
        } else {
            high_confidence_count as f64 / headers.len() as f64
        };

        tracing::debug!(
            columns = headers.len(),
            unmapped = unmapped_columns.len(),
            ambiguous = ambiguous_fields.len(),
            confidence,
            "字段映射自动检测完成"
        );

        MappingDetection {
            mappings,
            unmapped_columns,
            ambiguous_fields,
            confidence,
        }
    }

    /// 自动应用：以检测结果整体覆盖当前映射（显式动作，区别于 detect）
    pub fn auto_apply(&self, headers: &[String]) -> Vec<FieldMapping> {
        self.detect(headers).mappings
    }

    /// 刷新：重新检测但保留操作员已确认的映射
    pub fn refresh(
        &self,
        headers: &[String],
        current: &[FieldMapping],
    ) -> Vec<FieldMapping> {
        let confirmed: HashMap<usize, &FieldMapping> = current
            .iter()
            .filter(|m| m.confirmed)
            .map(|m| (m.column_index, m))
            .collect();

        self.detect(headers)
            .mappings
            .into_iter()
            .map(|m| match confirmed.get(&m.column_index) {
                Some(kept) => (*kept).clone(),
                None => m,
            })
            .collect()
    }

    /// 手工设定单列映射（目标字段须存在于目录；None = 跳过）
    pub fn set_target(
        &self,
        mappings: &mut [FieldMapping],
        column_index: usize,
        catalog_field: Option<String>,
    ) -> Result<(), ImportError> {
        let mapping = mappings
            .iter_mut()
            .find(|m| m.column_index == column_index)
            .ok_or_else(|| ImportError::InternalError(format!("列下标不存在: {}", column_index)))?;

        match catalog_field {
            Some(key) => {
                let entry = self
                    .catalog
                    .get(&key)
                    .ok_or_else(|| ImportError::UnknownCatalogField(key.clone()))?;
                mapping.catalog_field = Some(entry.key.clone());
                mapping.field_type = Some(entry.field_type);
                mapping.is_required = entry.required;
            }
            None => {
                mapping.catalog_field = None;
                mapping.field_type = None;
                mapping.is_required = false;
            }
        }
        mapping.confirmed = true;
        mapping.confidence = 1.0;
        Ok(())
    }

    /// 完成契约检查（进入校验阶段的门禁）
    ///
    /// # 规则
    /// 1. 同一目标字段被多列占用 → DuplicateFieldTarget（硬阻断）
    /// 2. required 字段未被映射 → MissingRequiredField
    pub fn check_complete(&self, mappings: &[FieldMapping]) -> Result<(), ImportError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for m in mappings {
            if let Some(key) = m.catalog_field.as_deref() {
                *seen.entry(key).or_insert(0) += 1;
            }
        }

        // 重复目标先于缺失必填报告（二者是不同的错误）
        for m in mappings {
            if let Some(key) = m.catalog_field.as_deref() {
                if seen.get(key).copied().unwrap_or(0) > 1 {
                    return Err(ImportError::DuplicateFieldTarget(key.to_string()));
                }
            }
        }

        for required in self.catalog.required_keys() {
            if !seen.contains_key(required) {
                return Err(ImportError::MissingRequiredField(required.to_string()));
            }
        }

        Ok(())
    }

    /// 单列打分
    ///
    /// 精确命中同义词 = 1.0；表头为同义词子串或反之 = 0.8；
    /// 与多词同义词仅分词重叠 = 0.6（落入低置信区间，提示关注）
    fn score(normalized_header: &str, synonyms: &[String]) -> f64 {
        if normalized_header.is_empty() {
            return 0.0;
        }
        let header_tokens: Vec<&str> = normalized_header
            .split([' ', '_', '-'])
            .filter(|t| !t.is_empty())
            .collect();

        let mut best = 0.0f64;
        for syn in synonyms {
            if normalized_header == syn.as_str() {
                return 1.0;
            }
            if normalized_header.contains(syn.as_str()) || syn.contains(normalized_header) {
                best = best.max(0.8);
                continue;
            }
            let overlap = syn
                .split([' ', '_', '-'])
                .filter(|t| !t.is_empty())
                .any(|t| header_tokens.contains(&t));
            if overlap {
                best = best.max(0.6);
            }
        }
        best
    }
}
