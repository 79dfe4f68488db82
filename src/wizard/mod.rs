// ==========================================
// 商品目录批量导入系统 - 导入向导编排
// ==========================================
// 职责: 上传 → 映射 → 校验 → 执行 四阶段状态机
// 门禁: 每一步推进前检查前置条件；上游数据变化使下游产物失效
// 并发: 单活动会话；执行期间禁止回退与重新上传
// ==========================================

use crate::config::{FieldCatalog, ImportLimits};
use crate::domain::dataset::Preview;
use crate::domain::execution::{ImportOptions, ImportResult};
use crate::domain::mapping::{FieldMapping, MappingDetection};
use crate::domain::types::WizardStage;
use crate::domain::validation::ValidationResult;
use crate::domain::Dataset;
use crate::importer::{AutoFixer, FieldMapper, ImportError, UniversalFileParser, Validator};
use std::path::Path;
use std::sync::Arc;

// ==========================================
// WizardError - 向导门禁与编排错误
// ==========================================
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("尚未上传数据文件")]
    NoDataset,

    #[error("尚未执行校验")]
    NotValidated,

    #[error("校验存在 {0} 个错误且未选择跳过错误行")]
    GateBlocked(usize),

    #[error("当前阶段 {stage} 不允许操作: {action}")]
    WrongStage {
        stage: &'static str,
        action: &'static str,
    },

    #[error("执行进行中，禁止该操作")]
    ExecutionInProgress,

    #[error(transparent)]
    Import(#[from] ImportError),
}

// ==========================================
// ImportWizard - 向导会话
// ==========================================
pub struct ImportWizard {
    catalog: Arc<FieldCatalog>,
    parser: UniversalFileParser,
    mapper: FieldMapper,
    validator: Validator,
    fixer: AutoFixer,
    stage: WizardStage,
    dataset: Option<Dataset>,
    detection: Option<MappingDetection>,
    mappings: Vec<FieldMapping>,
    validation: Option<ValidationResult>,
    /// 进入执行前锁定；执行期间不可修改
    pub options: ImportOptions,
    result: Option<ImportResult>,
    executing: bool,
}

impl ImportWizard {
    pub fn new(catalog: Arc<FieldCatalog>, limits: ImportLimits) -> Self {
        Self {
            parser: UniversalFileParser::new(limits),
            mapper: FieldMapper::new(Arc::clone(&catalog)),
            validator: Validator::new(Arc::clone(&catalog)),
            fixer: AutoFixer::new(Arc::clone(&catalog)),
            catalog,
            stage: WizardStage::Upload,
            dataset: None,
            detection: None,
            mappings: Vec::new(),
            validation: None,
            options: ImportOptions::default(),
            result: None,
            executing: false,
        }
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn detection(&self) -> Option<&MappingDetection> {
        self.detection.as_ref()
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    pub fn result(&self) -> Option<&ImportResult> {
        self.result.as_ref()
    }

    /// 上传确认用数据预览
    pub fn preview(&self, rows: usize) -> Option<Preview> {
        self.dataset.as_ref().map(|d| d.preview(rows))
    }

    // ==========================================
    // 阶段一: 上传
    // ==========================================

    /// 解析上传字节流并立即运行映射侦测
    ///
    /// 重新上传使映射、校验与结果全部失效
    pub fn upload_bytes(&mut self, file_name: &str, bytes: &[u8]) -> Result<Preview, WizardError> {
        if self.executing {
            return Err(WizardError::ExecutionInProgress);
        }
        let dataset = self.parser.parse_bytes(file_name, bytes)?;
        self.install_dataset(dataset)
    }

    /// 从文件路径上传
    pub fn upload_path(&mut self, path: &Path) -> Result<Preview, WizardError> {
        if self.executing {
            return Err(WizardError::ExecutionInProgress);
        }
        let dataset = self.parser.parse_path(path)?;
        self.install_dataset(dataset)
    }

    fn install_dataset(&mut self, dataset: Dataset) -> Result<Preview, WizardError> {
        let detection = self.mapper.detect(&dataset.headers);
        self.mappings = detection.mappings.clone();
        self.detection = Some(detection);
        self.validation = None;
        self.result = None;
        let preview = dataset.preview(self.parser.limits().preview_rows);
        tracing::info!(
            file = %dataset.source_name,
            rows = dataset.total_rows,
            columns = dataset.headers.len(),
            "数据文件已上传"
        );
        self.dataset = Some(dataset);
        self.stage = WizardStage::Upload;
        Ok(preview)
    }

    // ==========================================
    // 阶段二: 映射
    // ==========================================

    /// 手工指定某列的目标字段（None 表示跳过该列）
    ///
    /// 映射变化使既有校验结果失效
    pub fn set_mapping(
        &mut self,
        column_index: usize,
        catalog_field: Option<&str>,
    ) -> Result<(), WizardError> {
        if self.dataset.is_none() {
            return Err(WizardError::NoDataset);
        }
        self.mapper.set_target(
            &mut self.mappings,
            column_index,
            catalog_field.map(|s| s.to_string()),
        )?;
        self.validation = None;
        Ok(())
    }

    /// 重跑侦测，保留操作员已确认的映射
    pub fn refresh_mappings(&mut self) -> Result<(), WizardError> {
        let dataset = self.dataset.as_ref().ok_or(WizardError::NoDataset)?;
        self.mappings = self.mapper.refresh(&dataset.headers, &self.mappings);
        self.validation = None;
        Ok(())
    }

    // ==========================================
    // 阶段三: 校验
    // ==========================================

    /// 全量校验当前数据集
    ///
    /// 前置: 映射完整（必填字段全部有来源列、无重复指向）
    pub fn validate(&mut self) -> Result<&ValidationResult, WizardError> {
        let dataset = self.dataset.as_ref().ok_or(WizardError::NoDataset)?;
        self.mapper.check_complete(&self.mappings)?;
        let result = self.validator.validate(dataset, &self.mappings);
        Ok(self.validation.insert(result))
    }

    /// 应用全部可修正建议并重新校验，返回改写单元格数
    pub fn apply_auto_fixes(&mut self) -> Result<usize, WizardError> {
        let validation = self.validation.as_ref().ok_or(WizardError::NotValidated)?;
        let dataset = self.dataset.as_mut().ok_or(WizardError::NoDataset)?;
        let fixes = self
            .fixer
            .suggest(dataset, &self.mappings, &validation.issues);
        let applied = self.fixer.apply(dataset, &fixes);
        if applied > 0 {
            let rerun = self.validator.validate(dataset, &self.mappings);
            self.validation = Some(rerun);
        }
        Ok(applied)
    }

    // ==========================================
    // 阶段四: 执行交接
    // ==========================================

    /// 进入执行并交出执行引擎输入
    ///
    /// auto_fix_warnings 开启时先应用修正并重新校验；
    /// 返回后直至 complete_execution 前，向导处于执行锁定态
    pub fn begin_execution(&mut self) -> Result<(ValidationResult, ImportOptions), WizardError> {
        if self.stage != WizardStage::Execution {
            return Err(WizardError::WrongStage {
                stage: self.stage.as_str(),
                action: "开始执行",
            });
        }
        if self.executing {
            return Err(WizardError::ExecutionInProgress);
        }
        if self.options.auto_fix_warnings {
            self.apply_auto_fixes()?;
        }
        let validation = self.validation.as_ref().ok_or(WizardError::NotValidated)?;
        if !self.options.skip_error_rows && validation.summary.error_count > 0 {
            return Err(WizardError::GateBlocked(validation.summary.error_count));
        }
        self.executing = true;
        Ok((validation.clone(), self.options.clone()))
    }

    /// 执行结束，写回终态结果并解除锁定
    pub fn complete_execution(&mut self, result: ImportResult) {
        tracing::info!(import_id = %result.import_id, status = result.status.as_str(), "执行结果已回写");
        self.result = Some(result);
        self.executing = false;
    }

    // ==========================================
    // 阶段推进
    // ==========================================

    /// 当前阶段是否满足前进条件
    pub fn can_proceed(&self) -> bool {
        match self.stage {
            WizardStage::Upload => self.dataset.is_some(),
            WizardStage::Mapping => self.mapper.check_complete(&self.mappings).is_ok(),
            WizardStage::Validation => match &self.validation {
                Some(v) => v.summary.error_count == 0 || self.options.skip_error_rows,
                None => false,
            },
            WizardStage::Execution => false,
        }
    }

    /// 前进一个阶段
    pub fn advance(&mut self) -> Result<WizardStage, WizardError> {
        if self.executing {
            return Err(WizardError::ExecutionInProgress);
        }
        match self.stage {
            WizardStage::Upload => {
                if self.dataset.is_none() {
                    return Err(WizardError::NoDataset);
                }
            }
            WizardStage::Mapping => {
                self.mapper.check_complete(&self.mappings)?;
            }
            WizardStage::Validation => {
                let validation = self.validation.as_ref().ok_or(WizardError::NotValidated)?;
                if validation.summary.error_count > 0 && !self.options.skip_error_rows {
                    return Err(WizardError::GateBlocked(validation.summary.error_count));
                }
            }
            WizardStage::Execution => {
                return Err(WizardError::WrongStage {
                    stage: self.stage.as_str(),
                    action: "前进",
                });
            }
        }
        if let Some(next) = self.stage.next() {
            self.stage = next;
        }
        tracing::debug!(stage = self.stage.as_str(), "向导阶段推进");
        Ok(self.stage)
    }

    /// 回退一个阶段（执行期间禁止）
    pub fn back(&mut self) -> Result<WizardStage, WizardError> {
        if self.executing {
            return Err(WizardError::ExecutionInProgress);
        }
        if let Some(prev) = self.stage.prev() {
            self.stage = prev;
        }
        Ok(self.stage)
    }

    /// 重置会话，回到上传阶段
    pub fn reset(&mut self) -> Result<(), WizardError> {
        if self.executing {
            return Err(WizardError::ExecutionInProgress);
        }
        self.stage = WizardStage::Upload;
        self.dataset = None;
        self.detection = None;
        self.mappings = Vec::new();
        self.validation = None;
        self.result = None;
        self.options = ImportOptions::default();
        Ok(())
    }
}
