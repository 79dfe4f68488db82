// ==========================================
// 商品目录批量导入系统 - 字段目录配置
// ==========================================
// 职责: 目录字段的静态定义（key/类型/约束/同义词）
// 生命周期: 启动时加载，运行期不变
// ==========================================

use crate::domain::types::FieldType;
use serde::{Deserialize, Serialize};

// ==========================================
// FieldCatalogEntry - 单个目录字段
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCatalogEntry {
    /// 字段 key（映射目标，系统内唯一）
    pub key: String,
    /// 显示名（模板导出表头）
    pub label: String,
    pub field_type: FieldType,
    /// 必填字段（映射完成契约 + 存在性校验）
    pub required: bool,
    /// 文件内唯一（如 SKU；目录级唯一由写服务负责）
    pub unique_in_file: bool,
    /// 格式约束（正则，仅对文本字段生效）
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    /// 枚举允许值（规范写法，匹配时忽略大小写差异提示修正）
    pub allowed_values: Vec<String>,
    /// 低于该值给出业务警告（如可疑低价）
    pub warn_below: Option<f64>,
    /// 推荐填写（缺失给出 WARNING）
    pub recommended: bool,
    /// 分组（仅用于界面组织）
    pub group: String,
    /// 表头同义词（小写），自动映射依据
    pub synonyms: Vec<String>,
    /// 模板导出示例值（两行）
    pub samples: Vec<String>,
}

impl FieldCatalogEntry {
    fn new(key: &str, label: &str, field_type: FieldType, group: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            unique_in_file: false,
            pattern: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            allowed_values: Vec::new(),
            warn_below: None,
            recommended: false,
            group: group.to_string(),
            synonyms: Vec::new(),
            samples: Vec::new(),
        }
    }

    fn synonyms(mut self, syns: &[&str]) -> Self {
        self.synonyms = syns.iter().map(|s| s.to_lowercase()).collect();
        self
    }

    fn samples(mut self, samples: &[&str]) -> Self {
        self.samples = samples.iter().map(|s| s.to_string()).collect();
        self
    }
}

// ==========================================
// FieldCatalog - 字段目录
// ==========================================
// 声明顺序即平局决胜顺序（自动映射同分取先声明者）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub entries: Vec<FieldCatalogEntry>,
}

impl FieldCatalog {
    pub fn new(entries: Vec<FieldCatalogEntry>) -> Self {
        Self { entries }
    }

    /// 按 key 查找
    pub fn get(&self, key: &str) -> Option<&FieldCatalogEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// 必填字段 key 列表（声明顺序）
    pub fn required_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.required)
            .map(|e| e.key.as_str())
            .collect()
    }

    /// 默认商品目录
    ///
    /// PPM 标准商品字段集。同义词覆盖中英文常见表头写法；
    /// 示例值保证模板导出后重新导入零校验错误。
    pub fn default_product_catalog() -> Self {
        let mut sku = FieldCatalogEntry::new("sku", "SKU", FieldType::Text, "基础信息")
            .synonyms(&["sku", "sku编码", "商品编码", "货号", "article", "item no"])
            .samples(&["SKU-1001", "SKU-1002"]);
        sku.required = true;
        sku.unique_in_file = true;
        sku.min_length = Some(2);
        sku.max_length = Some(64);

        let mut name =
            FieldCatalogEntry::new("name", "商品名称", FieldType::Text, "基础信息")
                .synonyms(&["name", "商品名称", "品名", "名称", "product name", "title"])
                .samples(&["不锈钢保温杯 500ml", "陶瓷马克杯 350ml"]);
        name.required = true;
        name.min_length = Some(1);
        name.max_length = Some(200);

        let mut price = FieldCatalogEntry::new("price", "价格", FieldType::Number, "价格库存")
            .synonyms(&["price", "价格", "单价", "售价", "unit price"])
            .samples(&["59.90", "29.50"]);
        price.required = true;
        price.min_value = Some(0.0);
        price.warn_below = Some(0.1);

        let mut stock_qty =
            FieldCatalogEntry::new("stock_qty", "库存数量", FieldType::Number, "价格库存")
                .synonyms(&["stock", "库存数量", "库存", "数量", "qty", "quantity"])
                .samples(&["120", "45"]);
        stock_qty.min_value = Some(0.0);

        let mut category =
            FieldCatalogEntry::new("category", "商品分类", FieldType::Enum, "基础信息")
                .synonyms(&["category", "商品分类", "分类", "类目", "品类"])
                .samples(&["厨房用品", "家居日用"]);
        category.allowed_values = vec![
            "厨房用品".to_string(),
            "家居日用".to_string(),
            "数码配件".to_string(),
            "户外运动".to_string(),
            "其他".to_string(),
        ];

        let mut barcode =
            FieldCatalogEntry::new("barcode", "条形码", FieldType::Text, "基础信息")
                .synonyms(&["barcode", "条形码", "条码", "ean", "upc"])
                .samples(&["6901234567892", "6909876543217"]);
        barcode.pattern = Some(r"^\d{8,14}$".to_string());

        let mut description =
            FieldCatalogEntry::new("description", "商品描述", FieldType::Text, "详情")
                .synonyms(&["description", "商品描述", "描述", "详情", "desc"])
                .samples(&["双层真空保温，附杯刷", "釉下彩，可进洗碗机"]);
        description.recommended = true;
        description.max_length = Some(2000);

        let launch_date =
            FieldCatalogEntry::new("launch_date", "上架日期", FieldType::Date, "详情")
                .synonyms(&["launch date", "上架日期", "上架时间", "发布日期"])
                .samples(&["2026-03-01", "2026-04-15"]);

        let is_active =
            FieldCatalogEntry::new("is_active", "是否上架", FieldType::Boolean, "详情")
                .synonyms(&["active", "是否上架", "上架", "启用", "enabled"])
                .samples(&["1", "0"]);

        let mut weight_kg =
            FieldCatalogEntry::new("weight_kg", "重量(kg)", FieldType::Number, "物流")
                .synonyms(&["weight", "重量(kg)", "重量", "毛重"])
                .samples(&["0.35", "0.42"]);
        weight_kg.min_value = Some(0.0);
        weight_kg.max_value = Some(1000.0);

        Self::new(vec![
            sku,
            name,
            price,
            stock_qty,
            category,
            barcode,
            description,
            launch_date,
            is_active,
            weight_kg,
        ])
    }
}
