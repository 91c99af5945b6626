use crate::utils::WolfError;
use crate::wolf_file::WolfFile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 翻译单元
///
/// 补丁文档中的一条记录：
/// - 提取时：`target` 与 `source` 相同，供译者编辑
/// - 应用时：`source` 用于校验，`target` 为要写入的译文
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// 定位符（原文件偏移量，格式 0x%08X，对编辑者不透明，原样保留）
    pub locator: String,
    /// 游戏原文
    pub source: String,
    /// 译文
    pub target: String,
}

impl TranslationUnit {
    /// 从偏移量生成定位符
    pub fn make_locator(offset: u64) -> String {
        format!("0x{:08X}", offset)
    }

    /// 解析定位符回偏移量
    pub fn parse_locator(locator: &str) -> Option<u64> {
        let hex = locator.strip_prefix("0x").or_else(|| locator.strip_prefix("0X"))?;
        u64::from_str_radix(hex, 16).ok()
    }
}

/// 补丁文档
///
/// 一个资源对应一份文档，翻译单元按定位符升序排列，
/// 同一份文档内定位符不允许重复。
#[derive(Debug, Clone)]
pub struct PatchDocument {
    pub units: Vec<TranslationUnit>,
}

impl PatchDocument {
    /// 从已加载的资源文件生成初始文档（target 初始等于 source）
    pub fn from_file(file: &WolfFile) -> Self {
        let units = file
            .spans()
            .iter()
            .map(|span| TranslationUnit {
                locator: TranslationUnit::make_locator(span.offset),
                source: span.text.clone(),
                target: span.text.clone(),
            })
            .collect();

        PatchDocument { units }
    }

    /// 写入文档（pretty JSON，顶层为数组）
    pub fn write(&self, path: &Path) -> Result<(), WolfError> {
        let json = serde_json::to_string_pretty(&self.units)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// 读取文档
    ///
    /// JSON 解析失败或定位符重复都视为文档损坏。
    pub fn read(path: &Path) -> Result<Self, WolfError> {
        let content = std::fs::read_to_string(path)?;
        let units: Vec<TranslationUnit> = serde_json::from_str(&content)
            .map_err(|e| WolfError::IngestFailure(format!("malformed patch document {:?}: {}", path, e)))?;

        let mut seen = HashSet::new();
        for unit in &units {
            if !seen.insert(unit.locator.as_str()) {
                return Err(WolfError::IngestFailure(format!(
                    "duplicate locator '{}' in patch document {:?}",
                    unit.locator, path
                )));
            }
        }

        Ok(PatchDocument { units })
    }

    /// 将文档中的全部翻译单元应用到资源文件
    pub fn apply_to(&self, file: &mut WolfFile) -> Result<(), WolfError> {
        for unit in &self.units {
            let offset = TranslationUnit::parse_locator(&unit.locator).ok_or_else(|| {
                WolfError::IngestFailure(format!("invalid locator '{}'", unit.locator))
            })?;
            file.apply_unit(offset, &unit.source, &unit.target)?;
        }
        Ok(())
    }
}
