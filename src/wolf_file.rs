use crate::datatypes::{read_u32, write_u32, RawString, TextEncoding};
use crate::utils::{backups_skipped, create_backup, is_translatable_string, WolfError};
use memmap2::Mmap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// 单个字符串允许的最大字节数（含结尾NUL）
const MAX_STRING_LEN: u32 = 2048;

/// 文件中的一个字符串区间
///
/// Wolf RPG 数据文件中的字符串统一为：u32 小端长度前缀（长度含结尾NUL）
/// + 内容字节 + 0x00。区间之外的字节在重建时原样保留。
#[derive(Debug, Clone)]
pub struct StringSpan {
    /// 长度前缀在原文件中的偏移量（定位符的来源）
    pub offset: u64,
    /// 原始声明长度（内容 + NUL）
    pub raw_len: u32,
    /// 解码后的原文
    pub text: String,
    /// 原文命中的编码
    pub encoding: TextEncoding,
    /// 原始字节（含长度前缀和NUL），未翻译时原样写回
    raw: Vec<u8>,
    /// 译文（仅当与原文不同时设置）
    translated: Option<String>,
}

impl StringSpan {
    /// 区间结束偏移（不含）
    fn end(&self) -> u64 {
        self.offset + 4 + self.raw_len as u64
    }
}

/// Wolf RPG 数据文件
///
/// 以字节缓冲 + 字符串区间列表的形式持有一个资源文件。
/// 地图、数据库、公共事件和 Game.dat 共用同一套表示，
/// 区别只在于磁盘位置和补丁文档的命名。
#[derive(Debug)]
pub struct WolfFile {
    /// 原文件路径
    pub path: PathBuf,
    /// 稳定标识（文件名主干）
    pub identity: String,
    /// 完整文件内容
    data: Vec<u8>,
    /// 扫描到的字符串区间（按偏移量升序）
    spans: Vec<StringSpan>,
}

impl WolfFile {
    /// 加载并扫描文件
    pub fn load(path: PathBuf) -> Result<Self, WolfError> {
        let identity = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        // 内存映射读取，随后复制为独立缓冲（重建时需要可变视图）
        let file = std::fs::File::open(&path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let data = mmap.to_vec();

        let spans = Self::scan(&data);

        Ok(WolfFile {
            path,
            identity,
            data,
            spans,
        })
    }

    /// 扫描字节缓冲中的字符串区间
    ///
    /// 从左到右确定性扫描：命中一个区间后跳到区间末尾继续，
    /// 未命中则前进一个字节。同一文件多次扫描结果完全一致，
    /// 这保证了补丁文档定位符在重复提取之间稳定。
    fn scan(data: &[u8]) -> Vec<StringSpan> {
        let mut spans = Vec::new();
        let mut i = 0usize;

        while i + 4 < data.len() {
            match Self::try_span_at(data, i) {
                Some(span) => {
                    i = span.end() as usize;
                    spans.push(span);
                }
                None => i += 1,
            }
        }

        spans
    }

    /// 尝试在指定偏移处识别一个字符串区间
    fn try_span_at(data: &[u8], offset: usize) -> Option<StringSpan> {
        let mut cursor = Cursor::new(data);
        cursor.set_position(offset as u64);
        let len = read_u32(&mut cursor).ok()?;

        // 长度必须至少容纳 1 个内容字节 + NUL
        if len < 2 || len > MAX_STRING_LEN {
            return None;
        }

        let start = offset + 4;
        let end = start + len as usize;
        if end > data.len() {
            return None;
        }

        // 结尾必须是NUL，内容中不允许出现NUL
        if data[end - 1] != 0 {
            return None;
        }
        let payload = &data[start..end - 1];
        if payload.contains(&0) {
            return None;
        }

        let decoded = RawString::decode(payload)?;
        if !is_translatable_string(&decoded.content) {
            return None;
        }

        Some(StringSpan {
            offset: offset as u64,
            raw_len: len,
            text: decoded.content,
            encoding: decoded.encoding,
            raw: data[offset..end].to_vec(),
            translated: None,
        })
    }

    /// 遍历所有字符串区间
    pub fn spans(&self) -> &[StringSpan] {
        &self.spans
    }

    /// 应用一个翻译单元
    ///
    /// 校验定位符和原文之后记录译文。原文不匹配说明补丁
    /// 是基于旧版数据生成的，直接报错而不是静默套用。
    pub fn apply_unit(&mut self, offset: u64, source: &str, target: &str) -> Result<(), WolfError> {
        let identity = self.identity.clone();
        let span = self
            .spans
            .iter_mut()
            .find(|s| s.offset == offset)
            .ok_or_else(|| {
                WolfError::IngestFailure(format!(
                    "no string at locator 0x{:08X} in '{}'",
                    offset, identity
                ))
            })?;

        if span.text != source {
            return Err(WolfError::IngestFailure(format!(
                "source text mismatch at locator 0x{:08X} in '{}' (stale patch?)",
                offset, identity
            )));
        }

        if target != source {
            span.translated = Some(target.to_string());
        }

        Ok(())
    }

    /// 重建文件字节
    ///
    /// 区间之间的字节逐字复制；未翻译的区间写回原始字节，
    /// 已翻译的区间按原编码重编码后拼入。
    pub fn rebuild(&self) -> Result<Vec<u8>, WolfError> {
        let mut buffer = Vec::with_capacity(self.data.len());
        let mut cursor = 0usize;

        for span in &self.spans {
            buffer.extend_from_slice(&self.data[cursor..span.offset as usize]);

            match &span.translated {
                Some(target) => {
                    let encoded =
                        RawString::encode(target, span.encoding).ok_or_else(|| {
                            WolfError::SerializeFailure(format!(
                                "cannot encode translation as {} at locator 0x{:08X} in '{}'",
                                span.encoding.label(),
                                span.offset,
                                self.identity
                            ))
                        })?;
                    let len = encoded.len() as u32 + 1;
                    write_u32(&mut buffer, len)?;
                    buffer.extend_from_slice(&encoded);
                    buffer.push(0);
                }
                None => buffer.extend_from_slice(&span.raw),
            }

            cursor = span.end() as usize;
        }

        buffer.extend_from_slice(&self.data[cursor..]);
        Ok(buffer)
    }

    /// 序列化到指定路径
    ///
    /// 目标文件已存在且备份开关未关闭时，先创建带时间戳的备份。
    pub fn serialize(&self, dst_path: &Path) -> Result<(), WolfError> {
        if let Some(parent) = dst_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if dst_path.exists() && !backups_skipped() {
            create_backup(dst_path)?;
        }

        let data = self.rebuild()?;
        std::fs::write(dst_path, data)?;
        Ok(())
    }
}
