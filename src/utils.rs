use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// 自定义错误类型
///
/// 管线的所有失败最终都落到这六种错误之一，
/// 门面层（`WolfTl`）再把它们折叠成 bool + last_error 字符串。
#[derive(Error, Debug)]
pub enum WolfError {
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Patch folder does not exist: {0}")]
    PatchFolderMissing(std::path::PathBuf),

    #[error("Failed to emit patch document: {0}")]
    EmitFailure(String),

    #[error("Failed to ingest patch document: {0}")]
    IngestFailure(String),

    #[error("Failed to serialize resource: {0}")]
    SerializeFailure(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 全局备份开关
///
/// 底层序列化在覆盖已有文件前默认创建备份；
/// 非就地应用（输出到 patched/data/）时由 Applier 在每次 apply 前关闭。
/// 进程级可变状态，多个管线并发使用时上层必须自行串行化。
static SKIP_BACKUP: AtomicBool = AtomicBool::new(false);

/// 设置是否跳过备份
pub fn set_skip_backup(skip: bool) {
    SKIP_BACKUP.store(skip, Ordering::SeqCst);
}

/// 查询当前备份开关状态
pub fn backups_skipped() -> bool {
    SKIP_BACKUP.load(Ordering::SeqCst)
}

/// 字符串验证函数
///
/// 扫描器用它过滤二进制噪声：控制字符、纯符号、
/// 以及内部资源路径（如 "MapChip.png"）都不是可翻译文本。
pub fn is_translatable_string(text: &str) -> bool {
    let text = text.trim();

    if text.is_empty() {
        return false;
    }

    // 检查字符有效性（允许换行等空白字符）
    if text.chars().any(|c| c.is_control() && !c.is_whitespace()) {
        return false;
    }

    // 检查是否为资源路径格式
    if is_asset_path(text) {
        return false;
    }

    true
}

/// 素材文件扩展名（内部资源引用，不是面向玩家的文本）
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "gif", "webp", "mp3", "ogg", "wav", "mid", "midi", "mps",
    "dat", "project", "wolf", "ttf", "fnt", "txt",
];

/// 检查是否为资源路径
///
/// 无空格的ASCII串，且包含路径分隔符或以已知素材扩展名结尾。
/// 单纯含点号不够——"Wait." 这种短句是正常的游戏文本。
fn is_asset_path(text: &str) -> bool {
    if !text.is_ascii() || text.contains(' ') {
        return false;
    }

    if text.contains('/') || text.contains('\\') {
        return true;
    }

    match text.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty() && ASSET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        }
        None => false,
    }
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<std::path::PathBuf, WolfError> {
    if !file_path.exists() {
        return Err(WolfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "original file does not exist",
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_path = file_path.with_extension(format!("{}.bak", timestamp));

    std::fs::copy(file_path, &backup_path).map_err(WolfError::IoError)?;

    Ok(backup_path)
}
