//! 补丁树布局
//!
//! 纯函数：资源种类 + 标识 ↔ 补丁树内的相对路径。
//! 文档扩展名和内部结构属于资源处理层，这里只负责稳定的路径推导。

use crate::resource::ResourceKind;
use std::path::{Path, PathBuf};

/// 补丁树根子目录
pub const DUMP_DIR: &str = "dump";
/// 地图补丁目录
pub const MAP_OUTPUT: &str = "dump/mps";
/// 数据库补丁目录
pub const DB_OUTPUT: &str = "dump/db";
/// 公共事件补丁目录
pub const COM_OUTPUT: &str = "dump/common";
/// 非就地应用的序列化目的地
pub const PATCHED_DATA: &str = "patched/data";

/// 补丁文档扩展名
pub const DOC_EXTENSION: &str = "json";

/// 指定种类在补丁树中的子目录
pub fn subdir(patch_root: &Path, kind: ResourceKind) -> PathBuf {
    match kind {
        ResourceKind::Map => patch_root.join(MAP_OUTPUT),
        ResourceKind::Database => patch_root.join(DB_OUTPUT),
        ResourceKind::CommonEvents => patch_root.join(COM_OUTPUT),
        ResourceKind::GameDat => patch_root.join(DUMP_DIR),
    }
}

/// 单个资源的补丁文档路径
pub fn document_path(patch_root: &Path, kind: ResourceKind, identity: &str) -> PathBuf {
    subdir(patch_root, kind).join(format!("{}.{}", identity, DOC_EXTENSION))
}

/// 非就地应用时的序列化目的地
pub fn patched_data_dir(patch_root: &Path) -> PathBuf {
    patch_root.join(PATCHED_DATA)
}

/// 创建四个补丁子目录（已存在时不报错）
pub fn ensure_dump_dirs(patch_root: &Path) -> std::io::Result<()> {
    for kind in ResourceKind::ALL {
        std::fs::create_dir_all(subdir(patch_root, kind))?;
    }
    Ok(())
}
