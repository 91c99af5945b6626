use crate::layout;
use crate::patch::PatchDocument;
use crate::utils::WolfError;
use crate::wolf_file::WolfFile;
use std::path::{Path, PathBuf};

/// 资源种类
///
/// 封闭枚举：四种可翻译资源共享同一套操作（emit / ingest / serialize），
/// 载荷形状的差异全部收在 `WolfFile` 里，不引入继承层次。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// 地图（MapData/*.mps，每个工程零个或多个）
    Map,
    /// 数据库（BasicData/*.project，每个工程零个或多个）
    Database,
    /// 公共事件（BasicData/CommonEvent.dat，恰好一个）
    CommonEvents,
    /// 游戏描述文件（BasicData/Game.dat，零个或一个）
    GameDat,
}

impl ResourceKind {
    /// 固定的遍历顺序：提取和应用都按这个顺序走
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Map,
        ResourceKind::Database,
        ResourceKind::CommonEvents,
        ResourceKind::GameDat,
    ];

    /// 统计信息里使用的键名
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Map => "Maps",
            ResourceKind::Database => "Databases",
            ResourceKind::CommonEvents => "CommonEvents",
            ResourceKind::GameDat => "GameDat",
        }
    }
}

/// 摄取结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// 找到补丁文档并已应用
    Applied,
    /// 该资源没有补丁文档（不是错误）
    Absent,
}

/// 一个可翻译资源
#[derive(Debug)]
pub struct Resource {
    kind: ResourceKind,
    /// 相对于 Data 目录的路径，序列化时在目的地下重建
    rel_path: PathBuf,
    file: WolfFile,
}

impl Resource {
    /// 加载资源文件
    ///
    /// `data_path` 为工程 Data 目录，`path` 为资源文件的绝对路径。
    pub fn load(kind: ResourceKind, data_path: &Path, path: PathBuf) -> Result<Self, WolfError> {
        let rel_path = path
            .strip_prefix(data_path)
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| path.file_name().map(PathBuf::from).unwrap_or_default());

        let file = WolfFile::load(path)?;

        Ok(Resource {
            kind,
            rel_path,
            file,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// 稳定标识
    ///
    /// 地图和数据库用文件名主干；公共事件和 Game.dat 每个工程唯一，
    /// 用固定的文档名。
    pub fn identity(&self) -> &str {
        match self.kind {
            ResourceKind::Map | ResourceKind::Database => &self.file.identity,
            ResourceKind::CommonEvents => "CommonEvents",
            ResourceKind::GameDat => "GameDat",
        }
    }

    /// 本资源的翻译单元数量
    pub fn unit_count(&self) -> usize {
        self.file.spans().len()
    }

    /// 写出补丁文档到指定子目录
    pub fn emit(&self, out_dir: &Path) -> Result<(), WolfError> {
        std::fs::create_dir_all(out_dir)?;

        let doc = PatchDocument::from_file(&self.file);
        let path = out_dir.join(format!("{}.{}", self.identity(), layout::DOC_EXTENSION));
        doc.write(&path)
    }

    /// 从指定子目录读取并应用补丁文档
    ///
    /// 文档不存在返回 `Absent`；存在但损坏或与资源不一致则报错。
    pub fn ingest(&mut self, in_dir: &Path) -> Result<IngestOutcome, WolfError> {
        let path = in_dir.join(format!("{}.{}", self.identity(), layout::DOC_EXTENSION));
        if !path.exists() {
            return Ok(IngestOutcome::Absent);
        }

        let doc = PatchDocument::read(&path)?;
        doc.apply_to(&mut self.file)?;
        Ok(IngestOutcome::Applied)
    }

    /// 序列化回二进制形式
    ///
    /// 在 `dst_root` 下按原始相对路径重建文件。
    pub fn serialize(&self, dst_root: &Path) -> Result<(), WolfError> {
        self.file.serialize(&dst_root.join(&self.rel_path))
    }
}
