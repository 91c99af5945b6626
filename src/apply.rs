use crate::layout;
use crate::project::Project;
use crate::resource::ResourceKind;
use crate::utils::{set_skip_backup, WolfError};
use std::path::{Path, PathBuf};

/// 应用器
///
/// 把补丁树中存在的文档摄取进工程模型，然后整体序列化。
/// 两类缺失都是良性的：某个种类的子目录不存在（该种类没有补丁），
/// 或子目录存在但某个资源没有文档。处理层报告的摄取失败
/// （文档损坏、定位符不匹配）才是致命错误。
///
/// 设计上不做跨资源事务：失败时内存中可能已有部分资源被改写，
/// 但序列化不会发生，磁盘上的工程不受影响。需要全有或全无的
/// 调用方应使用非就地模式并自行交换目录。
pub struct Applier<'a> {
    project: &'a mut Project,
    patch_root: &'a Path,
    in_place: bool,
}

impl<'a> Applier<'a> {
    pub fn new(project: &'a mut Project, patch_root: &'a Path, in_place: bool) -> Self {
        Applier {
            project,
            patch_root,
            in_place,
        }
    }

    /// 执行应用，进度检查点固定为 0 / 25 / 50 / 75 / 90 / 100
    pub fn run(&mut self, progress: &dyn Fn(i32, &str)) -> Result<(), WolfError> {
        // 非就地应用写到独立目录，不备份；该全局开关每次 apply 前重设
        set_skip_backup(!self.in_place);

        if !self.project.valid() {
            return Err(WolfError::InvalidProject(
                self.project
                    .invalid_reason()
                    .unwrap_or("project failed validation")
                    .to_string(),
            ));
        }

        if !self.patch_root.is_dir() {
            return Err(WolfError::PatchFolderMissing(self.patch_root.to_path_buf()));
        }

        progress(0, "Starting translation application...");

        self.apply_maps()?;
        progress(25, "Map translations applied");

        self.apply_databases()?;
        progress(50, "Database translations applied");

        self.apply_common_events()?;
        progress(75, "Common event translations applied");

        self.apply_game_dat()?;
        progress(90, "Game dat translations applied");

        let destination = self.destination();
        self.project
            .serialize(&destination)
            .map_err(|e| WolfError::SerializeFailure(e.to_string()))?;
        progress(100, "Translation application completed");

        Ok(())
    }

    /// 序列化目的地：就地应用回 Data 目录，否则 <patch_root>/patched/data/
    fn destination(&self) -> PathBuf {
        if self.in_place {
            self.project.data_path().to_path_buf()
        } else {
            layout::patched_data_dir(self.patch_root)
        }
    }

    fn apply_maps(&mut self) -> Result<(), WolfError> {
        let in_dir = layout::subdir(self.patch_root, ResourceKind::Map);
        if !in_dir.is_dir() {
            // 没有地图补丁不是错误
            return Ok(());
        }
        for map in self.project.maps_mut() {
            let identity = map.identity().to_string();
            map.ingest(&in_dir).map_err(|e| {
                WolfError::IngestFailure(format!("map '{}': {}", identity, e))
            })?;
        }
        Ok(())
    }

    fn apply_databases(&mut self) -> Result<(), WolfError> {
        let in_dir = layout::subdir(self.patch_root, ResourceKind::Database);
        if !in_dir.is_dir() {
            return Ok(());
        }
        for db in self.project.databases_mut() {
            let identity = db.identity().to_string();
            db.ingest(&in_dir).map_err(|e| {
                WolfError::IngestFailure(format!("database '{}': {}", identity, e))
            })?;
        }
        Ok(())
    }

    fn apply_common_events(&mut self) -> Result<(), WolfError> {
        let in_dir = layout::subdir(self.patch_root, ResourceKind::CommonEvents);
        if !in_dir.is_dir() {
            return Ok(());
        }
        if let Some(common) = self.project.common_events_mut() {
            common
                .ingest(&in_dir)
                .map_err(|e| WolfError::IngestFailure(format!("common events: {}", e)))?;
        }
        Ok(())
    }

    fn apply_game_dat(&mut self) -> Result<(), WolfError> {
        let in_dir = layout::subdir(self.patch_root, ResourceKind::GameDat);
        if !in_dir.is_dir() {
            return Ok(());
        }
        if let Some(game_dat) = self.project.game_dat_mut() {
            game_dat
                .ingest(&in_dir)
                .map_err(|e| WolfError::IngestFailure(format!("game dat: {}", e)))?;
        }
        Ok(())
    }
}
