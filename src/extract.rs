use crate::layout;
use crate::project::Project;
use crate::resource::ResourceKind;
use crate::utils::WolfError;
use std::path::Path;

/// 提取器
///
/// 驱动工程模型，为每个资源在补丁树的既定位置写出一份补丁文档。
/// 遍历顺序固定：地图 → 数据库 → 公共事件 → Game.dat，
/// 种类内部按标识字典序。第一个处理失败即整体失败，
/// 已写出的文档保留在磁盘上，由调用方决定重试或丢弃。
pub struct Extractor<'a> {
    project: &'a Project,
    output_root: &'a Path,
}

impl<'a> Extractor<'a> {
    pub fn new(project: &'a Project, output_root: &'a Path) -> Self {
        Extractor {
            project,
            output_root,
        }
    }

    /// 执行提取，进度检查点固定为 0 / 25 / 50 / 75 / 100
    pub fn run(&self, progress: &dyn Fn(i32, &str)) -> Result<(), WolfError> {
        if !self.project.valid() {
            return Err(WolfError::InvalidProject(
                self.project
                    .invalid_reason()
                    .unwrap_or("project failed validation")
                    .to_string(),
            ));
        }

        layout::ensure_dump_dirs(self.output_root)?;

        progress(0, "Starting patch extraction...");

        self.extract_maps()?;
        progress(25, "Maps extracted");

        self.extract_databases()?;
        progress(50, "Databases extracted");

        self.extract_common_events()?;
        progress(75, "Common events extracted");

        self.extract_game_dat()?;
        progress(100, "Patch extraction completed");

        Ok(())
    }

    fn extract_maps(&self) -> Result<(), WolfError> {
        let out_dir = layout::subdir(self.output_root, ResourceKind::Map);
        for map in self.project.maps() {
            map.emit(&out_dir).map_err(|e| {
                WolfError::EmitFailure(format!("map '{}': {}", map.identity(), e))
            })?;
        }
        Ok(())
    }

    fn extract_databases(&self) -> Result<(), WolfError> {
        let out_dir = layout::subdir(self.output_root, ResourceKind::Database);
        for db in self.project.databases() {
            db.emit(&out_dir).map_err(|e| {
                WolfError::EmitFailure(format!("database '{}': {}", db.identity(), e))
            })?;
        }
        Ok(())
    }

    fn extract_common_events(&self) -> Result<(), WolfError> {
        let out_dir = layout::subdir(self.output_root, ResourceKind::CommonEvents);
        if let Some(common) = self.project.common_events() {
            common
                .emit(&out_dir)
                .map_err(|e| WolfError::EmitFailure(format!("common events: {}", e)))?;
        }
        Ok(())
    }

    fn extract_game_dat(&self) -> Result<(), WolfError> {
        // 跳过 Game.dat 时工程里根本没有该资源
        let out_dir = layout::subdir(self.output_root, ResourceKind::GameDat);
        if let Some(game_dat) = self.project.game_dat() {
            game_dat
                .emit(&out_dir)
                .map_err(|e| WolfError::EmitFailure(format!("game dat: {}", e)))?;
        }
        Ok(())
    }
}
