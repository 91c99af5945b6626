use crate::apply::Applier;
use crate::extract::Extractor;
use crate::project::Project;
use crate::utils::WolfError;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 进度回调
///
/// 参数为百分比（0-100，单调递增）和提示消息。
/// 回调在调用管线的线程上同步执行。
pub type ProgressCallback = Box<dyn Fn(i32, &str) + Send + Sync>;

/// 翻译管线门面
///
/// 单一公共入口：持有工程路径、输出路径和 skip-game-dat 开关。
/// 所有操作返回 bool，失败原因通过 `last_error()` 读取。
/// 同一实例上的操作不可重入；不同 Data 目录上的多个实例互相独立。
///
/// # 示例
/// ```rust,ignore
/// use wolftl::WolfTl;
///
/// let mut tl = WolfTl::new("Game/Data".into(), "Game/tl".into(), false);
/// if !tl.extract() {
///     eprintln!("extract failed: {}", tl.last_error());
/// }
/// ```
pub struct WolfTl {
    output_path: PathBuf,
    project: Project,
    progress: Option<ProgressCallback>,
    last_error: String,
}

impl WolfTl {
    /// 构造管线并校验工程
    ///
    /// # 参数
    /// * `data_path` - Wolf RPG 游戏 Data 目录
    /// * `output_path` - 补丁树根目录（提取输出 / 应用输入）
    /// * `skip_game_dat` - 为 true 时完全排除 Game.dat（不加载、不提取、不摄取）
    pub fn new(data_path: PathBuf, output_path: PathBuf, skip_game_dat: bool) -> Self {
        let project = Project::load(data_path, skip_game_dat);
        let last_error = project
            .invalid_reason()
            .map(|r| r.to_string())
            .unwrap_or_default();

        WolfTl {
            output_path,
            project,
            progress: None,
            last_error,
        }
    }

    /// 工程是否通过校验
    pub fn is_valid(&self) -> bool {
        self.project.valid()
    }

    /// 设置进度回调
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress = Some(callback);
    }

    /// 最近一次失败的原因
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// 提取补丁文档到输出目录
    ///
    /// 成功返回 true；失败返回 false 并记录 last_error，
    /// 已写出的文档不回滚。
    pub fn extract(&mut self) -> bool {
        let result = {
            let progress = &self.progress;
            let report = |pct: i32, msg: &str| {
                if let Some(cb) = progress {
                    cb(pct, msg);
                }
            };
            Extractor::new(&self.project, &self.output_path).run(&report)
        };

        self.finish(result)
    }

    /// 应用补丁树中的翻译并序列化
    ///
    /// * `in_place` 为 true：写回原 Data 目录，覆盖前创建备份
    /// * `in_place` 为 false：写到 `<output_path>/patched/data/`，不备份
    pub fn apply(&mut self, in_place: bool) -> bool {
        let result = {
            let progress = &self.progress;
            let report = |pct: i32, msg: &str| {
                if let Some(cb) = progress {
                    cb(pct, msg);
                }
            };
            Applier::new(&mut self.project, &self.output_path, in_place).run(&report)
        };

        self.finish(result)
    }

    /// 翻译统计信息（无效工程返回空映射）
    pub fn stats(&self) -> BTreeMap<String, usize> {
        self.project.stats()
    }

    fn finish(&mut self, result: Result<(), WolfError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.last_error = e.to_string();
                false
            }
        }
    }
}
