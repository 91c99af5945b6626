use crate::resource::{Resource, ResourceKind};
use crate::utils::WolfError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 地图数据目录
pub const MAP_DATA_DIR: &str = "MapData";
/// 基础数据目录
pub const BASIC_DATA_DIR: &str = "BasicData";
/// 地图文件扩展名
pub const MAP_EXTENSION: &str = "mps";
/// 数据库工程文件扩展名
pub const DB_EXTENSION: &str = "project";
/// 公共事件文件名
pub const COMMON_EVENT_FILE: &str = "CommonEvent.dat";
/// 游戏描述文件名
pub const GAME_DAT_FILE: &str = "Game.dat";

/// 工程模型
///
/// 持有一个 Wolf RPG Data 目录下的全部可翻译资源。
/// 构造时完成校验：目录存在、至少一张地图、至少一个数据库、
/// CommonEvent.dat 存在、（未跳过时）Game.dat 存在。
/// 校验只在构造时发生，之后 `valid()` 恒定不变。
#[derive(Debug)]
pub struct Project {
    data_path: PathBuf,
    skip_game_dat: bool,
    invalid_reason: Option<String>,

    maps: Vec<Resource>,
    databases: Vec<Resource>,
    common_events: Option<Resource>,
    game_dat: Option<Resource>,
}

impl Project {
    /// 加载工程
    ///
    /// 任一校验或加载失败都不会 panic，而是把工程标记为无效
    /// 并记录第一条失败原因。
    pub fn load(data_path: PathBuf, skip_game_dat: bool) -> Self {
        let mut project = Project {
            data_path,
            skip_game_dat,
            invalid_reason: None,
            maps: Vec::new(),
            databases: Vec::new(),
            common_events: None,
            game_dat: None,
        };

        if let Err(e) = project.load_resources() {
            project.invalid_reason = Some(e.to_string());
            project.maps.clear();
            project.databases.clear();
            project.common_events = None;
            project.game_dat = None;
        }

        project
    }

    fn load_resources(&mut self) -> Result<(), WolfError> {
        if !self.data_path.is_dir() {
            return Err(WolfError::InvalidProject(format!(
                "data path is not a directory: {:?}",
                self.data_path
            )));
        }

        self.maps = self.load_by_extension(MAP_DATA_DIR, MAP_EXTENSION, ResourceKind::Map)?;
        if self.maps.is_empty() {
            return Err(WolfError::InvalidProject(format!(
                "no map files (*.{}) found under {}",
                MAP_EXTENSION, MAP_DATA_DIR
            )));
        }

        self.databases =
            self.load_by_extension(BASIC_DATA_DIR, DB_EXTENSION, ResourceKind::Database)?;
        if self.databases.is_empty() {
            return Err(WolfError::InvalidProject(format!(
                "no database files (*.{}) found under {}",
                DB_EXTENSION, BASIC_DATA_DIR
            )));
        }

        let common_path = self.data_path.join(BASIC_DATA_DIR).join(COMMON_EVENT_FILE);
        if !common_path.is_file() {
            return Err(WolfError::InvalidProject(format!(
                "{} not found under {}",
                COMMON_EVENT_FILE, BASIC_DATA_DIR
            )));
        }
        self.common_events = Some(Resource::load(
            ResourceKind::CommonEvents,
            &self.data_path,
            common_path,
        )?);

        if !self.skip_game_dat {
            let game_dat_path = self.data_path.join(BASIC_DATA_DIR).join(GAME_DAT_FILE);
            if !game_dat_path.is_file() {
                return Err(WolfError::InvalidProject(format!(
                    "{} not found under {}",
                    GAME_DAT_FILE, BASIC_DATA_DIR
                )));
            }
            self.game_dat = Some(Resource::load(
                ResourceKind::GameDat,
                &self.data_path,
                game_dat_path,
            )?);
        }

        Ok(())
    }

    /// 按扩展名收集一个子目录下的资源，按标识字典序排序
    ///
    /// 排序用标识而不是文件系统枚举顺序，保证提取输出确定。
    fn load_by_extension(
        &self,
        subdir: &str,
        extension: &str,
        kind: ResourceKind,
    ) -> Result<Vec<Resource>, WolfError> {
        let dir = self.data_path.join(subdir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.eq_ignore_ascii_case(extension))
                        .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut resources = Vec::new();
        for path in paths {
            resources.push(Resource::load(kind, &self.data_path, path)?);
        }
        resources.sort_by(|a, b| a.identity().cmp(b.identity()));

        Ok(resources)
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn skip_game_dat(&self) -> bool {
        self.skip_game_dat
    }

    /// 工程是否有效（构造时确定，幂等）
    pub fn valid(&self) -> bool {
        self.invalid_reason.is_none()
    }

    /// 第一条校验失败原因
    pub fn invalid_reason(&self) -> Option<&str> {
        self.invalid_reason.as_deref()
    }

    pub fn maps(&self) -> &[Resource] {
        &self.maps
    }

    pub fn maps_mut(&mut self) -> &mut [Resource] {
        &mut self.maps
    }

    pub fn databases(&self) -> &[Resource] {
        &self.databases
    }

    pub fn databases_mut(&mut self) -> &mut [Resource] {
        &mut self.databases
    }

    pub fn common_events(&self) -> Option<&Resource> {
        self.common_events.as_ref()
    }

    pub fn common_events_mut(&mut self) -> Option<&mut Resource> {
        self.common_events.as_mut()
    }

    pub fn game_dat(&self) -> Option<&Resource> {
        self.game_dat.as_ref()
    }

    pub fn game_dat_mut(&mut self) -> Option<&mut Resource> {
        self.game_dat.as_mut()
    }

    /// 翻译统计信息
    ///
    /// 无效工程返回空映射。
    pub fn stats(&self) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();

        if !self.valid() {
            return stats;
        }

        stats.insert(ResourceKind::Map.label().to_string(), self.maps.len());
        stats.insert(
            ResourceKind::Database.label().to_string(),
            self.databases.len(),
        );
        stats.insert(ResourceKind::CommonEvents.label().to_string(), 1);
        stats.insert(
            ResourceKind::GameDat.label().to_string(),
            if self.skip_game_dat { 0 } else { 1 },
        );

        stats
    }

    /// 将全部资源序列化到目的地（就地应用时目的地即 Data 目录）
    pub fn serialize(&self, destination: &Path) -> Result<(), WolfError> {
        for map in &self.maps {
            map.serialize(destination)?;
        }
        for db in &self.databases {
            db.serialize(destination)?;
        }
        if let Some(common) = &self.common_events {
            common.serialize(destination)?;
        }
        if let Some(game_dat) = &self.game_dat {
            game_dat.serialize(destination)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn wolf_string(text: &str) -> Vec<u8> {
        let bytes = text.as_bytes();
        let mut out = ((bytes.len() + 1) as u32).to_le_bytes().to_vec();
        out.extend_from_slice(bytes);
        out.push(0);
        out
    }

    /// 搭建一个最小的合法工程
    fn build_project_dir(dir: &Path) {
        let map_dir = dir.join(MAP_DATA_DIR);
        let basic_dir = dir.join(BASIC_DATA_DIR);
        std::fs::create_dir_all(&map_dir).unwrap();
        std::fs::create_dir_all(&basic_dir).unwrap();

        for (name, text) in [("Map002.mps", "街の広場"), ("Map001.mps", "はじまりの村")] {
            let mut data = vec![0xFF, 0xFE];
            data.extend(wolf_string(text));
            std::fs::write(map_dir.join(name), data).unwrap();
        }

        let mut db = vec![0xFF];
        db.extend(wolf_string("アイテム名"));
        std::fs::write(basic_dir.join("DataBase.project"), &db).unwrap();
        std::fs::write(basic_dir.join("CDataBase.project"), &db).unwrap();

        let mut common = vec![0xFF];
        common.extend(wolf_string("選択肢：はい"));
        std::fs::write(basic_dir.join(COMMON_EVENT_FILE), common).unwrap();

        let mut game_dat = vec![0xFF];
        game_dat.extend(wolf_string("ゲームタイトル"));
        std::fs::write(basic_dir.join(GAME_DAT_FILE), game_dat).unwrap();
    }

    #[test]
    fn test_valid_project() {
        let temp_dir = TempDir::new().unwrap();
        build_project_dir(temp_dir.path());

        let project = Project::load(temp_dir.path().to_path_buf(), false);
        assert!(project.valid());
        assert!(project.invalid_reason().is_none());
        assert_eq!(project.maps().len(), 2);
        assert_eq!(project.databases().len(), 2);
        assert!(project.common_events().is_some());
        assert!(project.game_dat().is_some());
    }

    #[test]
    fn test_lexicographic_ordering() {
        let temp_dir = TempDir::new().unwrap();
        build_project_dir(temp_dir.path());

        let project = Project::load(temp_dir.path().to_path_buf(), false);
        let map_ids: Vec<&str> = project.maps().iter().map(|m| m.identity()).collect();
        assert_eq!(map_ids, vec!["Map001", "Map002"]);

        let db_ids: Vec<&str> = project.databases().iter().map(|d| d.identity()).collect();
        assert_eq!(db_ids, vec!["CDataBase", "DataBase"]);
    }

    #[test]
    fn test_stats() {
        let temp_dir = TempDir::new().unwrap();
        build_project_dir(temp_dir.path());

        let project = Project::load(temp_dir.path().to_path_buf(), false);
        let stats = project.stats();
        assert_eq!(stats["Maps"], 2);
        assert_eq!(stats["Databases"], 2);
        assert_eq!(stats["CommonEvents"], 1);
        assert_eq!(stats["GameDat"], 1);
    }

    #[test]
    fn test_skip_game_dat() {
        let temp_dir = TempDir::new().unwrap();
        build_project_dir(temp_dir.path());
        // 跳过 Game.dat 时它不存在也不影响有效性
        std::fs::remove_file(temp_dir.path().join(BASIC_DATA_DIR).join(GAME_DAT_FILE)).unwrap();

        let project = Project::load(temp_dir.path().to_path_buf(), true);
        assert!(project.valid());
        assert!(project.game_dat().is_none());
        assert_eq!(project.stats()["GameDat"], 0);
    }

    #[test]
    fn test_invalid_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let project = Project::load(temp_dir.path().to_path_buf(), false);
        assert!(!project.valid());
        assert!(project.invalid_reason().unwrap().contains("map"));
        assert!(project.stats().is_empty());
        assert!(project.maps().is_empty());
    }

    #[test]
    fn test_invalid_missing_common_events() {
        let temp_dir = TempDir::new().unwrap();
        build_project_dir(temp_dir.path());
        std::fs::remove_file(
            temp_dir
                .path()
                .join(BASIC_DATA_DIR)
                .join(COMMON_EVENT_FILE),
        )
        .unwrap();

        let project = Project::load(temp_dir.path().to_path_buf(), false);
        assert!(!project.valid());
        assert!(project
            .invalid_reason()
            .unwrap()
            .contains(COMMON_EVENT_FILE));
    }
}
