//! 就地应用测试
//!
//! 备份行为依赖进程级全局开关，单独放一个测试二进制，
//! 避免与其他并发测试互相干扰。

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wolftl::{PatchDocument, WolfTl};

fn wolf_string(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = ((bytes.len() + 1) as u32).to_le_bytes().to_vec();
    out.extend_from_slice(bytes);
    out.push(0);
    out
}

fn build_project(root: &Path) -> PathBuf {
    let data_path = root.join("Data");
    let map_dir = data_path.join("MapData");
    let basic_dir = data_path.join("BasicData");
    std::fs::create_dir_all(&map_dir).unwrap();
    std::fs::create_dir_all(&basic_dir).unwrap();

    let mut map = vec![0xFF, 0xFE];
    map.extend(wolf_string("はじまりの村"));
    std::fs::write(map_dir.join("Map001.mps"), map).unwrap();

    let mut db = vec![0xFF, 0xFE];
    db.extend(wolf_string("やくそう"));
    std::fs::write(basic_dir.join("DataBase.project"), db).unwrap();

    let mut common = vec![0xFF, 0xFE];
    common.extend(wolf_string("はい"));
    std::fs::write(basic_dir.join("CommonEvent.dat"), common).unwrap();

    let mut game_dat = vec![0xFF, 0xFE];
    game_dat.extend(wolf_string("ようこそ"));
    std::fs::write(basic_dir.join("Game.dat"), game_dat).unwrap();

    data_path
}

/// 统计目录下的备份文件数量
fn count_backups(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == "bak")
                .unwrap_or(false)
        })
        .count()
}

// 两个场景共用全局备份开关，放在同一个测试里顺序执行
#[test]
fn test_backup_behavior_by_apply_mode() {
    in_place_apply_creates_backups();
    side_output_apply_skips_backups();
}

fn in_place_apply_creates_backups() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = build_project(temp_dir.path());
    let out = temp_dir.path().join("out");

    let mut tl = WolfTl::new(data_path.clone(), out.clone(), false);
    assert!(tl.extract(), "extract failed: {}", tl.last_error());

    // 编辑地图译文
    let doc_path = out.join("dump/mps/Map001.json");
    let mut doc = PatchDocument::read(&doc_path).unwrap();
    doc.units[0].target = "Village of Beginnings".to_string();
    doc.write(&doc_path).unwrap();

    let original = std::fs::read(data_path.join("MapData/Map001.mps")).unwrap();

    assert!(tl.apply(true), "apply failed: {}", tl.last_error());

    // 原地文件已更新
    let updated = std::fs::read(data_path.join("MapData/Map001.mps")).unwrap();
    assert_ne!(original, updated);

    // 就地应用会在覆盖前创建带时间戳的备份
    assert!(count_backups(&data_path.join("MapData")) >= 1);

    // 备份内容等于原始字节
    let backup = std::fs::read_dir(data_path.join("MapData"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().and_then(|e| e.to_str()) == Some("bak"))
        .unwrap();
    assert_eq!(std::fs::read(backup).unwrap(), original);
}

fn side_output_apply_skips_backups() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = build_project(temp_dir.path());
    let out = temp_dir.path().join("out");

    let mut tl = WolfTl::new(data_path.clone(), out.clone(), false);
    assert!(tl.extract());
    assert!(tl.apply(false), "apply failed: {}", tl.last_error());

    // 再次应用覆盖 patched/data 下的已有文件，依然不产生备份
    assert!(tl.apply(false), "apply failed: {}", tl.last_error());

    assert_eq!(count_backups(&out.join("patched/data/MapData")), 0);
    assert_eq!(count_backups(&data_path.join("MapData")), 0);
}
