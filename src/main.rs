use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;
use wolftl::WolfTl;

#[derive(Parser)]
#[command(name = "wolftl")]
#[command(about = "提取/应用 Wolf RPG Editor 游戏数据的可翻译文本")]
#[command(version)]
struct Cli {
    /// Wolf RPG 游戏 Data 目录
    data_path: PathBuf,

    /// 补丁树根目录（提取输出 / 应用输入）
    #[arg(short, long)]
    output: PathBuf,

    /// 应用翻译模式（默认为提取模式）
    #[arg(long)]
    apply: bool,

    /// 就地应用：覆盖原始数据，覆盖前自动创建备份
    #[arg(long, requires = "apply")]
    in_place: bool,

    /// 跳过 Game.dat（不加载、不提取、不摄取）
    #[arg(long)]
    skip_game_dat: bool,

    /// 显示工程统计信息后退出
    #[arg(long)]
    stats: bool,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.data_path.is_dir() {
        bail!("Data 目录不存在: {:?}", cli.data_path);
    }

    let mut tl = WolfTl::new(
        cli.data_path.clone(),
        cli.output.clone(),
        cli.skip_game_dat,
    );

    if !tl.is_valid() {
        bail!("工程校验失败: {}", tl.last_error());
    }

    if cli.stats {
        print_stats(&tl);
        return Ok(());
    }

    if !cli.quiet {
        tl.set_progress_callback(Box::new(|pct, msg| {
            println!("[{:3}%] {}", pct, msg);
        }));
    }

    if cli.apply {
        handle_apply(&mut tl, &cli)
    } else {
        handle_extract(&mut tl, &cli)
    }
}

/// 处理提取模式
fn handle_extract(tl: &mut WolfTl, cli: &Cli) -> anyhow::Result<()> {
    if !tl.extract() {
        bail!("提取失败: {}", tl.last_error());
    }

    if !cli.quiet {
        println!("补丁文档已写入: {:?}", cli.output.join("dump"));
    }

    Ok(())
}

/// 处理应用模式
fn handle_apply(tl: &mut WolfTl, cli: &Cli) -> anyhow::Result<()> {
    if !tl.apply(cli.in_place) {
        bail!("应用失败: {}", tl.last_error());
    }

    if !cli.quiet {
        if cli.in_place {
            println!("翻译已就地写回: {:?}", cli.data_path);
        } else {
            println!("翻译已写入: {:?}", cli.output.join("patched/data"));
        }
    }

    Ok(())
}

/// 打印统计信息
fn print_stats(tl: &WolfTl) {
    println!("=== 工程统计 ===");
    for (kind, count) in tl.stats() {
        println!("{}: {}", kind, count);
    }
}
