//! # 命令行接口模块
//!
//! `hide` 加密并隐藏文件，`recover` 提取并解密，`capacity` 只读取图像并报告可用容量。
//! 密码既可以用 `--password` 传入，也可以放在 `LSB_VAULT_PASSWORD` 环境变量里，
//! 避免出现在 shell 历史中。`-v` 对所有子命令生效。

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::constants::PASSWORD_ENV;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，先用 AES-256 加密任意文件，再把密文藏进图像的 RGB 像素中。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，先用 AES-256 加密任意文件，再把密文藏进图像的 RGB 像素中。结果图像总是保存为无损 PNG。"
)]
pub struct Cli {
    /// 输出更多日志，可重复使用 (-v, -vv, -vvv)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量查询)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 加密一个文件并将其隐藏到图像中。
    Hide(HideArgs),

    /// 从经过隐写的图像中提取并解密文件。
    Recover(RecoverArgs),

    /// 查看一张图像最多能隐藏多少数据。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用作载体的输入图像文件路径 (PNG, JPEG, BMP 等)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的秘密文件路径，任意格式。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 结果图像的输出路径，默认为载体所在目录下的 `stego_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 加密密码。
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: String,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 允许使用不满足强度要求的密码。
    #[arg(long)]
    pub allow_weak_password: bool,

    /// 不显示进度。
    #[arg(long)]
    pub no_progress: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复出的文件的保存路径，默认使用隐藏时记录的文件名，放在图像所在目录下。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 解密密码。
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: String,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 不显示进度。
    #[arg(long)]
    pub no_progress: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要查询的载体图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
