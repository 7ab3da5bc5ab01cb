//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 位选择与终止标记在这里以文本形式接收，并在进入编解码核心前转换为强类型值。

use crate::bitstream::{Marker, Termination};
use crate::constants::{DEFAULT_MARKER, SECRET_KEY_ENV};
use crate::error::StegoError;
use crate::selection::{BitSelection, Channel, ChannelBits};
use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// 一款基于位平面隐写术的命令行工具，可在无损格式图像 (如 PNG, BMP) 的任意 RGB 位中隐藏或恢复数据。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于位平面隐写术的命令行工具，可在无损格式图像 (如 PNG, BMP) 的任意 RGB 位中隐藏或恢复数据。\n编码与解码必须使用相同的位选择和终止标记。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的数据。
    Recover(RecoverArgs),

    /// 显示图像在给定位选择下的可用容量。
    Capacity(CapacityArgs),
}

/// 三个通道的位选择，格式为 JSON 数组 (`[0,1]`) 或逗号列表 (`0,1`)。
///
/// 数组顺序即写入顺序，可以打乱以增加混淆。
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// 红色通道中承载数据的位索引 (0 为最低有效位)。
    #[arg(short = 'r', long, default_value = "[0]")]
    pub red_bits: String,

    /// 绿色通道中承载数据的位索引。
    #[arg(short = 'g', long, default_value = "[0]")]
    pub green_bits: String,

    /// 蓝色通道中承载数据的位索引。
    #[arg(short = 'b', long, default_value = "[0]")]
    pub blue_bits: String,
}

impl SelectionArgs {
    /// 解析并校验三个通道的位选择。
    pub fn to_selection(&self) -> Result<BitSelection, StegoError> {
        BitSelection::new(
            ChannelBits::parse(Channel::Red, &self.red_bits)?,
            ChannelBits::parse(Channel::Green, &self.green_bits)?,
            ChannelBits::parse(Channel::Blue, &self.blue_bits)?,
        )
    }
}

impl Default for SelectionArgs {
    fn default() -> Self {
        Self {
            red_bits: "[0]".to_owned(),
            green_bits: "[0]".to_owned(),
            blue_bits: "[0]".to_owned(),
        }
    }
}

/// 载荷结束方式。
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// 在载荷后追加终止标记。
    #[default]
    Marker,
    /// 在载荷前写入 32 位长度前缀。
    Length,
}

/// 终止方式相关的参数。
#[derive(Args, Debug, Clone)]
pub struct TerminationArgs {
    /// 终止标记字符串，解码时必须与编码时一致。
    #[arg(short = 'k', long, env = SECRET_KEY_ENV, default_value = DEFAULT_MARKER)]
    pub secret_key: String,

    /// 载荷结束方式：`marker` 使用终止标记，`length` 使用长度前缀。
    #[arg(short, long, value_enum, default_value_t = Mode::Marker)]
    pub mode: Mode,
}

impl TerminationArgs {
    pub fn to_termination(&self) -> Result<Termination, StegoError> {
        match self.mode {
            Mode::Marker => Ok(Termination::Marker(Marker::new(self.secret_key.as_bytes())?)),
            Mode::Length => Ok(Termination::LengthPrefixed),
        }
    }
}

impl Default for TerminationArgs {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_MARKER.to_owned(),
            mode: Mode::Marker,
        }
    }
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 保存结果图像的输出路径，默认为输入图像旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub termination: TerminationArgs,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 保存恢复内容的输出路径，默认为图像旁的 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub termination: TerminationArgs,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub termination: TerminationArgs,
}
