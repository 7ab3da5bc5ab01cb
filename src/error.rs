//! # 错误类型模块
//!
//! 编解码核心返回的所有错误都集中在 [`StegoError`] 中。
//! 命令处理层 (`handler`) 会在其上附加 `anyhow` 上下文信息。

use crate::selection::Channel;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    /// 载荷加终止标记所需的位数超过了图像在当前位选择下的容量。
    #[error("Not enough capacity: required {required} bits, available {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    /// 三个通道均未选择任何位。
    #[error("At least one channel must select a bit position")]
    EmptySelection,

    /// 扫描完整幅图像都没有遇到终止标记。
    #[error("No hidden message found: the termination marker never appeared")]
    MarkerNotFound,

    /// 位索引越界 (不在 0..=7 内) 或在同一通道内重复。
    #[error("Invalid bit index {index} in {channel} channel: {reason}")]
    InvalidBitIndex {
        channel: Channel,
        index: i64,
        reason: &'static str,
    },

    /// 位选择的文本形式无法解析。
    #[error("Malformed bit selection for {channel} channel: {text:?}")]
    MalformedSelection { channel: Channel, text: String },

    /// 终止标记为空字符串。
    #[error("The termination marker must not be empty")]
    EmptyMarker,

    /// 图像容量连 32 位长度前缀都放不下，无法读取载荷长度。
    #[error("Image too small to contain a length prefix: only {available} bits addressable")]
    MissingLengthPrefix { available: usize },

    /// 长度前缀声明的字节数超出了剩余容量。
    #[error("Length prefix claims {claimed} bytes but only {available} bytes fit in the image")]
    LengthOutOfRange { claimed: usize, available: usize },
}
