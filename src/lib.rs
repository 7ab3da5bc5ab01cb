//! # bitplane_hide 库
//!
//! 本库包含位平面隐写工具的核心逻辑：按位选择寻址、写入与读取载荷，
//! 以及命令行层的参数定义与命令处理。

// 声明库包含的所有模块。

pub mod addressing;
pub mod bitstream;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod selection;
pub mod steganography;

pub use bitstream::{Marker, Termination};
pub use error::StegoError;
pub use selection::{BitSelection, Channel, ChannelBits};
pub use steganography::{BitPlaneReader, BitPlaneWriter, capacity_of, hide, recover};
