/// 默认的终止标记，隐写时追加在载荷之后。
pub const DEFAULT_MARKER: &str = "==END==";

/// 用于读取终止标记的环境变量名称。
pub const SECRET_KEY_ENV: &str = "BITPLANE_SECRET_KEY";

/// 每个像素包含的颜色通道数 (R, G, B)。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 单个通道值的位数，合法位索引为 `0..BITS_PER_CHANNEL`。
pub const BITS_PER_CHANNEL: u8 = 8;

/// 长度前缀模式下，载荷长度字段所占的位数 (`u32`，大端)。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 未指定输出路径时，隐写结果图像的文件名前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本文件的文件名前缀。
pub const RECOVERED_TEXT_PREFIX: &str = "recovered_";
