//! # 位选择模块
//!
//! [`BitSelection`] 描述每个颜色通道中哪些位承载载荷，以及这些位的写入顺序。
//! 所有位索引在构造时即完成校验，之后的编解码流程无需再次检查。

use crate::constants::BITS_PER_CHANNEL;
use crate::error::StegoError;
use std::collections::HashSet;
use std::fmt;

/// RGB 颜色通道。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// 像素内的通道访问顺序。
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// 通道在交错 RGB 三元组中的偏移量。
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// 单个通道中被选中的位索引，保持调用方给出的顺序。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelBits(Vec<u8>);

impl ChannelBits {
    /// 校验并构造通道位列表。
    ///
    /// # Errors
    ///
    /// 任一索引不在 `0..=7` 内或在列表中重复时返回 [`StegoError::InvalidBitIndex`]。
    pub fn new(channel: Channel, indices: &[i64]) -> Result<Self, StegoError> {
        let mut seen = HashSet::with_capacity(indices.len());
        let bits = indices
            .iter()
            .map(|&index| {
                let bit = u8::try_from(index)
                    .ok()
                    .filter(|&bit| bit < BITS_PER_CHANNEL)
                    .ok_or(StegoError::InvalidBitIndex {
                        channel,
                        index,
                        reason: "bit positions must be between 0 and 7",
                    })?;
                if !seen.insert(bit) {
                    return Err(StegoError::InvalidBitIndex {
                        channel,
                        index,
                        reason: "bit positions must be unique within a channel",
                    });
                }
                Ok(bit)
            })
            .collect::<Result<Vec<u8>, StegoError>>()?;

        Ok(Self(bits))
    }

    /// 解析位列表的文本形式。
    ///
    /// 接受 JSON 整数数组 (`"[0, 1, 2]"`) 或不带括号的逗号列表 (`"0,1,2"`)，
    /// 空字符串视为空列表。
    pub fn parse(channel: Channel, text: &str) -> Result<Self, StegoError> {
        let trimmed = text.trim();
        let json = if trimmed.starts_with('[') {
            trimmed.to_owned()
        } else {
            format!("[{trimmed}]")
        };

        let indices: Vec<i64> =
            serde_json::from_str(&json).map_err(|_| StegoError::MalformedSelection {
                channel,
                text: text.to_owned(),
            })?;

        Self::new(channel, &indices)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 三个通道的位选择，编码与解码必须使用完全相同的值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSelection {
    red: ChannelBits,
    green: ChannelBits,
    blue: ChannelBits,
}

impl BitSelection {
    /// 组合三个通道的位列表。
    ///
    /// # Errors
    ///
    /// 三个列表全部为空时返回 [`StegoError::EmptySelection`]。
    pub fn new(red: ChannelBits, green: ChannelBits, blue: ChannelBits) -> Result<Self, StegoError> {
        if red.is_empty() && green.is_empty() && blue.is_empty() {
            return Err(StegoError::EmptySelection);
        }
        Ok(Self { red, green, blue })
    }

    /// 从原始整数列表构造，逐通道校验。
    pub fn from_indices(red: &[i64], green: &[i64], blue: &[i64]) -> Result<Self, StegoError> {
        Self::new(
            ChannelBits::new(Channel::Red, red)?,
            ChannelBits::new(Channel::Green, green)?,
            ChannelBits::new(Channel::Blue, blue)?,
        )
    }

    pub fn bits(&self, channel: Channel) -> &[u8] {
        match channel {
            Channel::Red => self.red.as_slice(),
            Channel::Green => self.green.as_slice(),
            Channel::Blue => self.blue.as_slice(),
        }
    }

    /// 每个像素承载的载荷位数。
    pub fn bits_per_pixel(&self) -> usize {
        self.red.len() + self.green.len() + self.blue.len()
    }

    /// 给定像素数量时可寻址的总位数。
    pub fn capacity(&self, pixel_count: usize) -> usize {
        pixel_count.saturating_mul(self.bits_per_pixel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_caller_order() {
        let bits = ChannelBits::new(Channel::Red, &[7, 0, 3]).unwrap();
        assert_eq!(bits.as_slice(), &[7, 0, 3]);
    }

    #[test]
    fn rejects_out_of_range_index() {
        for bad in [-1, 8, 255] {
            let err = ChannelBits::new(Channel::Green, &[0, bad]).unwrap_err();
            assert!(matches!(
                err,
                StegoError::InvalidBitIndex { channel: Channel::Green, index, .. } if index == bad
            ));
        }
    }

    #[test]
    fn rejects_duplicate_index() {
        let err = ChannelBits::new(Channel::Blue, &[1, 2, 1]).unwrap_err();
        assert!(matches!(err, StegoError::InvalidBitIndex { index: 1, .. }));
    }

    #[test]
    fn same_index_allowed_across_channels() {
        let selection = BitSelection::from_indices(&[0], &[0], &[0]).unwrap();
        assert_eq!(selection.bits_per_pixel(), 3);
    }

    #[test]
    fn rejects_empty_selection() {
        let err = BitSelection::from_indices(&[], &[], &[]).unwrap_err();
        assert!(matches!(err, StegoError::EmptySelection));
    }

    #[test]
    fn parses_wire_forms() {
        assert_eq!(
            ChannelBits::parse(Channel::Red, "[0, 2, 1]").unwrap().as_slice(),
            &[0, 2, 1]
        );
        assert_eq!(ChannelBits::parse(Channel::Red, "3,4").unwrap().as_slice(), &[3, 4]);
        assert!(ChannelBits::parse(Channel::Red, "").unwrap().is_empty());
        assert!(ChannelBits::parse(Channel::Red, "[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_text() {
        let err = ChannelBits::parse(Channel::Blue, "[0, one]").unwrap_err();
        assert!(matches!(err, StegoError::MalformedSelection { channel: Channel::Blue, .. }));

        let err = ChannelBits::parse(Channel::Blue, "[9]").unwrap_err();
        assert!(matches!(err, StegoError::InvalidBitIndex { index: 9, .. }));
    }

    #[test]
    fn capacity_scales_with_pixels() {
        let selection = BitSelection::from_indices(&[0, 1], &[], &[5]).unwrap();
        assert_eq!(selection.capacity(10), 30);
        assert_eq!(selection.capacity(0), 0);
    }
}
