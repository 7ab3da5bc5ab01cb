//! # 比特流工具模块
//!
//! 字节与比特之间的转换，以及载荷终止方式 ([`Termination`]) 的定义。

use crate::constants::{DEFAULT_MARKER, LENGTH_PREFIX_BITS};
use crate::error::StegoError;

/// 按字节顺序展开比特，每个字节内最高位在前。
pub fn bits_msb_first(bytes: &[u8]) -> impl Iterator<Item = bool> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
}

/// 把逐个到达的比特重新组装为字节 (最高位在前)。
#[derive(Debug, Default)]
pub struct ByteAccumulator {
    current: u8,
    filled: u8,
}

impl ByteAccumulator {
    /// 推入一个比特，凑满 8 位时返回完成的字节。
    pub fn push(&mut self, bit: bool) -> Option<u8> {
        self.current = (self.current << 1) | u8::from(bit);
        self.filled += 1;

        if self.filled == 8 {
            self.filled = 0;
            Some(std::mem::take(&mut self.current))
        } else {
            None
        }
    }
}

/// 非空的终止标记字节串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker(Vec<u8>);

impl Marker {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, StegoError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(StegoError::EmptyMarker);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self(DEFAULT_MARKER.as_bytes().to_vec())
    }
}

/// 载荷结束的判定方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// 载荷之后紧跟终止标记，解码时遇到标记即停止。
    ///
    /// 如果载荷本身在字节边界上包含标记，解码结果会被提前截断。
    Marker(Marker),
    /// 载荷之前写入 32 位大端长度前缀，不使用标记。
    LengthPrefixed,
}

impl Default for Termination {
    fn default() -> Self {
        Termination::Marker(Marker::default())
    }
}

impl Termination {
    /// 除载荷本身以外需要额外占用的位数。
    pub fn overhead_bits(&self) -> usize {
        match self {
            Termination::Marker(marker) => marker.len() * 8,
            Termination::LengthPrefixed => LENGTH_PREFIX_BITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_most_significant_bit_first() {
        let bits: Vec<bool> = bits_msb_first(&[0x05]).collect();
        assert_eq!(
            bits,
            vec![false, false, false, false, false, true, false, true]
        );
    }

    #[test]
    fn accumulator_reassembles_bytes() {
        let mut acc = ByteAccumulator::default();
        let bytes: Vec<u8> = bits_msb_first(b"E=")
            .filter_map(|bit| acc.push(bit))
            .collect();
        assert_eq!(bytes, b"E=");
    }

    #[test]
    fn accumulator_holds_partial_byte() {
        let mut acc = ByteAccumulator::default();
        assert!((0..7).all(|_| acc.push(true).is_none()));
        assert_eq!(acc.push(false), Some(0xFE));
    }

    #[test]
    fn empty_marker_is_rejected() {
        assert!(matches!(Marker::new(""), Err(StegoError::EmptyMarker)));
    }

    #[test]
    fn default_termination_uses_end_marker() {
        let termination = Termination::default();
        assert_eq!(termination, Termination::Marker(Marker::new("==END==").unwrap()));
        assert_eq!(termination.overhead_bits(), 56);
        assert_eq!(Termination::LengthPrefixed.overhead_bits(), 32);
    }
}
