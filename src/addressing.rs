//! # 位平面寻址模块
//!
//! 枚举载荷比特流在图像中占用的 (像素, 通道, 位) 地址序列。
//! 写入端与读取端共享同一序列，因此只需交换位选择与终止标记即可互逆。

use crate::constants::CHANNELS_PER_PIXEL;
use crate::selection::{BitSelection, Channel};

/// 比特流中一个比特所在的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    /// 行优先顺序下的像素编号。
    pub pixel: usize,
    pub channel: Channel,
    /// 通道值中的位索引，0 为最低有效位。
    pub bit: u8,
}

impl Address {
    /// 该地址在交错 RGB 缓冲区中对应的字节下标。
    pub fn raw_offset(&self) -> usize {
        self.pixel * CHANNELS_PER_PIXEL + self.channel.index()
    }

    pub fn mask(&self) -> u8 {
        1 << self.bit
    }
}

/// 惰性的地址迭代器。
///
/// 顺序为：像素升序，像素内按 R、G、B，通道内按位选择数组的原始顺序。
/// 克隆即可从当前位置重新开始遍历。
#[derive(Debug, Clone)]
pub struct Addresses<'a> {
    selection: &'a BitSelection,
    pixel_count: usize,
    pixel: usize,
    channel: usize,
    slot: usize,
    remaining: usize,
}

impl<'a> Addresses<'a> {
    pub fn new(selection: &'a BitSelection, pixel_count: usize) -> Self {
        Self {
            selection,
            pixel_count,
            pixel: 0,
            channel: 0,
            slot: 0,
            remaining: selection.capacity(pixel_count),
        }
    }
}

impl Iterator for Addresses<'_> {
    type Item = Address;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pixel < self.pixel_count {
            let channel = Channel::ALL[self.channel];
            let bits = self.selection.bits(channel);

            if let Some(&bit) = bits.get(self.slot) {
                self.slot += 1;
                self.remaining -= 1;
                return Some(Address {
                    pixel: self.pixel,
                    channel,
                    bit,
                });
            }

            self.slot = 0;
            self.channel += 1;
            if self.channel == Channel::ALL.len() {
                self.channel = 0;
                self.pixel += 1;
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Addresses<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(selection: &BitSelection, pixels: usize) -> Vec<(usize, Channel, u8)> {
        Addresses::new(selection, pixels)
            .map(|a| (a.pixel, a.channel, a.bit))
            .collect()
    }

    #[test]
    fn visits_pixels_then_channels_then_selection_order() {
        let selection = BitSelection::from_indices(&[1, 0], &[], &[7]).unwrap();
        assert_eq!(
            collect(&selection, 2),
            vec![
                (0, Channel::Red, 1),
                (0, Channel::Red, 0),
                (0, Channel::Blue, 7),
                (1, Channel::Red, 1),
                (1, Channel::Red, 0),
                (1, Channel::Blue, 7),
            ]
        );
    }

    #[test]
    fn length_matches_capacity() {
        let selection = BitSelection::from_indices(&[0], &[2, 3], &[]).unwrap();
        let mut addresses = Addresses::new(&selection, 5);
        assert_eq!(addresses.len(), 15);
        addresses.next();
        assert_eq!(addresses.len(), 14);
        assert_eq!(addresses.count(), 14);
    }

    #[test]
    fn clone_restarts_from_same_position() {
        let selection = BitSelection::from_indices(&[0], &[0], &[0]).unwrap();
        let mut addresses = Addresses::new(&selection, 3);
        addresses.nth(3);
        let replay: Vec<_> = addresses.clone().collect();
        assert_eq!(replay, addresses.collect::<Vec<_>>());
    }

    #[test]
    fn empty_image_yields_nothing() {
        let selection = BitSelection::from_indices(&[0], &[], &[]).unwrap();
        assert_eq!(Addresses::new(&selection, 0).next(), None);
    }

    #[test]
    fn raw_offset_is_interleaved() {
        let address = Address {
            pixel: 4,
            channel: Channel::Blue,
            bit: 3,
        };
        assert_eq!(address.raw_offset(), 14);
        assert_eq!(address.mask(), 0b1000);
    }
}
