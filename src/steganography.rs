//! # 位平面隐写核心模块
//!
//! [`BitPlaneWriter`] 把载荷比特写入选定的位平面，[`BitPlaneReader`] 以相同的寻址顺序读回。
//! 两者都不持有状态，也不会修改调用方传入的图像。

use crate::addressing::Addresses;
use crate::bitstream::{ByteAccumulator, Marker, Termination, bits_msb_first};
use crate::constants::LENGTH_PREFIX_BITS;
use crate::error::StegoError;
use crate::selection::BitSelection;
use image::RgbImage;
use log::debug;

/// 图像在给定位选择下可寻址的总位数。
pub fn capacity_of(image: &RgbImage, selection: &BitSelection) -> usize {
    selection.capacity(pixel_count(image))
}

fn pixel_count(image: &RgbImage) -> usize {
    (image.width() as usize).saturating_mul(image.height() as usize)
}

/// 将载荷嵌入图像位平面的写入器。
#[derive(Debug, Clone, Copy)]
pub struct BitPlaneWriter<'a> {
    selection: &'a BitSelection,
    termination: &'a Termination,
}

impl<'a> BitPlaneWriter<'a> {
    pub fn new(selection: &'a BitSelection, termination: &'a Termination) -> Self {
        Self {
            selection,
            termination,
        }
    }

    /// 写入 `payload_len` 字节载荷所需的总位数 (含终止标记或长度前缀)。
    pub fn required_bits(&self, payload_len: usize) -> usize {
        payload_len
            .saturating_mul(8)
            .saturating_add(self.termination.overhead_bits())
    }

    /// 返回嵌入了载荷的新图像。
    ///
    /// 比特流之外的像素位保持原样，不做填充。
    ///
    /// # Errors
    ///
    /// 比特流超出容量时返回 [`StegoError::CapacityExceeded`]，此时不会产生任何写入。
    pub fn embed(&self, image: &RgbImage, payload: &[u8]) -> Result<RgbImage, StegoError> {
        let available = capacity_of(image, self.selection);
        let required = self.required_bits(payload.len());
        if required > available {
            return Err(StegoError::CapacityExceeded {
                required,
                available,
            });
        }

        let prefix = match self.termination {
            Termination::Marker(_) => Vec::new(),
            Termination::LengthPrefixed => u32::try_from(payload.len())
                .map_err(|_| StegoError::CapacityExceeded {
                    required,
                    available,
                })?
                .to_be_bytes()
                .to_vec(),
        };
        let suffix: &[u8] = match self.termination {
            Termination::Marker(marker) => marker.as_bytes(),
            Termination::LengthPrefixed => &[],
        };

        let bitstream = bits_msb_first(&prefix)
            .chain(bits_msb_first(payload))
            .chain(bits_msb_first(suffix));

        let mut output = image.clone();
        let raw: &mut [u8] = &mut output;
        for (address, bit) in Addresses::new(self.selection, pixel_count(image)).zip(bitstream) {
            let mask = address.mask();
            let byte = &mut raw[address.raw_offset()];
            *byte = (*byte & !mask) | if bit { mask } else { 0 };
        }

        debug!(
            "embedded {} payload bytes using {required} of {available} bits",
            payload.len()
        );
        Ok(output)
    }
}

/// 从图像位平面中恢复载荷的读取器。
#[derive(Debug, Clone, Copy)]
pub struct BitPlaneReader<'a> {
    selection: &'a BitSelection,
    termination: &'a Termination,
}

impl<'a> BitPlaneReader<'a> {
    pub fn new(selection: &'a BitSelection, termination: &'a Termination) -> Self {
        Self {
            selection,
            termination,
        }
    }

    /// 按寻址顺序读取比特并还原载荷。
    ///
    /// # Errors
    ///
    /// * 标记模式下扫描完整幅图像仍未遇到标记时返回 [`StegoError::MarkerNotFound`]。
    ///   位选择与编码时不一致通常就会得到这个结果。
    /// * 长度前缀模式下容量不足以容纳前缀时返回 [`StegoError::MissingLengthPrefix`]，
    ///   前缀声明的长度超出剩余容量时返回 [`StegoError::LengthOutOfRange`]。
    pub fn extract(&self, image: &RgbImage) -> Result<Vec<u8>, StegoError> {
        let raw = image.as_raw();
        let bits = Addresses::new(self.selection, pixel_count(image))
            .map(|address| raw[address.raw_offset()] & address.mask() != 0);

        let payload = match self.termination {
            Termination::Marker(marker) => read_until_marker(bits, marker)?,
            Termination::LengthPrefixed => read_length_prefixed(bits)?,
        };

        debug!("extracted {} payload bytes", payload.len());
        Ok(payload)
    }
}

fn read_until_marker(
    bits: impl Iterator<Item = bool>,
    marker: &Marker,
) -> Result<Vec<u8>, StegoError> {
    let mut acc = ByteAccumulator::default();
    let mut decoded = Vec::new();

    for bit in bits {
        let Some(byte) = acc.push(bit) else {
            continue;
        };
        decoded.push(byte);
        if decoded.ends_with(marker.as_bytes()) {
            decoded.truncate(decoded.len() - marker.len());
            return Ok(decoded);
        }
    }

    Err(StegoError::MarkerNotFound)
}

fn read_length_prefixed(bits: impl ExactSizeIterator<Item = bool>) -> Result<Vec<u8>, StegoError> {
    let available = bits.len();
    if available < LENGTH_PREFIX_BITS {
        return Err(StegoError::MissingLengthPrefix { available });
    }

    let mut acc = ByteAccumulator::default();
    let mut bytes = bits.filter_map(move |bit| acc.push(bit));

    let mut header = [0u8; 4];
    for slot in header.iter_mut() {
        *slot = bytes
            .next()
            .ok_or(StegoError::MissingLengthPrefix { available })?;
    }

    let claimed = u32::from_be_bytes(header) as usize;
    let remaining = (available - LENGTH_PREFIX_BITS) / 8;
    if claimed > remaining {
        return Err(StegoError::LengthOutOfRange {
            claimed,
            available: remaining,
        });
    }

    Ok(bytes.take(claimed).collect())
}

/// 使用给定参数把载荷隐藏进图像，返回新图像。
pub fn hide(
    image: &RgbImage,
    payload: &[u8],
    selection: &BitSelection,
    termination: &Termination,
) -> Result<RgbImage, StegoError> {
    BitPlaneWriter::new(selection, termination).embed(image, payload)
}

/// 使用与隐藏时相同的参数恢复载荷。
pub fn recover(
    image: &RgbImage,
    selection: &BitSelection,
    termination: &Termination,
) -> Result<Vec<u8>, StegoError> {
    BitPlaneReader::new(selection, termination).extract(image)
}
