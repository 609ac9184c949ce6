//! # 容量计算模块
//!
//! 载体图像的每个像素提供 3 个可写比特 (R, G, B 各一个最低有效位)。
//! 所有计算使用 `u64`，极端尺寸下饱和到 `u64::MAX` 而不是溢出。

use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, HEADER_BITS};
use crate::error::{Result, StegoError};
use crate::frame::frame_bits_len;

/// 图像可用于隐写的比特总数：`width * height * 3`。
pub fn available_bits(width: u32, height: u32) -> u64 {
    let pixels = u64::from(width) * u64::from(height);
    pixels.saturating_mul(CHANNELS_PER_PIXEL as u64)
}

/// 图像在扣除长度头部后最多能容纳的载荷字节数，容量不足一个头部时为 0。
pub fn max_payload_bytes(width: u32, height: u32) -> u64 {
    let available = available_bits(width, height);
    available.saturating_sub(HEADER_BITS as u64) / BITS_PER_BYTE as u64
}

/// 检查 `payload_len` 字节的载荷能否放入 `width × height` 的图像。
///
/// # Errors
///
/// 所需比特数 `32 + 8 * payload_len` 大于可用比特数时返回
/// [`StegoError::CapacityExceeded`]，并携带两者的具体数值。
pub fn validate_fit(width: u32, height: u32, payload_len: u64) -> Result<()> {
    let required_bits = frame_bits_len(payload_len);
    let available_bits = available_bits(width, height);

    if required_bits > available_bits {
        return Err(StegoError::CapacityExceeded {
            required_bits,
            available_bits,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_by_ten_holds_thirty_three_bytes() {
        // (300 - 32) / 8 = 33.5，向下取整
        assert_eq!(available_bits(10, 10), 300);
        assert_eq!(max_payload_bytes(10, 10), 33);
    }

    #[test]
    fn tiny_images_have_zero_capacity() {
        assert_eq!(max_payload_bytes(0, 0), 0);
        assert_eq!(max_payload_bytes(1, 1), 0);
        assert_eq!(max_payload_bytes(3, 3), 0);
        // 11 个像素 = 33 比特，头部之后只剩 1 比特，不足一个字节
        assert_eq!(max_payload_bytes(11, 1), 0);
        assert_eq!(max_payload_bytes(4, 4), 2);
    }

    #[test]
    fn boundary_is_inclusive() {
        let max = max_payload_bytes(10, 10);
        assert_eq!(max, 33);
        assert!(validate_fit(10, 10, max).is_ok());

        match validate_fit(10, 10, max + 1) {
            Err(StegoError::CapacityExceeded {
                required_bits,
                available_bits,
            }) => {
                assert_eq!(required_bits, 304);
                assert_eq!(available_bits, 300);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn header_alone_needs_thirty_two_slots() {
        // 4×3 像素 = 36 比特，可以放下空载荷
        assert!(validate_fit(4, 3, 0).is_ok());
        // 10×1 像素 = 30 比特，连头部都放不下
        assert!(validate_fit(10, 1, 0).is_err());
    }

    #[test]
    fn huge_dimensions_do_not_overflow() {
        assert_eq!(available_bits(u32::MAX, u32::MAX), u64::MAX);
        assert_eq!(available_bits(u32::MAX, 1), u64::from(u32::MAX) * 3);
        assert!(validate_fit(u32::MAX, u32::MAX, u64::from(u32::MAX)).is_ok());
    }
}
