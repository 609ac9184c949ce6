//! # 载荷帧模块
//!
//! 帧格式：`32 位大端序长度 L || L 个字节的载荷`，全部按 MSB 优先展开为比特。
//! 帧中不含魔数或版本号，任何图像都能被“解析”出某个长度。

use crate::bitstream::{BitCursor, bytes_to_bits};
use crate::constants::{BITS_PER_BYTE, HEADER_BITS};
use crate::error::{Result, StegoError};

/// 一个待写入的帧的比特游标：先产出头部的 32 个比特，再产出载荷比特。
#[derive(Debug, Clone)]
pub struct FrameBits<'a> {
    header: u32,
    header_pos: usize,
    body: BitCursor<'a>,
}

impl FrameBits<'_> {
    /// 读取下一个比特，帧结束时返回 `None`。
    pub fn next_bit(&mut self) -> Option<u8> {
        if self.header_pos < HEADER_BITS {
            let shift = HEADER_BITS - 1 - self.header_pos;
            self.header_pos += 1;
            return Some(((self.header >> shift) & 1) as u8);
        }
        self.body.next_bit()
    }

    /// 帧中尚未产出的比特数。
    pub fn remaining(&self) -> usize {
        HEADER_BITS - self.header_pos + self.body.remaining()
    }

    /// 帧声明的载荷长度 (字节)。
    pub fn payload_len(&self) -> u32 {
        self.header
    }
}

impl Iterator for FrameBits<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.next_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for FrameBits<'_> {}

/// 为载荷构造帧。
///
/// # Errors
///
/// 载荷长度超过 `u32::MAX` 字节时返回 [`StegoError::PayloadTooLarge`]。
pub fn build_frame(payload: &[u8]) -> Result<FrameBits<'_>> {
    let header = u32::try_from(payload.len())
        .map_err(|_| StegoError::PayloadTooLarge { len: payload.len() })?;

    Ok(FrameBits {
        header,
        header_pos: 0,
        body: bytes_to_bits(payload),
    })
}

/// 把头部的 32 个比特解释为大端序无符号整数。
pub fn parse_header(bits: &[u8; HEADER_BITS]) -> u32 {
    bits.iter()
        .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit & 1))
}

/// 承载 `payload_len` 字节载荷的帧的总比特数。
pub fn frame_bits_len(payload_len: u64) -> u64 {
    payload_len
        .saturating_mul(BITS_PER_BYTE as u64)
        .saturating_add(HEADER_BITS as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_big_endian_msb_first() {
        let frame = build_frame(b"Hello").unwrap();
        let bits: Vec<u8> = frame.collect();

        assert_eq!(bits.len(), 32 + 40);
        let mut expected = vec![0u8; 29];
        expected.extend([1, 0, 1]);
        assert_eq!(&bits[..32], expected.as_slice());
        assert_eq!(&bits[32..40], &[0, 1, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn empty_payload_is_a_bare_zero_header() {
        let frame = build_frame(&[]).unwrap();
        assert_eq!(frame.payload_len(), 0);
        assert_eq!(frame.remaining(), 32);
        assert!(frame.into_iter().all(|bit| bit == 0));
    }

    #[test]
    fn parse_header_reads_what_build_frame_wrote() {
        let payload = vec![7u8; 0x0102];
        let mut frame = build_frame(&payload).unwrap();

        let mut header = [0u8; HEADER_BITS];
        for slot in header.iter_mut() {
            *slot = frame.next_bit().unwrap();
        }

        assert_eq!(parse_header(&header), 0x0102);
        assert_eq!(frame.remaining(), 0x0102 * 8);
    }

    #[test]
    fn parse_header_handles_all_ones() {
        assert_eq!(parse_header(&[1; HEADER_BITS]), u32::MAX);
    }

    #[test]
    fn frame_length_accounts_for_header() {
        assert_eq!(frame_bits_len(0), 32);
        assert_eq!(frame_bits_len(5), 72);
        assert_eq!(
            frame_bits_len(u64::from(u32::MAX)),
            32 + 8 * u64::from(u32::MAX)
        );
    }
}
