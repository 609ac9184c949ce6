//! # 比特流编解码模块
//!
//! 在字节缓冲区与按 MSB 优先排列的比特序列之间相互转换。
//! 比特以 `u8` 表示，取值只会是 0 或 1。

use crate::constants::BITS_PER_BYTE;
use crate::error::{Result, StegoError};

/// 字节缓冲区上的比特游标。
///
/// 每次调用 [`BitCursor::next_bit`] 产出一个比特，按字节顺序、字节内从最高位到最低位。
/// 数据耗尽后返回 `None`。游标只借用缓冲区，克隆一份即可从当前位置重新开始。
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// 读取下一个比特并前移游标。
    pub fn next_bit(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos / BITS_PER_BYTE)?;
        let shift = BITS_PER_BYTE - 1 - self.pos % BITS_PER_BYTE;
        self.pos += 1;
        Some((byte >> shift) & 1)
    }

    /// 尚未产出的比特数。
    pub fn remaining(&self) -> usize {
        self.data.len() * BITS_PER_BYTE - self.pos
    }
}

impl Iterator for BitCursor<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.next_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitCursor<'_> {}

/// 把字节缓冲区展开为比特序列，总长度为 `8 * buffer.len()`。
pub fn bytes_to_bits(buffer: &[u8]) -> BitCursor<'_> {
    BitCursor::new(buffer)
}

/// 把比特序列重新组装为字节。
///
/// 恰好消费 `length_bits` 个比特，多余的比特保持未读。
///
/// # Errors
///
/// * `length_bits` 不是 8 的倍数。
/// * 比特序列在读满 `length_bits` 之前就已结束。
pub fn bits_to_bytes<I>(bits: I, length_bits: usize) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = u8>,
{
    if length_bits % BITS_PER_BYTE != 0 {
        return Err(StegoError::MalformedFrame("bit count is not a multiple of 8"));
    }

    let mut bits = bits.into_iter();
    let mut out = Vec::with_capacity(length_bits / BITS_PER_BYTE);

    for _ in 0..length_bits / BITS_PER_BYTE {
        let mut byte = 0u8;
        for _ in 0..BITS_PER_BYTE {
            let bit = bits
                .next()
                .ok_or(StegoError::MalformedFrame("bit stream ended early"))?;
            byte = (byte << 1) | (bit & 1);
        }
        out.push(byte);
    }

    Ok(out)
}
