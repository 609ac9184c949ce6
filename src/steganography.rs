//! # LSB 隐写核心模块
//!
//! 按行优先顺序遍历像素 (自上而下、自左向右)，每个像素依次访问 R、G、B 三个通道，
//! 每个通道的最低有效位承载帧中的一个比特。写入和读取使用完全相同的遍历顺序。

use image::RgbImage;
use log::{debug, trace};

use crate::bitstream::bits_to_bytes;
use crate::capacity::{available_bits, validate_fit};
use crate::constants::{BITS_PER_BYTE, HEADER_BITS, PROGRESS_INTERVAL_BITS};
use crate::error::{Result, StegoError};
use crate::frame::{build_frame, frame_bits_len, parse_header};
use crate::progress::{ProgressSink, Tracker};

/// 把载荷写入图像各通道的最低有效位。
///
/// 图像按值传入，只有成功时才会交还给调用方；被取消时半写入的图像随之丢弃。
/// 帧写完后立即停止遍历，之后的像素与原图逐字节相同。
///
/// # Errors
///
/// * [`StegoError::PayloadTooLarge`]: 载荷长度超出 32 位头部的表示范围。
/// * [`StegoError::CapacityExceeded`]: 图像放不下整个帧，此时图像未被修改。
/// * [`StegoError::Cancelled`]: 进度接收器请求中止。
pub fn embed<P>(mut image: RgbImage, payload: &[u8], progress: &mut P) -> Result<RgbImage>
where
    P: ProgressSink + ?Sized,
{
    let (width, height) = image.dimensions();
    let mut frame = build_frame(payload)?;
    validate_fit(width, height, payload.len() as u64)?;

    let total = frame.remaining() as u64;
    debug!(
        "embedding {} payload bytes ({} bits) into {}x{} image with {} slots",
        payload.len(),
        total,
        width,
        height,
        available_bits(width, height)
    );

    let mut tracker = Tracker::new(progress, total);
    let mut written = 0u64;

    'raster: for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let Some(bit) = frame.next_bit() else {
                break 'raster;
            };
            *channel = (*channel & !1) | bit;
            written += 1;
        }
        tracker.update(written)?;
    }

    trace!("wrote {written} bits");
    tracker.finish()?;
    Ok(image)
}

/// 从图像各通道的最低有效位中提取载荷。
///
/// 先读出 32 位长度头部，确认图像确实容纳得下头部声明的长度后，
/// 再沿同一顺序读取恰好 `8 * L` 个比特。
///
/// # Errors
///
/// * [`StegoError::TruncatedStego`]: 图像连头部都放不下，或头部声明的长度超出图像容量。
/// * [`StegoError::Cancelled`]: 进度接收器请求中止。
pub fn extract<P>(image: &RgbImage, progress: &mut P) -> Result<Vec<u8>>
where
    P: ProgressSink + ?Sized,
{
    let (width, height) = image.dimensions();
    let mut slots = lsb_slots(image);

    let mut header = [0u8; HEADER_BITS];
    for bit in header.iter_mut() {
        *bit = slots.next().ok_or(StegoError::TruncatedStego {
            required_bits: HEADER_BITS as u64,
            available_bits: available_bits(width, height),
        })?;
    }

    let declared_len = u64::from(parse_header(&header));
    let fit = validate_fit(width, height, declared_len);
    fit.map_err(into_truncated)?;

    let total = frame_bits_len(declared_len);
    debug!("header declares {declared_len} payload bytes ({total} frame bits)");

    let mut tracker = Tracker::new(progress, total);
    tracker.update(HEADER_BITS as u64)?;

    let body_bits = declared_len as usize * BITS_PER_BYTE;
    let mut payload = Vec::with_capacity(declared_len as usize);
    let mut read = 0usize;

    while read < body_bits {
        let chunk = PROGRESS_INTERVAL_BITS.min(body_bits - read);
        payload.extend(bits_to_bytes(&mut slots, chunk)?);
        read += chunk;
        tracker.update((HEADER_BITS + read) as u64)?;
    }

    tracker.finish()?;
    Ok(payload)
}

/// 头部声明的长度放不下时，说明这不是有效的隐写图像。
fn into_truncated(err: StegoError) -> StegoError {
    match err {
        StegoError::CapacityExceeded {
            required_bits,
            available_bits,
        } => StegoError::TruncatedStego {
            required_bits,
            available_bits,
        },
        other => other,
    }
}

/// 按隐写遍历顺序逐个产出每个通道的最低有效位。
fn lsb_slots(image: &RgbImage) -> impl Iterator<Item = u8> + '_ {
    image
        .pixels()
        .flat_map(|pixel| pixel.0)
        .map(|channel| channel & 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::max_payload_bytes;
    use crate::progress::NoProgress;
    use image::Rgb;
    use rand::{Rng, RngCore};
    use std::ops::ControlFlow;

    fn random_image(width: u32, height: u32) -> RgbImage {
        let mut rng = rand::rng();
        RgbImage::from_fn(width, height, |_, _| {
            Rgb([rng.random(), rng.random(), rng.random()])
        })
    }

    fn hide(cover: RgbImage, payload: &[u8]) -> RgbImage {
        embed(cover, payload, &mut NoProgress).unwrap()
    }

    fn reveal(stego: &RgbImage) -> Vec<u8> {
        extract(stego, &mut NoProgress).unwrap()
    }

    fn random_payload(len: usize) -> Vec<u8> {
        let mut payload = vec![0u8; len];
        rand::rng().fill_bytes(&mut payload);
        payload
    }

    /// 按遍历顺序收集图像前 `n` 个通道的最低有效位。
    fn leading_lsbs(image: &RgbImage, n: usize) -> Vec<u8> {
        lsb_slots(image).take(n).collect()
    }

    #[test]
    fn hello_in_ten_by_ten() {
        let hello = [0x48, 0x65, 0x6C, 0x6C, 0x6F];
        let stego = hide(random_image(10, 10), &hello);

        let bits = leading_lsbs(&stego, 72);
        let header: String = bits[..32].iter().map(|b| char::from(b'0' + b)).collect();
        assert_eq!(header, "00000000000000000000000000000101");

        let body: String = bits[32..].iter().map(|b| char::from(b'0' + b)).collect();
        assert_eq!(body, "0100100001100101011011000110110001101111");

        assert_eq!(reveal(&stego), hello);
    }

    #[test]
    fn round_trips_random_payloads() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let width = rng.random_range(4..40);
            let height = rng.random_range(3..40);
            let max = max_payload_bytes(width, height) as usize;
            let payload = random_payload(rng.random_range(0..=max));

            let stego = hide(random_image(width, height), &payload);
            assert_eq!(reveal(&stego), payload);
        }
    }

    #[test]
    fn empty_payload_round_trips() {
        let stego = hide(random_image(4, 3), &[]);
        assert!(leading_lsbs(&stego, 32).iter().all(|&b| b == 0));
        assert!(reveal(&stego).is_empty());
    }

    #[test]
    fn exact_capacity_fits_and_one_more_byte_does_not() {
        // 7×5 = 105 比特：头部之后 73 比特，恰好 9 字节，最后 1 比特空闲
        let max = max_payload_bytes(7, 5) as usize;
        assert_eq!(max, 9);

        let payload = random_payload(max);
        let stego = hide(random_image(7, 5), &payload);
        assert_eq!(reveal(&stego), payload);

        let oversized = random_payload(max + 1);
        let result = embed(random_image(7, 5), &oversized, &mut NoProgress);
        assert!(matches!(
            result,
            Err(StegoError::CapacityExceeded {
                required_bits: 112,
                available_bits: 105
            })
        ));
    }

    #[test]
    fn ten_by_ten_takes_thirty_three_bytes_and_no_more() {
        let payload = random_payload(33);
        let stego = hide(random_image(10, 10), &payload);
        assert_eq!(reveal(&stego), payload);

        let oversized = random_payload(34);
        let result = embed(random_image(10, 10), &oversized, &mut NoProgress);
        assert!(matches!(
            result,
            Err(StegoError::CapacityExceeded {
                required_bits: 304,
                available_bits: 300
            })
        ));
    }

    #[test]
    fn payload_using_the_very_last_slot() {
        // 8×4 像素 = 96 比特 = 32 + 8 * 8，最后一个通道也被占用
        let payload = random_payload(8);
        let stego = hide(random_image(8, 4), &payload);
        assert_eq!(reveal(&stego), payload);
    }

    #[test]
    fn tail_after_frame_is_untouched() {
        let cover = random_image(20, 20);
        let payload = random_payload(13);
        let stego = hide(cover.clone(), &payload);

        let frame_slots = 32 + 13 * 8;
        let (written, tail) = stego.as_raw().split_at(frame_slots);
        let (original, original_tail) = cover.as_raw().split_at(frame_slots);
        assert_eq!(tail, original_tail);

        // 帧内通道只有最低位可能改变
        for (a, b) in written.iter().zip(original) {
            assert_eq!(a & !1, b & !1);
        }
    }

    #[test]
    fn oversized_header_is_truncated_stego() {
        // 头部声明 1 字节载荷需要 40 比特，而 4×3 的图像只有 36 比特
        // 第 31 个通道位于第 10 个像素 (x = 2, y = 2) 的 G 通道
        let mut image = RgbImage::new(4, 3);
        image.get_pixel_mut(2, 2).0[1] = 1;

        let err = extract(&image, &mut NoProgress).unwrap_err();
        assert!(matches!(
            err,
            StegoError::TruncatedStego {
                required_bits: 40,
                available_bits: 36
            }
        ));
    }

    #[test]
    fn header_of_all_ones_does_not_panic() {
        let image = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        assert!(matches!(
            extract(&image, &mut NoProgress),
            Err(StegoError::TruncatedStego { .. })
        ));
    }

    #[test]
    fn image_smaller_than_header_is_truncated_stego() {
        let image = random_image(10, 1);
        assert!(matches!(
            extract(&image, &mut NoProgress),
            Err(StegoError::TruncatedStego {
                required_bits: 32,
                available_bits: 30
            })
        ));
        assert!(matches!(
            embed(image, &[], &mut NoProgress),
            Err(StegoError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_one() {
        let payload = random_payload(50_000);
        let mut seen = Vec::new();
        let mut sink = |f: f64| {
            seen.push(f);
            ControlFlow::Continue(())
        };

        let stego = embed(random_image(400, 400), &payload, &mut sink).unwrap();
        assert!(seen.len() > 1);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&1.0));

        seen.clear();
        let mut sink = |f: f64| {
            seen.push(f);
            ControlFlow::Continue(())
        };
        assert_eq!(extract(&stego, &mut sink).unwrap(), payload);
        assert!(seen.len() > 1);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&1.0));
    }

    #[test]
    fn cancelling_stops_both_directions() {
        let payload = random_payload(50_000);
        let mut cancel = |f: f64| {
            if f > 0.3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };

        let cover = random_image(400, 400);
        let err = embed(cover, &payload, &mut cancel).unwrap_err();
        assert!(matches!(err, StegoError::Cancelled));

        let stego = hide(random_image(400, 400), &payload);
        let err = extract(&stego, &mut cancel).unwrap_err();
        assert!(matches!(err, StegoError::Cancelled));
    }
}
