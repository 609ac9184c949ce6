//! # 图像读写模块
//!
//! 任何 `image` 库能解码的格式都先转换为 8 位 RGB (丢弃 Alpha)，
//! 输出一律编码为无损 PNG，避免有损压缩破坏最低有效位。

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader, RgbImage};
use log::debug;

use crate::error::Result;
use crate::progress::ProgressSink;
use crate::steganography::{embed, extract};

/// 从文件读取图像并转换为 RGB。格式由文件内容推断，而非扩展名。
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    debug!(
        "loaded {} ({:?}, {}x{})",
        path.display(),
        image.color(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgb8())
}

/// 从内存中的编码数据解码图像并转换为 RGB。
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// 把图像编码为 PNG。
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// 把图像以 PNG 格式写入文件，不论扩展名是什么。
pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// 解码载体图像、写入载荷并返回 PNG 数据。
pub fn hide_in_image<P>(cover: &[u8], payload: &[u8], progress: &mut P) -> Result<Vec<u8>>
where
    P: ProgressSink + ?Sized,
{
    let stego = embed(decode_rgb(cover)?, payload, progress)?;
    encode_png(&stego)
}

/// 解码隐写图像并提取载荷。
pub fn reveal_from_image<P>(stego: &[u8], progress: &mut P) -> Result<Vec<u8>>
where
    P: ProgressSink + ?Sized,
{
    extract(&decode_rgb(stego)?, progress)
}
