//! # lsb_vault 库
//!
//! 本库包含加密 LSB 隐写工具的核心逻辑：比特流编解码、载荷帧、容量计算、
//! 像素级隐写与提取、进度回报，以及命令行使用的加密、文件封装和图像读写。

// 声明库包含的所有模块。

pub mod bitstream;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod handler;
pub mod image_io;
pub mod password;
pub mod progress;
pub mod steganography;

pub use error::{Result, StegoError};
pub use progress::{NoProgress, ProgressSink};
pub use steganography::{embed, extract};
