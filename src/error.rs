//! # 错误类型模块
//!
//! 定义隐写核心对外暴露的全部错误。命令层 (`handler`) 会把它们包装进
//! `anyhow::Error`，并附加面向用户的上下文信息。

use thiserror::Error;

/// 隐写与解密过程中可能出现的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 载荷帧需要的比特数超过了载体图像能提供的比特数。
    #[error("payload needs {required_bits} bits but the image only has {available_bits}")]
    CapacityExceeded {
        required_bits: u64,
        available_bits: u64,
    },

    /// 载荷长度无法写入 32 位长度头部。
    #[error("payload of {len} bytes does not fit the 32-bit length header")]
    PayloadTooLarge { len: usize },

    /// 头部声明的长度超出了图像实际包含的比特数。
    #[error(
        "this does not look like a valid stego image: header declares {required_bits} bits, image holds {available_bits}"
    )]
    TruncatedStego {
        required_bits: u64,
        available_bits: u64,
    },

    /// 密码错误或密文已损坏。
    #[error("incorrect password")]
    WrongPassword,

    /// 内部约定被违反，例如比特数未按字节对齐。
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    /// 进度回调要求中止操作。
    #[error("operation cancelled")]
    Cancelled,

    /// 解密得到的明文不是合法的文件封装。
    #[error("invalid secret envelope: {0}")]
    InvalidEnvelope(&'static str),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 隐写核心使用的 `Result` 别名。
pub type Result<T> = std::result::Result<T, StegoError>;
