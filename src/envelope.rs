//! # 文件封装模块
//!
//! 加密之前，秘密文件与其文件名被打包成一个缓冲区：
//! `文件名长度 (u32, 小端序) || 文件名 (UTF-8) || 文件内容`。
//! 隐写核心从不解析这个结构，它只在命令层使用。

use crate::error::{Result, StegoError};

const NAME_LEN_BYTES: usize = 4;

/// 文件名与文件内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEnvelope {
    pub filename: String,
    pub data: Vec<u8>,
}

impl SecretEnvelope {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }

    /// 序列化为封装格式。
    ///
    /// # Errors
    ///
    /// 文件名长度超过 `u32::MAX` 字节时返回 [`StegoError::InvalidEnvelope`]。
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let name = self.filename.as_bytes();
        let name_len = u32::try_from(name.len())
            .map_err(|_| StegoError::InvalidEnvelope("filename is too long"))?;

        let mut out = Vec::with_capacity(NAME_LEN_BYTES + name.len() + self.data.len());
        out.extend_from_slice(&name_len.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(&self.data);
        Ok(out)
    }

    /// 从封装格式解析。
    ///
    /// # Errors
    ///
    /// 缓冲区不足 4 字节、文件名越界或文件名不是合法 UTF-8 时返回
    /// [`StegoError::InvalidEnvelope`]。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (len_bytes, rest) = bytes
            .split_first_chunk::<NAME_LEN_BYTES>()
            .ok_or(StegoError::InvalidEnvelope("missing filename length"))?;
        let name_len = u32::from_le_bytes(*len_bytes) as usize;

        if name_len > rest.len() {
            return Err(StegoError::InvalidEnvelope("filename runs past the end of the data"));
        }
        let (name, data) = rest.split_at(name_len);
        let filename = std::str::from_utf8(name)
            .map_err(|_| StegoError::InvalidEnvelope("filename is not valid UTF-8"))?;

        Ok(Self::new(filename, data.to_vec()))
    }
}
