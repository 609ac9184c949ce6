//! # 加密模块
//!
//! AES-256-CBC + PKCS#7 填充。密钥为密码 UTF-8 字节的 SHA-256 摘要，
//! 每次加密生成新的随机 16 字节 IV，输出格式为 `IV || 密文`。

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::constants::IV_LEN;
use crate::error::{Result, StegoError};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// 加密明文，返回 `IV (16 字节) || 密文`。
pub fn encrypt_message(plaintext: &[u8], password: &str) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);
    encrypt_with_iv(plaintext, password, iv)
}

fn encrypt_with_iv(plaintext: &[u8], password: &str, iv: [u8; IV_LEN]) -> Vec<u8> {
    let key = Sha256::digest(password.as_bytes());
    let ciphertext = Aes256CbcEnc::new(&key, &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// 解密 [`encrypt_message`] 的输出。
///
/// # Errors
///
/// 密文过短、未按分组对齐或填充校验失败时一律返回 [`StegoError::WrongPassword`]。
/// CBC 没有认证标签，错误密码偶尔也能通过填充校验，此时得到的是乱码，
/// 由上层解析封装时再次发现。
pub fn decrypt_message(ciphertext: &[u8], password: &str) -> Result<Vec<u8>> {
    if ciphertext.len() < IV_LEN {
        return Err(StegoError::WrongPassword);
    }
    let (iv, body) = ciphertext.split_at(IV_LEN);

    let key = Sha256::digest(password.as_bytes());
    let mut iv_block = [0u8; IV_LEN];
    iv_block.copy_from_slice(iv);

    Aes256CbcDec::new(&key, &iv_block.into())
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| StegoError::WrongPassword)
}

/// `plaintext_len` 字节的明文加密后的总长度 (含 IV)。
pub fn encrypted_len(plaintext_len: usize) -> usize {
    IV_LEN + (plaintext_len / IV_LEN + 1) * IV_LEN
}

/// 密文最多 `capacity` 字节时可加密的最大明文长度，连 IV 和一个填充分组都放不下时为 `None`。
pub fn max_plaintext_len(capacity: u64) -> Option<u64> {
    let block = IV_LEN as u64;
    let blocks = capacity.checked_sub(block)? / block;
    // 最后一个分组至少要留 1 字节填充
    blocks.checked_sub(1).map(|full| full * block + block - 1)
}
