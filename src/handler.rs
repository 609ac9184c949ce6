//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、加解密、调用核心隐写算法以及向用户报告结果。

use crate::capacity::{available_bits, max_payload_bytes};
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::STEGO_FILE_PREFIX;
use crate::crypto::{decrypt_message, encrypt_message, max_plaintext_len};
use crate::envelope::SecretEnvelope;
use crate::error::StegoError;
use crate::image_io::{load_rgb, save_png};
use crate::password::analyze_password;
use crate::progress::ProgressSink;
use crate::steganography::{embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// 恢复出的文件名无法使用时的后备文件名。
const FALLBACK_RECOVERED_NAME: &str = "recovered_secret.bin";

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取载体图像和秘密文件、检查密码强度、把文件名和内容打包后加密、
/// 检查隐写空间是否足够，最后把密文写入图像并保存为 PNG。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和密码的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 密码强度不足且未指定 `--allow-weak-password`。
/// * 无法读取输入的图像或秘密文件。
/// * 输出文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏加密后的数据。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let report = analyze_password(&args.password);
    if !report.is_strong() && !args.allow_weak_password {
        let missing: Vec<&str> = report
            .rules()
            .into_iter()
            .filter(|(_, passed)| !passed)
            .map(|(rule, _)| rule)
            .collect();
        anyhow::bail!(
            "Password is too weak. Missing: {}\nUse --allow-weak-password to proceed anyway.",
            missing.join(", ").red().bold()
        );
    }

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_stego_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let cover = load_rgb(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let secret = fs::read(&args.secret).with_context(|| {
        format!(
            "Unable to read secret file: {}",
            args.secret.to_string_lossy().red().bold()
        )
    })?;

    let filename = args
        .secret
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let plaintext = SecretEnvelope::new(filename, secret).to_bytes()?;
    let ciphertext = encrypt_message(&plaintext, &args.password);
    info!(
        "secret envelope is {} bytes, {} bytes after encryption",
        plaintext.len(),
        ciphertext.len()
    );

    let mut progress = ConsoleProgress::new("Embedding", !args.no_progress);
    let stego = embed(cover, &ciphertext, &mut progress)
        .map_err(describe_embed_error)?;

    save_png(&stego, &dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The file has been successfully encrypted, hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像、提取密文、用密码解密并拆出文件名和文件内容，
/// 最后把文件写到指定路径或图像旁边。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和密码的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中不含有效的隐写数据。
/// * 密码错误。
/// * 输出文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let picture = load_rgb(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let mut progress = ConsoleProgress::new("Extracting", !args.no_progress);
    let ciphertext = extract(&picture, &mut progress).with_context(|| {
        format!(
            "Failed to extract hidden data from '{}'. \nThe image may not contain a hidden file or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let envelope = decrypt_message(&ciphertext, &args.password)
        .and_then(|plaintext| SecretEnvelope::from_bytes(&plaintext))
        .map_err(|err| match err {
            StegoError::WrongPassword | StegoError::InvalidEnvelope(_) => {
                anyhow::anyhow!("{}", "Access denied: incorrect password.".red().bold())
            }
            other => other.into(),
        })?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_recovered_path(&args.image, &envelope.filename));
    ensure_writable(&output, args.force)?;

    fs::write(&output, &envelope.data).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "File found: {}. It has been successfully recovered and saved: {}",
        envelope.filename.cyan().bold(),
        output.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：打印图像尺寸和最多可隐藏的数据量。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = load_rgb(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let (width, height) = picture.dimensions();
    let max_payload = max_payload_bytes(width, height);

    println!("Image:          {}", args.image.to_string_lossy().bold());
    println!("Dimensions:     {width}x{height}");
    println!("Available bits: {}", available_bits(width, height));
    println!(
        "Max payload:    {} bytes",
        max_payload.to_string().green().bold()
    );
    match max_plaintext_len(max_payload) {
        Some(n) => println!(
            "Max secret:     {} bytes (file name included)",
            n.to_string().green().bold()
        ),
        None => println!("Max secret:     {}", "image too small".red().bold()),
    }

    Ok(())
}

/// 为隐写失败附加面向用户的说明，原始的 `StegoError` 保留在错误链中。
fn describe_embed_error(err: StegoError) -> anyhow::Error {
    let message = match &err {
        StegoError::CapacityExceeded {
            required_bits,
            available_bits,
        } => format!(
            "Not enough space in the image to hide the file. \nRequired: {} bits, Available: {} bits",
            required_bits.to_string().red().bold(),
            available_bits.to_string().green().bold()
        ),
        _ => "Failed to hide the encrypted data in the image.".to_string(),
    };
    anyhow::Error::new(err).context(message)
}

/// 载体图像旁边的默认输出路径：`stego_<名称>.png`。
pub fn default_stego_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    image.with_file_name(format!("{STEGO_FILE_PREFIX}{stem}.png"))
}

/// 隐写图像旁边的默认恢复路径。
///
/// 只取记录的文件名的最后一段，防止其中的目录成分把文件写到别处。
pub fn default_recovered_path(image: &Path, filename: &str) -> PathBuf {
    let name = Path::new(filename)
        .file_name()
        .filter(|name| !name.is_empty())
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| FALLBACK_RECOVERED_NAME.into());
    image.with_file_name(name)
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}\nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 在标准错误输出上打印百分比进度。
struct ConsoleProgress {
    label: &'static str,
    enabled: bool,
    last_percent: Option<u8>,
}

impl ConsoleProgress {
    fn new(label: &'static str, enabled: bool) -> Self {
        Self {
            label,
            enabled,
            last_percent: None,
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn report(&mut self, fraction: f64) -> ControlFlow<()> {
        let percent = (fraction * 100.0).round() as u8;
        if !self.enabled || self.last_percent == Some(percent) {
            return ControlFlow::Continue(());
        }
        self.last_percent = Some(percent);

        let mut stderr = std::io::stderr().lock();
        // 进度只是提示，写失败不影响结果
        let _ = write!(stderr, "\r{} {:>3}%", self.label, percent);
        if percent >= 100 {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();

        ControlFlow::Continue(())
    }
}
