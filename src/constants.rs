/// 长度头部所占的比特数。
/// 载荷长度以 `u32` 大端序写入，每个比特占用一个颜色通道的最低有效位。
pub const HEADER_BITS: usize = 32;

/// 每个像素参与隐写的通道数 (R, G, B)。
/// Alpha 等其余通道在读取图像时已被丢弃。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 每个载荷字节展开后的比特数。
pub const BITS_PER_BYTE: usize = 8;

/// AES-CBC 初始化向量的长度 (字节)，同时也是 AES 的分组长度。
pub const IV_LEN: usize = 16;

/// 两次进度回调之间至少处理的比特数。
/// 取 8 和 3 的公倍数，使每个进度区间都恰好落在字节和像素边界上。
pub const PROGRESS_INTERVAL_BITS: usize = 150_000;

/// 未指定输出路径时，隐写结果图像文件名使用的前缀。
pub const STEGO_FILE_PREFIX: &str = "stego_";

/// 提供密码的环境变量名。
pub const PASSWORD_ENV: &str = "LSB_VAULT_PASSWORD";
