//! # 密码强度模块
//!
//! 五条规则全部满足才视为强密码。只在命令层的 `hide` 子命令中使用，
//! 加密本身接受任意密码。

/// 允许的特殊字符。
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

const MIN_LEN: usize = 8;

/// 每条规则的检查结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordReport {
    pub min_length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordReport {
    pub fn is_strong(&self) -> bool {
        self.rules().iter().all(|(_, passed)| *passed)
    }

    /// 规则名称与是否通过，顺序固定，便于直接展示给用户。
    pub fn rules(&self) -> [(&'static str, bool); 5] {
        [
            ("Min 8 characters", self.min_length),
            ("Uppercase letter", self.uppercase),
            ("Lowercase letter", self.lowercase),
            ("Digit", self.digit),
            ("Special character", self.special),
        ]
    }
}

pub fn analyze_password(password: &str) -> PasswordReport {
    PasswordReport {
        min_length: password.chars().count() >= MIN_LEN,
        uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
        lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
        digit: password.chars().any(|c| c.is_ascii_digit()),
        special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
    }
}
