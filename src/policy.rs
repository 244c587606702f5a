//! 请求校验模块
//!
//! 检查密码、盐和期望长度是否满足最小长度策略，并把过小的期望长度提升到下限。
//!
//! ## 示例
//!
//! ```rust
//! use sized_kdf::policy::{DerivationRequest, Policy};
//! use sized_kdf::PolicyViolation;
//!
//! let mut request = DerivationRequest::new("short", "saltsalt", 0);
//! let violations = Policy::default().validate(&mut request);
//!
//! assert_eq!(violations, vec![PolicyViolation::PasswordTooShort]);
//! // 期望长度被提升到下限，这不是错误
//! assert_eq!(request.desired_size, 8);
//! ```

use crate::error::{ConfigError, PolicyViolation, Result};

/// 密码最小字节数
pub const MIN_PASSWORD_LEN: usize = 8;

/// 盐最小字节数
pub const MIN_SALT_LEN: usize = 8;

/// 期望编码长度的下限
pub const MIN_ENCODED_SIZE: usize = 8;

/// 期望编码长度的默认上限
pub const DEFAULT_MAX_ENCODED_SIZE: usize = 4096;

/// 一次派生请求
///
/// 每个请求创建一次，响应生成后即丢弃。
#[derive(Clone, PartialEq, Eq)]
pub struct DerivationRequest {
    /// 密码
    pub password: String,
    /// 调用方提供的盐
    pub salt: String,
    /// 期望的编码后长度（字符数）
    pub desired_size: usize,
}

impl DerivationRequest {
    /// 创建新的请求
    pub fn new(password: impl Into<String>, salt: impl Into<String>, desired_size: usize) -> Self {
        Self {
            password: password.into(),
            salt: salt.into(),
            desired_size,
        }
    }

    /// 使用默认策略校验
    pub fn validate(&mut self) -> Vec<PolicyViolation> {
        Policy::default().validate(self)
    }
}

// 手写 Debug，避免密码和盐出现在日志里
impl std::fmt::Debug for DerivationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivationRequest")
            .field("password", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .field("desired_size", &self.desired_size)
            .finish()
    }
}

/// 校验策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// 密码最小字节数
    pub min_password_len: usize,
    /// 盐最小字节数
    pub min_salt_len: usize,
    /// 期望编码长度下限（低于此值会被提升）
    pub min_encoded_size: usize,
    /// 期望编码长度上限（超过此值为违规）
    pub max_encoded_size: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            min_password_len: MIN_PASSWORD_LEN,
            min_salt_len: MIN_SALT_LEN,
            min_encoded_size: MIN_ENCODED_SIZE,
            max_encoded_size: DEFAULT_MAX_ENCODED_SIZE,
        }
    }
}

impl Policy {
    /// 创建默认策略
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置期望编码长度上限
    pub fn with_max_encoded_size(mut self, max: usize) -> Self {
        self.max_encoded_size = max;
        self
    }

    /// 检查策略本身是否自洽
    pub fn check(&self) -> Result<()> {
        // Argon2 拒绝短于 8 字节的盐
        if self.min_salt_len < MIN_SALT_LEN {
            return Err(ConfigError::InvalidValue {
                key: "min_salt_len".to_string(),
                message: format!("must be at least {}", MIN_SALT_LEN),
            }
            .into());
        }
        if self.min_encoded_size < MIN_ENCODED_SIZE {
            return Err(ConfigError::InvalidValue {
                key: "min_encoded_size".to_string(),
                message: format!("must be at least {}", MIN_ENCODED_SIZE),
            }
            .into());
        }
        if self.max_encoded_size < self.min_encoded_size {
            return Err(ConfigError::InvalidValue {
                key: "max_encoded_size".to_string(),
                message: format!("must be at least {}", self.min_encoded_size),
            }
            .into());
        }
        Ok(())
    }

    /// 校验请求
    ///
    /// 收集所有违规（不短路），顺序固定为密码、盐、长度。
    /// 期望长度低于下限时直接提升到下限，不算违规。
    ///
    /// 返回空列表表示请求有效；非空时调用方不得继续派生。
    pub fn validate(&self, request: &mut DerivationRequest) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();

        if request.password.len() < self.min_password_len {
            violations.push(PolicyViolation::PasswordTooShort);
        }
        if request.salt.len() < self.min_salt_len {
            violations.push(PolicyViolation::SaltTooShort);
        }
        if request.desired_size < self.min_encoded_size {
            request.desired_size = self.min_encoded_size;
        } else if request.desired_size > self.max_encoded_size {
            violations.push(PolicyViolation::SizeTooLarge);
        }

        violations
    }
}
