//! 配置模块
//!
//! Argon2id 成本参数和服务配置。二者都在进程启动时构造一次，
//! 之后只读，通过参数显式传入派生器和服务。
//!
//! ## 示例
//!
//! ```rust
//! use sized_kdf::config::{KdfParams, ServiceConfig};
//!
//! let config = ServiceConfig::new()
//!     .with_kdf(KdfParams::TESTING)
//!     .with_max_concurrent_derivations(2);
//!
//! assert!(config.kdf.validate().is_ok());
//! ```

use argon2::Params;

use crate::error::{ConfigError, Result};
use crate::policy::Policy;

/// Argon2id 成本参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// 内存成本（KiB）
    pub memory_kib: u32,
    /// 迭代次数
    pub iterations: u32,
    /// 并行度
    pub parallelism: u32,
}

impl KdfParams {
    /// 交互式服务的默认配置：64 MiB，3 次迭代，并行度 2
    pub const INTERACTIVE: KdfParams = KdfParams {
        memory_kib: 64 * 1024,
        iterations: 3,
        parallelism: 2,
    };

    /// 测试用的最低成本配置
    pub const TESTING: KdfParams = KdfParams {
        memory_kib: 32,
        iterations: 1,
        parallelism: 1,
    };

    /// 创建新的参数
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// 检查参数组合是否被 Argon2 接受
    ///
    /// 服务在启动时调用，参数无效时拒绝启动，而不是在每个请求中失败。
    pub fn validate(&self) -> Result<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| {
            ConfigError::InvalidValue {
                key: "kdf".to_string(),
                message: format!(
                    "m={} KiB, t={}, p={}: {}",
                    self.memory_kib, self.iterations, self.parallelism, e
                ),
            }
            .into()
        })
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::INTERACTIVE
    }
}

/// 服务配置
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Argon2id 成本参数
    pub kdf: KdfParams,
    /// 请求校验策略
    pub policy: Policy,
    /// 同时进行的派生数上限（每个派生都会占用 `kdf.memory_kib` 内存）
    pub max_concurrent_derivations: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            policy: Policy::default(),
            max_concurrent_derivations: 8,
        }
    }
}

impl ServiceConfig {
    /// 创建新的配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置 KDF 参数
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// 设置校验策略
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// 设置并发派生上限
    pub fn with_max_concurrent_derivations(mut self, max: usize) -> Self {
        self.max_concurrent_derivations = max;
        self
    }

    /// 检查整体配置
    pub fn validate(&self) -> Result<()> {
        self.kdf.validate()?;
        self.validate_limits()
    }

    /// 检查与派生原语无关的部分：校验策略和并发上限
    pub fn validate_limits(&self) -> Result<()> {
        self.policy.check()?;
        if self.max_concurrent_derivations == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrent_derivations".to_string(),
                message: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
