//! 密钥派生模块
//!
//! 提供按编码长度定长的密钥派生。
//!
//! ## 组成
//!
//! - [`KeyDerivation`]: 底层派生原语的抽象，输出长度由调用方决定
//! - [`Argon2idKdf`]: 基于 Argon2id 的实现（内存硬）
//! - [`SizedDeriver`]: 搜索满足期望编码长度的最小原始字节数
//! - [`encoding`]: 无填充 base64 及其长度换算
//!
//! ## 示例
//!
//! ```rust
//! use sized_kdf::config::KdfParams;
//! use sized_kdf::kdf::{Argon2idKdf, SizedDeriver};
//!
//! let kdf = Argon2idKdf::new(KdfParams::TESTING).unwrap();
//! let deriver = SizedDeriver::new(kdf);
//!
//! let result = deriver.derive(b"password", b"saltsalt", 8).unwrap();
//! assert!(result.encoded_size >= 8);
//! assert_eq!(result.encoded.len(), result.encoded_size);
//! ```

mod deriver;
pub mod encoding;

pub use deriver::{DerivationResult, SizedDeriver};

use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::KdfParams;
use crate::error::Result;

/// 定长输出的密钥派生原语
///
/// 对同样的输入必须是确定性的，输出长度等于 `out.len()`。
pub trait KeyDerivation: Send + Sync {
    /// 把派生结果写入 `out`
    fn derive_into(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()>;
}

/// Argon2id (v0x13) 派生原语
#[derive(Debug, Clone)]
pub struct Argon2idKdf {
    params: KdfParams,
    argon2_params: Params,
}

impl Argon2idKdf {
    /// 用给定的成本参数创建
    ///
    /// 参数不被 Argon2 接受时返回配置错误。
    pub fn new(params: KdfParams) -> Result<Self> {
        let argon2_params = params.validate()?;
        Ok(Self {
            params,
            argon2_params,
        })
    }

    /// 当前的成本参数
    pub fn params(&self) -> KdfParams {
        self.params
    }
}

impl KeyDerivation for Argon2idKdf {
    fn derive_into(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
        let argon2 = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            self.argon2_params.clone(),
        );
        argon2.hash_password_into(password, salt, out)?;
        Ok(())
    }
}

impl<K: KeyDerivation + ?Sized> KeyDerivation for std::sync::Arc<K> {
    fn derive_into(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
        (**self).derive_into(password, salt, out)
    }
}
