//! 按编码长度定长的派生
//!
//! 调用方给出的是编码后的字符数，而派生原语只接受原始字节数。
//! 搜索从 `floor(3 * desired / 4)` 开始，每次都用新的长度完整地重新派生，
//! 直到编码结果的长度不小于期望值。
//!
//! 返回值始终是某个完整派生输出的未截断编码，因此总能解码回整字节。

use tracing::{debug, trace};

use super::KeyDerivation;
use super::encoding::{encode, raw_len_guess};
use crate::error::{DerivationError, Result};

/// 起点之后最多尝试的额外原始字节数
///
/// 起点最多比最小可行长度少 1 字节，这里留足余量。
pub const MAX_EXTRA_RAW_BYTES: usize = 4;

/// 派生结果
#[derive(Clone, PartialEq, Eq)]
pub struct DerivationResult {
    /// 编码后的密钥
    pub encoded: String,
    /// `encoded` 的长度，不小于期望长度
    pub encoded_size: usize,
    /// 最终使用的原始字节数
    pub raw_len: usize,
    /// 调用派生原语的次数
    pub iterations: usize,
}

impl std::fmt::Debug for DerivationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivationResult")
            .field("encoded", &"[REDACTED]")
            .field("encoded_size", &self.encoded_size)
            .field("raw_len", &self.raw_len)
            .field("iterations", &self.iterations)
            .finish()
    }
}

/// 搜索满足期望编码长度的最小原始字节数并返回其编码
///
/// 不持有可变状态，可在多个线程间共享。
#[derive(Debug, Clone)]
pub struct SizedDeriver<K> {
    kdf: K,
}

impl<K: KeyDerivation> SizedDeriver<K> {
    /// 包装一个派生原语
    pub fn new(kdf: K) -> Self {
        Self { kdf }
    }

    /// 底层派生原语
    pub fn kdf(&self) -> &K {
        &self.kdf
    }

    /// 派生编码长度不小于 `desired_size` 的密钥
    ///
    /// `desired_size` 应已经过 [`Policy`](crate::policy::Policy) 校验；
    /// 过小的值会让原语因输出太短而失败。
    ///
    /// # Errors
    ///
    /// - 派生原语失败
    /// - 超过 [`MAX_EXTRA_RAW_BYTES`] 仍未达到期望长度
    pub fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        desired_size: usize,
    ) -> Result<DerivationResult> {
        let start = raw_len_guess(desired_size);
        search(start, desired_size, |raw_len| {
            let mut raw = vec![0u8; raw_len];
            self.kdf.derive_into(password, salt, &mut raw)?;
            Ok(encode(&raw))
        })
    }
}

/// 从 `start` 开始逐个尝试原始长度，返回第一个编码长度达标的候选
fn search<F>(start: usize, desired_size: usize, mut attempt: F) -> Result<DerivationResult>
where
    F: FnMut(usize) -> Result<String>,
{
    let ceiling = start.saturating_add(MAX_EXTRA_RAW_BYTES);

    let mut raw_len = start;
    let mut iterations = 0;
    while raw_len <= ceiling {
        let encoded = attempt(raw_len)?;
        iterations += 1;
        trace!(raw_len, encoded_len = encoded.len(), "derived candidate");

        if encoded.len() >= desired_size {
            let encoded_size = encoded.len();
            debug!(
                desired_size,
                encoded_size, raw_len, iterations, "derivation finished"
            );
            return Ok(DerivationResult {
                encoded,
                encoded_size,
                raw_len,
                iterations,
            });
        }

        raw_len += 1;
    }

    Err(DerivationError::SearchExhausted {
        desired: desired_size,
        last_raw_len: ceiling,
    }
    .into())
}
