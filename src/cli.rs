//! 命令行参数
//!
//! 每个参数也可通过 `SIZED_KDF_` 前缀的环境变量设置。

use std::net::SocketAddr;

use clap::Parser;

use crate::config::{KdfParams, ServiceConfig};
use crate::policy::{DEFAULT_MAX_ENCODED_SIZE, Policy};
use crate::server::DEFAULT_ROUTE;

/// sized-kdf 服务参数
#[derive(Parser, Debug, Clone)]
#[command(name = "sized-kdf-server", version, about)]
pub struct ServerArgs {
    /// 监听地址
    #[arg(long, env = "SIZED_KDF_LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: SocketAddr,

    /// 路由路径
    #[arg(long, env = "SIZED_KDF_ROUTE", default_value = DEFAULT_ROUTE)]
    pub route: String,

    /// Argon2 内存成本（KiB）
    #[arg(long, env = "SIZED_KDF_MEMORY_KIB", default_value_t = KdfParams::INTERACTIVE.memory_kib)]
    pub memory_kib: u32,

    /// Argon2 迭代次数
    #[arg(long, env = "SIZED_KDF_ITERATIONS", default_value_t = KdfParams::INTERACTIVE.iterations)]
    pub iterations: u32,

    /// Argon2 并行度
    #[arg(long, env = "SIZED_KDF_PARALLELISM", default_value_t = KdfParams::INTERACTIVE.parallelism)]
    pub parallelism: u32,

    /// 同时进行的派生数上限
    #[arg(long, env = "SIZED_KDF_MAX_CONCURRENCY", default_value_t = 8)]
    pub max_concurrency: usize,

    /// 允许请求的最大编码长度
    #[arg(long, env = "SIZED_KDF_MAX_SIZE", default_value_t = DEFAULT_MAX_ENCODED_SIZE)]
    pub max_size: usize,
}

impl ServerArgs {
    /// 转换为服务配置
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::new()
            .with_kdf(KdfParams::new(
                self.memory_kib,
                self.iterations,
                self.parallelism,
            ))
            .with_policy(Policy::new().with_max_encoded_size(self.max_size))
            .with_max_concurrent_derivations(self.max_concurrency)
    }
}
