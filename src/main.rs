//! sized-kdf HTTP 服务入口

use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sized_kdf::cli::ServerArgs;
use sized_kdf::server::{router, serve};
use sized_kdf::service::DeriveService;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = ServerArgs::parse();
    let config = args.service_config();

    // 参数无效时直接拒绝启动
    let service = match DeriveService::new(config) {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        memory_kib = args.memory_kib,
        iterations = args.iterations,
        parallelism = args.parallelism,
        max_concurrency = args.max_concurrency,
        "argon2id parameters loaded"
    );

    let listener = match TcpListener::bind(args.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %args.listen, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = serve(listener, router(service, &args.route)).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
