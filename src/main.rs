use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use kvsnap::client::redis::RedisStore;
use kvsnap::client::StoreClient;
use kvsnap::config::DumpConfig;
use kvsnap::dump;

/// Dump every configured Redis database into one JSON snapshot file.
#[derive(Parser, Debug)]
#[command(name = "kvsnap", version, about)]
struct Cli {
    /// 配置文件路径（TOML）
    #[arg(short, long, default_value = "kvsnap.toml")]
    config: PathBuf,

    /// 覆盖配置里的服务器地址
    #[arg(long)]
    host: Option<String>,

    /// 覆盖配置里的服务器端口
    #[arg(long)]
    port: Option<u16>,

    /// 覆盖输出文件名
    #[arg(long)]
    dump_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cfg = DumpConfig::load(&cli.config)?;
    if let Some(host) = cli.host {
        cfg.host = host;
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    if let Some(dump_file) = cli.dump_file {
        cfg.dump_file = dump_file;
    }

    info!(
        "Starting kvsnap: {} databases from {}:{} -> {:?}",
        cfg.databases.len(),
        cfg.host,
        cfg.port,
        cfg.dump_path()
    );

    // AUTH（如配置了密码）随建连一次性完成；失败则任何数据库工作都不会开始
    let store: Arc<dyn StoreClient> = Arc::new(RedisStore::connect(&cfg).await?);

    dump::run(store, &cfg).await?;

    info!("Dump complete");
    Ok(())
}
