pub mod drainer;
pub mod fetcher;
pub mod sequencer;

pub use drainer::*;
pub use sequencer::*;

use std::sync::Arc;

use crate::client::StoreClient;
use crate::config::DumpConfig;
use crate::storage::SnapshotWriter;

/// 完整 dump 流程：按序 drain 所有数据库 → 断开连接 → 落盘。
///
/// 断连失败只记日志（快照已在内存里，没有理由丢弃）；
/// 文件写入失败是全流程唯一的致命错误，原样向上传播。
pub async fn run(client: Arc<dyn StoreClient>, cfg: &DumpConfig) -> anyhow::Result<()> {
    let sequencer = Sequencer::new(client.clone(), cfg.max_parallel_fetches);
    let snapshot = sequencer.run(&cfg.databases).await?;

    if let Err(e) = client.disconnect().await {
        tracing::warn!("Disconnect failed (snapshot unaffected): {}", e);
    }

    let writer = SnapshotWriter::new(cfg.dump_path(), cfg.json_spaces);
    writer.write(&snapshot).await
}
