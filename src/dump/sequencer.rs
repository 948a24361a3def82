use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use crate::client::StoreClient;
use crate::core::Snapshot;
use crate::dump::Drainer;

/// 数据库推进状态机：AtDatabase(i) → … → Finished。
enum SeqState {
    AtDatabase(usize),
    Finished,
}

/// 数据库序列器：严格按配置顺序逐库 drain，前一个库归零之前
/// 绝不 select 下一个库——这是它区别于"对所有库平铺 fan-out"的
/// 全部意义。
///
/// 推进不走内联调用链：每次 drain 完成后把下一个状态投递回
/// 消息队列，由循环重新拾起。N 个库 × K 个 key 的调用深度因此
/// 恒定，不随总工作量增长。
pub struct Sequencer {
    drainer: Drainer,
}

impl Sequencer {
    pub fn new(client: Arc<dyn StoreClient>, fetch_limit: Option<usize>) -> Self {
        Self {
            drainer: Drainer::new(client, fetch_limit),
        }
    }

    /// 按序处理全部数据库，返回聚合快照。
    /// 快照由本函数独占持有，完成前对外不可见。
    pub async fn run(&self, databases: &[u32]) -> anyhow::Result<Snapshot> {
        let mut snapshot = Snapshot::default();
        if databases.is_empty() {
            tracing::warn!("No databases configured, snapshot will be empty");
            return Ok(snapshot);
        }

        let (tx, mut rx) = mpsc::channel::<SeqState>(1);
        tx.send(SeqState::AtDatabase(0))
            .await
            .context("seeding sequencer queue")?;

        while let Some(state) = rx.recv().await {
            let i = match state {
                SeqState::AtDatabase(i) => i,
                SeqState::Finished => break,
            };

            let db = databases[i];
            let dump = self
                .drainer
                .drain(db)
                .await
                .with_context(|| format!("draining database {}", db))?;
            snapshot.insert_database(db, dump);

            let next = if i + 1 < databases.len() {
                SeqState::AtDatabase(i + 1)
            } else {
                SeqState::Finished
            };
            tx.send(next).await.context("advancing sequencer queue")?;
        }

        tracing::info!(
            "All {} databases drained, {} keys total",
            snapshot.database_count(),
            snapshot.key_count()
        );
        Ok(snapshot)
    }
}
