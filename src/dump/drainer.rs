use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::client::StoreClient;
use crate::core::{DatabaseDump, WorkCounter};
use crate::dump::fetcher;

/// 单个数据库的 drain：select → 枚举 key → 全量并发取值 → 等待归零。
pub struct Drainer {
    client: Arc<dyn StoreClient>,
    /// None = 不限流（默认）；Some(n) = 单库并发上限
    fetch_limit: Option<usize>,
}

impl Drainer {
    pub fn new(client: Arc<dyn StoreClient>, fetch_limit: Option<usize>) -> Self {
        Self {
            client,
            fetch_limit,
        }
    }

    /// 完整处理一个数据库，返回其 dump。
    ///
    /// select / KEYS 失败直接向上传播并中止整个 run——不再沿用
    /// 静默卡死的旧行为。per-key 失败仍然是局部的：记日志、跳过。
    pub async fn drain(&self, db: u32) -> anyhow::Result<DatabaseDump> {
        self.client
            .select_db(db)
            .await
            .with_context(|| format!("selecting database {}", db))?;

        let keys = self
            .client
            .list_keys("*")
            .await
            .with_context(|| format!("listing keys of database {}", db))?;

        if keys.is_empty() {
            tracing::info!("db {}: empty, nothing to fetch", db);
            return Ok(DatabaseDump::new());
        }

        tracing::info!("db {}: fetching {} keys", db, keys.len());

        // counter 先装满再分发：分发过程中不可能提前观测到归零
        let counter = Arc::new(WorkCounter::new(keys.len()));
        let dump = Arc::new(Mutex::new(DatabaseDump::new()));
        let limiter = self.fetch_limit.map(|n| Arc::new(Semaphore::new(n)));

        for key in keys {
            fetcher::dispatch(
                self.client.clone(),
                db,
                key,
                dump.clone(),
                counter.clone(),
                limiter.clone(),
            );
        }

        counter.drained().await;

        let result = std::mem::take(&mut *dump.lock());
        tracing::info!("db {}: drained, {} entries", db, result.len());
        Ok(result)
    }
}
