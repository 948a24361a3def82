use anyhow::Context;
use async_trait::async_trait;
use redis::AsyncCommands;

use crate::client::{KeyKind, StoreClient};
use crate::config::DumpConfig;

/// Redis 实现：单条 multiplexed connection 承载全部在途请求。
///
/// MultiplexedConnection 的 clone 是廉价句柄，各请求内部 clone 一份
/// 使用即可并发发出；AUTH 在建连时一次性完成（密码写进 ConnectionInfo）。
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(cfg: &DumpConfig) -> anyhow::Result<Self> {
        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(cfg.host.clone(), cfg.port),
            redis: redis::RedisConnectionInfo {
                password: cfg.password.clone(),
                ..Default::default()
            },
        };

        let client = redis::Client::open(info)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .with_context(|| format!("connecting to {}:{}", cfg.host, cfg.port))?;

        tracing::info!("Connected to {}:{}", cfg.host, cfg.port);
        Ok(Self { conn })
    }
}

#[async_trait]
impl StoreClient for RedisStore {
    async fn select_db(&self, index: u32) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SELECT")
            .arg(index)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn list_keys(&self, pattern: &str) -> anyhow::Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }

    async fn key_kind(&self, key: &str) -> anyhow::Result<KeyKind> {
        let mut conn = self.conn.clone();
        let reply: String = conn.key_type(key).await?;
        Ok(KeyKind::from_type_reply(&reply))
    }

    async fn get_string(&self, key: &str) -> anyhow::Result<String> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        // KEYS 与 GET 之间 key 可能被删除：按取值失败处理（上游记日志并跳过）
        value.ok_or_else(|| anyhow::anyhow!("key {:?} disappeared during dump", key))
    }

    async fn set_members(&self, key: &str) -> anyhow::Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }

    async fn disconnect(&self) -> anyhow::Result<()> {
        // multiplexed connection 没有显式 QUIT 语义，句柄全部 drop 即断开
        tracing::debug!("Releasing Redis connection");
        Ok(())
    }
}
