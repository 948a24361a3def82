pub mod redis;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

/// 服务端 TYPE 回复的归类。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyKind {
    String,
    List,
    Set,
    Hash,
    SortedSet,
    /// 未识别的类型（stream、module 自定义类型等）
    Other(String),
}

impl KeyKind {
    pub fn from_type_reply(reply: &str) -> Self {
        match reply {
            "string" => KeyKind::String,
            "list" => KeyKind::List,
            "set" => KeyKind::Set,
            "hash" => KeyKind::Hash,
            "zset" => KeyKind::SortedSet,
            other => KeyKind::Other(other.to_string()),
        }
    }
}

/// KV 存储客户端（外部协作方）。
///
/// 实现方共享同一条连接供所有在途请求使用；select_db 作用于
/// 整条连接，因此调用方必须保证数据库串行处理。
#[async_trait]
pub trait StoreClient: Send + Sync {
    async fn select_db(&self, index: u32) -> anyhow::Result<()>;
    async fn list_keys(&self, pattern: &str) -> anyhow::Result<Vec<String>>;
    async fn key_kind(&self, key: &str) -> anyhow::Result<KeyKind>;
    async fn get_string(&self, key: &str) -> anyhow::Result<String>;
    async fn set_members(&self, key: &str) -> anyhow::Result<Vec<String>>;
    async fn disconnect(&self) -> anyhow::Result<()>;
}
