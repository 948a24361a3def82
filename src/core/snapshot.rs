use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// 单个 key 的值。
///
/// 已实现：`Str` / `Set`。
/// `List` / `Hash` / `SortedSet` 只做类型声明，取值路径尚未接通：
/// 这类 key 在 dump 时被跳过，不会产生条目。
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Set(Vec<String>),
    // TODO: 接通 LRANGE / HGETALL / ZRANGE WITHSCORES 取值路径
    List(Vec<String>),
    Hash(BTreeMap<String, String>),
    SortedSet(Vec<String>),
}

/// 单个数据库的 dump 结果：key -> Value。
/// 插入顺序由各 key 查询的完成顺序决定（不确定），消费方不得依赖。
pub type DatabaseDump = BTreeMap<String, Value>;

/// 全量快照：数据库编号 -> DatabaseDump。
/// 由 Sequencer 独占持有，最后一个数据库完成后不再变更，整体交给 Writer。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    databases: BTreeMap<u32, DatabaseDump>,
}

impl Snapshot {
    pub fn insert_database(&mut self, index: u32, dump: DatabaseDump) {
        self.databases.insert(index, dump);
    }

    pub fn database(&self, index: u32) -> Option<&DatabaseDump> {
        self.databases.get(&index)
    }

    pub fn database_count(&self) -> usize {
        self.databases.len()
    }

    pub fn key_count(&self) -> usize {
        self.databases.values().map(|d| d.len()).sum()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // 数据库编号以字符串形式作 JSON key（"0"、"1"…）
        let mut map = serializer.serialize_map(Some(self.databases.len()))?;
        for (index, dump) in &self.databases {
            map.serialize_entry(&index.to_string(), dump)?;
        }
        map.end()
    }
}
