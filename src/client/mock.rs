//! 测试用内存版 StoreClient：支持故障注入、事件日志与并发门控。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Barrier;

use crate::client::{KeyKind, StoreClient};

#[derive(Clone, Debug)]
pub enum MockValue {
    Str(String),
    Set(Vec<String>),
    List,
    Hash,
    Zset,
    Stream,
}

impl MockValue {
    fn kind(&self) -> KeyKind {
        match self {
            MockValue::Str(_) => KeyKind::String,
            MockValue::Set(_) => KeyKind::Set,
            MockValue::List => KeyKind::List,
            MockValue::Hash => KeyKind::Hash,
            MockValue::Zset => KeyKind::SortedSet,
            MockValue::Stream => KeyKind::Other("stream".to_string()),
        }
    }
}

/// 观测点：跨数据库的操作顺序断言用。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockEvent {
    Select(u32),
    ListKeys(u32),
    TypeCheck(u32, String),
    FetchValue(u32, String),
    Disconnect,
}

#[derive(Default)]
struct MockState {
    selected: Option<u32>,
    events: Vec<MockEvent>,
    disconnects: usize,
}

#[derive(Default)]
pub struct MockStore {
    dbs: HashMap<u32, Vec<(String, MockValue)>>,
    fail_select: HashSet<u32>,
    fail_list: HashSet<u32>,
    fail_type: HashSet<String>,
    fail_value: HashSet<String>,
    /// 指定 key 的取值会在 barrier 上会合：用于验证 fan-out 真并发
    gate: Option<(Arc<Barrier>, HashSet<String>)>,
    state: Mutex<MockState>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(
        mut self,
        index: u32,
        entries: impl IntoIterator<Item = (&'static str, MockValue)>,
    ) -> Self {
        self.dbs.insert(
            index,
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        );
        self
    }

    pub fn with_db_owned(mut self, index: u32, entries: Vec<(String, MockValue)>) -> Self {
        self.dbs.insert(index, entries);
        self
    }

    pub fn fail_select(mut self, index: u32) -> Self {
        self.fail_select.insert(index);
        self
    }

    pub fn fail_list(mut self, index: u32) -> Self {
        self.fail_list.insert(index);
        self
    }

    pub fn fail_type_of(mut self, key: &str) -> Self {
        self.fail_type.insert(key.to_string());
        self
    }

    pub fn fail_value_of(mut self, key: &str) -> Self {
        self.fail_value.insert(key.to_string());
        self
    }

    pub fn gate_values(mut self, keys: impl IntoIterator<Item = &'static str>) -> Self {
        let keys: HashSet<String> = keys.into_iter().map(|k| k.to_string()).collect();
        let barrier = Arc::new(Barrier::new(keys.len()));
        self.gate = Some((barrier, keys));
        self
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.state.lock().events.clone()
    }

    pub fn disconnect_count(&self) -> usize {
        self.state.lock().disconnects
    }

    fn selected(&self) -> u32 {
        self.state
            .lock()
            .selected
            .expect("mock: no database selected")
    }

    fn lookup(&self, key: &str) -> Option<MockValue> {
        let db = self.selected();
        self.dbs
            .get(&db)
            .and_then(|entries| entries.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v.clone())
    }

    async fn maybe_gate(&self, key: &str) {
        if let Some((barrier, keys)) = &self.gate {
            if keys.contains(key) {
                barrier.wait().await;
            }
        }
    }
}

#[async_trait]
impl StoreClient for MockStore {
    async fn select_db(&self, index: u32) -> anyhow::Result<()> {
        let mut st = self.state.lock();
        st.events.push(MockEvent::Select(index));
        if self.fail_select.contains(&index) {
            anyhow::bail!("mock: SELECT {} refused", index);
        }
        st.selected = Some(index);
        Ok(())
    }

    async fn list_keys(&self, _pattern: &str) -> anyhow::Result<Vec<String>> {
        let db = self.selected();
        self.state.lock().events.push(MockEvent::ListKeys(db));
        if self.fail_list.contains(&db) {
            anyhow::bail!("mock: KEYS failed for database {}", db);
        }
        Ok(self
            .dbs
            .get(&db)
            .map(|entries| entries.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default())
    }

    async fn key_kind(&self, key: &str) -> anyhow::Result<KeyKind> {
        let db = self.selected();
        self.state
            .lock()
            .events
            .push(MockEvent::TypeCheck(db, key.to_string()));
        if self.fail_type.contains(key) {
            anyhow::bail!("mock: TYPE failed for {:?}", key);
        }
        self.lookup(key)
            .map(|v| v.kind())
            .ok_or_else(|| anyhow::anyhow!("mock: no such key {:?}", key))
    }

    async fn get_string(&self, key: &str) -> anyhow::Result<String> {
        let db = self.selected();
        self.state
            .lock()
            .events
            .push(MockEvent::FetchValue(db, key.to_string()));
        self.maybe_gate(key).await;
        if self.fail_value.contains(key) {
            anyhow::bail!("mock: GET failed for {:?}", key);
        }
        match self.lookup(key) {
            Some(MockValue::Str(s)) => Ok(s),
            _ => anyhow::bail!("mock: {:?} is not a string", key),
        }
    }

    async fn set_members(&self, key: &str) -> anyhow::Result<Vec<String>> {
        let db = self.selected();
        self.state
            .lock()
            .events
            .push(MockEvent::FetchValue(db, key.to_string()));
        self.maybe_gate(key).await;
        if self.fail_value.contains(key) {
            anyhow::bail!("mock: SMEMBERS failed for {:?}", key);
        }
        match self.lookup(key) {
            Some(MockValue::Set(members)) => Ok(members),
            _ => anyhow::bail!("mock: {:?} is not a set", key),
        }
    }

    async fn disconnect(&self) -> anyhow::Result<()> {
        let mut st = self.state.lock();
        st.events.push(MockEvent::Disconnect);
        st.disconnects += 1;
        Ok(())
    }
}
