use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::client::{KeyKind, StoreClient};
use crate::core::{DatabaseDump, Value, WorkCounter};

/// 单个 key 的取值：类型探测 + 按类型分发。
///
/// 返回 None 表示该 key 不产生条目（取值失败或类型未接通），
/// 所有失败只记日志，不影响同数据库的其他 key。
pub async fn fetch_value(client: &dyn StoreClient, db: u32, key: &str) -> Option<Value> {
    let kind = match client.key_kind(key).await {
        Ok(kind) => kind,
        Err(e) => {
            tracing::warn!("db {}: TYPE failed for {:?}: {}", db, key, e);
            return None;
        }
    };

    match kind {
        KeyKind::String => match client.get_string(key).await {
            Ok(value) => Some(Value::Str(value)),
            Err(e) => {
                tracing::warn!("db {}: GET failed for {:?}: {}", db, key, e);
                None
            }
        },
        KeyKind::Set => match client.set_members(key).await {
            Ok(members) => Some(Value::Set(members)),
            Err(e) => {
                tracing::warn!("db {}: SMEMBERS failed for {:?}: {}", db, key, e);
                None
            }
        },
        KeyKind::List | KeyKind::Hash | KeyKind::SortedSet => {
            // 取值路径未接通：跳过，不产生条目
            tracing::debug!("db {}: skipping {:?} (unimplemented kind {:?})", db, key, kind);
            None
        }
        KeyKind::Other(t) => {
            tracing::debug!("db {}: skipping {:?} (unknown type {:?})", db, key, t);
            None
        }
    }
}

/// fire-and-forget 工作单元：完成只通过 counter 对外可见。
///
/// 不论成功、取值失败还是类型未接通，恰好递减一次 counter；
/// 递减发生在该 key 的全部处理（类型探测 + 取值 + 写入）之后。
pub fn dispatch(
    client: Arc<dyn StoreClient>,
    db: u32,
    key: String,
    dump: Arc<Mutex<DatabaseDump>>,
    counter: Arc<WorkCounter>,
    limiter: Option<Arc<Semaphore>>,
) {
    tokio::spawn(async move {
        // 限流是显式配置的偏离项；默认 None，所有 key 立即并发取值
        let _permit = match &limiter {
            Some(sem) => match sem.clone().acquire_owned().await {
                Ok(p) => Some(p),
                Err(_) => None,
            },
            None => None,
        };

        if let Some(value) = fetch_value(client.as_ref(), db, &key).await {
            dump.lock().insert(key, value);
        }
        counter.complete_one();
    });
}
