use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// 待完成工作计数器（per-database countdown）。
///
/// 语义约束：
/// - 构造时一次性装入全部工作量（key 数），之后只减不增；
///   因此"归零"在没有 underflow 的前提下至多发生一次。
/// - `complete_one` 对 underflow 做防御：多余的完成调用只记 warn，
///   计数永不为负，也不会二次触发唤醒。
/// - `drained` 是唯一的完成观测点：计数首次归零时恰好放行一次。
///
/// 这是整条 dump 链路里唯一的同步原语——共享的 DatabaseDump
/// 只在归零之后才被读取，不需要额外的完成回调。
pub struct WorkCounter {
    remaining: AtomicUsize,
    notify: Notify,
}

impl WorkCounter {
    /// 装入 pending 个工作单元；0 表示立即视为 drained。
    pub fn new(pending: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(pending),
            notify: Notify::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_drained(&self) -> bool {
        self.remaining() == 0
    }

    /// 完成一个工作单元。归零的那一次负责唤醒等待方。
    pub fn complete_one(&self) {
        let prev = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_sub(1));

        match prev {
            Ok(1) => {
                // 首次归零：notify_one 在无等待方时会存一张 permit，
                // 不会丢失唤醒。
                self.notify.notify_one();
            }
            Ok(_) => {}
            Err(_) => {
                tracing::warn!("WorkCounter: complete_one called past zero, ignoring");
            }
        }
    }

    /// 挂起直到计数归零。归零后（含装入 0 的情形）立即返回。
    pub async fn drained(&self) {
        while self.remaining.load(Ordering::Acquire) != 0 {
            self.notify.notified().await;
        }
    }
}
