use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tokio::fs;

use crate::core::Snapshot;

/// 快照落盘：可配置缩进宽度的 JSON + 末尾换行。
///
/// 这里的失败是全流程唯一的致命错误：快照已经完整聚合在内存里，
/// 写不出去就没有任何可交付物，直接向上传播让进程以非零码退出。
pub struct SnapshotWriter {
    path: PathBuf,
    indent: usize,
}

impl SnapshotWriter {
    pub fn new(path: PathBuf, indent: usize) -> Self {
        Self { path, indent }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating dump directory {:?}", parent))?;
        }

        let mut buf = render(snapshot, self.indent)?;
        buf.push(b'\n');

        fs::write(&self.path, &buf)
            .await
            .with_context(|| format!("writing snapshot to {:?}", self.path))?;

        tracing::info!(
            "Snapshot written: {} databases, {} keys, {} bytes -> {:?}",
            snapshot.database_count(),
            snapshot.key_count(),
            buf.len(),
            self.path
        );
        Ok(())
    }
}

/// indent = 0 走 compact 输出，否则按配置宽度 pretty-print。
fn render(snapshot: &Snapshot, indent: usize) -> anyhow::Result<Vec<u8>> {
    if indent == 0 {
        return Ok(serde_json::to_vec(snapshot)?);
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    snapshot.serialize(&mut ser)?;
    Ok(buf)
}
