use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// dump 配置（TOML 文件加载，字段全部可缺省）
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Redis 服务器地址
    pub host: String,
    /// Redis 服务器端口
    pub port: u16,
    /// 可选的 AUTH 密码；连接建立时一次性认证
    pub password: Option<String>,
    /// 要导出的数据库编号，严格按列表顺序处理
    pub databases: Vec<u32>,
    /// 输出目录
    pub dump_dir: PathBuf,
    /// 输出文件名
    pub dump_file: String,
    /// JSON 缩进宽度；0 表示 compact 输出
    pub json_spaces: usize,
    /// 单个数据库内的并发取值上限。None（默认）= 不限流：
    /// 所有 key 的查询一次性全部发出，与吞吐优先的原始语义一致。
    pub max_parallel_fetches: Option<usize>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            databases: (0..16).collect(),
            dump_dir: PathBuf::from("."),
            dump_file: "dump.json".to_string(),
            json_spaces: 4,
            max_parallel_fetches: None,
        }
    }
}

impl DumpConfig {
    /// 从 TOML 文件加载；文件不存在时回退到默认配置。
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!("Config {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)?;
        Ok(cfg)
    }

    /// 输出文件完整路径：dump_dir/dump_file
    pub fn dump_path(&self) -> PathBuf {
        self.dump_dir.join(&self.dump_file)
    }
}
