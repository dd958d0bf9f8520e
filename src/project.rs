//! 项目元数据：一次构建产生的所有文件共享同一个名字前缀，旁边放一个
//! bincode 序列化的 .prj 文件记录构建参数和统计量。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 索引文件扩展名。
pub const EXT_PROJECT: &str = ".prj";
pub const EXT_SEQ: &str = ".seq";
pub const EXT_POS: &str = ".pos";
pub const EXT_LCP: &str = ".lcp";
pub const EXT_BWT: &str = ".bwt";
pub const EXT_QBCK: &str = ".qbck";
pub const EXT_QPOS: &str = ".qpos";
pub const EXT_QFILTER: &str = ".qfilter";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contig {
    pub name: String,
    pub len: u32,
    pub offset: u32,
}

/// 构建元数据。`translate` 创建它，后续子命令读出、补充再写回。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub alphabet: String,
    pub length: u64,
    pub contigs: Vec<Contig>,
    /// suffix 子命令填写的字段
    pub method: Option<String>,
    pub steps: Option<u64>,
    pub max_lcp: Option<i32>,
    pub lcp1_exceptions: Option<i32>,
    pub lcp2_exceptions: Option<i32>,
    /// qgram 子命令填写的字段
    pub q: Option<u32>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

impl Project {
    pub fn new(name: &str, alphabet: &str, length: u64, contigs: Vec<Contig>) -> Self {
        Self {
            name: name.to_string(),
            alphabet: alphabet.to_string(),
            length,
            contigs,
            build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
            build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
            ..Self::default()
        }
    }

    /// 名字前缀加扩展名得到索引文件路径。
    pub fn file(prefix: &str, ext: &str) -> PathBuf {
        PathBuf::from(format!("{prefix}{ext}"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("cannot write project file {}", path.display()))?;
        bincode::serialize_into(&mut f, self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("cannot open project file {}", path.display()))?;
        let prj: Self = bincode::deserialize_from(f)?;
        Ok(prj)
    }
}
