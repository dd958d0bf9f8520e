//! # seqidx-rust
//!
//! 面向编码生物序列的全文索引构建器。
//!
//! 核心是在线后缀数组构建：把后缀从后往前逐个插入一条字典序双向
//! 链表，不需要排序比较整个后缀，只靠首字符对齐和邻居行走确定插入
//! 位置。在此之上提供：
//!
//! - **五种行走策略**：`L` / `R` / `minLR` / `bothLR2`（显式链表）与
//!   `bothLR`（XOR 编码链表，内存减半）
//! - **LCP 数组**：Kasai 算法，1 / 2 / 4 字节磁盘宽度加例外表
//! - **BWT 索引**：c / e / el 后继映射，反向搜索计数与文本还原
//! - **q-gram 索引**：桶式位置索引加非空桶筛选位数组
//!
//! ## 快速示例
//!
//! ```rust,no_run
//! use seqidx_rust::index::builder::{BuildMethod, SuffixTrayBuilder};
//! use seqidx_rust::index::bwt::BwtIndex;
//! use seqidx_rust::util::alphabet::Alphabet;
//!
//! // 编码文本：A C G T + 分隔符
//! let alphabet = Alphabet::dna();
//! let text: Vec<i8> = vec![0, 1, 2, 3, -1];
//!
//! // 在线构建后缀链表并线性化
//! let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
//! let mut tray = builder.build(BuildMethod::BothLR);
//! let pos = tray.to_pos();
//!
//! // BWT 索引上的反向搜索
//! let index = BwtIndex::from_pos(&pos, &text);
//! println!("Found {} occurrences", index.find(&[1, 2]));
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — FASTA 解析与编码翻译
//! - [`index`] — 后缀链表构建、校验、LCP、BWT、q-gram
//! - [`util`] — 字母表、原始数组文件、位数组
//! - [`project`] — 构建元数据持久化

pub mod index;
pub mod io;
pub mod project;
pub mod util;
