//! 索引构建核心：后缀链表、LCP、BWT 索引与 q-gram 索引。

pub mod builder;
pub mod bwt;
pub mod check;
pub mod dll;
pub mod lcp;
pub mod qgram;
