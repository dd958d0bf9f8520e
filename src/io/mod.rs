//! 输入输出：FASTA 解析与编码翻译。

pub mod fasta;
