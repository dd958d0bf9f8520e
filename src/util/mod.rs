//! 通用工具：字母表编码、原始数组文件、位数组。

pub mod alphabet;
pub mod arrayfile;
pub mod bitarray;
