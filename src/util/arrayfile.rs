//! 原始数组文件读写。
//!
//! 所有索引文件（pos / lcp / qbck / qpos / 位数组）都是无头部的
//! 定长整数数组，统一采用大端字节序，方便用十六进制工具直接查看。

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// 大端 i32 数组写入器，带缓冲。
pub struct IntWriter {
    inner: BufWriter<File>,
}

impl IntWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self {
            inner: BufWriter::new(file),
        })
    }

    #[inline]
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    #[inline]
    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    #[inline]
    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.inner.write_all(&[v])?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// 一次性写出整个 i32 切片。
pub fn write_i32_array(path: &Path, values: &[i32]) -> Result<()> {
    let mut w = IntWriter::create(path)?;
    for &v in values {
        w.write_i32(v)?;
    }
    w.finish()
}

/// 读回整个文件并按大端 i32 解码。
pub fn read_i32_array(path: &Path) -> Result<Vec<i32>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    anyhow::ensure!(
        bytes.len() % 4 == 0,
        "{}: length {} is not a multiple of 4",
        path.display(),
        bytes.len()
    );
    Ok(bytes
        .chunks_exact(4)
        .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// 读回整个文件并按大端 u16 解码。
pub fn read_u16_array(path: &Path) -> Result<Vec<u16>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    anyhow::ensure!(
        bytes.len() % 2 == 0,
        "{}: length {} is not a multiple of 2",
        path.display(),
        bytes.len()
    );
    Ok(bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect())
}

pub fn read_u8_array(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(bytes)
}

/// 读取有符号字节序列（编码后的文本文件）。
pub fn read_i8_array(path: &Path) -> Result<Vec<i8>> {
    let bytes = read_u8_array(path)?;
    Ok(bytes.into_iter().map(|b| b as i8).collect())
}

pub fn write_i8_array(path: &Path, values: &[i8]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for &v in values {
        w.write_all(&[v as u8])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn tmp(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("seqidx-arrayfile-{name}"))
    }

    #[test]
    fn i32_round_trip_is_big_endian() {
        let path = tmp("i32");
        let values = [0, 1, -1, 0x0102_0304, i32::MIN, i32::MAX];
        write_i32_array(&path, &values).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[4..8], &[0, 0, 0, 1]);
        assert_eq!(&raw[8..12], &[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(&raw[12..16], &[1, 2, 3, 4]);

        assert_eq!(read_i32_array(&path).unwrap(), values);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn mixed_width_writer() {
        let path = tmp("mixed");
        let mut w = IntWriter::create(&path).unwrap();
        w.write_u16(0xbeef).unwrap();
        w.write_u8(0x7f).unwrap();
        w.finish().unwrap();
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(raw, vec![0xbe, 0xef, 0x7f]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn truncated_i32_file_is_an_error() {
        let path = tmp("trunc");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();
        assert!(read_i32_array(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
