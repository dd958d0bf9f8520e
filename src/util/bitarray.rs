//! 简单位数组，配套稀疏的磁盘格式。
//!
//! 文件布局：先写一个大端 i32 表示位数组长度（位数），随后按升序写出
//! 每个置位下标（大端 i32）。位数组通常很稀疏（比如非空 q-gram 桶的
//! 筛选），这种格式比原始位图紧凑得多。

use std::path::Path;

use anyhow::Result;

use crate::util::arrayfile;

pub struct BitArray {
    words: Vec<u64>,
    len: usize,
}

impl BitArray {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0u64; (len + 63) / 64],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn set(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.words[i / 64] |= 1u64 << (i % 64);
    }

    #[inline]
    pub fn clear(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.words[i / 64] &= !(1u64 << (i % 64));
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    /// 置位总数。
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// 升序返回所有置位下标。
    pub fn ones(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.cardinality());
        for (wi, &w) in self.words.iter().enumerate() {
            let mut w = w;
            while w != 0 {
                let b = w.trailing_zeros() as usize;
                out.push(wi * 64 + b);
                w &= w - 1;
            }
        }
        out
    }

    /// 写出稀疏文件：长度 + 升序置位下标。
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let mut w = arrayfile::IntWriter::create(path)?;
        w.write_i32(self.len as i32)?;
        for i in self.ones() {
            w.write_i32(i as i32)?;
        }
        w.finish()
    }

    pub fn read_from_file(path: &Path) -> Result<Self> {
        let values = arrayfile::read_i32_array(path)?;
        anyhow::ensure!(!values.is_empty(), "{}: missing length word", path.display());
        let len = values[0];
        anyhow::ensure!(len >= 0, "{}: negative bit length {}", path.display(), len);
        let mut bits = Self::new(len as usize);
        for &i in &values[1..] {
            anyhow::ensure!(
                (0..len).contains(&i),
                "{}: bit index {} out of range 0..{}",
                path.display(),
                i,
                len
            );
            bits.set(i as usize);
        }
        Ok(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let mut b = BitArray::new(130);
        assert!(!b.get(0));
        b.set(0);
        b.set(64);
        b.set(129);
        assert!(b.get(0));
        assert!(b.get(64));
        assert!(b.get(129));
        assert!(!b.get(1));
        assert_eq!(b.cardinality(), 3);
        b.clear(64);
        assert!(!b.get(64));
        assert_eq!(b.ones(), vec![0, 129]);
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join("seqidx-bitarray-rt");
        let mut b = BitArray::new(1000);
        for i in [3usize, 63, 64, 65, 500, 999] {
            b.set(i);
        }
        b.write_to_file(&path).unwrap();

        let raw = crate::util::arrayfile::read_i32_array(&path).unwrap();
        assert_eq!(raw[0], 1000);
        assert_eq!(&raw[1..], &[3, 63, 64, 65, 500, 999]);

        let back = BitArray::read_from_file(&path).unwrap();
        assert_eq!(back.len(), 1000);
        assert_eq!(back.ones(), b.ones());
        std::fs::remove_file(&path).unwrap();
    }
}
