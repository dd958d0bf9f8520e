//! q-gram 编码与桶式 q-gram 索引。
//!
//! q-gram 编码把长度 q 的符号窗口视为 asize 进制数；含 special 字符的
//! 窗口没有编码，构建时直接跳过。索引分两遍计数扫描：先数每个桶的
//! 大小做前缀和（qbck），再把起始位置散射进 qpos。

use std::path::Path;

use anyhow::Result;

use crate::util::arrayfile;
use crate::util::bitarray::BitArray;

/// 基 asize 的 q-gram 编码器。
pub struct QGramCoder {
    q: usize,
    asize: usize,
    // asize^(q-1)，滚动更新时去掉最高位用
    modulus: i32,
    num_qgrams: i32,
}

impl QGramCoder {
    pub fn new(q: usize, asize: usize) -> Result<Self> {
        anyhow::ensure!(q > 0, "need q > 0, got {q}");
        anyhow::ensure!(asize > 0, "need asize > 0, got {asize}");
        let mut power: i64 = 1;
        for _ in 0..q - 1 {
            power *= asize as i64;
            anyhow::ensure!(
                power * asize as i64 <= i32::MAX as i64,
                "asize^q = {asize}^{q} exceeds the code range"
            );
        }
        Ok(Self {
            q,
            asize,
            modulus: power as i32,
            num_qgrams: power as i32 * asize as i32,
        })
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn asize(&self) -> usize {
        self.asize
    }

    /// 不同 q-gram 的总数，asize^q。
    pub fn num_qgrams(&self) -> i32 {
        self.num_qgrams
    }

    /// 窗口的 q-gram 编码。窗口里偏移 i 处出现非法字符（special 或
    /// 越界编码）时返回 -1-i。
    pub fn code(&self, window: &[i8]) -> i32 {
        debug_assert!(window.len() >= self.q);
        let mut c = 0i32;
        for (i, &b) in window[..self.q].iter().enumerate() {
            if b < 0 || b as usize >= self.asize {
                return -1 - i as i32;
            }
            c %= self.modulus;
            c = c * self.asize as i32 + b as i32;
        }
        c
    }

    /// 滚动更新：移出最高位，移入 next。next 非法时返回 -q。
    pub fn code_update(&self, old: i32, next: i8) -> i32 {
        debug_assert!((0..self.num_qgrams).contains(&old));
        if next < 0 || next as usize >= self.asize {
            return -(self.q as i32);
        }
        (old % self.modulus) * self.asize as i32 + next as i32
    }

    /// 编码还原成 q-gram 字节串（诊断输出用）。
    pub fn qgram(&self, mut qcode: i32) -> Vec<i8> {
        let mut out = vec![0i8; self.q];
        for slot in out.iter_mut().rev() {
            *slot = (qcode % self.asize as i32) as i8;
            qcode /= self.asize as i32;
        }
        out
    }

    /// 对文本里每个合法 q-gram 窗口调用 emit(起始位置, 编码)。
    /// 连续合法段内用滚动更新，遇到非法字符跳到其后重新起步。
    fn scan<F: FnMut(usize, i32)>(&self, text: &[i8], mut emit: F) {
        let q = self.q;
        let n = text.len();
        let mut i = 0;
        while i + q <= n {
            let c = self.code(&text[i..i + q]);
            if c < 0 {
                // skip past the offending character
                i += (-c) as usize;
                continue;
            }
            emit(i, c);
            let mut code = c;
            loop {
                i += 1;
                if i + q > n {
                    break;
                }
                code = self.code_update(code, text[i + q - 1]);
                if code < 0 {
                    break;
                }
                emit(i, code);
            }
        }
    }
}

/// 桶式 q-gram 位置索引。
///
/// `bck` 长 asize^q + 1，bck[c]..bck[c+1] 是编码 c 的桶在 `pos` 里的
/// 区间；`pos` 按桶分组存 q-gram 的起始位置，桶内位置递增。
pub struct QGramIndex {
    bck: Vec<i32>,
    pos: Vec<i32>,
}

impl QGramIndex {
    pub fn build(coder: &QGramCoder, text: &[i8]) -> Self {
        let num = coder.num_qgrams() as usize;
        let mut bck = vec![0i32; num + 1];
        coder.scan(text, |_, c| bck[c as usize + 1] += 1);
        for i in 1..=num {
            bck[i] += bck[i - 1];
        }
        let total = bck[num] as usize;
        let mut pos = vec![0i32; total];
        let mut cursor = bck.clone();
        coder.scan(text, |p, c| {
            pos[cursor[c as usize] as usize] = p as i32;
            cursor[c as usize] += 1;
        });
        Self { bck, pos }
    }

    /// 编码 c 的所有起始位置（递增）。
    pub fn bucket(&self, code: i32) -> &[i32] {
        let c = code as usize;
        &self.pos[self.bck[c] as usize..self.bck[c + 1] as usize]
    }

    pub fn bucket_starts(&self) -> &[i32] {
        &self.bck
    }

    pub fn positions(&self) -> &[i32] {
        &self.pos
    }

    /// 非空桶的筛选位数组（qgram 匹配时先过这一层）。
    pub fn nonempty_buckets(&self) -> BitArray {
        let num = self.bck.len() - 1;
        let mut bits = BitArray::new(num);
        for c in 0..num {
            if self.bck[c + 1] > self.bck[c] {
                bits.set(c);
            }
        }
        bits
    }

    pub fn write_files(&self, qbck: &Path, qpos: &Path) -> Result<()> {
        arrayfile::write_i32_array(qbck, &self.bck)?;
        arrayfile::write_i32_array(qpos, &self.pos)?;
        Ok(())
    }
}
