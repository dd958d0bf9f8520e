use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::index::dll::SuffixList;
use crate::util::alphabet::chi;

/// 后继式 BWT 索引：
/// - c[chi] = 编码 < chi 的字符在文本中的累计个数（排好序的首列中
///   该字符块的起始行）；
/// - e = 首列本身，即文本所有字符按字典序排列（可由 c 推出，保留它
///   是为了 O(1) 取行首字符）；
/// - el = 后继映射：e 的第 i 行对应某个文本出现，el[i] 是该出现在
///   文本中的下一个字符所在的行。el 在每个字符块内部严格递增，
///   整体是 0..n 的双射。
#[derive(Debug, Serialize, Deserialize)]
pub struct BwtIndex {
    c: Vec<i32>,
    e: Vec<i8>,
    el: Vec<i32>,
}

impl BwtIndex {
    /// 从后缀链表构建：沿秩次序扫一遍，同时得到首列计数和 BWT 列。
    pub fn from_list(list: &mut dyn SuffixList, text: &[i8]) -> Self {
        let mut histo = [0i32; 256];
        let mut bwt = Vec::with_capacity(text.len());
        if !list.is_empty() {
            list.reset_to_begin();
            loop {
                let p = list.current() as usize;
                histo[chi(text[p])] += 1;
                bwt.push(if p > 0 { text[p - 1] } else { text[text.len() - 1] });
                if !list.has_next_up() {
                    break;
                }
                list.next_up();
            }
        }
        Self::from_parts(histo, &bwt)
    }

    /// 从已线性化的 pos 数组构建。
    pub fn from_pos(pos: &[i32], text: &[i8]) -> Self {
        let mut histo = [0i32; 256];
        let mut bwt = Vec::with_capacity(pos.len());
        for &p in pos {
            let p = p as usize;
            histo[chi(text[p])] += 1;
            bwt.push(if p > 0 { text[p - 1] } else { text[text.len() - 1] });
        }
        Self::from_parts(histo, &bwt)
    }

    /// 只有 BWT 列时也能重建整个索引（首列是 BWT 列的重排）。
    pub fn from_bwt(bwt: &[i8]) -> Self {
        let mut histo = [0i32; 256];
        for &b in bwt {
            histo[chi(b)] += 1;
        }
        Self::from_parts(histo, bwt)
    }

    fn from_parts(histo: [i32; 256], bwt: &[i8]) -> Self {
        // exclusive prefix sums
        let mut c = vec![0i32; 256];
        for i in 1..256 {
            c[i] = c[i - 1] + histo[i - 1];
        }
        // first column from the block boundaries
        let n = bwt.len();
        let mut e = vec![0i8; n];
        for i in 0..256 {
            let start = c[i] as usize;
            let end = if i + 1 < 256 { c[i + 1] as usize } else { n };
            for slot in &mut e[start..end] {
                *slot = (i as i32 - 128) as i8;
            }
        }
        // stable scatter of the bwt column: el[c[chi] + seen] = r
        let mut el = vec![0i32; n];
        let mut counter = [0i32; 256];
        for (r, &b) in bwt.iter().enumerate() {
            let ci = chi(b);
            el[(c[ci] + counter[ci]) as usize] = r as i32;
            counter[ci] += 1;
        }
        Self { c, e, el }
    }

    pub fn len(&self) -> usize {
        self.e.len()
    }

    pub fn is_empty(&self) -> bool {
        self.e.is_empty()
    }

    /// 字符块在首列中的起始行。
    pub fn first_row(&self, code: i8) -> i32 {
        self.c[chi(code)]
    }

    pub fn char_at(&self, row: i32) -> i8 {
        self.e[row as usize]
    }

    pub fn successor(&self, row: i32) -> i32 {
        self.el[row as usize]
    }

    pub fn c_table(&self) -> &[i32] {
        &self.c
    }

    pub fn first_column(&self) -> &[i8] {
        &self.e
    }

    pub fn successor_table(&self) -> &[i32] {
        &self.el
    }

    /// 反向搜索：从查询串末字符向前，每步把闭区间 [start, end] 收窄到
    /// 后继仍落在旧区间里的行。el 在字符块内单调，只需从两端掐掉
    /// 越界的行；区间一旦为空立即返回 0。
    ///
    /// 返回查询串的出现次数。
    pub fn find(&self, query: &[i8]) -> usize {
        let n = self.len() as i32;
        if n == 0 {
            return 0;
        }
        let mut start1 = 0i32;
        let mut end1 = n - 1;
        for &q in query.iter().rev() {
            let ci = chi(q);
            let mut start2 = self.c[ci];
            let mut end2 = if ci + 1 < 256 { self.c[ci + 1] - 1 } else { n - 1 };
            while start2 <= end2 && self.el[start2 as usize] < start1 {
                start2 += 1;
            }
            while end2 >= start2 && self.el[end2 as usize] > end1 {
                end2 -= 1;
            }
            if start2 > end2 {
                return 0;
            }
            start1 = start2;
            end1 = end2;
        }
        (end1 - start1 + 1) as usize
    }

    /// 沿 el 步进还原文本。要求原文本以分隔符结尾（秩 0 的行就是那个
    /// 分隔符后缀），否则起点未知。
    pub fn reconstruct(&self) -> Vec<i8> {
        let n = self.len();
        let mut out = Vec::with_capacity(n);
        let mut row = 0i32;
        for _ in 0..n {
            row = self.el[row as usize];
            out.push(self.e[row as usize]);
        }
        out
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let mut f = std::fs::File::create(path)?;
        bincode::serialize_into(&mut f, self)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        let idx: Self = bincode::deserialize_from(f)?;
        Ok(idx)
    }
}
