//! 在线后缀列表构建（Rahmann 方法）。
//!
//! 从 n-1 到 0 逐个把后缀插入字典序链表：首字符首次出现走首尾表
//! （insert_new），special 字符总是插为类首（位置越小越靠前），普通
//! 符号则从上一个后缀 p+1 的位置出发沿链表行走，找到首字符同为 ch
//! 的邻居后对齐插入。五种方法只在行走策略上不同：
//!
//! - `L`：只向字典序小的方向走；
//! - `R`：只向字典序大的方向走;
//! - `minLR`：两个方向交替走，先到先得；
//! - `bothLR2`：两个方向都走到底，用两个锚点夹出插入位置（显式链表）；
//! - `bothLR`：同 bothLR2，但在 XOR 链表上增量行走（省一半内存）。
//!
//! `steps` 统计所有行走步数，用来对比各方法的实际代价。

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;

use crate::index::dll::{SuffixDLL, SuffixList, SuffixXorDLL};
use crate::util::alphabet::{chi, Alphabet};
use crate::util::arrayfile;

/// 行走策略。
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BuildMethod {
    L,
    R,
    MinLR,
    BothLR,
    BothLR2,
}

impl BuildMethod {
    pub const ALL: [BuildMethod; 5] = [
        BuildMethod::L,
        BuildMethod::R,
        BuildMethod::MinLR,
        BuildMethod::BothLR,
        BuildMethod::BothLR2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMethod::L => "L",
            BuildMethod::R => "R",
            BuildMethod::MinLR => "minLR",
            BuildMethod::BothLR => "bothLR",
            BuildMethod::BothLR2 => "bothLR2",
        }
    }
}

impl fmt::Display for BuildMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "L" => Ok(BuildMethod::L),
            "R" => Ok(BuildMethod::R),
            "minLR" => Ok(BuildMethod::MinLR),
            "bothLR" => Ok(BuildMethod::BothLR),
            "bothLR2" => Ok(BuildMethod::BothLR2),
            _ => anyhow::bail!("unknown construction method '{s}'"),
        }
    }
}

/// 构建结果：bothLR 用 XOR 表示，其余方法用显式表示。
pub enum SuffixTray {
    Explicit(SuffixDLL),
    Xor(SuffixXorDLL),
}

impl SuffixTray {
    pub fn as_list_mut(&mut self) -> &mut dyn SuffixList {
        match self {
            SuffixTray::Explicit(dll) => dll,
            SuffixTray::Xor(dll) => dll,
        }
    }

    pub fn to_pos(&mut self) -> Vec<i32> {
        self.as_list_mut().to_pos()
    }

    /// 按秩次序写出 pos 文件（大端 i32）。
    pub fn write_pos(&mut self, path: &Path) -> Result<()> {
        let list = self.as_list_mut();
        let mut w = arrayfile::IntWriter::create(path)?;
        if !list.is_empty() {
            list.reset_to_begin();
            w.write_i32(list.current())?;
            while list.has_next_up() {
                list.next_up();
                w.write_i32(list.current())?;
            }
        }
        w.finish()
    }
}

pub struct SuffixTrayBuilder<'a> {
    text: &'a [i8],
    alphabet: &'a Alphabet,
    steps: u64,
}

impl<'a> SuffixTrayBuilder<'a> {
    pub fn new(text: &'a [i8], alphabet: &'a Alphabet) -> Self {
        Self {
            text,
            alphabet,
            steps: 0,
        }
    }

    /// 累计行走步数（跨多次 build 累加）。
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn build(&mut self, method: BuildMethod) -> SuffixTray {
        match method {
            BuildMethod::BothLR => SuffixTray::Xor(self.build_xor()),
            _ => SuffixTray::Explicit(self.build_explicit(method)),
        }
    }

    // 显式链表：统一的分类 / 分派循环，方法只决定符号字符的行走函数
    fn build_explicit(&mut self, method: BuildMethod) -> SuffixDLL {
        let n = self.text.len();
        let mut dll = SuffixDLL::new(n);
        for p in (0..n as i32).rev() {
            let ch = self.text[p as usize];
            let c = chi(ch);
            if dll.first_pos(c) == -1 {
                dll.insert_new(c, p);
                self.steps += 1;
            } else if self.alphabet.is_special(ch) {
                // special: positions decrease, so always the new first
                dll.insert_as_first(c, p);
                self.steps += 1;
            } else {
                match method {
                    BuildMethod::L => self.walk_left(&mut dll, c, p),
                    BuildMethod::R => self.walk_right(&mut dll, c, p),
                    BuildMethod::MinLR => self.walk_min(&mut dll, c, p),
                    BuildMethod::BothLR2 => self.walk_both(&mut dll, c, p),
                    BuildMethod::BothLR => unreachable!("bothLR runs on the xor list"),
                }
            }
        }
        dll
    }

    /// 从 p+1 向字典序小的方向走，直到某个后缀的前一文本字符是 ch。
    fn walk_left(&mut self, dll: &mut SuffixDLL, c: usize, p: i32) {
        let ch = self.text[p as usize];
        let mut q = p + 1;
        self.steps += 1;
        loop {
            let prev = dll.prev_pos(q);
            if prev == -1 {
                break;
            }
            q = prev;
            if self.text[(q - 1) as usize] == ch {
                break;
            }
            self.steps += 1;
        }
        q -= 1;
        if self.text[q as usize] == ch && q != p {
            // insert after q, possibly as the new last of its class
            if dll.last_pos(c) == q {
                dll.insert_as_last(c, p);
            } else {
                let succ = dll.next_pos(q);
                dll.insert_between(q, succ, p);
            }
        } else {
            dll.insert_as_first(c, p);
        }
    }

    /// 镜像：向字典序大的方向走。
    fn walk_right(&mut self, dll: &mut SuffixDLL, c: usize, p: i32) {
        let ch = self.text[p as usize];
        let mut q = p + 1;
        self.steps += 1;
        loop {
            let next = dll.next_pos(q);
            if next == -1 {
                break;
            }
            q = next;
            if self.text[(q - 1) as usize] == ch {
                break;
            }
            self.steps += 1;
        }
        q -= 1;
        if self.text[q as usize] == ch && q != p {
            if dll.first_pos(c) == q {
                dll.insert_as_first(c, p);
            } else {
                let prev = dll.prev_pos(q);
                dll.insert_between(prev, q, p);
            }
        } else {
            dll.insert_as_last(c, p);
        }
    }

    /// 两个方向交替各走一步，哪边先找到就用哪边。
    fn walk_min(&mut self, dll: &mut SuffixDLL, c: usize, p: i32) {
        let ch = self.text[p as usize];
        let mut pup = p + 1;
        let mut pdown = p + 1;
        let found;
        loop {
            self.steps += 1;
            let lpp = dll.prev_pos(pup);
            if lpp == -1 {
                found = 1;
                break;
            }
            pup = lpp;
            if self.text[(pup - 1) as usize] == ch {
                found = 2;
                break;
            }
            self.steps += 1;
            let lsp = dll.next_pos(pdown);
            if lsp == -1 {
                found = 3;
                break;
            }
            pdown = lsp;
            if self.text[(pdown - 1) as usize] == ch {
                found = 4;
                break;
            }
        }
        pup -= 1;
        pdown -= 1;
        match found {
            1 => dll.insert_as_first(c, p),
            2 => {
                if dll.last_pos(c) == pup {
                    dll.insert_as_last(c, p);
                } else {
                    let succ = dll.next_pos(pup);
                    dll.insert_between(pup, succ, p);
                }
            }
            3 => dll.insert_as_last(c, p),
            4 => {
                if dll.first_pos(c) == pdown {
                    dll.insert_as_first(c, p);
                } else {
                    let prev = dll.prev_pos(pdown);
                    dll.insert_between(prev, pdown, p);
                }
            }
            _ => unreachable!(),
        }
    }

    /// 两个方向都走到底：同时拿到前后两个锚点再插入。
    fn walk_both(&mut self, dll: &mut SuffixDLL, c: usize, p: i32) {
        let ch = self.text[p as usize];
        let mut pup = p + 1;
        let mut pdown = p + 1;
        let mut foundup = 0;
        let mut founddown = 0;
        while founddown == 0 || foundup == 0 {
            if founddown == 0 {
                self.steps += 1;
                let lsp = dll.next_pos(pdown);
                if lsp == -1 {
                    founddown = 1;
                    break;
                }
                pdown = lsp;
                if self.text[(pdown - 1) as usize] == ch {
                    founddown = 2;
                }
            }
            if foundup == 0 {
                self.steps += 1;
                let lpp = dll.prev_pos(pup);
                if lpp == -1 {
                    foundup = 1;
                    break;
                }
                pup = lpp;
                if self.text[(pup - 1) as usize] == ch {
                    foundup = 2;
                }
            }
        }
        if founddown == 1 {
            dll.insert_as_last(c, p);
        } else if foundup == 1 {
            dll.insert_as_first(c, p);
        } else {
            dll.insert_between(pup - 1, pdown - 1, p);
        }
    }

    // XOR 链表：行走状态来自上一次插入留下的游标
    fn build_xor(&mut self) -> SuffixXorDLL {
        let n = self.text.len();
        let mut dll = SuffixXorDLL::new(n);
        for p in (0..n as i32).rev() {
            let ch = self.text[p as usize];
            let c = chi(ch);
            if dll.first_pos(c) == -1 {
                dll.insert_new(c, p);
                self.steps += 1;
            } else if self.alphabet.is_special(ch) {
                dll.insert_as_first(c, p);
                self.steps += 1;
            } else {
                self.walk_and_insert(&mut dll, c, p);
            }
        }
        dll
    }

    /// 双向行走并插入。上一轮插入的是后缀 p+1，所以游标正好落在
    /// p+1 上，(pred, succ) 就是行走所需的解码上下文。
    fn walk_and_insert(&mut self, dll: &mut SuffixXorDLL, c: usize, p: i32) {
        let ch = self.text[p as usize];
        let mut pup = dll.current();
        let mut pdn = pup;
        let mut ppred = dll.predecessor();
        let mut psucc = dll.successor();
        // lexicographically: ppred < pup == pdn < psucc
        let mut foundup = 0;
        let mut founddown = 0;
        while founddown == 0 || foundup == 0 {
            if founddown == 0 {
                self.steps += 1;
                let qdn = dll.link(pdn) ^ ppred;
                if qdn == -1 {
                    dll.insert_as_last(c, p);
                    return;
                }
                if self.text[(qdn - 1) as usize] == ch {
                    founddown = 2;
                }
                ppred = pdn;
                pdn = qdn;
            }
            if foundup == 0 {
                self.steps += 1;
                let qup = dll.link(pup) ^ psucc;
                if qup == -1 {
                    dll.insert_as_first(c, p);
                    return;
                }
                if self.text[(qup - 1) as usize] == ch {
                    foundup = 2;
                }
                psucc = pup;
                pup = qup;
            }
        }
        dll.insert_between(pup - 1, pdn - 1, p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::check;

    // 确定性 LCG，生成带通配符和分隔符结尾的随机编码文本
    fn make_text(n: usize, seed: u64) -> Vec<i8> {
        let mut state = seed;
        let mut text = Vec::with_capacity(n);
        for _ in 0..n - 1 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let r = (state >> 33) % 20;
            // mostly symbols, occasionally a wildcard
            text.push(if r < 19 { (r % 4) as i8 } else { 4 });
        }
        text.push(-1);
        text
    }

    fn naive_sa(text: &[i8], alphabet: &Alphabet) -> Vec<i32> {
        let mut pos: Vec<i32> = (0..text.len() as i32).collect();
        pos.sort_by(|&a, &b| check::suffixcmp(text, alphabet, a, b).cmp(&0));
        pos
    }

    #[test]
    fn all_methods_match_naive_sort() {
        let alphabet = Alphabet::dna();
        for seed in [1u64, 7, 42] {
            let text = make_text(200, seed);
            let expected = naive_sa(&text, &alphabet);
            for method in BuildMethod::ALL {
                let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
                let mut tray = builder.build(method);
                assert_eq!(tray.to_pos(), expected, "method {method} seed {seed}");
            }
        }
    }

    #[test]
    fn methods_agree_on_tiny_texts() {
        let alphabet = Alphabet::dna();
        // every text of length 5 over {0,1} with terminal separator
        for bits in 0u32..16 {
            let mut text: Vec<i8> = (0..4).map(|k| ((bits >> k) & 1) as i8).collect();
            text.push(-1);
            let mut reference = None;
            for method in BuildMethod::ALL {
                let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
                let pos = builder.build(method).to_pos();
                match &reference {
                    None => reference = Some(pos),
                    Some(r) => assert_eq!(&pos, r, "method {method} text {text:?}"),
                }
            }
        }
    }

    #[test]
    fn specials_are_ordered_by_position() {
        let alphabet = Alphabet::dna();
        // two wildcards and a separator; wildcards sort among themselves by position
        let text: Vec<i8> = vec![0, 4, 0, 4, -1];
        let expected = naive_sa(&text, &alphabet);
        for method in BuildMethod::ALL {
            let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
            assert_eq!(builder.build(method).to_pos(), expected, "method {method}");
        }
        // separator is lexicographically smallest
        assert_eq!(expected[0], 4);
    }

    #[test]
    fn step_counter_grows() {
        let alphabet = Alphabet::dna();
        let text = make_text(100, 3);
        let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
        builder.build(BuildMethod::L);
        assert!(builder.steps() >= 100);
    }

    #[test]
    fn single_character_text() {
        let alphabet = Alphabet::dna();
        let text = vec![-1i8];
        for method in BuildMethod::ALL {
            let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
            assert_eq!(builder.build(method).to_pos(), vec![0]);
        }
    }

    #[test]
    fn pos_file_round_trip() {
        let alphabet = Alphabet::dna();
        let text = make_text(64, 9);
        let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
        let mut tray = builder.build(BuildMethod::MinLR);
        let expected = tray.to_pos();

        let path = std::env::temp_dir().join("seqidx-builder-pos");
        tray.write_pos(&path).unwrap();
        assert_eq!(arrayfile::read_i32_array(&path).unwrap(), expected);
        std::fs::remove_file(&path).unwrap();
    }
}
