//! 后缀序检查：逐对比较相邻后缀，报告所有错位而不是遇错即停。
//!
//! 比较规则：symbol 按编码值比较，special（通配符 / 分隔符）值相同时
//! 按文本位置比较，位置小的在前。这保证所有后缀两两可分，后缀比较
//! 一定在文本末尾的分隔符处终止。

use crate::index::dll::SuffixList;
use crate::util::alphabet::Alphabet;

/// 比较文本位置 i、j 处的单个字符。
///
/// 返回值 <0 / 0 / >0 对应小于 / 相等 / 大于；special 字符编码相同时
/// 退回 i - j。
#[inline]
pub fn scmp(text: &[i8], alphabet: &Alphabet, i: i32, j: i32) -> i32 {
    let d = text[i as usize] as i32 - text[j as usize] as i32;
    if d != 0 || alphabet.is_symbol(text[i as usize]) {
        d
    } else {
        i - j
    }
}

/// 按字典序比较后缀 i 和后缀 j；i == j 时返回 0。
pub fn suffixcmp(text: &[i8], alphabet: &Alphabet, i: i32, j: i32) -> i32 {
    if i == j {
        return 0;
    }
    let mut off = 0;
    loop {
        let c = scmp(text, alphabet, i + off, j + off);
        if c != 0 {
            return c;
        }
        off += 1;
    }
}

/// 后缀 i、j 的最长公共前缀长度，h 为已知下界（Kasai 递推用）。
pub fn suffixlcp(text: &[i8], alphabet: &Alphabet, i: i32, j: i32, h: i32) -> i32 {
    if i == j {
        return text.len() as i32 - i;
    }
    let mut off = h;
    while scmp(text, alphabet, i + off, j + off) == 0 {
        off += 1;
    }
    off
}

/// 校验结果位集：bit 0 = 排序错误，bit 1 = 数量错误。
pub const CHECK_SORT_ERROR: i32 = 1;
pub const CHECK_COUNT_ERROR: i32 = 2;

/// 校验链表中的后缀次序和数量。
pub fn check_list(text: &[i8], alphabet: &Alphabet, list: &mut dyn SuffixList) -> i32 {
    let n = text.len();
    if list.lowest_chi() >= 256 {
        if n == 0 {
            return 0;
        }
        eprintln!("suffixcheck: no first character found, but |s| != 0");
        return CHECK_COUNT_ERROR;
    }
    list.reset_to_begin();
    let mut p = list.current();
    let mut nn = 1usize;
    let mut ret = 0;
    while list.has_next_up() {
        list.next_up();
        let nextp = list.current();
        let cmp = suffixcmp(text, alphabet, p, nextp);
        if cmp >= 0 {
            eprintln!(
                "suffixcheck: sorting error at ranks {}, {}; pos {}, {}; text {}, {}; cmp {}",
                nn - 1,
                nn,
                p,
                nextp,
                text[p as usize],
                text[nextp as usize],
                cmp
            );
            ret = CHECK_SORT_ERROR;
        }
        p = nextp;
        nn += 1;
    }
    if nn != n {
        eprintln!("suffixcheck: missing some suffixes; have {nn} / {n}");
        ret += CHECK_COUNT_ERROR;
    }
    ret
}

/// 校验一个已线性化（或从磁盘读回）的 pos 数组。
pub fn check_pos(text: &[i8], alphabet: &Alphabet, pos: &[i32]) -> i32 {
    let n = text.len();
    let mut ret = 0;
    if pos.is_empty() {
        if n == 0 {
            return 0;
        }
        eprintln!("suffixcheck: missing some suffixes; have 0 / {n}");
        return CHECK_COUNT_ERROR;
    }
    for (r, w) in pos.windows(2).enumerate() {
        let (p, nextp) = (w[0], w[1]);
        let cmp = suffixcmp(text, alphabet, p, nextp);
        if cmp >= 0 {
            eprintln!(
                "suffixcheck: sorting error at ranks {}, {}; pos {}, {}; text {}, {}; cmp {}",
                r,
                r + 1,
                p,
                nextp,
                text[p as usize],
                text[nextp as usize],
                cmp
            );
            ret = CHECK_SORT_ERROR;
        }
    }
    if pos.len() != n {
        eprintln!("suffixcheck: missing some suffixes; have {} / {n}", pos.len());
        ret += CHECK_COUNT_ERROR;
    }
    ret
}
