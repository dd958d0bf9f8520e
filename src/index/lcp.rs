//! LCP 数组：Kasai 算法 + 多字节宽度的磁盘格式。
//!
//! 计算按文本位置顺序进行（h 每步最多减一，整体线性），结果以位置为
//! 键存进缓冲，写盘时再沿链表按秩次序读出。
//!
//! 磁盘格式三种宽度：
//! - lcp4：每项大端 i32，无例外表；
//! - lcp2 + lcp2x：每项 u16，值 >= 65535 时写全 1 哨兵，并往例外表
//!   追加 (rank: i32, value: i32)；
//! - lcp1 + lcp1x：每项 u8，阈值 255，同上。
//!
//! 例外表按 rank 递增写出，读取方顺序合并即可还原。

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::index::check;
use crate::index::dll::SuffixDLL;
use crate::util::alphabet::Alphabet;
use crate::util::arrayfile::IntWriter;

pub const LCP1: u8 = 1;
pub const LCP2: u8 = 2;
pub const LCP4: u8 = 4;

/// 计算过程中顺带收集的统计量。
#[derive(Clone, Copy, Default, Debug)]
pub struct LcpInfo {
    /// 最大 LCP 值。
    pub max_lcp: i32,
    /// 1 字节格式的例外个数（值 >= 255）。
    pub lcp1_exceptions: i32,
    /// 2 字节格式的例外个数（值 >= 65535）。
    pub lcp2_exceptions: i32,
}

/// Kasai 算法：对每个文本位置 p 求 lcp(pred(p), p)。
///
/// 返回以位置为键的缓冲（秩 0 的后缀记 0）和统计量。只支持显式链表；
/// XOR 表示缺少随机可读的前驱指针。
pub fn compute(text: &[i8], alphabet: &Alphabet, dll: &SuffixDLL) -> (Vec<i32>, LcpInfo) {
    let n = text.len();
    let mut buf = vec![0i32; n];
    let mut info = LcpInfo::default();
    let mut h = 0i32;
    for p in 0..n as i32 {
        let prev = dll.prev_pos(p);
        if prev != -1 {
            h = check::suffixlcp(text, alphabet, prev, p, h);
        } else {
            h = 0;
        }
        if h > info.max_lcp {
            info.max_lcp = h;
        }
        buf[p as usize] = h;
        if h >= 255 {
            info.lcp1_exceptions += 1;
        }
        if h >= 65535 {
            info.lcp2_exceptions += 1;
        }
        if h > 0 {
            h -= 1;
        }
    }
    (buf, info)
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", base.display(), suffix))
}

// 窄格式的主文件和例外表成对出现
struct NarrowWriter {
    main: IntWriter,
    exceptions: IntWriter,
}

/// 按 flags（LCP1 | LCP2 | LCP4 的组合）写出所选宽度的 lcp 文件。
///
/// `base` 是 lcp4 文件的完整路径；窄格式在其后追加 "1"/"2"/"1x"/"2x"。
pub fn write_files(dll: &SuffixDLL, buf: &[i32], flags: u8, base: &Path) -> Result<()> {
    use crate::index::dll::SuffixList;

    let mut f4 = if flags & LCP4 != 0 {
        Some(IntWriter::create(base)?)
    } else {
        None
    };
    let mut f2 = if flags & LCP2 != 0 {
        Some(NarrowWriter {
            main: IntWriter::create(&with_suffix(base, "2"))?,
            exceptions: IntWriter::create(&with_suffix(base, "2x"))?,
        })
    } else {
        None
    };
    let mut f1 = if flags & LCP1 != 0 {
        Some(NarrowWriter {
            main: IntWriter::create(&with_suffix(base, "1"))?,
            exceptions: IntWriter::create(&with_suffix(base, "1x"))?,
        })
    } else {
        None
    };

    let chi = dll.lowest_chi();
    let mut p = if chi < 256 { dll.first_pos(chi) } else { -1 };
    let mut r = 0i32;
    while p != -1 {
        let h = buf[p as usize];
        debug_assert!(h >= 0);
        if let Some(w) = f4.as_mut() {
            w.write_i32(h)?;
        }
        if let Some(w) = f2.as_mut() {
            if h >= 65535 {
                w.main.write_u16(u16::MAX)?;
                w.exceptions.write_i32(r)?;
                w.exceptions.write_i32(h)?;
            } else {
                w.main.write_u16(h as u16)?;
            }
        }
        if let Some(w) = f1.as_mut() {
            if h >= 255 {
                w.main.write_u8(u8::MAX)?;
                w.exceptions.write_i32(r)?;
                w.exceptions.write_i32(h)?;
            } else {
                w.main.write_u8(h as u8)?;
            }
        }
        p = dll.next_pos(p);
        r += 1;
    }

    if let Some(w) = f4 {
        w.finish()?;
    }
    if let Some(w) = f2 {
        w.main.finish()?;
        w.exceptions.finish()?;
    }
    if let Some(w) = f1 {
        w.main.finish()?;
        w.exceptions.finish()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::builder::{BuildMethod, SuffixTray, SuffixTrayBuilder};
    use crate::index::dll::SuffixList;
    use crate::util::arrayfile;

    fn build_explicit(text: &[i8], alphabet: &Alphabet) -> SuffixDLL {
        let mut builder = SuffixTrayBuilder::new(text, alphabet);
        match builder.build(BuildMethod::MinLR) {
            SuffixTray::Explicit(dll) => dll,
            SuffixTray::Xor(_) => unreachable!(),
        }
    }

    // 逐字符数出来的参考 LCP
    fn naive_lcp(text: &[i8], alphabet: &Alphabet, pos: &[i32]) -> Vec<i32> {
        let mut lcp = vec![0i32; pos.len()];
        for r in 1..pos.len() {
            lcp[r] = check::suffixlcp(text, alphabet, pos[r - 1], pos[r], 0);
        }
        lcp
    }

    #[test]
    fn kasai_matches_naive() {
        let a = Alphabet::dna();
        let mut state = 12345u64;
        let mut text: Vec<i8> = (0..300)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 33) % 4) as i8
            })
            .collect();
        text.push(-1);

        let mut dll = build_explicit(&text, &a);
        let (buf, info) = compute(&text, &a, &dll);
        let pos = dll.to_pos();
        let expected = naive_lcp(&text, &a, &pos);
        let got: Vec<i32> = pos.iter().map(|&p| buf[p as usize]).collect();
        assert_eq!(got, expected);
        assert_eq!(info.max_lcp, *expected.iter().max().unwrap());
    }

    #[test]
    fn rank_zero_gets_zero() {
        let a = Alphabet::dna();
        let text: Vec<i8> = vec![0, 0, 0, -1];
        let mut dll = build_explicit(&text, &a);
        let (buf, _) = compute(&text, &a, &dll);
        let pos = dll.to_pos();
        assert_eq!(buf[pos[0] as usize], 0);
    }

    #[test]
    fn lcp4_file_is_rank_ordered() {
        let a = Alphabet::dna();
        let text: Vec<i8> = vec![0, 1, 0, 1, 0, 1, -1];
        let mut dll = build_explicit(&text, &a);
        let (buf, _) = compute(&text, &a, &dll);

        let base = std::env::temp_dir().join("seqidx-lcp4");
        write_files(&dll, &buf, LCP4, &base).unwrap();
        let on_disk = arrayfile::read_i32_array(&base).unwrap();

        let pos = dll.to_pos();
        let expected: Vec<i32> = pos.iter().map(|&p| buf[p as usize]).collect();
        assert_eq!(on_disk, expected);
        std::fs::remove_file(&base).unwrap();
    }

    #[test]
    fn narrow_formats_write_exceptions() {
        let a = Alphabet::dna();
        // run of 300 zeros: plenty of lcp values above the 1-byte threshold
        let mut text = vec![0i8; 300];
        text.push(-1);
        let mut dll = build_explicit(&text, &a);
        let (buf, info) = compute(&text, &a, &dll);
        assert!(info.lcp1_exceptions > 0);
        assert_eq!(info.lcp2_exceptions, 0);
        assert_eq!(info.max_lcp, 299);

        let base = std::env::temp_dir().join("seqidx-lcp-narrow");
        write_files(&dll, &buf, LCP1 | LCP2, &base).unwrap();

        let pos = dll.to_pos();
        let expected: Vec<i32> = pos.iter().map(|&p| buf[p as usize]).collect();

        // decode lcp1 + lcp1x
        let narrow = arrayfile::read_u8_array(&with_suffix(&base, "1")).unwrap();
        let x = arrayfile::read_i32_array(&with_suffix(&base, "1x")).unwrap();
        assert_eq!(x.len() as i32 / 2, info.lcp1_exceptions);
        let mut decoded: Vec<i32> = narrow.iter().map(|&b| b as i32).collect();
        for pair in x.chunks_exact(2) {
            assert_eq!(decoded[pair[0] as usize], 255);
            decoded[pair[0] as usize] = pair[1];
        }
        assert_eq!(decoded, expected);

        // lcp2 has no exceptions here, values fit into u16
        let wide = arrayfile::read_u16_array(&with_suffix(&base, "2")).unwrap();
        let decoded2: Vec<i32> = wide.iter().map(|&v| v as i32).collect();
        assert_eq!(decoded2, expected);
        let x2 = arrayfile::read_i32_array(&with_suffix(&base, "2x")).unwrap();
        assert!(x2.is_empty());

        for suffix in ["1", "1x", "2", "2x"] {
            std::fs::remove_file(with_suffix(&base, suffix)).unwrap();
        }
    }
}
