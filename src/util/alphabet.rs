//! 编码字母表：把 ASCII 序列映射为有符号编码字节，并给出字符分类。
//!
//! 编码值分为两类：
//! - **symbol**（普通符号）：按编码值参与字典序比较；
//! - **special**（通配符 / 分隔符）：值相同也不相等，比较时退回文本位置。
//!
//! 编码范围是有符号字节，分隔符固定为 -1，排在所有 symbol 之前
//! （查表时统一用 `chi = code + 128` 作为 0..256 的下标）。

/// 编码值到 0..256 表下标的映射。
#[inline]
pub fn chi(code: i8) -> usize {
    (code as i32 + 128) as usize
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum CharClass {
    Unused,
    Symbol,
    Wildcard,
    Separator,
}

/// 字母表：编码 / 解码表加上每个编码值的分类。
///
/// 实例持有全部状态，同一进程可以并存多个字母表（测试里经常这样用）。
pub struct Alphabet {
    name: &'static str,
    class: [CharClass; 256],
    encode: [i8; 256],
    known: [bool; 256],
    decode: [u8; 256],
    largest_symbol: i8,
}

impl Alphabet {
    /// 标准 DNA 字母表：A=0 C=1 G=2 T/U=3，通配符 4（N 等）与 5（'#'），
    /// 分隔符 -1。
    pub fn dna() -> Self {
        let mut a = Self::empty("dna");
        a.add_symbol(0, b"Aa");
        a.add_symbol(1, b"Cc");
        a.add_symbol(2, b"Gg");
        a.add_symbol(3, b"TtUu");
        a.add_wildcard(4, b"XxNnWwRrKkYySsMmBbHhDdVv");
        a.add_wildcard(5, b"#");
        a.set_separator(b'$');
        a.largest_symbol = 3;
        a
    }

    /// 数字字母表：'0'..'9' 映射为 0..9，分隔符 -1。
    pub fn numeric() -> Self {
        let mut a = Self::empty("numeric");
        for d in 0..10u8 {
            a.add_symbol(d as i8, &[b'0' + d]);
        }
        a.set_separator(b'$');
        a.largest_symbol = 9;
        a
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dna" => Some(Self::dna()),
            "numeric" => Some(Self::numeric()),
            _ => None,
        }
    }

    fn empty(name: &'static str) -> Self {
        Self {
            name,
            class: [CharClass::Unused; 256],
            encode: [SEPARATOR; 256],
            known: [false; 256],
            decode: [b'?'; 256],
            largest_symbol: -1,
        }
    }

    fn add_symbol(&mut self, code: i8, preimages: &[u8]) {
        self.class[chi(code)] = CharClass::Symbol;
        self.decode[chi(code)] = preimages[0];
        for &b in preimages {
            self.encode[b as usize] = code;
            self.known[b as usize] = true;
        }
    }

    fn add_wildcard(&mut self, code: i8, preimages: &[u8]) {
        self.class[chi(code)] = CharClass::Wildcard;
        self.decode[chi(code)] = preimages[0];
        for &b in preimages {
            self.encode[b as usize] = code;
            self.known[b as usize] = true;
        }
    }

    fn set_separator(&mut self, preimage: u8) {
        self.class[chi(SEPARATOR)] = CharClass::Separator;
        self.decode[chi(SEPARATOR)] = preimage;
        self.encode[preimage as usize] = SEPARATOR;
        self.known[preimage as usize] = true;
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 最大 symbol 编码；字母表规模 asize = largest_symbol + 1。
    pub fn largest_symbol(&self) -> i8 {
        self.largest_symbol
    }

    pub fn asize(&self) -> usize {
        (self.largest_symbol as i32 + 1) as usize
    }

    #[inline]
    pub fn is_symbol(&self, code: i8) -> bool {
        self.class[chi(code)] == CharClass::Symbol
    }

    #[inline]
    pub fn is_wildcard(&self, code: i8) -> bool {
        self.class[chi(code)] == CharClass::Wildcard
    }

    #[inline]
    pub fn is_separator(&self, code: i8) -> bool {
        self.class[chi(code)] == CharClass::Separator
    }

    /// special = 通配符或分隔符：比较时按文本位置而不是编码值。
    #[inline]
    pub fn is_special(&self, code: i8) -> bool {
        matches!(
            self.class[chi(code)],
            CharClass::Wildcard | CharClass::Separator
        )
    }

    /// ASCII 字节编码为内部码；未知字符归入第一个通配符。
    #[inline]
    pub fn encode(&self, b: u8) -> i8 {
        if self.known[b as usize] {
            self.encode[b as usize]
        } else {
            self.first_wildcard()
        }
    }

    fn first_wildcard(&self) -> i8 {
        for c in -128..=127i32 {
            if self.class[chi(c as i8)] == CharClass::Wildcard {
                return c as i8;
            }
        }
        SEPARATOR
    }

    /// 内部码解码回 ASCII（用于诊断输出）。
    #[inline]
    pub fn decode(&self, code: i8) -> u8 {
        self.decode[chi(code)]
    }
}

/// 分隔符编码，固定为 -1。
pub const SEPARATOR: i8 = -1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_classification() {
        let a = Alphabet::dna();
        assert!(a.is_symbol(0));
        assert!(a.is_symbol(3));
        assert!(!a.is_symbol(4));
        assert!(a.is_wildcard(4));
        assert!(a.is_special(4));
        assert!(a.is_separator(SEPARATOR));
        assert!(a.is_special(SEPARATOR));
        assert_eq!(a.largest_symbol(), 3);
        assert_eq!(a.asize(), 4);
    }

    #[test]
    fn dna_encode_decode() {
        let a = Alphabet::dna();
        assert_eq!(a.encode(b'A'), 0);
        assert_eq!(a.encode(b'a'), 0);
        assert_eq!(a.encode(b'c'), 1);
        assert_eq!(a.encode(b'U'), 3);
        assert_eq!(a.encode(b'N'), 4);
        // unknown characters map to the wildcard
        assert_eq!(a.encode(b'Q'), 4);
        assert_eq!(a.encode(b'$'), SEPARATOR);
        assert_eq!(a.decode(0), b'A');
        assert_eq!(a.decode(SEPARATOR), b'$');
    }

    #[test]
    fn numeric_maps_digits() {
        let a = Alphabet::numeric();
        assert_eq!(a.encode(b'0'), 0);
        assert_eq!(a.encode(b'9'), 9);
        assert!(a.is_symbol(9));
        assert!(a.is_separator(a.encode(b'$')));
        assert_eq!(a.asize(), 10);
    }

    #[test]
    fn chi_covers_signed_range() {
        assert_eq!(chi(-128), 0);
        assert_eq!(chi(-1), 127);
        assert_eq!(chi(0), 128);
        assert_eq!(chi(127), 255);
    }
}
