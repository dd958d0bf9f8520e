//! 字典序后缀双向链表的两种表示。
//!
//! `SuffixDLL` 显式存 prev / next 两个数组；`SuffixXorDLL` 每个位置只存
//! `prev ^ next` 一个字（XOR 编码），换取一半内存，但遍历必须携带
//! "从哪里来" 的上下文才能解出下一步。两种表示都维护每个首字符的
//! 首 / 尾位置表（下标为 chi = code + 128），链表头尾用 -1 哨兵，
//! 哨兵参与 XOR 运算同样自洽。
//!
//! 列表内部维护 `(predecessor, current, successor)` 游标状态：每次插入
//! 都会刷新它，XOR 表示的增量行走（walk-and-insert）完全依赖这组状态。

/// 两种链表表示的公共操作面：插入原语加按秩遍历游标。
///
/// 构建器按首字符分类后调用插入原语；检查器、LCP、BWT 通过游标按
/// 字典序访问后缀。
pub trait SuffixList {
    /// 列表容量，即文本长度。
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 把 i 插到相邻的 p1、p2 之间（p1 在前，-1 表示边界）。
    fn insert_between(&mut self, p1: i32, p2: i32, i: i32);

    /// 插入字符 chi 的第一个出现：在首尾表里向两侧线性扫描，找到
    /// 相邻非空字符类的尾 / 首作为锚点。
    fn insert_new(&mut self, chi: usize, i: i32);

    /// 把 i 插成字符类 chi 的新首元素。
    fn insert_as_first(&mut self, chi: usize, i: i32);

    /// 把 i 插成字符类 chi 的新尾元素。
    fn insert_as_last(&mut self, chi: usize, i: i32);

    /// 字符类 chi 当前的首位置，-1 表示该类为空。
    fn first_pos(&self, chi: usize) -> i32;

    fn last_pos(&self, chi: usize) -> i32;

    /// 最小的非空 chi；全空时返回 256。
    fn lowest_chi(&self) -> usize;

    /// 游标：当前文本位置（-1 表示空表）。
    fn current(&self) -> i32;

    /// 游标：字典序前驱位置。
    fn predecessor(&self) -> i32;

    /// 游标：字典序后继位置。
    fn successor(&self) -> i32;

    /// 游标回到字典序最小的后缀。
    fn reset_to_begin(&mut self);

    fn has_next_up(&self) -> bool {
        self.successor() != -1
    }

    fn next_up(&mut self);

    fn has_next_down(&self) -> bool {
        self.predecessor() != -1
    }

    fn next_down(&mut self);

    /// 按秩次序线性化成 pos 数组（即后缀数组）。
    fn to_pos(&mut self) -> Vec<i32> {
        let mut pos = Vec::with_capacity(self.len());
        if self.len() == 0 {
            return pos;
        }
        self.reset_to_begin();
        pos.push(self.current());
        while self.has_next_up() {
            self.next_up();
            pos.push(self.current());
        }
        pos
    }
}

/// 显式 prev/next 表示。
pub struct SuffixDLL {
    first_of: [i32; 256],
    last_of: [i32; 256],
    prev: Vec<i32>,
    next: Vec<i32>,
    cursor: i32,
}

impl SuffixDLL {
    pub fn new(n: usize) -> Self {
        Self {
            first_of: [-1; 256],
            last_of: [-1; 256],
            prev: vec![0; n],
            next: vec![0; n],
            cursor: -1,
        }
    }

    #[inline]
    pub fn prev_pos(&self, i: i32) -> i32 {
        self.prev[i as usize]
    }

    #[inline]
    pub fn next_pos(&self, i: i32) -> i32 {
        self.next[i as usize]
    }
}

impl SuffixList for SuffixDLL {
    fn len(&self) -> usize {
        self.prev.len()
    }

    fn insert_between(&mut self, p1: i32, p2: i32, i: i32) {
        // before: ... p1, p2 ...   after: ... p1, i, p2 ...
        debug_assert!(p1 == -1 || self.next[p1 as usize] == p2);
        debug_assert!(p2 == -1 || self.prev[p2 as usize] == p1);
        self.prev[i as usize] = p1;
        self.next[i as usize] = p2;
        if p2 != -1 {
            self.prev[p2 as usize] = i;
        }
        if p1 != -1 {
            self.next[p1 as usize] = i;
        }
        self.cursor = i;
    }

    fn insert_new(&mut self, chi: usize, i: i32) {
        debug_assert_eq!(self.first_of[chi], -1);
        debug_assert_eq!(self.last_of[chi], -1);
        self.first_of[chi] = i;
        self.last_of[chi] = i;
        let ip = (0..chi)
            .rev()
            .map(|c| self.last_of[c])
            .find(|&p| p != -1)
            .unwrap_or(-1);
        let is = (chi + 1..256)
            .map(|c| self.first_of[c])
            .find(|&p| p != -1)
            .unwrap_or(-1);
        self.insert_between(ip, is, i);
    }

    fn insert_as_first(&mut self, chi: usize, i: i32) {
        let p = self.first_of[chi];
        debug_assert_ne!(p, -1);
        let prev = self.prev[p as usize];
        self.insert_between(prev, p, i);
        self.first_of[chi] = i;
    }

    fn insert_as_last(&mut self, chi: usize, i: i32) {
        let p = self.last_of[chi];
        debug_assert_ne!(p, -1);
        let next = self.next[p as usize];
        self.insert_between(p, next, i);
        self.last_of[chi] = i;
    }

    fn first_pos(&self, chi: usize) -> i32 {
        self.first_of[chi]
    }

    fn last_pos(&self, chi: usize) -> i32 {
        self.last_of[chi]
    }

    fn lowest_chi(&self) -> usize {
        (0..256).find(|&c| self.first_of[c] != -1).unwrap_or(256)
    }

    fn current(&self) -> i32 {
        self.cursor
    }

    fn predecessor(&self) -> i32 {
        self.prev[self.cursor as usize]
    }

    fn successor(&self) -> i32 {
        self.next[self.cursor as usize]
    }

    fn reset_to_begin(&mut self) {
        let chi = self.lowest_chi();
        self.cursor = if chi < 256 { self.first_of[chi] } else { -1 };
    }

    fn next_up(&mut self) {
        self.cursor = self.successor();
    }

    fn next_down(&mut self) {
        self.cursor = self.predecessor();
    }
}

/// XOR 编码表示：`link[i] = prev ^ next`。
///
/// -1 的补码是全 1，作为边界哨兵参与 XOR 不需要任何特判。解码
/// 依赖游标里的前驱 / 后继，因此所有遍历都从插入或 `reset_to_begin`
/// 建立的状态出发。
pub struct SuffixXorDLL {
    first_of: [i32; 256],
    last_of: [i32; 256],
    link: Vec<i32>,
    cursor: i32,
    pred: i32,
    succ: i32,
}

impl SuffixXorDLL {
    pub fn new(n: usize) -> Self {
        Self {
            first_of: [-1; 256],
            last_of: [-1; 256],
            link: vec![0; n],
            cursor: -1,
            pred: -1,
            succ: -1,
        }
    }

    #[inline]
    pub fn link(&self, i: i32) -> i32 {
        self.link[i as usize]
    }
}

impl SuffixList for SuffixXorDLL {
    fn len(&self) -> usize {
        self.link.len()
    }

    fn insert_between(&mut self, p1: i32, p2: i32, i: i32) {
        // before: ... p1, p2 ...   after: ... p1, i, p2 ...
        self.link[i as usize] = p1 ^ p2;
        if p2 != -1 {
            self.link[p2 as usize] ^= p1 ^ i;
        }
        if p1 != -1 {
            self.link[p1 as usize] ^= p2 ^ i;
        }
        self.pred = p1;
        self.succ = p2;
        self.cursor = i;
    }

    fn insert_new(&mut self, chi: usize, i: i32) {
        debug_assert_eq!(self.first_of[chi], -1);
        debug_assert_eq!(self.last_of[chi], -1);
        self.first_of[chi] = i;
        self.last_of[chi] = i;
        let ip = (0..chi)
            .rev()
            .map(|c| self.last_of[c])
            .find(|&p| p != -1)
            .unwrap_or(-1);
        let is = (chi + 1..256)
            .map(|c| self.first_of[c])
            .find(|&p| p != -1)
            .unwrap_or(-1);
        self.insert_between(ip, is, i);
    }

    fn insert_as_first(&mut self, chi: usize, i: i32) {
        debug_assert_ne!(self.first_of[chi], -1);
        let ip = (0..chi)
            .rev()
            .map(|c| self.last_of[c])
            .find(|&p| p != -1)
            .unwrap_or(-1);
        self.insert_between(ip, self.first_of[chi], i);
        self.first_of[chi] = i;
    }

    fn insert_as_last(&mut self, chi: usize, i: i32) {
        debug_assert_ne!(self.last_of[chi], -1);
        let is = (chi + 1..256)
            .map(|c| self.first_of[c])
            .find(|&p| p != -1)
            .unwrap_or(-1);
        self.insert_between(self.last_of[chi], is, i);
        self.last_of[chi] = i;
    }

    fn first_pos(&self, chi: usize) -> i32 {
        self.first_of[chi]
    }

    fn last_pos(&self, chi: usize) -> i32 {
        self.last_of[chi]
    }

    fn lowest_chi(&self) -> usize {
        (0..256).find(|&c| self.first_of[c] != -1).unwrap_or(256)
    }

    fn current(&self) -> i32 {
        self.cursor
    }

    fn predecessor(&self) -> i32 {
        self.pred
    }

    fn successor(&self) -> i32 {
        self.succ
    }

    fn reset_to_begin(&mut self) {
        let chi = self.lowest_chi();
        if chi < 256 {
            self.cursor = self.first_of[chi];
            self.pred = -1;
            self.succ = self.link[self.cursor as usize] ^ -1;
        } else {
            self.cursor = -1;
            self.pred = -1;
            self.succ = -1;
        }
    }

    fn next_up(&mut self) {
        self.pred = self.cursor;
        self.cursor = self.succ;
        self.succ = self.link[self.cursor as usize] ^ self.pred;
    }

    fn next_down(&mut self) {
        self.succ = self.cursor;
        self.cursor = self.pred;
        self.pred = self.link[self.cursor as usize] ^ self.succ;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 手工把 "banana$" 式的秩序列塞进两种表示，验证遍历一致

    fn fill<L: SuffixList>(list: &mut L, order: &[(usize, i32)]) {
        // order: (chi, position) in insertion script form
        for &(chi, i) in order {
            if list.first_pos(chi) == -1 {
                list.insert_new(chi, i);
            } else {
                list.insert_as_last(chi, i);
            }
        }
    }

    #[test]
    fn explicit_linearization() {
        // three character classes inserted out of lexicographic order
        let mut dll = SuffixDLL::new(6);
        fill(&mut dll, &[(130, 0), (128, 1), (130, 2), (129, 3), (128, 4), (129, 5)]);
        assert_eq!(dll.to_pos(), vec![1, 4, 3, 5, 0, 2]);
    }

    #[test]
    fn xor_linearization_matches_explicit() {
        let script = [(130, 0), (128, 1), (130, 2), (129, 3), (128, 4), (129, 5)];
        let mut dll = SuffixDLL::new(6);
        let mut xdll = SuffixXorDLL::new(6);
        fill(&mut dll, &script);
        fill(&mut xdll, &script);
        assert_eq!(dll.to_pos(), xdll.to_pos());
    }

    #[test]
    fn insert_as_first_prepends_within_class() {
        let mut dll = SuffixDLL::new(4);
        dll.insert_new(128, 0);
        dll.insert_as_first(128, 1);
        dll.insert_new(129, 2);
        dll.insert_as_first(129, 3);
        assert_eq!(dll.to_pos(), vec![1, 0, 3, 2]);
        assert_eq!(dll.first_pos(128), 1);
        assert_eq!(dll.last_pos(128), 0);
    }

    #[test]
    fn xor_cursor_walks_both_directions() {
        let mut xdll = SuffixXorDLL::new(3);
        xdll.insert_new(128, 2);
        xdll.insert_as_first(128, 1);
        xdll.insert_as_first(128, 0);
        xdll.reset_to_begin();
        assert_eq!(xdll.current(), 0);
        xdll.next_up();
        xdll.next_up();
        assert_eq!(xdll.current(), 2);
        assert!(!xdll.has_next_up());
        xdll.next_down();
        assert_eq!(xdll.current(), 1);
        assert!(xdll.has_next_down());
    }

    #[test]
    fn empty_list_cursor() {
        let mut dll = SuffixDLL::new(0);
        dll.reset_to_begin();
        assert_eq!(dll.current(), -1);
        assert_eq!(dll.lowest_chi(), 256);
        assert!(dll.to_pos().is_empty());
    }
}
