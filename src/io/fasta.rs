//! FASTA 解析与编码翻译。
//!
//! 流式读取 FASTA 记录，再经字母表翻译成有符号编码文本：每条序列
//! 之后追加一个分隔符，整个文本因此总以 special 字符结尾，正好满足
//! 后缀构建的前置条件。

use std::io::BufRead;

use anyhow::Result;

use crate::project::Contig;
use crate::util::alphabet::{Alphabet, SEPARATOR};

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        // Find header line
        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                self.buf.clear();
                let n = self.reader.read_line(&mut self.buf)?;
                if n == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if self.buf.starts_with('>') {
                    let h = self.buf[1..].trim().to_string();
                    break h;
                }
            }
        };

        // Parse id and description
        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // Read sequence lines
        let mut seq: Vec<u8> = Vec::new();
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if self.buf.starts_with('>') {
                let h = self.buf[1..].trim().to_string();
                self.peek_header = Some(h);
                break;
            }
            for &b in self.buf.as_bytes() {
                match b {
                    b'\n' | b'\r' | b' ' | b'\t' => {}
                    _ => seq.push(b.to_ascii_uppercase()),
                }
            }
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }
}

/// 读完整个 FASTA 并翻译成编码文本。
///
/// 每条记录翻译后补一个分隔符；返回编码文本和各条序列的位置信息。
/// 空文件（没有任何记录）报错。
pub fn translate<R: BufRead>(reader: R, alphabet: &Alphabet) -> Result<(Vec<i8>, Vec<Contig>)> {
    let mut fasta = FastaReader::new(reader);
    let mut text: Vec<i8> = Vec::new();
    let mut contigs: Vec<Contig> = Vec::new();

    while let Some(rec) = fasta.next_record()? {
        let offset = text.len() as u32;
        for &b in &rec.seq {
            text.push(alphabet.encode(b));
        }
        contigs.push(Contig {
            name: rec.id,
            len: rec.seq.len() as u32,
            offset,
        });
        text.push(SEPARATOR);
    }

    anyhow::ensure!(!contigs.is_empty(), "FASTA input contains no sequences");
    Ok((text, contigs))
}
