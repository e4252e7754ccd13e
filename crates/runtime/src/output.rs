//! 按行输出，支持文本和原始字节两种模式

use std::io::{self, Write};

/// 写一行文本并 flush
pub fn write_line(stream: &mut dyn Write, s: &str) -> io::Result<()> {
    write_line_b(stream, s.as_bytes())
}

/// 写一行原始字节并 flush，不要求内容是合法 UTF-8
pub fn write_line_b(stream: &mut dyn Write, s: &[u8]) -> io::Result<()> {
    stream.write_all(s)?;
    stream.write_all(b"\n")?;
    stream.flush()
}

/// 解码字节，非法 UTF-8 序列转义为 `\xNN`
pub fn decode_backslash_replace(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        for b in chunk.invalid() {
            out.push_str(&format!("\\x{:02x}", b));
        }
    }
    out
}
