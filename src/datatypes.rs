use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Write};

// 基础整数类型读取函数
pub fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, std::io::Error> {
    cursor.read_u32::<LittleEndian>()
}

// 基础整数类型写入函数
pub fn write_u32(writer: &mut dyn Write, value: u32) -> Result<(), std::io::Error> {
    writer.write_u32::<LittleEndian>(value)
}

/// 文本编码
///
/// Wolf RPG Editor 2.x 的数据文件使用 Shift-JIS，3.x 使用 UTF-8。
/// 解码时记录实际命中的编码，重编码时按原编码写回。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 编码（Wolf RPG Editor 3.x）
    Utf8,
    /// Shift-JIS 编码（Wolf RPG Editor 2.x）
    ShiftJis,
}

impl TextEncoding {
    /// 获取编码标识符
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::ShiftJis => "shift_jis",
        }
    }
}

/// 解码后的字符串
#[derive(Debug, Clone)]
pub struct RawString {
    /// 字符串内容
    pub content: String,
    /// 实际命中的编码
    pub encoding: TextEncoding,
}

impl RawString {
    /// 严格解码：先尝试UTF-8，失败后回退到Shift-JIS
    ///
    /// 两种编码都解码失败时返回 None（说明这段字节不是文本）。
    pub fn decode(data: &[u8]) -> Option<Self> {
        if let Ok(content) = std::str::from_utf8(data) {
            return Some(RawString {
                content: content.to_string(),
                encoding: TextEncoding::Utf8,
            });
        }

        let (decoded, _, had_errors) = encoding_rs::SHIFT_JIS.decode(data);
        if !had_errors {
            return Some(RawString {
                content: decoded.into_owned(),
                encoding: TextEncoding::ShiftJis,
            });
        }

        None
    }

    /// 按指定编码重编码字符串
    ///
    /// Shift-JIS 无法表示的字符会导致编码失败，此时返回 None
    /// 而不是写入替换字符（替换字符会破坏译文）。
    pub fn encode(text: &str, encoding: TextEncoding) -> Option<Vec<u8>> {
        match encoding {
            TextEncoding::Utf8 => Some(text.as_bytes().to_vec()),
            TextEncoding::ShiftJis => {
                let (encoded, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
                if had_errors {
                    None
                } else {
                    Some(encoded.into_owned())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_u32() {
        let mut buffer = Vec::new();
        write_u32(&mut buffer, 0x12345678).unwrap();
        assert_eq!(buffer, vec![0x78, 0x56, 0x34, 0x12]);

        let mut cursor = Cursor::new(&buffer[..]);
        assert_eq!(read_u32(&mut cursor).unwrap(), 0x12345678);
    }

    #[test]
    fn test_decode_utf8() {
        let raw = RawString::decode("こんにちは".as_bytes()).unwrap();
        assert_eq!(raw.content, "こんにちは");
        assert_eq!(raw.encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_decode_shift_jis() {
        // "こんにちは" 的 Shift-JIS 字节
        let sjis_bytes = encoding_rs::SHIFT_JIS.encode("こんにちは").0.into_owned();
        let raw = RawString::decode(&sjis_bytes).unwrap();
        assert_eq!(raw.content, "こんにちは");
        assert_eq!(raw.encoding, TextEncoding::ShiftJis);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        assert!(RawString::decode(&[0xFF, 0xFE, 0x80]).is_none());
    }

    #[test]
    fn test_encode_roundtrip() {
        for encoding in [TextEncoding::Utf8, TextEncoding::ShiftJis] {
            let encoded = RawString::encode("魔法の剣", encoding).unwrap();
            let decoded = RawString::decode(&encoded).unwrap();
            assert_eq!(decoded.content, "魔法の剣");
        }
    }

    #[test]
    fn test_encode_unmappable() {
        // Emoji 无法映射到 Shift-JIS
        assert!(RawString::encode("🐺", TextEncoding::ShiftJis).is_none());
        assert!(RawString::encode("🐺", TextEncoding::Utf8).is_some());
    }
}
