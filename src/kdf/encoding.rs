//! 文本安全编码
//!
//! 标准 base64 字母表，不带填充。每 3 个原始字节编码为 4 个字符，
//! 末尾不足 3 字节的分组编码为 2 或 3 个字符。

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};

/// 编码原始字节
pub fn encode(raw: &[u8]) -> String {
    STANDARD_NO_PAD.encode(raw)
}

/// 解码（用于检查结果能否还原为完整字节）
pub fn decode(encoded: &str) -> Option<Vec<u8>> {
    STANDARD_NO_PAD.decode(encoded).ok()
}

/// `raw_len` 个字节编码后的字符数，即 `ceil(4 * raw_len / 3)`
pub fn encoded_len(raw_len: usize) -> usize {
    let full = (raw_len / 3) * 4;
    match raw_len % 3 {
        0 => full,
        1 => full + 2,
        _ => full + 3,
    }
}

/// 由期望编码长度估算原始字节数，即 `floor(3 * encoded / 4)`
///
/// 结果是搜索的起点，不保证恰好满足期望长度。
pub fn raw_len_guess(encoded: usize) -> usize {
    (encoded / 4) * 3 + (encoded % 4) * 3 / 4
}

/// 判断字符是否属于编码字母表
pub fn is_alphabet_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len_matches_engine() {
        for n in 0..64 {
            let raw = vec![0xA5u8; n];
            assert_eq!(encode(&raw).len(), encoded_len(n), "raw_len = {}", n);
        }
    }

    #[test]
    fn test_raw_len_guess() {
        assert_eq!(raw_len_guess(0), 0);
        assert_eq!(raw_len_guess(8), 6);
        assert_eq!(raw_len_guess(9), 6);
        assert_eq!(raw_len_guess(10), 7);
        assert_eq!(raw_len_guess(11), 8);
        assert_eq!(raw_len_guess(43), 32);
        assert_eq!(raw_len_guess(44), 33);
    }

    #[test]
    fn test_raw_len_guess_is_floor_of_three_quarters() {
        for encoded in 0..1000usize {
            assert_eq!(raw_len_guess(encoded), 3 * encoded / 4);
        }
    }

    #[test]
    fn test_raw_len_guess_does_not_overflow() {
        let guess = raw_len_guess(usize::MAX);
        assert!(guess < usize::MAX);
        assert!(guess > usize::MAX / 2);
    }

    #[test]
    fn test_guess_never_overshoots() {
        // 起点之前的长度一定不够
        for encoded in 1..500usize {
            let guess = raw_len_guess(encoded);
            if guess > 0 {
                assert!(encoded_len(guess - 1) < encoded, "encoded = {}", encoded);
            }
        }
    }

    #[test]
    fn test_no_padding_and_alphabet() {
        let encoded = encode(&[0xFB, 0xFF, 0xBF, 0x00]);
        assert!(!encoded.contains('='));
        assert!(encoded.chars().all(is_alphabet_char));
        assert_eq!(decode(&encoded), Some(vec![0xFB, 0xFF, 0xBF, 0x00]));
    }
}
