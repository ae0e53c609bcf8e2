//! Lenient standard-alphabet base64 decoding.
//!
//! Characters outside `A-Z a-z 0-9 + /` are stripped before decoding, `=`
//! padding is tolerated anywhere, and trailing bits that do not complete a
//! byte are dropped.

const DECODE_TABLE: [i8; 256] = {
    let mut table = [-1i8; 256];
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut i = 0;
    while i < 64 {
        table[chars[i] as usize] = i as i8;
        i += 1;
    }
    table
};

/// Decodes `input` into raw bytes. Never fails; invalid characters are ignored.
pub fn decode(input: &str) -> Vec<u8> {
    let input = input.as_bytes();
    let mut output = Vec::with_capacity(input.len() * 3 / 4);
    let mut buffer = 0u32;
    let mut bits = 0;

    for &byte in input {
        let value = DECODE_TABLE[byte as usize];
        if value < 0 {
            continue;
        }
        buffer = (buffer << 6) | (value as u32);
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            output.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_padded_input() {
        assert_eq!(decode("SGVsbG8="), b"Hello");
        assert_eq!(decode("SGk="), b"Hi");
        assert_eq!(decode("SA=="), b"H");
    }

    #[test]
    fn strips_foreign_characters() {
        assert_eq!(decode("SGVs\nbG8=\r\n"), b"Hello");
        assert_eq!(decode("S G V s b G 8 ="), b"Hello");
        assert_eq!(decode("SGVs*bG8!"), b"Hello");
    }

    #[test]
    fn empty_input() {
        assert!(decode("").is_empty());
        assert!(decode("====").is_empty());
    }
}
