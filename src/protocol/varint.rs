use crate::error::DeckError;

/// Longest minimal LEB128 encoding of a `u64`.
pub const MAX_LEN: usize = 10;

/// Append `value` as unsigned LEB128 (7 data bits per byte, little-endian).
#[cfg(test)]
pub fn encode_into(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

/// Decode one value from the start of `bytes`, returning it with the bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(u64, usize), DeckError> {
    if bytes.is_empty() {
        return Err(DeckError::InvalidPayload("varint: empty input".into()));
    }
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().take(MAX_LEN).enumerate() {
        let chunk = u64::from(byte & 0x7F);
        let shift = 7 * i as u32;
        if shift == 63 && chunk > 1 {
            return Err(DeckError::InvalidPayload("varint: overflows u64".into()));
        }
        value |= chunk << shift;
        if byte & 0x80 == 0 {
            if i > 0 && *byte == 0 {
                return Err(DeckError::InvalidPayload("varint: non-minimal encoding".into()));
            }
            return Ok((value, i + 1));
        }
    }
    if bytes.len() >= MAX_LEN {
        Err(DeckError::InvalidPayload("varint: too long".into()))
    } else {
        Err(DeckError::InvalidPayload("varint: unterminated value".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_into(value, &mut out);
        out
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(127), vec![0x7F]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xAC, 0x02]);
        assert_eq!(encode(u64::MAX).len(), MAX_LEN);
    }

    #[test]
    fn decode_reports_consumed_bytes() {
        let (value, used) = decode(&[0xAC, 0x02, 0xFF]).unwrap();
        assert_eq!(value, 300);
        assert_eq!(used, 2);
        assert_eq!(decode(&encode(u64::MAX)).unwrap().0, u64::MAX);
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert!(decode(&[]).is_err());
        assert!(decode(&[0x80]).is_err());
        assert!(decode(&[0x80, 0x00]).is_err());
        let mut overflow = vec![0xFF; 9];
        overflow.push(0x02);
        assert!(decode(&overflow).is_err());
    }
}
