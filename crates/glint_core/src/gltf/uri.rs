//! `data:` URIs and the base64 decoding they need.

/// The decoded payload of a `data:` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUri {
    /// Media type, e.g. `image/png`. Empty when the URI omits it.
    pub mime: String,
    pub data: Vec<u8>,
}

pub fn is_data_uri(uri: &str) -> bool {
    uri.starts_with("data:")
}

/// Parse `data:[<mime>][;base64],<payload>`.
///
/// Non-base64 payloads are taken as raw bytes. Returns a reason on failure.
pub fn parse_data_uri(uri: &str) -> Result<DataUri, String> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| "not a data URI".to_string())?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URI has no ',' separator".to_string())?;

    match header.strip_suffix(";base64") {
        Some(mime) => {
            let data = decode_base64(payload).ok_or_else(|| "invalid base64 payload".to_string())?;
            Ok(DataUri {
                mime: mime.to_string(),
                data,
            })
        }
        None => Ok(DataUri {
            mime: header.split(';').next().unwrap_or_default().to_string(),
            data: payload.as_bytes().to_vec(),
        }),
    }
}

/// Standard-alphabet base64 decoder. Whitespace is skipped; padding is
/// optional. `None` on any other malformed input.
pub fn decode_base64(input: &str) -> Option<Vec<u8>> {
    fn decode_char(c: u8) -> Option<u8> {
        match c {
            b'A'..=b'Z' => Some(c - b'A'),
            b'a'..=b'z' => Some(c - b'a' + 26),
            b'0'..=b'9' => Some(c - b'0' + 52),
            b'+' => Some(62),
            b'/' => Some(63),
            _ => None,
        }
    }

    let input: Vec<u8> = input.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    let body = match input.iter().position(|&b| b == b'=') {
        Some(pad_start) => {
            let padding = &input[pad_start..];
            if padding.len() > 2 || padding.iter().any(|&b| b != b'=') || input.len() % 4 != 0 {
                return None;
            }
            &input[..pad_start]
        }
        None => &input[..],
    };

    let mut result = Vec::with_capacity(body.len() * 3 / 4);
    for chunk in body.chunks(4) {
        if chunk.len() == 1 {
            return None;
        }
        let mut buf = [0u8; 4];
        for (i, &byte) in chunk.iter().enumerate() {
            buf[i] = decode_char(byte)?;
        }

        result.push((buf[0] << 2) | (buf[1] >> 4));
        if chunk.len() > 2 {
            result.push((buf[1] << 4) | (buf[2] >> 2));
        }
        if chunk.len() > 3 {
            result.push((buf[2] << 6) | buf[3]);
        }
    }

    Some(result)
}
