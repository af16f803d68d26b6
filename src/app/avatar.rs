//! Turn a local image file into a `data:` URL for the avatar field.
//!
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Context, Result, simple_error};

/// Images larger than this are rejected before encoding.
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Remote URLs and existing data URLs are kept as typed.
pub fn is_inline_or_remote(value: &str) -> bool {
    let v = value.trim();
    v.starts_with("data:") || v.starts_with("http://") || v.starts_with("https://")
}

pub fn encode_avatar_file(path: &str) -> Result<String> {
    let path = path.trim();
    let bytes = std::fs::read(path).with_ctx(|| format!("read {path}"))?;
    encode_avatar_bytes(&bytes)
}

pub fn encode_avatar_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(simple_error(format!(
            "image is {} bytes; limit is {MAX_AVATAR_BYTES}",
            bytes.len()
        )));
    }
    let mime = infer::get(bytes)
        .filter(|t| t.matcher_type() == infer::MatcherType::Image)
        .map(|t| t.mime_type())
        .ok_or_else(|| simple_error("not a recognized image"))?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn png_bytes_become_data_url() {
        let url = encode_avatar_bytes(PNG_MAGIC).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn non_images_are_rejected() {
        assert!(encode_avatar_bytes(b"hello world").is_err());
    }

    #[test]
    fn urls_are_left_alone() {
        assert!(is_inline_or_remote("https://reqres.in/img/faces/1-image.jpg"));
        assert!(is_inline_or_remote("data:image/png;base64,AAAA"));
        assert!(!is_inline_or_remote("/tmp/me.png"));
    }
}
