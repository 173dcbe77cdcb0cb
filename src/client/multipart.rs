//! Single-part `multipart/form-data` bodies for file uploads.

use bytes::{BufMut, Bytes, BytesMut};

/// Content type of the wrapped file part.
pub const PART_CONTENT_TYPE: &str = "application/octet-stream";

/// 16 random bytes as lowercase hex.
pub fn generate_boundary() -> String {
    (0..16).map(|_| format!("{:02x}", fastrand::u8(..))).collect()
}

/// `Content-Type` header value announcing `boundary`.
pub fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={}", boundary)
}

/// Wrap `data` as the only part of a form, named `field_name` for both the
/// field and the file name.
pub fn wrap(boundary: &str, field_name: &str, data: &[u8]) -> Bytes {
    let head = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{field_name}\"\r\n\
         Content-Type: {PART_CONTENT_TYPE}\r\n\r\n"
    );
    let tail = format!("\r\n--{boundary}--\r\n");

    let mut body = BytesMut::with_capacity(head.len() + data.len() + tail.len());
    body.put_slice(head.as_bytes());
    body.put_slice(data);
    body.put_slice(tail.as_bytes());
    body.freeze()
}
