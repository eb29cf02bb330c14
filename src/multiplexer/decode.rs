//! Response body decoding.

use std::io::{self, Read};
use axum::http::header::{CONTENT_ENCODING, CONTENT_LENGTH};
use axum::http::HeaderMap;
use bytes::Bytes;
use flate2::read::GzDecoder;

fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false)
}

/// Gunzip `raw` when the headers declare gzip, otherwise pass it through.
///
/// Decompressed output larger than `limit` bytes is an error. On success the
/// encoding and length headers are removed since they described the
/// compressed bytes.
pub fn decode_body(headers: &mut HeaderMap, raw: Bytes, limit: usize) -> io::Result<Bytes> {
    if !is_gzip(headers) {
        return Ok(raw);
    }

    let mut decoded = Vec::with_capacity(raw.len().saturating_mul(2).min(limit));
    GzDecoder::new(raw.as_ref())
        .take(limit as u64 + 1)
        .read_to_end(&mut decoded)?;
    if decoded.len() > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("decompressed body exceeds {} bytes", limit),
        ));
    }

    headers.remove(CONTENT_ENCODING);
    headers.remove(CONTENT_LENGTH);

    Ok(Bytes::from(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const LIMIT: usize = 1024 * 1024;

    fn gzip(data: &[u8]) -> Bytes {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        Bytes::from(encoder.finish().unwrap())
    }

    #[test]
    fn gzip_body_is_decompressed() {
        let source = b"<section>hello fragment</section>".repeat(20);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("40"));

        let decoded = decode_body(&mut headers, gzip(&source), LIMIT).unwrap();

        assert_eq!(decoded.as_ref(), source.as_slice());
        assert!(headers.get(CONTENT_ENCODING).is_none());
        assert!(headers.get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn plain_body_passes_through() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("5"));

        let decoded = decode_body(&mut headers, Bytes::from_static(b"plain"), LIMIT).unwrap();

        assert_eq!(decoded, Bytes::from_static(b"plain"));
        assert_eq!(headers[CONTENT_LENGTH], "5");
    }

    #[test]
    fn corrupt_gzip_is_an_error() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("GZIP"));

        assert!(decode_body(&mut headers, Bytes::from_static(b"not gzip at all"), LIMIT).is_err());
        assert!(headers.get(CONTENT_ENCODING).is_some());
    }

    #[test]
    fn expansion_past_limit_is_an_error() {
        let source = vec![b'a'; 64 * 1024];
        let compressed = gzip(&source);
        assert!(compressed.len() < 1024);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));

        let err = decode_body(&mut headers, compressed.clone(), 8192).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(headers.get(CONTENT_ENCODING).is_some());

        let exact = decode_body(&mut headers, compressed, source.len()).unwrap();
        assert_eq!(exact.len(), source.len());
    }
}
