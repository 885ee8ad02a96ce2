//! Banner decoding and display helpers.

/// Maximum bytes read for a banner or probe response.
pub const MAX_BANNER_SIZE: usize = 1024;

/// Synthetic request sent when a service stays quiet after connecting.
pub const HTTP_PROBE: &[u8] = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";

/// Decode banner bytes, dropping invalid UTF-8 sequences and trimming
/// surrounding whitespace.
pub fn decode_banner(data: &[u8]) -> String {
    let mut text = String::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text.trim().to_string()
}

/// Make banner text safe for single-line terminal output.
///
/// Control characters become `.`, line breaks and tabs become spaces, runs of
/// spaces collapse, and the result is capped at 256 characters.
pub fn sanitize_banner(text: &str) -> String {
    let mut result = String::new();
    let mut prev_space = false;

    for c in text.chars().take(256) {
        let c = match c {
            '\r' | '\n' | '\t' => ' ',
            c if c.is_control() => '.',
            c => c,
        };
        if c == ' ' {
            if !prev_space {
                result.push(c);
            }
            prev_space = true;
        } else {
            result.push(c);
            prev_space = false;
        }
    }

    result.trim().to_string()
}
