/// How many leading bytes the sniffer needs at most.
pub(crate) const SNIFF_LEN: usize = 64;

struct Signature {
    offset: usize,
    magic: &'static [u8],
    mime: &'static str,
}

const fn sig(offset: usize, magic: &'static [u8], mime: &'static str) -> Signature {
    Signature {
        offset,
        magic,
        mime,
    }
}

// Only signatures that cannot plausibly open a text document.
const SIGNATURES: &[Signature] = &[
    sig(0, b"\x89PNG\r\n\x1a\n", "image/png"),
    sig(0, b"\xff\xd8\xff", "image/jpeg"),
    sig(0, b"GIF87a", "image/gif"),
    sig(0, b"GIF89a", "image/gif"),
    sig(0, b"\x00\x00\x01\x00", "image/x-icon"),
    sig(0, b"II*\x00", "image/tiff"),
    sig(0, b"MM\x00*", "image/tiff"),
    sig(0, b"8BPS", "image/vnd.adobe.photoshop"),
    sig(0, b"%PDF-", "application/pdf"),
    sig(0, b"PK\x03\x04", "application/zip"),
    sig(0, b"\x1f\x8b", "application/gzip"),
    sig(0, b"7z\xbc\xaf\x27\x1c", "application/x-7z-compressed"),
    sig(0, b"Rar!\x1a\x07", "application/vnd.rar"),
    sig(0, b"\xfd7zXZ\x00", "application/x-xz"),
    sig(0, b"SQLite format 3\x00", "application/vnd.sqlite3"),
    sig(0, b"\x00asm", "application/wasm"),
    sig(0, b"\x7fELF", "application/x-elf"),
    sig(0, b"OggS", "audio/ogg"),
    sig(0, b"fLaC", "audio/flac"),
    sig(0, b"wOFF", "font/woff"),
    sig(0, b"wOF2", "font/woff2"),
    sig(4, b"ftypqt", "video/quicktime"),
    sig(4, b"ftyp", "video/mp4"),
];

/// Detects a file type from its leading bytes.
///
/// Returns `None` for anything without a known binary signature, which
/// includes every plain text format.
pub fn sniff_mime_type(header: &[u8]) -> Option<&'static str> {
    if let Some(mime) = sniff_riff(header) {
        return Some(mime);
    }
    SIGNATURES
        .iter()
        .find(|s| header.get(s.offset..s.offset + s.magic.len()) == Some(s.magic))
        .map(|s| s.mime)
}

fn sniff_riff(header: &[u8]) -> Option<&'static str> {
    if header.get(0..4)? != b"RIFF" {
        return None;
    }
    match header.get(8..12)? {
        b"WEBP" => Some("image/webp"),
        b"WAVE" => Some("audio/wav"),
        b"AVI " => Some("video/x-msvideo"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::sniff_mime_type;

    #[test]
    fn png_header_is_detected() {
        let header = [137, 80, 78, 71, 13, 10, 26, 10, 0, 0];
        assert_eq!(sniff_mime_type(&header), Some("image/png"));
    }

    #[test]
    fn riff_containers_are_told_apart() {
        assert_eq!(sniff_mime_type(b"RIFF\x10\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime_type(b"RIFF\x10\x00\x00\x00WAVEfmt "), Some("audio/wav"));
        assert_eq!(sniff_mime_type(b"RIFF\x10\x00\x00\x00????"), None);
    }

    #[test]
    fn offset_signatures_need_enough_bytes() {
        assert_eq!(sniff_mime_type(b"\x00\x00\x00\x18ftypisom"), Some("video/mp4"));
        assert_eq!(sniff_mime_type(b"\x00\x00"), None);
    }

    #[test]
    fn text_has_no_signature() {
        assert_eq!(sniff_mime_type(b"# Heading\n\nSome *markdown*."), None);
        assert_eq!(sniff_mime_type(b""), None);
    }
}
