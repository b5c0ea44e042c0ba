use encoding_rs::WINDOWS_1252;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings tried when decoding an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with a leading byte-order mark stripped if present.
    Utf8Sig,
    Windows1252,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

impl TextEncoding {
    /// Spreadsheet exports are either UTF-8 or a Windows code page.
    ///
    /// Windows-1252 decodes every byte sequence, so `Latin1` is never reached
    /// in this order; it only takes effect in a custom
    /// [`LoadOptions::encodings`](super::loader::LoadOptions) list.
    pub const DEFAULT_ORDER: [TextEncoding; 3] = [
        TextEncoding::Utf8Sig,
        TextEncoding::Windows1252,
        TextEncoding::Latin1,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Latin1 => "iso-8859-1",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_owned)
            }
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Decode with the first candidate that accepts the bytes.
pub fn decode_first(bytes: &[u8], candidates: &[TextEncoding]) -> Option<(String, TextEncoding)> {
    candidates
        .iter()
        .find_map(|&enc| enc.decode(bytes).map(|text| (text, enc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bom_is_stripped() {
        let (text, enc) = decode_first(b"\xEF\xBB\xBFNombre", &TextEncoding::DEFAULT_ORDER).unwrap();
        assert_eq!(text, "Nombre");
        assert_eq!(enc, TextEncoding::Utf8Sig);
    }

    #[test]
    fn windows_1252_accents_survive() {
        // "María Núñez" in cp1252
        let bytes = b"Mar\xEDa N\xFA\xF1ez";
        let (text, enc) = decode_first(bytes, &TextEncoding::DEFAULT_ORDER).unwrap();
        assert_eq!(text, "María Núñez");
        assert_eq!(enc, TextEncoding::Windows1252);
        assert!(!text.contains('\u{FFFD}'));
    }

    #[test]
    fn windows_1252_specials_differ_from_latin1() {
        // 0x93/0x94 are curly quotes in cp1252 but C1 controls in latin-1.
        let bytes = b"\x93hola\x94";
        assert_eq!(TextEncoding::Windows1252.decode(bytes).unwrap(), "\u{201C}hola\u{201D}");
        assert_eq!(TextEncoding::Latin1.decode(bytes).unwrap(), "\u{93}hola\u{94}");
    }

    #[test]
    fn windows_1252_accepts_every_byte() {
        let all: Vec<u8> = (0..=255).collect();
        let (_, enc) = decode_first(&all, &TextEncoding::DEFAULT_ORDER).unwrap();
        assert_eq!(enc, TextEncoding::Windows1252);
        assert_eq!(TextEncoding::Windows1252.decode(b"A\x81na").unwrap(), "A\u{81}na");
    }

    #[test]
    fn utf8_rejects_legacy_bytes() {
        assert!(decode_first(b"Mar\xEDa", &[TextEncoding::Utf8Sig]).is_none());
    }
}
