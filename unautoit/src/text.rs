use chrono::DateTime;
use chrono::Utc;

/// Words that score towards a payload being script source.
const SCRIPT_KEYWORDS: &[&str] = &[
    "#include",
    "#notrayicon",
    "#requireadmin",
    "case",
    "const",
    "continueloop",
    "dim",
    "do",
    "else",
    "elseif",
    "endfunc",
    "endif",
    "endselect",
    "endswitch",
    "exit",
    "exitloop",
    "for",
    "func",
    "global",
    "if",
    "local",
    "msgbox",
    "next",
    "return",
    "select",
    "step",
    "switch",
    "then",
    "until",
    "wend",
    "while",
];

/// Returns `true` if `data` is UTF-8 text without control characters other than whitespace.
///
/// Replacement characters count as unprintable.
pub fn is_printable(data: &[u8]) -> bool {
    match std::str::from_utf8(data) {
        Ok(text) => text
            .chars()
            .all(|c| c != char::REPLACEMENT_CHARACTER && (!c.is_control() || c.is_whitespace())),
        Err(_) => false,
    }
}

/// Reinterpret `data` as little-endian UTF-16.
///
/// A leading byte order mark is dropped, a trailing odd byte is ignored
/// and invalid code units are replaced.
pub fn from_utf16(data: &[u8]) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    let units = units.strip_prefix(&[0xFEFF]).unwrap_or(&units);

    String::from_utf16_lossy(units)
}

/// The fewest keyword hits that mark a payload as script, unless `confidence` is lower.
const MIN_SCRIPT_HITS: usize = 3;

/// Score `data` by keyword hits.
///
/// A hit is needed for every 4 words, with a floor of [`MIN_SCRIPT_HITS`].
/// The bar never exceeds `confidence`, and at least one hit is always required.
pub fn looks_like_script(data: &[u8], confidence: usize) -> bool {
    let text = String::from_utf8_lossy(data);
    let mut words = 0_usize;
    let mut hits = 0_usize;
    for word in text
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '#' | '$' | '_')))
        .filter(|word| !word.is_empty())
    {
        words += 1;
        let word = word.to_ascii_lowercase();
        if SCRIPT_KEYWORDS.contains(&word.as_str()) {
            hits += 1;
        }
    }

    let needed = words
        .div_ceil(4)
        .max(MIN_SCRIPT_HITS)
        .min(confidence)
        .max(1);
    hits >= needed
}

/// The comment block placed above a decompiled script.
///
/// The timestamp is in UTC so the zone prints as a name.
pub fn banner(generated_on: DateTime<Utc>) -> String {
    format!(
        "
;
;    +--------------------------------------------------+
;    |   UnAutoIt - The Open Source AutoIt Decompiler   |
;    +--------------------------------------------------+
;
;    Generated on: {}
;

",
        generated_on.format("%a, %d %b %Y %H:%M:%S %Z")
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::SCRIPT;
    use chrono::TimeZone;

    #[test]
    fn printable() {
        assert!(is_printable(b"Func Main()\r\n\tReturn 1\r\nEndFunc"));
        assert!(is_printable("Größe".as_bytes()));
        assert!(!is_printable(b"MZ\x90\x00\x03"));
        assert!(!is_printable(&[0xFF, 0xFE, 0x41, 0x00]));
        assert!(!is_printable("a\u{FFFD}b".as_bytes()));
    }

    #[test]
    fn utf16_reinterpretation() {
        let mut data = vec![0xFF, 0xFE];
        for unit in "Global $x".encode_utf16() {
            data.extend_from_slice(&unit.to_le_bytes());
        }
        assert!(!is_printable(&data));

        let text = from_utf16(&data);
        assert!(text == "Global $x");
        assert!(is_printable(text.as_bytes()));
    }

    #[test]
    fn script_heuristic() {
        assert!(looks_like_script(SCRIPT.as_bytes(), crate::SCRIPT_CONFIDENCE));
        assert!(!looks_like_script(b"", crate::SCRIPT_CONFIDENCE));
        assert!(!looks_like_script(
            b"The quick brown fox jumps over the lazy dog",
            crate::SCRIPT_CONFIDENCE
        ));
        // Installer text that happens to use a keyword or two.
        assert!(!looks_like_script(
            b"Click Next to continue.\r\n",
            crate::SCRIPT_CONFIDENCE
        ));
        assert!(!looks_like_script(
            b"Click Next, then wait while the files are copied.",
            crate::SCRIPT_CONFIDENCE
        ));
        // A low confidence still bounds the bar.
        assert!(looks_like_script(b"Click Next to continue.", 1));
        assert!(!looks_like_script(
            b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR",
            crate::SCRIPT_CONFIDENCE
        ));
    }

    #[test]
    fn banner_has_timestamp() {
        let generated_on = Utc.with_ymd_and_hms(2020, 5, 17, 13, 4, 5).unwrap();
        let banner = banner(generated_on);

        assert!(banner.contains("Generated on: Sun, 17 May 2020 13:04:05 UTC"));
        assert!(banner.lines().all(|line| line.is_empty() || line.starts_with(';')));
    }
}
