// 📂 Line Reader - raw sales file → trimmed data lines
// Tries a fixed list of encodings in order; the first that decodes wins

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// ENCODINGS
// ============================================================================

/// Text encodings the reader will attempt, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Encoding {
    Utf8,
    Windows1252,
    Latin1,
}

/// Attempt order. Latin-1 maps every byte, so it must stay last.
pub const ENCODING_ATTEMPTS: [Encoding; 3] =
    [Encoding::Utf8, Encoding::Windows1252, Encoding::Latin1];

impl Encoding {
    pub fn name(&self) -> &str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Windows1252 => "cp1252",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Decode the full buffer, or None if any byte sequence is invalid
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Windows1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                // Undefined bytes come back as C1 controls; treat them as a failed decode
                .filter(|text| !text.chars().any(|c| ('\u{80}'..='\u{9F}').contains(&c)))
                .map(|text| text.into_owned()),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

// ============================================================================
// OUTCOME TYPES
// ============================================================================

/// Data lines of a successfully decoded sales file (header removed)
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLines {
    pub encoding: Encoding,
    pub lines: Vec<String>,
}

impl DecodedLines {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug, Error)]
pub enum UnreadableFile {
    #[error("The file '{0}' was not found")]
    NotFound(PathBuf),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{0}' could not be decoded with any supported encoding")]
    Undecodable(PathBuf),
}

// ============================================================================
// READING
// ============================================================================

/// Read a sales file: decode, drop the header row, trim, skip blank lines
pub fn read_sales_data(path: &Path) -> Result<DecodedLines, UnreadableFile> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => UnreadableFile::NotFound(path.to_path_buf()),
        _ => UnreadableFile::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let decoded = decode_lines(&bytes)
        .ok_or_else(|| UnreadableFile::Undecodable(path.to_path_buf()))?;

    tracing::debug!(
        path = %path.display(),
        encoding = decoded.encoding.name(),
        lines = decoded.len(),
        "decoded sales file"
    );

    Ok(decoded)
}

/// Decode an in-memory buffer with the same rules as `read_sales_data`
pub fn decode_lines(bytes: &[u8]) -> Option<DecodedLines> {
    ENCODING_ATTEMPTS.iter().find_map(|encoding| {
        let text = encoding.decode(bytes)?;
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text.as_str());

        let lines = text
            .lines()
            .skip(1) // header
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        Some(DecodedLines {
            encoding: *encoding,
            lines,
        })
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region";

    #[test]
    fn test_decode_utf8_skips_header_and_blank_lines() {
        let text = format!("{}\nT1|2024-01-01|P1|Mouse|1|10|C1|North\n\n   \nT2|2024-01-02|P1|Mouse|1|10|C1|North  \n", HEADER);
        let decoded = decode_lines(text.as_bytes()).unwrap();

        assert_eq!(decoded.encoding, Encoding::Utf8);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.lines[1], "T2|2024-01-02|P1|Mouse|1|10|C1|North");
    }

    #[test]
    fn test_decode_falls_back_to_cp1252() {
        let mut bytes = format!("{}\nT1|2024-01-01|P1|", HEADER).into_bytes();
        bytes.extend_from_slice(&[0x93, b'Q', 0x94]); // curly quotes
        bytes.extend_from_slice(b"|1|10|C1|North\n");

        let decoded = decode_lines(&bytes).unwrap();

        assert_eq!(decoded.encoding, Encoding::Windows1252);
        assert!(decoded.lines[0].contains("\u{201C}Q\u{201D}"));
    }

    #[test]
    fn test_cp1252_maps_high_bytes() {
        assert_eq!(
            Encoding::Windows1252.decode(&[0x80, b' ', 0x99, b' ', 0xE9]).as_deref(),
            Some("\u{20AC} \u{2122} \u{E9}")
        );
        assert_eq!(Encoding::Windows1252.decode(&[b'a', 0x8D]), None);
        assert_eq!(Encoding::Latin1.decode(&[0x8D]).as_deref(), Some("\u{8D}"));
    }

    #[test]
    fn test_decode_falls_back_to_latin1_for_undefined_cp1252_bytes() {
        let mut bytes = format!("{}\nT1|2024-01-01|P1|", HEADER).into_bytes();
        bytes.extend_from_slice(&[0x81, 0xE9]);
        bytes.extend_from_slice(b"|1|10|C1|North\n");

        let decoded = decode_lines(&bytes).unwrap();

        assert_eq!(decoded.encoding, Encoding::Latin1);
        assert!(decoded.lines[0].contains('\u{E9}'));
    }

    #[test]
    fn test_header_only_file_has_no_lines() {
        let decoded = decode_lines(HEADER.as_bytes()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let err = read_sales_data(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, UnreadableFile::NotFound(_)));
    }

    #[test]
    fn test_read_sales_data_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "T1|2024-01-01|P1|Mouse|1|10|C1|North").unwrap();

        let decoded = read_sales_data(file.path()).unwrap();

        assert_eq!(decoded.lines, vec!["T1|2024-01-01|P1|Mouse|1|10|C1|North"]);
    }
}
