//! Barcode Symbologies
//!
//! Maps decoder format names to symbologies and checks that a decoded
//! value is plausible for the symbology it was read as.

use thiserror::Error;

/// Barcode encoding standard reported by the decoder
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Itf,
    Code39,
    Code93,
    Code128,
    Codabar,
    QrCode,
    DataMatrix,
    Pdf417,
    Aztec,
    /// Format name the decoder reported but we do not know
    Other(String),
}

/// Why a decoded value was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbologyError {
    #[error("Empty barcode")]
    Empty,

    #[error("{symbology} barcode contains characters it cannot encode")]
    InvalidCharacters { symbology: &'static str },

    #[error("{symbology} barcode must be {expected} characters long, read {actual}")]
    Length {
        symbology: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("{symbology} check digit mismatch (expected {expected}, read {actual})")]
    Checksum {
        symbology: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("UPC-E number system must be 0 or 1, read {0}")]
    NumberSystem(u8),
}

/// Formats requested from the decoder when the caller does not choose
pub fn default_formats() -> Vec<Symbology> {
    vec![
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Code128,
        Symbology::Code39,
        Symbology::Itf,
        Symbology::QrCode,
        Symbology::DataMatrix,
    ]
}

impl Symbology {
    /// Parse a `BarcodeDetector` format string (`ean_13`, `qr_code`, ...)
    pub fn from_format(format: &str) -> Self {
        let normalized = format.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "ean_13" | "ean13" => Self::Ean13,
            "ean_8" | "ean8" => Self::Ean8,
            "upc_a" | "upca" => Self::UpcA,
            "upc_e" | "upce" => Self::UpcE,
            "itf" | "itf_14" => Self::Itf,
            "code_39" | "code39" => Self::Code39,
            "code_93" | "code93" => Self::Code93,
            "code_128" | "code128" => Self::Code128,
            "codabar" => Self::Codabar,
            "qr_code" | "qrcode" | "qr" => Self::QrCode,
            "data_matrix" | "datamatrix" => Self::DataMatrix,
            "pdf417" | "pdf_417" => Self::Pdf417,
            "aztec" => Self::Aztec,
            _ => Self::Other(format.trim().to_string()),
        }
    }

    /// Format string as the decoder spells it
    pub fn format_name(&self) -> &str {
        match self {
            Self::Ean13 => "ean_13",
            Self::Ean8 => "ean_8",
            Self::UpcA => "upc_a",
            Self::UpcE => "upc_e",
            Self::Itf => "itf",
            Self::Code39 => "code_39",
            Self::Code93 => "code_93",
            Self::Code128 => "code_128",
            Self::Codabar => "codabar",
            Self::QrCode => "qr_code",
            Self::DataMatrix => "data_matrix",
            Self::Pdf417 => "pdf417",
            Self::Aztec => "aztec",
            Self::Other(name) => name,
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ean13 => "EAN-13",
            Self::Ean8 => "EAN-8",
            Self::UpcA => "UPC-A",
            Self::UpcE => "UPC-E",
            Self::Itf => "ITF",
            Self::Code39 => "Code 39",
            Self::Code93 => "Code 93",
            Self::Code128 => "Code 128",
            Self::Codabar => "Codabar",
            Self::QrCode => "QR",
            Self::DataMatrix => "Data Matrix",
            Self::Pdf417 => "PDF417",
            Self::Aztec => "Aztec",
            Self::Other(_) => "Barcode",
        }
    }

    /// Check a decoded value against this symbology's format rules
    pub fn validate(&self, raw: &str) -> Result<(), SymbologyError> {
        if raw.is_empty() {
            return Err(SymbologyError::Empty);
        }
        let label = self.label();
        match self {
            Self::Ean13 => check_gs1(label, raw, 13, "13"),
            Self::Ean8 => check_gs1(label, raw, 8, "8"),
            Self::UpcA => check_gs1(label, raw, 12, "12"),
            Self::UpcE => check_upc_e(raw),
            Self::Itf => {
                let digits = parse_digits(label, raw)?;
                if digits.len() % 2 != 0 {
                    return Err(SymbologyError::Length { symbology: label, expected: "an even number of", actual: digits.len() });
                }
                if digits.len() == 14 {
                    verify_check_digit(label, &digits)?;
                }
                Ok(())
            }
            Self::Code39 => {
                let allowed = |c: char| c.is_ascii_digit() || c.is_ascii_uppercase() || "-. $/+%".contains(c);
                require_chars(label, raw, allowed)
            }
            Self::Code93 | Self::Code128 => require_chars(label, raw, |c| (' '..='~').contains(&c)),
            Self::Codabar => check_codabar(raw),
            Self::QrCode | Self::DataMatrix | Self::Pdf417 | Self::Aztec => Ok(()),
            Self::Other(_) => require_chars(label, raw, |c| !c.is_control()),
        }
    }
}

fn require_chars(label: &'static str, raw: &str, allowed: impl Fn(char) -> bool) -> Result<(), SymbologyError> {
    if raw.chars().all(allowed) {
        Ok(())
    } else {
        Err(SymbologyError::InvalidCharacters { symbology: label })
    }
}

fn parse_digits(label: &'static str, raw: &str) -> Result<Vec<u8>, SymbologyError> {
    raw.chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect::<Option<Vec<_>>>()
        .ok_or(SymbologyError::InvalidCharacters { symbology: label })
}

/// GS1 mod-10 check digit for the digits preceding it
pub fn gs1_check_digit(body: &[u8]) -> u8 {
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 * 3 } else { d as u32 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

fn verify_check_digit(label: &'static str, digits: &[u8]) -> Result<(), SymbologyError> {
    let (body, check) = digits.split_at(digits.len() - 1);
    let expected = gs1_check_digit(body);
    if expected == check[0] {
        Ok(())
    } else {
        Err(SymbologyError::Checksum { symbology: label, expected, actual: check[0] })
    }
}

fn check_gs1(label: &'static str, raw: &str, len: usize, expected: &'static str) -> Result<(), SymbologyError> {
    let digits = parse_digits(label, raw)?;
    if digits.len() != len {
        return Err(SymbologyError::Length { symbology: label, expected, actual: digits.len() });
    }
    verify_check_digit(label, &digits)
}

/// Expand the six UPC-E payload digits to the 11-digit UPC-A body
fn expand_upc_e(number_system: u8, d: &[u8]) -> Vec<u8> {
    let mut body = vec![number_system];
    match d[5] {
        0..=2 => {
            body.extend_from_slice(&[d[0], d[1], d[5], 0, 0, 0, 0, d[2], d[3], d[4]]);
        }
        3 => {
            body.extend_from_slice(&[d[0], d[1], d[2], 0, 0, 0, 0, 0, d[3], d[4]]);
        }
        4 => {
            body.extend_from_slice(&[d[0], d[1], d[2], d[3], 0, 0, 0, 0, 0, d[4]]);
        }
        _ => {
            body.extend_from_slice(&[d[0], d[1], d[2], d[3], d[4], 0, 0, 0, 0, d[5]]);
        }
    }
    body
}

fn check_upc_e(raw: &str) -> Result<(), SymbologyError> {
    let label = "UPC-E";
    let digits = parse_digits(label, raw)?;
    if digits.len() != 8 {
        return Err(SymbologyError::Length { symbology: label, expected: "8", actual: digits.len() });
    }
    if digits[0] > 1 {
        return Err(SymbologyError::NumberSystem(digits[0]));
    }
    let body = expand_upc_e(digits[0], &digits[1..7]);
    let expected = gs1_check_digit(&body);
    if expected == digits[7] {
        Ok(())
    } else {
        Err(SymbologyError::Checksum { symbology: label, expected, actual: digits[7] })
    }
}

fn check_codabar(raw: &str) -> Result<(), SymbologyError> {
    let label = "Codabar";
    let upper = raw.to_ascii_uppercase();
    let is_guard = |c: char| ('A'..='D').contains(&c);
    let inner = match (upper.chars().next(), upper.chars().last()) {
        (Some(first), Some(last)) if upper.len() >= 2 && is_guard(first) && is_guard(last) => &upper[1..upper.len() - 1],
        _ => upper.as_str(),
    };
    if inner.is_empty() {
        return Err(SymbologyError::Empty);
    }
    require_chars(label, inner, |c| c.is_ascii_digit() || "-$:/.+".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_round_trip() {
        for s in default_formats() {
            assert_eq!(Symbology::from_format(s.format_name()), s);
        }
        assert_eq!(Symbology::from_format("EAN-13"), Symbology::Ean13);
        assert_eq!(Symbology::from_format("maxicode"), Symbology::Other("maxicode".to_string()));
    }

    #[test]
    fn test_ean13_checksum() {
        assert!(Symbology::Ean13.validate("4006381333931").is_ok());
        assert_eq!(
            Symbology::Ean13.validate("4006381333932"),
            Err(SymbologyError::Checksum { symbology: "EAN-13", expected: 1, actual: 2 })
        );
        assert!(matches!(Symbology::Ean13.validate("400638133393"), Err(SymbologyError::Length { .. })));
        assert!(matches!(Symbology::Ean13.validate("40063813339A1"), Err(SymbologyError::InvalidCharacters { .. })));
    }

    #[test]
    fn test_ean8_and_upc_a() {
        assert!(Symbology::Ean8.validate("96385074").is_ok());
        assert!(Symbology::Ean8.validate("96385075").is_err());
        assert!(Symbology::UpcA.validate("036000291452").is_ok());
        assert!(Symbology::UpcA.validate("036000291453").is_err());
    }

    #[test]
    fn test_upc_e_expansion() {
        // 0 123456 5 expands to UPC-A 01234500006-5
        assert!(Symbology::UpcE.validate("01234565").is_ok());
        assert!(Symbology::UpcE.validate("01234566").is_err());
        assert_eq!(Symbology::UpcE.validate("21234565"), Err(SymbologyError::NumberSystem(2)));
    }

    #[test]
    fn test_itf() {
        assert!(Symbology::Itf.validate("00012345600012").is_ok());
        assert!(Symbology::Itf.validate("00012345600013").is_err());
        assert!(Symbology::Itf.validate("1234").is_ok());
        assert!(matches!(Symbology::Itf.validate("123"), Err(SymbologyError::Length { .. })));
    }

    #[test]
    fn test_character_sets() {
        assert!(Symbology::Code39.validate("LAB-0042").is_ok());
        assert!(Symbology::Code39.validate("lab-0042").is_err());
        assert!(Symbology::Code128.validate("Lab item #42").is_ok());
        assert!(Symbology::Code128.validate("tab\there").is_err());
        assert!(Symbology::Codabar.validate("A40156B").is_ok());
        assert!(Symbology::Codabar.validate("AB").is_err());
        assert!(Symbology::QrCode.validate("https://lab.example/items/7").is_ok());
    }

    #[test]
    fn test_empty_is_rejected_for_every_symbology() {
        for s in default_formats() {
            assert_eq!(s.validate(""), Err(SymbologyError::Empty));
        }
    }
}
