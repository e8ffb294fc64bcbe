//! ISRC / ISWC canonicalization
//!
//! Reports and catalogs write identifiers with arbitrary separators and case
//! (`br-xxx-00-00001`, `BRXXX0000001`, `T-123.456.789-0`). Both sides are
//! reduced to a canonical, separator-free uppercase form before comparison,
//! and values that cannot be a real identifier are treated as absent.

/// Strip separators and uppercase
fn compact(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '-' | ' ' | '.' | '\t'))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Canonical ISRC (`CCXXXYYNNNNN`), or `None` if implausible
///
/// # Examples
///
/// ```
/// use cuecheck_domain::identifier::canonical_isrc;
///
/// assert_eq!(canonical_isrc("br-xxx-00-00001").as_deref(), Some("BRXXX0000001"));
/// assert_eq!(canonical_isrc("not an isrc"), None);
/// ```
pub fn canonical_isrc(raw: &str) -> Option<String> {
    let s = compact(raw);
    let b = s.as_bytes();
    if b.len() != 12 {
        return None;
    }
    let country = b[..2].iter().all(u8::is_ascii_alphabetic);
    let registrant = b[2..5].iter().all(u8::is_ascii_alphanumeric);
    let digits = b[5..].iter().all(u8::is_ascii_digit);
    (country && registrant && digits).then_some(s)
}

/// Canonical ISWC (`T` followed by 10 digits), or `None` if implausible
///
/// # Examples
///
/// ```
/// use cuecheck_domain::identifier::canonical_iswc;
///
/// assert_eq!(canonical_iswc("T-034.524.680-1").as_deref(), Some("T0345246801"));
/// assert_eq!(canonical_iswc("0345246801"), None);
/// ```
pub fn canonical_iswc(raw: &str) -> Option<String> {
    let s = compact(raw);
    let b = s.as_bytes();
    if b.len() != 11 || b[0] != b'T' {
        return None;
    }
    b[1..].iter().all(u8::is_ascii_digit).then_some(s)
}

/// Canonicalize an optional raw ISRC, treating blanks as absent
pub fn optional_isrc(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).and_then(canonical_isrc)
}

/// Canonicalize an optional raw ISWC, treating blanks as absent
pub fn optional_iswc(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).and_then(canonical_iswc)
}
