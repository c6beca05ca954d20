//! Prefix/suffix split of a password hash and parsing of range responses.

use std::fmt;

use hibp_sha1::Sha1Digest;
use zeroize::Zeroize;

use crate::error::Error;

/// Length of the hash prefix sent to the range API (5 hex characters).
pub const PREFIX_LEN: usize = 5;

/// Length of the hash suffix that is only ever compared locally.
pub const SUFFIX_LEN: usize = 35;

/// An uppercased SHA-1 hex digest, viewed as a public prefix and a private suffix.
///
/// The backing string is zeroized on drop, and `Debug` only prints the prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct HashSplit {
    hex: String,
}

impl HashSplit {
    pub fn from_digest(digest: &Sha1Digest) -> Self {
        Self { hex: digest.to_hex_upper() }
    }

    /// Hashes `secret` and splits the uppercased digest.
    pub fn for_secret(secret: &str) -> Self {
        Self::from_digest(&hibp_sha1::digest_words(secret))
    }

    /// First 5 hex characters, the only part that leaves the process.
    pub fn prefix(&self) -> &str {
        &self.hex[..PREFIX_LEN]
    }

    /// Remaining 35 hex characters.
    pub fn suffix(&self) -> &str {
        &self.hex[PREFIX_LEN..]
    }

    /// The full uppercased digest.
    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Debug for HashSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashSplit").field("prefix", &self.prefix()).finish_non_exhaustive()
    }
}

impl Drop for HashSplit {
    fn drop(&mut self) {
        self.hex.zeroize();
    }
}

/// One `SUFFIX:COUNT` record of a range response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateRow<'a> {
    pub suffix: &'a str,
    pub count: u64,
}

/// Parses a single `SUFFIX:COUNT` record.
///
/// The suffix is taken verbatim; the count is trimmed of surrounding whitespace
/// (the live service terminates lines with `\r\n`) before parsing.
///
/// `number` is the 1-based record number reported in errors. Errors never carry
/// the record text, since a bad record may hold the caller's own suffix.
pub fn parse_line(number: usize, line: &str) -> Result<CandidateRow<'_>, Error> {
    let (suffix, count) =
        line.split_once(':').ok_or(Error::MalformedLine { line: number })?;

    let count = count
        .trim()
        .parse::<u64>()
        .map_err(|source| Error::InvalidCount { line: number, source })?;

    Ok(CandidateRow { suffix, count })
}

/// Scans a range response for `suffix` and returns its breach count.
///
/// Records are checked in the order received and the first exact, case-sensitive
/// match wins. Blank records are skipped. Returns `Ok(0)` when nothing matches.
/// The scan stops at the first unparsable record before a match.
pub fn find_count(body: &str, suffix: &str) -> Result<u64, Error> {
    for (index, line) in body.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let row = parse_line(index + 1, line)?;
        if row.suffix == suffix {
            return Ok(row.count);
        }
    }

    Ok(0)
}

/// Convert hex ASCII character to nibble value (0-15)
#[inline]
fn hex_to_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Parses a 5-character uppercase hex prefix into its 20-bit index.
///
/// Lowercase hex is rejected, the range API is addressed in uppercase.
pub fn parse_prefix(prefix: &str) -> Option<u32> {
    let bytes = prefix.as_bytes();
    if bytes.len() != PREFIX_LEN {
        return None;
    }

    bytes.iter().try_fold(0u32, |acc, &c| Some((acc << 4) | u32::from(hex_to_nibble(c)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD123_SUFFIX: &str = "C6008F9CAB4083784CBD1874F76618D2A97";

    #[test]
    fn test_split_password123() {
        // password123 -> SHA1: CBFDAC6008F9CAB4083784CBD1874F76618D2A97
        let split = HashSplit::for_secret("password123");
        assert_eq!(split.prefix(), "CBFDA");
        assert_eq!(split.suffix(), PASSWORD123_SUFFIX);
    }

    #[test]
    fn test_split_reconstructs_digest() {
        for secret in ["", "abc", "hunter2", "pässwörd", "密码", "😀"] {
            let split = HashSplit::for_secret(secret);
            assert_eq!(split.prefix().len(), PREFIX_LEN);
            assert_eq!(split.suffix().len(), SUFFIX_LEN);
            assert_eq!(format!("{}{}", split.prefix(), split.suffix()), split.as_str());
            assert_eq!(split.as_str(), hibp_sha1::digest(secret).to_uppercase());
        }
    }

    #[test]
    fn test_debug_hides_suffix() {
        let split = HashSplit::for_secret("password123");
        let debug = format!("{split:?}");
        assert!(debug.contains("CBFDA"));
        assert!(!debug.contains(PASSWORD123_SUFFIX));
    }

    #[test]
    fn test_parse_line() {
        let row = parse_line(1, "C6008F9CAB4083784CBD1874F76618D2A97:2254650\r").unwrap();
        assert_eq!(row.suffix, PASSWORD123_SUFFIX);
        assert_eq!(row.count, 2254650);

        let row = parse_line(1, "00000000000000000000000000000000000:  17  ").unwrap();
        assert_eq!(row.count, 17);
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            parse_line(4, "C6008F9CAB4083784CBD1874F76618D2A97"),
            Err(Error::MalformedLine { line: 4 })
        ));
        assert!(matches!(
            parse_line(2, "C6008F9CAB4083784CBD1874F76618D2A97:lots"),
            Err(Error::InvalidCount { line: 2, .. })
        ));
        assert!(matches!(
            parse_line(1, "C6008F9CAB4083784CBD1874F76618D2A97:-3"),
            Err(Error::InvalidCount { line: 1, .. })
        ));
    }

    #[test]
    fn test_find_count_match() {
        let body = "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n\
                    C6008F9CAB4083784CBD1874F76618D2A97:2254650\r\n\
                    FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF:3";
        assert_eq!(find_count(body, PASSWORD123_SUFFIX).unwrap(), 2254650);
    }

    #[test]
    fn test_find_count_first_match_wins() {
        let body = format!("{PASSWORD123_SUFFIX}:5\n{PASSWORD123_SUFFIX}:9\n");
        assert_eq!(find_count(&body, PASSWORD123_SUFFIX).unwrap(), 5);
    }

    #[test]
    fn test_find_count_not_found() {
        let body = "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n\
                    FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF:3\r\n";
        assert_eq!(find_count(body, PASSWORD123_SUFFIX).unwrap(), 0);
        assert_eq!(find_count("", PASSWORD123_SUFFIX).unwrap(), 0);
    }

    #[test]
    fn test_find_count_is_case_sensitive() {
        let body = format!("{}:12\n", PASSWORD123_SUFFIX.to_lowercase());
        assert_eq!(find_count(&body, PASSWORD123_SUFFIX).unwrap(), 0);
    }

    #[test]
    fn test_find_count_aborts_on_malformed_line() {
        let body = format!("garbage\n{PASSWORD123_SUFFIX}:5\n");
        assert!(matches!(
            find_count(&body, PASSWORD123_SUFFIX),
            Err(Error::MalformedLine { line: 1 })
        ));

        // A malformed record after the match is never reached.
        let body = format!("{PASSWORD123_SUFFIX}:5\ngarbage\n");
        assert_eq!(find_count(&body, PASSWORD123_SUFFIX).unwrap(), 5);
    }

    #[test]
    fn test_errors_do_not_include_record_text() {
        let body = format!("0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n\r\n{PASSWORD123_SUFFIX}:lots\r\n");
        let err = find_count(&body, PASSWORD123_SUFFIX).unwrap_err();
        assert!(matches!(err, Error::InvalidCount { line: 3, .. }));
        assert!(!err.to_string().contains(PASSWORD123_SUFFIX), "{err}");

        let err = find_count(PASSWORD123_SUFFIX, PASSWORD123_SUFFIX).unwrap_err();
        assert!(!err.to_string().contains(PASSWORD123_SUFFIX), "{err}");
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(parse_prefix("00000"), Some(0x00000));
        assert_eq!(parse_prefix("FFFFF"), Some(0xFFFFF));
        assert_eq!(parse_prefix("CBFDA"), Some(0xCBFDA));
        assert_eq!(parse_prefix("cbfda"), None);
        assert_eq!(parse_prefix("CBFD"), None);
        assert_eq!(parse_prefix("CBFDAC"), None);
        assert_eq!(parse_prefix("CBFDG"), None);
    }
}
