use sha2::{Digest, Sha256};

pub const RECEIPT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Leading-integer parse: optional sign followed by digits, anything after
/// the digits is ignored. `"12 €"` is 12, `"abc"` is `None`.
pub fn parse_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    // only overflow can fail here; oversized amounts saturate
    let n = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * n)
}

/// Last segment of a picked file path, accepting both Windows and Unix
/// separators.
pub fn file_name_from_path(path: &str) -> String {
    path.rsplit(&['\\', '/'][..]).next().unwrap_or(path).to_string()
}

pub fn has_receipt_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .map(|ext| RECEIPT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}
