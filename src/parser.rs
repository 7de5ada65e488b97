use crate::error::NameError;
use crate::models::LogRecord;

/// Characters that are unsafe in a filename on at least one common filesystem
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Extension used when the uploaded file had none
pub const DEFAULT_EXTENSION: &str = ".txt";

/// `YYYYMMDD-HHMMSS` once the colons are gone
const TIMESTAMP_LEN: usize = 15;

/// Stem bytes kept so the full name stays under the usual 255-byte limit
const MAX_STEM_BYTES: usize = 200;

/// Longest extension accepted from a client filename, dot included
const MAX_EXTENSION_LEN: usize = 16;

const MIN_FIELDS: usize = 10;
const PLAYER_FIELD: usize = 8;
const BOSS_FIELD: usize = 9;

/// Derive the stored filename for an uploaded combat log.
///
/// Only the second line is read. It is expected to look like
/// `20251213-22:28:09:301,DamageDone,Boule de mana,968862069,116,0,1,kNormalHit,Tipeuz,Calanthia`
/// and yields `20251213-222809_Tipeuz_Calanthia` plus the extension.
///
/// The extension must be a dot followed by ASCII letters and digits.
pub fn derive_filename(content: &str, extension: Option<&str>) -> Result<String, NameError> {
    let extension = match extension.filter(|e| !e.is_empty()) {
        Some(ext) if is_valid_extension(ext) => ext,
        Some(ext) => {
            return Err(NameError::InvalidExtension {
                extension: ext.to_string(),
            })
        }
        None => DEFAULT_EXTENSION,
    };
    let record = parse_log_record(content)?;

    let stem = sanitize_filename(&record.base_name());
    Ok(format!("{}{}", truncate_bytes(&stem, MAX_STEM_BYTES), extension))
}

/// Pull timestamp, player and boss out of the second line
pub fn parse_log_record(content: &str) -> Result<LogRecord, NameError> {
    let line = second_line(content).ok_or(NameError::MissingSecondLine)?;

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < MIN_FIELDS {
        return Err(NameError::MalformedLogLine {
            fields: fields.len(),
        });
    }

    Ok(LogRecord {
        timestamp: fields[0].trim().to_string(),
        player: fields[PLAYER_FIELD].trim().to_string(),
        boss: fields[BOSS_FIELD].trim().to_string(),
    })
}

/// Strip colons and keep the first 15 characters.
///
/// Shorter input is returned as-is rather than rejected.
pub fn normalize_timestamp(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c != ':')
        .take(TIMESTAMP_LEN)
        .collect()
}

/// Replace every filesystem-unsafe character with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Dotted extension of a client-supplied filename.
///
/// `None` when it has none or when it is not plain ASCII alphanumerics.
pub fn upload_extension(original_name: &str) -> Option<String> {
    let name = client_file_name(original_name);
    // A leading dot marks a hidden file, not an extension
    let dot = name.rfind('.').filter(|&i| i > 0)?;
    let ext = &name[dot..];
    is_valid_extension(ext).then(|| ext.to_string())
}

fn is_valid_extension(ext: &str) -> bool {
    ext.len() <= MAX_EXTENSION_LEN
        && ext
            .strip_prefix('.')
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Longest prefix of `s` within `max` bytes that ends on a char boundary
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Last path component of a client-supplied filename.
///
/// Browsers on Windows may send backslash-separated paths, so both separators count.
pub fn client_file_name(original_name: &str) -> &str {
    original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name)
}

/// Second line of the content, `None` if absent or empty
fn second_line(content: &str) -> Option<&str> {
    let line = content.split('\n').nth(1)?;
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}
