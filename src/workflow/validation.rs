use once_cell::sync::Lazy;
use regex::Regex;

/// Accepts 0XXXXXXXXX, 233XXXXXXXXX and +233XXXXXXXXX forms.
static GHANA_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+?233|0?233|0)[1-9]\d{8}$").expect("phone pattern is valid")
});

/// Per-requirement upload constraints, loaded from the requirement row.
#[derive(Debug, Clone)]
pub struct UploadRule {
    pub allowed_extensions: Vec<String>,
    pub max_file_size_mb: i32,
}

impl UploadRule {
    pub fn max_bytes(&self) -> u64 {
        self.max_file_size_mb as u64 * 1024 * 1024
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("file {filename} has no recognisable extension")]
    MissingExtension { filename: String },
    #[error("file type .{extension} is not allowed (allowed: {allowed})")]
    DisallowedExtension { extension: String, allowed: String },
    #[error("file {filename} exceeds the {limit_mb}MB limit")]
    TooLarge { filename: String, limit_mb: i32 },
    #[error("file {filename} is empty")]
    Empty { filename: String },
}

/// Validate an upload against the requirement's rule table.
pub fn validate_upload(rule: &UploadRule, filename: &str, size: u64) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::Empty {
            filename: filename.to_string(),
        });
    }
    if size > rule.max_bytes() {
        return Err(UploadError::TooLarge {
            filename: filename.to_string(),
            limit_mb: rule.max_file_size_mb,
        });
    }

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty() && !ext.contains('/'))
        .ok_or_else(|| UploadError::MissingExtension {
            filename: filename.to_string(),
        })?;

    if !rule
        .allowed_extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&extension))
    {
        return Err(UploadError::DisallowedExtension {
            extension,
            allowed: rule.allowed_extensions.join(", "),
        });
    }
    Ok(())
}

pub fn is_valid_ghana_phone(phone: &str) -> bool {
    GHANA_PHONE.is_match(phone)
}

/// Normalise a Ghana number to the 233XXXXXXXXX form the SMS API expects.
pub fn normalize_sms_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.strip_prefix('0').unwrap_or(&digits);
    let digits = digits.strip_prefix("233").unwrap_or(digits);
    format!("233{digits}")
}

/// Account names must match the business name ignoring case and punctuation.
pub fn bank_account_name_matches(business_name: &str, account_name: &str) -> bool {
    let clean = |s: &str| {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect::<String>()
    };
    clean(business_name) == clean(account_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> UploadRule {
        UploadRule {
            allowed_extensions: vec!["pdf".to_string(), "jpg".to_string()],
            max_file_size_mb: 10,
        }
    }

    #[test]
    fn upload_rule_accepts_allowed_extension() {
        assert!(validate_upload(&rule(), "tax_clearance.PDF", 1024).is_ok());
        assert!(validate_upload(&rule(), "scan.jpg", 1024).is_ok());
    }

    #[test]
    fn upload_rule_rejects_disallowed_extension() {
        match validate_upload(&rule(), "macro.docx", 1024) {
            Err(UploadError::DisallowedExtension { extension, .. }) => {
                assert_eq!(extension, "docx");
            }
            other => panic!("expected disallowed extension, got {other:?}"),
        }
    }

    #[test]
    fn upload_rule_enforces_size_and_content() {
        assert!(matches!(
            validate_upload(&rule(), "big.pdf", 11 * 1024 * 1024),
            Err(UploadError::TooLarge { .. })
        ));
        assert!(matches!(
            validate_upload(&rule(), "empty.pdf", 0),
            Err(UploadError::Empty { .. })
        ));
        assert!(matches!(
            validate_upload(&rule(), "no_extension", 10),
            Err(UploadError::MissingExtension { .. })
        ));
    }

    #[test]
    fn ghana_phone_formats() {
        assert!(is_valid_ghana_phone("0243123456"));
        assert!(is_valid_ghana_phone("+233243123456"));
        assert!(is_valid_ghana_phone("233243123456"));
        assert!(!is_valid_ghana_phone("0043123456"));
        assert!(!is_valid_ghana_phone("02431234"));
        assert!(!is_valid_ghana_phone("not-a-number"));
    }

    #[test]
    fn sms_number_normalisation() {
        assert_eq!(normalize_sms_number("0243123456"), "233243123456");
        assert_eq!(normalize_sms_number("+233243123456"), "233243123456");
        assert_eq!(normalize_sms_number("233243123456"), "233243123456");
        assert_eq!(normalize_sms_number("0233243123456"), "233243123456");
    }

    #[test]
    fn bank_account_name_matching_ignores_case_and_punctuation() {
        assert!(bank_account_name_matches("Kumasi Grains Ltd.", "KUMASI GRAINS LTD"));
        assert!(!bank_account_name_matches("Kumasi Grains Ltd.", "Kumasi Grains Co"));
    }
}
