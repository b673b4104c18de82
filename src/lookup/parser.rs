use crate::error::AppError;

/// 按行拆分输入，只保留去空白后非空且全为数字的行，顺序不变
pub fn parse_ids(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// 单个 ID 的校验：必须是数字且能放进 u64
pub fn parse_single_id(raw: &str) -> Result<u64, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidId);
    }
    trimmed.parse().map_err(|_| AppError::IdOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_numeric_lines_in_order() {
        assert_eq!(parse_ids(" 123\nabc\n456 \n\n"), vec!["123", "456"]);
    }

    #[test]
    fn drops_mixed_and_signed_tokens() {
        let raw = "262745192195624256\r\n12 34\n-5\n+7\n8923472384423894\n١٢٣";
        assert_eq!(parse_ids(raw), vec!["262745192195624256", "8923472384423894"]);
    }

    #[test]
    fn duplicates_are_kept() {
        assert_eq!(parse_ids("1\n1\n2"), vec!["1", "1", "2"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(parse_ids("").is_empty());
        assert!(parse_ids("  \n\t\n").is_empty());
    }

    #[test]
    fn single_id_validation() {
        assert_eq!(parse_single_id(" 80351110224678912 ").unwrap(), 80351110224678912);
        assert!(matches!(parse_single_id("abc"), Err(AppError::InvalidId)));
        assert!(matches!(parse_single_id(""), Err(AppError::InvalidId)));
        assert!(matches!(
            parse_single_id("99999999999999999999999"),
            Err(AppError::IdOutOfRange)
        ));
    }
}
