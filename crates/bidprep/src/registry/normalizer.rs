use regex::Regex;
use std::sync::OnceLock;

static CORPORATE_FORMS: OnceLock<Regex> = OnceLock::new();
static TRAILING_QUALIFIER: OnceLock<Regex> = OnceLock::new();

fn corporate_forms() -> &'static Regex {
    CORPORATE_FORMS.get_or_init(|| {
        Regex::new(
            r"(?i)\(\s*주\s*\)|㈜|주식회사|\bco(?:mpany)?\s*\.?\s*,?\s*ltd\b\.?|\bltd\b\.?|\binc\b\.?|\bcorp\b\.?",
        )
        .expect("corporate form pattern compiles")
    })
}

fn trailing_qualifier() -> &'static Regex {
    TRAILING_QUALIFIER.get_or_init(|| {
        Regex::new(r"\s*[0-9.,%].*$").expect("trailing qualifier pattern compiles")
    })
}

fn first_line(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed.split(['\n', '\r']).next().unwrap_or_default()
}

fn strip_corporate_forms(value: &str) -> String {
    let mut current = value.to_string();
    loop {
        let next = corporate_forms().replace_all(&current, "").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase search key for a company name.
///
/// Corporate-form tokens are dropped and everything from the first digit,
/// `.`, `,` or `%` onward is treated as a qualifier, not identity.
///
/// Both strips repeat until the key stops changing, since dropping a
/// qualifier can expose a corporate form (`"Acme Corp2"` → `"acme corp"` →
/// `"acme"`).
pub fn normalize_name(name: &str) -> String {
    let mut current = first_line(name).to_string();
    loop {
        let stripped = strip_corporate_forms(&current);
        let without_qualifier = trailing_qualifier().replace(&stripped, "");
        let next = collapse_whitespace(&without_qualifier).to_lowercase();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Display form of a company name: corporate forms removed, case and
/// trailing figures kept.
pub fn clean_display_name(name: &str) -> String {
    collapse_whitespace(&strip_corporate_forms(first_line(name)))
}

/// One heuristic for pulling a manager's name out of free-text notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerNameStrategy {
    /// First token of the notes, optionally bracketed, is itself a name.
    LeadingToken,
    /// `담당` / `담당자` label followed by a name.
    ContactLabel,
    /// Name directly followed by a job title such as `과장`.
    TitleSuffix,
    /// Standalone word followed by a delimiter, excluding document terms.
    BareName,
}

/// Strategies in priority order; the first one that yields a name wins.
pub const MANAGER_NAME_CASCADE: [ManagerNameStrategy; 4] = [
    ManagerNameStrategy::LeadingToken,
    ManagerNameStrategy::ContactLabel,
    ManagerNameStrategy::TitleSuffix,
    ManagerNameStrategy::BareName,
];

const EXCLUDED_WORDS: [&str; 5] = ["확인서", "등록증", "증명서", "평가", "서류"];

struct CascadePatterns {
    separators: Regex,
    bracketed: Regex,
    name_only: Regex,
    contact_label: Regex,
    title_suffix: Regex,
    bare_name: Regex,
}

static CASCADE_PATTERNS: OnceLock<CascadePatterns> = OnceLock::new();

fn patterns() -> &'static CascadePatterns {
    CASCADE_PATTERNS.get_or_init(|| CascadePatterns {
        separators: Regex::new(r"[ ,/|·\-]+").expect("separator pattern compiles"),
        bracketed: Regex::new(r"^[\[(（【]([^\])）】]+)[\])】]?$")
            .expect("bracket pattern compiles"),
        name_only: Regex::new(r"^[가-힣]{2,4}$").expect("name pattern compiles"),
        contact_label: Regex::new(r"담당자?\s*[:：-]?\s*([가-힣]{2,4})")
            .expect("contact label pattern compiles"),
        title_suffix: Regex::new(
            r"([가-힣]{2,4})\s*(?:과장|팀장|차장|대리|사원|부장|대표|실장|소장)",
        )
        .expect("title suffix pattern compiles"),
        bare_name: Regex::new(r"\b([가-힣]{2,4})\b\s*(?:,|/|\(|\d|$)")
            .expect("bare name pattern compiles"),
    })
}

impl ManagerNameStrategy {
    /// Applies this heuristic alone to whitespace-collapsed notes.
    pub fn extract(self, text: &str) -> Option<String> {
        let patterns = patterns();
        match self {
            ManagerNameStrategy::LeadingToken => {
                let token = patterns
                    .separators
                    .split(text)
                    .find(|token| !token.is_empty())?;
                let unwrapped = patterns
                    .bracketed
                    .captures(token)
                    .and_then(|captures| captures.get(1))
                    .map_or(token, |inner| inner.as_str());
                patterns
                    .name_only
                    .is_match(unwrapped)
                    .then(|| unwrapped.to_string())
            }
            ManagerNameStrategy::ContactLabel => capture_first(&patterns.contact_label, text),
            ManagerNameStrategy::TitleSuffix => capture_first(&patterns.title_suffix, text),
            ManagerNameStrategy::BareName => patterns
                .bare_name
                .captures_iter(text)
                .filter_map(|captures| captures.get(1))
                .map(|word| word.as_str())
                .find(|word| !EXCLUDED_WORDS.iter().any(|excluded| word.starts_with(excluded)))
                .map(str::to_string),
        }
    }
}

fn capture_first(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
}

/// Runs the cascade and reports which strategy produced the name.
pub fn extract_manager_name_with_strategy(notes: &str) -> Option<(ManagerNameStrategy, String)> {
    let text = collapse_whitespace(notes);
    if text.is_empty() {
        return None;
    }

    MANAGER_NAME_CASCADE
        .iter()
        .find_map(|strategy| strategy.extract(&text).map(|name| (*strategy, name)))
}

/// Manager's personal name recorded in the notes, if any can be recognised.
pub fn extract_manager_name(notes: &str) -> Option<String> {
    extract_manager_name_with_strategy(notes).map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_corporate_forms_and_trailing_figures() {
        assert_eq!(normalize_name("(주)대한건설 1.2억"), "대한건설");
        assert_eq!(normalize_name("㈜ 한빛전기\n대표 홍길동"), "한빛전기");
        assert_eq!(normalize_name("주식회사  미래   통신"), "미래 통신");
        assert_eq!(normalize_name(" Acme  Co.,Ltd 123"), normalize_name("acme"));
        assert_eq!(normalize_name("ACME Inc."), "acme");
        assert_eq!(normalize_name("Acme Corp2"), "acme");
        assert_eq!(normalize_name("Ltd5"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for sample in [
            "(주)대한건설 1.2억",
            " Acme  Co.,Ltd 123",
            "Co(주).,Ltd",
            "  ",
            "신성 E&C 50%",
            "Acme Corp2",
            "Ltd5",
            "Beta Inc.3 Ltd9",
        ] {
            let once = normalize_name(sample);
            assert_eq!(normalize_name(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn normalize_handles_empty_input() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("첫줄\n두번째 줄"), "첫줄");
    }

    #[test]
    fn clean_display_name_keeps_case_and_figures() {
        assert_eq!(clean_display_name("(주)Hanbit  Power 2호\n메모"), "Hanbit Power 2호");
        assert_eq!(clean_display_name("주식회사"), "");
    }

    #[test]
    fn leading_token_accepts_bracketed_names() {
        assert_eq!(
            extract_manager_name_with_strategy("[홍길동] 010-1111-2222"),
            Some((ManagerNameStrategy::LeadingToken, "홍길동".to_string()))
        );
        assert_eq!(extract_manager_name("(이영희)"), Some("이영희".to_string()));
    }

    #[test]
    fn contact_label_follows_leading_token() {
        assert_eq!(
            extract_manager_name_with_strategy("실적확인필요함 담당: 박민수"),
            Some((ManagerNameStrategy::ContactLabel, "박민수".to_string()))
        );
    }

    #[test]
    fn title_suffix_matches_attached_titles() {
        assert_eq!(
            ManagerNameStrategy::TitleSuffix.extract("연락 최지훈팀장 010"),
            Some("최지훈".to_string())
        );
        assert_eq!(
            extract_manager_name_with_strategy("※ 최지훈팀장 010"),
            Some((ManagerNameStrategy::TitleSuffix, "최지훈".to_string()))
        );
    }

    #[test]
    fn bare_name_skips_document_terms() {
        assert_eq!(
            ManagerNameStrategy::BareName.extract("※ 확인서, 정수진/"),
            Some("정수진".to_string())
        );
        assert_eq!(ManagerNameStrategy::BareName.extract("※ 등록증 서류"), None);
    }

    #[test]
    fn notes_with_title_and_phone_yield_manager() {
        assert_eq!(
            extract_manager_name("김철수 과장, 010-1234-5678"),
            Some("김철수".to_string())
        );
    }

    #[test]
    fn missing_manager_is_none() {
        assert_eq!(extract_manager_name(""), None);
        assert_eq!(extract_manager_name("   "), None);
        assert_eq!(extract_manager_name("2024.03 갱신 예정입니다"), None);
    }
}
