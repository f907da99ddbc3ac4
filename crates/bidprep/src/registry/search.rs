use super::domain::CompanyEntry;
use super::normalizer::{clean_display_name, normalize_name};

/// Entries whose search key contains the normalized query, in registry order.
pub fn search<'a>(entries: &'a [CompanyEntry], query: &str) -> Vec<&'a CompanyEntry> {
    let needle = normalize_name(query);
    if needle.is_empty() {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|entry| entry.normalized_name.contains(&needle))
        .collect()
}

/// Exact lookup by display name and region, as chosen from a result list.
pub fn find_entry<'a>(
    entries: &'a [CompanyEntry],
    name: &str,
    region: &str,
) -> Option<&'a CompanyEntry> {
    entries
        .iter()
        .find(|entry| entry.name == name && entry.region == region)
}

/// Cell text written back for a selected company: the cleaned name, with the
/// manager on a second line when one is known.
pub fn display_label(entry: &CompanyEntry) -> String {
    let cleaned = clean_display_name(&entry.name);
    let name = if cleaned.is_empty() {
        entry.name.as_str()
    } else {
        cleaned.as_str()
    };

    match entry.manager_name.as_deref() {
        Some(manager) => format!("{name}\n{manager}").trim().to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, region: &str, notes: &str) -> CompanyEntry {
        let mut entry = CompanyEntry::blank(name, region);
        entry.notes = notes.to_string();
        entry.finish()
    }

    #[test]
    fn search_matches_normalized_substrings() {
        let entries = vec![
            entry("(주)대한건설", "서울", ""),
            entry("대한전기 3.5", "부산", ""),
            entry("한빛통신", "서울", ""),
        ];

        let hits: Vec<_> = search(&entries, " 대한 ")
            .into_iter()
            .map(|entry| entry.region.as_str())
            .collect();
        assert_eq!(hits, vec!["서울", "부산"]);
        assert!(search(&entries, "(주) 12").is_empty());
    }

    #[test]
    fn find_entry_requires_name_and_region() {
        let entries = vec![entry("대한건설", "서울", ""), entry("대한건설", "부산", "")];

        let found = find_entry(&entries, "대한건설", "부산").expect("entry found");
        assert_eq!(found.region, "부산");
        assert!(find_entry(&entries, "대한건설", "대구").is_none());
    }

    #[test]
    fn display_label_appends_manager() {
        assert_eq!(
            display_label(&entry("㈜대한건설", "서울", "김철수 과장")),
            "대한건설\n김철수"
        );
        assert_eq!(display_label(&entry("주식회사", "서울", "")), "주식회사");
    }
}
