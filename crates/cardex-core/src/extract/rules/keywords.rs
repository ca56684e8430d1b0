//! Keyword-driven line lookup.

/// First line containing any keyword, case-insensitively.
pub fn find_keyword_line<'a>(lines: &'a [String], keywords: &[String]) -> Option<&'a str> {
    let keywords: Vec<String> = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| k.to_lowercase())
        .collect();

    lines
        .iter()
        .find(|line| {
            let line = line.to_lowercase();
            keywords.iter().any(|k| line.contains(k.as_str()))
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_keyword_line() {
        let lines = strings(&["Jane Doe", "Chief Executive / ceo", "Acme Corp"]);
        let keywords = strings(&["CEO", "Director"]);
        assert_eq!(find_keyword_line(&lines, &keywords), Some("Chief Executive / ceo"));
    }

    #[test]
    fn test_find_keyword_line_none() {
        let lines = strings(&["Jane Doe"]);
        assert_eq!(find_keyword_line(&lines, &strings(&["CEO"])), None);
        assert_eq!(find_keyword_line(&lines, &strings(&[""])), None);
        assert_eq!(find_keyword_line(&lines, &[]), None);
    }
}
