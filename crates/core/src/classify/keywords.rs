//! Sensitive filename keywords.
//!
//! Matching is case-insensitive and anchored at word starts, so `nda`
//! matches `NDA_acme.pdf` and `acme-nda.pdf` but not `agenda.docx`.
//! Keywords are folded the same way as names, so `w-2` is held as `w 2`.

/// Financial, identity, legal and credential document classes.
pub const SENSITIVE_KEYWORDS: &[&str] = &[
    // financial
    "invoice",
    "receipt",
    "tax",
    "w-2",
    "w2",
    "1099",
    "bank",
    "statement",
    "salary",
    "payroll",
    "payslip",
    "budget",
    // identity
    "passport",
    "ssn",
    "social security",
    "driver license",
    "drivers license",
    "birth certificate",
    "id card",
    "medical",
    // legal
    "contract",
    "nda",
    "agreement",
    "confidential",
    "lawsuit",
    // credentials
    "password",
    "credential",
    "secret",
    "private key",
    "api key",
    "recovery code",
];

/// Keyword matcher with optional extra terms appended to the built-in set.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

impl KeywordSet {
    pub fn with_extra(extra: &[String]) -> Self {
        let keywords = SENSITIVE_KEYWORDS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
            .map(|keyword| fold(keyword).trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { keywords }
    }

    /// First keyword found at a word start in `name`, if any.
    pub fn find(&self, name: &str) -> Option<&str> {
        let folded = fold(name);
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| folded.contains(&format!(" {keyword}")))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

/// Lowercase, with every run of separators collapsed to one space and a
/// leading space so each word start is preceded by one.
fn fold(name: &str) -> String {
    let mut folded = String::with_capacity(name.len() + 1);
    folded.push(' ');
    for word in name
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        folded.push_str(word);
        folded.push(' ');
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        let set = KeywordSet::default();
        assert!(set.matches("PASSPORT scan.pdf"));
        assert!(set.matches("invoice_2024.pdf"));
        assert!(set.matches("my_private_key.pem"));
        assert!(!set.matches("holiday photos.zip"));
        assert!(set.matches("Invoices Q3.xlsx"));
    }

    #[test]
    fn short_keywords_need_a_word_start() {
        let set = KeywordSet::default();
        assert!(set.matches("NDA_acme.pdf"));
        assert!(!set.matches("team agenda.docx"));
        assert!(!set.matches("syntax notes.md"));
    }

    #[test]
    fn hyphens_separate_words() {
        let set = KeywordSet::default();
        assert!(set.matches("scan-passport.pdf"));
        assert!(set.matches("2024-invoice.pdf"));
        assert!(set.matches("acme-nda.pdf"));
        assert!(set.matches("client-contract-v2.docx"));
        assert!(!set.matches("meeting-agenda.pdf"));
    }

    #[test]
    fn hyphenated_keywords_match_either_spelling() {
        let set = KeywordSet::default();
        assert!(set.matches("W-2 2023.pdf"));
        assert!(set.matches("w_2 form.pdf"));
        assert!(set.matches("W2.pdf"));
        assert_eq!(set.find("employer W-2.pdf"), Some("w 2"));
    }

    #[test]
    fn extra_keywords_are_folded() {
        let set = KeywordSet::with_extra(&["  Board Minutes ".to_string(), String::new()]);
        assert!(set.matches("2024 board minutes.docx"));
        assert_eq!(set.find("board minutes"), Some("board minutes"));
    }
}
