//! Dictionary parsing.
//!
//! A dictionary file is line oriented. A line holding only `%` toggles the
//! parser between phases:
//!
//! ```text
//! preamble (ignored)
//! %
//! 1   care.virtue        <- category code and label
//! 2   care.vice
//! %
//! compassion   1         <- term and category code
//! harm         2
//! ```
//!
//! Further delimiters keep toggling between category and term blocks, so
//! a dictionary may be split into several of each.

use std::collections::HashMap;

use crate::error::AnalysisError;

/// The sentinel line separating dictionary phases.
pub const DELIMITER: &str = "%";

/// One category: its code as used in term lines and its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub code: String,
    pub label: String,
}

/// Parsed dictionary: ordered categories plus a term → category-code map.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    /// Categories in definition order. Output columns follow this order.
    categories: Vec<Category>,
    /// Lowercase term → category code.
    terms: HashMap<String, String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Preamble,
    Categories,
    Terms,
}

impl Lexicon {
    /// Parse dictionary text.
    ///
    /// Fails when no category block is ever closed by a second delimiter.
    /// Term codes are not checked against the categories; a term with an
    /// unknown code simply never matches while scoring.
    pub fn parse(source: &str) -> Result<Self, AnalysisError> {
        let mut lexicon = Lexicon::default();
        let mut phase = Phase::Preamble;
        let mut skipped_terms = 0usize;
        let mut has_term_block = false;

        for (line_no, raw) in source.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line == DELIMITER {
                phase = match phase {
                    Phase::Preamble | Phase::Terms => Phase::Categories,
                    Phase::Categories => {
                        has_term_block = true;
                        Phase::Terms
                    }
                };
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(first), second) = (fields.next(), fields.next()) else {
                continue;
            };

            match phase {
                Phase::Preamble => {}
                Phase::Categories => match second {
                    Some(label) => lexicon.insert_category(first, label),
                    None => log::warn!(
                        "dictionary line {}: category '{first}' has no label, skipped",
                        line_no + 1
                    ),
                },
                Phase::Terms => match second {
                    Some(code) => {
                        lexicon.terms.insert(first.to_lowercase(), code.to_string());
                    }
                    None => {
                        skipped_terms += 1;
                        log::warn!(
                            "dictionary line {}: term '{first}' has no category, skipped",
                            line_no + 1
                        );
                    }
                },
            }
        }

        if !has_term_block {
            let reason = match phase {
                Phase::Preamble => format!("no '{DELIMITER}' delimiter line found"),
                Phase::Categories | Phase::Terms => {
                    format!("category block is never closed by a second '{DELIMITER}'")
                }
            };
            return Err(AnalysisError::MalformedDictionary { reason });
        }

        log::debug!(
            "parsed {} categories, {} terms ({skipped_terms} malformed term lines)",
            lexicon.categories.len(),
            lexicon.terms.len()
        );
        Ok(lexicon)
    }

    // A repeated code keeps its first position but takes the newest label.
    fn insert_category(&mut self, code: &str, label: &str) {
        match self.categories.iter_mut().find(|c| c.code == code) {
            Some(existing) => existing.label = label.to_string(),
            None => self.categories.push(Category {
                code: code.to_string(),
                label: label.to_string(),
            }),
        }
    }

    /// Categories in definition order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Category code of a (lowercase) term.
    pub fn category_of(&self, term: &str) -> Option<&str> {
        self.terms.get(term).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MFD: &str = "\
Moral foundations dictionary
%
1\tcare.virtue
2\tcare.vice
%
compassion\t1
Harm\t2
stray\t9
";

    #[test]
    fn parses_categories_in_order_and_terms() {
        let lexicon = Lexicon::parse(MFD).unwrap();
        let labels: Vec<&str> = lexicon.categories().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["care.virtue", "care.vice"]);
        assert_eq!(lexicon.category_of("compassion"), Some("1"));
        assert_eq!(lexicon.category_of("harm"), Some("2"));
        assert_eq!(lexicon.term_count(), 3);
    }

    #[test]
    fn unknown_term_code_is_accepted() {
        let lexicon = Lexicon::parse(MFD).unwrap();
        assert_eq!(lexicon.category_of("stray"), Some("9"));
        assert!(lexicon.categories().iter().all(|c| c.code != "9"));
    }

    #[test]
    fn missing_second_delimiter_is_an_error() {
        let err = Lexicon::parse("%\n1 posemo\nhappy 1\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedDictionary { .. }));
    }

    #[test]
    fn missing_any_delimiter_is_an_error() {
        assert!(Lexicon::parse("happy 1\n").is_err());
        assert!(Lexicon::parse("").is_err());
    }

    #[test]
    fn tolerates_crlf_and_blank_lines() {
        let lexicon = Lexicon::parse("%\r\n1 posemo\r\n\r\n%\r\nhappy 1\r\n\r\nlonely\r\n").unwrap();
        assert_eq!(lexicon.categories().len(), 1);
        assert_eq!(lexicon.category_of("happy"), Some("1"));
        assert_eq!(lexicon.category_of("lonely"), None);
    }

    #[test]
    fn repeated_category_code_keeps_position() {
        let lexicon = Lexicon::parse("%\n1 a\n2 b\n1 c\n%\n").unwrap();
        let labels: Vec<&str> = lexicon.categories().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "b"]);
    }

    #[test]
    fn third_delimiter_reopens_category_block() {
        let lexicon =
            Lexicon::parse("%\n1 care\n%\nhelp 1\n%\n2 harm\nhurt 2\n%\nwound 2\n").unwrap();
        let codes: Vec<&str> = lexicon.categories().iter().map(|c| c.code.as_str()).collect();
        // "hurt 2" sits in the reopened category block, so it is a category.
        assert_eq!(codes, vec!["1", "2", "hurt"]);
        assert_eq!(lexicon.category_of("hurt"), None);
        assert_eq!(lexicon.category_of("help"), Some("1"));
        assert_eq!(lexicon.category_of("wound"), Some("2"));
    }

    #[test]
    fn ending_inside_reopened_category_block_is_accepted() {
        let lexicon = Lexicon::parse("%\n1 care\n%\nhelp 1\n%\n2 harm\n").unwrap();
        assert_eq!(lexicon.categories().len(), 2);
        assert_eq!(lexicon.term_count(), 1);
    }
}
