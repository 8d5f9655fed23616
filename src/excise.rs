//! Boundary-aware removal of undesired terms.

/// Characters that may border a removable term.
pub const BOUNDARY_DELIMITERS: &[char] = &[
    ' ', ',', '.', ';', ':', '/', '"', '?', '!', '(', ')', '<', '>',
];

/// Text after excision and how many spans were removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excision {
    pub text: String,
    pub removed: usize,
}

fn is_clear(neighbour: Option<char>) -> bool {
    neighbour.map_or(true, |c| BOUNDARY_DELIMITERS.contains(&c))
}

/// Remove every cleanly bounded occurrence of each term, term by term in
/// list order.
///
/// An occurrence is removed only when the characters on both sides are
/// either absent or one of [`BOUNDARY_DELIMITERS`]. After a removal the scan
/// restarts at the beginning of the text, since joining the two sides can
/// expose a new match. Occurrences embedded in a larger word are stepped over.
pub fn excise<S: AsRef<str>>(text: &str, terms: &[S]) -> Excision {
    let mut text = text.to_string();
    let mut removed = 0;

    for term in terms {
        let term = term.as_ref();
        if term.is_empty() {
            continue;
        }
        let mut cursor = 0;
        while let Some(offset) = text[cursor..].find(term) {
            let start = cursor + offset;
            let end = start + term.len();
            let before = text[..start].chars().next_back();
            let after = text[end..].chars().next();

            if is_clear(before) && is_clear(after) {
                text.replace_range(start..end, "");
                removed += 1;
                cursor = 0;
                log::debug!("excised '{term}' at byte {start}");
            } else {
                cursor = end;
            }
        }
    }

    Excision { text, removed }
}
