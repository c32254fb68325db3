//! Parsing of `1,3,4` / `all` selections over a numbered list

/// Result of parsing one selection answer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Zero-based indices, in the order given, without duplicates
    pub indices: Vec<usize>,
    /// Entries that were not a valid 1-based index
    pub rejected: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Parse `input` against a list of `len` items.
///
/// `all` (any case) selects everything. Otherwise the input is a comma-separated
/// list of 1-based indices; blank entries are ignored and invalid ones are
/// collected in [`Selection::rejected`] instead of failing the whole answer.
pub fn parse_selection(input: &str, len: usize) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Selection {
            indices: (0..len).collect(),
            rejected: Vec::new(),
        };
    }

    let mut selection = Selection::default();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        match part.parse::<usize>() {
            Ok(index) if (1..=len).contains(&index) => {
                if !selection.indices.contains(&(index - 1)) {
                    selection.indices.push(index - 1);
                }
            }
            _ => selection.rejected.push(part.to_string()),
        }
    }

    selection
}
