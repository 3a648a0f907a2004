//! Parsing of the interactive title selection.

use thiserror::Error;

use super::types::Title;

/// Errors produced while parsing a title selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The input was neither `all` nor a list of title indexes.
    #[error("invalid title selection: {0}")]
    Invalid(String),
}

/// Which titles of a unit the user chose to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every title on the unit.
    All,
    /// Only the titles with these indexes.
    Indexes(Vec<u32>),
    /// Nothing was entered.
    Nothing,
}

impl Selection {
    /// Keeps the titles matching this selection, preserving catalog order.
    pub fn apply(&self, titles: Vec<Title>) -> Vec<Title> {
        match self {
            Self::All => titles,
            Self::Indexes(indexes) => titles
                .into_iter()
                .filter(|t| indexes.contains(&t.id.index))
                .collect(),
            Self::Nothing => Vec::new(),
        }
    }
}

/// Parses `all` or a comma separated list of title indexes such as `0,1,2`.
///
/// Spaces, parentheses and surrounding commas are ignored.
pub fn parse_selection(input: &str) -> Result<Selection, SelectionError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
        .collect();
    let cleaned = cleaned.trim_matches(',');

    if cleaned.is_empty() {
        return Ok(Selection::Nothing);
    }

    if cleaned.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }

    let indexes = cleaned
        .split(',')
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| SelectionError::Invalid(raw.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Selection::Indexes(indexes))
}
