use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::error::InputError;

pub type RecordId = i64;

/// Represent one CD in the inventory
///
/// Ids are chosen by the user and are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    pub artist: String,
}

impl Record {
    pub fn new(id: RecordId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{} (by:{})", self.id, self.title, self.artist)
    }
}

/// parses a user supplied id, ignoring surrounding whitespace
pub fn parse_id(input: &str) -> Result<RecordId, InputError> {
    input
        .trim()
        .parse::<RecordId>()
        .map_err(|_| InputError::InvalidIdFormat {
            input: input.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_padded_integers() {
        assert_eq!(parse_id(" 42 "), Ok(42));
        assert_eq!(parse_id("-7"), Ok(-7));
    }

    #[test]
    fn parse_id_rejects_non_integers() {
        for bad in ["", "abc", "1.5", "12x", "99999999999999999999"] {
            assert_eq!(
                parse_id(bad),
                Err(InputError::InvalidIdFormat {
                    input: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn display_matches_inventory_row() {
        let record = Record::new(2, "Back in Black", "AC/DC");
        assert_eq!(record.to_string(), "2\tBack in Black (by:AC/DC)");
    }
}
