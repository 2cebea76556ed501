use std::fmt;

use crate::error::InputError;

/// A validated (PDB ID, chain ID) pair
///
/// The PDB ID is always 4 bytes, lowercased, and the chain ID a single uppercased byte.
/// Neither may contain whitespace, because list.txt separates them with a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainQuery {
    pdb_id: String,
    chain: String,
}

impl ChainQuery {
    pub fn new(pdb_id: &str, chain: &str) -> Result<ChainQuery, InputError> {
        let pdb_id = pdb_id.to_ascii_lowercase();
        let chain = chain.to_ascii_uppercase();

        // lengths are in bytes, so anything outside ASCII can't fit
        let pdb_len = pdb_id.len();
        if pdb_len != 4 {
            return Err(InputError::PdbIdLength(pdb_len));
        }
        let chain_len = chain.len();
        if chain_len != 1 {
            return Err(InputError::ChainLength(chain_len));
        }
        if pdb_id.chars().any(char::is_whitespace) {
            return Err(InputError::Whitespace("PDB ID"));
        }
        if chain.chars().any(char::is_whitespace) {
            return Err(InputError::Whitespace("chain ID"));
        }

        Ok(ChainQuery { pdb_id, chain })
    }

    pub fn pdb_id(&self) -> &str {
        &self.pdb_id
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }
}

/// The single line written to list.txt
impl fmt::Display for ChainQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.pdb_id, self.chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_case() {
        let query = ChainQuery::new("1ABC", "a").unwrap();
        assert_eq!(query.pdb_id(), "1abc");
        assert_eq!(query.chain(), "A");
        assert_eq!(query.to_string(), "1abc A");
    }

    #[test]
    fn rejects_short_pdb_id() {
        let err = ChainQuery::new("1ab", "A").unwrap_err();
        assert_eq!(err, InputError::PdbIdLength(3));
        assert_eq!(err.to_string(), "Sorry but PDB IDs are 4 characters");
    }

    #[test]
    fn rejects_long_chain() {
        let err = ChainQuery::new("1abc", "AB").unwrap_err();
        assert_eq!(err, InputError::ChainLength(2));
        assert_eq!(err.to_string(), "Sorry but PDB chain IDs are 1 character");
    }

    #[test]
    fn pdb_id_is_checked_before_chain() {
        assert_eq!(ChainQuery::new("", "").unwrap_err(), InputError::PdbIdLength(0));
    }

    #[test]
    fn non_ascii_does_not_fit() {
        assert_eq!(ChainQuery::new("1abc", "é").unwrap_err(), InputError::ChainLength(2));
        assert_eq!(ChainQuery::new("1ab\u{e9}", "A").unwrap_err(), InputError::PdbIdLength(5));
    }

    #[test]
    fn rejects_whitespace() {
        assert_eq!(ChainQuery::new("1a c", "A").unwrap_err(), InputError::Whitespace("PDB ID"));
        assert_eq!(ChainQuery::new("1abc", " ").unwrap_err(), InputError::Whitespace("chain ID"));
    }
}
