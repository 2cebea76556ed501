use log::{info, warn};
use url::form_urlencoded;

use crate::error::InputError;
use crate::request::chain::ChainQuery;

pub const PDB_ID_FIELD: &str = "PDBID";
pub const CHAIN_FIELD: &str = "CHAIN";

/// Read the PDB ID and chain fields from an `application/x-www-form-urlencoded` body
///
/// Unknown fields are ignored. If a field is repeated the first value is used.
pub fn read_form(body: &str) -> Result<ChainQuery, InputError> {
    info!("Parsing form body ({} bytes)", body.len());
    let mut pdb_id: Option<String> = None;
    let mut chain: Option<String> = None;

    for (key, value) in form_urlencoded::parse(body.trim_end().as_bytes()) {
        match &*key {
            PDB_ID_FIELD if pdb_id.is_none() => pdb_id = Some(value.into_owned()),
            CHAIN_FIELD if chain.is_none() => chain = Some(value.into_owned()),
            _ => {}
        }
    }

    let pdb_id = pdb_id.ok_or(InputError::MissingField(PDB_ID_FIELD))?;
    let chain = chain.ok_or(InputError::MissingField(CHAIN_FIELD))?;

    ChainQuery::new(&pdb_id, &chain).map_err(|err| {
        warn!("Rejecting form input {pdb_id:?} {chain:?}: {err}");
        err
    })
}
