//! Caller-scoped filing lookups shared by the services.

use super::{FilingServiceError, FilingServiceResult};
use crate::filing::{
    domain::{CaId, Filing, FilingId, UserId},
    ports::FilingRepository,
};

/// Loads a filing owned by `owner`; filings owned by others are reported as
/// missing.
pub(super) async fn load_owned<R>(
    repository: &R,
    owner: UserId,
    filing_id: FilingId,
) -> FilingServiceResult<Filing>
where
    R: FilingRepository + ?Sized,
{
    repository
        .find_by_id(filing_id)
        .await?
        .filter(|filing| filing.owner() == owner)
        .ok_or_else(|| FilingServiceError::filing_not_found(filing_id))
}

/// Loads a filing the reviewer `ca` is allowed to act on.
pub(super) async fn load_assigned<R>(
    repository: &R,
    ca: CaId,
    filing_id: FilingId,
) -> FilingServiceResult<Filing>
where
    R: FilingRepository + ?Sized,
{
    let filing = repository
        .find_by_id(filing_id)
        .await?
        .ok_or_else(|| FilingServiceError::filing_not_found(filing_id))?;
    if !filing.review().is_assigned_to(ca) {
        return Err(FilingServiceError::Unauthorized {
            filing_id,
            ca_id: ca,
        });
    }
    Ok(filing)
}
