use thiserror::Error;

use crate::dosing::cohort::CohortError;
use crate::protocol::ProtocolError;

#[derive(Error, Debug)]
pub enum OncosolError {
    #[error("Error in the protocol store: {0}")]
    ProtocolError(#[from] ProtocolError),
    #[error("Error in cohort data: {0}")]
    CohortError(#[from] CohortError),
}
