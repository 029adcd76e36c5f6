//! Error types for `fieldplan-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::visit::VisitStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid period: {0}")]
  InvalidPeriod(String),

  #[error("no trade points with a category to schedule")]
  NoEligibleTradePoints,

  #[error("no active representatives to schedule")]
  NoEligibleRepresentatives,

  #[error("representative not found: {0}")]
  RepresentativeNotFound(Uuid),

  #[error("trade point not found: {0}")]
  TradePointNotFound(Uuid),

  #[error("scheduled visit not found: {0}")]
  VisitNotFound(Uuid),

  #[error("cannot move a visit from {from} to {to}")]
  InvalidTransition { from: VisitStatus, to: VisitStatus },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
