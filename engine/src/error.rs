use internment::Intern;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
  #[error("the airport registry needs at least two airports, found {0}")]
  NotEnoughAirports(usize),
  #[error("airport {0} is registered more than once")]
  DuplicateAirport(Intern<String>),
  #[error("airport {0} is not in the registry")]
  UnknownAirport(Intern<String>),
  #[error("no cruising flight is available for an emergency")]
  NoEligibleFlight,
  #[error("every {0} id is already in use")]
  IdsExhausted(String),
}
