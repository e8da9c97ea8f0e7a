//! Service layer implementing the engine's business rules on top of the
//! record store, one module per resource.

pub mod documentation;
pub mod group_service;
pub mod health_service;
pub mod match_service;
pub mod roster_service;
pub mod session_service;
pub mod team_service;
