//! Data-source clients. `gaps` is the live HTTP provider; `mock_gaps` is
//! the scripted test double shared by unit and integration tests.

pub mod gaps;
pub mod mock_gaps;
