//! Test server flows
//!
//! Drives `TestDatabase` the way a replication test suite does: seed,
//! snapshot, update, verify.

mod test_utils;

mod update_flow;
mod verify_flow;
