//! End-to-end replication scenarios
//!
//! A source database receives a batch of changes, a simulated replicator
//! copies documents and blobs to a target database, and the target is
//! verified against a snapshot taken before replication.

mod test_utils;

mod replicate;
