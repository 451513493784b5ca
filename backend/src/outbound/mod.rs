//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: in-process tables for identities and the records they own
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic beyond the constraints a
//! database would enforce (uniqueness, cascading deletes).

pub mod memory;
