// Order lifecycle and dispatch
pub mod builty;
pub mod orders;
pub mod sync;

// Contacts
pub mod party_directory;
pub mod phonebook;

// Reference tables and lookups
pub mod reference;

// Append-only audit trail
pub mod audit;
