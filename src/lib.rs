//! Extraction of officer and major-shareholder records from EDINET annual
//! securities reports.
//!
//! A filing arrives as an XBRL instance whose interesting sections are
//! HTML tables embedded as entity-escaped text blocks. [`FilingDocument`]
//! resolves the filing's taxonomy namespace, locates those blocks and
//! turns them into typed records; [`edinet::text`] canonicalizes the
//! Japanese names and date literals they contain.

pub mod edinet;
pub mod error;
pub mod storage;

// Re-exports
pub use edinet::filing::{decode_filing, FilingDocument};
pub use edinet::records::{OfficerRecord, ShareholderRecord};
pub use edinet::source::{BlockExtractor, DocumentSource, FilingSummary};
pub use error::ParseError;
pub use storage::{MemoryStore, RecordStore};
