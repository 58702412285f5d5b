pub mod filing;
pub mod namespace;
pub mod records;
pub mod source;
pub mod table;
pub mod text;

pub use filing::{decode_filing, FilingDocument};
pub use records::{OfficerRecord, ShareholderRecord};
pub use source::{BlockExtractor, DocumentSource, FilingSummary};
