use serde::{Deserialize, Serialize};

use super::text::{normalize_date, normalize_name};

/// One officer (director, auditor or executive) from the officer
/// information section of an annual report. String fields hold the
/// whitespace-cleaned filed values; canonical forms come from the
/// accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerRecord {
    pub name: String,
    pub title: String,
    pub birth_date: String,
    /// Career history with one entry per line.
    pub biography: String,
    /// Shares of the filer owned, as filed (units vary by filer).
    pub shares_owned: String,
}

impl OfficerRecord {
    /// Name with full-width ASCII folded, annotations dropped and
    /// decorative spacing resolved. `None` when the filed name is blank.
    pub fn normalized_name(&self) -> Option<String> {
        normalize_name(&self.name)
    }

    /// Birth date as `YYYY-MM-DD`, when the filed literal parses as a
    /// Gregorian calendar date.
    pub fn birth_date_iso(&self) -> Option<String> {
        normalize_date(&self.birth_date)
    }
}

/// One row of the major shareholders table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareholderRecord {
    /// Shareholder name; a person or an institution.
    pub name: String,
    pub address: String,
    pub shares_held: String,
    /// Ownership ratio against shares outstanding, as filed.
    pub ownership_ratio: String,
}

impl ShareholderRecord {
    /// Canonical shareholder name, `None` when blank.
    pub fn normalized_name(&self) -> Option<String> {
        normalize_name(&self.name)
    }
}
