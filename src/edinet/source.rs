//! Boundaries to the outside world: the disclosure list, document
//! retrieval and the language-model extraction path.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry of the daily disclosure list. Serde names map the upstream
/// camelCase JSON keys; everything except the document id is optional in
/// practice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingSummary {
    #[serde(rename = "docID")]
    pub doc_id: String,
    #[serde(rename = "secCode")]
    pub sec_code: Option<String>,
    #[serde(rename = "filerName")]
    pub filer_name: Option<String>,
    #[serde(rename = "docDescription")]
    pub doc_description: Option<String>,
    #[serde(rename = "periodStart")]
    pub period_start: Option<NaiveDate>,
    #[serde(rename = "periodEnd")]
    pub period_end: Option<NaiveDate>,
    #[serde(rename = "submitDateTime")]
    pub submit_datetime: Option<String>,
}

impl FilingSummary {
    /// The disclosure list carries every filing type. Ingestion takes
    /// original annual securities reports from listed filers and leaves
    /// amendments and everything else alone.
    pub fn is_annual_report(&self) -> bool {
        let description = self.doc_description.as_deref().unwrap_or("");
        description.contains("有価証券報告書")
            && !description.contains("訂正")
            && self.sec_code.is_some()
    }
}

/// Where filings come from. Implementations own retrieval entirely, HTTP
/// client, rate limits and caching included; the parser only ever sees
/// resident bytes.
#[async_trait]
pub trait DocumentSource {
    /// Summaries of every disclosure published on `date`.
    async fn filings_on(&self, date: NaiveDate) -> anyhow::Result<Vec<FilingSummary>>;

    /// Raw XBRL instance bytes for one document.
    async fn fetch_filing(&self, doc_id: &str) -> anyhow::Result<Vec<u8>>;
}

/// Alternative extraction path: hand a raw text block to a language-model
/// service and get structured JSON back. The contract is exactly block in,
/// JSON out; prompting and transport belong to the implementation.
#[async_trait]
pub trait BlockExtractor {
    async fn extract(&self, text_block: &str) -> anyhow::Result<serde_json::Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(description: &str, sec_code: Option<&str>) -> FilingSummary {
        FilingSummary {
            doc_id: "S100XB01".to_string(),
            sec_code: sec_code.map(str::to_string),
            filer_name: Some("テスト株式会社".to_string()),
            doc_description: Some(description.to_string()),
            period_start: None,
            period_end: None,
            submit_datetime: None,
        }
    }

    #[test]
    fn test_filing_summary_reads_disclosure_list_json() {
        let raw = serde_json::json!({
            "docID": "S100XB01",
            "secCode": "72030",
            "filerName": "テスト株式会社",
            "docDescription": "有価証券報告書－第120期(2024/04/01－2025/03/31)",
            "periodStart": "2024-04-01",
            "periodEnd": "2025-03-31",
            "submitDateTime": "2025-06-18 13:30",
            "formCode": "030000"
        });
        let summary: FilingSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.doc_id, "S100XB01");
        assert_eq!(summary.sec_code.as_deref(), Some("72030"));
        assert_eq!(
            summary.period_end,
            Some(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())
        );
        assert!(summary.is_annual_report());
    }

    #[test]
    fn test_annual_report_filter_rejects_amendments() {
        assert!(!summary("訂正有価証券報告書－第120期", Some("72030")).is_annual_report());
    }

    #[test]
    fn test_annual_report_filter_rejects_unlisted_filers() {
        assert!(!summary("有価証券報告書－第120期", None).is_annual_report());
    }

    #[test]
    fn test_annual_report_filter_rejects_other_filing_types() {
        assert!(!summary("四半期報告書－第121期第１四半期", Some("72030")).is_annual_report());
        assert!(!summary("臨時報告書", Some("72030")).is_annual_report());
    }
}
