//! One filing's XBRL instance: decode, parse, resolve the taxonomy
//! namespace, then pull officer and shareholder records out of it.

use std::borrow::Cow;

use anyhow::anyhow;
use itertools::izip;
use once_cell::unsync::OnceCell;
use roxmltree::{Document, Node};

use crate::error::ParseError;

use super::namespace::{declared_namespaces, resolve_taxonomy_namespace};
use super::records::{OfficerRecord, ShareholderRecord};
use super::table::{table_from_html, TableRow};
use super::text::normalize_whitespace;

/// Marker element probed during namespace resolution. Every supported
/// taxonomy vintage hosts it, whatever prefix the filing declares.
const SHAREHOLDERS_TEXT_BLOCK: &str = "MajorShareholdersTextBlock";

/// Officer text-block element names across taxonomy vintages, newest
/// first. The first candidate with a non-empty element wins.
const OFFICER_BLOCK_CANDIDATES: &[&str] = &[
    "InformationAboutOfficersTextBlock",
    "InformationAboutDirectorsTextBlock",
    "InformationAboutDirectorsAndCorporateAuditorsTextBlock",
];

const OFFICER_NAMES: &str = "NameInformationAboutDirectorsAndCorporateAuditors";
const OFFICER_TITLES: &str =
    "OfficialTitleOrPositionInformationAboutDirectorsAndCorporateAuditors";
const OFFICER_BIRTH_DATES: &str = "DateOfBirthInformationAboutDirectorsAndCorporateAuditors";

/// Officer blocks are reported as of the filing date; other contexts hold
/// prior-year copies.
const FILING_DATE_CONTEXT: &str = "FilingDateInstant";

/// Officer table rows carry the biography in cell 3 and shares owned in
/// cell 5. Narrower rows (headers, notes) cannot be officer rows.
const OFFICER_ROW_MIN_CELLS: usize = 6;
/// Shareholder rows: name, address, shares held, ownership ratio.
const SHAREHOLDER_ROW_MIN_CELLS: usize = 4;

/// Aggregate row appended to shareholder tables; not a shareholder.
const AGGREGATE_ROW_NAME: &str = "計";

/// Decodes raw filing bytes to text. Instances are UTF-8, with or without
/// a byte order mark; bytes that do not decode cleanly are a structural
/// failure, not something to repair.
pub fn decode_filing(bytes: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    let (text, encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if malformed {
        return Err(ParseError::parsing(
            "failed to decode filing bytes",
            anyhow!("byte stream is not valid {}", encoding.name()),
        ));
    }
    Ok(text)
}

/// Read-only view over one parsed filing, alive for the duration of an
/// extraction pass.
///
/// Construction parses the XML tree and scans the namespace declarations;
/// the taxonomy namespace itself is resolved once, lazily, the first time
/// an extractor needs it. All element lookups are qualified against the
/// resolved URI, never against a hardcoded prefix.
#[derive(Debug)]
pub struct FilingDocument<'a> {
    doc: Document<'a>,
    namespaces: Vec<(String, String)>,
    taxonomy: OnceCell<(String, String)>,
}

impl<'a> FilingDocument<'a> {
    /// Parses a filing. A leading byte order mark is tolerated; anything
    /// the XML parser rejects is reported as a parsing failure.
    pub fn parse(xml: &'a str) -> Result<Self, ParseError> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let namespaces = declared_namespaces(xml);
        let doc = Document::parse(xml)
            .map_err(|err| ParseError::parsing("malformed filing document", anyhow!(err)))?;
        Ok(FilingDocument {
            doc,
            namespaces,
            taxonomy: OnceCell::new(),
        })
    }

    /// Namespace declarations as scanned, in document order.
    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    /// Prefix of the taxonomy namespace this filing declares, resolving it
    /// now if no extractor has done so yet.
    pub fn taxonomy_prefix(&self) -> Result<&str, ParseError> {
        self.taxonomy().map(|(prefix, _)| prefix.as_str())
    }

    /// Raw officers text block, located through the candidate element
    /// names. `None` when no candidate matches; the record extractor
    /// treats that as fatal, the language-model path decides for itself.
    pub fn officers_text_block(&self) -> Result<Option<&str>, ParseError> {
        let (_, uri) = self.taxonomy()?;
        Ok(self.officer_block_text(uri))
    }

    /// Raw shareholders text block, when the filing has one.
    pub fn shareholders_text_block(&self) -> Result<Option<&str>, ParseError> {
        let (_, uri) = self.taxonomy()?;
        Ok(self
            .first_qualified(uri, SHAREHOLDERS_TEXT_BLOCK)
            .and_then(|node| node.text()))
    }

    /// Officer records assembled from the parallel name/title/birth-date
    /// element sequences paired position by position with the officer
    /// table rows. Positions without a usable row are skipped whole; a
    /// record is never padded with missing fields.
    pub fn extract_officers(&self) -> Result<Vec<OfficerRecord>, ParseError> {
        self.officers_inner()
            .map_err(|err| ParseError::parsing("failed to extract officer information", err))
    }

    /// Shareholder records from the major shareholders table. A filing
    /// without the block, or with an empty one, legitimately has no major
    /// shareholders: that is an empty list, not an error.
    pub fn extract_shareholders(&self) -> Result<Vec<ShareholderRecord>, ParseError> {
        self.shareholders_inner()
            .map_err(|err| ParseError::parsing("failed to extract major shareholders", err))
    }

    fn officers_inner(&self) -> anyhow::Result<Vec<OfficerRecord>> {
        let (_, uri) = self.taxonomy()?;

        let names = self.qualified_texts(uri, OFFICER_NAMES);
        let titles = self.qualified_texts(uri, OFFICER_TITLES);
        let births = self.qualified_texts(uri, OFFICER_BIRTH_DATES);
        if names.len() != titles.len() || names.len() != births.len() {
            log::warn!(
                "Officer sequences diverge: {} names, {} titles, {} birth dates",
                names.len(),
                titles.len(),
                births.len()
            );
        }
        // Pairing stops at the shortest sequence.
        let entries: Vec<(&str, &str, &str)> = izip!(names, titles, births).collect();

        let block = self
            .officer_block_text(uri)
            .ok_or_else(|| anyhow!("no officer text block under any known element name"))?;
        let rows = table_from_html(block);

        let aligned = align_by_position(entries.len(), &rows, OFFICER_ROW_MIN_CELLS);
        if !aligned.unmatched.is_empty() {
            log::warn!(
                "{} of {} officers have no usable table row and were skipped",
                aligned.unmatched.len(),
                entries.len()
            );
        }

        let officers: Vec<OfficerRecord> = aligned
            .matched
            .iter()
            .map(|&(index, row)| {
                let (name, title, birth) = entries[index];
                OfficerRecord {
                    name: normalize_whitespace(name),
                    title: normalize_whitespace(title),
                    birth_date: normalize_whitespace(birth),
                    // Ideographic spaces separate biography entries; keep
                    // that structure as line breaks instead of flattening.
                    biography: row[3].replace('\u{3000}', "\n"),
                    shares_owned: normalize_whitespace(&row[5]),
                }
            })
            .collect();
        log::debug!("Extracted {} officer record(s)", officers.len());
        Ok(officers)
    }

    fn shareholders_inner(&self) -> anyhow::Result<Vec<ShareholderRecord>> {
        let (_, uri) = self.taxonomy()?;
        let block = match self
            .first_qualified(uri, SHAREHOLDERS_TEXT_BLOCK)
            .and_then(|node| node.text())
        {
            Some(block) => block,
            None => return Ok(Vec::new()),
        };

        let mut shareholders = Vec::new();
        for row in table_from_html(block) {
            if row.len() < SHAREHOLDER_ROW_MIN_CELLS {
                continue;
            }
            let name = normalize_whitespace(&row[0]);
            if name == AGGREGATE_ROW_NAME {
                log::debug!("Skipping aggregate shareholder row");
                continue;
            }
            shareholders.push(ShareholderRecord {
                name,
                address: normalize_whitespace(&row[1]),
                shares_held: normalize_whitespace(&row[2]),
                ownership_ratio: normalize_whitespace(&row[3]),
            });
        }
        log::debug!("Extracted {} shareholder record(s)", shareholders.len());
        Ok(shareholders)
    }

    /// Resolves and caches the taxonomy namespace. The probe asks whether
    /// a candidate URI actually qualifies the marker element somewhere in
    /// this document, so resolution follows the filing's own vintage.
    fn taxonomy(&self) -> Result<&(String, String), ParseError> {
        self.taxonomy.get_or_try_init(|| {
            let entry = resolve_taxonomy_namespace(
                &self.namespaces,
                SHAREHOLDERS_TEXT_BLOCK,
                |uri, marker| self.has_element(uri, marker),
            )?;
            Ok(entry.clone())
        })
    }

    fn has_element(&self, uri: &str, name: &str) -> bool {
        self.doc
            .descendants()
            .any(|node| is_qualified(&node, uri, name))
    }

    fn first_qualified(&self, uri: &str, name: &str) -> Option<Node<'_, 'a>> {
        self.doc
            .descendants()
            .find(|node| is_qualified(node, uri, name))
    }

    // Text of every matching element, in document order. Elements without
    // text contribute an empty string so positions stay aligned.
    fn qualified_texts(&self, uri: &str, name: &str) -> Vec<&str> {
        self.doc
            .descendants()
            .filter(|node| is_qualified(node, uri, name))
            .map(|node| node.text().unwrap_or(""))
            .collect()
    }

    fn officer_block_text(&self, uri: &str) -> Option<&str> {
        for candidate in OFFICER_BLOCK_CANDIDATES {
            let found = self.doc.descendants().find(|node| {
                is_qualified(node, uri, candidate)
                    && node.attribute("contextRef") == Some(FILING_DATE_CONTEXT)
            });
            // Only the first match per candidate is inspected; an empty
            // one falls through to the next (older) element name.
            if let Some(text) = found.and_then(|node| node.text()) {
                if !text.is_empty() {
                    log::debug!("Officer text block found under <{}>", candidate);
                    return Some(text);
                }
            }
        }
        None
    }
}

fn is_qualified(node: &Node, uri: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(uri)
}

/// Outcome of pairing sequence positions with table rows.
struct Alignment<'r> {
    matched: Vec<(usize, &'r TableRow)>,
    unmatched: Vec<usize>,
}

/// Pairs position `i` of a parallel element sequence with table row `i`.
/// Positions whose row is absent or narrower than `min_cells` land in
/// `unmatched`. Alignment is purely positional: there is no key to check
/// against, so sources that list officers in different orders would pair
/// wrong silently.
fn align_by_position(positions: usize, rows: &[TableRow], min_cells: usize) -> Alignment<'_> {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for index in 0..positions {
        match rows.get(index) {
            Some(row) if row.len() >= min_cells => matched.push((index, row)),
            _ => unmatched.push(index),
        }
    }
    Alignment { matched, unmatched }
}
