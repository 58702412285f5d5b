use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ParseError;

/// Collects every namespace declaration in the document, in declaration
/// order, as (prefix, URI) pairs. The default namespace is listed under an
/// empty prefix. A prefix declared more than once keeps its first binding;
/// filings do not rebind prefixes in practice.
pub fn declared_namespaces(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut table: Vec<(String, String)> = Vec::new();
    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                // Malformed documents are reported by the tree parse; the
                // scan just keeps whatever was declared before the breakage.
                log::debug!("Namespace scan stopped early: {}", err);
                break;
            }
        };
        match event {
            Event::Start(element) | Event::Empty(element) => {
                for attr in element.attributes().flatten() {
                    let key = attr.key.as_ref();
                    let prefix = if key == b"xmlns" {
                        Some(String::new())
                    } else if let Some(rest) = key.strip_prefix(b"xmlns:") {
                        Some(String::from_utf8_lossy(rest).into_owned())
                    } else {
                        None
                    };
                    let Some(prefix) = prefix else { continue };
                    if table.iter().any(|(seen, _)| *seen == prefix) {
                        continue;
                    }
                    if let Ok(uri) = attr.unescape_value() {
                        table.push((prefix, uri.into_owned()));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    table
}

/// Picks the first table entry whose URI hosts the marker element according
/// to `probe`. The taxonomy prefix varies by filing vintage, so this is how
/// a filing's own jp-crp namespace is identified. No match means no
/// namespace-qualified lookup can ever succeed for this filing.
pub fn resolve_taxonomy_namespace<'t, P>(
    namespaces: &'t [(String, String)],
    marker: &'static str,
    probe: P,
) -> Result<&'t (String, String), ParseError>
where
    P: Fn(&str, &str) -> bool,
{
    for entry in namespaces {
        if probe(&entry.1, marker) {
            log::debug!("Resolved taxonomy namespace {:?} -> {}", entry.0, entry.1);
            return Ok(entry);
        }
    }
    Err(ParseError::NamespaceNotFound { marker })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
            xmlns:jpcrp_cor="http://disclosure.edinet-fsa.go.jp/taxonomy/jpcrp/2024-11-01/jpcrp_cor"
            xmlns="http://default.example/ns">
  <xbrli:context id="FilingDateInstant"/>
</xbrli:xbrl>"#;

    #[test]
    fn test_declarations_come_back_in_document_order() {
        let table = declared_namespaces(SAMPLE);
        assert_eq!(
            table,
            vec![
                (
                    "xbrli".to_string(),
                    "http://www.xbrl.org/2003/instance".to_string()
                ),
                (
                    "jpcrp_cor".to_string(),
                    "http://disclosure.edinet-fsa.go.jp/taxonomy/jpcrp/2024-11-01/jpcrp_cor"
                        .to_string()
                ),
                (String::new(), "http://default.example/ns".to_string()),
            ]
        );
    }

    #[test]
    fn test_first_declaration_of_a_prefix_wins() {
        let xml = r#"<a xmlns:p="http://one"><b xmlns:p="http://two"/></a>"#;
        assert_eq!(
            declared_namespaces(xml),
            vec![("p".to_string(), "http://one".to_string())]
        );
    }

    #[test]
    fn test_declarations_on_nested_elements_are_found() {
        let xml = r#"<a><b xmlns:deep="http://deep"/></a>"#;
        assert_eq!(
            declared_namespaces(xml),
            vec![("deep".to_string(), "http://deep".to_string())]
        );
    }

    #[test]
    fn test_resolution_takes_the_first_probe_match() {
        let table = vec![
            ("a".to_string(), "http://a".to_string()),
            ("b".to_string(), "http://host".to_string()),
            ("c".to_string(), "http://host".to_string()),
        ];
        let entry =
            resolve_taxonomy_namespace(&table, "Marker", |uri, marker| {
                assert_eq!(marker, "Marker");
                uri == "http://host"
            })
            .unwrap();
        assert_eq!(entry.0, "b");
    }

    #[test]
    fn test_resolution_failure_names_the_marker() {
        let table = vec![("a".to_string(), "http://a".to_string())];
        let err = resolve_taxonomy_namespace(&table, "Marker", |_, _| false).unwrap_err();
        assert!(matches!(err, ParseError::NamespaceNotFound { marker: "Marker" }));
    }
}
