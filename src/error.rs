use thiserror::Error;

/// Failure raised while extracting records from a filing.
///
/// Absent data is never an error: a filing without a shareholders block, an
/// officer index without a usable table row, or a date literal that does not
/// parse all come back as empty sequences or `None`. Only structural
/// surprises are raised, and they are fatal for that filing only: callers
/// skip the filing and keep going.
#[derive(Debug, Error)]
pub enum ParseError {
    /// None of the filing's declared namespaces contains the taxonomy
    /// marker element, so namespace-qualified lookups are impossible.
    #[error("no declared namespace contains a <{marker}> element")]
    NamespaceNotFound { marker: &'static str },

    /// Anything else that went wrong during block location, sequence
    /// walking or table alignment, wrapping the underlying cause.
    #[error("{context}: {source}")]
    Parsing {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ParseError {
    pub(crate) fn parsing(context: &'static str, source: anyhow::Error) -> Self {
        ParseError::Parsing { context, source }
    }
}
