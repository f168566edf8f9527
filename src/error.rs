#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FormatError {
    #[error("Expected a header in the form of '<Key>: <Value>', a request line '<METHOD> <URL> HTTP/<version>' or a status line 'HTTP/<version> <code> <status>'. Found line: '{0}'")]
    InvalidHeaderLine(String),

    // only raised by `Parser::query_params`
    #[error("Query parameter '{0}' is collapsed to a single value but occurs more than once.")]
    RepeatedCollapsedParam(String),

    // only raised by `Parser::query_params_collapsed`
    #[error("Query parameter '{0}' occurs more than once but is not expected to be an array.")]
    UnexpectedRepeatedParam(String),

    // only raised by `Serializer::serialize_headers`
    #[error("Header name or value cannot be written on a single line: '{0}'")]
    InvalidHeaderValue(String),
}

impl FormatError {
    /// The offending fragment: the header line, parameter name or header value.
    pub fn fragment(&self) -> &str {
        match self {
            FormatError::InvalidHeaderLine(fragment)
            | FormatError::RepeatedCollapsedParam(fragment)
            | FormatError::UnexpectedRepeatedParam(fragment)
            | FormatError::InvalidHeaderValue(fragment) => fragment,
        }
    }
}
