//! Small text utilities around http messages.
//!
//! `Parser::parse_headers` turns a raw header block (status or request line followed by header
//! fields, folded lines and repeated fields included) into an ordered map of canonical header
//! names. `Serializer::build_query_string` encodes parameters into a query string and
//! `Parser::query_params` / `Parser::query_params_collapsed` read them back from a url,
//! differing only in when a parameter is stored as a list.
//!
//! All functions are pure, malformed input is reported as a `FormatError`.

mod error;
mod model;
mod parser;
mod serializer;
pub use error::FormatError;
pub use model::{
    query_parameters_from, HeaderValue, Headers, ParamValue, QueryParameters, QueryParams, Value,
    REQUEST_METHOD, REQUEST_URL, RESPONSE_CODE, RESPONSE_STATUS,
};
pub use parser::Parser;
pub use serializer::Serializer;
