use crate::error::FormatError;
use crate::model::{
    HeaderValue, Headers, ParamValue, QueryParams, REQUEST_METHOD, REQUEST_URL, RESPONSE_CODE,
    RESPONSE_STATUS,
};
use indexmap::map::Entry;
use once_cell::sync::Lazy;
use regex::Regex;

// a line break followed by indentation continues the previous field
static FOLDED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n[\t ]+").expect("folded line regex is valid"));

// value may be omitted entirely for an empty field ('X-Empty:')
static HEADER_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]+):(?: (.*))?$").expect("header field regex is valid"));

static REQUEST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+) +(\S+) +HTTP/([0-9.]+)\s*$").expect("request line regex is valid")
});

static STATUS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^HTTP/([0-9.]+) ([0-9]{3})(?: (.*))?$").expect("status line regex is valid")
});

static NAME_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s-]+").expect("name separator regex is valid"));

pub struct Parser {}

impl Parser {
    /// Parses a raw CRLF separated header block.
    ///
    /// Every line has to be a header field, a request line or a status line, tried in that
    /// order. Header names are canonicalized (see `Parser::canonicalize_header_name`), repeated
    /// names collect their values into a list. A request line adds the `Request Method` and
    /// `Request Url` keys, a status line `Response Code` and `Response Status`.
    pub fn parse_headers(raw_headers: &str) -> Result<Headers, FormatError> {
        let unfolded = FOLDED_LINE.replace_all(raw_headers, " ");
        let unfolded = unfolded.trim();

        let mut headers = Headers::new();
        if unfolded.is_empty() {
            return Ok(headers);
        }

        for line in unfolded.split("\r\n") {
            if let Some(captures) = HEADER_FIELD.captures(line) {
                let name = Parser::canonicalize_header_name(&captures[1]);
                let value = captures
                    .get(2)
                    .map_or("", |value| value.as_str())
                    .trim()
                    .to_string();
                log::trace!("header field '{}': '{}'", name, value);

                match headers.entry(name) {
                    Entry::Occupied(mut entry) => entry.get_mut().push(value),
                    Entry::Vacant(entry) => {
                        entry.insert(HeaderValue::Text(value));
                    }
                }
                continue;
            }

            if let Some(captures) = REQUEST_LINE.captures(line) {
                log::trace!("request line: '{}'", line);
                // the http version is matched but not kept
                headers.insert(
                    REQUEST_METHOD.to_string(),
                    HeaderValue::Text(captures[1].trim().to_string()),
                );
                headers.insert(
                    REQUEST_URL.to_string(),
                    HeaderValue::Text(captures[2].trim().to_string()),
                );
                continue;
            }

            if let Some(captures) = STATUS_LINE.captures(line) {
                log::trace!("status line: '{}'", line);
                let code = captures[2]
                    .parse::<u16>()
                    .map_err(|_| FormatError::InvalidHeaderLine(line.to_string()))?;
                let status = captures.get(3).map_or("", |status| status.as_str()).trim();
                headers.insert(RESPONSE_CODE.to_string(), HeaderValue::Code(code));
                headers.insert(
                    RESPONSE_STATUS.to_string(),
                    HeaderValue::Text(status.to_string()),
                );
                continue;
            }

            log::debug!("unrecognized header line: '{}'", line);
            return Err(FormatError::InvalidHeaderLine(line.to_string()));
        }

        log::debug!("parsed {} header entries", headers.len());
        Ok(headers)
    }

    /// Rewrites a header name to `Title-Case-With-Hyphens`.
    ///
    /// Runs of whitespace and hyphens collapse into one hyphen, so `x   foo-bar` becomes
    /// `X-Foo-Bar`. Only surrounding whitespace is trimmed, a leading or trailing hyphen is kept.
    pub fn canonicalize_header_name(name: &str) -> String {
        let lowered = name.to_lowercase();
        NAME_SEPARATOR
            .split(lowered.trim())
            .map(capitalize)
            .collect::<Vec<String>>()
            .join("-")
    }

    /// Returns the raw query component of `url`: everything after the first `?` up to a `#`.
    ///
    /// The rest of the url is not validated, so relative references and urls with an odd host
    /// or port work the same. `None` if the url has no query.
    pub fn query_string(url: &str) -> Option<&str> {
        let without_fragment = url.split_once('#').map_or(url, |(before, _)| before);
        without_fragment.split_once('?').map(|(_, query)| query)
    }

    /// Parses the query of `url`, every parameter becomes a list unless it is listed in
    /// `collapsed_params`.
    ///
    /// A collapsed parameter is stored as a single value and may occur only once.
    pub fn query_params(url: &str, collapsed_params: &[&str]) -> Result<QueryParams, FormatError> {
        let mut params = QueryParams::new();
        for (name, value) in Parser::query_pairs(url) {
            let collapsed = collapsed_params.contains(&name.as_str());
            match params.entry(name) {
                Entry::Vacant(entry) => {
                    let value = if collapsed {
                        ParamValue::Single(value)
                    } else {
                        ParamValue::List(vec![value])
                    };
                    entry.insert(value);
                }
                Entry::Occupied(entry) if collapsed => {
                    return Err(FormatError::RepeatedCollapsedParam(entry.key().clone()));
                }
                Entry::Occupied(mut entry) => entry.get_mut().push(value),
            }
        }
        Ok(params)
    }

    /// Parses the query of `url`, every parameter is a single value unless it occurs more than
    /// once.
    ///
    /// Only names listed in `expected_array_params` may repeat, they are turned into a list on
    /// their second occurrence.
    pub fn query_params_collapsed(
        url: &str,
        expected_array_params: &[&str],
    ) -> Result<QueryParams, FormatError> {
        let mut params = QueryParams::new();
        for (name, value) in Parser::query_pairs(url) {
            match params.entry(name) {
                Entry::Vacant(entry) => {
                    entry.insert(ParamValue::Single(value));
                }
                Entry::Occupied(mut entry) => {
                    if !expected_array_params.contains(&entry.key().as_str()) {
                        return Err(FormatError::UnexpectedRepeatedParam(entry.key().clone()));
                    }
                    entry.get_mut().push(value);
                }
            }
        }
        Ok(params)
    }

    // Decoded (name, value) pairs in query order. A token without '=' has an empty value, so an
    // empty token ('a=1&&b=2') is the pair ("", ""). An empty query has no tokens at all.
    fn query_pairs(url: &str) -> Vec<(String, String)> {
        let query = match Parser::query_string(url) {
            Some(query) if !query.is_empty() => query,
            _ => return Vec::new(),
        };

        let pairs = query
            .split('&')
            .map(|token| {
                let (name, value) = token.split_once('=').unwrap_or((token, ""));
                (decode(name), decode(value))
            })
            .collect::<Vec<(String, String)>>();
        log::debug!("found {} query pairs in '{}'", pairs.len(), url);
        pairs
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// '+' is kept as is, only %XX sequences are decoded
fn decode(encoded: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(encoded.as_bytes())).into_owned()
}
