use crate::error::FormatError;
use crate::model::{
    HeaderValue, Headers, QueryParameters, Value, REQUEST_METHOD, REQUEST_URL, RESPONSE_CODE,
    RESPONSE_STATUS,
};

// the parser drops the version, so a serialized block always claims HTTP/1.1
const HTTP_VERSION: &str = "HTTP/1.1";

const METADATA_KEYS: [&str; 4] = [REQUEST_METHOD, REQUEST_URL, RESPONSE_CODE, RESPONSE_STATUS];

pub struct Serializer {}

impl Serializer {
    /// Builds a query string (without leading '?') from `parameters`.
    ///
    /// Names and values are percent encoded with a space encoded as `%20`. A list emits one
    /// pair per element, an empty list emits nothing. Booleans are written as `true` / `false`.
    pub fn build_query_string(parameters: &QueryParameters) -> String {
        let mut pairs: Vec<String> = Vec::new();
        for (name, value) in parameters.iter() {
            let name = urlencoding::encode(name);
            match value {
                Value::List(values) => {
                    for value in values.iter() {
                        pairs.push(format!("{}={}", name, urlencoding::encode(value)));
                    }
                }
                Value::Bool(false) => pairs.push(format!("{}=false", name)),
                Value::Bool(true) => pairs.push(format!("{}=true", name)),
                Value::Scalar(value) => {
                    pairs.push(format!("{}={}", name, urlencoding::encode(value)))
                }
            }
        }
        pairs.join("&")
    }

    /// Writes `headers` back into a CRLF terminated header block.
    ///
    /// A request line is written if both `Request Method` and `Request Url` are present, a
    /// status line if `Response Code` is present. When both exist they keep the order of their
    /// keys in `headers`. Every other entry becomes one `Name: value` line per value.
    ///
    /// Fails if a name or value would span more than one line, or a name contains a colon.
    pub fn serialize_headers(headers: &Headers) -> Result<String, FormatError> {
        let mut start_lines: Vec<(usize, String)> = Vec::new();

        if let (Some((method_index, _, method)), Some((url_index, _, url))) = (
            headers.get_full(REQUEST_METHOD),
            headers.get_full(REQUEST_URL),
        ) {
            start_lines.push((
                method_index.min(url_index),
                format!("{} {} {}", method, url, HTTP_VERSION),
            ));
        }

        if let Some((code_index, _, code)) = headers.get_full(RESPONSE_CODE) {
            let status = headers
                .get(RESPONSE_STATUS)
                .map(HeaderValue::to_string)
                .unwrap_or_default();
            let line = format!("{} {} {}", HTTP_VERSION, code, status);
            start_lines.push((code_index, line.trim_end().to_string()));
        }
        start_lines.sort_by_key(|(position, _)| *position);

        let mut result = String::new();
        for (_, line) in start_lines.iter() {
            result.push_str(single_line(line)?);
            result.push_str("\r\n");
        }

        for (name, value) in headers
            .iter()
            .filter(|(name, _)| !METADATA_KEYS.contains(&name.as_str()))
        {
            if name.contains(':') {
                return Err(FormatError::InvalidHeaderValue(name.to_string()));
            }
            let name = single_line(name)?;
            for value in value.values() {
                result.push_str(&format!("{}: {}\r\n", name, single_line(&value)?));
            }
        }
        Ok(result)
    }
}

// a line break inside a name or value would start a new header line
fn single_line(text: &str) -> Result<&str, FormatError> {
    if text.contains(|c| c == '\r' || c == '\n') {
        return Err(FormatError::InvalidHeaderValue(text.to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{query_parameters_from, ParamValue};
    use crate::Parser;
    use pretty_assertions::assert_eq;

    fn parameters(entries: Vec<(&str, Value)>) -> QueryParameters {
        entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    #[test]
    pub fn build_query_string() {
        let parameters = parameters(vec![
            ("param1", Value::from(vec!["value", "another value"])),
            ("param2", Value::from("a value")),
            ("param3", Value::from(false)),
        ]);
        assert_eq!(
            Serializer::build_query_string(&parameters),
            "param1=value&param1=another%20value&param2=a%20value&param3=false"
        );
    }

    #[test]
    pub fn build_query_string_encoding() {
        let parameters = parameters(vec![
            ("a b", Value::from("x+y/z?&=")),
            ("safe", Value::from("AZaz09-_.~")),
            ("umlaut", Value::from("ä")),
            ("on", Value::from(true)),
            ("n", Value::from(42)),
        ]);
        assert_eq!(
            Serializer::build_query_string(&parameters),
            "a%20b=x%2By%2Fz%3F%26%3D&safe=AZaz09-_.~&umlaut=%C3%A4&on=true&n=42"
        );
    }

    #[test]
    pub fn build_query_string_empty() {
        assert_eq!(Serializer::build_query_string(&QueryParameters::new()), "");

        let parameters = parameters(vec![
            ("none", Value::List(Vec::new())),
            ("some", Value::from("1")),
        ]);
        assert_eq!(Serializer::build_query_string(&parameters), "some=1");
    }

    #[test]
    pub fn build_then_parse_keeps_lists() {
        let built = parameters(vec![
            ("tags", Value::from(vec!["a b", "c&d", "e=f"])),
            ("name", Value::from("some name")),
            ("flag", Value::from(true)),
            ("off", Value::from(false)),
        ]);
        let url = format!("http://x/?{}", Serializer::build_query_string(&built));
        let parsed = Parser::query_params(&url, &[]).unwrap();

        assert_eq!(parsed["tags"], ParamValue::from(vec!["a b", "c&d", "e=f"]));
        assert_eq!(parsed["name"], ParamValue::from(vec!["some name"]));
        assert_eq!(parsed["flag"], ParamValue::from(vec!["true"]));
        assert_eq!(parsed["off"], ParamValue::from(vec!["false"]));
        assert_eq!(
            parsed.keys().collect::<Vec<_>>(),
            vec!["tags", "name", "flag", "off"]
        );
    }

    #[test]
    pub fn parse_then_build_is_stable() {
        let query = "single=boo&multi=wee&multi=a%20b";
        let parsed =
            Parser::query_params_collapsed(&format!("/?{}", query), &["multi"]).unwrap();
        assert_eq!(
            Serializer::build_query_string(&query_parameters_from(&parsed)),
            query
        );
    }

    #[test]
    pub fn serialize_response_headers() {
        let raw = "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\nSet-Cookie: a=b\r\nSet-Cookie: c=d\r\n";
        let headers = Parser::parse_headers(raw).unwrap();
        assert_eq!(
            Serializer::serialize_headers(&headers).unwrap(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nSet-Cookie: a=b\r\nSet-Cookie: c=d\r\n"
        );
    }

    #[test]
    pub fn serialize_request_headers() {
        let raw = "GET /x HTTP/2\r\nHost: foo.com\r\n";
        let headers = Parser::parse_headers(raw).unwrap();
        let serialized = Serializer::serialize_headers(&headers).unwrap();
        assert_eq!(serialized, "GET /x HTTP/1.1\r\nHost: foo.com\r\n");
        assert_eq!(Parser::parse_headers(&serialized), Ok(headers));
    }

    #[test]
    pub fn serialize_status_without_reason_phrase() {
        let headers = Parser::parse_headers("HTTP/1.1 204\r\nServer: x").unwrap();
        let serialized = Serializer::serialize_headers(&headers).unwrap();
        assert_eq!(serialized, "HTTP/1.1 204\r\nServer: x\r\n");
        assert_eq!(Parser::parse_headers(&serialized), Ok(headers));
    }

    #[test]
    pub fn serialize_fields_only() {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), HeaderValue::from("*/*"));
        headers.insert("Vary".to_string(), HeaderValue::from(vec!["a", "b"]));
        assert_eq!(
            Serializer::serialize_headers(&headers).unwrap(),
            "Accept: */*\r\nVary: a\r\nVary: b\r\n"
        );
        assert_eq!(Serializer::serialize_headers(&Headers::new()).unwrap(), "");
    }

    #[test]
    pub fn serialize_request_and_status_lines() {
        let raw = "GET / HTTP/1.1\r\nHTTP/1.1 200 OK\r\nHost: a";
        let headers = Parser::parse_headers(raw).unwrap();
        let serialized = Serializer::serialize_headers(&headers).unwrap();
        assert_eq!(serialized, "GET / HTTP/1.1\r\nHTTP/1.1 200 OK\r\nHost: a\r\n");
        assert_eq!(Parser::parse_headers(&serialized), Ok(headers));

        let raw = "HTTP/1.1 404 Not Found\r\nPOST /form HTTP/1.1";
        let headers = Parser::parse_headers(raw).unwrap();
        let serialized = Serializer::serialize_headers(&headers).unwrap();
        assert_eq!(serialized, "HTTP/1.1 404 Not Found\r\nPOST /form HTTP/1.1\r\n");
        assert_eq!(Parser::parse_headers(&serialized), Ok(headers));
    }

    #[test]
    pub fn serialize_rejects_line_breaks() {
        let mut headers = Headers::new();
        headers.insert("X-Evil".to_string(), HeaderValue::from("a\r\nSet-Cookie: b"));
        assert_eq!(
            Serializer::serialize_headers(&headers),
            Err(FormatError::InvalidHeaderValue("a\r\nSet-Cookie: b".to_string()))
        );

        let mut headers = Headers::new();
        headers.insert("X-List".to_string(), HeaderValue::from(vec!["ok", "bad\n"]));
        assert_eq!(
            Serializer::serialize_headers(&headers),
            Err(FormatError::InvalidHeaderValue("bad\n".to_string()))
        );

        let mut headers = Headers::new();
        headers.insert("X-Name: injected".to_string(), HeaderValue::from("v"));
        assert_eq!(
            Serializer::serialize_headers(&headers),
            Err(FormatError::InvalidHeaderValue("X-Name: injected".to_string()))
        );

        let mut headers = Headers::new();
        headers.insert(REQUEST_METHOD.to_string(), HeaderValue::from("GET"));
        headers.insert(REQUEST_URL.to_string(), HeaderValue::from("/\r\nHost: x"));
        assert_eq!(
            Serializer::serialize_headers(&headers),
            Err(FormatError::InvalidHeaderValue(
                "GET /\r\nHost: x HTTP/1.1".to_string()
            ))
        );
    }
}
