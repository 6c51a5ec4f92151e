//! Data sources
//!
//! A viewer finds its data through, in order of precedence, an explicit
//! location, the `data-couplings` attribute of its host element, or the `data`
//! parameter of the page query string. The first non-empty one wins.
use crate::data::ZoomData;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::fmt;
use std::fs::File;
use std::io::BufReader;

pub const HOST_ATTRIBUTE: &str = "data-couplings";
pub const QUERY_PARAMETER: &str = "data";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Explicit(String),
    HostAttribute(String),
    Query(String),
}

impl DataSource {
    pub fn location(&self) -> &str {
        match self {
            DataSource::Explicit(s) | DataSource::HostAttribute(s) | DataSource::Query(s) => s,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Explicit(s) => write!(f, "{}", s),
            DataSource::HostAttribute(s) => write!(f, "{} (from {})", s, HOST_ATTRIBUTE),
            DataSource::Query(s) => write!(f, "{} (from ?{}=)", s, QUERY_PARAMETER),
        }
    }
}

fn decode(value: &str) -> Option<String> {
    let value = value.replace('+', " ");
    match urlencoding::decode(&value) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(e) => {
            warn!("ignoring undecodable query value {:?}: {}", value, e);
            None
        }
    }
}

/// Percent-decoded value of `name` in a query string, with or without the
/// leading `?`.
pub fn query_parameter(query: &str, name: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| decode(key).as_deref() == Some(name))
        .and_then(|(_, value)| decode(value))
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

pub fn resolve(
    explicit: Option<&str>,
    host_attribute: Option<&str>,
    query: Option<&str>,
) -> Option<DataSource> {
    let source = non_empty(explicit)
        .map(DataSource::Explicit)
        .or_else(|| non_empty(host_attribute).map(DataSource::HostAttribute))
        .or_else(|| {
            let value = query.and_then(|q| query_parameter(q, QUERY_PARAMETER));
            non_empty(value.as_deref()).map(DataSource::Query)
        });
    debug!("resolved data source: {:?}", source);
    source
}

/// Reads a dataset from a local path or `file://` URL.
pub fn load(location: &str) -> Result<ZoomData> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        return Err(Error::UnsupportedSource(location.to_string()));
    }
    let path = location.strip_prefix("file://").unwrap_or(location);
    let file = File::open(path)?;
    ZoomData::from_reader(BufReader::new(file))
}

pub fn load_source(source: Option<&DataSource>) -> Result<ZoomData> {
    let source = source.ok_or(Error::NoDataSource)?;
    load(source.location())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evzoom_test_data::TestFile;

    #[test]
    fn test_precedence() {
        assert_eq!(
            resolve(Some("a.json"), Some("b.json"), Some("?data=c.json")),
            Some(DataSource::Explicit("a.json".into()))
        );
        assert_eq!(
            resolve(Some("  "), Some("b.json"), Some("?data=c.json")),
            Some(DataSource::HostAttribute("b.json".into()))
        );
        assert_eq!(
            resolve(None, Some(""), Some("?x=1&data=c.json")),
            Some(DataSource::Query("c.json".into()))
        );
        assert_eq!(resolve(None, None, Some("?data=")), None);
        assert_eq!(resolve(None, None, None), None);
    }

    #[test]
    fn test_query_decoding() {
        assert_eq!(
            query_parameter("data=my%20dir%2Fcouplings.json", "data").as_deref(),
            Some("my dir/couplings.json")
        );
        assert_eq!(query_parameter("?data=a+b", "data").as_deref(), Some("a b"));
        assert_eq!(query_parameter("?flag&data=x", "flag").as_deref(), Some(""));
        assert_eq!(query_parameter("?other=x", "data"), None);
    }

    #[test]
    fn test_load() {
        let (path, _temp) = TestFile::couplings_02().create_temp().unwrap();
        let data = load(&path).unwrap();
        assert_eq!(data.len(), 10);
        let data = load(&format!("file://{}", path)).unwrap();
        assert_eq!(data.couplings.len(), 2);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            load("https://example.org/couplings.json"),
            Err(Error::UnsupportedSource(_))
        ));
        assert!(matches!(load("/does/not/exist.json"), Err(Error::Io(_))));
        let (path, _temp) = TestFile::malformed_01().create_temp().unwrap();
        assert!(matches!(load(&path), Err(Error::Json(_))));
        assert!(matches!(load_source(None), Err(Error::NoDataSource)));
    }
}
