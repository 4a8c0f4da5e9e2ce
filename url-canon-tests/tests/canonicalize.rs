//! Table-driven tests of URL canonicalization.

use std::fs::File;
use std::path::Path;

use url_canon::canonicalize::{Canonicalizer, Rfc2396Canonicalizer};
use url_canon::url::{ComponentError, Url};
use url_canon::Domain;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct TestCase {
    name: String,
    url: Components,
    expected: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct Components {
    scheme: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    path: String,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    fragment: Option<String>,
}

impl Components {
    fn build(&self) -> Result<Url, ComponentError> {
        let host = self
            .host
            .as_deref()
            .map(|host| Domain::parse(host).expect("valid domain"));
        let url = Url::new(&self.scheme)?
            .with_host(host)?
            .with_username(&self.username)?
            .with_password(&self.password)?
            .with_port(self.port)?
            .with_path(&self.path)?
            .with_query(self.query.as_deref())?
            .with_fragment(self.fragment.as_deref());
        Ok(url)
    }
}

fn load_cases() -> Vec<TestCase> {
    let path = Path::new("assets/canonicalize.json");
    let file = File::open(path).expect("test file not found");
    serde_json::from_reader(file).expect("failed to load test asset")
}

#[test]
fn rfc2396() {
    for case in load_cases() {
        let name = &case.name;
        let url = case.url.build().expect(name);
        let canonical = Rfc2396Canonicalizer.canonicalize(&url).expect(name);
        assert_eq!(canonical.to_string(), case.expected, "case={name:?}");

        assert_eq!(canonical.scheme(), url.scheme(), "case={name:?}");
        assert_eq!(canonical.host(), url.host(), "case={name:?}");
        assert_eq!(canonical.port(), url.port(), "case={name:?}");

        let twice = Rfc2396Canonicalizer.canonicalize(&canonical).expect(name);
        assert_eq!(twice, canonical, "case={name:?}");
    }
}
