use std::time::Duration;

use tracing::debug;

use super::{Match, MatchSource, parse_matches, query_url};
use crate::error::{AutocompleteError, Result};

/// Fetches matches with `GET <url><percent-encoded query>`.
pub struct HttpMatchSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpMatchSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, None)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            url: url.into(),
            agent: builder.build(),
        }
    }
}

impl MatchSource for HttpMatchSource {
    fn fetch(&self, query: &str) -> Result<Vec<Match>> {
        let url = query_url(&self.url, query);
        debug!(%url, "requesting matches");

        // Non-2xx statuses surface as `ureq::Error::Status`.
        let response = self.agent.get(&url).call()?;
        let body = response.into_string().map_err(AutocompleteError::Body)?;
        parse_matches(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::HttpMatchSource;
    use crate::error::AutocompleteError;
    use crate::source::{Match, MatchSource};
    use mockito::{Matcher, Server};

    #[test]
    fn fetches_and_parses_json_array() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/countries")
            .match_query(Matcher::UrlEncoded("matching".into(), "Ca".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name":"Canada"},{"name":"Cameroon"}]"#)
            .create();

        let source = HttpMatchSource::new(format!("{}/countries?matching=", server.url()));
        let matches = source.fetch("Ca").expect("fetch should succeed");

        mock.assert();
        assert_eq!(matches, vec![Match::new("Canada"), Match::new("Cameroon")]);
    }

    #[test]
    fn query_with_spaces_round_trips_through_encoding() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/countries")
            .match_query(Matcher::UrlEncoded("matching".into(), "New Z".into()))
            .with_status(200)
            .with_body(r#"[{"name":"New Zealand"}]"#)
            .create();

        let source = HttpMatchSource::new(format!("{}/countries?matching=", server.url()));
        let matches = source.fetch("New Z").expect("fetch should succeed");

        mock.assert();
        assert_eq!(matches, vec![Match::new("New Zealand")]);
    }

    #[test]
    fn error_status_is_reported() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/countries")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();

        let source = HttpMatchSource::new(format!("{}/countries?matching=", server.url()));
        let err = source.fetch("Ca").expect_err("500 must fail");
        assert!(matches!(err, AutocompleteError::Http(_)));
    }

    #[test]
    fn malformed_body_is_reported() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/countries")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create();

        let source = HttpMatchSource::new(format!("{}/countries?matching=", server.url()));
        let err = source.fetch("Ca").expect_err("garbage must fail");
        assert!(matches!(err, AutocompleteError::Json(_)));
    }
}
