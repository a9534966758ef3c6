//! Pluggable retrieval of remote geoLink XML
//!
//! HTTP transport is outside the core: callers supply a [`FetchGeoLink`]
//! collaborator that turns a URL into raw bytes or fails with
//! [`Error::Fetch`](crate::error::Error::Fetch). The core does not retry,
//! time out or cancel.

use crate::error::Result;

/// Collaborator retrieving raw geoLink XML bytes for a URL
pub trait FetchGeoLink {
    /// Fetch the raw payload behind `url`
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Any `Fn(&str) -> Result<Vec<u8>>` closure works as a fetcher
impl<F> FetchGeoLink for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_closure_as_fetcher() {
        let fetcher = |url: &str| {
            if url == "http://oereblex.test.com/api/geolinks/1500.xml" {
                Ok(b"<geolinks></geolinks>".to_vec())
            } else {
                Err(Error::Fetch(format!("not found: {}", url)))
            }
        };

        let fetcher: &dyn FetchGeoLink = &fetcher;
        assert!(fetcher
            .fetch("http://oereblex.test.com/api/geolinks/1500.xml")
            .is_ok());
        assert!(matches!(
            fetcher.fetch("http://other.test.com/"),
            Err(Error::Fetch(_))
        ));
    }
}
