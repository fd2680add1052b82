use url::Url;

use super::Secret;

/// Connection string for a Postgres-compatible database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUri(pub Secret);

impl ConnectionUri {
    /// A printable form of the URI with the password masked.
    ///
    /// Strings that do not parse as URLs are not printed at all, since we
    /// cannot tell which part of them is sensitive.
    pub fn redacted(&self) -> String {
        match Url::parse(self.0.expose()) {
            Ok(mut url) => {
                if url.password().is_some() {
                    // set_password only fails for cannot-be-a-base URLs, which have no password
                    let _ = url.set_password(Some("*****"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable connection uri>".to_string(),
        }
    }
}

impl From<String> for ConnectionUri {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for ConnectionUri {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionUri;

    #[test]
    fn redacts_password() {
        let uri = ConnectionUri::from("postgresql://indexer:hunter2@db:5432/nom_indexer");
        assert_eq!(uri.redacted(), "postgresql://indexer:*****@db:5432/nom_indexer");
    }

    #[test]
    fn leaves_passwordless_uri_alone() {
        let uri = ConnectionUri::from("postgresql://localhost/nom_indexer");
        assert_eq!(uri.redacted(), "postgresql://localhost/nom_indexer");
    }

    #[test]
    fn hides_garbage() {
        let uri = ConnectionUri::from("not a url at all");
        assert_eq!(uri.redacted(), "<unparseable connection uri>");
    }
}
