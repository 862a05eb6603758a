//! Request URI rewriting.
//!
//! # Responsibilities
//! - Select the storage prefix (base directory) for a host
//! - Prefix file requests with the base directory, once
//! - Collapse extensionless routes onto the site's index document
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Total: every host/URI pair yields a rewrite, nothing fails
//! - Inputs are borrowed, the result is a fresh value

use std::fmt;

use serde::Serialize;

use crate::config::schema::RoutingConfig;
use crate::routing::host::{tenant, Tenant};
use crate::routing::path::{classify, ensure_leading_slash, RequestKind};

/// Storage prefix selected for a request, e.g. `/production` or `/acme`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BaseDirectory(String);

impl BaseDirectory {
    fn new(name: &str) -> Self {
        Self(format!("/{}", name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `uri` already lives under this directory (`<base>/...`).
    pub fn contains(&self, uri: &str) -> bool {
        uri.strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for BaseDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of routing a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    /// The URI to request from storage.
    pub uri: String,
    /// Prefix the URI was resolved under.
    pub base_dir: BaseDirectory,
    pub kind: RequestKind,
    /// Tenant derived from the host, if any.
    pub tenant: Option<String>,
}

/// Maps `(host, uri)` onto a storage object path.
#[derive(Debug, Clone)]
pub struct EdgeRouter {
    production_dir: BaseDirectory,
    index_document: String,
    canonical_label: String,
}

impl EdgeRouter {
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            production_dir: BaseDirectory::new(&config.production_dir),
            index_document: config.index_document.clone(),
            canonical_label: config.canonical_label.clone(),
        }
    }

    /// Base directory for `host`: `/<tenant>` or the production directory.
    pub fn base_directory(&self, host: &str) -> BaseDirectory {
        self.base_for(tenant(host, &self.canonical_label))
    }

    fn base_for(&self, tenant: Option<Tenant<'_>>) -> BaseDirectory {
        match tenant {
            Some(t) => BaseDirectory::new(t.as_str()),
            None => self.production_dir.clone(),
        }
    }

    /// Rewrite `uri` as requested on `host`.
    pub fn rewrite(&self, host: &str, uri: &str) -> Rewrite {
        let tenant = tenant(host, &self.canonical_label);
        let base_dir = self.base_for(tenant);

        let uri = ensure_leading_slash(uri);
        let kind = classify(&uri);

        let uri = match kind {
            RequestKind::File if base_dir.contains(&uri) => uri.into_owned(),
            RequestKind::File => format!("{}{}", base_dir, uri),
            RequestKind::Route => format!("{}/{}", base_dir, self.index_document),
        };

        Rewrite {
            uri,
            base_dir,
            kind,
            tenant: tenant.map(|t| t.as_str().to_string()),
        }
    }
}

impl Default for EdgeRouter {
    fn default() -> Self {
        Self::new(&RoutingConfig::default())
    }
}

/// Rewrite `uri` for `host` with the default routing settings.
pub fn rewrite_uri(host: &str, uri: &str) -> String {
    EdgeRouter::default().rewrite(host, uri).uri
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTS: &[&str] = &[
        "example.com",
        "www.example.com",
        "acme.example.com",
        "a.b.example.com",
        "localhost",
        "",
    ];

    const FILES: &[&str] = &[
        "/app.js",
        "/assets/logo.svg",
        "/v1.2",
        "/acme/app.js",
        "/production/style.css",
        "/production.txt",
    ];

    const ROUTES: &[&str] = &["/", "/about", "/users/42/edit", "/v1.2/", "/a.b/c", ""];

    #[test]
    fn test_scenarios() {
        let cases = [
            ("example.com", "/about", "/production/index.html"),
            ("acme.example.com", "/app.js", "/acme/app.js"),
            ("www.example.com", "/style.css", "/production/style.css"),
            ("acme.example.com", "/acme/app.js", "/acme/app.js"),
            ("a.b.example.com", "/dashboard", "/a/index.html"),
            ("example.com", "/favicon.ico", "/production/favicon.ico"),
        ];

        for (host, uri, expected) in cases {
            assert_eq!(rewrite_uri(host, uri), expected, "host={} uri={}", host, uri);
        }
    }

    #[test]
    fn test_base_directory_selection() {
        let router = EdgeRouter::default();
        assert_eq!(router.base_directory("example.com").as_str(), "/production");
        assert_eq!(router.base_directory("www.example.com").as_str(), "/production");
        assert_eq!(router.base_directory("www.a.example.com").as_str(), "/production");
        assert_eq!(router.base_directory("acme.example.com").as_str(), "/acme");
        assert_eq!(router.base_directory("x.y.z.example.com").as_str(), "/x");
    }

    #[test]
    fn test_rewrite_base_matches_base_directory() {
        let router = EdgeRouter::default();
        for host in HOSTS {
            for uri in FILES.iter().chain(ROUTES) {
                assert_eq!(router.rewrite(host, uri).base_dir, router.base_directory(host));
            }
        }
    }

    #[test]
    fn test_file_rewrite_is_idempotent() {
        let router = EdgeRouter::default();
        for host in HOSTS {
            for uri in FILES {
                let once = router.rewrite(host, uri).uri;
                let twice = router.rewrite(host, &once).uri;
                assert_eq!(once, twice, "host={} uri={}", host, uri);
            }
        }
    }

    #[test]
    fn test_file_rewrite_stays_under_base() {
        let router = EdgeRouter::default();
        for host in HOSTS {
            let base = router.base_directory(host);
            for uri in FILES {
                let rewrite = router.rewrite(host, uri);
                assert_eq!(rewrite.kind, RequestKind::File);
                assert!(rewrite.uri.starts_with(base.as_str()));
                if uri.starts_with(&format!("{}/", base)) {
                    assert_eq!(rewrite.uri, *uri);
                }
            }
        }
    }

    #[test]
    fn test_routes_fall_back_to_index() {
        let router = EdgeRouter::default();
        for host in HOSTS {
            let base = router.base_directory(host);
            for uri in ROUTES {
                let rewrite = router.rewrite(host, uri);
                assert_eq!(rewrite.kind, RequestKind::Route);
                assert_eq!(rewrite.uri, format!("{}/index.html", base));
            }
        }
    }

    #[test]
    fn test_bare_base_directory_is_not_a_prefix_match() {
        assert_eq!(rewrite_uri("example.com", "/production.txt"), "/production/production.txt");
        assert_eq!(rewrite_uri("acme.example.com", "/acmeapp.js"), "/acme/acmeapp.js");
    }

    #[test]
    fn test_relative_uri_is_made_absolute() {
        assert_eq!(rewrite_uri("acme.example.com", "app.js"), "/acme/app.js");
        assert_eq!(rewrite_uri("acme.example.com", ""), "/acme/index.html");
    }

    #[test]
    fn test_tenant_reported() {
        let router = EdgeRouter::default();
        assert_eq!(router.rewrite("acme.example.com", "/").tenant.as_deref(), Some("acme"));
        assert_eq!(router.rewrite("example.com", "/").tenant, None);
    }

    #[test]
    fn test_custom_routing_config() {
        let router = EdgeRouter::new(&RoutingConfig {
            production_dir: "live".to_string(),
            index_document: "200.html".to_string(),
            canonical_label: "app".to_string(),
        });

        assert_eq!(router.rewrite("app.example.com", "/about").uri, "/live/200.html");
        assert_eq!(router.rewrite("www.example.com", "/x.css").uri, "/www/x.css");
        assert_eq!(router.rewrite("example.com", "/live/x.css").uri, "/live/x.css");
    }
}
