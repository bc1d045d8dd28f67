use url::{ParseError, Url};

/// Whether a link stays on the analyzed site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    Internal,
    External,
}

/// A raw anchor target after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// The target as written when absolute, joined onto the base when relative,
    /// or the raw target when it is relative and there is no base
    pub url: String,
    /// Host of the target as written (port included), if it has one
    pub host: Option<String>,
}

/// Working record for one distinct raw anchor target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub raw_href: String,
    pub resolved: String,
    pub scope: LinkScope,
    pub probe_failed: bool,
}

/// The page URL that relative targets are resolved against
#[derive(Debug, Clone)]
pub struct PageBase<'a> {
    url: Url,
    host: Option<&'a str>,
}

impl<'a> PageBase<'a> {
    /// Parses the page URL, keeping its host exactly as written
    pub fn parse(raw: &'a str) -> Result<Self, ParseError> {
        let url = Url::parse(raw)?;
        Ok(Self {
            url,
            host: raw_host(raw),
        })
    }

    pub fn host(&self) -> Option<&'a str> {
        self.host
    }
}

/// Returns the host of a URL reference exactly as written
///
/// The host is the authority without any userinfo; an explicit port stays
/// attached. Nothing is normalized: case, default ports and trailing dots are
/// compared as they appear in the markup.
///
/// # Examples
///
/// ```
/// use page_lens::links::raw_host;
///
/// assert_eq!(raw_host("http://127.0.0.1:8080/path"), Some("127.0.0.1:8080"));
/// assert_eq!(raw_host("https://user@Example.com:443/"), Some("Example.com:443"));
/// assert_eq!(raw_host("//cdn.example.net/lib.js"), Some("cdn.example.net"));
/// assert_eq!(raw_host("mailto:team@example.com"), None);
/// assert_eq!(raw_host("/about"), None);
/// ```
pub fn raw_host(reference: &str) -> Option<&str> {
    let after_scheme = match reference.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => reference,
    };
    let authority = after_scheme.strip_prefix("//")?;
    let end = authority
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(authority.len());
    let authority = &authority[..end];
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    (!host.is_empty()).then_some(host)
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolves an anchor target against the page URL
///
/// Absolute targets are kept exactly as written; relative ones are joined onto
/// the base and take the base's host unless they carry their own authority.
/// Without a base, a relative target is kept verbatim and has no host.
///
/// # Returns
///
/// * `Some(ResolvedLink)` - The target is a usable URL reference
/// * `None` - The target cannot be parsed or joined and is dropped
pub fn resolve_href(href: &str, base: Option<&PageBase<'_>>) -> Option<ResolvedLink> {
    match Url::parse(href) {
        Ok(_) => Some(ResolvedLink {
            url: href.to_string(),
            host: raw_host(href).map(str::to_string),
        }),
        Err(ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => {
                let joined = base.url.join(href).ok()?;
                let host = if href.starts_with("//") {
                    raw_host(href)
                } else {
                    base.host
                };
                Some(ResolvedLink {
                    url: joined.into(),
                    host: host.map(str::to_string),
                })
            }
            None => Some(ResolvedLink {
                url: href.to_string(),
                host: None,
            }),
        },
        Err(_) => None,
    }
}

/// Resolves and classifies each raw anchor target
///
/// A link is internal when its host, as written, equals the base URL's host as
/// written. When the base URL cannot be parsed every link is external. Targets
/// that fail to resolve produce no record.
pub fn classify_links(raw_links: &[String], base_url: &str) -> Vec<LinkRecord> {
    let base = match PageBase::parse(base_url) {
        Ok(base) => Some(base),
        Err(e) => {
            tracing::warn!("Invalid base URL {}: {}", base_url, e);
            None
        }
    };
    let base_host = base.as_ref().and_then(PageBase::host);

    raw_links
        .iter()
        .filter_map(|raw_href| {
            let Some(resolved) = resolve_href(raw_href, base.as_ref()) else {
                tracing::debug!("Skipping unresolvable link: {}", raw_href);
                return None;
            };

            let scope = match (base_host, resolved.host.as_deref()) {
                (Some(base_host), Some(host)) if base_host == host => LinkScope::Internal,
                _ => LinkScope::External,
            };

            Some(LinkRecord {
                raw_href: raw_href.clone(),
                resolved: resolved.url,
                scope,
                probe_failed: false,
            })
        })
        .collect()
}
