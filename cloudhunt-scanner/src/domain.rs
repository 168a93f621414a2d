// Host and URL helpers shared by the crawler and fingerprinting

use std::net::IpAddr;
use url::Url;

/// Longest ICANN public suffix of `host`. Private-section entries such as
/// `s3.amazonaws.com` or `appspot.com` are not suffixes here, so provider hosts
/// keep the provider as their registrable label.
fn icann_suffix(host: &str) -> Option<&str> {
    let mut rest = host;
    loop {
        let suffix = psl::suffix(rest.as_bytes())?;
        let matched = &rest[rest.len() - suffix.as_bytes().len()..];
        match suffix.typ() {
            Some(psl::Type::Icann) => return Some(matched),
            Some(psl::Type::Private) => rest = matched.split_once('.')?.1,
            None => return None,
        }
    }
}

/// The registrable label of a host, e.g. `acme` for `cdn.acme.co.uk` and
/// `amazonaws` for `bucket.s3.amazonaws.com`. IP addresses are returned as-is;
/// hosts under an unknown TLD fall back to their last label.
pub fn registrable_label(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();
    if host.parse::<IpAddr>().is_ok() {
        return host;
    }

    let prefix = match icann_suffix(&host) {
        Some(suffix) if suffix.len() < host.len() => &host[..host.len() - suffix.len() - 1],
        Some(_) => return host,
        None => &host,
    };

    prefix.rsplit('.').next().unwrap_or(prefix).to_string()
}

/// `host[:port]` of a URL, the unit the crawler scopes on
pub fn netloc(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

pub fn netloc_of(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| netloc(&u))
}

/// URL trimmed to its directory: `http://a.com/x/y.js` becomes `http://a.com/x`
pub fn base_url(url: &Url) -> String {
    let path = url.path();
    let dir = match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    };
    format!("{}://{}{}", url.scheme(), netloc(url), dir)
}

pub fn base_url_of(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| base_url(&u))
}

/// Resolve `src` against `base` and strip the fragment (and the query unless `full_query`).
/// Non-navigable references (`javascript:`, `mailto:`, ...) yield `None`.
pub fn normalize_url(base: &Url, src: &str, full_query: bool) -> Option<String> {
    let src = src.trim();
    if src.is_empty()
        || src.starts_with('#')
        || src.starts_with("javascript:")
        || src.starts_with("mailto:")
        || src.starts_with("tel:")
        || src.starts_with("data:")
    {
        return None;
    }

    let mut resolved = base.join(src).ok()?;
    resolved.set_fragment(None);
    if !full_query {
        resolved.set_query(None);
    }

    Some(resolved.to_string())
}

/// `url` with its query and fragment removed
pub fn without_query(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    normalize_url(&parsed, url, false)
}

/// Lowercased file extension of the last path segment, if any
pub fn url_extension(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let file = parsed.path().rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrable_label() {
        assert_eq!(registrable_label("acme.com"), "acme");
        assert_eq!(registrable_label("www.acme.com"), "acme");
        assert_eq!(registrable_label("cdn.acme.co.uk"), "acme");
        assert_eq!(registrable_label("bucket.s3.amazonaws.com"), "amazonaws");
        assert_eq!(registrable_label("127.0.0.1"), "127.0.0.1");
        assert_eq!(registrable_label("localhost"), "localhost");
        assert_eq!(registrable_label("WWW.Acme.com."), "acme");
    }

    #[test]
    fn test_registrable_label_country_second_levels() {
        assert_eq!(registrable_label("www.acme.edu.au"), "acme");
        assert_eq!(registrable_label("shop.acme.com.pl"), "acme");
        assert_eq!(registrable_label("acme.co.id"), "acme");
        assert_eq!(registrable_label("www.acme.gov.br"), "acme");
    }

    #[test]
    fn test_registrable_label_ignores_private_suffixes() {
        assert_eq!(registrable_label("acme.appspot.com"), "appspot");
        assert_eq!(registrable_label("acme.blob.core.windows.net"), "windows");
        assert_eq!(registrable_label("acme.storage.googleapis.com"), "googleapis");
    }

    #[test]
    fn test_registrable_label_of_bare_suffix() {
        assert_eq!(registrable_label("co.uk"), "co.uk");
        assert_eq!(registrable_label("com"), "com");
    }

    #[test]
    fn test_base_url() {
        let url = Url::parse("http://acme.com/static/js/app.js").unwrap();
        assert_eq!(base_url(&url), "http://acme.com/static/js");

        let root = Url::parse("http://acme.com/").unwrap();
        assert_eq!(base_url(&root), "http://acme.com");

        let with_port = Url::parse("http://127.0.0.1:8080/a/b").unwrap();
        assert_eq!(base_url(&with_port), "http://127.0.0.1:8080/a");
    }

    #[test]
    fn test_normalize_url_relative_and_query() {
        let base = Url::parse("http://acme.com/docs/index.html").unwrap();
        assert_eq!(
            normalize_url(&base, "page.html?x=1#top", false).as_deref(),
            Some("http://acme.com/docs/page.html")
        );
        assert_eq!(
            normalize_url(&base, "/login?next=/", true).as_deref(),
            Some("http://acme.com/login?next=/")
        );
        assert_eq!(normalize_url(&base, "javascript:void(0)", false), None);
        assert_eq!(normalize_url(&base, "#section", false), None);
    }

    #[test]
    fn test_without_query() {
        assert_eq!(
            without_query("http://acme.com/data.json?v=1#x").as_deref(),
            Some("http://acme.com/data.json")
        );
        assert_eq!(without_query("not a url"), None);
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("http://acme.com/a/file.PDF").as_deref(), Some("pdf"));
        assert_eq!(url_extension("http://acme.com/a/file"), None);
        assert_eq!(url_extension("http://acme.com/"), None);
        assert_eq!(url_extension("http://acme.com/app.js?v=2").as_deref(), Some("js"));
    }
}
