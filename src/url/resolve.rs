use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a raw link from a page into an absolute URL
///
/// # Resolution Steps
///
/// 1. Rewrite a leading `file:` scheme to `https:`
/// 2. Drop everything from the first `#` onward
/// 3. With a `<base href>`, join the link onto the base
/// 4. Otherwise use the link as-is when it is absolute, or join it onto the page URL
///
/// Parsing through [`Url`] normalizes the result: scheme and host are
/// lowercased, dot segments are removed and default ports dropped.
///
/// # Arguments
///
/// * `page` - The URL of the page the link was found on
/// * `base` - The page's resolved `<base href>`, if it declared one
/// * `raw` - The attribute value as written in the document
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError)` - The link could not be resolved; callers drop it
///
/// # Examples
///
/// ```
/// use media_spider::url::resolve_link;
/// use url::Url;
///
/// let page = Url::parse("https://x.com/a/b/page.html").unwrap();
/// let url = resolve_link(&page, None, "../img/a.png").unwrap();
/// assert_eq!(url.as_str(), "https://x.com/a/img/a.png");
/// ```
pub fn resolve_link(page: &Url, base: Option<&Url>, raw: &str) -> UrlResult<Url> {
    let link = rewrite_file_scheme(raw.trim());
    let link = strip_fragment(&link);

    let resolved = match base {
        Some(base) => base.join(link),
        None => match Url::parse(link) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => page.join(link),
            Err(e) => Err(e),
        },
    };

    resolved.map_err(|e| UrlError::Parse(format!("'{}': {}", raw, e)))
}

/// Resolves a `<base href>` value against the page URL
///
/// Returns `None` for an empty or unusable value, in which case links resolve
/// against the page itself.
pub fn resolve_base(page: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match page.join(href) {
        Ok(base) => Some(base),
        Err(e) => {
            tracing::debug!("Ignoring unusable <base href=\"{}\"> on {}: {}", href, page, e);
            None
        }
    }
}

/// Replaces a leading `file:` scheme (any case) with `https:`
pub(crate) fn rewrite_file_scheme(link: &str) -> String {
    match link.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("file:") => format!("https:{}", &link[5..]),
        _ => link.to_string(),
    }
}

fn strip_fragment(link: &str) -> &str {
    match link.find('#') {
        Some(idx) => &link[..idx],
        None => link,
    }
}
