use percent_encoding::percent_decode_str;
use std::collections::HashSet;
use url::Url;

/// The set of tracked media extensions
///
/// Entries are stored lowercase without a leading dot; membership is an exact
/// match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: HashSet<String>,
}

impl ExtensionSet {
    /// Builds the set from configured entries such as `"jpg"`, `".PNG"` or `" pdf "`
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = entries
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self { extensions }
    }

    /// Returns true if `extension` (already lowercase) is tracked
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// Returns true if the filename's extension is tracked
    pub fn tracks(&self, filename: &str) -> bool {
        file_extension(filename).is_some_and(|ext| self.contains(&ext))
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Tracked extensions in sorted order
    pub fn sorted(&self) -> Vec<&str> {
        let mut list: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        list.sort_unstable();
        list
    }
}

/// Returns the decoded final path segment of a URL, or `None` when there is
/// no usable filename
///
/// The query string is never part of the path, so `/a/report.pdf?x=1` yields
/// `report.pdf`. Percent-escapes are decoded (`my%20photo.jpg` becomes
/// `my photo.jpg`). Directory-style URLs have no filename, and neither do
/// segments that decode to invalid UTF-8, contain a path separator, or are
/// `.` or `..`.
///
/// # Examples
///
/// ```
/// use media_spider::url::file_name;
/// use url::Url;
///
/// let url = Url::parse("https://x.com/a/b/report.PDF?x=1").unwrap();
/// assert_eq!(file_name(&url).as_deref(), Some("report.PDF"));
///
/// let url = Url::parse("https://x.com/a/b/").unwrap();
/// assert_eq!(file_name(&url), None);
/// ```
pub fn file_name(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let name = percent_decode_str(segment).decode_utf8().ok()?;

    if name.trim().is_empty() || name == "." || name == ".." || name.contains(|c| c == '/' || c == '\\') {
        return None;
    }

    Some(name.into_owned())
}

/// Returns the lowercase text after the last `.` of a filename
///
/// A filename without a dot has no extension. Anything after a `?` is ignored
/// for callers that pass a filename taken from raw link text.
pub fn file_extension(filename: &str) -> Option<String> {
    let name = match filename.find('?') {
        Some(idx) => &filename[..idx],
        None => filename,
    };

    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }

    Some(ext.to_lowercase())
}
