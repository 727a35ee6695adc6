//! String search, highlighting and relative time helpers

use regex::RegexBuilder;
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Search terms: a whitespace-separated query or an explicit list.
///
/// A query is split on whitespace; list entries are used as given, so an
/// entry may contain spaces and is matched as a phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWords<'a>(Vec<Cow<'a, str>>);

impl<'a> SearchWords<'a> {
    /// The individual terms.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(AsRef::as_ref)
    }
}

impl<'a> From<&'a str> for SearchWords<'a> {
    fn from(query: &'a str) -> Self {
        let words: Vec<Cow<'a, str>> = query.split_whitespace().map(Cow::Borrowed).collect();
        if words.is_empty() {
            // A blank query is one empty term: it matches any word boundary.
            return Self(vec![Cow::Borrowed("")]);
        }
        Self(words)
    }
}

impl<'a> From<&'a [&'a str]> for SearchWords<'a> {
    fn from(words: &'a [&'a str]) -> Self {
        Self(words.iter().map(|word| Cow::Borrowed(*word)).collect())
    }
}

impl<'a> From<Vec<String>> for SearchWords<'a> {
    fn from(words: Vec<String>) -> Self {
        Self(words.into_iter().map(Cow::Owned).collect())
    }
}

/// Options for [`find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    /// Case-insensitive matching
    pub ignore_case: bool,
    /// Every word must match (AND) rather than any (OR)
    pub find_all: bool,
    /// Words must start at a word boundary. Turn off for scripts without
    /// spaces between words, such as Japanese.
    pub match_boundaries: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            find_all: true,
            match_boundaries: true,
        }
    }
}

/// Whether the words occur in `string`.
pub fn find<'a>(string: &str, words: impl Into<SearchWords<'a>>, options: FindOptions) -> bool {
    let words: SearchWords<'a> = words.into();
    let matches = |word: &str| {
        let pattern = format!(
            "{}{}",
            if options.match_boundaries { r"\b" } else { "" },
            regex::escape(word)
        );
        match RegexBuilder::new(&pattern)
            .case_insensitive(options.ignore_case)
            .build()
        {
            Ok(re) => re.is_match(string),
            Err(error) => {
                tracing::debug!(word, %error, "could not compile search pattern");
                false
            }
        }
    };

    if options.find_all {
        words.iter().all(matches)
    } else {
        words.iter().any(matches)
    }
}

/// Options for [`highlight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Case-insensitive matching
    pub ignore_case: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self { ignore_case: true }
    }
}

/// HTML-escape `string` and wrap every run of characters covered by one of
/// the words in `<strong>`. Runs are never nested or adjacent.
pub fn highlight<'a>(
    string: &str,
    words: impl Into<SearchWords<'a>>,
    options: HighlightOptions,
) -> String {
    let fold = |c: char| {
        if options.ignore_case {
            c.to_lowercase().next().unwrap_or(c)
        } else {
            c
        }
    };
    let chars: Vec<char> = string.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold).collect();

    let words: SearchWords<'a> = words.into();
    let mut marked = BTreeSet::new();
    for word in words.iter() {
        let needle: Vec<char> = word.chars().map(fold).collect();
        if needle.is_empty() || needle.len() > folded.len() {
            continue;
        }
        for start in 0..=folded.len() - needle.len() {
            if folded[start..start + needle.len()] == needle[..] {
                marked.extend(start..start + needle.len());
            }
        }
    }

    let mut html = String::with_capacity(string.len() + marked.len() * 17);
    let mut open = false;
    for (index, c) in chars.into_iter().enumerate() {
        let hit = marked.contains(&index);
        if hit && !open {
            html.push_str("<strong>");
        } else if !hit && open {
            html.push_str("</strong>");
        }
        open = hit;
        push_escaped(&mut html, c);
    }
    if open {
        html.push_str("</strong>");
    }
    html
}

/// Escape `&`, `<`, `>`, `"` and `'` for embedding in HTML.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut escaped, c);
    }
    escaped
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#039;"),
        other => out.push(other),
    }
}

/// JavaScript `Math.round`: halves round up.
fn round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Human-readable age of something `seconds` old.
pub fn time_ago(seconds: i64) -> String {
    let ss = seconds as f64;
    let mm = round(ss / 60.0);
    let hh = round(mm / 60.0);
    let dd = round(hh / 24.0);
    let mo = round(dd / 30.0);
    let yy = round(mo / 12.0);

    if ss < 10.0 {
        "Just now".to_string()
    } else if mm < 1.0 {
        format!("{seconds} seconds ago")
    } else if mm < 2.0 {
        "1 minute ago".to_string()
    } else if hh < 1.0 {
        format!("{} minutes ago", mm as i64)
    } else if hh < 2.0 {
        "1 hour ago".to_string()
    } else if dd < 1.0 {
        format!("{} hours ago", hh as i64)
    } else if dd < 2.0 {
        "1 day ago".to_string()
    } else if mo < 1.0 {
        format!("{} days ago", dd as i64)
    } else if mo < 2.0 {
        "1 month ago".to_string()
    } else if yy < 1.0 {
        format!("{} months ago", mo as i64)
    } else if yy < 2.0 {
        "1 year ago".to_string()
    } else {
        format!("{} years ago", yy as i64)
    }
}

/// Age of a timestamp taken at `then_ms`, as seen at `now_ms`.
pub fn time_ago_since(then_ms: i64, now_ms: i64) -> String {
    let seconds = round(now_ms.saturating_sub(then_ms) as f64 / 1000.0) as i64;
    time_ago(seconds)
}
