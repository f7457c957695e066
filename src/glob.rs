//! Whole-string glob matching where `*` also matches path separators.

use globset::{GlobBuilder, GlobMatcher};

/// A compiled glob pattern with `fnmatch` semantics.
///
/// `*` matches any run of characters including `/`, `?` matches exactly one
/// character and `[...]` is a character class (`[!...]` negates). Nothing
/// else is special: `**` is the same as `*`, `\`, `{` and `}` are literal, and
/// a `[` without a closing `]` is literal. The whole text must match.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    matcher: Option<GlobMatcher>,
}

impl GlobPattern {
    /// Compile a case-sensitive pattern (used for ignore rules).
    pub fn new(pattern: &str) -> Self {
        Self::build(pattern, false)
    }

    /// Compile a case-insensitive pattern (used for the user-facing filter).
    pub fn case_insensitive(pattern: &str) -> Self {
        Self::build(pattern, true)
    }

    fn build(pattern: &str, case_insensitive: bool) -> Self {
        let translated = translate(pattern);
        let matcher = match GlobBuilder::new(&translated)
            .literal_separator(false)
            .backslash_escape(false)
            .case_insensitive(case_insensitive)
            .build()
        {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(err) => {
                tracing::debug!(%pattern, %translated, %err, "glob does not compile, never matches");
                None
            }
        };

        Self {
            source: pattern.to_string(),
            matcher,
        }
    }

    /// The pattern text as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `text` matches this pattern in full.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(text))
    }
}

/// One-shot case-sensitive match of `text` against `pattern`.
pub fn glob_match(text: &str, pattern: &str) -> bool {
    GlobPattern::new(pattern).matches(text)
}

/// Prefix `pattern` with a literal directory, escaping glob metacharacters in
/// the directory part. An empty `dir` leaves the pattern unchanged.
pub(crate) fn join_literal_dir(dir: &str, pattern: &str) -> String {
    if dir.is_empty() {
        return pattern.to_string();
    }
    let mut joined = String::with_capacity(dir.len() + pattern.len() + 1);
    for c in dir.chars() {
        match c {
            '*' | '?' | '[' => {
                joined.push('[');
                joined.push(c);
                joined.push(']');
            }
            c => joined.push(c),
        }
    }
    joined.push('/');
    joined.push_str(pattern);
    joined
}

/// Rewrite an `fnmatch` pattern into globset syntax.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                out.push('*');
            }
            '?' => out.push('?'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i..end]);
                    i = end + 1;
                }
                None => push_literal(&mut out, '['),
            },
            c => push_literal(&mut out, c),
        }
    }
    out
}

/// Index of the `]` closing a class whose body starts at `start`. A `]`
/// directly after `[` or `[!` is a member, not the terminator.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j..].iter().position(|&c| c == ']').map(|p| j + p)
}

fn push_class(out: &mut String, body: &[char]) {
    if let Some(('!', members)) = body.split_first() {
        out.push_str("[!");
        out.extend(members);
        out.push(']');
        return;
    }

    // globset reads a leading `^` (or `!`) as negation; fnmatch does not.
    // Pull such members out as literal alternatives.
    let leading = body.iter().take_while(|&&c| c == '^' || c == '!').count();
    if leading == 0 {
        out.push('[');
        out.extend(body);
        out.push(']');
        return;
    }

    let rest = &body[leading..];
    let mut alternatives: Vec<String> = body[..leading].iter().map(char::to_string).collect();
    if !rest.is_empty() {
        let mut class = String::from("[");
        class.extend(rest);
        class.push(']');
        alternatives.push(class);
    }

    if alternatives.len() == 1 {
        out.push_str(&alternatives[0]);
    } else {
        out.push('{');
        out.push_str(&alternatives.join(","));
        out.push('}');
    }
}

fn push_literal(out: &mut String, c: char) {
    match c {
        '*' | '?' | '[' | ']' | '{' | '}' | ',' => {
            out.push('[');
            out.push(c);
            out.push(']');
        }
        c => out.push(c),
    }
}
