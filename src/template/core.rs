use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of path parameters before heap allocation.
/// Most REST-style paths carry well under eight parameters.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the resolve hot path.
///
/// Parameter names come from the frozen template (`Arc<str>`, cloned in
/// O(1)); values are per-request data extracted from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Error produced when parsing a path template.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TemplateError {
    /// Templates are absolute paths; `pets/{id}` is rejected.
    #[error("path template must start with '/': '{0}'")]
    NotAbsolute(String),

    /// A segment mixed braces with other characters, e.g. `/pets/x{id}`.
    #[error("unmatched brace in segment '{0}'")]
    UnmatchedBrace(String),

    /// `{}` carries no parameter name.
    #[error("empty parameter name in template '{0}'")]
    EmptyParam(String),
}

/// One segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// Matches any single segment, capturing it under the given name.
    Param(Arc<str>),
}

/// A parsed, compiled path template.
///
/// Immutable after parsing. Matching is regex-based (compiled once);
/// overlap checks and static-segment counting use the parsed segments.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    pattern: String,
    segments: Vec<Segment>,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    static_segments: usize,
    trailing_slash: bool,
}

impl PathTemplate {
    /// Parse a template such as `/pets/{id}/photos`.
    ///
    /// Empty segments are dropped (`//a///b` parses as `/a/b`). With
    /// `strict_slash`, a trailing slash is preserved and significant;
    /// without it, `/a/b/` parses as `/a/b`.
    pub fn parse(raw: &str, strict_slash: bool) -> Result<Self, TemplateError> {
        if !raw.starts_with('/') {
            return Err(TemplateError::NotAbsolute(raw.to_string()));
        }

        let mut segments = Vec::new();
        let mut param_names = Vec::new();
        let mut static_segments = 0usize;

        for part in raw.split('/').filter(|s| !s.is_empty()) {
            if part.starts_with('{') && part.ends_with('}') {
                let name = &part[1..part.len() - 1];
                if name.is_empty() {
                    return Err(TemplateError::EmptyParam(raw.to_string()));
                }
                if name.contains('{') || name.contains('}') {
                    return Err(TemplateError::UnmatchedBrace(part.to_string()));
                }
                let name: Arc<str> = Arc::from(name);
                param_names.push(Arc::clone(&name));
                segments.push(Segment::Param(name));
            } else {
                if part.contains('{') || part.contains('}') {
                    return Err(TemplateError::UnmatchedBrace(part.to_string()));
                }
                static_segments += 1;
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        let trailing_slash = strict_slash && !segments.is_empty() && raw.ends_with('/');

        let mut pattern = String::with_capacity(raw.len() + 2);
        for seg in &segments {
            pattern.push('/');
            match seg {
                Segment::Literal(lit) => pattern.push_str(lit),
                Segment::Param(name) => {
                    pattern.push('{');
                    pattern.push_str(name);
                    pattern.push('}');
                }
            }
        }
        if pattern.is_empty() {
            pattern.push('/');
        } else if trailing_slash {
            pattern.push('/');
        }

        let regex = Self::compile(&segments, trailing_slash);

        Ok(PathTemplate {
            pattern,
            segments,
            regex,
            param_names,
            static_segments,
            trailing_slash,
        })
    }

    fn compile(segments: &[Segment], trailing_slash: bool) -> Regex {
        let mut re = String::with_capacity(32);
        re.push('^');
        if segments.is_empty() {
            re.push('/');
        } else {
            for seg in segments {
                match seg {
                    Segment::Literal(lit) => {
                        re.push('/');
                        re.push_str(&regex::escape(lit));
                    }
                    Segment::Param(_) => re.push_str("/([^/]+)"),
                }
            }
            if trailing_slash {
                re.push('/');
            }
        }
        re.push('$');
        // The pattern is assembled from escaped literals and a fixed
        // capture group, so compilation cannot fail on user input.
        #[allow(clippy::expect_used)]
        let regex = Regex::new(&re).expect("failed to compile route pattern");
        regex
    }

    /// The normalized template string, e.g. `/pets/{id}`.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parsed segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of literal (non-parameter) segments; the primary tie-break key.
    #[must_use]
    pub fn static_segments(&self) -> usize {
        self.static_segments
    }

    /// Ordered parameter names.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// Match a concrete request path, extracting parameter values.
    ///
    /// The caller is responsible for any trailing-slash normalization of
    /// `path`; this does a literal match against the compiled pattern.
    #[must_use]
    pub fn capture(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        let mut params = ParamVec::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.push((Arc::clone(name), m.as_str().to_string()));
            }
        }
        Some(params)
    }

    /// True when the path matches, without extracting parameters.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Can this template and `other` ever match the same concrete path?
    ///
    /// Same segment count, and at every position either the literals are
    /// equal or at least one side is a parameter.
    #[must_use]
    pub fn overlaps(&self, other: &PathTemplate) -> bool {
        if self.segments.len() != other.segments.len() {
            return false;
        }
        if self.trailing_slash != other.trailing_slash {
            return false;
        }
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(a, b)| match (a, b) {
                (Segment::Literal(x), Segment::Literal(y)) => x == y,
                _ => true,
            })
    }
}
