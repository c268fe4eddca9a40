// Query normalization: trim, then strip avoid tokens in order.

/// Literal substrings stripped from a query code before comparison.
///
/// Order matters: tokens are applied one after another, each operating on
/// the output of the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvoidTokens(Vec<String>);

impl AvoidTokens {
    /// Parse a comma-separated string such as `"-R, -G, -inner"`.
    ///
    /// Pieces are trimmed; empty pieces are dropped since removing an empty
    /// substring changes nothing.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        Self::from_list(raw.split(','))
    }

    pub fn from_list<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Build the search candidate for one query code.
///
/// Trims once, then removes every occurrence of each token in turn.
/// The result is not re-trimmed.
pub fn normalize_query(code: &str, tokens: &AvoidTokens) -> String {
    let mut candidate = code.trim().to_string();
    for token in tokens.iter() {
        if candidate.contains(token) {
            candidate = candidate.replace(token, "");
        }
    }
    candidate
}
