use serde::{Deserialize, Serialize};

/// A single bookmark: a display name and the URL it opens.
///
/// Links are values. An edit replaces the whole link rather than one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Link {
            name: name.into(),
            url: url.into(),
        }
    }

    /// A copy with surrounding whitespace removed from both fields, or `None`
    /// if either field is blank.
    pub fn trimmed(&self) -> Option<Link> {
        let name = self.name.trim();
        let url = self.url.trim();
        if name.is_empty() || url.is_empty() {
            return None;
        }
        Some(Link::new(name, url))
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.url)
    }
}
