use std::fmt;

use layout::InlineImagePlacement;

/// `path` for a standalone image, `path#name` for a named sprite in an atlas.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageIdentifier {
    pub path: String,
    pub name: Option<String>,
}

impl ImageIdentifier {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
        }
    }

    pub fn sprite(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
        }
    }

    /// Split on the first `#`. An empty name counts as no name.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('#') {
            Some((path, name)) if !name.is_empty() => Self::sprite(path, name),
            Some((path, _)) => Self::new(path),
            None => Self::new(raw),
        }
    }

    pub fn is_sprite(&self) -> bool {
        self.name.is_some()
    }
}

impl fmt::Display for ImageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}#{name}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

impl From<&InlineImagePlacement> for ImageIdentifier {
    fn from(placement: &InlineImagePlacement) -> Self {
        Self {
            path: placement.source.clone(),
            name: placement.name.clone().filter(|n| !n.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_named_identifiers() {
        assert_eq!(ImageIdentifier::parse("icon.png"), ImageIdentifier::new("icon.png"));
        assert_eq!(
            ImageIdentifier::parse("atlas.png#star"),
            ImageIdentifier::sprite("atlas.png", "star")
        );
        assert_eq!(ImageIdentifier::parse("atlas.png#"), ImageIdentifier::new("atlas.png"));
        assert_eq!(
            ImageIdentifier::parse("a.png#b#c"),
            ImageIdentifier::sprite("a.png", "b#c")
        );
    }

    #[test]
    fn display_matches_markup_form() {
        for raw in ["icon.png", "atlas.png#star"] {
            assert_eq!(ImageIdentifier::parse(raw).to_string(), raw);
        }
    }
}
