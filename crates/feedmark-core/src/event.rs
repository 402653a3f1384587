use std::collections::BTreeMap;

/// Attribute name to value, as seen on an opening tag.
pub type Attributes = BTreeMap<String, String>;

/// One step of a flat markup token stream.
///
/// Tag names and attribute names are lower-case. Text has character
/// references already decoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TagEvent {
    Open { name: String, attrs: Attributes },
    Close { name: String },
    Text(String),
}

impl TagEvent {
    pub fn open(name: impl Into<String>) -> Self {
        Self::Open {
            name: name.into(),
            attrs: Attributes::new(),
        }
    }

    pub fn open_with<I, K, V>(name: impl Into<String>, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Open {
            name: name.into(),
            attrs: attrs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn close(name: impl Into<String>) -> Self {
        Self::Close { name: name.into() }
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self::Text(data.into())
    }
}

/// The closed tag vocabulary the converter reacts to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TagKind {
    Paragraph,
    Strong,
    Emphasis,
    Link,
    Other,
}

impl TagKind {
    pub(crate) fn of(name: &str) -> Self {
        match name {
            "p" => Self::Paragraph,
            "strong" | "b" => Self::Strong,
            "em" | "i" => Self::Emphasis,
            "a" => Self::Link,
            _ => Self::Other,
        }
    }
}
