use serde::{Deserialize, Serialize};

/// A single quote. Never modified after it comes back from the source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// Rendered as `"text - author"`, which is also the favorites key
impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.text, self.author)
    }
}

impl From<quotebox_api::ZenQuote> for Quote {
    fn from(zq: quotebox_api::ZenQuote) -> Self {
        Self {
            text: zq.q,
            author: zq.a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        assert_eq!(Quote::new("A", "B").to_string(), "A - B");
    }

    #[test]
    fn test_from_api_quote() {
        let zq = quotebox_api::ZenQuote {
            q: "Well begun is half done.".to_string(),
            a: "Aristotle".to_string(),
            h: None,
        };
        assert_eq!(
            Quote::from(zq),
            Quote::new("Well begun is half done.", "Aristotle")
        );
    }
}
