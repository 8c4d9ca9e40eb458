use strum_macros::Display;

/// A classified chunk of input.
///
/// Tag tokens keep their attribute text unparsed; it is only split into
/// key/value pairs when the tree builder creates the element.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Token {
    /// Character data, including doctypes, other `<!` declarations and
    /// anything that does not look like a tag.
    Text {
        /// The text exactly as found in the input.
        data: String,
    },

    /// A complete `<!-- ... -->` comment.
    Comment {
        /// The comment, delimiters included.
        data: String,
    },

    /// `<name ...>`
    StartTag {
        /// Tag name as written.
        name: String,
        /// Raw attribute text.
        attributes: String,
    },

    /// `<name ... />`
    SelfClosingTag {
        /// Tag name as written.
        name: String,
        /// Raw attribute text, without the trailing `/`.
        attributes: String,
    },

    /// `</name>`
    EndTag {
        /// Tag name as written.
        name: String,
    },
}

impl Token {
    /// Tag name for tag tokens.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::SelfClosingTag { name, .. } | Self::EndTag { name } => {
                Some(name)
            }
            Self::Text { .. } | Self::Comment { .. } => None,
        }
    }
}
