//! Tokens and events produced by the tokenizer.
//!
//! The compiler does not recognize markdown itself. It consumes a flat,
//! ordered list of [`Event`]s, each entering or exiting one [`Token`]:
//!
//! ```text
//! Enter(paragraph)    1:1-1:4
//!   Enter(data)       1:1-1:2
//!   Exit(data)
//!   Enter(lineEnding) 1:2-2:1
//!   Exit(lineEnding)
//!   Enter(data)       2:1-2:2
//!   Exit(data)
//! Exit(paragraph)
//! ```
//!
//! Token types are named after the CommonMark constructs they span. Types the
//! catalogue does not know about (introduced by syntax extensions) are kept as
//! [`TokenType::Custom`], so extension handlers can be keyed on them too.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::point::Point;

macro_rules! token_types {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// Type of a token.
        ///
        /// Serializes to (and parses from) the camelCase name used by
        /// CommonMark tokenizers, e.g. `atxHeadingSequence`.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(into = "String", from = "String")]
        pub enum TokenType {
            $($(#[$doc])* $variant,)*
            /// A token type introduced by a syntax extension.
            Custom(String),
        }

        impl TokenType {
            /// The tokenizer's name for this type.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $name,)*
                    Self::Custom(name) => name,
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

token_types! {
    /// Whole ATX heading (`## a`).
    AtxHeading => "atxHeading",
    /// Run of `#` opening or closing an ATX heading.
    AtxHeadingSequence => "atxHeadingSequence",
    AtxHeadingText => "atxHeadingText",
    /// Whole autolink (`<https://a.b>`).
    Autolink => "autolink",
    AutolinkEmail => "autolinkEmail",
    AutolinkMarker => "autolinkMarker",
    AutolinkProtocol => "autolinkProtocol",
    BlockQuote => "blockQuote",
    BlockQuoteMarker => "blockQuoteMarker",
    BlockQuotePrefix => "blockQuotePrefix",
    BlockQuotePrefixWhitespace => "blockQuotePrefixWhitespace",
    /// Backslash escape (`\*`).
    CharacterEscape => "characterEscape",
    CharacterEscapeValue => "characterEscapeValue",
    /// Whole character reference (`&amp;`, `&#35;`, `&#x23;`).
    CharacterReference => "characterReference",
    CharacterReferenceMarker => "characterReferenceMarker",
    /// The `x` of a hexadecimal reference.
    CharacterReferenceMarkerHexadecimal => "characterReferenceMarkerHexadecimal",
    /// The `#` of a numeric reference.
    CharacterReferenceMarkerNumeric => "characterReferenceMarkerNumeric",
    CharacterReferenceMarkerSemi => "characterReferenceMarkerSemi",
    CharacterReferenceValue => "characterReferenceValue",
    CodeFenced => "codeFenced",
    /// Opening or closing fence line.
    CodeFencedFence => "codeFencedFence",
    CodeFencedFenceInfo => "codeFencedFenceInfo",
    CodeFencedFenceMeta => "codeFencedFenceMeta",
    CodeFencedFenceSequence => "codeFencedFenceSequence",
    /// Content line of fenced or indented code.
    CodeFlowValue => "codeFlowValue",
    CodeIndented => "codeIndented",
    /// Inline code (`` `a` ``).
    CodeText => "codeText",
    CodeTextData => "codeTextData",
    CodeTextPadding => "codeTextPadding",
    CodeTextSequence => "codeTextSequence",
    Data => "data",
    Definition => "definition",
    DefinitionDestination => "definitionDestination",
    DefinitionDestinationLiteral => "definitionDestinationLiteral",
    DefinitionDestinationLiteralMarker => "definitionDestinationLiteralMarker",
    DefinitionDestinationRaw => "definitionDestinationRaw",
    DefinitionDestinationString => "definitionDestinationString",
    DefinitionLabel => "definitionLabel",
    DefinitionLabelMarker => "definitionLabelMarker",
    DefinitionLabelString => "definitionLabelString",
    DefinitionMarker => "definitionMarker",
    DefinitionTitle => "definitionTitle",
    DefinitionTitleMarker => "definitionTitleMarker",
    DefinitionTitleString => "definitionTitleString",
    Emphasis => "emphasis",
    EmphasisSequence => "emphasisSequence",
    EmphasisText => "emphasisText",
    EscapeMarker => "escapeMarker",
    /// Backslash before a line ending.
    HardBreakEscape => "hardBreakEscape",
    /// Two or more spaces before a line ending.
    HardBreakTrailing => "hardBreakTrailing",
    HtmlFlow => "htmlFlow",
    HtmlFlowData => "htmlFlowData",
    HtmlText => "htmlText",
    HtmlTextData => "htmlTextData",
    Image => "image",
    /// Label of a link or image, including brackets.
    Label => "label",
    LabelEnd => "labelEnd",
    LabelImage => "labelImage",
    LabelImageMarker => "labelImageMarker",
    LabelLink => "labelLink",
    LabelMarker => "labelMarker",
    /// Label content, between the brackets.
    LabelText => "labelText",
    LineEnding => "lineEnding",
    /// Line ending of a line that contains nothing but whitespace.
    LineEndingBlank => "lineEndingBlank",
    LinePrefix => "linePrefix",
    LineSuffix => "lineSuffix",
    Link => "link",
    /// Synthesized by the list preprocessor; tokenizers do not emit it.
    ListItem => "listItem",
    ListItemIndent => "listItemIndent",
    ListItemMarker => "listItemMarker",
    /// Marker of a list item plus the whitespace after it.
    ListItemPrefix => "listItemPrefix",
    ListItemPrefixWhitespace => "listItemPrefixWhitespace",
    /// Number of an ordered list item.
    ListItemValue => "listItemValue",
    ListOrdered => "listOrdered",
    ListUnordered => "listUnordered",
    Paragraph => "paragraph",
    /// Second label of a full or collapsed reference (`[b]`, `[]`).
    Reference => "reference",
    ReferenceMarker => "referenceMarker",
    ReferenceString => "referenceString",
    /// Destination and title of a resource (`(b "c")`).
    Resource => "resource",
    ResourceDestination => "resourceDestination",
    ResourceDestinationLiteral => "resourceDestinationLiteral",
    ResourceDestinationLiteralMarker => "resourceDestinationLiteralMarker",
    ResourceDestinationRaw => "resourceDestinationRaw",
    ResourceDestinationString => "resourceDestinationString",
    ResourceMarker => "resourceMarker",
    ResourceTitle => "resourceTitle",
    ResourceTitleMarker => "resourceTitleMarker",
    ResourceTitleString => "resourceTitleString",
    SetextHeading => "setextHeading",
    SetextHeadingLine => "setextHeadingLine",
    SetextHeadingLineSequence => "setextHeadingLineSequence",
    SetextHeadingText => "setextHeadingText",
    Strong => "strong",
    StrongSequence => "strongSequence",
    StrongText => "strongText",
    ThematicBreak => "thematicBreak",
    ThematicBreakSequence => "thematicBreakSequence",
    Whitespace => "whitespace",
}

impl TokenType {
    /// Returns true for the two list container types.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::ListOrdered | Self::ListUnordered)
    }

    /// Returns true for either kind of line ending.
    pub fn is_line_ending(&self) -> bool {
        matches!(self, Self::LineEnding | Self::LineEndingBlank)
    }
}

impl From<&str> for TokenType {
    fn from(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| Self::Custom(name.to_string()))
    }
}

impl From<String> for TokenType {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or(Self::Custom(name))
    }
}

impl From<TokenType> for String {
    fn from(kind: TokenType) -> Self {
        match kind {
            TokenType::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed span of the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenType,
    pub start: Point,
    pub end: Point,
    /// Whether a list or list item is loose.
    ///
    /// Only meaningful on list tokens and on the list item tokens the list
    /// preprocessor synthesizes; it is computed there, not by tokenizers.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub spread: bool,
}

impl Token {
    pub fn new(kind: impl Into<TokenType>, start: Point, end: Point) -> Self {
        Self {
            kind: kind.into(),
            start,
            end,
            spread: false,
        }
    }
}

/// Whether an event opens or closes its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Enter,
    Exit,
}

/// An enter or exit occurrence of a token, in stream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub phase: Phase,
    pub token: Token,
}

impl Event {
    pub fn enter(token: Token) -> Self {
        Self {
            phase: Phase::Enter,
            token,
        }
    }

    pub fn exit(token: Token) -> Self {
        Self {
            phase: Phase::Exit,
            token,
        }
    }

    pub fn is_enter(&self) -> bool {
        self.phase == Phase::Enter
    }

    pub fn is_exit(&self) -> bool {
        self.phase == Phase::Exit
    }
}

/// Access to the source text a token spans.
///
/// Tokenizers that keep their input in chunks implement this themselves; for
/// a plain string the token's offsets index straight into it.
pub trait SliceSerialize {
    /// The source text of `token`, or `None` if its offsets fall outside the
    /// source.
    fn slice_serialize(&self, token: &Token) -> Option<&str>;
}

impl SliceSerialize for str {
    fn slice_serialize(&self, token: &Token) -> Option<&str> {
        self.get(token.start.offset..token.end.offset)
    }
}

impl SliceSerialize for String {
    fn slice_serialize(&self, token: &Token) -> Option<&str> {
        self.as_str().slice_serialize(token)
    }
}

impl<T: SliceSerialize + ?Sized> SliceSerialize for &T {
    fn slice_serialize(&self, token: &Token) -> Option<&str> {
        (**self).slice_serialize(token)
    }
}
