//! Minimal element selectors.
//!
//! Supported grammar: a comma separated list of selectors, each a chain of
//! compounds joined by whitespace (descendant combinator). A compound is an
//! optional tag name or `*` followed by any number of `.class` and `#id`
//! parts, e.g. `button.close`, `.card .handle`, `#toolbar, .no-drag`.

use crate::element::{ElementId, ElementTree};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    UnexpectedCharacter { character: char, position: usize },
    MissingName { position: usize },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::Empty => write!(f, "selector is empty"),
            SelectorError::UnexpectedCharacter {
                character,
                position,
            } => write!(f, "unexpected character {character:?} at {position}"),
            SelectorError::MissingName { position } => {
                write!(f, "expected a class or id name at {position}")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: SmallVec<[String; 1]>,
    classes: SmallVec<[String; 2]>,
}

impl Compound {
    fn matches(&self, tree: &ElementTree, id: ElementId) -> bool {
        let Some(data) = tree.get(id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if data.tag() != tag {
                return false;
            }
        }
        self.ids.iter().all(|wanted| data.id_attr() == Some(wanted.as_str()))
            && self.classes.iter().all(|class| data.has_class(class))
    }
}

/// Compounds ordered outermost first; the last one applies to the element itself.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: SmallVec<[Compound; 2]>,
}

impl Complex {
    fn matches(&self, tree: &ElementTree, id: ElementId) -> bool {
        let Some((subject, outer)) = self.compounds.split_last() else {
            return false;
        };
        if !subject.matches(tree, id) {
            return false;
        }
        let mut remaining = outer.iter().rev().peekable();
        for ancestor in tree.ancestors(id).skip(1) {
            match remaining.peek() {
                Some(compound) if compound.matches(tree, ancestor) => {
                    remaining.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        remaining.peek().is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: SmallVec<[Complex; 1]>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut alternatives = SmallVec::new();
        let mut offset = 0;
        for part in source.split(',') {
            alternatives.push(parse_complex(part, offset)?);
            offset += part.len() + 1;
        }
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the element itself matches any alternative.
    pub fn matches(&self, tree: &ElementTree, id: ElementId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches(tree, id))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_name_char(character: char) -> bool {
    character.is_alphanumeric() || character == '-' || character == '_'
}

fn parse_complex(text: &str, offset: usize) -> Result<Complex, SelectorError> {
    let mut compounds = SmallVec::new();
    let mut position = offset;
    for word in text.split(char::is_whitespace) {
        if !word.is_empty() {
            compounds.push(parse_compound(word, position)?);
        }
        position += word.len() + 1;
    }
    if compounds.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(Complex { compounds })
}

fn parse_compound(word: &str, offset: usize) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut chars = word.char_indices().peekable();

    if let Some((_, '*')) = chars.peek() {
        chars.next();
    } else {
        let mut tag = String::new();
        while let Some((_, character)) = chars.peek().copied() {
            if !is_name_char(character) {
                break;
            }
            tag.push(character.to_ascii_lowercase());
            chars.next();
        }
        if !tag.is_empty() {
            compound.tag = Some(tag);
        }
    }

    while let Some((index, marker)) = chars.next() {
        if marker != '.' && marker != '#' {
            return Err(SelectorError::UnexpectedCharacter {
                character: marker,
                position: offset + index,
            });
        }
        let mut name = String::new();
        while let Some((_, character)) = chars.peek().copied() {
            if !is_name_char(character) {
                break;
            }
            name.push(character);
            chars.next();
        }
        if name.is_empty() {
            return Err(SelectorError::MissingName {
                position: offset + index + 1,
            });
        }
        if marker == '.' {
            compound.classes.push(name);
        } else {
            compound.ids.push(name);
        }
    }

    Ok(compound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_card() -> (ElementTree, ElementId, ElementId, ElementId) {
        let mut tree = ElementTree::new();
        let card = tree.create_element("div");
        let header = tree.create_element("header");
        let close = tree.create_element("button");
        tree.append_child(card, header).unwrap();
        tree.append_child(header, close).unwrap();
        tree.add_class(card, "card").unwrap();
        tree.add_class(close, "close").unwrap();
        tree.set_id_attr(header, "title").unwrap();
        (tree, card, header, close)
    }

    #[test]
    fn compound_matches_tag_class_and_id() {
        let (tree, card, header, close) = tree_with_card();
        assert!(Selector::parse("button.close").unwrap().matches(&tree, close));
        assert!(Selector::parse("#title").unwrap().matches(&tree, header));
        assert!(Selector::parse("*.card").unwrap().matches(&tree, card));
        assert!(!Selector::parse("div.close").unwrap().matches(&tree, close));
    }

    #[test]
    fn descendant_combinator_walks_ancestors() {
        let (tree, _, header, close) = tree_with_card();
        assert!(Selector::parse(".card .close").unwrap().matches(&tree, close));
        assert!(Selector::parse(".card   #title button").unwrap().matches(&tree, close));
        assert!(!Selector::parse(".close .card").unwrap().matches(&tree, close));
        assert!(!Selector::parse(".card .close").unwrap().matches(&tree, header));
    }

    #[test]
    fn selector_list_matches_any_alternative() {
        let (tree, _, header, _) = tree_with_card();
        let selector: Selector = ".missing, header".parse().unwrap();
        assert!(selector.matches(&tree, header));
        assert_eq!(selector.to_string(), ".missing, header");
    }

    #[test]
    fn rejects_malformed_selectors() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("a,"), Err(SelectorError::Empty));
        assert_eq!(
            Selector::parse("div."),
            Err(SelectorError::MissingName { position: 4 })
        );
        assert_eq!(
            Selector::parse("div>p"),
            Err(SelectorError::UnexpectedCharacter {
                character: '>',
                position: 3
            })
        );
    }
}
