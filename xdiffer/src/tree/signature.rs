//! Order-independent subtree signatures.
//!
//! Two subtrees get the same signature when they have the same labels and
//! values and the same multiset of child subtrees, regardless of the order
//! of those children.

use md5::{Digest, Md5};

/// 128-bit digest identifying a subtree up to child reordering.
pub type Signature = [u8; 16];

const ELEMENT_TAG: u8 = b'E';
const ATTRIBUTE_TAG: u8 = b'A';
const TEXT_TAG: u8 = b'T';

/// Label of a node as it enters the digest.
pub(crate) enum Label<'a> {
    Element(&'a str),
    Attribute(&'a str, &'a str),
    Text(&'a str),
}

/// Computes the signature of a node given its label and the signatures of
/// its children. `children` is sorted in place.
pub(crate) fn subtree_signature(label: Label<'_>, children: &mut [Signature]) -> Signature {
    let mut hasher = Md5::new();
    match label {
        Label::Element(name) => {
            hasher.update([ELEMENT_TAG]);
            hasher.update(name.as_bytes());
        }
        Label::Attribute(name, value) => {
            hasher.update([ATTRIBUTE_TAG]);
            hasher.update(name.as_bytes());
            hasher.update([0]);
            hasher.update(value.as_bytes());
        }
        Label::Text(value) => {
            hasher.update([TEXT_TAG]);
            hasher.update(value.as_bytes());
        }
    }
    hasher.update([0]);
    children.sort_unstable();
    for child in children.iter() {
        hasher.update(child);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_order_is_ignored() {
        let a = subtree_signature(Label::Text("a"), &mut []);
        let b = subtree_signature(Label::Text("b"), &mut []);

        let ab = subtree_signature(Label::Element("x"), &mut [a, b]);
        let ba = subtree_signature(Label::Element("x"), &mut [b, a]);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_kind_is_part_of_signature() {
        let element = subtree_signature(Label::Element("name"), &mut []);
        let text = subtree_signature(Label::Text("name"), &mut []);
        assert_ne!(element, text);
    }

    #[test]
    fn test_attribute_name_and_value_are_separated() {
        let first = subtree_signature(Label::Attribute("ab", "c"), &mut []);
        let second = subtree_signature(Label::Attribute("a", "bc"), &mut []);
        assert_ne!(first, second);
    }
}
