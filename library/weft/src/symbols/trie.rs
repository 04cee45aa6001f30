//! Longest-match lookup over symbol keys.

use rustc_hash::FxHashMap;
use weft_text::fold::{fold_char, fold_str};

#[derive(Default, Debug)]
struct TrieNode {
    children: FxHashMap<char, usize>,
    /// Index of the entry whose key ends here.
    entry: Option<usize>,
}

/// A character trie mapping keys to entry indices.
///
/// A folded trie is built from case-folded keys and folds the input while
/// walking it.
#[derive(Debug)]
pub(crate) struct Trie {
    nodes: Vec<TrieNode>,
    folded: bool,
}

impl Trie {
    pub(crate) fn build<'k>(keys: impl IntoIterator<Item = &'k str>, folded: bool) -> Self {
        let mut trie = Trie {
            nodes: vec![TrieNode::default()],
            folded,
        };
        for (index, key) in keys.into_iter().enumerate() {
            if folded {
                trie.insert(fold_str(key), index);
            } else {
                trie.insert(key.chars(), index);
            }
        }
        trie
    }

    fn insert(&mut self, key: impl IntoIterator<Item = char>, entry: usize) {
        let mut node = 0;
        for c in key {
            node = match self.nodes[node].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(c, next);
                    next
                }
            };
        }
        self.nodes[node].entry = Some(entry);
    }

    fn step(&self, node: usize, c: char) -> Option<usize> {
        self.nodes.get(node)?.children.get(&c).copied()
    }

    /// The longest key that prefixes `input`, as `(input bytes, entry)`.
    ///
    /// Empty keys are never matched.
    pub(crate) fn longest_match(&self, input: &str) -> Option<(usize, usize)> {
        let mut node = 0;
        let mut best = None;
        for (offset, c) in input.char_indices() {
            let next = if self.folded {
                fold_char(c)
                    .into_iter()
                    .try_fold(node, |node, folded| self.step(node, folded))
            } else {
                self.step(node, c)
            };
            let Some(next) = next else {
                break;
            };
            node = next;
            // A match ends here only once the whole input character is consumed.
            if let Some(entry) = self.nodes[node].entry {
                best = Some((offset + c.len_utf8(), entry));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match_prefers_longer_key() {
        let trie = Trie::build(["a", "ab", "abc"], false);
        assert_eq!(trie.longest_match("abd"), Some((2, 1)));
        assert_eq!(trie.longest_match("abcd"), Some((3, 2)));
        assert_eq!(trie.longest_match("x"), None);
    }

    #[test]
    fn test_folded_match() {
        let trie = Trie::build(["Straße"], true);
        assert_eq!(trie.longest_match("STRASSE!"), Some(("STRASSE".len(), 0)));
        assert_eq!(trie.longest_match("strasse"), Some((7, 0)));
    }

    #[test]
    fn test_folded_match_stops_mid_expansion() {
        // `ß` folds to "ss"; the key "s" must not match half of it.
        let trie = Trie::build(["s"], true);
        assert_eq!(trie.longest_match("ß"), None);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let trie = Trie::build(["K", "k"], true);
        assert_eq!(trie.longest_match("k"), Some((1, 1)));
    }
}
