//! In-memory prefix tree for autocomplete / 前缀树
//!
//! Every node exclusively owns its children, keyed by codepoint. Children
//! live in a `BTreeMap`, so iteration order is ascending codepoint order and
//! suggestion output is deterministic.
//!
//! The tree is built once at startup and then only read. All read
//! operations take `&self` and return owned results, so an `Arc<Trie>` can
//! be queried from any number of threads at once.

use std::collections::BTreeMap;

use super::tokenizer::{CharFolding, SimpleFolding};

/// Trie node / 前缀树节点
#[derive(Debug, Default)]
pub struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// True iff the path to this node was inserted as a whole word
    is_word: bool,
}

impl TrieNode {
    /// Whether this node terminates a stored word / 是否为完整单词
    pub fn is_word(&self) -> bool {
        self.is_word
    }
}

/// Prefix tree / 前缀树
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    words: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word, returns true if it was not stored before / 插入单词
    ///
    /// Inserting an empty word marks the root itself; the tokenizer never
    /// produces one.
    pub fn insert(&mut self, word: &str) -> bool {
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }

        if node.is_word {
            return false;
        }
        node.is_word = true;
        self.words += 1;
        true
    }

    /// Exact lookup / 精确查找
    pub fn search(&self, word: &str) -> bool {
        self.find_node(word).is_some_and(TrieNode::is_word)
    }

    /// Whether any path matches the prefix, complete word or not / 前缀是否存在
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.find_node(prefix).is_some()
    }

    /// Number of distinct stored words / 单词数量
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Number of nodes, root included / 节点数量
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![&self.root];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.values());
        }
        count
    }

    fn find_node(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Collect up to `max_count` stored words starting with `prefix` / 收集联想词
    ///
    /// The prefix is lowercased first; stored words are always lowercase.
    /// Output order: the prefix itself if it is a stored word, then
    /// completions in depth-first order with children visited by ascending
    /// codepoint. Traversal stops as soon as the budget is spent.
    ///
    /// The result is allocated per call; nothing is written back into the trie.
    pub fn collect_suggestions(&self, prefix: &str, max_count: usize) -> Vec<String> {
        let folding = SimpleFolding;
        let prefix: String = prefix.chars().map(|c| folding.fold(c)).collect();

        let mut results = Vec::new();
        if max_count == 0 {
            return results;
        }
        let Some(start) = self.find_node(&prefix) else {
            return results;
        };

        let mut word = prefix;
        if start.is_word {
            results.push(word.clone());
            if results.len() == max_count {
                return results;
            }
        }

        // Explicit stack of child iterators, one per level below `start`
        let mut stack = vec![start.children.iter()];
        while let Some(level) = stack.last_mut() {
            match level.next() {
                Some((&c, child)) => {
                    word.push(c);
                    if child.is_word {
                        results.push(word.clone());
                        if results.len() == max_count {
                            break;
                        }
                    }
                    stack.push(child.children.iter());
                }
                None => {
                    stack.pop();
                    if !stack.is_empty() {
                        word.pop();
                    }
                }
            }
        }

        results
    }
}

impl Drop for Trie {
    fn drop(&mut self) {
        // Tear down iteratively so very long words cannot overflow the stack
        let mut pending: Vec<TrieNode> = std::mem::take(&mut self.root.children)
            .into_values()
            .collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

impl<S: AsRef<str>> Extend<S> for Trie {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.insert(word.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Trie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}
