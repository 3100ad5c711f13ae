use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::{Display, Formatter};

use log::trace;
use rustc_hash::FxHashMap;

use crate::error::{HcError, Result};

/// Deepest leaf we can give a code word to. Real text never gets close; only a hostile
/// serialized tree can.
pub const MAX_DEPTH: u8 = 64;

/// A path from the root, most significant bit first. `len` is the number of valid bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

impl Code {
    /// The root path, "".
    pub const ROOT: Code = Code { bits: 0, len: 0 };

    /// Extend this path by one step: false for child A ("0"), true for child B ("1").
    /// Returns None past MAX_DEPTH.
    pub fn child(self, bit: bool) -> Option<Code> {
        if self.len >= MAX_DEPTH {
            return None;
        }
        Some(Code {
            bits: self.bits << 1 | bit as u64,
            len: self.len + 1,
        })
    }

    /// True if `self` is a proper or equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len
            && other
                .bits
                .checked_shr((other.len - self.len) as u32)
                .unwrap_or(0)
                == self.bits
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.len).rev() {
            write!(f, "{}", self.bits >> i & 1)?;
        }
        Ok(())
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    /// Child A and child B, as arena indices.
    Kids(usize, usize),
    Leaf(String),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    /// Symbol count, or sum of the kids. Trees rebuilt from a file carry no weights.
    pub weight: Option<u64>,
    pub node_data: NodeData,
}

impl Node {
    pub fn new(weight: Option<u64>, node_data: NodeData) -> Node {
        Node { weight, node_data }
    }
}

/// A Huffman tree stored as an arena of nodes. Paths are assigned to every node on
/// construction and never change.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
    paths: Vec<Code>,
}

impl HuffmanTree {
    /// Wrap an arena and assign paths from `root`. Fails if a kid index is out of range,
    /// a node is reached twice or not at all, or the tree is deeper than MAX_DEPTH.
    pub fn new(nodes: Vec<Node>, root: usize) -> Result<Self> {
        let paths = attach_paths(&nodes, root)?;
        Ok(HuffmanTree { nodes, root, paths })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn path(&self, idx: usize) -> Code {
        self.paths[idx]
    }

    /// Every leaf with its path, in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = (&str, Code)> + '_ {
        self.nodes
            .iter()
            .zip(&self.paths)
            .filter_map(|(node, path)| match &node.node_data {
                NodeData::Leaf(sym) => Some((sym.as_str(), *path)),
                NodeData::Kids(..) => None,
            })
    }

    /// Length of the longest path.
    pub fn depth(&self) -> u8 {
        self.paths.iter().map(|p| p.len).max().unwrap_or(0)
    }
}

/// Build a Huffman tree by repeatedly merging the two lightest nodes.
///
/// Ties are broken by arena index. Leaves enter the arena sorted by symbol and merged nodes
/// are appended as they are created, so the same frequencies always give the same tree.
/// The first node popped becomes child A ("0"), the second child B ("1").
pub fn build_tree(freqs: &FxHashMap<&str, u64>) -> Result<HuffmanTree> {
    if freqs.len() < 2 {
        return Err(HcError::InvalidInput(format!(
            "need at least 2 distinct symbols to build a code, found {}",
            freqs.len()
        )));
    }

    let mut leaves: Vec<(&str, u64)> = freqs.iter().map(|(&sym, &f)| (sym, f)).collect();
    leaves.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut nodes = Vec::with_capacity(leaves.len() * 2 - 1);
    let mut heap = BinaryHeap::with_capacity(leaves.len());
    for (sym, f) in leaves {
        heap.push(Reverse((f, nodes.len())));
        nodes.push(Node::new(Some(f), NodeData::Leaf(sym.to_string())));
    }

    // Pull off the two lightest nodes and merge them until only the root is left
    let root = loop {
        match (heap.pop(), heap.pop()) {
            (Some(Reverse((wa, a))), Some(Reverse((wb, b)))) => {
                heap.push(Reverse((wa + wb, nodes.len())));
                nodes.push(Node::new(Some(wa + wb), NodeData::Kids(a, b)));
            }
            (Some(Reverse((_, root))), None) => break root,
            _ => return Err(HcError::InvalidInput("empty alphabet".to_string())),
        }
    };

    let tree = HuffmanTree::new(nodes, root)?;
    trace!(
        "Built tree with {} nodes, depth {}",
        tree.nodes.len(),
        tree.depth()
    );
    Ok(tree)
}

/// Walk the arena from `root`, giving child A the parent path + "0" and child B + "1".
fn attach_paths(nodes: &[Node], root: usize) -> Result<Vec<Code>> {
    if root >= nodes.len() {
        return Err(HcError::CorruptTree(format!(
            "root {} is outside the {} node arena",
            root,
            nodes.len()
        )));
    }
    let mut paths: Vec<Option<Code>> = vec![None; nodes.len()];
    paths[root] = Some(Code::ROOT);

    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        let NodeData::Kids(a, b) = nodes[idx].node_data else {
            continue;
        };
        let parent = paths[idx].unwrap_or(Code::ROOT);
        for (kid, bit) in [(a, false), (b, true)] {
            match paths.get(kid) {
                None => {
                    return Err(HcError::CorruptTree(format!(
                        "node {} points at missing node {}",
                        idx, kid
                    )))
                }
                Some(Some(_)) => {
                    return Err(HcError::CorruptTree(format!(
                        "node {} is reached more than once",
                        kid
                    )))
                }
                Some(None) => {}
            }
            let path = parent.child(bit).ok_or_else(|| {
                HcError::CorruptTree(format!("tree is deeper than {} levels", MAX_DEPTH))
            })?;
            paths[kid] = Some(path);
            stack.push(kid);
        }
    }

    paths
        .into_iter()
        .enumerate()
        .map(|(idx, p)| {
            p.ok_or_else(|| HcError::CorruptTree(format!("node {} is detached from the root", idx)))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::freq_count::freqs;

    fn symbols(text: &str) -> Vec<String> {
        text.chars().map(|c| c.to_string()).collect()
    }

    fn code(s: &str) -> Code {
        s.chars().fold(Code::ROOT, |c, b| c.child(b == '1').unwrap())
    }

    #[test]
    fn two_symbols_get_single_bits_test() {
        let syms = symbols("aaab");
        let tree = build_tree(&freqs(&syms)).unwrap();
        let mut leaves: Vec<(String, String)> = tree
            .leaves()
            .map(|(s, c)| (s.to_string(), c.to_string()))
            .collect();
        leaves.sort();
        // The lighter 'b' is popped first and takes the "0" side
        assert_eq!(
            leaves,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "0".to_string())
            ]
        );
    }

    #[test]
    fn two_symbols_any_weights_test() {
        for text in ["ab", "abbbbbbbbbbbbbbbbb", "aaaaaaaaaaaaaaab"] {
            let syms = symbols(text);
            let tree = build_tree(&freqs(&syms)).unwrap();
            assert!(tree.leaves().all(|(_, c)| c.len == 1));
        }
    }

    #[test]
    fn prefix_free_test() {
        let syms = symbols("this is an example of a huffman tree, with some uneven counts");
        let tree = build_tree(&freqs(&syms)).unwrap();
        let leaves: Vec<Code> = tree.leaves().map(|(_, c)| c).collect();
        for (i, a) in leaves.iter().enumerate() {
            for (j, b) in leaves.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn weighted_length_is_optimal_test() {
        // Classic example: 45/13/12/16/9/5 costs 224 bits
        let mut f = FxHashMap::default();
        for (s, w) in [("a", 45), ("b", 13), ("c", 12), ("d", 16), ("e", 9), ("f", 5)] {
            f.insert(s, w);
        }
        let tree = build_tree(&f).unwrap();
        let cost: u64 = tree.leaves().map(|(s, c)| f[s] * c.len as u64).sum();
        assert_eq!(cost, 224);
    }

    #[test]
    fn deterministic_test() {
        let syms = symbols("abcdabcdabcdxyz");
        let first: Vec<(String, Code)> = build_tree(&freqs(&syms))
            .unwrap()
            .leaves()
            .map(|(s, c)| (s.to_string(), c))
            .collect();
        for _ in 0..10 {
            let again: Vec<(String, Code)> = build_tree(&freqs(&syms))
                .unwrap()
                .leaves()
                .map(|(s, c)| (s.to_string(), c))
                .collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn too_few_symbols_test() {
        let syms = symbols("aaaa");
        assert!(matches!(
            build_tree(&freqs(&syms)),
            Err(HcError::InvalidInput(_))
        ));
        assert!(matches!(
            build_tree(&FxHashMap::default()),
            Err(HcError::InvalidInput(_))
        ));
    }

    #[test]
    fn bad_arena_test() {
        let leaf = |s: &str| Node::new(None, NodeData::Leaf(s.to_string()));
        // Kid index out of range
        let nodes = vec![leaf("a"), Node::new(None, NodeData::Kids(0, 5))];
        assert!(matches!(HuffmanTree::new(nodes, 1), Err(HcError::CorruptTree(_))));
        // Same kid twice
        let nodes = vec![leaf("a"), Node::new(None, NodeData::Kids(0, 0))];
        assert!(matches!(HuffmanTree::new(nodes, 1), Err(HcError::CorruptTree(_))));
        // Detached leaf
        let nodes = vec![leaf("a"), leaf("b"), leaf("c"), Node::new(None, NodeData::Kids(0, 1))];
        assert!(matches!(HuffmanTree::new(nodes, 3), Err(HcError::CorruptTree(_))));
    }

    #[test]
    fn code_display_test() {
        assert_eq!(Code::ROOT.to_string(), "");
        assert_eq!(code("0110").to_string(), "0110");
        assert!(code("01").is_prefix_of(&code("0110")));
        assert!(!code("11").is_prefix_of(&code("0110")));
    }
}
