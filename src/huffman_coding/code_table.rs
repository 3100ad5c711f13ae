use log::trace;
use rustc_hash::FxHashMap;

use super::huffman::{Code, HuffmanTree, NodeData};
use crate::error::{HcError, Result};

/// Both directions of the symbol <-> code word mapping for one tree.
#[derive(Debug, Clone)]
pub struct CodeTable {
    encode: FxHashMap<String, Code>,
    decode: FxHashMap<Code, String>,
    max_len: u8,
}

impl CodeTable {
    /// Walk the tree once from the root, collecting (symbol, path) at each leaf.
    /// A symbol that appears on two leaves makes the mapping ambiguous and is rejected.
    pub fn new(tree: &HuffmanTree) -> Result<Self> {
        let mut encode = FxHashMap::default();
        let mut decode = FxHashMap::default();
        let mut max_len = 0;

        let mut stack = vec![tree.root()];
        while let Some(idx) = stack.pop() {
            match &tree.nodes()[idx].node_data {
                NodeData::Kids(a, b) => {
                    // Push B first so A's subtree is visited first
                    stack.push(*b);
                    stack.push(*a);
                }
                NodeData::Leaf(sym) => {
                    let path = tree.path(idx);
                    if encode.insert(sym.clone(), path).is_some() {
                        return Err(HcError::CorruptTree(format!(
                            "symbol {:?} appears on more than one leaf",
                            sym
                        )));
                    }
                    trace!("{:?} -> {}", sym, path);
                    decode.insert(path, sym.clone());
                    max_len = max_len.max(path.len);
                }
            }
        }

        Ok(CodeTable {
            encode,
            decode,
            max_len,
        })
    }

    /// Code word for a symbol.
    pub fn code(&self, sym: &str) -> Option<Code> {
        self.encode.get(sym).copied()
    }

    /// Symbol for a complete code word, or None if `code` is only a prefix.
    pub fn symbol(&self, code: &Code) -> Option<&str> {
        self.decode.get(code).map(String::as_str)
    }

    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.encode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode.is_empty()
    }

    /// Total payload bits for the given symbol counts.
    pub fn encoded_bits(&self, freqs: &FxHashMap<&str, u64>) -> Result<u64> {
        freqs.iter().try_fold(0_u64, |total, (sym, f)| {
            let code = self.code(sym).ok_or_else(|| {
                HcError::InvalidInput(format!("symbol {:?} is not in the code table", sym))
            })?;
            Ok(total + code.len as u64 * f)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::huffman_coding::huffman::{build_tree, Node};
    use crate::tools::freq_count::freqs;

    #[test]
    fn table_matches_tree_test() {
        let syms: Vec<String> = "mississippi river".chars().map(|c| c.to_string()).collect();
        let f = freqs(&syms);
        let tree = build_tree(&f).unwrap();
        let table = CodeTable::new(&tree).unwrap();
        assert_eq!(table.len(), f.len());
        for (sym, path) in tree.leaves() {
            assert_eq!(table.code(sym), Some(path));
            assert_eq!(table.symbol(&path), Some(sym));
        }
        assert_eq!(table.max_len(), tree.depth());
        // Internal paths are not symbols
        assert_eq!(table.symbol(&Code::ROOT), None);
    }

    #[test]
    fn encoded_bits_test() {
        let syms: Vec<String> = "aaab".chars().map(|c| c.to_string()).collect();
        let f = freqs(&syms);
        let table = CodeTable::new(&build_tree(&f).unwrap()).unwrap();
        assert_eq!(table.encoded_bits(&f).unwrap(), 4);
    }

    #[test]
    fn duplicate_leaf_test() {
        let nodes = vec![
            Node::new(None, NodeData::Leaf("a".to_string())),
            Node::new(None, NodeData::Leaf("a".to_string())),
            Node::new(None, NodeData::Kids(0, 1)),
        ];
        let tree = HuffmanTree::new(nodes, 2).unwrap();
        assert!(matches!(CodeTable::new(&tree), Err(HcError::CorruptTree(_))));
    }
}
