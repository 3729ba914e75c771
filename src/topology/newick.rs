use alloc::string::String;
use alloc::vec::Vec;

use crate::errors::{Result, TreePoolError};

const NO_PARENT: u32 = u32::MAX;

/// Arena tree parsed from Newick text.
///
/// Nodes are stored as indices into parallel vectors, node 0 being the
/// root as written. Branch lengths are validated but not kept; only the
/// shape and the labels matter for topology comparison.
#[derive(Debug, Clone, Default)]
pub struct NewickTree {
    pub parent: Vec<u32>,
    pub label: Vec<Option<String>>,
    pub children: Vec<Vec<u32>>,
}

impl NewickTree {
    /// Parse a single Newick tree.
    ///
    /// Accepts nested parentheses, quoted and unquoted labels on leaves and
    /// internal nodes, `:length` suffixes, `[...]` comments and arbitrary
    /// whitespace between tokens. The terminating `;` is optional. Leaves
    /// must be labelled.
    pub fn parse(text: &str) -> Result<Self> {
        Parser::new(text).parse_tree()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn is_leaf(&self, node: u32) -> bool {
        self.children[node as usize].is_empty()
    }

    /// Indices of all leaf nodes, in input order.
    pub fn leaves(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len() as u32).filter(move |&n| self.is_leaf(n))
    }

    /// Neighbours of `node` when the tree is viewed as unrooted.
    pub fn neighbors(&self, node: u32) -> impl Iterator<Item = u32> + '_ {
        let parent = self.parent[node as usize];
        self.children[node as usize]
            .iter()
            .copied()
            .chain((parent != NO_PARENT).then_some(parent))
    }

    fn add_node(&mut self, parent: Option<u32>) -> u32 {
        let idx = self.parent.len() as u32;
        self.parent.push(parent.unwrap_or(NO_PARENT));
        self.label.push(None);
        self.children.push(Vec::new());
        if let Some(p) = parent {
            self.children[p as usize].push(idx);
        }
        idx
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn error(&self, message: &'static str) -> TreePoolError {
        TreePoolError::NewickSyntax {
            position: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Skip whitespace and bracketed comments.
    fn skip_trivia(&mut self) -> Result<()> {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'[' {
                match self.text[self.pos..].find(']') {
                    Some(end) => self.pos += end + 1,
                    None => return Err(self.error("unterminated comment")),
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn parse_tree(mut self) -> Result<NewickTree> {
        let mut tree = NewickTree::default();
        // Internal nodes whose closing parenthesis has not been seen yet.
        let mut open: Vec<u32> = Vec::new();
        // Set once a subtree is complete and a separator may follow.
        let mut completed: Option<u32> = None;

        loop {
            self.skip_trivia()?;
            let Some(b) = self.peek() else {
                break;
            };
            match b {
                b'(' => {
                    if completed.is_some() {
                        return Err(self.error("unexpected '('"));
                    }
                    if open.is_empty() && !tree.is_empty() {
                        return Err(self.error("content after the root"));
                    }
                    let node = tree.add_node(open.last().copied());
                    open.push(node);
                    self.pos += 1;
                }
                b',' => {
                    if completed.take().is_none() {
                        return Err(self.error("missing subtree before ','"));
                    }
                    if open.is_empty() {
                        return Err(self.error("',' outside parentheses"));
                    }
                    self.pos += 1;
                }
                b')' => {
                    if completed.is_none() {
                        return Err(self.error("missing subtree before ')'"));
                    }
                    let Some(node) = open.pop() else {
                        return Err(self.error("unbalanced ')'"));
                    };
                    self.pos += 1;
                    self.skip_trivia()?;
                    if let Some(label) = self.parse_label()? {
                        tree.label[node as usize] = Some(label);
                    }
                    self.parse_length()?;
                    completed = Some(node);
                }
                b';' => {
                    self.pos += 1;
                    self.skip_trivia()?;
                    if self.peek().is_some() {
                        return Err(self.error("content after ';'"));
                    }
                    break;
                }
                b':' => return Err(self.error("branch length without a node")),
                _ => {
                    if completed.is_some() {
                        return Err(self.error("missing ',' between subtrees"));
                    }
                    if open.is_empty() && !tree.is_empty() {
                        return Err(self.error("content after the root"));
                    }
                    let Some(label) = self.parse_label()? else {
                        return Err(self.error("expected a label"));
                    };
                    let node = tree.add_node(open.last().copied());
                    tree.label[node as usize] = Some(label);
                    self.parse_length()?;
                    completed = Some(node);
                }
            }
        }

        if !open.is_empty() {
            return Err(self.error("unbalanced '('"));
        }
        if completed.is_none() {
            return Err(self.error("empty tree"));
        }
        Ok(tree)
    }

    /// Parse an optional quoted or unquoted label at the cursor.
    fn parse_label(&mut self) -> Result<Option<String>> {
        match self.peek() {
            Some(b'\'') => self.parse_quoted_label().map(Some),
            Some(_) => {
                let start = self.pos;
                while let Some(b) = self.peek() {
                    if b.is_ascii_whitespace() || b"(),:;[]'".contains(&b) {
                        break;
                    }
                    self.pos += 1;
                }
                if self.pos == start {
                    Ok(None)
                } else {
                    Ok(Some(String::from(&self.text[start..self.pos])))
                }
            }
            None => Ok(None),
        }
    }

    fn parse_quoted_label(&mut self) -> Result<String> {
        // Opening quote.
        self.pos += 1;
        let text = self.text;
        let mut label = String::new();
        loop {
            let rest = &text[self.pos..];
            let Some(quote) = rest.find('\'') else {
                return Err(self.error("unterminated quoted label"));
            };
            label.push_str(&rest[..quote]);
            self.pos += quote + 1;
            // '' is an escaped quote inside a quoted label.
            if self.peek() == Some(b'\'') {
                label.push('\'');
                self.pos += 1;
            } else {
                return Ok(label);
            }
        }
    }

    /// Parse and discard an optional `:length` suffix.
    fn parse_length(&mut self) -> Result<()> {
        self.skip_trivia()?;
        if self.peek() != Some(b':') {
            return Ok(());
        }
        self.pos += 1;
        self.skip_trivia()?;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || b"+-.eE".contains(&b) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.text[start..self.pos].parse::<f64>().is_err() {
            self.pos = start;
            return Err(self.error("invalid branch length"));
        }
        Ok(())
    }
}
