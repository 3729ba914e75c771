use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use super::newick::NewickTree;
use super::r#trait::TopologyCanonicalizer;
use crate::errors::{Result, TreePoolError};

const UNVISITED: u32 = u32::MAX;

/// Canonicalizer for Newick tree text over a fixed taxon list.
///
/// Taxon `i` of the list is written as the identifier `i`, and the first
/// taxon is the reference leaf. A tree is read as unrooted, rerooted at the
/// reference leaf, and written as
/// `(<ref>,<subtree>,<subtree>,...);` where every subtree is a taxon
/// identifier or a parenthesised list of subtrees. Siblings are ordered by
/// the smallest taxon identifier they contain, branch lengths and internal
/// labels are dropped, and nodes with a single child are suppressed, so the
/// key depends only on the unrooted topology.
#[derive(Clone, Debug)]
pub struct NewickCanonicalizer {
    taxa: Vec<String>,
    ids: BTreeMap<String, usize>,
}

impl NewickCanonicalizer {
    /// Create a canonicalizer for `taxa`, given in alignment order.
    pub fn new<I, S>(taxa: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let taxa: Vec<String> = taxa.into_iter().map(Into::into).collect();
        if taxa.is_empty() {
            return Err(TreePoolError::NoTaxa);
        }
        let mut ids = BTreeMap::new();
        for (id, name) in taxa.iter().enumerate() {
            if ids.insert(name.clone(), id).is_some() {
                return Err(TreePoolError::DuplicateTaxon(name.clone()));
            }
        }
        Ok(Self { taxa, ids })
    }

    /// Name of the leaf every tree is rerooted at.
    pub fn reference_leaf(&self) -> &str {
        &self.taxa[0]
    }

    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    /// Identifier of `name`, if it is a known taxon.
    pub fn taxon_id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Map every leaf of `tree` to its taxon identifier.
    fn leaf_ids(&self, tree: &NewickTree) -> Result<Vec<Option<usize>>> {
        let mut ids = vec![None; tree.len()];
        let mut seen = vec![false; self.taxa.len()];
        for leaf in tree.leaves() {
            let name = tree.label[leaf as usize].as_deref().unwrap_or_default();
            let id = self
                .taxon_id(name)
                .ok_or_else(|| TreePoolError::UnknownTaxon(name.to_string()))?;
            if seen[id] {
                return Err(TreePoolError::DuplicateTaxon(name.to_string()));
            }
            seen[id] = true;
            ids[leaf as usize] = Some(id);
        }
        Ok(ids)
    }
}

impl TopologyCanonicalizer for NewickCanonicalizer {
    fn canonicalize(&self, tree_text: &str) -> Result<String> {
        let tree = NewickTree::parse(tree_text)?;
        let ids = self.leaf_ids(&tree)?;
        let reference = ids
            .iter()
            .position(|&id| id == Some(0))
            .ok_or_else(|| TreePoolError::MissingReferenceLeaf(self.taxa[0].clone()))?
            as u32;

        // Orient the unrooted tree away from the reference leaf.
        let mut up = vec![UNVISITED; tree.len()];
        let mut order: Vec<u32> = Vec::with_capacity(tree.len());
        let mut stack = vec![reference];
        up[reference as usize] = reference;
        while let Some(node) = stack.pop() {
            order.push(node);
            for next in tree.neighbors(node) {
                if up[next as usize] == UNVISITED {
                    up[next as usize] = node;
                    stack.push(next);
                }
            }
        }

        let up: &[u32] = &up;
        let oriented_children = |node: u32| {
            tree.neighbors(node)
                .filter(move |&n| up[node as usize] != n)
        };

        // Render subtrees bottom-up. `None` marks a subtree without leaves.
        let mut rendered: Vec<Option<(usize, String)>> = vec![None; tree.len()];
        for &node in order.iter().skip(1).rev() {
            let subtree = match ids[node as usize] {
                Some(id) => Some((id, id.to_string())),
                None => {
                    let parts = collect_parts(oriented_children(node), &rendered);
                    match parts.len() {
                        0 => None,
                        1 => parts.into_iter().next(),
                        _ => Some((parts[0].0, join_clade(&parts))),
                    }
                }
            };
            rendered[node as usize] = subtree;
        }

        // The reference leaf hangs off a single neighbour; its subtrees
        // become the top-level siblings of the reference.
        let mut top: Vec<(usize, String)> = Vec::new();
        let mut current = oriented_children(reference).next();
        while let Some(node) = current {
            if ids[node as usize].is_some() {
                top.extend(rendered[node as usize].clone());
                break;
            }
            let kids: Vec<u32> = oriented_children(node)
                .filter(|&k| rendered[k as usize].is_some())
                .collect();
            if kids.len() == 1 {
                current = Some(kids[0]);
            } else {
                top = collect_parts(kids.into_iter(), &rendered);
                break;
            }
        }

        let mut key = String::from("(0");
        for (_, part) in &top {
            key.push(',');
            key.push_str(part);
        }
        key.push_str(");");
        Ok(key)
    }
}

/// Rendered subtrees of `nodes`, sorted by smallest contained taxon.
fn collect_parts(
    nodes: impl Iterator<Item = u32>,
    rendered: &[Option<(usize, String)>],
) -> Vec<(usize, String)> {
    let mut parts: Vec<(usize, String)> = nodes
        .filter_map(|n| rendered[n as usize].clone())
        .collect();
    parts.sort_unstable_by_key(|(min_id, _)| *min_id);
    parts
}

fn join_clade(parts: &[(usize, String)]) -> String {
    let mut out = String::from("(");
    for (i, (_, part)) in parts.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(part);
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon() -> NewickCanonicalizer {
        NewickCanonicalizer::new(["A", "B", "C", "D", "E"]).unwrap()
    }

    #[test]
    fn rooting_and_branch_lengths_are_ignored() {
        let c = canon();
        let unrooted = c.canonicalize("(A:0.1,B:0.2,(C:0.3,D:0.4):0.5);").unwrap();
        let rooted_ab = c.canonicalize("((A,B):0.2,(C,D):0.7);").unwrap();
        let rooted_c = c.canonicalize("(C,(D,(B:1,A:2)));").unwrap();
        assert_eq!(unrooted, "(0,1,(2,3));");
        assert_eq!(rooted_ab, unrooted);
        assert_eq!(rooted_c, unrooted);
    }

    #[test]
    fn child_order_is_ignored() {
        let c = canon();
        let a = c.canonicalize("((E,(D,C)),B,A);").unwrap();
        let b = c.canonicalize("(A,B,((C,D),E));").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "(0,1,((2,3),4));");
    }

    #[test]
    fn different_topologies_differ() {
        let c = canon();
        let ab_cd = c.canonicalize("((A,B),(C,D));").unwrap();
        let ac_bd = c.canonicalize("((A,C),(B,D));").unwrap();
        let ad_bc = c.canonicalize("((A,D),(B,C));").unwrap();
        assert_ne!(ab_cd, ac_bd);
        assert_ne!(ab_cd, ad_bc);
        assert_ne!(ac_bd, ad_bc);
    }

    #[test]
    fn different_taxon_sets_differ() {
        let c = canon();
        let four = c.canonicalize("((A,B),(C,D));").unwrap();
        let five = c.canonicalize("((A,B),(C,(D,E)));").unwrap();
        assert_ne!(four, five);
    }

    #[test]
    fn small_trees() {
        let c = canon();
        assert_eq!(c.canonicalize("A;").unwrap(), "(0);");
        assert_eq!(c.canonicalize("(B,A);").unwrap(), "(0,1);");
        assert_eq!(c.canonicalize("((A,B));").unwrap(), "(0,1);");
    }

    #[test]
    fn internal_labels_are_ignored() {
        let c = canon();
        let plain = c.canonicalize("((A,B),(C,D));").unwrap();
        let labelled = c.canonicalize("((A,B)99:0.1,(C,D)87:0.1)root;").unwrap();
        assert_eq!(plain, labelled);
    }

    #[test]
    fn errors() {
        let c = canon();
        assert_eq!(
            c.canonicalize("(A,B,X);").unwrap_err(),
            TreePoolError::UnknownTaxon("X".into())
        );
        assert_eq!(
            c.canonicalize("(A,B,B);").unwrap_err(),
            TreePoolError::DuplicateTaxon("B".into())
        );
        assert_eq!(
            c.canonicalize("(B,C,D);").unwrap_err(),
            TreePoolError::MissingReferenceLeaf("A".into())
        );
        assert!(matches!(
            c.canonicalize("(A,B"),
            Err(TreePoolError::NewickSyntax { .. })
        ));
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            NewickCanonicalizer::new(Vec::<String>::new()).unwrap_err(),
            TreePoolError::NoTaxa
        );
        assert_eq!(
            NewickCanonicalizer::new(["A", "B", "A"]).unwrap_err(),
            TreePoolError::DuplicateTaxon("A".into())
        );
    }

    #[test]
    fn reference_leaf_is_first_taxon() {
        let c = canon();
        assert_eq!(c.reference_leaf(), "A");
        assert_eq!(c.taxon_id("D"), Some(3));
        assert_eq!(c.taxon_id("Z"), None);
        assert_eq!(c.taxa().len(), 5);
    }
}
