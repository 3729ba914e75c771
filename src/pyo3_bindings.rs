// PyO3 bindings, behind the `pyo3` feature flag.
// Exposes CandidatePool over Newick trees, canonicalized against a taxon
// list whose first entry is the reference leaf.

#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
use crate::errors::TreePoolError;
#[cfg(feature = "pyo3")]
use crate::pool::CandidatePool;
#[cfg(feature = "pyo3")]
use crate::topology::{NewickCanonicalizer, TopologyCanonicalizer};

#[cfg(feature = "pyo3")]
fn to_py_err(err: TreePoolError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

#[cfg(feature = "pyo3")]
#[pyclass(name = "CandidateSet")]
pub struct PyCandidateSet {
    inner: CandidatePool<NewickCanonicalizer>,
}

#[cfg(feature = "pyo3")]
#[pymethods]
impl PyCandidateSet {
    #[new]
    #[pyo3(signature = (limit, max_candidates, taxa, seed=None))]
    fn new(
        limit: usize,
        max_candidates: usize,
        taxa: Vec<String>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let canonicalizer = NewickCanonicalizer::new(taxa).map_err(to_py_err)?;
        let inner = match seed {
            Some(seed) => CandidatePool::with_seed(limit, max_candidates, canonicalizer, seed),
            None => CandidatePool::new(limit, max_candidates, canonicalizer),
        }
        .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn update(&mut self, tree: String, score: f64) -> PyResult<bool> {
        self.inner.update(tree, score).map_err(to_py_err)
    }

    fn replace_tree(&mut self, tree: String, score: f64) -> PyResult<bool> {
        self.inner.replace(tree, score).map_err(to_py_err)
    }

    fn get_best_tree(&self) -> Vec<String> {
        self.inner.get_best_tree().into_iter().map(String::from).collect()
    }

    #[pyo3(signature = (num_trees=0))]
    fn get_best_trees(&self, num_trees: usize) -> PyResult<Vec<String>> {
        self.inner
            .get_best_trees(num_trees)
            .map(|trees| trees.into_iter().map(String::from).collect())
            .map_err(to_py_err)
    }

    fn get_best_scores(&self, num_best: usize) -> Vec<f64> {
        self.inner.get_best_scores(num_best)
    }

    /// Returns an empty string when the pool is empty.
    fn get_rand_cand_tree(&mut self) -> String {
        self.inner
            .get_rand_cand_tree()
            .map(String::from)
            .unwrap_or_default()
    }

    fn get_next_cand_tree(&mut self) -> PyResult<String> {
        self.inner.get_next_cand_tree().map_err(to_py_err)
    }

    fn tree_exists(&self, tree: &str) -> PyResult<bool> {
        self.inner.tree_exists(tree).map_err(to_py_err)
    }

    fn tree_topology_exists(&self, topology: &str) -> bool {
        self.inner.tree_topology_exists(topology)
    }

    fn get_topology(&self, tree: &str) -> PyResult<String> {
        self.inner
            .canonicalizer()
            .canonicalize(tree)
            .map_err(to_py_err)
    }

    #[getter]
    fn best_score(&self) -> f64 {
        self.inner.get_best_score()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(feature = "pyo3")]
#[pymodule]
fn treepool(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCandidateSet>()?;
    Ok(())
}
