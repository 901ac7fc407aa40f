//! Graph Snapshots
//!
//! A snapshot is a plain, serializable copy of a reactor's cells: kinds,
//! values and edges, in creation order. Useful for debugging dumps.

use serde::Serialize;

use crate::graph::CellKindTag;
use crate::Reactor;

/// Serializable view of a whole reactor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot<T> {
    pub reactor: u64,
    pub cells: Vec<CellSnapshot<T>>,
}

/// Serializable view of a single cell. Edges are given as cell indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSnapshot<T> {
    pub index: usize,
    pub kind: CellKindTag,
    pub value: T,
    pub dependencies: Vec<usize>,
    pub dependents: Vec<usize>,
    pub callbacks: usize,
}

impl<T: Serialize> GraphSnapshot<T> {
    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<T> Reactor<T>
where
    T: Copy + Eq + 'static,
{
    /// Take a snapshot of every cell.
    pub fn snapshot(&self) -> GraphSnapshot<T> {
        let store = self.store();
        let cells = store
            .cells()
            .iter()
            .enumerate()
            .map(|(index, cell)| CellSnapshot {
                index,
                kind: cell.kind().tag(),
                value: cell.value(),
                dependencies: cell.kind().dependencies().iter().map(|id| id.index()).collect(),
                dependents: cell.dependents().iter().map(|id| id.index()).collect(),
                callbacks: cell.callbacks().len(),
            })
            .collect();
        GraphSnapshot {
            reactor: store.reactor().raw(),
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_lists_cells_in_creation_order() {
        let mut reactor: Reactor<i32> = Reactor::new();
        let a = reactor.create_input(2).unwrap();
        let b = reactor.create_compute1(a, |v| v * v).unwrap();
        reactor.add_callback(b, |_| {}).unwrap();

        let snapshot = reactor.snapshot();
        assert_eq!(snapshot.reactor, reactor.id().raw());
        assert_eq!(
            snapshot.cells,
            vec![
                CellSnapshot {
                    index: 0,
                    kind: CellKindTag::Input,
                    value: 2,
                    dependencies: vec![],
                    dependents: vec![1],
                    callbacks: 0,
                },
                CellSnapshot {
                    index: 1,
                    kind: CellKindTag::Compute1,
                    value: 4,
                    dependencies: vec![0],
                    dependents: vec![],
                    callbacks: 1,
                },
            ]
        );
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut reactor: Reactor<i32> = Reactor::new();
        let a = reactor.create_input(1).unwrap();
        let b = reactor.create_input(2).unwrap();
        reactor.create_compute2(a, b, |x, y| x + y).unwrap();

        let text = reactor.snapshot().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed["cells"][2],
            json!({
                "index": 2,
                "kind": "compute2",
                "value": 3,
                "dependencies": [0, 1],
                "dependents": [],
                "callbacks": 0,
            })
        );
    }
}
