//! In-memory network store.

use std::sync::{Mutex, PoisonError, RwLock};

use hashbrown::HashMap;
use log::info;

use crate::model::{CrashLink, Edge, ElevationGrade, Incident, Node};
use crate::store::NetworkStore;
use crate::{EdgeId, Error, IncidentId, NodeId};

/// One complete elevation derivation run.
#[derive(Debug, Default)]
struct ElevationLayer {
    /// Terrain dataset tag the run was derived from
    source: String,
    generation: u64,
    grades: HashMap<EdgeId, ElevationGrade>,
}

/// One complete crash linking run, grouped by edge.
#[derive(Debug, Default)]
struct CrashLayer {
    generation: u64,
    by_edge: HashMap<EdgeId, Vec<CrashLink>>,
}

/// In-memory [`NetworkStore`].
///
/// The base graph is plain immutable data. Each derived layer sits behind its
/// own `RwLock` and is replaced wholesale under the write lock, with a
/// separate per-layer run mutex so two runs of the same batch stage cannot
/// interleave. The two layers are independent and may be rebuilt
/// concurrently.
#[derive(Debug)]
pub struct MemoryStore {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
    incidents: HashMap<IncidentId, Incident>,
    elevation: RwLock<ElevationLayer>,
    crash_links: RwLock<CrashLayer>,
    elevation_run: Mutex<()>,
    crash_run: Mutex<()>,
}

impl MemoryStore {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, incidents: Vec<Incident>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
            edges,
            incidents: incidents.into_iter().map(|i| (i.id, i)).collect(),
            elevation: RwLock::new(ElevationLayer::default()),
            crash_links: RwLock::new(CrashLayer::default()),
            elevation_run: Mutex::new(()),
            crash_run: Mutex::new(()),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn incident_count(&self) -> usize {
        self.incidents.len()
    }

    /// Generation counter of the active elevation layer. Bumped on every
    /// completed replace; readers can use it to detect a rebuild.
    pub fn elevation_generation(&self) -> u64 {
        read_lock(&self.elevation).generation
    }

    pub fn crash_link_generation(&self) -> u64 {
        read_lock(&self.crash_links).generation
    }
}

impl NetworkStore for MemoryStore {
    fn get_node(&self, id: NodeId) -> Option<Node> {
        self.nodes.get(&id).cloned()
    }

    fn list_nodes(&self) -> Vec<Node> {
        self.nodes.values().cloned().collect()
    }

    fn list_edges(&self) -> Vec<Edge> {
        self.edges.clone()
    }

    fn get_incident(&self, id: IncidentId) -> Option<Incident> {
        self.incidents.get(&id).cloned()
    }

    fn list_incidents(&self) -> Vec<Incident> {
        self.incidents.values().cloned().collect()
    }

    fn get_elevation_grade(&self, edge_id: EdgeId) -> Option<ElevationGrade> {
        read_lock(&self.elevation).grades.get(&edge_id).copied()
    }

    fn get_crash_links(&self, edge_id: EdgeId) -> Vec<CrashLink> {
        read_lock(&self.crash_links)
            .by_edge
            .get(&edge_id)
            .cloned()
            .unwrap_or_default()
    }

    fn write_elevation_grades(
        &self,
        source: &str,
        grades: Vec<(EdgeId, ElevationGrade)>,
    ) -> Result<(), Error> {
        // Serializes concurrent elevation runs; held across the swap only,
        // the compute phase runs without it.
        let _run = lock(&self.elevation_run);

        let staged: HashMap<EdgeId, ElevationGrade> = grades.into_iter().collect();
        let mut layer = write_lock(&self.elevation);
        layer.generation += 1;
        info!(
            "replacing elevation layer: source {:?}, generation {}, {} grades",
            source,
            layer.generation,
            staged.len()
        );
        layer.source = source.to_owned();
        layer.grades = staged;
        Ok(())
    }

    fn write_crash_links(&self, links: Vec<CrashLink>) -> Result<(), Error> {
        let _run = lock(&self.crash_run);

        let mut staged: HashMap<EdgeId, Vec<CrashLink>> = HashMap::new();
        for link in links {
            staged.entry(link.edge_id).or_default().push(link);
        }
        for edge_links in staged.values_mut() {
            edge_links.sort_by(|a, b| {
                a.distance_m
                    .total_cmp(&b.distance_m)
                    .then(a.incident_id.cmp(&b.incident_id))
            });
        }

        let mut layer = write_lock(&self.crash_links);
        layer.generation += 1;
        info!(
            "replacing crash link layer: generation {}, {} edges with links",
            layer.generation,
            staged.len()
        );
        layer.by_edge = staged;
        Ok(())
    }
}

// A poisoned lock only means another run panicked mid-swap of plain data;
// the layer itself is still a consistent generation, so recover the guard.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CrashExposure, Severity};
    use geo::{Point, line_string};

    fn store_with_one_edge() -> MemoryStore {
        let nodes = vec![
            Node {
                id: 1,
                geometry: Point::new(0.0, 0.0),
                degree: 1,
            },
            Node {
                id: 2,
                geometry: Point::new(0.01, 0.0),
                degree: 1,
            },
        ];
        let edges = vec![Edge {
            id: 10,
            source: 1,
            target: 2,
            geometry: line_string![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0)],
            length_m: 1113.0,
            road_class: "residential".to_owned(),
            class_priority: 1.0,
            name: None,
        }];
        let incidents = vec![Incident {
            id: 100,
            location: Point::new(0.005, 0.0),
            date: None,
            time: None,
            severity: Severity::SeriousInjury,
            on_street: None,
            at_street: None,
            light_condition: None,
            injured: 1,
            killed: 0,
        }];
        MemoryStore::new(nodes, edges, incidents)
    }

    #[test]
    fn elevation_write_replaces_previous_generation() {
        let store = store_with_one_edge();
        let first = ElevationGrade::from_samples(100.0, 110.0, 1113.0);
        store
            .write_elevation_grades("srtm", vec![(10, first)])
            .unwrap();

        // A later run that no longer covers edge 10 must clear it
        store.write_elevation_grades("srtm", vec![]).unwrap();
        assert!(store.get_elevation_grade(10).is_none());
        assert_eq!(store.elevation_generation(), 2);
    }

    #[test]
    fn crash_links_do_not_accumulate_across_reruns() {
        let store = store_with_one_edge();
        let link = CrashLink {
            incident_id: 100,
            edge_id: 10,
            distance_m: 3.0,
        };
        store.write_crash_links(vec![link]).unwrap();
        store.write_crash_links(vec![link]).unwrap();
        assert_eq!(store.get_crash_links(10).len(), 1);
    }

    #[test]
    fn crash_links_sorted_by_distance() {
        let store = store_with_one_edge();
        store
            .write_crash_links(vec![
                CrashLink {
                    incident_id: 101,
                    edge_id: 10,
                    distance_m: 20.0,
                },
                CrashLink {
                    incident_id: 100,
                    edge_id: 10,
                    distance_m: 3.0,
                },
            ])
            .unwrap();
        let links = store.get_crash_links(10);
        assert_eq!(links[0].incident_id, 100);
        assert_eq!(links[1].incident_id, 101);
    }

    #[test]
    fn exposure_aggregates_count_and_severity() {
        let store = store_with_one_edge();
        store
            .write_crash_links(vec![CrashLink {
                incident_id: 100,
                edge_id: 10,
                distance_m: 3.0,
            }])
            .unwrap();
        let exposure = store.crash_exposure(10);
        assert_eq!(exposure.count, 1);
        assert_eq!(exposure.score, Severity::SeriousInjury.weight());
    }

    #[test]
    fn missing_derived_data_reads_as_absent() {
        let store = store_with_one_edge();
        assert!(store.get_elevation_grade(10).is_none());
        assert!(store.get_crash_links(10).is_empty());
        assert_eq!(store.crash_exposure(10), CrashExposure::default());
    }
}
