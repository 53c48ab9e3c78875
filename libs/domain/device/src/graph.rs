// [libs/domain/device/src/graph.rs]
/*!
 * =================================================================
 * APARATO: TILE ROUTING GRAPHS (V3.0)
 * CLASIFICACIÓN: DOMAIN DEVICE (ESTRATO L2)
 * RESPONSABILIDAD: GRAFOS DE RUTEO POR TILE Y BÚSQUEDA BFS
 *
 * Cada tile aporta un grafo local: cables como nodos, PIPs como
 * aristas dirigidas. El grafo de dispositivo es la colección de
 * grafos locales; la búsqueda de caminos es intra-tile.
 * =================================================================
 */

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::DeviceModel;

/// Grafo de ruteo local de un tile.
#[derive(Debug, Clone, Default)]
pub struct TileRoutingGraph {
    pub tile_name: String,
    nodes: BTreeSet<u32>,
    edges: Vec<(u32, u32)>,
}

impl TileRoutingGraph {
    /// Grafo vacío para un tile.
    #[must_use]
    pub fn new(tile_name: &str) -> Self {
        Self { tile_name: tile_name.to_string(), ..Self::default() }
    }

    /// Registra un cable como nodo.
    pub fn add_node(&mut self, wire_id: u32) {
        self.nodes.insert(wire_id);
    }

    /// Registra un PIP como arista dirigida (y sus extremos como nodos).
    pub fn add_edge(&mut self, start_wire: u32, end_wire: u32) {
        self.add_node(start_wire);
        self.add_node(end_wire);
        self.edges.push((start_wire, end_wire));
    }

    /// Cables alcanzables desde `wire_id` en un salto de PIP.
    #[must_use]
    pub fn neighbors(&self, wire_id: u32) -> Vec<u32> {
        self.edges
            .iter()
            .filter(|(start, _)| *start == wire_id)
            .map(|(_, end)| *end)
            .collect()
    }

    /// Cantidad de nodos del grafo local.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Cantidad de aristas del grafo local.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Estadísticas agregadas del grafo de dispositivo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceGraphStatistics {
    pub tiles: usize,
    pub total_routing_nodes: usize,
    pub total_routing_edges: usize,
}

/// Colección de grafos de ruteo locales de todo el dispositivo.
#[derive(Debug, Clone)]
pub struct DeviceGraph {
    tile_graphs: BTreeMap<String, TileRoutingGraph>,
}

impl DeviceGraph {
    /// Ensambla los grafos locales desde el modelo del dispositivo.
    #[must_use]
    pub fn build(model: &DeviceModel) -> Self {
        let mut tile_graphs = BTreeMap::new();
        for tile in model.all_tiles() {
            let mut graph = TileRoutingGraph::new(&tile.name);
            for wire in model.wires_of_tile(&tile.name) {
                graph.add_node(wire.wire_id);
            }
            for pip in model.pips_of_tile(&tile.name) {
                graph.add_edge(pip.start_wire_id, pip.end_wire_id);
            }
            tile_graphs.insert(tile.name.clone(), graph);
        }
        debug!("🕸️ [DEVICE_GRAPH]: {} tile graphs assembled", tile_graphs.len());
        Self { tile_graphs }
    }

    /// Grafo local de un tile.
    #[must_use]
    pub fn tile_graph(&self, tile_name: &str) -> Option<&TileRoutingGraph> {
        self.tile_graphs.get(tile_name)
    }

    /**
     * Camino intra-tile entre dos cables vía BFS, si existe.
     * Retorna la secuencia de wire_ids incluyendo ambos extremos.
     */
    #[must_use]
    pub fn routing_path(
        &self,
        tile_name: &str,
        start_wire: u32,
        end_wire: u32,
    ) -> Option<Vec<u32>> {
        let graph = self.tile_graph(tile_name)?;

        let mut queue: VecDeque<Vec<u32>> = VecDeque::new();
        let mut visited: BTreeSet<u32> = BTreeSet::new();
        queue.push_back(vec![start_wire]);
        visited.insert(start_wire);

        while let Some(path) = queue.pop_front() {
            let Some(&current) = path.last() else { continue };
            if current == end_wire {
                return Some(path);
            }
            for neighbor in graph.neighbors(current) {
                if visited.insert(neighbor) {
                    let mut extended = path.clone();
                    extended.push(neighbor);
                    queue.push_back(extended);
                }
            }
        }
        None
    }

    /// Estadísticas agregadas del dispositivo completo.
    #[must_use]
    pub fn statistics(&self) -> DeviceGraphStatistics {
        DeviceGraphStatistics {
            tiles: self.tile_graphs.len(),
            total_routing_nodes: self.tile_graphs.values().map(TileRoutingGraph::node_count).sum(),
            total_routing_edges: self.tile_graphs.values().map(TileRoutingGraph::edge_count).sum(),
        }
    }
}
