//! Headless model of the interactive board that drives the layout engine:
//! nodes grow over time, can be split once they are large enough, and the
//! whole set is re-laid out after every add, remove or split.

pub mod node;

use thiserror::Error;

use crate::error::LayoutError;
use crate::layout::{compute_layout, Algorithm, Bounds, LayoutConfig};
use crate::tree::element::Element;

use self::node::{Band, GrowthConfig, GrowthNode};

/// Stable handle for a node on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no node with key {0:?}")]
    UnknownNode(NodeKey),

    #[error("the board has stopped")]
    NotRunning,

    #[error("the board already holds the maximum of {max} nodes")]
    AtCapacity { max: usize },

    #[error("node {key:?} cannot split at height {height:.2}")]
    NotSplittable { key: NodeKey, height: f64 },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Board-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub growth: GrowthConfig,
    pub initial_nodes: usize,
    pub max_nodes: usize,
    /// Layout canvas in grid units
    pub canvas: Bounds,
    pub min_slice_ratio: f64,
    /// World units per grid unit
    pub scale_pos: f64,
    /// Fraction of each cell a node's footprint covers
    pub scale_padding: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            growth: GrowthConfig::default(),
            initial_nodes: 4,
            max_nodes: 64,
            canvas: Bounds::new(400.0, 400.0),
            min_slice_ratio: 0.35,
            scale_pos: 0.02,
            scale_padding: 0.9,
        }
    }
}

/// Where a node sits in world space after a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub key: NodeKey,
    /// Centre of the node's cell
    pub x: f64,
    pub z: f64,
    /// Footprint after padding
    pub scale_x: f64,
    pub scale_z: f64,
    pub band: Band,
}

pub struct Board {
    config: BoardConfig,
    nodes: Vec<(NodeKey, GrowthNode)>,
    next_key: u32,
    running: bool,
    elapsed: f64,
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        let mut board = Self {
            nodes: Vec::with_capacity(config.max_nodes),
            config,
            next_key: 0,
            running: true,
            elapsed: 0.0,
        };
        for _ in 0..board.config.initial_nodes {
            board.insert(GrowthNode::new(&board.config.growth));
        }
        board
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds the board has been running.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Live nodes times elapsed running seconds. Frozen once the board stops,
    /// apart from nodes removed afterwards.
    pub fn score(&self) -> f64 {
        let growth = &self.config.growth;
        let live = self.nodes.iter().filter(|(_, n)| !n.is_dead(growth)).count();
        live as f64 * self.elapsed
    }

    pub fn node(&self, key: NodeKey) -> Option<&GrowthNode> {
        self.nodes.iter().find(|(k, _)| *k == key).map(|(_, n)| n)
    }

    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.iter().map(|(k, _)| *k)
    }

    /// Add a fresh node at the starting height.
    pub fn add_node(&mut self) -> Result<NodeKey, BoardError> {
        self.check_capacity()?;
        Ok(self.insert(GrowthNode::new(&self.config.growth)))
    }

    pub fn remove_node(&mut self, key: NodeKey) -> Result<GrowthNode, BoardError> {
        let pos = self.position(key)?;
        Ok(self.nodes.remove(pos).1)
    }

    /// Grow every node by `dt` seconds. Returns whether the board is still
    /// running; the first node to reach its maximum height stops it.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.running {
            return false;
        }
        let growth = self.config.growth;
        for (_, node) in &mut self.nodes {
            node.grow(dt, &growth);
        }
        self.elapsed += dt;

        if let Some((key, _)) = self.nodes.iter().find(|(_, n)| n.is_dead(&growth)) {
            tracing::info!(
                "Node {:?} reached max height after {:.1}s; board stopped with {} nodes",
                key,
                self.elapsed,
                self.nodes.len()
            );
            self.running = false;
        }
        self.running
    }

    /// Split `key`, keeping `ratio` of its height (clamped to `[0.2, 0.7]`)
    /// and giving the rest to a new node, which is returned.
    pub fn split(&mut self, key: NodeKey, ratio: f64) -> Result<NodeKey, BoardError> {
        if !self.running {
            return Err(BoardError::NotRunning);
        }
        self.check_capacity()?;

        let pos = self.position(key)?;
        let growth = self.config.growth;
        let node = &mut self.nodes[pos].1;
        if !node.can_split(&growth) {
            return Err(BoardError::NotSplittable {
                key,
                height: node.height(),
            });
        }
        let other = node.split(ratio, &growth);
        let new_key = self.insert(other);
        tracing::debug!("Split {:?} into {:?}", key, new_key);
        Ok(new_key)
    }

    /// Lay out every node (uniform weight) and convert the cells into
    /// centred, padded world-space footprints.
    pub fn placements(&self) -> Result<Vec<Placement>, BoardError> {
        let elements: Vec<Element<NodeKey>> = self.nodes.iter().map(|(k, _)| Element::new(*k, 1.0)).collect();
        let layout_config = LayoutConfig {
            algorithm: Algorithm::SliceAndDice,
            min_slice_ratio: self.config.min_slice_ratio,
            ..LayoutConfig::default()
        };
        let rects = compute_layout(&elements, self.config.canvas, &layout_config)?;

        let scale = self.config.scale_pos;
        let padding = self.config.scale_padding;
        let mut placements = Vec::with_capacity(rects.len());
        for rect in rects {
            let full_w = rect.width * scale;
            let full_h = rect.height * scale;
            let band = self
                .node(rect.id)
                .map(|n| n.band(&self.config.growth))
                .ok_or(BoardError::UnknownNode(rect.id))?;
            placements.push(Placement {
                key: rect.id,
                x: rect.x * scale + full_w / 2.0,
                z: rect.y * scale + full_h / 2.0,
                scale_x: full_w * padding,
                scale_z: full_h * padding,
                band,
            });
        }
        Ok(placements)
    }

    fn insert(&mut self, node: GrowthNode) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.nodes.push((key, node));
        key
    }

    fn position(&self, key: NodeKey) -> Result<usize, BoardError> {
        self.nodes
            .iter()
            .position(|(k, _)| *k == key)
            .ok_or(BoardError::UnknownNode(key))
    }

    fn check_capacity(&self) -> Result<(), BoardError> {
        if self.nodes.len() >= self.config.max_nodes {
            return Err(BoardError::AtCapacity {
                max: self.config.max_nodes,
            });
        }
        Ok(())
    }
}
