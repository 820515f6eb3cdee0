/// Growth and colour-band thresholds for board nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthConfig {
    /// Height of a freshly added node
    pub start_height: f64,
    /// Heights are clamped here; reaching it kills the node
    pub max_height: f64,
    pub green: f64,
    pub yellow: f64,
    pub orange: f64,
    pub red: f64,
    /// Height gained per second while the board runs
    pub growth_rate: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            start_height: 0.15,
            max_height: 4.0,
            green: 0.5,
            yellow: 1.5,
            orange: 2.5,
            red: 3.75,
            growth_rate: 0.1,
        }
    }
}

impl GrowthConfig {
    pub fn band(&self, height: f64) -> Band {
        if height < self.green {
            Band::Blue
        } else if height < self.yellow {
            Band::Green
        } else if height < self.orange {
            Band::Yellow
        } else if height < self.red {
            Band::Orange
        } else if height < self.max_height {
            Band::Red
        } else {
            Band::Dead
        }
    }
}

/// Colour band a node's height falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Dead,
}

/// A growing item on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthNode {
    height: f64,
}

impl GrowthNode {
    pub fn new(config: &GrowthConfig) -> Self {
        let mut node = Self { height: 0.0 };
        node.set_height(config.start_height, config);
        node
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_height(&mut self, height: f64, config: &GrowthConfig) {
        self.height = height.min(config.max_height);
    }

    pub fn grow(&mut self, dt: f64, config: &GrowthConfig) {
        self.set_height(self.height + config.growth_rate * dt, config);
    }

    pub fn band(&self, config: &GrowthConfig) -> Band {
        config.band(self.height)
    }

    pub fn is_dead(&self, config: &GrowthConfig) -> bool {
        self.band(config) == Band::Dead
    }

    /// Only nodes past the yellow threshold that are still alive can split.
    pub fn can_split(&self, config: &GrowthConfig) -> bool {
        self.height > config.yellow && self.height < config.max_height
    }

    /// Split off a new node. `ratio` (clamped to `[0.2, 0.7]`) is the share of
    /// the height this node keeps; the returned node gets the rest.
    pub fn split(&mut self, ratio: f64, config: &GrowthConfig) -> GrowthNode {
        let ratio = ratio.clamp(0.2, 0.7);
        let height = self.height;
        self.set_height(height * ratio, config);
        let mut other = *self;
        other.set_height(height * (1.0 - ratio), config);
        other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_thresholds() {
        let config = GrowthConfig::default();
        let cases = [
            (0.15, Band::Blue),
            (0.5, Band::Green),
            (1.49, Band::Green),
            (1.5, Band::Yellow),
            (2.5, Band::Orange),
            (3.75, Band::Red),
            (3.99, Band::Red),
            (4.0, Band::Dead),
        ];
        for (height, band) in cases {
            assert_eq!(config.band(height), band, "height {height}");
        }
    }

    #[test]
    fn height_is_clamped_to_max() {
        let config = GrowthConfig::default();
        let mut node = GrowthNode::new(&config);
        node.grow(1_000.0, &config);
        assert_eq!(node.height(), 4.0);
        assert!(node.is_dead(&config));
        assert!(!node.can_split(&config));
    }

    #[test]
    fn split_divides_height() {
        let config = GrowthConfig::default();
        let mut node = GrowthNode::new(&config);
        node.set_height(2.0, &config);
        assert!(node.can_split(&config));

        let other = node.split(0.25, &config);
        assert!((node.height() - 0.5).abs() < 1e-12);
        assert!((other.height() - 1.5).abs() < 1e-12);

        // ratio is clamped
        let mut node = GrowthNode::new(&config);
        node.set_height(2.0, &config);
        let other = node.split(0.95, &config);
        assert!((node.height() - 1.4).abs() < 1e-12);
        assert!((other.height() - 0.6).abs() < 1e-12);
    }
}
