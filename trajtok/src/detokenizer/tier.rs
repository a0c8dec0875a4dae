//! Resolution tiers and per-run accounting.

use std::fmt;
use std::ops::AddAssign;

use crate::geo::Point;

/// Strategy that produced a reconstructed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Geometric centre of the grid cell.
    HexCentroid,
    /// Centroid of historically observed points in the cell.
    DataCentroid,
    /// Mean of the observed cluster matching the approach bearing.
    ClusterCentroid,
}

impl Tier {
    /// Tiers that can anchor a point, most specific first.
    ///
    /// The first tier yielding a point wins; [`Tier::HexCentroid`] always does.
    pub const ANCHORS: [Tier; 2] = [Tier::DataCentroid, Tier::HexCentroid];

    /// Tiers that refine an anchor, tried in order.
    pub const REFINEMENTS: [Tier; 1] = [Tier::ClusterCentroid];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::HexCentroid => "hex_centroid",
            Tier::DataCentroid => "data_centroid",
            Tier::ClusterCentroid => "cluster_centroid",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many points each tier produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub hex: usize,
    pub data: usize,
    pub cluster: usize,
}

impl TierCounts {
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::HexCentroid => self.hex += 1,
            Tier::DataCentroid => self.data += 1,
            Tier::ClusterCentroid => self.cluster += 1,
        }
    }

    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::HexCentroid => self.hex,
            Tier::DataCentroid => self.data,
            Tier::ClusterCentroid => self.cluster,
        }
    }

    pub fn total(&self) -> usize {
        self.hex + self.data + self.cluster
    }
}

impl AddAssign for TierCounts {
    fn add_assign(&mut self, other: Self) {
        self.hex += other.hex;
        self.data += other.data;
        self.cluster += other.cluster;
    }
}

/// Output of detokenizing one token sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detokenized {
    /// Reconstructed points, rounded to the configured precision.
    pub points: Vec<Point>,
    /// Structurally invalid tokens skipped.
    pub dropped: usize,
    /// Which tier produced each point.
    pub tiers: TierCounts,
}

impl Detokenized {
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// `true` if every input token produced a point.
    pub fn is_complete(&self) -> bool {
        self.dropped == 0
    }
}

impl fmt::Display for Detokenized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points ({} hex, {} data, {} cluster), {} dropped",
            self.points.len(),
            self.tiers.hex,
            self.tiers.data,
            self.tiers.cluster,
            self.dropped
        )
    }
}
