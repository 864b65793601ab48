//! Barnes-Hut quadtree for the many-body force.
//!
//! Cells are square. A leaf holds one point, or several points that share a position (or that
//! could not be separated within `MAX_DEPTH` subdivisions). Every cell stores the number of
//! points below it and their centroid.

const MAX_DEPTH: usize = 48;

#[derive(Debug, Clone)]
pub(super) struct Quad {
    /// Side length of the cell.
    pub width: f64,
    /// Centroid of the points below this cell.
    pub x: f64,
    pub y: f64,
    pub count: usize,
    pub children: Vec<usize>,
    /// Point indices; only set on leaves.
    pub points: Vec<usize>,
}

impl Quad {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub(super) struct QuadTree {
    pub quads: Vec<Quad>,
}

impl QuadTree {
    pub const ROOT: usize = 0;

    pub fn build(points: &[(f64, f64)]) -> Option<Self> {
        let (&(x0, y0), rest) = points.split_first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for &(x, y) in rest {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        let width = (max_x - min_x).max(max_y - min_y);

        let mut tree = Self {
            quads: Vec::with_capacity(points.len() * 2),
        };
        tree.insert(points, (0..points.len()).collect(), min_x, min_y, width, 0);
        Some(tree)
    }

    fn insert(
        &mut self,
        points: &[(f64, f64)],
        members: Vec<usize>,
        x0: f64,
        y0: f64,
        width: f64,
        depth: usize,
    ) -> usize {
        let count = members.len();
        let (sx, sy) = members
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &i| (sx + points[i].0, sy + points[i].1));
        let id = self.quads.len();
        self.quads.push(Quad {
            width,
            x: sx / count as f64,
            y: sy / count as f64,
            count,
            children: Vec::new(),
            points: Vec::new(),
        });

        let first = points[members[0]];
        let coincident = members.iter().all(|&i| points[i] == first);
        if count == 1 || coincident || depth >= MAX_DEPTH || width <= 0.0 {
            self.quads[id].points = members;
            return id;
        }

        let half = width / 2.0;
        let mut buckets: [Vec<usize>; 4] = Default::default();
        for i in members {
            let (x, y) = points[i];
            let right = usize::from(x >= x0 + half);
            let below = usize::from(y >= y0 + half);
            buckets[below * 2 + right].push(i);
        }
        let mut children = Vec::with_capacity(4);
        for (b, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let cx = x0 + (b & 1) as f64 * half;
            let cy = y0 + (b >> 1) as f64 * half;
            children.push(self.insert(points, bucket, cx, cy, half, depth + 1));
        }
        self.quads[id].children = children;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::QuadTree;

    #[test]
    fn cells_aggregate_count_and_centroid() {
        let pts = [(0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 4.0)];
        let tree = QuadTree::build(&pts).unwrap();
        let root = &tree.quads[QuadTree::ROOT];
        assert_eq!(root.count, 5);
        assert_eq!(root.width, 4.0);
        assert!((root.x - 2.4).abs() < 1e-12);
        assert_eq!(root.children.len(), 4);

        let stacked = tree
            .quads
            .iter()
            .find(|q| q.is_leaf() && q.count == 2)
            .unwrap();
        assert_eq!(stacked.points, vec![3, 4]);
        let leaves: usize = tree.quads.iter().filter(|q| q.is_leaf()).map(|q| q.count).sum();
        assert_eq!(leaves, 5);
    }

    #[test]
    fn empty_input_has_no_tree() {
        assert!(QuadTree::build(&[]).is_none());
    }
}
