use crate::float_types::Real;
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::Point3;

const QUANTIZATION_FACTOR: Real = 1e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct QuantizedPoint(i64, i64, i64);

fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
    QuantizedPoint(
        (p.x * QUANTIZATION_FACTOR).round() as i64,
        (p.y * QUANTIZATION_FACTOR).round() as i64,
        (p.z * QUANTIZATION_FACTOR).round() as i64,
    )
}

impl<S: Clone> Mesh<S> {
    /// Checks if the Mesh object is manifold
    ///
    /// ### Returns
    /// Returns `true` if every edge of the triangulated surface appears exactly 2 times
    ///
    /// ### Notes:
    /// - Vertices are compared after quantizing by `QUANTIZATION_FACTOR`.
    /// - A vertex lying in the middle of a neighbour's edge (a T-junction)
    ///   makes this fail; see [`is_watertight`](Self::is_watertight).
    pub fn is_manifold(&self) -> bool {
        // Triangulate the whole shape once
        let tri_mesh = self.triangulate();
        let mut edge_counts: HashMap<(QuantizedPoint, QuantizedPoint), u32> = HashMap::new();

        for poly in &tri_mesh.polygons {
            for &(i0, i1) in &[(0, 1), (1, 2), (2, 0)] {
                let p0 = quantize_point(&poly.vertices[i0].pos);
                let p1 = quantize_point(&poly.vertices[i1].pos);

                // Order them so (p0, p1) and (p1, p0) become the same key
                let key = if p0 < p1 { (p0, p1) } else { (p1, p0) };
                *edge_counts.entry(key).or_insert(0) += 1;
            }
        }

        !edge_counts.is_empty() && edge_counts.values().all(|&count| count == 2)
    }

    /// `true` when the surface is closed and consistently oriented,
    /// tolerating T-junctions.
    ///
    /// Vertices closer than `tolerance` are welded. Each directed polygon
    /// edge is then cut at every welded vertex lying on it, and every
    /// resulting directed sub-edge must be matched by as many sub-edges
    /// running the opposite way.
    ///
    /// Cost is `O(edges × vertices)`; meant for validation, not hot paths.
    pub fn is_watertight(&self, tolerance: Real) -> bool {
        if self.polygons.is_empty() {
            return false;
        }

        let mut welded: Vec<Point3<Real>> = Vec::new();
        let mut cells: HashMap<QuantizedPoint, Vec<u32>> = HashMap::new();
        let cell_size = tolerance.max(Real::EPSILON);

        let mut weld = |p: &Point3<Real>| -> u32 {
            let cell = QuantizedPoint(
                (p.x / cell_size).floor() as i64,
                (p.y / cell_size).floor() as i64,
                (p.z / cell_size).floor() as i64,
            );
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let neighbour = QuantizedPoint(cell.0 + dx, cell.1 + dy, cell.2 + dz);
                        if let Some(ids) = cells.get(&neighbour) {
                            if let Some(&id) = ids
                                .iter()
                                .find(|&&id| (welded[id as usize] - p).norm() <= tolerance)
                            {
                                return id;
                            }
                        }
                    }
                }
            }
            let id = welded.len() as u32;
            welded.push(*p);
            cells.entry(cell).or_default().push(id);
            id
        };

        let loops: Vec<Vec<u32>> = self
            .polygons
            .iter()
            .map(|poly| poly.vertices.iter().map(|v| weld(&v.pos)).collect())
            .collect();

        let mut balance: HashMap<(u32, u32), i64> = HashMap::new();
        for ids in &loops {
            for (k, &start) in ids.iter().enumerate() {
                let end = ids[(k + 1) % ids.len()];
                if start == end {
                    continue;
                }
                let mut cuts = self.interior_points(&welded, start, end, tolerance);
                cuts.push((1.0, end));
                let mut from = start;
                for (_, to) in cuts {
                    if to != from {
                        *balance.entry((from, to)).or_insert(0) += 1;
                        *balance.entry((to, from)).or_insert(0) -= 1;
                    }
                    from = to;
                }
            }
        }

        balance.values().all(|&count| count == 0)
    }

    /// Welded vertices strictly inside segment `start → end`, sorted by
    /// their parameter along it.
    fn interior_points(
        &self,
        welded: &[Point3<Real>],
        start: u32,
        end: u32,
        tolerance: Real,
    ) -> Vec<(Real, u32)> {
        let a = welded[start as usize];
        let b = welded[end as usize];
        let direction = b - a;
        let length_sq = direction.norm_squared();
        if length_sq <= tolerance * tolerance {
            return Vec::new();
        }

        let mut cuts: Vec<(Real, u32)> = welded
            .iter()
            .enumerate()
            .filter(|&(id, _)| id as u32 != start && id as u32 != end)
            .filter_map(|(id, p)| {
                let t = (p - a).dot(&direction) / length_sq;
                if t <= 0.0 || t >= 1.0 {
                    return None;
                }
                let closest = a + direction * t;
                ((p - closest).norm() <= tolerance).then_some((t, id as u32))
            })
            .collect();
        cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
        cuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::polygon::Polygon;
    use crate::mesh::vertex::Vertex;
    use nalgebra::Vector3;

    fn quad(points: [[Real; 3]; 4]) -> Polygon<()> {
        Polygon::new(
            points
                .iter()
                .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::zeros()))
                .collect(),
            None,
        )
        .expect("valid quad")
    }

    #[test]
    fn cube_is_closed() {
        let cube: Mesh<()> = Mesh::cube(1.0, None);
        assert!(cube.is_manifold());
        assert!(cube.is_watertight(1e-6));
    }

    #[test]
    fn open_box_is_not_closed() {
        let mut cube: Mesh<()> = Mesh::cube(1.0, None);
        cube.polygons.pop();
        assert!(!cube.is_manifold());
        assert!(!cube.is_watertight(1e-6));
    }

    #[test]
    fn t_junction_is_watertight_but_not_manifold() {
        // unit cube whose top face is split in two along x = 0.5
        let mut cube: Mesh<()> = Mesh::cube(1.0, None);
        cube.polygons.remove(1);
        cube.polygons.push(quad([
            [0.0, 0.0, 1.0],
            [0.5, 0.0, 1.0],
            [0.5, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ]));
        cube.polygons.push(quad([
            [0.5, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.5, 1.0, 1.0],
        ]));
        assert!(!cube.is_manifold());
        assert!(cube.is_watertight(1e-6));
    }
}
