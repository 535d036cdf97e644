use std::f64::consts::FRAC_PI_2;

use eframe::egui::Color32;

use crate::color::{ColorScale, fraction, shade};
use crate::data::grid::Grid;

// ---------------------------------------------------------------------------
// 3D points and camera
// ---------------------------------------------------------------------------

/// A point in the normalised plot cube, every axis in `[-0.5, 0.5]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }
}

const MIN_ZOOM: f64 = 0.25;
const MAX_ZOOM: f64 = 6.0;
/// Keeps the camera off the poles where the up vector degenerates.
const MAX_ELEVATION: f64 = FRAC_PI_2 - 0.01;

/// Orbit camera looking at the cube centre, orthographic projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub azimuth: f64,
    pub elevation: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        // azim = -60°, elev = 30°
        Camera {
            azimuth: -60f64.to_radians(),
            elevation: 30f64.to_radians(),
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Screen coordinates, y pointing up, before zoom and viewport scaling.
    pub fn project(&self, p: Point3) -> (f64, f64) {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        let sx = -p.x * sa + p.y * ca;
        let sy = -p.x * ca * se - p.y * sa * se + p.z * ce;
        (sx, sy)
    }

    /// Distance along the view direction; larger is further away.
    pub fn depth(&self, p: Point3) -> f64 {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        -(p.x * ce * ca + p.y * ce * sa + p.z * se)
    }

    pub fn rotate(&mut self, d_azimuth: f64, d_elevation: f64) {
        self.azimuth = (self.azimuth + d_azimuth).rem_euclid(std::f64::consts::TAU);
        self.elevation = (self.elevation + d_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }
}

// ---------------------------------------------------------------------------
// Surface: grid → triangles
// ---------------------------------------------------------------------------

/// One projected-ready triangle of the surface.
#[derive(Debug, Clone, Copy)]
pub struct Facet {
    pub corners: [Point3; 3],
    pub color: Color32,
    pub depth: f64,
}

#[derive(Debug, Clone, Copy)]
struct Triangle {
    corners: [Point3; 3],
    /// Mean raw z of the corners, for colouring.
    z_mean: f64,
}

/// A drawable sample: its place in the cube and its data values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub pos: Point3,
    /// `[x, y, z]` as read from the file.
    pub value: [f64; 3],
}

/// Triangulated surface in the normalised cube.
#[derive(Debug, Clone)]
pub struct Surface {
    triangles: Vec<Triangle>,
    /// Every finite sample, drawn as points when there are no triangles.
    nodes: Vec<Node>,
    pub scale: ColorScale,
    /// Data ranges of the three axes, `(min, max)`.
    pub ranges: [(f64, f64); 3],
}

fn to_unit(v: f64, (lo, hi): (f64, f64)) -> f64 {
    fraction(v, lo, hi) - 0.5
}

/// Extent of the finite values; infinite axis entries are not plotted.
fn finite_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
        .unwrap_or((0.0, 0.0))
}

impl Surface {
    /// Build triangles for every cell whose four corners hold a value.
    /// Cells touching a missing value are left open.
    pub fn from_grid(grid: &Grid) -> Self {
        let xr = finite_range(grid.x_axis());
        let yr = finite_range(grid.y_axis());
        let zr = grid.z_range().unwrap_or((0.0, 0.0));

        let node = |row: usize, col: usize| -> Option<Node> {
            let value = [grid.x_axis()[col], grid.y_axis()[row], grid.z(row, col)];
            value.iter().all(|v| v.is_finite()).then(|| Node {
                pos: Point3::new(
                    to_unit(value[0], xr),
                    to_unit(value[1], yr),
                    to_unit(value[2], zr),
                ),
                value,
            })
        };

        let mut nodes = Vec::new();
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                nodes.extend(node(row, col));
            }
        }

        let mut triangles = Vec::new();
        for row in 0..grid.height().saturating_sub(1) {
            for col in 0..grid.width().saturating_sub(1) {
                let quad = (
                    node(row, col),
                    node(row, col + 1),
                    node(row + 1, col + 1),
                    node(row + 1, col),
                );
                let (Some(a), Some(b), Some(c), Some(d)) = quad else {
                    continue;
                };
                for [p, q, r] in [[a, b, c], [a, c, d]] {
                    triangles.push(Triangle {
                        corners: [p.pos, q.pos, r.pos],
                        z_mean: (p.value[2] + q.value[2] + r.value[2]) / 3.0,
                    });
                }
            }
        }

        Surface {
            triangles,
            nodes,
            scale: ColorScale::new(zr.0, zr.1),
            ranges: [xr, yr, zr],
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Finite samples with their colours, for grids too thin to triangulate.
    pub fn points(&self) -> impl Iterator<Item = (Point3, Color32)> + '_ {
        self.nodes
            .iter()
            .map(|n| (n.pos, self.scale.color_for(n.value[2])))
    }

    /// Sample whose projection is closest to `target` (camera screen
    /// coordinates, before zoom), if any lies within `radius`.
    pub fn nearest(&self, camera: &Camera, target: (f64, f64), radius: f64) -> Option<&Node> {
        self.nodes
            .iter()
            .map(|n| {
                let (sx, sy) = camera.project(n.pos);
                (n, (sx - target.0).powi(2) + (sy - target.1).powi(2))
            })
            .filter(|&(_, d2)| d2 <= radius * radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n)
    }

    /// Shaded facets sorted far to near (painter's algorithm).
    pub fn facets(&self, camera: &Camera) -> Vec<Facet> {
        let mut facets: Vec<Facet> = self
            .triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.corners;
                let depth = (camera.depth(a) + camera.depth(b) + camera.depth(c)) / 3.0;
                let base = self.scale.color_for(t.z_mean);
                Facet {
                    corners: t.corners,
                    color: shade(base, lighting(normal(a, b, c))),
                    depth,
                }
            })
            .collect();
        facets.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        facets
    }
}

fn normal(a: Point3, b: Point3, c: Point3) -> [f64; 3] {
    let (ux, uy, uz) = (b.x - a.x, b.y - a.y, b.z - a.z);
    let (vx, vy, vz) = (c.x - a.x, c.y - a.y, c.z - a.z);
    let n = [uy * vz - uz * vy, uz * vx - ux * vz, ux * vy - uy * vx];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len < 1e-15 {
        [0.0, 0.0, 1.0]
    } else {
        [n[0] / len, n[1] / len, n[2] / len]
    }
}

/// Ambient + two-sided diffuse intensity for a unit normal.
fn lighting(n: [f64; 3]) -> f64 {
    const LIGHT: [f64; 3] = [0.4, -0.5, 0.76];
    const AMBIENT: f64 = 0.45;
    let len = (LIGHT[0] * LIGHT[0] + LIGHT[1] * LIGHT[1] + LIGHT[2] * LIGHT[2]).sqrt();
    let dot = (n[0] * LIGHT[0] + n[1] * LIGHT[1] + n[2] * LIGHT[2]) / len;
    AMBIENT + (1.0 - AMBIENT) * dot.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::grid::build_grid;
    use crate::data::model::ColumnSelection;
    use csv::StringRecord;

    fn grid(data: &[[&str; 3]]) -> Grid {
        let rows: Vec<StringRecord> = data
            .iter()
            .map(|r| StringRecord::from(r.to_vec()))
            .collect();
        build_grid(&rows, ColumnSelection { x: 0, y: 1, z: 2 })
            .unwrap()
            .grid
    }

    #[test]
    fn test_full_grid_triangulates_every_cell() {
        // 3x2 grid → 2 cells → 4 triangles
        let g = grid(&[
            ["0", "0", "1"],
            ["1", "0", "2"],
            ["2", "0", "3"],
            ["0", "1", "4"],
            ["1", "1", "5"],
            ["2", "1", "6"],
        ]);
        let surface = Surface::from_grid(&g);
        assert_eq!(surface.triangle_count(), 4);
        assert_eq!(surface.points().count(), 6);
        assert_eq!(surface.ranges[2], (1.0, 6.0));
    }

    #[test]
    fn test_missing_corner_leaves_hole() {
        // (1,1) missing → the only cell is open
        let g = grid(&[["0", "0", "1"], ["1", "0", "2"], ["0", "1", "3"]]);
        let surface = Surface::from_grid(&g);
        assert_eq!(surface.triangle_count(), 0);
        assert_eq!(surface.points().count(), 3);
    }

    #[test]
    fn test_single_row_has_only_points() {
        let g = grid(&[["0", "0", "1"], ["1", "0", "2"]]);
        let surface = Surface::from_grid(&g);
        assert_eq!(surface.triangle_count(), 0);
        let ys: Vec<f64> = surface.points().map(|(p, _)| p.y).collect();
        assert_eq!(ys, vec![0.0, 0.0]);
    }

    #[test]
    fn test_points_normalised_to_unit_cube() {
        let g = grid(&[["10", "-5", "0"], ["20", "5", "100"]]);
        let surface = Surface::from_grid(&g);
        for (p, _) in surface.points() {
            for v in [p.x, p.y, p.z] {
                assert!((-0.5..=0.5).contains(&v));
            }
        }
    }

    #[test]
    fn test_facets_sorted_far_to_near() {
        let g = grid(&[
            ["0", "0", "0"],
            ["1", "0", "1"],
            ["2", "0", "0"],
            ["0", "1", "1"],
            ["1", "1", "2"],
            ["2", "1", "1"],
            ["0", "2", "0"],
            ["1", "2", "1"],
            ["2", "2", "0"],
        ]);
        let surface = Surface::from_grid(&g);
        let facets = surface.facets(&Camera::default());
        assert_eq!(facets.len(), 8);
        assert!(facets.windows(2).all(|w| w[0].depth >= w[1].depth));
    }

    #[test]
    fn test_camera_clamps() {
        let mut cam = Camera::default();
        cam.rotate(0.0, 10.0);
        assert!(cam.elevation < FRAC_PI_2);
        cam.zoom_by(100.0);
        assert_eq!(cam.zoom, MAX_ZOOM);
        cam.zoom_by(0.0);
        assert_eq!(cam.zoom, MAX_ZOOM);
        cam.zoom_by(1e-6);
        assert_eq!(cam.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_side_view_projection_keeps_x_and_z() {
        let cam = Camera {
            azimuth: -FRAC_PI_2,
            elevation: 0.0,
            zoom: 1.0,
        };
        let (sx, sy) = cam.project(Point3::new(0.5, 0.0, 0.25));
        assert!((sx - 0.5).abs() < 1e-12);
        assert!((sy - 0.25).abs() < 1e-12);
    }

    fn all_finite(p: Point3) -> bool {
        p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
    }

    #[test]
    fn test_infinite_axis_entry_is_not_drawn() {
        let g = grid(&[
            ["0", "0", "1"],
            ["1", "0", "2"],
            ["inf", "0", "3"],
            ["0", "1", "4"],
            ["1", "1", "5"],
            ["inf", "1", "6"],
        ]);
        assert_eq!(g.width(), 3);
        let surface = Surface::from_grid(&g);
        assert_eq!(surface.ranges[0], (0.0, 1.0));
        assert_eq!(surface.points().count(), 4);
        assert!(surface.points().all(|(p, _)| all_finite(p)));
        // Only the finite 0..1 cell is closed.
        let facets = surface.facets(&Camera::default());
        assert_eq!(facets.len(), 2);
        assert!(facets.iter().all(|f| f.corners.iter().all(|&c| all_finite(c))));
    }

    #[test]
    fn test_overflowing_axis_span() {
        let g = grid(&[
            ["-1e308", "0", "1"],
            ["0", "0", "2"],
            ["1e308", "0", "3"],
            ["-1e308", "1", "4"],
            ["0", "1", "5"],
            ["1e308", "1", "6"],
        ]);
        let surface = Surface::from_grid(&g);
        let xs: Vec<f64> = surface.points().map(|(p, _)| p.x).collect();
        assert_eq!(xs, vec![-0.5, 0.0, 0.5, -0.5, 0.0, 0.5]);
        let facets = surface.facets(&Camera::default());
        assert_eq!(facets.len(), 4);
        assert!(facets.iter().all(|f| f.corners.iter().all(|&c| all_finite(c))));
    }

    #[test]
    fn test_tiny_axis_values_stay_apart() {
        let g = grid(&[
            ["1e-17", "0", "1"],
            ["2e-17", "0", "2"],
            ["3e-17", "0", "3"],
        ]);
        let surface = Surface::from_grid(&g);
        let xs: Vec<f64> = surface.points().map(|(p, _)| p.x).collect();
        assert_eq!(xs.len(), 3);
        assert_eq!(xs[0], -0.5);
        assert!(xs[1].abs() < 1e-9);
        assert_eq!(xs[2], 0.5);
    }

    #[test]
    fn test_nearest_node() {
        let g = grid(&[["0", "0", "1"], ["1", "0", "2"], ["0", "1", "3"], ["1", "1", "4"]]);
        let surface = Surface::from_grid(&g);
        let cam = Camera::default();
        let target = cam.project(Point3::new(0.5, 0.5, 0.5));
        let node = surface.nearest(&cam, target, 0.05).unwrap();
        assert_eq!(node.value, [1.0, 1.0, 4.0]);
        assert!(surface.nearest(&cam, (5.0, 5.0), 0.05).is_none());
    }
}
