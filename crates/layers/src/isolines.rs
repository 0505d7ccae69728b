use foundation::math::subdivide;
use scene::IsolineSet;

/// Vertex of a tessellated isoline loop, laid out for upload as-is.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IsolineVertex {
    pub position: [f32; 3],
    pub height: f32,
    /// Isoline index, so a shader can highlight one loop.
    pub row: u32,
}

/// Closed line loops with 4-index line adjacency per segment
/// (`prev, start, end, next`).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IsolineMesh {
    pub vertices: Vec<IsolineVertex>,
    pub indices: Vec<u32>,
}

impl IsolineMesh {
    pub fn segment_count(&self) -> usize {
        self.indices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Subdivide every edge of every isoline at `resolution` radians and emit
/// one closed adjacency loop per isoline.
///
/// A loop starts on the closing edge, so its first vertex is the isoline's
/// last point. Isolines with fewer than two points produce no segments.
pub fn tessellate(set: &IsolineSet, resolution: f64) -> IsolineMesh {
    let mut out = IsolineMesh::default();

    for (row, isoline) in set.isolines.iter().enumerate() {
        if isoline.len() < 2 {
            continue;
        }

        let ring: Vec<_> = isoline
            .edges()
            .flat_map(|(a, b)| subdivide(a, b, resolution))
            .collect();

        let base = out.vertices.len() as u32;
        let height = isoline.height as f32;
        out.vertices.extend(ring.iter().map(|p| IsolineVertex {
            position: p.to_f32(),
            height,
            row: row as u32,
        }));

        let m = ring.len();
        for j in 0..m {
            for k in [m - 1, 0, 1, 2] {
                out.indices.push(base + ((j + k) % m) as u32);
            }
        }
    }

    out
}
