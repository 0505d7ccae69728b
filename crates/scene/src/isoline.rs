use foundation::math::Vec3;

/// A closed loop of great-circle arcs on the unit sphere.
///
/// Edge `i` joins `points[i - 1 mod n]` to `points[i]`. Points are expected
/// to be unit length; nothing here enforces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Isoline {
    pub height: i64,
    pub group: String,
    pub name: String,
    pub points: Vec<Vec3>,
}

impl Isoline {
    pub fn new(
        height: i64,
        group: impl Into<String>,
        name: impl Into<String>,
        points: Vec<Vec3>,
    ) -> Self {
        Self {
            height,
            group: group.into(),
            name: name.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `i`, wrapping around the loop (negative indices allowed).
    pub fn point_wrapped(&self, i: isize) -> Vec3 {
        let n = self.points.len() as isize;
        self.points[i.rem_euclid(n) as usize]
    }

    /// Directed edges `(points[i-1], points[i])` for every `i`.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[(i + n - 1) % n], self.points[i]))
    }
}

/// Node address: `row` is the isoline, `column` the point within it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex {
    pub row: usize,
    pub column: usize,
}

impl NodeIndex {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Everything drawn on the sphere: a background texture reference and the
/// isolines over it. Loaded once and replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IsolineSet {
    pub background: String,
    pub isolines: Vec<Isoline>,
}

impl IsolineSet {
    pub fn new(background: impl Into<String>, isolines: Vec<Isoline>) -> Self {
        Self {
            background: background.into(),
            isolines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.isolines.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.isolines.iter().map(Isoline::len).sum()
    }

    pub fn node(&self, index: NodeIndex) -> Option<Vec3> {
        self.isolines.get(index.row)?.points.get(index.column).copied()
    }

    /// All nodes in row-major order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, Vec3)> + '_ {
        self.isolines.iter().enumerate().flat_map(|(row, iso)| {
            iso.points
                .iter()
                .enumerate()
                .map(move |(column, p)| (NodeIndex::new(row, column), *p))
        })
    }
}
