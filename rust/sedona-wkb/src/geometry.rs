// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
//! Simple feature geometry model
//!
//! A closed, owned geometry graph covering the 13 concrete WKB geometry
//! kinds. Every non-point geometry records its own Z and M flags, which are
//! what the codec writes into type codes; points carry optional Z and M
//! ordinates. Abstract types (Geometry, Curve, Surface) have no values.

use geo_traits::Dimensions;

use crate::types::GeometryType;

/// Access to the Z/M flags of a geometry
pub trait Dimensional {
    fn has_z(&self) -> bool;

    fn has_m(&self) -> bool;

    /// The [Dimensions] implied by the Z and M flags
    fn dimensions(&self) -> Dimensions {
        dimensions_of(self.has_z(), self.has_m())
    }
}

/// Map a pair of Z/M flags onto [Dimensions]
pub fn dimensions_of(has_z: bool, has_m: bool) -> Dimensions {
    match (has_z, has_m) {
        (false, false) => Dimensions::Xy,
        (true, false) => Dimensions::Xyz,
        (false, true) => Dimensions::Xym,
        (true, true) => Dimensions::Xyzm,
    }
}

/// A single position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    pub fn new_z(x: f64, y: f64, z: f64) -> Self {
        Self {
            z: Some(z),
            ..Self::new(x, y)
        }
    }

    pub fn new_m(x: f64, y: f64, m: f64) -> Self {
        Self {
            m: Some(m),
            ..Self::new(x, y)
        }
    }

    pub fn new_zm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: Some(m),
        }
    }
}

impl Dimensional for Point {
    fn has_z(&self) -> bool {
        self.z.is_some()
    }

    fn has_m(&self) -> bool {
        self.m.is_some()
    }
}

// Defines a geometry holding an ordered list of children plus its own Z/M
// flags. `from_*` constructors take the flags from the children.
macro_rules! define_container {
    (
        $(#[$meta:meta])*
        $name:ident { $field:ident: $child:ty },
        $from:ident, $add:ident, $count:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            pub has_z: bool,
            pub has_m: bool,
            pub $field: Vec<$child>,
        }

        impl $name {
            pub fn new(has_z: bool, has_m: bool) -> Self {
                Self {
                    has_z,
                    has_m,
                    $field: Vec::new(),
                }
            }

            pub fn $from($field: Vec<$child>) -> Self {
                Self {
                    has_z: $field.iter().any(|child| child.has_z()),
                    has_m: $field.iter().any(|child| child.has_m()),
                    $field,
                }
            }

            pub fn $add(&mut self, child: $child) {
                self.$field.push(child);
            }

            pub fn $count(&self) -> usize {
                self.$field.len()
            }
        }

        impl Dimensional for $name {
            fn has_z(&self) -> bool {
                self.has_z
            }

            fn has_m(&self) -> bool {
                self.has_m
            }
        }
    };
}

define_container!(
    /// Sequence of points joined by straight segments
    LineString { points: Point },
    from_points, add_point, num_points
);

define_container!(
    /// Sequence of points joined by circular arcs (three points per arc,
    /// consecutive arcs share an endpoint)
    CircularString { points: Point },
    from_points, add_point, num_points
);

define_container!(
    /// Exterior ring followed by zero or more interior rings
    Polygon { rings: LineString },
    from_rings, add_ring, num_rings
);

define_container!(
    /// Polygon with a single three-segment exterior ring
    Triangle { rings: LineString },
    from_rings, add_ring, num_rings
);

define_container!(MultiPoint { points: Point }, from_points, add_point, num_points);

define_container!(
    MultiLineString { line_strings: LineString },
    from_line_strings, add_line_string, num_line_strings
);

define_container!(
    MultiPolygon { polygons: Polygon },
    from_polygons, add_polygon, num_polygons
);

define_container!(
    /// Contiguous collection of polygon patches sharing edges
    PolyhedralSurface { polygons: Polygon },
    from_polygons, add_polygon, num_polygons
);

define_container!(
    /// Triangulated irregular network
    Tin { triangles: Triangle },
    from_triangles, add_triangle, num_triangles
);

define_container!(
    /// Sequence of curves where each segment starts at the end of the previous one
    CompoundCurve { segments: Curve },
    from_segments, add_segment, num_segments
);

define_container!(
    /// Polygon whose rings may be arbitrary closed curves
    CurvePolygon { rings: Curve },
    from_rings, add_ring, num_rings
);

impl LineString {
    pub fn start_point(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn end_point(&self) -> Option<&Point> {
        self.points.last()
    }
}

impl Polygon {
    pub fn exterior(&self) -> Option<&LineString> {
        self.rings.first()
    }
}

/// One-dimensional geometries that may appear as compound curve segments or
/// curve polygon rings
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    LineString(LineString),
    CircularString(CircularString),
    CompoundCurve(CompoundCurve),
}

impl Curve {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::LineString(_) => GeometryType::LineString,
            Self::CircularString(_) => GeometryType::CircularString,
            Self::CompoundCurve(_) => GeometryType::CompoundCurve,
        }
    }
}

impl Dimensional for Curve {
    fn has_z(&self) -> bool {
        match self {
            Self::LineString(g) => g.has_z,
            Self::CircularString(g) => g.has_z,
            Self::CompoundCurve(g) => g.has_z,
        }
    }

    fn has_m(&self) -> bool {
        match self {
            Self::LineString(g) => g.has_m,
            Self::CircularString(g) => g.has_m,
            Self::CompoundCurve(g) => g.has_m,
        }
    }
}

/// Which collection type code a [GeometryCollection] is written with
///
/// MultiCurve and MultiSurface share the generic collection layout. Decoding
/// always produces [CollectionKind::GeometryCollection]; the other kinds
/// exist so that callers can write those type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectionKind {
    #[default]
    GeometryCollection,
    MultiCurve,
    MultiSurface,
}

impl CollectionKind {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::GeometryCollection => GeometryType::GeometryCollection,
            Self::MultiCurve => GeometryType::MultiCurve,
            Self::MultiSurface => GeometryType::MultiSurface,
        }
    }
}

/// Heterogeneous ordered collection of geometries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryCollection {
    pub has_z: bool,
    pub has_m: bool,
    pub kind: CollectionKind,
    pub geometries: Vec<Geometry>,
}

impl GeometryCollection {
    pub fn new(has_z: bool, has_m: bool) -> Self {
        Self {
            has_z,
            has_m,
            kind: CollectionKind::GeometryCollection,
            geometries: Vec::new(),
        }
    }

    pub fn from_geometries(geometries: Vec<Geometry>) -> Self {
        Self {
            has_z: geometries.iter().any(|child| child.has_z()),
            has_m: geometries.iter().any(|child| child.has_m()),
            kind: CollectionKind::GeometryCollection,
            geometries,
        }
    }

    /// Return this collection tagged with a different collection type code
    pub fn with_kind(self, kind: CollectionKind) -> Self {
        Self { kind, ..self }
    }

    pub fn add_geometry(&mut self, geometry: Geometry) {
        self.geometries.push(geometry);
    }

    pub fn num_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// True when every child is a curve (LineString, CircularString, CompoundCurve)
    pub fn is_multi_curve(&self) -> bool {
        self.geometries.iter().all(|geometry| {
            matches!(
                geometry,
                Geometry::LineString(_) | Geometry::CircularString(_) | Geometry::CompoundCurve(_)
            )
        })
    }

    /// True when every child is a surface (Polygon, CurvePolygon, Triangle,
    /// PolyhedralSurface, Tin)
    pub fn is_multi_surface(&self) -> bool {
        self.geometries.iter().all(|geometry| {
            matches!(
                geometry,
                Geometry::Polygon(_)
                    | Geometry::CurvePolygon(_)
                    | Geometry::Triangle(_)
                    | Geometry::PolyhedralSurface(_)
                    | Geometry::Tin(_)
            )
        })
    }
}

impl Dimensional for GeometryCollection {
    fn has_z(&self) -> bool {
        self.has_z
    }

    fn has_m(&self) -> bool {
        self.has_m
    }
}

/// Any concrete geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
    CircularString(CircularString),
    CompoundCurve(CompoundCurve),
    CurvePolygon(CurvePolygon),
    PolyhedralSurface(PolyhedralSurface),
    Tin(Tin),
    Triangle(Triangle),
}

impl Geometry {
    /// The type this geometry is written as
    ///
    /// For collections this reflects [GeometryCollection::kind].
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point(_) => GeometryType::Point,
            Self::LineString(_) => GeometryType::LineString,
            Self::Polygon(_) => GeometryType::Polygon,
            Self::MultiPoint(_) => GeometryType::MultiPoint,
            Self::MultiLineString(_) => GeometryType::MultiLineString,
            Self::MultiPolygon(_) => GeometryType::MultiPolygon,
            Self::GeometryCollection(g) => g.kind.geometry_type(),
            Self::CircularString(_) => GeometryType::CircularString,
            Self::CompoundCurve(_) => GeometryType::CompoundCurve,
            Self::CurvePolygon(_) => GeometryType::CurvePolygon,
            Self::PolyhedralSurface(_) => GeometryType::PolyhedralSurface,
            Self::Tin(_) => GeometryType::Tin,
            Self::Triangle(_) => GeometryType::Triangle,
        }
    }

    fn as_dimensional(&self) -> &dyn Dimensional {
        match self {
            Self::Point(g) => g,
            Self::LineString(g) => g,
            Self::Polygon(g) => g,
            Self::MultiPoint(g) => g,
            Self::MultiLineString(g) => g,
            Self::MultiPolygon(g) => g,
            Self::GeometryCollection(g) => g,
            Self::CircularString(g) => g,
            Self::CompoundCurve(g) => g,
            Self::CurvePolygon(g) => g,
            Self::PolyhedralSurface(g) => g,
            Self::Tin(g) => g,
            Self::Triangle(g) => g,
        }
    }
}

impl Dimensional for Geometry {
    fn has_z(&self) -> bool {
        self.as_dimensional().has_z()
    }

    fn has_m(&self) -> bool {
        self.as_dimensional().has_m()
    }
}

// Conversions between concrete geometries and [Geometry]. The fallible
// direction hands the geometry back unchanged when the variant does not match.
macro_rules! geometry_conversions {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(value: $variant) -> Self {
                    Geometry::$variant(value)
                }
            }

            impl TryFrom<Geometry> for $variant {
                type Error = Geometry;

                fn try_from(value: Geometry) -> Result<Self, Self::Error> {
                    match value {
                        Geometry::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

geometry_conversions!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    CircularString,
    CompoundCurve,
    CurvePolygon,
    PolyhedralSurface,
    Tin,
    Triangle
);

impl From<Curve> for Geometry {
    fn from(value: Curve) -> Self {
        match value {
            Curve::LineString(g) => Geometry::LineString(g),
            Curve::CircularString(g) => Geometry::CircularString(g),
            Curve::CompoundCurve(g) => Geometry::CompoundCurve(g),
        }
    }
}

impl TryFrom<Geometry> for Curve {
    type Error = Geometry;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::LineString(g) => Ok(Curve::LineString(g)),
            Geometry::CircularString(g) => Ok(Curve::CircularString(g)),
            Geometry::CompoundCurve(g) => Ok(Curve::CompoundCurve(g)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn line(coords: &[(f64, f64)]) -> LineString {
        LineString::from_points(coords.iter().map(|(x, y)| Point::new(*x, *y)).collect())
    }

    #[test]
    fn point_dimensions() {
        assert_eq!(Point::new(1.0, 2.0).dimensions(), Dimensions::Xy);
        assert_eq!(Point::new_z(1.0, 2.0, 3.0).dimensions(), Dimensions::Xyz);
        assert_eq!(Point::new_m(1.0, 2.0, 4.0).dimensions(), Dimensions::Xym);
        assert_eq!(
            Point::new_zm(1.0, 2.0, 3.0, 4.0).dimensions(),
            Dimensions::Xyzm
        );
    }

    #[test]
    fn container_flags_from_children() {
        let line_string = LineString::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new_z(1.0, 1.0, 1.0),
        ]);
        assert!(line_string.has_z);
        assert!(!line_string.has_m);
        assert_eq!(line_string.num_points(), 2);
        assert_eq!(line_string.start_point(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(line_string.end_point(), Some(&Point::new_z(1.0, 1.0, 1.0)));

        // Flags cover every child, so the point without Z cannot be encoded
        let err = crate::writer::write_geometry(&line_string.into()).unwrap_err();
        assert!(matches!(err, crate::error::SedonaWkbError::Invalid(_)));

        let mut multi_point = MultiPoint::new(false, true);
        multi_point.add_point(Point::new_m(0.0, 0.0, 5.0));
        assert_eq!(multi_point.dimensions(), Dimensions::Xym);
    }

    #[test]
    fn collection_kind_drives_geometry_type() {
        let collection = GeometryCollection::from_geometries(vec![line(&[(0.0, 0.0), (1.0, 1.0)])
            .into()]);
        assert_eq!(
            Geometry::from(collection.clone()).geometry_type(),
            GeometryType::GeometryCollection
        );

        let multi_curve = collection.with_kind(CollectionKind::MultiCurve);
        assert_eq!(
            Geometry::from(multi_curve).geometry_type(),
            GeometryType::MultiCurve
        );
    }

    #[test]
    fn collection_multi_curve_and_surface() {
        let ring = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let curves = GeometryCollection::from_geometries(vec![
            ring.clone().into(),
            CircularString::from_points(ring.points.clone()).into(),
        ]);
        assert!(curves.is_multi_curve());
        assert!(!curves.is_multi_surface());

        let surfaces = GeometryCollection::from_geometries(vec![
            Polygon::from_rings(vec![ring.clone()]).into(),
            CurvePolygon::from_rings(vec![Curve::LineString(ring.clone())]).into(),
        ]);
        assert!(surfaces.is_multi_surface());
        assert!(!surfaces.is_multi_curve());

        let mixed = GeometryCollection::from_geometries(vec![
            Point::new(0.0, 0.0).into(),
            ring.into(),
        ]);
        assert!(!mixed.is_multi_curve());
        assert!(!mixed.is_multi_surface());
    }

    #[test]
    fn geometry_conversions() {
        let geometry: Geometry = Point::new(1.0, 2.0).into();
        assert_eq!(geometry.geometry_type(), GeometryType::Point);
        assert_eq!(Point::try_from(geometry.clone()), Ok(Point::new(1.0, 2.0)));
        assert_eq!(LineString::try_from(geometry.clone()), Err(geometry.clone()));
        assert_eq!(Curve::try_from(geometry.clone()), Err(geometry));

        let curve = Curve::try_from(Geometry::from(line(&[(0.0, 0.0)]))).unwrap();
        assert_eq!(curve.geometry_type(), GeometryType::LineString);
        assert_eq!(Geometry::from(curve).geometry_type(), GeometryType::LineString);
    }
}
