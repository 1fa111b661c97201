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
//! Recursive WKB decoder
//!
//! Every fully headered geometry starts with a byte order indicator and a
//! type code. The indicator switches the cursor's byte order for the rest of
//! that geometry; once the geometry has been read the cursor is switched back
//! to the order it had before, so sibling geometries in a collection each
//! follow their own header.

use crate::byte_order::ByteOrder;
use crate::cursor::ByteReader;
use crate::error::SedonaWkbError;
use crate::filter::GeometryFilter;
use crate::geometry::{
    CircularString, CompoundCurve, Curve, CurvePolygon, Geometry, GeometryCollection, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, PolyhedralSurface, Polygon, Tin, Triangle,
};
use crate::type_info::GeometryTypeInfo;
use crate::types::GeometryType;

/// Deepest nesting of headered geometries [GeometryReader] accepts
///
/// A top-level geometry is at depth 1. Deeper input fails with
/// [SedonaWkbError::Invalid] instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Smallest possible encoding of a headered geometry (order byte + type code)
const MIN_HEADERED_SIZE: usize = 5;
/// Smallest possible encoding of a raw ring (a point count)
const MIN_RING_SIZE: usize = 4;
/// Smallest possible encoding of a raw point (x and y)
const MIN_POINT_SIZE: usize = 16;

/// Decode a geometry from a WKB buffer
///
/// The buffer's own byte order indicators are honored; trailing bytes after
/// the geometry are ignored.
pub fn read_geometry(buf: &[u8]) -> Result<Geometry, SedonaWkbError> {
    read_geometry_with_byte_order(buf, ByteOrder::BigEndian)
}

/// Decode a geometry from a WKB buffer using a cursor that starts in `byte_order`
///
/// WKB is self-describing, so the result does not depend on `byte_order`.
pub fn read_geometry_with_byte_order(
    buf: &[u8],
    byte_order: ByteOrder,
) -> Result<Geometry, SedonaWkbError> {
    let mut reader = ByteReader::with_byte_order(buf, byte_order);
    GeometryReader::new(&mut reader).read_unfiltered(None)
}

/// Decode a geometry from a WKB buffer, dropping whatever `filter` rejects
///
/// Returns `Ok(None)` when the top-level geometry itself is rejected.
pub fn read_geometry_with_filter(
    buf: &[u8],
    filter: &dyn GeometryFilter,
    containing_type: Option<GeometryType>,
) -> Result<Option<Geometry>, SedonaWkbError> {
    let mut reader = ByteReader::new(buf);
    GeometryReader::new(&mut reader).read(Some(filter), containing_type)
}

/// Decode the next geometry from an existing cursor
pub fn read_geometry_from(
    reader: &mut ByteReader<'_>,
    filter: Option<&dyn GeometryFilter>,
    containing_type: Option<GeometryType>,
) -> Result<Option<Geometry>, SedonaWkbError> {
    GeometryReader::new(reader).read(filter, containing_type)
}

/// Read only the byte order indicator and type code at the cursor
///
/// The cursor is left in the byte order announced by the header, ready to
/// read the geometry body.
pub fn read_geometry_type(reader: &mut ByteReader<'_>) -> Result<GeometryTypeInfo, SedonaWkbError> {
    GeometryReader::new(reader).read_geometry_type()
}

/// Well-Known Binary reader over a borrowed [ByteReader]
///
/// The `read_<type>` methods decode a geometry body (everything after the
/// header) at the current position using the cursor's current byte order.
pub struct GeometryReader<'r, 'a> {
    reader: &'r mut ByteReader<'a>,
    depth: usize,
}

impl<'r, 'a> GeometryReader<'r, 'a> {
    pub fn new(reader: &'r mut ByteReader<'a>) -> Self {
        Self { reader, depth: 0 }
    }

    pub fn byte_reader(&mut self) -> &mut ByteReader<'a> {
        self.reader
    }

    /// Read a fully headered geometry
    ///
    /// `containing_type` is passed to the filter for the geometry itself;
    /// `Ok(None)` means the filter rejected it. Bytes are consumed whether or
    /// not the geometry is kept.
    pub fn read(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        containing_type: Option<GeometryType>,
    ) -> Result<Option<Geometry>, SedonaWkbError> {
        let geometry = self.read_unfiltered(filter)?;
        Ok(filtered(filter, containing_type, geometry))
    }

    /// Read the byte order indicator and type code
    pub fn read_geometry_type(&mut self) -> Result<GeometryTypeInfo, SedonaWkbError> {
        let offset = self.reader.position();
        let byte_order = ByteOrder::from_indicator(self.reader.read_byte()?);
        self.reader.set_byte_order(byte_order);

        let raw_code = self.reader.read_u32()?;
        let info = GeometryTypeInfo::try_from_raw_code(raw_code)?;
        log::trace!("WKB header at offset {offset}: {byte_order} code {raw_code} -> {info:?}");
        Ok(info)
    }

    pub fn read_point(&mut self, has_z: bool, has_m: bool) -> Result<Point, SedonaWkbError> {
        let x = self.reader.read_f64()?;
        let y = self.reader.read_f64()?;
        let z = if has_z {
            Some(self.reader.read_f64()?)
        } else {
            None
        };
        let m = if has_m {
            Some(self.reader.read_f64()?)
        } else {
            None
        };

        Ok(Point { x, y, z, m })
    }

    pub fn read_line_string(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<LineString, SedonaWkbError> {
        Ok(LineString {
            has_z,
            has_m,
            points: self.read_points(filter, GeometryType::LineString, has_z, has_m)?,
        })
    }

    pub fn read_polygon(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<Polygon, SedonaWkbError> {
        Ok(Polygon {
            has_z,
            has_m,
            rings: self.read_rings(filter, GeometryType::Polygon, has_z, has_m)?,
        })
    }

    pub fn read_multi_point(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<MultiPoint, SedonaWkbError> {
        Ok(MultiPoint {
            has_z,
            has_m,
            points: self.read_children(filter, GeometryType::MultiPoint)?,
        })
    }

    pub fn read_multi_line_string(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<MultiLineString, SedonaWkbError> {
        Ok(MultiLineString {
            has_z,
            has_m,
            line_strings: self.read_children(filter, GeometryType::MultiLineString)?,
        })
    }

    pub fn read_multi_polygon(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<MultiPolygon, SedonaWkbError> {
        Ok(MultiPolygon {
            has_z,
            has_m,
            polygons: self.read_children(filter, GeometryType::MultiPolygon)?,
        })
    }

    /// Read a GEOMETRYCOLLECTION, MULTICURVE, or MULTISURFACE body
    ///
    /// All three share a layout and produce a plain collection.
    pub fn read_geometry_collection(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<GeometryCollection, SedonaWkbError> {
        let mut collection = GeometryCollection::new(has_z, has_m);
        collection.geometries = self.read_children(filter, GeometryType::GeometryCollection)?;
        Ok(collection)
    }

    pub fn read_circular_string(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<CircularString, SedonaWkbError> {
        Ok(CircularString {
            has_z,
            has_m,
            points: self.read_points(filter, GeometryType::CircularString, has_z, has_m)?,
        })
    }

    pub fn read_compound_curve(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<CompoundCurve, SedonaWkbError> {
        Ok(CompoundCurve {
            has_z,
            has_m,
            segments: self.read_children::<Curve>(filter, GeometryType::CompoundCurve)?,
        })
    }

    pub fn read_curve_polygon(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<CurvePolygon, SedonaWkbError> {
        Ok(CurvePolygon {
            has_z,
            has_m,
            rings: self.read_children::<Curve>(filter, GeometryType::CurvePolygon)?,
        })
    }

    pub fn read_polyhedral_surface(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<PolyhedralSurface, SedonaWkbError> {
        Ok(PolyhedralSurface {
            has_z,
            has_m,
            polygons: self.read_children(filter, GeometryType::PolyhedralSurface)?,
        })
    }

    pub fn read_tin(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<Tin, SedonaWkbError> {
        Ok(Tin {
            has_z,
            has_m,
            triangles: self.read_children(filter, GeometryType::Tin)?,
        })
    }

    pub fn read_triangle(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        has_z: bool,
        has_m: bool,
    ) -> Result<Triangle, SedonaWkbError> {
        Ok(Triangle {
            has_z,
            has_m,
            rings: self.read_rings(filter, GeometryType::Triangle, has_z, has_m)?,
        })
    }

    // Header and body, restoring the caller's byte order afterwards. The
    // filter is applied to nested content only.
    fn read_unfiltered(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
    ) -> Result<Geometry, SedonaWkbError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SedonaWkbError::Invalid(format!(
                "Invalid WKB: geometry at offset {} is nested more than {MAX_NESTING_DEPTH} levels deep",
                self.reader.position()
            )));
        }

        let original_byte_order = self.reader.byte_order();
        self.depth += 1;
        let geometry = self.read_headered(filter);
        self.depth -= 1;

        let geometry = geometry?;
        self.reader.set_byte_order(original_byte_order);
        Ok(geometry)
    }

    fn read_headered(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
    ) -> Result<Geometry, SedonaWkbError> {
        let info = self.read_geometry_type()?;
        let (has_z, has_m) = (info.has_z(), info.has_m());

        let geometry: Geometry = match info.geometry_type() {
            GeometryType::Point => self.read_point(has_z, has_m)?.into(),
            GeometryType::LineString => self.read_line_string(filter, has_z, has_m)?.into(),
            GeometryType::Polygon => self.read_polygon(filter, has_z, has_m)?.into(),
            GeometryType::MultiPoint => self.read_multi_point(filter, has_z, has_m)?.into(),
            GeometryType::MultiLineString => {
                self.read_multi_line_string(filter, has_z, has_m)?.into()
            }
            GeometryType::MultiPolygon => self.read_multi_polygon(filter, has_z, has_m)?.into(),
            GeometryType::GeometryCollection
            | GeometryType::MultiCurve
            | GeometryType::MultiSurface => {
                if info.geometry_type() != GeometryType::GeometryCollection {
                    log::debug!(
                        "Reading {} as {}",
                        info.geometry_type(),
                        GeometryType::GeometryCollection
                    );
                }
                self.read_geometry_collection(filter, has_z, has_m)?.into()
            }
            GeometryType::CircularString => {
                self.read_circular_string(filter, has_z, has_m)?.into()
            }
            GeometryType::CompoundCurve => self.read_compound_curve(filter, has_z, has_m)?.into(),
            GeometryType::CurvePolygon => self.read_curve_polygon(filter, has_z, has_m)?.into(),
            GeometryType::PolyhedralSurface => {
                self.read_polyhedral_surface(filter, has_z, has_m)?.into()
            }
            GeometryType::Tin => self.read_tin(filter, has_z, has_m)?.into(),
            GeometryType::Triangle => self.read_triangle(filter, has_z, has_m)?.into(),
            abstract_type @ (GeometryType::Geometry
            | GeometryType::Curve
            | GeometryType::Surface) => {
                return Err(abstract_type_error(abstract_type));
            }
        };

        Ok(geometry)
    }

    // Count followed by raw points, each checked against `containing_type`
    fn read_points(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        containing_type: GeometryType,
        has_z: bool,
        has_m: bool,
    ) -> Result<Vec<Point>, SedonaWkbError> {
        let num_points = self.reader.read_int()?;
        let mut points = Vec::with_capacity(self.capacity_hint(num_points, MIN_POINT_SIZE));
        for _ in 0..num_points {
            let point = self.read_point(has_z, has_m)?;
            if let Some(point) = filtered(filter, Some(containing_type), point) {
                points.push(point);
            }
        }
        Ok(points)
    }

    // Count followed by raw line string rings, each checked against `containing_type`
    fn read_rings(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        containing_type: GeometryType,
        has_z: bool,
        has_m: bool,
    ) -> Result<Vec<LineString>, SedonaWkbError> {
        let num_rings = self.reader.read_int()?;
        let mut rings = Vec::with_capacity(self.capacity_hint(num_rings, MIN_RING_SIZE));
        for _ in 0..num_rings {
            let ring = self.read_line_string(filter, has_z, has_m)?;
            if let Some(ring) = filtered(filter, Some(containing_type), ring) {
                rings.push(ring);
            }
        }
        Ok(rings)
    }

    // Count followed by fully headered children; rejected children are skipped
    fn read_children<T>(
        &mut self,
        filter: Option<&dyn GeometryFilter>,
        containing_type: GeometryType,
    ) -> Result<Vec<T>, SedonaWkbError>
    where
        T: TryFrom<Geometry>,
    {
        let num_geometries = self.reader.read_int()?;
        let mut children = Vec::with_capacity(self.capacity_hint(num_geometries, MIN_HEADERED_SIZE));
        for _ in 0..num_geometries {
            if let Some(child) = self.read(filter, Some(containing_type))? {
                let child_type = child.geometry_type();
                let child = T::try_from(child).map_err(|_| {
                    SedonaWkbError::UnsupportedType(format!(
                        "Unexpected {child_type} in {containing_type}"
                    ))
                })?;
                children.push(child);
            }
        }
        Ok(children)
    }

    // Declared counts are trusted for iteration but not for allocation
    fn capacity_hint(&self, count: u32, min_element_size: usize) -> usize {
        (count as usize).min(self.reader.remaining() / min_element_size)
    }
}

fn abstract_type_error(geometry_type: GeometryType) -> SedonaWkbError {
    SedonaWkbError::UnsupportedType(format!(
        "Unexpected Geometry Type of {geometry_type} which is abstract"
    ))
}

// Keep `value` unless a filter is present and rejects it
fn filtered<T>(
    filter: Option<&dyn GeometryFilter>,
    containing_type: Option<GeometryType>,
    value: T,
) -> Option<T>
where
    T: Into<Geometry> + TryFrom<Geometry>,
{
    let Some(filter) = filter else {
        return Some(value);
    };

    let geometry: Geometry = value.into();
    if filter.filter(containing_type, &geometry) {
        T::try_from(geometry).ok()
    } else {
        None
    }
}
