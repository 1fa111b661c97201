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
//! WKB encoder
//!
//! Encoding is a single recursive emitter that is generic over where the
//! bytes go. [geometry_byte_length] runs it against a counter; the writing
//! functions run it against a [ByteWriter] allocated to exactly that length.

use crate::byte_order::ByteOrder;
use crate::codes::{code_for, code_of};
use crate::cursor::ByteWriter;
use crate::error::SedonaWkbError;
use crate::geometry::{
    CircularString, CompoundCurve, Curve, CurvePolygon, Dimensional, Geometry, GeometryCollection,
    LineString, MultiLineString, MultiPoint, MultiPolygon, Point, PolyhedralSurface, Polygon, Tin,
    Triangle,
};
use crate::options::WriteOptions;
use crate::types::GeometryType;

/// Encode a geometry as big endian WKB
pub fn write_geometry(geometry: &Geometry) -> Result<Vec<u8>, SedonaWkbError> {
    write_geometry_with_byte_order(geometry, ByteOrder::BigEndian)
}

/// Encode a geometry as WKB in the given byte order
pub fn write_geometry_with_byte_order(
    geometry: &Geometry,
    byte_order: ByteOrder,
) -> Result<Vec<u8>, SedonaWkbError> {
    let size = geometry_byte_length(geometry)?;
    let mut writer = ByteWriter::new(size, byte_order, false);
    GeometryWriter::new(&mut writer).write(geometry)?;

    log::debug!(
        "Encoded {} as {size} bytes of {byte_order} WKB",
        geometry.geometry_type()
    );
    Ok(writer.into_bytes())
}

pub fn write_geometry_with_options(
    geometry: &Geometry,
    options: &WriteOptions,
) -> Result<Vec<u8>, SedonaWkbError> {
    write_geometry_with_byte_order(geometry, options.byte_order)
}

/// Append a geometry to an existing writer using the writer's byte order
///
/// Space for the whole geometry is checked before anything is written, so a
/// fixed size writer that is too small is left unchanged.
pub fn write_geometry_to(
    writer: &mut ByteWriter,
    geometry: &Geometry,
) -> Result<(), SedonaWkbError> {
    writer.ensure_size(geometry_byte_length(geometry)?)?;
    GeometryWriter::new(writer).write(geometry)
}

/// Number of bytes [write_geometry] produces for `geometry`
pub fn geometry_byte_length(geometry: &Geometry) -> Result<usize, SedonaWkbError> {
    let mut counter = ByteCounter::default();
    encode(&mut counter, geometry)?;
    Ok(counter.len)
}

/// Well-Known Binary writer over a borrowed [ByteWriter]
///
/// [GeometryWriter::write] emits a fully headered geometry. The
/// `write_<type>` methods emit only the body (everything after the header)
/// for callers assembling WKB themselves.
pub struct GeometryWriter<'w> {
    writer: &'w mut ByteWriter,
}

macro_rules! body_writers {
    ($($method:ident($geometry:ident)),* $(,)?) => {
        $(
            pub fn $method(&mut self, geometry: &$geometry) -> Result<(), SedonaWkbError> {
                geometry.encode_body(self.writer)
            }
        )*
    };
}

impl<'w> GeometryWriter<'w> {
    pub fn new(writer: &'w mut ByteWriter) -> Self {
        Self { writer }
    }

    pub fn byte_writer(&mut self) -> &mut ByteWriter {
        self.writer
    }

    /// Write the byte order indicator, type code, and body of `geometry`
    pub fn write(&mut self, geometry: &Geometry) -> Result<(), SedonaWkbError> {
        encode(self.writer, geometry)
    }

    body_writers!(
        write_point(Point),
        write_line_string(LineString),
        write_polygon(Polygon),
        write_multi_point(MultiPoint),
        write_multi_line_string(MultiLineString),
        write_multi_polygon(MultiPolygon),
        write_geometry_collection(GeometryCollection),
        write_circular_string(CircularString),
        write_compound_curve(CompoundCurve),
        write_curve_polygon(CurvePolygon),
        write_polyhedral_surface(PolyhedralSurface),
        write_tin(Tin),
        write_triangle(Triangle),
    );
}

// Destination of encoded primitives
trait WkbSink {
    fn byte_order(&self) -> ByteOrder;
    fn put_u8(&mut self, value: u8) -> Result<(), SedonaWkbError>;
    fn put_u32(&mut self, value: u32) -> Result<(), SedonaWkbError>;
    fn put_f64(&mut self, value: f64) -> Result<(), SedonaWkbError>;
}

impl WkbSink for ByteWriter {
    fn byte_order(&self) -> ByteOrder {
        ByteWriter::byte_order(self)
    }

    fn put_u8(&mut self, value: u8) -> Result<(), SedonaWkbError> {
        self.write_u8(value)
    }

    fn put_u32(&mut self, value: u32) -> Result<(), SedonaWkbError> {
        self.write_u32(value)
    }

    fn put_f64(&mut self, value: f64) -> Result<(), SedonaWkbError> {
        self.write_f64(value)
    }
}

#[derive(Debug, Default)]
struct ByteCounter {
    len: usize,
}

impl WkbSink for ByteCounter {
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }

    fn put_u8(&mut self, _value: u8) -> Result<(), SedonaWkbError> {
        self.len += 1;
        Ok(())
    }

    fn put_u32(&mut self, _value: u32) -> Result<(), SedonaWkbError> {
        self.len += 4;
        Ok(())
    }

    fn put_f64(&mut self, _value: f64) -> Result<(), SedonaWkbError> {
        self.len += 8;
        Ok(())
    }
}

trait Encode {
    fn wkb_code(&self) -> u32;

    fn encode_body<S: WkbSink>(&self, sink: &mut S) -> Result<(), SedonaWkbError>;
}

fn encode<S: WkbSink, G: Encode>(sink: &mut S, geometry: &G) -> Result<(), SedonaWkbError> {
    sink.put_u8(sink.byte_order().indicator())?;
    sink.put_u32(geometry.wkb_code())?;
    geometry.encode_body(sink)
}

fn encode_count<S: WkbSink>(sink: &mut S, len: usize) -> Result<(), SedonaWkbError> {
    sink.put_u32(u32::try_from(len)?)
}

// Writes x, y and exactly the ordinates the enclosing type code declares.
// Ordinates the point has beyond those are dropped; a missing one is an error.
fn encode_coordinates<S: WkbSink>(
    sink: &mut S,
    point: &Point,
    has_z: bool,
    has_m: bool,
) -> Result<(), SedonaWkbError> {
    sink.put_f64(point.x)?;
    sink.put_f64(point.y)?;
    if has_z {
        sink.put_f64(required_ordinate(point, point.z, "Z")?)?;
    }
    if has_m {
        sink.put_f64(required_ordinate(point, point.m, "M")?)?;
    }
    Ok(())
}

fn required_ordinate(
    point: &Point,
    value: Option<f64>,
    name: &str,
) -> Result<f64, SedonaWkbError> {
    value.ok_or_else(|| {
        SedonaWkbError::Invalid(format!(
            "Point ({} {}) has no {name} value but its geometry declares {name}",
            point.x, point.y
        ))
    })
}

fn encode_points<S: WkbSink>(
    sink: &mut S,
    points: &[Point],
    has_z: bool,
    has_m: bool,
) -> Result<(), SedonaWkbError> {
    encode_count(sink, points.len())?;
    for point in points {
        encode_coordinates(sink, point, has_z, has_m)?;
    }
    Ok(())
}

fn encode_rings<S: WkbSink>(
    sink: &mut S,
    rings: &[LineString],
    has_z: bool,
    has_m: bool,
) -> Result<(), SedonaWkbError> {
    encode_count(sink, rings.len())?;
    for ring in rings {
        encode_points(sink, &ring.points, has_z, has_m)?;
    }
    Ok(())
}

fn encode_children<S: WkbSink, G: Encode>(
    sink: &mut S,
    children: &[G],
) -> Result<(), SedonaWkbError> {
    encode_count(sink, children.len())?;
    for child in children {
        encode(sink, child)?;
    }
    Ok(())
}

impl Encode for Point {
    fn wkb_code(&self) -> u32 {
        code_for(GeometryType::Point, self.has_z(), self.has_m())
    }

    fn encode_body<S: WkbSink>(&self, sink: &mut S) -> Result<(), SedonaWkbError> {
        encode_coordinates(sink, self, self.has_z(), self.has_m())
    }
}

macro_rules! impl_encode {
    ($($name:ident($geometry:ident, $sink:ident) => $body:expr),* $(,)?) => {
        $(
            impl Encode for $name {
                fn wkb_code(&self) -> u32 {
                    code_for(GeometryType::$name, self.has_z, self.has_m)
                }

                fn encode_body<S: WkbSink>(&self, $sink: &mut S) -> Result<(), SedonaWkbError> {
                    let $geometry = self;
                    $body
                }
            }
        )*
    };
}

impl_encode!(
    LineString(g, sink) => encode_points(sink, &g.points, g.has_z, g.has_m),
    CircularString(g, sink) => encode_points(sink, &g.points, g.has_z, g.has_m),
    Polygon(g, sink) => encode_rings(sink, &g.rings, g.has_z, g.has_m),
    Triangle(g, sink) => encode_rings(sink, &g.rings, g.has_z, g.has_m),
    MultiPoint(g, sink) => encode_children(sink, &g.points),
    MultiLineString(g, sink) => encode_children(sink, &g.line_strings),
    MultiPolygon(g, sink) => encode_children(sink, &g.polygons),
    CompoundCurve(g, sink) => encode_children(sink, &g.segments),
    CurvePolygon(g, sink) => encode_children(sink, &g.rings),
    PolyhedralSurface(g, sink) => encode_children(sink, &g.polygons),
    Tin(g, sink) => encode_children(sink, &g.triangles),
);

impl Encode for GeometryCollection {
    fn wkb_code(&self) -> u32 {
        code_for(self.kind.geometry_type(), self.has_z, self.has_m)
    }

    fn encode_body<S: WkbSink>(&self, sink: &mut S) -> Result<(), SedonaWkbError> {
        encode_children(sink, &self.geometries)
    }
}

impl Encode for Curve {
    fn wkb_code(&self) -> u32 {
        code_for(self.geometry_type(), self.has_z(), self.has_m())
    }

    fn encode_body<S: WkbSink>(&self, sink: &mut S) -> Result<(), SedonaWkbError> {
        match self {
            Curve::LineString(g) => g.encode_body(sink),
            Curve::CircularString(g) => g.encode_body(sink),
            Curve::CompoundCurve(g) => g.encode_body(sink),
        }
    }
}

impl Encode for Geometry {
    fn wkb_code(&self) -> u32 {
        code_of(self)
    }

    fn encode_body<S: WkbSink>(&self, sink: &mut S) -> Result<(), SedonaWkbError> {
        match self {
            Geometry::Point(g) => g.encode_body(sink),
            Geometry::LineString(g) => g.encode_body(sink),
            Geometry::Polygon(g) => g.encode_body(sink),
            Geometry::MultiPoint(g) => g.encode_body(sink),
            Geometry::MultiLineString(g) => g.encode_body(sink),
            Geometry::MultiPolygon(g) => g.encode_body(sink),
            Geometry::GeometryCollection(g) => g.encode_body(sink),
            Geometry::CircularString(g) => g.encode_body(sink),
            Geometry::CompoundCurve(g) => g.encode_body(sink),
            Geometry::CurvePolygon(g) => g.encode_body(sink),
            Geometry::PolyhedralSurface(g) => g.encode_body(sink),
            Geometry::Tin(g) => g.encode_body(sink),
            Geometry::Triangle(g) => g.encode_body(sink),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::CollectionKind;
    use rstest::rstest;
    use std::str::FromStr;
    use wkt::Wkt;

    fn make_wkb(wkt_value: &str, endianness: wkb::Endianness) -> Vec<u8> {
        let geometry = Wkt::<f64>::from_str(wkt_value).unwrap();
        let mut out: Vec<u8> = vec![];
        wkb::writer::write_geometry(
            &mut out,
            &geometry,
            &wkb::writer::WriteOptions { endianness },
        )
        .unwrap();
        out
    }

    fn line_string(coords: &[(f64, f64)]) -> LineString {
        LineString::from_points(coords.iter().map(|(x, y)| Point::new(*x, *y)).collect())
    }

    #[test]
    fn write_point_vector() {
        let bytes = write_geometry(&Point::new(1.0, 1.0).into()).unwrap();
        assert_eq!(
            bytes,
            [
                0x00, 0x00, 0x00, 0x00, 0x01, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00
            ]
        );
    }

    #[rstest]
    #[case("POINT (1 2)", Point::new(1.0, 2.0).into())]
    #[case("POINT Z (1 2 3)", Point::new_z(1.0, 2.0, 3.0).into())]
    #[case(
        "LINESTRING (0 0, 1 1, 2 0)",
        line_string(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).into()
    )]
    #[case(
        "POLYGON ((0 0, 1 0, 0 1, 0 0))",
        Polygon::from_rings(vec![line_string(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)])]).into()
    )]
    #[case(
        "MULTIPOINT ((1 2), (3 4))",
        MultiPoint::from_points(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]).into()
    )]
    #[case(
        "GEOMETRYCOLLECTION (POINT (1 2), LINESTRING (0 0, 1 1))",
        GeometryCollection::from_geometries(vec![
            Point::new(1.0, 2.0).into(),
            line_string(&[(0.0, 0.0), (1.0, 1.0)]).into(),
        ])
        .into()
    )]
    fn matches_independent_writer(
        #[case] wkt_value: &str,
        #[case] geometry: Geometry,
        #[values(
            (ByteOrder::BigEndian, wkb::Endianness::BigEndian),
            (ByteOrder::LittleEndian, wkb::Endianness::LittleEndian)
        )]
        orders: (ByteOrder, wkb::Endianness),
    ) {
        let (byte_order, endianness) = orders;
        let bytes = write_geometry_with_byte_order(&geometry, byte_order).unwrap();
        assert_eq!(bytes, make_wkb(wkt_value, endianness));
        assert_eq!(geometry_byte_length(&geometry).unwrap(), bytes.len());
    }

    #[test]
    fn collection_kind_sets_code() {
        let collection = GeometryCollection::from_geometries(vec![line_string(&[
            (0.0, 0.0),
            (1.0, 1.0),
        ])
        .into()]);

        for (kind, code) in [
            (CollectionKind::GeometryCollection, 7u32),
            (CollectionKind::MultiCurve, 11),
            (CollectionKind::MultiSurface, 12),
        ] {
            let geometry: Geometry = collection.clone().with_kind(kind).into();
            let bytes = write_geometry(&geometry).unwrap();
            assert_eq!(bytes[1..5], code.to_be_bytes());
        }
    }

    #[test]
    fn points_follow_container_flags() {
        let line = LineString::from_points(vec![
            Point::new_zm(1.0, 2.0, 3.0, 4.0),
            Point::new_zm(5.0, 6.0, 7.0, 8.0),
        ]);
        let bytes = write_geometry_with_byte_order(&line.into(), ByteOrder::LittleEndian).unwrap();
        assert_eq!(bytes.len(), 1 + 4 + 4 + 2 * 32);
        assert_eq!(bytes[1..5], 3002u32.to_le_bytes());
        assert_eq!(bytes[9..17], 1.0f64.to_le_bytes());
        assert_eq!(bytes[33..41], 4.0f64.to_le_bytes());

        // Ordinates the container does not declare are not written
        let mut flat = LineString::new(false, false);
        flat.add_point(Point::new_zm(1.0, 2.0, 3.0, 4.0));
        let geometry: Geometry = flat.into();
        let bytes = write_geometry(&geometry).unwrap();
        assert_eq!(bytes.len(), 1 + 4 + 4 + 16);
        assert_eq!(geometry_byte_length(&geometry).unwrap(), bytes.len());
        assert_eq!(
            crate::reader::read_geometry(&bytes).unwrap(),
            LineString::from_points(vec![Point::new(1.0, 2.0)]).into()
        );
    }

    #[rstest]
    #[case(
        LineString::from_points(vec![Point::new(0.0, 0.0), Point::new_z(1.0, 1.0, 1.0)]).into(),
        "Point (0 0) has no Z value but its geometry declares Z"
    )]
    #[case(
        Polygon {
            has_z: false,
            has_m: true,
            rings: vec![line_string(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)])],
        }
        .into(),
        "Point (0 0) has no M value but its geometry declares M"
    )]
    #[case(
        MultiLineString::from_line_strings(vec![LineString::from_points(vec![
            Point::new_m(0.0, 0.0, 1.0),
            Point::new(2.0, 3.0),
        ])])
        .into(),
        "Point (2 3) has no M value but its geometry declares M"
    )]
    fn missing_ordinates_rejected(#[case] geometry: Geometry, #[case] message: &str) {
        let err = geometry_byte_length(&geometry).unwrap_err();
        assert!(matches!(err, SedonaWkbError::Invalid(_)));
        assert_eq!(err.to_string(), message);

        let err = write_geometry(&geometry).unwrap_err();
        assert_eq!(err.to_string(), message);

        let mut writer = ByteWriter::growable(ByteOrder::BigEndian);
        assert!(write_geometry_to(&mut writer, &geometry).is_err());
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn write_to_fixed_writer() {
        let geometry: Geometry = Point::new(1.0, 2.0).into();

        let mut too_small = ByteWriter::new(20, ByteOrder::BigEndian, false);
        let err = write_geometry_to(&mut too_small, &geometry).unwrap_err();
        assert!(matches!(
            err,
            SedonaWkbError::BufferBounds {
                offset: 0,
                needed: 21,
                available: 20
            }
        ));
        assert_eq!(too_small.position(), 0);

        let mut growable = ByteWriter::growable(ByteOrder::LittleEndian);
        write_geometry_to(&mut growable, &geometry).unwrap();
        write_geometry_to(&mut growable, &geometry).unwrap();
        assert_eq!(growable.position(), 42);
        assert_eq!(growable.as_bytes()[21], 1);
    }

    #[test]
    fn body_writers_skip_header() {
        let mut writer = ByteWriter::growable(ByteOrder::BigEndian);
        let mut geometry_writer = GeometryWriter::new(&mut writer);
        geometry_writer
            .write_line_string(&line_string(&[(1.0, 2.0)]))
            .unwrap();
        geometry_writer
            .write_point(&Point::new_m(3.0, 4.0, 5.0))
            .unwrap();
        assert_eq!(geometry_writer.byte_writer().position(), 4 + 16 + 24);

        let bytes = writer.into_bytes();
        assert_eq!(bytes[..4], 1u32.to_be_bytes());
        assert_eq!(bytes[36..44], 5.0f64.to_be_bytes());
    }

    #[test]
    fn options() {
        let geometry: Geometry = Point::new(1.0, 2.0).into();
        let options = WriteOptions {
            byte_order: ByteOrder::LittleEndian,
        };
        let bytes = write_geometry_with_options(&geometry, &options).unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(
            write_geometry_with_options(&geometry, &WriteOptions::default()).unwrap(),
            write_geometry(&geometry).unwrap()
        );
    }
}
