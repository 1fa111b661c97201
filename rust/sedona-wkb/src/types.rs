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
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SedonaWkbError;

/// Geometry types
///
/// The complete set of simple feature and SQL/MM geometry types that have a
/// WKB type identifier, including the abstract [GeometryType::Geometry],
/// [GeometryType::Curve], and [GeometryType::Surface]. Abstract types have
/// valid codes but can never be encoded or decoded.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Hash, Clone, Copy)]
pub enum GeometryType {
    /// Abstract root of the geometry hierarchy
    Geometry,
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
    /// Collection of curves; decoded as a [GeometryType::GeometryCollection]
    MultiCurve,
    /// Collection of surfaces; decoded as a [GeometryType::GeometryCollection]
    MultiSurface,
    /// Abstract one-dimensional type
    Curve,
    /// Abstract two-dimensional type
    Surface,
    PolyhedralSurface,
    Tin,
    Triangle,
}

impl GeometryType {
    /// All geometry types in WKB identifier order
    pub const ALL: [GeometryType; 18] = [
        Self::Geometry,
        Self::Point,
        Self::LineString,
        Self::Polygon,
        Self::MultiPoint,
        Self::MultiLineString,
        Self::MultiPolygon,
        Self::GeometryCollection,
        Self::CircularString,
        Self::CompoundCurve,
        Self::CurvePolygon,
        Self::MultiCurve,
        Self::MultiSurface,
        Self::Curve,
        Self::Surface,
        Self::PolyhedralSurface,
        Self::Tin,
        Self::Triangle,
    ];

    /// Construct a geometry type from a WKB type integer
    ///
    /// Parses the geometry type (not dimension) component of a WKB type code
    /// (e.g., 1 for Point...17 for Triangle).
    pub fn try_from_wkb_id(wkb_id: u32) -> Result<Self, SedonaWkbError> {
        match wkb_id {
            0 => Ok(Self::Geometry),
            1 => Ok(Self::Point),
            2 => Ok(Self::LineString),
            3 => Ok(Self::Polygon),
            4 => Ok(Self::MultiPoint),
            5 => Ok(Self::MultiLineString),
            6 => Ok(Self::MultiPolygon),
            7 => Ok(Self::GeometryCollection),
            8 => Ok(Self::CircularString),
            9 => Ok(Self::CompoundCurve),
            10 => Ok(Self::CurvePolygon),
            11 => Ok(Self::MultiCurve),
            12 => Ok(Self::MultiSurface),
            13 => Ok(Self::Curve),
            14 => Ok(Self::Surface),
            15 => Ok(Self::PolyhedralSurface),
            16 => Ok(Self::Tin),
            17 => Ok(Self::Triangle),
            _ => Err(SedonaWkbError::UnsupportedType(format!(
                "Unknown geometry type identifier {wkb_id}"
            ))),
        }
    }

    /// WKB integer identifier
    ///
    /// The geometry type portion of the WKB type code (e.g., 1 for Point).
    pub fn wkb_id(&self) -> u32 {
        match self {
            Self::Geometry => 0,
            Self::Point => 1,
            Self::LineString => 2,
            Self::Polygon => 3,
            Self::MultiPoint => 4,
            Self::MultiLineString => 5,
            Self::MultiPolygon => 6,
            Self::GeometryCollection => 7,
            Self::CircularString => 8,
            Self::CompoundCurve => 9,
            Self::CurvePolygon => 10,
            Self::MultiCurve => 11,
            Self::MultiSurface => 12,
            Self::Curve => 13,
            Self::Surface => 14,
            Self::PolyhedralSurface => 15,
            Self::Tin => 16,
            Self::Triangle => 17,
        }
    }

    /// OGC name of the type (e.g., "MULTILINESTRING")
    pub fn name(&self) -> &'static str {
        match self {
            Self::Geometry => "GEOMETRY",
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLineString => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
            Self::GeometryCollection => "GEOMETRYCOLLECTION",
            Self::CircularString => "CIRCULARSTRING",
            Self::CompoundCurve => "COMPOUNDCURVE",
            Self::CurvePolygon => "CURVEPOLYGON",
            Self::MultiCurve => "MULTICURVE",
            Self::MultiSurface => "MULTISURFACE",
            Self::Curve => "CURVE",
            Self::Surface => "SURFACE",
            Self::PolyhedralSurface => "POLYHEDRALSURFACE",
            Self::Tin => "TIN",
            Self::Triangle => "TRIANGLE",
        }
    }

    /// True for types that exist only as supertypes and are never materialized
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Geometry | Self::Curve | Self::Surface)
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryType {
    type Err = SedonaWkbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value_upper = value.to_ascii_uppercase();
        Self::ALL
            .iter()
            .find(|geometry_type| geometry_type.name() == value_upper)
            .copied()
            .ok_or_else(|| {
                SedonaWkbError::UnsupportedType(format!("Invalid geometry type string: '{value}'"))
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use rstest::rstest;
    use GeometryType::*;

    #[rstest]
    fn geometry_type_wkb_id_roundtrip(
        #[values(
            (Geometry, 0),
            (Point, 1),
            (LineString, 2),
            (Polygon, 3),
            (MultiPoint, 4),
            (MultiLineString, 5),
            (MultiPolygon, 6),
            (GeometryCollection, 7),
            (CircularString, 8),
            (CompoundCurve, 9),
            (CurvePolygon, 10),
            (MultiCurve, 11),
            (MultiSurface, 12),
            (Curve, 13),
            (Surface, 14),
            (PolyhedralSurface, 15),
            (Tin, 16),
            (Triangle, 17)
        )]
        geometry_type_and_id: (GeometryType, u32),
    ) {
        let (geometry_type, wkb_id) = geometry_type_and_id;
        assert_eq!(geometry_type.wkb_id(), wkb_id);
        assert_eq!(GeometryType::try_from_wkb_id(wkb_id).unwrap(), geometry_type);
        assert_eq!(GeometryType::ALL[wkb_id as usize], geometry_type);
    }

    #[test]
    fn geometry_type_wkb_id_err() {
        let err = GeometryType::try_from_wkb_id(18).unwrap_err();
        assert!(matches!(err, SedonaWkbError::UnsupportedType(_)));
        assert_eq!(err.to_string(), "Unknown geometry type identifier 18");
    }

    #[test]
    fn geometry_type_str_roundtrip() {
        for geometry_type in GeometryType::ALL {
            let name = geometry_type.to_string();
            assert_eq!(GeometryType::from_str(&name).unwrap(), geometry_type);
            assert_eq!(
                GeometryType::from_str(&name.to_ascii_lowercase()).unwrap(),
                geometry_type
            );
        }

        let err = GeometryType::from_str("gazornenplat").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid geometry type string: 'gazornenplat'"
        );
    }

    #[test]
    fn abstract_types() {
        let abstract_types: Vec<_> = GeometryType::ALL
            .into_iter()
            .filter(|geometry_type| geometry_type.is_abstract())
            .collect();
        assert_eq!(abstract_types, vec![Geometry, Curve, Surface]);
    }
}
