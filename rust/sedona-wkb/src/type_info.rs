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
use geo_traits::Dimensions;

use crate::codes::{self, WKB_25D_FLAG};
use crate::error::SedonaWkbError;
use crate::geometry::dimensions_of;
use crate::types::GeometryType;

/// Decoded geometry header
///
/// Produced for every fully headered geometry while reading. `code` is the
/// ISO form of the type code: when the legacy 2.5D high bit was present it
/// has already been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryTypeInfo {
    code: u32,
    geometry_type: GeometryType,
    has_z: bool,
    has_m: bool,
}

impl GeometryTypeInfo {
    pub fn new(code: u32, geometry_type: GeometryType, has_z: bool, has_m: bool) -> Self {
        Self {
            code,
            geometry_type,
            has_z,
            has_m,
        }
    }

    /// Interpret a raw type code as read from a WKB header
    ///
    /// Both the ISO (+1000) and the legacy 2.5D (high bit) Z markers are
    /// accepted.
    pub fn try_from_raw_code(raw_code: u32) -> Result<Self, SedonaWkbError> {
        let (code, legacy_z) = if raw_code > WKB_25D_FLAG {
            (raw_code - WKB_25D_FLAG, true)
        } else {
            (raw_code, false)
        };

        let geometry_type = codes::geometry_type_for_code(code)?;
        let has_z = legacy_z || codes::has_z(code)?;
        let has_m = codes::has_m(code)?;
        Ok(Self::new(code, geometry_type, has_z, has_m))
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    pub fn has_z(&self) -> bool {
        self.has_z
    }

    pub fn has_m(&self) -> bool {
        self.has_m
    }

    pub fn dimensions(&self) -> Dimensions {
        dimensions_of(self.has_z, self.has_m)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn legacy_z_matches_iso_z(
        #[values(
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::MultiPolygon,
            GeometryType::Triangle
        )]
        geometry_type: GeometryType,
    ) {
        let iso = GeometryTypeInfo::try_from_raw_code(geometry_type.wkb_id() + 1000).unwrap();
        let legacy =
            GeometryTypeInfo::try_from_raw_code(geometry_type.wkb_id() | WKB_25D_FLAG).unwrap();

        assert_eq!(legacy.geometry_type(), iso.geometry_type());
        assert_eq!(legacy.has_z(), iso.has_z());
        assert_eq!(legacy.has_m(), iso.has_m());
        assert_eq!(legacy.dimensions(), Dimensions::Xyz);
        assert_eq!(legacy.code(), geometry_type.wkb_id());
    }

    #[test]
    fn legacy_z_with_m() {
        let info = GeometryTypeInfo::try_from_raw_code(WKB_25D_FLAG | 2002).unwrap();
        assert_eq!(info.geometry_type(), GeometryType::LineString);
        assert_eq!(info.dimensions(), Dimensions::Xyzm);
    }

    #[test]
    fn invalid_raw_codes() {
        assert!(matches!(
            GeometryTypeInfo::try_from_raw_code(99),
            Err(SedonaWkbError::UnsupportedType(_))
        ));
        assert!(matches!(
            GeometryTypeInfo::try_from_raw_code(4001),
            Err(SedonaWkbError::InvalidCode(4001))
        ));
    }
}
