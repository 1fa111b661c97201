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
//! Conversion between geometry attributes and WKB type codes
//!
//! An ISO WKB type code is `wkb_id + 1000 * has_z + 2000 * has_m`. The
//! thousands digit (the "mode") therefore encodes the Z/M pair as one of
//! 0 (XY), 1 (XYZ), 2 (XYM), or 3 (XYZM).

use geo_traits::Dimensions;

use crate::error::SedonaWkbError;
use crate::geometry::{Dimensional, Geometry};
use crate::types::GeometryType;

/// High bit marking a Z geometry in the legacy 2.5D (pre-ISO) encoding
pub const WKB_25D_FLAG: u32 = 0x8000_0000;

const Z_OFFSET: u32 = 1000;
const M_OFFSET: u32 = 2000;

/// Type code for a geometry type and Z/M flags
pub fn code_for(geometry_type: GeometryType, has_z: bool, has_m: bool) -> u32 {
    let mut code = geometry_type.wkb_id();
    if has_z {
        code += Z_OFFSET;
    }
    if has_m {
        code += M_OFFSET;
    }
    code
}

/// Type code a geometry is written with
pub fn code_of(geometry: &Geometry) -> u32 {
    code_for(geometry.geometry_type(), geometry.has_z(), geometry.has_m())
}

/// The geometry type component of a type code
pub fn geometry_type_for_code(code: u32) -> Result<GeometryType, SedonaWkbError> {
    GeometryType::try_from_wkb_id(code % 1000).map_err(|_| {
        SedonaWkbError::UnsupportedType(format!(
            "Unsupported geometry code for type retrieval: {code}"
        ))
    })
}

/// The type code divided by 1000, rounded half up
///
/// For well formed codes this is the thousands digit.
pub fn geometry_mode(code: u32) -> u32 {
    code / 1000 + u32::from(code % 1000 >= 500)
}

/// Whether a type code carries Z values
pub fn has_z(code: u32) -> Result<bool, SedonaWkbError> {
    match geometry_mode(code) {
        0 | 2 => Ok(false),
        1 | 3 => Ok(true),
        _ => Err(SedonaWkbError::InvalidCode(code)),
    }
}

/// Whether a type code carries M values
pub fn has_m(code: u32) -> Result<bool, SedonaWkbError> {
    match geometry_mode(code) {
        0 | 1 => Ok(false),
        2 | 3 => Ok(true),
        _ => Err(SedonaWkbError::InvalidCode(code)),
    }
}

/// The [Dimensions] encoded by a type code
pub fn dimensions_for_code(code: u32) -> Result<Dimensions, SedonaWkbError> {
    match geometry_mode(code) {
        0 => Ok(Dimensions::Xy),
        1 => Ok(Dimensions::Xyz),
        2 => Ok(Dimensions::Xym),
        3 => Ok(Dimensions::Xyzm),
        _ => Err(SedonaWkbError::InvalidCode(code)),
    }
}
