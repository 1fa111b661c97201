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
//! Point level filtering applied while decoding

use crate::geometry::Geometry;
use crate::types::GeometryType;

/// Decides which decoded geometries are kept
///
/// The reader calls [GeometryFilter::filter] once for every fully decoded
/// point of a line string or circular string, every ring of a polygon or
/// triangle, every headered child geometry, and finally the top-level
/// geometry. `containing_type` is the type of the enclosing geometry, or
/// `None` at the top level. Returning `false` drops the geometry; it never
/// changes how many bytes are consumed.
pub trait GeometryFilter {
    fn filter(&self, containing_type: Option<GeometryType>, geometry: &Geometry) -> bool;
}

impl<F> GeometryFilter for F
where
    F: Fn(Option<GeometryType>, &Geometry) -> bool,
{
    fn filter(&self, containing_type: Option<GeometryType>, geometry: &Geometry) -> bool {
        self(containing_type, geometry)
    }
}

/// Which non-finite ordinates a [PointFiniteFilter] lets through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FiniteFilterType {
    /// Only finite values
    #[default]
    Finite,
    /// Finite values and NaN
    FiniteAndNan,
    /// Finite values and positive or negative infinity
    FiniteAndInfinite,
}

impl FiniteFilterType {
    fn accepts(&self, value: f64) -> bool {
        match self {
            Self::Finite => value.is_finite(),
            Self::FiniteAndNan => value.is_finite() || value.is_nan(),
            Self::FiniteAndInfinite => !value.is_nan(),
        }
    }
}

/// Drops points with non-finite ordinates
///
/// X and Y are always checked. Z and M are checked only when enabled and
/// present on the point. Geometries other than points pass unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointFiniteFilter {
    filter_type: FiniteFilterType,
    filter_z: bool,
    filter_m: bool,
}

impl PointFiniteFilter {
    pub fn new(filter_type: FiniteFilterType) -> Self {
        Self::with_zm(filter_type, false, false)
    }

    pub fn with_zm(filter_type: FiniteFilterType, filter_z: bool, filter_m: bool) -> Self {
        Self {
            filter_type,
            filter_z,
            filter_m,
        }
    }

    pub fn filter_type(&self) -> FiniteFilterType {
        self.filter_type
    }

    pub fn is_filter_z(&self) -> bool {
        self.filter_z
    }

    pub fn is_filter_m(&self) -> bool {
        self.filter_m
    }
}

impl GeometryFilter for PointFiniteFilter {
    fn filter(&self, _containing_type: Option<GeometryType>, geometry: &Geometry) -> bool {
        let Geometry::Point(point) = geometry else {
            return true;
        };

        let optional_ok = |enabled: bool, value: Option<f64>| match value {
            Some(value) if enabled => self.filter_type.accepts(value),
            _ => true,
        };

        self.filter_type.accepts(point.x)
            && self.filter_type.accepts(point.y)
            && optional_ok(self.filter_z, point.z)
            && optional_ok(self.filter_m, point.m)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{LineString, Point};
    use rstest::rstest;

    const NAN: f64 = f64::NAN;
    const INF: f64 = f64::INFINITY;

    #[rstest]
    #[case(FiniteFilterType::Finite, Point::new(1.0, 2.0), true)]
    #[case(FiniteFilterType::Finite, Point::new(NAN, 2.0), false)]
    #[case(FiniteFilterType::Finite, Point::new(1.0, INF), false)]
    #[case(FiniteFilterType::FiniteAndNan, Point::new(NAN, NAN), true)]
    #[case(FiniteFilterType::FiniteAndNan, Point::new(NAN, -INF), false)]
    #[case(FiniteFilterType::FiniteAndInfinite, Point::new(INF, -INF), true)]
    #[case(FiniteFilterType::FiniteAndInfinite, Point::new(INF, NAN), false)]
    fn point_xy(#[case] filter_type: FiniteFilterType, #[case] point: Point, #[case] keep: bool) {
        let filter = PointFiniteFilter::new(filter_type);
        assert_eq!(filter.filter(None, &point.into()), keep);
    }

    #[test]
    fn z_and_m_only_when_enabled() {
        let nan_z = Point::new_z(1.0, 2.0, NAN);
        let inf_m = Point::new_m(1.0, 2.0, INF);

        let xy_only = PointFiniteFilter::new(FiniteFilterType::Finite);
        assert!(xy_only.filter(None, &nan_z.into()));
        assert!(xy_only.filter(None, &inf_m.into()));

        let with_z = PointFiniteFilter::with_zm(FiniteFilterType::Finite, true, false);
        assert!(!with_z.filter(None, &nan_z.into()));
        assert!(with_z.filter(None, &inf_m.into()));

        let with_m = PointFiniteFilter::with_zm(FiniteFilterType::Finite, false, true);
        assert!(with_m.filter(None, &nan_z.into()));
        assert!(!with_m.filter(None, &inf_m.into()));

        // Enabled checks on absent ordinates pass
        let with_zm = PointFiniteFilter::with_zm(FiniteFilterType::Finite, true, true);
        assert!(with_zm.filter(None, &Point::new(1.0, 2.0).into()));
        assert!(with_zm.is_filter_z() && with_zm.is_filter_m());
    }

    #[test]
    fn non_points_pass() {
        let filter = PointFiniteFilter::default();
        assert_eq!(filter.filter_type(), FiniteFilterType::Finite);
        let line_string = LineString::from_points(vec![Point::new(NAN, NAN)]);
        assert!(filter.filter(Some(GeometryType::Polygon), &line_string.into()));
    }

    #[test]
    fn closures_are_filters() {
        let only_in_polygons =
            |containing: Option<GeometryType>, _: &Geometry| containing == Some(GeometryType::Polygon);
        assert!(only_in_polygons.filter(Some(GeometryType::Polygon), &Point::new(0.0, 0.0).into()));
        assert!(!only_in_polygons.filter(None, &Point::new(0.0, 0.0).into()));
    }
}
