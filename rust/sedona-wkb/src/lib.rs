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
//! Reading and writing geometries as OGC/ISO Well-Known Binary
//!
//! ```
//! use sedona_wkb::{read_geometry, write_geometry, ByteOrder, Geometry, Point};
//!
//! let point: Geometry = Point::new(1.0, 1.0).into();
//! let bytes = sedona_wkb::write_geometry_with_byte_order(&point, ByteOrder::LittleEndian).unwrap();
//! assert_eq!(read_geometry(&bytes).unwrap(), point);
//! assert_eq!(write_geometry(&point).unwrap()[0], 0);
//! ```
pub mod byte_order;
pub mod codes;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod options;
pub mod reader;
pub mod type_info;
pub mod types;
pub mod writer;

pub use byte_order::ByteOrder;
pub use error::SedonaWkbError;
pub use geometry::{Dimensional, Geometry, Point};
pub use options::WriteOptions;
pub use reader::{read_geometry, read_geometry_with_byte_order, read_geometry_with_filter};
pub use types::GeometryType;
pub use writer::{
    geometry_byte_length, write_geometry, write_geometry_with_byte_order,
    write_geometry_with_options,
};
