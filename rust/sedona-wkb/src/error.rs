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
use std::num;

use thiserror::Error;

/// Errors raised while encoding or decoding WKB
///
/// Every variant is fatal to the operation that raised it: readers and
/// writers never return partial geometries, and nested calls propagate the
/// error unchanged.
#[derive(Error, Debug)]
pub enum SedonaWkbError {
    /// Abstract geometry type or a geometry type identifier outside 0-17
    #[error("{0}")]
    UnsupportedType(String),
    /// Dimension mode (thousands digit of the type code) outside 0-3
    #[error("Unexpected geometry code for dimension determination: {0}")]
    InvalidCode(u32),
    /// Read past the end of the input or write past a fixed-size buffer
    #[error(
        "Invalid WKB: buffer too small. At offset: {offset}. Need {needed} bytes but only {available} remain."
    )]
    BufferBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// Malformed input or a geometry that cannot be encoded as given
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    External(Box<dyn std::error::Error + Send + Sync>),
}

impl From<num::TryFromIntError> for SedonaWkbError {
    fn from(value: num::TryFromIntError) -> Self {
        SedonaWkbError::External(Box::new(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn errors() {
        let unsupported = SedonaWkbError::UnsupportedType("foofy".to_string());
        assert_eq!(unsupported.to_string(), "foofy");

        let invalid = SedonaWkbError::Invalid("foofy".to_string());
        assert_eq!(invalid.to_string(), "foofy");

        let invalid = SedonaWkbError::InvalidCode(4001);
        assert_eq!(
            invalid.to_string(),
            "Unexpected geometry code for dimension determination: 4001"
        );

        let bounds = SedonaWkbError::BufferBounds {
            offset: 5,
            needed: 8,
            available: 3,
        };
        assert_eq!(
            bounds.to_string(),
            "Invalid WKB: buffer too small. At offset: 5. Need 8 bytes but only 3 remain."
        );

        let overflow = u32::try_from(u64::MAX).unwrap_err();
        let external: SedonaWkbError = overflow.into();
        assert!(matches!(external, SedonaWkbError::External(_)));
    }
}
