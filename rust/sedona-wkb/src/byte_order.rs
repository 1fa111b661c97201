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

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::error::SedonaWkbError;

/// Byte order of a WKB stream
///
/// The discriminants match the WKB byte order indicator written at the
/// start of every geometry header (0 for big endian, 1 for little endian).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, SerializeDisplay, DeserializeFromStr)]
pub enum ByteOrder {
    /// Network byte order (XDR)
    #[default]
    BigEndian = 0,
    /// Little endian (NDR)
    LittleEndian = 1,
}

impl ByteOrder {
    /// The byte order of the platform this code was compiled for
    pub fn system_default() -> Self {
        if cfg!(target_endian = "big") {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }

    /// Interpret a WKB byte order indicator
    ///
    /// Zero means big endian; any other value is treated as little endian.
    pub fn from_indicator(value: u8) -> Self {
        if value == 0 {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }

    /// The WKB byte order indicator for this byte order
    pub fn indicator(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BigEndian => "BIG_ENDIAN",
            Self::LittleEndian => "LITTLE_ENDIAN",
        }
    }
}

impl Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ByteOrder {
    type Err = SedonaWkbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "BIG_ENDIAN" => Ok(Self::BigEndian),
            "LITTLE_ENDIAN" => Ok(Self::LittleEndian),
            _ => Err(SedonaWkbError::Invalid(format!(
                "Invalid byte order string: '{value}'"
            ))),
        }
    }
}
