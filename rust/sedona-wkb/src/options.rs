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
use serde::{Deserialize, Serialize};

use crate::byte_order::ByteOrder;

/// Options controlling how geometries are encoded
///
/// Decoding needs no options because every WKB header carries its own byte
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Byte order of every header and value written (big endian by default)
    pub byte_order: ByteOrder,
}

impl WriteOptions {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(WriteOptions::default().byte_order, ByteOrder::BigEndian);

        let options: WriteOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, WriteOptions::default());
    }

    #[test]
    fn serde() {
        let options = WriteOptions::new(ByteOrder::LittleEndian);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"byte_order":"LITTLE_ENDIAN"}"#);
        assert_eq!(serde_json::from_str::<WriteOptions>(&json).unwrap(), options);

        let options: WriteOptions =
            serde_json::from_str(r#"{"byte_order": "big_endian"}"#).unwrap();
        assert_eq!(options.byte_order, ByteOrder::BigEndian);

        assert!(serde_json::from_str::<WriteOptions>(r#"{"byte_order": "middle"}"#).is_err());
    }
}
