// Standard library for capability-gated collection smart contracts
//
// SPDX-License-Identifier: Apache-2.0
//
// Written in 2019-2024 by
//     Dr Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// Copyright (C) 2019-2024 LNP/BP Standards Association. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Strict types library generated from the collection data types.

use strict_types::stl::{std_stl, strict_types_stl};
use strict_types::{CompileError, LibBuilder, TypeLib};

use crate::{AdminCap, Collection, LIB_NAME_COLLECTION};

fn _collection_stl() -> Result<TypeLib, CompileError> {
    LibBuilder::new(libname!(LIB_NAME_COLLECTION), tiny_bset! {
        std_stl().to_dependency(),
        strict_types_stl().to_dependency(),
    })
    .transpile::<Collection>()
    .transpile::<AdminCap>()
    .compile()
}

/// Generates strict type library representation of the collection data
/// types.
pub fn collection_stl() -> TypeLib {
    _collection_stl().expect("invalid strict type Collection library")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lib_compiles() { collection_stl(); }
}
