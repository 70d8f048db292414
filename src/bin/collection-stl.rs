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

use std::io::{stdout, Write};
use std::{env, fs, io};

use collection::stl::collection_stl;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let lib = collection_stl();
    let id = lib.id();

    let mut file = match args.len() {
        1 => Box::new(stdout()) as Box<dyn io::Write>,
        2 => Box::new(fs::File::create(&args[1])?) as Box<dyn io::Write>,
        _ => panic!("invalid argument count"),
    };

    writeln!(
        file,
        "{{-
  Id: {id}
  Name: Collection
  Description: Data types for capability-gated collection smart contracts
  Author: Dr Maxim Orlovsky <orlovsky@lnp-bp.org>
  Copyright (C) 2024 LNP/BP Standards Association. All rights reserved.
  License: Apache-2.0
-}}
"
    )?;
    writeln!(file, "{lib}")?;

    Ok(())
}
