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

#![allow(unused_braces)] // caused by rustc unable to understand strict_dumb

use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

use amplify::confinement::{Confined, NonEmptyString, U8};
use chrono::{DateTime, TimeZone, Utc};
use strict_encoding::stl::AsciiPrintable;
use strict_encoding::{
    InvalidRString, RString, StrictDeserialize, StrictDumb, StrictSerialize, TypeName,
};

use crate::{Collection, CollectionState, Identity, LIB_NAME_COLLECTION};

/// Human-readable collection name.
#[derive(Wrapper, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, From)]
#[wrapper(Deref, Display, FromStr)]
#[derive(StrictType, StrictDumb, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct Name(RString<AsciiPrintable, AsciiPrintable, 1, 40>);

impl_ident_type!(Name);
impl_ident_subtype!(Name);

impl StrictSerialize for Name {}
impl StrictDeserialize for Name {}

/// Longer-form description of a collection.
#[derive(Wrapper, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, From)]
#[wrapper(Deref, Display)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct Details(NonEmptyString<U8>);

impl StrictSerialize for Details {}
impl StrictDeserialize for Details {}

impl AsRef<str> for Details {
    #[inline]
    fn as_ref(&self) -> &str { self.0.as_str() }
}

impl StrictDumb for Details {
    fn strict_dumb() -> Self {
        Self(Confined::try_from(s!("Dumb long description which is stupid and so on...")).unwrap())
    }
}

impl FromStr for Details {
    type Err = InvalidRString;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = Confined::try_from_iter(s.chars())?;
        Ok(Self(s))
    }
}

/// Descriptive metadata fixed at collection creation time.
///
/// Kept as explicit typed fields rather than a dynamic key-value attachment
/// bag; extensions require a new library version.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[derive(StrictType, StrictDumb, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct CollectionMeta {
    /// Collection name.
    pub name: Name,
    /// Optional long-form description.
    pub details: Option<Details>,
    /// Unix timestamp of the creation, in seconds.
    pub created_at: i64,
}

impl StrictSerialize for CollectionMeta {}
impl StrictDeserialize for CollectionMeta {}

impl CollectionMeta {
    /// Constructs metadata with a given name and creation timestamp and no
    /// details.
    pub fn new(name: Name, created_at: i64) -> Self {
        CollectionMeta {
            name,
            details: None,
            created_at,
        }
    }
}

/// Summary of a collection state, suitable for tabular display.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct CollectionInfo {
    /// Collection identity.
    pub id: Identity,
    /// Collection name.
    pub name: Name,
    /// Type of items registerable in the collection.
    pub item_type: TypeName,
    /// Current lifecycle state.
    pub state: CollectionState,
    /// Number of registered items.
    pub registered: u64,
    /// Number of reserved blob slots (fulfilled or not).
    pub blob_slots: u64,
    /// Creation date.
    pub created_at: DateTime<Utc>,
}

impl CollectionInfo {
    /// Collects summary information from a collection.
    pub fn with(collection: &Collection) -> Self {
        CollectionInfo {
            id: collection.identity(),
            name: collection.meta().name.clone(),
            item_type: collection.item_type().clone(),
            state: collection.state(),
            registered: collection.registered_count(),
            blob_slots: collection.blob_slots().slot_count(),
            created_at: Utc
                .timestamp_opt(collection.meta().created_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }
}

impl Display for CollectionInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{: <40}", self.name.to_string())?;
        f.write_char(f.fill())?;
        write!(f, "{: <16}", self.item_type.to_string())?;
        f.write_char(f.fill())?;
        write!(f, "{}", self.created_at.format("%Y-%m-%d"))?;
        f.write_char(f.fill())?;
        write!(f, "{: <10}", self.registered)?;
        f.write_char(f.fill())?;
        writeln!(f, "{}", self.state)?;
        writeln!(f, "\t{}", self.id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn name_len_limits() {
        assert!(Name::from_str("Glyphs").is_ok());
        assert!(Name::from_str("").is_err());
        assert!(Name::from_str(&"x".repeat(41)).is_err());
    }

    #[test]
    fn details_from_str() {
        let details = Details::from_str("A set of 10k procedurally generated glyphs").unwrap();
        assert_eq!(AsRef::<str>::as_ref(&details), "A set of 10k procedurally generated glyphs");
        assert!(Details::from_str("").is_err());
    }
}
