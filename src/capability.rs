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

use strict_encoding::TypeName;

use crate::{Identity, LIB_NAME_COLLECTION};

/// Bearer token granting administrative authority over exactly one
/// collection.
///
/// A capability is created together with its collection and holds no
/// authority over any other object. It is a plain value: possession at call
/// time is the sole authorization signal, and the only operation it supports
/// is comparison against a target collection via [`AdminCap::authorize`] and
/// [`AdminCap::authorize_typed`].
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display)]
#[display("admin({subject})")]
#[derive(StrictType, StrictDumb, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct AdminCap {
    identity: Identity,
    subject: Identity,
    item_type: TypeName,
}

impl AdminCap {
    pub(crate) fn with(identity: Identity, subject: Identity, item_type: TypeName) -> Self {
        AdminCap {
            identity,
            subject,
            item_type,
        }
    }

    /// Identity of the capability object itself.
    #[inline]
    pub fn identity(&self) -> Identity { self.identity }

    /// Identity of the collection this capability authorizes.
    #[inline]
    pub fn subject(&self) -> Identity { self.subject }

    /// Type of items the subject collection registers.
    #[inline]
    pub fn item_type(&self) -> &TypeName { &self.item_type }

    /// Checks that the capability authorizes operations on the given
    /// collection.
    ///
    /// Pure predicate with no side effects; must be the first check of every
    /// privileged operation.
    pub fn authorize(&self, subject: Identity) -> Result<(), AuthError> {
        if self.subject != subject {
            return Err(AuthError::WrongCollection {
                cap: self.identity,
                subject,
            });
        }
        Ok(())
    }

    /// Checks collection identity and additionally that the collection item
    /// type matches the type this capability was created for.
    pub fn authorize_typed(
        &self,
        subject: Identity,
        item_type: &TypeName,
    ) -> Result<(), AuthError> {
        self.authorize(subject)?;
        if &self.item_type != item_type {
            return Err(AuthError::WrongItemType {
                expected: self.item_type.clone(),
                found: item_type.clone(),
            });
        }
        Ok(())
    }
}

/// Errors of capability authorization checks.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum AuthError {
    /// capability {cap} does not authorize operations on collection
    /// {subject}.
    WrongCollection {
        /// Identity of the presented capability.
        cap: Identity,
        /// Identity of the collection the operation was attempted on.
        subject: Identity,
    },

    /// capability was issued for item type {expected} while the collection
    /// registers items of type {found}.
    WrongItemType {
        /// Item type the capability was created for.
        expected: TypeName,
        /// Item type of the target collection.
        found: TypeName,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    fn cap() -> AdminCap {
        AdminCap::with(
            Identity::from_array([1u8; 32]),
            Identity::from_array([2u8; 32]),
            tn!("Glyph"),
        )
    }

    #[test]
    fn authorize_matching_subject() {
        assert_eq!(cap().authorize(Identity::from_array([2u8; 32])), Ok(()));
    }

    #[test]
    fn authorize_foreign_subject() {
        let foreign = Identity::from_array([3u8; 32]);
        assert!(matches!(
            cap().authorize(foreign),
            Err(AuthError::WrongCollection { subject, .. }) if subject == foreign
        ));
    }

    #[test]
    fn authorize_type_mismatch() {
        let subject = Identity::from_array([2u8; 32]);
        assert_eq!(cap().authorize_typed(subject, &tn!("Glyph")), Ok(()));
        assert!(matches!(
            cap().authorize_typed(subject, &tn!("Tile")),
            Err(AuthError::WrongItemType { .. })
        ));
    }
}
