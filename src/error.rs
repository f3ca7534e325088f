// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Everything that can go wrong while reading or rewriting resource files.
///
/// All of these are fatal: the tool is run by hand and the maintainer
/// is expected to fix the input and try again.
#[derive(Error, Debug)]
pub enum RebrandError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed document: {0}")]
    Malformed(String),
    #[error("Missing `{attribute}` attribute on <{element}>")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("Id {id} is claimed by both {existing:?} and {conflicting:?}")]
    Collision {
        id: u64,
        existing: String,
        conflicting: String,
    },
    #[error("Message {message:?} for string {string:?} not found")]
    LookupMiss { string: String, message: String },
}

impl RebrandError {
    /// Returns true for syntax errors and structurally invalid documents.
    pub fn is_malformed(&self) -> bool {
        matches!(self, RebrandError::Xml(_) | RebrandError::Malformed(_))
    }
}

impl From<quick_xml::events::attributes::AttrError> for RebrandError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        RebrandError::Xml(err.into())
    }
}

pub type Result<T> = std::result::Result<T, RebrandError>;
