// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{ContainerOperation, DiscoveryOperation, LongrunningOperation, SqlOperation};
use gax::Result;
use gax::error::Error;
use gax::error::rpc::Status;
use serde_json::Value;

/// The shape of the Operation resource returned by a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Dialect {
    /// `google.longrunning.Operation`, used by Cloud Build.
    Longrunning,
    /// GKE `Operation`.
    Container,
    /// Cloud SQL Admin `Operation`.
    Sql,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Longrunning => "google.longrunning.Operation",
            Self::Container => "container.Operation",
            Self::Sql => "sqladmin.Operation",
        }
    }
}

/// An operation in any [Dialect], keeping the JSON returned by the service.
///
/// Blocks return the JSON unchanged, this type interprets it without losing
/// any fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    value: Value,
    parsed: Parsed,
}

#[derive(Clone, Debug, PartialEq)]
enum Parsed {
    Longrunning(LongrunningOperation),
    Container(ContainerOperation),
    Sql(SqlOperation),
}

impl Operation {
    /// Interprets `value` as an operation in `dialect`.
    ///
    /// Fails with a deserialization error if `value` does not have the
    /// expected shape.
    pub fn new(dialect: Dialect, value: Value) -> Result<Self> {
        let parsed = match dialect {
            Dialect::Longrunning => Parsed::Longrunning(parse(&value)?),
            Dialect::Container => Parsed::Container(parse(&value)?),
            Dialect::Sql => Parsed::Sql(parse(&value)?),
        };
        Ok(Self { value, parsed })
    }

    pub fn dialect(&self) -> Dialect {
        match &self.parsed {
            Parsed::Longrunning(_) => Dialect::Longrunning,
            Parsed::Container(_) => Dialect::Container,
            Parsed::Sql(_) => Dialect::Sql,
        }
    }

    /// The JSON returned by the service.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    fn inner(&self) -> &dyn DiscoveryOperation {
        match &self.parsed {
            Parsed::Longrunning(o) => o,
            Parsed::Container(o) => o,
            Parsed::Sql(o) => o,
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T> {
    if !value.is_object() {
        return Err(Error::deser(format!(
            "expected an operation object, got {value}"
        )));
    }
    T::deserialize(value).map_err(Error::deser)
}

impl DiscoveryOperation for Operation {
    fn done(&self) -> bool {
        self.inner().done()
    }

    fn name(&self) -> Option<String> {
        self.inner().name()
    }

    fn status(&self) -> Option<Status> {
        self.inner().status()
    }
}
