// Copyright 2024 Google LLC
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

use url::Url;

/// Adds a query parameter to a URL.
///
/// Google APIs use [gRPC Transcoding](https://google.aip.dev/127) for query
/// parameters:
/// - Simple scalars are formatted as usual.
/// - Missing and `null` values are not included in the query.
/// - Repeated fields are formatted as repeated query parameters.
/// - Object fields use `field.subfield` format, and may recurse.
pub fn add<T>(url: &mut Url, name: &str, parameter: &T)
where
    T: QueryParameter + ?Sized,
{
    parameter.add(url, name)
}

/// [QueryParameter] is a trait representing types that can be used as a query
/// parameter.
pub trait QueryParameter {
    fn add(&self, url: &mut Url, name: &str);
}

impl<T: QueryParameter> QueryParameter for Option<T> {
    fn add(&self, url: &mut Url, name: &str) {
        if let Some(t) = self {
            t.add(url, name);
        }
    }
}

impl<T: QueryParameter> QueryParameter for [T] {
    fn add(&self, url: &mut Url, name: &str) {
        for e in self {
            e.add(url, name);
        }
    }
}

impl QueryParameter for str {
    fn add(&self, url: &mut Url, name: &str) {
        url.query_pairs_mut().append_pair(name, self);
    }
}

impl QueryParameter for serde_json::Value {
    fn add(&self, url: &mut Url, name: &str) {
        match self {
            Self::Object(object) => {
                for (k, v) in object {
                    v.add(url, format!("{name}.{k}").as_str());
                }
            }
            Self::Array(array) => array.as_slice().add(url, name),
            Self::Null => {}
            Self::String(s) => s.as_str().add(url, name),
            Self::Number(n) => n.to_string().as_str().add(url, name),
            Self::Bool(b) => b.to_string().as_str().add(url, name),
        }
    }
}
