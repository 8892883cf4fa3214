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

use crate::Block;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    crate::cloudbuild::blocks()
        .into_iter()
        .chain(crate::container::blocks())
        .chain(crate::sqladmin::blocks())
        .collect()
});

/// A set of blocks, indexed by method id.
///
/// # Example
/// ```
/// # use google_cloud_blocks::Catalog;
/// let catalog = Catalog::builtin();
/// let block = catalog.get("cloudbuild.projects.locations.get");
/// assert!(block.is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    blocks: BTreeMap<String, Block>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The blocks shipped with this crate.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Adds a block, returning the block it replaced, if any.
    pub fn insert(&mut self, block: Block) -> Option<Block> {
        self.blocks.insert(block.id().to_string(), block)
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Iterates the blocks, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Adds all the blocks in `other`. Blocks in `other` replace blocks with
    /// the same id.
    pub fn merge(&mut self, other: Catalog) {
        self.blocks.extend(other.blocks);
    }
}

impl Extend<Block> for Catalog {
    fn extend<T: IntoIterator<Item = Block>>(&mut self, iter: T) {
        for block in iter {
            self.insert(block);
        }
    }
}

impl FromIterator<Block> for Catalog {
    fn from_iter<T: IntoIterator<Item = Block>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        catalog.extend(iter);
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Block;
    type IntoIter = std::collections::btree_map::Values<'a, String, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputKind;
    use auth::constants::SQLSERVICE_ADMIN_SCOPE;
    use gax::descriptor::{BodyMode, Location};
    use gax::path_template::PathTemplate;
    use http::Method;
    use std::collections::BTreeSet;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn builtin_ids_are_unique() {
        let count = crate::cloudbuild::blocks().len()
            + crate::container::blocks().len()
            + crate::sqladmin::blocks().len();
        assert_eq!(Catalog::builtin().len(), count);
    }

    #[test]
    fn builtin_templates_match_fields() -> TestResult {
        for block in Catalog::builtin() {
            let descriptor = block.descriptor();
            let template = PathTemplate::parse(descriptor.path())?;
            let variables = template.variables().collect::<BTreeSet<_>>();
            let fields = descriptor
                .fields_in(Location::Path)
                .chain(descriptor.fields_in(Location::Project))
                .map(|f| f.name())
                .collect::<BTreeSet<_>>();
            assert_eq!(variables, fields, "{}", block.id());
            assert!(!block.description().is_empty(), "{}", block.id());
        }
        Ok(())
    }

    #[test]
    fn builtin_operations_have_poll_method() {
        for block in Catalog::builtin() {
            match block.output() {
                OutputKind::Operation(_) => {
                    let poll = block.poll_descriptor();
                    assert!(poll.is_some(), "{}", block.id());
                    let poll = poll.unwrap();
                    assert_eq!(poll.method(), &Method::GET, "{}", block.id());
                    assert_eq!(poll.base_url(), block.descriptor().base_url());
                    assert!(
                        Catalog::builtin().get(poll.id()).is_some(),
                        "{} polls {}",
                        block.id(),
                        poll.id()
                    );
                }
                _ => assert!(block.poll_descriptor().is_none(), "{}", block.id()),
            }
        }
    }

    #[test]
    fn builtin_reads_have_no_body() {
        for block in Catalog::builtin() {
            let descriptor = block.descriptor();
            if *descriptor.method() == Method::GET || *descriptor.method() == Method::DELETE {
                assert_eq!(descriptor.body_mode(), BodyMode::Empty, "{}", block.id());
                assert_eq!(
                    descriptor.fields_in(Location::Body).count(),
                    0,
                    "{}",
                    block.id()
                );
            }
        }
    }

    #[test]
    fn builtin_scopes() {
        for block in Catalog::builtin() {
            let scopes = block.descriptor().scopes();
            let sql = block.id().starts_with("sqladmin.");
            assert_eq!(
                scopes.iter().any(|s| s == SQLSERVICE_ADMIN_SCOPE),
                sql,
                "{}",
                block.id()
            );
        }
    }

    #[test_case("cloudbuild.projects.builds.create", "https://cloudbuild.googleapis.com/v1/projects/{projectId}/builds")]
    #[test_case("cloudbuild.projects.locations.get", "https://cloudbuild.googleapis.com/v2/{+name}")]
    #[test_case("container.projects.locations.clusters.get", "https://container.googleapis.com/v1/{+name}")]
    #[test_case("container.projects.zones.clusters.get", "https://container.googleapis.com/v1/projects/{projectId}/zones/{zone}/clusters/{clusterId}")]
    #[test_case("sqladmin.instances.insert", "https://sqladmin.googleapis.com/v1/projects/{project}/instances")]
    #[test_case("sqladmin.flags.list", "https://sqladmin.googleapis.com/v1/flags")]
    fn builtin_url_templates(id: &str, want: &str) {
        let block = Catalog::builtin().get(id);
        assert!(block.is_some(), "{id}");
        assert_eq!(block.unwrap().descriptor().url_template(), want);
    }

    #[test]
    fn merge_replaces() {
        let mut catalog = crate::sqladmin::blocks().into_iter().collect::<Catalog>();
        let before = catalog.len();
        let replacement = Block::resource(
            crate::sqladmin::operations_get().with_description("replaced"),
        );
        catalog.merge(Catalog::from_iter([replacement.clone()]));
        assert_eq!(catalog.len(), before);
        assert_eq!(catalog.get("sqladmin.operations.get"), Some(&replacement));

        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.insert(replacement.clone()).is_none());
        assert_eq!(catalog.insert(replacement.clone()), Some(replacement));
        catalog.extend(crate::container::blocks());
        assert_eq!(catalog.len(), 1 + crate::container::blocks().len());
    }
}
