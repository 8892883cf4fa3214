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

use gax::Result;
use gax::descriptor::{EndpointDescriptor, Location};
use gax::dispatcher::Dispatcher;
use gax::error::{Error, ValidationError};
use gax::invocation::Invocation;
use gax::polling_backoff_policy::PollingBackoffPolicyArg;
use gax::polling_error_policy::PollingErrorPolicyArg;
use lro::{Dialect, Operation, Poller};
use serde_json::Value;

/// What a block returns.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum OutputKind {
    /// The method returns a resource, or a list of resources.
    Resource,
    /// The method returns an Operation resource in the given dialect.
    Operation(Dialect),
    /// The method returns an empty message.
    Empty,
}

/// The method used to query the operations returned by a block.
#[derive(Clone, Debug, PartialEq)]
struct PollMethod {
    descriptor: EndpointDescriptor,
    name_field: String,
}

/// One workflow block: a REST method and the shape of its output.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    descriptor: EndpointDescriptor,
    output: OutputKind,
    poll: Option<PollMethod>,
}

impl Block {
    /// A block returning a resource.
    pub fn resource(descriptor: EndpointDescriptor) -> Self {
        Self::new(descriptor, OutputKind::Resource)
    }

    /// A block returning an empty message.
    pub fn empty(descriptor: EndpointDescriptor) -> Self {
        Self::new(descriptor, OutputKind::Empty)
    }

    /// A block starting a long-running operation.
    ///
    /// Use [with_poll][Block::with_poll] to set the method that queries the
    /// operation, [run_until_done][Block::run_until_done] fails without it.
    pub fn operation(descriptor: EndpointDescriptor, dialect: Dialect) -> Self {
        Self::new(descriptor, OutputKind::Operation(dialect))
    }

    fn new(descriptor: EndpointDescriptor, output: OutputKind) -> Self {
        Self {
            descriptor,
            output,
            poll: None,
        }
    }

    /// Sets the method used to query the operation.
    ///
    /// The operation name is sent in the `name_field` field. Fields filled
    /// from the project id are copied from the original invocation.
    pub fn with_poll<T: Into<String>>(mut self, descriptor: EndpointDescriptor, name_field: T) -> Self {
        self.poll = Some(PollMethod {
            descriptor,
            name_field: name_field.into(),
        });
        self
    }

    /// The discovery method id, e.g. `sqladmin.instances.insert`.
    pub fn id(&self) -> &str {
        self.descriptor.id()
    }

    pub fn descriptor(&self) -> &EndpointDescriptor {
        &self.descriptor
    }

    pub fn output(&self) -> &OutputKind {
        &self.output
    }

    pub fn description(&self) -> &str {
        self.descriptor.description()
    }

    /// The method used to query the operations started by this block.
    pub fn poll_descriptor(&self) -> Option<&EndpointDescriptor> {
        self.poll.as_ref().map(|p| &p.descriptor)
    }

    /// Sends one request and returns the decoded response.
    ///
    /// Long-running methods return the Operation resource as-is.
    pub async fn run(&self, dispatcher: &Dispatcher, invocation: &Invocation) -> Result<Value> {
        dispatcher.invoke(&self.descriptor, invocation).await
    }

    /// Sends the request and, for long-running methods, polls the operation
    /// until it completes.
    ///
    /// Returns the completed Operation resource. An operation completing with
    /// an error returns [Error::service]. Blocks
    /// that do not return an operation behave like [run][Block::run].
    pub async fn run_until_done(
        &self,
        dispatcher: &Dispatcher,
        invocation: &Invocation,
    ) -> Result<Value> {
        self.run_until_done_with_policies(
            dispatcher,
            invocation,
            PollingErrorPolicyArg::default(),
            PollingBackoffPolicyArg::default(),
        )
        .await
    }

    /// Like [run_until_done][Block::run_until_done], with custom polling
    /// policies.
    pub async fn run_until_done_with_policies<E, B>(
        &self,
        dispatcher: &Dispatcher,
        invocation: &Invocation,
        error_policy: E,
        backoff_policy: B,
    ) -> Result<Value>
    where
        E: Into<PollingErrorPolicyArg>,
        B: Into<PollingBackoffPolicyArg>,
    {
        let OutputKind::Operation(dialect) = self.output else {
            return self.run(dispatcher, invocation).await;
        };
        let Some(poll) = self.poll.as_ref() else {
            return Err(Error::validation(ValidationError::MissingPollMethod(
                self.id().to_string(),
            )));
        };
        let start = move || async move {
            let value = dispatcher.invoke(&self.descriptor, invocation).await?;
            Operation::new(dialect, value)
        };
        let query = move |name: String| {
            let poll_invocation = self.poll_invocation(poll, invocation, name);
            async move {
                let value = dispatcher
                    .invoke(&poll.descriptor, &poll_invocation)
                    .await?;
                Operation::new(dialect, value)
            }
        };
        Poller::new(start, query)
            .with_polling_error_policy(error_policy)
            .with_polling_backoff_policy(backoff_policy)
            .until_done()
            .await
            .map(Operation::into_value)
    }

    fn poll_invocation(&self, poll: &PollMethod, invocation: &Invocation, name: String) -> Invocation {
        let project = self
            .descriptor
            .fields_in(Location::Project)
            .find_map(|f| invocation.get(f.name()));
        poll.descriptor
            .fields_in(Location::Project)
            .filter_map(|f| {
                invocation
                    .get(f.name())
                    .or(project)
                    .map(|v| (f.name().to_string(), v.clone()))
            })
            .chain([(poll.name_field.clone(), Value::String(name))])
            .collect()
    }
}
