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

//! Decisions taken by polling policies.
//!
//! A polling loop consults a
//! [PollingErrorPolicy][crate::polling_error_policy::PollingErrorPolicy] after
//! each failed poll. The policy answers with a [LoopState].

use crate::error::Error;

/// What a polling loop should do after a failed poll.
#[derive(Debug)]
pub enum LoopState {
    /// The error cannot be fixed by polling again, stop the loop.
    Permanent(Error),

    /// The error may go away, but the policy limits were reached.
    Exhausted(Error),

    /// The error may go away, poll again.
    Continue(Error),
}

impl LoopState {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// Returns the error that triggered this decision.
    pub fn into_error(self) -> Error {
        match self {
            Self::Permanent(e) | Self::Exhausted(e) | Self::Continue(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::rpc::{Code, Status};

    #[test]
    fn predicates() {
        let state = LoopState::Permanent(Error::service(
            Status::default().set_code(Code::PermissionDenied),
        ));
        assert!(state.is_permanent(), "{state:?}");
        assert!(!state.is_exhausted(), "{state:?}");
        assert!(!state.is_continue(), "{state:?}");

        let state = LoopState::Exhausted(Error::io("connection reset"));
        assert!(!state.is_permanent(), "{state:?}");
        assert!(state.is_exhausted(), "{state:?}");
        assert!(!state.is_continue(), "{state:?}");

        let state = LoopState::Continue(Error::io("connection reset"));
        assert!(!state.is_permanent(), "{state:?}");
        assert!(!state.is_exhausted(), "{state:?}");
        assert!(state.is_continue(), "{state:?}");
    }

    #[test]
    fn into_error() {
        let state = LoopState::Exhausted(Error::io("connection reset"));
        let error = state.into_error();
        assert!(error.is_io(), "{error:?}");
    }
}
