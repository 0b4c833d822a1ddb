// Copyright 2025 eraflo
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

use crate::error::DisError;

/// What happened to one PDU or message handed to the bridge.
#[derive(Debug)]
pub enum Disposition {
    /// Translated and published.
    Forwarded,
    /// Recognised but not translatable; nothing was published.
    Dropped(DisError),
    /// No processor or adapter is registered for it, or it belongs to
    /// another exercise or came from the bridge itself.
    Unhandled,
}

impl Disposition {
    /// `true` if something was published.
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Disposition::Forwarded)
    }

    /// `true` if the input was recognised but dropped.
    pub fn is_dropped(&self) -> bool {
        matches!(self, Disposition::Dropped(_))
    }
}
