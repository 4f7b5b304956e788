/*
 * mirrorselect - Fastest archive mirror selection for Ubuntu.
 * Copyright (C) 2025  mirrorselect contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Sources of candidate mirrors.

mod countries;
mod launchpad;

pub use launchpad::{LaunchpadSource, DEFAULT_MIRROR_LIST_URL};

use crate::error::SelectResult;
use async_trait::async_trait;

/// One mirror URL as listed by a source, tagged with the country it was
/// listed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMirror {
    pub url: String,
    /// ISO 3166-1 alpha-2 code, `None` when the listing country is unknown
    pub country: Option<String>,
}

/// Anything that can list candidate mirrors
#[async_trait]
pub trait MirrorSource: Send + Sync {
    async fn discover(&self) -> SelectResult<Vec<RawMirror>>;
}

/// Fixed list, for tests
#[cfg(test)]
pub struct StaticSource {
    mirrors: Vec<RawMirror>,
}

#[cfg(test)]
impl StaticSource {
    pub fn new(mirrors: Vec<RawMirror>) -> Self {
        Self { mirrors }
    }
}

#[cfg(test)]
#[async_trait]
impl MirrorSource for StaticSource {
    async fn discover(&self) -> SelectResult<Vec<RawMirror>> {
        Ok(self.mirrors.clone())
    }
}
