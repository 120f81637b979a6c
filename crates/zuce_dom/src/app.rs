//! Starting an app
//!
//! [`start`] builds the root element, inserts the optional normalization rule,
//! renders the tree and mounts it on the host root.
//!
//! Options can be written in code or loaded from TOML:
//!
//! ```toml
//! resize_throttle_ms = 50
//!
//! [normalize]
//! margin = 0
//! boxSizing = "border-box"
//! ```

use std::time::Duration;

use serde::Deserialize;
use zuce_platform::{try_current_host, HostNodeId, PlatformError};
use zuce_style::StyleSet;

use crate::content::AnyElement;
use crate::element::Element;
use crate::error::Result;
use crate::runtime;
use crate::throttle::DEFAULT_RESIZE_THROTTLE;

/// Options for [`start`]
#[derive(Clone, Debug, PartialEq)]
pub struct StartOptions {
    /// Styles applied to every element through a `*` rule
    pub normalize: Option<StyleSet>,
    /// Trailing interval for host-driven re-evaluation
    ///
    /// Applied when [`start`] runs. An element takes the interval in effect
    /// when its first host-reading producer registers, so elements built
    /// before `start` keep the previous interval. Use
    /// [`set_resize_throttle`](crate::set_resize_throttle) before building
    /// them to change it.
    pub resize_throttle: Duration,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            normalize: None,
            resize_throttle: DEFAULT_RESIZE_THROTTLE,
        }
    }
}

/// On-disk form of [`StartOptions`]
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StartOptionsFile {
    normalize: Option<StyleSet>,
    resize_throttle_ms: Option<u64>,
}

impl StartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalize(mut self, normalize: StyleSet) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn with_resize_throttle(mut self, interval: Duration) -> Self {
        self.resize_throttle = interval;
        self
    }

    /// Parse options from TOML; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: StartOptionsFile = toml::from_str(source)?;
        let defaults = Self::default();
        Ok(Self {
            normalize: file.normalize,
            resize_throttle: file
                .resize_throttle_ms
                .map_or(defaults.resize_throttle, Duration::from_millis),
        })
    }
}

/// A mounted app
///
/// Holds the root element. Dropping the handle leaves the host tree in place.
#[derive(Debug)]
pub struct MountHandle {
    root: AnyElement,
}

impl MountHandle {
    pub fn root(&self) -> &AnyElement {
        &self.root
    }

    /// Host handle of the root element
    pub fn root_handle(&self) -> HostNodeId {
        self.root.handle()
    }
}

/// Build the app returned by `app`, render it and mount it on the host root
///
/// Fails with [`PlatformError::NoHost`] when no host is installed, and with
/// the host's error when the normalization rule is rejected.
pub fn start<S, F>(app: F, options: StartOptions) -> Result<MountHandle>
where
    S: Clone + 'static,
    F: FnOnce() -> Element<S>,
{
    let host = try_current_host().ok_or(PlatformError::NoHost)?;
    runtime::set_resize_throttle(options.resize_throttle);

    if let Some(normalize) = &options.normalize {
        zuce_style::insert_rule(&*host, "*", &normalize.to_declarations())?;
    }

    let root = app();
    let fragment = root.render();
    host.mount(fragment);
    tracing::debug!(tag = root.tag(), handle = ?root.handle(), "app mounted");

    Ok(MountHandle {
        root: root.into_any(),
    })
}
