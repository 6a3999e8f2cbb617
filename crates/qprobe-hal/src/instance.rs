//! Provider scoping: hub / group / project.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HalError;

/// The hub/group/project triple that scopes a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    /// Hub name (e.g. "ibm-q").
    pub hub: String,
    /// Group name (e.g. "open").
    pub group: String,
    /// Project name (e.g. "main").
    pub project: String,
}

impl Instance {
    /// Create a new instance triple.
    pub fn new(
        hub: impl Into<String>,
        group: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            hub: hub.into(),
            group: group.into(),
            project: project.into(),
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.hub, self.group, self.project)
    }
}

impl FromStr for Instance {
    type Err = HalError;

    /// Parse `hub/group/project`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [hub, group, project]
                if !hub.is_empty() && !group.is_empty() && !project.is_empty() =>
            {
                Ok(Self::new(*hub, *group, *project))
            }
            _ => Err(HalError::Configuration(format!(
                "invalid instance '{s}', expected hub/group/project"
            ))),
        }
    }
}

/// Optional constraints on an [`Instance`].
///
/// A `None` field matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceFilter {
    /// Required hub.
    pub hub: Option<String>,
    /// Required group.
    pub group: Option<String>,
    /// Required project.
    pub project: Option<String>,
}

impl InstanceFilter {
    /// A filter that matches every instance.
    pub fn any() -> Self {
        Self::default()
    }

    /// Require a hub.
    pub fn with_hub(mut self, hub: impl Into<String>) -> Self {
        self.hub = Some(hub.into());
        self
    }

    /// Require a group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Require a project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Whether no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.hub.is_none() && self.group.is_none() && self.project.is_none()
    }

    /// Check an instance against this filter.
    pub fn matches(&self, instance: &Instance) -> bool {
        fn field_ok(want: Option<&String>, have: &str) -> bool {
            want.is_none_or(|w| w == have)
        }

        field_ok(self.hub.as_ref(), &instance.hub)
            && field_ok(self.group.as_ref(), &instance.group)
            && field_ok(self.project.as_ref(), &instance.project)
    }
}

impl From<&Instance> for InstanceFilter {
    fn from(instance: &Instance) -> Self {
        Self {
            hub: Some(instance.hub.clone()),
            group: Some(instance.group.clone()),
            project: Some(instance.project.clone()),
        }
    }
}

impl fmt::Display for InstanceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hub={}, group={}, project={}",
            self.hub.as_deref().unwrap_or("*"),
            self.group.as_deref().unwrap_or("*"),
            self.project.as_deref().unwrap_or("*")
        )
    }
}
