//! Club-scope permission flags.
//!
//! A flat map of named booleans computed from president/VP/custom-role
//! state on every authenticated request. Nothing here is cached: a role
//! edit takes effect on the holder's next request.

use crate::orm::roles;
use serde::Serialize;

/// Every named permission known to the system, in the order the client
/// presents them.
pub const ALL_PERMISSIONS: &[&str] = &[
    "manage_events",
    "manage_tasks",
    "manage_finance",
    "approve_finance",
    "manage_social",
    "view_members",
    "manage_teams",
    "manage_committee",
    "manage_roles",
    "manage_settings",
    "view_approvals",
];

#[derive(Clone, Debug, Default, Serialize)]
pub struct PermissionSet {
    pub manage_events: bool,
    pub manage_tasks: bool,
    pub manage_finance: bool,
    pub approve_finance: bool,
    pub manage_social: bool,
    pub view_members: bool,
    pub manage_teams: bool,
    pub manage_committee: bool,
    pub manage_roles: bool,
    pub manage_settings: bool,
    pub view_approvals: bool,
}

impl PermissionSet {
    /// Everything granted. Presidents get this.
    pub fn all() -> Self {
        Self {
            manage_events: true,
            manage_tasks: true,
            manage_finance: true,
            approve_finance: true,
            manage_social: true,
            view_members: true,
            manage_teams: true,
            manage_committee: true,
            manage_roles: true,
            manage_settings: true,
            view_approvals: true,
        }
    }

    /// Compute the flags for a club member from their built-in role and,
    /// when present, their custom role's JSON permission map.
    pub fn for_user(user: &crate::orm::users::Model, custom_role: Option<&roles::Model>) -> Self {
        if user.is_president || user.role == "President" {
            return Self::all();
        }

        if user.role == "Vice-President" {
            let mut set = Self::all();
            set.manage_settings = false;
            return set;
        }

        if let Some(role) = custom_role {
            return Self::from_json(&role.permissions);
        }

        Self::default()
    }

    /// Read a custom role's JSON permission map. Unknown keys are ignored;
    /// missing keys default to denied.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let flag = |key: &str| value.get(key).and_then(|v| v.as_bool()).unwrap_or(false);
        Self {
            manage_events: flag("manage_events"),
            manage_tasks: flag("manage_tasks"),
            manage_finance: flag("manage_finance"),
            approve_finance: flag("approve_finance"),
            manage_social: flag("manage_social"),
            view_members: flag("view_members"),
            manage_teams: flag("manage_teams"),
            manage_committee: flag("manage_committee"),
            manage_roles: flag("manage_roles"),
            manage_settings: flag("manage_settings"),
            view_approvals: flag("view_approvals"),
        }
    }

    pub fn can(&self, tag: &str) -> bool {
        match tag {
            "manage_events" => self.manage_events,
            "manage_tasks" => self.manage_tasks,
            "manage_finance" => self.manage_finance,
            "approve_finance" => self.approve_finance,
            "manage_social" => self.manage_social,
            "view_members" => self.view_members,
            "manage_teams" => self.manage_teams,
            "manage_committee" => self.manage_committee,
            "manage_roles" => self.manage_roles,
            "manage_settings" => self.manage_settings,
            "view_approvals" => self.view_approvals,
            _ => false,
        }
    }
}
