//! Per-module permission matrix derived from a role.
//!
//! The matrix is recomputed from the role on every call so a role change
//! takes effect immediately; nothing here is cached or mutated in place.
//! Every lookup fails closed: unknown modules, unknown actions and hidden
//! modules all answer `false`, never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::roles::{AccessLevel, classify_title};

/// Application modules gated by the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Dashboard,
    Tasks,
    Clients,
    Cases,
    Calendar,
    Documents,
    Billing,
    Team,
    Reports,
    Settings,
}

impl Module {
    pub const ALL: [Module; 10] = [
        Module::Dashboard,
        Module::Tasks,
        Module::Clients,
        Module::Cases,
        Module::Calendar,
        Module::Documents,
        Module::Billing,
        Module::Team,
        Module::Reports,
        Module::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Tasks => "tasks",
            Module::Clients => "clients",
            Module::Cases => "cases",
            Module::Calendar => "calendar",
            Module::Documents => "documents",
            Module::Billing => "billing",
            Module::Team => "team",
            Module::Reports => "reports",
            Module::Settings => "settings",
        }
    }

    pub fn from_name(name: &str) -> Option<Module> {
        Module::ALL.iter().copied().find(|m| m.as_str() == name)
    }

    /// Actions this module exposes. Dashboard is view-only.
    fn actions(&self) -> &'static [&'static str] {
        match self {
            Module::Dashboard => &[],
            Module::Tasks | Module::Clients | Module::Cases | Module::Calendar => {
                &["create", "edit", "delete"]
            }
            Module::Documents => &["upload", "delete"],
            Module::Billing => &["create", "edit", "delete"],
            Module::Team => &["create", "edit", "delete"],
            Module::Reports => &["export"],
            Module::Settings => &["edit"],
        }
    }
}

/// Visibility plus per-action flags for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePermissions {
    pub visible: bool,
    pub actions: BTreeMap<String, bool>,
}

impl ModulePermissions {
    fn uniform(module: Module, visible: bool, allowed: bool) -> Self {
        Self {
            visible,
            actions: module
                .actions()
                .iter()
                .map(|a| (a.to_string(), allowed))
                .collect(),
        }
    }
}

/// Module → visibility/action flags. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<Module, ModulePermissions>);

impl PermissionMatrix {
    pub fn get(&self, module: Module) -> Option<&ModulePermissions> {
        self.0.get(&module)
    }

    fn entry(&mut self, module: Module) -> &mut ModulePermissions {
        self.0
            .entry(module)
            .or_insert_with(|| ModulePermissions::uniform(module, false, false))
    }

    fn grant(&mut self, module: Module, actions: &[&str]) {
        let entry = self.entry(module);
        for action in actions {
            entry.actions.insert((*action).to_string(), true);
        }
    }
}

/// Restrictive base: everything visible read-only, except billing, team and
/// settings which are hidden outright.
fn base_matrix() -> PermissionMatrix {
    PermissionMatrix(
        Module::ALL
            .iter()
            .map(|&m| {
                let visible = !matches!(m, Module::Billing | Module::Team | Module::Settings);
                (m, ModulePermissions::uniform(m, visible, false))
            })
            .collect(),
    )
}

fn full_matrix() -> PermissionMatrix {
    PermissionMatrix(
        Module::ALL
            .iter()
            .map(|&m| (m, ModulePermissions::uniform(m, true, true)))
            .collect(),
    )
}

/// Baseline permission matrix for a role string.
///
/// A fresh matrix is constructed on each call; callers must not cache it
/// across role changes.
pub fn default_permissions(role: &str) -> PermissionMatrix {
    permissions_for_level(classify_title(role).unwrap_or(AccessLevel::User))
}

/// Baseline permission matrix for an already resolved access level.
pub fn permissions_for_level(level: AccessLevel) -> PermissionMatrix {
    match level {
        AccessLevel::Manager | AccessLevel::Senior => full_matrix(),
        AccessLevel::Admin => {
            // Plain admins get everything except team management, which is
            // reserved for the managing/senior partners.
            let mut matrix = full_matrix();
            *matrix.entry(Module::Team) =
                ModulePermissions::uniform(Module::Team, false, false);
            matrix
        }
        AccessLevel::Lawyer => {
            let mut matrix = base_matrix();
            for module in [Module::Tasks, Module::Clients, Module::Cases, Module::Calendar] {
                matrix.grant(module, &["create", "edit"]);
            }
            matrix.grant(Module::Documents, &["upload"]);
            matrix
        }
        AccessLevel::Secretary => {
            let mut matrix = base_matrix();
            matrix.grant(Module::Tasks, &["create"]);
            matrix.grant(Module::Clients, &["create", "edit"]);
            matrix.grant(Module::Calendar, &["create", "edit"]);
            matrix.grant(Module::Documents, &["upload"]);
            matrix
        }
        // Interns are read-only; unrecognized titles stay at the base.
        AccessLevel::Intern | AccessLevel::User | AccessLevel::None => base_matrix(),
    }
}

/// Check a module (and optionally one of its actions) against a matrix.
///
/// Fails closed: unknown module names, missing entries and hidden modules
/// all return `false`. A hidden module denies every action regardless of the
/// individual flags.
pub fn check_permission(matrix: &PermissionMatrix, module: &str, action: Option<&str>) -> bool {
    let Some(module) = Module::from_name(module) else {
        return false;
    };
    let Some(entry) = matrix.get(module) else {
        return false;
    };

    match action {
        None => entry.visible,
        Some(action) => entry.visible && entry.actions.get(action).copied().unwrap_or(false),
    }
}
