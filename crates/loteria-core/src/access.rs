//! # Access Policy
//!
//! Decides what a role may do and which menu entries it sees.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Permission Check                                   │
//! │                                                                         │
//! │  Screen wants to show "Nova Venda"                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  can(role, Resource::Sales, Action::Create)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PermissionTable[role][resource] ──► ActionSet {C,R}                   │
//! │       │                                                                 │
//! │       └── contains(Create)? ──► true / false                          │
//! │                                                                         │
//! │  No session?     → can_access(None, …) = false                         │
//! │  Unknown names?  → can_str(…) = false (never an error)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The role is always passed in. Nothing here reads a current user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Role
// =============================================================================

/// A user's role as assigned by the back-end (`papel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, TS)]
#[ts(export)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "GERENTE")]
    Manager,
    #[serde(rename = "VENDEDOR")]
    Seller,
    #[serde(rename = "AUDITOR")]
    Auditor,
}

impl Role {
    /// Every role, in table order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Seller, Role::Auditor];

    const fn index(self) -> usize {
        self as usize
    }

    /// Name used by the back-end.
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "GERENTE",
            Role::Seller => "VENDEDOR",
            Role::Auditor => "AUDITOR",
        }
    }

    /// Label shown under the user's name in the drawer.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Manager => "Gerente",
            Role::Seller => "Vendedor",
            Role::Auditor => "Auditor",
        }
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }

    pub fn is_manager(&self) -> bool {
        *self == Role::Manager
    }

    pub fn is_seller(&self) -> bool {
        *self == Role::Seller
    }

    pub fn is_auditor(&self) -> bool {
        *self == Role::Auditor
    }

    /// True when this role is one of `roles`.
    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    /// Accepts the back-end names and their English equivalents, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" | "ADMINISTRATOR" => Ok(Role::Admin),
            "GERENTE" | "MANAGER" => Ok(Role::Manager),
            "VENDEDOR" | "SELLER" => Ok(Role::Seller),
            "AUDITOR" => Ok(Role::Auditor),
            _ => Err(ValidationError::NotAllowed {
                field: "papel".to_string(),
                allowed: Role::ALL.iter().map(|r| r.wire_name().to_string()).collect(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Resource & Action
// =============================================================================

/// Something a role can be granted actions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Users,
    Clients,
    Games,
    Pools,
    Sales,
    Reports,
    Dashboard,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Users,
        Resource::Clients,
        Resource::Games,
        Resource::Pools,
        Resource::Sales,
        Resource::Reports,
        Resource::Dashboard,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Clients => "clients",
            Resource::Games => "games",
            Resource::Pools => "pools",
            Resource::Sales => "sales",
            Resource::Reports => "reports",
            Resource::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "boloes" {
            return Ok(Resource::Pools);
        }

        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == name)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "resource".to_string(),
                allowed: Resource::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            })
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// An operation on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    const fn letter(self) -> char {
        match self {
            Action::Create => 'C',
            Action::Read => 'R',
            Action::Update => 'U',
            Action::Delete => 'D',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == name)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "action".to_string(),
                allowed: Action::ALL.iter().map(|a| a.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Action Set
// =============================================================================

/// A set of actions packed into one byte.
///
/// Displays as CRUD letters: `CRU`, `R`, or `-` when empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const NONE: ActionSet = ActionSet(0);
    pub const READ: ActionSet = ActionSet(Action::Read.bit());
    pub const CREATE_READ: ActionSet = ActionSet(Action::Create.bit() | Action::Read.bit());
    pub const CRU: ActionSet =
        ActionSet(Action::Create.bit() | Action::Read.bit() | Action::Update.bit());
    pub const CRUD: ActionSet = ActionSet(
        Action::Create.bit() | Action::Read.bit() | Action::Update.bit() | Action::Delete.bit(),
    );

    /// Builds a set from a list of actions.
    pub fn of(actions: &[Action]) -> Self {
        actions.iter().fold(ActionSet::NONE, |set, &a| set.with(a))
    }

    /// Returns this set plus `action`.
    pub const fn with(self, action: Action) -> Self {
        ActionSet(self.0 | action.bit())
    }

    pub const fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(move |&a| self.contains(a))
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        self.iter().try_for_each(|a| write!(f, "{}", a.letter()))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter().fold(ActionSet::NONE, ActionSet::with)
    }
}

// =============================================================================
// Permission Table
// =============================================================================

const ROLE_COUNT: usize = Role::ALL.len();
const RESOURCE_COUNT: usize = Resource::ALL.len();

/// Role × Resource → allowed actions. Every cell exists, possibly empty.
///
/// ## Standard Table
/// ```text
/// resource   ADMIN  GERENTE  VENDEDOR  AUDITOR
/// users      CRUD   R        -         R
/// clients    CRUD   CRU      CRU       R
/// games      CRUD   CRU      R         R
/// pools      CRUD   CRU      R         R
/// sales      CRUD   CRU      CR        R
/// reports    R      R        -         R
/// dashboard  R      R        -         R
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionTable {
    cells: [[ActionSet; RESOURCE_COUNT]; ROLE_COUNT],
}

/// Rows in `Resource::ALL` order.
const STANDARD_CELLS: [[ActionSet; RESOURCE_COUNT]; ROLE_COUNT] = {
    use ActionSet as A;
    [
        // ADMIN
        [A::CRUD, A::CRUD, A::CRUD, A::CRUD, A::CRUD, A::READ, A::READ],
        // GERENTE
        [A::READ, A::CRU, A::CRU, A::CRU, A::CRU, A::READ, A::READ],
        // VENDEDOR
        [A::NONE, A::CRU, A::READ, A::READ, A::CREATE_READ, A::NONE, A::NONE],
        // AUDITOR
        [A::READ, A::READ, A::READ, A::READ, A::READ, A::READ, A::READ],
    ]
};

static STANDARD: PermissionTable = PermissionTable {
    cells: STANDARD_CELLS,
};

impl PermissionTable {
    /// The table the back-end roles are designed around.
    pub const fn standard() -> Self {
        PermissionTable {
            cells: STANDARD_CELLS,
        }
    }

    /// A table that denies everything.
    pub const fn empty() -> Self {
        PermissionTable {
            cells: [[ActionSet::NONE; RESOURCE_COUNT]; ROLE_COUNT],
        }
    }

    /// Replaces the actions of one cell.
    pub fn grant(mut self, role: Role, resource: Resource, actions: ActionSet) -> Self {
        self.cells[role.index()][resource.index()] = actions;
        self
    }

    /// Actions `role` may perform on `resource`.
    pub fn allowed(&self, role: Role, resource: Resource) -> ActionSet {
        self.cells[role.index()][resource.index()]
    }

    /// True when `role` may perform `action` on `resource`.
    pub fn can(&self, role: Role, resource: Resource, action: Action) -> bool {
        self.allowed(role, resource).contains(action)
    }

    /// [`can`](Self::can) over raw names. Any unknown name is a denial.
    ///
    /// ## Example
    /// ```rust
    /// use loteria_core::access::PermissionTable;
    ///
    /// let table = PermissionTable::standard();
    /// assert!(table.can_str("VENDEDOR", "boloes", "read"));
    /// assert!(!table.can_str("GUEST", "sales", "read"));
    /// assert!(!table.can_str("ADMIN", "inventory", "read"));
    /// ```
    pub fn can_str(&self, role: &str, resource: &str, action: &str) -> bool {
        match (role.parse(), resource.parse(), action.parse()) {
            (Ok(role), Ok(resource), Ok(action)) => self.can(role, resource, action),
            _ => false,
        }
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        PermissionTable::standard()
    }
}

/// Checks the standard table.
///
/// ## Example
/// ```rust
/// use loteria_core::access::{can, Action, Resource, Role};
///
/// assert!(can(Role::Admin, Resource::Users, Action::Delete));
/// assert!(!can(Role::Manager, Resource::Users, Action::Update));
/// ```
pub fn can(role: Role, resource: Resource, action: Action) -> bool {
    STANDARD.can(role, resource, action)
}

/// Like [`can`] for a possibly missing session: no role means denied.
pub fn can_access(role: Option<Role>, resource: Resource, action: Action) -> bool {
    role.is_some_and(|role| can(role, resource, action))
}

// =============================================================================
// Navigation
// =============================================================================

/// One entry of the drawer menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NavigationItem {
    pub id: String,
    pub name: String,
    pub route: String,
    pub icon: String,
    pub roles: Vec<Role>,
}

impl NavigationItem {
    pub fn new(name: &str, route: &str, icon: &str, roles: &[Role]) -> Self {
        NavigationItem {
            id: route.to_ascii_lowercase(),
            name: name.to_string(),
            route: route.to_string(),
            icon: icon.to_string(),
            roles: roles.to_vec(),
        }
    }

    pub fn is_visible_to(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// The standard drawer menu, in display order.
pub fn default_navigation() -> Vec<NavigationItem> {
    use Role::*;

    vec![
        NavigationItem::new("Dashboard", "Dashboard", "dashboard", &[Admin, Manager, Auditor]),
        NavigationItem::new("Vendas", "Vendas", "shopping-cart", &[Admin, Manager, Seller]),
        NavigationItem::new("Clientes", "Clientes", "people", &Role::ALL),
        NavigationItem::new("Jogos", "Jogos", "games", &[Admin, Manager, Auditor]),
        NavigationItem::new("Bolões", "Boloes", "group", &[Admin, Manager, Auditor]),
        NavigationItem::new("Usuários", "Usuarios", "person", &[Admin]),
        NavigationItem::new("Relatórios", "Relatorios", "assessment", &[Admin, Manager, Auditor]),
        NavigationItem::new("Perfil", "Profile", "account-circle", &Role::ALL),
    ]
}

/// Menu entries visible to `role`, in the order given.
///
/// ## Example
/// ```rust
/// use loteria_core::access::{default_navigation, filter_navigation, Role};
///
/// let menu = default_navigation();
/// let names: Vec<_> = filter_navigation(Role::Seller, &menu)
///     .iter()
///     .map(|item| item.name.as_str())
///     .collect();
/// assert_eq!(names, ["Vendas", "Clientes", "Perfil"]);
/// ```
pub fn filter_navigation(role: Role, items: &[NavigationItem]) -> Vec<&NavigationItem> {
    items.iter().filter(|item| item.is_visible_to(role)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_decisions() {
        assert!(can(Role::Admin, Resource::Users, Action::Delete));
        assert!(!can(Role::Manager, Resource::Users, Action::Update));
        assert!(can(Role::Seller, Resource::Sales, Action::Create));
        assert!(!can(Role::Auditor, Resource::Sales, Action::Create));
    }

    #[test]
    fn test_standard_table_cells() {
        let table = PermissionTable::standard();
        let row = |role| {
            Resource::ALL
                .iter()
                .map(|&res| table.allowed(role, res).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        assert_eq!(row(Role::Admin), "CRUD CRUD CRUD CRUD CRUD R R");
        assert_eq!(row(Role::Manager), "R CRU CRU CRU CRU R R");
        assert_eq!(row(Role::Seller), "- CRU R R CR - -");
        assert_eq!(row(Role::Auditor), "R R R R R R R");
    }

    #[test]
    fn test_nobody_deletes_reports() {
        for role in Role::ALL {
            assert!(!can(role, Resource::Reports, Action::Delete));
            assert!(!can(role, Resource::Dashboard, Action::Update));
        }
    }

    #[test]
    fn test_auditor_is_read_only() {
        for resource in Resource::ALL {
            assert_eq!(
                PermissionTable::standard().allowed(Role::Auditor, resource),
                ActionSet::READ
            );
        }
    }

    #[test]
    fn test_can_access_without_session() {
        for resource in Resource::ALL {
            for action in Action::ALL {
                assert!(!can_access(None, resource, action));
            }
        }
        assert!(can_access(Some(Role::Seller), Resource::Clients, Action::Update));
    }

    #[test]
    fn test_can_str_unknown_names_deny() {
        let table = PermissionTable::standard();
        assert!(table.can_str("ADMIN", "users", "delete"));
        assert!(table.can_str("gerente", "games", "update"));
        assert!(table.can_str("SELLER", "sales", "create"));
        assert!(!table.can_str("ROOT", "users", "read"));
        assert!(!table.can_str("ADMIN", "stock", "read"));
        assert!(!table.can_str("ADMIN", "users", "approve"));
        assert!(!table.can_str("", "", ""));
    }

    #[test]
    fn test_custom_table() {
        let table = PermissionTable::empty().grant(
            Role::Seller,
            Resource::Reports,
            ActionSet::of(&[Action::Read]),
        );
        assert!(table.can(Role::Seller, Resource::Reports, Action::Read));
        assert!(!table.can(Role::Admin, Resource::Users, Action::Read));
        assert_eq!(PermissionTable::default(), PermissionTable::standard());
    }

    #[test]
    fn test_action_set() {
        let set: ActionSet = [Action::Update, Action::Create].into_iter().collect();
        assert!(set.contains(Action::Create));
        assert!(!set.contains(Action::Delete));
        assert_eq!(set.to_string(), "CU");
        assert_eq!(ActionSet::NONE.to_string(), "-");
        assert_eq!(ActionSet::CRUD.iter().count(), 4);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("GERENTE".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!(" vendedor ".parse::<Role>().unwrap(), Role::Seller);
        assert!(matches!(
            "CAIXA".parse::<Role>(),
            Err(ValidationError::NotAllowed { .. })
        ));

        assert_eq!("boloes".parse::<Resource>().unwrap(), Resource::Pools);
        assert_eq!("Pools".parse::<Resource>().unwrap(), Resource::Pools);
        assert!("delete ".parse::<Action>().is_ok());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Seller).unwrap(), "\"VENDEDOR\"");
        let role: Role = serde_json::from_str("\"AUDITOR\"").unwrap();
        assert_eq!(role, Role::Auditor);
        assert!(serde_json::from_str::<Role>("\"OWNER\"").is_err());

        let resource: Resource = serde_json::from_str("\"boloes\"").unwrap();
        assert_eq!(resource, Resource::Pools);
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::Admin.is_admin());
        assert!(Role::Manager.is_manager());
        assert!(Role::Seller.is_seller());
        assert!(Role::Auditor.is_auditor());
        assert!(!Role::Auditor.is_admin());
        assert!(Role::Seller.has_any(&[Role::Admin, Role::Seller]));
        assert!(!Role::Seller.has_any(&[]));
        assert_eq!(Role::Manager.display_name(), "Gerente");
    }

    #[test]
    fn test_filter_navigation_per_role() {
        let menu = default_navigation();
        let names = |role| {
            filter_navigation(role, &menu)
                .into_iter()
                .map(|item| item.name.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(menu.len(), 8);
        assert_eq!(
            names(Role::Admin),
            ["Dashboard", "Vendas", "Clientes", "Jogos", "Bolões", "Usuários", "Relatórios", "Perfil"]
        );
        assert_eq!(
            names(Role::Manager),
            ["Dashboard", "Vendas", "Clientes", "Jogos", "Bolões", "Relatórios", "Perfil"]
        );
        assert_eq!(names(Role::Seller), ["Vendas", "Clientes", "Perfil"]);
        assert_eq!(
            names(Role::Auditor),
            ["Dashboard", "Clientes", "Jogos", "Bolões", "Relatórios", "Perfil"]
        );
    }

    #[test]
    fn test_filter_navigation_keeps_input_order() {
        let mut menu = default_navigation();
        menu.reverse();
        let routes: Vec<_> = filter_navigation(Role::Seller, &menu)
            .into_iter()
            .map(|item| item.route.as_str())
            .collect();
        assert_eq!(routes, ["Profile", "Clientes", "Vendas"]);

        assert!(filter_navigation(Role::Admin, &[]).is_empty());
    }
}
