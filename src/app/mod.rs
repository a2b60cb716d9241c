//! View routing and role gating.
//!
//! The client has exactly two top-level screens: logged out and the
//! dashboard. The admin panel is a tab inside the dashboard, offered only to
//! level-3 users. All privilege checks live here so the rest of the code
//! cannot drift out of sync with the tab set.

use crate::models::{Cargo, User};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    LoggedOut,
    Dashboard,
}

/// Dashboard tabs, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Resumo,
    Quadro,
    Calendario,
    Aprovacoes,
    Formularios,
    Configuracoes,
    Admin,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resumo => "Resumo",
            Self::Quadro => "Quadro",
            Self::Calendario => "Calendário",
            Self::Aprovacoes => "Aprovações",
            Self::Formularios => "Formulários",
            Self::Configuracoes => "Configurações",
            Self::Admin => "Painel Admin",
        }
    }
}

/// Sub-tabs of the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Usuarios,
    Ordens,
    Relatorios,
    Configuracoes,
}

impl AdminTab {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Usuarios => "Usuários",
            Self::Ordens => "Ordens de Serviço",
            Self::Relatorios => "Relatórios",
            Self::Configuracoes => "Configurações",
        }
    }

    /// Sub-tabs in panel order.
    pub fn all() -> &'static [AdminTab] {
        &[
            Self::Usuarios,
            Self::Ordens,
            Self::Relatorios,
            Self::Configuracoes,
        ]
    }
}

/// Admin sub-tabs offered to this user: the full panel at level 3,
/// nothing below it.
pub fn available_admin_tabs(user: &User) -> &'static [AdminTab] {
    if can_access_admin(user) {
        AdminTab::all()
    } else {
        &[]
    }
}

/// Level 3 unlocks the admin panel regardless of cargo.
pub fn can_access_admin(user: &User) -> bool {
    user.nivel_acesso >= 3
}

/// Creating work orders is open to the commercial desk and to admins.
pub fn can_create_os(user: &User) -> bool {
    user.cargo == Cargo::Comercial || can_access_admin(user)
}

/// Tabs offered to this user. The admin tab is appended, never interleaved,
/// matching the sidebar of the original system.
pub fn available_tabs(user: &User) -> Vec<Tab> {
    let mut tabs = vec![
        Tab::Resumo,
        Tab::Quadro,
        Tab::Calendario,
        Tab::Aprovacoes,
        Tab::Formularios,
        Tab::Configuracoes,
    ];
    if can_access_admin(user) {
        tabs.push(Tab::Admin);
    }
    tabs
}

/// Resolve a tab by its label, within the set offered to this user.
/// Unknown or unoffered labels yield `None`, never a panic.
pub fn select_tab(user: &User, label: &str) -> Option<Tab> {
    available_tabs(user).into_iter().find(|t| t.label() == label)
}

/// The top-level screen state machine.
///
/// boot → LoggedOut, unless a restored session exists → Dashboard.
/// Login success moves to Dashboard; logout always returns to LoggedOut.
#[derive(Debug)]
pub struct Router {
    screen: Screen,
}

impl Router {
    pub fn boot(restored: Option<&Session>) -> Self {
        Self {
            screen: if restored.is_some() {
                Screen::Dashboard
            } else {
                Screen::LoggedOut
            },
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn on_login(&mut self) {
        self.screen = Screen::Dashboard;
    }

    pub fn on_logout(&mut self) {
        self.screen = Screen::LoggedOut;
    }
}
