//! # REST Services
//!
//! Typed wrappers around the back-end endpoints. Each service borrows the
//! [`SessionManager`] so every call carries the bearer token and applies the
//! 401 rule.
//!
//! | Service              | Endpoint           | Access check        |
//! |----------------------|--------------------|---------------------|
//! | [`CashBoxService`]   | `/caixas`          | session only        |
//! | [`CashCountService`] | `/contagem-caixa`  | session only        |
//! | [`SaleService`]      | `/vendas-caixa`    | `sales`             |
//! | [`ClientService`]    | `/clientes`        | `clients`           |
//! | [`GameService`]      | `/jogos`           | `games`             |
//! | [`PoolService`]      | `/boloes`          | `pools`             |
//! | [`DashboardService`] | `/dashboard`       | `dashboard`         |

mod cash_box;
mod cash_count;
mod client;
mod dashboard;
mod game;
mod pool;
mod sale;

pub use cash_box::CashBoxService;
pub use cash_count::CashCountService;
pub use client::ClientService;
pub use dashboard::DashboardService;
pub use game::GameService;
pub use pool::PoolService;
pub use sale::SaleService;

use crate::session::SessionManager;

impl SessionManager {
    pub fn cash_boxes(&self) -> CashBoxService<'_> {
        CashBoxService::new(self)
    }

    pub fn cash_counts(&self) -> CashCountService<'_> {
        CashCountService::new(self)
    }

    pub fn sales(&self) -> SaleService<'_> {
        SaleService::new(self)
    }

    pub fn clients(&self) -> ClientService<'_> {
        ClientService::new(self)
    }

    pub fn games(&self) -> GameService<'_> {
        GameService::new(self)
    }

    pub fn pools(&self) -> PoolService<'_> {
        PoolService::new(self)
    }

    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(self)
    }
}
