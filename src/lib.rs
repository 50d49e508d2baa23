pub(crate) mod chrome;
pub mod nav;
pub mod pages;
pub mod routes;
pub mod store;

pub use nav::{BRAND, NAV_LINKS, NavLink};
pub use routes::{
    AppError, AppState, Page, ROOT_REDIRECT, ROUTE_TABLE, RouteSpec, router, serve,
};
pub use store::{Project, Store, StoreError, Task};
