pub(crate) mod auth_routes;
pub(crate) mod flags;
pub(crate) mod ops;
pub(crate) mod rc_admin;
pub(crate) mod vehicles;
