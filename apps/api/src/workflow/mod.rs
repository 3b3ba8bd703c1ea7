// Interactive workflow: upload -> extract -> review/edit -> generate -> download.
// Session-scoped state only; nothing is persisted.

pub mod handlers;
pub mod render;
pub mod session;
pub mod store;
