// printshop_server/src/web/handlers/mod.rs

// Declare handler modules
pub mod admin_handlers;
pub mod catalog_handlers;
pub mod enquiry_handlers;
pub mod order_handlers;
