// printshop_server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{admin_handlers, catalog_handlers, enquiry_handlers, order_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Storefront catalog (public reads)
      // Literal segments are registered before `{product_id}` so they are
      // matched first.
      .service(
        web::scope("/products")
          .route("", web::get().to(catalog_handlers::product_page_handler))
          .route("/wall", web::get().to(catalog_handlers::poster_wall_handler))
          .route("/featured", web::get().to(catalog_handlers::featured_handler))
          .route("/search", web::get().to(catalog_handlers::search_handler))
          .route(
            "/images/batch",
            web::post().to(catalog_handlers::batch_images_handler),
          )
          .route("/{product_id}", web::get().to(catalog_handlers::get_product_handler))
          .route(
            "/{product_id}/images",
            web::get().to(catalog_handlers::product_images_handler),
          ),
      )
      // Orders (authenticated)
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order_handler))
          .route("/mine", web::get().to(order_handlers::my_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
      )
      // Bulk order enquiries (public form)
      .service(
        web::scope("/enquiries").route("", web::post().to(enquiry_handlers::create_enquiry_handler)),
      )
      // Back office (admin capability checked inside each handler)
      .service(
        web::scope("/admin")
          .route("/products", web::get().to(admin_handlers::list_products_handler))
          .route("/products", web::post().to(admin_handlers::create_product_handler))
          .route(
            "/products/{product_id}",
            web::patch().to(admin_handlers::update_product_handler),
          )
          .route(
            "/products/{product_id}",
            web::delete().to(admin_handlers::delete_product_handler),
          )
          .route(
            "/products/{product_id}/images",
            web::post().to(admin_handlers::add_product_image_handler),
          )
          .route(
            "/images/{image_id}",
            web::patch().to(admin_handlers::reorder_product_image_handler),
          )
          .route(
            "/images/{image_id}",
            web::delete().to(admin_handlers::delete_product_image_handler),
          )
          .route("/orders", web::get().to(admin_handlers::list_orders_handler))
          .route(
            "/orders/{order_id}/status",
            web::patch().to(admin_handlers::update_order_status_handler),
          )
          .route(
            "/orders/{order_id}/delivery",
            web::patch().to(admin_handlers::update_delivery_info_handler),
          )
          .route("/enquiries", web::get().to(admin_handlers::list_enquiries_handler))
          .route(
            "/enquiries/{enquiry_id}/status",
            web::patch().to(admin_handlers::update_enquiry_status_handler),
          ),
      ),
  );
}
