pub mod article_handlers;
pub mod health_handlers;
