pub mod allocation_service;
pub mod analytics_service;
pub mod category_service;
pub mod chart_service;
pub mod history_service;
pub mod holdings_service;
pub mod normalizer_service;
pub mod random;
