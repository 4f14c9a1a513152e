pub mod template_service;
pub mod upload_store;

pub use template_service::TemplateService;
pub use upload_store::UploadStore;
