pub mod service;
pub mod profile;

pub use service::{
    Category,
    CategoryInfo,
    Service,
    ServiceFilter,
    ServiceStatus,
    ServiceSubmission,
};
pub use profile::{Principal, ProviderProfile};
