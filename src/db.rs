pub mod organization_repo;
pub use organization_repo::OrganizationRepository;
pub mod resource_repo;
pub use resource_repo::ResourceRepository;
pub mod request_repo;
pub use request_repo::RequestRepository;
pub mod session_repo;
pub use session_repo::SessionRepository;
