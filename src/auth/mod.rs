pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod utils;

pub use claims::{Claims, Role};
pub use jwt::JwtService;
pub use middleware::{validate_bearer, AuthenticatedUser};
pub use utils::{
    require_class_access, require_self_or_staff, require_staff, require_student, resolve_class_id,
};
