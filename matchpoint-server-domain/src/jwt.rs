use std::sync::Arc;

use crate::{ServiceResult, users::UserId};

pub type ArcJwtService = Arc<Box<dyn JwtService + Send + Sync>>;
pub trait JwtService {
    fn generate_jwt(&self, user: UserId) -> ServiceResult<String>;
    fn validate_jwt(&self, token: &str) -> ServiceResult<UserId>;
}
