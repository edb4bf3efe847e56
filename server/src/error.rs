use storefront::StorefrontError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontServerError {
    /// Storefront Internal Error
    #[error("Storefront Error: {0}")]
    StorefrontError(#[from] StorefrontError),

    /// Rocket failed to ignite or launch
    #[error("Rocket Error: {0}")]
    RocketError(Box<rocket::Error>),
}

impl From<rocket::Error> for StorefrontServerError {
    fn from(value: rocket::Error) -> Self {
        StorefrontServerError::RocketError(Box::new(value))
    }
}
