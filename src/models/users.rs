//! # Users Models
use geekorm::prelude::*;
use serde::{Deserialize, Serialize};

/// Users Model / Table
#[derive(Table, Debug, Default, Clone, Serialize, Deserialize)]
pub struct Users {
    /// Primary Key
    #[geekorm(primary_key, auto_increment)]
    pub id: PrimaryKeyInteger,

    /// Email address
    #[geekorm(unique, not_null)]
    pub email: String,

    /// User State
    #[geekorm(new = "UserState::default()")]
    pub state: UserState,

    /// Created At
    #[geekorm(new = "chrono::Utc::now()")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// User State
#[derive(Data, Debug, Default, Clone, PartialEq, Eq)]
pub enum UserState {
    /// Active User
    #[default]
    Active,
    /// Disabled
    Disabled,
}

impl Users {
    /// Create a new active user
    pub async fn create<'a, T>(
        connection: &'a T,
        email: impl Into<String>,
    ) -> Result<Self, geekorm::Error>
    where
        T: GeekConnection<Connection = T> + 'a,
    {
        let mut user = Users::new(email);
        user.save(connection).await?;
        log::info!("Created user: {:?}", user.id);
        Ok(user)
    }

    /// Disable the user, removing it from the active count
    pub async fn disable<'a, T>(&mut self, connection: &'a T) -> Result<(), geekorm::Error>
    where
        T: GeekConnection<Connection = T> + 'a,
    {
        self.state = UserState::Disabled;
        self.update(connection).await?;
        log::info!("Disabled user: {:?}", self.id);
        Ok(())
    }

    /// Count Active Users
    pub async fn count_active<'a, T>(connection: &'a T) -> Result<i64, geekorm::Error>
    where
        T: GeekConnection<Connection = T> + 'a,
    {
        Users::row_count(
            connection,
            Users::query_count()
                .where_eq("state", UserState::Active)
                .build()?,
        )
        .await
    }
}
