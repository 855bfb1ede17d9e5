use std::sync::Arc;

use crate::{
    config::Config,
    database::Database,
    services::{LikesService, PostsService, UsersService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Arc<Database>,
    pub users: UsersService,
    pub posts: PostsService,
    pub likes: LikesService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Initialize database
        let database = Database::new(&config.database.url).await?;
        database.init().await?;
        let db = Arc::new(database);

        Ok(Self {
            users: UsersService::new(db.clone()),
            posts: PostsService::new(db.clone()),
            likes: LikesService::new(db.clone()),
            db,
            config,
        })
    }

    /// State backed by an in-memory database, for tests.
    pub async fn new_in_memory() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        let db = Arc::new(Database::new_in_memory().await?);

        Ok(Self {
            users: UsersService::new(db.clone()),
            posts: PostsService::new(db.clone()),
            likes: LikesService::new(db.clone()),
            db,
            config,
        })
    }
}
