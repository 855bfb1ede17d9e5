// Domain services - each owns the SQL for its slice of the schema

pub mod likes;
pub mod posts;
pub mod users;

pub use likes::LikesService;
pub use posts::PostsService;
pub use users::UsersService;
