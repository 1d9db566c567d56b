// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod completion;
pub mod course;
pub mod lesson;
pub mod progress;
pub mod task;
pub mod user;
