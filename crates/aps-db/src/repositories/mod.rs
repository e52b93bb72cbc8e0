// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod account;
pub mod calendar;
pub mod progress;
pub mod range;
pub mod score;
