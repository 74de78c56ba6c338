mod schema;
mod stream;

pub use self::schema::Schema;
pub(crate) use self::schema::SchemaRow;
pub(crate) use self::stream::StreamRow;
