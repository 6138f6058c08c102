/// 데이터베이스 연결과 스키마
pub mod connection;

pub use connection::{create_tables, initialize_database};
