mod interface;
mod order_code;
mod snowflake;
mod ulid;

pub use interface::*;
pub use order_code::*;
pub use snowflake::*;
pub use ulid::*;
