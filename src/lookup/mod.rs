mod batch;
mod parser;
mod record;
mod resolver;

pub use batch::{BatchDriver, Progress};
pub use parser::{parse_ids, parse_single_id};
pub use record::{LookupStatus, ResultRecord, UserProfile};
pub use resolver::{SingleLookup, UserResolver};

#[cfg(test)]
pub(crate) mod testing;
